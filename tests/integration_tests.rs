use serde_presence::record::decode_record_into;
use serde_presence::{
    decode, decode_str, descriptor, encode, encode_to_string, record, validate, value, Error,
    Options, Value,
};
use std::sync::{Arc, Barrier};

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Plain {
        id: u64,
        name: String,
        score: f64,
        tags: Vec<String>,
        note: Option<String>,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Optional {
        n: Option<i64> => "n,optional",
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Nullable {
        n: Option<i64> => "n,nullable",
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Both {
        x: Option<Option<i64>> => "X,optional,nullable",
    }
}

fn opts() -> Options {
    Options::default()
}

#[test]
fn test_plain_fields_roundtrip() {
    let plain = Plain {
        id: 7,
        name: "Alice".to_string(),
        score: 1.5,
        tags: vec!["a".to_string(), "b".to_string()],
        note: None,
    };

    let json = encode_to_string(&plain, &opts()).unwrap();
    assert_eq!(
        json,
        r#"{"id":7,"name":"Alice","score":1.5,"tags":["a","b"],"note":null}"#
    );
    let back: Plain = decode_str(&json, &opts()).unwrap();
    assert_eq!(back, plain);
}

#[test]
fn test_optional_absent_is_omitted() {
    assert_eq!(encode_to_string(&Optional { n: None }, &opts()).unwrap(), "{}");
    assert_eq!(
        encode_to_string(&Optional { n: Some(5) }, &opts()).unwrap(),
        r#"{"n":5}"#
    );

    let absent: Optional = decode_str("{}", &opts()).unwrap();
    assert_eq!(absent.n, None);
    let set: Optional = decode_str(r#"{"n":5}"#, &opts()).unwrap();
    assert_eq!(set.n, Some(5));
}

#[test]
fn test_optional_null_allocates_zero() {
    let decoded: Optional = decode_str(r#"{"n":null}"#, &opts()).unwrap();
    assert_eq!(decoded.n, Some(0));
}

#[test]
fn test_nullable_none_is_null() {
    assert_eq!(
        encode_to_string(&Nullable { n: None }, &opts()).unwrap(),
        r#"{"n":null}"#
    );

    let cleared: Nullable = decode_str(r#"{"n":null}"#, &opts()).unwrap();
    assert_eq!(cleared.n, None);
    let set: Nullable = decode_str(r#"{"n":3}"#, &opts()).unwrap();
    assert_eq!(set.n, Some(3));
}

#[test]
fn test_nullable_must_be_present() {
    let err = decode_str::<Nullable>("{}", &opts()).unwrap_err();
    assert_eq!(err, Error::missing_nullable_field("Nullable", "n"));
    assert!(!err.is_config());

    // the failure belongs to that input, not to the type
    assert!(decode_str::<Nullable>(r#"{"n":null}"#, &opts()).is_ok());
}

#[test]
fn test_optional_nullable_scenario() {
    let absent: Both = decode_str("{}", &opts()).unwrap();
    let null: Both = decode_str(r#"{"X":null}"#, &opts()).unwrap();
    let zero: Both = decode_str(r#"{"X":0}"#, &opts()).unwrap();

    assert_eq!(absent.x, None);
    assert_eq!(null.x, Some(None));
    assert_eq!(zero.x, Some(Some(0)));

    assert_ne!(absent, null);
    assert_ne!(null, zero);
    assert_ne!(absent, zero);

    assert_eq!(encode_to_string(&absent, &opts()).unwrap(), "{}");
    assert_eq!(encode_to_string(&null, &opts()).unwrap(), r#"{"X":null}"#);
    assert_eq!(encode_to_string(&zero, &opts()).unwrap(), r#"{"X":0}"#);
}

#[test]
fn test_absent_leaves_existing_value() {
    let mut existing = Both { x: Some(Some(5)) };
    decode_record_into(&mut existing, value!({}), &opts()).unwrap();
    assert_eq!(existing.x, Some(Some(5)));

    decode_record_into(&mut existing, value!({ "X": null }), &opts()).unwrap();
    assert_eq!(existing.x, Some(None));
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Account {
        a: Option<i64> => "a,optional",
        b: Option<i64> => "b,nullable",
        c: Option<Option<i64>> => "c,optional,nullable",
    }
}

fn account() -> Account {
    Account {
        a: Some(1),
        b: Some(2),
        c: Some(Some(3)),
    }
}

#[test]
fn test_failed_decode_leaves_record_unchanged() {
    let mut existing = account();

    // b is nullable only, so leaving it out fails after a was already seen
    let err = decode_record_into(&mut existing, value!({ "a": 5 }), &opts()).unwrap_err();
    assert!(matches!(err, Error::MissingNullableField { .. }));
    assert_eq!(existing, account());

    // c fails on its value after a and b decoded
    let err = decode_record_into(
        &mut existing,
        value!({ "a": 5, "b": null, "c": "text" }),
        &opts(),
    )
    .unwrap_err();
    assert!(!err.is_config());
    assert_eq!(existing, account());

    let strict = Options::new().with_deny_unknown_fields(true);
    let err =
        decode_record_into(&mut existing, value!({ "a": 5, "b": 6, "z": 0 }), &strict).unwrap_err();
    assert!(matches!(err, Error::UnknownField { .. }));
    assert_eq!(existing, account());

    decode_record_into(&mut existing, value!({ "a": 5, "b": null }), &opts()).unwrap();
    assert_eq!(
        existing,
        Account {
            a: Some(5),
            b: None,
            c: Some(Some(3)),
        }
    );
}

record! {
    #[derive(Debug, Default)]
    struct OptionalOmitEmpty {
        n: Option<i64> => "n,optional,omitempty",
    }
}

record! {
    #[derive(Debug, Default)]
    struct NullableOmitEmpty {
        n: Option<i64> => "n,omitempty,nullable",
    }
}

#[test]
fn test_omitempty_conflict_is_permanent() {
    let expected = Error::tag_conflict("OptionalOmitEmpty", "n", "optional");
    for _ in 0..3 {
        assert_eq!(validate::<OptionalOmitEmpty>().unwrap_err(), expected);
        assert_eq!(
            encode(&OptionalOmitEmpty { n: Some(1) }).unwrap_err(),
            expected
        );
        assert_eq!(
            decode::<OptionalOmitEmpty>(value!({ "n": 1 }), &opts()).unwrap_err(),
            expected
        );
    }
    assert!(expected.is_config());

    let err = validate::<NullableOmitEmpty>().unwrap_err();
    assert_eq!(err, Error::tag_conflict("NullableOmitEmpty", "n", "nullable"));
}

record! {
    #[derive(Debug, Default)]
    struct NullableScalar {
        n: i64 => "n,nullable",
    }
}

record! {
    #[derive(Debug, Default)]
    struct OneLayer {
        n: Option<i64> => "n,optional,nullable",
    }
}

record! {
    #[derive(Debug, Default)]
    struct TwoLayers {
        n: Option<Option<i64>> => "n,optional,nullable",
    }
}

record! {
    #[derive(Debug, Default)]
    struct BoxedScalar {
        n: Box<i64> => "n,nullable",
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    struct OptionalBox {
        n: Option<Box<i64>> => "n,nullable",
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    struct BoxedOption {
        n: Box<Option<i64>> => "n,optional",
        m: Option<Box<Option<i64>>> => "m,optional,nullable",
    }
}

#[test]
fn test_insufficient_indirection() {
    match validate::<NullableScalar>().unwrap_err() {
        Error::InsufficientIndirection {
            record,
            field,
            required,
            flags,
            declared,
            remaining,
        } => {
            assert_eq!(record, "NullableScalar");
            assert_eq!(field, "n");
            assert_eq!(required, 1);
            assert_eq!(flags, "nullable");
            assert_eq!(declared, "i64");
            assert_eq!(remaining, "i64");
        }
        other => panic!("unexpected error: {}", other),
    }

    let err = validate::<OneLayer>().unwrap_err();
    assert!(err.to_string().contains("requires 2 levels"));
    assert!(err.to_string().contains("type = Option<i64>"));

    assert!(validate::<TwoLayers>().is_ok());
}

#[test]
fn test_box_does_not_count_as_a_layer() {
    assert!(matches!(
        validate::<BoxedScalar>().unwrap_err(),
        Error::InsufficientIndirection { .. }
    ));

    assert!(validate::<OptionalBox>().is_ok());
    let set: OptionalBox = decode_str(r#"{"n":4}"#, &opts()).unwrap();
    assert_eq!(set.n, Some(Box::new(4)));
    assert_eq!(encode_to_string(&set, &opts()).unwrap(), r#"{"n":4}"#);
}

#[test]
fn test_box_does_not_hide_a_layer() {
    assert!(validate::<BoxedOption>().is_ok());

    let absent: BoxedOption = decode_str("{}", &opts()).unwrap();
    assert_eq!(absent, BoxedOption::default());
    assert_eq!(encode_to_string(&absent, &opts()).unwrap(), "{}");

    let set: BoxedOption = decode_str(r#"{"n":1,"m":null}"#, &opts()).unwrap();
    assert_eq!(*set.n, Some(1));
    assert_eq!(set.m, Some(Box::new(None)));
    assert_eq!(encode_to_string(&set, &opts()).unwrap(), r#"{"n":1,"m":null}"#);

    let full: BoxedOption = decode_str(r#"{"m":2}"#, &opts()).unwrap();
    assert_eq!(full.m, Some(Box::new(Some(2))));
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Audit {
        created_by: String,
        deleted_at: Option<Option<i64>> => "deleted_at,optional,nullable",
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Document {
        title: String,
        audit: Option<Audit> => ",inline",
    }
}

#[test]
fn test_inline_record_flattens() {
    let doc = Document {
        title: "a".to_string(),
        audit: Some(Audit {
            created_by: "bob".to_string(),
            deleted_at: Some(None),
        }),
    };
    assert_eq!(
        encode_to_string(&doc, &opts()).unwrap(),
        r#"{"title":"a","created_by":"bob","deleted_at":null}"#
    );

    let bare = Document {
        title: "a".to_string(),
        audit: None,
    };
    assert_eq!(encode_to_string(&bare, &opts()).unwrap(), r#"{"title":"a"}"#);

    let fields = descriptor::<Document>().unwrap();
    let deleted_at = fields.field("deleted_at").unwrap();
    assert_eq!(deleted_at.path, vec![1, 1]);
}

#[test]
fn test_inline_parent_allocated_on_decode() {
    let untouched: Document = decode_str(r#"{"title":"a"}"#, &opts()).unwrap();
    assert_eq!(untouched.audit, None);

    let deleted: Document = decode_str(r#"{"title":"a","deleted_at":null}"#, &opts()).unwrap();
    assert_eq!(
        deleted.audit,
        Some(Audit {
            created_by: String::new(),
            deleted_at: Some(None),
        })
    );
}

record! {
    #[derive(Debug, Default)]
    struct InlineScalar {
        n: Option<i64> => ",inline",
    }
}

record! {
    #[derive(Debug, Default)]
    struct InlineOptional {
        audit: Option<Audit> => ",inline,optional",
    }
}

#[test]
fn test_invalid_inline_tags() {
    assert!(matches!(
        validate::<InlineScalar>().unwrap_err(),
        Error::InvalidTag { .. }
    ));
    let err = validate::<InlineOptional>().unwrap_err();
    assert!(err.to_string().contains("inline cannot be combined with optional"));
    assert!(err.is_config());
}

record! {
    #[derive(Debug, Default, PartialEq)]
    struct Owner {
        name: String,
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    struct Pet {
        name: String,
        owner: Option<Owner> => ",nullable",
        vet: Nullable,
    }
}

#[test]
fn test_nested_records() {
    let pet: Pet = decode_str(
        r#"{"name":"rex","owner":{"name":"ann"},"vet":{"n":null}}"#,
        &opts(),
    )
    .unwrap();
    assert_eq!(
        pet.owner,
        Some(Owner {
            name: "ann".to_string()
        })
    );

    // an inner record's input error keeps its kind
    let err = decode_str::<Pet>(r#"{"name":"rex","owner":null,"vet":{}}"#, &opts()).unwrap_err();
    assert_eq!(err, Error::missing_nullable_field("Nullable", "n"));

    let err = decode_str::<Pet>(r#"{"owner":null,"vet":[1]}"#, &opts()).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

record! {
    #[derive(Debug, Default, PartialEq)]
    struct Quoted {
        id: i64 => "id,string",
        ok: bool => ",string",
        tags: Vec<String> => ",string",
    }
}

#[test]
fn test_string_option() {
    let quoted = Quoted {
        id: 42,
        ok: true,
        tags: vec!["x".to_string()],
    };
    let json = encode_to_string(&quoted, &opts()).unwrap();
    assert_eq!(json, r#"{"id":"42","ok":"true","tags":["x"]}"#);
    let back: Quoted = decode_str(&json, &opts()).unwrap();
    assert_eq!(back, quoted);

    assert!(decode_str::<Quoted>(r#"{"id":42}"#, &opts()).is_err());
}

record! {
    #[derive(Debug, Default, PartialEq)]
    struct Renamed {
        user_id: u32 => "userId",
        secret: String => "-",
        count: u32 => ",omitempty",
    }
}

#[test]
fn test_rename_skip_and_omitempty() {
    let renamed = Renamed {
        user_id: 3,
        secret: "hidden".to_string(),
        count: 0,
    };
    assert_eq!(encode_to_string(&renamed, &opts()).unwrap(), r#"{"userId":3}"#);

    let back: Renamed = decode_str(r#"{"userId":3,"secret":"x","count":2}"#, &opts()).unwrap();
    assert_eq!(back.user_id, 3);
    assert_eq!(back.secret, "");
    assert_eq!(back.count, 2);
}

#[test]
fn test_deny_unknown_fields() {
    let strict = Options::new().with_deny_unknown_fields(true);
    let err = decode_str::<Optional>(r#"{"n":1,"extra":2}"#, &strict).unwrap_err();
    assert_eq!(err, Error::unknown_field("Optional", "extra"));

    let lenient: Optional = decode_str(r#"{"n":1,"extra":2}"#, &opts()).unwrap();
    assert_eq!(lenient.n, Some(1));
}

#[test]
fn test_unsigned_extremes_roundtrip() {
    let plain = Plain {
        id: u64::MAX,
        score: f64::MAX,
        ..Plain::default()
    };
    let json = encode_to_string(&plain, &opts()).unwrap();
    assert!(json.starts_with(r#"{"id":18446744073709551615,"#));
    let back: Plain = decode_str(&json, &opts()).unwrap();
    assert_eq!(back, plain);

    let literal: Plain = decode_str(r#"{"id":18446744073709551615}"#, &opts()).unwrap();
    assert_eq!(literal.id, u64::MAX);
}

#[test]
fn test_record_from_non_object() {
    let err = decode::<Plain>(value!([1, 2]), &opts()).unwrap_err();
    assert_eq!(err, Error::type_mismatch("object", "array"));

    let from_null: Plain = decode(Value::Null, &opts()).unwrap();
    assert_eq!(from_null, Plain::default());
}

#[test]
fn test_pretty_record_output() {
    let json = encode_to_string(&Both { x: Some(Some(1)) }, &Options::pretty()).unwrap();
    assert_eq!(json, "{\n  \"X\": 1\n}");
}

record! {
    #[derive(Debug, Default)]
    struct Shared {
        a: Option<Option<i64>> => "a,optional,nullable",
        b: String,
    }
}

record! {
    #[derive(Debug, Default)]
    struct SharedBad {
        a: Option<i64> => "a,optional,nullable",
    }
}

#[test]
fn test_concurrent_first_use() {
    let start = Barrier::new(8);
    let descriptors: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    start.wait();
                    descriptor::<Shared>().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    // every caller holds the one published entry, not its own build
    let published = descriptor::<Shared>().unwrap();
    for descriptor in &descriptors {
        assert!(Arc::ptr_eq(descriptor, &published));
    }
    assert_eq!(published.fields.len(), 2);

    let errors: Vec<Error> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| validate::<SharedBad>().unwrap_err()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(errors.iter().all(|err| *err == errors[0]));
}
