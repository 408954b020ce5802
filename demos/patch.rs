//! Applying PATCH requests where absent, null and a value mean different things.
//!
//! Run with: cargo run --example patch

use serde_presence::record::decode_record_into;
use serde_presence::{decode_str, encode_to_string, record, validate, Error, Options, Value};

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Contact {
        name: String,
        email: Option<Option<String>> => "email,optional,nullable",
        phone: Option<Option<String>> => "phone,optional,nullable",
    }
}

record! {
    #[derive(Debug, Default)]
    struct Misdeclared {
        email: Option<String> => "email,optional,nullable",
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = Options::default();
    let mut contact: Contact = decode_str(
        r#"{"name":"Alice","email":"alice@example.com","phone":"555-0100"}"#,
        &options,
    )?;
    println!("Stored:  {}", encode_to_string(&contact, &options)?);

    // email is cleared, phone is left alone
    let patch: Value = serde_json::from_str(r#"{"email":null}"#)?;
    decode_record_into(&mut contact, patch, &options)?;
    println!("Patched: {}", encode_to_string(&contact, &options)?);
    assert_eq!(contact.email, Some(None));
    assert_eq!(contact.phone, Some(Some("555-0100".to_string())));

    let strict = Options::new().with_deny_unknown_fields(true);
    match decode_str::<Contact>(r#"{"name":"Bob","fax":"1"}"#, &strict) {
        Err(Error::UnknownField { field, .. }) => println!("Rejected unknown field {:?}", field),
        other => println!("Unexpected: {:?}", other),
    }

    if let Err(err) = validate::<Misdeclared>() {
        println!("Misdeclared record: {}", err);
    }

    println!("\n{}", encode_to_string(&contact, &Options::pretty())?);
    Ok(())
}
