//! Record descriptors.
//!
//! A [`RecordDescriptor`] is the validated, flattened field list of one record type:
//! every field reachable from the root (through `inline` records) with its wire name,
//! its navigation path and its parsed tag. It is built once per type by the
//! [`registry`](crate::registry) and shared by every encode and decode of that type.
//!
//! Inline flattening follows the usual embedding rules. When several fields end up
//! with the same wire name, the shallowest one wins; if there is a tie at that depth,
//! the one with an explicit name in its tag wins; otherwise all of them are dropped.

use crate::shape::{RecordShape, Shape};
use crate::tag::FieldTagOptions;
use crate::{validate, Error, Result};
use indexmap::IndexMap;
use log::trace;

/// Resolved metadata for one field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    /// Key on the wire.
    pub name: String,
    /// Rust identifier of the field.
    pub ident: &'static str,
    /// Field indices from the root record, through inlined records, to the field.
    pub path: Vec<usize>,
    /// Declared type of the field.
    pub shape: Shape,
    pub options: FieldTagOptions,
}

impl FieldSpec {
    /// Number of inlined records between the root and this field.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// `true` when the tag gave the field an explicit wire name.
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.options.name.is_some()
    }

    /// `true` when the `string` option applies: it is ignored on non-scalar types.
    #[must_use]
    pub fn quoted(&self) -> bool {
        self.options.string && self.shape.strip_ownership().is_scalar()
    }
}

/// The validated field list of a record type.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordDescriptor {
    pub name: &'static str,
    /// Fields in declaration order, inlined fields in place of their parent.
    pub fields: Vec<FieldSpec>,
}

impl RecordDescriptor {
    /// Flattens and validates a record shape.
    pub fn build(root: RecordShape) -> Result<Self> {
        let mut fields = Vec::new();
        let mut visiting = vec![root.name];
        collect(root.name, root, &[], &mut fields, &mut visiting)?;
        let fields = dominant_fields(fields);

        for spec in &fields {
            validate::check_field(&root, spec)?;
        }

        Ok(RecordDescriptor {
            name: root.name,
            fields,
        })
    }

    /// Looks a field up by wire name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

fn collect(
    record: &'static str,
    shape: RecordShape,
    prefix: &[usize],
    out: &mut Vec<FieldSpec>,
    visiting: &mut Vec<&'static str>,
) -> Result<()> {
    for (index, def) in shape.fields().into_iter().enumerate() {
        let options = FieldTagOptions::parse(def.tag);
        if options.skip {
            trace!("{}.{}: skipped", record, def.ident);
            continue;
        }

        let mut path = prefix.to_vec();
        path.push(index);

        if options.inline {
            let inner = check_inline(record, def.ident, &def.shape, &options)?;
            if visiting.contains(&inner.name) {
                return Err(Error::invalid_tag(
                    record,
                    def.ident,
                    &format!("{} is inlined into itself", inner.name),
                ));
            }
            visiting.push(inner.name);
            collect(record, inner, &path, out, visiting)?;
            visiting.pop();
            continue;
        }

        out.push(FieldSpec {
            name: options
                .name
                .clone()
                .unwrap_or_else(|| def.ident.to_string()),
            ident: def.ident,
            path,
            shape: def.shape,
            options,
        });
    }
    Ok(())
}

fn check_inline(
    record: &str,
    ident: &str,
    shape: &Shape,
    options: &FieldTagOptions,
) -> Result<RecordShape> {
    let conflict = [
        (options.optional, "optional"),
        (options.nullable, "nullable"),
        (options.omit_empty, "omitempty"),
        (options.string, "string"),
    ]
    .into_iter()
    .find_map(|(set, flag)| set.then_some(flag));
    if let Some(flag) = conflict {
        return Err(Error::invalid_tag(
            record,
            ident,
            &format!("inline cannot be combined with {}", flag),
        ));
    }
    if options.name.is_some() {
        return Err(Error::invalid_tag(record, ident, "an inlined field cannot be renamed"));
    }
    shape.strip_ownership().as_record().ok_or_else(|| {
        Error::invalid_tag(
            record,
            ident,
            &format!("inline requires a record type, found {}", shape),
        )
    })
}

fn dominant_fields(fields: Vec<FieldSpec>) -> Vec<FieldSpec> {
    let mut by_name: IndexMap<String, Vec<FieldSpec>> = IndexMap::new();
    for spec in fields {
        by_name.entry(spec.name.clone()).or_default().push(spec);
    }

    let mut kept: Vec<FieldSpec> = by_name
        .into_values()
        .filter_map(|candidates| {
            let shallowest = candidates.iter().map(FieldSpec::depth).min()?;
            let mut top: Vec<FieldSpec> = candidates
                .into_iter()
                .filter(|spec| spec.depth() == shallowest)
                .collect();
            if top.len() > 1 {
                top.retain(FieldSpec::is_named);
            }
            if top.len() == 1 {
                top.pop()
            } else {
                trace!("ambiguous field name dropped");
                None
            }
        })
        .collect();
    kept.sort_by(|a, b| a.path.cmp(&b.path));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::FieldDef;

    fn inner_fields() -> Vec<FieldDef> {
        vec![
            FieldDef::new("id", "", Shape::Scalar("u64")),
            FieldDef::new("name", "", Shape::Scalar("String")),
        ]
    }

    fn outer_fields() -> Vec<FieldDef> {
        vec![
            FieldDef::new("name", "", Shape::Scalar("String")),
            FieldDef::new(
                "meta",
                ",inline",
                Shape::Optional(Box::new(Shape::Record(RecordShape {
                    name: "Inner",
                    fields: inner_fields,
                }))),
            ),
            FieldDef::new("hidden", "-", Shape::Scalar("bool")),
            FieldDef::new("count", "n,omitempty", Shape::Scalar("i32")),
        ]
    }

    fn loop_fields() -> Vec<FieldDef> {
        vec![FieldDef::new(
            "again",
            ",inline",
            Shape::Boxed(Box::new(Shape::Record(RecordShape {
                name: "Loop",
                fields: loop_fields,
            }))),
        )]
    }

    #[test]
    fn test_flatten_skip_and_rename() {
        let descriptor = RecordDescriptor::build(RecordShape {
            name: "Outer",
            fields: outer_fields,
        })
        .unwrap();

        let names: Vec<&str> = descriptor.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "id", "n"]);

        let id = descriptor.field("id").unwrap();
        assert_eq!(id.path, vec![1, 0]);
        assert_eq!(id.depth(), 1);
        assert_eq!(descriptor.field("name").unwrap().path, vec![0]);
        assert!(descriptor.field("hidden").is_none());
    }

    #[test]
    fn test_tagged_field_wins_a_tie() {
        let fields = vec![
            FieldSpec {
                name: "k".to_string(),
                ident: "a",
                path: vec![0, 0],
                shape: Shape::Scalar("i32"),
                options: FieldTagOptions::parse(""),
            },
            FieldSpec {
                name: "k".to_string(),
                ident: "b",
                path: vec![1, 0],
                shape: Shape::Scalar("i32"),
                options: FieldTagOptions::parse("k"),
            },
        ];
        let kept = dominant_fields(fields.clone());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].ident, "b");

        let untagged: Vec<FieldSpec> = fields
            .into_iter()
            .map(|mut spec| {
                spec.options.name = None;
                spec
            })
            .collect();
        assert!(dominant_fields(untagged).is_empty());
    }

    #[test]
    fn test_self_inline_is_rejected() {
        let err = RecordDescriptor::build(RecordShape {
            name: "Loop",
            fields: loop_fields,
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidTag { .. }));
    }
}
