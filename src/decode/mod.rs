//! Entity decoder: materializes typed records from a result-row cursor.
//!
//! Decoding is split into a constructor pass (every planned field) and an
//! optional property pass (additional fields assigned after construction).
//! Decoders are built once per `(entity, alias)` shape and memoized in a
//! concurrent cache with at-most-one build per key.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::{SqlGenError, SqlGenResult};
use crate::schema::{EntityDescriptor, FieldDescriptor};
use crate::types::{DomainValue, SqlValue};

/// Read access to the current result row. `SqlValue::Null` is the
/// driver's null indicator and always wins over the raw physical value.
pub trait Row {
    fn read(&self, column: &str) -> SqlGenResult<SqlValue>;
}

/// A decoded entity value: field name / value pairs in descriptor order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub entity: String,
    pub values: Vec<(String, DomainValue)>,
}

impl EntityRecord {
    pub fn get(&self, field: &str) -> Option<&DomainValue> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    fn set(&mut self, field: &str, value: DomainValue) {
        match self.values.iter_mut().find(|(name, _)| name == field) {
            Some(slot) => slot.1 = value,
            None => self.values.push((field.to_string(), value)),
        }
    }
}

#[derive(Debug)]
enum FieldPlan {
    /// Read one raw column and decode it through the field codec.
    Column {
        field: Arc<FieldDescriptor>,
        column: String,
    },
    /// Decode the referenced entity's key through a nested decoder
    /// sharing this row. `column` is the outer foreign-key column,
    /// checked for NULL before the nested decoder runs.
    Nested {
        field: Arc<FieldDescriptor>,
        column: String,
        key_field: String,
        decoder: Box<EntityDecoder>,
    },
}

impl FieldPlan {
    fn field(&self) -> &Arc<FieldDescriptor> {
        match self {
            Self::Column { field, .. } | Self::Nested { field, .. } => field,
        }
    }
}

/// A decoder graph for one `(entity, alias)` shape. Immutable once built.
#[derive(Debug)]
pub struct EntityDecoder {
    entity: Arc<EntityDescriptor>,
    plans: Vec<FieldPlan>,
}

impl EntityDecoder {
    /// Build the decoder graph. Foreign-reference fields require the
    /// referenced entity to have exactly one key field; anything else
    /// fails here, never at row-decode time.
    pub fn build(entity: &Arc<EntityDescriptor>, alias: Option<&str>) -> SqlGenResult<Self> {
        let mut plans = Vec::with_capacity(entity.fields.len());
        for field in &entity.fields {
            let column = match alias {
                Some(alias) => format!("{}_{}", alias, field.column_name),
                None => field.column_name.clone(),
            };
            let plan = match &field.reference {
                Some(target) => {
                    let keys = target.key_fields();
                    if keys.len() != 1 {
                        return Err(SqlGenError::KeyCardinality {
                            entity: target.table.name.clone(),
                            count: keys.len(),
                        });
                    }
                    let key = &keys[0];
                    // The nested alias is the outer field's column name
                    // without the key suffix, so the nested key lands on
                    // the outer foreign-key column.
                    let suffix = format!("_{}", key.column_name);
                    let nested_alias = column
                        .strip_suffix(&suffix)
                        .unwrap_or(column.as_str())
                        .to_string();
                    FieldPlan::Nested {
                        field: Arc::clone(field),
                        key_field: key.name.clone(),
                        decoder: Box::new(Self::build(target, Some(&nested_alias))?),
                        column,
                    }
                }
                None => FieldPlan::Column {
                    field: Arc::clone(field),
                    column,
                },
            };
            plans.push(plan);
        }
        Ok(Self {
            entity: Arc::clone(entity),
            plans,
        })
    }

    /// By-constructor decoding over every planned field.
    pub fn decode(&self, row: &dyn Row) -> SqlGenResult<EntityRecord> {
        self.decode_with(row, &[])
    }

    /// By-constructor decoding with caller-supplied constants taking the
    /// place of row reads for the named fields.
    pub fn decode_with(
        &self,
        row: &dyn Row,
        overrides: &[(&str, DomainValue)],
    ) -> SqlGenResult<EntityRecord> {
        let mut record = EntityRecord {
            entity: self.entity.table.name.clone(),
            values: Vec::with_capacity(self.plans.len()),
        };
        for plan in &self.plans {
            let name = plan.field().name.clone();
            let value = match overrides.iter().find(|(n, _)| *n == name) {
                Some((_, constant)) => constant.clone(),
                None => self.read_plan(plan, row)?,
            };
            record.values.push((name, value));
        }
        Ok(record)
    }

    /// By-constructor decoding restricted to the named fields.
    pub fn decode_partial(&self, row: &dyn Row, fields: &[&str]) -> SqlGenResult<EntityRecord> {
        let mut record = EntityRecord {
            entity: self.entity.table.name.clone(),
            values: Vec::with_capacity(fields.len()),
        };
        for plan in &self.plans {
            let name = &plan.field().name;
            if fields.contains(&name.as_str()) {
                record.values.push((name.clone(), self.read_plan(plan, row)?));
            }
        }
        Ok(record)
    }

    /// Property pass: read and assign each named field independently,
    /// enriching an already-constructed record.
    pub fn apply_properties(
        &self,
        row: &dyn Row,
        record: &mut EntityRecord,
        fields: &[&str],
    ) -> SqlGenResult<()> {
        for plan in &self.plans {
            let name = &plan.field().name;
            if fields.contains(&name.as_str()) {
                record.set(name, self.read_plan(plan, row)?);
            }
        }
        Ok(())
    }

    fn read_plan(&self, plan: &FieldPlan, row: &dyn Row) -> SqlGenResult<DomainValue> {
        match plan {
            FieldPlan::Column { field, column } => {
                let raw = row.read(column)?;
                if raw.is_null() {
                    if !field.nullable {
                        return Err(SqlGenError::decode(
                            &self.entity.table.name,
                            column,
                            "NULL in non-nullable column",
                        ));
                    }
                    return Ok(DomainValue::Null);
                }
                field.value_type.decode(raw).map_err(|e| {
                    SqlGenError::decode(&self.entity.table.name, column, e.to_string())
                })
            }
            FieldPlan::Nested {
                field,
                column,
                key_field,
                decoder,
            } => {
                // The null indicator on the foreign-key column wins; the
                // nested decoder only runs for a present key.
                if row.read(column)?.is_null() {
                    if !field.nullable {
                        return Err(SqlGenError::decode(
                            &self.entity.table.name,
                            column,
                            "NULL in non-nullable column",
                        ));
                    }
                    return Ok(DomainValue::Null);
                }
                let nested = decoder.decode_partial(row, &[key_field.as_str()])?;
                Ok(DomainValue::Record(Box::new(nested)))
            }
        }
    }
}

type DecoderKey = (String, Option<String>);

/// Owns the decoder cache. Lookups are concurrent; a missing key is
/// built at most once (the shard entry is held for the build), and
/// different keys never block each other's reads.
#[derive(Debug, Default)]
pub struct DecoderFactory {
    cache: DashMap<DecoderKey, Arc<EntityDecoder>>,
}

impl DecoderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch or build the decoder for `(entity, alias)`.
    pub fn decoder_for(
        &self,
        entity: &Arc<EntityDescriptor>,
        alias: Option<&str>,
    ) -> SqlGenResult<Arc<EntityDecoder>> {
        let key = (entity.table.to_string(), alias.map(String::from));
        if let Some(found) = self.cache.get(&key) {
            return Ok(Arc::clone(&found));
        }
        match self.cache.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                debug!(entity = %entity.table, alias, "building decoder");
                let decoder = Arc::new(EntityDecoder::build(entity, alias)?);
                entry.insert(Arc::clone(&decoder));
                Ok(decoder)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NamingStrategy;
    use crate::types::DomainType;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use uuid::Uuid;

    struct MapRow(HashMap<String, SqlValue>);

    impl MapRow {
        fn new(values: &[(&str, SqlValue)]) -> Self {
            Self(
                values
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            )
        }
    }

    impl Row for MapRow {
        fn read(&self, column: &str) -> SqlGenResult<SqlValue> {
            self.0.get(column).cloned().ok_or_else(|| {
                SqlGenError::decode("row", column, "no such column in result set")
            })
        }
    }

    fn person() -> Arc<EntityDescriptor> {
        EntityDescriptor::builder("person")
            .naming(NamingStrategy::AsIs)
            .key("id", DomainType::Uuid)
            .column("age", DomainType::Int)
            .nullable("name", DomainType::String)
            .build()
            .unwrap()
    }

    #[test]
    fn test_decode_by_constructor() {
        let person = person();
        let id = Uuid::new_v4();
        let row = MapRow::new(&[
            ("id", SqlValue::Uuid(id)),
            ("age", SqlValue::Int(41)),
            ("name", SqlValue::Text("ada".into())),
        ]);
        let decoder = EntityDecoder::build(&person, None).unwrap();
        let record = decoder.decode(&row).unwrap();
        assert_eq!(record.get("id"), Some(&DomainValue::Uuid(id)));
        assert_eq!(record.get("age"), Some(&DomainValue::Int(41)));
        assert_eq!(record.get("name"), Some(&DomainValue::String("ada".into())));
    }

    #[test]
    fn test_null_indicator_wins_for_nullable_field() {
        let person = person();
        let row = MapRow::new(&[
            ("id", SqlValue::Uuid(Uuid::nil())),
            ("age", SqlValue::Int(0)),
            ("name", SqlValue::Null),
        ]);
        let decoder = EntityDecoder::build(&person, None).unwrap();
        let record = decoder.decode(&row).unwrap();
        assert_eq!(record.get("name"), Some(&DomainValue::Null));
    }

    #[test]
    fn test_null_in_non_nullable_column_fails() {
        let person = person();
        let row = MapRow::new(&[
            ("id", SqlValue::Uuid(Uuid::nil())),
            ("age", SqlValue::Null),
            ("name", SqlValue::Null),
        ]);
        let decoder = EntityDecoder::build(&person, None).unwrap();
        let err = decoder.decode(&row).unwrap_err();
        assert!(matches!(err, SqlGenError::Decode { .. }));
    }

    #[test]
    fn test_override_replaces_row_read() {
        let person = person();
        // The row has no `id` column at all; the override supplies it.
        let row = MapRow::new(&[
            ("age", SqlValue::Int(7)),
            ("name", SqlValue::Null),
        ]);
        let generated = Uuid::new_v4();
        let decoder = EntityDecoder::build(&person, None).unwrap();
        let record = decoder
            .decode_with(&row, &[("id", DomainValue::Uuid(generated))])
            .unwrap();
        assert_eq!(record.get("id"), Some(&DomainValue::Uuid(generated)));
    }

    #[test]
    fn test_construct_then_enrich() {
        let person = person();
        let row = MapRow::new(&[
            ("id", SqlValue::Uuid(Uuid::nil())),
            ("age", SqlValue::Int(30)),
            ("name", SqlValue::Text("grace".into())),
        ]);
        let decoder = EntityDecoder::build(&person, None).unwrap();
        let mut record = decoder.decode_partial(&row, &["id", "age"]).unwrap();
        assert_eq!(record.get("name"), None);
        decoder.apply_properties(&row, &mut record, &["name"]).unwrap();
        assert_eq!(
            record.get("name"),
            Some(&DomainValue::String("grace".into()))
        );
    }

    #[test]
    fn test_alias_prefixes_column_lookup() {
        let person = person();
        let row = MapRow::new(&[
            ("p_id", SqlValue::Uuid(Uuid::nil())),
            ("p_age", SqlValue::Int(9)),
            ("p_name", SqlValue::Null),
        ]);
        let decoder = EntityDecoder::build(&person, Some("p")).unwrap();
        let record = decoder.decode(&row).unwrap();
        assert_eq!(record.get("age"), Some(&DomainValue::Int(9)));
    }

    #[test]
    fn test_foreign_reference_decodes_nested_key() {
        let department = EntityDescriptor::builder("department")
            .naming(NamingStrategy::AsIs)
            .key("id", DomainType::BigInt)
            .column("name", DomainType::String)
            .build()
            .unwrap();
        let employee = EntityDescriptor::builder("employee")
            .naming(NamingStrategy::AsIs)
            .key("id", DomainType::Uuid)
            .reference("department", &department)
            .build()
            .unwrap();

        let row = MapRow::new(&[
            ("id", SqlValue::Uuid(Uuid::nil())),
            ("department_id", SqlValue::BigInt(12)),
        ]);
        let decoder = EntityDecoder::build(&employee, None).unwrap();
        let record = decoder.decode(&row).unwrap();
        match record.get("department").unwrap() {
            DomainValue::Record(nested) => {
                assert_eq!(nested.entity, "department");
                assert_eq!(nested.get("id"), Some(&DomainValue::BigInt(12)));
            }
            other => panic!("expected nested record, got {:?}", other),
        }
    }

    #[test]
    fn test_null_foreign_key_on_nullable_reference_decodes_null() {
        let department = EntityDescriptor::builder("department")
            .naming(NamingStrategy::AsIs)
            .key("id", DomainType::BigInt)
            .build()
            .unwrap();
        let employee = EntityDescriptor::builder("employee")
            .naming(NamingStrategy::AsIs)
            .key("id", DomainType::Uuid)
            .nullable_reference("department", &department)
            .build()
            .unwrap();

        let row = MapRow::new(&[
            ("id", SqlValue::Uuid(Uuid::nil())),
            ("department_id", SqlValue::Null),
        ]);
        let decoder = EntityDecoder::build(&employee, None).unwrap();
        let record = decoder.decode(&row).unwrap();
        assert_eq!(record.get("department"), Some(&DomainValue::Null));
    }

    #[test]
    fn test_null_foreign_key_error_names_outer_entity() {
        let department = EntityDescriptor::builder("department")
            .naming(NamingStrategy::AsIs)
            .key("id", DomainType::BigInt)
            .build()
            .unwrap();
        let employee = EntityDescriptor::builder("employee")
            .naming(NamingStrategy::AsIs)
            .key("id", DomainType::Uuid)
            .reference("department", &department)
            .build()
            .unwrap();

        let row = MapRow::new(&[
            ("id", SqlValue::Uuid(Uuid::nil())),
            ("department_id", SqlValue::Null),
        ]);
        let decoder = EntityDecoder::build(&employee, None).unwrap();
        let err = decoder.decode(&row).unwrap_err();
        match err {
            SqlGenError::Decode { entity, column, .. } => {
                assert_eq!(entity, "employee");
                assert_eq!(column, "department_id");
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_factory_memoizes_per_shape() {
        let person = person();
        let factory = DecoderFactory::new();
        let a = factory.decoder_for(&person, None).unwrap();
        let b = factory.decoder_for(&person, None).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let aliased = factory.decoder_for(&person, Some("p")).unwrap();
        assert!(!Arc::ptr_eq(&a, &aliased));
        assert_eq!(factory.len(), 2);
    }
}
