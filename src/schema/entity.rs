use std::sync::Arc;

use super::constraints::{ForeignKey, Index, IndexColumn, UniqueConstraint};
use super::naming::NamingStrategy;
use super::table::TableName;
use crate::error::{SqlGenError, SqlGenResult};
use crate::types::{DomainType, SizeHint, TypeRegistry, ValueType};

/// Resolved metadata for one entity field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Source-level field name.
    pub name: String,
    /// Column name after the naming-strategy transform.
    pub column_name: String,
    /// Codec for this column.
    pub value_type: ValueType,
    pub nullable: bool,
    pub key: bool,
    /// Set when this field holds the key of another entity
    /// (single-key foreign reference).
    pub reference: Option<Arc<EntityDescriptor>>,
}

/// Resolved metadata for an entity type: table name, ordered fields,
/// designated key fields and declared constraints. Built once, shared
/// behind `Arc`, immutable thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDescriptor {
    pub table: TableName,
    /// Fields in declaration order. Column order in emitted SQL follows
    /// this order, never re-sorted.
    pub fields: Vec<Arc<FieldDescriptor>>,
    pub primary_key_name: Option<String>,
    pub unique_constraints: Vec<UniqueConstraint>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<Index>,
}

impl EntityDescriptor {
    /// Start building a descriptor for the given table name.
    pub fn builder(table: impl Into<String>) -> EntityBuilder {
        EntityBuilder::new(table)
    }

    /// Fields designated as the primary key, in declaration order.
    pub fn key_fields(&self) -> Vec<Arc<FieldDescriptor>> {
        self.fields.iter().filter(|f| f.key).cloned().collect()
    }

    /// Fields not part of the primary key, in declaration order.
    pub fn non_key_fields(&self) -> Vec<Arc<FieldDescriptor>> {
        self.fields.iter().filter(|f| !f.key).cloned().collect()
    }

    /// Look up a field by its source name.
    pub fn field(&self, name: &str) -> Option<&Arc<FieldDescriptor>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field by its column name.
    pub fn field_by_column(&self, column: &str) -> Option<&Arc<FieldDescriptor>> {
        self.fields.iter().find(|f| f.column_name == column)
    }
}

#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    column: Option<String>,
    domain: DomainType,
    hint: Option<SizeHint>,
    nullable: bool,
    key: bool,
    reference: Option<Arc<EntityDescriptor>>,
}

/// Builder for [`EntityDescriptor`]. Codec resolution happens in
/// [`EntityBuilder::build`], so unmappable fields fail the whole build.
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    table: TableName,
    naming: NamingStrategy,
    registry: TypeRegistry,
    fields: Vec<FieldSpec>,
    primary_key_name: Option<String>,
    unique_constraints: Vec<UniqueConstraint>,
    foreign_keys: Vec<ForeignKey>,
    indexes: Vec<Index>,
}

impl EntityBuilder {
    fn new(table: impl Into<String>) -> Self {
        Self {
            table: TableName::new(table),
            naming: NamingStrategy::default(),
            registry: TypeRegistry::new(),
            fields: Vec::new(),
            primary_key_name: None,
            unique_constraints: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.table.schema = Some(schema.into());
        self
    }

    pub fn naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    fn push(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Add a key field (NOT NULL, part of the primary key).
    pub fn key(self, name: impl Into<String>, domain: DomainType) -> Self {
        let name = name.into();
        self.push(FieldSpec {
            name,
            column: None,
            domain,
            hint: None,
            nullable: false,
            key: true,
            reference: None,
        })
    }

    /// Add a non-null column.
    pub fn column(self, name: impl Into<String>, domain: DomainType) -> Self {
        let name = name.into();
        self.push(FieldSpec {
            name,
            column: None,
            domain,
            hint: None,
            nullable: false,
            key: false,
            reference: None,
        })
    }

    /// Add a nullable column.
    pub fn nullable(self, name: impl Into<String>, domain: DomainType) -> Self {
        let name = name.into();
        self.push(FieldSpec {
            name,
            column: None,
            domain,
            hint: None,
            nullable: true,
            key: false,
            reference: None,
        })
    }

    /// Add a non-null column with an explicit size hint.
    pub fn sized(self, name: impl Into<String>, domain: DomainType, hint: SizeHint) -> Self {
        let name = name.into();
        self.push(FieldSpec {
            name,
            column: None,
            domain,
            hint: Some(hint),
            nullable: false,
            key: false,
            reference: None,
        })
    }

    /// Override the column name of the most recently added field.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.column = Some(column.into());
        }
        self
    }

    /// Add a foreign-reference field holding `target`'s single key value.
    /// The column is typed like the referenced key and named
    /// `<field>_<referenced key column>`.
    pub fn reference(self, name: impl Into<String>, target: &Arc<EntityDescriptor>) -> Self {
        self.reference_spec(name.into(), target, false)
    }

    /// Like [`Self::reference`], but the foreign-key column allows NULL.
    pub fn nullable_reference(
        self,
        name: impl Into<String>,
        target: &Arc<EntityDescriptor>,
    ) -> Self {
        self.reference_spec(name.into(), target, true)
    }

    fn reference_spec(
        self,
        name: String,
        target: &Arc<EntityDescriptor>,
        nullable: bool,
    ) -> Self {
        self.push(FieldSpec {
            name,
            // Domain/column resolved against the target key in build().
            column: None,
            domain: DomainType::Other(format!("ref:{}", target.table.name)),
            hint: None,
            nullable,
            key: false,
            reference: Some(Arc::clone(target)),
        })
    }

    pub fn primary_key_name(mut self, name: impl Into<String>) -> Self {
        self.primary_key_name = Some(name.into());
        self
    }

    pub fn unique(mut self, columns: &[&str]) -> Self {
        self.unique_constraints.push(UniqueConstraint {
            name: None,
            columns: columns.iter().map(|c| IndexColumn::asc(*c)).collect(),
        });
        self
    }

    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Resolve all field codecs and freeze the descriptor.
    pub fn build(self) -> SqlGenResult<Arc<EntityDescriptor>> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for spec in self.fields {
            let field = match spec.reference {
                Some(target) => {
                    let keys = target.key_fields();
                    if keys.len() != 1 {
                        return Err(SqlGenError::KeyCardinality {
                            entity: target.table.name.clone(),
                            count: keys.len(),
                        });
                    }
                    let key = &keys[0];
                    let column = spec.column.unwrap_or_else(|| {
                        format!("{}_{}", self.naming.apply(&spec.name), key.column_name)
                    });
                    FieldDescriptor {
                        name: spec.name,
                        column_name: column,
                        value_type: key.value_type.clone(),
                        nullable: spec.nullable,
                        key: spec.key,
                        reference: Some(target),
                    }
                }
                None => {
                    let value_type =
                        self.registry
                            .resolve(&spec.name, &spec.domain, spec.hint.as_ref())?;
                    let column = spec
                        .column
                        .unwrap_or_else(|| self.naming.apply(&spec.name));
                    FieldDescriptor {
                        name: spec.name,
                        column_name: column,
                        value_type,
                        nullable: spec.nullable,
                        key: spec.key,
                        reference: None,
                    }
                }
            };
            fields.push(Arc::new(field));
        }
        Ok(Arc::new(EntityDescriptor {
            table: self.table,
            fields,
            primary_key_name: self.primary_key_name,
            unique_constraints: self.unique_constraints,
            foreign_keys: self.foreign_keys,
            indexes: self.indexes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn person() -> Arc<EntityDescriptor> {
        EntityDescriptor::builder("Person")
            .naming(NamingStrategy::AsIs)
            .key("id", DomainType::Uuid)
            .column("age", DomainType::Int)
            .nullable("name", DomainType::String)
            .build()
            .unwrap()
    }

    #[test]
    fn test_field_order_and_keys() {
        let person = person();
        let names: Vec<&str> = person.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "age", "name"]);
        assert_eq!(person.key_fields().len(), 1);
        assert_eq!(person.key_fields()[0].name, "id");
        assert_eq!(person.non_key_fields().len(), 2);
    }

    #[test]
    fn test_naming_strategy_applies_to_columns() {
        let entity = EntityDescriptor::builder("Person")
            .key("personId", DomainType::Uuid)
            .column("firstName", DomainType::String)
            .build()
            .unwrap();
        assert_eq!(entity.fields[0].column_name, "person_id");
        assert_eq!(entity.fields[1].column_name, "first_name");
        assert!(entity.field_by_column("first_name").is_some());
    }

    #[test]
    fn test_reference_field_borrows_key_codec() {
        let department = EntityDescriptor::builder("Department")
            .key("id", DomainType::BigInt)
            .column("name", DomainType::String)
            .build()
            .unwrap();
        let employee = EntityDescriptor::builder("Employee")
            .key("id", DomainType::Uuid)
            .reference("department", &department)
            .build()
            .unwrap();
        let dept_field = employee.field("department").unwrap();
        assert_eq!(dept_field.column_name, "department_id");
        assert_eq!(dept_field.value_type, ValueType::BigInt);
        assert!(dept_field.reference.is_some());
        assert!(!dept_field.nullable);
    }

    #[test]
    fn test_nullable_reference_allows_null_column() {
        let department = EntityDescriptor::builder("Department")
            .key("id", DomainType::BigInt)
            .build()
            .unwrap();
        let employee = EntityDescriptor::builder("Employee")
            .key("id", DomainType::Uuid)
            .nullable_reference("department", &department)
            .build()
            .unwrap();
        let dept_field = employee.field("department").unwrap();
        assert!(dept_field.nullable);
        assert_eq!(dept_field.column_name, "department_id");
    }

    #[test]
    fn test_reference_to_composite_key_fails() {
        let pair = EntityDescriptor::builder("Pair")
            .key("left", DomainType::Int)
            .key("right", DomainType::Int)
            .build()
            .unwrap();
        let err = EntityDescriptor::builder("Holder")
            .key("id", DomainType::Int)
            .reference("pair", &pair)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SqlGenError::KeyCardinality { count: 2, .. }
        ));
    }

    #[test]
    fn test_reference_to_keyless_entity_fails() {
        let log = EntityDescriptor::builder("Log")
            .column("message", DomainType::String)
            .build()
            .unwrap();
        let err = EntityDescriptor::builder("Holder")
            .key("id", DomainType::Int)
            .reference("log", &log)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SqlGenError::KeyCardinality { count: 0, .. }
        ));
    }

    #[test]
    fn test_unresolvable_field_fails_build() {
        let err = EntityDescriptor::builder("Widget")
            .key("id", DomainType::Int)
            .column("payload", DomainType::Other("Widget".into()))
            .build()
            .unwrap_err();
        assert!(matches!(err, SqlGenError::UnresolvableType { .. }));
    }
}
