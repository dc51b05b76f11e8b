//! Schema describers
//!
//! A describer turns one schema version's type definitions into the flat,
//! ordered property list the index works with.

use serde::{Deserialize, Serialize};

use crate::property::Property;

/// Source of the ordered `(owning_type, field_name, field_type)` triples of
/// one schema version
pub trait SchemaDescriber {
    /// Properties of every type, flattened in declaration order
    fn describe(&self) -> Vec<Property>;
}

/// A field declared on a record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// A record type and its fields, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn field(mut self, name: impl Into<String>, field_type: impl Into<String>) -> Self {
        self.fields.push(FieldDefinition {
            name: name.into(),
            field_type: field_type.into(),
        });
        self
    }
}

impl SchemaDescriber for TypeDefinition {
    fn describe(&self) -> Vec<Property> {
        self.fields
            .iter()
            .map(|field| Property::new(&self.name, &field.name, &field.field_type))
            .collect()
    }
}

impl SchemaDescriber for [TypeDefinition] {
    fn describe(&self) -> Vec<Property> {
        self.iter().flat_map(|definition| definition.describe()).collect()
    }
}

impl SchemaDescriber for Vec<TypeDefinition> {
    fn describe(&self) -> Vec<Property> {
        self.as_slice().describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattens_in_declared_order() {
        let types = vec![
            TypeDefinition::new("Root").field("person", "Person"),
            TypeDefinition::new("Person")
                .field("name", "str")
                .field("age", "int"),
        ];

        let properties = types.describe();
        assert_eq!(
            properties,
            vec![
                Property::new("Root", "person", "Person"),
                Property::new("Person", "name", "str"),
                Property::new("Person", "age", "int"),
            ]
        );
        assert!(properties.iter().all(|p| p.identity.is_none()));
    }

    #[test]
    fn test_deserializes_type_definitions() {
        let types: Vec<TypeDefinition> = serde_json::from_str(
            r#"[{"name": "Salary", "fields": [{"name": "amount", "type": "int"}]}, {"name": "Empty"}]"#,
        )
        .unwrap();

        assert_eq!(types[0], TypeDefinition::new("Salary").field("amount", "int"));
        assert!(types[1].fields.is_empty());
        assert_eq!(types.describe().len(), 1);
    }
}
