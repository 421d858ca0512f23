//! Property schema definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Expected custom properties per tile class
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertySchema {
    /// Class name (matched case-insensitively) to its properties
    #[serde(default)]
    pub classes: BTreeMap<String, ClassSchema>,
}

/// Properties of one tile class
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassSchema {
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
}

/// A single expected property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    #[serde(rename = "type")]
    pub prop_type: PropType,
    #[serde(default)]
    pub required: bool,
    /// Allowed values for `enum` properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Property types, named after Tiled's property types plus `enum`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    String,
    Int,
    Float,
    Bool,
    Color,
    File,
    Object,
    Class,
    /// String restricted to `values`
    Enum,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, prop_type: PropType) -> Self {
        Self {
            name: name.into(),
            prop_type,
            required: false,
            values: Vec::new(),
            min: None,
            max: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }
}

impl PropertySchema {
    /// Schema for the object classes of the shipped tilesets
    pub fn builtin() -> Self {
        let tree = ClassSchema {
            properties: vec![
                PropertyDef::new("breakable", PropType::Bool).required(),
                PropertyDef::new("fruit_type", PropType::Enum)
                    .required()
                    .with_values(["no_fruit", "apple", "orange", "peach", "pear"]),
                PropertyDef::new("size", PropType::Enum)
                    .required()
                    .with_values(["small", "medium", "large"]),
            ],
        };

        let mut classes = BTreeMap::new();
        classes.insert("tree".to_string(), tree);
        classes.insert("bush".to_string(), ClassSchema::default());
        classes.insert("decor".to_string(), ClassSchema::default());
        Self { classes }
    }

    /// Get a class by name, ignoring case
    pub fn get_class(&self, name: &str) -> Option<&ClassSchema> {
        self.classes
            .iter()
            .find(|(class, _)| class.eq_ignore_ascii_case(name))
            .map(|(_, schema)| schema)
    }
}

impl ClassSchema {
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }
}
