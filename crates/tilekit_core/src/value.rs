//! Typed custom property values (Tiled `<property>` elements)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Custom properties keyed by name
pub type Properties = BTreeMap<String, PropertyValue>;

/// A single custom property value as declared in a Tiled document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// `#AARRGGBB` or `#RRGGBB`, kept as written
    Color(String),
    File(String),
    /// Reference to an object id (0 = none)
    Object(u32),
    /// Nested custom class value
    Class {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property_type: Option<String>,
        members: Properties,
    },
}

/// Error returned when a raw attribute cannot be decoded as its declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueParseError {
    pub type_name: String,
    pub raw: String,
}

impl fmt::Display for ValueParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid {} value", self.raw, self.type_name)
    }
}

impl std::error::Error for ValueParseError {}

impl PropertyValue {
    /// Decode a raw `value` attribute according to the property's `type` attribute.
    ///
    /// A missing type means `string`. Unknown types are kept as strings so newer
    /// documents still load.
    pub fn parse(type_name: Option<&str>, raw: &str) -> Result<Self, ValueParseError> {
        let err = || ValueParseError {
            type_name: type_name.unwrap_or("string").to_string(),
            raw: raw.to_string(),
        };

        match type_name.unwrap_or("string") {
            "string" => Ok(PropertyValue::String(raw.to_string())),
            "int" => raw.trim().parse().map(PropertyValue::Int).map_err(|_| err()),
            "float" => raw.trim().parse().map(PropertyValue::Float).map_err(|_| err()),
            "bool" => match raw.trim() {
                "true" | "1" => Ok(PropertyValue::Bool(true)),
                "false" | "0" => Ok(PropertyValue::Bool(false)),
                _ => Err(err()),
            },
            "color" => Ok(PropertyValue::Color(raw.to_string())),
            "file" => Ok(PropertyValue::File(raw.to_string())),
            "object" => {
                if raw.trim().is_empty() {
                    Ok(PropertyValue::Object(0))
                } else {
                    raw.trim().parse().map(PropertyValue::Object).map_err(|_| err())
                }
            }
            _ => Ok(PropertyValue::String(raw.to_string())),
        }
    }

    /// Name of the Tiled type this value was declared with
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "string",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Color(_) => "color",
            PropertyValue::File(_) => "file",
            PropertyValue::Object(_) => "object",
            PropertyValue::Class { .. } => "class",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) | PropertyValue::Color(s) | PropertyValue::File(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            PropertyValue::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get nested members of a class value
    pub fn as_class(&self) -> Option<&Properties> {
        match self {
            PropertyValue::Class { members, .. } => Some(members),
            _ => None,
        }
    }

    /// Convert to a plain JSON value (type information is dropped)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PropertyValue::String(s) | PropertyValue::Color(s) | PropertyValue::File(s) => {
                serde_json::Value::String(s.clone())
            }
            PropertyValue::Int(i) => serde_json::json!(*i),
            PropertyValue::Float(f) => serde_json::json!(*f),
            PropertyValue::Bool(b) => serde_json::Value::Bool(*b),
            PropertyValue::Object(id) => serde_json::json!(*id),
            PropertyValue::Class { members, .. } => serde_json::Value::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) | PropertyValue::Color(s) | PropertyValue::File(s) => {
                write!(f, "{}", s)
            }
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Object(id) => write!(f, "object#{}", id),
            PropertyValue::Class { .. } => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Int(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_string() {
        assert_eq!(
            PropertyValue::parse(None, "no_fruit"),
            Ok(PropertyValue::String("no_fruit".to_string()))
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(
            PropertyValue::parse(Some("bool"), "true"),
            Ok(PropertyValue::Bool(true))
        );
        assert_eq!(
            PropertyValue::parse(Some("bool"), "false"),
            Ok(PropertyValue::Bool(false))
        );
        assert!(PropertyValue::parse(Some("bool"), "maybe").is_err());
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(PropertyValue::parse(Some("int"), " 42"), Ok(PropertyValue::Int(42)));
        assert_eq!(
            PropertyValue::parse(Some("float"), "0.25"),
            Ok(PropertyValue::Float(0.25))
        );
        let err = PropertyValue::parse(Some("int"), "1.5").unwrap_err();
        assert_eq!(err.type_name, "int");
        assert_eq!(err.to_string(), "'1.5' is not a valid int value");
    }

    #[test]
    fn test_parse_object_reference() {
        assert_eq!(PropertyValue::parse(Some("object"), ""), Ok(PropertyValue::Object(0)));
        assert_eq!(PropertyValue::parse(Some("object"), "7"), Ok(PropertyValue::Object(7)));
    }

    #[test]
    fn test_unknown_type_is_kept_as_string() {
        let value = PropertyValue::parse(Some("vector3"), "1,2,3").unwrap();
        assert_eq!(value.as_str(), Some("1,2,3"));
        assert_eq!(value.type_name(), "string");
    }

    #[test]
    fn test_class_to_json() {
        let mut members = Properties::new();
        members.insert("hp".to_string(), PropertyValue::Int(3));
        let value = PropertyValue::Class {
            property_type: Some("Stats".to_string()),
            members,
        };
        assert_eq!(value.to_json(), serde_json::json!({ "hp": 3 }));
        assert_eq!(value.to_string(), r#"{"hp":3}"#);
    }
}
