//! Classification of object tiles by their custom properties

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::tileset::TileDef;

/// Size class of a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeSize {
    Small,
    Medium,
    Large,
}

impl FromStr for TreeSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(TreeSize::Small),
            "medium" => Ok(TreeSize::Medium),
            "large" => Ok(TreeSize::Large),
            other => Err(format!("unknown size '{}'", other)),
        }
    }
}

/// Marker value used for trees that bear no fruit
pub const NO_FRUIT: &str = "no_fruit";

/// What a placeable object tile represents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectKind {
    Tree {
        size: Option<TreeSize>,
        /// Fruit name, `None` for `no_fruit`
        fruit: Option<String>,
        breakable: bool,
    },
    Bush,
    Decor,
    /// Any other class name
    Other { class: String },
}

impl ObjectKind {
    /// Classify a tile from its class name and properties.
    ///
    /// Returns `None` for tiles without a class. Class names compare
    /// case-insensitively ("Bush" and "bush" are the same kind).
    pub fn from_tile(tile: &TileDef) -> Option<Self> {
        let class = tile.class_name()?;

        let kind = match class.to_ascii_lowercase().as_str() {
            "tree" => ObjectKind::Tree {
                size: tile
                    .property("size")
                    .and_then(|v| v.as_str())
                    .and_then(|s| s.parse().ok()),
                fruit: tile
                    .property("fruit_type")
                    .and_then(|v| v.as_str())
                    .filter(|s| *s != NO_FRUIT && !s.is_empty())
                    .map(str::to_string),
                breakable: tile
                    .property("breakable")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
            },
            "bush" => ObjectKind::Bush,
            "decor" => ObjectKind::Decor,
            _ => ObjectKind::Other {
                class: class.to_string(),
            },
        };
        Some(kind)
    }

    pub fn name(&self) -> &str {
        match self {
            ObjectKind::Tree { .. } => "tree",
            ObjectKind::Bush => "bush",
            ObjectKind::Decor => "decor",
            ObjectKind::Other { class } => class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fruit_tree() {
        let tile = TileDef::new(73)
            .with_property("breakable", true)
            .with_property("fruit_type", "apple")
            .with_property("size", "medium")
            .with_property("type", "tree");

        assert_eq!(
            ObjectKind::from_tile(&tile),
            Some(ObjectKind::Tree {
                size: Some(TreeSize::Medium),
                fruit: Some("apple".to_string()),
                breakable: true,
            })
        );
    }

    #[test]
    fn test_no_fruit_tree() {
        let tile = TileDef::new(71)
            .with_property("breakable", false)
            .with_property("fruit_type", NO_FRUIT)
            .with_property("size", "large")
            .with_property("type", "tree");

        let kind = ObjectKind::from_tile(&tile).unwrap();
        assert_eq!(
            kind,
            ObjectKind::Tree {
                size: Some(TreeSize::Large),
                fruit: None,
                breakable: false,
            }
        );
        assert_eq!(kind.name(), "tree");
    }

    #[test]
    fn test_bush_decor_and_other() {
        let mut bush = TileDef::new(1);
        bush.class = Some("Bush".to_string());
        assert_eq!(ObjectKind::from_tile(&bush), Some(ObjectKind::Bush));

        let decor = TileDef::new(62).with_property("type", "decor");
        assert_eq!(ObjectKind::from_tile(&decor), Some(ObjectKind::Decor));

        let well = TileDef::new(34).with_property("type", "well");
        assert_eq!(
            ObjectKind::from_tile(&well),
            Some(ObjectKind::Other {
                class: "well".to_string()
            })
        );

        assert_eq!(ObjectKind::from_tile(&TileDef::new(9)), None);
    }
}
