//! Collision geometry attached to tiles
//!
//! Tiled stores per-tile collision as an `<objectgroup>` of objects in tile-local
//! pixel coordinates. This module provides:
//! - `CollisionShape` - Shape of a single object (Rectangle, Ellipse, Point, Polygon, Polyline)
//! - `CollisionObject` - A positioned shape with its id, name and class
//! - `Hitbox` - Axis-aligned rectangle used by game code for collisions

use serde::{Deserialize, Serialize};

/// Collision shape types found in tile object groups
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CollisionShape {
    /// Rectangle extending right/down from the object position
    Rectangle { width: f32, height: f32 },
    /// Ellipse inscribed in the given box
    Ellipse { width: f32, height: f32 },
    /// Single point
    Point,
    /// Closed polygon, points relative to the object position
    Polygon { points: Vec<[f32; 2]> },
    /// Open polyline, points relative to the object position
    Polyline { points: Vec<[f32; 2]> },
}

impl CollisionShape {
    /// Get the display name of this shape type
    pub fn name(&self) -> &'static str {
        match self {
            CollisionShape::Rectangle { .. } => "Rectangle",
            CollisionShape::Ellipse { .. } => "Ellipse",
            CollisionShape::Point => "Point",
            CollisionShape::Polygon { .. } => "Polygon",
            CollisionShape::Polyline { .. } => "Polyline",
        }
    }

    /// Local bounding box `(min_x, min_y, max_x, max_y)` relative to the object position
    pub fn local_bounds(&self) -> (f32, f32, f32, f32) {
        match self {
            CollisionShape::Rectangle { width, height }
            | CollisionShape::Ellipse { width, height } => (0.0, 0.0, *width, *height),
            CollisionShape::Point => (0.0, 0.0, 0.0, 0.0),
            CollisionShape::Polygon { points } | CollisionShape::Polyline { points } => {
                if points.is_empty() {
                    return (0.0, 0.0, 0.0, 0.0);
                }
                points.iter().fold(
                    (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
                    |(min_x, min_y, max_x, max_y), [x, y]| {
                        (min_x.min(*x), min_y.min(*y), max_x.max(*x), max_y.max(*y))
                    },
                )
            }
        }
    }
}

/// A collision object inside a tile's object group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollisionObject {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tiled `type`/`class` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub x: f32,
    pub y: f32,
    pub shape: CollisionShape,
}

impl CollisionObject {
    /// Create a rectangle object
    pub fn rectangle(id: u32, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            name: None,
            class: None,
            x,
            y,
            shape: CollisionShape::Rectangle { width, height },
        }
    }

    /// Tile-local bounding box of this object
    pub fn bounds(&self) -> Hitbox {
        let (min_x, min_y, max_x, max_y) = self.shape.local_bounds();
        Hitbox::new(
            self.x + min_x,
            self.y + min_y,
            max_x - min_x,
            max_y - min_y,
        )
    }

    /// The rectangle hitbox, if this object is a rectangle
    pub fn as_rectangle(&self) -> Option<Hitbox> {
        match self.shape {
            CollisionShape::Rectangle { width, height } => {
                Some(Hitbox::new(self.x, self.y, width, height))
            }
            _ => None,
        }
    }
}

/// Axis-aligned rectangle in pixels (top-left origin)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Multiply position and size by a uniform factor
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// Check if `other` lies completely within this rectangle (edges inclusive)
    pub fn contains(&self, other: &Hitbox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}
