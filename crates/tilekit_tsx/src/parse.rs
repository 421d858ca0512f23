//! Conversion from the `.tsx` element tree to `tilekit_core` types

use tilekit_core::{
    CollisionObject, CollisionShape, GridOrientation, Properties, PropertyValue, TileDef, Tileset,
    TilesetImage, WangColor, WangId, WangSet, WangSetType,
};
use tracing::debug;

use crate::error::TsxError;
use crate::xml::Element;

pub(crate) fn tileset_from_element(root: &Element) -> Result<Tileset, TsxError> {
    if root.name != "tileset" {
        return Err(TsxError::UnexpectedRoot(root.name.clone()));
    }

    let name = root.attr("name").unwrap_or_default().to_string();
    let tile_width: u32 = root.required_attr("tilewidth")?;
    let tile_height: u32 = root.required_attr("tileheight")?;
    let tile_count: u32 = root.parse_attr("tilecount")?.unwrap_or(0);
    let columns: u32 = root.parse_attr("columns")?.unwrap_or(0);

    let mut tileset = Tileset::new(name, tile_width, tile_height, tile_count, columns);
    tileset.spacing = root.parse_attr("spacing")?.unwrap_or(0);
    tileset.margin = root.parse_attr("margin")?.unwrap_or(0);

    for child in &root.children {
        match child.name.as_str() {
            "image" => tileset.image = Some(parse_image(child)?),
            "grid" => tileset.grid = parse_grid(child)?,
            "properties" => tileset.properties = parse_properties(child)?,
            "tile" => {
                let tile = parse_tile(child)?;
                let id = tile.id;
                if tileset.insert_tile(tile).is_some() {
                    return Err(TsxError::DuplicateTile(id));
                }
            }
            "wangsets" => {
                for ws in child.children_named("wangset") {
                    tileset.wang_sets.push(parse_wang_set(ws)?);
                }
            }
            other => debug!("skipping <{}> in tileset '{}'", other, tileset.name),
        }
    }

    Ok(tileset)
}

fn parse_image(elem: &Element) -> Result<TilesetImage, TsxError> {
    let source: String = elem.required_attr("source")?;
    Ok(TilesetImage {
        source,
        width: elem.parse_attr("width")?.unwrap_or(0),
        height: elem.parse_attr("height")?.unwrap_or(0),
    })
}

fn parse_grid(elem: &Element) -> Result<GridOrientation, TsxError> {
    match elem.attr("orientation").unwrap_or("orthogonal") {
        "orthogonal" => Ok(GridOrientation::Orthogonal),
        "isometric" => Ok(GridOrientation::Isometric),
        other => Err(elem.invalid("orientation", other, "expected orthogonal or isometric")),
    }
}

/// Tiled writes the class as `class` since 1.9 and as `type` before
fn class_attr(elem: &Element) -> Option<String> {
    elem.attr("class")
        .or_else(|| elem.attr("type"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `-1` marks "no tile" on wang sets and colors
fn optional_tile(elem: &Element) -> Result<Option<u32>, TsxError> {
    let raw: Option<i64> = elem.parse_attr("tile")?;
    match raw {
        None | Some(-1) => Ok(None),
        Some(id) => u32::try_from(id)
            .map(Some)
            .map_err(|_| elem.invalid("tile", &id.to_string(), "expected a tile id or -1")),
    }
}

fn parse_tile(elem: &Element) -> Result<TileDef, TsxError> {
    let mut tile = TileDef::new(elem.required_attr("id")?);
    tile.class = class_attr(elem);
    tile.probability = elem.parse_attr("probability")?;

    for child in &elem.children {
        match child.name.as_str() {
            "properties" => tile.properties = parse_properties(child)?,
            "image" => tile.image = Some(parse_image(child)?),
            "objectgroup" => {
                for obj in child.children_named("object") {
                    tile.collision.push(parse_object(obj)?);
                }
            }
            other => debug!("skipping <{}> in tile {}", other, tile.id),
        }
    }

    Ok(tile)
}

fn parse_properties(elem: &Element) -> Result<Properties, TsxError> {
    let mut properties = Properties::new();

    for prop in elem.children_named("property") {
        let name: String = prop.required_attr("name")?;
        let type_name = prop.attr("type");

        let value = if type_name == Some("class") {
            let members = match prop.child("properties") {
                Some(nested) => parse_properties(nested)?,
                None => Properties::new(),
            };
            PropertyValue::Class {
                property_type: prop.attr("propertytype").map(str::to_string),
                members,
            }
        } else {
            // Multi-line strings are stored as element text instead of `value`
            let raw = prop.attr("value").unwrap_or(prop.text.as_str());
            PropertyValue::parse(type_name, raw).map_err(|e| prop.invalid("value", raw, e.to_string()))?
        };

        properties.insert(name, value);
    }

    Ok(properties)
}

fn parse_points(elem: &Element) -> Result<Vec<[f32; 2]>, TsxError> {
    let raw = elem.attr("points").unwrap_or_default();
    raw.split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| elem.invalid("points", raw, format!("'{}' is not an x,y pair", pair)))?;
            let x: f32 = x
                .parse()
                .map_err(|_| elem.invalid("points", raw, format!("'{}' is not a number", x)))?;
            let y: f32 = y
                .parse()
                .map_err(|_| elem.invalid("points", raw, format!("'{}' is not a number", y)))?;
            Ok([x, y])
        })
        .collect()
}

fn parse_object(elem: &Element) -> Result<CollisionObject, TsxError> {
    let width: f32 = elem.parse_attr("width")?.unwrap_or(0.0);
    let height: f32 = elem.parse_attr("height")?.unwrap_or(0.0);

    let shape = if elem.child("ellipse").is_some() {
        CollisionShape::Ellipse { width, height }
    } else if elem.child("point").is_some() {
        CollisionShape::Point
    } else if let Some(polygon) = elem.child("polygon") {
        CollisionShape::Polygon {
            points: parse_points(polygon)?,
        }
    } else if let Some(polyline) = elem.child("polyline") {
        CollisionShape::Polyline {
            points: parse_points(polyline)?,
        }
    } else {
        CollisionShape::Rectangle { width, height }
    };

    Ok(CollisionObject {
        id: elem.parse_attr("id")?.unwrap_or(0),
        name: elem
            .attr("name")
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        class: class_attr(elem),
        x: elem.parse_attr("x")?.unwrap_or(0.0),
        y: elem.parse_attr("y")?.unwrap_or(0.0),
        shape,
    })
}

fn parse_wang_set(elem: &Element) -> Result<WangSet, TsxError> {
    let name = elem.attr("name").unwrap_or_default().to_string();
    let set_type: WangSetType = match elem.attr("type") {
        Some(raw) => raw.parse().map_err(|e: String| elem.invalid("type", raw, e))?,
        None => WangSetType::default(),
    };

    let mut set = WangSet::new(name, set_type);
    set.tile = optional_tile(elem)?;

    for child in &elem.children {
        match child.name.as_str() {
            "wangcolor" => {
                set.add_color(WangColor {
                    name: child.attr("name").unwrap_or_default().to_string(),
                    color: child.attr("color").unwrap_or_default().to_string(),
                    tile: optional_tile(child)?,
                    probability: child.parse_attr("probability")?.unwrap_or(1.0),
                });
            }
            "wangtile" => {
                let tile_id: u32 = child.required_attr("tileid")?;
                let wang_id: WangId = child.required_attr("wangid")?;
                if set.wang_tiles.insert(tile_id, wang_id).is_some() {
                    return Err(TsxError::DuplicateWangTile {
                        wangset: set.name.clone(),
                        tile_id,
                    });
                }
            }
            "properties" => set.properties = parse_properties(child)?,
            other => debug!("skipping <{}> in wang set '{}'", other, set.name),
        }
    }

    Ok(set)
}
