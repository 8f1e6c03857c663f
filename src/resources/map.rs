//! Declarative scene description ("map") loading.
//!
//! A map is a JSON document naming the scene and listing typed objects with
//! optional physics attachments:
//!
//! ```json
//! {
//!     "name": "Playground",
//!     "descr": "physics testing ground",
//!     "author": "someone",
//!     "mapFormatVer": { "major": 1, "minor": 0 },
//!     "objects": [
//!         {
//!             "name": "Crate",
//!             "modelName": "cube.obj",
//!             "textureName": "crate.png",
//!             "pos": { "x": 0.0, "y": 10.0, "z": 0.0 },
//!             "scale": { "x": 1.0, "y": 1.0, "z": 1.0 },
//!             "modelRot": { "x": 0.0, "y": 90.0, "z": 0.0 },
//!             "collShape": { "type": "box", "size": { "x": 0.5, "y": 0.5, "z": 0.5 } },
//!             "mass": 1.0
//!         }
//!     ]
//! }
//! ```
//!
//! Parsing walks the `serde_json` value tree by hand so every failure can
//! name the exact key path it happened at and dump the offending value.
//! Schema violations abort the whole load; no partial map is returned.

use std::path::Path;

use cgmath::Vector3;
use serde_json::Value;
use thiserror::Error;

use crate::data_structures::object::{CollisionShape, ObjectFlags, MASS_STATIC};

/// Default for the optional top-level `descr` field.
pub const DEFAULT_DESCRIPTION: &str = "N/A";
/// Default for the optional top-level `author` field.
pub const DEFAULT_AUTHOR: &str = "<unknown>";
/// Default for the optional per-object `name` field.
pub const DEFAULT_OBJECT_NAME: &str = "<Object>";

/// Everything that can go wrong while loading a map.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("syntax error at line {line}, column {column}: {message}\n  {context}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
        /// The offending source line, for one-line-of-context diagnostics.
        context: String,
    },
    #[error("missing required field `{path}`")]
    MissingField { path: String },
    #[error("expected {expected} at `{path}`, found: {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        /// Pretty-printed dump of the value that was found instead.
        found: String,
    },
    #[error("unknown collision shape type \"{type_name}\" at `{path}`")]
    UnknownShape { path: String, type_name: String },
    #[error("invalid value at `{path}`: {reason}")]
    InvalidValue { path: String, reason: String },
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed per-object entry, consumed once when the scene is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDescriptor {
    pub name: String,
    pub model_name: String,
    pub texture_name: String,
    pub flags: ObjectFlags,
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
    /// Model-local rotation offset in degrees around x/y/z.
    pub model_rotation_deg: Vector3<f32>,
    pub shape: Option<CollisionShape>,
    pub mass: f32,
}

/// A parsed and validated scene description.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub name: String,
    pub description: String,
    pub author: String,
    /// (major, minor) of the map format the document declares.
    pub format_version: (u32, u32),
    pub objects: Vec<ObjectDescriptor>,
}

impl Map {
    /// Read and parse a map file from disk.
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Parse a map from JSON source.
    pub fn parse(source: &str) -> Result<Self, MapError> {
        let root: Value = serde_json::from_str(source).map_err(|e| {
            let context = source
                .lines()
                .nth(e.line().saturating_sub(1))
                .unwrap_or("")
                .trim_end()
                .to_string();
            MapError::Syntax {
                line: e.line(),
                column: e.column(),
                message: e.to_string(),
                context,
            }
        })?;

        if !root.is_object() {
            return Err(type_mismatch("<root>", "object", &root));
        }

        let name = require_str(&root, "name")?.to_string();
        let description = optional_str(&root, "descr")?
            .unwrap_or(DEFAULT_DESCRIPTION)
            .to_string();
        let author = optional_str(&root, "author")?
            .unwrap_or(DEFAULT_AUTHOR)
            .to_string();

        let version = require(&root, "mapFormatVer")?;
        if !version.is_object() {
            return Err(type_mismatch("mapFormatVer", "object", version));
        }
        let format_version = (
            require_uint(version, "mapFormatVer.major", "major")?,
            require_uint(version, "mapFormatVer.minor", "minor")?,
        );

        let entries = match require(&root, "objects")? {
            Value::Array(entries) => entries,
            other => return Err(type_mismatch("objects", "array", other)),
        };
        let objects = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| parse_object(entry, i))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "Loaded map \"{}\" (format {}.{}) with {} objects",
            name,
            format_version.0,
            format_version.1,
            objects.len()
        );

        Ok(Map {
            name,
            description,
            author,
            format_version,
            objects,
        })
    }
}

fn parse_object(entry: &Value, index: usize) -> Result<ObjectDescriptor, MapError> {
    let path = format!("objects[{index}]");
    if !entry.is_object() {
        return Err(type_mismatch(&path, "object", entry));
    }

    let name = optional_str_at(entry, &path, "name")?
        .unwrap_or(DEFAULT_OBJECT_NAME)
        .to_string();
    let model_name = require_str_at(entry, &path, "modelName")?.to_string();
    let texture_name = require_str_at(entry, &path, "textureName")?.to_string();

    let flags = match optional_str_at(entry, &path, "flags")? {
        Some(spec) => parse_flags(spec),
        None => ObjectFlags::default(),
    };

    let position = parse_vec3(require_at(entry, &path, "pos")?, &format!("{path}.pos"))?;
    let scale = match entry.get("scale") {
        Some(value) => parse_vec3(value, &format!("{path}.scale"))?,
        None => Vector3::new(1.0, 1.0, 1.0),
    };
    let model_rotation_deg = match entry.get("modelRot") {
        Some(value) => parse_vec3(value, &format!("{path}.modelRot"))?,
        None => Vector3::new(0.0, 0.0, 0.0),
    };

    let shape = match entry.get("collShape") {
        Some(value) => Some(parse_shape(value, &format!("{path}.collShape"))?),
        None => None,
    };

    let mass_path = format!("{path}.mass");
    let mass = match entry.get("mass") {
        Some(value) => as_f32(value, &mass_path)?,
        None => MASS_STATIC,
    };
    // Negative scale is allowed (mirroring); negative mass has no meaning.
    if mass < 0.0 {
        return Err(MapError::InvalidValue {
            path: mass_path,
            reason: format!("mass must be non-negative, got {mass}"),
        });
    }

    Ok(ObjectDescriptor {
        name,
        model_name,
        texture_name,
        flags,
        position,
        scale,
        model_rotation_deg,
        shape,
        mass,
    })
}

fn parse_shape(value: &Value, path: &str) -> Result<CollisionShape, MapError> {
    if !value.is_object() {
        return Err(type_mismatch(path, "object", value));
    }
    let type_name = require_str_at(value, path, "type")?;
    match type_name.to_ascii_lowercase().as_str() {
        "sphere" => {
            let radius = as_f32(
                require_at(value, path, "radius")?,
                &format!("{path}.radius"),
            )?;
            Ok(CollisionShape::Sphere { radius })
        }
        "box" => {
            let half_extents = parse_vec3(require_at(value, path, "size")?, &format!("{path}.size"))?;
            Ok(CollisionShape::Box { half_extents })
        }
        _ => Err(MapError::UnknownShape {
            path: format!("{path}.type"),
            type_name: type_name.to_string(),
        }),
    }
}

fn parse_vec3(value: &Value, path: &str) -> Result<Vector3<f32>, MapError> {
    if !value.is_object() {
        return Err(type_mismatch(path, "object with x/y/z", value));
    }
    Ok(Vector3::new(
        as_f32(require_at(value, path, "x")?, &format!("{path}.x"))?,
        as_f32(require_at(value, path, "y")?, &format!("{path}.y"))?,
        as_f32(require_at(value, path, "z")?, &format!("{path}.z"))?,
    ))
}

// TODO: parse individual flag names once more than the visibility flag
// exists. Until then any flag string maps to the default set.
fn parse_flags(_spec: &str) -> ObjectFlags {
    ObjectFlags::default()
}

fn dump(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "<unprintable>".to_string())
}

fn type_mismatch(path: &str, expected: &'static str, found: &Value) -> MapError {
    MapError::TypeMismatch {
        path: path.to_string(),
        expected,
        found: dump(found),
    }
}

fn require<'a>(parent: &'a Value, key: &str) -> Result<&'a Value, MapError> {
    parent.get(key).ok_or_else(|| MapError::MissingField {
        path: key.to_string(),
    })
}

fn require_at<'a>(parent: &'a Value, path: &str, key: &str) -> Result<&'a Value, MapError> {
    parent.get(key).ok_or_else(|| MapError::MissingField {
        path: format!("{path}.{key}"),
    })
}

fn require_str<'a>(parent: &'a Value, key: &str) -> Result<&'a str, MapError> {
    let value = require(parent, key)?;
    value.as_str().ok_or_else(|| type_mismatch(key, "string", value))
}

fn require_str_at<'a>(parent: &'a Value, path: &str, key: &str) -> Result<&'a str, MapError> {
    let value = require_at(parent, path, key)?;
    value
        .as_str()
        .ok_or_else(|| type_mismatch(&format!("{path}.{key}"), "string", value))
}

fn optional_str<'a>(parent: &'a Value, key: &str) -> Result<Option<&'a str>, MapError> {
    match parent.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| type_mismatch(key, "string", value)),
    }
}

fn optional_str_at<'a>(parent: &'a Value, path: &str, key: &str) -> Result<Option<&'a str>, MapError> {
    match parent.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| type_mismatch(&format!("{path}.{key}"), "string", value)),
    }
}

fn require_uint(parent: &Value, full_path: &str, key: &str) -> Result<u32, MapError> {
    let value = parent.get(key).ok_or_else(|| MapError::MissingField {
        path: full_path.to_string(),
    })?;
    value
        .as_u64()
        .map(|v| v as u32)
        .ok_or_else(|| type_mismatch(full_path, "unsigned integer", value))
}

fn as_f32(value: &Value, path: &str) -> Result<f32, MapError> {
    value
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| type_mismatch(path, "number", value))
}
