//! Scene description parsing and validation
//!
//! The external text-to-scene translator emits a JSON document with
//! `objects` and `relations` arrays and an optional `animation_couples`
//! array. Parsing is a pure transform: nothing downstream is touched until
//! the whole document validates, so a malformed payload can never leave a
//! partially populated scene.
//!
//! Saved-scene envelopes add `user_input`, `saved_timestamp`, and
//! `app_version` at the top level; those are persistence concerns and are
//! ignored here.

use serde::Deserialize;
use thiserror::Error;

use crate::animation::{AnimationKind, OrbitKind, OrbitalSpec};
use crate::geometry::SizeClass;
use crate::render::Color;

/// Errors fatal to a scene load
#[derive(Error, Debug)]
pub enum ParseError {
    /// The payload is not valid JSON
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    /// The document does not match the scene schema
    #[error("schema violation: {0}")]
    SchemaViolation(String),
}

/// Validated, immutable description of one object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSpec {
    /// Unique id within the scene
    pub id: String,
    /// Model archetype name
    pub kind: String,
    /// Size class, default medium
    pub size: SizeClass,
    /// Base color, default gray
    pub color: Color,
    /// Ordered animation directives; unknown names were dropped
    pub animations: Vec<AnimationKind>,
}

/// Spatial relation kinds the placement solver understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Subject sits one spacing unit to the object's -X
    Left,
    /// Subject sits one spacing unit to the object's +X
    Right,
    /// Subject sits one spacing unit to the object's -Z
    Behind,
    /// Subject sits one spacing unit to the object's +Z
    Front,
    /// Subject sits one spacing unit above the object
    Above,
    /// Subject sits half a spacing unit below the object
    Below,
    /// Subject sits half a spacing unit to the object's +X
    Near,
}

impl RelationKind {
    /// Parse a relation string, accepting the translator's aliases;
    /// unknown kinds yield `None` and the relation is skipped
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "behind" => Some(Self::Behind),
            "front" => Some(Self::Front),
            "above" | "on top of" | "on" => Some(Self::Above),
            "below" | "under" => Some(Self::Below),
            "near" => Some(Self::Near),
            _ => None,
        }
    }
}

/// Validated relation between two object ids
#[derive(Debug, Clone, PartialEq)]
pub struct RelationSpec {
    /// The object being positioned
    pub subject: String,
    /// The object positioned relative to
    pub object: String,
    /// Offset direction
    pub kind: RelationKind,
}

/// Fully validated scene description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDescription {
    /// Objects in declaration order
    pub objects: Vec<ObjectSpec>,
    /// Relations in declaration order
    pub relations: Vec<RelationSpec>,
    /// Orbital animation couples in declaration order
    pub orbitals: Vec<OrbitalSpec>,
}

// Raw serde mirror of the wire format. Unknown top-level fields (the
// saved-scene envelope among them) are ignored by default.
#[derive(Deserialize)]
struct RawScene {
    objects: Vec<RawObject>,
    relations: Vec<RawRelation>,
    #[serde(default)]
    animation_couples: Vec<RawCouple>,
}

#[derive(Deserialize)]
struct RawObject {
    id: String,
    #[serde(rename = "object")]
    kind: String,
    #[serde(default)]
    attributes: RawAttributes,
}

#[derive(Deserialize, Default)]
struct RawAttributes {
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    animations: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct RawRelation {
    object_1: String,
    object_2: String,
    relation: String,
}

#[derive(Deserialize)]
struct RawCouple {
    primary_object: String,
    reference_object: String,
    animation_type: String,
    #[serde(default)]
    description: Option<String>,
}

impl SceneDescription {
    /// Parse and validate a raw scene description payload
    pub fn parse(payload: &[u8]) -> Result<Self, ParseError> {
        let raw: RawScene = serde_json::from_slice(payload).map_err(|err| {
            use serde_json::error::Category;
            match err.classify() {
                Category::Syntax | Category::Eof => ParseError::MalformedJson(err.to_string()),
                _ => ParseError::SchemaViolation(err.to_string()),
            }
        })?;
        Self::validate(raw)
    }

    fn validate(raw: RawScene) -> Result<Self, ParseError> {
        let mut objects = Vec::with_capacity(raw.objects.len());
        let mut seen_ids = std::collections::HashSet::new();

        for raw_object in raw.objects {
            if raw_object.id.is_empty() {
                return Err(ParseError::SchemaViolation(
                    "object entry has an empty id".into(),
                ));
            }
            if raw_object.kind.is_empty() {
                return Err(ParseError::SchemaViolation(format!(
                    "object {:?} has an empty type",
                    raw_object.id
                )));
            }
            if !seen_ids.insert(raw_object.id.clone()) {
                return Err(ParseError::SchemaViolation(format!(
                    "duplicate object id {:?}",
                    raw_object.id
                )));
            }

            let attributes = raw_object.attributes;
            let size = attributes
                .size
                .as_deref()
                .map(SizeClass::parse)
                .unwrap_or_default();
            let color = attributes
                .color
                .as_deref()
                .map(Color::parse)
                .unwrap_or_default();

            let mut animations = Vec::new();
            for name in attributes.animations.unwrap_or_default() {
                match AnimationKind::parse(&name) {
                    Some(kind) => animations.push(kind),
                    None => log::warn!(
                        "object {:?}: unknown animation directive {name:?}, ignoring",
                        raw_object.id
                    ),
                }
            }

            objects.push(ObjectSpec {
                id: raw_object.id,
                kind: raw_object.kind,
                size,
                color,
                animations,
            });
        }

        let mut relations = Vec::new();
        for raw_relation in raw.relations {
            match RelationKind::parse(&raw_relation.relation) {
                Some(kind) => relations.push(RelationSpec {
                    subject: raw_relation.object_1,
                    object: raw_relation.object_2,
                    kind,
                }),
                None => log::warn!(
                    "unknown relation kind {:?} between {:?} and {:?}, ignoring",
                    raw_relation.relation,
                    raw_relation.object_1,
                    raw_relation.object_2
                ),
            }
        }

        let mut orbitals = Vec::new();
        for raw_couple in raw.animation_couples {
            match OrbitKind::parse(&raw_couple.animation_type) {
                Some(kind) => orbitals.push(OrbitalSpec {
                    primary: raw_couple.primary_object,
                    reference: raw_couple.reference_object,
                    kind,
                    description: raw_couple.description,
                }),
                None => log::warn!(
                    "unknown orbital animation type {:?} for {:?}, ignoring",
                    raw_couple.animation_type,
                    raw_couple.primary_object
                ),
            }
        }

        Ok(Self {
            objects,
            relations,
            orbitals,
        })
    }
}
