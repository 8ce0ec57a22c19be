//! # Scene Description Format
//!
//! Serde records for the JSON scene format. Every optional field stays
//! `None` when absent so that loading only overrides what a record states.
//! Field names keep the format's historical spellings (`recieveShadow`,
//! `recieveLighting`, `AABB`).
//!
//! `model` and `AABB` on world objects distinguish three states through
//! [`Field`]: absent (use the default), the string `"none"` (explicitly no
//! value) and a real value.

use std::path::Path;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SceneError;
use crate::gfx::resources::texture_resource::TextureKind;
use crate::spatial::Bounds;

/// Sentinel string meaning "explicitly no value"
pub const NONE_SENTINEL: &str = "none";

/// A field that can be absent, explicitly `"none"`, or set
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Field<T> {
    #[default]
    Absent,
    None,
    Value(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Null => Ok(Field::Absent),
            serde_json::Value::String(s) if s == NONE_SENTINEL => Ok(Field::None),
            other => serde_json::from_value(other)
                .map(Field::Value)
                .map_err(D::Error::custom),
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Absent => serializer.serialize_none(),
            Field::None => serializer.serialize_str(NONE_SENTINEL),
            Field::Value(value) => value.serialize(serializer),
        }
    }
}

/// Top-level scene document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneDescription {
    pub assets: AssetsDescription,
    pub world_objects: Vec<WorldObjectDescription>,
}

impl SceneDescription {
    pub fn from_json(source: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Meshes plus textures; the loads every composite waits on
    pub fn atomic_count(&self) -> usize {
        self.assets.meshes.len() + self.assets.textures.len()
    }

    /// Materials, models and world objects
    pub fn composite_count(&self) -> usize {
        self.assets.materials.len() + self.assets.models.len() + self.world_objects.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsDescription {
    pub meshes: Vec<MeshDescription>,
    pub textures: Vec<TextureDescription>,
    pub materials: Vec<MaterialDescription>,
    pub models: Vec<ModelDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDescription {
    pub id: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureDescription {
    pub id: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: TextureKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDescription {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffuse_texture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_texture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specular_exponent: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specular_strength: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffuse_strength: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_diffuse: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_normal: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescription {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast_shadow: Option<bool>,
    #[serde(
        rename = "recieveShadow",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub receive_shadow: Option<bool>,
    #[serde(
        rename = "recieveLighting",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub receive_lighting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animate_rot: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rot_axis: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rot_speed_factor: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animate_trans: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldObjectDescription {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub model: Field<String>,
    #[serde(rename = "AABB", default, skip_serializing_if = "Field::is_absent")]
    pub aabb: Field<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_immovable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_collision: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_gravity: Option<bool>,
}

impl WorldObjectDescription {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "assets": {
            "meshes": [{ "id": "rock", "path": "meshes/rock.obj" }],
            "textures": [{ "id": "rockColor", "path": "textures/rock.png", "type": "diffuse" }],
            "materials": [{ "id": "rockMat", "diffuseTexture": "rockColor", "scale": 2 }],
            "models": [{
                "id": "rockModel", "mesh": "rock", "material": "rockMat",
                "recieveShadow": false
            }]
        },
        "worldObjects": [
            { "id": "rock1", "type": "prop", "model": "rockModel", "position": [1, 2, 3] },
            { "id": "trigger", "type": "volume", "model": "none",
              "AABB": { "minX": -1, "maxX": 1, "minY": 0, "maxY": 2, "minZ": -1, "maxZ": 1 } },
            { "id": "ghost", "type": "prop", "AABB": "none", "isImmovable": false }
        ]
    }"#;

    #[test]
    fn test_parse_scene() {
        let scene = SceneDescription::from_json(SCENE).unwrap();
        assert_eq!(scene.atomic_count(), 2);
        assert_eq!(scene.composite_count(), 5);

        let material = &scene.assets.materials[0];
        assert_eq!(material.scale, Some(2.0));
        assert_eq!(material.specular_exponent, None);

        let model = &scene.assets.models[0];
        assert_eq!(model.receive_shadow, Some(false));
        assert_eq!(model.render, None);
        assert_eq!(scene.assets.textures[0].kind, TextureKind::Diffuse);
    }

    #[test]
    fn test_none_sentinel_and_absent_fields() {
        let scene = SceneDescription::from_json(SCENE).unwrap();
        let [rock, trigger, ghost] = &scene.world_objects[..] else {
            panic!("expected three world objects");
        };

        assert_eq!(rock.model, Field::Value("rockModel".to_string()));
        assert!(rock.aabb.is_absent());
        assert_eq!(rock.position, Some([1.0, 2.0, 3.0]));

        assert_eq!(trigger.model, Field::None);
        assert_eq!(
            trigger.aabb.value(),
            Some(&Bounds::new(-1.0, 1.0, 0.0, 2.0, -1.0, 1.0))
        );

        assert!(ghost.model.is_absent());
        assert_eq!(ghost.aabb, Field::None);
        assert_eq!(ghost.is_immovable, Some(false));
        assert_eq!(ghost.has_gravity, None);
    }

    #[test]
    fn test_serialize_keeps_format_spellings() {
        let mut object = WorldObjectDescription::new("floor", "static");
        object.model = Field::None;
        let model = ModelDescription {
            id: "m".to_string(),
            receive_lighting: Some(false),
            ..Default::default()
        };

        let object_json = serde_json::to_value(&object).unwrap();
        assert_eq!(object_json["model"], "none");
        assert_eq!(object_json["type"], "static");
        assert!(object_json.get("AABB").is_none());
        assert!(object_json.get("position").is_none());

        let model_json = serde_json::to_value(&model).unwrap();
        assert_eq!(model_json["recieveLighting"], false);
    }

    #[test]
    fn test_malformed_bounds_is_an_error() {
        let result = SceneDescription::from_json(
            r#"{ "worldObjects": [{ "id": "x", "AABB": { "minX": "wide" } }] }"#,
        );
        assert!(matches!(result, Err(SceneError::Json(_))));
    }
}
