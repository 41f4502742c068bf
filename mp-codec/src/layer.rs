//! Codec for layer definition documents.
//!
//! Decoding always yields the authored mesh shape with an unset resolved
//! flag, so re-ingested exports stay mergeable. Encoding emits the
//! authoring fields only while inheritance has not been resolved; after
//! that they are baked into the root and omitted.

use std::collections::BTreeMap;

use mp_model::{
    AuthoredMesh, CubeDef, CubeDeformation, LayerDef, MaterialDef, MeshDef, PartDef, PartPose,
};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};

pub fn decode_layer(id: &str, raw: &str) -> Result<LayerDef, DecodeError> {
    let doc: LayerDoc = serde_json::from_str(raw).map_err(|e| DecodeError::from_json(id, &e))?;
    layer_from_doc(id, doc)
}

pub fn decode_layer_value(id: &str, value: &serde_json::Value) -> Result<LayerDef, DecodeError> {
    let doc: LayerDoc =
        serde_json::from_value(value.clone()).map_err(|e| DecodeError::from_json(id, &e))?;
    layer_from_doc(id, doc)
}

pub fn encode_layer(layer: &LayerDef) -> Result<serde_json::Value, EncodeError> {
    Ok(serde_json::to_value(layer_to_doc(layer))?)
}

pub fn encode_layer_pretty(layer: &LayerDef) -> Result<String, EncodeError> {
    Ok(serde_json::to_string_pretty(&layer_to_doc(layer))?)
}

fn layer_from_doc(id: &str, doc: LayerDoc) -> Result<LayerDef, DecodeError> {
    let mesh = doc.mesh;
    let parent = match mesh.parent {
        Some(text) => Some(
            text.parse()
                .map_err(|e| DecodeError::field(id, "mesh.parent", e))?,
        ),
        None => None,
    };
    let mesh = MeshDef::authored(AuthoredMesh {
        root: mesh.root.map(part_from_doc).unwrap_or_default(),
        parent,
        universal_deformation: mesh.universal_cube_deformation.map(Into::into),
        overwrite: mesh.overwrite,
        fix_vanilla_offset: mesh.fix_vanilla_offset,
        resolved: false,
    });
    Ok(LayerDef::new(
        mesh,
        doc.material
            .map(|m| MaterialDef::new(m.x_tex_size, m.y_tex_size)),
    ))
}

fn layer_to_doc(layer: &LayerDef) -> LayerDoc {
    let mesh = match &layer.mesh {
        MeshDef::Authored(mesh) if !mesh.resolved => MeshDoc {
            parent: mesh.parent.as_ref().map(|key| key.to_string()),
            universal_cube_deformation: mesh.universal_deformation.map(Into::into),
            overwrite: mesh.overwrite,
            root: Some(part_to_doc(&mesh.root)),
            fix_vanilla_offset: mesh.fix_vanilla_offset,
        },
        other => MeshDoc {
            parent: None,
            universal_cube_deformation: None,
            overwrite: true,
            root: Some(part_to_doc(other.root())),
            fix_vanilla_offset: false,
        },
    };
    LayerDoc {
        mesh,
        material: layer.material.map(|m| MaterialDoc {
            x_tex_size: m.x_tex_size,
            y_tex_size: m.y_tex_size,
        }),
    }
}

fn part_from_doc(doc: PartDoc) -> PartDef {
    PartDef {
        cubes: doc.cubes.into_iter().map(cube_from_doc).collect(),
        pose: doc.part_pose.map(PoseDoc::into_pose).unwrap_or_default(),
        children: doc
            .children
            .into_iter()
            .map(|(name, child)| (name, part_from_doc(child)))
            .collect(),
    }
}

fn part_to_doc(part: &PartDef) -> PartDoc {
    PartDoc {
        cubes: part.cubes.iter().map(cube_to_doc).collect(),
        part_pose: (!part.pose.is_zero()).then(|| PoseDoc::from_pose(part.pose)),
        children: part
            .children
            .iter()
            .map(|(name, child)| (name.clone(), part_to_doc(child)))
            .collect(),
    }
}

fn cube_from_doc(doc: CubeDoc) -> CubeDef {
    CubeDef {
        comment: doc.comment,
        origin: doc.origin,
        dimensions: doc.dimensions,
        grow: doc.grow.map(Into::into).unwrap_or(CubeDeformation::NONE),
        mirror: doc.mirror,
        tex_coord: [doc.tex_coord.u, doc.tex_coord.v],
        tex_scale: [doc.tex_scale_x, doc.tex_scale_y],
    }
}

fn cube_to_doc(cube: &CubeDef) -> CubeDoc {
    CubeDoc {
        comment: cube.comment.clone(),
        origin: cube.origin,
        dimensions: cube.dimensions,
        grow: (cube.grow != CubeDeformation::NONE).then(|| cube.grow.into()),
        mirror: cube.mirror,
        tex_coord: UvDoc {
            u: cube.tex_coord[0],
            v: cube.tex_coord[1],
        },
        tex_scale_x: cube.tex_scale[0],
        tex_scale_y: cube.tex_scale[1],
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LayerDoc {
    mesh: MeshDoc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    material: Option<MaterialDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeshDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    universal_cube_deformation: Option<GrowDoc>,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    overwrite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    root: Option<PartDoc>,
    #[serde(default, skip_serializing_if = "is_false")]
    fix_vanilla_offset: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartDoc {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    cubes: Vec<CubeDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    part_pose: Option<PoseDoc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    children: BTreeMap<String, PartDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CubeDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    origin: [f32; 3],
    dimensions: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grow: Option<GrowDoc>,
    #[serde(default, skip_serializing_if = "is_false")]
    mirror: bool,
    tex_coord: UvDoc,
    #[serde(default = "default_tex_scale", skip_serializing_if = "is_default_tex_scale")]
    tex_scale_x: f32,
    #[serde(default = "default_tex_scale", skip_serializing_if = "is_default_tex_scale")]
    tex_scale_y: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct UvDoc {
    u: f32,
    v: f32,
}

/// Compact scalar when all three axes grow alike, verbose otherwise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum GrowDoc {
    Uniform(f32),
    #[serde(rename_all = "camelCase")]
    PerAxis {
        #[serde(default)]
        grow_x: f32,
        #[serde(default)]
        grow_y: f32,
        #[serde(default)]
        grow_z: f32,
    },
}

impl From<CubeDeformation> for GrowDoc {
    fn from(grow: CubeDeformation) -> Self {
        if grow.is_uniform() {
            Self::Uniform(grow.grow_x)
        } else {
            Self::PerAxis {
                grow_x: grow.grow_x,
                grow_y: grow.grow_y,
                grow_z: grow.grow_z,
            }
        }
    }
}

impl From<GrowDoc> for CubeDeformation {
    fn from(doc: GrowDoc) -> Self {
        match doc {
            GrowDoc::Uniform(grow) => Self::uniform(grow),
            GrowDoc::PerAxis {
                grow_x,
                grow_y,
                grow_z,
            } => Self::new(grow_x, grow_y, grow_z),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PoseDoc {
    #[serde(default, skip_serializing_if = "is_zero")]
    x: f32,
    #[serde(default, skip_serializing_if = "is_zero")]
    y: f32,
    #[serde(default, skip_serializing_if = "is_zero")]
    z: f32,
    #[serde(default, skip_serializing_if = "is_zero")]
    x_rot: f32,
    #[serde(default, skip_serializing_if = "is_zero")]
    y_rot: f32,
    #[serde(default, skip_serializing_if = "is_zero")]
    z_rot: f32,
}

impl PoseDoc {
    fn from_pose(pose: PartPose) -> Self {
        Self {
            x: pose.x,
            y: pose.y,
            z: pose.z,
            x_rot: pose.x_rot,
            y_rot: pose.y_rot,
            z_rot: pose.z_rot,
        }
    }

    fn into_pose(self) -> PartPose {
        PartPose::offset_and_rotation(self.x, self.y, self.z, self.x_rot, self.y_rot, self.z_rot)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MaterialDoc {
    #[serde(rename = "xTexSize", default = "default_x_tex_size")]
    x_tex_size: u32,
    #[serde(rename = "yTexSize", default = "default_y_tex_size")]
    y_tex_size: u32,
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &f32) -> bool {
    *value == 0.0
}

fn default_tex_scale() -> f32 {
    1.0
}

fn is_default_tex_scale(value: &f32) -> bool {
    *value == 1.0
}

fn default_x_tex_size() -> u32 {
    64
}

fn default_y_tex_size() -> u32 {
    32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn authored_layer() -> LayerDef {
        let mut head = PartDef::new(
            vec![CubeDef {
                comment: Some("skull".into()),
                origin: [-4.0, -8.0, -4.0],
                dimensions: [8.0, 8.0, 8.0],
                grow: CubeDeformation::new(0.5, 0.25, 0.5),
                mirror: true,
                tex_coord: [0.0, 0.0],
                tex_scale: [1.0, 2.0],
            }],
            PartPose::offset_and_rotation(0.0, 6.0, 0.0, 0.1, 0.0, 0.0),
        );
        head.children.insert(
            "ear".into(),
            PartDef::new(
                vec![CubeDef::new([0.0; 3], [2.0, 2.0, 1.0], [24.0, 0.0])],
                PartPose::ZERO,
            ),
        );
        let mut root = PartDef::default();
        root.children.insert("head".into(), head);

        LayerDef::new(
            MeshDef::authored(AuthoredMesh {
                root,
                parent: Some("mymod:cow#main".parse().unwrap()),
                universal_deformation: Some(CubeDeformation::uniform(0.5)),
                overwrite: false,
                fix_vanilla_offset: true,
                resolved: false,
            }),
            Some(MaterialDef::new(64, 64)),
        )
    }

    #[test]
    fn round_trip_preserves_authored_layers() {
        let layer = authored_layer();
        let encoded = encode_layer(&layer).unwrap();
        let decoded = decode_layer_value("test", &encoded).unwrap();
        assert_eq!(decoded, layer);
    }

    #[test]
    fn uniform_grow_encodes_compact() {
        let mut layer = authored_layer();
        layer.mesh.root_mut().children.get_mut("head").unwrap().cubes[0].grow =
            CubeDeformation::uniform(2.0);
        let encoded = encode_layer(&layer).unwrap();
        let grow = &encoded["mesh"]["root"]["children"]["head"]["cubes"][0]["grow"];
        assert_eq!(*grow, json!(2.0));
    }

    #[test]
    fn mixed_grow_encodes_verbose() {
        let mut layer = authored_layer();
        layer.mesh.root_mut().children.get_mut("head").unwrap().cubes[0].grow =
            CubeDeformation::new(1.0, 2.0, 3.0);
        let encoded = encode_layer(&layer).unwrap();
        let grow = &encoded["mesh"]["root"]["children"]["head"]["cubes"][0]["grow"];
        assert_eq!(*grow, json!({"growX": 1.0, "growY": 2.0, "growZ": 3.0}));
        let decoded = decode_layer_value("test", &encoded).unwrap();
        assert_eq!(decoded, layer);
    }

    #[test]
    fn both_grow_forms_decode_alike() {
        let compact = json!({"mesh": {"root": {"children": {"a": {"cubes": [
            {"origin": [0, 0, 0], "dimensions": [1, 1, 1], "texCoord": {"u": 0, "v": 0}, "grow": 2.0}
        ]}}}}});
        let verbose = json!({"mesh": {"root": {"children": {"a": {"cubes": [
            {"origin": [0, 0, 0], "dimensions": [1, 1, 1], "texCoord": {"u": 0, "v": 0},
             "grow": {"growX": 2.0, "growY": 2.0, "growZ": 2.0}}
        ]}}}}});
        let a = decode_layer_value("compact", &compact).unwrap();
        let b = decode_layer_value("verbose", &verbose).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn minimal_document_gets_defaults() {
        let layer = decode_layer("minimal", r#"{"mesh": {}}"#).unwrap();
        assert!(layer.material.is_none());
        assert_eq!(layer.effective_material(), MaterialDef::new(64, 32));
        let mesh = layer.mesh.authored_meta().unwrap();
        assert!(mesh.overwrite);
        assert!(!mesh.fix_vanilla_offset);
        assert!(!mesh.resolved);
        assert!(mesh.parent.is_none());
        assert!(mesh.root.children.is_empty());
    }

    #[test]
    fn material_defaults_apply_per_field() {
        let layer = decode_layer("mat", r#"{"mesh": {}, "material": {"xTexSize": 128}}"#).unwrap();
        assert_eq!(layer.material, Some(MaterialDef::new(128, 32)));
    }

    #[test]
    fn decode_clears_root_cubes_and_pose() {
        let doc = json!({"mesh": {"root": {
            "cubes": [{"origin": [0, 0, 0], "dimensions": [1, 1, 1], "texCoord": {"u": 0, "v": 0}}],
            "partPose": {"y": 12.0},
            "children": {"body": {}}
        }}});
        let layer = decode_layer_value("root", &doc).unwrap();
        assert!(layer.mesh.root().cubes.is_empty());
        assert!(layer.mesh.root().pose.is_zero());
        assert!(layer.mesh.root().child("body").is_some());
    }

    #[test]
    fn malformed_field_is_a_typed_failure() {
        let err = decode_layer(
            "bad",
            r#"{"mesh": {"root": {"children": {"a": {"cubes": [{"origin": [0, 0]}]}}}}}"#,
        )
        .unwrap_err();
        assert_eq!(err.id, "bad");

        let err = decode_layer("badparent", r#"{"mesh": {"parent": "nolayer"}}"#).unwrap_err();
        assert!(err.message.contains("mesh.parent"), "{}", err.message);
    }

    #[test]
    fn resolved_mesh_encodes_without_authoring_fields() {
        let mut layer = authored_layer();
        if let MeshDef::Authored(mesh) = &mut layer.mesh {
            mesh.resolved = true;
        }
        let encoded = encode_layer(&layer).unwrap();
        let mesh = encoded["mesh"].as_object().unwrap();
        assert!(mesh.contains_key("root"));
        assert!(!mesh.contains_key("parent"));
        assert!(!mesh.contains_key("universalCubeDeformation"));
        assert!(!mesh.contains_key("overwrite"));
        assert!(!mesh.contains_key("fixVanillaOffset"));
    }

    #[test]
    fn inheritable_material_is_omitted() {
        let layer = LayerDef::new(MeshDef::plain(PartDef::default()), None);
        let encoded = encode_layer(&layer).unwrap();
        assert!(encoded.as_object().unwrap().get("material").is_none());
    }

    #[test]
    fn zero_pose_and_empty_children_are_omitted() {
        let layer = decode_layer("sparse", r#"{"mesh": {"root": {"children": {"a": {}}}}}"#).unwrap();
        let encoded = encode_layer(&layer).unwrap();
        let part = encoded["mesh"]["root"]["children"]["a"].as_object().unwrap();
        assert!(!part.contains_key("partPose"));
        assert!(!part.contains_key("children"));
        assert!(!part.contains_key("cubes"));
    }

    #[test]
    fn plain_mesh_round_trips_to_authored_normal_form() {
        let mut root = PartDef::default();
        root.children.insert(
            "body".into(),
            PartDef::new(
                vec![CubeDef::new([0.0; 3], [4.0, 4.0, 4.0], [16.0, 16.0])],
                PartPose::offset(0.0, 11.0, 0.0),
            ),
        );
        let plain = LayerDef::plain(root, MaterialDef::default());
        let decoded = decode_layer_value("plain", &encode_layer(&plain).unwrap()).unwrap();
        assert_eq!(decoded.mesh.root(), plain.mesh.root());
        assert_eq!(decoded.material, plain.material);
        assert!(matches!(decoded.mesh, MeshDef::Authored(_)));
    }
}
