use std::collections::BTreeMap;

use crate::key::LayerKey;
use crate::types::{CubeDef, CubeDeformation, MaterialDef, PartPose};

/// A named node in a model part tree.
///
/// Children are owned exclusively by their parent; `Clone` is a deep copy,
/// which the merge engine relies on when copying subtrees between
/// definitions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartDef {
    pub cubes: Vec<CubeDef>,
    pub pose: PartPose,
    pub children: BTreeMap<String, PartDef>,
}

impl PartDef {
    pub fn new(cubes: Vec<CubeDef>, pose: PartPose) -> Self {
        Self {
            cubes,
            pose,
            children: BTreeMap::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&PartDef> {
        self.children.get(name)
    }
}

/// Merge metadata carried by an externally authored mesh.
///
/// Inert once `resolved` has been set; from then on only `root` matters.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthoredMesh {
    pub root: PartDef,
    /// Children of this key's final root are inherited at resolve time.
    pub parent: Option<LayerKey>,
    /// Added to every cube of the root's direct children at resolve time.
    pub universal_deformation: Option<CubeDeformation>,
    /// True replaces prior definitions of the same key; false merges.
    pub overwrite: bool,
    /// Shift the root down 24 units to match the renderer's offset.
    pub fix_vanilla_offset: bool,
    /// One-shot guard; inheritance resolution is a no-op once set.
    pub resolved: bool,
}

impl Default for AuthoredMesh {
    fn default() -> Self {
        Self {
            root: PartDef::default(),
            parent: None,
            universal_deformation: None,
            overwrite: true,
            fix_vanilla_offset: false,
            resolved: false,
        }
    }
}

/// A mesh definition: a root part tree, optionally with the authoring
/// metadata that drives merge-time inheritance.
///
/// The root carries no cubes and a zero pose; the constructors clear both.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshDef {
    /// Root only; the shape of built-in definitions.
    Plain(PartDef),
    /// Root plus merge metadata, decoded from a document.
    Authored(AuthoredMesh),
}

impl MeshDef {
    pub fn plain(mut root: PartDef) -> Self {
        clear_root(&mut root);
        Self::Plain(root)
    }

    pub fn authored(mut mesh: AuthoredMesh) -> Self {
        clear_root(&mut mesh.root);
        Self::Authored(mesh)
    }

    pub fn root(&self) -> &PartDef {
        match self {
            Self::Plain(root) => root,
            Self::Authored(mesh) => &mesh.root,
        }
    }

    pub fn root_mut(&mut self) -> &mut PartDef {
        match self {
            Self::Plain(root) => root,
            Self::Authored(mesh) => &mut mesh.root,
        }
    }

    /// Effective overwrite flag; plain meshes fully replace prior history.
    pub fn overwrite(&self) -> bool {
        match self {
            Self::Plain(_) => true,
            Self::Authored(mesh) => mesh.overwrite,
        }
    }

    /// Plain meshes have nothing left to resolve.
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Plain(_) => true,
            Self::Authored(mesh) => mesh.resolved,
        }
    }

    pub fn authored_meta(&self) -> Option<&AuthoredMesh> {
        match self {
            Self::Plain(_) => None,
            Self::Authored(mesh) => Some(mesh),
        }
    }
}

fn clear_root(root: &mut PartDef) {
    root.cubes.clear();
    root.pose = PartPose::ZERO;
}

/// A mesh definition paired with optional material sizing: one complete,
/// mergeable model layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDef {
    pub mesh: MeshDef,
    /// Pinned material, or `None` to inherit one during merge.
    pub material: Option<MaterialDef>,
}

impl LayerDef {
    pub fn new(mesh: MeshDef, material: Option<MaterialDef>) -> Self {
        Self { mesh, material }
    }

    /// Built-in definitions pin their material explicitly.
    pub fn plain(root: PartDef, material: MaterialDef) -> Self {
        Self::new(MeshDef::plain(root), Some(material))
    }

    pub fn effective_material(&self) -> MaterialDef {
        self.material.unwrap_or_default()
    }
}
