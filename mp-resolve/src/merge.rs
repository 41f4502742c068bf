//! Inheritance resolution for one authored definition.
//!
//! Runs once per definition per reload cycle, against the pre-resolution
//! overlay of built-in and external roots, so the outcome never depends
//! on the order other keys resolve in.

use std::collections::HashMap;

use mp_model::{LayerDef, LayerKey, MeshDef, PartDef, PartPose};

use crate::history::DefinitionHistory;

/// Vertical shift compensating for the renderer's fixed model offset.
/// The y axis points down in model space, so adding moves the model down
/// visually.
pub const VANILLA_OFFSET: f32 = 24.0;

/// Resolves history, parent, universal deformation and the vertical
/// offset fix into `layer`'s root. A no-op for plain meshes and for
/// definitions that have already been resolved.
pub fn resolve_inheritance(
    key: &LayerKey,
    layer: &mut LayerDef,
    history: &DefinitionHistory,
    roots: &HashMap<LayerKey, LayerDef>,
) {
    let MeshDef::Authored(mesh) = &mut layer.mesh else {
        return;
    };
    if mesh.resolved {
        return;
    }
    mesh.resolved = true;

    if !mesh.overwrite {
        for prev in history.get(key) {
            inherit_children(&mut mesh.root, prev.mesh.root());
        }
    }

    if let Some(parent) = &mesh.parent
        && let Some(parent_layer) = roots.get(parent)
    {
        inherit_children(&mut mesh.root, parent_layer.mesh.root());
    }

    if let Some(universal) = mesh.universal_deformation {
        // Direct children only; grandchildren keep their authored growth.
        for child in mesh.root.children.values_mut() {
            for cube in &mut child.cubes {
                cube.grow = cube.grow.extend(universal);
            }
        }
    }

    let mut fix_offset = mesh.fix_vanilla_offset;
    if !fix_offset
        && !mesh.overwrite
        && let Some(parent) = &mesh.parent
        && let Some(parent_layer) = roots.get(parent)
        && let MeshDef::Authored(parent_mesh) = &parent_layer.mesh
    {
        fix_offset = parent_mesh.fix_vanilla_offset;
    }

    if fix_offset {
        let pose = mesh.root.pose;
        mesh.root.pose = PartPose::offset_and_rotation(
            pose.x,
            pose.y + VANILLA_OFFSET,
            pose.z,
            pose.x_rot,
            pose.y_rot,
            pose.z_rot,
        );
    }
}

/// Copies `source`'s children into `dest` where the name is not already
/// taken; existing children always win.
fn inherit_children(dest: &mut PartDef, source: &PartDef) {
    for (name, child) in &source.children {
        dest.children
            .entry(name.clone())
            .or_insert_with(|| child.clone());
    }
}
