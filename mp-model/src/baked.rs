//! Baked, render-facing part trees with never-failing child lookup.
//!
//! Renderers walk these trees by name every frame, often against models
//! that a pack author only partially defined. Lookup therefore never
//! fails: a missing child resolves to a cached empty part, and lookups on
//! an empty part keep returning that same empty part.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::part::{LayerDef, PartDef};
use crate::types::{CubeDef, PartPose};

/// A baked model part: cubes, pose and named children, ready for the
/// renderer. Single-threaded by design (`Rc`); bake one per consumer
/// from a registry snapshot rather than sharing across threads.
#[derive(Debug)]
pub struct ModelPart {
    pub cubes: Vec<CubeDef>,
    pub pose: PartPose,
    children: HashMap<String, Rc<ModelPart>>,
    empties: RefCell<HashMap<String, Rc<ModelPart>>>,
    sentinel: bool,
}

impl ModelPart {
    fn from_part(part: &PartDef) -> Rc<Self> {
        let children = part
            .children
            .iter()
            .map(|(name, child)| (name.clone(), Self::from_part(child)))
            .collect();
        Rc::new(Self {
            cubes: part.cubes.clone(),
            pose: part.pose,
            children,
            empties: RefCell::new(HashMap::new()),
            sentinel: false,
        })
    }

    fn empty() -> Rc<Self> {
        Rc::new(Self {
            cubes: Vec::new(),
            pose: PartPose::ZERO,
            children: HashMap::new(),
            empties: RefCell::new(HashMap::new()),
            sentinel: true,
        })
    }

    /// Returns the child with the given name, or an empty part when no
    /// such child exists. The same empty part instance is returned for
    /// every lookup of the same missing name on this part.
    pub fn child(self: &Rc<Self>, name: &str) -> Rc<ModelPart> {
        if self.sentinel {
            return Rc::clone(self);
        }
        if let Some(child) = self.children.get(name) {
            return Rc::clone(child);
        }
        Rc::clone(
            self.empties
                .borrow_mut()
                .entry(name.to_string())
                .or_insert_with(Self::empty),
        )
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// True for the placeholder returned on missing-child lookups.
    pub fn is_empty(&self) -> bool {
        self.sentinel
    }
}

impl LayerDef {
    /// Bakes the mesh root into a runtime part tree. Texture sizing stays
    /// on the definition (`effective_material`); baking only shapes the
    /// tree.
    pub fn bake(&self) -> Rc<ModelPart> {
        ModelPart::from_part(self.mesh.root())
    }
}
