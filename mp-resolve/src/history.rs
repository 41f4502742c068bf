use std::collections::HashMap;

use mp_model::{LayerDef, LayerKey};

/// Ordered record of the previously-active definitions per key, oldest
/// first. A definition with overwrite set supersedes everything before
/// it, so the key's record is cleared when such a definition is layered
/// over.
#[derive(Debug, Default)]
pub struct DefinitionHistory {
    entries: HashMap<LayerKey, Vec<LayerDef>>,
}

impl DefinitionHistory {
    pub fn push(&mut self, key: LayerKey, def: LayerDef) {
        self.entries.entry(key).or_default().push(def);
    }

    pub fn clear(&mut self, key: &LayerKey) {
        self.entries.remove(key);
    }

    pub fn get(&self, key: &LayerKey) -> &[LayerDef] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }
}
