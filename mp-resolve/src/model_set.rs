//! The model registry: built-in base layer, reload cycle, and published
//! snapshots.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use mp_codec::decode_layer;
use mp_model::{LayerDef, LayerKey, ModelId};
use tracing::{debug, error, warn};

use crate::history::DefinitionHistory;
use crate::merge::resolve_inheritance;

/// Directory prefix model documents live under on the host's resource
/// path; document ids are relative to it.
pub const MODELS_DIRECTORY: &str = "models/entity";

pub type ModelRoots = HashMap<LayerKey, LayerDef>;

/// One logical document with its raw contents from every providing
/// source, lowest priority first.
#[derive(Debug, Clone)]
pub struct DocumentStack {
    /// Document id in `namespace:layer/model-path` form.
    pub id: String,
    pub documents: Vec<String>,
}

impl DocumentStack {
    pub fn new(id: impl Into<String>, documents: Vec<String>) -> Self {
        Self {
            id: id.into(),
            documents,
        }
    }
}

/// Built-in definitions plus the published registry.
///
/// Readers take [`ModelSet::snapshot`] and see either the fully-previous
/// or fully-new registry; `reload` builds the replacement entirely off to
/// the side and swaps it in with a single assignment. Reload cycles are
/// assumed not to overlap.
pub struct ModelSet {
    builtin: ModelRoots,
    current: RwLock<Arc<ModelRoots>>,
}

impl ModelSet {
    /// Seeds the registry with the code-defined base layer; until the
    /// first reload, the snapshot is exactly the built-ins.
    pub fn new(builtin: ModelRoots) -> Self {
        let current = RwLock::new(Arc::new(builtin.clone()));
        Self { builtin, current }
    }

    /// Latest published registry. Cheap, and safe to hold across reloads.
    pub fn snapshot(&self) -> Arc<ModelRoots> {
        Arc::clone(&self.current.read().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn get(&self, key: &LayerKey) -> Option<LayerDef> {
        self.snapshot().get(key).cloned()
    }

    pub fn builtin(&self) -> &ModelRoots {
        &self.builtin
    }

    /// Runs one reload cycle over the documents the host collected and
    /// publishes the resulting registry. Malformed documents are logged
    /// and skipped; the cycle always completes.
    pub fn reload(&self, stacks: &[DocumentStack]) {
        let mut json_roots: BTreeMap<LayerKey, LayerDef> = BTreeMap::new();
        let mut history = DefinitionHistory::default();

        for stack in stacks {
            let Some(key) = map_document_id(&stack.id) else {
                continue;
            };
            for raw in &stack.documents {
                match decode_layer(&stack.id, raw) {
                    Ok(layer) => self.layer_document(&key, layer, &mut json_roots, &mut history),
                    Err(err) => warn!("skipping model document: {err}"),
                }
            }
        }

        // Overlay: built-ins with every externally-defined key replaced by
        // its most recent definition. Parent lookups resolve against this
        // pre-resolution view.
        let mut roots = self.builtin.clone();
        roots.extend(json_roots.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut resolved = self.builtin.clone();
        for (key, mut layer) in json_roots {
            resolve_inheritance(&key, &mut layer, &history, &roots);
            resolved.insert(key, layer);
        }

        debug!("publishing {} model layers", resolved.len());
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(resolved);
    }

    /// Layers one decoded definition over the key's current state:
    /// records the predecessor in the history (clearing it first when the
    /// predecessor overwrites), and inherits the predecessor's effective
    /// material when none is pinned.
    fn layer_document(
        &self,
        key: &LayerKey,
        mut layer: LayerDef,
        json_roots: &mut BTreeMap<LayerKey, LayerDef>,
        history: &mut DefinitionHistory,
    ) {
        let prev = json_roots.get(key).or_else(|| self.builtin.get(key));
        if let Some(prev) = prev {
            if prev.mesh.overwrite() {
                history.clear(key);
            }
            history.push(key.clone(), prev.clone());
            if layer.material.is_none() {
                layer.material = prev.material;
            }
        }
        json_roots.insert(key.clone(), layer);
    }
}

/// Maps a document id like `mymod:main/cow` to the key `mymod:cow#main`:
/// the first path segment names the layer, the rest the model path.
pub fn map_document_id(id: &str) -> Option<LayerKey> {
    let full: ModelId = match id.parse() {
        Ok(full) => full,
        Err(err) => {
            error!("invalid model document id '{id}': {err}");
            return None;
        }
    };
    let Some((layer, path)) = full.path().split_once('/') else {
        error!("model document id '{id}' must contain at least one folder");
        return None;
    };
    if layer.is_empty() {
        error!("model document id '{id}' has an empty layer folder");
        return None;
    }
    match ModelId::new(full.namespace(), path) {
        Ok(model) => Some(LayerKey::new(model, layer)),
        Err(err) => {
            error!("invalid model document id '{id}': {err}");
            None
        }
    }
}
