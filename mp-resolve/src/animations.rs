//! The animation registry: name registries plus reloadable snapshots.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use mp_codec::decode_animation;
use mp_model::{
    AnimationDef, INTERPOLATION_CATMULLROM, INTERPOLATION_LINEAR, ModelId, TARGET_POSITION,
    TARGET_ROTATION, TARGET_SCALE,
};
use tracing::{debug, error, warn};

/// Directory prefix animation documents live under.
pub const ANIMATIONS_DIRECTORY: &str = "animations/entity";

/// Known names for one lookup-by-name contract (interpolations or channel
/// targets). Hosts may register additional entries before the first
/// reload.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    known: HashSet<ModelId>,
}

impl NameRegistry {
    pub fn interpolations() -> Self {
        Self::seeded(&[INTERPOLATION_LINEAR, INTERPOLATION_CATMULLROM])
    }

    pub fn targets() -> Self {
        Self::seeded(&[TARGET_POSITION, TARGET_ROTATION, TARGET_SCALE])
    }

    fn seeded(names: &[&str]) -> Self {
        Self {
            known: names.iter().filter_map(|name| name.parse().ok()).collect(),
        }
    }

    pub fn register(&mut self, id: ModelId) {
        self.known.insert(id);
    }

    pub fn contains(&self, id: &ModelId) -> bool {
        self.known.contains(id)
    }
}

pub type AnimationRoots = HashMap<ModelId, AnimationDef>;

/// Reloadable animation definitions, published as immutable snapshots the
/// same way model layers are.
pub struct AnimationSet {
    interpolations: NameRegistry,
    targets: NameRegistry,
    current: RwLock<Arc<AnimationRoots>>,
}

impl Default for AnimationSet {
    fn default() -> Self {
        Self::with_registries(NameRegistry::interpolations(), NameRegistry::targets())
    }
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registries(interpolations: NameRegistry, targets: NameRegistry) -> Self {
        Self {
            interpolations,
            targets,
            current: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    pub fn snapshot(&self) -> Arc<AnimationRoots> {
        Arc::clone(&self.current.read().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn get(&self, id: &ModelId) -> Option<AnimationDef> {
        self.snapshot().get(id).cloned()
    }

    /// Decodes `(id, raw document)` pairs and publishes the result. One
    /// document per id; later entries win. Bad documents and unknown
    /// names are logged and skipped.
    pub fn reload(&self, documents: &[(String, String)]) {
        let mut definitions = HashMap::new();

        for (id, raw) in documents {
            let parsed: ModelId = match id.parse() {
                Ok(parsed) => parsed,
                Err(err) => {
                    error!("invalid animation document id '{id}': {err}");
                    continue;
                }
            };
            let def = match decode_animation(id, raw) {
                Ok(def) => def,
                Err(err) => {
                    warn!("skipping animation document: {err}");
                    continue;
                }
            };
            if let Err(unknown) = self.check_names(&def) {
                warn!("skipping animation '{id}': {unknown}");
                continue;
            }
            definitions.insert(parsed, def);
        }

        debug!("publishing {} animation definitions", definitions.len());
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(definitions);
    }

    fn check_names(&self, def: &AnimationDef) -> Result<(), String> {
        for channels in def.bone_animations.values() {
            for channel in channels {
                if !self.targets.contains(&channel.target) {
                    return Err(format!("unknown channel target '{}'", channel.target));
                }
                for keyframe in &channel.keyframes {
                    if !self.interpolations.contains(&keyframe.interpolation) {
                        return Err(format!(
                            "unknown interpolation '{}'",
                            keyframe.interpolation
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
