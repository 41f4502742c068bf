//! Write definitions back out as pretty-printed JSON documents.
//!
//! Inspection and debugging path: any resolved or authored definition can
//! be dumped, re-edited and re-ingested. Exported files land under
//! `<root>/<namespace>/<layer>/<model-path>.json`, the same layout the
//! reload path maps back to keys.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use mp_model::{AnimationDef, LayerDef, LayerKey, ModelId};
use tracing::info;

use crate::animation::encode_animation_pretty;
use crate::error::ExportError;
use crate::layer::encode_layer_pretty;

pub const EXPORT_ROOT_ENV: &str = "MODELPACK_EXPORT_ROOT";

/// Default export root: env override first, `model_export/` otherwise.
pub fn export_root() -> PathBuf {
    if let Ok(explicit) = std::env::var(EXPORT_ROOT_ENV) {
        return PathBuf::from(explicit);
    }
    PathBuf::from("model_export")
}

/// Exports one layer definition; `Ok(None)` when the key is unknown.
pub fn export_single(
    export_folder: &Path,
    key: &LayerKey,
    roots: &HashMap<LayerKey, LayerDef>,
) -> Result<Option<PathBuf>, ExportError> {
    let Some(layer) = roots.get(key) else {
        return Ok(None);
    };
    let path = layer_output_path(export_folder, key);
    write_pretty(&path, &encode_layer_pretty(layer)?)?;
    Ok(Some(path))
}

/// Exports every layer definition in `roots`; returns the count written.
pub fn export_all(
    export_folder: &Path,
    roots: &HashMap<LayerKey, LayerDef>,
) -> Result<usize, ExportError> {
    export_filtered(export_folder, roots, |_| true)
}

/// Exports the layer definitions whose key passes `filter`.
pub fn export_filtered(
    export_folder: &Path,
    roots: &HashMap<LayerKey, LayerDef>,
    filter: impl Fn(&LayerKey) -> bool,
) -> Result<usize, ExportError> {
    if export_folder.is_file() {
        return Err(ExportError::NotADirectory(export_folder.to_path_buf()));
    }

    let mut count = 0;
    for (key, layer) in roots {
        if !filter(key) {
            continue;
        }
        write_pretty(&layer_output_path(export_folder, key), &encode_layer_pretty(layer)?)?;
        count += 1;
    }

    info!("exported {count} layer definitions to {export_folder:?}");
    Ok(count)
}

/// Exports one animation definition to `<root>/<namespace>/<path>.json`.
pub fn export_animation(
    export_folder: &Path,
    id: &ModelId,
    def: &AnimationDef,
) -> Result<PathBuf, ExportError> {
    let path = export_folder
        .join(id.namespace())
        .join(format!("{}.json", id.path()));
    write_pretty(&path, &encode_animation_pretty(def)?)?;
    Ok(path)
}

fn layer_output_path(export_folder: &Path, key: &LayerKey) -> PathBuf {
    export_folder
        .join(key.model.namespace())
        .join(&key.layer)
        .join(format!("{}.json", key.model.path()))
}

fn write_pretty(path: &Path, contents: &str) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::decode_layer;
    use mp_model::{MaterialDef, PartDef};

    fn sample_roots() -> HashMap<LayerKey, LayerDef> {
        let mut root = PartDef::default();
        root.children.insert("head".into(), PartDef::default());
        HashMap::from([
            (
                "mymod:cow#main".parse().unwrap(),
                LayerDef::plain(root.clone(), MaterialDef::default()),
            ),
            (
                "mymod:entity/pig#saddle".parse().unwrap(),
                LayerDef::plain(root, MaterialDef::new(64, 64)),
            ),
        ])
    }

    #[test]
    fn export_single_round_trips_through_decode() {
        let dir = tempfile::tempdir().unwrap();
        let key: LayerKey = "mymod:cow#main".parse().unwrap();
        let roots = sample_roots();

        let path = export_single(dir.path(), &key, &roots).unwrap().unwrap();
        assert_eq!(path, dir.path().join("mymod/main/cow.json"));

        let raw = fs::read_to_string(&path).unwrap();
        let decoded = decode_layer("reimport", &raw).unwrap();
        assert_eq!(decoded.mesh.root(), roots[&key].mesh.root());
    }

    #[test]
    fn export_single_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let key: LayerKey = "mymod:ghost#main".parse().unwrap();
        assert_eq!(export_single(dir.path(), &key, &sample_roots()).unwrap(), None);
    }

    #[test]
    fn filtered_export_counts_and_nests_paths() {
        let dir = tempfile::tempdir().unwrap();
        let count = export_filtered(dir.path(), &sample_roots(), |key| {
            key.layer == "saddle"
        })
        .unwrap();
        assert_eq!(count, 1);
        assert!(dir.path().join("mymod/saddle/entity/pig.json").is_file());
    }

    #[test]
    fn export_refuses_a_file_target() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            export_all(&file, &sample_roots()),
            Err(ExportError::NotADirectory(_))
        ));
    }
}
