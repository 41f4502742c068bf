//! Namespaced model ids and composite layer keys.
//!
//! A layer key addresses one mergeable definition and is written
//! `namespace:path#layer`, e.g. `mymod:cow#main`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Namespace assumed for bare model paths with no `:` prefix.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("not a valid model layer key: {0}, missing layer (part after hashtag)")]
    MissingLayer(String),
    #[error("not a valid model layer key: {0}, missing model (part before hashtag)")]
    MissingModel(String),
    #[error("not a valid identifier: {id}, {reason}")]
    InvalidIdentifier { id: String, reason: &'static str },
}

/// A namespaced model identifier, `namespace:path`.
///
/// Namespaces are lowercase `[a-z0-9_.-]`; paths additionally allow `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId {
    namespace: String,
    path: String,
}

impl ModelId {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, KeyError> {
        let namespace = namespace.into();
        let path = path.into();
        if namespace.is_empty() || !namespace.chars().all(valid_namespace_char) {
            return Err(KeyError::InvalidIdentifier {
                id: format!("{namespace}:{path}"),
                reason: "non [a-z0-9_.-] character in namespace",
            });
        }
        if path.is_empty() || !path.chars().all(valid_path_char) {
            return Err(KeyError::InvalidIdentifier {
                id: format!("{namespace}:{path}"),
                reason: "non [a-z0-9/._-] character in path",
            });
        }
        Ok(Self { namespace, path })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl FromStr for ModelId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, KeyError> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

fn valid_namespace_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-')
}

fn valid_path_char(c: char) -> bool {
    valid_namespace_char(c) || c == '/'
}

/// Addresses one layer of one model: the lookup key for every
/// definition map in this workspace. Formatted `model#layer`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerKey {
    pub model: ModelId,
    pub layer: String,
}

impl LayerKey {
    pub fn new(model: ModelId, layer: impl Into<String>) -> Self {
        Self {
            model,
            layer: layer.into(),
        }
    }
}

impl FromStr for LayerKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, KeyError> {
        let Some((model, layer)) = s.split_once('#') else {
            return Err(KeyError::MissingLayer(s.to_string()));
        };
        if layer.is_empty() {
            return Err(KeyError::MissingLayer(s.to_string()));
        }
        if layer.contains('#') {
            return Err(KeyError::InvalidIdentifier {
                id: s.to_string(),
                reason: "more than one '#' delimiter",
            });
        }
        if model.is_empty() {
            return Err(KeyError::MissingModel(s.to_string()));
        }
        Ok(Self::new(model.parse()?, layer))
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.model, self.layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_key() {
        let key: LayerKey = "mymod:cow#main".parse().unwrap();
        assert_eq!(key.model.namespace(), "mymod");
        assert_eq!(key.model.path(), "cow");
        assert_eq!(key.layer, "main");
        assert_eq!(key.to_string(), "mymod:cow#main");
    }

    #[test]
    fn bare_model_defaults_namespace() {
        let key: LayerKey = "cow#main".parse().unwrap();
        assert_eq!(key.model.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(key.to_string(), "minecraft:cow#main");
    }

    #[test]
    fn missing_layer() {
        assert_eq!(
            "mymod:cow".parse::<LayerKey>(),
            Err(KeyError::MissingLayer("mymod:cow".to_string()))
        );
        assert_eq!(
            "mymod:cow#".parse::<LayerKey>(),
            Err(KeyError::MissingLayer("mymod:cow#".to_string()))
        );
    }

    #[test]
    fn missing_model() {
        assert_eq!(
            "#main".parse::<LayerKey>(),
            Err(KeyError::MissingModel("#main".to_string()))
        );
    }

    #[test]
    fn rejects_invalid_identifier() {
        assert!(matches!(
            "My Mod:cow#main".parse::<LayerKey>(),
            Err(KeyError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            "mymod:#main".parse::<LayerKey>(),
            Err(KeyError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn rejects_second_delimiter() {
        assert!(matches!(
            "mymod:cow#main#extra".parse::<LayerKey>(),
            Err(KeyError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn nested_paths_are_valid() {
        let id: ModelId = "mymod:entity/cow".parse().unwrap();
        assert_eq!(id.path(), "entity/cow");
    }
}
