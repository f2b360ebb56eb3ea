use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use super::kv_store::{KeyValueStore, StoreError};
use crate::grid::PolicyConfig;

/// Storage namespace holding every saved preset.
pub const PRESET_NAMESPACE: &str = "shift_presets";
/// Built-in preset carrying the canonical defaults. Read-only.
pub const DEFAULT_PRESET: &str = "default";
/// Marks values that were edited but never saved under a name.
pub const CUSTOM_PRESET: &str = "__custom__";

#[derive(Error, Debug)]
pub enum PresetError {
    #[error("Preset name is reserved: {0}")]
    Reserved(String),

    #[error("Preset name must not be empty")]
    InvalidName,

    #[error("Stored preset {name} is unreadable: {source}")]
    Corrupt {
        name: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: String,
    pub policy: PolicyConfig,
    pub built_in: bool,
}

impl Preset {
    fn built_in() -> Self {
        Self {
            name: DEFAULT_PRESET.to_string(),
            policy: PolicyConfig::default(),
            built_in: true,
        }
    }
}

/// Named threshold sets, kept outside the grid computation entirely.
#[derive(Clone)]
pub struct PresetRepository {
    store: Arc<dyn KeyValueStore>,
}

impl PresetRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn writable_name(name: &str) -> Result<&str, PresetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::InvalidName);
        }
        if name == DEFAULT_PRESET || name == CUSTOM_PRESET {
            return Err(PresetError::Reserved(name.to_string()));
        }
        Ok(name)
    }

    fn decode(name: String, raw: &str) -> Result<Preset, PresetError> {
        match serde_json::from_str(raw) {
            Ok(policy) => Ok(Preset {
                name,
                policy,
                built_in: false,
            }),
            Err(source) => Err(PresetError::Corrupt { name, source }),
        }
    }

    pub async fn get(&self, name: &str) -> Result<Option<Preset>, PresetError> {
        let name = name.trim();
        if name == DEFAULT_PRESET {
            return Ok(Some(Preset::built_in()));
        }
        if name == CUSTOM_PRESET {
            return Ok(None);
        }

        match self.store.get(PRESET_NAMESPACE, name).await? {
            Some(raw) => Self::decode(name.to_string(), &raw).map(Some),
            None => Ok(None),
        }
    }

    /// The built-in preset first, then saved presets by name. Unreadable
    /// entries are skipped and logged so one bad row cannot hide the rest.
    pub async fn list(&self) -> Result<Vec<Preset>, PresetError> {
        let mut presets = vec![Preset::built_in()];

        for (name, raw) in self.store.entries(PRESET_NAMESPACE).await? {
            match Self::decode(name, &raw) {
                Ok(preset) => presets.push(preset),
                Err(err) => log::warn!("Skipping preset: {}", err),
            }
        }

        Ok(presets)
    }

    pub async fn save(&self, name: &str, policy: PolicyConfig) -> Result<Preset, PresetError> {
        let name = Self::writable_name(name)?;
        let raw = serde_json::to_string(&policy).map_err(|source| PresetError::Corrupt {
            name: name.to_string(),
            source,
        })?;

        self.store.put(PRESET_NAMESPACE, name, raw).await?;
        log::info!("Saved preset {}", name);

        Ok(Preset {
            name: name.to_string(),
            policy,
            built_in: false,
        })
    }

    /// Returns whether a preset was removed.
    pub async fn delete(&self, name: &str) -> Result<bool, PresetError> {
        let name = Self::writable_name(name)?;
        let removed = self.store.remove(PRESET_NAMESPACE, name).await?;
        if removed {
            log::info!("Deleted preset {}", name);
        }
        Ok(removed)
    }
}
