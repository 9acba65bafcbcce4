use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Options governing resolution and resource-name derivation
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LocalizationOptions {
    /// Insert an untranslated entry for every key that cannot be resolved
    pub auto_create_missing: bool,
    /// Subpath inserted into resource names, for modules without their own
    pub resources_path: Option<String>,
    /// Per-module overrides, keyed by module (crate or location) name
    pub modules: BTreeMap<String, ModuleConfig>,
}

/// Naming settings of one module
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ModuleConfig {
    /// Defaults to the module name
    pub root_namespace: Option<String>,
    /// Overrides `resources_path` for this module
    pub resource_location: Option<String>,
}

impl LocalizationOptions {
    /// Root namespace and resources subpath for `module`
    pub fn module_settings(&self, module: &str) -> (String, Option<String>) {
        let config = self.modules.get(module);
        let root = config
            .and_then(|c| c.root_namespace.clone())
            .unwrap_or_else(|| module.to_string());
        let subpath = config
            .and_then(|c| c.resource_location.clone())
            .or_else(|| self.resources_path.clone());
        (root, subpath)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LexstoreConfig {
    pub database: Option<String>,
    #[serde(default)]
    pub localization: LocalizationOptions,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("lexstore.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".lexstore").join("strings.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<LexstoreConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: LexstoreConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &LexstoreConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
