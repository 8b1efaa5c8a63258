//! Filter Configuration
//!
//! Describes which fragments the engine is built from. The default is the
//! seed list alone.
//!
//! ```json
//! {
//!   "mode": "extend",
//!   "fragments": ["adnxs.com"],
//!   "lists": ["/etc/nova/extra.txt"]
//! }
//! ```

use crate::fragments::{FilterList, FilterListError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a JSON config file
pub const CONFIG_ENV_VAR: &str = "NOVA_FILTER_CONFIG";

/// How configured fragments combine with the seed list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    /// Seed list plus configured fragments
    #[default]
    Extend,
    /// Configured fragments only
    Replace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub mode: ListMode,
    /// Inline fragments
    pub fragments: Vec<String>,
    /// Plain-text list files, one fragment per line
    pub lists: Vec<PathBuf>,
}

impl FilterConfig {
    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FilterListError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        debug!("Loaded filter config from {:?}", path);
        Ok(config)
    }

    /// Config named by `NOVA_FILTER_CONFIG`, or the default when unset
    pub fn from_env() -> Result<Self, FilterListError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Compose and validate the filter list this config describes.
    pub fn build_list(&self) -> Result<FilterList, FilterListError> {
        let base = match self.mode {
            ListMode::Extend => FilterList::seed(),
            ListMode::Replace => FilterList::default(),
        };

        let mut list = base.with_fragments(self.fragments.iter().cloned())?;
        for path in &self.lists {
            let name = path.display().to_string();
            let file = File::open(path)?;
            list = list.extend(FilterList::parse(&name, file)?);
        }

        if list.is_empty() {
            return Err(FilterListError::Empty);
        }

        info!(
            "Filter list ready: {} fragments ({:?} mode, {} files)",
            list.len(),
            self.mode,
            self.lists.len()
        );
        Ok(list)
    }
}
