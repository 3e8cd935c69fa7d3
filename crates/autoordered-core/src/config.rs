//! Sorting configuration.

use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::folder::{FALLBACK_NAME, sanitize_name};
use crate::{Error, Result};

/// Name of the top-level folder created under each inbox.
pub const DEFAULT_ROOT_FOLDER: &str = "autoordered";

/// Number of messages moved per host call.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(200) {
    Some(size) => size,
    None => panic!("batch size must be non-zero"),
};

/// Settings for a sort run.
///
/// Missing fields fall back to their defaults, so an empty JSON object is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// Name of the container folder created under the inbox.
    pub root_folder_name: String,
    /// Maximum number of messages per move call.
    pub batch_size: NonZeroUsize,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            root_folder_name: DEFAULT_ROOT_FOLDER.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SortConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await? {
            tracing::debug!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        tracing::info!("Settings saved to {:?}", path);
        Ok(())
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the root folder name is blank or would
    /// sanitize to the fallback name without being that name.
    pub fn validate(&self) -> Result<()> {
        let name = self.root_folder_name.as_str();
        if name.trim().is_empty() {
            return Err(Error::Config("root_folder_name must not be empty".into()));
        }
        if name != FALLBACK_NAME && sanitize_name(Some(name)) == FALLBACK_NAME {
            return Err(Error::Config(format!(
                "root_folder_name '{name}' has no usable characters"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("autoordered-config-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_defaults() {
        let config = SortConfig::default();
        assert_eq!(config.root_folder_name, "autoordered");
        assert_eq!(config.batch_size.get(), 200);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SortConfig = serde_json::from_str(r#"{"batch_size": 50}"#).unwrap();
        assert_eq!(config.batch_size.get(), 50);
        assert_eq!(config.root_folder_name, "autoordered");
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(serde_json::from_str::<SortConfig>(r#"{"batch_size": 0}"#).is_err());
    }

    #[test]
    fn test_blank_root_rejected() {
        let config = SortConfig {
            root_folder_name: "  ".to_string(),
            ..SortConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_root_that_sanitizes_away_rejected() {
        let config = SortConfig {
            root_folder_name: "...".to_string(),
            ..SortConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let literal = SortConfig {
            root_folder_name: FALLBACK_NAME.to_string(),
            ..SortConfig::default()
        };
        assert!(literal.validate().is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let config = SortConfig::load(temp_path("does-not-exist.json")).await.unwrap();
        assert_eq!(config, SortConfig::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let path = temp_path("settings.json");
        let config = SortConfig {
            root_folder_name: "sorted".to_string(),
            batch_size: NonZeroUsize::new(25).unwrap(),
        };

        config.save(&path).await.unwrap();
        let loaded = SortConfig::load(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(loaded, config);
    }
}
