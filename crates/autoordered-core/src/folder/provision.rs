//! Idempotent folder creation.

use std::collections::HashMap;

use tracing::{debug, info};

use super::sanitize::sanitize_name;
use crate::host::{FolderId, FolderRef, HostError, MailHost};

/// Host call that failed while provisioning a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderAction {
    /// Listing the parent's children.
    List,
    /// Creating the folder.
    Create,
}

impl std::fmt::Display for FolderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List => write!(f, "look up"),
            Self::Create => write!(f, "create"),
        }
    }
}

/// Folder lookup or creation failed.
#[derive(Debug, thiserror::Error)]
#[error("Failed to {action} folder '{name}' under '{parent}': {source}")]
pub struct FolderOperationError {
    /// Path of the parent folder.
    pub parent: String,
    /// Sanitized name of the intended child.
    pub name: String,
    /// Which host call failed.
    pub action: FolderAction,
    /// Underlying host error.
    #[source]
    pub source: HostError,
}

/// Lookup cache for provisioned folders, keyed by parent and sanitized name.
///
/// Scoped to a single run; a new run starts with an empty cache.
#[derive(Debug, Default)]
pub struct FolderCache {
    entries: HashMap<(FolderId, String), FolderRef>,
}

impl FolderCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached child of `parent` named `name`.
    #[must_use]
    pub fn get(&self, parent: &FolderId, name: &str) -> Option<&FolderRef> {
        self.entries.get(&(parent.clone(), name.to_string()))
    }

    /// Remember `folder` as the child of `parent` named `name`.
    pub fn insert(&mut self, parent: &FolderId, name: &str, folder: FolderRef) {
        self.entries.insert((parent.clone(), name.to_string()), folder);
    }
}

/// Ensures folders exist, reusing existing ones and creating the rest.
pub struct FolderProvisioner<'h, H> {
    host: &'h H,
    cache: FolderCache,
    created: usize,
}

impl<'h, H: MailHost> FolderProvisioner<'h, H> {
    /// Create a provisioner with an empty cache.
    #[must_use]
    pub fn new(host: &'h H) -> Self {
        Self {
            host,
            cache: FolderCache::new(),
            created: 0,
        }
    }

    /// Return the child of `parent` named `name`, creating it if needed.
    ///
    /// `name` is sanitized first, so lookup and creation use the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if listing the parent's children or creating the
    /// folder fails.
    pub async fn ensure(
        &mut self,
        parent: &FolderRef,
        name: &str,
    ) -> Result<FolderRef, FolderOperationError> {
        let name = sanitize_name(Some(name));
        if let Some(cached) = self.cache.get(&parent.id, &name) {
            return Ok(cached.clone());
        }

        let children = self
            .host
            .list_subfolders(&parent.id)
            .await
            .map_err(|source| Self::failure(parent, &name, FolderAction::List, source))?;

        let folder = if let Some(existing) = children.into_iter().find(|f| f.name == name) {
            debug!(parent = %parent.path, folder = %name, "Reusing folder");
            existing
        } else {
            let created = self
                .host
                .create_folder(&parent.id, &name)
                .await
                .map_err(|source| Self::failure(parent, &name, FolderAction::Create, source))?;
            self.created += 1;
            info!(parent = %parent.path, folder = %name, "Created folder");
            created
        };

        let folder = FolderRef::child_of(parent, &folder);
        self.cache.insert(&parent.id, &name, folder.clone());
        Ok(folder)
    }

    /// Ensure every segment below `base` in turn and return the deepest.
    ///
    /// # Errors
    ///
    /// Returns the first failure; folders created before it remain.
    pub async fn ensure_path(
        &mut self,
        base: &FolderRef,
        segments: &[String],
    ) -> Result<FolderRef, FolderOperationError> {
        let mut current = base.clone();
        for segment in segments {
            current = self.ensure(&current, segment).await?;
        }
        Ok(current)
    }

    /// Number of folders created by this provisioner.
    #[must_use]
    pub const fn created(&self) -> usize {
        self.created
    }

    /// The lookup cache built so far.
    #[must_use]
    pub const fn cache(&self) -> &FolderCache {
        &self.cache
    }

    fn failure(
        parent: &FolderRef,
        name: &str,
        action: FolderAction,
        source: HostError,
    ) -> FolderOperationError {
        FolderOperationError {
            parent: parent.path.clone(),
            name: name.to_string(),
            action,
            source,
        }
    }
}
