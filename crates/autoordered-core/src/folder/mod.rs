//! Folder naming, hierarchy resolution and provisioning.

mod path;
mod provision;
mod sanitize;

pub use path::{FolderPath, resolve_path};
pub use provision::{FolderAction, FolderCache, FolderOperationError, FolderProvisioner};
pub use sanitize::{FALLBACK_NAME, MAX_NAME_LEN, sanitize_name};
