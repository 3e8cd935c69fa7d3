//! Host mailbox data models.
//!
//! These mirror the objects handed out by a mail client's extension API.
//! Hosts differ in which fields they populate, so everything beyond an id
//! and a name is optional.

use serde::{Deserialize, Serialize};

/// Unique identifier for an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    /// Create a new account ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub String);

impl FolderId {
    /// Create a new folder ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque continuation token for paginated message listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(pub String);

impl std::fmt::Display for PageToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type of folder, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderType {
    /// Inbox folder.
    Inbox,
    /// Sent mail folder.
    Sent,
    /// Drafts folder.
    Drafts,
    /// Trash folder.
    Trash,
    /// Spam/junk folder.
    #[serde(rename = "junk", alias = "spam")]
    Spam,
    /// Archive folder.
    #[serde(rename = "archives", alias = "archive")]
    Archive,
    /// Templates folder.
    Templates,
    /// Outbox folder.
    Outbox,
    /// Regular folder, or any type this crate does not know about.
    #[serde(other)]
    Regular,
}

/// A folder in an account's folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Host identifier.
    pub id: FolderId,
    /// Display name.
    pub name: String,
    /// Full path (including hierarchy), if the host reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Special-use type, if the host reports one.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub folder_type: Option<FolderType>,
    /// Child folders, if the host includes them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_folders: Option<Vec<Self>>,
}

impl Folder {
    /// Creates a folder with only an id and a name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: FolderId::new(id),
            name: name.into(),
            path: None,
            folder_type: None,
            sub_folders: None,
        }
    }

    /// Sets the folder type.
    #[must_use]
    pub fn with_type(mut self, folder_type: FolderType) -> Self {
        self.folder_type = Some(folder_type);
        self
    }

    /// Sets the full path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the child folders.
    #[must_use]
    pub fn with_sub_folders(mut self, sub_folders: Vec<Self>) -> Self {
        self.sub_folders = Some(sub_folders);
        self
    }

    /// Whether this folder is an inbox, by type or by name.
    #[must_use]
    pub fn is_inbox(&self) -> bool {
        self.folder_type == Some(FolderType::Inbox) || self.name.eq_ignore_ascii_case("inbox")
    }

    /// Path for display: the host path when known, the id otherwise.
    #[must_use]
    pub fn display_path(&self) -> &str {
        self.path.as_deref().unwrap_or(self.id.as_str())
    }

    /// Lightweight reference to this folder.
    #[must_use]
    pub fn to_ref(&self) -> FolderRef {
        FolderRef {
            id: self.id.clone(),
            name: self.name.clone(),
            path: self.display_path().to_string(),
        }
    }
}

/// Resolved reference to a folder, used as a move target or a parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FolderRef {
    /// Host identifier.
    pub id: FolderId,
    /// Display name.
    pub name: String,
    /// Full path, for logging and reports.
    pub path: String,
}

impl FolderRef {
    /// Reference to `folder`, a direct child of `parent`.
    ///
    /// Hosts that omit paths get one derived from the parent's.
    #[must_use]
    pub fn child_of(parent: &Self, folder: &Folder) -> Self {
        let path = folder
            .path
            .clone()
            .unwrap_or_else(|| format!("{}/{}", parent.path, folder.name));
        Self {
            id: folder.id.clone(),
            name: folder.name.clone(),
            path,
        }
    }
}

/// A mail account and whatever part of its folder tree the host exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Host identifier.
    pub id: AccountId,
    /// Display name for the account.
    pub name: String,
    /// Top-level folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folders: Option<Vec<Folder>>,
    /// Root folder with its subtree, offered by some hosts instead of `folders`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<Folder>,
}

impl Account {
    /// Create an account with no folder information.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: AccountId::new(id),
            name: name.into(),
            folders: None,
            root_folder: None,
        }
    }

    /// Sets the top-level folders.
    #[must_use]
    pub fn with_folders(mut self, folders: Vec<Folder>) -> Self {
        self.folders = Some(folders);
        self
    }

    /// Sets the root folder.
    #[must_use]
    pub fn with_root_folder(mut self, root: Folder) -> Self {
        self.root_folder = Some(root);
        self
    }
}

/// The header fields of a message that sorting needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    /// Host identifier.
    pub id: MessageId,
    /// Raw author header, usually `Name <user@domain>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl MessageHeader {
    /// Creates a message header.
    #[must_use]
    pub fn new(id: u64, author: impl Into<String>) -> Self {
        Self {
            id: MessageId(id),
            author: Some(author.into()),
        }
    }
}

/// One page of a message listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePage {
    /// Messages on this page.
    pub messages: Vec<MessageHeader>,
    /// Token for the next page; `None` on the last page.
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<PageToken>,
}
