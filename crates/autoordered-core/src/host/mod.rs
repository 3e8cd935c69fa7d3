//! Boundary to the mail client that owns the mailbox.
//!
//! The sorter never talks to a mail store directly. Everything it needs
//! (accounts, folder trees, message listings, folder creation and moves)
//! goes through [`MailHost`], so the core can run against a real client
//! integration or against [`InMemoryHost`] in tests.

mod memory;
mod model;

pub use memory::{InMemoryHost, MailboxSnapshot};
pub use model::{
    Account, AccountId, Folder, FolderId, FolderRef, FolderType, MessageHeader, MessageId,
    MessagePage, PageToken,
};

/// Errors reported by a mail host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The referenced folder, message or page token does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A folder with the same name already exists under the parent.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The host refused or failed the operation.
    #[error("Operation failed: {0}")]
    Operation(String),
}

/// Asynchronous mailbox API provided by the mail client.
///
/// Every call is a suspension point. The sorter awaits each call before
/// issuing the next one and never calls concurrently into the same host.
#[allow(async_fn_in_trait)] // driven from a single task; no Send bound needed
pub trait MailHost {
    /// Lists the permissions granted to the integration.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot report permissions.
    async fn permissions(&self) -> Result<Vec<String>, HostError>;

    /// Lists all accounts, including their folder trees where available.
    ///
    /// # Errors
    ///
    /// Returns an error if accounts cannot be enumerated.
    async fn list_accounts(&self) -> Result<Vec<Account>, HostError>;

    /// Returns the first page of messages in a folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be listed.
    async fn list_messages(&self, folder: &FolderId) -> Result<MessagePage, HostError>;

    /// Returns the page following a previous listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unknown or the listing fails.
    async fn continue_list(&self, token: &PageToken) -> Result<MessagePage, HostError>;

    /// Lists the direct children of a folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent cannot be listed.
    async fn list_subfolders(&self, parent: &FolderId) -> Result<Vec<Folder>, HostError>;

    /// Creates a folder named `name` under `parent` and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be created.
    async fn create_folder(&self, parent: &FolderId, name: &str) -> Result<Folder, HostError>;

    /// Moves messages into `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the move fails.
    async fn move_messages(&self, ids: &[MessageId], target: &FolderId) -> Result<(), HostError>;
}
