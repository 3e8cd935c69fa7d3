//! In-memory mail host backed by a serializable snapshot.

use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{
    Account, Folder, FolderId, HostError, MailHost, MessageHeader, MessageId, MessagePage,
    PageToken,
};
use crate::Result;

/// Default number of messages returned per listing page.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(size) => size,
    None => panic!("page size must be non-zero"),
};

/// Complete state of a mailbox: accounts, folder trees and messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxSnapshot {
    /// Permissions reported to the integration.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Accounts with their folder trees.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Messages per folder, in listing order.
    #[serde(default)]
    pub messages: BTreeMap<FolderId, Vec<MessageHeader>>,
}

impl MailboxSnapshot {
    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save the snapshot as pretty-printed JSON, creating parent directories.
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
        Ok(())
    }
}

/// A [`MailHost`] that keeps the whole mailbox in memory.
///
/// Listings are paginated with opaque continuation tokens, folder creation
/// rejects duplicate sibling names the way real hosts do, and a move batch
/// either relocates every message or none of them.
#[derive(Debug)]
pub struct InMemoryHost {
    state: Mutex<State>,
    page_size: NonZeroUsize,
}

#[derive(Debug, Default)]
struct State {
    snapshot: MailboxSnapshot,
    cursors: HashMap<PageToken, Cursor>,
    next_token: u64,
}

#[derive(Debug)]
struct Cursor {
    folder: FolderId,
    offset: usize,
}

impl InMemoryHost {
    /// Create a host serving the given snapshot.
    #[must_use]
    pub fn new(snapshot: MailboxSnapshot) -> Self {
        Self {
            state: Mutex::new(State {
                snapshot,
                ..State::default()
            }),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the number of messages per listing page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Current state of the mailbox.
    pub async fn snapshot(&self) -> MailboxSnapshot {
        self.state.lock().await.snapshot.clone()
    }

    /// Consume the host and return the mailbox state.
    #[must_use]
    pub fn into_snapshot(self) -> MailboxSnapshot {
        self.state.into_inner().snapshot
    }

    /// Messages currently stored in a folder.
    pub async fn messages_in(&self, folder: &FolderId) -> Vec<MessageHeader> {
        self.state
            .lock()
            .await
            .snapshot
            .messages
            .get(folder)
            .cloned()
            .unwrap_or_default()
    }

    /// Find a folder anywhere in the mailbox by its display path.
    pub async fn folder_by_path(&self, path: &str) -> Option<Folder> {
        let state = self.state.lock().await;
        let mut stack: Vec<&Folder> = state
            .snapshot
            .accounts
            .iter()
            .flat_map(|account| account.folders.iter().flatten().chain(&account.root_folder))
            .collect();

        while let Some(folder) = stack.pop() {
            if folder.display_path() == path {
                return Some(folder.clone());
            }
            stack.extend(folder.sub_folders.iter().flatten());
        }
        None
    }
}

impl State {
    fn page(
        &mut self,
        folder: &FolderId,
        offset: usize,
        page_size: usize,
    ) -> std::result::Result<MessagePage, HostError> {
        if find_folder(&self.snapshot.accounts, folder).is_none() {
            return Err(HostError::NotFound(format!("folder {folder}")));
        }

        let all = self
            .snapshot
            .messages
            .get(folder)
            .map_or(&[][..], Vec::as_slice);
        let end = offset.saturating_add(page_size).min(all.len());
        let messages = all.get(offset..end).unwrap_or_default().to_vec();
        let has_more = end < all.len();

        let continuation = if has_more {
            self.next_token += 1;
            let token = PageToken(format!("page-{}", self.next_token));
            self.cursors.insert(
                token.clone(),
                Cursor {
                    folder: folder.clone(),
                    offset: end,
                },
            );
            Some(token)
        } else {
            None
        };

        Ok(MessagePage {
            messages,
            continuation,
        })
    }
}

impl MailHost for InMemoryHost {
    async fn permissions(&self) -> std::result::Result<Vec<String>, HostError> {
        Ok(self.state.lock().await.snapshot.permissions.clone())
    }

    async fn list_accounts(&self) -> std::result::Result<Vec<Account>, HostError> {
        Ok(self.state.lock().await.snapshot.accounts.clone())
    }

    async fn list_messages(
        &self,
        folder: &FolderId,
    ) -> std::result::Result<MessagePage, HostError> {
        let mut state = self.state.lock().await;
        // A fresh listing abandons any earlier one of the same folder.
        state.cursors.retain(|_, cursor| cursor.folder != *folder);
        state.page(folder, 0, self.page_size.get())
    }

    async fn continue_list(
        &self,
        token: &PageToken,
    ) -> std::result::Result<MessagePage, HostError> {
        let mut state = self.state.lock().await;
        let cursor = state
            .cursors
            .remove(token)
            .ok_or_else(|| HostError::NotFound(format!("page token {token}")))?;
        state.page(&cursor.folder, cursor.offset, self.page_size.get())
    }

    async fn list_subfolders(
        &self,
        parent: &FolderId,
    ) -> std::result::Result<Vec<Folder>, HostError> {
        let state = self.state.lock().await;
        find_folder(&state.snapshot.accounts, parent)
            .map(|folder| folder.sub_folders.clone().unwrap_or_default())
            .ok_or_else(|| HostError::NotFound(format!("folder {parent}")))
    }

    async fn create_folder(
        &self,
        parent: &FolderId,
        name: &str,
    ) -> std::result::Result<Folder, HostError> {
        let mut state = self.state.lock().await;
        let parent_folder = find_folder_mut(&mut state.snapshot.accounts, parent)
            .ok_or_else(|| HostError::NotFound(format!("folder {parent}")))?;

        let path = format!("{}/{name}", parent_folder.display_path());
        let children = parent_folder.sub_folders.get_or_insert_with(Vec::new);
        if children.iter().any(|child| child.name == name) {
            return Err(HostError::AlreadyExists(format!("'{name}' under {parent}")));
        }

        let folder = Folder::new(format!("{parent}/{name}"), name)
            .with_path(path)
            .with_sub_folders(Vec::new());
        children.push(folder.clone());
        Ok(folder)
    }

    async fn move_messages(
        &self,
        ids: &[MessageId],
        target: &FolderId,
    ) -> std::result::Result<(), HostError> {
        let mut state = self.state.lock().await;
        if find_folder(&state.snapshot.accounts, target).is_none() {
            return Err(HostError::NotFound(format!("folder {target}")));
        }

        // Locate everything before touching anything so a batch is all-or-nothing.
        let mut located = Vec::with_capacity(ids.len());
        for id in ids {
            let source = state
                .snapshot
                .messages
                .iter()
                .find(|(_, messages)| messages.iter().any(|m| m.id == *id))
                .map(|(folder, _)| folder.clone())
                .ok_or_else(|| HostError::NotFound(format!("message {id}")))?;
            located.push((source, *id));
        }

        for (source, id) in located {
            let Some(messages) = state.snapshot.messages.get_mut(&source) else {
                continue;
            };
            let Some(position) = messages.iter().position(|m| m.id == id) else {
                continue;
            };
            let message = messages.remove(position);
            state
                .snapshot
                .messages
                .entry(target.clone())
                .or_default()
                .push(message);
        }

        Ok(())
    }
}

fn find_folder<'a>(accounts: &'a [Account], id: &FolderId) -> Option<&'a Folder> {
    accounts.iter().find_map(|account| {
        account
            .folders
            .as_deref()
            .and_then(|folders| find_in(folders, id))
            .or_else(|| {
                account
                    .root_folder
                    .as_ref()
                    .and_then(|root| find_in(std::slice::from_ref(root), id))
            })
    })
}

fn find_in<'a>(folders: &'a [Folder], id: &FolderId) -> Option<&'a Folder> {
    folders.iter().find_map(|folder| {
        if folder.id == *id {
            Some(folder)
        } else {
            folder
                .sub_folders
                .as_deref()
                .and_then(|children| find_in(children, id))
        }
    })
}

fn find_folder_mut<'a>(accounts: &'a mut [Account], id: &FolderId) -> Option<&'a mut Folder> {
    for account in accounts {
        if let Some(folders) = account.folders.as_deref_mut()
            && let Some(found) = find_in_mut(folders, id)
        {
            return Some(found);
        }
        if let Some(root) = account.root_folder.as_mut()
            && let Some(found) = find_in_mut(std::slice::from_mut(root), id)
        {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(folders: &'a mut [Folder], id: &FolderId) -> Option<&'a mut Folder> {
    for folder in folders {
        if folder.id == *id {
            return Some(folder);
        }
        if let Some(children) = folder.sub_folders.as_deref_mut()
            && let Some(found) = find_in_mut(children, id)
        {
            return Some(found);
        }
    }
    None
}
