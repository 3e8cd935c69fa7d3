//! Inbox discovery in an account's folder tree.

use tracing::debug;

use super::report::SkipReason;
use crate::host::{Account, Folder};

/// Top-level folders to search for the account's inbox.
///
/// Prefers the account's folder list. Hosts that only expose a root folder
/// are searched from that root, provided it carries its subfolders.
///
/// # Errors
///
/// Returns the [`SkipReason`] when there is no tree to search.
pub fn search_roots(account: &Account) -> Result<&[Folder], SkipReason> {
    if let Some(folders) = account.folders.as_deref()
        && !folders.is_empty()
    {
        return Ok(folders);
    }

    match &account.root_folder {
        Some(root) if root.sub_folders.is_some() => {
            debug!(account = %account.name, "No folder list, searching from root folder");
            Ok(std::slice::from_ref(root))
        }
        Some(_) => Err(SkipReason::NoFolderTree),
        None => Err(SkipReason::NoFolders),
    }
}

/// Depth-first search for the first inbox, in listing order.
#[must_use]
pub fn find_inbox(roots: &[Folder]) -> Option<&Folder> {
    let mut stack: Vec<&Folder> = roots.iter().rev().collect();

    while let Some(folder) = stack.pop() {
        if folder.is_inbox() {
            debug!(folder = %folder.name, folder_type = ?folder.folder_type, "Found inbox");
            return Some(folder);
        }
        if let Some(children) = folder.sub_folders.as_deref() {
            stack.extend(children.iter().rev());
        }
    }

    None
}

/// Locate the inbox of an account.
///
/// # Errors
///
/// Returns the [`SkipReason`] when the account has no searchable tree or
/// no inbox in it.
pub fn locate_inbox(account: &Account) -> Result<&Folder, SkipReason> {
    let roots = search_roots(account)?;
    find_inbox(roots).ok_or(SkipReason::NoInbox)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::FolderType;

    #[test]
    fn test_prefers_folder_list() {
        let account = Account::new("a", "Work")
            .with_folders(vec![Folder::new("a/INBOX", "Inbox")])
            .with_root_folder(
                Folder::new("a/", "root").with_sub_folders(vec![Folder::new("a/Other", "Inbox")]),
            );

        assert_eq!(locate_inbox(&account).unwrap().id.as_str(), "a/INBOX");
    }

    #[test]
    fn test_falls_back_to_root_folder() {
        let root = Folder::new("a/", "root").with_sub_folders(vec![
            Folder::new("a/Sent", "Sent"),
            Folder::new("a/INBOX", "Posteingang").with_type(FolderType::Inbox),
        ]);
        let account = Account::new("a", "Work")
            .with_folders(Vec::new())
            .with_root_folder(root);

        assert_eq!(locate_inbox(&account).unwrap().name, "Posteingang");
    }

    #[test]
    fn test_root_without_subfolders_is_skipped() {
        let account = Account::new("a", "Work").with_root_folder(Folder::new("a/", "root"));
        assert_eq!(locate_inbox(&account), Err(SkipReason::NoFolderTree));
    }

    #[test]
    fn test_no_folders_is_skipped() {
        let account = Account::new("a", "Work");
        assert_eq!(locate_inbox(&account), Err(SkipReason::NoFolders));
    }

    #[test]
    fn test_no_inbox_is_skipped() {
        let account = Account::new("a", "Work").with_folders(vec![Folder::new("a/Sent", "Sent")]);
        assert_eq!(locate_inbox(&account), Err(SkipReason::NoInbox));
    }

    #[test]
    fn test_depth_first_in_listing_order() {
        // The nested inbox under the first top-level folder is found before
        // the second top-level one.
        let roots = vec![
            Folder::new("a/Local", "Local").with_sub_folders(vec![
                Folder::new("a/Local/Archive", "Archive"),
                Folder::new("a/Local/INBOX", "INBOX"),
            ]),
            Folder::new("a/INBOX", "Inbox").with_type(FolderType::Inbox),
        ];

        assert_eq!(find_inbox(&roots).unwrap().id.as_str(), "a/Local/INBOX");
    }
}
