//! Sort orchestration.
//!
//! A run walks every account in listing order:
//!
//! 1. locate the inbox in the account's folder tree
//! 2. list every page of the inbox
//! 3. group messages by sender domain
//! 4. provision `root/letter/base[/sub]` for each group with more than one
//!    message
//! 5. move the group's messages there in batches
//!
//! Failures are contained at the narrowest scope that makes sense: a batch,
//! a group, or an account. Only failing to enumerate accounts aborts the run.

mod inbox;
mod report;

pub use inbox::{find_inbox, locate_inbox, search_roots};
pub use report::{
    AccountOutcome, AccountReport, GroupReport, RunReport, SkipReason, SortPhase, SortSummary,
};

use tracing::{debug, error, info, warn};

use crate::config::SortConfig;
use crate::domain::{MessageGroup, group_by_domain};
use crate::folder::{FolderProvisioner, resolve_path};
use crate::host::{Account, Folder, FolderRef, MailHost, MessageHeader};
use crate::relocate::relocate;
use crate::{Error, Result};

/// Drives one sort run against a mail host.
pub struct Sorter<'a, H> {
    host: &'a H,
    config: &'a SortConfig,
}

impl<'a, H: MailHost> Sorter<'a, H> {
    /// Create a sorter for the given host and configuration.
    #[must_use]
    pub const fn new(host: &'a H, config: &'a SortConfig) -> Self {
        Self { host, config }
    }

    /// Sort the inbox of every account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Enumeration`] if permissions or accounts cannot be
    /// listed. Everything after that is recorded in the report instead.
    pub async fn run(&self) -> Result<RunReport> {
        info!(phase = %SortPhase::ListingAccounts, "Starting sort");
        let mut report = RunReport::start();

        // Folder lookups are cached for this run only.
        let mut provisioner = FolderProvisioner::new(self.host);

        let permissions = self.host.permissions().await.map_err(Error::Enumeration)?;
        debug!(?permissions, "Active permissions");

        let accounts = self
            .host
            .list_accounts()
            .await
            .map_err(Error::Enumeration)?;
        info!(count = accounts.len(), "Found accounts");

        for account in &accounts {
            let outcome = self.process_account(account, &mut provisioner).await;
            report.accounts.push(AccountReport {
                account: account.name.clone(),
                outcome,
            });
        }

        report.finish();
        info!(
            phase = %SortPhase::Idle,
            moved = report.messages_moved(),
            failures = report.has_failures(),
            "Sort complete"
        );
        Ok(report)
    }

    async fn process_account(
        &self,
        account: &Account,
        provisioner: &mut FolderProvisioner<'a, H>,
    ) -> AccountOutcome {
        debug!(
            account = %account.name,
            phase = %SortPhase::ResolvingInbox,
            "Inspecting account"
        );

        let inbox = match locate_inbox(account) {
            Ok(inbox) => inbox,
            Err(reason) => {
                warn!(account = %account.name, %reason, "Skipping account");
                return AccountOutcome::Skipped { reason };
            }
        };

        info!(account = %account.name, inbox = %inbox.display_path(), "Processing inbox");
        match self.process_inbox(inbox, provisioner).await {
            Ok(summary) => AccountOutcome::Sorted(summary),
            Err((phase, e)) => {
                error!(account = %account.name, %phase, error = %e, "Account processing failed");
                AccountOutcome::Failed {
                    phase,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn process_inbox(
        &self,
        inbox: &Folder,
        provisioner: &mut FolderProvisioner<'a, H>,
    ) -> std::result::Result<SortSummary, (SortPhase, Error)> {
        let mut summary = SortSummary {
            inbox: inbox.display_path().to_string(),
            ..SortSummary::default()
        };

        let messages = self
            .list_all_messages(inbox)
            .await
            .map_err(|e| (SortPhase::ListingMessages, e))?;
        summary.messages_seen = messages.len();
        if messages.is_empty() {
            info!(inbox = %summary.inbox, "Inbox is empty");
            return Ok(summary);
        }

        info!(
            inbox = %summary.inbox,
            count = messages.len(),
            phase = %SortPhase::Grouping,
            "Analyzing messages"
        );
        let groups = group_by_domain(&messages);
        summary.unparsed = groups.skipped();
        summary.domains = groups.len();

        let eligible: Vec<MessageGroup> = groups
            .into_iter()
            .filter(MessageGroup::is_eligible)
            .collect();
        if eligible.is_empty() {
            info!(inbox = %summary.inbox, "No domains with multiple messages");
            return Ok(summary);
        }
        info!(count = eligible.len(), "Found domain groups to move");

        let created_before = provisioner.created();
        let root = provisioner
            .ensure(&inbox.to_ref(), &self.config.root_folder_name)
            .await
            .map_err(|e| (SortPhase::ProvisioningFolders, Error::from(e)))?;

        for group in &eligible {
            summary.groups.push(self.relocate_group(group, &root, provisioner).await);
        }

        summary.folders_created = provisioner.created() - created_before;
        Ok(summary)
    }

    async fn relocate_group(
        &self,
        group: &MessageGroup,
        root: &FolderRef,
        provisioner: &mut FolderProvisioner<'a, H>,
    ) -> GroupReport {
        let domain = group.meta.full().to_string();
        let path = resolve_path(&self.config.root_folder_name, &group.meta);

        let target = match provisioner.ensure_path(root, path.below_root()).await {
            Ok(target) => target,
            Err(e) => {
                error!(%domain, %path, error = %e, "Failed to provision folders");
                return GroupReport {
                    domain,
                    target: None,
                    messages: group.ids.len(),
                    moved: 0,
                    failed_batches: Vec::new(),
                    error: Some(e.to_string()),
                };
            }
        };

        info!(
            %domain,
            count = group.ids.len(),
            folder = %target.path,
            phase = %SortPhase::Relocating,
            "Moving messages"
        );
        let outcome = relocate(self.host, &group.ids, &target, self.config.batch_size).await;

        GroupReport {
            domain,
            target: Some(target.path),
            messages: group.ids.len(),
            moved: outcome.moved,
            failed_batches: outcome.failures,
            error: None,
        }
    }

    /// Fetch every page of a folder listing, in page order.
    async fn list_all_messages(&self, folder: &Folder) -> Result<Vec<MessageHeader>> {
        let listing_error = |source| Error::Listing {
            folder: folder.display_path().to_string(),
            source,
        };

        let mut page = self
            .host
            .list_messages(&folder.id)
            .await
            .map_err(listing_error)?;
        let mut messages = std::mem::take(&mut page.messages);

        while let Some(token) = page.continuation.take() {
            page = self
                .host
                .continue_list(&token)
                .await
                .map_err(listing_error)?;
            messages.append(&mut page.messages);
        }

        Ok(messages)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::num::NonZeroUsize;

    use crate::host::{FolderId, FolderType, InMemoryHost, MailboxSnapshot, MessageId};

    fn inbox() -> Folder {
        Folder::new("acc1/INBOX", "Inbox")
            .with_type(FolderType::Inbox)
            .with_path("/INBOX")
    }

    fn host(authors: &[&str]) -> InMemoryHost {
        let messages = authors
            .iter()
            .zip(1..)
            .map(|(author, id)| MessageHeader::new(id, *author))
            .collect();
        InMemoryHost::new(MailboxSnapshot {
            permissions: Vec::new(),
            accounts: vec![Account::new("acc1", "Work").with_folders(vec![inbox()])],
            messages: BTreeMap::from([(FolderId::new("acc1/INBOX"), messages)]),
        })
    }

    #[tokio::test]
    async fn test_list_all_messages_concatenates_pages() {
        let authors: Vec<String> = (0..7).map(|i| format!("u{i}@example.com")).collect();
        let authors: Vec<&str> = authors.iter().map(String::as_str).collect();
        let host = host(&authors).with_page_size(NonZeroUsize::new(3).unwrap());
        let config = SortConfig::default();

        let messages = Sorter::new(&host, &config)
            .list_all_messages(&inbox())
            .await
            .unwrap();

        let ids: Vec<_> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, (1..=7).map(MessageId).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_run_moves_eligible_groups_only() {
        let host = host(&[
            "a@news.example.com",
            "b@solo.org",
            "c@news.example.com",
        ]);
        let config = SortConfig::default();

        let report = Sorter::new(&host, &config).run().await.unwrap();

        let AccountOutcome::Sorted(summary) = &report.accounts[0].outcome else {
            panic!("expected sorted outcome");
        };
        assert_eq!(summary.messages_seen, 3);
        assert_eq!(summary.domains, 2);
        assert_eq!(summary.groups.len(), 1);
        assert_eq!(
            summary.groups[0].target.as_deref(),
            Some("/INBOX/autoordered/e/example.com/news")
        );
        assert_eq!(summary.folders_created, 4);

        let remaining = host.messages_in(&FolderId::new("acc1/INBOX")).await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, MessageId(2));
    }

    #[tokio::test]
    async fn test_no_eligible_groups_creates_nothing() {
        let host = host(&["a@one.com", "b@two.com"]);
        let config = SortConfig::default();

        let report = Sorter::new(&host, &config).run().await.unwrap();

        let AccountOutcome::Sorted(summary) = &report.accounts[0].outcome else {
            panic!("expected sorted outcome");
        };
        assert!(summary.groups.is_empty());
        assert!(host.folder_by_path("/INBOX/autoordered").await.is_none());
    }
}
