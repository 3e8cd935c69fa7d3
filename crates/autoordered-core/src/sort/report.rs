//! Run reports.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::relocate::BatchFailure;

/// Stage of the sort state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPhase {
    /// Not running.
    Idle,
    /// Fetching permissions and accounts.
    ListingAccounts,
    /// Searching an account's folder tree for its inbox.
    ResolvingInbox,
    /// Fetching every page of the inbox listing.
    ListingMessages,
    /// Grouping messages by sender domain.
    Grouping,
    /// Creating or reusing target folders.
    ProvisioningFolders,
    /// Moving messages in batches.
    Relocating,
}

impl SortPhase {
    /// Convert to a string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ListingAccounts => "listing_accounts",
            Self::ResolvingInbox => "resolving_inbox",
            Self::ListingMessages => "listing_messages",
            Self::Grouping => "grouping",
            Self::ProvisioningFolders => "provisioning_folders",
            Self::Relocating => "relocating",
        }
    }
}

impl std::fmt::Display for SortPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why an account was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The host exposed neither folders nor a root folder.
    NoFolders,
    /// The root folder came without its subfolders.
    NoFolderTree,
    /// No folder in the tree looks like an inbox.
    NoInbox,
}

impl SkipReason {
    /// Human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::NoFolders => "no folders exposed for account",
            Self::NoFolderTree => "root folder has no subfolder tree",
            Self::NoInbox => "no inbox found",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// What happened to one domain group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    /// Full sender domain.
    pub domain: String,
    /// Target folder path, if it could be provisioned.
    pub target: Option<String>,
    /// Messages in the group.
    pub messages: usize,
    /// Messages actually moved.
    pub moved: usize,
    /// Move batches that failed.
    pub failed_batches: Vec<BatchFailure>,
    /// Provisioning error that prevented any move.
    pub error: Option<String>,
}

/// Summary of a sorted inbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortSummary {
    /// Path of the inbox that was sorted.
    pub inbox: String,
    /// Messages listed in the inbox.
    pub messages_seen: usize,
    /// Messages whose author had no parseable domain.
    pub unparsed: usize,
    /// Distinct sender domains.
    pub domains: usize,
    /// Folders created during this account's processing.
    pub folders_created: usize,
    /// Eligible groups, in first-seen order.
    pub groups: Vec<GroupReport>,
}

impl SortSummary {
    /// Total messages moved.
    #[must_use]
    pub fn moved(&self) -> usize {
        self.groups.iter().map(|g| g.moved).sum()
    }
}

/// Outcome of processing one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccountOutcome {
    /// The inbox was processed (possibly with per-group failures).
    Sorted(SortSummary),
    /// The account had nothing that could be sorted.
    Skipped {
        /// Why the account was skipped.
        reason: SkipReason,
    },
    /// Processing stopped part way.
    Failed {
        /// Stage at which processing stopped.
        phase: SortPhase,
        /// Error message.
        error: String,
    },
}

/// Result for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountReport {
    /// Account display name.
    pub account: String,
    /// What happened.
    pub outcome: AccountOutcome,
}

/// Result of a whole sort run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Per-account results, in listing order.
    pub accounts: Vec<AccountReport>,
}

impl RunReport {
    /// Start a new report.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            accounts: Vec::new(),
        }
    }

    /// Mark the run as finished.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Total messages moved across all accounts.
    #[must_use]
    pub fn messages_moved(&self) -> usize {
        self.sorted().map(SortSummary::moved).sum()
    }

    /// Whether any account, group or batch failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.accounts.iter().any(|a| match &a.outcome {
            AccountOutcome::Failed { .. } => true,
            AccountOutcome::Sorted(summary) => summary
                .groups
                .iter()
                .any(|g| g.error.is_some() || !g.failed_batches.is_empty()),
            AccountOutcome::Skipped { .. } => false,
        })
    }

    fn sorted(&self) -> impl Iterator<Item = &SortSummary> {
        self.accounts.iter().filter_map(|a| match &a.outcome {
            AccountOutcome::Sorted(summary) => Some(summary),
            _ => None,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn group(moved: usize, failed: bool) -> GroupReport {
        GroupReport {
            domain: "example.com".to_string(),
            target: Some("/INBOX/autoordered/e/example.com".to_string()),
            messages: moved,
            moved,
            failed_batches: if failed {
                vec![BatchFailure {
                    index: 0,
                    size: 1,
                    error: "boom".to_string(),
                }]
            } else {
                Vec::new()
            },
            error: None,
        }
    }

    #[test]
    fn test_totals_and_failures() {
        let mut report = RunReport::start();
        report.accounts.push(AccountReport {
            account: "Work".to_string(),
            outcome: AccountOutcome::Sorted(SortSummary {
                groups: vec![group(3, false), group(2, false)],
                ..SortSummary::default()
            }),
        });
        report.accounts.push(AccountReport {
            account: "Feeds".to_string(),
            outcome: AccountOutcome::Skipped {
                reason: SkipReason::NoInbox,
            },
        });
        report.finish();

        assert_eq!(report.messages_moved(), 5);
        assert!(!report.has_failures());
        assert!(report.finished_at.unwrap() >= report.started_at);
    }

    #[test]
    fn test_batch_failure_counts_as_failure() {
        let mut report = RunReport::start();
        report.accounts.push(AccountReport {
            account: "Work".to_string(),
            outcome: AccountOutcome::Sorted(SortSummary {
                groups: vec![group(1, true)],
                ..SortSummary::default()
            }),
        });

        assert!(report.has_failures());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = AccountOutcome::Failed {
            phase: SortPhase::ListingMessages,
            error: "offline".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["phase"], "listing_messages");
    }
}
