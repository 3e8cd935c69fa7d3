//! # autoordered-core
//!
//! Core logic for sorting an inbox into folders by sender domain.
//!
//! This crate provides:
//! - Sender address parsing into base domain and subdomain
//! - Grouping of inbox messages by full sender domain
//! - Folder name sanitization and path resolution
//!   (`root/letter/base[/sub]`)
//! - Idempotent folder provisioning with a run-scoped lookup cache
//! - Batched message relocation with per-batch failure isolation
//! - **Sort runs** - account iteration, inbox discovery and reporting
//! - **Mail host boundary** - the [`MailHost`] trait and an in-memory host

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
mod error;
pub mod folder;
pub mod host;
pub mod relocate;
pub mod sort;

pub use config::{DEFAULT_BATCH_SIZE, DEFAULT_ROOT_FOLDER, SortConfig};
pub use domain::{DomainDescriptor, DomainGroups, MessageGroup, group_by_domain, parse_domain};
pub use error::{Error, Result};
pub use folder::{FolderOperationError, FolderPath, FolderProvisioner, resolve_path, sanitize_name};
pub use host::{
    Account, Folder, FolderId, FolderRef, FolderType, HostError, InMemoryHost, MailHost,
    MailboxSnapshot, MessageHeader, MessageId, MessagePage, PageToken,
};
pub use relocate::{BatchFailure, RelocationOutcome, relocate};
pub use sort::{
    AccountOutcome, AccountReport, GroupReport, RunReport, SkipReason, SortPhase, SortSummary,
    Sorter,
};
