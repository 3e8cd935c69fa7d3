//! Sender domain parsing and grouping.
//!
//! Authors are reduced to a [`DomainDescriptor`] (base domain plus optional
//! subdomain) and messages are bucketed by the full domain, keeping the
//! order in which domains and messages were first seen.

mod group;
mod parser;

pub use group::{DomainGroups, MessageGroup, group_by_domain};
pub use parser::{DomainDescriptor, parse_domain};
