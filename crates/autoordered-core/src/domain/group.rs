//! Grouping of messages by sender domain.

use std::collections::HashMap;

use tracing::trace;

use super::parser::{DomainDescriptor, parse_domain};
use crate::host::{MessageHeader, MessageId};

/// Messages sharing one full sender domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageGroup {
    /// Parsed domain shared by every message in the group.
    pub meta: DomainDescriptor,
    /// Message ids in the order they were encountered.
    pub ids: Vec<MessageId>,
}

impl MessageGroup {
    /// Whether the group is large enough to be relocated.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        self.ids.len() > 1
    }
}

/// Message groups keyed by full domain, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct DomainGroups {
    groups: Vec<MessageGroup>,
    index: HashMap<String, usize>,
    skipped: usize,
}

impl DomainGroups {
    /// Add a message id under its parsed domain.
    pub fn insert(&mut self, meta: DomainDescriptor, id: MessageId) {
        if let Some(&position) = self.index.get(meta.full()) {
            self.groups[position].ids.push(id);
            return;
        }

        self.index.insert(meta.full().to_string(), self.groups.len());
        self.groups.push(MessageGroup {
            meta,
            ids: vec![id],
        });
    }

    /// Look up the group for a full domain.
    #[must_use]
    pub fn get(&self, full: &str) -> Option<&MessageGroup> {
        self.index.get(full).map(|&position| &self.groups[position])
    }

    /// All groups, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &MessageGroup> {
        self.groups.iter()
    }

    /// Groups with more than one message, in first-seen order.
    pub fn eligible(&self) -> impl Iterator<Item = &MessageGroup> {
        self.groups.iter().filter(|group| group.is_eligible())
    }

    /// Number of distinct domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no message had a parseable domain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of messages left out because their author had no domain.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }
}

impl IntoIterator for DomainGroups {
    type Item = MessageGroup;
    type IntoIter = std::vec::IntoIter<MessageGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Group messages by the full domain of their author.
///
/// Messages whose author cannot be parsed are left out and counted in
/// [`DomainGroups::skipped`]. No eligibility filtering happens here.
#[must_use]
pub fn group_by_domain(messages: &[MessageHeader]) -> DomainGroups {
    let mut groups = DomainGroups::default();

    for message in messages {
        match parse_domain(message.author.as_deref()) {
            Some(meta) => groups.insert(meta, message.id),
            None => {
                trace!(message = %message.id, author = ?message.author, "No sender domain");
                groups.skipped += 1;
            }
        }
    }

    groups
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn message(id: u64, author: &str) -> MessageHeader {
        MessageHeader::new(id, author)
    }

    #[test]
    fn test_groups_preserve_first_seen_order() {
        let messages = vec![
            message(1, "a@alpha.com"),
            message(2, "Alpha Team <team@alpha.com>"),
            message(3, "b@beta.org"),
            message(4, "c@ALPHA.com"),
            message(5, "x@gamma.net"),
            message(6, "y@gamma.net"),
        ];

        let groups = group_by_domain(&messages);

        let order: Vec<_> = groups.iter().map(|g| g.meta.full()).collect();
        assert_eq!(order, vec!["alpha.com", "beta.org", "gamma.net"]);

        let alpha = groups.get("alpha.com").unwrap();
        assert_eq!(alpha.ids, vec![MessageId(1), MessageId(2), MessageId(4)]);
    }

    #[test]
    fn test_only_multi_message_groups_are_eligible() {
        let messages = vec![
            message(1, "a@alpha.com"),
            message(2, "a@alpha.com"),
            message(3, "b@beta.org"),
            message(4, "a@alpha.com"),
            message(5, "x@gamma.net"),
            message(6, "y@gamma.net"),
        ];

        let groups = group_by_domain(&messages);
        let eligible: Vec<_> = groups
            .eligible()
            .map(|g| (g.meta.full(), g.ids.len()))
            .collect();

        assert_eq!(eligible, vec![("alpha.com", 3), ("gamma.net", 2)]);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn test_unparseable_authors_are_skipped() {
        let messages = vec![
            message(1, "no address here"),
            MessageHeader {
                id: MessageId(2),
                author: None,
            },
            message(3, "a@alpha.com"),
        ];

        let groups = group_by_domain(&messages);

        assert_eq!(groups.skipped(), 2);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_subdomains_group_separately() {
        let messages = vec![
            message(1, "a@news.example.com"),
            message(2, "b@example.com"),
            message(3, "c@news.example.com"),
        ];

        let groups = group_by_domain(&messages);

        assert_eq!(groups.get("news.example.com").unwrap().ids.len(), 2);
        assert_eq!(groups.get("example.com").unwrap().ids.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let groups = group_by_domain(&[]);
        assert!(groups.is_empty());
        assert_eq!(groups.eligible().count(), 0);
    }
}
