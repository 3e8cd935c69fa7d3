//! Mapping from sender domains to folder paths.

use super::sanitize::sanitize_name;
use crate::domain::DomainDescriptor;

/// Segment used when the base domain has no first character.
const EMPTY_LETTER: &str = "_";

/// Ordered folder segments: `root / letter / base [/ sub]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    /// All segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The top-level container segment.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Segments below the root container.
    #[must_use]
    pub fn below_root(&self) -> &[String] {
        &self.segments[1..]
    }
}

impl std::fmt::Display for FolderPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Resolve the folder hierarchy for a sender domain.
#[must_use]
pub fn resolve_path(root: &str, descriptor: &DomainDescriptor) -> FolderPath {
    let mut segments = Vec::with_capacity(4);
    segments.push(sanitize_name(Some(root)));
    segments.push(letter_segment(descriptor.base()));
    segments.push(sanitize_name(Some(descriptor.base())));
    if let Some(sub) = descriptor.sub() {
        segments.push(sanitize_name(Some(sub)));
    }

    FolderPath { segments }
}

fn letter_segment(base: &str) -> String {
    base.chars()
        .next()
        .map_or_else(|| EMPTY_LETTER.to_string(), |c| c.to_lowercase().collect())
}
