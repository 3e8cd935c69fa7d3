//! Sender domain extraction from author headers.

/// Characters stripped from the end of a domain before it is split.
const TRAILING_DELIMITERS: &[char] = &[')', '>', ']', ',', ';'];

/// A sender domain split into base domain and subdomain.
///
/// `base` is always the last two labels of `full` with no public-suffix
/// awareness: `example.co.uk` has base `co.uk` and subdomain `example`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainDescriptor {
    base: String,
    sub: Option<String>,
    full: String,
}

impl DomainDescriptor {
    /// Build a descriptor from an already cleaned, lowercase domain.
    ///
    /// Returns `None` for an empty domain.
    #[must_use]
    pub fn from_domain(full: impl Into<String>) -> Option<Self> {
        let full = full.into();
        if full.is_empty() {
            return None;
        }

        let labels: Vec<&str> = full.split('.').collect();
        if labels.len() < 2 {
            return Some(Self {
                base: full.clone(),
                sub: None,
                full,
            });
        }

        let split = labels.len() - 2;
        let base = labels[split..].join(".");
        let sub = Some(labels[..split].join(".")).filter(|sub| !sub.is_empty());

        Some(Self { base, sub, full })
    }

    /// Base domain: the last two labels.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Subdomain labels preceding the base domain, if any.
    #[must_use]
    pub fn sub(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// The full lowercase domain.
    #[must_use]
    pub fn full(&self) -> &str {
        &self.full
    }
}

impl std::fmt::Display for DomainDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full)
    }
}

/// Parse the sender domain out of a raw author header.
///
/// Accepts both `Name <user@domain>` and bare `user@domain` forms. The
/// domain is whatever follows the last `@`, with trailing `) > ] , ;`
/// removed, trimmed and lowercased.
///
/// Returns `None` when the header is absent or empty, has no `@`, or
/// leaves an empty domain after cleaning.
#[must_use]
pub fn parse_domain(author: Option<&str>) -> Option<DomainDescriptor> {
    let header = author.filter(|h| !h.is_empty())?;
    let address = bracketed_address(header).unwrap_or(header).trim();

    let (_, domain) = address.rsplit_once('@')?;
    let domain = domain
        .trim_end_matches(TRAILING_DELIMITERS)
        .trim()
        .to_lowercase();

    DomainDescriptor::from_domain(domain)
}

/// Contents of the first non-empty `<...>` pair in a header.
fn bracketed_address(header: &str) -> Option<&str> {
    header.match_indices('<').find_map(|(start, _)| {
        let rest = &header[start + 1..];
        match rest.find('>') {
            Some(end) if end > 0 => Some(&rest[..end]),
            _ => None,
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(header: &str) -> Option<DomainDescriptor> {
        parse_domain(Some(header))
    }

    #[test]
    fn test_display_name_and_case_folding() {
        let parsed = parse("A <b@EXAMPLE.com>").unwrap();
        assert_eq!(parsed.base(), "example.com");
        assert_eq!(parsed.sub(), None);
        assert_eq!(parsed.full(), "example.com");
    }

    #[test]
    fn test_bare_address_with_subdomain() {
        let parsed = parse("news@news.example.com").unwrap();
        assert_eq!(parsed.base(), "example.com");
        assert_eq!(parsed.sub(), Some("news"));
        assert_eq!(parsed.full(), "news.example.com");
    }

    #[test]
    fn test_trailing_delimiter_stripped() {
        let parsed = parse("x@mail.corp.example.co.uk,").unwrap();
        assert_eq!(parsed.full(), "mail.corp.example.co.uk");
        // Exactly two labels, even for multi-label public suffixes.
        assert_eq!(parsed.base(), "co.uk");
        assert_eq!(parsed.sub(), Some("mail.corp.example"));
    }

    #[test]
    fn test_trailing_delimiter_run_and_whitespace() {
        let parsed = parse("(user@Example.org );]").unwrap();
        assert_eq!(parsed.full(), "example.org");
    }

    #[test]
    fn test_unparseable_headers() {
        assert!(parse("no-at-sign").is_none());
        assert!(parse("").is_none());
        assert!(parse_domain(None).is_none());
        assert!(parse("user@").is_none());
        assert!(parse("user@ ,;").is_none());
    }

    #[test]
    fn test_multiple_at_signs_take_last_segment() {
        let parsed = parse("a@@b.com").unwrap();
        assert_eq!(parsed.full(), "b.com");

        let parsed = parse("\"odd@name\" <x@y@Z.example.net>").unwrap();
        assert_eq!(parsed.full(), "z.example.net");
        assert_eq!(parsed.sub(), Some("z"));
    }

    #[test]
    fn test_single_label_domain() {
        let parsed = parse("root@localhost").unwrap();
        assert_eq!(parsed.base(), "localhost");
        assert_eq!(parsed.sub(), None);
    }

    #[test]
    fn test_empty_brackets_are_ignored() {
        let parsed = parse("Weird <> <team@lists.example.com>").unwrap();
        assert_eq!(parsed.full(), "lists.example.com");
    }

    #[test]
    fn test_unclosed_bracket_uses_whole_header() {
        let parsed = parse("Broken <user@example.com").unwrap();
        assert_eq!(parsed.full(), "example.com");
    }

    #[test]
    fn test_empty_leading_label_is_not_a_subdomain() {
        let parsed = parse("x@.example.com").unwrap();
        assert_eq!(parsed.base(), "example.com");
        assert_eq!(parsed.sub(), None);
        assert_eq!(parsed.full(), ".example.com");
    }

    #[test]
    fn test_from_domain_rejects_empty() {
        assert!(DomainDescriptor::from_domain("").is_none());
    }

    proptest! {
        #[test]
        fn prop_three_label_domains_split(
            local in "[a-z0-9._+-]{1,12}",
            sub in "[a-z][a-z0-9-]{0,10}",
            base in "[a-z][a-z0-9-]{0,10}",
            tld in "[a-z]{2,6}",
        ) {
            let parsed = parse(&format!("{local}@{sub}.{base}.{tld}")).unwrap();
            prop_assert_eq!(parsed.base(), format!("{base}.{tld}"));
            prop_assert_eq!(parsed.sub(), Some(sub.as_str()));
            prop_assert_eq!(parsed.full(), format!("{sub}.{base}.{tld}"));
        }

        #[test]
        fn prop_descriptor_invariants(header in "\\PC{0,40}") {
            if let Some(parsed) = parse(&header) {
                prop_assert!(!parsed.full().is_empty());
                prop_assert!(parsed.full().ends_with(parsed.base()));
                if let Some(sub) = parsed.sub() {
                    prop_assert!(!sub.is_empty());
                    prop_assert_eq!(parsed.full(), format!("{sub}.{}", parsed.base()));
                }
            }
        }
    }
}
