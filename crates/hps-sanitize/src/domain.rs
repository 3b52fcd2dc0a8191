//! Staff email domain allow-listing.

use hps_model::RawText;
use serde::{Deserialize, Serialize};

/// The district domain staff accounts must belong to.
pub const DEFAULT_ALLOWED_DOMAIN: &str = "dadeschools.net";

/// Set of email domains accepted for staff accounts.
///
/// Matching is exact on the part after the last `@`, ignoring ASCII case.
/// Subdomains are not implied: `mail.dadeschools.net` is a different domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainAllowList {
    domains: Vec<String>,
}

impl Default for DomainAllowList {
    fn default() -> Self {
        Self::new([DEFAULT_ALLOWED_DOMAIN])
    }
}

impl DomainAllowList {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// True if `email` is well formed and its domain is on the list.
    pub fn is_allowed<T: RawText + ?Sized>(&self, email: &T) -> bool {
        let Some(domain) = email.raw_text().and_then(email_domain) else {
            return false;
        };
        self.domains
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(domain))
    }
}

/// Checks `email` against the default allow-list.
///
/// ```
/// use hps_sanitize::is_allowed_domain;
///
/// assert!(is_allowed_domain("teacher@dadeschools.net"));
/// assert!(!is_allowed_domain("user@gmail.com"));
/// assert!(!is_allowed_domain("notanemail"));
/// ```
pub fn is_allowed_domain<T: RawText + ?Sized>(email: &T) -> bool {
    email
        .raw_text()
        .and_then(email_domain)
        .is_some_and(|domain| domain.eq_ignore_ascii_case(DEFAULT_ALLOWED_DOMAIN))
}

/// Domain part of an address with a non-empty local part, if any.
fn email_domain(email: &str) -> Option<&str> {
    let (local, domain) = email.trim().rsplit_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(domain)
}
