//! URL-backed shareable link.
//!
//! # Responsibility
//! - Hold the current navigation entry and the entries behind it.
//! - Read and rewrite single query parameters of the current entry.
//!
//! # Invariants
//! - `write_param` never adds a history entry.
//! - Parameters other than the rewritten one keep their values and order.

use crate::persist::{LinkError, ShareLink};
use url::Url;

/// Shareable link over a `url::Url`, with replace-style rewrites.
#[derive(Debug, Clone)]
pub struct UrlShareLink {
    current: Option<Url>,
    history: Vec<Url>,
}

impl UrlShareLink {
    pub fn new(current: Url) -> Self {
        Self {
            current: Some(current),
            history: Vec::new(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, LinkError> {
        Ok(Self::new(Url::parse(raw)?))
    }

    /// A link with no navigation context: reads are absent, writes fail.
    pub fn detached() -> Self {
        Self {
            current: None,
            history: Vec::new(),
        }
    }

    /// Pushes a new navigation entry, keeping the current one in history.
    pub fn navigate(&mut self, next: Url) {
        if let Some(previous) = self.current.replace(next) {
            self.history.push(previous);
        }
    }

    /// Text of the current link, as handed out by the share action.
    pub fn share_url(&self) -> Option<&str> {
        self.current.as_ref().map(Url::as_str)
    }

    pub fn current(&self) -> Option<&Url> {
        self.current.as_ref()
    }

    /// Number of navigation entries including the current one.
    pub fn history_len(&self) -> usize {
        self.history.len() + usize::from(self.current.is_some())
    }
}

impl ShareLink for UrlShareLink {
    fn read_param(&self, name: &str) -> Option<String> {
        self.current
            .as_ref()?
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    fn write_param(&mut self, name: &str, value: &str) -> Result<(), LinkError> {
        let url = self.current.as_mut().ok_or(LinkError::Unavailable)?;

        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut written = false;
        for (key, existing) in url.query_pairs().into_owned() {
            if key != name {
                pairs.push((key, existing));
            } else if !written {
                pairs.push((key, value.to_string()));
                written = true;
            }
        }
        if !written {
            pairs.push((name.to_string(), value.to_string()));
        }

        url.query_pairs_mut().clear().extend_pairs(&pairs);
        Ok(())
    }
}
