//! Navigable page address and its fragment
//!
//! The active panel key is mirrored into the fragment of the page address so
//! a link like `https://guide.local/#mac` opens straight onto the Mac panel.
//! Activations *replace* the fragment of the current history entry; only
//! user-initiated navigation pushes new entries.

use anyhow::{Context, Result};
use url::Url;

/// Read/write access to the navigable fragment
pub trait Location {
    /// Current fragment with the `#` stripped and whitespace trimmed.
    /// `None` when absent or empty.
    fn fragment(&self) -> Option<String>;

    /// Replace the fragment in place without creating a history entry
    fn replace_fragment(&mut self, key: &str);
}

/// Emitted whenever the fragment changes through navigation (not replace)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashChange {
    pub fragment: Option<String>,
}

/// In-process page session: an address plus a back/forward history list
#[derive(Debug, Clone)]
pub struct SessionLocation {
    entries: Vec<Url>,
    index: usize,
}

impl SessionLocation {
    /// Start a session at the given address
    pub fn parse(address: &str) -> Result<Self> {
        let url = Url::parse(address).with_context(|| format!("Invalid page address: {address}"))?;
        Ok(Self {
            entries: vec![url],
            index: 0,
        })
    }

    /// The address of the current history entry
    pub fn url(&self) -> &Url {
        &self.entries[self.index]
    }

    /// Number of history entries in this session
    #[cfg(test)]
    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    /// Navigate to a new fragment, pushing a history entry
    ///
    /// Forward entries are discarded, as with any new navigation.
    pub fn navigate_fragment(&mut self, fragment: &str) -> HashChange {
        let mut next = self.url().clone();
        next.set_fragment(Some(fragment));
        self.entries.truncate(self.index + 1);
        self.entries.push(next);
        self.index += 1;
        tracing::debug!(url = %self.url(), "Navigated to new fragment");
        self.hash_change()
    }

    /// Step back one history entry
    pub fn back(&mut self) -> Option<HashChange> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.hash_change())
    }

    /// Step forward one history entry
    pub fn forward(&mut self) -> Option<HashChange> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.hash_change())
    }

    fn hash_change(&self) -> HashChange {
        HashChange {
            fragment: self.fragment(),
        }
    }
}

impl Location for SessionLocation {
    fn fragment(&self) -> Option<String> {
        let raw = self.url().fragment()?.trim();
        if raw.is_empty() {
            None
        } else {
            Some(raw.to_string())
        }
    }

    fn replace_fragment(&mut self, key: &str) {
        let index = self.index;
        self.entries[index].set_fragment(Some(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_parsing() {
        let loc = SessionLocation::parse("https://guide.local/#mac").unwrap();
        assert_eq!(loc.fragment().as_deref(), Some("mac"));

        let empty = SessionLocation::parse("https://guide.local/#").unwrap();
        assert_eq!(empty.fragment(), None);

        let none = SessionLocation::parse("https://guide.local/").unwrap();
        assert_eq!(none.fragment(), None);
    }

    #[test]
    fn test_invalid_address_is_error() {
        assert!(SessionLocation::parse("not a url").is_err());
    }

    #[test]
    fn test_replace_does_not_push_history() {
        let mut loc = SessionLocation::parse("https://guide.local/").unwrap();
        loc.replace_fragment("windows-chrome");
        loc.replace_fragment("mac");
        assert_eq!(loc.history_len(), 1);
        assert_eq!(loc.url().as_str(), "https://guide.local/#mac");
        assert!(loc.back().is_none());
    }

    #[test]
    fn test_back_and_forward() {
        let mut loc = SessionLocation::parse("https://guide.local/#mac").unwrap();
        let change = loc.navigate_fragment("iphone-safari");
        assert_eq!(change.fragment.as_deref(), Some("iphone-safari"));
        assert_eq!(loc.history_len(), 2);

        let back = loc.back().unwrap();
        assert_eq!(back.fragment.as_deref(), Some("mac"));
        let forward = loc.forward().unwrap();
        assert_eq!(forward.fragment.as_deref(), Some("iphone-safari"));
        assert!(loc.forward().is_none());
    }

    #[test]
    fn test_navigation_discards_forward_entries() {
        let mut loc = SessionLocation::parse("https://guide.local/#a").unwrap();
        loc.navigate_fragment("b");
        loc.navigate_fragment("c");
        loc.back();
        loc.back();
        loc.navigate_fragment("d");
        assert_eq!(loc.history_len(), 2);
        assert!(loc.forward().is_none());
    }
}
