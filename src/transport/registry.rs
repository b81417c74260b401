//! Registry of parsed scripts.
//!
//! Mirrors the scripts the remote end reported through
//! `Debugger.scriptParsed`. The connection's event loop is the only writer;
//! domain modules read it.
//!
//! # Keys
//!
//! A script is keyed by its URL; a re-parse of the same URL (live edit,
//! reload) replaces the previous entry. Anonymous scripts (empty URL) are
//! keyed by script id so they never collapse into one entry.
//!
//! Entries are shared as `Arc<ScriptMetadata>` and never mutated in place.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use crate::identifiers::ScriptId;
use crate::protocol::ScriptMetadata;

// ============================================================================
// ScriptRegistry
// ============================================================================

/// Parsed-script cache with at most one entry per URL.
#[derive(Debug, Default, Clone)]
pub struct ScriptRegistry {
    /// Entries in parse order.
    entries: Vec<Arc<ScriptMetadata>>,
}

impl ScriptRegistry {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a parsed script, replacing any entry with the same key.
    ///
    /// Returns the replaced entry.
    pub fn on_parsed(&mut self, meta: ScriptMetadata) -> Option<Arc<ScriptMetadata>> {
        let replaced = self
            .entries
            .iter()
            .position(|entry| same_key(entry, &meta))
            .map(|index| self.entries.remove(index));

        self.entries.push(Arc::new(meta));
        replaced
    }

    /// Removes every entry.
    ///
    /// Called when the remote execution context resets.
    #[inline]
    pub fn on_cleared(&mut self) {
        self.entries.clear();
    }

    /// Returns the first entry matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&ScriptMetadata) -> bool) -> Option<Arc<ScriptMetadata>> {
        self.entries.iter().find(|entry| predicate(entry)).cloned()
    }

    /// Returns every entry matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&ScriptMetadata) -> bool) -> Vec<Arc<ScriptMetadata>> {
        self.entries
            .iter()
            .filter(|entry| predicate(entry))
            .cloned()
            .collect()
    }

    /// Looks up a script by exact URL.
    #[inline]
    #[must_use]
    pub fn by_url(&self, url: &str) -> Option<Arc<ScriptMetadata>> {
        if url.is_empty() {
            return None;
        }
        self.find(|meta| meta.url == url)
    }

    /// Looks up a script by id.
    #[inline]
    #[must_use]
    pub fn by_id(&self, script_id: &ScriptId) -> Option<Arc<ScriptMetadata>> {
        self.find(|meta| &meta.script_id == script_id)
    }

    /// Returns every script whose URL ends in the file name `name`.
    ///
    /// File names are not unique across directories; callers decide what
    /// to do with more than one match.
    #[must_use]
    pub fn by_basename(&self, name: &str) -> Vec<Arc<ScriptMetadata>> {
        self.filter(|meta| !meta.url.is_empty() && basename(&meta.url) == name)
    }

    /// Returns a snapshot of every entry in parse order.
    #[inline]
    #[must_use]
    pub fn scripts(&self) -> Vec<Arc<ScriptMetadata>> {
        self.entries.clone()
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the registry is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Returns `true` if both scripts occupy the same registry slot.
fn same_key(a: &ScriptMetadata, b: &ScriptMetadata) -> bool {
    if a.url.is_empty() || b.url.is_empty() {
        a.url.is_empty() && b.url.is_empty() && a.script_id == b.script_id
    } else {
        a.url == b.url
    }
}

/// Returns the last path segment of a URL, without query or fragment.
pub(crate) fn basename(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit(['/', '\\']).next().unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn script(id: &str, url: &str) -> ScriptMetadata {
        serde_json::from_value(serde_json::json!({ "scriptId": id, "url": url }))
            .expect("script metadata")
    }

    #[test]
    fn test_reparse_replaces_entry() {
        let mut registry = ScriptRegistry::new();
        assert!(registry.on_parsed(script("1", "a.js")).is_none());
        let replaced = registry.on_parsed(script("2", "a.js")).expect("replaced");

        assert_eq!(replaced.script_id.as_str(), "1");
        assert_eq!(registry.len(), 1);
        let entry = registry.by_url("a.js").expect("entry");
        assert_eq!(entry.script_id.as_str(), "2");
        assert!(registry.by_id(&ScriptId::new("1")).is_none());
    }

    #[test]
    fn test_anonymous_scripts_keyed_by_id() {
        let mut registry = ScriptRegistry::new();
        registry.on_parsed(script("10", ""));
        registry.on_parsed(script("11", ""));
        registry.on_parsed(script("10", ""));

        assert_eq!(registry.len(), 2);
        assert!(registry.by_url("").is_none());
        assert!(registry.by_id(&ScriptId::new("11")).is_some());
    }

    #[test]
    fn test_cleared_empties_registry() {
        let mut registry = ScriptRegistry::new();
        registry.on_parsed(script("1", "a.js"));
        registry.on_parsed(script("2", "b.js"));
        registry.on_cleared();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let mut registry = ScriptRegistry::new();
        registry.on_parsed(script("1", "a.js"));
        let before = registry.by_url("a.js").expect("entry");
        registry.on_parsed(script("2", "a.js"));

        assert_eq!(before.script_id.as_str(), "1");
        assert_eq!(registry.by_url("a.js").expect("entry").script_id.as_str(), "2");
    }

    #[test]
    fn test_by_basename_reports_every_match() {
        let mut registry = ScriptRegistry::new();
        registry.on_parsed(script("1", "http://localhost/lib/index.js"));
        registry.on_parsed(script("2", "http://localhost/app/index.js?v=3"));
        registry.on_parsed(script("3", "http://localhost/app/main.js"));

        assert_eq!(registry.by_basename("index.js").len(), 2);
        assert_eq!(registry.by_basename("main.js").len(), 1);
        assert!(registry.by_basename("other.js").is_empty());
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("file:///home/user/app.js"), "app.js");
        assert_eq!(basename("http://host/a/b.js#frag"), "b.js");
        assert_eq!(basename("C:\\src\\win.js"), "win.js");
        assert_eq!(basename("plain.js"), "plain.js");
    }

    #[test]
    fn test_parse_order_preserved() {
        let mut registry = ScriptRegistry::new();
        registry.on_parsed(script("1", "a.js"));
        registry.on_parsed(script("2", "b.js"));
        registry.on_parsed(script("3", "a.js"));

        let urls: Vec<_> = registry.scripts().iter().map(|s| s.url.clone()).collect();
        assert_eq!(urls, ["b.js", "a.js"]);
    }

    proptest! {
        #[test]
        fn prop_one_entry_per_url(parses in prop::collection::vec((0u8..5, 0u32..1000), 1..64)) {
            let mut registry = ScriptRegistry::new();
            for (url, id) in &parses {
                registry.on_parsed(script(&id.to_string(), &format!("s{url}.js")));
            }

            for url in 0u8..5 {
                let name = format!("s{url}.js");
                let matches = registry.filter(|meta| meta.url == name);
                prop_assert!(matches.len() <= 1);

                let last = parses.iter().rev().find(|(u, _)| *u == url);
                match last {
                    Some((_, id)) => {
                        prop_assert_eq!(matches.len(), 1);
                        prop_assert_eq!(matches[0].script_id.as_str(), id.to_string());
                    }
                    None => prop_assert!(matches.is_empty()),
                }
            }
        }
    }
}
