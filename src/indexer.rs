use std::collections::HashSet;
use std::hash::Hash;

use tracing::debug;

use crate::error::LookupError;
use crate::models::{MatchCandidate, MatchIndexEntry};

/// Keep the first item for each key, preserving order.
pub fn dedupe_by_key<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Matches from a single listing pass, numbered from 1 in discovery order.
///
/// Ordinals are scoped to the pass that produced them. Resolving an ordinal
/// taken from an earlier listing against a fresh index can land on a different
/// match if upstream reordered its page; this index makes no attempt to detect that.
#[derive(Debug, Clone, Default)]
pub struct MatchIndex {
    entries: Vec<MatchIndexEntry>,
}

impl MatchIndex {
    /// Number candidates after dropping repeated locators
    pub fn from_candidates(candidates: Vec<MatchCandidate>) -> Self {
        let entries: Vec<MatchIndexEntry> = dedupe_by_key(candidates, |c| c.locator.clone())
            .into_iter()
            .enumerate()
            .map(|(i, c)| MatchIndexEntry {
                ordinal: i + 1,
                name: c.name,
                locator: c.locator,
                is_live: c.is_live,
            })
            .collect();

        debug!("Indexed {} matches", entries.len());
        Self { entries }
    }

    pub fn entries(&self) -> &[MatchIndexEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<MatchIndexEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a 1-based ordinal; anything `<= 0` or past the end is not found
    pub fn resolve_ordinal(&self, ordinal: i64) -> Result<&MatchIndexEntry, LookupError> {
        if ordinal <= 0 {
            return Err(LookupError::not_found(ordinal.to_string()));
        }
        usize::try_from(ordinal - 1)
            .ok()
            .and_then(|i| self.entries.get(i))
            .ok_or_else(|| LookupError::not_found(ordinal.to_string()))
    }

    /// Resolve a textual ordinal as received from a caller
    pub fn resolve(&self, query: &str) -> Result<&MatchIndexEntry, LookupError> {
        let ordinal: i64 = query
            .trim()
            .parse()
            .map_err(|_| LookupError::not_found(query))?;
        self.resolve_ordinal(ordinal)
    }

    /// Resolve either an ordinal or an exact locator
    pub fn resolve_any(&self, query: &str) -> Result<&MatchIndexEntry, LookupError> {
        self.resolve(query).or_else(|_| {
            let query = query.trim();
            self.entries
                .iter()
                .find(|e| e.locator == query)
                .ok_or_else(|| LookupError::not_found(query))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, locator: &str) -> MatchCandidate {
        MatchCandidate {
            name: name.to_string(),
            locator: locator.to_string(),
            is_live: false,
        }
    }

    fn sample_index() -> MatchIndex {
        MatchIndex::from_candidates(vec![
            candidate("England vs Sri Lanka", "https://x/1"),
            candidate("England vs Sri Lanka", "https://x/1"),
            candidate("India vs Australia", "https://x/2"),
            candidate("Pakistan vs New Zealand", "https://x/3"),
        ])
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let items = vec![(1, "a"), (2, "b"), (1, "c"), (3, "d")];
        let deduped = dedupe_by_key(items, |(k, _)| *k);
        assert_eq!(deduped, vec![(1, "a"), (2, "b"), (3, "d")]);
    }

    #[test]
    fn test_ordinals_follow_discovery_order() {
        let index = sample_index();
        assert_eq!(index.len(), 3);
        let ordinals: Vec<_> = index.entries().iter().map(|e| e.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
        assert_eq!(index.entries()[1].name, "India vs Australia");
    }

    #[test]
    fn test_resolve_valid() {
        let index = sample_index();
        assert_eq!(index.resolve_ordinal(1).unwrap().locator, "https://x/1");
        assert_eq!(index.resolve("3").unwrap().locator, "https://x/3");
        assert_eq!(index.resolve(" 2 ").unwrap().locator, "https://x/2");
    }

    #[test]
    fn test_resolve_not_found() {
        let index = sample_index();
        assert!(index.resolve_ordinal(0).is_err());
        assert!(index.resolve_ordinal(-1).is_err());
        assert!(index.resolve_ordinal(index.len() as i64 + 1).is_err());
        assert!(matches!(
            index.resolve("abc"),
            Err(LookupError::NotFound { .. })
        ));
        assert!(index.resolve("").is_err());
        assert!(MatchIndex::default().resolve_ordinal(1).is_err());
    }

    #[test]
    fn test_resolve_by_locator() {
        let index = sample_index();
        assert_eq!(index.resolve_any("https://x/2").unwrap().ordinal, 2);
        assert_eq!(index.resolve_any("1").unwrap().ordinal, 1);
        assert!(index.resolve_any("https://x/9").is_err());
    }
}
