//! Session-scoped record of already surfaced candidates.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ids already shown to the guest in this search session.
///
/// Membership only grows. Repeat suppression is enforced here rather than
/// left to the oracle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SuggestionLedger {
    surfaced: Vec<String>,
    seen: HashSet<String>,
}

impl SuggestionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidates not yet surfaced, in input order, each at most once.
    pub fn filter_new<S: AsRef<str>>(&self, candidates: &[S]) -> Vec<String> {
        let mut batch = HashSet::new();
        candidates
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| !self.seen.contains(*id) && batch.insert(*id))
            .map(str::to_string)
            .collect()
    }

    /// Records ids as shown. Already recorded ids are ignored.
    pub fn record<I, S>(&mut self, shown: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in shown {
            let id = id.into();
            if self.seen.insert(id.clone()) {
                self.surfaced.push(id);
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Surfaced ids in the order they were first shown.
    pub fn surfaced(&self) -> &[String] {
        &self.surfaced
    }

    pub fn len(&self) -> usize {
        self.surfaced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaced.is_empty()
    }

    /// Forgets everything. Only a search restart does this.
    pub fn clear(&mut self) {
        self.surfaced.clear();
        self.seen.clear();
    }
}

impl From<Vec<String>> for SuggestionLedger {
    fn from(ids: Vec<String>) -> Self {
        let mut ledger = Self::new();
        ledger.record(ids);
        ledger
    }
}

impl From<SuggestionLedger> for Vec<String> {
    fn from(ledger: SuggestionLedger) -> Self {
        ledger.surfaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn refined_query_only_shows_new_ids() {
        let mut ledger = SuggestionLedger::new();

        let first = ledger.filter_new(&["p1", "p2", "p3"]);
        assert_eq!(first, vec!["p1", "p2", "p3"]);
        ledger.record(first);

        let second = ledger.filter_new(&["p2", "p4"]);
        assert_eq!(second, vec!["p4"]);
    }

    #[test]
    fn collapses_duplicates_within_one_batch() {
        let ledger = SuggestionLedger::new();
        assert_eq!(ledger.filter_new(&["a", "b", "a"]), vec!["a", "b"]);
    }

    #[test]
    fn filter_new_does_not_record() {
        let ledger = SuggestionLedger::new();
        let _ = ledger.filter_new(&["a"]);
        assert!(ledger.is_empty());
    }

    #[test]
    fn record_keeps_first_shown_order() {
        let mut ledger = SuggestionLedger::new();
        ledger.record(["b", "a"]);
        ledger.record(["a", "c"]);
        assert_eq!(ledger.surfaced(), ["b", "a", "c"]);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut ledger = SuggestionLedger::new();
        ledger.record(["a"]);
        ledger.clear();
        assert!(!ledger.contains("a"));
        assert_eq!(ledger.filter_new(&["a"]), vec!["a"]);
    }

    #[test]
    fn serializes_as_id_list() {
        let mut ledger = SuggestionLedger::new();
        ledger.record(["p1", "p2"]);
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json, serde_json::json!(["p1", "p2"]));
        let back: SuggestionLedger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }

    proptest! {
        #[test]
        fn recorded_ids_never_come_back(
            batches in proptest::collection::vec(
                proptest::collection::vec("p[0-9]", 0..6),
                1..10,
            ),
        ) {
            let mut ledger = SuggestionLedger::new();
            let mut shown: HashSet<String> = HashSet::new();

            for batch in batches {
                let fresh = ledger.filter_new(&batch);
                for id in &fresh {
                    prop_assert!(!shown.contains(id));
                }
                shown.extend(fresh.iter().cloned());
                ledger.record(fresh);
                prop_assert_eq!(ledger.len(), shown.len());
            }
        }
    }
}
