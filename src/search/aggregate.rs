use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use super::types::{AggregatedSiteResult, Item, LookupOutcome};

#[derive(Default)]
struct SiteAccumulator {
    count: u64,
    seen: HashSet<String>,
    items: Vec<Item>,
}

impl SiteAccumulator {
    fn absorb(&mut self, count: u64, items: &[Item]) {
        self.count = self.count.saturating_add(count);
        for item in items {
            if self.seen.insert(item.id.clone()) {
                self.items.push(item.clone());
            }
        }
    }
}

/// Merges lookup outcomes into one result per site.
///
/// Outcomes must be passed in dispatch-issue order: the first item seen for an
/// identity key wins, later duplicates are dropped. Counts are summed across
/// variants. Failed outcomes are skipped, so a site that never succeeded is
/// absent from the output. Output order is the order in which each site first
/// produced a successful outcome.
pub fn aggregate(outcomes: &[LookupOutcome]) -> Vec<AggregatedSiteResult> {
    let mut by_site: IndexMap<&str, SiteAccumulator> = IndexMap::new();

    for outcome in outcomes {
        let LookupOutcome::Found(set) = outcome else {
            continue;
        };
        by_site
            .entry(set.site.as_str())
            .or_default()
            .absorb(set.count, &set.items);
    }

    debug!(sites = by_site.len(), outcomes = outcomes.len(), "aggregated outcomes");

    by_site
        .into_iter()
        .map(|(site, acc)| AggregatedSiteResult {
            site: site.to_string(),
            count: acc.count,
            items: acc.items,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LookupError;
    use crate::search::types::SiteResultSet;

    fn item(id: &str, name: &str) -> Item {
        Item {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            link: format!("https://example.com/{id}"),
        }
    }

    fn found(site: &str, count: u64, items: Vec<Item>) -> LookupOutcome {
        LookupOutcome::Found(SiteResultSet {
            site: site.into(),
            count,
            items,
        })
    }

    fn failed(site: &str) -> LookupOutcome {
        LookupOutcome::Failed {
            site: site.into(),
            error: LookupError::Status(503),
        }
    }

    fn ids(result: &AggregatedSiteResult) -> Vec<&str> {
        result.items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_empty_response() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn first_occurrence_wins_on_duplicate_id() {
        let outcomes = vec![
            found("A", 1, vec![item("x", "first")]),
            found("A", 1, vec![item("x", "second")]),
        ];

        let merged = aggregate(&outcomes);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].items.len(), 1);
        assert_eq!(merged[0].items[0].name, "first");
    }

    #[test]
    fn counts_are_summed_regardless_of_dedup() {
        let outcomes = vec![
            found("S", 5, vec![item("a", "a"), item("b", "b")]),
            found("S", 7, vec![item("a", "a"), item("b", "b")]),
        ];

        let merged = aggregate(&outcomes);

        assert_eq!(merged[0].count, 12);
        assert_eq!(ids(&merged[0]), ["a", "b"]);
    }

    #[test]
    fn site_with_only_failures_is_absent() {
        let outcomes = vec![failed("A"), found("B", 2, vec![item("b1", "b1")]), failed("A")];

        let merged = aggregate(&outcomes);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].site, "B");
    }

    #[test]
    fn partial_failure_keeps_successful_variant() {
        let outcomes = vec![failed("A"), found("A", 4, vec![item("a1", "a1")])];

        let merged = aggregate(&outcomes);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].count, 4);
        assert_eq!(ids(&merged[0]), ["a1"]);
    }

    #[test]
    fn zero_item_success_still_appears() {
        let merged = aggregate(&[found("Empty", 0, vec![])]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].site, "Empty");
        assert_eq!(merged[0].count, 0);
        assert!(merged[0].items.is_empty());
    }

    #[test]
    fn same_id_on_different_sites_is_not_deduplicated() {
        let outcomes = vec![
            found("A", 1, vec![item("shared", "from A")]),
            found("B", 1, vec![item("shared", "from B")]),
        ];

        let merged = aggregate(&outcomes);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].items[0].name, "from A");
        assert_eq!(merged[1].items[0].name, "from B");
    }

    #[test]
    fn duplicates_within_one_outcome_are_dropped() {
        let merged = aggregate(&[found("A", 2, vec![item("a", "one"), item("a", "two")])]);

        assert_eq!(merged[0].items.len(), 1);
        assert_eq!(merged[0].items[0].name, "one");
    }

    #[test]
    fn sites_ordered_by_first_success() {
        let outcomes = vec![
            failed("A"),
            found("B", 1, vec![]),
            found("A", 1, vec![]),
            found("C", 1, vec![]),
        ];

        let sites: Vec<_> = aggregate(&outcomes).into_iter().map(|r| r.site).collect();
        assert_eq!(sites, ["B", "A", "C"]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let outcomes = vec![
            found("A", 3, vec![item("a1", "a1"), item("a2", "a2")]),
            failed("B"),
            found("A", 2, vec![item("a1", "other"), item("a3", "a3")]),
            found("B", 1, vec![item("b1", "b1")]),
        ];

        assert_eq!(aggregate(&outcomes), aggregate(&outcomes));
    }
}
