// Dweve OSMStat - OpenStreetMap archive statistics
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Frequency aggregation over structural events.
//!
//! [`OsmAggregator`] applies the node/tag nesting rule to a stream of
//! [`StructuralEvent`]s:
//!
//! - an open `node` element counts its `user` attribute (if present) and
//!   enters node scope, with or without that attribute;
//! - inside node scope every open `tag` element counts its `k` attribute
//!   (if present);
//! - node scope ends at the next `node` close event.
//!
//! Nodes are assumed not to nest, which holds for OSM exports. A `node` opened
//! inside node scope is neither counted nor does it extend the scope.
//! Everything else is ignored.

use crate::error::StatsResult;
use crate::report::Report;
use crate::scanner::StructuralEvent;
use indexmap::IndexMap;

/// Element carrying the contributing user.
pub const NODE_ELEMENT: &str = "node";
/// Attribute of [`NODE_ELEMENT`] naming the user.
pub const USER_ATTRIBUTE: &str = "user";
/// Child element describing a node.
pub const TAG_ELEMENT: &str = "tag";
/// Attribute of [`TAG_ELEMENT`] holding the tag key.
pub const KEY_ATTRIBUTE: &str = "k";

/// Key to occurrence count mapping that remembers first-insertion order.
///
/// Keys are compared by exact string equality; no case folding or
/// normalization is applied.
///
/// # Examples
///
/// ```rust
/// use osmstat::FrequencyCounter;
///
/// let mut counter = FrequencyCounter::new();
/// counter.increment("highway");
/// counter.increment("name");
/// counter.increment("name");
///
/// assert_eq!(counter.count("name"), 2);
/// assert_eq!(counter.count("missing"), 0);
/// assert_eq!(counter.sorted_by_count(), vec![("name", 2), ("highway", 1)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyCounter {
    counts: IndexMap<String, u64>,
}

impl FrequencyCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `key`.
    pub fn increment(&mut self, key: &str) {
        match self.counts.get_mut(key) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(key.to_owned(), 1);
            }
        }
    }

    /// Occurrences of `key`, zero if never seen.
    pub fn count(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(key, count)| (key.as_str(), *count))
    }

    /// Entries sorted by count, highest first.
    ///
    /// The sort is stable: keys with equal counts keep their first-insertion
    /// order, so the result is deterministic for a given input.
    pub fn sorted_by_count(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// Builds the user and tag-key counters from structural events.
#[derive(Debug, Default)]
pub struct OsmAggregator {
    user_counts: FrequencyCounter,
    tag_key_counts: FrequencyCounter,
    inside_node: bool,
    nodes_seen: u64,
    tags_seen: u64,
}

impl OsmAggregator {
    /// Create an aggregator with empty counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event to the counters.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Scan`](crate::StatsError::Scan) if a counted
    /// attribute cannot be decoded. Attributes that are not counted are never
    /// decoded.
    pub fn observe(&mut self, event: &StructuralEvent) -> StatsResult<()> {
        if self.inside_node {
            if event.opens(TAG_ELEMENT) {
                self.tags_seen += 1;
                if let Some(key) = event.attribute(KEY_ATTRIBUTE)? {
                    self.tag_key_counts.increment(&key);
                }
            } else if event.closes(NODE_ELEMENT) {
                self.inside_node = false;
            }
        } else if event.opens(NODE_ELEMENT) {
            self.nodes_seen += 1;
            if let Some(user) = event.attribute(USER_ATTRIBUTE)? {
                self.user_counts.increment(&user);
            }
            self.inside_node = true;
        }
        Ok(())
    }

    /// Drain an event stream into the counters.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error in the stream or in a counted
    /// attribute. Counts gathered
    /// before the error stay in the aggregator but should not be reported.
    pub fn consume<I>(&mut self, events: I) -> StatsResult<()>
    where
        I: IntoIterator<Item = StatsResult<StructuralEvent>>,
    {
        for event in events {
            self.observe(&event?)?;
        }
        Ok(())
    }

    /// Counts of `node` elements per `user` attribute value.
    pub fn user_counts(&self) -> &FrequencyCounter {
        &self.user_counts
    }

    /// Counts of `tag` elements inside nodes per `k` attribute value.
    pub fn tag_key_counts(&self) -> &FrequencyCounter {
        &self.tag_key_counts
    }

    /// Total `node` elements seen, attributed or not.
    pub fn nodes_seen(&self) -> u64 {
        self.nodes_seen
    }

    /// Total `tag` elements seen inside nodes, keyed or not.
    pub fn tags_seen(&self) -> u64 {
        self.tags_seen
    }

    /// Whether the last event left the aggregator in node scope.
    pub fn is_inside_node(&self) -> bool {
        self.inside_node
    }

    /// Finish aggregation and hand the counters to the report.
    pub fn into_report(self) -> Report {
        Report::new(self.user_counts, self.tag_key_counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatsError;

    fn open(name: &str, attrs: &[(&str, &str)]) -> StructuralEvent {
        StructuralEvent::open(name, attrs)
    }

    fn close(name: &str) -> StructuralEvent {
        StructuralEvent::close(name)
    }

    fn aggregate(events: Vec<StructuralEvent>) -> OsmAggregator {
        let mut aggregator = OsmAggregator::new();
        aggregator.consume(events.into_iter().map(Ok)).unwrap();
        aggregator
    }

    #[test]
    fn test_counter_preserves_first_insertion_order() {
        let mut counter = FrequencyCounter::new();
        for key in ["b", "a", "c", "a", "b", "a"] {
            counter.increment(key);
        }
        let keys: Vec<_> = counter.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(counter.total(), 6);
        assert_eq!(counter.len(), 3);
    }

    #[test]
    fn test_counter_sort_is_stable() {
        let mut counter = FrequencyCounter::new();
        for key in ["x", "y", "z", "z"] {
            counter.increment(key);
        }
        assert_eq!(counter.sorted_by_count(), vec![("z", 2), ("x", 1), ("y", 1)]);
    }

    #[test]
    fn test_counter_keys_are_case_sensitive() {
        let mut counter = FrequencyCounter::new();
        counter.increment("Name");
        counter.increment("name");
        assert_eq!(counter.count("Name"), 1);
        assert_eq!(counter.count("name"), 1);
    }

    #[test]
    fn test_users_and_tags_counted() {
        let agg = aggregate(vec![
            open("osm", &[]),
            open("node", &[("user", "alice")]),
            open("tag", &[("k", "name")]),
            close("tag"),
            open("tag", &[("k", "name")]),
            close("tag"),
            close("node"),
            open("node", &[("user", "bob")]),
            close("node"),
            open("node", &[("user", "alice")]),
            close("node"),
            close("osm"),
        ]);
        assert_eq!(agg.user_counts().count("alice"), 2);
        assert_eq!(agg.user_counts().count("bob"), 1);
        assert_eq!(agg.tag_key_counts().count("name"), 2);
        assert_eq!(agg.nodes_seen(), 3);
        assert_eq!(agg.tags_seen(), 2);
        assert!(!agg.is_inside_node());
    }

    #[test]
    fn test_node_without_user_still_scopes_tags() {
        let agg = aggregate(vec![
            open("node", &[("id", "1")]),
            open("tag", &[("k", "type")]),
            close("tag"),
            close("node"),
        ]);
        assert!(agg.user_counts().is_empty());
        assert_eq!(agg.tag_key_counts().count("type"), 1);
    }

    #[test]
    fn test_tags_outside_nodes_are_ignored() {
        let agg = aggregate(vec![
            open("way", &[("user", "carol")]),
            open("tag", &[("k", "highway")]),
            close("tag"),
            close("way"),
            open("tag", &[("k", "orphan")]),
            close("tag"),
        ]);
        assert!(agg.user_counts().is_empty());
        assert!(agg.tag_key_counts().is_empty());
        assert_eq!(agg.tags_seen(), 0);
    }

    #[test]
    fn test_tag_without_key_is_ignored() {
        let agg = aggregate(vec![
            open("node", &[("user", "dave")]),
            open("tag", &[("v", "value only")]),
            close("tag"),
            close("node"),
        ]);
        assert!(agg.tag_key_counts().is_empty());
        assert_eq!(agg.tags_seen(), 1);
    }

    #[test]
    fn test_scope_ends_at_node_close() {
        let agg = aggregate(vec![
            open("node", &[("user", "erin")]),
            close("node"),
            open("way", &[]),
            open("tag", &[("k", "building")]),
            close("tag"),
            close("way"),
        ]);
        assert!(agg.tag_key_counts().is_empty());
    }

    #[test]
    fn test_nested_node_is_not_counted() {
        let agg = aggregate(vec![
            open("node", &[("user", "outer")]),
            open("node", &[("user", "inner")]),
            close("node"),
            open("tag", &[("k", "after")]),
            close("tag"),
            close("node"),
        ]);
        assert_eq!(agg.user_counts().count("outer"), 1);
        assert_eq!(agg.user_counts().count("inner"), 0);
        assert!(agg.tag_key_counts().is_empty());
    }

    #[test]
    fn test_consume_stops_at_first_error() {
        let mut agg = OsmAggregator::new();
        let events = vec![
            Ok(open("node", &[("user", "alice")])),
            Err(StatsError::scan(10, "broken")),
            Ok(open("node", &[("user", "bob")])),
        ];
        assert!(agg.consume(events).is_err());
        assert_eq!(agg.user_counts().count("bob"), 0);
    }

    #[test]
    fn test_prefixed_user_attribute_is_not_counted() {
        let agg = aggregate(vec![
            open("node", &[("user", "alice"), ("o:user", "bob")]),
            close("node"),
            open("node", &[("o:user", "carol")]),
            open("tag", &[("o:k", "prefixed")]),
            close("tag"),
            close("node"),
        ]);
        assert_eq!(agg.user_counts().count("alice"), 1);
        assert_eq!(agg.user_counts().count("bob"), 0);
        assert_eq!(agg.user_counts().count("carol"), 0);
        assert!(agg.tag_key_counts().is_empty());
    }

    #[test]
    fn test_bad_escape_in_counted_attribute_is_error() {
        let mut agg = OsmAggregator::new();
        let events = crate::scanner::EventScanner::new(std::io::Cursor::new(
            r#"<osm><node user="a &bogus; b"/></osm>"#,
        ));
        assert!(matches!(agg.consume(events), Err(StatsError::Scan { .. })));
    }
}
