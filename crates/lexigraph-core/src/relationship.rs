//! Typed relationship sets returned by semantic sources.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::graph::{RelationType, normalize_term};

/// The relationships a semantic source knows about a single word.
///
/// Each bucket is an ordered set, so iteration order (and therefore the order
/// in which expansion adds nodes) is deterministic. Deserializes from the JSON
/// shape `{"is_a": [..], "has_attribute": [..], "used_for": [..], "related_to": [..]}`
/// with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipSet {
    is_a: BTreeSet<String>,
    has_attribute: BTreeSet<String>,
    used_for: BTreeSet<String>,
    related_to: BTreeSet<String>,
}

impl RelationshipSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term to the bucket for `relation`.
    ///
    /// Terms are trimmed; blank terms and [`RelationType::CoOccurrence`] are
    /// ignored. Returns `true` if the term was newly inserted.
    pub fn insert(&mut self, relation: RelationType, term: &str) -> bool {
        let term = term.trim();
        if normalize_term(term).is_empty() {
            return false;
        }
        match self.bucket_mut(relation) {
            Some(bucket) => bucket.insert(term.to_string()),
            None => false,
        }
    }

    /// Builder-style variant of [`insert`](Self::insert).
    ///
    /// # Examples
    ///
    /// ```
    /// # use lexigraph_core::{graph::RelationType, relationship::RelationshipSet};
    /// let set = RelationshipSet::new()
    ///     .with(RelationType::IsA, "activity")
    ///     .with(RelationType::UsedFor, "entertainment");
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn with(mut self, relation: RelationType, term: &str) -> Self {
        self.insert(relation, term);
        self
    }

    /// Returns the terms stored for `relation`.
    pub fn get(&self, relation: RelationType) -> Option<&BTreeSet<String>> {
        match relation {
            RelationType::IsA => Some(&self.is_a),
            RelationType::HasAttribute => Some(&self.has_attribute),
            RelationType::UsedFor => Some(&self.used_for),
            RelationType::RelatedTo => Some(&self.related_to),
            RelationType::CoOccurrence => None,
        }
    }

    fn bucket_mut(&mut self, relation: RelationType) -> Option<&mut BTreeSet<String>> {
        match relation {
            RelationType::IsA => Some(&mut self.is_a),
            RelationType::HasAttribute => Some(&mut self.has_attribute),
            RelationType::UsedFor => Some(&mut self.used_for),
            RelationType::RelatedTo => Some(&mut self.related_to),
            RelationType::CoOccurrence => None,
        }
    }

    pub fn is_a(&self) -> &BTreeSet<String> {
        &self.is_a
    }

    pub fn has_attribute(&self) -> &BTreeSet<String> {
        &self.has_attribute
    }

    pub fn used_for(&self) -> &BTreeSet<String> {
        &self.used_for
    }

    pub fn related_to(&self) -> &BTreeSet<String> {
        &self.related_to
    }

    /// Total number of terms across all buckets.
    pub fn len(&self) -> usize {
        self.is_a.len() + self.has_attribute.len() + self.used_for.len() + self.related_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(relation, term)` pairs bucket by bucket in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (RelationType, &str)> {
        RelationType::SEMANTIC.into_iter().flat_map(move |relation| {
            self.get(relation)
                .into_iter()
                .flatten()
                .map(move |term| (relation, term.as_str()))
        })
    }

    /// Drops blank entries that may arrive from deserialized payloads.
    pub fn sanitized(self) -> Self {
        let mut clean = Self::new();
        for (relation, term) in self.iter() {
            clean.insert(relation, term);
        }
        clean
    }
}
