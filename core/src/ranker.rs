// Multileave is an open source engine for online evaluation of ranking functions.
// Copyright (C) 2026 the Multileave authors
//
// This code is licensed under the GNU Affero General Public License.

use crate::query::{DocId, Query};

/// Capability contract for a candidate ranking strategy.
///
/// A ranker holds a mutable cursor over its per-query ordering. The comparison
/// core mutates it in place during list construction (cursor advance via
/// [`next`](Ranker::next), removal-set updates via
/// [`rm_document`](Ranker::rm_document)), so a ranker instance must be owned
/// exclusively by one query's processing. The `&mut` receivers make sharing a
/// live cursor across concurrent queries a compile error; use one instance per
/// in-flight query.
pub trait Ranker {
    /// Resets the internal cursor and builds the ordering for `query`.
    ///
    /// Must be callable repeatedly; a ranker is never reused across queries
    /// without re-initialization.
    fn init_ranking(&mut self, query: &Query);

    /// Returns and consumes the next document, skipping removed ones.
    ///
    /// `None` means the ranker is exhausted. Returning `None` before
    /// [`document_count`](Ranker::document_count) draws have been served is a
    /// contract violation and fails the query.
    fn next(&mut self) -> Option<DocId>;

    /// Marks `doc` unavailable for future [`next`](Ranker::next) calls.
    ///
    /// Removing an unknown or already-removed document is a no-op, never an
    /// error. This is the expected case when ranker candidate sets differ.
    fn rm_document(&mut self, doc: DocId);

    /// Total candidate document count for the current query.
    fn document_count(&self) -> usize;

    /// The full ordering produced for the current query, best first.
    ///
    /// Unlike [`next`](Ranker::next), this is unaffected by cursor state and
    /// removals; inference uses it to look up where a ranker placed a document.
    fn docids(&self) -> &[DocId];

    /// 1-indexed position of `doc` in this ranker's ordering, or `None` if the
    /// ranker does not rank it at all.
    fn rank_of(&self, doc: DocId) -> Option<usize> {
        self.docids().iter().position(|&d| d == doc).map(|i| i + 1)
    }
}
