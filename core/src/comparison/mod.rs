// Multileave is an open source engine for online evaluation of ranking functions.
// Copyright (C) 2026 the Multileave authors
//
// This code is licensed under the GNU Affero General Public License.

pub mod options;
pub mod probabilistic_multileave;
mod schedule;

pub use options::Aggregate;
pub use probabilistic_multileave::ProbabilisticMultileave;
pub use schedule::PermutationCycle;

use crate::query::DocId;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("no rankers to compare")]
    NoRankers,

    #[error("ranker {ranker} exhausted after {emitted} documents, {expected} were scheduled")]
    RankerExhausted {
        ranker: usize,
        emitted: usize,
        expected: usize,
    },

    #[error("document {doc:?} at list position {position} is not ranked by ranker {ranker}")]
    UnrankedDocument {
        ranker: usize,
        position: usize,
        doc: DocId,
    },

    #[error("draw schedule exhausted after {emitted} documents, {expected} were scheduled")]
    ScheduleExhausted { emitted: usize, expected: usize },

    #[error("clicked position {position} is outside the multileaved list of length {list_len}")]
    ClickOutOfBounds { position: usize, list_len: usize },

    #[error("click vector has {clicks} entries but the multileaved list has {list_len} positions")]
    ClickLengthMismatch { clicks: usize, list_len: usize },

    #[error("probability mass exhausted for ranker {ranker} at clicked position {position}")]
    DegenerateDenominator { ranker: usize, position: usize },

    #[error("zero probability mass across all rankers at clicked position {position}")]
    DegenerateRow { position: usize },
}

/// A multileaved result list together with the draw schedule that produced it.
///
/// `assignment[i]` is the index of the ranker that contributed `list[i]`. The
/// assignment is bookkeeping only: outcome inference re-derives contributions
/// from each ranker's own ordering and never reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Multileaved {
    pub list: Vec<DocId>,
    pub assignment: Vec<usize>,
}

impl Multileaved {
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Result of comparing rankers on one impression.
///
/// The variant is fixed at configuration time by the `credits` option, not by
/// the shape of the observed clicks.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Outcome {
    /// One inferred credit per ranker, in ranker order.
    Credits(Vec<f64>),
    /// Competition ranks per ranker, 1 = most preferred, equal credits share
    /// a rank.
    Ranked(Vec<u32>),
}
