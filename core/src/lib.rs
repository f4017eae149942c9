// Multileave is an open source engine for online evaluation of ranking functions.
// Copyright (C) 2026 the Multileave authors
//
// This code is licensed under the GNU Affero General Public License.

pub mod comparison;
pub mod query;
pub mod ranker;

pub use comparison::{Multileaved, Outcome, ProbabilisticMultileave};
pub use query::{DocId, Query};
pub use ranker::Ranker;

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
