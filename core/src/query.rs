// Multileave is an open source engine for online evaluation of ranking functions.
// Copyright (C) 2026 the Multileave authors
//
// This code is licensed under the GNU Affero General Public License.

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct DocId(pub u32);

/// A query together with its candidate documents and relevance labels.
///
/// The comparison core never inspects the labels or the candidate set; it only
/// hands the query to [`Ranker::init_ranking`](crate::Ranker::init_ranking).
/// Labels are consumed by click simulators and offline evaluation, both of
/// which live outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Query {
    qid: String,
    docids: Vec<DocId>,
    labels: Vec<u8>,
}

impl Query {
    pub fn new(qid: impl Into<String>, docids: Vec<DocId>, labels: Vec<u8>) -> Self {
        Self {
            qid: qid.into(),
            docids,
            labels,
        }
    }

    pub fn qid(&self) -> &str {
        &self.qid
    }

    pub fn docids(&self) -> &[DocId] {
        &self.docids
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn document_count(&self) -> usize {
        self.docids.len()
    }
}
