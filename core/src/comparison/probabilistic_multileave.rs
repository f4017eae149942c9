// Multileave is an open source engine for online evaluation of ranking functions.
// Copyright (C) 2026 the Multileave authors
//
// This code is licensed under the GNU Affero General Public License.

use itertools::Itertools;
use rand::Rng;
use tracing::{debug, trace};

use super::options::{Aggregate, ComparisonOptions};
use super::schedule::PermutationCycle;
use super::{Error, Multileaved, Outcome};
use crate::query::{DocId, Query};
use crate::ranker::Ranker;

/// Rank-decay exponent of the inspection model. A document at rank k carries
/// weight n / k^TAU when probability mass is charged against a ranker's
/// ordering. Kept at the reference value so credit numbers stay comparable
/// with prior experiment results.
const TAU: f64 = 0.3;

/// Probabilistic multileaving: compares N rankers on a single impression.
///
/// [`multileave`](Self::multileave) interleaves the rankers' outputs into one
/// result list via a permutation-cycling draw schedule, and
/// [`infer_outcome`](Self::infer_outcome) assigns each ranker credit for the
/// observed clicks by asking, per click, how plausibly each ranker's own
/// ordering explains a click at that position. Contribution is re-derived
/// from rank lookups on [`Ranker::docids`], never from the draw-schedule
/// bookkeeping, so the inference marginalizes over all assignments that could
/// have produced the list.
pub struct ProbabilisticMultileave {
    options: ComparisonOptions,
}

impl Default for ProbabilisticMultileave {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbabilisticMultileave {
    pub fn new() -> Self {
        Self::from_options(ComparisonOptions::default())
    }

    pub fn from_options(options: ComparisonOptions) -> Self {
        Self { options }
    }

    /// Builds the method from a lerot-style argument string, e.g.
    /// `"--aggregate binary -c true"`.
    pub fn from_arg_str(arg_str: &str) -> crate::Result<Self> {
        Ok(Self::from_options(ComparisonOptions::parse(arg_str)?))
    }

    pub fn aggregate(&self) -> Aggregate {
        self.options.aggregate
    }

    /// Whether rankers should select documents deterministically. The
    /// comparison core never branches on this; experiment drivers forward it
    /// to ranker construction.
    pub fn det_interleave(&self) -> bool {
        self.options.det_interleave
    }

    /// Whether the driver asked for observed-assignment comparison instead of
    /// the marginalized inference implemented here.
    pub fn compare_td(&self) -> bool {
        self.options.compare_td
    }

    /// Whether [`infer_outcome`](Self::infer_outcome) returns raw credits
    /// instead of competition ranks.
    pub fn returns_credits(&self) -> bool {
        self.options.credits
    }

    /// Interleaves the rankers' outputs for `query` into one list of at most
    /// `length` documents.
    ///
    /// Every ranker is re-initialized for the query, then documents are drawn
    /// one at a time following a [`PermutationCycle`] schedule: the drawn
    /// ranker emits its next document and all other rankers are told to drop
    /// it, so no document appears twice. The effective length is capped by the
    /// smallest [`Ranker::document_count`].
    pub fn multileave<R>(
        &self,
        rankers: &mut [&mut R],
        query: &Query,
        length: usize,
        rng: &mut (impl Rng + ?Sized),
    ) -> Result<Multileaved, Error>
    where
        R: Ranker + ?Sized,
    {
        let schedule: Vec<usize> = PermutationCycle::new(rankers.len(), rng)
            .take(length)
            .collect();
        self.multileave_scheduled(rankers, query, length, schedule)
    }

    /// [`multileave`](Self::multileave) with an explicit draw schedule, for
    /// deterministic replay. The schedule must yield at least the effective
    /// length and only indices below `rankers.len()`.
    pub fn multileave_scheduled<R>(
        &self,
        rankers: &mut [&mut R],
        query: &Query,
        length: usize,
        schedule: impl IntoIterator<Item = usize>,
    ) -> Result<Multileaved, Error>
    where
        R: Ranker + ?Sized,
    {
        for ranker in rankers.iter_mut() {
            ranker.init_ranking(query);
        }

        let length = rankers
            .iter()
            .map(|r| r.document_count())
            .min()
            .map_or(0, |fewest| fewest.min(length));

        let mut list = Vec::with_capacity(length);
        let mut assignment = Vec::with_capacity(length);
        let mut schedule = schedule.into_iter();

        while list.len() < length {
            let selected = schedule.next().ok_or(Error::ScheduleExhausted {
                emitted: list.len(),
                expected: length,
            })?;

            let pick = rankers[selected].next().ok_or(Error::RankerExhausted {
                ranker: selected,
                emitted: list.len(),
                expected: length,
            })?;
            trace!(ranker = selected, doc = pick.0, "drew document");

            list.push(pick);
            assignment.push(selected);

            for (other, ranker) in rankers.iter_mut().enumerate() {
                if other != selected {
                    ranker.rm_document(pick);
                }
            }
        }

        Ok(Multileaved { list, assignment })
    }

    /// Infers which ranker(s) the clicks are most consistent with.
    ///
    /// `clicks` has one entry per position of `list`. No clicks at all is a
    /// defined tie: every ranker receives credit `1/N` (credits mode) or rank
    /// 1 (ranked mode). Otherwise every ranker is re-initialized for the
    /// query, the per-click probability matrix is computed over the clicked
    /// positions, and the column means become the rankers' credits.
    pub fn infer_outcome<R>(
        &self,
        list: &[DocId],
        rankers: &mut [&mut R],
        clicks: &[bool],
        query: &Query,
    ) -> Result<Outcome, Error>
    where
        R: Ranker + ?Sized,
    {
        if rankers.is_empty() {
            return Err(Error::NoRankers);
        }
        if clicks.len() != list.len() {
            return Err(Error::ClickLengthMismatch {
                clicks: clicks.len(),
                list_len: list.len(),
            });
        }

        let clicked: Vec<usize> = clicks
            .iter()
            .enumerate()
            .filter_map(|(position, &clicked)| clicked.then_some(position))
            .collect();

        if clicked.is_empty() {
            let n = rankers.len();
            return Ok(if self.options.credits {
                Outcome::Credits(vec![1.0 / n as f64; n])
            } else {
                Outcome::Ranked(vec![1; n])
            });
        }

        // Construction advanced every cursor; start over for rank lookups.
        for ranker in rankers.iter_mut() {
            ranker.init_ranking(query);
        }

        let matrix = self.probability_of_list(list, rankers, &clicked)?;
        let credits = Self::credits_of_list(&matrix);
        debug!(?credits, clicks = clicked.len(), "inferred credits");

        Ok(if self.options.credits {
            Outcome::Credits(credits)
        } else {
            Outcome::Ranked(Self::credits_to_outcome(&credits))
        })
    }

    /// Per-click probability that each ranker produced the clicked document.
    ///
    /// Returns one row per clicked position, one column per ranker; rows are
    /// normalized to sum to 1. For ranker r and clicked position c the
    /// unnormalized score is
    ///
    /// ```text
    /// rank_r(list[c]) / (sigmoid_total - sum over p < c of n / rank_r(list[p])^TAU)
    /// ```
    ///
    /// with 1-indexed ranks, `n` the length of ranker 0's ordering and
    /// `sigmoid_total = sum over k in 1..=n of n / k^TAU`. A document missing
    /// from a ranker's ordering fails the computation with
    /// [`Error::UnrankedDocument`] rather than polluting the arithmetic.
    pub fn probability_of_list<R>(
        &self,
        list: &[DocId],
        rankers: &[&mut R],
        clicked: &[usize],
    ) -> Result<Vec<Vec<f64>>, Error>
    where
        R: Ranker + ?Sized,
    {
        if rankers.is_empty() {
            return Err(Error::NoRankers);
        }
        for &click in clicked {
            if click >= list.len() {
                return Err(Error::ClickOutOfBounds {
                    position: click,
                    list_len: list.len(),
                });
            }
        }

        let n = rankers[0].docids().len();
        let sigmoid_total: f64 = (1..=n).map(|k| n as f64 / (k as f64).powf(TAU)).sum();

        let mut rows = vec![vec![0.0; rankers.len()]; clicked.len()];
        for (r, ranker) in rankers.iter().enumerate() {
            let ranks: Vec<Option<usize>> = list.iter().map(|&doc| ranker.rank_of(doc)).collect();

            for (row, &click) in rows.iter_mut().zip(clicked) {
                let rank_c = ranks[click].ok_or(Error::UnrankedDocument {
                    ranker: r,
                    position: click,
                    doc: list[click],
                })?;

                // Decayed mass already used up by documents shown before the click.
                let mut spent = 0.0;
                for (position, rank) in ranks[..click].iter().enumerate() {
                    let rank = rank.ok_or(Error::UnrankedDocument {
                        ranker: r,
                        position,
                        doc: list[position],
                    })?;
                    spent += n as f64 / (rank as f64).powf(TAU);
                }

                let denominator = sigmoid_total - spent;
                if denominator <= 0.0 {
                    return Err(Error::DegenerateDenominator {
                        ranker: r,
                        position: click,
                    });
                }

                row[r] = rank_c as f64 / denominator;
            }
        }

        for (row, &click) in rows.iter_mut().zip(clicked) {
            let total: f64 = row.iter().sum();
            if total <= 0.0 {
                return Err(Error::DegenerateRow { position: click });
            }
            for p in row.iter_mut() {
                *p /= total;
            }
        }

        Ok(rows)
    }

    /// Column-wise mean of a per-click probability matrix: one credit per
    /// ranker. Callers guarantee at least one row.
    pub fn credits_of_list(matrix: &[Vec<f64>]) -> Vec<f64> {
        let Some(first) = matrix.first() else {
            return Vec::new();
        };

        (0..first.len())
            .map(|r| matrix.iter().map(|row| row[r]).sum::<f64>() / matrix.len() as f64)
            .collect()
    }

    /// Converts credits into competition ranks: rank 1 for the highest credit,
    /// exactly equal credits share a rank, and the next distinct credit jumps
    /// past the tied group. `[0.5, 0.5, 0.3]` becomes `[1, 1, 3]`.
    pub fn credits_to_outcome(credits: &[f64]) -> Vec<u32> {
        let order = credits
            .iter()
            .copied()
            .enumerate()
            .sorted_by(|(_, a), (_, b)| b.total_cmp(a));

        let mut ranks = vec![0u32; credits.len()];
        let mut last_credit = f64::NAN;
        let mut last_rank = 0u32;
        for (position, (ranker, credit)) in order.enumerate() {
            if credit == last_credit {
                ranks[ranker] = last_rank;
            } else {
                last_rank = position as u32 + 1;
                last_credit = credit;
                ranks[ranker] = last_rank;
            }
        }

        ranks
    }
}
