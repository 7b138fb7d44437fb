/*!
Rank a list of items with pairwise questions, and merge the rankings of several people
into a consensus.

- [`InsertionSession`] and [`BatchSession`] place new items in a ranking by binary
  search, one "which one do you prefer?" question at a time, with undo.
- [`aggregate`] and [`run_aggregation_stats`] combine the rankings of several people
  with positional (Borda) scoring.

See the [manual] for the details of the scoring rules.
*/
mod batch;
pub mod builder;
mod config;
mod history;
pub mod manual;
mod session;

use log::{debug, info, warn};

use std::{
    collections::{HashMap, HashSet},
    ops::{Add, AddAssign},
};

pub use crate::batch::BatchSession;
pub use crate::config::*;
pub use crate::history::History;
pub use crate::session::{advance, max_comparisons, InsertionSession, InsertionState, SessionEvent};

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct ItemIdx(u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct Score(u64);

impl Score {
    const EMPTY: Score = Score(0);
}

impl std::iter::Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Score(iter.map(|s| s.0).sum())
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        self.0 += rhs.0;
    }
}

impl Add for Score {
    type Output = Score;
    fn add(self: Score, rhs: Score) -> Score {
        Score(self.0 + rhs.0)
    }
}

// The position of every item in one contribution.
// Invariant: one entry per item of the list, in list order.
#[derive(Eq, PartialEq, Debug, Clone)]
struct PositionMap {
    positions: Vec<usize>,
}

/// Combines the rankings of several people into one consensus order, with the default
/// rules.
///
/// ```
/// use pairwise_ranking::{aggregate, Contribution, Item};
///
/// let items = vec![Item::new("a", "A"), Item::new("b", "B"), Item::new("c", "C")];
/// let contributions = vec![
///     Contribution::new("ann", &["b", "a", "c"]),
///     Contribution::new("bob", &["b", "c", "a"]),
/// ];
/// let order = aggregate(&items, &contributions)?;
/// assert_eq!(order[0].id, "b");
/// # Ok::<(), pairwise_ranking::RankingErrors>(())
/// ```
pub fn aggregate(
    items: &[Item],
    contributions: &[Contribution],
) -> Result<Vec<Item>, RankingErrors> {
    let res = run_aggregation_stats(items, contributions, &AggregationRules::DEFAULT_RULES)?;
    Ok(res.order)
}

/// Runs the positional scoring over all the contributions.
///
/// Arguments:
/// * `items` the canonical list of items. Its order is the starting point of the
/// tiebreak and the answer when there is no contribution.
/// * `contributions` the rankings of each person. They may omit items, which then count
/// as ranked last.
/// * `rules` the tiebreak and validation rules.
pub fn run_aggregation_stats(
    items: &[Item],
    contributions: &[Contribution],
    rules: &AggregationRules,
) -> Result<ConsensusResult, RankingErrors> {
    info!(
        "Processing {:?} contributions over {:?} items, rules: {:?}",
        contributions.len(),
        items.len(),
        rules
    );

    let index: HashMap<&str, ItemIdx> = check_items(items)?;

    if contributions.is_empty() || items.is_empty() {
        debug!("run_aggregation_stats: nothing to score, keeping the list order");
        return Ok(ConsensusResult {
            order: items.to_vec(),
            scores: items
                .iter()
                .map(|it| ItemScore {
                    id: it.id.clone(),
                    score: 0,
                })
                .collect(),
            contribution_count: contributions.len(),
            // Everything is tied at 0: the list order decides.
            tiebreak_occurred: items.len() > 1,
        });
    }

    let n = items.len();
    let mut totals: Vec<Score> = vec![Score::EMPTY; n];
    for c in contributions.iter() {
        let pm = position_map(c, &index, n, rules.unknown_item_mode)?;
        debug!(
            "run_aggregation_stats: positions for {:?}: {:?}",
            c.person_id, pm.positions
        );
        for (idx, pos) in pm.positions.iter().enumerate() {
            totals[idx] += Score((n - pos) as u64);
        }
    }

    let (sorted, tiebreak_occurred) = sort_by_score(items, &totals, rules.tiebreak_mode);
    for (rank, idx) in sorted.iter().enumerate() {
        let i = idx.0 as usize;
        info!("{:>4} {:>6} {}", rank + 1, totals[i].0, items[i].id);
    }

    Ok(ConsensusResult {
        order: sorted.iter().map(|idx| items[idx.0 as usize].clone()).collect(),
        scores: sorted
            .iter()
            .map(|idx| ItemScore {
                id: items[idx.0 as usize].id.clone(),
                score: totals[idx.0 as usize].0,
            })
            .collect(),
        contribution_count: contributions.len(),
        tiebreak_occurred,
    })
}

fn check_items(items: &[Item]) -> Result<HashMap<&str, ItemIdx>, RankingErrors> {
    let mut index: HashMap<&str, ItemIdx> = HashMap::new();
    for (idx, it) in items.iter().enumerate() {
        if index.insert(it.id.as_str(), ItemIdx(idx as u32)).is_some() {
            return Err(RankingErrors::DuplicateItemIdentity(it.id.clone()));
        }
    }
    Ok(index)
}

// Items missing from the contribution are put in the last position. The position of
// a ranked item counts only the known items ranked before it.
fn position_map(
    contribution: &Contribution,
    index: &HashMap<&str, ItemIdx>,
    n: usize,
    unknown_item_mode: UnknownItemMode,
) -> Result<PositionMap, RankingErrors> {
    let mut positions: Vec<usize> = vec![n - 1; n];
    let mut seen: HashSet<ItemIdx> = HashSet::new();
    let mut pos: usize = 0;
    for id in contribution.ranking.iter() {
        match index.get(id.as_str()) {
            Some(idx) if seen.contains(idx) => {
                warn!(
                    "position_map: {:?} ranked {:?} more than once, keeping the first one",
                    contribution.person_id, id
                );
            }
            Some(idx) => {
                seen.insert(*idx);
                positions[idx.0 as usize] = pos;
                pos += 1;
            }
            None if unknown_item_mode == UnknownItemMode::Ignore => {
                warn!(
                    "position_map: {:?} ranked unknown item {:?}, ignoring it",
                    contribution.person_id, id
                );
            }
            None => {
                return Err(RankingErrors::UnknownItemIdentity {
                    person_id: contribution.person_id.clone(),
                    item_id: id.clone(),
                });
            }
        }
    }
    Ok(PositionMap { positions })
}

// Returns the items by decreasing score, and whether the tiebreak had to be used.
fn sort_by_score(
    items: &[Item],
    totals: &[Score],
    tiebreak: TieBreakMode,
) -> (Vec<ItemIdx>, bool) {
    let mut sorted: Vec<ItemIdx> = (0..items.len()).map(|i| ItemIdx(i as u32)).collect();
    match tiebreak {
        TieBreakMode::UseItemOrder => {
            // Stable sort: equal scores keep the list order.
            sorted.sort_by_key(|idx| std::cmp::Reverse(totals[idx.0 as usize]));
        }
        TieBreakMode::Random(seed) => {
            let keys: Vec<String> = items.iter().map(|it| tiebreak_key(seed, &it.id)).collect();
            sorted.sort_by(|a, b| {
                let (ia, ib) = (a.0 as usize, b.0 as usize);
                totals[ib]
                    .cmp(&totals[ia])
                    .then_with(|| keys[ia].cmp(&keys[ib]))
                    .then_with(|| ia.cmp(&ib))
            });
        }
    }
    let distinct: HashSet<Score> = totals.iter().cloned().collect();
    let tiebreak_occurred = distinct.len() < totals.len();
    if tiebreak_occurred {
        debug!(
            "sort_by_score: tiebreak {:?} applied on equal scores",
            tiebreak
        );
    }
    (sorted, tiebreak_occurred)
}

/// The sort key of an item under the random tiebreak. Hard to guess in advance, but
/// stable for a given seed.
fn tiebreak_key(seed: u32, id: &str) -> String {
    sha256::digest(format!("{:08}{}", seed, id))
}
