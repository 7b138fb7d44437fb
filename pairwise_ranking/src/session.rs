use log::{debug, warn};

use std::collections::{HashSet, VecDeque};
use std::ops::Range;

use crate::config::*;
use crate::history::History;

/// The state of a ranking session at one point in time.
///
/// This is also what the undo history stores: one snapshot for each matchup that was
/// presented.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InsertionState {
    working_order: Vec<Item>,
    pending: VecDeque<Item>,
    candidate: Option<Item>,
    // Half-open range of the positions the candidate may still occupy.
    search_range: Range<usize>,
    current_matchup: Option<Matchup>,
    last_placement: Option<Placement>,
    placed_count: usize,
    comparisons_made: usize,
}

/// The events that move a session forward (or backward).
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SessionEvent {
    Choose(MatchupChoice),
    GoBack,
}

/// Inserts new items one at a time into an ordered list of items, using binary search
/// and pairwise questions.
///
/// ```
/// use pairwise_ranking::{InsertionSession, Item, MatchupChoice};
///
/// let existing = vec![Item::new("a", "Alien"), Item::new("b", "Brazil")];
/// let mut session = InsertionSession::new(existing, vec![Item::new("c", "Casablanca")]);
/// while !session.is_complete() {
///     // Casablanca is preferred to anything.
///     session.choose(MatchupChoice::Left)?;
/// }
/// let ids: Vec<&str> = session.result().iter().map(|it| it.id.as_str()).collect();
/// assert_eq!(ids, vec!["c", "a", "b"]);
/// # Ok::<(), pairwise_ranking::SessionError>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InsertionSession {
    state: InsertionState,
    history: History<InsertionState>,
}

impl InsertionSession {
    /// Starts a session that inserts `new_items` (in order) into `existing`, which is
    /// expected to be already ranked, highest rank first.
    ///
    /// New items whose id is already present are skipped.
    pub fn new(existing: Vec<Item>, new_items: Vec<Item>) -> InsertionSession {
        let mut seen: HashSet<String> = existing.iter().map(|it| it.id.clone()).collect();
        let mut pending: VecDeque<Item> = VecDeque::new();
        for item in new_items {
            if seen.insert(item.id.clone()) {
                pending.push_back(item);
            } else {
                warn!(
                    "InsertionSession::new: skipping duplicate item {:?}",
                    item.id
                );
            }
        }
        debug!(
            "InsertionSession::new: {} ranked items, {} items to insert",
            existing.len(),
            pending.len()
        );
        let mut session = InsertionSession {
            state: InsertionState {
                search_range: 0..existing.len(),
                working_order: existing,
                pending,
                candidate: None,
                current_matchup: None,
                last_placement: None,
                placed_count: 0,
                comparisons_made: 0,
            },
            history: History::new(),
        };
        session.present_next_comparison();
        session
    }

    /// Builds a ranking from nothing: the first item is the seed, and all the other
    /// items get inserted one after the other.
    pub fn from_scratch(items: Vec<Item>) -> InsertionSession {
        let mut rest = items;
        if rest.is_empty() {
            return InsertionSession::new(vec![], vec![]);
        }
        let seed = rest.remove(0);
        InsertionSession::new(vec![seed], rest)
    }

    pub fn current_matchup(&self) -> Option<&Matchup> {
        self.state.current_matchup.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.state.candidate.is_none() && self.state.pending.is_empty()
    }

    /// The ranking built so far. Once the session is complete, this is the final order.
    pub fn result(&self) -> &[Item] {
        &self.state.working_order
    }

    pub fn into_result(self) -> Vec<Item> {
        self.state.working_order
    }

    pub fn candidate(&self) -> Option<&Item> {
        self.state.candidate.as_ref()
    }

    /// The items still waiting to be inserted, not counting the current candidate.
    pub fn pending(&self) -> &VecDeque<Item> {
        &self.state.pending
    }

    pub fn search_range(&self) -> Range<usize> {
        self.state.search_range.clone()
    }

    /// The most recent insertion of an item into the ranking.
    pub fn last_placement(&self) -> Option<&Placement> {
        self.state.last_placement.as_ref()
    }

    /// The number of items inserted since the start of the session (the seed of a
    /// ranking from scratch is not counted).
    pub fn placed_count(&self) -> usize {
        self.state.placed_count
    }

    pub fn comparisons_made(&self) -> usize {
        self.state.comparisons_made
    }

    pub fn state(&self) -> &InsertionState {
        &self.state
    }

    /// Records a preference for the current matchup.
    ///
    /// Returns the placement of the candidate if this choice settled its position.
    /// Without a pending matchup, nothing changes and `NoPendingComparison` is returned.
    pub fn choose(&mut self, choice: MatchupChoice) -> Result<Option<Placement>, SessionError> {
        let matchup = self
            .state
            .current_matchup
            .clone()
            .ok_or(SessionError::NoPendingComparison)?;
        if self.state.candidate.is_none() {
            return Err(SessionError::NoPendingComparison);
        }
        let mid = self
            .state
            .working_order
            .iter()
            .position(|it| it.id == matchup.right.id)
            .ok_or(SessionError::NoPendingComparison)?;
        let range = self.state.search_range.clone();
        self.state.search_range = match choice {
            // The candidate is preferred: it goes above the probed item.
            MatchupChoice::Left => range.start..mid,
            MatchupChoice::Right => (mid + 1)..range.end,
        };
        debug!(
            "choose: {:?} for {:?} vs {:?}: range {:?} -> {:?}",
            choice, matchup.left.id, matchup.right.id, range, self.state.search_range
        );
        self.state.comparisons_made += 1;
        self.state.current_matchup = None;
        Ok(self.present_next_comparison())
    }

    pub fn can_go_back(&self) -> bool {
        if self.is_complete() {
            !self.history.is_empty()
        } else {
            self.history.can_pop()
        }
    }

    /// Rewinds the session by one comparison, and shows the previous matchup again.
    ///
    /// After the session completed, this shows again the last matchup, whose answer
    /// completed the session.
    pub fn go_back(&mut self) -> Result<(), SessionError> {
        let restored = if self.is_complete() {
            self.history.top().cloned()
        } else {
            self.history.pop_to_previous()
        };
        let restored = restored.ok_or(SessionError::NothingToUndo)?;
        debug!(
            "go_back: restoring matchup {:?}, {} snapshots left",
            restored
                .current_matchup
                .as_ref()
                .map(|m| (m.left.id.as_str(), m.right.id.as_str())),
            self.history.len()
        );
        self.state = restored;
        Ok(())
    }

    /// Applies one event to the session.
    pub fn apply(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        match event {
            SessionEvent::Choose(choice) => self.choose(choice).map(|_| ()),
            SessionEvent::GoBack => self.go_back(),
        }
    }

    // Places the candidate if its range is settled, pulls the next items from the queue
    // and stops at the next matchup or at the end of the queue.
    fn present_next_comparison(&mut self) -> Option<Placement> {
        let mut placed: Option<Placement> = None;
        loop {
            let candidate = match self.state.candidate.clone() {
                Some(c) => c,
                None => match self.state.pending.pop_front() {
                    Some(next) => {
                        self.state.search_range = 0..self.state.working_order.len();
                        self.state.candidate = Some(next);
                        continue;
                    }
                    None => {
                        debug!(
                            "present_next_comparison: session complete with {} items",
                            self.state.working_order.len()
                        );
                        return placed;
                    }
                },
            };

            if self.state.search_range.is_empty() {
                let position = self.state.search_range.start;
                debug!(
                    "present_next_comparison: inserting {:?} at position {}",
                    candidate.id, position
                );
                self.state.working_order.insert(position, candidate.clone());
                let placement = Placement {
                    item: candidate,
                    position,
                };
                self.state.last_placement = Some(placement.clone());
                self.state.placed_count += 1;
                self.state.candidate = None;
                placed = Some(placement);
                continue;
            }

            let mid = (self.state.search_range.start + self.state.search_range.end) / 2;
            self.state.current_matchup = Some(Matchup {
                left: candidate,
                right: self.state.working_order[mid].clone(),
            });
            self.history.push(self.state.clone());
            return placed;
        }
    }
}

/// The pure form of the state machine: the input session is left untouched.
pub fn advance(
    session: &InsertionSession,
    event: SessionEvent,
) -> Result<InsertionSession, SessionError> {
    let mut next = session.clone();
    next.apply(event)?;
    Ok(next)
}

/// The worst-case number of matchups to place one item in a ranking of `n` items,
/// ceil(log2(n + 1)).
pub fn max_comparisons(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}
