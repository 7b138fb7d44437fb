use crate::config::*;
use crate::session::{InsertionSession, SessionEvent};

use std::ops::Range;

/// Inserts a queue of new items into an existing ranking, one after the other, and
/// reports the progress over the whole queue.
///
/// All the items of the batch share one undo history: going back from the first
/// matchup of an item returns to the last matchup of the previous one.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BatchSession {
    session: InsertionSession,
    total: usize,
}

impl BatchSession {
    pub fn new(existing: Vec<Item>, new_items: Vec<Item>) -> BatchSession {
        let session = InsertionSession::new(existing, new_items);
        // Duplicates were dropped by the session, count what it actually queued.
        let total = session.placed_count()
            + session.pending().len()
            + usize::from(session.candidate().is_some());
        BatchSession { session, total }
    }

    /// Ranks a whole list: the first item is taken as it is, the others form the batch.
    pub fn from_scratch(items: Vec<Item>) -> BatchSession {
        let mut rest = items;
        if rest.is_empty() {
            return BatchSession::new(vec![], vec![]);
        }
        let seed = rest.remove(0);
        BatchSession::new(vec![seed], rest)
    }

    /// Items fully inserted so far.
    pub fn processed_count(&self) -> usize {
        self.session.placed_count()
    }

    /// The length of the queue of new items at the start of the batch.
    pub fn total_count(&self) -> usize {
        self.total
    }

    pub fn current_matchup(&self) -> Option<&Matchup> {
        self.session.current_matchup()
    }

    pub fn choose(&mut self, choice: MatchupChoice) -> Result<Option<Placement>, SessionError> {
        self.session.choose(choice)
    }

    pub fn can_go_back(&self) -> bool {
        self.session.can_go_back()
    }

    pub fn go_back(&mut self) -> Result<(), SessionError> {
        self.session.go_back()
    }

    pub fn apply(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        self.session.apply(event)
    }

    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    pub fn result(&self) -> &[Item] {
        self.session.result()
    }

    pub fn into_result(self) -> Vec<Item> {
        self.session.into_result()
    }

    pub fn candidate(&self) -> Option<&Item> {
        self.session.candidate()
    }

    pub fn search_range(&self) -> Range<usize> {
        self.session.search_range()
    }

    pub fn last_placement(&self) -> Option<&Placement> {
        self.session.last_placement()
    }

    pub fn session(&self) -> &InsertionSession {
        &self.session
    }
}
