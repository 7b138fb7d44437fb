/// A stack of whole-state snapshots.
///
/// The first entry is the floor of the stack: it is never popped.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct History<S> {
    entries: Vec<S>,
}

impl<S: Clone> History<S> {
    pub fn new() -> History<S> {
        History {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: S) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&S> {
        self.entries.last()
    }

    /// True if an entry can be discarded while keeping the floor.
    pub fn can_pop(&self) -> bool {
        self.entries.len() > 1
    }

    /// Discards the most recent entry and returns a copy of the one below it.
    pub fn pop_to_previous(&mut self) -> Option<S> {
        if !self.can_pop() {
            return None;
        }
        self.entries.pop();
        self.entries.last().cloned()
    }
}

impl<S: Clone> Default for History<S> {
    fn default() -> Self {
        History::new()
    }
}
