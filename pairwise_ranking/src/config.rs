// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// An item to be ranked.
///
/// The identity of an item is its `id`. The title is only carried around for display.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Item {
    pub id: String,
    pub title: String,
}

impl Item {
    pub fn new(id: &str, title: &str) -> Item {
        Item {
            id: id.to_string(),
            title: title.to_string(),
        }
    }
}

/// The two items presented to a person for one preference judgment.
///
/// The left item is always the candidate currently being placed, the right item is
/// already part of the ranking.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Matchup {
    pub left: Item,
    pub right: Item,
}

/// Which side of a matchup was preferred. There is no tie.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum MatchupChoice {
    Left,
    Right,
}

/// One person's ranking (full or partial) of a shared list of items.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Contribution {
    pub person_id: String,
    pub display_name: Option<String>,
    /// The item ids, highest rank first.
    pub ranking: Vec<String>,
    /// Milliseconds since the Unix epoch, if known.
    pub updated_at: Option<u64>,
}

impl Contribution {
    pub fn new(person_id: &str, ranking: &[&str]) -> Contribution {
        Contribution {
            person_id: person_id.to_string(),
            display_name: None,
            ranking: ranking.iter().map(|s| s.to_string()).collect(),
            updated_at: None,
        }
    }
}

// ******** Output data structures *********

/// An item got placed in the working order of a session.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Placement {
    pub item: Item,
    /// The rank position, 0 being the highest.
    pub position: usize,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ItemScore {
    pub id: String,
    pub score: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ConsensusResult {
    pub order: Vec<Item>,
    /// The total score of each item, in the consensus order.
    pub scores: Vec<ItemScore>,
    pub contribution_count: usize,
    /// True if some items had the same score and the tiebreak rule had to decide.
    pub tiebreak_occurred: bool,
}

/// Errors that prevent the aggregation from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RankingErrors {
    /// The same id appears twice in the list of items.
    DuplicateItemIdentity(String),
    /// A contribution refers to an item that is not part of the list.
    UnknownItemIdentity { person_id: String, item_id: String },
    /// A contribution without a person attached to it.
    EmptyContributor,
}

impl Error for RankingErrors {}

impl Display for RankingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingErrors::DuplicateItemIdentity(id) => {
                write!(f, "duplicate item id {:?} in the list", id)
            }
            RankingErrors::UnknownItemIdentity { person_id, item_id } => write!(
                f,
                "contribution of {:?} refers to unknown item {:?}",
                person_id, item_id
            ),
            RankingErrors::EmptyContributor => write!(f, "contribution without a person id"),
        }
    }
}

/// Calls on a session that cannot apply in its current state.
///
/// The session is left untouched when one of these is returned, so callers that
/// gate their affordances on `is_complete` / `can_go_back` may ignore them.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SessionError {
    NoPendingComparison,
    NothingToUndo,
}

impl Error for SessionError {}

impl Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NoPendingComparison => write!(f, "no comparison is pending"),
            SessionError::NothingToUndo => write!(f, "nothing to undo"),
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// Items with the same score keep the order of the list of items.
    UseItemOrder,
    /// Items with the same score are ordered by a cryptographic hash of the seed and
    /// the item id. The outcome is hard to guess in advance but always the same for
    /// the same seed.
    Random(u32),
}

/// What to do with a contribution that mentions an item outside of the list.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum UnknownItemMode {
    Reject,
    Ignore,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AggregationRules {
    pub tiebreak_mode: TieBreakMode,
    pub unknown_item_mode: UnknownItemMode,
}

impl AggregationRules {
    pub const DEFAULT_RULES: AggregationRules = AggregationRules {
        tiebreak_mode: TieBreakMode::UseItemOrder,
        unknown_item_mode: UnknownItemMode::Reject,
    };
}

impl Default for AggregationRules {
    fn default() -> Self {
        AggregationRules::DEFAULT_RULES
    }
}
