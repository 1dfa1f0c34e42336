pub mod listing;
pub mod match_state;
pub mod player;
pub mod score;

pub use listing::{MatchCandidate, MatchIndexEntry};
pub use match_state::{
    ChaseInfo, MatchDetails, MatchRecord, Partnership, TeamChance, TeamState, WinProbability,
};
pub use player::{Batsman, Bowler, Players};
pub use score::Score;
