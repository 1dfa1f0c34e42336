pub mod player;
pub mod score;

pub use player::{collect_lines, parse_batsmen, parse_bowlers, PlayerLines, PlayerName};
pub use score::{innings_length, parse_score, read_score, ScoreReading};
