pub mod cricbuzz;
pub mod espn;

pub use cricbuzz::CricbuzzClient;
pub use espn::{parse_scoreboard_json, EspnClient};
