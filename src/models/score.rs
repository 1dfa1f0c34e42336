use serde::Serialize;

use crate::stats::Overs;

/// Runs, wickets and overs for one side's innings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    /// Runs scored
    pub runs: u32,

    /// Wickets fallen (0-10)
    pub wickets: u32,

    /// Overs bowled, serialized in overs notation
    pub overs: Overs,
}

impl Score {
    /// True when nothing has been scored or bowled yet
    pub fn is_zero(&self) -> bool {
        self.runs == 0 && self.wickets == 0 && self.overs.is_zero()
    }
}
