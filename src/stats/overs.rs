use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use tracing::warn;

use crate::error::DataQualityIssue;

/// Balls in one over
pub const BALLS_PER_OVER: u32 = 6;

/// Tolerance used when checking that a float carries a single tenths digit
const NOTATION_EPSILON: f64 = 1e-6;

/// A quantity of overs, stored canonically as a ball count.
///
/// Cricket writes overs as `completed.balls`, where the digit after the point
/// is the number of balls bowled in the current over (0-5). `19.2` is 19 overs
/// and 2 balls, i.e. 116 balls, not 19.2 decimal overs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Overs {
    balls: u32,
}

impl Overs {
    pub const ZERO: Overs = Overs { balls: 0 };

    pub fn from_balls(balls: u32) -> Self {
        Self { balls }
    }

    /// Build from completed overs plus balls into the current over
    pub fn new(completed: u32, balls: u32) -> Result<Self, DataQualityIssue> {
        if balls >= BALLS_PER_OVER {
            return Err(DataQualityIssue::BallDigitOutOfRange {
                raw: format!("{}.{}", completed, balls),
                digit: balls.min(u8::MAX as u32) as u8,
            });
        }
        completed
            .checked_mul(BALLS_PER_OVER)
            .and_then(|b| b.checked_add(balls))
            .map(Self::from_balls)
            .ok_or_else(|| DataQualityIssue::NumberOutOfRange {
                raw: format!("{}.{}", completed, balls),
            })
    }

    /// Parse a float written in overs notation, rejecting out-of-domain ball digits
    pub fn from_notation(overs: f64) -> Result<Self, DataQualityIssue> {
        checked_overs_to_balls(overs).map(Self::from_balls)
    }

    /// Total balls bowled
    pub fn balls(self) -> u32 {
        self.balls
    }

    /// Completed six-ball overs
    pub fn completed(self) -> u32 {
        self.balls / BALLS_PER_OVER
    }

    /// Balls bowled in the over currently in progress
    pub fn balls_into_over(self) -> u32 {
        self.balls % BALLS_PER_OVER
    }

    pub fn is_zero(self) -> bool {
        self.balls == 0
    }

    /// The overs-notation number (`116` balls -> `19.2`)
    pub fn as_notation(self) -> f64 {
        balls_to_overs(self.balls)
    }

    /// The true rational number of overs (`116` balls -> `19.333..`)
    pub fn as_decimal(self) -> f64 {
        self.balls as f64 / BALLS_PER_OVER as f64
    }
}

impl fmt::Display for Overs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.balls_into_over() {
            0 => write!(f, "{}", self.completed()),
            b => write!(f, "{}.{}", self.completed(), b),
        }
    }
}

impl FromStr for Overs {
    type Err = DataQualityIssue;

    /// Parse textual overs notation such as `19.2`, `20` or `7.`.
    ///
    /// Parsing is done on the digits directly so no float rounding is involved.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let malformed = || DataQualityIssue::MalformedOvers {
            raw: raw.to_string(),
        };

        let (whole, fraction) = match raw.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (raw, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let completed: u32 = whole
            .parse()
            .map_err(|_| DataQualityIssue::NumberOutOfRange {
                raw: raw.to_string(),
            })?;

        let balls = match fraction.as_bytes() {
            [] => 0,
            [d] if d.is_ascii_digit() => (d - b'0') as u32,
            _ => return Err(malformed()),
        };

        if balls >= BALLS_PER_OVER {
            return Err(DataQualityIssue::BallDigitOutOfRange {
                raw: raw.to_string(),
                digit: balls as u8,
            });
        }

        Overs::new(completed, balls)
    }
}

impl Serialize for Overs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_notation())
    }
}

/// Convert overs notation to a ball count, rejecting values outside cricket's domain.
pub fn checked_overs_to_balls(overs: f64) -> Result<u32, DataQualityIssue> {
    let raw = || overs.to_string();

    if !overs.is_finite() || overs < 0.0 || overs > (u32::MAX / BALLS_PER_OVER) as f64 {
        return Err(DataQualityIssue::NumberOutOfRange { raw: raw() });
    }

    let completed = overs.floor();
    let tenths = (overs - completed) * 10.0;
    let digit = tenths.round();

    if (tenths - digit).abs() > NOTATION_EPSILON {
        return Err(DataQualityIssue::MalformedOvers { raw: raw() });
    }
    if digit >= BALLS_PER_OVER as f64 {
        return Err(DataQualityIssue::BallDigitOutOfRange {
            raw: raw(),
            digit: digit as u8,
        });
    }

    Ok(completed as u32 * BALLS_PER_OVER + digit as u32)
}

/// `floor(overs) * 6 + round(frac(overs) * 10)`.
///
/// Total over every float: an out-of-domain value is logged as a data-quality
/// warning and still converted with the same formula, negative or non-finite
/// input maps to zero.
pub fn overs_to_balls(overs: f64) -> u32 {
    match checked_overs_to_balls(overs) {
        Ok(balls) => balls,
        Err(issue) => {
            warn!("Overs data-quality warning: {}", issue);
            if !overs.is_finite() || overs <= 0.0 {
                return 0;
            }
            let completed = overs.floor();
            let digit = ((overs - completed) * 10.0).round();
            (completed * BALLS_PER_OVER as f64 + digit).min(u32::MAX as f64) as u32
        }
    }
}

/// `floor(balls / 6) + (balls % 6) / 10`: remainder balls become the tenths digit.
pub fn balls_to_overs(balls: u32) -> f64 {
    let tenths = (balls / BALLS_PER_OVER) as u64 * 10 + (balls % BALLS_PER_OVER) as u64;
    tenths as f64 / 10.0
}
