use serde::Serialize;

use crate::config::RateConfig;
use crate::models::{ChaseInfo, Score};
use crate::stats::overs::{Overs, BALLS_PER_OVER};

/// Current run rate plus chase statistics when a target is known
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSummary {
    pub current_run_rate: f64,
    pub chase_info: Option<ChaseInfo>,
}

/// Round half away from zero to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Runs per over, rounded to two decimals.
///
/// Overs are taken as the real quantity bowled (`19.2` = 19 overs and 2 balls),
/// so the divisor is `balls / 6`. No balls bowled yields 0.
pub fn current_run_rate(runs: u32, overs: Overs) -> f64 {
    if overs.is_zero() {
        return 0.0;
    }
    round2(runs as f64 / overs.as_decimal())
}

/// Chase statistics for a side needing `target` in an innings of `total_overs`.
///
/// Returns `None` once no balls remain, or when the innings is too long to
/// count in balls. A non-positive `runs_needed` is
/// passed through as-is: the chase is already won and the caller decides how
/// to present that.
pub fn required_run_rate(
    target: u32,
    runs_so_far: u32,
    overs_so_far: Overs,
    total_overs: u32,
) -> Option<ChaseInfo> {
    let total_balls = total_overs as i64 * BALLS_PER_OVER as i64;
    let used_balls = overs_so_far.balls() as i64;
    let remaining_balls = total_balls - used_balls;

    if remaining_balls <= 0 {
        return None;
    }
    let balls_remaining = u32::try_from(remaining_balls).ok()?;

    let runs_needed = target as i64 - runs_so_far as i64;
    let required_run_rate =
        round2(runs_needed as f64 / (remaining_balls as f64 / BALLS_PER_OVER as f64));

    Some(ChaseInfo {
        target,
        runs_needed,
        balls_remaining,
        required_run_rate,
    })
}

/// Rates for a single score, with chase info when a target is supplied.
///
/// `total_overs` falls back to the configured default innings length.
pub fn compute_rates(
    score: &Score,
    target: Option<u32>,
    total_overs: Option<u32>,
    config: &RateConfig,
) -> RateSummary {
    let total_overs = total_overs.unwrap_or(config.default_total_overs);

    RateSummary {
        current_run_rate: current_run_rate(score.runs, score.overs),
        chase_info: target
            .and_then(|t| required_run_rate(t, score.runs, score.overs, total_overs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crr_zero_overs() {
        assert_eq!(current_run_rate(0, Overs::ZERO), 0.0);
        assert_eq!(current_run_rate(57, Overs::ZERO), 0.0);
    }

    #[test]
    fn test_crr_uses_balls() {
        // 135 off 19.2 overs (116 balls)
        assert_eq!(current_run_rate(135, Overs::from_balls(116)), 6.98);
        assert_eq!(current_run_rate(90, Overs::from_balls(60)), 9.0);
    }

    #[test]
    fn test_rrr_chase() {
        let chase = required_run_rate(181, 90, Overs::from_balls(60), 20).unwrap();
        assert_eq!(chase.target, 181);
        assert_eq!(chase.runs_needed, 91);
        assert_eq!(chase.balls_remaining, 60);
        assert_eq!(chase.required_run_rate, 9.10);
    }

    #[test]
    fn test_rrr_absent_when_no_balls_remain() {
        assert!(required_run_rate(181, 150, Overs::from_balls(120), 20).is_none());
        assert!(required_run_rate(181, 150, Overs::from_balls(125), 20).is_none());
        assert!(required_run_rate(181, 0, Overs::ZERO, 0).is_none());
    }

    #[test]
    fn test_rrr_already_won_is_surfaced() {
        let chase = required_run_rate(150, 152, Overs::from_balls(100), 20).unwrap();
        assert_eq!(chase.runs_needed, -2);
        assert!(chase.required_run_rate < 0.0);
    }

    #[test]
    fn test_rrr_odd_balls() {
        // 19.2 overs used in a 20 over innings leaves 4 balls
        let chase = required_run_rate(140, 135, Overs::from_balls(116), 20).unwrap();
        assert_eq!(chase.balls_remaining, 4);
        assert_eq!(chase.required_run_rate, 7.5);
    }

    #[test]
    fn test_compute_rates_default_overs() {
        let score = Score {
            runs: 90,
            wickets: 3,
            overs: Overs::from_balls(60),
        };
        let config = RateConfig::default();

        let t20 = compute_rates(&score, Some(181), None, &config);
        assert_eq!(t20.current_run_rate, 9.0);
        assert_eq!(t20.chase_info.as_ref().unwrap().balls_remaining, 60);

        let odi = compute_rates(&score, Some(181), Some(50), &config);
        assert_eq!(odi.chase_info.unwrap().balls_remaining, 240);

        let no_target = compute_rates(&score, None, None, &config);
        assert!(no_target.chase_info.is_none());
    }

    #[test]
    fn test_rrr_innings_too_long_to_count() {
        assert!(required_run_rate(181, 90, Overs::from_balls(60), u32::MAX).is_none());
    }
}
