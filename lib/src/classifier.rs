// lib/src/classifier.rs

//! Score to tier mapping. Every view that shows a tier goes through
//! `classify`, so the thresholds live in exactly one place.

use models::errors::{GuardError, GuardResult};
use models::risk::{RiskAssessment, RiskTier, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};

/// Maps a risk score to its tier.
///
/// Boundaries are half-open: `< 40` is Low, `40..80` is Medium, `>= 80` is
/// High. Finite scores outside `[0, 100]` fall into the nearest boundary tier.
///
/// # Errors
/// Returns `GuardError::InvalidScore` for `NaN` or infinite input.
pub fn classify(score: f64) -> GuardResult<RiskTier> {
    if !score.is_finite() {
        return Err(GuardError::InvalidScore(score));
    }

    let tier = if score < MEDIUM_RISK_THRESHOLD {
        RiskTier::Low
    } else if score < HIGH_RISK_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::High
    };
    Ok(tier)
}

/// Like `classify`, but returns the label and severity token alongside.
pub fn assess(score: f64) -> GuardResult<RiskAssessment> {
    classify(score).map(|tier| RiskAssessment::new(score, tier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::risk::Severity;

    #[test]
    fn should_respect_half_open_boundaries() {
        assert_eq!(classify(39.999).unwrap(), RiskTier::Low);
        assert_eq!(classify(40.0).unwrap(), RiskTier::Medium);
        assert_eq!(classify(79.999).unwrap(), RiskTier::Medium);
        assert_eq!(classify(80.0).unwrap(), RiskTier::High);
    }

    #[test]
    fn should_clamp_out_of_range_scores() {
        assert_eq!(classify(-5.0).unwrap(), RiskTier::Low);
        assert_eq!(classify(150.0).unwrap(), RiskTier::High);
        assert_eq!(classify(f64::MIN).unwrap(), RiskTier::Low);
        assert_eq!(classify(f64::MAX).unwrap(), RiskTier::High);
    }

    #[test]
    fn should_reject_non_finite_scores() {
        for score in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(classify(score), Err(GuardError::InvalidScore(_))));
            assert!(assess(score).is_err());
        }
    }

    #[test]
    fn should_be_deterministic() {
        for score in (-20..=120).map(|s| s as f64 * 0.5) {
            assert_eq!(classify(score).unwrap(), classify(score).unwrap());
        }
    }

    #[test]
    fn should_classify_demo_scores() {
        let tiers: Vec<RiskTier> = [85.0, 55.0, 25.0, 92.0, 65.0]
            .into_iter()
            .map(|s| classify(s).unwrap())
            .collect();
        assert_eq!(
            tiers,
            vec![RiskTier::High, RiskTier::Medium, RiskTier::Low, RiskTier::High, RiskTier::Medium]
        );
    }

    #[test]
    fn should_assess_with_presentation_metadata() {
        let assessment = assess(82.0).unwrap();
        assert_eq!(assessment.tier, RiskTier::High);
        assert_eq!(assessment.label, "High Risk");
        assert_eq!(assessment.severity, Severity::Destructive);
        assert_eq!(assessment.score, 82.0);
    }
}
