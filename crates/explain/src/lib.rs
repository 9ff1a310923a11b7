//! Explanation generation for candidate matches.
//!
//! Converts match signals into the short human-readable reasons shown next
//! to each dimension score, and summarizes whole breakdowns for list views.

use serde::{Deserialize, Serialize};
use talentmatch_model::{Dimension, MatchBreakdown, MatchSignal};

/// Overall strength of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchLevel {
    Strong,
    Good,
    Fair,
    Weak,
}

impl MatchLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Self::Strong
        } else if score >= 65 {
            Self::Good
        } else if score >= 50 {
            Self::Fair
        } else {
            Self::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Strong => "STRONG MATCH",
            Self::Good => "GOOD MATCH",
            Self::Fair => "FAIR MATCH",
            Self::Weak => "WEAK MATCH",
        }
    }
}

fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

fn list(items: &[String]) -> String {
    items.join(", ")
}

/// Render the reason string for a single signal.
pub fn explain_signal(signal: &MatchSignal) -> String {
    match signal {
        MatchSignal::NoSkillRequirements => {
            "Neutral - no skill requirements to match against".to_string()
        }

        MatchSignal::SkillsMatched { matched, missing } => {
            let total = matched.len() + missing.len();
            if missing.is_empty() {
                format!("Has all {} required skills", total)
            } else if matched.is_empty() {
                format!("Missing all {} required skills: {}", total, list(missing))
            } else {
                format!(
                    "Has {} of {} required skills; missing {}",
                    matched.len(),
                    total,
                    list(missing)
                )
            }
        }

        MatchSignal::AnyIndustry => "Company has no industry restriction".to_string(),

        MatchSignal::IndustryMatch { industries } => {
            format!("Interested in {}", list(industries))
        }

        MatchSignal::OpenToIndustries => "Open to any industry".to_string(),

        MatchSignal::IndustryMismatch => {
            "Interested in different industries".to_string()
        }

        MatchSignal::CultureOverlap {
            values_similarity,
            traits_similarity,
            floored,
        } => {
            let detail = format!(
                "{} values overlap, {} traits overlap",
                percent(*values_similarity),
                percent(*traits_similarity)
            );
            if *floored {
                format!("Limited culture signal ({})", detail)
            } else {
                detail
            }
        }

        MatchSignal::SalaryUnspecified => "No salary expectation stated".to_string(),

        MatchSignal::SalaryWithinBand { overlap } => {
            format!("Salary expectation fits budget ({} overlap)", percent(*overlap))
        }

        MatchSignal::SalaryAboveBand { percent_over } => {
            format!("Salary expectation {:.0}% above budget", percent_over)
        }

        MatchSignal::SalaryBelowBand => "Salary expectation below budget".to_string(),

        MatchSignal::RemoteMatch => "Remote work on both sides".to_string(),

        MatchSignal::HybridMatch => "Hybrid setup works for candidate".to_string(),

        MatchSignal::SameCity { city, onsite } => {
            if *onsite {
                format!("Based in {} and wants on-site work", city)
            } else {
                format!("Based in {}", city)
            }
        }

        MatchSignal::WillingToRelocate => "Willing to relocate".to_string(),

        MatchSignal::RemoteMismatch => {
            "Wants remote; company is not remote-first".to_string()
        }

        MatchSignal::LocationUnclear => "Location fit unclear".to_string(),

        MatchSignal::SizePreferenceMatch { bucket } => {
            format!("Prefers companies of this size ({})", bucket)
        }

        MatchSignal::SizeTagOverlap { bucket } => {
            format!("Mentions company size {}", bucket)
        }

        MatchSignal::NoSizePreference => "Flexible on company size".to_string(),

        MatchSignal::CompanySizeUnknown => "Company size unknown".to_string(),

        MatchSignal::SizeMismatch { bucket } => {
            format!("Prefers a different company size than {}", bucket)
        }
    }
}

/// Dimensions ordered strongest first. Ties keep the canonical order.
pub fn strongest_dimensions(breakdown: &MatchBreakdown) -> Vec<(Dimension, u8)> {
    let mut dims: Vec<_> = breakdown
        .dimensions
        .iter()
        .map(|(d, s)| (d, s.score))
        .collect();
    dims.sort_by(|a, b| b.1.cmp(&a.1));
    dims
}

/// One-line summary of a breakdown for list views.
pub fn summarize_match(breakdown: &MatchBreakdown) -> String {
    let level = MatchLevel::from_score(breakdown.overall_score);
    let top: Vec<_> = strongest_dimensions(breakdown)
        .into_iter()
        .take(2)
        .map(|(d, score)| format!("{} {}", d.label(), score))
        .collect();

    format!(
        "{} ({}): strongest in {}",
        level.label(),
        breakdown.overall_score,
        top.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentmatch_model::{DimensionScore, DimensionScores};

    fn dim(score: u8) -> DimensionScore {
        DimensionScore {
            score,
            reason: String::new(),
            signal: MatchSignal::LocationUnclear,
        }
    }

    fn breakdown(overall: u8) -> MatchBreakdown {
        MatchBreakdown {
            candidate_id: "cand".into(),
            target_id: "co".into(),
            overall_score: overall,
            dimensions: DimensionScores {
                skills: dim(50),
                industry: dim(100),
                culture: dim(30),
                compensation: dim(100),
                location: dim(60),
                stage_fit: dim(75),
            },
        }
    }

    #[test]
    fn test_match_levels() {
        assert_eq!(MatchLevel::from_score(80), MatchLevel::Strong);
        assert_eq!(MatchLevel::from_score(79), MatchLevel::Good);
        assert_eq!(MatchLevel::from_score(65), MatchLevel::Good);
        assert_eq!(MatchLevel::from_score(50), MatchLevel::Fair);
        assert_eq!(MatchLevel::from_score(49), MatchLevel::Weak);
    }

    #[test]
    fn test_explain_skills() {
        let all = MatchSignal::SkillsMatched {
            matched: vec!["Rust".into(), "SQL".into()],
            missing: vec![],
        };
        assert_eq!(explain_signal(&all), "Has all 2 required skills");

        let some = MatchSignal::SkillsMatched {
            matched: vec!["Rust".into()],
            missing: vec!["Kafka".into()],
        };
        assert_eq!(explain_signal(&some), "Has 1 of 2 required skills; missing Kafka");
    }

    #[test]
    fn test_explain_salary_above() {
        let reason = explain_signal(&MatchSignal::SalaryAboveBand { percent_over: 316.7 });
        assert_eq!(reason, "Salary expectation 317% above budget");
    }

    #[test]
    fn test_strongest_dimensions_stable() {
        let dims = strongest_dimensions(&breakdown(49));
        assert_eq!(dims[0], (Dimension::Industry, 100));
        assert_eq!(dims[1], (Dimension::Compensation, 100));
        assert_eq!(dims.last(), Some(&(Dimension::Culture, 30)));
    }

    #[test]
    fn test_summarize_match() {
        let summary = summarize_match(&breakdown(49));
        assert_eq!(summary, "WEAK MATCH (49): strongest in Industry 100, Compensation 100");
    }
}
