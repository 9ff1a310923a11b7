//! Dimension scorers.
//!
//! Each scorer is a pure function returning a 0-100 score with its reason.
//! Missing optional data is never an error: it resolves to the neutral or
//! most permissive score documented on each scorer.

use std::collections::HashSet;

use talentmatch_explain::explain_signal;
use talentmatch_features::{
    contains_ci, intersect_ci, jaccard, normalize_tag, primary_city, range_overlap,
    substring_overlap, tag_set, to_score,
};
use talentmatch_model::{
    AggregatedSkillProfile, CandidateProfile, CompanyProfile, CompanySizeBucket, DimensionScore,
    MatchSignal, OrgSizePreference, WorkMode,
};

use crate::ScoringConfig;

const VALUES_WEIGHT: f64 = 0.6;
const TRAITS_WEIGHT: f64 = 0.4;

fn scored(score: u8, signal: MatchSignal) -> DimensionScore {
    DimensionScore {
        score: score.min(100),
        reason: explain_signal(&signal),
        signal,
    }
}

/// Weighted share of required skills the candidate holds.
///
/// Required skills count double. Names match exactly, ignoring case.
/// No requirements at all yields the configured neutral score.
pub fn score_skills(
    candidate: &CandidateProfile,
    requirements: &AggregatedSkillProfile,
    config: &ScoringConfig,
) -> DimensionScore {
    if requirements.is_empty() {
        return scored(config.neutral_skills_score, MatchSignal::NoSkillRequirements);
    }

    let held: HashSet<String> = candidate
        .skills
        .iter()
        .map(|s| normalize_tag(&s.name))
        .collect();

    let mut total = 0u32;
    let mut earned = 0u32;
    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for skill in &requirements.skills {
        let points = skill.weight.points();
        total += points;
        if held.contains(&normalize_tag(&skill.name)) {
            earned += points;
            matched.push(skill.name.clone());
        } else {
            missing.push(skill.name.clone());
        }
    }

    let score = to_score(f64::from(earned) / f64::from(total.max(1)) * 100.0);
    scored(score, MatchSignal::SkillsMatched { matched, missing })
}

/// Industry interest against the company's industries.
///
/// Discrete: 100 (no restriction or shared industry), 70 (candidate open
/// to anything), 40 (explicit mismatch).
pub fn score_industry(candidate: &CandidateProfile, company: &CompanyProfile) -> DimensionScore {
    if tag_set(&company.industries).is_empty() {
        return scored(100, MatchSignal::AnyIndustry);
    }

    let shared = intersect_ci(&candidate.interested_industries, &company.industries);
    if !shared.is_empty() {
        return scored(100, MatchSignal::IndustryMatch { industries: shared });
    }

    if tag_set(&candidate.interested_industries).is_empty() {
        scored(70, MatchSignal::OpenToIndustries)
    } else {
        scored(40, MatchSignal::IndustryMismatch)
    }
}

/// Jaccard similarity, except that two empty lists carry no evidence.
fn evidence_overlap(a: &[String], b: &[String]) -> f64 {
    if tag_set(a).is_empty() && tag_set(b).is_empty() {
        0.0
    } else {
        jaccard(a, b)
    }
}

/// Blend of values overlap (60%) and traits overlap (40%), floored.
pub fn score_culture(
    candidate: &CandidateProfile,
    company: &CompanyProfile,
    config: &ScoringConfig,
) -> DimensionScore {
    let values_similarity = evidence_overlap(&candidate.values, &company.values);
    let traits_similarity = evidence_overlap(&candidate.traits, &company.desired_traits);

    let raw = to_score((values_similarity * VALUES_WEIGHT + traits_similarity * TRAITS_WEIGHT) * 100.0);
    let floored = raw < config.culture_floor;

    scored(
        raw.max(config.culture_floor),
        MatchSignal::CultureOverlap {
            values_similarity,
            traits_similarity,
            floored,
        },
    )
}

/// Candidate salary expectation against the company's stage band.
///
/// Any overlap scores at least 70. Above the band loses a point per
/// percent over, down to 20. Below the band scores 80. No stated
/// expectation scores 70.
pub fn score_compensation(
    candidate: &CandidateProfile,
    company: &CompanyProfile,
    config: &ScoringConfig,
) -> DimensionScore {
    let Some(salary) = &candidate.salary else {
        return scored(70, MatchSignal::SalaryUnspecified);
    };

    let band = config.salary_bands.band_for(company.funding_stage);
    let (band_min, band_max) = (f64::from(band.min), f64::from(band.max));
    let candidate_min = f64::from(salary.min);
    let candidate_max = salary.effective_max().max(candidate_min);

    let overlap = range_overlap(candidate_min, candidate_max, band_min, band_max);
    if overlap.overlaps {
        return scored(
            to_score(70.0 + overlap.fraction * 30.0),
            MatchSignal::SalaryWithinBand {
                overlap: overlap.fraction,
            },
        );
    }

    if candidate_min > band_max {
        let percent_over = (candidate_min - band_max) / band_max.max(1.0) * 100.0;
        return scored(
            to_score((60.0 - percent_over).max(20.0)),
            MatchSignal::SalaryAboveBand { percent_over },
        );
    }

    scored(80, MatchSignal::SalaryBelowBand)
}

/// Work mode first, then geography.
pub fn score_location(candidate: &CandidateProfile, company: &CompanyProfile) -> DimensionScore {
    let policy = company.remote_policy.as_deref().unwrap_or_default();
    let remote_first = contains_ci(policy, "remote") || contains_ci(policy, "distributed");
    let hybrid = contains_ci(policy, "hybrid");
    let wants_remote = candidate.wants(WorkMode::Remote);

    if remote_first && wants_remote {
        return scored(100, MatchSignal::RemoteMatch);
    }

    if hybrid && (wants_remote || candidate.wants(WorkMode::Hybrid)) {
        return scored(90, MatchSignal::HybridMatch);
    }

    let hq_city = company.headquarters.as_deref().and_then(primary_city);
    if let (Some(city), Some(location)) = (hq_city, candidate.location.as_deref()) {
        if contains_ci(location, &city) {
            let onsite = candidate.wants(WorkMode::OnSite);
            let score = if onsite { 100 } else { 85 };
            return scored(score, MatchSignal::SameCity { city, onsite });
        }
    }

    if candidate.willing_to_relocate {
        return scored(70, MatchSignal::WillingToRelocate);
    }

    if wants_remote && !remote_first {
        return scored(50, MatchSignal::RemoteMismatch);
    }

    scored(60, MatchSignal::LocationUnclear)
}

/// Org-size preferences compatible with a company size, best fit first.
///
/// Unknown sizes have no compatible preferences.
pub fn compatible_org_sizes(bucket: CompanySizeBucket) -> &'static [OrgSizePreference] {
    use OrgSizePreference::*;

    match bucket {
        CompanySizeBucket::UpTo10 => &[TinyUnder10, Small10To50],
        CompanySizeBucket::From11To50 => &[Small10To50, TinyUnder10],
        CompanySizeBucket::From51To200 => &[Medium50To200, Small10To50],
        CompanySizeBucket::From201To500 => &[Medium50To200, Large200To1000],
        CompanySizeBucket::From501To1000 => &[Large200To1000, Medium50To200],
        CompanySizeBucket::Over1000 => &[Enterprise1000Plus, Large200To1000],
        CompanySizeBucket::Unknown => &[],
    }
}

/// Candidate's preferred organisation size against the company's size.
pub fn score_stage_fit(candidate: &CandidateProfile, company: &CompanyProfile) -> DimensionScore {
    let size_tags: Vec<&String> = candidate
        .preferred_company_sizes
        .iter()
        .filter(|t| !t.trim().is_empty())
        .collect();
    let preference = candidate
        .org_size_preference
        .filter(|p| *p != OrgSizePreference::Unspecified);

    if preference.is_none() && size_tags.is_empty() {
        return scored(75, MatchSignal::NoSizePreference);
    }

    let bucket = company.size_bucket();
    if bucket == CompanySizeBucket::Unknown {
        return scored(75, MatchSignal::CompanySizeUnknown);
    }

    let label = bucket.label().to_string();
    if let Some(preference) = preference {
        if compatible_org_sizes(bucket).contains(&preference) {
            return scored(100, MatchSignal::SizePreferenceMatch { bucket: label });
        }
    }

    if size_tags.iter().any(|tag| substring_overlap(tag, &label)) {
        return scored(95, MatchSignal::SizeTagOverlap { bucket: label });
    }

    scored(50, MatchSignal::SizeMismatch { bucket: label })
}
