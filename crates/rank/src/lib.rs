//! Candidate scoring and ranking.
//!
//! Scores every candidate against a target across six independent
//! dimensions, combines them with configurable weights and produces
//! threshold-filtered, stably sorted rankings with explanations.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use talentmatch_features::to_score;
use talentmatch_model::{
    AggregatedSkillProfile, CandidateProfile, CompanyProfile, Dimension, DimensionScores,
    FundingStage, JobPosting, MatchBreakdown, RankedCandidate,
};

pub mod dimensions;
mod engine;
mod requirements;

pub use engine::MatchEngine;
pub use requirements::{aggregate_requirements, job_requirements, MAX_AGGREGATED_SKILLS};

/// Weight of each dimension in the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Weights {
    pub skills: f64,
    pub industry: f64,
    pub culture: f64,
    pub compensation: f64,
    pub location: f64,
    pub stage_fit: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            skills: 0.25,
            industry: 0.15,
            culture: 0.30,
            compensation: 0.15,
            location: 0.10,
            stage_fit: 0.05,
        }
    }
}

impl Weights {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Skills => self.skills,
            Dimension::Industry => self.industry,
            Dimension::Culture => self.culture,
            Dimension::Compensation => self.compensation,
            Dimension::Location => self.location,
            Dimension::StageFit => self.stage_fit,
        }
    }

    pub fn sum(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.get(*d)).sum()
    }
}

/// Expected annual salary range for a company.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryBand {
    pub min: u32,
    pub max: u32,
}

impl SalaryBand {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Band used when a stage has no entry in the table.
pub const DEFAULT_SALARY_BAND: SalaryBand = SalaryBand::new(60_000, 120_000);

/// Salary band per funding stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalaryBands(pub HashMap<FundingStage, SalaryBand>);

impl Default for SalaryBands {
    fn default() -> Self {
        Self(HashMap::from([
            (FundingStage::PreSeed, SalaryBand::new(40_000, 90_000)),
            (FundingStage::Seed, SalaryBand::new(60_000, 120_000)),
            (FundingStage::SeriesA, SalaryBand::new(80_000, 150_000)),
            (FundingStage::SeriesB, SalaryBand::new(100_000, 180_000)),
            (FundingStage::SeriesC, SalaryBand::new(120_000, 200_000)),
            (FundingStage::SeriesDPlus, SalaryBand::new(140_000, 230_000)),
            (FundingStage::Public, SalaryBand::new(130_000, 250_000)),
            (FundingStage::Bootstrapped, SalaryBand::new(50_000, 110_000)),
        ]))
    }
}

impl SalaryBands {
    /// Band for a stage, falling back to the Seed band and then the default.
    pub fn band_for(&self, stage: FundingStage) -> SalaryBand {
        self.0
            .get(&stage)
            .or_else(|| self.0.get(&FundingStage::Seed))
            .copied()
            .unwrap_or(DEFAULT_SALARY_BAND)
    }
}

/// Configuration for dimension scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    pub weights: Weights,
    /// Lowest culture score ever reported
    pub culture_floor: u8,
    /// Skills score when the target lists no requirements
    pub neutral_skills_score: u8,
    pub salary_bands: SalaryBands,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            culture_floor: 30,
            neutral_skills_score: 50,
            salary_bands: SalaryBands::default(),
        }
    }
}

/// Configuration for the ranking pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RankConfig {
    pub scoring: ScoringConfig,
    /// Candidates below this overall score are dropped
    pub min_overall_score: u8,
    /// Results returned when the caller doesn't ask for a count
    pub default_limit: usize,
    /// Candidates pulled from the store per ranking request
    pub pool_size: usize,
    /// Upper bound on the fetch phase of a request
    pub fetch_timeout_ms: u64,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            min_overall_score: 65,
            default_limit: 10,
            pool_size: 500,
            fetch_timeout_ms: 5_000,
        }
    }
}

impl RankConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// What a candidate is scored against: a company, or one of its jobs.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTarget {
    /// Company id, or job id when targeting a single posting
    pub id: String,
    pub company: CompanyProfile,
    pub requirements: AggregatedSkillProfile,
}

impl MatchTarget {
    /// Target a company with requirements aggregated across its postings.
    pub fn company(company: CompanyProfile, requirements: AggregatedSkillProfile) -> Self {
        Self {
            id: company.id.clone(),
            company,
            requirements,
        }
    }

    /// Target a single job; the company supplies every non-skill dimension.
    pub fn job(job: &JobPosting, company: CompanyProfile) -> Self {
        Self {
            id: job.id.clone(),
            company,
            requirements: job_requirements(job),
        }
    }
}

/// Combine dimension scores into the overall score.
///
/// Weights are normalized by their sum so custom tables stay on the 0-100 scale.
pub fn aggregate(scores: &DimensionScores, weights: &Weights) -> u8 {
    let total_weight = weights.sum();
    if total_weight <= 0.0 {
        return 0;
    }

    let weighted: f64 = scores
        .iter()
        .map(|(dimension, score)| weights.get(dimension) * f64::from(score.score))
        .sum();

    to_score(weighted / total_weight)
}

/// Score one candidate against a target.
pub fn score_candidate(
    candidate: &CandidateProfile,
    target: &MatchTarget,
    config: &ScoringConfig,
) -> MatchBreakdown {
    let company = &target.company;
    let dimensions = DimensionScores {
        skills: dimensions::score_skills(candidate, &target.requirements, config),
        industry: dimensions::score_industry(candidate, company),
        culture: dimensions::score_culture(candidate, company, config),
        compensation: dimensions::score_compensation(candidate, company, config),
        location: dimensions::score_location(candidate, company),
        stage_fit: dimensions::score_stage_fit(candidate, company),
    };

    MatchBreakdown {
        candidate_id: candidate.id.clone(),
        target_id: target.id.clone(),
        overall_score: aggregate(&dimensions, &config.weights),
        dimensions,
    }
}

/// Score, filter, sort and truncate a candidate pool.
///
/// Candidates with equal overall scores keep their pool order.
pub fn rank(
    target: &MatchTarget,
    pool: Vec<CandidateProfile>,
    limit: usize,
    config: &RankConfig,
) -> Vec<RankedCandidate> {
    let mut scored: Vec<(CandidateProfile, MatchBreakdown)> = pool
        .into_iter()
        .map(|candidate| {
            let breakdown = score_candidate(&candidate, target, &config.scoring);
            (candidate, breakdown)
        })
        .filter(|(_, breakdown)| breakdown.overall_score >= config.min_overall_score)
        .collect();

    // Vec::sort_by is stable
    scored.sort_by(|a, b| b.1.overall_score.cmp(&a.1.overall_score));
    scored.truncate(limit);

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (candidate, breakdown))| RankedCandidate {
            rank: i + 1,
            candidate,
            breakdown,
        })
        .collect()
}
