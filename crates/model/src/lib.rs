//! Core domain model for talentmatch candidate matching.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `CandidateProfile` / `CompanyProfile`: the matching-relevant profile data
//! - `JobPosting` / `JobSkill`: roles a company publishes and what they require
//! - `MatchSignal`: why a single dimension scored the way it did
//! - `MatchBreakdown`: overall and per-dimension result for one candidate/target pair
//! - Unlock contract types: receipts, records and stable error codes
//!
//! Row contracts (`CandidateRow`, `CompanyRow`, `JobRow`) describe the
//! snake_case shapes the data API returns and map totally into the domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod rows;

pub use rows::{CandidateRow, CompanyRow, JobRow, JobSkillRow, SkillRow};

/// Funding stage of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FundingStage {
    PreSeed,
    Seed,
    SeriesA,
    SeriesB,
    SeriesC,
    /// Series D and later rounds
    SeriesDPlus,
    Public,
    Bootstrapped,
    /// Not stated or not recognised
    Unknown,
}

impl Default for FundingStage {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<&str> for FundingStage {
    fn from(s: &str) -> Self {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '+')
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "preseed" => Self::PreSeed,
            "seed" => Self::Seed,
            "seriesa" => Self::SeriesA,
            "seriesb" => Self::SeriesB,
            "seriesc" => Self::SeriesC,
            "seriesd" | "seriesd+" | "seriesdplus" | "seriese" | "seriesf" => Self::SeriesDPlus,
            "public" | "ipo" => Self::Public,
            "bootstrapped" | "selffunded" => Self::Bootstrapped,
            _ => Self::Unknown,
        }
    }
}

impl FundingStage {
    /// Display label as the marketplace shows it.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PreSeed => "Pre-seed",
            Self::Seed => "Seed",
            Self::SeriesA => "Series A",
            Self::SeriesB => "Series B",
            Self::SeriesC => "Series C",
            Self::SeriesDPlus => "Series D+",
            Self::Public => "Public",
            Self::Bootstrapped => "Bootstrapped",
            Self::Unknown => "Unknown",
        }
    }
}

/// How a candidate wants to work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkMode {
    Remote,
    Hybrid,
    OnSite,
    Unspecified,
}

impl From<&str> for WorkMode {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "remote" | "fullyremote" => Self::Remote,
            "hybrid" => Self::Hybrid,
            "onsite" | "office" | "inoffice" | "inperson" => Self::OnSite,
            _ => Self::Unspecified,
        }
    }
}

/// Organisation size a candidate prefers to work in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrgSizePreference {
    #[serde(rename = "tiny_under_10")]
    TinyUnder10,
    #[serde(rename = "small_10_50")]
    Small10To50,
    #[serde(rename = "medium_50_200")]
    Medium50To200,
    #[serde(rename = "large_200_1000")]
    Large200To1000,
    #[serde(rename = "enterprise_1000_plus")]
    Enterprise1000Plus,
    #[serde(rename = "unspecified")]
    Unspecified,
}

impl From<&str> for OrgSizePreference {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "tiny_under_10" => Self::TinyUnder10,
            "small_10_50" => Self::Small10To50,
            "medium_50_200" => Self::Medium50To200,
            "large_200_1000" => Self::Large200To1000,
            "enterprise_1000_plus" => Self::Enterprise1000Plus,
            _ => Self::Unspecified,
        }
    }
}

/// Company headcount bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompanySizeBucket {
    UpTo10,
    From11To50,
    From51To200,
    From201To500,
    From501To1000,
    Over1000,
    Unknown,
}

impl Default for CompanySizeBucket {
    fn default() -> Self {
        Self::Unknown
    }
}

impl CompanySizeBucket {
    /// Bucket label in the marketplace's range notation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UpTo10 => "1-10",
            Self::From11To50 => "11-50",
            Self::From51To200 => "51-200",
            Self::From201To500 => "201-500",
            Self::From501To1000 => "501-1000",
            Self::Over1000 => "1000+",
            Self::Unknown => "unknown",
        }
    }

    /// Bucket for an exact headcount. Zero is treated as unknown.
    pub fn from_team_size(size: u32) -> Self {
        match size {
            0 => Self::Unknown,
            1..=10 => Self::UpTo10,
            11..=50 => Self::From11To50,
            51..=200 => Self::From51To200,
            201..=500 => Self::From201To500,
            501..=1000 => Self::From501To1000,
            _ => Self::Over1000,
        }
    }

    /// Parse a range string such as `"11-50"`, `"1,001-5,000 employees"` or `"1000+"`.
    ///
    /// The upper bound decides the bucket; an open range counts as just
    /// above its lower bound. Trailing words after a bound are ignored.
    pub fn from_range(range: &str) -> Self {
        let range = range.trim();
        let size = match range.split_once('-') {
            Some((_, upper)) => leading_count(upper),
            None if range.contains('+') => leading_count(range).map(|lower| lower.saturating_add(1)),
            None => leading_count(range),
        };
        size.map(Self::from_team_size).unwrap_or_default()
    }
}

/// Leading number of a range bound, ignoring thousands separators.
fn leading_count(bound: &str) -> Option<u32> {
    let digits: String = bound
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Publication status of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobStatus {
    Draft,
    Published,
    Closed,
    Unknown,
}

impl Default for JobStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "draft" => Self::Draft,
            "published" | "active" | "open" => Self::Published,
            "closed" | "filled" | "archived" => Self::Closed,
            _ => Self::Unknown,
        }
    }
}

/// Whether a job skill is a hard requirement or a nice-to-have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillWeight {
    Required,
    Preferred,
}

impl Default for SkillWeight {
    fn default() -> Self {
        Self::Preferred
    }
}

impl From<&str> for SkillWeight {
    fn from(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("required") {
            Self::Required
        } else {
            Self::Preferred
        }
    }
}

impl SkillWeight {
    /// Points this skill contributes to the skills dimension total.
    pub fn points(&self) -> u32 {
        match self {
            Self::Required => 2,
            Self::Preferred => 1,
        }
    }
}

/// Proficiency level (1-5) derived from years of experience.
pub fn proficiency_for_years(years: f32) -> u8 {
    if years < 1.0 {
        1
    } else if years < 2.0 {
        2
    } else if years < 4.0 {
        3
    } else if years < 7.0 {
        4
    } else {
        5
    }
}

/// A skill held by a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    pub years_of_experience: f32,
    /// Derived from `years_of_experience`
    pub level: u8,
}

impl Skill {
    pub fn new(name: impl Into<String>, years_of_experience: f32) -> Self {
        let years = years_of_experience.max(0.0);
        Self {
            name: name.into(),
            years_of_experience: years,
            level: proficiency_for_years(years),
        }
    }
}

/// A skill a job asks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSkill {
    pub name: String,
    /// Required proficiency (1-5)
    pub required_level: u8,
    pub minimum_years: f32,
    pub weight: SkillWeight,
}

impl JobSkill {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_level: 3,
            minimum_years: 0.0,
            weight: SkillWeight::Required,
        }
    }

    pub fn preferred(name: impl Into<String>) -> Self {
        Self {
            weight: SkillWeight::Preferred,
            ..Self::required(name)
        }
    }
}

/// Salary a candidate expects, in whole currency units per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryExpectation {
    pub min: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    pub currency: String,
}

impl SalaryExpectation {
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min,
            max: Some(max),
            currency: "USD".to_string(),
        }
    }

    /// Upper bound, falling back to 130% of the minimum when unset.
    pub fn effective_max(&self) -> f64 {
        match self.max {
            Some(max) => f64::from(max),
            None => f64::from(self.min) * 1.3,
        }
    }
}

/// The parts of a candidate profile the matcher looks at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,

    #[serde(default)]
    pub skills: Vec<Skill>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<SalaryExpectation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default)]
    pub work_modes: Vec<WorkMode>,

    #[serde(default)]
    pub willing_to_relocate: bool,

    #[serde(default)]
    pub interested_industries: Vec<String>,

    #[serde(default)]
    pub values: Vec<String>,

    /// Self-reported character traits
    #[serde(default)]
    pub traits: Vec<String>,

    /// Free-form company size tags, e.g. `"11-50"` or `"startup"`
    #[serde(default)]
    pub preferred_company_sizes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_size_preference: Option<OrgSizePreference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CandidateProfile {
    /// Create an otherwise empty profile.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_skills(mut self, skills: Vec<Skill>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_salary(mut self, min: u32, max: u32) -> Self {
        self.salary = Some(SalaryExpectation::new(min, max));
        self
    }

    pub fn with_work_modes(mut self, modes: Vec<WorkMode>) -> Self {
        self.work_modes = modes;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn wants(&self, mode: WorkMode) -> bool {
        self.work_modes.contains(&mode)
    }
}

/// The parts of a company profile the matcher looks at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub industries: Vec<String>,

    #[serde(default)]
    pub values: Vec<String>,

    #[serde(default)]
    pub desired_traits: Vec<String>,

    #[serde(default)]
    pub funding_stage: FundingStage,

    /// Free text, e.g. "Remote-first" or "Hybrid, 3 days in office"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_policy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarters: Option<String>,

    /// Size range string, e.g. `"11-50"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_range: Option<String>,

    /// Exact headcount, used when `size_range` is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_size: Option<u32>,
}

impl CompanyProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_funding_stage(mut self, stage: FundingStage) -> Self {
        self.funding_stage = stage;
        self
    }

    /// Resolved headcount bucket: range string first, then team size.
    pub fn size_bucket(&self) -> CompanySizeBucket {
        let from_range = self
            .size_range
            .as_deref()
            .map(CompanySizeBucket::from_range)
            .unwrap_or_default();

        match (from_range, self.team_size) {
            (CompanySizeBucket::Unknown, Some(size)) => CompanySizeBucket::from_team_size(size),
            (bucket, _) => bucket,
        }
    }
}

/// A job posting owned by a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: String,
    pub company_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub skills: Vec<JobSkill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl JobPosting {
    pub fn new(id: impl Into<String>, company_id: impl Into<String>, skills: Vec<JobSkill>) -> Self {
        Self {
            id: id.into(),
            company_id: company_id.into(),
            title: String::new(),
            status: JobStatus::Published,
            skills,
            created_at: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == JobStatus::Published
    }
}

/// A skill requirement merged across one or more job postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSkill {
    pub name: String,
    pub required_level: u8,
    pub minimum_years: f32,
    pub weight: SkillWeight,
    /// Number of postings asking for this skill
    pub frequency: u32,
}

impl From<&JobSkill> for AggregatedSkill {
    fn from(skill: &JobSkill) -> Self {
        Self {
            name: skill.name.clone(),
            required_level: skill.required_level,
            minimum_years: skill.minimum_years,
            weight: skill.weight,
            frequency: 1,
        }
    }
}

/// The requirements a target imposes on the skills dimension.
///
/// Built per matching request and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSkillProfile {
    pub skills: Vec<AggregatedSkill>,
}

impl AggregatedSkillProfile {
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }
}

/// One independently scored axis of fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Skills,
    Industry,
    Culture,
    Compensation,
    Location,
    StageFit,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Self::Skills,
        Self::Industry,
        Self::Culture,
        Self::Compensation,
        Self::Location,
        Self::StageFit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Skills => "Skills",
            Self::Industry => "Industry",
            Self::Culture => "Culture",
            Self::Compensation => "Compensation",
            Self::Location => "Location",
            Self::StageFit => "Stage Fit",
        }
    }
}

/// What a dimension scorer observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum MatchSignal {
    /// Target lists no skill requirements
    NoSkillRequirements,

    /// Weighted share of required skills the candidate holds
    SkillsMatched {
        matched: Vec<String>,
        missing: Vec<String>,
    },

    /// Target does not restrict industries
    AnyIndustry,

    /// Candidate is interested in one of the target's industries
    IndustryMatch { industries: Vec<String> },

    /// Candidate declared no industry interests
    OpenToIndustries,

    /// Candidate's interests and target's industries do not meet
    IndustryMismatch,

    /// Values and traits overlap
    CultureOverlap {
        values_similarity: f64,
        traits_similarity: f64,
        /// Raw blend fell below the floor
        floored: bool,
    },

    /// Candidate stated no salary expectation
    SalaryUnspecified,

    /// Candidate range meets the target's band
    SalaryWithinBand { overlap: f64 },

    /// Candidate minimum is above the band's top
    SalaryAboveBand { percent_over: f64 },

    /// Candidate maximum is below the band's bottom
    SalaryBelowBand,

    RemoteMatch,

    HybridMatch,

    SameCity { city: String, onsite: bool },

    WillingToRelocate,

    /// Candidate wants remote but the target is not remote-first
    RemoteMismatch,

    LocationUnclear,

    /// Candidate's org-size preference is compatible with the company size
    SizePreferenceMatch { bucket: String },

    /// Candidate's free-form size tags mention the company size
    SizeTagOverlap { bucket: String },

    NoSizePreference,

    /// Company size could not be determined
    CompanySizeUnknown,

    SizeMismatch { bucket: String },
}

impl MatchSignal {
    /// Short label for this signal.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoSkillRequirements => "No Skill Requirements",
            Self::SkillsMatched { .. } => "Skills Matched",
            Self::AnyIndustry => "Any Industry",
            Self::IndustryMatch { .. } => "Industry Match",
            Self::OpenToIndustries => "Open To Industries",
            Self::IndustryMismatch => "Industry Mismatch",
            Self::CultureOverlap { .. } => "Culture Overlap",
            Self::SalaryUnspecified => "Salary Unspecified",
            Self::SalaryWithinBand { .. } => "Within Budget",
            Self::SalaryAboveBand { .. } => "Above Budget",
            Self::SalaryBelowBand => "Below Budget",
            Self::RemoteMatch => "Remote Match",
            Self::HybridMatch => "Hybrid Match",
            Self::SameCity { .. } => "Same City",
            Self::WillingToRelocate => "Will Relocate",
            Self::RemoteMismatch => "Remote Mismatch",
            Self::LocationUnclear => "Location Unclear",
            Self::SizePreferenceMatch { .. } => "Size Preference Match",
            Self::SizeTagOverlap { .. } => "Size Tag Overlap",
            Self::NoSizePreference => "No Size Preference",
            Self::CompanySizeUnknown => "Company Size Unknown",
            Self::SizeMismatch { .. } => "Size Mismatch",
        }
    }
}

/// Score and rationale for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    /// 0-100
    pub score: u8,
    /// Short human-readable explanation
    pub reason: String,
    pub signal: MatchSignal,
}

/// Scores for every dimension of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScores {
    pub skills: DimensionScore,
    pub industry: DimensionScore,
    pub culture: DimensionScore,
    pub compensation: DimensionScore,
    pub location: DimensionScore,
    pub stage_fit: DimensionScore,
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> &DimensionScore {
        match dimension {
            Dimension::Skills => &self.skills,
            Dimension::Industry => &self.industry,
            Dimension::Culture => &self.culture,
            Dimension::Compensation => &self.compensation,
            Dimension::Location => &self.location,
            Dimension::StageFit => &self.stage_fit,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &DimensionScore)> {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// The result of scoring one candidate against one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBreakdown {
    pub candidate_id: String,
    pub target_id: String,
    /// Weighted sum of dimension scores, 0-100
    pub overall_score: u8,
    pub dimensions: DimensionScores,
}

/// A candidate placed in a ranked result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    /// 1-based position
    pub rank: usize,
    pub candidate: CandidateProfile,
    pub breakdown: MatchBreakdown,
}

/// Offset pagination over the candidate pool, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCandidatesQuery {
    /// Zero-based page number
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    20
}

impl Default for RecentCandidatesQuery {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: default_page_size(),
        }
    }
}

impl RecentCandidatesQuery {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }

    /// Whether rows remain after this page.
    pub fn has_more(&self, total: usize) -> bool {
        self.offset().saturating_add(self.page_size) < total
    }
}

/// One page of recent candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCandidatesPage {
    pub candidates: Vec<CandidateProfile>,
    pub has_more: bool,
}

/// A persisted record of a company unlocking a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRecord {
    pub id: String,
    pub candidate_id: String,
    pub company_id: String,
    pub credits_spent: u32,
    pub unlocked_at: DateTime<Utc>,
}

/// Outcome of a successful unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnlockStatus {
    /// Credits were charged and a new record written
    Unlocked,
    /// A record already existed; nothing was charged
    AlreadyUnlocked,
}

impl UnlockStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unlocked => "UNLOCKED",
            Self::AlreadyUnlocked => "ALREADY_UNLOCKED",
        }
    }
}

/// Successful unlock response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockReceipt {
    pub candidate: CandidateProfile,
    pub credits_remaining: u32,
    pub record: UnlockRecord,
    pub status: UnlockStatus,
}

/// Unlock failures, each with a stable code callers branch on.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnlockError {
    #[error("Insufficient credits: {required} required, {available} available")]
    InsufficientCredits { required: u32, available: u32 },

    #[error("Candidate not found: {candidate_id}")]
    NotFound { candidate_id: String },

    #[error("Company is not authorized to unlock candidates")]
    Unauthorized,

    #[error("Invalid unlock request: {message}")]
    InvalidRequest { message: String },
}

impl UnlockError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientCredits { .. } => "INSUFFICIENT_CREDITS",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
        }
    }
}
