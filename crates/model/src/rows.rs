//! Row contracts for the data API.
//!
//! Every nullable column is optional here and resolved to a documented
//! default when mapped into the domain:
//! - blank strings become `None`
//! - list entries are trimmed and blanks dropped
//! - unrecognised enum text maps to the enum's unknown variant
//!   (work modes and org-size preferences that don't parse are dropped)
//! - a missing `salary_min` means no salary expectation, whatever `salary_max` says

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    CandidateProfile, CompanyProfile, FundingStage, JobPosting, JobSkill, JobStatus,
    OrgSizePreference, SalaryExpectation, Skill, SkillWeight, WorkMode,
};

const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_REQUIRED_LEVEL: u8 = 3;

/// A candidate skill as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillRow {
    pub name: String,
    #[serde(default)]
    pub years_experience: Option<f32>,
}

/// A candidate as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateRow {
    pub id: String,
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub skills: Option<Vec<SkillRow>>,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub salary_currency: Option<String>,
    pub location: Option<String>,
    pub work_modes: Option<Vec<String>>,
    pub willing_to_relocate: Option<bool>,
    pub interested_industries: Option<Vec<String>>,
    pub values: Option<Vec<String>>,
    pub character_traits: Option<Vec<String>>,
    pub preferred_company_size: Option<Vec<String>>,
    pub org_size_preference: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A company as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyRow {
    pub id: String,
    pub name: Option<String>,
    pub industry: Option<Vec<String>>,
    pub values: Option<Vec<String>>,
    pub desired_traits: Option<Vec<String>>,
    pub funding_stage: Option<String>,
    pub remote_policy: Option<String>,
    pub headquarters_location: Option<String>,
    pub company_size_range: Option<String>,
    pub team_size: Option<u32>,
}

/// A job's skill requirement as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobSkillRow {
    pub name: String,
    #[serde(default)]
    pub required_level: Option<u8>,
    #[serde(default)]
    pub minimum_years: Option<f32>,
    #[serde(default)]
    pub weight: Option<String>,
}

/// A job posting as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRow {
    pub id: String,
    pub company_id: String,
    pub title: Option<String>,
    pub status: Option<String>,
    pub skills: Option<Vec<JobSkillRow>>,
    pub created_at: Option<DateTime<Utc>>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn clean_list(values: Option<Vec<String>>) -> Vec<String> {
    values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| non_blank(Some(v)))
        .collect()
}

impl From<CandidateRow> for CandidateProfile {
    fn from(row: CandidateRow) -> Self {
        let skills = row
            .skills
            .unwrap_or_default()
            .into_iter()
            .filter(|s| !s.name.trim().is_empty())
            .map(|s| Skill::new(s.name.trim(), s.years_experience.unwrap_or(0.0)))
            .collect();

        let salary = row.salary_min.map(|min| SalaryExpectation {
            min,
            max: row.salary_max.filter(|max| *max >= min),
            currency: non_blank(row.salary_currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        });

        let mut work_modes: Vec<WorkMode> = Vec::new();
        for mode in clean_list(row.work_modes).iter().map(|m| WorkMode::from(m.as_str())) {
            if mode != WorkMode::Unspecified && !work_modes.contains(&mode) {
                work_modes.push(mode);
            }
        }

        let org_size_preference = non_blank(row.org_size_preference)
            .map(|p| OrgSizePreference::from(p.as_str()))
            .filter(|p| *p != OrgSizePreference::Unspecified);

        Self {
            id: row.id,
            full_name: non_blank(row.full_name),
            headline: non_blank(row.headline),
            skills,
            salary,
            location: non_blank(row.location),
            work_modes,
            willing_to_relocate: row.willing_to_relocate.unwrap_or(false),
            interested_industries: clean_list(row.interested_industries),
            values: clean_list(row.values),
            traits: clean_list(row.character_traits),
            preferred_company_sizes: clean_list(row.preferred_company_size),
            org_size_preference,
            created_at: row.created_at,
        }
    }
}

impl From<CompanyRow> for CompanyProfile {
    fn from(row: CompanyRow) -> Self {
        Self {
            id: row.id,
            name: non_blank(row.name).unwrap_or_default(),
            industries: clean_list(row.industry),
            values: clean_list(row.values),
            desired_traits: clean_list(row.desired_traits),
            funding_stage: row
                .funding_stage
                .as_deref()
                .map(FundingStage::from)
                .unwrap_or_default(),
            remote_policy: non_blank(row.remote_policy),
            headquarters: non_blank(row.headquarters_location),
            size_range: non_blank(row.company_size_range),
            team_size: row.team_size,
        }
    }
}

impl From<JobSkillRow> for JobSkill {
    fn from(row: JobSkillRow) -> Self {
        Self {
            name: row.name.trim().to_string(),
            required_level: row.required_level.unwrap_or(DEFAULT_REQUIRED_LEVEL).clamp(1, 5),
            minimum_years: row.minimum_years.unwrap_or(0.0).max(0.0),
            weight: row
                .weight
                .as_deref()
                .map(SkillWeight::from)
                .unwrap_or_default(),
        }
    }
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.id,
            company_id: row.company_id,
            title: non_blank(row.title).unwrap_or_default(),
            status: row.status.as_deref().map(JobStatus::from).unwrap_or_default(),
            skills: row
                .skills
                .unwrap_or_default()
                .into_iter()
                .filter(|s| !s.name.trim().is_empty())
                .map(JobSkill::from)
                .collect(),
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompanySizeBucket;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_candidate_row_maps_every_column() {
        let row: CandidateRow = serde_json::from_value(serde_json::json!({
            "id": "cand-7",
            "full_name": "  Ada Example ",
            "headline": "",
            "skills": [
                { "name": "Rust", "years_experience": 5.0 },
                { "name": "  " },
                { "name": "SQL" }
            ],
            "salary_min": 90000,
            "salary_max": 120000,
            "location": "Berlin, Germany",
            "work_modes": ["Remote", "hybrid", "remote", "sometimes"],
            "willing_to_relocate": true,
            "interested_industries": ["Fintech", ""],
            "values": ["Transparency"],
            "character_traits": ["Curious"],
            "preferred_company_size": ["11-50"],
            "org_size_preference": "small_10_50",
            "created_at": "2024-03-01T12:00:00Z"
        }))
        .unwrap();

        let profile = CandidateProfile::from(row);

        assert_eq!(profile.id, "cand-7");
        assert_eq!(profile.full_name.as_deref(), Some("Ada Example"));
        assert_eq!(profile.headline, None);
        assert_eq!(profile.skills, vec![Skill::new("Rust", 5.0), Skill::new("SQL", 0.0)]);
        assert_eq!(
            profile.salary,
            Some(SalaryExpectation {
                min: 90_000,
                max: Some(120_000),
                currency: "USD".to_string(),
            })
        );
        assert_eq!(profile.location.as_deref(), Some("Berlin, Germany"));
        assert_eq!(profile.work_modes, vec![WorkMode::Remote, WorkMode::Hybrid]);
        assert!(profile.willing_to_relocate);
        assert_eq!(profile.interested_industries, vec!["Fintech".to_string()]);
        assert_eq!(profile.values, vec!["Transparency".to_string()]);
        assert_eq!(profile.traits, vec!["Curious".to_string()]);
        assert_eq!(profile.preferred_company_sizes, vec!["11-50".to_string()]);
        assert_eq!(profile.org_size_preference, Some(OrgSizePreference::Small10To50));
        assert!(profile.created_at.is_some());
    }

    #[test]
    fn test_empty_candidate_row_uses_defaults() {
        let row: CandidateRow = serde_json::from_str(r#"{"id": "cand-0"}"#).unwrap();
        let profile = CandidateProfile::from(row);

        assert_eq!(profile, CandidateProfile::new("cand-0"));
    }

    #[test]
    fn test_salary_max_below_min_is_ignored() {
        let row = CandidateRow {
            id: "c".into(),
            salary_min: Some(100_000),
            salary_max: Some(50_000),
            salary_currency: Some("EUR".into()),
            ..Default::default()
        };
        let salary = CandidateProfile::from(row).salary.unwrap();
        assert_eq!(salary.max, None);
        assert_eq!(salary.currency, "EUR");
    }

    #[test]
    fn test_salary_without_min_is_absent() {
        let row = CandidateRow {
            id: "c".into(),
            salary_max: Some(50_000),
            ..Default::default()
        };
        assert_eq!(CandidateProfile::from(row).salary, None);
    }

    #[test]
    fn test_company_row_mapping() {
        let row: CompanyRow = serde_json::from_value(serde_json::json!({
            "id": "co-1",
            "name": "Acme",
            "industry": ["Fintech", "Payments"],
            "values": ["Ownership"],
            "desired_traits": ["Pragmatic"],
            "funding_stage": "Series A",
            "remote_policy": "Remote-first",
            "headquarters_location": "Berlin, Germany",
            "team_size": 40
        }))
        .unwrap();

        let company = CompanyProfile::from(row);
        assert_eq!(company.name, "Acme");
        assert_eq!(company.industries, vec!["Fintech".to_string(), "Payments".to_string()]);
        assert_eq!(company.funding_stage, FundingStage::SeriesA);
        assert_eq!(company.remote_policy.as_deref(), Some("Remote-first"));
        assert_eq!(company.headquarters.as_deref(), Some("Berlin, Germany"));
        assert_eq!(company.size_range, None);
        assert_eq!(company.size_bucket(), CompanySizeBucket::From11To50);
    }

    #[test]
    fn test_job_row_mapping() {
        let row: JobRow = serde_json::from_value(serde_json::json!({
            "id": "job-1",
            "company_id": "co-1",
            "title": "Backend Engineer",
            "status": "published",
            "skills": [
                { "name": "Rust", "required_level": 9, "weight": "required" },
                { "name": "Kafka", "minimum_years": -1.0 }
            ]
        }))
        .unwrap();

        let job = JobPosting::from(row);
        assert!(job.is_published());
        assert_eq!(job.skills.len(), 2);
        assert_eq!(job.skills[0].required_level, 5);
        assert_eq!(job.skills[0].weight, SkillWeight::Required);
        assert_eq!(job.skills[1].required_level, DEFAULT_REQUIRED_LEVEL);
        assert_eq!(job.skills[1].minimum_years, 0.0);
        assert_eq!(job.skills[1].weight, SkillWeight::Preferred);
    }
}
