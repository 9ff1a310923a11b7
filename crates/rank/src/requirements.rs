//! Company-level skill requirements.

use std::collections::HashMap;

use talentmatch_features::normalize_tag;
use talentmatch_model::{AggregatedSkill, AggregatedSkillProfile, JobPosting, SkillWeight};

/// Most skills a company-level requirement profile carries.
pub const MAX_AGGREGATED_SKILLS: usize = 20;

/// Merge the skill requirements of a company's published jobs.
///
/// Skills are keyed by normalized name. A skill required by any job stays
/// required; level and years take the strictest posting. The result keeps
/// the most frequently requested skills first, ties in first-seen order.
pub fn aggregate_requirements(jobs: &[JobPosting]) -> AggregatedSkillProfile {
    let mut merged = merge_skills(jobs.iter().filter(|j| j.is_published()));

    merged.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    merged.truncate(MAX_AGGREGATED_SKILLS);

    tracing::debug!(
        jobs = jobs.len(),
        skills = merged.len(),
        "Aggregated company requirements"
    );

    AggregatedSkillProfile { skills: merged }
}

/// Requirements of a single job, whatever its status.
///
/// A skill listed twice under different spellings counts once.
pub fn job_requirements(job: &JobPosting) -> AggregatedSkillProfile {
    AggregatedSkillProfile {
        skills: merge_skills(std::iter::once(job)),
    }
}

fn merge_skills<'a>(jobs: impl Iterator<Item = &'a JobPosting>) -> Vec<AggregatedSkill> {
    let mut merged: Vec<AggregatedSkill> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for job in jobs {
        let mut seen_in_job = Vec::new();

        for skill in &job.skills {
            let key = normalize_tag(&skill.name);
            if key.is_empty() {
                continue;
            }

            match index.get(&key) {
                Some(&i) => {
                    let existing = &mut merged[i];
                    if skill.weight == SkillWeight::Required {
                        existing.weight = SkillWeight::Required;
                    }
                    existing.required_level = existing.required_level.max(skill.required_level);
                    existing.minimum_years = existing.minimum_years.max(skill.minimum_years);
                    if !seen_in_job.contains(&i) {
                        existing.frequency += 1;
                    }
                    seen_in_job.push(i);
                }
                None => {
                    index.insert(key, merged.len());
                    seen_in_job.push(merged.len());
                    merged.push(AggregatedSkill::from(skill));
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use talentmatch_model::{JobSkill, JobStatus};

    fn names(profile: &AggregatedSkillProfile) -> Vec<&str> {
        profile.skills.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_no_jobs_no_requirements() {
        assert!(aggregate_requirements(&[]).is_empty());
    }

    #[test]
    fn test_orders_by_frequency() {
        let jobs = vec![
            JobPosting::new("j1", "co", vec![JobSkill::preferred("Go"), JobSkill::required("Rust")]),
            JobPosting::new("j2", "co", vec![JobSkill::required("rust"), JobSkill::preferred("SQL")]),
            JobPosting::new("j3", "co", vec![JobSkill::preferred("sql"), JobSkill::required("RUST")]),
        ];

        let profile = aggregate_requirements(&jobs);
        assert_eq!(names(&profile), vec!["Rust", "SQL", "Go"]);
        assert_eq!(profile.skills[0].frequency, 3);
        assert_eq!(profile.skills[1].frequency, 2);
    }

    #[test]
    fn test_required_wins_and_strictest_level_kept() {
        let mut strict = JobSkill::preferred("Rust");
        strict.required_level = 5;
        strict.minimum_years = 6.0;

        let jobs = vec![
            JobPosting::new("j1", "co", vec![strict]),
            JobPosting::new("j2", "co", vec![JobSkill::required("rust")]),
        ];

        let profile = aggregate_requirements(&jobs);
        assert_eq!(profile.len(), 1);
        let skill = &profile.skills[0];
        assert_eq!(skill.weight, SkillWeight::Required);
        assert_eq!(skill.required_level, 5);
        assert_eq!(skill.minimum_years, 6.0);
    }

    #[test]
    fn test_duplicate_within_job_counts_once() {
        let jobs = vec![JobPosting::new(
            "j1",
            "co",
            vec![JobSkill::required("Rust"), JobSkill::preferred("rust ")],
        )];

        let profile = aggregate_requirements(&jobs);
        assert_eq!(profile.len(), 1);
        assert_eq!(profile.skills[0].frequency, 1);
    }

    #[test]
    fn test_unpublished_jobs_ignored() {
        let mut draft = JobPosting::new("j1", "co", vec![JobSkill::required("Cobol")]);
        draft.status = JobStatus::Draft;
        let live = JobPosting::new("j2", "co", vec![JobSkill::required("Rust")]);

        let profile = aggregate_requirements(&[draft, live]);
        assert_eq!(names(&profile), vec!["Rust"]);
    }

    #[test]
    fn test_job_requirements_merge_spellings() {
        let mut draft = JobPosting::new(
            "j1",
            "co",
            vec![JobSkill::preferred("Rust"), JobSkill::required(" rust"), JobSkill::preferred("Go")],
        );
        draft.status = JobStatus::Draft;

        let profile = job_requirements(&draft);
        assert_eq!(names(&profile), vec!["Rust", "Go"]);
        assert_eq!(profile.skills[0].weight, SkillWeight::Required);
        assert_eq!(profile.skills[0].frequency, 1);
    }

    #[test]
    fn test_truncates_to_limit() {
        let skills = (0..30).map(|i| JobSkill::preferred(format!("skill-{}", i))).collect();
        let profile = aggregate_requirements(&[JobPosting::new("j1", "co", skills)]);
        assert_eq!(profile.len(), MAX_AGGREGATED_SKILLS);
        assert_eq!(profile.skills[0].name, "skill-0");
    }
}
