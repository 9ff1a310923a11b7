//! In-memory store backed by fixture data.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use talentmatch_model::{
    CandidateProfile, CandidateRow, CompanyProfile, CompanyRow, JobPosting, JobRow,
    RecentCandidatesQuery, UnlockError, UnlockReceipt, UnlockRecord, UnlockStatus,
};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{LedgerError, ProfileStore, StoreError, UnlockLedger};

/// Credits charged per unlock.
pub const DEFAULT_UNLOCK_COST: u32 = 1;

/// Seed data in the data API's row shapes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub companies: Vec<CompanyRow>,
    pub candidates: Vec<CandidateRow>,
    pub jobs: Vec<JobRow>,
    /// Credit balance per company id
    pub credits: HashMap<String, u32>,
}

#[derive(Debug, Default)]
struct Profiles {
    companies: HashMap<String, CompanyProfile>,
    /// Newest first
    candidates: Vec<CandidateProfile>,
    jobs: Vec<JobPosting>,
}

type UnlockKey = (String, String);

/// Store that keeps everything in process memory.
#[derive(Debug)]
pub struct MemoryStore {
    profiles: RwLock<Profiles>,
    credits: Mutex<HashMap<String, u32>>,
    unlocks: Mutex<HashMap<UnlockKey, UnlockRecord>>,
    unlock_cost: u32,
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> Option<DateTime<Utc>>) {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(Profiles::default()),
            credits: Mutex::new(HashMap::new()),
            unlocks: Mutex::new(HashMap::new()),
            unlock_cost: DEFAULT_UNLOCK_COST,
        }
    }

    /// Build a store from fixture rows.
    pub fn from_fixture(fixture: Fixture) -> Self {
        let mut profiles = Profiles {
            companies: fixture
                .companies
                .into_iter()
                .map(CompanyProfile::from)
                .map(|c| (c.id.clone(), c))
                .collect(),
            candidates: fixture.candidates.into_iter().map(CandidateProfile::from).collect(),
            jobs: fixture.jobs.into_iter().map(JobPosting::from).collect(),
        };
        newest_first(&mut profiles.candidates, |c| c.created_at);
        newest_first(&mut profiles.jobs, |j| j.created_at);

        Self {
            profiles: RwLock::new(profiles),
            credits: Mutex::new(fixture.credits),
            ..Self::new()
        }
    }

    /// Parse a JSON fixture.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let fixture: Fixture =
            serde_json::from_str(json).map_err(|e| StoreError::ParseError(e.to_string()))?;
        Ok(Self::from_fixture(fixture))
    }

    pub fn with_unlock_cost(mut self, cost: u32) -> Self {
        self.unlock_cost = cost;
        self
    }

    pub fn with_company(mut self, company: CompanyProfile) -> Self {
        self.profiles
            .get_mut()
            .companies
            .insert(company.id.clone(), company);
        self
    }

    pub fn with_candidate(mut self, candidate: CandidateProfile) -> Self {
        let profiles = self.profiles.get_mut();
        profiles.candidates.push(candidate);
        newest_first(&mut profiles.candidates, |c| c.created_at);
        self
    }

    pub fn with_job(mut self, job: JobPosting) -> Self {
        let profiles = self.profiles.get_mut();
        profiles.jobs.push(job);
        newest_first(&mut profiles.jobs, |j| j.created_at);
        self
    }

    pub fn with_credits(mut self, company_id: impl Into<String>, credits: u32) -> Self {
        self.credits.get_mut().insert(company_id.into(), credits);
        self
    }

    async fn balance(&self, company_id: &str) -> u32 {
        self.credits.lock().await.get(company_id).copied().unwrap_or(0)
    }

    async fn refund(&self, company_id: &str) -> u32 {
        let mut credits = self.credits.lock().await;
        let balance = credits.entry(company_id.to_string()).or_insert(0);
        *balance += self.unlock_cost;
        *balance
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore for MemoryStore {
    async fn company(&self, id: &str) -> Result<CompanyProfile, StoreError> {
        self.profiles
            .read()
            .await
            .companies
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Company", id))
    }

    async fn candidate(&self, id: &str) -> Result<CandidateProfile, StoreError> {
        self.profiles
            .read()
            .await
            .candidates
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Candidate", id))
    }

    async fn job(&self, id: &str) -> Result<JobPosting, StoreError> {
        self.profiles
            .read()
            .await
            .jobs
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Job", id))
    }

    async fn published_jobs(&self, company_id: &str) -> Result<Vec<JobPosting>, StoreError> {
        Ok(self
            .profiles
            .read()
            .await
            .jobs
            .iter()
            .filter(|j| j.company_id == company_id && j.is_published())
            .cloned()
            .collect())
    }

    async fn candidate_pool(&self, limit: usize) -> Result<Vec<CandidateProfile>, StoreError> {
        Ok(self
            .profiles
            .read()
            .await
            .candidates
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn recent_candidates(
        &self,
        query: RecentCandidatesQuery,
    ) -> Result<(Vec<CandidateProfile>, usize), StoreError> {
        let profiles = self.profiles.read().await;
        let page = profiles
            .candidates
            .iter()
            .skip(query.offset())
            .take(query.page_size)
            .cloned()
            .collect();
        Ok((page, profiles.candidates.len()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

impl UnlockLedger for MemoryStore {
    async fn unlock(&self, candidate_id: &str, company_id: &str) -> Result<UnlockReceipt, LedgerError> {
        let candidate_id = candidate_id.trim();
        let company_id = company_id.trim();
        if candidate_id.is_empty() || company_id.is_empty() {
            return Err(UnlockError::InvalidRequest {
                message: "candidate id and company id are required".to_string(),
            }
            .into());
        }

        let candidate = {
            let profiles = self.profiles.read().await;
            if !profiles.companies.contains_key(company_id) {
                return Err(UnlockError::Unauthorized.into());
            }
            profiles
                .candidates
                .iter()
                .find(|c| c.id == candidate_id)
                .cloned()
                .ok_or_else(|| UnlockError::NotFound {
                    candidate_id: candidate_id.to_string(),
                })?
        };

        let key = (candidate_id.to_string(), company_id.to_string());
        let existing = self.unlocks.lock().await.get(&key).cloned();
        if let Some(record) = existing {
            return Ok(UnlockReceipt {
                candidate,
                credits_remaining: self.balance(company_id).await,
                record,
                status: UnlockStatus::AlreadyUnlocked,
            });
        }

        // Decrement only if the balance covers the cost right now.
        let credits_remaining = {
            let mut credits = self.credits.lock().await;
            let available = credits.get(company_id).copied().unwrap_or(0);
            if available < self.unlock_cost {
                return Err(UnlockError::InsufficientCredits {
                    required: self.unlock_cost,
                    available,
                }
                .into());
            }
            let remaining = available - self.unlock_cost;
            credits.insert(company_id.to_string(), remaining);
            remaining
        };

        let record = UnlockRecord {
            id: Uuid::new_v4().to_string(),
            candidate_id: candidate_id.to_string(),
            company_id: company_id.to_string(),
            credits_spent: self.unlock_cost,
            unlocked_at: Utc::now(),
        };

        let winner = {
            let mut unlocks = self.unlocks.lock().await;
            match unlocks.get(&key) {
                Some(existing) => Some(existing.clone()),
                None => {
                    unlocks.insert(key, record.clone());
                    None
                }
            }
        };

        if let Some(existing) = winner {
            // Another request recorded this unlock between our check and insert.
            let credits_remaining = self.refund(company_id).await;
            tracing::info!(candidate_id, company_id, "Unlock raced an existing record; refunded");
            return Ok(UnlockReceipt {
                candidate,
                credits_remaining,
                record: existing,
                status: UnlockStatus::AlreadyUnlocked,
            });
        }

        tracing::info!(candidate_id, company_id, credits_remaining, "Candidate unlocked");
        Ok(UnlockReceipt {
            candidate,
            credits_remaining,
            record,
            status: UnlockStatus::Unlocked,
        })
    }

    async fn credits(&self, company_id: &str) -> Result<u32, StoreError> {
        if !self.profiles.read().await.companies.contains_key(company_id) {
            return Err(StoreError::not_found("Company", company_id));
        }
        Ok(self.balance(company_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentmatch_model::JobStatus;

    fn marketplace(credits: u32) -> MemoryStore {
        MemoryStore::new()
            .with_company(CompanyProfile::new("co-1", "Acme"))
            .with_candidate(CandidateProfile::new("cand-1"))
            .with_candidate(CandidateProfile::new("cand-2"))
            .with_credits("co-1", credits)
    }

    #[tokio::test]
    async fn test_fixture_json() {
        let store = MemoryStore::from_json(
            r#"{
                "companies": [{ "id": "co-1", "name": "Acme", "funding_stage": "Seed" }],
                "candidates": [
                    { "id": "old", "created_at": "2024-01-01T00:00:00Z" },
                    { "id": "new", "created_at": "2024-06-01T00:00:00Z" },
                    { "id": "undated" }
                ],
                "jobs": [
                    { "id": "j1", "company_id": "co-1", "status": "published" },
                    { "id": "j2", "company_id": "co-1", "status": "draft" }
                ],
                "credits": { "co-1": 3 }
            }"#,
        )
        .unwrap();

        let pool = store.candidate_pool(10).await.unwrap();
        let ids: Vec<_> = pool.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "undated"]);

        let jobs = store.published_jobs("co-1").await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].status, JobStatus::Published);

        assert_eq!(store.credits("co-1").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_bad_fixture_json() {
        assert!(matches!(
            MemoryStore::from_json("{ not json"),
            Err(StoreError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_company() {
        let store = marketplace(1);
        assert!(matches!(
            store.company("nope").await,
            Err(StoreError::NotFound { kind: "Company", .. })
        ));
    }

    #[tokio::test]
    async fn test_unlock_twice_charges_once() {
        let store = marketplace(5);

        let first = store.unlock("cand-1", "co-1").await.unwrap();
        assert_eq!(first.status, UnlockStatus::Unlocked);
        assert_eq!(first.credits_remaining, 4);

        let second = store.unlock("cand-1", "co-1").await.unwrap();
        assert_eq!(second.status, UnlockStatus::AlreadyUnlocked);
        assert_eq!(second.credits_remaining, 4);
        assert_eq!(second.record, first.record);

        assert_eq!(store.credits("co-1").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_insufficient_credits() {
        let store = marketplace(0);
        let err = store.unlock("cand-1", "co-1").await.unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_CREDITS");
        assert!(matches!(
            err,
            LedgerError::Rejected(UnlockError::InsufficientCredits {
                required: 1,
                available: 0
            })
        ));
    }

    #[tokio::test]
    async fn test_unlock_validation() {
        let store = marketplace(5);

        let err = store.unlock(" ", "co-1").await.unwrap_err();
        assert_eq!(err.code(), "INVALID_REQUEST");

        let err = store.unlock("cand-1", "co-unknown").await.unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");

        let err = store.unlock("cand-404", "co-1").await.unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");

        assert_eq!(store.credits("co-1").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_concurrent_unlocks_single_winner() {
        let store = marketplace(1);

        let (a, b) = tokio::join!(store.unlock("cand-1", "co-1"), store.unlock("cand-2", "co-1"));

        let results = [a, b];
        let won = results.iter().filter(|r| r.is_ok()).count();
        let lost = results
            .iter()
            .filter(|r| matches!(r, Err(e) if e.code() == "INSUFFICIENT_CREDITS"))
            .count();
        assert_eq!((won, lost), (1, 1));
        assert_eq!(store.credits("co-1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_unlocks_same_candidate() {
        let store = marketplace(3);

        let (a, b) = tokio::join!(store.unlock("cand-1", "co-1"), store.unlock("cand-1", "co-1"));
        let (a, b) = (a.unwrap(), b.unwrap());

        let mut statuses = vec![a.status, b.status];
        statuses.sort_by_key(|s| s.code());
        assert_eq!(statuses, vec![UnlockStatus::AlreadyUnlocked, UnlockStatus::Unlocked]);
        assert_eq!(a.record, b.record);
        assert_eq!(store.credits("co-1").await.unwrap(), 2);
    }
}
