//! Ranking pipeline over a profile store.
//!
//! Fetch → aggregate requirements → score → filter → sort → truncate.
//! Every upstream failure or timeout degrades to an empty result.

use std::future::Future;

use talentmatch_model::{AggregatedSkillProfile, CandidateProfile, MatchBreakdown, RankedCandidate};
use talentmatch_store::{ProfileStore, StoreError};

use crate::{aggregate_requirements, rank, score_candidate, MatchTarget, RankConfig};

/// Matching engine bound to one store and one configuration.
pub struct MatchEngine<S> {
    store: S,
    config: RankConfig,
}

impl<S: ProfileStore> MatchEngine<S> {
    pub fn new(store: S, config: RankConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Requested limit, or the configured default when zero.
    fn limit_or_default(&self, limit: usize) -> usize {
        if limit == 0 {
            self.config.default_limit
        } else {
            limit
        }
    }

    /// Run a fetch under the configured timeout.
    ///
    /// Errors and timeouts are logged and turned into `None`.
    async fn fetch<T>(
        &self,
        what: &'static str,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.config.fetch_timeout(), fut).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                tracing::warn!(store = self.store.name(), error = %err, "Fetching {} failed", what);
                None
            }
            Err(_) => {
                tracing::warn!(
                    store = self.store.name(),
                    timeout_ms = self.config.fetch_timeout_ms,
                    "Fetching {} timed out",
                    what
                );
                None
            }
        }
    }

    /// Skill requirements merged across a company's published jobs.
    pub async fn aggregated_requirements(
        &self,
        company_id: &str,
    ) -> Result<AggregatedSkillProfile, StoreError> {
        let jobs = self.store.published_jobs(company_id).await?;
        Ok(aggregate_requirements(&jobs))
    }

    /// Company and its aggregated requirements, fetched concurrently.
    async fn company_target(&self, company_id: &str) -> Result<MatchTarget, StoreError> {
        let (company, jobs) = tokio::join!(
            self.store.company(company_id),
            self.store.published_jobs(company_id)
        );
        Ok(MatchTarget::company(company?, aggregate_requirements(&jobs?)))
    }

    /// A single job and its owning company.
    async fn job_target(&self, job_id: &str) -> Result<MatchTarget, StoreError> {
        let job = self.store.job(job_id).await?;
        if !job.is_published() {
            tracing::debug!(job_id, status = ?job.status, "Ranking against unpublished job");
        }
        let company = self.store.company(&job.company_id).await?;
        Ok(MatchTarget::job(&job, company))
    }

    fn finish(
        &self,
        target: &MatchTarget,
        pool: Vec<CandidateProfile>,
        limit: usize,
    ) -> Vec<RankedCandidate> {
        let pool_size = pool.len();
        let ranked = rank(target, pool, self.limit_or_default(limit), &self.config);

        tracing::info!(
            target_id = %target.id,
            requirements = target.requirements.len(),
            pool = pool_size,
            returned = ranked.len(),
            "Ranked candidates"
        );
        ranked
    }

    /// Rank a caller-supplied pool against a company.
    ///
    /// Returns an empty list if the company cannot be fetched.
    pub async fn rank_candidates(
        &self,
        target_id: &str,
        pool: Vec<CandidateProfile>,
        limit: usize,
    ) -> Vec<RankedCandidate> {
        match self.fetch("target", self.company_target(target_id)).await {
            Some(target) => self.finish(&target, pool, limit),
            None => Vec::new(),
        }
    }

    /// Rank the store's newest candidates against a company.
    pub async fn rank_pool(&self, target_id: &str, limit: usize) -> Vec<RankedCandidate> {
        let fetched = self
            .fetch("target and pool", async {
                let (target, pool) = tokio::join!(
                    self.company_target(target_id),
                    self.store.candidate_pool(self.config.pool_size)
                );
                Ok::<_, StoreError>((target?, pool?))
            })
            .await;

        match fetched {
            Some((target, pool)) => self.finish(&target, pool, limit),
            None => Vec::new(),
        }
    }

    /// Rank the store's newest candidates against one job posting.
    pub async fn rank_candidates_for_job(&self, job_id: &str, limit: usize) -> Vec<RankedCandidate> {
        let fetched = self
            .fetch("job target and pool", async {
                let (target, pool) = tokio::join!(
                    self.job_target(job_id),
                    self.store.candidate_pool(self.config.pool_size)
                );
                Ok::<_, StoreError>((target?, pool?))
            })
            .await;

        match fetched {
            Some((target, pool)) => self.finish(&target, pool, limit),
            None => Vec::new(),
        }
    }

    /// Full breakdown of one candidate against one company, unfiltered.
    pub async fn score_candidate(&self, candidate_id: &str, company_id: &str) -> Option<MatchBreakdown> {
        let (candidate, target) = self
            .fetch("candidate and target", async {
                let (candidate, target) = tokio::join!(
                    self.store.candidate(candidate_id),
                    self.company_target(company_id)
                );
                Ok::<_, StoreError>((candidate?, target?))
            })
            .await?;

        Some(score_candidate(&candidate, &target, &self.config.scoring))
    }
}
