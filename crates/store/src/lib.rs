//! Profile store backends.
//!
//! Provides the `ProfileStore` and `UnlockLedger` traits and two
//! implementations: a REST backend for the marketplace data API and an
//! in-memory backend loaded from fixtures. Scoring logic only ever sees
//! the traits, so it stays backend-agnostic.

use std::future::Future;

use talentmatch_model::{
    CandidateProfile, CompanyProfile, JobPosting, RecentCandidatesPage, RecentCandidatesQuery,
    UnlockError, UnlockReceipt,
};
use talentmatch_query::QueryError;
use thiserror::Error;

mod memory;
mod rest;

pub use memory::{Fixture, MemoryStore, DEFAULT_UNLOCK_COST};
pub use rest::{RestConfig, RestStore};

/// Largest page `list_recent_candidates` serves.
pub const MAX_PAGE_SIZE: usize = 100;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("Store not available")]
    Unavailable,
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Errors from the unlock transaction.
///
/// `Rejected` carries the contract error the caller branches on;
/// `Store` means the ledger could not be reached at all.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Rejected(#[from] UnlockError),

    #[error("Ledger unavailable: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rejected(err) => err.code(),
            Self::Store(_) => "UNAVAILABLE",
        }
    }
}

/// Trait for profile data sources (REST API, in-memory fixtures, etc.)
pub trait ProfileStore {
    /// Fetch a company profile by id.
    fn company(&self, id: &str) -> impl Future<Output = Result<CompanyProfile, StoreError>> + Send;

    /// Fetch a candidate profile by id.
    fn candidate(&self, id: &str)
        -> impl Future<Output = Result<CandidateProfile, StoreError>> + Send;

    /// Fetch a job posting by id.
    fn job(&self, id: &str) -> impl Future<Output = Result<JobPosting, StoreError>> + Send;

    /// Published job postings of a company, newest first.
    fn published_jobs(
        &self,
        company_id: &str,
    ) -> impl Future<Output = Result<Vec<JobPosting>, StoreError>> + Send;

    /// Up to `limit` candidates, newest first.
    fn candidate_pool(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<CandidateProfile>, StoreError>> + Send;

    /// One page of candidates, newest first, with the total row count.
    fn recent_candidates(
        &self,
        query: RecentCandidatesQuery,
    ) -> impl Future<Output = Result<(Vec<CandidateProfile>, usize), StoreError>> + Send;

    /// Check if the store is reachable.
    fn health_check(&self) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Get the store name for logging.
    fn name(&self) -> &'static str;
}

/// Trait for the credit-gated unlock transaction.
///
/// Implementations must decrement credits only if the balance covers the
/// cost at the moment of the write, charge at most once per
/// (candidate, company) pair, and refund if the unlock record cannot be
/// written after credits were taken.
pub trait UnlockLedger {
    fn unlock(
        &self,
        candidate_id: &str,
        company_id: &str,
    ) -> impl Future<Output = Result<UnlockReceipt, LedgerError>> + Send;

    /// Current credit balance of a company.
    fn credits(&self, company_id: &str) -> impl Future<Output = Result<u32, StoreError>> + Send;
}

/// Unranked, offset-paginated listing of the newest candidates.
pub async fn list_recent_candidates<S: ProfileStore>(
    store: &S,
    query: RecentCandidatesQuery,
) -> Result<RecentCandidatesPage, StoreError> {
    if query.page_size == 0 || query.page_size > MAX_PAGE_SIZE {
        return Err(QueryError::InvalidPageSize {
            size: query.page_size,
            max: MAX_PAGE_SIZE,
        }
        .into());
    }

    let (candidates, total) = store.recent_candidates(query).await?;
    tracing::debug!(
        store = store.name(),
        page = query.page,
        returned = candidates.len(),
        total,
        "Listed recent candidates"
    );

    Ok(RecentCandidatesPage {
        candidates,
        has_more: query.has_more(total),
    })
}
