//! REST backend for the marketplace data API (PostgREST-style).

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use talentmatch_model::{
    CandidateProfile, CandidateRow, CompanyProfile, CompanyRow, JobPosting, JobRow,
    RecentCandidatesQuery, UnlockError, UnlockReceipt, UnlockRecord, UnlockStatus,
};
use talentmatch_query::{DataRequest, PostgrestDialect, QueryDialect};

use crate::{LedgerError, ProfileStore, StoreError, UnlockLedger};

/// Data API backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Base URL of the data API
    pub base_url: String,
    /// Sent as `apikey` and bearer token when set
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:54321".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

/// Data API backend.
pub struct RestStore {
    config: RestConfig,
    client: reqwest::Client,
    dialect: PostgrestDialect,
}

#[derive(Debug, Deserialize)]
struct CreditBalanceRow {
    balance: u32,
}

#[derive(Debug, Deserialize)]
struct UnlockRow {
    id: String,
    candidate_id: String,
    company_id: String,
    #[serde(default)]
    credits_spent: u32,
    unlocked_at: DateTime<Utc>,
}

impl From<UnlockRow> for UnlockRecord {
    fn from(row: UnlockRow) -> Self {
        Self {
            id: row.id,
            candidate_id: row.candidate_id,
            company_id: row.company_id,
            credits_spent: row.credits_spent,
            unlocked_at: row.unlocked_at,
        }
    }
}

/// Body returned by the `unlock_candidate` RPC.
#[derive(Debug, Deserialize)]
struct UnlockResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    candidate: Option<CandidateRow>,
    #[serde(default)]
    credits_remaining: u32,
    #[serde(default)]
    credits_required: u32,
    #[serde(default)]
    unlock: Option<UnlockRow>,
    #[serde(default)]
    already_unlocked: bool,
}

impl UnlockResponse {
    fn into_result(self, candidate_id: &str) -> Result<UnlockReceipt, LedgerError> {
        if !self.success {
            let message = self.message.unwrap_or_default();
            let err = match self.code.as_deref() {
                Some("INSUFFICIENT_CREDITS") => UnlockError::InsufficientCredits {
                    required: self.credits_required,
                    available: self.credits_remaining,
                },
                Some("NOT_FOUND") => UnlockError::NotFound {
                    candidate_id: candidate_id.to_string(),
                },
                Some("UNAUTHORIZED") => UnlockError::Unauthorized,
                _ => UnlockError::InvalidRequest { message },
            };
            return Err(err.into());
        }

        let (Some(candidate), Some(unlock)) = (self.candidate, self.unlock) else {
            return Err(StoreError::ParseError("Unlock response missing candidate or record".to_string()).into());
        };

        Ok(UnlockReceipt {
            candidate: candidate.into(),
            credits_remaining: self.credits_remaining,
            record: unlock.into(),
            status: if self.already_unlocked {
                UnlockStatus::AlreadyUnlocked
            } else {
                UnlockStatus::Unlocked
            },
        })
    }
}

/// Total from a `Content-Range` header such as `0-24/573`.
fn parse_content_range(value: &str) -> Option<usize> {
    value.rsplit_once('/').and_then(|(_, total)| total.trim().parse().ok())
}

impl RestStore {
    /// Create a new data API backend.
    pub fn new(config: RestConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            config,
            client,
            dialect: PostgrestDialect::default(),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    /// Run a table query, returning rows and the exact count when requested.
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        request: DataRequest<'_>,
    ) -> Result<(Vec<T>, Option<usize>), StoreError> {
        let query = self.dialect.translate(&request)?;

        tracing::debug!(table = query.table, query = %query.query_string(), "Fetching rows");

        let mut builder = self
            .client
            .get(format!("{}{}", self.config.base_url, query.path()))
            .query(&query.params);
        if query.count_exact {
            builder = builder.header("Prefer", "count=exact");
        }

        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::RequestFailed(format!("HTTP {}: {}", status, body)));
        }

        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);

        let rows: Vec<T> = response
            .json()
            .await
            .map_err(|e| StoreError::ParseError(e.to_string()))?;

        Ok((rows, total))
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        request: DataRequest<'_>,
        kind: &'static str,
        id: &str,
    ) -> Result<T, StoreError> {
        let (rows, _) = self.fetch_rows(request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(kind, id))
    }
}

impl ProfileStore for RestStore {
    async fn company(&self, id: &str) -> Result<CompanyProfile, StoreError> {
        let row: CompanyRow = self
            .fetch_one(DataRequest::CompanyById(id), "Company", id)
            .await?;
        Ok(row.into())
    }

    async fn candidate(&self, id: &str) -> Result<CandidateProfile, StoreError> {
        let row: CandidateRow = self
            .fetch_one(DataRequest::CandidateById(id), "Candidate", id)
            .await?;
        Ok(row.into())
    }

    async fn job(&self, id: &str) -> Result<JobPosting, StoreError> {
        let row: JobRow = self.fetch_one(DataRequest::JobById(id), "Job", id).await?;
        Ok(row.into())
    }

    async fn published_jobs(&self, company_id: &str) -> Result<Vec<JobPosting>, StoreError> {
        let (rows, _) = self
            .fetch_rows::<JobRow>(DataRequest::PublishedJobs { company_id })
            .await?;
        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn candidate_pool(&self, limit: usize) -> Result<Vec<CandidateProfile>, StoreError> {
        let (rows, _) = self
            .fetch_rows::<CandidateRow>(DataRequest::CandidatePool { limit })
            .await?;
        Ok(rows.into_iter().map(CandidateProfile::from).collect())
    }

    async fn recent_candidates(
        &self,
        query: RecentCandidatesQuery,
    ) -> Result<(Vec<CandidateProfile>, usize), StoreError> {
        let (rows, total) = self
            .fetch_rows::<CandidateRow>(DataRequest::RecentCandidates(query))
            .await?;
        // Without a count header, assume nothing lies past what we've seen.
        let total = total.unwrap_or(query.offset() + rows.len());
        Ok((rows.into_iter().map(CandidateProfile::from).collect(), total))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let response = self
            .authorize(self.client.get(format!("{}/rest/v1/", self.config.base_url)))
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}

impl UnlockLedger for RestStore {
    async fn unlock(&self, candidate_id: &str, company_id: &str) -> Result<UnlockReceipt, LedgerError> {
        tracing::info!(candidate_id, company_id, "Requesting candidate unlock");

        // The RPC runs the conditional decrement and record insert in one transaction.
        let response = self
            .authorize(
                self.client
                    .post(format!("{}/rest/v1/rpc/unlock_candidate", self.config.base_url))
                    .json(&serde_json::json!({
                        "p_candidate_id": candidate_id,
                        "p_company_id": company_id,
                    })),
            )
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(UnlockError::Unauthorized.into());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::RequestFailed(format!("HTTP {}: {}", status, body)).into());
        }

        let body: UnlockResponse = response
            .json()
            .await
            .map_err(|e| StoreError::ParseError(e.to_string()))?;

        body.into_result(candidate_id)
    }

    async fn credits(&self, company_id: &str) -> Result<u32, StoreError> {
        let row: CreditBalanceRow = self
            .fetch_one(DataRequest::CreditBalance { company_id }, "Credit balance", company_id)
            .await?;
        Ok(row.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-24/573"), Some(573));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-24/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn test_new_store() {
        let store = RestStore::new(RestConfig::default()).unwrap();
        assert_eq!(store.name(), "rest");
        assert_eq!(store.config.timeout_secs, 10);
    }

    #[test]
    fn test_unlock_response_success() {
        let body: UnlockResponse = serde_json::from_value(serde_json::json!({
            "success": true,
            "candidate": { "id": "cand-1", "full_name": "Ada" },
            "credits_remaining": 4,
            "unlock": {
                "id": "u-1",
                "candidate_id": "cand-1",
                "company_id": "co-1",
                "credits_spent": 1,
                "unlocked_at": "2024-05-01T10:00:00Z"
            },
            "already_unlocked": true
        }))
        .unwrap();

        let receipt = body.into_result("cand-1").unwrap();
        assert_eq!(receipt.status, UnlockStatus::AlreadyUnlocked);
        assert_eq!(receipt.credits_remaining, 4);
        assert_eq!(receipt.candidate.full_name.as_deref(), Some("Ada"));
        assert_eq!(receipt.record.id, "u-1");
    }

    #[test]
    fn test_unlock_response_errors() {
        let body: UnlockResponse = serde_json::from_value(serde_json::json!({
            "success": false,
            "code": "INSUFFICIENT_CREDITS",
            "credits_required": 1,
            "credits_remaining": 0
        }))
        .unwrap();
        let err = body.into_result("cand-1").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Rejected(UnlockError::InsufficientCredits {
                required: 1,
                available: 0
            })
        ));

        let body: UnlockResponse = serde_json::from_value(serde_json::json!({
            "success": false,
            "code": "SOMETHING_NEW",
            "message": "bad input"
        }))
        .unwrap();
        assert_eq!(body.into_result("cand-1").unwrap_err().code(), "INVALID_REQUEST");
    }

    #[test]
    fn test_success_without_record_is_parse_error() {
        let body: UnlockResponse =
            serde_json::from_value(serde_json::json!({ "success": true })).unwrap();
        assert!(matches!(
            body.into_result("cand-1"),
            Err(LedgerError::Store(StoreError::ParseError(_)))
        ));
    }
}
