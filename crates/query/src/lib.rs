//! Query translation for the profile data API.
//!
//! Converts abstract `DataRequest`s into backend-specific query syntax:
//! - PostgREST table queries (the marketplace data API)

use talentmatch_model::RecentCandidatesQuery;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Empty id")]
    EmptyId,
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Invalid page size {size} (must be 1..={max})")]
    InvalidPageSize { size: usize, max: usize },
    #[error("Invalid limit: {0}")]
    InvalidLimit(usize),
}

/// Data the matching engine needs from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataRequest<'a> {
    CompanyById(&'a str),
    CandidateById(&'a str),
    JobById(&'a str),
    /// Published postings of one company
    PublishedJobs { company_id: &'a str },
    /// Newest candidates, capped at `limit`
    CandidatePool { limit: usize },
    RecentCandidates(RecentCandidatesQuery),
    /// Unlock credit balance of one company
    CreditBalance { company_id: &'a str },
}

/// Trait for translating requests to backend-specific syntax.
pub trait QueryDialect {
    /// The output type (usually a string or a structured query)
    type Output;

    /// Translate a DataRequest to this dialect
    fn translate(&self, request: &DataRequest<'_>) -> Result<Self::Output, QueryError>;
}

/// A PostgREST table query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestQuery {
    pub table: &'static str,
    pub params: Vec<(String, String)>,
    /// Ask for an exact row count in `Content-Range`
    pub count_exact: bool,
}

impl RestQuery {
    fn new(table: &'static str) -> Self {
        Self {
            table,
            params: vec![("select".to_string(), "*".to_string())],
            count_exact: false,
        }
    }

    fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    /// Path relative to the API base URL.
    pub fn path(&self) -> String {
        format!("/rest/v1/{}", self.table)
    }

    /// Unencoded query string, for logging.
    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// PostgREST dialect generator.
#[derive(Debug, Clone)]
pub struct PostgrestDialect {
    pub max_page_size: usize,
}

impl Default for PostgrestDialect {
    fn default() -> Self {
        Self { max_page_size: 100 }
    }
}

/// Ids are interpolated into filter expressions, so reject anything
/// PostgREST would treat as syntax.
fn check_id(id: &str) -> Result<&str, QueryError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(QueryError::EmptyId);
    }
    if id.chars().any(|c| matches!(c, ',' | '(' | ')' | '&' | '=' | '"') || c.is_whitespace()) {
        return Err(QueryError::InvalidId(id.to_string()));
    }
    Ok(id)
}

impl QueryDialect for PostgrestDialect {
    type Output = RestQuery;

    fn translate(&self, request: &DataRequest<'_>) -> Result<RestQuery, QueryError> {
        let query = match *request {
            DataRequest::CompanyById(id) => RestQuery::new("companies")
                .param("id", format!("eq.{}", check_id(id)?))
                .param("limit", "1"),

            DataRequest::CandidateById(id) => RestQuery::new("candidates")
                .param("id", format!("eq.{}", check_id(id)?))
                .param("limit", "1"),

            DataRequest::JobById(id) => RestQuery::new("jobs")
                .param("id", format!("eq.{}", check_id(id)?))
                .param("limit", "1"),

            DataRequest::PublishedJobs { company_id } => RestQuery::new("jobs")
                .param("company_id", format!("eq.{}", check_id(company_id)?))
                .param("status", "eq.published")
                .param("order", "created_at.desc"),

            DataRequest::CandidatePool { limit } => {
                if limit == 0 {
                    return Err(QueryError::InvalidLimit(limit));
                }
                RestQuery::new("candidates")
                    .param("order", "created_at.desc")
                    .param("limit", limit.to_string())
            }

            DataRequest::RecentCandidates(page) => {
                if page.page_size == 0 || page.page_size > self.max_page_size {
                    return Err(QueryError::InvalidPageSize {
                        size: page.page_size,
                        max: self.max_page_size,
                    });
                }
                let mut query = RestQuery::new("candidates")
                    .param("order", "created_at.desc")
                    .param("offset", page.offset().to_string())
                    .param("limit", page.page_size.to_string());
                query.count_exact = true;
                query
            }

            DataRequest::CreditBalance { company_id } => RestQuery::new("credit_balances")
                .param("company_id", format!("eq.{}", check_id(company_id)?))
                .param("limit", "1"),
        };

        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_by_id() {
        let dialect = PostgrestDialect::default();
        let query = dialect.translate(&DataRequest::CompanyById("co-1")).unwrap();
        assert_eq!(query.path(), "/rest/v1/companies");
        assert_eq!(query.query_string(), "select=*&id=eq.co-1&limit=1");
        assert!(!query.count_exact);
    }

    #[test]
    fn test_published_jobs() {
        let dialect = PostgrestDialect::default();
        let query = dialect
            .translate(&DataRequest::PublishedJobs { company_id: " co-1 " })
            .unwrap();
        assert!(query.query_string().contains("company_id=eq.co-1"));
        assert!(query.query_string().contains("status=eq.published"));
    }

    #[test]
    fn test_recent_candidates_page() {
        let dialect = PostgrestDialect::default();
        let request = DataRequest::RecentCandidates(RecentCandidatesQuery::new(2, 25));
        let query = dialect.translate(&request).unwrap();
        assert!(query.count_exact);
        assert!(query.query_string().contains("offset=50"));
        assert!(query.query_string().contains("limit=25"));
        assert!(query.query_string().contains("order=created_at.desc"));
    }

    #[test]
    fn test_page_size_bounds() {
        let dialect = PostgrestDialect::default();
        for size in [0, 101] {
            let request = DataRequest::RecentCandidates(RecentCandidatesQuery::new(0, size));
            assert_eq!(
                dialect.translate(&request),
                Err(QueryError::InvalidPageSize { size, max: 100 })
            );
        }
    }

    #[test]
    fn test_id_validation() {
        let dialect = PostgrestDialect::default();
        assert_eq!(
            dialect.translate(&DataRequest::CandidateById("   ")),
            Err(QueryError::EmptyId)
        );
        assert!(matches!(
            dialect.translate(&DataRequest::JobById("1,2)")),
            Err(QueryError::InvalidId(_))
        ));
    }

    #[test]
    fn test_zero_pool_limit() {
        let dialect = PostgrestDialect::default();
        assert_eq!(
            dialect.translate(&DataRequest::CandidatePool { limit: 0 }),
            Err(QueryError::InvalidLimit(0))
        );
    }
}
