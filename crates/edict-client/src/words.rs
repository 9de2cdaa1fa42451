use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use edict_types::{DeleteReceipt, SortBy, SortOrder, Word, WordPatch, WordsPage};

use crate::auth::AuthSession;
use crate::error::{classify, ApiError};

pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Parameters of one page fetch against `GET /words`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub limit: usize,
    pub cursor: Option<String>,
    pub sort_by: SortBy,
    pub order: SortOrder,
    pub search: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            cursor: None,
            sort_by: SortBy::default(),
            order: SortOrder::default(),
            search: None,
        }
    }
}

/// Repository contract for vocabulary entries. Stateless request/response
/// translation: no caching, no retry, every failure is a typed [`ApiError`].
#[async_trait]
pub trait WordStore: Send + Sync {
    async fn page(&self, query: PageQuery) -> Result<WordsPage, ApiError>;

    async fn get(&self, id: &str) -> Result<Word, ApiError>;

    /// Server assigns the id and timestamps.
    async fn create(&self, patch: WordPatch) -> Result<Word, ApiError>;

    /// Partial merge: only fields present in `patch` change.
    async fn update(&self, id: &str, patch: WordPatch) -> Result<Word, ApiError>;

    /// Not idempotent: deleting an already-deleted id fails and the
    /// caller must treat that as terminal.
    async fn delete(&self, id: &str) -> Result<DeleteReceipt, ApiError>;
}

/// `search` is always sent (trimmed, empty when unset) so the backend
/// contract stays stable; `cursor` is omitted for the first page.
fn page_params(query: &PageQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("limit", query.limit.to_string()),
        ("sortBy", query.sort_by.as_param().to_string()),
        ("order", query.order.as_param().to_string()),
        (
            "search",
            query.search.as_deref().map(str::trim).unwrap_or_default().to_string(),
        ),
    ];
    if let Some(cursor) = &query.cursor {
        params.push(("cursor", cursor.clone()));
    }
    params
}

pub struct HttpWordStore {
    http: reqwest::Client,
    base_url: String,
    session: Arc<AuthSession>,
}

impl HttpWordStore {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<AuthSession>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn words_url(&self) -> String {
        format!("{}/words", self.base_url)
    }

    /// Bearer header goes only on requests targeting the API origin.
    fn authorize(&self, url: &str, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.get_token() {
            Some(token) if url.starts_with(&self.base_url) => req.bearer_auth(token),
            _ => req,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        url: String,
        req: reqwest::RequestBuilder,
        entity_id: Option<&str>,
    ) -> Result<T, ApiError> {
        let response = self.authorize(&url, req).send().await?;
        let status = response.status().as_u16();

        if status == 401 {
            // Session teardown happens here, before feature code sees the
            // error; the caller only decides where to navigate.
            self.session.clear_token();
            return Err(ApiError::Auth);
        }

        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(classify(status, &body, entity_id));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl WordStore for HttpWordStore {
    async fn page(&self, query: PageQuery) -> Result<WordsPage, ApiError> {
        let url = self.words_url();
        tracing::debug!(
            limit = query.limit,
            cursor = query.cursor.as_deref().unwrap_or(""),
            "Fetching words page"
        );
        let req = self.http.get(&url).query(&page_params(&query));
        self.execute(url, req, None).await
    }

    async fn get(&self, id: &str) -> Result<Word, ApiError> {
        let url = format!("{}/{id}", self.words_url());
        let req = self.http.get(&url);
        self.execute(url, req, Some(id)).await
    }

    async fn create(&self, patch: WordPatch) -> Result<Word, ApiError> {
        let url = self.words_url();
        let req = self.http.post(&url).json(&patch);
        self.execute(url, req, None).await
    }

    async fn update(&self, id: &str, patch: WordPatch) -> Result<Word, ApiError> {
        let url = format!("{}/{id}", self.words_url());
        let req = self.http.patch(&url).json(&patch);
        self.execute(url, req, Some(id)).await
    }

    async fn delete(&self, id: &str) -> Result<DeleteReceipt, ApiError> {
        let url = format!("{}/{id}", self.words_url());
        let req = self.http.delete(&url);
        self.execute(url, req, Some(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_matches_backend_defaults() {
        let q = PageQuery::default();
        assert_eq!(q.limit, 20);
        assert_eq!(q.cursor, None);
        assert_eq!(q.sort_by, SortBy::CreatedAt);
        assert_eq!(q.order, SortOrder::Desc);
        assert_eq!(q.search, None);
    }

    #[test]
    fn search_param_is_always_sent() {
        let params = page_params(&PageQuery::default());
        assert!(params.contains(&("search", String::new())));
        assert!(!params.iter().any(|(k, _)| *k == "cursor"));

        let params = page_params(&PageQuery {
            search: Some("  hund  ".into()),
            ..PageQuery::default()
        });
        assert!(params.contains(&("search", "hund".to_string())));
    }

    #[test]
    fn cursor_is_passed_through_verbatim() {
        let params = page_params(&PageQuery {
            cursor: Some("c2".into()),
            sort_by: SortBy::Word,
            order: SortOrder::Asc,
            ..PageQuery::default()
        });
        assert!(params.contains(&("cursor", "c2".to_string())));
        assert!(params.contains(&("sortBy", "word".to_string())));
        assert!(params.contains(&("order", "asc".to_string())));
    }
}
