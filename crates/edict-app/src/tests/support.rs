use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use edict_client::{ApiError, AuthSession, PageQuery, WordStore};
use edict_config::Config;
use edict_types::{DeleteReceipt, Word, WordPatch, WordsPage};
use kanal::{AsyncReceiver, AsyncSender};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::events::{event_loop, AppEvent, ListSnapshot, Screen, UiEvent};
use crate::state::AppState;

const WAIT: Duration = Duration::from_secs(2);

pub fn word(id: &str) -> Word {
    Word::new(id, format!("word-{id}"))
}

pub fn page_of(ids: &[&str], cursor: Option<&str>, total: u64) -> WordsPage {
    WordsPage {
        items: ids.iter().map(|id| word(id)).collect(),
        next_cursor: cursor.map(String::from),
        has_more: cursor.is_some(),
        total_count: total,
    }
}

pub fn empty_page() -> WordsPage {
    page_of(&[], None, 0)
}

/// Scripted in-memory store: queued results are handed out in order,
/// calls are recorded for assertions. An optional delay keeps page
/// fetches in flight long enough to exercise the concurrency guards.
#[derive(Default)]
pub struct FakeWordStore {
    pub page_results: Mutex<VecDeque<Result<WordsPage, ApiError>>>,
    pub page_queries: Mutex<Vec<PageQuery>>,
    pub create_results: Mutex<VecDeque<Result<Word, ApiError>>>,
    pub created: Mutex<Vec<WordPatch>>,
    pub update_results: Mutex<VecDeque<Result<Word, ApiError>>>,
    pub updated: Mutex<Vec<(String, WordPatch)>>,
    pub delete_results: Mutex<VecDeque<Result<DeleteReceipt, ApiError>>>,
    pub deleted: Mutex<Vec<String>>,
    pub page_delay: Mutex<Option<Duration>>,
}

impl FakeWordStore {
    pub fn with_pages(pages: Vec<Result<WordsPage, ApiError>>) -> Arc<Self> {
        let store = Self::default();
        *store.page_results.lock().unwrap() = pages.into();
        Arc::new(store)
    }

    pub fn queue_page(&self, page: Result<WordsPage, ApiError>) {
        self.page_results.lock().unwrap().push_back(page);
    }

    pub fn set_page_delay(&self, delay: Duration) {
        *self.page_delay.lock().unwrap() = Some(delay);
    }

    pub fn page_call_count(&self) -> usize {
        self.page_queries.lock().unwrap().len()
    }

    pub fn last_page_query(&self) -> PageQuery {
        self.page_queries.lock().unwrap().last().cloned().expect("no page calls yet")
    }
}

#[async_trait]
impl WordStore for FakeWordStore {
    async fn page(&self, query: PageQuery) -> Result<WordsPage, ApiError> {
        self.page_queries.lock().unwrap().push(query);
        let delay = *self.page_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.page_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(empty_page()))
    }

    async fn get(&self, id: &str) -> Result<Word, ApiError> {
        Err(ApiError::NotFound { id: id.to_string() })
    }

    async fn create(&self, patch: WordPatch) -> Result<Word, ApiError> {
        let fallback = Word::new("new-id", patch.word.clone().unwrap_or_default());
        self.created.lock().unwrap().push(patch);
        self.create_results.lock().unwrap().pop_front().unwrap_or(Ok(fallback))
    }

    async fn update(&self, id: &str, patch: WordPatch) -> Result<Word, ApiError> {
        let fallback = Word::new(id, patch.word.clone().unwrap_or_default());
        self.updated.lock().unwrap().push((id.to_string(), patch));
        self.update_results.lock().unwrap().pop_front().unwrap_or(Ok(fallback))
    }

    async fn delete(&self, id: &str) -> Result<DeleteReceipt, ApiError> {
        self.deleted.lock().unwrap().push(id.to_string());
        self.delete_results.lock().unwrap().pop_front().unwrap_or(Ok(DeleteReceipt {
            message: "deleted".into(),
        }))
    }
}

/// A running event loop plus the channels and session around it.
pub struct Harness {
    pub ui_rx: AsyncReceiver<UiEvent>,
    pub app_tx: AsyncSender<AppEvent>,
    pub store: Arc<FakeWordStore>,
    pub session: Arc<AuthSession>,
    pub cancel: CancellationToken,
    _token_dir: tempfile::TempDir,
}

pub fn spawn_flow(store: Arc<FakeWordStore>, authenticated: bool) -> Harness {
    let token_dir = tempfile::tempdir().expect("tempdir");
    let session = Arc::new(AuthSession::load(token_dir.path().join("token")));
    if authenticated {
        session.set_token("jwt".into());
    }

    let state = Arc::new(AppState::new(Config::new(), session.clone()));
    let (ui_tx, ui_rx) = kanal::bounded_async(256);
    let (app_tx, app_rx) = kanal::bounded_async(64);
    let cancel = CancellationToken::new();

    tokio::spawn(event_loop(
        state,
        store.clone(),
        app_rx,
        ui_tx,
        app_tx.clone(),
        cancel.child_token(),
    ));

    Harness {
        ui_rx,
        app_tx,
        store,
        session,
        cancel,
        _token_dir: token_dir,
    }
}

impl Harness {
    pub async fn send(&self, event: AppEvent) {
        self.app_tx.send(event).await.expect("event loop gone");
    }

    pub async fn next_event(&self) -> UiEvent {
        timeout(WAIT, self.ui_rx.recv())
            .await
            .expect("timed out waiting for a UI event")
            .expect("UI channel closed")
    }

    /// Drains UI events until a list snapshot matching `pred` arrives.
    pub async fn list_matching(&self, pred: impl Fn(&ListSnapshot) -> bool) -> ListSnapshot {
        timeout(WAIT, async {
            loop {
                if let UiEvent::ListChanged(snapshot) = self.next_event().await {
                    if pred(&snapshot) {
                        return snapshot;
                    }
                }
            }
        })
        .await
        .expect("timed out waiting for a matching snapshot")
    }

    pub async fn wait_screen(&self, screen: Screen) {
        timeout(WAIT, async {
            loop {
                if let UiEvent::Screen(s) = self.next_event().await {
                    if s == screen {
                        return;
                    }
                }
            }
        })
        .await
        .expect("timed out waiting for a screen switch")
    }

    pub async fn wait_page_calls(&self, count: usize) {
        timeout(WAIT, async {
            while self.store.page_call_count() < count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("timed out waiting for page calls")
    }
}
