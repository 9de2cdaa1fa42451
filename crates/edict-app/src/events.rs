use std::sync::Arc;

use edict_client::{ApiError, WordStore};
use edict_core::{PageRequest, RowMediator, WordForm, WordFormValue, WordList, SEARCH_DEBOUNCE};
use edict_types::{DeleteReceipt, SortBy, SortOrder, Word, WordsPage};
use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod form_ops;
pub mod list_ops;
pub mod row_ops;
pub mod session_ops;

/// Route guard in terminal form: which screen the client is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Words,
}

#[derive(Debug)]
pub enum AppEvent {
    // User intents (from the UI loop)
    SearchInput(String),
    SetSort(SortBy, SortOrder),
    ScrolledTo { rendered_end: usize },
    Reload,
    OpenAdd,
    OpenEdit { index: usize },
    WordDraft(String),
    SubmitForm(WordFormValue),
    CancelForm,
    RequestDelete { index: usize },
    ConfirmDelete,
    CancelDelete,
    Login,
    PasteCallback(String),
    Logout,
    Quit,

    // Internal: debounce timers and completed IO
    SearchSettled { generation: u64 },
    HintSettled { generation: u64 },
    PageLoaded {
        request: PageRequest,
        result: Result<WordsPage, ApiError>,
    },
    SaveFinished {
        result: Result<Word, ApiError>,
    },
    DeleteFinished {
        result: Result<DeleteReceipt, ApiError>,
    },
    HintLoaded {
        generation: u64,
        result: Result<WordsPage, ApiError>,
    },
}

/// Everything the words screen needs to render.
#[derive(Debug, Clone)]
pub struct ListSnapshot {
    pub entries: Vec<Word>,
    pub total_count: Option<u64>,
    pub error: Option<String>,
    pub loading: bool,
    pub loading_more: bool,
    pub search: String,
    pub sort_by: SortBy,
    pub order: SortOrder,
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    Screen(Screen),
    ListChanged(ListSnapshot),
    Hints(Vec<Word>),
    FormOpened { value: WordFormValue, editing: bool },
    FormError(String),
    FormClosed,
    ConfirmPrompt(String),
    LoginUrl(String),
    Notice(String),
}

/// Mutable state the event loop threads through its handlers.
pub struct WordsFlow {
    pub list: WordList,
    pub form: Option<WordForm>,
    pub row: Option<RowMediator>,
    pub screen: Screen,
    debounce_cancel: CancellationToken,
}

impl WordsFlow {
    pub fn new(debounce_cancel: CancellationToken) -> Self {
        Self {
            list: WordList::new(),
            form: None,
            row: None,
            screen: Screen::Login,
            debounce_cancel,
        }
    }

    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            entries: self.list.entries().to_vec(),
            total_count: self.list.total_count(),
            error: self.list.error().map(String::from),
            loading: self.list.is_loading(),
            loading_more: self.list.is_loading_more(),
            search: self.list.search().to_string(),
            sort_by: self.list.sort_by(),
            order: self.list.order(),
        }
    }

    /// Back to the login screen with all list/form/row state dropped,
    /// as if the words route had been torn down.
    pub fn reset_to_login(&mut self) {
        self.list = WordList::new();
        self.form = None;
        self.row = None;
        self.screen = Screen::Login;
    }

    pub(crate) fn debounce_token(&self) -> CancellationToken {
        self.debounce_cancel.child_token()
    }
}

/// Single-shot trailing debounce. Re-arming happens implicitly: each
/// keystroke bumps the generation, and stale generations are dropped by
/// the state machines when the timer fires. Teardown cancels the timer
/// so nothing fires after the consuming view is gone.
pub(crate) fn arm_debounce(
    tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
    generation: u64,
    make_event: fn(u64) -> AppEvent,
) {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(SEARCH_DEBOUNCE) => {
                let _ = tx.send(make_event(generation)).await;
            }
        }
    });
}

/// Words screen main loop: consumes UI intents and IO completions,
/// drives the list/form/row state machines, publishes render snapshots.
pub async fn event_loop(
    state: Arc<AppState>,
    store: Arc<dyn WordStore>,
    rx: AsyncReceiver<AppEvent>,
    ui_tx: AsyncSender<UiEvent>,
    self_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut flow = WordsFlow::new(cancel.child_token());

    // Startup guard: a cached session goes straight to the words
    // screen, everyone else logs in first.
    if state.session.is_authenticated() {
        session_ops::enter_words(&mut flow, &store, &ui_tx, &self_tx).await?;
    } else {
        ui_tx.send(UiEvent::Screen(Screen::Login)).await?;
    }

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = rx.recv() => event?,
        };

        if matches!(event, AppEvent::Quit) {
            tracing::info!("Quit requested");
            break;
        }

        handle_event(&mut flow, &state, &store, &ui_tx, &self_tx, event).await?;
    }

    Ok(())
}

async fn handle_event(
    flow: &mut WordsFlow,
    state: &Arc<AppState>,
    store: &Arc<dyn WordStore>,
    ui_tx: &AsyncSender<UiEvent>,
    self_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::Login => session_ops::handle_login(flow, state, store, ui_tx, self_tx).await?,
        AppEvent::PasteCallback(url) => {
            session_ops::handle_callback(flow, state, store, &url, ui_tx, self_tx).await?;
        }
        AppEvent::Logout => session_ops::handle_logout(flow, state, ui_tx).await?,

        AppEvent::SearchInput(term) => {
            list_ops::handle_search_input(flow, term, ui_tx, self_tx).await?;
        }
        AppEvent::SearchSettled { generation } => {
            list_ops::handle_search_settled(flow, generation, store, ui_tx, self_tx).await?;
        }
        AppEvent::SetSort(sort_by, order) => {
            list_ops::handle_set_sort(flow, sort_by, order, store, ui_tx, self_tx).await?;
        }
        AppEvent::ScrolledTo { rendered_end } => {
            list_ops::handle_scrolled(flow, rendered_end, store, self_tx);
        }
        AppEvent::Reload => list_ops::handle_reload(flow, store, ui_tx, self_tx).await?,
        AppEvent::PageLoaded { request, result } => {
            list_ops::handle_page_loaded(flow, state, request, result, ui_tx).await?;
        }

        AppEvent::OpenAdd => form_ops::handle_open_add(flow, ui_tx).await?,
        AppEvent::OpenEdit { index } => form_ops::handle_open_edit(flow, index, ui_tx).await?,
        AppEvent::WordDraft(draft) => form_ops::handle_word_draft(flow, draft, self_tx),
        AppEvent::HintSettled { generation } => {
            form_ops::handle_hint_settled(flow, generation, store, self_tx);
        }
        AppEvent::HintLoaded { generation, result } => {
            form_ops::handle_hint_loaded(flow, generation, result, ui_tx).await?;
        }
        AppEvent::SubmitForm(value) => {
            form_ops::handle_submit(flow, value, store, ui_tx, self_tx).await?;
        }
        AppEvent::SaveFinished { result } => {
            form_ops::handle_save_finished(flow, state, result, store, ui_tx, self_tx).await?;
        }
        AppEvent::CancelForm => form_ops::handle_cancel(flow, ui_tx).await?,

        AppEvent::RequestDelete { index } => {
            row_ops::handle_request_delete(flow, index, ui_tx).await?;
        }
        AppEvent::ConfirmDelete => row_ops::handle_confirm_delete(flow, store, self_tx),
        AppEvent::CancelDelete => row_ops::handle_cancel_delete(flow),
        AppEvent::DeleteFinished { result } => {
            row_ops::handle_delete_finished(flow, state, result, ui_tx).await?;
        }

        AppEvent::Quit => {}
    }

    Ok(())
}
