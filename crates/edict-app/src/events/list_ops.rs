use std::sync::Arc;

use edict_client::{ApiError, WordStore};
use edict_core::PageRequest;
use edict_types::{SortBy, SortOrder, WordsPage};
use kanal::AsyncSender;

use super::{arm_debounce, session_ops, AppEvent, Screen, UiEvent, WordsFlow};
use crate::state::AppState;

/// Runs a page fetch off the loop so slow responses never block input;
/// the outcome comes back as a `PageLoaded` event and is re-checked
/// against the list's current generation.
pub(crate) fn spawn_page_fetch(
    store: &Arc<dyn WordStore>,
    self_tx: &AsyncSender<AppEvent>,
    request: PageRequest,
) {
    let store = store.clone();
    let tx = self_tx.clone();
    tokio::spawn(async move {
        let result = store.page(request.query.clone()).await;
        let _ = tx.send(AppEvent::PageLoaded { request, result }).await;
    });
}

/// The input reflects the keystroke immediately; the reload waits for
/// the debounce window.
pub async fn handle_search_input(
    flow: &mut WordsFlow,
    term: String,
    ui_tx: &AsyncSender<UiEvent>,
    self_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if flow.screen != Screen::Words {
        return Ok(());
    }
    let generation = flow.list.set_search(term);
    arm_debounce(self_tx.clone(), flow.debounce_token(), generation, |generation| {
        AppEvent::SearchSettled { generation }
    });
    ui_tx.send(UiEvent::ListChanged(flow.snapshot())).await?;
    Ok(())
}

pub async fn handle_search_settled(
    flow: &mut WordsFlow,
    generation: u64,
    store: &Arc<dyn WordStore>,
    ui_tx: &AsyncSender<UiEvent>,
    self_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if let Some(request) = flow.list.search_settled(generation) {
        spawn_page_fetch(store, self_tx, request);
        ui_tx.send(UiEvent::ListChanged(flow.snapshot())).await?;
    }
    Ok(())
}

pub async fn handle_set_sort(
    flow: &mut WordsFlow,
    sort_by: SortBy,
    order: SortOrder,
    store: &Arc<dyn WordStore>,
    ui_tx: &AsyncSender<UiEvent>,
    self_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if flow.screen != Screen::Words {
        return Ok(());
    }
    let request = flow.list.set_sort(sort_by, order);
    spawn_page_fetch(store, self_tx, request);
    ui_tx.send(UiEvent::ListChanged(flow.snapshot())).await?;
    Ok(())
}

pub fn handle_scrolled(
    flow: &mut WordsFlow,
    rendered_end: usize,
    store: &Arc<dyn WordStore>,
    self_tx: &AsyncSender<AppEvent>,
) {
    if let Some(request) = flow.list.viewport_scrolled(rendered_end) {
        spawn_page_fetch(store, self_tx, request);
    }
}

pub async fn handle_reload(
    flow: &mut WordsFlow,
    store: &Arc<dyn WordStore>,
    ui_tx: &AsyncSender<UiEvent>,
    self_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if flow.screen != Screen::Words {
        return Ok(());
    }
    let request = flow.list.load_first();
    spawn_page_fetch(store, self_tx, request);
    ui_tx.send(UiEvent::ListChanged(flow.snapshot())).await?;
    Ok(())
}

pub async fn handle_page_loaded(
    flow: &mut WordsFlow,
    state: &Arc<AppState>,
    request: PageRequest,
    result: Result<WordsPage, ApiError>,
    ui_tx: &AsyncSender<UiEvent>,
) -> anyhow::Result<()> {
    let expired = matches!(result, Err(ApiError::Auth));
    flow.list.apply_page(&request, result);
    ui_tx.send(UiEvent::ListChanged(flow.snapshot())).await?;
    if expired {
        session_ops::handle_expired(flow, state, ui_tx).await?;
    }
    Ok(())
}
