use std::sync::Arc;

use edict_client::{ApiError, WordStore};
use edict_core::{RowMediator, RowSignal};
use edict_types::DeleteReceipt;
use kanal::AsyncSender;

use super::{session_ops, AppEvent, Screen, UiEvent, WordsFlow};
use crate::state::AppState;

pub async fn handle_request_delete(
    flow: &mut WordsFlow,
    index: usize,
    ui_tx: &AsyncSender<UiEvent>,
) -> anyhow::Result<()> {
    if flow.screen != Screen::Words {
        return Ok(());
    }
    let Some(word) = flow.list.entries().get(index) else {
        ui_tx.send(UiEvent::Notice("No such row".into())).await?;
        return Ok(());
    };

    let mut row = RowMediator::new(&word.id);
    row.request_delete();
    ui_tx
        .send(UiEvent::ConfirmPrompt(format!(
            "Delete '{}'? (:y to confirm, :n to keep)",
            word.word
        )))
        .await?;
    flow.row = Some(row);
    Ok(())
}

pub fn handle_confirm_delete(
    flow: &mut WordsFlow,
    store: &Arc<dyn WordStore>,
    self_tx: &AsyncSender<AppEvent>,
) {
    let Some(row) = flow.row.as_mut() else {
        return;
    };
    let Some(request) = row.confirm_delete() else {
        return;
    };

    let store = store.clone();
    let tx = self_tx.clone();
    tokio::spawn(async move {
        let result = store.delete(&request.id).await;
        let _ = tx.send(AppEvent::DeleteFinished { result }).await;
    });
}

pub fn handle_cancel_delete(flow: &mut WordsFlow) {
    if let Some(row) = flow.row.as_mut() {
        row.cancel_delete();
    }
    flow.row = None;
}

/// Success reconciles the list locally, skipping a refetch round-trip.
/// Failure is swallowed at this layer: the confirmation flag resets and
/// no error is shown.
pub async fn handle_delete_finished(
    flow: &mut WordsFlow,
    state: &Arc<AppState>,
    result: Result<DeleteReceipt, ApiError>,
    ui_tx: &AsyncSender<UiEvent>,
) -> anyhow::Result<()> {
    let expired = matches!(result, Err(ApiError::Auth));

    if let Some(row) = flow.row.as_mut() {
        if let Some(RowSignal::Removed(id)) = row.apply_delete(result) {
            flow.list.remove_local(&id);
            ui_tx.send(UiEvent::ListChanged(flow.snapshot())).await?;
        }
    }
    flow.row = None;

    if expired {
        session_ops::handle_expired(flow, state, ui_tx).await?;
    }
    Ok(())
}
