use std::sync::Arc;

use edict_client::{ApiError, WordStore};
use edict_core::{FormField, RowMediator, RowSignal, SaveRequest, WordForm, WordFormValue};
use edict_types::{Word, WordsPage};
use kanal::AsyncSender;

use super::{arm_debounce, list_ops, session_ops, AppEvent, Screen, UiEvent, WordsFlow};
use crate::state::AppState;

pub async fn handle_open_add(
    flow: &mut WordsFlow,
    ui_tx: &AsyncSender<UiEvent>,
) -> anyhow::Result<()> {
    if flow.screen != Screen::Words {
        return Ok(());
    }
    let form = WordForm::add();
    ui_tx
        .send(UiEvent::FormOpened {
            value: form.value().clone(),
            editing: false,
        })
        .await?;
    flow.form = Some(form);
    Ok(())
}

/// Edit goes through the row mediator: the row relays the full entry
/// upward and holds no form state itself.
pub async fn handle_open_edit(
    flow: &mut WordsFlow,
    index: usize,
    ui_tx: &AsyncSender<UiEvent>,
) -> anyhow::Result<()> {
    if flow.screen != Screen::Words {
        return Ok(());
    }
    let Some(word) = flow.list.entries().get(index).cloned() else {
        ui_tx.send(UiEvent::Notice("No such row".into())).await?;
        return Ok(());
    };

    let mediator = RowMediator::new(&word.id);
    let RowSignal::EditRequested(word) = mediator.request_edit(word) else {
        return Ok(());
    };
    let form = WordForm::edit(&word);
    ui_tx
        .send(UiEvent::FormOpened {
            value: form.value().clone(),
            editing: true,
        })
        .await?;
    flow.form = Some(form);
    Ok(())
}

/// Headword keystroke in the form: arm the word-search hint debounce.
pub fn handle_word_draft(flow: &mut WordsFlow, draft: String, self_tx: &AsyncSender<AppEvent>) {
    let Some(form) = flow.form.as_mut() else {
        return;
    };
    form.value_mut().word = draft;
    let generation = form.note_word_input();
    arm_debounce(self_tx.clone(), flow.debounce_token(), generation, |generation| {
        AppEvent::HintSettled { generation }
    });
}

pub fn handle_hint_settled(
    flow: &mut WordsFlow,
    generation: u64,
    store: &Arc<dyn WordStore>,
    self_tx: &AsyncSender<AppEvent>,
) {
    let Some(form) = flow.form.as_mut() else {
        return;
    };
    let Some(query) = form.hint_settled(generation) else {
        return;
    };

    let store = store.clone();
    let tx = self_tx.clone();
    tokio::spawn(async move {
        let result = store.page(query).await;
        let _ = tx.send(AppEvent::HintLoaded { generation, result }).await;
    });
}

pub async fn handle_hint_loaded(
    flow: &mut WordsFlow,
    generation: u64,
    result: Result<WordsPage, ApiError>,
    ui_tx: &AsyncSender<UiEvent>,
) -> anyhow::Result<()> {
    let Some(form) = flow.form.as_mut() else {
        return Ok(());
    };
    form.apply_hints(generation, result);
    ui_tx.send(UiEvent::Hints(form.hints().to_vec())).await?;
    Ok(())
}

pub async fn handle_submit(
    flow: &mut WordsFlow,
    value: WordFormValue,
    store: &Arc<dyn WordStore>,
    ui_tx: &AsyncSender<UiEvent>,
    self_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(form) = flow.form.as_mut() else {
        return Ok(());
    };
    *form.value_mut() = value;

    let Some(request) = form.submit() else {
        // Blocked before any network call; show the field messages.
        let messages: Vec<&str> = form.field_errors().iter().map(|e| e.message.as_str()).collect();
        ui_tx.send(UiEvent::FormError(messages.join("; "))).await?;
        return Ok(());
    };

    spawn_save(store, self_tx, request);
    Ok(())
}

fn spawn_save(store: &Arc<dyn WordStore>, self_tx: &AsyncSender<AppEvent>, request: SaveRequest) {
    let store = store.clone();
    let tx = self_tx.clone();
    tokio::spawn(async move {
        let result = match &request.target {
            Some(id) => store.update(id, request.patch.clone()).await,
            None => store.create(request.patch.clone()).await,
        };
        let _ = tx.send(AppEvent::SaveFinished { result }).await;
    });
}

pub async fn handle_save_finished(
    flow: &mut WordsFlow,
    state: &Arc<AppState>,
    result: Result<Word, ApiError>,
    store: &Arc<dyn WordStore>,
    ui_tx: &AsyncSender<UiEvent>,
    self_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let expired = matches!(result, Err(ApiError::Auth));

    if let Some(form) = flow.form.as_mut() {
        match form.apply_save(result) {
            Some(word) => {
                flow.form = None;
                ui_tx.send(UiEvent::FormClosed).await?;
                // Any successful mutation reloads from the top so the
                // displayed window stays consistent with the server.
                let request = flow.list.entry_saved(&word);
                list_ops::spawn_page_fetch(store, self_tx, request);
                ui_tx.send(UiEvent::ListChanged(flow.snapshot())).await?;
            }
            None => {
                let message = form
                    .error_for(FormField::Word)
                    .map(|m| format!("word: {m}"))
                    .or_else(|| form.form_error().map(String::from))
                    .unwrap_or_else(|| "Request failed".into());
                ui_tx.send(UiEvent::FormError(message)).await?;
            }
        }
    }

    if expired {
        session_ops::handle_expired(flow, state, ui_tx).await?;
    }
    Ok(())
}

pub async fn handle_cancel(
    flow: &mut WordsFlow,
    ui_tx: &AsyncSender<UiEvent>,
) -> anyhow::Result<()> {
    if flow.form.take().is_some() {
        ui_tx.send(UiEvent::FormClosed).await?;
    }
    Ok(())
}
