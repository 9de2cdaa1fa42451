use std::sync::Arc;

use edict_client::auth::{self, Callback};
use edict_client::WordStore;
use kanal::AsyncSender;

use super::{list_ops, AppEvent, Screen, UiEvent, WordsFlow};
use crate::state::AppState;

/// Switches to the words screen and kicks off the initial load.
pub async fn enter_words(
    flow: &mut WordsFlow,
    store: &Arc<dyn WordStore>,
    ui_tx: &AsyncSender<UiEvent>,
    self_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    flow.screen = Screen::Words;
    flow.list.attach_viewport();
    ui_tx.send(UiEvent::Screen(Screen::Words)).await?;

    let request = flow.list.load_first();
    list_ops::spawn_page_fetch(store, self_tx, request);
    ui_tx.send(UiEvent::ListChanged(flow.snapshot())).await?;
    Ok(())
}

pub async fn handle_login(
    flow: &mut WordsFlow,
    state: &Arc<AppState>,
    store: &Arc<dyn WordStore>,
    ui_tx: &AsyncSender<UiEvent>,
    self_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    // Guard: an authenticated visit to the login screen goes straight
    // to the list.
    if state.session.is_authenticated() {
        return enter_words(flow, store, ui_tx, self_tx).await;
    }

    let base_url = {
        let config = state.config.read().await;
        config.api.base_url.clone()
    };
    ui_tx
        .send(UiEvent::LoginUrl(state.session.google_login_url(&base_url)))
        .await?;
    Ok(())
}

/// The provider redirect pasted back by the user: either a token or an
/// `error=unauthorized` rejection.
pub async fn handle_callback(
    flow: &mut WordsFlow,
    state: &Arc<AppState>,
    store: &Arc<dyn WordStore>,
    url: &str,
    ui_tx: &AsyncSender<UiEvent>,
    self_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match auth::parse_callback(url) {
        Callback::Token(token) => {
            state.session.set_token(token);
            enter_words(flow, store, ui_tx, self_tx).await?;
        }
        Callback::Unauthorized => {
            ui_tx
                .send(UiEvent::Notice("Login was rejected by the provider".into()))
                .await?;
        }
        Callback::Invalid => {
            ui_tx
                .send(UiEvent::Notice("Could not read a token from that URL".into()))
                .await?;
        }
    }
    Ok(())
}

pub async fn handle_logout(
    flow: &mut WordsFlow,
    state: &Arc<AppState>,
    ui_tx: &AsyncSender<UiEvent>,
) -> anyhow::Result<()> {
    let base_url = {
        let config = state.config.read().await;
        config.api.base_url.clone()
    };

    // Best-effort server notify; the local session ends regardless.
    let session = state.session.clone();
    tokio::spawn(async move {
        session.logout(&base_url).await;
    });

    flow.reset_to_login();
    ui_tx.send(UiEvent::Screen(Screen::Login)).await?;
    Ok(())
}

/// A 401 anywhere: the client already cleared the token; tear the words
/// screen down and ask for a fresh login.
pub async fn handle_expired(
    flow: &mut WordsFlow,
    state: &Arc<AppState>,
    ui_tx: &AsyncSender<UiEvent>,
) -> anyhow::Result<()> {
    state.session.clear_token();
    flow.reset_to_login();
    ui_tx
        .send(UiEvent::Notice("Session expired, please log in again".into()))
        .await?;
    ui_tx.send(UiEvent::Screen(Screen::Login)).await?;
    Ok(())
}
