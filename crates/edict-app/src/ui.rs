use std::sync::Arc;

use edict_core::validate;
use edict_core::WordFormValue;
use edict_types::{SortBy, SortOrder};
use kanal::{AsyncReceiver, AsyncSender};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::events::{AppEvent, ListSnapshot, Screen, UiEvent};
use crate::state::AppState;

/// Terminal loop: renders snapshots pushed by the event loop and turns
/// typed lines into events.
pub async fn ui_loop(
    state: Arc<AppState>,
    rx: AsyncReceiver<UiEvent>,
    tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let viewport_rows = {
        let config = state.config.read().await;
        config.ui.viewport_rows
    };
    let mut view = View::new(viewport_rows);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = rx.recv() => view.render(event?),
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tx.send(AppEvent::Quit).await?;
                    break;
                };
                if !view.handle_line(line.trim(), &tx).await? {
                    tx.send(AppEvent::Quit).await?;
                    break;
                }
            }
        }
    }

    Ok(())
}

/// One editable control of the add/edit form, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Word,
    Translation,
    PartOfSpeech,
    Transcription,
    Description,
    Synonyms,
    Antonyms,
    Examples,
    Tags,
    Plural,
    SimplePast,
    PastParticiple,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Word => "Word",
            Field::Translation => "Translation",
            Field::PartOfSpeech => "Part of speech (adj, adv, conj, interj, n, num, ph, ph v, prep, pron, v)",
            Field::Transcription => "Transcription",
            Field::Description => "Description",
            Field::Synonyms => "Synonyms (comma-separated)",
            Field::Antonyms => "Antonyms (comma-separated)",
            Field::Examples => "Examples (separate with ' | ')",
            Field::Tags => "Tags (comma-separated)",
            Field::Plural => "Plural",
            Field::SimplePast => "Simple past",
            Field::PastParticiple => "Past participle",
        }
    }

    fn get(self, value: &WordFormValue) -> String {
        match self {
            Field::Word => value.word.clone(),
            Field::Translation => value.translation.clone(),
            Field::PartOfSpeech => value.part_of_speech.clone(),
            Field::Transcription => value.transcription.clone(),
            Field::Description => value.description.clone(),
            Field::Synonyms => value.synonyms_text.clone(),
            Field::Antonyms => value.antonyms_text.clone(),
            Field::Examples => value.examples_text.replace('\n', " | "),
            Field::Tags => value.tags_text.clone(),
            Field::Plural => value.plural.clone(),
            Field::SimplePast => value.simple_past.clone(),
            Field::PastParticiple => value.past_participle.clone(),
        }
    }

    fn set(self, value: &mut WordFormValue, input: &str) {
        let input = input.to_string();
        match self {
            Field::Word => value.word = input,
            Field::Translation => value.translation = input,
            Field::PartOfSpeech => value.part_of_speech = input,
            Field::Transcription => value.transcription = input,
            Field::Description => value.description = input,
            Field::Synonyms => value.synonyms_text = input,
            Field::Antonyms => value.antonyms_text = input,
            Field::Examples => value.examples_text = input.replace(" | ", "\n"),
            Field::Tags => value.tags_text = input,
            Field::Plural => value.plural = input,
            Field::SimplePast => value.simple_past = input,
            Field::PastParticiple => value.past_participle = input,
        }
    }
}

/// Conditional controls follow the current part of speech: plural for
/// nouns/adjectives, verb forms for verbs/phrasal verbs.
fn visible_fields(value: &WordFormValue) -> Vec<Field> {
    let mut fields = vec![
        Field::Word,
        Field::Translation,
        Field::PartOfSpeech,
        Field::Transcription,
        Field::Description,
        Field::Synonyms,
        Field::Antonyms,
        Field::Examples,
        Field::Tags,
    ];
    if validate::show_plural_field(&value.part_of_speech) {
        fields.push(Field::Plural);
    }
    if validate::show_verb_forms_field(&value.part_of_speech) {
        fields.push(Field::SimplePast);
        fields.push(Field::PastParticiple);
    }
    fields
}

struct FormSession {
    value: WordFormValue,
    cursor: usize,
}

struct View {
    screen: Screen,
    snapshot: Option<ListSnapshot>,
    offset: usize,
    rows: usize,
    form: Option<FormSession>,
    awaiting_confirm: bool,
}

impl View {
    fn new(rows: usize) -> Self {
        Self {
            screen: Screen::Login,
            snapshot: None,
            offset: 0,
            rows: rows.max(1),
            form: None,
            awaiting_confirm: false,
        }
    }

    fn render(&mut self, event: UiEvent) {
        match event {
            UiEvent::Screen(screen) => {
                self.screen = screen;
                self.form = None;
                self.awaiting_confirm = false;
                self.offset = 0;
                match screen {
                    Screen::Login => {
                        println!("Not logged in. Type :login to start, then paste the redirect URL here.");
                    }
                    Screen::Words => {}
                }
            }
            UiEvent::ListChanged(snapshot) => {
                self.offset = self.offset.min(snapshot.entries.len().saturating_sub(1));
                self.snapshot = Some(snapshot);
                if self.form.is_none() {
                    self.print_list();
                }
            }
            UiEvent::Hints(words) => {
                if !words.is_empty() {
                    let existing: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
                    println!("  similar entries already exist: {}", existing.join(", "));
                }
            }
            UiEvent::FormOpened { value, editing } => {
                println!();
                if editing {
                    println!("Editing '{}'. Enter keeps the shown value, '-' clears it.", value.word);
                } else {
                    println!("New word. Enter skips a field.");
                }
                let session = FormSession { value, cursor: 0 };
                self.prompt_field(&session);
                self.form = Some(session);
            }
            UiEvent::FormError(message) => {
                println!("! {message}");
                println!("(:save to retry, :cancel to discard)");
            }
            UiEvent::FormClosed => {
                self.form = None;
            }
            UiEvent::ConfirmPrompt(message) => {
                self.awaiting_confirm = true;
                println!("{message}");
            }
            UiEvent::LoginUrl(url) => {
                println!("Open this URL in a browser:");
                println!("  {url}");
                println!("then paste the redirect URL here.");
            }
            UiEvent::Notice(message) => {
                println!("* {message}");
            }
        }
    }

    fn prompt_field(&self, session: &FormSession) {
        let fields = visible_fields(&session.value);
        if let Some(field) = fields.get(session.cursor) {
            let current = field.get(&session.value);
            if current.is_empty() {
                println!("{}: ", field.label());
            } else {
                println!("{} [{current}]: ", field.label());
            }
        } else {
            println!("(:save to submit, :cancel to discard)");
        }
    }

    fn print_list(&self) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };

        println!();
        let total = snapshot
            .total_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".into());
        let mut header = format!(
            "Edict — {total} words, sorted by {} {}",
            snapshot.sort_by.as_param(),
            snapshot.order.as_param()
        );
        if !snapshot.search.trim().is_empty() {
            header.push_str(&format!(", matching '{}'", snapshot.search.trim()));
        }
        if snapshot.loading {
            header.push_str("  (loading…)");
        }
        println!("{header}");

        if let Some(error) = &snapshot.error {
            println!("! {error}");
        }

        if snapshot.entries.is_empty() && !snapshot.loading {
            println!("  no words yet — :add creates one");
            return;
        }

        let end = (self.offset + self.rows).min(snapshot.entries.len());
        for (index, word) in snapshot.entries[self.offset..end].iter().enumerate() {
            let row = self.offset + index + 1;
            let translation = word.translation.as_deref().unwrap_or("—");
            match word.part_of_speech.as_deref() {
                Some(pos) => println!("{row:>4}. {}  {translation}  [{pos}]", word.word),
                None => println!("{row:>4}. {}  {translation}", word.word),
            }
        }
        if snapshot.loading_more {
            println!("      …");
        }
    }

    /// Returns false when the user asked to quit.
    async fn handle_line(
        &mut self,
        line: &str,
        tx: &AsyncSender<AppEvent>,
    ) -> anyhow::Result<bool> {
        if line == ":quit" || line == ":q" {
            return Ok(false);
        }

        if self.form.is_some() {
            self.handle_form_line(line, tx).await?;
            return Ok(true);
        }

        match self.screen {
            Screen::Login => self.handle_login_line(line, tx).await?,
            Screen::Words => self.handle_words_line(line, tx).await?,
        }
        Ok(true)
    }

    async fn handle_login_line(
        &mut self,
        line: &str,
        tx: &AsyncSender<AppEvent>,
    ) -> anyhow::Result<()> {
        match line {
            ":login" => tx.send(AppEvent::Login).await?,
            _ if line.starts_with("http") => {
                tx.send(AppEvent::PasteCallback(line.to_string())).await?;
            }
            _ => println!(":login to start, or paste the redirect URL; :quit leaves"),
        }
        Ok(())
    }

    async fn handle_words_line(
        &mut self,
        line: &str,
        tx: &AsyncSender<AppEvent>,
    ) -> anyhow::Result<()> {
        if self.awaiting_confirm {
            self.awaiting_confirm = false;
            if line == ":y" {
                tx.send(AppEvent::ConfirmDelete).await?;
            } else {
                tx.send(AppEvent::CancelDelete).await?;
            }
            return Ok(());
        }

        if let Some(term) = line.strip_prefix('/') {
            tx.send(AppEvent::SearchInput(term.to_string())).await?;
            return Ok(());
        }

        let mut parts = line.split_whitespace();
        match parts.next() {
            Some(":sort") => {
                let sort_by = parts.next().and_then(SortBy::from_param);
                let order = parts.next().and_then(SortOrder::from_param);
                match (sort_by, order) {
                    (Some(sort_by), Some(order)) => {
                        tx.send(AppEvent::SetSort(sort_by, order)).await?;
                    }
                    _ => println!("usage: :sort word|translation|createdAt asc|desc"),
                }
            }
            Some(":down") => {
                let len = self.snapshot.as_ref().map(|s| s.entries.len()).unwrap_or(0);
                self.offset = (self.offset + self.rows).min(len.saturating_sub(1));
                self.print_list();
                let rendered_end = (self.offset + self.rows).min(len);
                tx.send(AppEvent::ScrolledTo { rendered_end }).await?;
            }
            Some(":up") => {
                self.offset = self.offset.saturating_sub(self.rows);
                self.print_list();
            }
            Some(":add") => tx.send(AppEvent::OpenAdd).await?,
            Some(":edit") => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
                Some(row) if row > 0 => tx.send(AppEvent::OpenEdit { index: row - 1 }).await?,
                _ => println!("usage: :edit <row>"),
            },
            Some(":del") => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
                Some(row) if row > 0 => {
                    tx.send(AppEvent::RequestDelete { index: row - 1 }).await?;
                }
                _ => println!("usage: :del <row>"),
            },
            Some(":reload") => tx.send(AppEvent::Reload).await?,
            Some(":logout") => tx.send(AppEvent::Logout).await?,
            Some(":help") => print_help(),
            None => self.print_list(),
            Some(_) => println!("unknown command — :help lists them"),
        }
        Ok(())
    }

    async fn handle_form_line(
        &mut self,
        line: &str,
        tx: &AsyncSender<AppEvent>,
    ) -> anyhow::Result<()> {
        let Some(session) = self.form.as_mut() else {
            return Ok(());
        };

        match line {
            ":cancel" => {
                tx.send(AppEvent::CancelForm).await?;
                return Ok(());
            }
            ":save" => {
                tx.send(AppEvent::SubmitForm(session.value.clone())).await?;
                return Ok(());
            }
            _ => {}
        }

        let fields = visible_fields(&session.value);
        if let Some(field) = fields.get(session.cursor).copied() {
            if line == "-" {
                field.set(&mut session.value, "");
            } else if !line.is_empty() {
                field.set(&mut session.value, line);
            }
            if field == Field::Word {
                tx.send(AppEvent::WordDraft(session.value.word.clone())).await?;
            }
            session.cursor += 1;
        }

        let session = self.form.as_ref().expect("form session present");
        self.prompt_field(session);
        Ok(())
    }
}

fn print_help() {
    println!("/<term>            search (300ms debounce)");
    println!(":sort <by> <dir>   word|translation|createdAt asc|desc");
    println!(":down / :up        scroll the list");
    println!(":add               new word");
    println!(":edit <row>        edit a row");
    println!(":del <row>         delete a row (asks to confirm)");
    println!(":reload            refetch the first page");
    println!(":logout / :quit");
}
