use edict_client::{ApiError, PageQuery};
use edict_types::{Word, WordPatch, WordsPage};

use crate::validate::{self, FieldError, FormField};

/// How many existing entries the word-search hint suggests while typing.
pub const HINT_LIMIT: usize = 5;

const SAVE_FAILED_MESSAGE: &str = "Request failed";

/// Flat editable draft of a [`Word`]: every optional scalar as a string
/// (empty when absent), list fields as one delimited string each —
/// comma for synonyms/antonyms/tags, newline for examples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordFormValue {
    pub word: String,
    pub translation: String,
    pub part_of_speech: String,
    pub transcription: String,
    pub description: String,
    pub synonyms_text: String,
    pub antonyms_text: String,
    pub examples_text: String,
    pub tags_text: String,
    pub plural: String,
    pub simple_past: String,
    pub past_participle: String,
}

impl WordFormValue {
    pub fn from_word(w: &Word) -> Self {
        Self {
            word: w.word.clone(),
            translation: w.translation.clone().unwrap_or_default(),
            part_of_speech: w.part_of_speech.clone().unwrap_or_default(),
            transcription: w.transcription.clone().unwrap_or_default(),
            description: w.description.clone().unwrap_or_default(),
            synonyms_text: join_comma(w.synonyms.as_deref()),
            antonyms_text: join_comma(w.antonyms.as_deref()),
            examples_text: w.examples.as_deref().unwrap_or_default().join("\n"),
            tags_text: join_comma(w.tags.as_deref()),
            plural: w.plural.clone().unwrap_or_default(),
            simple_past: w.simple_past.clone().unwrap_or_default(),
            past_participle: w.past_participle.clone().unwrap_or_default(),
        }
    }
}

fn join_comma(items: Option<&[String]>) -> String {
    items.unwrap_or_default().join(", ")
}

fn split_on(s: &str, separator: char) -> Vec<String> {
    s.split(separator)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn trim_or_none(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Draft → wire payload. The headword is trimmed but never omitted
/// (validation rejects an empty one before this runs); other scalars
/// are omitted entirely when blank so a PATCH leaves them untouched;
/// list fields are always sent, possibly empty.
pub fn to_patch(value: &WordFormValue) -> WordPatch {
    WordPatch {
        word: Some(value.word.trim().to_string()),
        translation: trim_or_none(&value.translation),
        part_of_speech: trim_or_none(&value.part_of_speech),
        transcription: trim_or_none(&value.transcription),
        description: trim_or_none(&value.description),
        synonyms: Some(split_on(&value.synonyms_text, ',')),
        antonyms: Some(split_on(&value.antonyms_text, ',')),
        examples: Some(split_on(&value.examples_text, '\n')),
        tags: Some(split_on(&value.tags_text, ',')),
        plural: trim_or_none(&value.plural),
        simple_past: trim_or_none(&value.simple_past),
        past_participle: trim_or_none(&value.past_participle),
    }
}

/// The mutation a submitted form resolves to: PATCH when editing an
/// existing entry, POST otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub target: Option<String>,
    pub patch: WordPatch,
}

/// One add/edit session. Created fresh for "add", populated from an
/// entry for "edit", discarded after a successful save or cancel.
pub struct WordForm {
    value: WordFormValue,
    editing_id: Option<String>,
    submitting: bool,
    error: Option<String>,
    field_errors: Vec<FieldError>,
    hints: Vec<Word>,
    hint_generation: u64,
}

impl WordForm {
    pub fn add() -> Self {
        Self::with_value(WordFormValue::default(), None)
    }

    pub fn edit(word: &Word) -> Self {
        Self::with_value(WordFormValue::from_word(word), Some(word.id.clone()))
    }

    fn with_value(value: WordFormValue, editing_id: Option<String>) -> Self {
        Self {
            value,
            editing_id,
            submitting: false,
            error: None,
            field_errors: Vec::new(),
            hints: Vec::new(),
            hint_generation: 0,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn value(&self) -> &WordFormValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut WordFormValue {
        &mut self.value
    }

    pub fn show_plural_field(&self) -> bool {
        validate::show_plural_field(&self.value.part_of_speech)
    }

    pub fn show_verb_forms_field(&self) -> bool {
        validate::show_verb_forms_field(&self.value.part_of_speech)
    }

    /// Validates and, when clean, produces the save call. Invalid drafts
    /// never reach the network; the field errors are kept for display.
    pub fn submit(&mut self) -> Option<SaveRequest> {
        let errors = validate::validate(&self.value);
        if !errors.is_empty() {
            self.field_errors = errors;
            return None;
        }

        self.field_errors.clear();
        self.error = None;
        self.submitting = true;
        Some(SaveRequest {
            target: self.editing_id.clone(),
            patch: to_patch(&self.value),
        })
    }

    /// On success hands the saved entry upward (the list reloads); on
    /// failure keeps the session open with the backend's message.
    pub fn apply_save(&mut self, result: Result<Word, ApiError>) -> Option<Word> {
        self.submitting = false;
        match result {
            Ok(word) => {
                self.error = None;
                Some(word)
            }
            Err(err) => {
                let message = err.surface_message();
                self.error = Some(if message.is_empty() {
                    SAVE_FAILED_MESSAGE.to_string()
                } else {
                    message
                });
                None
            }
        }
    }

    /// Error shown on a specific control: an API error that matches the
    /// field's pattern wins, then local validation.
    pub fn error_for(&self, field: FormField) -> Option<&str> {
        if let Some(api) = self.error.as_deref() {
            if validate::field_for_api_error(api) == Some(field) {
                return Some(api);
            }
        }
        self.field_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Form-level error: an API message no field claims.
    pub fn form_error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|m| validate::field_for_api_error(m).is_none())
    }

    /// Arms the word-search hint debounce for the current headword
    /// draft; returns the generation the timer must echo back.
    pub fn note_word_input(&mut self) -> u64 {
        self.hint_generation += 1;
        self.hint_generation
    }

    /// Builds the hint lookup once the debounce settles, unless a newer
    /// keystroke superseded it or the draft is blank.
    pub fn hint_settled(&mut self, generation: u64) -> Option<PageQuery> {
        if generation != self.hint_generation {
            return None;
        }
        let draft = self.value.word.trim();
        if draft.is_empty() {
            self.hints.clear();
            return None;
        }
        Some(PageQuery {
            limit: HINT_LIMIT,
            search: Some(draft.to_string()),
            ..PageQuery::default()
        })
    }

    /// Stale or failed hint lookups are dropped without a trace.
    pub fn apply_hints(&mut self, generation: u64, result: Result<WordsPage, ApiError>) {
        if generation != self.hint_generation {
            return;
        }
        if let Ok(page) = result {
            self.hints = page.items;
        }
    }

    pub fn hints(&self) -> &[Word] {
        &self.hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_word() -> Word {
        let mut w = Word::new("w1", "run");
        w.translation = Some("laufen".into());
        w.part_of_speech = Some("v".into());
        w.synonyms = Some(vec!["a".into(), "b".into()]);
        w.examples = Some(vec!["I run.".into(), "He ran.".into()]);
        w.simple_past = Some("ran".into());
        w
    }

    #[test]
    fn list_fields_round_trip_through_the_form() {
        let form = WordFormValue::from_word(&sample_word());
        assert_eq!(form.synonyms_text, "a, b");
        assert_eq!(form.examples_text, "I run.\nHe ran.");

        let patch = to_patch(&form);
        assert_eq!(patch.synonyms, Some(vec!["a".into(), "b".into()]));
        assert_eq!(
            patch.examples,
            Some(vec!["I run.".into(), "He ran.".into()])
        );
    }

    #[test]
    fn headword_is_trimmed_never_omitted() {
        let value = WordFormValue {
            word: "  test  ".into(),
            ..WordFormValue::default()
        };
        let patch = to_patch(&value);
        assert_eq!(patch.word.as_deref(), Some("test"));
        assert_eq!(patch.translation, None);
        assert_eq!(patch.plural, None);
        assert_eq!(patch.synonyms, Some(vec![]));
        assert_eq!(patch.tags, Some(vec![]));
    }

    #[test]
    fn blank_scalars_are_omitted_so_patch_leaves_them_untouched() {
        let value = WordFormValue {
            word: "test".into(),
            translation: "   ".into(),
            transcription: "tɛst".into(),
            ..WordFormValue::default()
        };
        let patch = to_patch(&value);
        assert_eq!(patch.translation, None);
        assert_eq!(patch.transcription.as_deref(), Some("tɛst"));
    }

    #[test]
    fn empty_tokens_are_discarded_when_splitting() {
        let value = WordFormValue {
            word: "test".into(),
            synonyms_text: " a , , b ,".into(),
            examples_text: "one\n\n  \ntwo".into(),
            ..WordFormValue::default()
        };
        let patch = to_patch(&value);
        assert_eq!(patch.synonyms, Some(vec!["a".into(), "b".into()]));
        assert_eq!(patch.examples, Some(vec!["one".into(), "two".into()]));
    }

    #[test]
    fn invalid_draft_never_reaches_the_network() {
        let mut form = WordForm::add();
        form.value_mut().part_of_speech = "xyz".into();
        assert!(form.submit().is_none());
        assert!(form.error_for(FormField::Word).is_some());
        assert!(form.error_for(FormField::PartOfSpeech).is_some());
    }

    #[test]
    fn add_submits_a_create_edit_submits_an_update() {
        let mut add = WordForm::add();
        add.value_mut().word = "neu".into();
        let req = add.submit().unwrap();
        assert_eq!(req.target, None);

        let mut edit = WordForm::edit(&sample_word());
        let req = edit.submit().unwrap();
        assert_eq!(req.target.as_deref(), Some("w1"));
        assert_eq!(req.patch.word.as_deref(), Some("run"));
    }

    #[test]
    fn save_failure_surfaces_joined_messages() {
        let mut form = WordForm::add();
        form.value_mut().word = "neu".into();
        form.submit().unwrap();

        let saved = form.apply_save(Err(ApiError::Validation {
            messages: vec!["First".into(), "Second".into()],
        }));
        assert_eq!(saved, None);
        assert!(!form.is_submitting());
        assert_eq!(form.form_error(), Some("First Second"));
    }

    #[test]
    fn matching_api_error_lands_on_the_word_field() {
        let mut form = WordForm::add();
        form.value_mut().word = "neu".into();
        form.submit().unwrap();
        form.apply_save(Err(ApiError::Validation {
            messages: vec!["word must not be empty".into()],
        }));

        assert_eq!(
            form.error_for(FormField::Word),
            Some("word must not be empty")
        );
        assert_eq!(form.form_error(), None);
    }

    #[test]
    fn successful_save_hands_the_entry_upward() {
        let mut form = WordForm::edit(&sample_word());
        form.submit().unwrap();
        let saved = form.apply_save(Ok(sample_word()));
        assert_eq!(saved.map(|w| w.id), Some("w1".into()));
    }

    #[test]
    fn hint_lookup_uses_the_latest_draft_only() {
        let mut form = WordForm::add();
        form.value_mut().word = "ru".into();
        let g1 = form.note_word_input();
        form.value_mut().word = "run".into();
        let g2 = form.note_word_input();

        assert!(form.hint_settled(g1).is_none());
        let query = form.hint_settled(g2).expect("latest fires");
        assert_eq!(query.limit, HINT_LIMIT);
        assert_eq!(query.search.as_deref(), Some("run"));
    }

    #[test]
    fn stale_or_failed_hints_are_dropped() {
        let mut form = WordForm::add();
        form.value_mut().word = "run".into();
        let r#gen = form.note_word_input();

        let page = WordsPage {
            items: vec![sample_word()],
            next_cursor: None,
            has_more: false,
            total_count: 1,
        };
        form.apply_hints(r#gen - 1, Ok(page.clone()));
        assert!(form.hints().is_empty());

        form.apply_hints(r#gen, Ok(page));
        assert_eq!(form.hints().len(), 1);

        let r#gen = form.note_word_input();
        form.apply_hints(
            r#gen,
            Err(ApiError::Server {
                status: 500,
                message: "boom".into(),
            }),
        );
        // Failure keeps whatever was shown; hints are best-effort.
        assert_eq!(form.hints().len(), 1);
    }

    #[test]
    fn blank_draft_clears_hints_without_a_lookup() {
        let mut form = WordForm::add();
        form.value_mut().word = "run".into();
        let r#gen = form.note_word_input();
        form.apply_hints(
            r#gen,
            Ok(WordsPage {
                items: vec![sample_word()],
                next_cursor: None,
                has_more: false,
                total_count: 1,
            }),
        );

        form.value_mut().word = "  ".into();
        let r#gen = form.note_word_input();
        assert!(form.hint_settled(r#gen).is_none());
        assert!(form.hints().is_empty());
    }
}
