use std::sync::LazyLock;

use regex::Regex;

use edict_types::PartOfSpeech;

use crate::form::WordFormValue;

/// Form controls that can carry a field-level error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Word,
    PartOfSpeech,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// Backend messages matching this pattern render on the word field
/// instead of form-level.
static WORD_API_ERROR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)word.*(required|empty)").expect("valid pattern"));

/// Pre-submission checks; a non-empty result blocks the network call.
pub fn validate(value: &WordFormValue) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if value.word.trim().is_empty() {
        errors.push(FieldError {
            field: FormField::Word,
            message: "Word is required".into(),
        });
    }

    let pos = value.part_of_speech.trim();
    if !pos.is_empty() && PartOfSpeech::from_code(pos).is_none() {
        errors.push(FieldError {
            field: FormField::PartOfSpeech,
            message: "Please select a valid part of speech".into(),
        });
    }

    errors
}

/// Maps a backend error message onto the field it belongs to, when it
/// matches a known pattern.
pub fn field_for_api_error(message: &str) -> Option<FormField> {
    WORD_API_ERROR.is_match(message).then_some(FormField::Word)
}

/// Plural input is meaningful for nouns and adjectives only. Pure
/// derivation, recomputed from the current code.
pub fn show_plural_field(pos_code: &str) -> bool {
    matches!(
        PartOfSpeech::from_code(pos_code.trim()),
        Some(PartOfSpeech::Noun | PartOfSpeech::Adjective)
    )
}

/// Simple past / past participle apply to verbs and phrasal verbs.
pub fn show_verb_forms_field(pos_code: &str) -> bool {
    matches!(
        PartOfSpeech::from_code(pos_code.trim()),
        Some(PartOfSpeech::Verb | PartOfSpeech::PhrasalVerb)
    )
}
