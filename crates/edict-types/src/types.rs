use serde::{Deserialize, Serialize};

/// Part-of-speech codes accepted by the API (must match the backend set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    #[serde(rename = "adj")]
    Adjective,
    #[serde(rename = "adv")]
    Adverb,
    #[serde(rename = "conj")]
    Conjunction,
    #[serde(rename = "interj")]
    Interjection,
    #[serde(rename = "n")]
    Noun,
    #[serde(rename = "num")]
    Numeral,
    #[serde(rename = "ph")]
    Phrase,
    #[serde(rename = "ph v")]
    PhrasalVerb,
    #[serde(rename = "prep")]
    Preposition,
    #[serde(rename = "pron")]
    Pronoun,
    #[serde(rename = "v")]
    Verb,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 11] = [
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Interjection,
        PartOfSpeech::Noun,
        PartOfSpeech::Numeral,
        PartOfSpeech::Phrase,
        PartOfSpeech::PhrasalVerb,
        PartOfSpeech::Preposition,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Verb,
    ];

    /// Unknown codes are rejected, never mapped to a nearest match.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|pos| pos.as_code() == code)
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            PartOfSpeech::Adjective => "adj",
            PartOfSpeech::Adverb => "adv",
            PartOfSpeech::Conjunction => "conj",
            PartOfSpeech::Interjection => "interj",
            PartOfSpeech::Noun => "n",
            PartOfSpeech::Numeral => "num",
            PartOfSpeech::Phrase => "ph",
            PartOfSpeech::PhrasalVerb => "ph v",
            PartOfSpeech::Preposition => "prep",
            PartOfSpeech::Pronoun => "pron",
            PartOfSpeech::Verb => "v",
        }
    }
}

/// One vocabulary entry as the backend stores it.
///
/// `word` is never empty or whitespace-only once persisted. The
/// part-of-speech stays a raw code on the wire; membership in
/// [`PartOfSpeech::ALL`] is enforced at form validation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    #[serde(rename = "_id")]
    pub id: String,
    pub word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub antonyms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple_past: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_participle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_spell: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_e_to_u: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_u_to_e: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_verify_next_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_verified_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Word {
    /// Bare entry with only the required fields set.
    pub fn new(id: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
            translation: None,
            description: None,
            part_of_speech: None,
            transcription: None,
            synonyms: None,
            antonyms: None,
            examples: None,
            tags: None,
            plural: None,
            simple_past: None,
            past_participle: None,
            can_spell: None,
            can_e_to_u: None,
            can_u_to_e: None,
            to_verify_next_time: None,
            last_verified_at: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Partial entity for create/update. `None` fields are omitted from the
/// JSON body so the backend leaves them untouched on PATCH.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub antonyms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple_past: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_participle: Option<String>,
}

/// One page of a cursor query. Item order is the server's sort order and
/// is never rearranged client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordsPage {
    pub items: Vec<Word>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
    /// Snapshot at query time; may go stale as data mutates.
    pub total_count: u64,
}

/// Body of a successful DELETE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteReceipt {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    #[serde(rename = "word")]
    Word,
    #[serde(rename = "translation")]
    Translation,
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
}

impl SortBy {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortBy::Word => "word",
            SortBy::Translation => "translation",
            SortBy::CreatedAt => "createdAt",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "word" => Some(SortBy::Word),
            "translation" => Some(SortBy::Translation),
            "createdAt" => Some(SortBy::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Asc,
    #[default]
    #[serde(rename = "desc")]
    Desc,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_of_speech_codes_round_trip() {
        for pos in PartOfSpeech::ALL {
            assert_eq!(PartOfSpeech::from_code(pos.as_code()), Some(pos));
        }
        assert_eq!(PartOfSpeech::from_code("xyz"), None);
        assert_eq!(PartOfSpeech::from_code("ph v"), Some(PartOfSpeech::PhrasalVerb));
    }

    #[test]
    fn word_deserializes_backend_shape() {
        let raw = r#"{
            "_id": "66f0",
            "word": "run",
            "partOfSpeech": "v",
            "simplePast": "ran",
            "pastParticiple": "run",
            "tags": ["irregular"],
            "createdAt": "2025-01-01T00:00:00Z"
        }"#;
        let w: Word = serde_json::from_str(raw).unwrap();
        assert_eq!(w.id, "66f0");
        assert_eq!(w.word, "run");
        assert_eq!(w.part_of_speech.as_deref(), Some("v"));
        assert_eq!(w.simple_past.as_deref(), Some("ran"));
        assert_eq!(w.translation, None);
    }

    #[test]
    fn patch_omits_unset_fields() {
        let patch = WordPatch {
            word: Some("test".into()),
            synonyms: Some(vec![]),
            ..WordPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "word": "test", "synonyms": [] }));
    }

    #[test]
    fn page_parses_null_cursor() {
        let raw = r#"{"items": [], "nextCursor": null, "hasMore": false, "totalCount": 0}"#;
        let page: WordsPage = serde_json::from_str(raw).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, None);
        assert!(!page.has_more);
    }
}
