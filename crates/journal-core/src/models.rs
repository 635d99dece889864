//! Data models for the community journal
//!
//! Defines the persisted `Entry`, the raw `EntryInput` a caller submits,
//! and the options used to build an entry.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sanitize::TagsInput;

/// Names of the input fields, in the order they are checked
pub const FIELD_NAMES: [&str; 6] = [
    "title",
    "summary",
    "commitments",
    "participants",
    "decisionType",
    "tags",
];

/// One persisted journal record
///
/// Serialized in camelCase; this is the on-disk format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique identifier, the merge key
    pub id: String,
    /// ISO-8601 creation time, used for ordering
    pub created_at: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub commitments: String,
    #[serde(default)]
    pub participants: String,
    /// Lower-cased, free-form decision kind (see `decision_label`)
    #[serde(default)]
    pub decision_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Entry {
    /// Parsed creation time, `None` when `created_at` is not a date
    pub fn created_at_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Lower-cased text matched by free-text search
    pub fn searchable_text(&self) -> String {
        let tags = self.tags.join(" ");
        [
            self.title.as_str(),
            self.summary.as_str(),
            self.commitments.as_str(),
            self.participants.as_str(),
            self.decision_type.as_str(),
            tags.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }
}

/// Raw, unsanitized entry data as submitted by a form or import file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsInput>,
}

impl EntryInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_commitments(mut self, commitments: impl Into<String>) -> Self {
        self.commitments = Some(commitments.into());
        self
    }

    pub fn with_participants(mut self, participants: impl Into<String>) -> Self {
        self.participants = Some(participants.into());
        self
    }

    pub fn with_decision_type(mut self, decision_type: impl Into<String>) -> Self {
        self.decision_type = Some(decision_type.into());
        self
    }

    pub fn with_tags(mut self, tags: impl Into<TagsInput>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Raw text of a field by its wire name
    ///
    /// A tag list is joined with commas. Unknown names yield `None`.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "title" => self.title.clone(),
            "summary" => self.summary.clone(),
            "commitments" => self.commitments.clone(),
            "participants" => self.participants.clone(),
            "decisionType" => self.decision_type.clone(),
            "tags" => self.tags.as_ref().map(TagsInput::raw_text),
            _ => None,
        }
    }

    /// Present string-valued fields in `FIELD_NAMES` order
    ///
    /// Tags only count here when supplied as a single string.
    pub fn string_fields(&self) -> Vec<(&'static str, &str)> {
        let tags = match &self.tags {
            Some(TagsInput::Text(s)) => Some(s.as_str()),
            _ => None,
        };
        [
            ("title", self.title.as_deref()),
            ("summary", self.summary.as_deref()),
            ("commitments", self.commitments.as_deref()),
            ("participants", self.participants.as_deref()),
            ("decisionType", self.decision_type.as_deref()),
            ("tags", tags),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }

    /// Whether any field holds something other than whitespace
    pub fn has_content(&self) -> bool {
        FIELD_NAMES
            .iter()
            .any(|name| self.field(name).is_some_and(|v| !v.trim().is_empty()))
    }
}

/// Outcome of validating an `EntryInput`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// Human-readable problems, required-field checks first
    pub errors: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

type Generator<'a> = Box<dyn Fn() -> String + 'a>;

/// How `create_entry` assigns `id` and `created_at`
///
/// Both default to fresh values; tests and imports inject fixed ones.
#[derive(Default)]
pub struct EntryOptions<'a> {
    id_generator: Option<Generator<'a>>,
    timestamp: Option<Generator<'a>>,
}

impl<'a> EntryOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_generator(mut self, generator: impl Fn() -> String + 'a) -> Self {
        self.id_generator = Some(Box::new(generator));
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Fn() -> String + 'a) -> Self {
        self.timestamp = Some(Box::new(timestamp));
        self
    }

    /// Always use `id`
    pub fn with_id(self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.with_id_generator(move || id.clone())
    }

    /// Always use `created_at`
    pub fn with_created_at(self, created_at: impl Into<String>) -> Self {
        let created_at = created_at.into();
        self.with_timestamp(move || created_at.clone())
    }

    pub(crate) fn next_id(&self) -> String {
        match &self.id_generator {
            Some(generate) => generate(),
            None => default_id(),
        }
    }

    pub(crate) fn next_timestamp(&self) -> String {
        match &self.timestamp {
            Some(timestamp) => timestamp(),
            None => now_timestamp(),
        }
    }
}

/// A fresh entry id combining the current time and randomness
pub fn default_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("entry-{}-{}", Utc::now().timestamp_millis(), &random[..12])
}

/// The current time as ISO-8601 with millisecond precision
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Format a time as `YYYY-MM-DDTHH:MM:SS.sssZ`
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored or imported timestamp
///
/// Accepts RFC 3339, a date-time without offset (read as UTC) and a bare
/// date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Display label for a decision type; unknown kinds are shown as-is
pub fn decision_label(decision_type: &str) -> &str {
    match decision_type {
        "consensus" => "Consensus",
        "consultation" => "Consultation",
        "initiative" => "Personal initiative",
        "veille" => "Watch / To explore",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> Entry {
        Entry {
            id: "entry-1".to_string(),
            created_at: "2023-12-01T10:00:00.000Z".to_string(),
            title: "Décision".to_string(),
            summary: "Partage des notes".to_string(),
            commitments: "Envoyer le compte-rendu".to_string(),
            participants: "Collectif A".to_string(),
            decision_type: "consensus".to_string(),
            tags: vec!["transparence".to_string()],
        }
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let json = serde_json::to_value(sample_entry()).unwrap();
        assert_eq!(json["createdAt"], "2023-12-01T10:00:00.000Z");
        assert_eq!(json["decisionType"], "consensus");
        assert_eq!(json["tags"], serde_json::json!(["transparence"]));
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_entry_serialization_round_trip() {
        let entry = sample_entry();
        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, deserialized);
    }

    #[test]
    fn test_entry_missing_text_fields_default() {
        let entry: Entry =
            serde_json::from_str(r#"{"id":"a","createdAt":"2024-01-01T00:00:00.000Z"}"#).unwrap();
        assert_eq!(entry.title, "");
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn test_searchable_text() {
        let text = sample_entry().searchable_text();
        assert!(text.contains("décision"));
        assert!(text.contains("compte-rendu"));
        assert!(text.ends_with("transparence"));
    }

    #[test]
    fn test_input_field_lookup() {
        let input = EntryInput::new()
            .with_title("T")
            .with_decision_type("consensus")
            .with_tags(vec!["a".to_string(), "b".to_string()]);

        assert_eq!(input.field("title"), Some("T".to_string()));
        assert_eq!(input.field("decisionType"), Some("consensus".to_string()));
        assert_eq!(input.field("tags"), Some("a,b".to_string()));
        assert_eq!(input.field("summary"), None);
        assert_eq!(input.field("unknown"), None);
    }

    #[test]
    fn test_input_string_fields_order() {
        let input = EntryInput::new()
            .with_tags("x")
            .with_summary("s")
            .with_title("t");
        let names: Vec<_> = input.string_fields().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["title", "summary", "tags"]);

        let list = EntryInput::new().with_tags(vec!["x".to_string()]);
        assert!(list.string_fields().is_empty());
    }

    #[test]
    fn test_input_deserializes_from_form_json() {
        let input: EntryInput = serde_json::from_str(
            r#"{"title":"T","decisionType":"consensus","tags":"a, b"}"#,
        )
        .unwrap();
        assert_eq!(input.title.as_deref(), Some("T"));
        assert_eq!(input.decision_type.as_deref(), Some("consensus"));
        assert_eq!(input.tags, Some(TagsInput::Text("a, b".to_string())));
        assert!(input.has_content());
        assert!(!EntryInput::new().with_title("").has_content());
        assert!(!EntryInput::new().with_title("  ").with_tags("").has_content());
        assert!(EntryInput::new().with_participants("A").has_content());
    }

    #[test]
    fn test_options_inject_values() {
        let options = EntryOptions::new()
            .with_id("id1")
            .with_created_at("2024-01-01T00:00:00.000Z");
        assert_eq!(options.next_id(), "id1");
        assert_eq!(options.next_timestamp(), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_default_ids_are_unique() {
        let options = EntryOptions::new();
        let a = options.next_id();
        let b = options.next_id();
        assert!(a.starts_with("entry-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_default_timestamp_is_parseable() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(parse_timestamp(&ts).is_some());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let full = parse_timestamp("2023-12-02T10:00:00.000Z").unwrap();
        assert_eq!(format_timestamp(full), "2023-12-02T10:00:00.000Z");

        let offset = parse_timestamp("2023-12-02T12:00:00+02:00").unwrap();
        assert_eq!(offset, full);

        let naive = parse_timestamp("2023-12-02T10:00:00").unwrap();
        assert_eq!(naive, full);

        let date = parse_timestamp("2023-12-02").unwrap();
        assert_eq!(format_timestamp(date), "2023-12-02T00:00:00.000Z");

        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_decision_labels() {
        assert_eq!(decision_label("consensus"), "Consensus");
        assert_eq!(decision_label("veille"), "Watch / To explore");
        assert_eq!(decision_label("vote"), "vote");
    }
}
