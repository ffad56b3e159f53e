//! Anime record schema: field shape, validation and derived display fields.
//!
//! Client payloads arrive as loose JSON objects. They are turned into the
//! fixed-shape [`NewAnime`] and [`AnimePatch`] types here, so nothing past this
//! module ever sees a field the record does not define.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::domain::{AnimeId, UserId};

pub const MIN_YEAR_OF_RELEASE: i32 = 1900;
pub const MAX_YEAR_OF_RELEASE: i32 = 3000;

/// Keys a client may never set, on create or update.
pub const IMMUTABLE_FIELDS: &[&str] = &["owner", "id", "_id", "createdAt", "updatedAt"];

/// A persisted anime record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimeRecord {
    pub id: AnimeId,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub on_going: bool,
    pub year_of_release: i32,
    pub image_of_anime: String,
    pub owner: UserId,
    pub created_at: String,
    pub updated_at: String,
}

/// Airing state derived from `on_going`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiringStatus {
    OnGoing,
    FinishedAiring,
}

impl AiringStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnGoing => "On-going",
            Self::FinishedAiring => "Finished Airing",
        }
    }
}

impl fmt::Display for AiringStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"{title} ({yearOfRelease})"`
#[must_use]
pub fn title_and_year(record: &AnimeRecord) -> String {
    format!("{} ({})", record.title, record.year_of_release)
}

#[must_use]
pub const fn status(record: &AnimeRecord) -> AiringStatus {
    if record.on_going {
        AiringStatus::OnGoing
    } else {
        AiringStatus::FinishedAiring
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field-level problem found in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// A single error not tied to a specific field, e.g. a missing envelope.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Input for creating a record. Owner, id and timestamps are never read from
/// the client object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnime {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub on_going: bool,
    pub year_of_release: i32,
    pub image_of_anime: String,
}

impl NewAnime {
    pub fn from_json(fields: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = text_field(fields, "title", Presence::Required, &mut errors);
        let description = text_field(fields, "description", Presence::Required, &mut errors);
        let genre = text_field(fields, "genre", Presence::Required, &mut errors);
        let on_going = bool_field(fields, "onGoing", Presence::Required, &mut errors);
        let year_of_release = year_field(fields, Presence::Required, &mut errors);
        let image_of_anime = image_field(fields, Presence::Required, &mut errors);

        match (
            title,
            description,
            genre,
            on_going,
            year_of_release,
            image_of_anime,
        ) {
            (
                Some(title),
                Some(description),
                Some(genre),
                Some(on_going),
                Some(year_of_release),
                Some(image_of_anime),
            ) => errors.finish(Self {
                title,
                description,
                genre,
                on_going,
                year_of_release,
                image_of_anime,
            }),
            _ => Err(errors),
        }
    }
}

/// A partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnimePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub on_going: Option<bool>,
    pub year_of_release: Option<i32>,
    pub image_of_anime: Option<String>,
}

impl AnimePatch {
    /// Builds a patch from a client object after dropping immutable keys and
    /// blank strings. Unknown keys are ignored.
    pub fn from_json(mut fields: Map<String, Value>) -> Result<Self, ValidationErrors> {
        strip_immutable_fields(&mut fields);
        strip_blank_fields(&mut fields);

        let mut errors = ValidationErrors::new();
        let patch = Self {
            title: text_field(&fields, "title", Presence::Optional, &mut errors),
            description: text_field(&fields, "description", Presence::Optional, &mut errors),
            genre: text_field(&fields, "genre", Presence::Optional, &mut errors),
            on_going: bool_field(&fields, "onGoing", Presence::Optional, &mut errors),
            year_of_release: year_field(&fields, Presence::Optional, &mut errors),
            image_of_anime: image_field(&fields, Presence::Optional, &mut errors),
        };
        errors.finish(patch)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.genre.is_none()
            && self.on_going.is_none()
            && self.year_of_release.is_none()
            && self.image_of_anime.is_none()
    }
}

/// Removes string fields that are empty or whitespace only. A blank field in
/// an update means "leave unchanged", never "clear".
pub fn strip_blank_fields(fields: &mut Map<String, Value>) {
    fields.retain(|_, value| !matches!(value, Value::String(s) if s.trim().is_empty()));
}

pub fn strip_immutable_fields(fields: &mut Map<String, Value>) {
    for key in IMMUTABLE_FIELDS {
        fields.remove(*key);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
}

/// Handles the absent/null cases shared by every field parser. Returns the
/// value only when there is something to parse.
fn present<'a>(
    fields: &'a Map<String, Value>,
    name: &str,
    presence: Presence,
    errors: &mut ValidationErrors,
) -> Option<&'a Value> {
    match fields.get(name) {
        None => {
            if presence == Presence::Required {
                errors.push(name, "is required");
            }
            None
        }
        Some(Value::Null) => {
            let message = match presence {
                Presence::Required => "is required",
                Presence::Optional => "cannot be null",
            };
            errors.push(name, message);
            None
        }
        Some(value) => Some(value),
    }
}

fn text_field(
    fields: &Map<String, Value>,
    name: &str,
    presence: Presence,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match present(fields, name, presence, errors)? {
        Value::String(s) if s.trim().is_empty() => {
            errors.push(name, "must not be blank");
            None
        }
        Value::String(s) => Some(s.clone()),
        _ => {
            errors.push(name, "must be a string");
            None
        }
    }
}

fn bool_field(
    fields: &Map<String, Value>,
    name: &str,
    presence: Presence,
    errors: &mut ValidationErrors,
) -> Option<bool> {
    if let Value::Bool(b) = present(fields, name, presence, errors)? {
        Some(*b)
    } else {
        errors.push(name, "must be a boolean");
        None
    }
}

fn year_field(
    fields: &Map<String, Value>,
    presence: Presence,
    errors: &mut ValidationErrors,
) -> Option<i32> {
    const NAME: &str = "yearOfRelease";

    let Value::Number(n) = present(fields, NAME, presence, errors)? else {
        errors.push(NAME, "must be an integer");
        return None;
    };

    let Some(year) = n.as_i64() else {
        errors.push(NAME, "must be an integer");
        return None;
    };

    match i32::try_from(year) {
        Ok(year) if (MIN_YEAR_OF_RELEASE..=MAX_YEAR_OF_RELEASE).contains(&year) => Some(year),
        _ => {
            errors.push(
                NAME,
                format!("must be between {MIN_YEAR_OF_RELEASE} and {MAX_YEAR_OF_RELEASE}"),
            );
            None
        }
    }
}

fn image_field(
    fields: &Map<String, Value>,
    presence: Presence,
    errors: &mut ValidationErrors,
) -> Option<String> {
    const NAME: &str = "imageOfAnime";

    let image = text_field(fields, NAME, presence, errors)?;
    if url::Url::parse(image.trim()).is_err() {
        errors.push(NAME, "must be an absolute URI");
        return None;
    }
    Some(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    fn naruto() -> Map<String, Value> {
        object(json!({
            "title": "Naruto",
            "description": "A ninja wants to become Hokage",
            "genre": "Action",
            "onGoing": true,
            "yearOfRelease": 2002,
            "imageOfAnime": "http://x/y.png"
        }))
    }

    fn record(on_going: bool) -> AnimeRecord {
        AnimeRecord {
            id: AnimeId::new(1),
            title: "Naruto".to_string(),
            description: "...".to_string(),
            genre: "Action".to_string(),
            on_going,
            year_of_release: 2002,
            image_of_anime: "http://x/y.png".to_string(),
            owner: UserId::new(1),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_derived_fields() {
        assert_eq!(title_and_year(&record(true)), "Naruto (2002)");
        assert_eq!(status(&record(true)).as_str(), "On-going");
        assert_eq!(status(&record(false)).to_string(), "Finished Airing");
    }

    #[test]
    fn test_new_anime_valid() {
        let anime = NewAnime::from_json(&naruto()).unwrap();
        assert_eq!(anime.title, "Naruto");
        assert!(anime.on_going);
        assert_eq!(anime.year_of_release, 2002);
    }

    #[test]
    fn test_new_anime_ignores_owner() {
        let mut fields = naruto();
        fields.insert("owner".to_string(), json!(999));
        assert!(NewAnime::from_json(&fields).is_ok());
    }

    #[test]
    fn test_new_anime_reports_every_missing_field() {
        let errors = NewAnime::from_json(&Map::new()).unwrap_err();
        for field in [
            "title",
            "description",
            "genre",
            "onGoing",
            "yearOfRelease",
            "imageOfAnime",
        ] {
            assert!(errors.has_field(field), "missing error for {field}");
        }
        assert_eq!(errors.errors().len(), 6);
    }

    #[test]
    fn test_new_anime_wrong_types() {
        let mut fields = naruto();
        fields.insert("onGoing".to_string(), json!("yes"));
        fields.insert("title".to_string(), json!(12));
        fields.insert("yearOfRelease".to_string(), json!(2002.5));

        let errors = NewAnime::from_json(&fields).unwrap_err();
        assert!(errors.has_field("onGoing"));
        assert!(errors.has_field("title"));
        assert!(errors.has_field("yearOfRelease"));
        assert!(!errors.has_field("genre"));
    }

    #[test]
    fn test_new_anime_blank_is_invalid() {
        let mut fields = naruto();
        fields.insert("genre".to_string(), json!("   "));
        let errors = NewAnime::from_json(&fields).unwrap_err();
        assert!(errors.has_field("genre"));
    }

    #[test]
    fn test_year_bounds() {
        for (year, ok) in [(1899, false), (1900, true), (3000, true), (3001, false)] {
            let mut fields = naruto();
            fields.insert("yearOfRelease".to_string(), json!(year));
            assert_eq!(NewAnime::from_json(&fields).is_ok(), ok, "year {year}");
        }

        let mut fields = naruto();
        fields.insert("yearOfRelease".to_string(), json!(i64::MAX));
        assert!(NewAnime::from_json(&fields).is_err());
    }

    #[test]
    fn test_image_must_be_absolute_uri() {
        let mut fields = naruto();
        fields.insert("imageOfAnime".to_string(), json!("y.png"));
        let errors = NewAnime::from_json(&fields).unwrap_err();
        assert!(errors.has_field("imageOfAnime"));
    }

    #[test]
    fn test_patch_strips_blanks_and_owner() {
        let patch = AnimePatch::from_json(object(json!({
            "title": "",
            "description": "   ",
            "genre": "Drama",
            "owner": 42,
            "createdAt": "yesterday"
        })))
        .unwrap();

        assert_eq!(
            patch,
            AnimePatch {
                genre: Some("Drama".to_string()),
                ..AnimePatch::default()
            }
        );
    }

    #[test]
    fn test_patch_only_blanks_is_empty() {
        let patch = AnimePatch::from_json(object(json!({ "title": "", "unknown": 1 }))).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_validates_present_fields() {
        let errors = AnimePatch::from_json(object(json!({
            "yearOfRelease": 1800,
            "onGoing": null
        })))
        .unwrap_err();
        assert!(errors.has_field("yearOfRelease"));
        assert!(errors.has_field("onGoing"));
    }

    #[test]
    fn test_validation_errors_display() {
        let mut errors = ValidationErrors::new();
        errors.push("title", "is required");
        errors.push("genre", "must be a string");
        assert_eq!(errors.to_string(), "title: is required; genre: must be a string");
    }
}
