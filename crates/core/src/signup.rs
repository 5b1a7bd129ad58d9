//! Waitlist signup validation and normalization.
//!
//! [`validate`] is what the presentation layer calls before showing the
//! user their mistakes; [`validate_required`] and [`normalize`] are what the
//! submitter runs before anything is written to the store. All functions
//! here are pure.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Genres offered by the signup form. Submissions are not restricted to these.
pub const GENRES: &[&str] = &[
    "Rock",
    "Blues",
    "Jazz",
    "Classical",
    "Metal",
    "Folk",
    "Country",
    "Funk",
    "Pop",
    "R&B",
    "Soul",
    "Electronic",
    "Indie",
];

pub const MSG_NAME_REQUIRED: &str = "Please enter your name";
pub const MSG_EMAIL_INVALID: &str = "Please enter a valid email address";
pub const MSG_GENRE_REQUIRED: &str = "Please select at least one genre";
pub const MSG_LEVEL_REQUIRED: &str = "Please select your experience level";
pub const MSG_LEVEL_UNKNOWN: &str = "Please select a valid experience level";

/// Message for failures that could not be attributed to the store.
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred during signup. Please try again.";

/// `local@domain.tld`, loosely: non-whitespace runs around `@` and `.`.
const EMAIL_PATTERN: &str = r"\S+@\S+\.\S+";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Experience level
// ---------------------------------------------------------------------------

/// Self-reported playing experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Professional,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Professional => "Professional",
        }
    }

    /// Exact, case-sensitive match against the form's option values.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Raw form input as sent by the presentation layer.
///
/// Decoding never fails: absent or oddly-typed text becomes `""`,
/// non-list values become empty lists, and a body that is not an object
/// decodes to an empty input. Every problem is then reported by
/// [`validate`] instead of by the JSON decoder. Multi-word fields are read
/// under their camelCase name first, then their column name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Value")]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub genres: Vec<String>,
    pub experience_level: String,
    pub favorite_artists: Vec<String>,
    pub features_request: String,
}

impl From<Value> for SignupInput {
    fn from(value: Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::default();
        };
        let field = |camel: &str, snake: &str| fields.get(camel).or_else(|| fields.get(snake));

        Self {
            name: text(fields.get("name")),
            email: text(fields.get("email")),
            genres: text_list(fields.get("genres")),
            experience_level: text(field("experienceLevel", "experience_level")),
            favorite_artists: text_list(field("favoriteArtists", "favorite_artists")),
            features_request: text(field("featuresRequest", "features_request")),
        }
    }
}

/// The normalized row written to the `beta_signups` collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSignup {
    pub name: String,
    pub email: String,
    pub genres: Vec<String>,
    pub experience_level: String,
    pub favorite_artists: Vec<String>,
    pub features_request: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Classified outcome of a failed signup attempt.
///
/// Display text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupError {
    /// One or more input problems, caught before any network call.
    #[error("{}", .0.join(". "))]
    Validation(Vec<String>),

    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Missing required field")]
    MissingRequiredField,

    /// The store failed; carries its message when one was reported.
    #[error("{0}")]
    PersistenceFailure(String),
}

impl SignupError {
    /// A persistence failure with the generic retry prompt.
    pub fn unexpected() -> Self {
        Self::PersistenceFailure(MSG_UNEXPECTED.to_string())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Whether `email` has the loose `local@domain.tld` shape (after trimming).
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && EMAIL_RE.is_match(email)
}

/// Check every rule and return all failing messages; empty means valid.
pub fn validate(input: &SignupInput) -> Vec<String> {
    let mut errors = validate_required(input);

    if input.genres.is_empty() {
        errors.push(MSG_GENRE_REQUIRED.to_string());
    }

    if input.experience_level.is_empty() {
        errors.push(MSG_LEVEL_REQUIRED.to_string());
    } else if ExperienceLevel::parse(&input.experience_level).is_none() {
        errors.push(MSG_LEVEL_UNKNOWN.to_string());
    }

    errors
}

/// The subset of [`validate`] the submitter re-checks: name and email.
pub fn validate_required(input: &SignupInput) -> Vec<String> {
    let mut errors = Vec::new();

    if input.name.trim().is_empty() {
        errors.push(MSG_NAME_REQUIRED.to_string());
    }

    if !is_valid_email(&input.email) {
        errors.push(MSG_EMAIL_INVALID.to_string());
    }

    errors
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Build the row to persist: trimmed name, trimmed lower-case email.
pub fn normalize(input: &SignupInput, created_at: Timestamp) -> NewSignup {
    NewSignup {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_lowercase(),
        genres: input.genres.clone(),
        experience_level: input.experience_level.clone(),
        favorite_artists: input.favorite_artists.clone(),
        features_request: input.features_request.clone(),
        created_at,
    }
}

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
