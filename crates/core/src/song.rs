//! Song catalog entity and DTOs.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// How hard a song is to play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// A row from the `songs` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub id: DbId,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub tempo: i32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub chord_progression: Vec<String>,
    pub youtube_url: Option<String>,
    pub tabs: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<Timestamp>,
}

/// DTO for adding a song.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSong {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub tempo: i32,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Either a JSON list or a comma-separated string such as `"C, G, Am, F"`.
    #[serde(default, deserialize_with = "chord_list")]
    pub chord_progression: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// DTO for patching a song. Only `Some` fields are sent to the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSong {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_chord_list"
    )]
    pub chord_progression: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateSong {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.key.is_none()
            && self.tempo.is_none()
            && self.difficulty.is_none()
            && self.chord_progression.is_none()
            && self.youtube_url.is_none()
            && self.tabs.is_none()
            && self.notes.is_none()
    }
}

/// Split `"C, G, Am, F"` into chord names, dropping blanks.
pub fn parse_chord_progression(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|chord| !chord.is_empty())
        .map(String::from)
        .collect()
}

/// Reject a new song without a title or artist.
pub fn validate_create(input: &CreateSong) -> Result<(), CoreError> {
    require_text("title", &input.title)?;
    require_text("artist", &input.artist)?;
    validate_tempo(input.tempo)
}

/// Reject a patch that would blank out the title or artist.
pub fn validate_update(input: &UpdateSong) -> Result<(), CoreError> {
    if let Some(title) = &input.title {
        require_text("title", title)?;
    }
    if let Some(artist) = &input.artist {
        require_text("artist", artist)?;
    }
    if let Some(tempo) = input.tempo {
        validate_tempo(tempo)?;
    }
    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("Song {field} is required")));
    }
    Ok(())
}

fn validate_tempo(tempo: i32) -> Result<(), CoreError> {
    if tempo < 0 {
        return Err(CoreError::Validation(format!(
            "Tempo cannot be negative (got {tempo})"
        )));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChordInput {
    List(Vec<String>),
    Text(String),
}

impl From<ChordInput> for Vec<String> {
    fn from(input: ChordInput) -> Self {
        match input {
            ChordInput::List(chords) => chords
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            ChordInput::Text(raw) => parse_chord_progression(&raw),
        }
    }
}

fn chord_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(ChordInput::deserialize(deserializer)?.into())
}

fn optional_chord_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ChordInput>::deserialize(deserializer)?.map(Into::into))
}
