/// Song domain types
use super::ids::{SongId, UserId};
use crate::error::{ChorusError, Result};
use serde::{Deserialize, Serialize};

/// Song with metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: Option<String>,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
    pub lyrics: Option<String>,

    /// Opaque pointer to the stored audio bytes
    pub source_ref: String,

    /// Visibility flag; gates read access independently of ownership
    pub is_public: bool,

    /// Uploader; immutable after creation
    pub owner_id: UserId,

    pub created_at: String,

    /// Owner username, denormalized for admin listings
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub owner_username: Option<String>,
}

/// Data for creating a new song on upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSong {
    pub title: String,
    pub artist: Option<String>,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
    pub lyrics: Option<String>,
    pub source_ref: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

impl Default for CreateSong {
    fn default() -> Self {
        Self {
            title: String::new(),
            artist: None,
            composer: None,
            genre: None,
            release_date: None,
            lyrics: None,
            source_ref: String::new(),
            is_public: default_public(),
        }
    }
}

/// Patch for updating a song (all fields optional, fixed set)
///
/// `is_public` is kept as raw JSON here because clients send it as a
/// string-like boolean; it is normalized with [`parse_public_flag`] before
/// persisting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSong {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
    pub lyrics: Option<String>,
    pub is_public: Option<serde_json::Value>,
}

/// Normalize a string-like boolean visibility flag
///
/// Accepts JSON `true`/`false` as well as the `"true"`/`"false"`/`"1"`/`"0"`
/// forms HTML forms produce. Anything else is an input error.
pub fn parse_public_flag(value: &serde_json::Value) -> Result<bool> {
    match value {
        serde_json::Value::Bool(b) => Ok(*b),
        serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ChorusError::invalid_input(format!(
                "invalid is_public value: {other:?}"
            ))),
        },
        other => Err(ChorusError::invalid_input(format!(
            "invalid is_public value: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn public_flag_accepts_bool_and_string_forms() {
        assert!(parse_public_flag(&json!(true)).unwrap());
        assert!(!parse_public_flag(&json!(false)).unwrap());
        assert!(parse_public_flag(&json!("true")).unwrap());
        assert!(!parse_public_flag(&json!("false")).unwrap());
        assert!(parse_public_flag(&json!("1")).unwrap());
        assert!(!parse_public_flag(&json!("0")).unwrap());
        assert!(parse_public_flag(&json!(" True ")).unwrap());
    }

    #[test]
    fn public_flag_rejects_malformed_values() {
        assert!(matches!(
            parse_public_flag(&json!("maybe")),
            Err(ChorusError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_public_flag(&json!(1)),
            Err(ChorusError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_public_flag(&json!(null)),
            Err(ChorusError::InvalidInput(_))
        ));
    }
}
