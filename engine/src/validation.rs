//! Local validation of task fields.
//!
//! Runs before any request is issued, on the client and again on the server.

use crate::{error::Result, Error, TaskData};

/// Maximum length of a task text, in characters.
pub const MAX_TEXT_CHARS: usize = 250;

/// Name of the text field in validation errors.
pub const TEXT_FIELD: &str = "text";

/// Check that `text` is present and at most [`MAX_TEXT_CHARS`] long.
pub fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::validation(TEXT_FIELD, "Todo is required"));
    }

    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(Error::validation(
            TEXT_FIELD,
            format!("Todo must be at most {MAX_TEXT_CHARS} characters long"),
        ));
    }

    Ok(())
}

/// Validate a draft or replacement payload.
pub fn validate(data: &TaskData) -> Result<()> {
    validate_text(&data.text)
}
