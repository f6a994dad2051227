//! Message validation rules.

use super::serializer::FrameError;

/// Validates raw inbound frame bytes before decoding.
pub fn validate_frame(raw: &[u8], max_size: usize) -> Result<(), FrameError> {
    if raw.len() > max_size {
        return Err(FrameError::TooLarge {
            size: raw.len(),
            max: max_size,
        });
    }

    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(FrameError::Empty);
    }

    Ok(())
}

/// Validates user-supplied text (chat, room, comment) length.
///
/// Returns the trimmed text on success.
pub fn validate_text(text: &str, max_chars: usize) -> Result<&str, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("Message text must not be empty".to_string());
    }
    let chars = trimmed.chars().count();
    if chars > max_chars {
        return Err(format!(
            "Message text is {chars} characters, maximum is {max_chars}"
        ));
    }
    Ok(trimmed)
}
