//! Reply Decoder — pulls the fenced JSON block out of a free-form model reply.
//!
//! Checks run in a fixed order (block present, block closed, block non-empty,
//! block parses) so each failure points at a different cause: the model
//! refused, the reply was truncated, the model answered with a placeholder,
//! or the JSON itself is broken.

use serde_json::Value;
use thiserror::Error;

/// The decoded record. Its key set is whatever the model emitted.
pub type ParsedRecord = Value;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("reply contains no ```json block")]
    NoJsonBlock,

    #[error("```json block is never closed")]
    UnterminatedBlock,

    #[error("```json block is empty")]
    EmptyBlock,

    #[error("JSON block does not parse: {0}")]
    MalformedJson(#[source] serde_json::Error),
}

/// Decodes the first fenced JSON block in `reply`. Later blocks are ignored.
pub fn decode_reply(reply: &str) -> Result<ParsedRecord, DecodeError> {
    let start = reply
        .find(FENCE_OPEN)
        .map(|i| i + FENCE_OPEN.len())
        .ok_or(DecodeError::NoJsonBlock)?;

    let len = reply[start..]
        .find(FENCE_CLOSE)
        .ok_or(DecodeError::UnterminatedBlock)?;

    let body = reply[start..start + len].trim();
    if body.is_empty() {
        return Err(DecodeError::EmptyBlock);
    }

    serde_json::from_str(body).map_err(DecodeError::MalformedJson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_block_wrapped_in_prose() {
        let reply = "Sure, here you go:\n```json\n{\"Full Name\":\"A\"}\n```\nThanks.";
        assert_eq!(decode_reply(reply).unwrap(), json!({"Full Name": "A"}));
    }

    #[test]
    fn test_no_fence_is_no_json_block() {
        let reply = "{\"Full Name\": \"A\"}";
        assert!(matches!(decode_reply(reply), Err(DecodeError::NoJsonBlock)));
    }

    #[test]
    fn test_plain_fence_without_json_tag_is_no_json_block() {
        let reply = "```\n{\"Full Name\": \"A\"}\n```";
        assert!(matches!(decode_reply(reply), Err(DecodeError::NoJsonBlock)));
    }

    #[test]
    fn test_truncated_reply_is_unterminated() {
        let reply = "```json\n{\"Full Name\": \"A\", \"Skills\": {";
        assert!(matches!(
            decode_reply(reply),
            Err(DecodeError::UnterminatedBlock)
        ));
    }

    #[test]
    fn test_blank_block_is_empty() {
        assert!(matches!(
            decode_reply("```json\n\n```"),
            Err(DecodeError::EmptyBlock)
        ));
    }

    #[test]
    fn test_broken_json_is_malformed() {
        let reply = "```json\n{\"Full Name\": \"A\",}\n```";
        match decode_reply(reply) {
            Err(DecodeError::MalformedJson(e)) => assert!(e.is_syntax()),
            other => panic!("expected MalformedJson, got {other:?}"),
        }
    }

    #[test]
    fn test_only_first_block_is_used() {
        let reply = "```json\n{\"a\": 1}\n```\nand also\n```json\n{\"b\": 2}\n```";
        assert_eq!(decode_reply(reply).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_non_object_json_is_accepted() {
        let reply = "```json\n[\"Rust\", \"Go\"]\n```";
        assert_eq!(decode_reply(reply).unwrap(), json!(["Rust", "Go"]));
    }

    #[test]
    fn test_multibyte_text_around_block() {
        let reply = "Voilà — résumé:\n```json\n{\"Full Name\": \"Zoë\"}\n```";
        assert_eq!(decode_reply(reply).unwrap(), json!({"Full Name": "Zoë"}));
    }
}
