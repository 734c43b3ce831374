//! Base64 payloads as sent by clients (optionally wrapped in a data URL).

use crate::errors::AppResult;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Strip a `data:<mime>;base64,` prefix if present.
pub fn strip_data_url(raw: &str) -> &str {
    match raw.split_once(',') {
        Some((_, payload)) => payload,
        None => raw,
    }
}

pub fn decode_base64_payload(raw: &str) -> AppResult<Vec<u8>> {
    let payload: String = strip_data_url(raw)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(STANDARD.decode(payload)?)
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
