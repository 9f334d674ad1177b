// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Distance extraction from OCR text via a chat completion.
//!
//! The prompt pins the model to a bare numeric reply; everything the model
//! might do wrong (prose, units, nothing at all) degrades to 0.0 here, which
//! downstream means "no run recognized", never an error.

use pacelog_core::ChatMessage;

/// Race-result screens routinely drop the decimal point in OCR ("4.27"
/// reads as "427"); the prompt asks the model to reinsert it using the
/// plausible-distance range.
const SYSTEM_PROMPT: &str = "You are a running data extractor. \
Analyze the OCR text. The user just ran a race. \
Look for the DISTANCE in KM. \
IMPORTANT: \
- If you see a large number like '427' or '512' without a decimal, but it's clearly the distance, assume the decimal is missing (e.g., 427 becomes 4.27). \
- Running distance is usually between 0.1 and 100.0 km. \
- Return ONLY the number.";

/// Distances above this are beyond any plausible single run; the model
/// returning one means it echoed a non-distance number.
const MAX_PLAUSIBLE_KM: f64 = 200.0;

/// Builds the two-message extraction prompt for a block of OCR text.
pub fn build_messages(ocr_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("OCR Text: {ocr_text}")),
    ]
}

/// Parses the model's reply as a km distance.
///
/// Accepts a numeric prefix (the model sometimes appends " km" despite
/// instructions). Anything unparseable, non-finite, negative, or implausibly
/// large yields 0.0.
pub fn parse_distance(reply: &str) -> f64 {
    let value = numeric_prefix(reply.trim())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    if !value.is_finite() || value < 0.0 || value > MAX_PLAUSIBLE_KM {
        return 0.0;
    }
    value
}

/// Longest leading substring that looks like a decimal number.
fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end == digits_start {
        return None;
    }
    Some(&s[..end])
}
