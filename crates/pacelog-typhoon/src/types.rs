// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Typhoon OCR and chat completion APIs.

use serde::{Deserialize, Serialize};

use pacelog_core::ChatMessage;

/// Top-level OCR response: one result per recognized page.
#[derive(Debug, Deserialize)]
pub struct OcrResponse {
    #[serde(default)]
    pub results: Vec<OcrPageResult>,
}

#[derive(Debug, Deserialize)]
pub struct OcrPageResult {
    #[serde(default)]
    pub success: bool,
    pub message: Option<OcrPageMessage>,
}

#[derive(Debug, Deserialize)]
pub struct OcrPageMessage {
    #[serde(default)]
    pub choices: Vec<OcrChoice>,
}

#[derive(Debug, Deserialize)]
pub struct OcrChoice {
    pub message: OcrChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct OcrChoiceMessage {
    #[serde(default)]
    pub content: String,
}

/// Some OCR models wrap their transcription in a JSON envelope; when the
/// content parses as one, `natural_text` carries the actual page text.
#[derive(Debug, Deserialize)]
pub struct NaturalTextEnvelope {
    pub natural_text: String,
}

/// Chat completion request body.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocr_response_parses_mixed_pages() {
        let json = serde_json::json!({
            "results": [
                {
                    "success": true,
                    "message": {"choices": [{"message": {"content": "Distance 4.27 km"}}]}
                },
                {"success": false, "message": null}
            ]
        });
        let parsed: OcrResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert!(parsed.results[0].success);
        assert!(!parsed.results[1].success);
    }

    #[test]
    fn natural_text_envelope_parses() {
        let content = r#"{"primary_language": "en", "natural_text": "5.00 km"}"#;
        let envelope: NaturalTextEnvelope = serde_json::from_str(content).unwrap();
        assert_eq!(envelope.natural_text, "5.00 km");
    }

    #[test]
    fn chat_response_parses_first_choice() {
        let json = serde_json::json!({
            "id": "cmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "4.27"}}]
        });
        let parsed: ChatResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "4.27");
    }
}
