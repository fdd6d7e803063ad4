// ABOUTME: Decodes the reasoning service's free-text answer into a stage-shaped value
// ABOUTME: Reads the first text block, strips markdown fences, recovers embedded JSON objects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::de::DeserializeOwned;

use super::outcome::DefaultReason;
use crate::llm::MessageEnvelope;

/// Remove a surrounding markdown code fence (```json ... ```), if present
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, ...) on the opening line
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Slice from the first `{` to the last `}`
fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Decode stage text, tolerating fences and prose around the JSON object
///
/// # Errors
///
/// Returns [`DefaultReason::NoTextContent`] for blank text and
/// [`DefaultReason::MalformedOutput`] when no JSON object of the expected
/// shape can be recovered.
pub fn decode_text<T: DeserializeOwned>(text: &str) -> Result<T, DefaultReason> {
    let candidate = strip_code_fences(text);
    if candidate.is_empty() {
        return Err(DefaultReason::NoTextContent);
    }

    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(first_error) => embedded_object(candidate)
            .filter(|object| object.len() < candidate.len())
            .and_then(|object| serde_json::from_str(object).ok())
            .ok_or_else(|| DefaultReason::malformed(first_error.to_string())),
    }
}

/// Decode the first text block of a response envelope
///
/// # Errors
///
/// Returns [`DefaultReason::NoTextContent`] when the envelope carries no text
/// block, otherwise whatever [`decode_text`] reports.
pub fn decode_envelope<T: DeserializeOwned>(envelope: &MessageEnvelope) -> Result<T, DefaultReason> {
    envelope
        .first_text()
        .ok_or(DefaultReason::NoTextContent)
        .and_then(decode_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ContentBlock;
    use pierre_program_core::models::PhaseNutrition;

    const NUTRITION: &str =
        r#"{"dailyCalories": 2400, "macros": {"protein": 180, "carbs": 250, "fats": 75}}"#;

    #[test]
    fn test_plain_json_decodes() {
        let nutrition: PhaseNutrition = decode_text(NUTRITION).unwrap();
        assert_eq!(nutrition.daily_calories, 2400);
        assert_eq!(nutrition.macros.protein, 180);
    }

    #[test]
    fn test_fenced_json_decodes() {
        let fenced = format!("```json\n{NUTRITION}\n```");
        let nutrition: PhaseNutrition = decode_text(&fenced).unwrap();
        assert_eq!(nutrition.macros.fats, 75);
    }

    #[test]
    fn test_prose_around_object_is_ignored() {
        let chatty = format!("Here is the plan you asked for:\n{NUTRITION}\nEnjoy!");
        let nutrition: PhaseNutrition = decode_text(&chatty).unwrap();
        assert_eq!(nutrition.macros.carbs, 250);
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let result = decode_text::<PhaseNutrition>(r#"{"calories": "lots"}"#);
        assert!(matches!(result, Err(DefaultReason::MalformedOutput { .. })));
    }

    #[test]
    fn test_non_json_is_malformed() {
        let result = decode_text::<PhaseNutrition>("I cannot help with that.");
        assert!(matches!(result, Err(DefaultReason::MalformedOutput { .. })));
    }

    #[test]
    fn test_blank_text_has_no_content() {
        assert_eq!(
            decode_text::<PhaseNutrition>("  \n "),
            Err(DefaultReason::NoTextContent)
        );
        assert_eq!(
            decode_text::<PhaseNutrition>("```json\n```"),
            Err(DefaultReason::NoTextContent)
        );
    }

    #[test]
    fn test_envelope_reads_first_text_block() {
        let mut envelope = MessageEnvelope::from_text("test-model", NUTRITION);
        envelope.content.insert(0, ContentBlock::Unsupported);
        envelope.content.push(ContentBlock::text("not json"));

        let nutrition: PhaseNutrition = decode_envelope(&envelope).unwrap();
        assert_eq!(nutrition.daily_calories, 2400);
    }

    #[test]
    fn test_envelope_without_text() {
        let mut envelope = MessageEnvelope::from_text("test-model", "");
        envelope.content.clear();

        assert_eq!(
            decode_envelope::<PhaseNutrition>(&envelope),
            Err(DefaultReason::NoTextContent)
        );
    }
}
