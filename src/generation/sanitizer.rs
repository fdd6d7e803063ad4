// ABOUTME: Prompt-injection filtering for intake free text before it reaches a prompt
// ABOUTME: Replaces known injection phrasing with [FILTERED] and grades the residual risk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Intake answers are client-authored and embedded verbatim in every stage
//! request. Only the free-text fields are filtered; enumerated fields are
//! already constrained by deserialization.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use pierre_program_core::models::IntakeRecord;

/// Replacement for matched injection phrasing
pub const FILTERED_MARKER: &str = "[FILTERED]";

const INJECTION_PATTERNS: &[&str] = &[
    r"ignore\s+(all\s+)?(previous|prior|above|earlier)\s+(instructions?|prompts?|rules?)",
    r"ignore\s+(your\s+)?(previous\s+)?instructions",
    r"disregard\s+(all\s+)?(previous|prior|above|earlier)",
    r"forget\s+(everything|all|what)",
    r"new\s+instructions?:",
    r"override\s+(instructions?|rules?|system)",
    r"you\s+are\s+(now|actually|really)\s+(a|an)",
    r"act\s+as\s+(a|an|if)",
    r"pretend\s+(to\s+be|you('re| are))",
    r"role\s*:\s*(system|assistant|user)",
    r"\[system\]",
    r"\[assistant\]",
    r"respond\s+(only\s+)?with\s+(json|xml|code|the\s+following|exactly|the\s+word|only)",
    r"output\s+(only\s+)?the\s+following",
    r"say\s+(exactly|only)\s+(this|what|the)",
    r"print\s+(your|the)\s+(system|prompt|instructions)",
    r"what('s| is| are)\s+(your|the)\s+(system\s+)?prompt",
    r"show\s+(me\s+)?(your|the)\s+(system\s+)?(prompt|instructions)",
    r"reveal\s+(your|the)\s+(system|instructions|prompt)",
    r"repeat\s+(your|the)\s+(system|instructions|prompt)",
    r"```\s*(system|assistant|user)",
    r"<\|?(system|im_start|im_end)\|?>",
    r"\[\[.*\]\]",
    r#""role"\s*:\s*"(system|assistant)""#,
    r#""content"\s*:\s*""#,
];

const SUSPICIOUS_PHRASES: &[&str] = &[
    "ignore",
    "disregard",
    "forget",
    "override",
    "bypass",
    "jailbreak",
    "dan mode",
    "developer mode",
    "sudo",
    "admin",
    "root access",
];

/// Residual risk after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Nothing notable
    #[default]
    Low,
    /// Several suspicious words without a full injection pattern
    Medium,
    /// At least one injection pattern matched
    High,
}

impl RiskLevel {
    /// Lowercase name used in log fields
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Result of filtering one piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedText {
    /// Filtered and neutralized text
    pub text: String,
    /// Injection patterns that matched
    pub pattern_hits: usize,
    /// Suspicious words present in the input
    pub suspicious_phrases: Vec<&'static str>,
    /// Risk grade for this text
    pub risk: RiskLevel,
}

/// Summary of filtering across an intake record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SanitizationReport {
    /// Highest risk seen in any field
    pub risk: RiskLevel,
    /// Fields whose text changed
    pub modified_fields: Vec<String>,
    /// Injection patterns matched across all fields
    pub pattern_hits: usize,
    /// Distinct suspicious words seen
    pub suspicious_phrases: Vec<&'static str>,
}

impl SanitizationReport {
    /// Whether anything was filtered or flagged
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.risk == RiskLevel::Low && self.modified_fields.is_empty()
    }

    fn record(&mut self, field: String, original: &str, sanitized: &SanitizedText) {
        if sanitized.text != original {
            self.modified_fields.push(field);
        }
        self.pattern_hits += sanitized.pattern_hits;
        for phrase in &sanitized.suspicious_phrases {
            if !self.suspicious_phrases.contains(phrase) {
                self.suspicious_phrases.push(phrase);
            }
        }
        self.risk = self.risk.max(sanitized.risk);
    }
}

/// Compiled injection patterns (cached)
///
/// A pattern that fails to compile is skipped rather than aborting filtering.
fn injection_regexes() -> &'static [Regex] {
    static INJECTION_REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
    INJECTION_REGEXES.get_or_init(|| {
        INJECTION_PATTERNS
            .iter()
            .filter_map(|pattern| Regex::new(&format!("(?i){pattern}")).ok())
            .collect()
    })
}

/// Role-bearing code fences, split so the fence no longer opens a role block
fn fence_role_regex() -> Option<&'static Regex> {
    static FENCE_ROLE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    FENCE_ROLE_REGEX
        .get_or_init(|| Regex::new(r"(?i)```(system|assistant|user|json)").ok())
        .as_ref()
}

fn role_tag_regex() -> Option<&'static Regex> {
    static ROLE_TAG_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    ROLE_TAG_REGEX
        .get_or_init(|| Regex::new(r"(?i)<(system|assistant|user|prompt|instruction)").ok())
        .as_ref()
}

fn json_role_key_regex() -> Option<&'static Regex> {
    static JSON_ROLE_KEY_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    JSON_ROLE_KEY_REGEX
        .get_or_init(|| Regex::new(r#"(?i)"(role|content|system|assistant)"\s*:"#).ok())
        .as_ref()
}

fn neutralize(text: &str) -> String {
    let mut out = text.to_owned();
    if let Some(re) = fence_role_regex() {
        out = re.replace_all(&out, "``` ${1}").into_owned();
    }
    if let Some(re) = role_tag_regex() {
        out = re.replace_all(&out, "&lt;${1}").into_owned();
    }
    if let Some(re) = json_role_key_regex() {
        out = re.replace_all(&out, "\"${1}\" :").into_owned();
    }
    out
}

/// Filter one piece of client text
#[must_use]
pub fn sanitize_text(input: &str) -> SanitizedText {
    let lowered = input.to_lowercase();
    let suspicious_phrases: Vec<&'static str> = SUSPICIOUS_PHRASES
        .iter()
        .copied()
        .filter(|phrase| lowered.contains(phrase))
        .collect();

    let mut text = input.to_owned();
    let mut pattern_hits = 0;
    for re in injection_regexes() {
        let hits = re.find_iter(&text).count();
        if hits > 0 {
            pattern_hits += hits;
            text = re.replace_all(&text, FILTERED_MARKER).into_owned();
        }
    }
    let text = neutralize(&text);

    let risk = if pattern_hits > 0 {
        RiskLevel::High
    } else if suspicious_phrases.len() >= 2 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    SanitizedText {
        text,
        pattern_hits,
        suspicious_phrases,
        risk,
    }
}

fn sanitize_field(report: &mut SanitizationReport, field: String, value: &mut String) {
    let sanitized = sanitize_text(value);
    report.record(field, value, &sanitized);
    *value = sanitized.text;
}

fn sanitize_list(report: &mut SanitizationReport, field: &str, values: &mut [String]) {
    for (idx, value) in values.iter_mut().enumerate() {
        sanitize_field(report, format!("{field}[{idx}]"), value);
    }
}

/// Filter every free-text field of an intake record
///
/// Covers the training goal, injuries, preferences, additional info,
/// environment limitations and available equipment.
#[must_use]
pub fn sanitize_intake(intake: &IntakeRecord) -> (IntakeRecord, SanitizationReport) {
    let mut clean = intake.clone();
    let mut report = SanitizationReport::default();

    sanitize_field(
        &mut report,
        "trainingGoal".to_owned(),
        &mut clean.training_goal,
    );
    sanitize_list(&mut report, "injuries", &mut clean.injuries);
    sanitize_list(&mut report, "preferences", &mut clean.preferences);
    if let Some(info) = clean.additional_info.as_mut() {
        sanitize_field(&mut report, "additionalInfo".to_owned(), info);
    }
    sanitize_list(
        &mut report,
        "environment.limitations",
        &mut clean.environment.limitations,
    );
    sanitize_list(
        &mut report,
        "equipment.available",
        &mut clean.equipment.available,
    );

    (clean, report)
}
