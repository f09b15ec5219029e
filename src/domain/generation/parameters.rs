//! Sampling parameters for a completion call.
//!
//! Raw values arrive as loosely typed user input (form fields, JSON values).
//! Out-of-range numbers are clamped; anything unparseable falls back to the
//! default. Construction never fails.

use serde::Serialize;
use std::fmt;

/// Sampling temperature in `[0.0, 2.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Temperature(f32);

impl Temperature {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 2.0;
    pub const DEFAULT: f32 = 0.7;

    /// Clamps a numeric temperature. NaN yields the default.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Parses raw user input, falling back to the default when missing or invalid.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .and_then(|s| s.parse::<f32>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Upper bound on generated tokens, in `[1, 32768]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MaxTokens(u32);

impl MaxTokens {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 32_768;
    pub const DEFAULT: u32 = 2048;

    /// Clamps an integer token limit.
    pub fn new(value: i64) -> Self {
        let clamped = value.clamp(Self::MIN as i64, Self::MAX as i64);
        Self(clamped as u32)
    }

    /// Parses raw user input as an integer, falling back to the default.
    ///
    /// Fractional input such as `"1.5"` is invalid, not rounded. Integers
    /// too large for `i64` saturate at the matching bound.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .and_then(parse_saturating)
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for MaxTokens {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

fn parse_saturating(s: &str) -> Option<i64> {
    if let Ok(value) = s.parse::<i64>() {
        return Some(value);
    }
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Identifier of the model asked to generate the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Uses `raw` when it has content, otherwise `default`.
    pub fn or_default(raw: Option<&str>, default: &str) -> Self {
        match raw.map(str::trim) {
            Some(model) if !model.is_empty() => Self(model.to_string()),
            _ => Self(default.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a completion call needs besides the messages.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: ModelId,
    pub temperature: Temperature,
    pub max_tokens: MaxTokens,
}

impl GenerationParams {
    /// Normalizes raw request fields into usable parameters.
    pub fn from_input(
        model: Option<&str>,
        temperature: Option<&str>,
        max_tokens: Option<&str>,
        default_model: &str,
    ) -> Self {
        Self {
            model: ModelId::or_default(model, default_model),
            temperature: Temperature::parse(temperature),
            max_tokens: MaxTokens::parse(max_tokens),
        }
    }
}
