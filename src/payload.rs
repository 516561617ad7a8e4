use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::AppError;

static DATA_URL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:[^,]*;base64,").expect("valid regex"));

/// Decode a base64 document payload, accepting an optional
/// `data:<mime>;base64,` prefix and embedded whitespace.
pub fn decode_base64(input: &str) -> Result<Vec<u8>, AppError> {
    let trimmed = input.trim();
    let body = match DATA_URL_PREFIX.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };

    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(AppError::MissingField("base64".to_string()));
    }

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AppError::InvalidDocument(format!("base64 payload could not be decoded: {}", e)))
}

/// Count parameters as they arrive, before validation.
#[derive(Debug, Default, Clone)]
pub struct RawCounts {
    pub pages: Option<String>,
    pub first_pages: Option<String>,
    pub last_pages: Option<String>,
}

impl RawCounts {
    /// Store a parameter by its wire name. Returns false for unknown names.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "pages" => &mut self.pages,
            "firstPages" => &mut self.first_pages,
            "lastPages" => &mut self.last_pages,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// `pages`, which must be present and positive.
    pub fn pages(&self) -> Result<u32, AppError> {
        let raw = self
            .pages
            .as_deref()
            .ok_or_else(|| AppError::MissingField("pages".to_string()))?;
        parse_count("pages", raw, false)
    }

    /// `firstPages` and `lastPages`; an absent side counts as zero but not both.
    pub fn first_and_last(&self) -> Result<(u32, u32), AppError> {
        let first = match self.first_pages.as_deref() {
            Some(raw) => parse_count("firstPages", raw, true)?,
            None => 0,
        };
        let last = match self.last_pages.as_deref() {
            Some(raw) => parse_count("lastPages", raw, true)?,
            None => 0,
        };

        if first == 0 && last == 0 {
            return Err(AppError::MissingField(
                "firstPages or lastPages (at least one must be greater than 0)".to_string(),
            ));
        }
        Ok((first, last))
    }
}

/// Render a JSON count parameter as the string form multipart fields use.
pub fn json_count(field: &str, value: &Value) -> Result<Option<String>, AppError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(AppError::InvalidNumber {
            field: field.to_string(),
            reason: format!("expected a number, got {}", other),
        }),
    }
}

pub fn parse_count(field: &str, raw: &str, allow_zero: bool) -> Result<u32, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::MissingField(field.to_string()));
    }

    let expected = if allow_zero {
        "must be a non-negative integer"
    } else {
        "must be a positive integer"
    };
    let invalid = || AppError::InvalidNumber {
        field: field.to_string(),
        reason: format!("{} (got {:?})", expected, raw),
    };

    let value = match raw.parse::<u32>() {
        Ok(v) => v,
        // JSON numbers like `3.0` arrive in float form
        Err(_) => match raw.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&f) => f as u32,
            _ => return Err(invalid()),
        },
    };

    if value == 0 && !allow_zero {
        return Err(invalid());
    }
    Ok(value)
}
