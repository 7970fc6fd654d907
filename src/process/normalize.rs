//! Single-field normalizers. Each takes one raw cell and returns its canonical
//! form; none of them can fail.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Whitespace plus the ordinal indicators used in "1ª Turma" / "2º".
static UNIT_NOISE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\sªº]").unwrap());

const CURRENCY_MARKER: &str = "R$";
const CONCLUDED_MARKER: &str = "CONCLUÍDO";

/// Parse a localized currency cell ("R$ 1.234,56"). Cells carrying a history
/// of values separated by newlines use the last one. Anything unparseable is 0.0.
pub fn parse_claim_value(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let last = raw.split('\n').next_back().unwrap_or_default();
    let cleaned = last
        .replace(CURRENCY_MARKER, "")
        .replace('.', "")
        .replace(',', ".");
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Split a newline-separated jurisdiction cell into (primary, secondary).
/// Missing positions are empty strings; a third code onwards is dropped.
pub fn split_jurisdiction(raw: Option<&str>) -> (String, String) {
    let mut parts = raw.unwrap_or_default().trim().split('\n');
    let primary = parts.next().unwrap_or_default().to_string();
    let secondary = parts.next().unwrap_or_default().to_string();
    (primary, secondary)
}

/// Lookup key for a judging-unit label: no whitespace, no ordinals, upper case.
pub fn unit_key(raw: &str) -> String {
    UNIT_NOISE_RE.replace_all(raw, "").to_uppercase()
}

/// Binary process status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessStatus {
    Concluded,
    Pending,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Concluded => "CONCLUÍDO",
            ProcessStatus::Pending => "PENDENTE",
        }
    }

    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().to_uppercase().starts_with(CONCLUDED_MARKER) => {
                ProcessStatus::Concluded
            }
            _ => ProcessStatus::Pending,
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
