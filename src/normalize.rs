use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use std::str::FromStr;

use crate::errors::ImportError;
use crate::models::{CleanRecord, RawRecord};

/// Full state name → two-letter code, for the 27 Brazilian states.
/// Unmapped input (already-abbreviated or foreign values) yields `None`.
const STATE_MAP: [(&str, &str); 27] = [
    ("Acre", "AC"),
    ("Alagoas", "AL"),
    ("Amapá", "AP"),
    ("Amazonas", "AM"),
    ("Bahia", "BA"),
    ("Ceará", "CE"),
    ("Distrito Federal", "DF"),
    ("Espírito Santo", "ES"),
    ("Goiás", "GO"),
    ("Maranhão", "MA"),
    ("Mato Grosso", "MT"),
    ("Mato Grosso do Sul", "MS"),
    ("Minas Gerais", "MG"),
    ("Pará", "PA"),
    ("Paraíba", "PB"),
    ("Paraná", "PR"),
    ("Pernambuco", "PE"),
    ("Piauí", "PI"),
    ("Rio de Janeiro", "RJ"),
    ("Rio Grande do Norte", "RN"),
    ("Rio Grande do Sul", "RS"),
    ("Rondônia", "RO"),
    ("Roraima", "RR"),
    ("Santa Catarina", "SC"),
    ("São Paulo", "SP"),
    ("Sergipe", "SE"),
    ("Tocantins", "TO"),
];

/// Normalize one raw spreadsheet record into a `CleanRecord`.
///
/// Fails with `ImportError::Validation` when a required field (tax id,
/// legal name) is missing; every other field degrades to an absent value.
pub fn normalize_record(raw: &RawRecord) -> Result<CleanRecord, ImportError> {
    let tax_id = raw
        .tax_id
        .as_deref()
        .map(digits_only)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ImportError::Validation("CPF/CNPJ ausente ou inválido".to_string()))?;

    let legal_name = raw
        .legal_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ImportError::Validation("Nome/Razão Social ausente".to_string()))?;

    Ok(CleanRecord {
        tax_id,
        legal_name,
        trade_name: clean_text(raw.trade_name.as_deref()),
        birth_date: raw.birth_date.as_deref().and_then(parse_date),
        registration_date: raw
            .registration_date
            .as_deref()
            .and_then(parse_datetime)
            .unwrap_or_else(|| Utc::now().naive_utc()),
        plan_name: clean_text(raw.plan_name.as_deref()),
        plan_value: raw.plan_value.as_deref().and_then(parse_decimal),
        due_day: raw.due_day.as_deref().and_then(parse_day),
        exempt: raw.exempt.as_deref().map(parse_flag).unwrap_or(false),
        street: clean_text(raw.street.as_deref()),
        number: clean_text(raw.number.as_deref()),
        complement: clean_text(raw.complement.as_deref()),
        neighborhood: clean_text(raw.neighborhood.as_deref()),
        postal_code: clean_text(raw.postal_code.as_deref()),
        city: clean_text(raw.city.as_deref()),
        state_code: raw
            .state
            .as_deref()
            .and_then(state_code)
            .map(str::to_string),
        status: clean_text(raw.status.as_deref()),
        mobiles: raw.mobiles.as_deref().map(split_contacts).unwrap_or_default(),
        phones: raw.phones.as_deref().map(split_contacts).unwrap_or_default(),
        emails: raw.emails.as_deref().map(split_contacts).unwrap_or_default(),
    })
}

/// Strip every non-digit character (CPF/CNPJ punctuation, stray spaces).
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn clean_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a timestamp with fixed format tolerance; covers the ISO forms
/// calamine emits for date cells plus the Brazilian day-first form.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    parse_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    // Datetime-valued cells carry the date in front
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parse a monetary value; anything `BigDecimal` rejects (including
/// comma-decimal strings) is treated as absent.
pub fn parse_decimal(raw: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(raw.trim()).ok()
}

/// Parse a due day; whole-number floats ("10.0") are accepted since Excel
/// renders integer cells that way.
pub fn parse_day(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i32>() {
        return Some(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 => Some(f as i32),
        _ => None,
    }
}

/// True only for a numeric 1 or a case-insensitive "true".
pub fn parse_flag(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        return true;
    }
    matches!(raw.parse::<f64>(), Ok(f) if f == 1.0)
}

pub fn state_code(name: &str) -> Option<&'static str> {
    let name = name.trim();
    STATE_MAP
        .iter()
        .find(|(full, _)| *full == name)
        .map(|(_, code)| *code)
}

/// Split a comma-delimited contact list, trimming and dropping empties.
pub fn split_contacts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
