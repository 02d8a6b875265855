/// Unit tests for field normalization
/// Tests tax id cleanup, date/number parsing, flag coercion, state mapping,
/// and the required-field failures that skip a record.
use contract_import::errors::ImportError;
use contract_import::models::RawRecord;
use contract_import::normalize::{
    digits_only, normalize_record, parse_date, parse_day, parse_decimal, parse_flag,
    split_contacts, state_code,
};

fn sample_raw() -> RawRecord {
    RawRecord {
        row: 2,
        tax_id: Some("123.456.789-00".to_string()),
        legal_name: Some("Acme Ltda".to_string()),
        ..RawRecord::default()
    }
}

#[cfg(test)]
mod tax_id_tests {
    use super::*;

    #[test]
    fn test_strips_formatting() {
        assert_eq!(digits_only("123.456.789-00"), "12345678900");
        assert_eq!(digits_only("12.345.678/0001-99"), "12345678000199");
        assert_eq!(digits_only(" 12345678900 "), "12345678900");
    }

    #[test]
    fn test_all_non_digit_input_yields_empty() {
        assert_eq!(digits_only("abc-./"), "");
        assert_eq!(digits_only(""), "");
    }

    #[test]
    fn test_record_without_tax_id_fails() {
        let mut raw = sample_raw();
        raw.tax_id = None;
        let err = normalize_record(&raw).unwrap_err();
        assert!(matches!(err, ImportError::Validation(_)));
    }

    #[test]
    fn test_all_non_digit_tax_id_fails() {
        let mut raw = sample_raw();
        raw.tax_id = Some("n/a".to_string());
        let err = normalize_record(&raw).unwrap_err();
        assert!(matches!(err, ImportError::Validation(_)));
    }
}

#[cfg(test)]
mod required_field_tests {
    use super::*;

    #[test]
    fn test_missing_legal_name_fails() {
        let mut raw = sample_raw();
        raw.legal_name = None;
        let err = normalize_record(&raw).unwrap_err();
        match err {
            ImportError::Validation(reason) => assert!(reason.contains("Nome")),
            other => panic!("expected validation error, got {}", other),
        }
    }

    #[test]
    fn test_blank_legal_name_fails() {
        let mut raw = sample_raw();
        raw.legal_name = Some("   ".to_string());
        assert!(normalize_record(&raw).is_err());
    }

    #[test]
    fn test_minimal_record_passes() {
        let record = normalize_record(&sample_raw()).unwrap();
        assert_eq!(record.tax_id, "12345678900");
        assert_eq!(record.legal_name, "Acme Ltda");
        assert!(record.birth_date.is_none());
        assert!(record.plan_value.is_none());
        assert!(!record.exempt);
        assert!(record.mobiles.is_empty());
    }
}

#[cfg(test)]
mod state_tests {
    use super::*;

    #[test]
    fn test_full_names_map_to_codes() {
        assert_eq!(state_code("São Paulo"), Some("SP"));
        assert_eq!(state_code("Rio Grande do Sul"), Some("RS"));
        assert_eq!(state_code("Distrito Federal"), Some("DF"));
        assert_eq!(state_code(" Paraná "), Some("PR"));
    }

    #[test]
    fn test_abbreviated_or_unknown_yields_none() {
        // Known lossy edge case: already-abbreviated input is not mapped
        assert_eq!(state_code("SP"), None);
        assert_eq!(state_code("sao paulo"), None);
        assert_eq!(state_code("California"), None);
        assert_eq!(state_code(""), None);
    }
}

#[cfg(test)]
mod flag_tests {
    use super::*;

    #[test]
    fn test_true_inputs() {
        assert!(parse_flag("1"));
        assert!(parse_flag("1.0"));
        assert!(parse_flag("true"));
        assert!(parse_flag("True"));
        assert!(parse_flag("TRUE"));
    }

    #[test]
    fn test_false_inputs() {
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag("sim"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_absent_flag_defaults_false() {
        let record = normalize_record(&sample_raw()).unwrap();
        assert!(!record.exempt);
    }
}

#[cfg(test)]
mod date_tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_accepted_formats() {
        let expected = NaiveDate::from_ymd_opt(1990, 3, 5).unwrap();
        assert_eq!(parse_date("1990-03-05"), Some(expected));
        assert_eq!(parse_date("05/03/1990"), Some(expected));
        assert_eq!(parse_date("1990-03-05 00:00:00"), Some(expected));
    }

    #[test]
    fn test_garbage_dates_are_absent() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("32/13/1990"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_missing_registration_date_defaults_to_now() {
        let before = Utc::now().naive_utc();
        let record = normalize_record(&sample_raw()).unwrap();
        let after = Utc::now().naive_utc();
        assert!(record.registration_date >= before && record.registration_date <= after);
    }

    #[test]
    fn test_unparseable_birth_date_is_absent() {
        let mut raw = sample_raw();
        raw.birth_date = Some("??".to_string());
        let record = normalize_record(&raw).unwrap();
        assert!(record.birth_date.is_none());
    }
}

#[cfg(test)]
mod number_tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[test]
    fn test_plan_value_parses_dot_decimal() {
        assert_eq!(
            parse_decimal("199.90"),
            Some(BigDecimal::from_str("199.90").unwrap())
        );
    }

    #[test]
    fn test_comma_decimal_is_unparseable() {
        assert_eq!(parse_decimal("199,90"), None);
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_due_day() {
        assert_eq!(parse_day("10"), Some(10));
        assert_eq!(parse_day("10.0"), Some(10));
        assert_eq!(parse_day("10.5"), None);
        assert_eq!(parse_day("dez"), None);
    }
}

#[cfg(test)]
mod contact_tests {
    use super::*;

    #[test]
    fn test_split_and_trim() {
        assert_eq!(
            split_contacts("11999999999, 11988888888"),
            vec!["11999999999", "11988888888"]
        );
    }

    #[test]
    fn test_empty_segments_dropped() {
        assert_eq!(split_contacts("a@b.com,, ,c@d.com"), vec!["a@b.com", "c@d.com"]);
        assert!(split_contacts("").is_empty());
        assert!(split_contacts(" , ").is_empty());
    }
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    /// End-to-end normalization of the canonical sample row.
    #[test]
    fn test_acme_row() {
        let raw = RawRecord {
            row: 2,
            tax_id: Some("123.456.789-00".to_string()),
            legal_name: Some("Acme".to_string()),
            plan_name: Some("Gold".to_string()),
            plan_value: Some("199,90".to_string()),
            state: Some("São Paulo".to_string()),
            mobiles: Some("11999999999, 11988888888".to_string()),
            ..RawRecord::default()
        };

        let record = normalize_record(&raw).unwrap();
        assert_eq!(record.tax_id, "12345678900");
        assert_eq!(record.plan_name.as_deref(), Some("Gold"));
        // Comma decimal is unparseable; zero is applied at persistence time
        assert!(record.plan_value.is_none());
        assert_eq!(record.state_code.as_deref(), Some("SP"));
        assert_eq!(record.mobiles.len(), 2);
    }
}
