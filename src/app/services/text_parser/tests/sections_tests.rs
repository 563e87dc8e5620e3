//! Tests for section body parsing and amount normalisation

use crate::app::models::Notice;
use crate::app::services::text_parser::sections::{
    apply_section, extract_value, normalize_amount,
};
use crate::constants::CODED_SECTIONS;

#[test]
fn test_coded_section_splits_on_first_dash() {
    let mut notice = Notice::default();
    apply_section(
        &mut notice,
        "TD",
        vec!["7 - Contract award".to_string()],
    );
    assert_eq!(notice.document_type_code.as_deref(), Some("7"));
    assert_eq!(notice.document_type.as_deref(), Some("Contract award"));

    // Only the first dash splits; labels may contain dashes
    let mut notice = Notice::default();
    apply_section(
        &mut notice,
        "PR",
        vec!["2 - Restricted - accelerated".to_string()],
    );
    assert_eq!(notice.procedure_code.as_deref(), Some("2"));
    assert_eq!(notice.procedure.as_deref(), Some("Restricted - accelerated"));
}

#[test]
fn test_every_coded_section_is_routed_to_a_field() {
    for code in CODED_SECTIONS {
        let mut notice = Notice::default();
        apply_section(&mut notice, code, vec!["9 - Some label".to_string()]);
        assert!(
            notice.extra.is_empty(),
            "section {} fell through to the extra map",
            code
        );
    }
}

#[test]
fn test_coded_section_without_label_keeps_code() {
    let mut notice = Notice::default();
    apply_section(&mut notice, "NC", vec!["4".to_string()]);
    assert_eq!(notice.contract_nature_code.as_deref(), Some("4"));
    assert_eq!(notice.contract_nature, None);
}

#[test]
fn test_unknown_section_lands_in_extra() {
    let mut notice = Notice::default();
    apply_section(
        &mut notice,
        "ZZ",
        vec!["first".to_string(), "second".to_string()],
    );
    assert_eq!(notice.extra.get("ZZ").map(String::as_str), Some("first\nsecond"));
}

#[test]
fn test_awarding_authority_strips_label_prefix() {
    let mut notice = Notice::default();
    apply_section(
        &mut notice,
        "TX",
        vec![
            "1. Awarding authority: Gemeente Amsterdam".to_string(),
            "Postbus 202, NL-1000 AE Amsterdam".to_string(),
        ],
    );
    assert_eq!(
        notice.awarding_authority.as_deref(),
        Some("Gemeente Amsterdam Postbus 202, NL-1000 AE Amsterdam")
    );
}

#[test]
fn test_unnumbered_free_text_prologue_keys_as_tx_underscore() {
    let mut notice = Notice::default();
    apply_section(
        &mut notice,
        "TX",
        vec!["General remarks before numbering".to_string()],
    );
    assert_eq!(
        notice.extra.get("TX_").map(String::as_str),
        Some("General remarks before numbering")
    );
}

#[test]
fn test_normalize_amount_european_forms() {
    assert_eq!(normalize_amount("1 234 567,89"), Some(1_234_567.89));
    assert_eq!(normalize_amount("1.234.567,89"), Some(1_234_567.89));
    assert_eq!(normalize_amount("1,234,567.89"), Some(1_234_567.89));
    assert_eq!(normalize_amount("500000"), Some(500_000.0));
    assert_eq!(normalize_amount("500 000."), Some(500_000.0));
    assert_eq!(normalize_amount("2,5"), Some(2.5));
    assert_eq!(normalize_amount("1.234"), Some(1_234.0));
    assert_eq!(normalize_amount(""), None);
}

#[test]
fn test_extract_value_takes_first_currency_marker() {
    let text = "4. Total value: DKK 2.750.000.\n8. Other value: EUR 100";
    let (amount, currency) = extract_value(text).unwrap();
    assert_eq!(currency, "DKK");
    assert_eq!(amount, 2_750_000.0);
}

#[test]
fn test_extract_value_absent_without_currency() {
    assert_eq!(extract_value("no money mentioned here"), None);
    // A bare number is not a value
    assert_eq!(extract_value("lot 450000 of the catalogue"), None);
}

#[test]
fn test_pre_euro_currencies_recognised() {
    let (amount, currency) = extract_value("Value of contract: FRF 950 000").unwrap();
    assert_eq!(currency, "FRF");
    assert_eq!(amount, 950_000.0);
}
