//! Section body parsing for the bulk text format
//!
//! A notice segment is a sequence of two-letter sections. Coded sections hold
//! `CODE - Label` pairs, scalar sections hold a single mapped value, and the
//! `TX` free-text section splits into numbered subsections with their own
//! extraction rules.

use crate::app::models::Notice;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static SUBSECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\.").expect("subsection regex is valid"));

/// Currency codes seen in TED notices, including pre-euro national currencies
static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(EUR|ECU|GBP|USD|ATS|BEF|DEM|DKK|ESP|FIM|FRF|GRD|IEP|ITL|LUF|NLG|PTE|SEK|CHF|NOK|ISK|CZK|HUF|PLN|SKK|SIT|EEK|LVL|LTL|CYP|MTL|BGN|RON|HRK)\b[ :]*([0-9][0-9 .,]*)",
    )
    .expect("value regex is valid")
});

static SUPPLIER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)successful tenderer|name and address of (the )?(contractor|supplier)")
        .expect("supplier regex is valid")
});

/// Apply a completed section body to the notice under construction.
///
/// Unrecognised section codes are preserved verbatim in the `extra` map, so
/// format drift degrades to extra fields rather than data loss.
pub fn apply_section(notice: &mut Notice, code: &str, data: Vec<String>) {
    match code {
        // Coded sections: body is a `CODE - Label` pair
        "AA" => apply_code_pair(data, &mut notice.authority_type_code, &mut notice.authority_type),
        "AC" => apply_code_pair(data, &mut notice.award_criteria_code, &mut notice.award_criteria),
        "TY" => apply_code_pair(data, &mut notice.bid_type_code, &mut notice.bid_type),
        "NC" => apply_code_pair(
            data,
            &mut notice.contract_nature_code,
            &mut notice.contract_nature,
        ),
        "TD" => apply_code_pair(
            data,
            &mut notice.document_type_code,
            &mut notice.document_type,
        ),
        "PR" => apply_code_pair(data, &mut notice.procedure_code, &mut notice.procedure),
        "RP" => apply_code_pair(data, &mut notice.regulation_code, &mut notice.regulation),

        // Scalar sections
        "CY" => notice.country = Some(data.join("\n")),
        "TW" => notice.town = Some(data.join("\n")),
        "PC" => notice.cpv_code = Some(data.join("\n")),
        "DI" => notice.directive = Some(data.join("\n")),
        "DS" => notice.dispatch_date = Some(data.join("\n")),
        "HD" => notice.heading = Some(data.join("\n")),
        "OL" => notice.orig_language = Some(data.join("\n")),
        "AU" => notice.authority_name = Some(data.join("\n")),

        // Free text with numbered subsections
        "TX" => apply_free_text(notice, data),

        other => {
            notice.extra.insert(other.to_string(), data.join("\n"));
        }
    }
}

/// Split a coded section body on the first `-` into code and label
fn apply_code_pair(data: Vec<String>, code_slot: &mut Option<String>, label_slot: &mut Option<String>) {
    let Some(first) = data.first() else {
        return;
    };
    match first.split_once('-') {
        Some((code, label)) => {
            *code_slot = Some(code.trim().to_string());
            *label_slot = Some(label.trim().to_string());
        }
        None => {
            // No label part; keep the raw code rather than dropping the field
            *code_slot = Some(first.trim().to_string());
        }
    }
}

/// Parse the `TX` free-text section into numbered subsections.
///
/// Subsection 1 holds the awarding authority, 5 the offer count, 10 the
/// publication date and 11 additional information. Anything else is kept
/// verbatim under its `TX_n` key; leading unnumbered lines land in `TX_`.
fn apply_free_text(notice: &mut Notice, data: Vec<String>) {
    let mut subsections: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut current = String::new();

    for line in &data {
        let line = line.trim();
        if let Some(captures) = SUBSECTION_RE.captures(line) {
            current = captures[1].to_string();
            let body = line[captures[0].len()..].trim_start().to_string();
            subsections.entry(current.clone()).or_default().push(body);
        } else {
            // Lines before the first numbered subsection key as `TX_`
            subsections
                .entry(current.clone())
                .or_default()
                .push(line.to_string());
        }
    }

    for (number, body) in subsections {
        match number.as_str() {
            "1" => notice.awarding_authority = Some(parse_awarding_authority(&body)),
            "5" => notice.offers_received = Some(body.join("\n")),
            "10" => notice.notice_published = Some(parse_publication_date(&body)),
            "11" => notice.additional_information = Some(body.join("\n")),
            _ => {
                if supplier_candidate(&body).is_some() && notice.supplier.is_none() {
                    notice.supplier = supplier_candidate(&body);
                }
                notice
                    .extra
                    .insert(format!("TX_{}", number), body.join("\n"));
            }
        }
    }
}

/// Awarding authority: drop the leading `label:` prefix and flatten to one line
fn parse_awarding_authority(body: &[String]) -> String {
    let mut lines: Vec<&str> = body.iter().map(|s| s.as_str()).collect();
    if let Some(first) = lines.first().copied() {
        if let Some((_, rest)) = first.split_once(':') {
            lines[0] = rest.trim_start();
        }
    }
    lines.join(" ").trim().to_string()
}

/// Publication date: `DD.MM.YYYY` normalised to ISO `YYYY-MM-DD`.
///
/// An unparseable or missing date yields an empty string, not an error; the
/// field stays present so consumers can distinguish "no subsection" from
/// "date we could not read".
fn parse_publication_date(body: &[String]) -> String {
    let Some(line) = body.first() else {
        return String::new();
    };
    let Some((_, raw)) = line.split_once(':') else {
        return String::new();
    };

    let raw = raw.replace(' ', "");
    let raw = raw.trim_end_matches('.').trim();

    match NaiveDate::parse_from_str(raw, "%d.%m.%Y") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => String::new(),
    }
}

/// Detect a supplier name in a "successful tenderer" style subsection
fn supplier_candidate(body: &[String]) -> Option<String> {
    let first = body.first()?;
    if !SUPPLIER_LABEL_RE.is_match(first) {
        return None;
    }

    // Name usually follows the label colon, otherwise the next line
    if let Some((_, rest)) = first.split_once(':') {
        let rest = rest.trim();
        if !rest.is_empty() {
            return Some(rest.to_string());
        }
    }
    body.get(1)
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
}

/// Best-effort single-lot value extraction over a whole notice segment.
///
/// Multi-lot notices list several values; only the first is taken. Returns
/// `None` when no currency marker is found.
pub fn extract_value(segment_text: &str) -> Option<(f64, String)> {
    let captures = VALUE_RE.captures(segment_text)?;
    let currency = captures[1].to_string();
    let amount = normalize_amount(captures[2].trim())?;
    Some((amount, currency))
}

/// Normalise a European-formatted amount string to a float.
///
/// Handles `1 234 567,89`, `1.234.567,89`, `1,234,567.89` and plain digits.
/// When both separators appear, the right-most one is the decimal mark.
pub fn normalize_amount(raw: &str) -> Option<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.trim_end_matches(['.', ',']).to_string();
    if compact.is_empty() {
        return None;
    }

    let last_comma = compact.rfind(',');
    let last_dot = compact.rfind('.');

    let normalized = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) => {
            if comma > dot {
                compact.replace('.', "").replace(',', ".")
            } else {
                compact.replace(',', "")
            }
        }
        (Some(comma), None) => {
            let decimals = compact.len() - comma - 1;
            if compact.matches(',').count() == 1 && decimals <= 2 {
                compact.replace(',', ".")
            } else {
                compact.replace(',', "")
            }
        }
        (None, Some(dot)) => {
            let decimals = compact.len() - dot - 1;
            if compact.matches('.').count() == 1 && decimals <= 2 {
                compact
            } else {
                compact.replace('.', "")
            }
        }
        (None, None) => compact,
    };

    normalized.parse().ok()
}
