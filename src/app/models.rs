//! Data models for TED notice processing
//!
//! This module contains the core data structures for representing procurement
//! notices and the per-era format variants of the TED bulk feed.

use crate::constants::{
    ARCHIVE_EXTENSION, FULL_XML_FROM_YEAR, META_XML_FROM_YEAR, UTF8_TEXT_FROM_YEAR, XML_EXTENSION,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

// =============================================================================
// Format Eras
// =============================================================================

/// Format variant of a TED source file, determined by its publication era.
///
/// TED changed the bulk feed format several times: latin1-encoded text files
/// until 2007, UTF-8 text from 2008, a meta-XML package format from 2011, and
/// the full TED-XML schema from 2014. The era is inferred from the file path
/// (year component plus extension), never from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Era {
    /// Bulk text packages, latin1 encoded (pre-2008)
    LegacyLatin1Text,
    /// Bulk text packages, UTF-8 encoded (2008-2010)
    Utf8Text,
    /// Meta-XML packages (2011-2013)
    MetaXml,
    /// Full TED-XML schema (2014 onwards)
    FullXml,
}

impl Era {
    /// Classify a source file by path, returning `None` for files that are
    /// not part of the bulk feed.
    ///
    /// ZIP packages with no recognisable year fall back to the latin1 era:
    /// latin1 decoding is total over arbitrary bytes, so this never rejects
    /// a file outright.
    pub fn classify(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())?;
        let year = Self::year_from_path(path);

        match extension.as_str() {
            ext if ext == ARCHIVE_EXTENSION => Some(match year {
                Some(y) if y >= FULL_XML_FROM_YEAR => Era::FullXml,
                Some(y) if y >= META_XML_FROM_YEAR => Era::MetaXml,
                Some(y) if y >= UTF8_TEXT_FROM_YEAR => Era::Utf8Text,
                _ => Era::LegacyLatin1Text,
            }),
            ext if ext == XML_EXTENSION => Some(match year {
                Some(y) if y < FULL_XML_FROM_YEAR => Era::MetaXml,
                _ => Era::FullXml,
            }),
            _ => None,
        }
    }

    /// Extract a plausible publication year from a path.
    ///
    /// The deepest (right-most) four-digit year wins, so
    /// `mirror/2006/EN2006-11.ZIP` and `monthly-packages/EN2014_120.zip`
    /// both resolve correctly.
    pub fn year_from_path(path: &Path) -> Option<u16> {
        let text = path.to_string_lossy();
        let bytes = text.as_bytes();
        let mut year = None;

        for start in 0..bytes.len().saturating_sub(3) {
            let window = &bytes[start..start + 4];
            if !window.iter().all(|b| b.is_ascii_digit()) {
                continue;
            }
            // Reject windows embedded in longer digit runs (e.g. "020061")
            let preceded = start > 0 && bytes[start - 1].is_ascii_digit();
            let followed = start + 4 < bytes.len() && bytes[start + 4].is_ascii_digit();
            if preceded || followed {
                continue;
            }
            let candidate: u16 = text[start..start + 4].parse().ok()?;
            if (1993..=2100).contains(&candidate) {
                year = Some(candidate);
            }
        }

        year
    }

    /// Whether files of this era carry bulk text (as opposed to XML) payloads
    pub fn is_text(&self) -> bool {
        matches!(self, Era::LegacyLatin1Text | Era::Utf8Text)
    }

    /// Human-readable era label for reports and diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            Era::LegacyLatin1Text => "legacy-latin1-text",
            Era::Utf8Text => "utf8-text",
            Era::MetaXml => "meta-xml",
            Era::FullXml => "full-xml",
        }
    }
}

impl std::fmt::Display for Era {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Notice Structure
// =============================================================================

/// A single procurement notice extracted from a TED source file.
///
/// Immutable once built; serialized to JSON and discarded. JSON field names
/// follow the historical converter output (`_doc_id`, `document_heading`,
/// `contract_authority_country`, ...) so downstream consumers keep working.
/// Optional fields are omitted when extraction found nothing, never emitted
/// as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Notice {
    /// Format version marker from the document delimiter line
    #[serde(rename = "_doc_version", skip_serializing_if = "String::is_empty")]
    pub doc_version: String,

    /// Document identifier from the delimiter line or `NO_DOC_OJS` element
    #[serde(rename = "_doc_id", skip_serializing_if = "String::is_empty")]
    pub doc_id: String,

    /// Notice heading / title line
    #[serde(rename = "document_heading", skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Date the notice was dispatched to the publications office
    #[serde(
        rename = "document_dispatch_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub dispatch_date: Option<String>,

    /// Original language code of the notice
    #[serde(
        rename = "document_orig_language",
        skip_serializing_if = "Option::is_none"
    )]
    pub orig_language: Option<String>,

    /// EU directive the procedure falls under
    #[serde(rename = "document_directive", skip_serializing_if = "Option::is_none")]
    pub directive: Option<String>,

    /// Name of the contracting authority
    #[serde(
        rename = "document_authority_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub authority_name: Option<String>,

    /// Country of the contracting authority
    #[serde(
        rename = "contract_authority_country",
        skip_serializing_if = "Option::is_none"
    )]
    pub country: Option<String>,

    /// Town of the contracting authority
    #[serde(
        rename = "contract_authority_town",
        skip_serializing_if = "Option::is_none"
    )]
    pub town: Option<String>,

    /// Common Procurement Vocabulary classification code(s)
    #[serde(rename = "contract_cpv_code", skip_serializing_if = "Option::is_none")]
    pub cpv_code: Option<String>,

    /// Authority type code (`AA` section)
    #[serde(
        rename = "document_authority_type_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub authority_type_code: Option<String>,

    /// Authority type label (`AA` section)
    #[serde(
        rename = "document_authority_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub authority_type: Option<String>,

    /// Award criteria code (`AC` section)
    #[serde(
        rename = "document_award_criteria_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub award_criteria_code: Option<String>,

    /// Award criteria label (`AC` section)
    #[serde(
        rename = "document_award_criteria",
        skip_serializing_if = "Option::is_none"
    )]
    pub award_criteria: Option<String>,

    /// Bid type code (`TY` section)
    #[serde(
        rename = "document_bid_type_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub bid_type_code: Option<String>,

    /// Bid type label (`TY` section)
    #[serde(rename = "document_bid_type", skip_serializing_if = "Option::is_none")]
    pub bid_type: Option<String>,

    /// Contract nature code (`NC` section)
    #[serde(
        rename = "document_contract_nature_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub contract_nature_code: Option<String>,

    /// Contract nature label (`NC` section)
    #[serde(
        rename = "document_contract_nature",
        skip_serializing_if = "Option::is_none"
    )]
    pub contract_nature: Option<String>,

    /// Document type code (`TD` section); `7` marks contract award notices
    #[serde(
        rename = "document_document_type_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub document_type_code: Option<String>,

    /// Document type label (`TD` section)
    #[serde(
        rename = "document_document_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub document_type: Option<String>,

    /// Procedure code (`PR` section)
    #[serde(
        rename = "document_procedure_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub procedure_code: Option<String>,

    /// Procedure label (`PR` section)
    #[serde(rename = "document_procedure", skip_serializing_if = "Option::is_none")]
    pub procedure: Option<String>,

    /// Regulation code (`RP` section)
    #[serde(
        rename = "document_regulation_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub regulation_code: Option<String>,

    /// Regulation label (`RP` section)
    #[serde(
        rename = "document_regulation",
        skip_serializing_if = "Option::is_none"
    )]
    pub regulation: Option<String>,

    /// Awarding authority free-text block (`TX` subsection 1)
    #[serde(rename = "awarding_authority", skip_serializing_if = "Option::is_none")]
    pub awarding_authority: Option<String>,

    /// Number of offers received (`TX` subsection 5)
    #[serde(
        rename = "contract_offers_received_num",
        skip_serializing_if = "Option::is_none"
    )]
    pub offers_received: Option<String>,

    /// Additional information free-text (`TX` subsection 11)
    #[serde(
        rename = "contract_additional_information",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_information: Option<String>,

    /// Publication date in ISO `YYYY-MM-DD` form (`TX` subsection 10).
    /// Present but empty when the subsection exists with an unparseable date.
    #[serde(rename = "notice_published", skip_serializing_if = "Option::is_none")]
    pub notice_published: Option<String>,

    /// Best-effort total contract value. Single-lot only; multi-lot notices
    /// carry the first value found or nothing.
    #[serde(rename = "contract_value", skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    /// Best-effort ISO-4217 currency of `contract_value`
    #[serde(rename = "contract_currency", skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Best-effort supplier name. First supplier only on multi-supplier
    /// awards.
    #[serde(rename = "contract_supplier", skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// Unmapped section and subsection bodies, keyed by their source code
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Notice {
    /// Look up a field by its JSON output name, for `--filter` matching.
    ///
    /// Numeric fields are compared through their display form.
    pub fn field(&self, name: &str) -> Option<String> {
        let direct = match name {
            "_doc_version" => Some(self.doc_version.clone()),
            "_doc_id" => Some(self.doc_id.clone()),
            "document_heading" => self.heading.clone(),
            "document_dispatch_date" => self.dispatch_date.clone(),
            "document_orig_language" => self.orig_language.clone(),
            "document_directive" => self.directive.clone(),
            "document_authority_name" => self.authority_name.clone(),
            "contract_authority_country" => self.country.clone(),
            "contract_authority_town" => self.town.clone(),
            "contract_cpv_code" => self.cpv_code.clone(),
            "document_authority_type_code" => self.authority_type_code.clone(),
            "document_authority_type" => self.authority_type.clone(),
            "document_award_criteria_code" => self.award_criteria_code.clone(),
            "document_award_criteria" => self.award_criteria.clone(),
            "document_bid_type_code" => self.bid_type_code.clone(),
            "document_bid_type" => self.bid_type.clone(),
            "document_contract_nature_code" => self.contract_nature_code.clone(),
            "document_contract_nature" => self.contract_nature.clone(),
            "document_document_type_code" => self.document_type_code.clone(),
            "document_document_type" => self.document_type.clone(),
            "document_procedure_code" => self.procedure_code.clone(),
            "document_procedure" => self.procedure.clone(),
            "document_regulation_code" => self.regulation_code.clone(),
            "document_regulation" => self.regulation.clone(),
            "awarding_authority" => self.awarding_authority.clone(),
            "contract_offers_received_num" => self.offers_received.clone(),
            "contract_additional_information" => self.additional_information.clone(),
            "notice_published" => self.notice_published.clone(),
            "contract_value" => self.value.map(|v| v.to_string()),
            "contract_currency" => self.currency.clone(),
            "contract_supplier" => self.supplier.clone(),
            _ => return self.extra.get(name).cloned(),
        };
        direct
    }

    /// Whether every `key=value` pair matches this notice.
    ///
    /// A missing field never matches; it is not an error.
    pub fn matches_filters(&self, filters: &[(String, String)]) -> bool {
        filters
            .iter()
            .all(|(key, value)| self.field(key).as_deref() == Some(value.as_str()))
    }
}
