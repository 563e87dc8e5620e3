//! Streaming notice extraction for the XML eras of the TED feed
//!
//! Meta-XML packages (2011-2013) and full TED-XML notices (2014 onwards)
//! vary considerably across schema revisions. Rather than bind to one XSD,
//! this parser streams events and captures a recognised subset of tags into
//! the same [`Notice`] shape the text parser produces; unknown elements are
//! ignored and schema drift degrades to absent fields.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::reader::Reader;
use tracing::debug;

use super::text_parser::sections::normalize_amount;
use super::text_parser::stats::{ParseResult, ParseStats};
use crate::app::models::Notice;

/// Elements that open a new notice record
const NOTICE_ROOTS: &[&str] = &["TED_EXPORT", "DOC_OJS", "DOCUMENT", "NOTICE"];

/// Streaming XML parser for TED notice payloads
#[derive(Debug)]
pub struct XmlNoticeParser {
    filters: Vec<(String, String)>,
}

impl XmlNoticeParser {
    /// Create a new parser with optional field filters
    pub fn new(filters: Vec<(String, String)>) -> Self {
        Self { filters }
    }

    /// Parse an XML payload and return notices with statistics.
    ///
    /// A payload may bundle several notices under repeated root elements
    /// (meta-XML) or hold exactly one (full XML). A payload with no notice
    /// root but recognised field tags yields a single notice.
    pub fn parse(&self, content: &str, payload_name: &str) -> ParseResult {
        let mut stats = ParseStats::new();
        let mut notices = Vec::new();

        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut current = PartialNotice::default();
        let mut capture_tag: Option<String> = None;
        let mut text_buf = String::new();
        let mut in_contractor = false;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    stats.errors.push(format!("{}: XML error: {}", payload_name, e));
                    break;
                }
            };

            match event {
                Event::Start(ref e) => {
                    let name = tag_name(e.name());
                    if NOTICE_ROOTS.contains(&name.as_str()) {
                        self.finish(&mut current, &mut notices, &mut stats);
                        stats.segments_found += 1;
                    } else if matches!(name.as_str(), "CONTRACTOR" | "AWARDED_TO") {
                        in_contractor = true;
                    } else if is_captured_tag(&name) {
                        apply_attributes(&mut current, &name, e);
                        capture_tag = Some(name);
                        text_buf.clear();
                    }
                }
                Event::Empty(ref e) => {
                    let name = tag_name(e.name());
                    if is_captured_tag(&name) {
                        apply_attributes(&mut current, &name, e);
                    }
                }
                Event::Text(ref e) => {
                    if capture_tag.is_some() {
                        if let Ok(text) = e.unescape() {
                            text_buf.push_str(&text);
                        }
                    }
                }
                Event::CData(ref e) => {
                    if capture_tag.is_some() {
                        if let Ok(text) = String::from_utf8(e.to_vec()) {
                            text_buf.push_str(&text);
                        }
                    }
                }
                Event::End(ref e) => {
                    let name = tag_name(e.name());
                    if NOTICE_ROOTS.contains(&name.as_str()) {
                        self.finish(&mut current, &mut notices, &mut stats);
                    } else if matches!(name.as_str(), "CONTRACTOR" | "AWARDED_TO") {
                        in_contractor = false;
                    } else if capture_tag.as_deref() == Some(name.as_str()) {
                        apply_text(&mut current, &name, text_buf.trim(), in_contractor);
                        capture_tag = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        // Rootless payload or truncated trailing notice
        self.finish(&mut current, &mut notices, &mut stats);

        debug!(
            "{}: {} XML notice(s) after filters",
            payload_name,
            stats.notices_emitted()
        );

        ParseResult { notices, stats }
    }

    /// Emit the notice under construction if it captured anything
    fn finish(
        &self,
        current: &mut PartialNotice,
        notices: &mut Vec<Notice>,
        stats: &mut ParseStats,
    ) {
        let partial = std::mem::take(current);
        if !partial.captured {
            return;
        }

        stats.notices_parsed += 1;
        if partial.notice.matches_filters(&self.filters) {
            notices.push(partial.notice);
        } else {
            stats.notices_filtered += 1;
        }
    }
}

/// Notice under construction plus capture bookkeeping
#[derive(Debug, Default)]
struct PartialNotice {
    notice: Notice,
    /// At least one recognised field was seen
    captured: bool,
}

impl PartialNotice {
    fn set(&mut self, apply: impl FnOnce(&mut Notice)) {
        apply(&mut self.notice);
        self.captured = true;
    }
}

fn tag_name(name: QName) -> String {
    String::from_utf8_lossy(name.as_ref()).to_ascii_uppercase()
}

/// Tags whose text content we capture
fn is_captured_tag(name: &str) -> bool {
    matches!(
        name,
        "NO_DOC_OJS"
            | "ISO_COUNTRY"
            | "TI_CY"
            | "TI_TOWN"
            | "TI_TEXT"
            | "ORIGINAL_CPV"
            | "CPV_MAIN"
            | "CPV_CODE"
            | "DS_DATE_DISPATCH"
            | "LG_ORIG"
            | "AU"
            | "OFFICIALNAME"
            | "VAL_TOTAL"
            | "TD_DOCUMENT_TYPE"
            | "NC_CONTRACT_NATURE"
            | "PR_PROC"
            | "RP_REGULATION"
            | "AA_AUTHORITY_TYPE"
            | "AC_AWARD_CRIT"
            | "TY_TYPE_BID"
    )
}

/// Apply `CODE`/`VALUE`/`CURRENCY` attributes, where TED puts the datum in
/// an attribute rather than element text
fn apply_attributes(partial: &mut PartialNotice, name: &str, e: &BytesStart) {
    let mut code = None;
    let mut value = None;
    let mut currency = None;

    for attribute in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attribute.key.as_ref()).to_ascii_uppercase();
        if let Ok(attr_value) = attribute.unescape_value() {
            match key.as_str() {
                "CODE" => code = Some(attr_value.to_string()),
                "VALUE" => value = Some(attr_value.to_string()),
                "CURRENCY" => currency = Some(attr_value.to_string()),
                _ => {}
            }
        }
    }

    match name {
        "NO_DOC_OJS" => {
            if let Some(v) = value {
                partial.set(|n| n.doc_id = v);
            }
        }
        "ISO_COUNTRY" => {
            if let Some(v) = value {
                partial.set(|n| n.country = Some(v));
            }
        }
        "ORIGINAL_CPV" | "CPV_MAIN" | "CPV_CODE" => {
            if let Some(c) = code {
                partial.set(|n| append_cpv(n, &c));
            }
        }
        "VAL_TOTAL" => {
            if let Some(c) = currency {
                partial.set(|n| n.currency = Some(c));
            }
        }
        "TD_DOCUMENT_TYPE" => set_code(partial, code, |n| &mut n.document_type_code),
        "NC_CONTRACT_NATURE" => set_code(partial, code, |n| &mut n.contract_nature_code),
        "PR_PROC" => set_code(partial, code, |n| &mut n.procedure_code),
        "RP_REGULATION" => set_code(partial, code, |n| &mut n.regulation_code),
        "AA_AUTHORITY_TYPE" => set_code(partial, code, |n| &mut n.authority_type_code),
        "AC_AWARD_CRIT" => set_code(partial, code, |n| &mut n.award_criteria_code),
        "TY_TYPE_BID" => set_code(partial, code, |n| &mut n.bid_type_code),
        _ => {}
    }
}

fn set_code(
    partial: &mut PartialNotice,
    code: Option<String>,
    slot: impl FnOnce(&mut Notice) -> &mut Option<String>,
) {
    if let Some(code) = code {
        partial.set(|n| *slot(n) = Some(code));
    }
}

/// Apply captured element text to the notice
fn apply_text(partial: &mut PartialNotice, name: &str, text: &str, in_contractor: bool) {
    if text.is_empty() {
        return;
    }
    let text = text.to_string();

    match name {
        "NO_DOC_OJS" => partial.set(|n| n.doc_id = text),
        "ISO_COUNTRY" => partial.set(|n| n.country = Some(text)),
        "TI_CY" => {
            if partial.notice.country.is_none() {
                partial.set(|n| n.country = Some(text));
            }
        }
        "TI_TOWN" => partial.set(|n| n.town = Some(text)),
        "TI_TEXT" => partial.set(|n| n.heading = Some(text)),
        "ORIGINAL_CPV" | "CPV_MAIN" | "CPV_CODE" => partial.set(|n| append_cpv(n, &text)),
        "DS_DATE_DISPATCH" => partial.set(|n| n.dispatch_date = Some(text)),
        "LG_ORIG" => partial.set(|n| n.orig_language = Some(text)),
        "AU" => partial.set(|n| n.authority_name = Some(text)),
        "OFFICIALNAME" => {
            if in_contractor && partial.notice.supplier.is_none() {
                partial.set(|n| n.supplier = Some(text));
            } else if !in_contractor && partial.notice.authority_name.is_none() {
                // First OFFICIALNAME outside an award block is the buyer
                partial.set(|n| n.authority_name = Some(text));
            }
        }
        "VAL_TOTAL" => {
            if let Some(amount) = normalize_amount(&text) {
                partial.set(|n| n.value = Some(amount));
            }
        }
        "TD_DOCUMENT_TYPE" => partial.set(|n| n.document_type = Some(text)),
        "NC_CONTRACT_NATURE" => partial.set(|n| n.contract_nature = Some(text)),
        "PR_PROC" => partial.set(|n| n.procedure = Some(text)),
        "RP_REGULATION" => partial.set(|n| n.regulation = Some(text)),
        "AA_AUTHORITY_TYPE" => partial.set(|n| n.authority_type = Some(text)),
        "AC_AWARD_CRIT" => partial.set(|n| n.award_criteria = Some(text)),
        "TY_TYPE_BID" => partial.set(|n| n.bid_type = Some(text)),
        _ => {}
    }
}

/// CPV codes accumulate space-separated; notices often carry several
fn append_cpv(notice: &mut Notice, code: &str) {
    match &mut notice.cpv_code {
        Some(existing) if !existing.split(' ').any(|c| c == code) => {
            existing.push(' ');
            existing.push_str(code);
        }
        Some(_) => {}
        None => notice.cpv_code = Some(code.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TED_EXPORT>
  <CODED_DATA_SECTION>
    <NOTICE_DATA>
      <NO_DOC_OJS>2019/S 012-345678</NO_DOC_OJS>
      <ISO_COUNTRY VALUE="DE"/>
      <ORIGINAL_CPV CODE="45210000"/>
      <ORIGINAL_CPV CODE="45262800"/>
    </NOTICE_DATA>
    <CODIF_DATA>
      <DS_DATE_DISPATCH>20190114</DS_DATE_DISPATCH>
      <TD_DOCUMENT_TYPE CODE="7">Contract award notice</TD_DOCUMENT_TYPE>
      <NC_CONTRACT_NATURE CODE="1">Works</NC_CONTRACT_NATURE>
      <PR_PROC CODE="1">Open procedure</PR_PROC>
    </CODIF_DATA>
  </CODED_DATA_SECTION>
  <FORM_SECTION>
    <TI_TOWN>Berlin</TI_TOWN>
    <TI_TEXT>Construction work for water projects</TI_TEXT>
    <AWARDED_TO>
      <OFFICIALNAME>Wasserbau GmbH</OFFICIALNAME>
    </AWARDED_TO>
    <VAL_TOTAL CURRENCY="EUR">2400000.00</VAL_TOTAL>
  </FORM_SECTION>
</TED_EXPORT>"#;

    #[test]
    fn test_full_xml_notice_extraction() {
        let parser = XmlNoticeParser::new(Vec::new());
        let result = parser.parse(FULL_XML, "test");

        assert_eq!(result.stats.segments_found, 1);
        assert_eq!(result.notices.len(), 1);

        let notice = &result.notices[0];
        assert_eq!(notice.doc_id, "2019/S 012-345678");
        assert_eq!(notice.country.as_deref(), Some("DE"));
        assert_eq!(notice.cpv_code.as_deref(), Some("45210000 45262800"));
        assert_eq!(notice.dispatch_date.as_deref(), Some("20190114"));
        assert_eq!(notice.document_type_code.as_deref(), Some("7"));
        assert_eq!(
            notice.document_type.as_deref(),
            Some("Contract award notice")
        );
        assert_eq!(notice.town.as_deref(), Some("Berlin"));
        assert_eq!(
            notice.heading.as_deref(),
            Some("Construction work for water projects")
        );
        assert_eq!(notice.supplier.as_deref(), Some("Wasserbau GmbH"));
        assert_eq!(notice.value, Some(2_400_000.0));
        assert_eq!(notice.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_meta_xml_bundle_yields_one_notice_per_root() {
        let bundle = r#"<PACKAGE>
            <DOC_OJS>
              <NO_DOC_OJS>2012/S 100-111111</NO_DOC_OJS>
              <TI_CY>SE</TI_CY>
              <TI_TOWN>Stockholm</TI_TOWN>
            </DOC_OJS>
            <DOC_OJS>
              <NO_DOC_OJS>2012/S 100-222222</NO_DOC_OJS>
              <TI_CY>FI</TI_CY>
            </DOC_OJS>
        </PACKAGE>"#;

        let parser = XmlNoticeParser::new(Vec::new());
        let result = parser.parse(bundle, "test");

        assert_eq!(result.stats.segments_found, 2);
        assert_eq!(result.notices.len(), 2);
        assert_eq!(result.notices[0].doc_id, "2012/S 100-111111");
        assert_eq!(result.notices[0].country.as_deref(), Some("SE"));
        assert_eq!(result.notices[1].country.as_deref(), Some("FI"));
    }

    #[test]
    fn test_unknown_schema_elements_degrade_to_absent_fields() {
        let xml = r#"<TED_EXPORT>
            <SOME_FUTURE_SECTION><DEEP><NEST>ignored</NEST></DEEP></SOME_FUTURE_SECTION>
            <NO_DOC_OJS>2020/S 001-000001</NO_DOC_OJS>
        </TED_EXPORT>"#;

        let parser = XmlNoticeParser::new(Vec::new());
        let result = parser.parse(xml, "test");

        assert_eq!(result.notices.len(), 1);
        let notice = &result.notices[0];
        assert_eq!(notice.doc_id, "2020/S 001-000001");
        assert_eq!(notice.value, None);
        assert_eq!(notice.supplier, None);
    }

    #[test]
    fn test_filters_apply_to_xml_notices() {
        let filters = vec![("contract_authority_country".to_string(), "SE".to_string())];
        let parser = XmlNoticeParser::new(filters);

        let bundle = r#"<PACKAGE>
            <DOC_OJS><NO_DOC_OJS>1</NO_DOC_OJS><TI_CY>SE</TI_CY></DOC_OJS>
            <DOC_OJS><NO_DOC_OJS>2</NO_DOC_OJS><TI_CY>FI</TI_CY></DOC_OJS>
        </PACKAGE>"#;
        let result = parser.parse(bundle, "test");

        assert_eq!(result.notices.len(), 1);
        assert_eq!(result.stats.notices_filtered, 1);
    }

    #[test]
    fn test_empty_payload_yields_nothing() {
        let parser = XmlNoticeParser::new(Vec::new());
        let result = parser.parse("<EMPTY/>", "test");
        assert!(result.notices.is_empty());
        assert_eq!(result.stats.segments_found, 0);
    }
}
