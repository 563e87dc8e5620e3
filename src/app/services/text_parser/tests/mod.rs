//! Test fixtures and helpers for the bulk text parser
//!
//! Fixture blocks follow the layout of the English bulk packages: a
//! `version/id` delimiter line, two-letter section labels with bodies at
//! column four, and a numbered `TX` free-text section.

mod sections_tests;

/// A complete contract award notice block
pub fn award_notice_block() -> String {
    [
        "1.6/123456",
        "HD: F-Paris: building construction work",
        "TD: 7 - Contract award",
        "NC: 1 - Works contract",
        "PR: 1 - Open procedure",
        "RP: 4 - European Communities",
        "AA: 3 - Regional or local authority",
        "AC: 1 - Lowest price",
        "TY: 9 - Not applicable",
        "CY: FR",
        "TW: PARIS",
        "PC: 45210000",
        "OL: FR",
        "AU: VILLE DE PARIS",
        "DS: 15.03.2006",
        "DI: 93/37/EEC",
        "TX: 1. Awarding authority: Ville de Paris,",
        "    4 place de l'Hotel de Ville, F-75004 Paris",
        "    5. Offers received: 3",
        "    6. Name and address of successful tenderer: ACME Construction SA,",
        "    12 rue des Batisseurs, F-75011 Paris",
        "    8. Contract value: EUR 1 234 567,89",
        "    10. Date of publication: 18. 3.2006.",
        "    11. Additional information: none",
        "",
    ]
    .join("\n")
}

/// A minimal prior-information notice block with no award fields
pub fn minimal_notice_block() -> String {
    [
        "1.6/654321",
        "HD: S-Stockholm: road maintenance",
        "TD: 0 - Prior information",
        "CY: SE",
        "PC: 45233141",
        "",
    ]
    .join("\n")
}

/// Two blocks concatenated into one payload
pub fn two_notice_payload() -> String {
    format!("{}{}", award_notice_block(), minimal_notice_block())
}
