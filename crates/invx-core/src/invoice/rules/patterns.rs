//! Common regex patterns for invoice field extraction.
//!
//! Scalar patterns are case-insensitive and run against normalized text, so
//! they only ever see letters, digits, whitespace and `- / . :`. The item-code
//! pattern is deliberately case-sensitive.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Company name
    pub static ref ORG_KEYWORD: Regex = Regex::new(
        r"(?i)\b(?:SYSTEMS|TRADING|INDUSTRIES|ENTERPRISES|SERVICES|SOLUTIONS|GROUP|HOLDINGS?)\b"
    ).unwrap();

    pub static ref COMPANY_IDENTIFIER: Regex = Regex::new(
        r"(?i)\b(?:PIPING|ENGINEERING|CONTRACTING|TECHNICAL|GENERAL|ELECTROMECHANICAL|BUILDING|INDUSTRIAL|PLASTICS?|STEEL)\b"
    ).unwrap();

    pub static ref BUSINESS_SUFFIX: Regex = Regex::new(
        r"(?i)\b(?:LLC|L\.L\.C|LTD|LIMITED|INC|CORP|CORPORATION|FZE|FZCO|PLC|GMBH)\b"
    ).unwrap();

    pub static ref COMPANY_SUFFIX_LINE: Regex = Regex::new(
        r"(?im)^([^\n]*?\b(?:LLC|L\.L\.C|LTD|LIMITED|INC|CORP|CORPORATION|FZE|FZCO|PLC|GMBH))\b\.?"
    ).unwrap();

    pub static ref COMPANY_SUFFIX_WORDS: Regex = Regex::new(
        r"(?i)\b((?:[A-Z0-9][A-Z0-9.\-]*\s+){1,5}(?:LLC|L\.L\.C|LTD|LIMITED|INC|CORP|CORPORATION|FZE|FZCO|PLC|GMBH))\b"
    ).unwrap();

    // Invoice number
    pub static ref INVOICE_NUMBER_LABELED: Regex = Regex::new(
        r"(?i)\binvoice\s*(?:no|number|num|nr)\.?\s*:?\s*(\d{6,15})\b"
    ).unwrap();

    pub static ref INVOICE_NUMBER_NEAR: Regex = Regex::new(
        r"(?i)\binvoice\b\D{0,30}?(\d{6,15})\b"
    ).unwrap();

    pub static ref TRN_LABEL: Regex = Regex::new(
        r"(?i)\b(?:TRN|tax\s+registration)\b"
    ).unwrap();

    pub static ref DIGITS_10_12: Regex = Regex::new(r"\b(\d{10,12})\b").unwrap();

    pub static ref DIGITS_8_9: Regex = Regex::new(r"\b(\d{8,9})\b").unwrap();

    // Dates (DD-MON-YYYY)
    pub static ref DATE_LABELED: Regex = Regex::new(
        r"(?i)(?:\b([A-Z0-9]+)\s+)?\bdate\s*:?\s*(\d{1,2}\s?-\s?[A-Z]{3}\s?-\s?\d{2,4})\b"
    ).unwrap();

    pub static ref DATE_DMY_LONG: Regex = Regex::new(
        r"(?i)\b(\d{2}-[A-Z]{3}-\d{4})\b"
    ).unwrap();

    pub static ref DATE_DMY_SHORT: Regex = Regex::new(
        r"(?i)\b(\d{2}-[A-Z]{3}-\d{2})\b"
    ).unwrap();

    pub static ref DATE_DMY_LOOSE: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s*[-.]\s*([A-Z]{3})\s*[-.]\s*(\d{2,4})\b"
    ).unwrap();

    // Ship date. "Shlp" and "Sh1p" are common misreads.
    pub static ref SHIP_DATE_LABELED: Regex = Regex::new(
        r"(?i)\bsh[il1]p\s*date\s*:?\s*(\d{1,2}\s?-?\s?[A-Z]{3}\s?-?\s?\d{2,4})\b"
    ).unwrap();

    pub static ref DATE_COMPACT: Regex = Regex::new(
        r"(?i)\b(\d{2}[A-Z]{3}\d{4})\b"
    ).unwrap();

    pub static ref DATE_COMPACT_OR_DASHED: Regex = Regex::new(
        r"(?i)\b(\d{2}-?[A-Z]{3}-?\d{2,4})\b"
    ).unwrap();

    pub static ref COMPACT_DATE_PARTS: Regex = Regex::new(
        r"^(\d{1,2})([A-Za-z]{3})(\d{2,4})$"
    ).unwrap();

    // TRN (tax registration number)
    pub static ref TRN_LABELED: Regex = Regex::new(
        r"(?i)\b(?:TRN|tax\s+registration(?:\s+(?:no|number))?)\s*(?:no|number)?\.?\s*:?\s*(\d{12,20})\b"
    ).unwrap();

    pub static ref TRN_LABELED_SPACED: Regex = Regex::new(
        r"(?i)\b(?:TRN|tax\s+registration)\D{0,20}?(\d{3,5}(?:\s\d{3,5}){2,4})\b"
    ).unwrap();

    pub static ref TRN_LEADING_100: Regex = Regex::new(r"\b(100\d{9,13})\b").unwrap();

    pub static ref DIGITS_15: Regex = Regex::new(r"\b(\d{15})\b").unwrap();

    // Sales person
    pub static ref SALES_PERSON_NAME_LABELED: Regex = Regex::new(
        r"(?i)\bsales\s*person\s*:?\s*([A-Z]{2,})\s?\.\s?([A-Z]{2,})\b"
    ).unwrap();

    pub static ref NAME_SHAPE: Regex = Regex::new(
        r"(?i)\b([A-Z]{2,})\s?\.\s?([A-Z]{2,})\b"
    ).unwrap();

    pub static ref SALES_PERSON_LABEL_TEXT: Regex = Regex::new(
        r"(?im)\bsales\s*person\s*:?\s*([^\n]*?)\s*(?:\b(?:payment\s*terms?|sh[il1]p\s*date|D\.?\s*O\.?\s*(?:number|no)|S\.?\s*O\.?\s*(?:number|no)|invoice|date|TRN)\b|$)"
    ).unwrap();

    // Payment terms
    pub static ref PAYMENT_DAYS: Regex = Regex::new(
        r"(?i)\b(\d{1,3})\s*(days?)\b"
    ).unwrap();

    pub static ref PAYMENT_TERMS_LABEL_TEXT: Regex = Regex::new(
        r"(?im)\bpayment\s*terms?\s*:?\s*([^\n]*?)\s*(?:\b(?:sh[il1]p\s*date|sales\s*person|D\.?\s*O\.?\s*(?:number|no)|S\.?\s*O\.?\s*(?:number|no)|invoice|TRN)\b|$)"
    ).unwrap();

    pub static ref SALES_OR_TERMS_MARKER: Regex = Regex::new(
        r"(?i)\b(?:sales\s*person|payment\s*terms?)\b"
    ).unwrap();

    // Delivery / sales order numbers. Label and value must share a line.
    pub static ref DO_NUMBER_LABELED: Regex = Regex::new(
        r"(?i)\bD ?\.? ?O ?\.? ?(?:number|no|num)\.? ?:? ?(\d{6,12})\b"
    ).unwrap();

    pub static ref SO_NUMBER_LABELED: Regex = Regex::new(
        r"(?i)\bS ?\.? ?O ?\.? ?(?:number|no|num)\.? ?:? ?(\d{6,12})\b"
    ).unwrap();

    pub static ref ORDER_HEADER_MARKER: Regex = Regex::new(
        r"(?i)\b(?:tax\s+invoice|D\s*\.?\s*O\s*\.?\s*(?:number|no)|S\s*\.?\s*O\s*\.?\s*(?:number|no))\b"
    ).unwrap();

    pub static ref DO_NUMBER_DIGITS: Regex = Regex::new(r"\b(8\d{7,9})\b").unwrap();

    pub static ref SO_NUMBER_DIGITS: Regex = Regex::new(r"\b([12]\d{7,9})\b").unwrap();

    // Item table
    pub static ref TABLE_HEADER: Regex = Regex::new(
        r"(?i)\b(?:S\s*\.?\s*No|Sl\s*\.?\s*No|Sr\s*\.?\s*No|Item\s*Code|Description|U\s*\.?\s*O\s*\.?\s*M|Unit\s*(?:Price|Rate)|Rate|Qty|Quantity|Excl|Incl|VAT|Amount|Sales\s*Person|Payment\s*Terms?)\b"
    ).unwrap();

    pub static ref TABLE_FOOTER: Regex = Regex::new(
        r"(?i)\b(?:total|sub\s*total|grand\s*total|freight|amount\s+in\s+words|misc(?:ellaneous)?\.?\s*charges?|dirhams?)\b"
    ).unwrap();

    pub static ref ITEM_CODE: Regex = Regex::new(r"\b([A-Z]\d{9,10})\b").unwrap();

    pub static ref ITEM_DESCRIPTION: Regex = Regex::new(
        r"(?i)\b((?:PVC|UPVC|CPVC|ABS|PPR?|PE|HDPE|PIPE|ELBOW|TEE|VALVE|COUPLING|FLANGE|ADAPTOR|ADAPTER|SOCKET|REDUCER|UNION|CAP|NIPPLE|BUSH|CLAMP|GASKET|BEND|PLUG|SADDLE|FITTING|CEMENT|SOLVENT)\b.*?)\s+(?:\b(?:EA|PC|UNIT|KG|MTR|SET|BOX)\b|\d{3,}\b)"
    ).unwrap();

    pub static ref UNIT_OF_MEASURE: Regex = Regex::new(
        r"(?i)\b(EA|PC|UNIT|KG|MTR|SET|BOX)\b"
    ).unwrap();

    pub static ref VAT_PERCENT: Regex = Regex::new(
        r"\b(\d{1,2}(?:\.\d{1,2})?)\s?%"
    ).unwrap();

    pub static ref DECIMAL_TOKEN: Regex = Regex::new(r"\b\d+\.\d+\b").unwrap();
}
