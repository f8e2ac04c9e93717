//! Rule-based field extractors for scanned invoices.
//!
//! Every scalar field is backed by a [`Cascade`]: an ordered table of rules,
//! most specific first. Each rule yields candidates in source order and the
//! first candidate accepted by the rule's plausibility filter wins. Layout
//! variations are handled by appending rules, not by editing existing ones.

pub mod company;
pub mod dates;
pub mod invoice_number;
pub mod orders;
pub mod patterns;
pub mod sales;
pub mod trn;

pub use company::CompanyNameExtractor;
pub use dates::{reformat_ship_date, DateExtractor, ShipDateExtractor};
pub use invoice_number::InvoiceNumberExtractor;
pub use orders::{DoNumberExtractor, SoNumberExtractor};
pub use sales::{PaymentTermsExtractor, SalesPersonExtractor};
pub use trn::TrnExtractor;

use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::models::invoice::{FieldResult, InvoiceExtractionResult, InvoiceField};

use super::normalize::NormalizedText;

/// What an extractor gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionContext<'a> {
    /// Normalized OCR text.
    pub text: &'a NormalizedText,
    /// Fields extracted earlier in the same pass.
    pub found: &'a InvoiceExtractionResult,
}

/// Trait for scalar field extractors.
pub trait FieldExtractor: Send + Sync {
    /// The field this extractor fills.
    fn field(&self) -> InvoiceField;

    /// Extract the field, or the `"N/A"` sentinel.
    fn extract(&self, ctx: &ExtractionContext<'_>) -> FieldResult;

    /// Extract from raw OCR text with no other fields known.
    fn extract_text(&self, raw: &str) -> FieldResult {
        let text = NormalizedText::new(raw);
        let found = InvoiceExtractionResult::default();
        self.extract(&ExtractionContext {
            text: &text,
            found: &found,
        })
    }
}

/// Which normalized form a pattern runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Whole document on one line.
    Flat,
    /// Lines joined with `\n`, for `(?m)` patterns.
    Lines,
}

/// Turns a regex match into a candidate value. `None` skips the match.
pub type CaptureFn = fn(&Captures<'_>) -> Option<String>;

/// Structural heuristic yielding candidates in source order.
pub type ScanFn = Box<dyn Fn(&NormalizedText) -> Vec<String> + Send + Sync>;

/// Plausibility filter.
pub type AcceptFn = fn(&str) -> bool;

/// How a rule finds candidates.
pub enum Probe {
    Pattern {
        scope: Scope,
        regex: &'static Regex,
        capture: CaptureFn,
    },
    Scan(ScanFn),
}

/// One step of a cascade: a probe plus its plausibility filter.
pub struct Rule {
    name: &'static str,
    probe: Probe,
    accept: AcceptFn,
}

impl Rule {
    /// A regex rule.
    pub fn pattern(
        name: &'static str,
        scope: Scope,
        regex: &'static Regex,
        capture: CaptureFn,
        accept: AcceptFn,
    ) -> Self {
        Self {
            name,
            probe: Probe::Pattern {
                scope,
                regex,
                capture,
            },
            accept,
        }
    }

    /// A structural heuristic rule.
    pub fn scan(
        name: &'static str,
        scan: impl Fn(&NormalizedText) -> Vec<String> + Send + Sync + 'static,
        accept: AcceptFn,
    ) -> Self {
        Self {
            name,
            probe: Probe::Scan(Box::new(scan)),
            accept,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// First candidate passing both the rule's filter and `extra`.
    fn first_accepted(&self, text: &NormalizedText, extra: &dyn Fn(&str) -> bool) -> Option<String> {
        let mut check = |candidate: String| {
            let candidate = candidate.trim().to_string();
            if (self.accept)(&candidate) && extra(&candidate) {
                Some(candidate)
            } else {
                trace!(rule = self.name, candidate = %candidate, "candidate rejected");
                None
            }
        };

        match &self.probe {
            Probe::Pattern {
                scope,
                regex,
                capture,
            } => {
                let haystack = match scope {
                    Scope::Flat => text.flat(),
                    Scope::Lines => text.joined_lines(),
                };
                regex
                    .captures_iter(haystack)
                    .filter_map(|caps| capture(&caps))
                    .find_map(&mut check)
            }
            Probe::Scan(scan) => scan(text).into_iter().find_map(&mut check),
        }
    }
}

/// Ordered rules for one field.
pub struct Cascade {
    field: InvoiceField,
    rules: Vec<Rule>,
}

impl Cascade {
    pub fn new(field: InvoiceField) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    /// Append a rule; it runs after every rule added before it.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(Rule::name).collect()
    }

    /// Run the cascade, first accepted candidate wins.
    pub fn run(&self, text: &NormalizedText) -> FieldResult {
        self.run_where(text, |_| true)
    }

    /// Run the cascade with an additional caller-supplied filter.
    pub fn run_where(&self, text: &NormalizedText, extra: impl Fn(&str) -> bool) -> FieldResult {
        for rule in &self.rules {
            if let Some(value) = rule.first_accepted(text, &extra) {
                debug!(field = %self.field, rule = rule.name, value = %value, "field matched");
                return FieldResult::found(value);
            }
        }

        debug!(field = %self.field, "field not found");
        FieldResult::not_found()
    }
}

/// Capture group 1, trimmed.
pub fn group1(caps: &Captures<'_>) -> Option<String> {
    caps.get(1).map(|m| m.as_str().trim().to_string())
}

/// Character-length bounds check, inclusive on both ends.
pub fn char_len_within(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

/// Upper-cased alphanumeric tokens of a value.
pub fn tokens(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_uppercase())
}
