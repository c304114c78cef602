// File: deckflow-core/src/prompt/interpreter.rs

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use deckflow_common::models::{PromptRequest, RequiredField};

const MONTHS: &str = "(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

const EVENT_WORDS: &[&str] = &[
    "event", "expo", "exhibition", "conference", "summit", "launch", "show", "fair",
    "festival", "gala", "forum", "week", "roadshow", "showcase",
];

const MONTH_NAMES: &[&str] = &[
    "jan", "january", "feb", "february", "mar", "march", "apr", "april", "may", "jun", "june",
    "jul", "july", "aug", "august", "sep", "sept", "september", "oct", "october", "nov",
    "november", "dec", "december",
];

/// Capitalised words that follow "in"/"for" without naming a place.
const NOT_PLACES: &[&str] = &["powerpoint", "ppt", "pptx", "slides", "english", "arabic"];

lazy_static! {
    static ref EVENT_NAME_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?im)^\s*event(?:\s+name)?\s*[:=]\s*(.+?)\s*$").unwrap(),
        Regex::new(r#"(?i)\b(?:event|occasion)\s+(?:called|named|titled)\s+["“']?([^"”'\n,.;]+)"#).unwrap(),
        Regex::new(&format!(
            r"\b(?i:for|at)\s+(?i:the\s+|an?\s+|our\s+)?((?:[A-Z0-9][\w'&-]*\s+)+(?i:{}))\b",
            EVENT_WORDS.join("|")
        ))
        .unwrap(),
        Regex::new(r"\b(?i:for)\s+(?i:the)\s+([A-Z][\w'&-]*(?:\s+[A-Z][\w'&-]*)*)\s+(?i:on|in|at)\b").unwrap(),
    ];

    static ref EVENT_DATE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?im)^\s*(?:event\s+)?date\s*[:=]\s*(.+?)\s*$").unwrap(),
        Regex::new(&format!(
            r"(?i)\b({m}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:\s*,?\s*\d{{4}})?)\b",
            m = MONTHS
        ))
        .unwrap(),
        Regex::new(&format!(
            r"(?i)\b(\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{m}\.?(?:\s*,?\s*\d{{4}})?)\b",
            m = MONTHS
        ))
        .unwrap(),
        Regex::new(r"\b(\d{4}-\d{1,2}-\d{1,2})\b").unwrap(),
        Regex::new(r"\b(\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4})\b").unwrap(),
        Regex::new(&format!(r"(?i)\b({m}\s+\d{{4}})\b", m = MONTHS)).unwrap(),
    ];

    static ref LOCATION_LABEL: Regex =
        Regex::new(r"(?im)^\s*(?:event\s+)?(?:location|venue|city|place)\s*[:=]\s*(.+?)\s*$").unwrap();
    static ref LOCATION_IN_AT: Regex =
        Regex::new(r"\b(?i:in|at)\s+(?i:the\s+)?([A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*)").unwrap();
    static ref LOCATION_FOR: Regex =
        Regex::new(r"\b(?i:for)\s+([A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*)").unwrap();

    static ref SALESPERSON_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?im)^\s*(?:sales\s*person|sales\s+rep(?:resentative)?|presenter)(?:\s+name)?\s*[:=]\s*(.+?)\s*$").unwrap(),
        Regex::new(r"(?i:sales\s*person|sales\s+rep(?:resentative)?|presenter|presented\s+by|account\s+manager)(?:\s+(?i:is|named|called))?\s*:?\s+([A-Z][\w'.-]*(?:\s+[A-Z][\w'.-]*)*)").unwrap(),
    ];

    static ref PRODUCT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?im)^\s*products?\s*[:=]\s*(.+?)\s*$").unwrap(),
        Regex::new(r"(?i)\bproducts?\s*(?::|-|\binclud(?:e|es|ing)\b|\bare\b)\s*(.+)").unwrap(),
    ];

    static ref LIST_SEPARATOR: Regex = Regex::new(r"[,;\n]").unwrap();
    static ref AND_SEPARATOR: Regex = Regex::new(r"(?i)\s+(?:and|&)\s+").unwrap();
    static ref LEADING_AND: Regex = Regex::new(r"(?i)^(?:and|&)\s+").unwrap();
}

/// Outcome of checking a [`PromptRequest`] for the five required fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletenessCheck {
    pub missing: Vec<RequiredField>,
}

impl CompletenessCheck {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing_labels(&self) -> Vec<&'static str> {
        self.missing.iter().map(|field| field.label()).collect()
    }

    /// The re-prompt shown to the user. Names only what is still missing.
    pub fn guidance_message(&self) -> String {
        format!(
            "I need a few more details to build your presentation. Please provide: {}.",
            self.missing_labels().join(", ")
        )
    }
}

/// Best-effort extraction of event details from a free-text prompt.
///
/// Nothing here fails: a field that cannot be located is left empty and the
/// caller asks the user for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptInterpreter;

impl PromptInterpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn interpret(&self, text: &str) -> PromptRequest {
        let event_name = first_capture(&EVENT_NAME_PATTERNS, text).unwrap_or_default();
        let event_date = first_capture(&EVENT_DATE_PATTERNS, text).unwrap_or_default();
        let event_location = find_location(text, &event_name).unwrap_or_default();
        let salesperson_name = first_capture(&SALESPERSON_PATTERNS, text).unwrap_or_default();
        let products = PRODUCT_PATTERNS
            .iter()
            .find_map(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|m| split_products(m.as_str()))
            .unwrap_or_default();

        let request = PromptRequest {
            event_name,
            event_date,
            event_location,
            salesperson_name,
            products,
        };
        debug!("Interpreted prompt: {:?}", request);
        request
    }

    pub fn check(&self, request: &PromptRequest) -> CompletenessCheck {
        CompletenessCheck {
            missing: request.missing_fields(),
        }
    }
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .filter_map(|re| re.captures(text))
        .filter_map(|caps| caps.get(1).map(|m| tidy(m.as_str())))
        .find(|value| !value.is_empty())
}

fn find_location(text: &str, event_name: &str) -> Option<String> {
    if let Some(caps) = LOCATION_LABEL.captures(text) {
        let labelled = tidy(&caps[1]);
        if !labelled.is_empty() {
            return Some(labelled);
        }
    }

    [&*LOCATION_IN_AT, &*LOCATION_FOR]
        .iter()
        .flat_map(|re| re.captures_iter(text).collect::<Vec<_>>())
        .map(|caps| tidy(&caps[1]))
        .find(|candidate| is_plausible_place(candidate, event_name))
}

fn is_plausible_place(candidate: &str, event_name: &str) -> bool {
    if candidate.is_empty() || candidate.eq_ignore_ascii_case(event_name) {
        return false;
    }
    let words: Vec<String> = candidate
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    let (Some(first), Some(last)) = (words.first(), words.last()) else {
        return false;
    };
    !MONTH_NAMES.contains(&first.as_str())
        && !NOT_PLACES.contains(&first.as_str())
        && !EVENT_WORDS.contains(&last.as_str())
}

fn split_products(raw: &str) -> Vec<String> {
    let sentence = first_sentence(raw);
    let mut names: Vec<String> = LIST_SEPARATOR
        .split(sentence)
        .map(|chunk| tidy(&LEADING_AND.replace(chunk.trim(), "")))
        .filter(|name| !name.is_empty())
        .collect();

    if names.len() == 1 && AND_SEPARATOR.is_match(&names[0]) {
        let only = names.remove(0);
        names = AND_SEPARATOR
            .split(&only)
            .map(tidy)
            .filter(|name| !name.is_empty())
            .collect();
    }
    names
}

/// Text up to the first sentence-ending punctuation that is followed by
/// whitespace or the end of input ("v2.0" is not a sentence end).
fn first_sentence(raw: &str) -> &str {
    let mut chars = raw.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            match chars.peek() {
                None => return &raw[..idx],
                Some((_, next)) if next.is_whitespace() => return &raw[..idx],
                _ => {}
            }
        }
    }
    raw
}

fn tidy(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”'))
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
