//! # Field Extractors
//!
//! Each extractor scans a [`NormalizedName`] on its own and proposes
//! candidate spans for one field. Extractors never see each other's output;
//! conflicts are settled later by the disambiguator using [`RULES`].

use regex::Regex;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::parser::tokenizer::{volume_marker_regex, NormalizedName, Token, TokenKind};

/// Which output field a candidate would fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Volume,
    IssueCount,
    Year,
    Issue,
}

/// How unambiguous a cue is. Higher wins when spans conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    YearBare,
    IssueNumber,
    YearBracketed,
    IssueCount,
    Volume,
}

/// A provisional field match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpan {
    pub kind: FieldKind,
    pub priority: Priority,
    /// First claimed token index.
    pub first: usize,
    /// Last claimed token index (inclusive).
    pub last: usize,
    /// Byte range in the source string.
    pub start: usize,
    pub end: usize,
    /// Field value.
    pub text: String,
}

impl CandidateSpan {
    fn new(kind: FieldKind, priority: Priority, tokens: &[Token], text: impl Into<String>) -> Self {
        let first = &tokens[0];
        let last = &tokens[tokens.len() - 1];
        Self {
            kind,
            priority,
            first: first.index,
            last: last.index,
            start: first.start,
            end: last.end,
            text: text.into(),
        }
    }

    /// Byte length of the claimed source text.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if the two spans claim a common token.
    pub fn overlaps(&self, other: &CandidateSpan) -> bool {
        self.first <= other.last && other.first <= self.last
    }
}

/// An extraction rule: one entry of the priority table.
pub struct Rule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub priority: Priority,
    pub extract: fn(&Extractors, &NormalizedName) -> Vec<CandidateSpan>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .finish()
    }
}

/// The priority table, most unambiguous cue first.
pub const RULES: &[Rule] = &[
    Rule {
        name: "volume",
        kind: FieldKind::Volume,
        priority: Priority::Volume,
        extract: Extractors::volume,
    },
    Rule {
        name: "issue_count",
        kind: FieldKind::IssueCount,
        priority: Priority::IssueCount,
        extract: Extractors::issue_count,
    },
    Rule {
        name: "year_bracketed",
        kind: FieldKind::Year,
        priority: Priority::YearBracketed,
        extract: Extractors::year_bracketed,
    },
    Rule {
        name: "issue_number",
        kind: FieldKind::Issue,
        priority: Priority::IssueNumber,
        extract: Extractors::issue_number,
    },
    Rule {
        name: "year_bare",
        kind: FieldKind::Year,
        priority: Priority::YearBare,
        extract: Extractors::year_bare,
    },
];

/// Pre-compiled patterns and policy shared by the extraction rules.
#[derive(Debug, Clone)]
pub struct Extractors {
    config: ParserConfig,
    re_volume: Regex,
    re_count: Regex,
    re_year_piece: Regex,
}

impl Extractors {
    /// Compiles the patterns for a configuration.
    ///
    /// # Errors
    ///
    /// Returns `ComicnameError::RegexError` if a pattern fails to compile.
    pub fn new(config: &ParserConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            re_volume: volume_marker_regex(&config.volume_keywords)?,
            re_count: Regex::new(r"(?i)^of\s*(\d+)$")?,
            re_year_piece: Regex::new(r"\b(\d{4})\b")?,
        })
    }

    /// Runs every rule of the table in order.
    pub fn run_all(&self, name: &NormalizedName) -> Vec<CandidateSpan> {
        RULES.iter().flat_map(|rule| (rule.extract)(self, name)).collect()
    }

    /// `v2`, `Vol.2`, `volume 03`. Never the first title token.
    pub fn volume(&self, name: &NormalizedName) -> Vec<CandidateSpan> {
        let body = name.body();
        let mut candidates = Vec::new();

        for (pos, token) in body.iter().enumerate().skip(1) {
            if token.kind != TokenKind::Word {
                continue;
            }
            if let Some(caps) = self.re_volume.captures(&token.text) {
                candidates.push(CandidateSpan::new(
                    FieldKind::Volume,
                    Priority::Volume,
                    std::slice::from_ref(token),
                    &caps[1],
                ));
            } else if self.config.is_volume_keyword(&token.text) {
                if let Some(next) = body.get(pos + 1).filter(|t| t.is_digits()) {
                    candidates.push(CandidateSpan::new(
                        FieldKind::Volume,
                        Priority::Volume,
                        &body[pos..=pos + 1],
                        next.text.clone(),
                    ));
                }
            }
        }

        candidates
    }

    /// `(of 50)` bracket groups and `of 50` word pairs.
    pub fn issue_count(&self, name: &NormalizedName) -> Vec<CandidateSpan> {
        let body_end = name.body_end();
        let mut candidates = Vec::new();

        for (pos, token) in name.tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Bracket('(') | TokenKind::Bracket('[') => {
                    if let Some(caps) = self.re_count.captures(&token.text) {
                        candidates.push(CandidateSpan::new(
                            FieldKind::IssueCount,
                            Priority::IssueCount,
                            std::slice::from_ref(token),
                            strip_leading_zeros(&caps[1]),
                        ));
                    }
                }
                TokenKind::Word if pos + 1 < body_end && token.is_word("of") => {
                    let next = &name.tokens[pos + 1];
                    if next.is_digits() {
                        candidates.push(CandidateSpan::new(
                            FieldKind::IssueCount,
                            Priority::IssueCount,
                            &name.tokens[pos..=pos + 1],
                            strip_leading_zeros(&next.text),
                        ));
                    }
                }
                _ => {}
            }
        }

        candidates
    }

    /// Years inside bracket tags: `(2021)`, `(January 2022)`, `(FCBD 2021)`.
    /// The whole tag is claimed.
    pub fn year_bracketed(&self, name: &NormalizedName) -> Vec<CandidateSpan> {
        name.tokens
            .iter()
            .filter(|t| t.is_bracket())
            .filter_map(|token| {
                let year = self
                    .re_year_piece
                    .captures_iter(&token.text)
                    .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
                    .find(|piece| self.config.year_range.matches(piece))?;
                Some(CandidateSpan::new(
                    FieldKind::Year,
                    Priority::YearBracketed,
                    std::slice::from_ref(token),
                    year,
                ))
            })
            .collect()
    }

    /// Year-like numbers in the title body, after its first token.
    pub fn year_bare(&self, name: &NormalizedName) -> Vec<CandidateSpan> {
        name.body()
            .iter()
            .skip(1)
            .filter(|t| t.kind == TokenKind::Number && self.config.year_range.matches(&t.text))
            .map(|token| {
                CandidateSpan::new(
                    FieldKind::Year,
                    Priority::YearBare,
                    std::slice::from_ref(token),
                    token.text.clone(),
                )
            })
            .collect()
    }

    /// The last `#` issue marker in the title body; failing that, the last
    /// number of the title body that is not a year and not an `of M` count.
    pub fn issue_number(&self, name: &NormalizedName) -> Vec<CandidateSpan> {
        let body = name.body();

        if let Some(token) = body.iter().rev().find(|t| t.kind == TokenKind::Issue) {
            return vec![CandidateSpan::new(
                FieldKind::Issue,
                Priority::IssueNumber,
                std::slice::from_ref(token),
                token.text.clone(),
            )];
        }

        let content: Vec<&Token> = body
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Word | TokenKind::Number))
            .collect();

        let mut pos = content.len();
        while pos > 0 {
            let token = content[pos - 1];
            if token.kind == TokenKind::Number && self.config.year_range.matches(&token.text) {
                pos -= 1;
            } else if token.is_digits() && pos >= 2 && content[pos - 2].is_word("of") {
                pos -= 2;
            } else {
                break;
            }
        }

        // the first word names the series, never the issue
        if pos < 2 {
            return Vec::new();
        }
        let token = content[pos - 1];
        if token.kind != TokenKind::Number || self.config.is_volume_keyword(&content[pos - 2].text) {
            return Vec::new();
        }

        vec![CandidateSpan::new(
            FieldKind::Issue,
            Priority::IssueNumber,
            std::slice::from_ref(token),
            token.text.clone(),
        )]
    }
}

fn strip_leading_zeros(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
