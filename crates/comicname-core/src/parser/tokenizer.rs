//! # Tokenizer / Normalizer
//!
//! Turns a raw archive filename into a token stream. Every token keeps its
//! byte range in the cleaned source string, so the extractors can claim spans
//! and the disambiguator can rebuild the series and remainder from the
//! original text.

use std::sync::Arc;

use regex::Regex;
use tracing::trace;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::wordsplit::{self, WordDictionary};

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Plain text (may contain internal hyphens or apostrophes).
    Word,
    /// Integer or decimal, optionally signed, with an optional letter suffix.
    Number,
    /// `#` issue marker; the token text excludes the `#`.
    Issue,
    /// Standalone `-` separating parts of a title.
    Dash,
    /// `--` or a run of `__`; nothing after it belongs to the title.
    Skip,
    /// A `(...)`, `[...]` or `{...}` group; holds the opening character.
    Bracket(char),
}

/// A token extracted from a filename with positional information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text content
    pub text: String,
    /// What the token looks like
    pub kind: TokenKind,
    /// Start position in the source string
    pub start: usize,
    /// End position in the source string
    pub end: usize,
    /// Token index in the sequence
    pub index: usize,
}

impl Token {
    /// Returns `true` if the token is a number made only of ASCII digits.
    pub fn is_digits(&self) -> bool {
        self.kind == TokenKind::Number && self.text.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn is_bracket(&self) -> bool {
        matches!(self.kind, TokenKind::Bracket(_))
    }

    /// Case-insensitive comparison of a word token against `word`.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(word)
    }
}

/// A filename reduced to its archive base name plus its token stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedName {
    /// Base name after path removal, decoding and extension stripping.
    pub source: String,
    /// Tokens in source order.
    pub tokens: Vec<Token>,
}

impl NormalizedName {
    /// Original text covered by a token.
    pub fn slice(&self, token: &Token) -> &str {
        &self.source[token.start..token.end]
    }

    /// Index of the first skip marker, or the token count if there is none.
    /// Tokens before this index form the title body.
    pub fn body_end(&self) -> usize {
        self.tokens
            .iter()
            .position(|t| t.kind == TokenKind::Skip)
            .unwrap_or(self.tokens.len())
    }

    /// Title-body tokens.
    pub fn body(&self) -> &[Token] {
        &self.tokens[..self.body_end()]
    }

    /// The normalized string: tokens joined by single spaces, bracket groups
    /// kept verbatim.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| self.render(t))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// How a token reads in the normalized string.
    pub fn render<'a>(&'a self, token: &'a Token) -> &'a str {
        match token.kind {
            TokenKind::Word | TokenKind::Number => &token.text,
            TokenKind::Dash => "-",
            _ => self.slice(token),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Tokenizer for comic archive filenames.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    config: ParserConfig,
    dictionary: Option<Arc<WordDictionary>>,
    re_number: Regex,
    re_volume: Regex,
}

impl Tokenizer {
    /// Create a tokenizer for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ComicnameError::RegexError` if the volume keyword pattern
    /// built from the configuration fails to compile.
    pub fn new(config: &ParserConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            dictionary: None,
            re_number: Regex::new(r"^-?(?:\d+(?:\.\d+)?|\.\d+)([A-Za-z]*)$")?,
            re_volume: volume_marker_regex(&config.volume_keywords)?,
        })
    }

    /// Attach the dictionary used when `split_words` is enabled.
    pub fn with_dictionary(mut self, dictionary: Arc<WordDictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    /// Reduce a filename to its base name and tokenize it.
    ///
    /// # Examples
    /// ```
    /// use comicname_core::config::ParserConfig;
    /// use comicname_core::parser::tokenizer::{TokenKind, Tokenizer};
    ///
    /// let tokenizer = Tokenizer::new(&ParserConfig::default()).unwrap();
    /// let name = tokenizer.normalize("comics/Batman_023_(2020).cbz");
    /// assert_eq!(name.source, "Batman_023_(2020)");
    /// assert_eq!(name.tokens[1].text, "023");
    /// assert_eq!(name.tokens[2].kind, TokenKind::Bracket('('));
    /// ```
    pub fn normalize(&self, filename: &str) -> NormalizedName {
        let base = filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(filename);

        let mut source = if base.contains('%') {
            urlencoding::decode(base)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| base.to_string())
        } else {
            base.to_string()
        };

        // names decoded one time too many leave "_28"/"_29" for "(" and ")"
        if source.matches("_28").count() > 1 && source.matches("_29").count() > 1 {
            source = source.replace("_28", "(").replace("_29", ")");
        }

        let stem_len = source.rsplit_once('.').and_then(|(stem, ext)| {
            (self.config.is_archive_extension(ext) && !stem.trim().is_empty()).then_some(stem.len())
        });
        if let Some(len) = stem_len {
            source.truncate(len);
        }

        let mut tokens = self.tokenize(&source);
        if self.config.split_words {
            if let Some(dictionary) = &self.dictionary {
                tokens = self.split_glued(&source, tokens, dictionary);
            }
        }
        for (index, token) in tokens.iter_mut().enumerate() {
            token.index = index;
        }

        trace!(source = %source, tokens = tokens.len(), "normalized filename");
        NormalizedName { source, tokens }
    }

    /// Tokenize an already-cleaned base name.
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let chars: Vec<(usize, char)> = input.char_indices().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let (pos, c) = chars[i];
            match c {
                '(' | '[' | '{' => {
                    if let Some(close) = find_close(&chars, i) {
                        let (close_pos, close_char) = chars[close];
                        tokens.push(Token {
                            text: input[pos + c.len_utf8()..close_pos].trim().to_string(),
                            kind: TokenKind::Bracket(c),
                            start: pos,
                            end: close_pos + close_char.len_utf8(),
                            index: 0,
                        });
                        i = close + 1;
                    } else {
                        i += 1;
                    }
                }
                ')' | ']' | '}' => i += 1,
                '_' => {
                    let run = chars[i..].iter().take_while(|(_, ch)| *ch == '_').count();
                    if run >= 2 {
                        let end = chars[i + run - 1].0 + 1;
                        tokens.push(self.token(input, pos, end, TokenKind::Skip));
                    }
                    i += run;
                }
                c if c.is_whitespace() => i += 1,
                '.' if !starts_leading_decimal(&chars, i) => i += 1,
                '#' => match self.scan_issue(&chars, i) {
                    Some((digits_at, next)) => {
                        let end = end_of(&chars, next, input.len());
                        tokens.push(Token {
                            text: input[chars[digits_at].0..end].to_string(),
                            kind: TokenKind::Issue,
                            start: pos,
                            end,
                            index: 0,
                        });
                        i = next;
                    }
                    None => i += 1,
                },
                _ => {
                    let next = scan_word(&chars, i);
                    let end = end_of(&chars, next, input.len());
                    self.push_word(input, pos, end, &mut tokens);
                    i = next;
                }
            }
        }

        tokens
    }

    /// Classify and push a word, splitting hyphenated runs that hide a volume
    /// or issue marker (`X-Men-V1-#067`).
    fn push_word(&self, input: &str, start: usize, end: usize, tokens: &mut Vec<Token>) {
        let word = &input[start..end];

        if word.chars().all(is_dash) {
            let kind = if word.chars().count() == 1 {
                TokenKind::Dash
            } else {
                TokenKind::Skip
            };
            tokens.push(self.token(input, start, end, kind));
            return;
        }

        let marker = word
            .match_indices('-')
            .map(|(at, _)| at)
            .find(|&at| {
                let rest = &word[at + 1..];
                let piece = rest.split('-').next().unwrap_or("");
                at > 0 && (self.re_volume.is_match(piece) || is_issue_piece(piece))
            });

        let Some(at) = marker else {
            tokens.push(self.classify(input, start, end));
            return;
        };

        tokens.push(self.classify(input, start, start + at));
        let mut offset = start + at + 1;
        for piece in word[at + 1..].split('-') {
            let piece_end = offset + piece.len();
            if piece.is_empty() {
                // consecutive hyphens
            } else if let Some(digits) = piece.strip_prefix('#') {
                tokens.push(Token {
                    text: digits.to_string(),
                    kind: TokenKind::Issue,
                    start: offset,
                    end: piece_end,
                    index: 0,
                });
            } else {
                tokens.push(self.classify(input, offset, piece_end));
            }
            offset = piece_end + 1;
        }
    }

    fn classify(&self, input: &str, start: usize, end: usize) -> Token {
        let text = &input[start..end];
        let kind = match self.re_number.captures(text) {
            Some(caps) if !is_ordinal(&caps[1]) => TokenKind::Number,
            _ => TokenKind::Word,
        };
        self.token(input, start, end, kind)
    }

    fn token(&self, input: &str, start: usize, end: usize, kind: TokenKind) -> Token {
        Token {
            text: input[start..end].to_string(),
            kind,
            start,
            end,
            index: 0,
        }
    }

    /// At a `#`, returns the index where the issue text starts and the index
    /// just past it, if this `#` introduces an issue number.
    fn scan_issue(&self, chars: &[(usize, char)], at: usize) -> Option<(usize, usize)> {
        let mut digits_at = at + 1;
        while digits_at < chars.len() && chars[digits_at].1 == ' ' {
            digits_at += 1;
        }
        let first = chars.get(digits_at)?.1;
        let second = chars.get(digits_at + 1).map(|(_, c)| *c);

        let numeric = first.is_ascii_digit()
            || (matches!(first, '-' | '.' | '+') && second.is_some_and(|c| c.is_ascii_digit()));
        let lettered = self.config.allow_issue_start_with_letter
            && digits_at == at + 1
            && first.is_alphanumeric();
        if !numeric && !lettered {
            return None;
        }

        let mut next = digits_at + 1;
        while next < chars.len() {
            let c = chars[next].1;
            if is_boundary(c) || c == '#' {
                break;
            }
            if c == '.' {
                let follows = chars.get(next + 1).map(|(_, c)| *c);
                if !follows.is_some_and(char::is_alphanumeric) {
                    break;
                }
            }
            next += 1;
        }
        Some((digits_at, next))
    }

    /// Breaks glued words apart at letter/digit boundaries and through the
    /// dictionary. Hyphenated words are only broken up after a skip marker.
    fn split_glued(&self, input: &str, tokens: Vec<Token>, dictionary: &WordDictionary) -> Vec<Token> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut past_skip = false;

        for token in tokens {
            if token.kind == TokenKind::Skip {
                past_skip = true;
            }
            let splittable = token.kind == TokenKind::Word
                && !self.re_volume.is_match(&token.text)
                && !token.text.eq_ignore_ascii_case("c2c")
                && token
                    .text
                    .chars()
                    .all(|c| c.is_alphanumeric() || (past_skip && c == '-'));
            if !splittable {
                out.push(token);
                continue;
            }

            let mut offset = token.start;
            for part in token.text.split('-') {
                for run in class_runs(part) {
                    let pieces = if run.chars().all(char::is_alphabetic) && !dictionary.contains(run) {
                        wordsplit::split(run, dictionary)
                    } else {
                        vec![run.to_string()]
                    };
                    for piece in pieces {
                        let end = offset + piece.len();
                        out.push(self.classify(input, offset, end));
                        offset = end;
                    }
                }
                offset += 1;
            }
        }

        out
    }
}

/// Builds `^(?:v|vol|volume)\.?(\d+)$` from the configured keywords.
pub(crate) fn volume_marker_regex(keywords: &[String]) -> Result<Regex> {
    let mut sorted: Vec<&String> = keywords.iter().collect();
    sorted.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let alternatives = sorted
        .iter()
        .map(|k| regex::escape(k.trim()))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Regex::new(&format!(r"(?i)^(?:{alternatives})\.?(\d+)$"))?)
}

/// Index of the bracket closing the one opened at `open`, honouring nesting
/// of the same bracket kind.
fn find_close(chars: &[(usize, char)], open: usize) -> Option<usize> {
    let opener = chars[open].1;
    let closer = match opener {
        '(' => ')',
        '[' => ']',
        _ => '}',
    };
    let mut depth = 0usize;
    for (idx, &(_, c)) in chars.iter().enumerate().skip(open) {
        if c == opener {
            depth += 1;
        } else if c == closer {
            depth -= 1;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

/// Scans a word starting at `start`; returns the index just past it.
fn scan_word(chars: &[(usize, char)], start: usize) -> usize {
    let mut next = start + 1;
    while next < chars.len() {
        let c = chars[next].1;
        if is_boundary(c) {
            break;
        }
        if c == '.' && !is_decimal_point(chars, next) {
            break;
        }
        next += 1;
    }
    next
}

/// A `.` between two digits belongs to the number.
fn is_decimal_point(chars: &[(usize, char)], at: usize) -> bool {
    at > 0
        && chars[at - 1].1.is_ascii_digit()
        && chars.get(at + 1).is_some_and(|(_, c)| c.is_ascii_digit())
}

/// A `.` that opens a number such as `.5` after a separator.
fn starts_leading_decimal(chars: &[(usize, char)], at: usize) -> bool {
    let after_separator = at == 0 || {
        let prev = chars[at - 1].1;
        prev.is_whitespace() || prev == '_'
    };
    after_separator && chars.get(at + 1).is_some_and(|(_, c)| c.is_ascii_digit())
}

fn end_of(chars: &[(usize, char)], next: usize, len: usize) -> usize {
    chars.get(next).map_or(len, |(pos, _)| *pos)
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '_' | '(' | ')' | '[' | ']' | '{' | '}')
}

fn is_dash(c: char) -> bool {
    matches!(c, '-' | '–' | '—')
}

fn is_issue_piece(piece: &str) -> bool {
    piece
        .strip_prefix('#')
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

fn is_ordinal(suffix: &str) -> bool {
    ["st", "nd", "rd", "th"]
        .iter()
        .any(|o| suffix.eq_ignore_ascii_case(o))
}

/// Splits text into maximal runs of letters and of non-letters.
fn class_runs(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut previous: Option<bool> = None;
    for (idx, c) in text.char_indices() {
        let alpha = c.is_alphabetic();
        if previous.is_some_and(|p| p != alpha) {
            runs.push(&text[start..idx]);
            start = idx;
        }
        previous = Some(alpha);
    }
    if start < text.len() {
        runs.push(&text[start..]);
    }
    runs
}
