//! # Disambiguator
//!
//! Merges the candidate spans of every extractor into one record. Spans are
//! ranked by the priority table, then accepted greedily so that no two
//! accepted spans share a token and no field is filled twice.

use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::parser::extract::{CandidateSpan, FieldKind};
use crate::parser::tokenizer::{NormalizedName, Token, TokenKind};
use crate::types::ParsedFilename;

/// What a token ended up as once the record is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenRole {
    /// Claimed by an accepted field span.
    Field(FieldKind),
    Series,
    Remainder,
    /// A `c2c` or Free Comic Book Day marker dropped by the configuration.
    Removed,
    /// Skip markers, and remainder dashes not between two remainder words.
    Separator,
}

/// Orders candidates by priority (highest first), then by span length
/// (longest first). Remaining ties prefer spans inside the title body, then
/// spans at or after the issue candidate, then the earliest position.
pub fn rank(candidates: &mut [CandidateSpan], body_end: usize) {
    let after_issue = candidates
        .iter()
        .find(|c| c.kind == FieldKind::Issue)
        .map_or(0, |c| c.last + 1);
    // false sorts first
    let placement = |c: &CandidateSpan| (c.first >= body_end, c.first < after_issue);

    candidates.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| placement(a).cmp(&placement(b)))
            .then_with(|| a.start.cmp(&b.start))
    });
}

/// Ranks the candidates and keeps the winners, returned in source order.
///
/// An issue count survives only when it directly follows the accepted issue.
pub fn select(mut candidates: Vec<CandidateSpan>, body_end: usize) -> Vec<CandidateSpan> {
    rank(&mut candidates, body_end);

    let mut accepted: Vec<CandidateSpan> = Vec::new();
    for candidate in candidates {
        if accepted.iter().any(|a| a.kind == candidate.kind) {
            trace!(kind = ?candidate.kind, text = %candidate.text, "field already filled");
            continue;
        }
        if let Some(winner) = accepted.iter().find(|a| a.overlaps(&candidate)) {
            trace!(
                kind = ?candidate.kind,
                text = %candidate.text,
                winner = ?winner.kind,
                "candidate overlaps accepted span"
            );
            continue;
        }
        accepted.push(candidate);
    }

    let issue_last = accepted
        .iter()
        .find(|s| s.kind == FieldKind::Issue)
        .map(|s| s.last);
    accepted.retain(|span| {
        let keep = span.kind != FieldKind::IssueCount
            || issue_last.is_some_and(|last| last + 1 == span.first);
        if !keep {
            trace!(text = %span.text, "issue count not paired with an issue");
        }
        keep
    });

    accepted.sort_by_key(|s| s.first);
    accepted
}

/// Builds the final record from a normalized name and its candidates.
pub fn assemble(
    name: &NormalizedName,
    candidates: Vec<CandidateSpan>,
    config: &ParserConfig,
) -> ParsedFilename {
    let accepted = select(candidates, name.body_end());
    let mut parsed = ParsedFilename::default();

    for span in &accepted {
        let field = match span.kind {
            FieldKind::Volume => &mut parsed.volume,
            FieldKind::IssueCount => &mut parsed.issue_count,
            FieldKind::Year => &mut parsed.year,
            FieldKind::Issue => &mut parsed.issue,
        };
        field.clone_from(&span.text);
    }

    let roles = roles(name, &accepted, config);
    parsed.series = render_role(name, &roles, TokenRole::Series);
    parsed.remainder = render_role(name, &roles, TokenRole::Remainder);

    set_flags(name, &mut parsed);

    debug!(
        source = %name.source,
        accepted = accepted.len(),
        series = %parsed.series,
        issue = %parsed.issue,
        year = %parsed.year,
        "assembled filename"
    );
    parsed
}

/// Assigns every token a role given the accepted spans. Each token gets
/// exactly one; the series and remainder are the tokens of their role
/// rendered in source order.
pub fn roles(
    name: &NormalizedName,
    accepted: &[CandidateSpan],
    config: &ParserConfig,
) -> Vec<TokenRole> {
    let tokens = &name.tokens;
    let mut roles = vec![TokenRole::Remainder; tokens.len()];

    for span in accepted {
        for role in &mut roles[span.first..=span.last] {
            *role = TokenRole::Field(span.kind);
        }
    }
    for i in removed_tokens(name, config) {
        if roles[i] == TokenRole::Remainder {
            roles[i] = TokenRole::Removed;
        }
    }

    let issue_missing = !accepted.iter().any(|s| s.kind == FieldKind::Issue);
    for i in series_tokens(name, accepted, &roles, config, issue_missing) {
        roles[i] = TokenRole::Series;
    }

    let word_at = |roles: &[TokenRole], i: usize| {
        roles[i] == TokenRole::Remainder && tokens[i].kind != TokenKind::Dash
    };
    for i in 0..tokens.len() {
        let kept = match tokens[i].kind {
            TokenKind::Skip => false,
            TokenKind::Dash => {
                i > 0 && word_at(&roles, i - 1) && i + 1 < tokens.len() && word_at(&roles, i + 1)
            }
            _ => true,
        };
        if !kept && roles[i] == TokenRole::Remainder {
            roles[i] = TokenRole::Separator;
        }
    }

    roles
}

fn render_role(name: &NormalizedName, roles: &[TokenRole], role: TokenRole) -> String {
    name.tokens
        .iter()
        .zip(roles)
        .filter(|&(_, r)| *r == role)
        .map(|(token, _)| name.render(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Indices of the tokens forming the series title.
///
/// The title ends at the earliest accepted span or skip marker. Bracket tags
/// leading the name do not end it, and brackets never belong to it.
fn series_tokens(
    name: &NormalizedName,
    accepted: &[CandidateSpan],
    roles: &[TokenRole],
    config: &ParserConfig,
    issue_missing: bool,
) -> Vec<usize> {
    let tokens = &name.tokens;
    let lead = tokens
        .iter()
        .position(|t| !t.is_bracket())
        .unwrap_or(tokens.len());
    let boundary = accepted
        .iter()
        .map(|s| s.first)
        .filter(|&first| first >= lead)
        .min()
        .map_or(name.body_end(), |first| first.min(name.body_end()));

    let mut series: Vec<usize> = (lead..boundary)
        .filter(|&i| !tokens[i].is_bracket() && roles[i] != TokenRole::Removed)
        .collect();
    trim_dashes(name, &mut series);

    if issue_missing && series.len() > 1 {
        let last = &tokens[series[series.len() - 1]];
        if last.kind == TokenKind::Word && config.is_one_shot_word(&last.text) {
            series.pop();
            trim_dashes(name, &mut series);
        }
    }

    series
}

fn trim_dashes(name: &NormalizedName, series: &mut Vec<usize>) {
    let is_dash = |i: usize| name.tokens[i].kind == TokenKind::Dash;
    while series.last().is_some_and(|&i| is_dash(i)) {
        series.pop();
    }
    let leading = series.iter().take_while(|&&i| is_dash(i)).count();
    series.drain(..leading);
}

/// Tokens dropped by `remove_c2c` and `remove_fcbd`.
fn removed_tokens(name: &NormalizedName, config: &ParserConfig) -> Vec<usize> {
    let tokens = &name.tokens;
    let mut removed = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let c2c = config.remove_c2c && is_marker(token, "c2c");
        let fcbd = config.remove_fcbd
            && FCBD_MARKERS.iter().any(|marker| is_marker(token, marker));
        if c2c || fcbd {
            removed.push(i);
        }
    }

    if config.remove_fcbd {
        for (i, window) in tokens.windows(FCBD_PHRASE.len()).enumerate() {
            if window.iter().zip(FCBD_PHRASE).all(|(t, word)| t.is_word(word)) {
                removed.extend(i..i + FCBD_PHRASE.len());
            }
        }
    }

    removed
}

const FCBD_MARKERS: &[&str] = &["fcbd", "freecomicbookday", "free comic book day"];
const FCBD_PHRASE: [&str; 4] = ["free", "comic", "book", "day"];

/// A word token or a bracket tag reading exactly `marker`.
fn is_marker(token: &Token, marker: &str) -> bool {
    (token.kind == TokenKind::Word || token.is_bracket()) && token.text.eq_ignore_ascii_case(marker)
}

fn set_flags(name: &NormalizedName, parsed: &mut ParsedFilename) {
    parsed.annual = name.body().iter().any(|t| t.is_word("annual"));
    parsed.c2c = name.tokens.iter().any(|t| is_marker(t, "c2c"));

    let squashed: String = name
        .source
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    parsed.fcbd = squashed.contains("fcbd") || squashed.contains("freecomicbookday");
}
