//! # File Renamer
//!
//! The inverse of filename parsing: renders a [`ParsedFilename`] back into a
//! clean archive name from a `{field}` template.
//!
//! With smart cleanup enabled, an empty field takes its dangling prefix with
//! it, so `"{series} v{volume} #{issue}"` renders as `"Batman #023"` rather
//! than `"Batman v #023"`.

use regex::Regex;

use crate::error::{ComicnameError, Result};
use crate::types::{IssueNumber, ParsedFilename};

/// Default rename template.
pub const DEFAULT_TEMPLATE: &str = "{series} v{volume} #{issue} (of {issue_count}) ({year})";

/// Default zero padding for the integer part of the issue number.
pub const DEFAULT_ISSUE_PADDING: usize = 3;

/// Characters that are never allowed in a file name.
const UNSAFE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Renders filenames from a template.
#[derive(Debug, Clone)]
pub struct FileRenamer {
    template: String,
    smart_cleanup: bool,
    issue_zero_padding: usize,
    re_field: Regex,
}

impl FileRenamer {
    /// Creates a renamer with the default template, smart cleanup on and
    /// an issue padding of three digits.
    ///
    /// # Errors
    ///
    /// Returns `ComicnameError::RegexError` if the placeholder pattern fails
    /// to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            template: DEFAULT_TEMPLATE.to_string(),
            smart_cleanup: true,
            issue_zero_padding: DEFAULT_ISSUE_PADDING,
            re_field: Regex::new(r"\{(\w+)\}")?,
        })
    }

    /// Set the template.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Enable or disable smart cleanup.
    pub fn with_smart_cleanup(mut self, enabled: bool) -> Self {
        self.smart_cleanup = enabled;
        self
    }

    /// Set the issue zero padding.
    pub fn with_issue_zero_padding(mut self, pad: usize) -> Self {
        self.issue_zero_padding = pad;
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Renders the new file name, appending `ext` (with or without its dot).
    ///
    /// # Errors
    ///
    /// Returns `ComicnameError::InvalidTemplate` if the template names an
    /// unknown field or has an unbalanced brace.
    ///
    /// # Examples
    /// ```
    /// use comicname_core::{FileRenamer, ParsedFilename};
    ///
    /// let parsed = ParsedFilename {
    ///     series: "Batman".into(),
    ///     issue: "23".into(),
    ///     year: "2020".into(),
    ///     ..Default::default()
    /// };
    /// let renamer = FileRenamer::new().unwrap();
    /// assert_eq!(renamer.determine_name(&parsed, ".cbz").unwrap(), "Batman #023 (2020).cbz");
    /// ```
    pub fn determine_name(&self, parsed: &ParsedFilename, ext: &str) -> Result<String> {
        let mut out: Vec<String> = Vec::new();
        let mut lstrip = false;
        let mut cursor = 0;

        for caps in self.re_field.captures_iter(&self.template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let literal = self.push_literal(&self.template[cursor..whole.start()], lstrip, &mut out)?;
            lstrip = false;
            cursor = whole.end();

            let mut value = self.field_value(parsed, &caps[1])?;
            if value.is_empty() && self.smart_cleanup && literal {
                if let Some(last) = out.last_mut() {
                    lstrip = last.contains(['(', '{', '[']);
                    drop_dangling_prefix(last);
                }
            }
            if self.smart_cleanup {
                value = replace_separators(&value, true);
                value = value.split_whitespace().collect::<Vec<_>>().join(" ");
            }
            out.push(sanitize(&value));
        }
        self.push_literal(&self.template[cursor..], lstrip, &mut out)?;

        let name = sanitize(&out.concat()).trim().to_string();
        let ext = ext.trim();
        Ok(match ext {
            "" => name,
            _ if ext.starts_with('.') => format!("{name}{ext}"),
            _ => format!("{name}.{ext}"),
        })
    }

    /// Pushes the literal text between placeholders. Returns `true` if
    /// anything was pushed.
    fn push_literal(&self, literal: &str, lstrip: bool, out: &mut Vec<String>) -> Result<bool> {
        if literal.contains(['{', '}']) {
            return Err(ComicnameError::InvalidTemplate(format!(
                "unbalanced brace in {:?}",
                self.template
            )));
        }
        if literal.is_empty() {
            return Ok(false);
        }

        let mut text = if lstrip {
            literal
                .trim_start_matches(['-', '_', ')', '}', ']', '#'])
                .to_string()
        } else {
            literal.to_string()
        };

        if self.smart_cleanup {
            text = replace_separators(&text, false);
            let lspace = text.starts_with(char::is_whitespace);
            let rspace = text.ends_with(char::is_whitespace);
            let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
            text = if collapsed.is_empty() {
                " ".to_string()
            } else {
                format!(
                    "{}{collapsed}{}",
                    if lspace { " " } else { "" },
                    if rspace { " " } else { "" }
                )
            };
        }

        out.push(text);
        Ok(true)
    }

    fn field_value(&self, parsed: &ParsedFilename, field: &str) -> Result<String> {
        let value = match field.to_lowercase().as_str() {
            "series" => parsed.series.clone(),
            "volume" => parsed.volume.clone(),
            "issue" if parsed.issue.is_empty() => String::new(),
            "issue" => IssueNumber::parse(&parsed.issue).as_string(self.issue_zero_padding),
            "issue_count" => parsed.issue_count.clone(),
            "year" => parsed.year.clone(),
            "remainder" => parsed.remainder.clone(),
            other => {
                return Err(ComicnameError::InvalidTemplate(format!(
                    "unknown field {{{other}}}"
                )));
            }
        };
        Ok(value)
    }
}

/// Removes the last word of the text preceding an empty field, along with
/// any opening bracket or marker left hanging.
fn drop_dangling_prefix(text: &mut String) {
    if text.contains(' ') {
        let trimmed = text.trim_end();
        let head = trimmed.rsplit_once(' ').map_or("", |(head, _)| head);
        *text = head.to_string();
    }
    let kept = text.trim_end_matches(['-', '_', '(', '{', '[', '#']).len();
    text.truncate(kept);
}

/// Colons become dashes; in field values path separators do too.
fn replace_separators(text: &str, value: bool) -> String {
    let mut text = text.replace(": ", " - ").replace(':', "-");
    if value {
        text = text.replace(['/', '\\'], "-");
    }
    text
}

fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() && !UNSAFE_CHARS.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(series: &str, volume: &str, issue: &str, count: &str, year: &str) -> ParsedFilename {
        ParsedFilename {
            series: series.into(),
            volume: volume.into(),
            issue: issue.into(),
            issue_count: count.into(),
            year: year.into(),
            ..Default::default()
        }
    }

    #[test]
    fn full_record_with_default_template() {
        let renamer = FileRenamer::new().unwrap();
        let parsed = record("Amazing Spider-Man", "2", "45", "50", "1999");
        assert_eq!(
            renamer.determine_name(&parsed, ".cbr").unwrap(),
            "Amazing Spider-Man v2 #045 (of 50) (1999).cbr"
        );
    }

    #[test]
    fn smart_cleanup_drops_empty_fields() {
        let renamer = FileRenamer::new().unwrap();
        let parsed = record("Batman", "", "023", "", "2020");
        assert_eq!(renamer.determine_name(&parsed, "cbz").unwrap(), "Batman #023 (2020).cbz");

        let parsed = record("Batman", "", "023", "", "");
        assert_eq!(renamer.determine_name(&parsed, ".cbz").unwrap(), "Batman #023.cbz");

        let parsed = record("Goblin", "", "", "", "2021");
        assert_eq!(renamer.determine_name(&parsed, ".cbr").unwrap(), "Goblin (2021).cbr");
    }

    #[test]
    fn without_smart_cleanup_literals_stay() {
        let renamer = FileRenamer::new().unwrap().with_smart_cleanup(false);
        let parsed = record("Batman", "", "023", "", "2020");
        assert_eq!(
            renamer.determine_name(&parsed, ".cbz").unwrap(),
            "Batman v #023 (of ) (2020).cbz"
        );
    }

    #[test]
    fn default_template() {
        let renamer = FileRenamer::new().unwrap();
        assert_eq!(renamer.template(), DEFAULT_TEMPLATE);
        assert_eq!(renamer.with_template("{series}").template(), "{series}");
    }

    #[test]
    fn issue_padding() {
        let parsed = record("Batman", "", "5AU", "", "");
        let renamer = FileRenamer::new().unwrap().with_template("{series} #{issue}");
        assert_eq!(renamer.determine_name(&parsed, "").unwrap(), "Batman #005AU");

        let renamer = renamer.with_issue_zero_padding(0);
        assert_eq!(renamer.determine_name(&parsed, "").unwrap(), "Batman #5AU");
    }

    #[test]
    fn colons_and_slashes_are_replaced() {
        let renamer = FileRenamer::new().unwrap().with_template("{series} {issue}");
        let parsed = record("Batman: Year One/Two", "", "1", "", "");
        assert_eq!(
            renamer.determine_name(&parsed, ".cbz").unwrap(),
            "Batman - Year One-Two 001.cbz"
        );
    }

    #[test]
    fn unsafe_characters_removed_without_cleanup() {
        let renamer = FileRenamer::new()
            .unwrap()
            .with_smart_cleanup(false)
            .with_template("{series}");
        let parsed = record("What If?: \"Spider\"", "", "", "", "");
        assert_eq!(renamer.determine_name(&parsed, ".cbz").unwrap(), "What If Spider.cbz");
    }

    #[test]
    fn placeholders_ignore_case() {
        let renamer = FileRenamer::new().unwrap().with_template("{Series} ({YEAR})");
        let parsed = record("Goblin", "", "", "", "2021");
        assert_eq!(renamer.determine_name(&parsed, ".cbz").unwrap(), "Goblin (2021).cbz");
    }

    #[test]
    fn unknown_field_is_an_error() {
        let renamer = FileRenamer::new().unwrap().with_template("{publisher}/{series}");
        let err = renamer.determine_name(&ParsedFilename::default(), ".cbz").unwrap_err();
        assert!(matches!(err, ComicnameError::InvalidTemplate(ref msg) if msg.contains("publisher")));
    }

    #[test]
    fn unbalanced_brace_is_an_error() {
        let renamer = FileRenamer::new().unwrap().with_template("{series} {year");
        assert!(matches!(
            renamer.determine_name(&ParsedFilename::default(), ".cbz"),
            Err(ComicnameError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn drop_dangling_prefix_trims_last_word() {
        let mut text = " (of ".to_string();
        drop_dangling_prefix(&mut text);
        assert_eq!(text, "");

        let mut text = "Batman v".to_string();
        drop_dangling_prefix(&mut text);
        assert_eq!(text, "Batman");

        let mut text = "#".to_string();
        drop_dangling_prefix(&mut text);
        assert_eq!(text, "");
    }
}
