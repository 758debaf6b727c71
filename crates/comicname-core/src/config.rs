//! Parser configuration.
//!
//! Every convention-driven constant the extractors rely on (plausible year
//! bounds, volume keywords, archive extensions, one-shot words) lives here so
//! it can be tuned against a larger fixture corpus without touching the
//! extraction code.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{ComicnameError, Result};

/// Earliest year accepted as a publication year.
pub const DEFAULT_MIN_YEAR: u16 = 1900;

/// How many years past the current one are still plausible.
pub const FUTURE_YEAR_SLACK: u16 = 2;

/// Keywords that introduce a volume number (`v2`, `vol 2`, `volume 02`).
pub const DEFAULT_VOLUME_KEYWORDS: &[&str] = &["v", "vol", "volume"];

/// Archive suffixes stripped from the end of a filename.
pub const DEFAULT_ARCHIVE_EXTENSIONS: &[&str] = &[
    "cbz", "cbr", "cb7", "cbt", "cba", "zip", "rar", "7z", "tar", "pdf",
];

/// Trailing series words that mark a collected or one-shot edition.
pub const DEFAULT_ONE_SHOT_WORDS: &[&str] = &["tpb", "os", "one-shot", "ogn", "gn"];

/// Inclusive range of years treated as publication years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: u16,
    pub max: u16,
}

impl YearRange {
    /// Creates a range; bounds are swapped if given in the wrong order.
    #[must_use]
    pub fn new(min: u16, max: u16) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Returns `true` if `year` falls inside the range.
    #[must_use]
    pub fn contains(&self, year: u16) -> bool {
        (self.min..=self.max).contains(&year)
    }

    /// Returns `true` if `text` is exactly four ASCII digits inside the range.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        text.len() == 4
            && text.bytes().all(|b| b.is_ascii_digit())
            && text.parse().is_ok_and(|year| self.contains(year))
    }
}

impl Default for YearRange {
    fn default() -> Self {
        let current = u16::try_from(chrono::Local::now().year()).unwrap_or(u16::MAX);
        Self {
            min: DEFAULT_MIN_YEAR,
            max: current.saturating_add(FUTURE_YEAR_SLACK),
        }
    }
}

/// Configuration for the filename parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Split glued words (`Batman023`, `theamazingspiderman`) before extraction.
    pub split_words: bool,
    /// Accept `#` issue markers whose first character is a letter (`#A1`).
    pub allow_issue_start_with_letter: bool,
    /// Plausible publication years.
    pub year_range: YearRange,
    /// Words that introduce a volume number.
    pub volume_keywords: Vec<String>,
    /// Recognized archive extensions (without the dot).
    pub archive_extensions: Vec<String>,
    /// Words dropped from the end of an issue-less series.
    pub one_shot_words: Vec<String>,
    /// Drop `c2c` markers from the series and remainder.
    pub remove_c2c: bool,
    /// Drop `FCBD` and "Free Comic Book Day" markers from the series and
    /// remainder.
    pub remove_fcbd: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            split_words: false,
            allow_issue_start_with_letter: false,
            year_range: YearRange::default(),
            volume_keywords: to_owned_list(DEFAULT_VOLUME_KEYWORDS),
            archive_extensions: to_owned_list(DEFAULT_ARCHIVE_EXTENSIONS),
            one_shot_words: to_owned_list(DEFAULT_ONE_SHOT_WORDS),
            remove_c2c: false,
            remove_fcbd: false,
        }
    }
}

impl ParserConfig {
    /// Create a new parser configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a configuration from JSON; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ComicnameError::InvalidConfig` if the JSON is malformed or
    /// the year range is inverted.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ComicnameError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    ///
    /// Returns `ComicnameError::InvalidConfig` describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.year_range.min > self.year_range.max {
            return Err(ComicnameError::InvalidConfig(format!(
                "year range {}..={} is inverted",
                self.year_range.min, self.year_range.max
            )));
        }
        if self.volume_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ComicnameError::InvalidConfig(
                "volume keywords must not be blank".into(),
            ));
        }
        Ok(())
    }

    /// Enable or disable dictionary word splitting.
    pub fn with_split_words(mut self, enabled: bool) -> Self {
        self.split_words = enabled;
        self
    }

    /// Enable or disable `#` issues that start with a letter.
    pub fn with_issue_start_with_letter(mut self, enabled: bool) -> Self {
        self.allow_issue_start_with_letter = enabled;
        self
    }

    /// Enable or disable dropping `c2c` markers.
    pub fn with_remove_c2c(mut self, enabled: bool) -> Self {
        self.remove_c2c = enabled;
        self
    }

    /// Enable or disable dropping Free Comic Book Day markers.
    pub fn with_remove_fcbd(mut self, enabled: bool) -> Self {
        self.remove_fcbd = enabled;
        self
    }

    /// Set the plausible year range.
    pub fn with_year_range(mut self, min: u16, max: u16) -> Self {
        self.year_range = YearRange::new(min, max);
        self
    }

    /// Replace the volume keyword list.
    pub fn with_volume_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.volume_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if `word` is a volume keyword (case-insensitive).
    #[must_use]
    pub fn is_volume_keyword(&self, word: &str) -> bool {
        self.volume_keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case(word))
    }

    /// Returns `true` if `ext` is a known archive extension (case-insensitive).
    #[must_use]
    pub fn is_archive_extension(&self, ext: &str) -> bool {
        self.archive_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Returns `true` if `word` marks a one-shot or collected edition.
    #[must_use]
    pub fn is_one_shot_word(&self, word: &str) -> bool {
        self.one_shot_words
            .iter()
            .any(|w| w.eq_ignore_ascii_case(word))
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_year_range_covers_current_year() {
        let range = YearRange::default();
        let current = chrono::Local::now().year() as u16;
        assert_eq!(range.min, 1900);
        assert!(range.contains(current));
        assert!(range.contains(current + 2));
        assert!(!range.contains(current + 3));
    }

    #[test]
    fn year_range_matches_only_four_digits() {
        let range = YearRange::new(1900, 2030);
        assert!(range.matches("1999"));
        assert!(!range.matches("0999"));
        assert!(!range.matches("199"));
        assert!(!range.matches("19999"));
        assert!(!range.matches("2031"));
        assert!(!range.matches("20a1"));
    }

    #[test]
    fn year_range_swaps_inverted_bounds() {
        let range = YearRange::new(2030, 1900);
        assert_eq!(range.min, 1900);
        assert_eq!(range.max, 2030);
    }

    #[test]
    fn test_parser_config_builder() {
        let config = ParserConfig::new()
            .with_split_words(true)
            .with_issue_start_with_letter(true)
            .with_year_range(1950, 2000)
            .with_volume_keywords(["v", "tome"])
            .with_remove_c2c(true)
            .with_remove_fcbd(true);

        assert!(config.split_words);
        assert!(config.remove_c2c);
        assert!(config.remove_fcbd);
        assert!(config.allow_issue_start_with_letter);
        assert_eq!(config.year_range, YearRange::new(1950, 2000));
        assert!(config.is_volume_keyword("TOME"));
        assert!(!config.is_volume_keyword("vol"));
    }

    #[test]
    fn keyword_lookups_ignore_case() {
        let config = ParserConfig::default();
        assert!(config.is_volume_keyword("Vol"));
        assert!(config.is_archive_extension("CBZ"));
        assert!(!config.is_archive_extension("mkv"));
        assert!(config.is_one_shot_word("TPB"));
    }

    #[test]
    fn from_json_fills_missing_keys() {
        let config = ParserConfig::from_json(r#"{"split_words": true}"#).unwrap();
        assert!(config.split_words);
        assert!(!config.remove_c2c);
        assert_eq!(config.volume_keywords, vec!["v", "vol", "volume"]);

        let config = ParserConfig::from_json(r#"{"remove_c2c": true, "remove_fcbd": true}"#).unwrap();
        assert!(config.remove_c2c);
        assert!(config.remove_fcbd);
    }

    #[test]
    fn from_json_rejects_inverted_range() {
        let err = ParserConfig::from_json(r#"{"year_range": {"min": 2000, "max": 1990}}"#)
            .unwrap_err();
        assert!(matches!(err, ComicnameError::InvalidConfig(_)));
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(ParserConfig::from_json("not json").is_err());
    }
}
