//! # Filename Parser
//!
//! The single entry point tying the pipeline together:
//! tokenizer → extractors → disambiguator.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::error::{ComicnameError, Result};
use crate::parser::disambiguate;
use crate::parser::extract::{CandidateSpan, Extractors};
use crate::parser::tokenizer::{NormalizedName, Tokenizer};
use crate::types::ParsedFilename;
use crate::wordsplit::WordDictionary;

/// Comic archive filename parser.
///
/// Holds only immutable state, so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct FilenameParser {
    config: ParserConfig,
    tokenizer: Tokenizer,
    extractors: Extractors,
}

impl FilenameParser {
    /// Create a new parser with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ComicnameError::InvalidConfig` if the configuration is
    /// inconsistent, or `ComicnameError::RegexError` if a pattern built from
    /// it fails to compile.
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tokenizer: Tokenizer::new(&config)?,
            extractors: Extractors::new(&config)?,
            config,
        })
    }

    /// Create a new parser with default configuration.
    pub fn default() -> Result<Self> {
        Self::new(ParserConfig::default())
    }

    /// Attach the word dictionary used when `split_words` is enabled.
    /// Without one, word splitting is skipped.
    pub fn with_dictionary(mut self, dictionary: Arc<WordDictionary>) -> Self {
        self.tokenizer = self.tokenizer.with_dictionary(dictionary);
        self
    }

    /// Parse a filename. Never fails: empty input yields an empty record and
    /// a name with no recognizable fields becomes all series.
    ///
    /// # Examples
    /// ```
    /// use comicname_core::FilenameParser;
    ///
    /// let parser = FilenameParser::default().unwrap();
    /// let parsed = parser.parse("Amazing Spider-Man v2 #45 (of 50) (1999).cbr");
    ///
    /// assert_eq!(parsed.series, "Amazing Spider-Man");
    /// assert_eq!(parsed.volume, "2");
    /// assert_eq!(parsed.issue, "45");
    /// assert_eq!(parsed.issue_count, "50");
    /// assert_eq!(parsed.year, "1999");
    /// ```
    pub fn parse(&self, filename: &str) -> ParsedFilename {
        if filename.trim().is_empty() {
            return ParsedFilename::default();
        }

        let name = self.tokenizer.normalize(filename);
        let candidates = self.extractors.run_all(&name);
        debug!(
            filename,
            tokens = name.tokens.len(),
            candidates = candidates.len(),
            "parsing filename"
        );
        trace!(normalized = %name.text(), "normalized tokens");
        disambiguate::assemble(&name, candidates, &self.config)
    }

    /// Like [`parse`](Self::parse), but reports empty input.
    ///
    /// # Errors
    ///
    /// Returns `ComicnameError::EmptyInput` if the input is empty or whitespace-only.
    pub fn try_parse(&self, filename: &str) -> Result<ParsedFilename> {
        if filename.trim().is_empty() {
            return Err(ComicnameError::EmptyInput);
        }
        Ok(self.parse(filename))
    }

    /// The normalized token stream for a filename.
    pub fn normalize(&self, filename: &str) -> NormalizedName {
        self.tokenizer.normalize(filename)
    }

    /// Every candidate span proposed for a filename, before disambiguation.
    pub fn candidates(&self, filename: &str) -> Vec<CandidateSpan> {
        self.extractors.run_all(&self.tokenizer.normalize(filename))
    }

    /// Get the parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

/// Convenience function to parse a filename with default settings.
///
/// # Errors
///
/// Returns `ComicnameError::EmptyInput` for empty input.
pub fn parse_filename(filename: &str) -> Result<ParsedFilename> {
    FilenameParser::default()?.try_parse(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> FilenameParser {
        FilenameParser::new(ParserConfig::default().with_year_range(1900, 2030)).unwrap()
    }

    #[test]
    fn test_parser_creation() {
        assert!(FilenameParser::default().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ParserConfig::default();
        config.volume_keywords = vec!["v".into(), " ".into()];
        let err = FilenameParser::new(config).unwrap_err();
        assert!(matches!(err, ComicnameError::InvalidConfig(_)));
    }

    #[test]
    fn test_batman() {
        let parsed = parser().parse("Batman 023 (2020).cbz");
        assert_eq!(parsed.series, "Batman");
        assert_eq!(parsed.issue, "023");
        assert_eq!(parsed.year, "2020");
        assert_eq!(parsed.volume, "");
        assert_eq!(parsed.remainder, "");
    }

    #[test]
    fn test_no_fields() {
        let parsed = parser().parse("UnknownTitleNoFields.cbz");
        assert_eq!(
            parsed,
            ParsedFilename {
                series: "UnknownTitleNoFields".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_decimal_issue() {
        let parsed = parser().parse("Series Name 12.1 (2015).cbz");
        assert_eq!(parsed.series, "Series Name");
        assert_eq!(parsed.issue, "12.1");
        assert_eq!(parsed.year, "2015");
    }

    #[test]
    fn test_parse_empty() {
        let parser = parser();
        assert!(parser.parse("").is_empty());
        assert!(parser.parse("   ").is_empty());
        assert!(matches!(parser.try_parse(" "), Err(ComicnameError::EmptyInput)));
    }

    #[test]
    fn test_delimiter_only_input() {
        let parsed = parser().parse("._-_.cbz");
        assert_eq!(parsed.series, "");
        assert_eq!(parsed.issue, "");
    }

    #[test]
    fn test_path_is_ignored() {
        let parsed = parser().parse("/library/DC/Batman 023 (2020).cbz");
        assert_eq!(parsed.series, "Batman");
        let parsed = parser().parse(r"C:\comics\Batman 023 (2020).cbz");
        assert_eq!(parsed.series, "Batman");
    }

    #[test]
    fn test_split_words_with_dictionary() {
        let config = ParserConfig::default()
            .with_year_range(1900, 2030)
            .with_split_words(true);
        let dictionary = Arc::new(WordDictionary::new(["wonder", "woman"]));
        let parser = FilenameParser::new(config).unwrap().with_dictionary(dictionary);

        let parsed = parser.parse("WonderWoman023 (2021).cbz");
        assert_eq!(parsed.series, "Wonder Woman");
        assert_eq!(parsed.issue, "023");
        assert_eq!(parsed.year, "2021");
    }

    #[test]
    fn test_candidates_exposed() {
        let candidates = parser().candidates("Batman 023 (2020).cbz");
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_parse_convenience_function() {
        let parsed = parse_filename("Goblin (2021) (digital) (Son of Ultron-Empire).cbr").unwrap();
        assert_eq!(parsed.series, "Goblin");
        assert_eq!(parsed.year, "2021");
        assert_eq!(parsed.remainder, "(digital) (Son of Ultron-Empire)");
        assert!(parse_filename("").is_err());
    }

    #[test]
    fn test_removal_options_reach_the_disambiguator() {
        let config = ParserConfig::default()
            .with_year_range(1900, 2030)
            .with_remove_c2c(true);
        let parsed = FilenameParser::new(config)
            .unwrap()
            .parse("Monster_Island_v1_#2__repaired__c2c.cbz");
        assert_eq!(parsed.remainder, "repaired");
        assert!(parsed.c2c);
    }

    #[test]
    fn test_parser_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FilenameParser>();
    }
}
