use serde::{Deserialize, Serialize};

/// The primary output of the filename parser.
///
/// Every field is a plain string so downstream tag writers can tell "not
/// found" (empty) from a real value without guessing. Fields the parser could
/// not find stay empty and are never defaulted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedFilename {
    /// Best-guess series title, trimmed and separator-normalized.
    pub series: String,

    /// Volume designator digits, as found.
    pub volume: String,

    /// Issue number as found (leading zeros and suffixes preserved).
    pub issue: String,

    /// Total issue count from an "N of M" pattern.
    pub issue_count: String,

    /// Four-digit publication year.
    pub year: String,

    /// Unclaimed bracket tags and text, in original order.
    pub remainder: String,

    /// The title body names an annual.
    #[serde(default)]
    pub annual: bool,

    /// A cover-to-cover (`c2c`) scan marker is present.
    #[serde(default)]
    pub c2c: bool,

    /// A Free Comic Book Day marker is present.
    #[serde(default)]
    pub fcbd: bool,
}

impl ParsedFilename {
    /// Returns `true` if no field was filled at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
            && self.volume.is_empty()
            && self.issue.is_empty()
            && self.issue_count.is_empty()
            && self.year.is_empty()
            && self.remainder.is_empty()
    }

    /// Returns `true` if anything beyond the series title was extracted.
    #[must_use]
    pub fn has_metadata(&self) -> bool {
        !self.volume.is_empty()
            || !self.issue.is_empty()
            || !self.issue_count.is_empty()
            || !self.year.is_empty()
    }
}

impl std::fmt::Display for ParsedFilename {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParsedFilename(series={:?}", self.series)?;
        if !self.volume.is_empty() {
            write!(f, ", volume={}", self.volume)?;
        }
        if !self.issue.is_empty() {
            write!(f, ", issue={}", self.issue)?;
        }
        if !self.issue_count.is_empty() {
            write!(f, ", of={}", self.issue_count)?;
        }
        if !self.year.is_empty() {
            write!(f, ", year={}", self.year)?;
        }
        if !self.remainder.is_empty() {
            write!(f, ", remainder={:?}", self.remainder)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_empty() {
        let parsed = ParsedFilename::default();
        assert!(parsed.is_empty());
        assert!(!parsed.has_metadata());
    }

    #[test]
    fn series_only_has_no_metadata() {
        let parsed = ParsedFilename {
            series: "Goblin".into(),
            ..Default::default()
        };
        assert!(!parsed.is_empty());
        assert!(!parsed.has_metadata());
    }

    #[test]
    fn display_lists_filled_fields() {
        let parsed = ParsedFilename {
            series: "Batman".into(),
            issue: "023".into(),
            year: "2020".into(),
            ..Default::default()
        };
        let display = parsed.to_string();
        assert!(display.contains("\"Batman\""));
        assert!(display.contains("issue=023"));
        assert!(display.contains("year=2020"));
        assert!(!display.contains("volume"));
    }

    #[test]
    fn flags_default_when_missing_from_json() {
        let json = r#"{"series":"X","volume":"","issue":"1","issue_count":"","year":"","remainder":""}"#;
        let parsed: ParsedFilename = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.issue, "1");
        assert!(!parsed.c2c);
        assert!(!parsed.fcbd);
        assert!(!parsed.annual);
    }
}
