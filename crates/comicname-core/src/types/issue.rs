use std::fmt;

use serde::{Deserialize, Serialize};

/// Issue number split into its numeric part and trailing suffix.
///
/// The comics industry numbers issues in odd ways: `"12"`, `"12.1"`, `"0"`,
/// `"-1"`, `"5AU"`, `"100-2"`, `"½"`. The numeric part is always leading;
/// whatever follows it is kept verbatim as the suffix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueNumber {
    /// Leading numeric value, if the text starts with one.
    pub num: Option<f64>,
    /// Everything after the numeric part.
    pub suffix: String,
}

impl IssueNumber {
    /// Splits `text` into number and suffix.
    ///
    /// # Examples
    /// ```
    /// use comicname_core::types::IssueNumber;
    ///
    /// let issue = IssueNumber::parse("78.BEY");
    /// assert_eq!(issue.num, Some(78.0));
    /// assert_eq!(issue.suffix, ".BEY");
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::default();
        }

        let chars: Vec<char> = text.chars().collect();
        let start = usize::from(chars[0] == '-');

        let Some(&first) = chars.get(start) else {
            return Self {
                num: None,
                suffix: text.to_string(),
            };
        };
        if !(first.is_ascii_digit() || first == '.') {
            return Self {
                num: None,
                suffix: text.to_string(),
            };
        }

        let mut split = chars.len();
        let mut decimals = 0;
        for (idx, &c) in chars.iter().enumerate().skip(start) {
            if !(c.is_ascii_digit() || c == '.') {
                split = idx;
                break;
            }
            if c == '.' {
                decimals += 1;
                if decimals > 1 {
                    split = idx;
                    break;
                }
            }
        }

        // a trailing decimal point belongs to the suffix when more follows
        if split > 0 && chars[split - 1] == '.' && split != chars.len() {
            split -= 1;
        }
        // a bare minus sign is not a number
        if split == 1 && start == 1 {
            split = 0;
        }

        let numeric: String = chars[..split].iter().collect();
        let suffix: String = chars[split..].iter().collect();
        let num = if numeric.is_empty() || numeric == "-" || numeric == "." {
            None
        } else {
            numeric.parse::<f64>().ok()
        };

        Self { num, suffix }
    }

    /// Returns the float value, counting a `½` suffix as one half.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if self.suffix == "½" {
            return Some(self.num.unwrap_or(0.0) + 0.5);
        }
        self.num
    }

    /// Returns the truncated integer value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        self.num.map(|n| n.trunc() as i64)
    }

    /// Renders the issue with the integer part zero-padded to `pad` digits.
    ///
    /// # Examples
    /// ```
    /// use comicname_core::types::IssueNumber;
    ///
    /// assert_eq!(IssueNumber::parse("5AU").as_string(3), "005AU");
    /// assert_eq!(IssueNumber::parse("12.1").as_string(3), "012.1");
    /// ```
    #[must_use]
    pub fn as_string(&self, pad: usize) -> String {
        let Some(num) = self.num else {
            return self.suffix.clone();
        };

        let negative = num < 0.0;
        let magnitude = num.abs();
        let whole = magnitude.trunc();
        let whole_text = format!("{}", whole as i64);

        let mut rendered = if whole == magnitude {
            whole_text.clone()
        } else {
            format!("{magnitude}")
        };
        rendered.push_str(&self.suffix);

        let padding = pad.saturating_sub(whole_text.len());
        let mut out = String::with_capacity(rendered.len() + padding + 1);
        if negative {
            out.push('-');
        }
        out.extend(std::iter::repeat_n('0', padding));
        out.push_str(&rendered);
        out
    }
}

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string(0))
    }
}
