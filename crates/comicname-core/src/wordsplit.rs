//! # Word Splitter
//!
//! Dictionary-driven segmentation of glued words such as
//! `theamazingspiderman`. The dictionary is loaded once by the caller and
//! shared read-only between parser instances.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Word list shipped with the crate.
const BUILTIN_WORDS: &str = include_str!("../data/words.txt");

/// Immutable set of known words used by [`split`].
#[derive(Debug, Clone, Default)]
pub struct WordDictionary {
    words: HashSet<String>,
    max_len: usize,
}

impl WordDictionary {
    /// Builds a dictionary from any list of words. Blank entries and `#`
    /// comment lines are ignored; lookups are case-insensitive.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        let mut max_len = 0;
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            let lower = word.to_lowercase();
            max_len = max_len.max(lower.chars().count());
            set.insert(lower);
        }
        Self {
            words: set,
            max_len,
        }
    }

    /// The dictionary compiled into the crate.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_WORDS.lines())
    }

    /// Reads one word per line.
    ///
    /// # Errors
    ///
    /// Returns `ComicnameError::DictionaryLoad` if reading fails.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self::new(lines))
    }

    /// Loads a word list file.
    ///
    /// # Errors
    ///
    /// Returns `ComicnameError::DictionaryLoad` if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let dict = Self::from_reader(BufReader::new(File::open(path)?))?;
        debug!(path = %path.display(), words = dict.len(), "loaded word dictionary");
        Ok(dict)
    }

    /// Returns `true` if `word` is known (case-insensitive).
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Length in characters of the longest word.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

/// Splits `word` into dictionary words, preferring the longest prefix at each
/// step and backtracking when a choice leaves an unsplittable tail.
///
/// Either the returned pieces concatenate back to `word` exactly, or the
/// result is `[word]` unchanged.
///
/// # Examples
/// ```
/// use comicname_core::wordsplit::{split, WordDictionary};
///
/// let dict = WordDictionary::new(["the", "amazing", "spider", "man"]);
/// assert_eq!(split("TheAmazingSpiderMan", &dict), ["The", "Amazing", "Spider", "Man"]);
/// assert_eq!(split("xyzzy", &dict), ["xyzzy"]);
/// ```
pub fn split(word: &str, dict: &WordDictionary) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    if chars.is_empty() || dict.is_empty() {
        return vec![word.to_string()];
    }

    let mut dead = vec![false; chars.len()];
    let mut cuts = Vec::new();
    if !segment(&chars, 0, dict, &mut dead, &mut cuts) {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::with_capacity(cuts.len());
    let mut start = 0;
    for end in cuts {
        pieces.push(chars[start..end].iter().collect());
        start = end;
    }
    pieces
}

/// Depth-first search over cut points; `dead` memoizes positions from which
/// no segmentation exists.
fn segment(
    chars: &[char],
    pos: usize,
    dict: &WordDictionary,
    dead: &mut [bool],
    cuts: &mut Vec<usize>,
) -> bool {
    if pos == chars.len() {
        return true;
    }
    if dead[pos] {
        return false;
    }

    let longest = dict.max_len().min(chars.len() - pos);
    for len in (1..=longest).rev() {
        let end = pos + len;
        let candidate: String = chars[pos..end]
            .iter()
            .flat_map(|c| c.to_lowercase())
            .collect();
        if !dict.words.contains(&candidate) {
            continue;
        }
        cuts.push(end);
        if segment(chars, end, dict, dead, cuts) {
            return true;
        }
        cuts.pop();
    }

    dead[pos] = true;
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> WordDictionary {
        WordDictionary::new(["the", "amazing", "spider", "man", "a", "ab", "bc", "of"])
    }

    #[test]
    fn splits_glued_words() {
        assert_eq!(
            split("theamazingspiderman", &dict()),
            ["the", "amazing", "spider", "man"]
        );
    }

    #[test]
    fn preserves_input_case() {
        assert_eq!(split("SpiderMan", &dict()), ["Spider", "Man"]);
    }

    #[test]
    fn backtracks_when_longest_prefix_dead_ends() {
        // "ab" + "c" fails, "a" + "bc" succeeds
        assert_eq!(split("abc", &dict()), ["a", "bc"]);
    }

    #[test]
    fn unsplittable_word_is_returned_whole() {
        assert_eq!(split("spidermanx", &dict()), ["spidermanx"]);
        assert_eq!(split("", &dict()), [""]);
    }

    #[test]
    fn split_is_total_or_nothing() {
        let d = dict();
        for word in ["theman", "manofthe", "spidey", "abab", "ofx", "Amazing"] {
            let pieces = split(word, &d);
            let joined: String = pieces.concat();
            assert_eq!(joined, word, "lossy split for {word}");
            if pieces.len() > 1 {
                assert!(pieces.iter().all(|p| d.contains(p)), "garbled split for {word}");
            }
        }
    }

    #[test]
    fn empty_dictionary_never_splits() {
        let empty = WordDictionary::default();
        assert_eq!(split("theman", &empty), ["theman"]);
    }

    #[test]
    fn dictionary_skips_blanks_and_comments() {
        let d = WordDictionary::new(["# header", "", "  Word  "]);
        assert_eq!(d.len(), 1);
        assert!(d.contains("WORD"));
        assert_eq!(d.max_len(), 4);
    }

    #[test]
    fn from_reader_reads_lines() {
        let d = WordDictionary::from_reader("one\ntwo\n\nthree\n".as_bytes()).unwrap();
        assert_eq!(d.len(), 3);
        assert!(d.contains("three"));
    }

    #[test]
    fn load_missing_file_errors() {
        let err = WordDictionary::load("/nonexistent/comicname/words.txt").unwrap_err();
        assert!(matches!(err, crate::ComicnameError::DictionaryLoad(_)));
    }

    #[test]
    fn builtin_dictionary_splits_common_titles() {
        let d = WordDictionary::builtin();
        assert!(!d.is_empty());
        assert_eq!(split("wonderwoman", &d), ["wonder", "woman"]);
    }
}
