//! # Comicname Core
//!
//! Heuristic metadata extraction from comic archive filenames. Turns names
//! like `Amazing Spider-Man v2 #45 (of 50) (1999).cbr` into a structured
//! [`ParsedFilename`] (series, volume, issue, issue count, year and
//! remainder), and renders records back into clean names.
//!
//! ## Quick Start
//!
//! ```rust
//! use comicname_core::FilenameParser;
//!
//! let parser = FilenameParser::default().unwrap();
//! let parsed = parser.parse("Batman 023 (2020) (digital).cbz");
//!
//! assert_eq!(parsed.series, "Batman");
//! assert_eq!(parsed.issue, "023");
//! assert_eq!(parsed.year, "2020");
//! assert_eq!(parsed.remainder, "(digital)");
//! ```
pub mod config;
pub mod error;
pub mod parser;
pub mod rename;
pub mod types;
pub mod wordsplit;

// Re-export primary API
pub use config::{ParserConfig, YearRange};
pub use error::{ComicnameError, Result};
pub use parser::{parse_filename, FilenameParser, NormalizedName, Tokenizer};
pub use rename::FileRenamer;
pub use types::{IssueNumber, ParsedFilename};
pub use wordsplit::WordDictionary;
