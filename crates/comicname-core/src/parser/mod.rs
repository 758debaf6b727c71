pub mod disambiguate;
pub mod extract;
pub mod filename;
pub mod tokenizer;

pub use disambiguate::TokenRole;
pub use extract::{CandidateSpan, FieldKind, Priority, RULES};
pub use filename::{parse_filename, FilenameParser};
pub use tokenizer::{NormalizedName, Token, TokenKind, Tokenizer};
