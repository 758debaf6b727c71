pub mod issue;
pub mod parsed;

pub use issue::IssueNumber;
pub use parsed::ParsedFilename;
