//! Resume intake core: turns an uploaded PDF or Word document into linear
//! text plus a best-effort structured record.

pub mod config;
pub mod container;
pub mod dispatch;
pub mod errors;
pub mod extraction;
pub mod intake;
pub mod layout;
pub mod models;
pub mod runtime;

pub use config::{Config, ParserConfig};
pub use dispatch::{parse, parse_with_contact, DocumentKind, ResumeParser};
pub use errors::ParseError;
pub use extraction::ContactHints;
pub use models::{
    DocumentMetadata, EducationItem, ExperienceItem, ExtractedRecord, ExtractionHandoff,
    ParseSummary, ParsedDocument,
};
