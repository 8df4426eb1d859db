pub mod document;
pub mod record;

pub use document::{DocumentMetadata, ExtractionHandoff, ParseSummary, ParsedDocument};
pub use record::{EducationItem, ExperienceItem, ExtractedRecord};
