// Layout reconstruction for page-description documents.
// Decoders push positioned fragments; the reconstructor sorts them into lines.

pub mod fragment;
pub mod pdf;
pub mod reconstruct;

pub use fragment::PositionedFragment;
pub use pdf::{PageDecoder, PdfExtractDecoder};
pub use reconstruct::{reconstruct_text, LayoutReconstructor};
