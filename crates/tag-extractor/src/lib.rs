//! Tagged-output extraction for generative-model responses.
//!
//! Model output arrives as plain text with named fields embedded in
//! `<TAG>...</TAG>` markup. A [`FieldSchema`] declares, in order, which tags
//! an extraction call expects and which of them are required;
//! [`extract`] recovers them or fails with the first missing required tag.

pub mod errors;
pub mod extract;
pub mod schema;

pub use errors::ExtractionError;
pub use extract::{extract, ExtractedFields};
pub use schema::{section_tag, FieldDef, FieldSchema};
