//! XML support: extension element builder, metadata writer and exclusive
//! canonicalization.

pub mod c14n;
mod element;
mod writer;

pub use c14n::canonicalize;
pub use element::*;
pub use writer::write_entity_descriptor;
pub(crate) use writer::escape_text;
