//! Document library backed by the document store and the vector index

mod library;

pub use library::{upload_basename, validate_filename, DocumentLibrary, UPLOAD_MESSAGE};
