//! Retrieval: collection lifecycle and question answering

pub mod collection;
pub mod query;

pub use collection::{CollectionManager, CollectionState};
pub use query::QueryPipeline;
