//! Ownergraph Ingestion Layer
//!
//! Reads the two tab-delimited corpus files into the domain collections.
//!
//! # File formats
//!
//! Both files start with a header row and may have rows of varying width.
//!
//! - Entities: `id, name, type_label, type_code`
//! - Relations: `id, origin, stake, target[, source[, published_on[, consulted_on]]]`
//!
//! Rows that are too short, or entities with a non-integer id, are skipped
//! and counted in a [`LoadReport`]. Only failing to open or decode a file is
//! an error.
//!
//! # Examples
//!
//! ```no_run
//! use ownergraph_ingest::Corpus;
//!
//! let corpus = Corpus::load(
//!     "data/medias_francais.tsv",
//!     "data/relations_medias_francais.tsv",
//! ).unwrap();
//! println!("{} entities, {} relations", corpus.entities.len(), corpus.relations.len());
//! ```

#![warn(missing_docs)]

mod corpus;
mod error;
mod reader;

pub use corpus::Corpus;
pub use error::IngestError;
pub use reader::{
    entities_from_reader, read_entities, read_relations, relations_from_reader, LoadReport,
};
