//! A loaded corpus: both collections plus their load reports

use crate::{read_entities, read_relations, IngestError, LoadReport};
use ownergraph_domain::{EntityTable, Relation};
use std::path::Path;

/// Entities and relations read from disk
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// Entity table
    pub entities: EntityTable,
    /// Relations, in file order
    pub relations: Vec<Relation>,
    /// Report for the entity file
    pub entity_report: LoadReport,
    /// Report for the relation file
    pub relation_report: LoadReport,
}

impl Corpus {
    /// Load both corpus files
    pub fn load(
        entities_path: impl AsRef<Path>,
        relations_path: impl AsRef<Path>,
    ) -> Result<Self, IngestError> {
        let (entities, entity_report) = read_entities(entities_path)?;
        let (relations, relation_report) = read_relations(relations_path)?;

        Ok(Self {
            entities,
            relations,
            entity_report,
            relation_report,
        })
    }
}
