//! Relation module - pairwise ownership facts as written in the source data

use serde::{Deserialize, Serialize};

/// Where a relation was reported and when
///
/// Carried with every relation but never used by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Source citation (article, filing, registry URL...)
    pub source: Option<String>,

    /// Publication date of the source, as written
    pub published_on: Option<String>,

    /// Date the source was consulted, as written
    pub consulted_on: Option<String>,
}

impl Provenance {
    /// Whether no provenance field is set
    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.published_on.is_none() && self.consulted_on.is_none()
    }
}

/// A directed ownership or participation fact: `origin` holds `stake` of `target`
///
/// Parties are referenced by name, not id. Names are resolved against the
/// entity set when the reverse graph is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation identifier from the source file
    pub id: i64,

    /// Name of the owning party
    pub origin: String,

    /// Raw stake token ("51", ">50", "contrôle", ...)
    pub stake: String,

    /// Name of the owned party
    pub target: String,

    /// Source metadata
    #[serde(default)]
    pub provenance: Provenance,
}

impl Relation {
    /// Create a relation without provenance
    pub fn new(
        id: i64,
        origin: impl Into<String>,
        stake: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id,
            origin: origin.into(),
            stake: stake.into(),
            target: target.into(),
            provenance: Provenance::default(),
        }
    }

    /// Attach provenance metadata
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_creation() {
        let rel = Relation::new(7, "Vincent Bolloré", "contrôle", "Vivendi");
        assert_eq!(rel.id, 7);
        assert_eq!(rel.origin, "Vincent Bolloré");
        assert_eq!(rel.target, "Vivendi");
        assert!(rel.provenance.is_empty());
    }

    #[test]
    fn test_with_provenance() {
        let rel = Relation::new(1, "A", "50", "B").with_provenance(Provenance {
            source: Some("Rapport annuel".to_string()),
            published_on: Some("2023-04-01".to_string()),
            consulted_on: None,
        });

        assert!(!rel.provenance.is_empty());
        assert_eq!(rel.provenance.source.as_deref(), Some("Rapport annuel"));
    }
}
