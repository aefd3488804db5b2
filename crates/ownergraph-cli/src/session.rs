//! A loaded corpus together with its derived indexes.
//!
//! The name index and reverse graph are built once and reused for every
//! query issued from the command line or the REPL.

use crate::cli::OwnersArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use ownergraph_domain::{
    build_name_index, build_reverse_graph_with, run_query, BuildDiagnostics, EntityId,
    NameIndex, OwnershipQuery, OwnershipReport, QueryError, ResolveError, ResolverOptions,
    ReverseOwnershipGraph,
};
use ownergraph_ingest::Corpus;
use tracing::{info, warn};

/// Everything needed to answer ownership queries.
pub struct Session {
    /// Entities, relations and load reports
    pub corpus: Corpus,
    /// Lowercased name lookup
    pub index: NameIndex,
    /// Target → owners edge index
    pub graph: ReverseOwnershipGraph,
    /// Counters from graph construction
    pub diagnostics: BuildDiagnostics,
    resolver: ResolverOptions,
    media_type_code: i64,
    default_target: Option<String>,
}

impl Session {
    /// Load the corpus files named in `config` and build the indexes.
    pub fn load(config: &Config) -> Result<Self> {
        let corpus = Corpus::load(&config.data.entities, &config.data.relations)?;
        Ok(Self::from_corpus(corpus, config))
    }

    /// Build the indexes over an already-loaded corpus.
    pub fn from_corpus(corpus: Corpus, config: &Config) -> Self {
        let index = build_name_index(&corpus.entities);
        let (graph, diagnostics) =
            build_reverse_graph_with(&corpus.entities, &corpus.relations, &config.graph);

        info!(
            "Session ready: {} entities, {} edges",
            corpus.entities.len(),
            graph.edge_count()
        );
        if corpus.entity_report.total_skipped() + corpus.relation_report.total_skipped() > 0 {
            warn!(
                "Corpus rows skipped: {} entity, {} relation",
                corpus.entity_report.total_skipped(),
                corpus.relation_report.total_skipped()
            );
        }

        Self {
            corpus,
            index,
            graph,
            diagnostics,
            resolver: config.resolver,
            media_type_code: config.query.media_type_code,
            default_target: config.query.default_target.clone(),
        }
    }

    /// Turn `owners` arguments into a query.
    pub fn build_query(&self, args: &OwnersArgs) -> Result<OwnershipQuery> {
        let name = args
            .name
            .as_deref()
            .or(self.default_target.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                CliError::InvalidInput(
                    "No entity name given and no query.default_target configured".to_string(),
                )
            })?;

        let query = OwnershipQuery::new(name);
        Ok(match (args.any_type, args.type_code) {
            (true, _) => query,
            (false, Some(code)) => query.with_type_code(code),
            (false, None) => query.with_type_code(self.media_type_code),
        })
    }

    /// Run an `owners` query and apply its display filters.
    pub fn owners(&self, args: &OwnersArgs) -> Result<OwnershipReport> {
        if let Some(min) = args.min_percent {
            if !(0.0..=100.0).contains(&min) {
                return Err(CliError::InvalidInput(
                    "--min-percent must be between 0 and 100".to_string(),
                ));
            }
        }

        let query = self.build_query(args)?;
        let mut report = run_query(
            &query,
            &self.corpus.entities,
            &self.index,
            &self.graph,
            &self.resolver,
        )
        .map_err(|e| self.describe_error(e))?;

        if let Some(min) = args.min_percent {
            report.retain_min_percent(min);
        }
        if let Some(limit) = args.limit {
            report.truncate(limit);
        }
        Ok(report)
    }

    /// Display name for an id, falling back to the bare id.
    pub fn display_name(&self, id: EntityId) -> String {
        self.corpus
            .entities
            .get(id)
            .map(|e| format!("{} ({})", e.name, id))
            .unwrap_or_else(|| id.to_string())
    }

    fn describe_error(&self, err: QueryError) -> CliError {
        match err {
            QueryError::Resolve(ResolveError::CycleDetected { path }) => {
                let names: Vec<String> = path.iter().map(|id| self.display_name(*id)).collect();
                CliError::Cycle(names.join(" → "))
            }
            other => CliError::Query(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ownergraph_domain::{Entity, EntityTable, Relation};

    fn corpus(relations: Vec<Relation>) -> Corpus {
        let entities: EntityTable = vec![
            Entity::new(1, "MediaX", "Média", 3),
            Entity::new(2, "HolderY", "Entreprise", 2),
            Entity::new(3, "HolderZ", "Personne physique", 1),
        ]
        .into_iter()
        .collect();

        Corpus {
            entities,
            relations,
            ..Corpus::default()
        }
    }

    fn session() -> Session {
        Session::from_corpus(
            corpus(vec![
                Relation::new(1, "HolderY", "70", "MediaX"),
                Relation::new(2, "HolderZ", "30", "MediaX"),
            ]),
            &Config::default(),
        )
    }

    #[test]
    fn test_owners_ranked() {
        let report = session()
            .owners(&OwnersArgs {
                name: Some("  mediax ".to_string()),
                ..OwnersArgs::default()
            })
            .unwrap();

        let ids: Vec<EntityId> = report.owners.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![EntityId(2), EntityId(3)]);
    }

    #[test]
    fn test_filters_applied() {
        let session = session();
        let report = session
            .owners(&OwnersArgs {
                name: Some("MediaX".to_string()),
                min_percent: Some(50.0),
                ..OwnersArgs::default()
            })
            .unwrap();
        assert_eq!(report.owners.len(), 1);

        let report = session
            .owners(&OwnersArgs {
                name: Some("MediaX".to_string()),
                limit: Some(0),
                ..OwnersArgs::default()
            })
            .unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_media_type_required_by_default() {
        let session = session();
        let err = session
            .owners(&OwnersArgs {
                name: Some("HolderY".to_string()),
                ..OwnersArgs::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Query(QueryError::TypeMismatch { expected: 3, .. })
        ));

        let report = session
            .owners(&OwnersArgs {
                name: Some("HolderY".to_string()),
                any_type: true,
                ..OwnersArgs::default()
            })
            .unwrap();
        // No recorded owner, so HolderY is its own final owner
        assert_eq!(report.owners.len(), 1);
        assert_eq!(report.owners[0].id, EntityId(2));
        assert!((report.owners[0].percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_target_used() {
        let mut config = Config::default();
        config.query.default_target = Some("MediaX".to_string());
        let session = Session::from_corpus(
            corpus(vec![Relation::new(1, "HolderY", "100", "MediaX")]),
            &config,
        );

        let report = session.owners(&OwnersArgs::default()).unwrap();
        assert_eq!(report.target.id, EntityId(1));

        let err = self::session().owners(&OwnersArgs::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_cycle_named() {
        let session = Session::from_corpus(
            corpus(vec![
                Relation::new(1, "HolderY", "50", "MediaX"),
                Relation::new(2, "MediaX", "50", "HolderY"),
            ]),
            &Config::default(),
        );

        let err = session
            .owners(&OwnersArgs {
                name: Some("MediaX".to_string()),
                ..OwnersArgs::default()
            })
            .unwrap_err();
        match err {
            CliError::Cycle(path) => {
                assert_eq!(path, "MediaX (1) → HolderY (2) → MediaX (1)");
            }
            other => panic!("Expected Cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_min_percent_out_of_range() {
        let err = session()
            .owners(&OwnersArgs {
                name: Some("MediaX".to_string()),
                min_percent: Some(150.0),
                ..OwnersArgs::default()
            })
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }
}
