//! Integration tests for ownergraph-ingest
//!
//! These tests write corpus files to disk, load them and run a query over
//! the result.

use ownergraph_domain::{
    build_name_index, build_reverse_graph, run_query, EntityId, OwnershipQuery, ResolverOptions,
    MEDIA_TYPE_CODE,
};
use ownergraph_ingest::{Corpus, IngestError};
use std::fs;
use tempfile::TempDir;

const ENTITIES: &str = "id\tnom\ttypeLibelle\ttypeCode\n\
                        1\tMediaX\tMédia\t3\n\
                        2\tHolderY\tEntreprise\t2\n\
                        3\tHolderZ\tPersonne physique\t1\n";

const RELATIONS: &str = "id\torigine\tvaleur\tcible\tsource\n\
                         1\tHolderY\t70\tMediaX\tRegistre\n\
                         2\tHolderZ\t30\tMediaX\n\
                         3\tGhost\t10\tMediaX\n";

fn write_corpus(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let entities = dir.path().join("medias.tsv");
    let relations = dir.path().join("relations.tsv");
    fs::write(&entities, ENTITIES).unwrap();
    fs::write(&relations, RELATIONS).unwrap();
    (entities, relations)
}

#[test]
fn test_load_corpus_from_disk() {
    let dir = TempDir::new().unwrap();
    let (entities, relations) = write_corpus(&dir);

    let corpus = Corpus::load(&entities, &relations).unwrap();
    assert_eq!(corpus.entities.len(), 3);
    assert_eq!(corpus.relations.len(), 3);
    assert_eq!(corpus.entity_report.records_loaded, 3);
    assert_eq!(corpus.relation_report.rows_read, 3);
    assert_eq!(
        corpus.relations[0].provenance.source.as_deref(),
        Some("Registre")
    );
}

#[test]
fn test_loaded_corpus_answers_query() {
    let dir = TempDir::new().unwrap();
    let (entities, relations) = write_corpus(&dir);
    let corpus = Corpus::load(&entities, &relations).unwrap();

    let index = build_name_index(&corpus.entities);
    let graph = build_reverse_graph(&corpus.entities, &corpus.relations);
    let report = run_query(
        &OwnershipQuery::new("MediaX").with_type_code(MEDIA_TYPE_CODE),
        &corpus.entities,
        &index,
        &graph,
        &ResolverOptions::default(),
    )
    .unwrap();

    let ids: Vec<EntityId> = report.owners.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![EntityId(2), EntityId(3)]);
    assert!((report.owners[0].percent - 70.0).abs() < 1e-9);
    assert!((report.owners[1].percent - 30.0).abs() < 1e-9);
}

#[test]
fn test_missing_file_is_an_open_error() {
    let dir = TempDir::new().unwrap();
    let (entities, _) = write_corpus(&dir);
    let missing = dir.path().join("absent.tsv");

    let err = Corpus::load(&entities, &missing).unwrap_err();
    assert!(matches!(err, IngestError::Open { .. }));
    assert!(err.to_string().contains("absent.tsv"));
}
