//! Tab-delimited readers for entity and relation files

use crate::IngestError;
use ownergraph_domain::{Entity, EntityTable, Provenance, Relation};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Minimum number of columns for both entity and relation rows
const MIN_COLUMNS: usize = 4;

/// What happened while loading one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Header row as read
    pub header: Vec<String>,

    /// Data rows read (header excluded)
    pub rows_read: usize,

    /// Records kept
    pub records_loaded: usize,

    /// Rows with fewer than four columns
    pub skipped_short_rows: usize,

    /// Entity rows whose id is not an integer
    pub skipped_bad_ids: usize,

    /// Numeric fields that could not be parsed and were set to 0
    pub defaulted_numbers: usize,

    /// Entity rows that replaced an earlier row with the same id
    pub replaced_ids: usize,
}

impl LoadReport {
    /// Total rows dropped
    pub fn total_skipped(&self) -> usize {
        self.skipped_short_rows + self.skipped_bad_ids
    }
}

fn tsv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.delimiter(b'\t').flexible(true).has_headers(true);
    builder
}

fn open(path: &Path) -> Result<csv::Reader<File>, IngestError> {
    tsv_builder()
        .from_path(path)
        .map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn read_header<R: Read>(
    reader: &mut csv::Reader<R>,
    label: &Path,
    report: &mut LoadReport,
) -> Result<(), IngestError> {
    let header = reader.headers()?;
    if header.is_empty() {
        return Err(IngestError::MissingHeader {
            path: label.to_path_buf(),
        });
    }
    report.header = header.iter().map(str::to_string).collect();
    debug!("Header {}: {:?}", label.display(), report.header);
    Ok(())
}

fn parse_int(field: &str) -> Option<i64> {
    field.trim().parse().ok()
}

fn optional(record: &csv::StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Read the entity file at `path`
pub fn read_entities(path: impl AsRef<Path>) -> Result<(EntityTable, LoadReport), IngestError> {
    let path = path.as_ref();
    load_entities(open(path)?, path)
}

/// Read entities from any tab-delimited source
pub fn entities_from_reader<R: Read>(reader: R) -> Result<(EntityTable, LoadReport), IngestError> {
    load_entities(tsv_builder().from_reader(reader), &PathBuf::from("<reader>"))
}

fn load_entities<R: Read>(
    mut reader: csv::Reader<R>,
    label: &Path,
) -> Result<(EntityTable, LoadReport), IngestError> {
    let mut report = LoadReport::default();
    read_header(&mut reader, label, &mut report)?;

    let mut entities = EntityTable::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        report.rows_read += 1;

        if record.len() < MIN_COLUMNS {
            debug!("Skipping entity row {}: {} columns", idx + 1, record.len());
            report.skipped_short_rows += 1;
            continue;
        }

        let Some(id) = parse_int(&record[0]) else {
            debug!("Skipping entity row {}: bad id {:?}", idx + 1, &record[0]);
            report.skipped_bad_ids += 1;
            continue;
        };
        let type_code = parse_int(&record[3]).unwrap_or_else(|| {
            report.defaulted_numbers += 1;
            0
        });

        if entities
            .insert(Entity::new(id, &record[1], &record[2], type_code))
            .is_some()
        {
            report.replaced_ids += 1;
        }
    }

    report.records_loaded = entities.len();
    info!(
        "Loaded {} entities from {} ({} rows skipped)",
        report.records_loaded,
        label.display(),
        report.total_skipped()
    );
    if report.replaced_ids > 0 {
        warn!(
            "{} entity rows in {} reused an earlier id; the last row wins",
            report.replaced_ids,
            label.display()
        );
    }

    Ok((entities, report))
}

/// Read the relation file at `path`
pub fn read_relations(path: impl AsRef<Path>) -> Result<(Vec<Relation>, LoadReport), IngestError> {
    let path = path.as_ref();
    load_relations(open(path)?, path)
}

/// Read relations from any tab-delimited source
pub fn relations_from_reader<R: Read>(
    reader: R,
) -> Result<(Vec<Relation>, LoadReport), IngestError> {
    load_relations(tsv_builder().from_reader(reader), &PathBuf::from("<reader>"))
}

fn load_relations<R: Read>(
    mut reader: csv::Reader<R>,
    label: &Path,
) -> Result<(Vec<Relation>, LoadReport), IngestError> {
    let mut report = LoadReport::default();
    read_header(&mut reader, label, &mut report)?;

    let mut relations = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        report.rows_read += 1;

        if record.len() < MIN_COLUMNS {
            debug!("Skipping relation row {}: {} columns", idx + 1, record.len());
            report.skipped_short_rows += 1;
            continue;
        }

        let id = parse_int(&record[0]).unwrap_or_else(|| {
            report.defaulted_numbers += 1;
            0
        });

        let relation = Relation::new(id, &record[1], &record[2], &record[3]).with_provenance(
            Provenance {
                source: optional(&record, 4),
                published_on: optional(&record, 5),
                consulted_on: optional(&record, 6),
            },
        );
        relations.push(relation);
    }

    report.records_loaded = relations.len();
    info!(
        "Loaded {} relations from {} ({} rows skipped)",
        report.records_loaded,
        label.display(),
        report.total_skipped()
    );

    Ok((relations, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ownergraph_domain::{EntityId, MEDIA_TYPE_CODE};

    #[test]
    fn test_entities_parsed() {
        let data = "id\tnom\ttypeLibelle\ttypeCode\n\
                    1\tTélérama\tMédia\t3\n\
                    2\tGroupe Le Monde\tEntreprise\t2\n";
        let (entities, report) = entities_from_reader(data.as_bytes()).unwrap();

        assert_eq!(entities.len(), 2);
        assert_eq!(report.header, vec!["id", "nom", "typeLibelle", "typeCode"]);
        assert_eq!(report.rows_read, 2);
        let telerama = entities.get(EntityId(1)).unwrap();
        assert_eq!(telerama.name, "Télérama");
        assert_eq!(telerama.type_code, MEDIA_TYPE_CODE);
    }

    #[test]
    fn test_entity_shape_checks() {
        let data = "id\tnom\ttypeLibelle\ttypeCode\n\
                    1\tShort row\n\
                    abc\tBad id\tEntreprise\t2\n\
                    3\tNo code\tEntreprise\t?\n\
                    4\tExtra columns\tEntreprise\t2\textra\n";
        let (entities, report) = entities_from_reader(data.as_bytes()).unwrap();

        assert_eq!(entities.len(), 2);
        assert_eq!(report.skipped_short_rows, 1);
        assert_eq!(report.skipped_bad_ids, 1);
        assert_eq!(report.defaulted_numbers, 1);
        assert_eq!(entities.get(EntityId(3)).map(|e| e.type_code), Some(0));
        assert_eq!(report.total_skipped(), 2);
    }

    #[test]
    fn test_duplicate_entity_id_last_wins() {
        let data = "id\tnom\ttypeLibelle\ttypeCode\n\
                    1\tFirst\tMédia\t3\n\
                    1\tSecond\tMédia\t3\n";
        let (entities, report) = entities_from_reader(data.as_bytes()).unwrap();

        assert_eq!(entities.len(), 1);
        assert_eq!(report.replaced_ids, 1);
        assert_eq!(entities.get(EntityId(1)).unwrap().name, "Second");
    }

    #[test]
    fn test_relations_with_optional_columns() {
        let data = "id\torigine\tvaleur\tcible\tsource\tdatePublication\tdateConsultation\n\
                    1\tXavier Niel\t>50\tLe Monde Libre\n\
                    2\tLVMH\t100\tLe Parisien\thttps://example.org\t2019-01-01\n\
                    3\tA\tcontrôle\tB\t\t2020-02-02\t2024-03-03\n\
                    4\ttoo short\n";
        let (relations, report) = relations_from_reader(data.as_bytes()).unwrap();

        assert_eq!(relations.len(), 3);
        assert_eq!(report.skipped_short_rows, 1);

        assert_eq!(relations[0].stake, ">50");
        assert!(relations[0].provenance.is_empty());

        assert_eq!(relations[1].provenance.source.as_deref(), Some("https://example.org"));
        assert_eq!(relations[1].provenance.published_on.as_deref(), Some("2019-01-01"));
        assert_eq!(relations[1].provenance.consulted_on, None);

        assert_eq!(relations[2].provenance.source, None);
        assert_eq!(relations[2].provenance.consulted_on.as_deref(), Some("2024-03-03"));
    }

    #[test]
    fn test_relation_bad_id_defaults_to_zero() {
        let data = "id\torigine\tvaleur\tcible\n\
                    x\tA\t10\tB\n";
        let (relations, report) = relations_from_reader(data.as_bytes()).unwrap();

        assert_eq!(relations[0].id, 0);
        assert_eq!(report.defaulted_numbers, 1);
    }

    #[test]
    fn test_empty_input_is_missing_header() {
        let err = entities_from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MissingHeader { .. }));
    }
}
