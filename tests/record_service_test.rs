//! Tests for RecordService: CSV ingestion and normalisation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use scaletree::application::services::{parse_records, RecordService};
use scaletree::application::ApplicationError;
use scaletree::domain::{Rank, TaxonRecord};
use scaletree::infrastructure::traits::RealFileSystem;

/// Helper to create temp CSV files for testing
fn create_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write csv file");
    path
}

fn service() -> RecordService {
    RecordService::new(Arc::new(RealFileSystem))
}

#[test]
fn given_spreadsheet_export_when_loading_then_records_are_normalised() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_csv(
        &temp,
        "scales.csv",
        "Unnamed: 0,Family,Sub Family,Tribe,Genus,Species,Wing Colour\n\
         0,Nymphalidae,Heliconiinae,Heliconiini,Heliconius,Erato Petiverana,orange\n\
         1,Pieridae,NaN,,Pieris,none,white\n",
    );

    // Act
    let table = service().load(&path).unwrap();

    // Assert
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.rows()[0],
        TaxonRecord::from_raw(
            "nymphalidae",
            "heliconiinae",
            "heliconiini",
            "heliconius",
            "eratopetiverana"
        )
    );
    let second = &table.rows()[1];
    assert_eq!(second.family.as_deref(), Some("pieridae"));
    assert_eq!(second.subfamily, None);
    assert_eq!(second.tribe, None);
    assert_eq!(second.genus.as_deref(), Some("pieris"));
    assert_eq!(second.species, None);
}

#[test]
fn given_short_row_when_parsing_then_missing_cells_are_sentinels() {
    let content = "family,subfamily,tribe,genus,species\npieridae,,,g1\n";

    let table = parse_records(content, Path::new("inline.csv")).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].get(Rank::Genus), Some("g1"));
    assert_eq!(table.rows()[0].get(Rank::Species), None);
}

#[test]
fn given_columns_in_any_order_when_parsing_then_mapped_by_name() {
    let content = "Species,Genus,Tribe,Subfamily,Family\ns1,g1,,,pieridae\n";

    let table = parse_records(content, Path::new("inline.csv")).unwrap();

    assert_eq!(table.rows()[0].get(Rank::Family), Some("pieridae"));
    assert_eq!(table.rows()[0].get(Rank::Species), Some("s1"));
}

#[test]
fn given_missing_species_column_when_parsing_then_missing_column_error() {
    let content = "family,subfamily,tribe,genus\npieridae,,,g1\n";

    let err = parse_records(content, Path::new("inline.csv")).unwrap_err();

    match err {
        ApplicationError::MissingColumn { column, .. } => assert_eq!(column, "species"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_header_only_when_parsing_then_table_is_empty() {
    let content = "family,subfamily,tribe,genus,species\n";

    let table = parse_records(content, Path::new("inline.csv")).unwrap();

    assert!(table.is_empty());
}

#[test]
fn given_nonexistent_file_when_loading_then_input_not_found() {
    let temp = TempDir::new().unwrap();

    let result = service().load(&temp.path().join("missing.csv"));

    assert!(matches!(result, Err(ApplicationError::InputNotFound(_))));
}

#[test]
fn given_directory_when_loading_then_io_error() {
    let temp = TempDir::new().unwrap();

    let result = service().load(temp.path());

    assert!(matches!(result, Err(ApplicationError::Io { .. })));
}
