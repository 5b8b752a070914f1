use assert_matches::assert_matches;
use camino::Utf8PathBuf;
use rusqlite::Connection;
use tempfile::TempDir;

use microarray_expression::catalog::{Catalog, SqliteCatalog};
use microarray_expression::domain::PlatformId;
use microarray_expression::error::MicroarrayError;

fn seed(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE platforms (uuid TEXT PRIMARY KEY, name TEXT NOT NULL);
         CREATE TABLE samples (
             uuid TEXT PRIMARY KEY,
             platform TEXT NOT NULL,
             array TEXT NOT NULL,
             name TEXT NOT NULL
         );
         INSERT INTO platforms VALUES ('hgu133', 'HG-U133 Plus 2'), ('hgu95', 'HG-U95Av2');
         INSERT INTO samples VALUES
             ('s1', 'hgu133', 'batch2', 'DLBCL_GCB_02'),
             ('s2', 'hgu133', 'batch1', 'DLBCL_ABC_01'),
             ('s3', 'hgu133', 'batch1', 'Naive_B_01'),
             ('s4', 'hgu133', 'batch1', 'dlbcl_gcb_01'),
             ('s5', 'hgu95', 'batch1', 'DLBCL_old'),
             ('s6', 'hgu133', 'batch3', 'CD_100%'),
             ('s7', 'hgu133', 'batch3', 'GCBX01');",
    )
    .unwrap();
}

fn catalog_file() -> (TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("samples.db")).unwrap();
    let conn = Connection::open(path.as_std_path()).unwrap();
    seed(&conn);
    drop(conn);
    (temp, path)
}

fn memory_catalog() -> SqliteCatalog {
    let conn = Connection::open_in_memory().unwrap();
    seed(&conn);
    SqliteCatalog::from_connection(conn)
}

fn platform(id: &str) -> PlatformId {
    id.parse().unwrap()
}

#[test]
fn platforms_are_ordered_by_name() {
    let (_temp, path) = catalog_file();
    let catalog = SqliteCatalog::open(&path).unwrap();

    let names = catalog
        .platforms()
        .unwrap()
        .into_iter()
        .map(|platform| platform.name)
        .collect::<Vec<_>>();

    assert_eq!(names, vec!["HG-U133 Plus 2", "HG-U95Av2"]);
}

#[test]
fn unknown_platform_is_reported() {
    let catalog = memory_catalog();

    let err = catalog.platform(&platform("nope")).unwrap_err();

    assert_matches!(err, MicroarrayError::PlatformNotFound(id) if id == "nope");
}

#[test]
fn list_samples_orders_by_name_within_platform() {
    let catalog = memory_catalog();

    let ids = catalog
        .list_samples(&platform("hgu133"))
        .unwrap()
        .into_iter()
        .map(|sample| sample.id.to_string())
        .collect::<Vec<_>>();

    assert_eq!(ids, vec!["s6", "s2", "s1", "s7", "s3", "s4"]);
}

#[test]
fn search_is_case_insensitive_and_ordered_by_array_then_name() {
    let catalog = memory_catalog();

    let samples = catalog.search_samples(&platform("hgu133"), "gcb").unwrap();
    let found = samples
        .iter()
        .map(|sample| (sample.array.as_str(), sample.name.as_str()))
        .collect::<Vec<_>>();

    assert_eq!(
        found,
        vec![
            ("batch1", "dlbcl_gcb_01"),
            ("batch2", "DLBCL_GCB_02"),
            ("batch3", "GCBX01"),
        ]
    );
}

#[test]
fn search_treats_wildcards_literally() {
    let catalog = memory_catalog();

    let percent = catalog.search_samples(&platform("hgu133"), "100%").unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].name, "CD_100%");

    let underscore = catalog.search_samples(&platform("hgu133"), "GCB_0").unwrap();
    let names = underscore
        .iter()
        .map(|sample| sample.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["dlbcl_gcb_01", "DLBCL_GCB_02"]);
}

#[test]
fn open_missing_database_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("samples.db")).unwrap();

    let result = SqliteCatalog::open(&path);

    assert_matches!(result, Err(MicroarrayError::NotFound { .. }));
}
