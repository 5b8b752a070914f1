use camino::Utf8PathBuf;

use microarray_expression::domain::{PlatformId, SampleId};
use microarray_expression::store::Store;

#[test]
fn layout_paths() {
    let store = Store::new_with_root(Utf8PathBuf::from("/data/microarray"));
    let platform: PlatformId = "hgu133".parse().unwrap();
    let sample: SampleId = "0c3b8a19-1975-4c6e-aece-44a59c71719d".parse().unwrap();

    assert!(store.catalog_path().ends_with("samples.db"));
    assert_eq!(store.platform_dir(&platform), "/data/microarray/hgu133");
    assert!(store.metadata_path(&platform).ends_with("hgu133/meta.tsv"));
    assert!(
        store
            .sample_path(&platform, &sample)
            .ends_with("hgu133/0c3b8a19-1975-4c6e-aece-44a59c71719d.tsv")
    );
}

#[test]
fn platform_exists_checks_directory() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    std::fs::create_dir(root.join("hgu133")).unwrap();
    let store = Store::new_with_root(root);

    assert!(store.platform_exists(&"hgu133".parse().unwrap()));
    assert!(!store.platform_exists(&"hgu95".parse().unwrap()));
}
