use std::io::Write;

use assert_matches::assert_matches;

use microarray_expression::config::{Config, ConfigLoader};
use microarray_expression::domain::ParsePolicy;
use microarray_expression::error::MicroarrayError;

#[test]
fn resolve_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"data_dir": "/srv/microarray", "parse_policy": "nan", "parallel": true}}"#
    )
    .unwrap();

    let resolved = ConfigLoader::resolve(Some(file.path().to_str().unwrap())).unwrap();

    assert_eq!(resolved.data_dir, "/srv/microarray");
    assert_eq!(resolved.parse_policy, ParsePolicy::Nan);
    assert!(resolved.parallel);
    assert!(!resolved.verify_probe_ids);
    assert_eq!(resolved.assembler().policy(), ParsePolicy::Nan);
    assert_eq!(resolved.store().root(), "/srv/microarray");
}

#[test]
fn unknown_policy_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"parse_policy": "guess"}}"#).unwrap();

    let err = ConfigLoader::resolve(Some(file.path().to_str().unwrap())).unwrap_err();

    assert_matches!(err, MicroarrayError::ConfigParse(_));
}

#[test]
fn unreadable_config_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = ConfigLoader::resolve(Some(path.to_str().unwrap())).unwrap_err();

    assert_matches!(err, MicroarrayError::ConfigRead(_));
}

#[test]
fn explicit_flags_override_defaults() {
    let config = Config {
        data_dir: Some("/data".into()),
        parse_policy: Some(ParsePolicy::Zero),
        verify_probe_ids: Some(true),
        parallel: None,
    };

    let resolved = ConfigLoader::resolve_config(config).unwrap();

    assert_eq!(resolved.parse_policy, ParsePolicy::Zero);
    assert!(resolved.verify_probe_ids);
    assert!(!resolved.parallel);
}
