use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;

use crate::domain::{PlatformId, SampleId};
use crate::error::MicroarrayError;

pub const METADATA_FILE: &str = "meta.tsv";
pub const CATALOG_FILE: &str = "samples.db";

/// Path layout of a microarray data root:
///
/// ```text
/// <root>/samples.db
/// <root>/<platform>/meta.tsv
/// <root>/<platform>/<sample>.tsv
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    root: Utf8PathBuf,
}

impl Store {
    pub fn new() -> Result<Self, MicroarrayError> {
        Ok(Self {
            root: default_data_dir()?,
        })
    }

    pub fn new_with_root(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn catalog_path(&self) -> Utf8PathBuf {
        self.root.join(CATALOG_FILE)
    }

    pub fn platform_dir(&self, platform: &PlatformId) -> Utf8PathBuf {
        self.root.join(platform.as_str())
    }

    pub fn metadata_path(&self, platform: &PlatformId) -> Utf8PathBuf {
        metadata_path(&self.platform_dir(platform))
    }

    pub fn sample_path(&self, platform: &PlatformId, sample: &SampleId) -> Utf8PathBuf {
        sample_path(&self.platform_dir(platform), sample)
    }

    pub fn platform_exists(&self, platform: &PlatformId) -> bool {
        self.platform_dir(platform).as_std_path().is_dir()
    }
}

pub fn metadata_path(platform_dir: &Utf8Path) -> Utf8PathBuf {
    platform_dir.join(METADATA_FILE)
}

pub fn sample_path(platform_dir: &Utf8Path, sample: &SampleId) -> Utf8PathBuf {
    platform_dir.join(format!("{}.tsv", sample.as_str()))
}

pub fn default_data_dir() -> Result<Utf8PathBuf, MicroarrayError> {
    BaseDirs::new()
        .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.data_dir().join("microarray")).ok())
        .ok_or_else(|| MicroarrayError::Io {
            path: Utf8PathBuf::from("~"),
            message: "unable to resolve data directory".to_string(),
        })
}
