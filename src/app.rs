use tracing::{info, info_span};

use crate::assemble::Assembler;
use crate::catalog::Catalog;
use crate::domain::{ExpressionMatrix, Platform, PlatformId, PlatformSamples, SamplesRequest};
use crate::error::MicroarrayError;
use crate::store::Store;

/// Ties a catalog handle to the on-disk expression data.
///
/// The catalog is only used to check that a platform exists; assembly itself works from
/// the platform directory and the requested sample ids.
#[derive(Clone)]
pub struct App<C: Catalog> {
    store: Store,
    catalog: C,
    assembler: Assembler,
}

impl<C: Catalog> App<C> {
    pub fn new(store: Store, catalog: C, assembler: Assembler) -> Self {
        Self {
            store,
            catalog,
            assembler,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn platforms(&self) -> Result<Vec<Platform>, MicroarrayError> {
        self.catalog.platforms()
    }

    pub fn samples(&self, platform: &PlatformId) -> Result<PlatformSamples, MicroarrayError> {
        let platform = self.catalog.platform(platform)?;
        let samples = self.catalog.list_samples(&platform.id)?;
        Ok(PlatformSamples { platform, samples })
    }

    pub fn search(
        &self,
        platform: &PlatformId,
        query: &str,
    ) -> Result<PlatformSamples, MicroarrayError> {
        let platform = self.catalog.platform(platform)?;
        let samples = self.catalog.search_samples(&platform.id, query)?;
        Ok(PlatformSamples { platform, samples })
    }

    pub fn expression(
        &self,
        request: &SamplesRequest,
    ) -> Result<ExpressionMatrix, MicroarrayError> {
        let _span = info_span!("expression", platform = %request.platform).entered();
        let platform = self.catalog.platform(&request.platform)?;
        if !self.store.platform_exists(&platform.id) {
            return Err(MicroarrayError::NotFound {
                path: self.store.platform_dir(&platform.id),
            });
        }
        let matrix = self
            .assembler
            .assemble(&self.store.platform_dir(&platform.id), &request.samples)?;
        info!(
            platform = %platform.name,
            probes = matrix.n_probes(),
            samples = matrix.n_samples(),
            "expression request served"
        );
        Ok(matrix)
    }
}
