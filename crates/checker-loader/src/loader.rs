//! Source dispatch

use std::sync::Arc;

use async_trait::async_trait;
use checker_core::{AddressSet, CheckerConfig, Source, SourceError};

use crate::bundled::BundledProvider;
use crate::error::LoaderError;
use crate::remote::RemoteProvider;

pub type LoadResult = Result<Arc<AddressSet>, SourceError>;

/// Resolves the address set for a source.
///
/// Failures are values: implementations never panic past this boundary.
#[async_trait]
pub trait AddressLoader: Send + Sync {
    async fn load(&self, source: Source) -> LoadResult;

    /// Whether a load for `source` is currently outstanding
    fn is_loading(&self, _source: Source) -> bool {
        false
    }
}

/// Owns one provider per source
pub struct SourceLoader {
    bundled: BundledProvider,
    remote: RemoteProvider,
}

impl SourceLoader {
    /// Build both providers from configuration
    pub fn new(config: &CheckerConfig) -> Result<Self, LoaderError> {
        Ok(Self {
            bundled: BundledProvider::new(&config.bundled_path),
            remote: RemoteProvider::new(config.remote_url(), config.request_timeout())?,
        })
    }

    pub fn from_providers(bundled: BundledProvider, remote: RemoteProvider) -> Self {
        Self { bundled, remote }
    }

    pub fn bundled(&self) -> &BundledProvider {
        &self.bundled
    }

    pub fn remote(&self) -> &RemoteProvider {
        &self.remote
    }
}

#[async_trait]
impl AddressLoader for SourceLoader {
    async fn load(&self, source: Source) -> LoadResult {
        match source {
            Source::Bundled => self.bundled.load().await,
            Source::Remote => self.remote.load().await,
        }
    }

    fn is_loading(&self, source: Source) -> bool {
        match source {
            Source::Bundled => self.bundled.is_loading(),
            Source::Remote => self.remote.is_loading(),
        }
    }
}
