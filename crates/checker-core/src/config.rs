//! Checker configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants;

/// Where the two address providers find their data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Bundled spreadsheet (.xlsx/.xls/.ods/.csv)
    pub bundled_path: PathBuf,
    /// Hosted spreadsheet document id
    pub sheet_id: String,
    /// Tab id within the hosted spreadsheet
    pub sheet_gid: String,
    /// Scheme and host of the spreadsheet export endpoint
    pub remote_base_url: String,
    /// Remote fetch timeout
    pub request_timeout_ms: u64,
}

impl CheckerConfig {
    /// Full CSV export URL for the configured sheet tab
    pub fn remote_url(&self) -> String {
        format!(
            "{}/spreadsheets/d/{}/gviz/tq?tqx=out:csv&gid={}",
            self.remote_base_url.trim_end_matches('/'),
            self.sheet_id,
            self.sheet_gid
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn with_bundled_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.bundled_path = path.into();
        self
    }

    pub fn with_sheet(mut self, sheet_id: impl Into<String>, sheet_gid: impl Into<String>) -> Self {
        self.sheet_id = sheet_id.into();
        self.sheet_gid = sheet_gid.into();
        self
    }

    pub fn with_remote_base_url(mut self, url: impl Into<String>) -> Self {
        self.remote_base_url = url.into();
        self
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            bundled_path: PathBuf::from(constants::DEFAULT_BUNDLED_PATH),
            sheet_id: constants::DEFAULT_SHEET_ID.to_string(),
            sheet_gid: constants::DEFAULT_SHEET_GID.to_string(),
            remote_base_url: constants::DEFAULT_REMOTE_BASE_URL.to_string(),
            request_timeout_ms: constants::DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}
