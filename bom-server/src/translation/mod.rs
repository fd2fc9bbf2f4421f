//! Part name translation
//!
//! Two lookup tables are loaded from JSON files on first use:
//! - the direct table maps a source-language name to its translation
//! - the fallback table maps a 4-character code prefix to a name table
//!
//! The [`Translator`] owns both tables for the lifetime of the process. Loading
//! takes the write lock and re-checks what is already loaded, so concurrent
//! first requests perform the load once. Resolution only takes the read lock.
//! A table is marked loaded only after it parsed successfully; a failed load
//! leaves earlier state intact and is retried by the next request.

mod apply;

pub use apply::{apply, apply_with_tracking};

use bom_common::config::TranslationPaths;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::info;

/// Source text → translated text
pub type TranslationTable = HashMap<String, String>;

/// Code prefix → (source text → translated text)
pub type FallbackTranslationTable = HashMap<String, TranslationTable>;

/// Length of the code prefix keying the fallback table
pub const FALLBACK_PREFIX_CHARS: usize = 4;

/// Translation data could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read translation table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed translation table {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of resolving one name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Translation, or the input text unchanged on a miss
    pub text: String,
    pub translated: bool,
}

impl Resolution {
    fn hit(text: &str) -> Self {
        Self {
            text: text.to_string(),
            translated: true,
        }
    }

    fn miss(text: &str) -> Self {
        Self {
            text: text.to_string(),
            translated: false,
        }
    }
}

/// The pair of lookup tables
#[derive(Debug, Default)]
pub struct TranslationTables {
    direct: Option<TranslationTable>,
    fallback: Option<FallbackTranslationTable>,
}

impl TranslationTables {
    /// Fully loaded tables
    pub fn new(direct: TranslationTable, fallback: FallbackTranslationTable) -> Self {
        Self {
            direct: Some(direct),
            fallback: Some(fallback),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.direct.is_some() && self.fallback.is_some()
    }

    /// Translate `text`, falling back on the prefix of `related_code`
    pub fn resolve(&self, text: &str, related_code: &str) -> Resolution {
        if let Some(translated) = self.direct.as_ref().and_then(|table| table.get(text)) {
            return Resolution::hit(translated);
        }

        let fallback = code_prefix(related_code).and_then(|prefix| {
            self.fallback
                .as_ref()
                .and_then(|tables| tables.get(prefix))
                .and_then(|table| table.get(text))
        });

        match fallback {
            Some(translated) => Resolution::hit(translated),
            None => Resolution::miss(text),
        }
    }
}

/// First [`FALLBACK_PREFIX_CHARS`] characters, if the code is long enough
fn code_prefix(code: &str) -> Option<&str> {
    code.char_indices()
        .nth(FALLBACK_PREFIX_CHARS - 1)
        .map(|(idx, ch)| &code[..idx + ch.len_utf8()])
}

/// Process-wide translation service
pub struct Translator {
    paths: TranslationPaths,
    tables: RwLock<TranslationTables>,
}

impl Translator {
    /// Translator that loads `paths` lazily on first use
    pub fn new(paths: TranslationPaths) -> Self {
        Self {
            paths,
            tables: RwLock::new(TranslationTables::default()),
        }
    }

    /// Translator over tables that are already in memory
    pub fn preloaded(tables: TranslationTables) -> Self {
        Self {
            paths: TranslationPaths {
                direct_table: PathBuf::new(),
                fallback_table: PathBuf::new(),
            },
            tables: RwLock::new(tables),
        }
    }

    /// Load whichever tables are not loaded yet
    ///
    /// No-op once both tables are loaded.
    pub async fn load(&self) -> Result<(), LoadError> {
        if self.tables.read().await.is_loaded() {
            return Ok(());
        }

        let mut tables = self.tables.write().await;

        // Another request may have loaded while we waited for the lock
        if tables.direct.is_none() {
            let direct: TranslationTable = read_table(&self.paths.direct_table).await?;
            info!(
                path = %self.paths.direct_table.display(),
                entries = direct.len(),
                "Loaded direct translation table"
            );
            tables.direct = Some(direct);
        }

        if tables.fallback.is_none() {
            let fallback: FallbackTranslationTable = read_table(&self.paths.fallback_table).await?;
            info!(
                path = %self.paths.fallback_table.display(),
                prefixes = fallback.len(),
                "Loaded fallback translation table"
            );
            tables.fallback = Some(fallback);
        }

        Ok(())
    }

    /// Shared read access to the loaded tables, loading them first if needed
    pub async fn tables(&self) -> Result<RwLockReadGuard<'_, TranslationTables>, LoadError> {
        self.load().await?;
        Ok(self.tables.read().await)
    }

    pub async fn resolve(&self, text: &str, related_code: &str) -> Result<Resolution, LoadError> {
        Ok(self.tables().await?.resolve(text, related_code))
    }

    pub async fn is_loaded(&self) -> bool {
        self.tables.read().await.is_loaded()
    }
}

async fn read_table<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
