use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info};

use super::tree::{find_title, SearchCollector, SourceMatch, SourceNode};
use crate::error::{Error, Result};
use crate::i18n::Language;

/// Maximum number of hits returned by one search
pub const SEARCH_LIMIT: usize = 20;

/// Languages searched, in priority order for deduplication
pub const SEARCH_LANGUAGES: [Language; 4] = [
    Language::HEBREW,
    Language::RUSSIAN,
    Language::ENGLISH,
    Language::SPANISH,
];

/// Source of whole per-language catalog forests
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch(&self, language: &str) -> Result<Vec<SourceNode>>;
}

type Forest = Arc<Vec<SourceNode>>;

/// Process-wide, per-language cache of the source catalog.
///
/// Each language owns a `OnceCell` slot. The map lock is only held to find or
/// insert a slot, so a slow first fetch for one language never blocks lookups
/// in another. Concurrent first requests for the same language wait on that
/// language's cell and share one upstream call. A failed fetch leaves the cell
/// empty and the next call retries.
pub struct CatalogCache {
    fetcher: Arc<dyn CatalogFetcher>,
    link_base: String,
    trees: RwLock<HashMap<String, Arc<OnceCell<Forest>>>>,
}

impl CatalogCache {
    pub fn new(fetcher: Arc<dyn CatalogFetcher>, link_base: impl Into<String>) -> Self {
        Self {
            fetcher,
            link_base: link_base.into().trim_end_matches('/').to_string(),
            trees: RwLock::new(HashMap::new()),
        }
    }

    /// Public link for a source; never encodes a language
    pub fn source_link(&self, source_id: &str) -> String {
        format!("{}/{}", self.link_base, source_id)
    }

    async fn slot(&self, language: &str) -> Arc<OnceCell<Forest>> {
        if let Some(slot) = self.trees.read().await.get(language) {
            return Arc::clone(slot);
        }
        let mut trees = self.trees.write().await;
        Arc::clone(trees.entry(language.to_string()).or_default())
    }

    /// Return the language's forest, fetching it on first use
    pub async fn ensure(&self, language: &str) -> Result<Forest> {
        let slot = self.slot(language).await;
        if let Some(forest) = slot.get() {
            debug!("Catalog cache hit for {}", language);
            return Ok(Arc::clone(forest));
        }

        let forest = slot
            .get_or_try_init(|| async {
                info!("Fetching source catalog for {}", language);
                let forest = Arc::new(self.fetcher.fetch(language).await?);
                info!(
                    "Cached source catalog for {} ({} root nodes)",
                    language,
                    forest.len()
                );
                Ok::<_, Error>(forest)
            })
            .await?;
        Ok(Arc::clone(forest))
    }

    #[cfg(test)]
    async fn is_cached(&self, language: &str) -> bool {
        match self.trees.read().await.get(language) {
            Some(slot) => slot.get().is_some(),
            None => false,
        }
    }

    /// Full hierarchical title of a source in the given language
    pub async fn title_of(&self, source_id: &str, language: &str) -> Result<String> {
        let forest = self.ensure(language).await?;
        find_title(&forest, source_id).ok_or_else(|| Error::SourceNotFound {
            source_id: source_id.to_string(),
            language: language.to_string(),
        })
    }

    /// Case-insensitive substring search over every search language.
    ///
    /// Blank queries return nothing without touching the cache.
    pub async fn search(&self, query: &str) -> Result<Vec<SourceMatch>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut forests = Vec::with_capacity(SEARCH_LANGUAGES.len());
        for language in SEARCH_LANGUAGES {
            forests.push(self.ensure(language.code()).await?);
        }

        let link = |id: &str| self.source_link(id);
        let mut collector = SearchCollector::new(query, SEARCH_LIMIT, &link);
        for forest in &forests {
            if collector.is_full() {
                break;
            }
            collector.search(forest);
        }

        let results = collector.finish();
        debug!("Catalog search '{}' matched {} sources", query, results.len());
        Ok(results)
    }
}
