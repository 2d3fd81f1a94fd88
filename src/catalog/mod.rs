pub mod cache;
pub mod client;
pub mod tree;

pub use cache::{CatalogCache, CatalogFetcher, SEARCH_LANGUAGES, SEARCH_LIMIT};
pub use client::HttpCatalogFetcher;
pub use tree::{find_title, CatalogDocument, SourceMatch, SourceNode, PATH_SEPARATOR};
