//! Catalog forest and the depth-first traversals over it.
//!
//! Each language owns its forest outright; nodes never point back at their
//! parents, so traversal carries the ancestor path down instead.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Separator between ancestor segments in a hierarchical title
pub const PATH_SEPARATOR: &str = " | ";

/// One node of the source hierarchy (author, book, chapter, ...)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceNode {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub children: Vec<SourceNode>,
}

impl SourceNode {
    /// This node's own segment of a hierarchical title
    pub fn segment(&self) -> &str {
        match self.full_name.as_deref() {
            Some(full) if !full.is_empty() => full,
            _ => &self.name,
        }
    }

    fn matches(&self, lowered_query: &str) -> bool {
        self.name.to_lowercase().contains(lowered_query)
            || self
                .full_name
                .as_deref()
                .map(|f| f.to_lowercase().contains(lowered_query))
                .unwrap_or(false)
    }
}

/// Catalog document; only `sources` is consumed
#[derive(Debug, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub sources: Vec<SourceNode>,
}

/// A search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceMatch {
    pub id: String,
    pub title: String,
    pub url: String,
}

fn extend_path(path: &str, node: &SourceNode) -> String {
    if path.is_empty() {
        node.segment().to_string()
    } else {
        format!("{}{}{}", path, PATH_SEPARATOR, node.segment())
    }
}

/// Find a node by id and return its full hierarchical title
pub fn find_title(forest: &[SourceNode], source_id: &str) -> Option<String> {
    forest
        .iter()
        .find_map(|root| find_title_in(root, "", source_id))
}

fn find_title_in(node: &SourceNode, path: &str, source_id: &str) -> Option<String> {
    let current = extend_path(path, node);
    if node.id == source_id {
        return Some(current);
    }
    node.children
        .iter()
        .find_map(|child| find_title_in(child, &current, source_id))
}

/// Accumulates search hits across one or more forests.
///
/// Ids already collected are skipped, so the first forest searched wins for
/// any given id. Collection stops once `limit` hits are held.
pub struct SearchCollector<'a> {
    query: String,
    limit: usize,
    link: &'a dyn Fn(&str) -> String,
    seen: HashSet<String>,
    results: Vec<SourceMatch>,
}

impl<'a> SearchCollector<'a> {
    pub fn new(query: &str, limit: usize, link: &'a dyn Fn(&str) -> String) -> Self {
        Self {
            query: query.to_lowercase(),
            limit,
            link,
            seen: HashSet::new(),
            results: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.results.len() >= self.limit
    }

    /// Depth-first pass over one forest
    pub fn search(&mut self, forest: &[SourceNode]) {
        for root in forest {
            if self.is_full() {
                return;
            }
            self.visit(root, "");
        }
    }

    fn visit(&mut self, node: &SourceNode, path: &str) {
        if self.is_full() {
            return;
        }
        let current = extend_path(path, node);

        if !self.seen.contains(&node.id) && node.matches(&self.query) {
            self.seen.insert(node.id.clone());
            self.results.push(SourceMatch {
                id: node.id.clone(),
                title: current.clone(),
                url: (self.link)(&node.id),
            });
        }

        for child in &node.children {
            self.visit(child, &current);
        }
    }

    pub fn finish(self) -> Vec<SourceMatch> {
        self.results
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn node(id: &str, name: &str, children: Vec<SourceNode>) -> SourceNode {
        SourceNode {
            id: id.to_string(),
            parent_id: None,
            node_type: None,
            name: name.to_string(),
            full_name: None,
            children,
        }
    }

    fn forest() -> Vec<SourceNode> {
        vec![
            SourceNode {
                full_name: Some("Rabbi Yehuda Ashlag".to_string()),
                ..node(
                    "A1",
                    "Baal HaSulam",
                    vec![node(
                        "B1",
                        "Shamati",
                        vec![node("C1", "There Is None Else", vec![])],
                    )],
                )
            },
            node("A2", "Rabash", vec![node("B2", "Steps of the Ladder", vec![])]),
        ]
    }

    fn link(id: &str) -> String {
        format!("https://example.org/sources/{}", id)
    }

    #[test]
    fn test_segment_prefers_full_name() {
        let f = forest();
        assert_eq!(f[0].segment(), "Rabbi Yehuda Ashlag");
        assert_eq!(f[1].segment(), "Rabash");

        let blank_full = SourceNode {
            full_name: Some(String::new()),
            ..node("x", "Name", vec![])
        };
        assert_eq!(blank_full.segment(), "Name");
    }

    #[test]
    fn test_find_title_returns_full_path() {
        let title = find_title(&forest(), "C1").unwrap();
        assert_eq!(title, "Rabbi Yehuda Ashlag | Shamati | There Is None Else");
    }

    #[test]
    fn test_find_title_root_and_second_tree() {
        assert_eq!(find_title(&forest(), "A2").unwrap(), "Rabash");
        assert_eq!(
            find_title(&forest(), "B2").unwrap(),
            "Rabash | Steps of the Ladder"
        );
    }

    #[test]
    fn test_find_title_missing() {
        assert!(find_title(&forest(), "ZZ").is_none());
        assert!(find_title(&[], "A1").is_none());
    }

    #[test]
    fn test_search_matches_name_and_full_name_case_insensitive() {
        let f = forest();
        let mut collector = SearchCollector::new("ASHLAG", 20, &link);
        collector.search(&f);
        let results = collector.finish();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "A1");

        let mut collector = SearchCollector::new("baal", 20, &link);
        collector.search(&f);
        assert_eq!(collector.finish()[0].id, "A1");
    }

    #[test]
    fn test_search_reports_path_and_link() {
        let f = forest();
        let mut collector = SearchCollector::new("none else", 20, &link);
        collector.search(&f);
        let results = collector.finish();
        assert_eq!(
            results,
            vec![SourceMatch {
                id: "C1".to_string(),
                title: "Rabbi Yehuda Ashlag | Shamati | There Is None Else".to_string(),
                url: "https://example.org/sources/C1".to_string(),
            }]
        );
    }

    #[test]
    fn test_search_is_depth_first() {
        let f = forest();
        // "a" appears in every node name
        let mut collector = SearchCollector::new("a", 20, &link);
        collector.search(&f);
        let ids: Vec<_> = collector.finish().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn test_search_dedups_across_forests() {
        let hebrew = vec![node("A1", "בעל הסולם", vec![node("B1", "שמעתי", vec![])])];
        let english = vec![node("A1", "Baal HaSulam", vec![node("B1", "Shamati", vec![])])];

        let mut collector = SearchCollector::new("שמעתי", 20, &link);
        collector.search(&hebrew);
        collector.search(&english);
        let first = collector.finish();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].title, "בעל הסולם | שמעתי");

        // Matching in both languages still yields one hit, first language wins
        let mut both = SearchCollector::new("", 20, &link);
        both.search(&hebrew);
        both.search(&english);
        let results = both.finish();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "בעל הסולם");
    }

    #[test]
    fn test_search_descends_below_already_returned_node() {
        let hebrew = vec![node("A1", "בעל הסולם Sulam", vec![node("B1", "שמעתי", vec![])])];
        let english = vec![node(
            "A1",
            "Baal HaSulam",
            vec![node("B1", "Sulam Commentary", vec![])],
        )];

        let mut collector = SearchCollector::new("sulam", 20, &link);
        collector.search(&hebrew);
        collector.search(&english);
        let results = collector.finish();

        let ids: Vec<_> = results.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "B1"]);
        assert_eq!(results[0].title, "בעל הסולם Sulam");
        // B1 only matches in English, so it carries the English path
        assert_eq!(results[1].title, "Baal HaSulam | Sulam Commentary");
    }

    #[test]
    fn test_search_stops_at_limit() {
        let wide: Vec<SourceNode> = (0..50)
            .map(|i| node(&format!("N{}", i), "Letter", vec![]))
            .collect();
        let mut collector = SearchCollector::new("letter", 20, &link);
        collector.search(&wide);
        assert!(collector.is_full());
        let results = collector.finish();
        assert_eq!(results.len(), 20);
        assert_eq!(results[19].id, "N19");
    }

    #[test]
    fn test_document_deserializes_nested_nodes() {
        let json = r#"{
            "sources": [
                {"id": "A1", "name": "Author", "type": "AUTHOR", "children": [
                    {"id": "B1", "parent_id": "A1", "name": "Book", "full_name": "The Book"}
                ]}
            ],
            "tags": []
        }"#;
        let doc: CatalogDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.sources.len(), 1);
        assert_eq!(doc.sources[0].node_type.as_deref(), Some("AUTHOR"));
        assert_eq!(doc.sources[0].children[0].parent_id.as_deref(), Some("A1"));
        assert_eq!(find_title(&doc.sources, "B1").unwrap(), "Author | The Book");
    }
}
