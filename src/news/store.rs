//! In-memory article store keyed by article id.
//!
//! Every article is held once. Page sections ("shelves") are ordered id
//! lists into that map, so a view-count update is one write that every
//! shelf sees.
use std::collections::HashMap;

use super::DisplayArticle;

/// A named, ordered section of articles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shelf {
    /// The main listing of the current page
    Primary,
    Headlines,
    /// Articles fetched for one category, keyed by the category name
    Category(String),
    /// Articles related to the one being read
    Related,
}

/// A recorded view with the server's authoritative count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewIncrement {
    pub article_id: String,
    pub views: u64,
}

#[derive(Debug, Default)]
pub struct NewsStore {
    articles: HashMap<String, DisplayArticle>,
    shelves: HashMap<Shelf, Vec<String>>,
}

impl NewsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents of `shelf`.
    ///
    /// Articles already held under the same id are overwritten with the
    /// newer copy, so the last write wins. Ids no shelf references anymore
    /// are dropped.
    pub fn insert_shelf(&mut self, shelf: Shelf, articles: Vec<DisplayArticle>) {
        let ids = articles.iter().map(|a| a.id.clone()).collect();
        for article in articles {
            self.articles.insert(article.id.clone(), article);
        }
        self.shelves.insert(shelf, ids);
        self.prune();
    }

    /// Articles on `shelf`, in shelf order.
    pub fn shelf(&self, shelf: &Shelf) -> Vec<&DisplayArticle> {
        self.shelves
            .get(shelf)
            .map(|ids| ids.iter().filter_map(|id| self.articles.get(id)).collect())
            .unwrap_or_default()
    }

    /// Names of the category shelves currently held.
    pub fn category_shelves(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .shelves
            .keys()
            .filter_map(|s| match s {
                Shelf::Category(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        names.sort_unstable();
        names
    }

    /// Every held article whose category equals `category` exactly, across
    /// all shelves, in first-seen shelf order.
    pub fn by_category(&self, category: &str) -> Vec<&DisplayArticle> {
        let mut seen = std::collections::HashSet::new();
        let order = [Shelf::Primary, Shelf::Headlines, Shelf::Related];
        let named = self.category_shelves();

        order
            .iter()
            .cloned()
            .chain(named.into_iter().map(|n| Shelf::Category(n.to_string())))
            .filter_map(|shelf| self.shelves.get(&shelf))
            .flatten()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| self.articles.get(id))
            .filter(|a| a.category == category)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&DisplayArticle> {
        self.articles.get(id)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Writes the authoritative view count. Returns false when the article
    /// is not held.
    pub fn apply_view(&mut self, increment: &ViewIncrement) -> bool {
        match self.articles.get_mut(&increment.article_id) {
            Some(article) => {
                article.views = increment.views;
                true
            }
            None => false,
        }
    }

    fn prune(&mut self) {
        let shelves = &self.shelves;
        self.articles
            .retain(|id, _| shelves.values().any(|ids| ids.iter().any(|i| i == id)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ArticleRecord;
    use crate::news::NormalizeOptions;

    fn article(id: &str, category: &str, views: u64) -> DisplayArticle {
        DisplayArticle::from_record(
            ArticleRecord {
                id: id.to_string(),
                title: format!("Title {id}"),
                body: String::new(),
                category: category.to_string(),
                image: None,
                created_at: "2024-01-01".to_string(),
                author: String::new(),
                views,
            },
            &NormalizeOptions::default(),
        )
    }

    #[test]
    fn test_shelves_share_one_record() {
        let mut store = NewsStore::new();
        store.insert_shelf(Shelf::Headlines, vec![article("a1", "Politics", 3)]);
        store.insert_shelf(
            Shelf::Category("Politics".into()),
            vec![article("a1", "Politics", 3), article("a2", "Politics", 1)],
        );
        assert_eq!(store.len(), 2);

        assert!(store.apply_view(&ViewIncrement {
            article_id: "a1".into(),
            views: 42,
        }));
        assert_eq!(store.shelf(&Shelf::Headlines)[0].views, 42);
        assert_eq!(store.shelf(&Shelf::Category("Politics".into()))[0].views, 42);
    }

    #[test]
    fn test_apply_view_unknown_id() {
        let mut store = NewsStore::new();
        store.insert_shelf(Shelf::Primary, vec![article("a1", "Sport", 3)]);
        assert!(!store.apply_view(&ViewIncrement {
            article_id: "zzz".into(),
            views: 9,
        }));
        assert_eq!(store.get("a1").map(|a| a.views), Some(3));
    }

    #[test]
    fn test_insert_replaces_shelf_and_prunes() {
        let mut store = NewsStore::new();
        store.insert_shelf(Shelf::Primary, vec![article("a1", "Sport", 0)]);
        store.insert_shelf(Shelf::Primary, vec![article("a2", "Sport", 0)]);
        assert!(store.get("a1").is_none());
        assert_eq!(store.shelf(&Shelf::Primary).len(), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = NewsStore::new();
        store.insert_shelf(Shelf::Primary, vec![article("a1", "Sport", 5)]);
        store.insert_shelf(Shelf::Headlines, vec![article("a1", "Sport", 8)]);
        assert_eq!(store.shelf(&Shelf::Primary)[0].views, 8);
    }

    #[test]
    fn test_by_category_is_derived_and_deduplicated() {
        let mut store = NewsStore::new();
        store.insert_shelf(
            Shelf::Headlines,
            vec![article("h1", "Politics", 0), article("s1", "Sport", 0)],
        );
        store.insert_shelf(
            Shelf::Category("Politics".into()),
            vec![article("h1", "Politics", 0), article("p2", "Politics", 0)],
        );
        let ids: Vec<_> = store
            .by_category("Politics")
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["h1", "p2"]);
        assert!(store.by_category("politics").is_empty());
        assert_eq!(store.category_shelves(), vec!["Politics"]);
    }

    #[test]
    fn test_missing_shelf_is_empty() {
        let store = NewsStore::new();
        assert!(store.shelf(&Shelf::Related).is_empty());
        assert!(store.is_empty());
    }
}
