//! Search and pagination shared by every resource table

use serde::Serialize;

use crate::models::{Category, City, Rental, Transaction, User, Wheelchair};

/// Records that can be matched by the table search box
pub trait Searchable {
    /// Text fields the search term is matched against
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.first_name.as_str(), self.last_name.as_str(), self.email.as_str()]
    }
}

impl Searchable for Wheelchair {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.category_name()]
    }
}

impl Searchable for Rental {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.wheelchair_name()]
    }
}

impl Searchable for Transaction {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.transaction_id.as_str(),
            self.payment_gateway.as_str(),
            self.transaction_status.as_str(),
        ]
    }
}

impl Searchable for Category {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for City {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

/// Case-insensitive substring match. A blank term matches everything.
pub fn matches<T: Searchable>(item: &T, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let fields = item.search_fields();
    if fields.iter().any(|f| f.to_lowercase().contains(&needle)) {
        return true;
    }
    // "first last" typed into the box should still find the user
    fields.join(" ").to_lowercase().contains(&needle)
}

/// One page of a filtered table
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of the first row on this page, for "Showing x-y of z"
    pub fn first_row(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.per_page + 1
        }
    }

    pub fn last_row(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_row() + self.items.len() - 1
        }
    }
}

/// Filter-then-paginate pipeline over a fetched resource list
#[derive(Debug, Clone)]
pub struct Listing<T> {
    items: Vec<T>,
}

impl<T> Listing<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Keep only records accepted by `predicate`
    pub fn retain<F>(mut self, predicate: F) -> Self
    where
        F: FnMut(&T) -> bool,
    {
        self.items.retain(predicate);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Cut out one page. Page 0 is read as page 1, a page past the end is
    /// empty, and `per_page` of 0 is read as 1.
    pub fn paginate(self, page: usize, per_page: usize) -> Page<T> {
        let per_page = per_page.max(1);
        let page = page.max(1);
        let total_items = self.items.len();
        let total_pages = total_items.div_ceil(per_page);
        let start = (page - 1).saturating_mul(per_page);

        let items = if start >= total_items {
            Vec::new()
        } else {
            self.items.into_iter().skip(start).take(per_page).collect()
        };

        Page {
            items,
            page,
            per_page,
            total_items,
            total_pages,
        }
    }
}

impl<T: Searchable> Listing<T> {
    pub fn search(self, term: &str) -> Self {
        if term.trim().is_empty() {
            return self;
        }
        self.retain(|item| matches(item, term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cities(names: &[&str]) -> Vec<City> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| serde_json::from_value(json!({ "id": i, "name": n })).unwrap())
            .collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let listing = Listing::new(cities(&["Mumbai", "Pune", "Navi Mumbai"])).search("mUMb");
        let names: Vec<String> = listing.into_items().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Mumbai", "Navi Mumbai"]);
    }

    #[test]
    fn test_blank_search_keeps_everything() {
        assert_eq!(Listing::new(cities(&["A", "B"])).search("  ").len(), 2);
    }

    #[test]
    fn test_user_full_name_search() {
        let user: User = serde_json::from_value(json!({
            "id": 1, "first_name": "Asha", "last_name": "Rao", "email": "a@x.io"
        }))
        .unwrap();
        assert!(matches(&user, "asha rao"));
        assert!(matches(&user, "X.IO"));
        assert!(!matches(&user, "kumar"));
    }

    #[test]
    fn test_pagination_math() {
        let names: Vec<String> = (1..=23).map(|i| format!("City {}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        let page = Listing::new(cities(&refs)).paginate(3, 10);
        assert_eq!(page.total_items, 23);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.first_row(), 21);
        assert_eq!(page.last_row(), 23);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let page = Listing::new(cities(&["A", "B", "C"])).paginate(0, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 2);
        assert!(page.has_next());
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = Listing::new(cities(&["A", "B", "C"])).paginate(5, 2);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.first_row(), 0);
    }

    #[test]
    fn test_extreme_page_and_page_size() {
        let page = Listing::new(cities(&["A", "B", "C"])).paginate(usize::MAX, 2);
        assert!(page.is_empty());
        assert_eq!(page.page, usize::MAX);

        let page = Listing::new(cities(&["A", "B", "C"])).paginate(1, usize::MAX);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 3);
    }

    #[test]
    fn test_empty_listing() {
        let page = Listing::new(Vec::<City>::new()).paginate(1, 10);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }
}
