//! List query building
//!
//! Turns the raw `page`/`limit`/`sortBy`/`sortOrder`/`name`/`email` query
//! string of the list endpoints into a [`UserQuery`] that every store
//! implementation evaluates the same way.

use crate::user::models::{User, UserType};
use serde::Deserialize;
use std::cmp::Ordering;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Raw list parameters. Kept as strings so malformed values fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Email,
}

impl SortField {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("email") => SortField::Email,
            _ => SortField::Name,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(order) if order.trim().eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Normalised list query for one user type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    pub user_type: UserType,
    pub page: u64,
    pub limit: u64,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub name_filter: Option<String>,
    pub email_filter: Option<String>,
}

impl UserQuery {
    pub fn new(user_type: UserType) -> Self {
        Self {
            user_type,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            name_filter: None,
            email_filter: None,
        }
    }

    pub fn from_params(user_type: UserType, params: &ListParams) -> Self {
        Self {
            user_type,
            page: parse_positive(params.page.as_deref()).unwrap_or(1),
            limit: parse_positive(params.limit.as_deref())
                .map(|limit| limit.min(MAX_PAGE_SIZE))
                .unwrap_or(DEFAULT_PAGE_SIZE),
            sort_by: SortField::parse(params.sort_by.as_deref()),
            sort_order: SortOrder::parse(params.sort_order.as_deref()),
            name_filter: non_empty(params.name.as_deref()),
            email_filter: non_empty(params.email.as_deref()),
        }
    }

    /// Number of matching records before the requested page
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Type and substring filters, case-insensitive
    pub fn matches(&self, user: &User) -> bool {
        user.user_type == self.user_type
            && contains_ignore_case(&user.name, self.name_filter.as_deref())
            && contains_ignore_case(&user.email, self.email_filter.as_deref())
    }

    /// Requested ordering, ties broken by id so pages never overlap
    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        let primary = match self.sort_by {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Email => a.email.cmp(&b.email),
        };
        let primary = match self.sort_order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// Evaluate the query over an in-memory collection
    pub fn apply<'a, I>(&self, users: I) -> Page<User>
    where
        I: IntoIterator<Item = &'a User>,
    {
        let mut matching: Vec<&User> = users.into_iter().filter(|u| self.matches(u)).collect();
        matching.sort_by(|a, b| self.compare(a, b));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Page::new(items, total, self.limit)
    }
}

/// One page of results plus the page count for the whole match set
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, limit: u64) -> Self {
        Self {
            items,
            total,
            total_pages: total_pages(total, limit),
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// `ceil(count / limit)`; zero matches means zero pages
pub fn total_pages(count: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    count.div_ceil(limit)
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).filter(|n| *n >= 1)
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.is_empty()).map(str::to_string)
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut p = ListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "page" => p.page = value,
                "limit" => p.limit = value,
                "sortBy" => p.sort_by = value,
                "sortOrder" => p.sort_order = value,
                "name" => p.name = value,
                "email" => p.email = value,
                _ => panic!("unknown key {key}"),
            }
        }
        p
    }

    fn client(name: &str, email: &str) -> User {
        User::new(name.into(), email.into(), "hash".into(), UserType::Client)
    }

    fn sample() -> Vec<User> {
        let mut users: Vec<User> = (0..23)
            .map(|i| client(&format!("Client {i:02}"), &format!("client{i:02}@acme.test")))
            .collect();
        users.push(client("Zed Vendor", "zed@other.test"));
        users.push(User::new("Admin".into(), "root@acme.test".into(), "hash".into(), UserType::Admin));
        users
    }

    #[test]
    fn test_defaults() {
        let query = UserQuery::from_params(UserType::Client, &ListParams::default());
        assert_eq!(query, UserQuery::new(UserType::Client));
    }

    #[test]
    fn test_invalid_page_defaults_to_one() {
        for raw in ["0", "-3", "abc", "2.5", ""] {
            let query = UserQuery::from_params(UserType::Client, &params(&[("page", raw)]));
            assert_eq!(query.page, 1, "page={raw}");
        }
    }

    #[test]
    fn test_limit_is_capped() {
        let query = UserQuery::from_params(UserType::Client, &params(&[("limit", "5000")]));
        assert_eq!(query.limit, MAX_PAGE_SIZE);

        let query = UserQuery::from_params(UserType::Client, &params(&[("limit", "0")]));
        assert_eq!(query.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_sort_parsing() {
        let query = UserQuery::from_params(
            UserType::Client,
            &params(&[("sortBy", "email"), ("sortOrder", "DESC")]),
        );
        assert_eq!(query.sort_by, SortField::Email);
        assert_eq!(query.sort_order, SortOrder::Desc);

        let query = UserQuery::from_params(
            UserType::Client,
            &params(&[("sortBy", "password"), ("sortOrder", "sideways")]),
        );
        assert_eq!(query.sort_by, SortField::Name);
        assert_eq!(query.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_empty_filters_are_ignored() {
        let query = UserQuery::from_params(UserType::Client, &params(&[("name", ""), ("email", "")]));
        assert!(query.name_filter.is_none());
        assert!(query.email_filter.is_none());
    }

    #[test]
    fn test_page_sizes_and_total_pages() {
        let users = sample();
        let first = UserQuery::new(UserType::Client).apply(&users);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total, 24);
        assert_eq!(first.total_pages, 3);

        let last = UserQuery::from_params(UserType::Client, &params(&[("page", "3")])).apply(&users);
        assert_eq!(last.items.len(), 4);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let users = sample();
        let page = UserQuery::from_params(UserType::Client, &params(&[("page", "9")])).apply(&users);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_filters_are_case_insensitive_substrings() {
        let users = sample();
        let page = UserQuery::from_params(UserType::Client, &params(&[("name", "cLiEnT 1")])).apply(&users);
        assert_eq!(page.total, 10);
        assert!(page.items.iter().all(|u| u.name.starts_with("Client 1")));

        let page = UserQuery::from_params(UserType::Client, &params(&[("email", "OTHER")])).apply(&users);
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Zed Vendor");

        let page = UserQuery::from_params(UserType::Client, &params(&[("name", "client 1"), ("email", "1@")]))
            .apply(&users);
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Client 11");

        let page = UserQuery::from_params(UserType::Client, &params(&[("name", "zed"), ("email", "acme")]))
            .apply(&users);
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_combined_filters_with_custom_limit() {
        let users = sample();
        let mut seen = 0;
        for page in 1..=5 {
            let query = UserQuery::from_params(
                UserType::Client,
                &params(&[("name", "CLIENT"), ("email", "acme"), ("limit", "7"), ("page", &page.to_string())]),
            );
            let result = query.apply(&users);

            assert_eq!(result.total, 23);
            assert_eq!(result.total_pages, 4);
            assert!(result.items.len() <= 7, "page {page} has {} items", result.items.len());
            assert!(result.items.iter().all(|u| query.matches(u)));
            seen += result.items.len();
        }
        assert_eq!(seen, 23);
    }

    #[test]
    fn test_filters_are_literal() {
        let users = vec![client("50% off", "a@x.test"), client("500 off", "b@x.test")];
        let page = UserQuery::from_params(UserType::Client, &params(&[("name", "0%")])).apply(&users);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_type_discriminator_filters() {
        let users = sample();
        let page = UserQuery::new(UserType::Admin).apply(&users);
        assert_eq!(page.total, 1);
        let page = UserQuery::new(UserType::SubVendor).apply(&users);
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_desc_reverses_asc() {
        let users = sample();
        let limit = [("limit", "100")];
        let asc = UserQuery::from_params(UserType::Client, &params(&limit)).apply(&users);
        let desc = UserQuery::from_params(UserType::Client, &params(&[limit[0], ("sortOrder", "desc")]))
            .apply(&users);

        let mut reversed: Vec<_> = desc.items.iter().map(|u| u.name.clone()).collect();
        reversed.reverse();
        let ascending: Vec<_> = asc.items.iter().map(|u| u.name.clone()).collect();
        assert_eq!(ascending, reversed);
    }

    #[test]
    fn test_sort_by_email() {
        let users = vec![client("A", "c@x.test"), client("B", "a@x.test"), client("C", "b@x.test")];
        let page = UserQuery::from_params(UserType::Client, &params(&[("sortBy", "email")])).apply(&users);
        let names: Vec<_> = page.items.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_offset() {
        let query = UserQuery::from_params(UserType::Client, &params(&[("page", "4"), ("limit", "25")]));
        assert_eq!(query.offset(), 75);
    }

    #[test]
    fn test_page_zero_built_directly_reads_first_page() {
        let query = UserQuery {
            page: 0,
            ..UserQuery::new(UserType::Client)
        };
        assert_eq!(query.offset(), 0);
        assert_eq!(query.apply(&sample()).items.len(), 10);
    }
}
