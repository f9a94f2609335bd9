//! Strapi REST query builder.
//!
//! Strapi reads nested parameters in `qs` bracket notation:
//!
//! ```text
//! filters[category][slug][$eq]=bg-moment
//! populate[products][populate][images]=true
//! sort[0]=isActive:desc
//! pagination[start]=0&pagination[limit]=1
//! ```

use std::fmt;

/// Filter operators understood by the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    Containsi,
    In,
    NotNull,
    Null,
}

impl FilterOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "$eq",
            Self::Ne => "$ne",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Contains => "$contains",
            Self::Containsi => "$containsi",
            Self::In => "$in",
            Self::NotNull => "$notNull",
            Self::Null => "$null",
        }
    }
}

/// Right-hand side of a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Filter {
    path: String,
    op: FilterOp,
    value: FilterValue,
}

/// Relation population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Populate {
    /// `populate=*`
    All,
    /// `populate[0]=images&populate[1]=category`
    Fields(Vec<String>),
    /// `populate[products][populate][images]=true`
    Tree(Vec<PopulateNode>),
}

/// One relation in a nested populate tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulateNode {
    field: String,
    children: Vec<PopulateNode>,
}

impl PopulateNode {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            children: Vec::new(),
        }
    }

    /// Populate `child` inside this relation.
    #[must_use]
    pub fn with(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    fn encode_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        let key = format!("{prefix}[{}]", self.field);
        if self.children.is_empty() {
            out.push((key, "true".to_string()));
        } else {
            let nested = format!("{key}[populate]");
            for child in &self.children {
                child.encode_into(&nested, out);
            }
        }
    }
}

/// Pagination style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    Page { page: u32, page_size: u32 },
    Offset { start: u32, limit: u32 },
}

/// Query parameters for a collection or entry request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    filters: Vec<Filter>,
    populate: Option<Populate>,
    sort: Vec<String>,
    fields: Vec<String>,
    pagination: Option<Pagination>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter. Dotted paths (`category.slug`) filter on relations.
    #[must_use]
    pub fn filter(mut self, path: &str, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        self.filters.push(Filter {
            path: path.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    /// Shorthand for `filter(path, FilterOp::NotNull, true)`.
    #[must_use]
    pub fn not_null(self, path: &str) -> Self {
        self.filter(path, FilterOp::NotNull, true)
    }

    /// Only entries with a publication date.
    #[must_use]
    pub fn published(self) -> Self {
        self.not_null("publishedAt")
    }

    #[must_use]
    pub fn populate_all(mut self) -> Self {
        self.populate = Some(Populate::All);
        self
    }

    #[must_use]
    pub fn populate_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.populate = Some(Populate::Fields(
            fields.into_iter().map(Into::into).collect(),
        ));
        self
    }

    #[must_use]
    pub fn populate_tree(mut self, nodes: Vec<PopulateNode>) -> Self {
        self.populate = Some(Populate::Tree(nodes));
        self
    }

    /// Sort entries, e.g. `["isActive:desc", "createdAt:desc"]`.
    #[must_use]
    pub fn sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = sort.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict the returned attributes.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn page(mut self, page: u32, page_size: u32) -> Self {
        self.pagination = Some(Pagination::Page { page, page_size });
        self
    }

    #[must_use]
    pub const fn offset(mut self, start: u32, limit: u32) -> Self {
        self.pagination = Some(Pagination::Offset { start, limit });
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
            && self.populate.is_none()
            && self.sort.is_empty()
            && self.fields.is_empty()
            && self.pagination.is_none()
    }

    /// Key/value pairs in bracket notation, unencoded.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();

        for filter in &self.filters {
            let mut key = String::from("filters");
            for segment in filter.path.split('.').filter(|s| !s.is_empty()) {
                key.push('[');
                key.push_str(segment);
                key.push(']');
            }
            key.push('[');
            key.push_str(filter.op.as_str());
            key.push(']');

            match &filter.value {
                FilterValue::Text(value) => out.push((key, value.clone())),
                FilterValue::List(values) => {
                    for (i, value) in values.iter().enumerate() {
                        out.push((format!("{key}[{i}]"), value.clone()));
                    }
                }
            }
        }

        match &self.populate {
            Some(Populate::All) => out.push(("populate".to_string(), "*".to_string())),
            Some(Populate::Fields(fields)) => {
                for (i, field) in fields.iter().enumerate() {
                    out.push((format!("populate[{i}]"), field.clone()));
                }
            }
            Some(Populate::Tree(nodes)) => {
                for node in nodes {
                    node.encode_into("populate", &mut out);
                }
            }
            None => {}
        }

        for (i, sort) in self.sort.iter().enumerate() {
            out.push((format!("sort[{i}]"), sort.clone()));
        }

        for (i, field) in self.fields.iter().enumerate() {
            out.push((format!("fields[{i}]"), field.clone()));
        }

        match self.pagination {
            Some(Pagination::Page { page, page_size }) => {
                out.push(("pagination[page]".to_string(), page.to_string()));
                out.push(("pagination[pageSize]".to_string(), page_size.to_string()));
            }
            Some(Pagination::Offset { start, limit }) => {
                out.push(("pagination[start]".to_string(), start.to_string()));
                out.push(("pagination[limit]".to_string(), limit.to_string()));
            }
            None => {}
        }

        out
    }

    /// Encoded query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.to_pairs()
            .into_iter()
            .map(|(key, value)| format!("{key}={}", encode_value(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

// `:` separates sort fields from their direction and is legal in a query
fn encode_value(value: &str) -> String {
    if value == "*" {
        return value.to_string();
    }
    urlencoding::encode(value).replace("%3A", ":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        let query = Query::new();
        assert!(query.is_empty());
        assert_eq!(query.to_query_string(), "");
    }

    #[test]
    fn test_nested_relation_filter() {
        let query = Query::new().filter("category.slug", FilterOp::Eq, "bg-moment");
        assert_eq!(
            query.to_query_string(),
            "filters[category][slug][$eq]=bg-moment"
        );
    }

    #[test]
    fn test_published_and_bool_filters() {
        let query = Query::new()
            .published()
            .filter("isActive", FilterOp::Eq, true);
        assert_eq!(
            query.to_query_string(),
            "filters[publishedAt][$notNull]=true&filters[isActive][$eq]=true"
        );
    }

    #[test]
    fn test_in_filter() {
        let query = Query::new().filter(
            "id",
            FilterOp::In,
            vec!["1".to_string(), "2".to_string()],
        );
        assert_eq!(
            query.to_query_string(),
            "filters[id][$in][0]=1&filters[id][$in][1]=2"
        );
    }

    #[test]
    fn test_populate_variants() {
        assert_eq!(Query::new().populate_all().to_query_string(), "populate=*");
        assert_eq!(
            Query::new()
                .populate_fields(["image", "category"])
                .to_query_string(),
            "populate[0]=image&populate[1]=category"
        );
    }

    #[test]
    fn test_populate_tree() {
        let query = Query::new().populate_tree(vec![
            PopulateNode::new("products")
                .with(PopulateNode::new("category"))
                .with(PopulateNode::new("images")),
        ]);
        assert_eq!(
            query.to_query_string(),
            "populate[products][populate][category]=true&populate[products][populate][images]=true"
        );
    }

    #[test]
    fn test_sort_keeps_colons() {
        let query = Query::new().sort(["isActive:desc", "createdAt:desc"]);
        assert_eq!(
            query.to_query_string(),
            "sort[0]=isActive:desc&sort[1]=createdAt:desc"
        );
    }

    #[test]
    fn test_pagination() {
        assert_eq!(
            Query::new().offset(0, 1).to_query_string(),
            "pagination[start]=0&pagination[limit]=1"
        );
        assert_eq!(
            Query::new().page(2, 12).to_query_string(),
            "pagination[page]=2&pagination[pageSize]=12"
        );
    }

    #[test]
    fn test_values_are_encoded() {
        let query = Query::new().filter("name", FilterOp::Containsi, "crème brûlée & co");
        assert_eq!(
            query.to_query_string(),
            "filters[name][$containsi]=cr%C3%A8me%20br%C3%BBl%C3%A9e%20%26%20co"
        );
    }

    #[test]
    fn test_full_featured_query() {
        let query = Query::new()
            .published()
            .filter("available", FilterOp::Eq, true)
            .filter("category.slug", FilterOp::Eq, "bg-moment")
            .populate_fields(["category", "ingredients", "images"])
            .sort(["createdAt:desc"])
            .offset(0, 1);
        let qs = query.to_query_string();
        assert!(qs.starts_with("filters[publishedAt][$notNull]=true&"));
        assert!(qs.contains("filters[category][slug][$eq]=bg-moment"));
        assert!(qs.contains("populate[2]=images"));
        assert!(qs.ends_with("sort[0]=createdAt:desc&pagination[start]=0&pagination[limit]=1"));
    }
}
