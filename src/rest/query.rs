//! Declarative table queries rendered as PostgREST request parameters.
//!
//! Every data-access operation in the crate is described by one
//! [`TableQuery`]: a table, a column projection (optionally with embedded
//! related resources), equality filters, and an ordering. The builder only
//! covers the access patterns the marketplace actually uses; it is not a
//! general query language.

use std::borrow::Cow;
use std::fmt;

/// Sort direction for an `order` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    fn suffix(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A single read or scoped-update target on one table.
#[derive(Debug, Clone)]
pub struct TableQuery {
    table: &'static str,
    select: Cow<'static, str>,
    filters: Vec<(Cow<'static, str>, String)>,
    order: Option<(Cow<'static, str>, Order)>,
    limit: Option<usize>,
}

impl TableQuery {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            select: Cow::Borrowed("*"),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Override the column projection. Embedded resources use the PostgREST
    /// relationship syntax, e.g. `*,attorney:profiles!quotes_attorney_id_fkey(*)`.
    pub fn select(mut self, columns: impl Into<Cow<'static, str>>) -> Self {
        self.select = columns.into();
        self
    }

    /// Add an equality filter on `column`.
    pub fn eq(mut self, column: impl Into<Cow<'static, str>>, value: impl fmt::Display) -> Self {
        self.filters.push((column.into(), value.to_string()));
        self
    }

    pub fn order_asc(mut self, column: impl Into<Cow<'static, str>>) -> Self {
        self.order = Some((column.into(), Order::Ascending));
        self
    }

    pub fn order_desc(mut self, column: impl Into<Cow<'static, str>>) -> Self {
        self.order = Some((column.into(), Order::Descending));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the query string pairs in a stable order:
    /// `select`, filters (insertion order), `order`, `limit`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 3);
        pairs.push(("select".to_string(), self.select.to_string()));
        for (column, value) in &self.filters {
            pairs.push((column.to_string(), format!("eq.{value}")));
        }
        if let Some((column, order)) = &self.order {
            pairs.push(("order".to_string(), format!("{column}.{}", order.suffix())));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::TableQuery;

    fn pairs(query: &TableQuery) -> Vec<(String, String)> {
        query.to_query_pairs()
    }

    #[test]
    fn plain_select_renders_star_projection() {
        let q = TableQuery::new("profiles").eq("id", "abc");
        assert_eq!(
            pairs(&q),
            vec![
                ("select".to_string(), "*".to_string()),
                ("id".to_string(), "eq.abc".to_string()),
            ]
        );
    }

    #[test]
    fn open_requests_filter_and_order() {
        let q = TableQuery::new("requests")
            .eq("status", "open_for_quotes")
            .order_desc("created_at");
        assert_eq!(
            pairs(&q),
            vec![
                ("select".to_string(), "*".to_string()),
                ("status".to_string(), "eq.open_for_quotes".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn embedded_resource_projection_is_preserved() {
        let q = TableQuery::new("quotes")
            .select("*,attorney:profiles!quotes_attorney_id_fkey(*)")
            .eq("request_id", 7)
            .order_desc("created_at");
        assert_eq!(
            pairs(&q)[0],
            (
                "select".to_string(),
                "*,attorney:profiles!quotes_attorney_id_fkey(*)".to_string()
            )
        );
        assert_eq!(pairs(&q)[1], ("request_id".to_string(), "eq.7".to_string()));
    }

    #[test]
    fn multiple_filters_keep_insertion_order() {
        let q = TableQuery::new("profiles")
            .eq("role", "attorney")
            .eq("verification_status", "verified");
        let rendered = pairs(&q);
        assert_eq!(rendered[1].0, "role");
        assert_eq!(rendered[2].0, "verification_status");
    }

    #[test]
    fn limit_renders_last() {
        let q = TableQuery::new("messages").order_asc("created_at").limit(50);
        let rendered = pairs(&q);
        assert_eq!(
            rendered.last(),
            Some(&("limit".to_string(), "50".to_string()))
        );
    }
}
