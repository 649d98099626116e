//! List query construction shared by the entity repositories.
//!
//! Filters are collected first and then applied to both the page query and
//! the matching `COUNT(*)` query so the two never drift apart.
//!
//! ```rust,no_run
//! use database_layer::models::Lead;
//! use database_layer::{ListQuery, SortOrder};
//! use sqlx::PgPool;
//!
//! async fn second_page(pool: &PgPool, client_id: Option<i64>) -> Result<Vec<Lead>, sqlx::Error> {
//!     let mut query = ListQuery::new();
//!     query
//!         .filter_eq("client_id", client_id)
//!         .filter_eq("lead_status_id", Some(1_i16))
//!         .order_by("created_on", SortOrder::Desc)
//!         .paginate(2, 50);
//!
//!     let mut select = query.select_query("SELECT * FROM leads");
//!     select.build_query_as::<Lead>().fetch_all(pool).await
//! }
//! ```

use sqlx::{Postgres, QueryBuilder};

/// Default page size when the caller sends none
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound accepted for `pageSize`
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than a case-insensitive `desc` sorts ascending.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Normalized paging and sorting input for a list call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u32,
    pub page_size: u32,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: String::new(),
            sort_order: SortOrder::Asc,
        }
    }
}

/// Bound value of a filter clause
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    BigInt(i64),
    Int(i32),
    SmallInt(i16),
    Bool(bool),
    Text(String),
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::BigInt(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Int(value)
    }
}

impl From<i16> for FilterValue {
    fn from(value: i16) -> Self {
        FilterValue::SmallInt(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterOp {
    Eq,
    ILike,
}

impl FilterOp {
    fn as_sql(self) -> &'static str {
        match self {
            FilterOp::Eq => " = ",
            FilterOp::ILike => " ILIKE ",
        }
    }
}

#[derive(Debug, Clone)]
struct Filter {
    column: &'static str,
    op: FilterOp,
    value: FilterValue,
}

/// Filter, order and page description for a single table listing.
///
/// Column names are `&'static str` so only compile-time identifiers ever
/// reach the SQL text; every value is bound.
#[derive(Debug, Clone)]
pub struct ListQuery {
    filters: Vec<Filter>,
    order_column: Option<&'static str>,
    order: SortOrder,
    page: u32,
    page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            order_column: None,
            order: SortOrder::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Add an equality filter (only if value is Some)
    pub fn filter_eq<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: Into<FilterValue>,
    {
        if let Some(value) = value {
            self.filters.push(Filter {
                column,
                op: FilterOp::Eq,
                value: value.into(),
            });
        }
        self
    }

    /// Add a case-insensitive substring filter (only if the term is non-blank)
    pub fn filter_contains(&mut self, column: &'static str, term: Option<&str>) -> &mut Self {
        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            self.filters.push(Filter {
                column,
                op: FilterOp::ILike,
                value: FilterValue::Text(format!("%{}%", escape_like(term))),
            });
        }
        self
    }

    /// Set the ORDER BY column and direction
    pub fn order_by(&mut self, column: &'static str, order: SortOrder) -> &mut Self {
        self.order_column = Some(column);
        self.order = order;
        self
    }

    /// Apply pagination, clamping to `1..` pages and `1..=MAX_PAGE_SIZE` rows
    pub fn paginate(&mut self, page: u32, page_size: u32) -> &mut Self {
        self.page = page.max(1);
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Row offset of the current page
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }

    /// Build `base WHERE <filters> ORDER BY .. LIMIT .. OFFSET ..`.
    ///
    /// `base` must be a plain `SELECT .. FROM table` without a WHERE clause.
    pub fn select_query(&self, base: &str) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new(base);
        self.push_filters(&mut query);

        if let Some(column) = self.order_column {
            query.push(format!(" ORDER BY {} {}", column, self.order.as_sql()));
        }

        query.push(" LIMIT ");
        query.push_bind(i64::from(self.page_size));
        query.push(" OFFSET ");
        query.push_bind(self.offset());
        query
    }

    /// Build `SELECT COUNT(*) FROM table WHERE <filters>`
    pub fn count_query(&self, table: &str) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", table));
        self.push_filters(&mut query);
        query
    }

    fn push_filters(&self, query: &mut QueryBuilder<'static, Postgres>) {
        query.push(" WHERE 1=1");
        for filter in &self.filters {
            query.push(format!(" AND {}{}", filter.column, filter.op.as_sql()));
            match &filter.value {
                FilterValue::BigInt(v) => query.push_bind(*v),
                FilterValue::Int(v) => query.push_bind(*v),
                FilterValue::SmallInt(v) => query.push_bind(*v),
                FilterValue::Bool(v) => query.push_bind(*v),
                FilterValue::Text(v) => query.push_bind(v.clone()),
            };
        }
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
