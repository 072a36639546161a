//! Row filters understood by the BaaS row API.
//!
//! A [`Query`] renders to PostgREST query parameters (`col=eq.value`,
//! `order=col.asc`, ...) for the HTTP client, and is evaluated directly by the
//! in-memory connector used in tests.

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, String),
    In(String, Vec<String>),
    Gte(String, String),
    Lte(String, String),
    /// Case-insensitive substring match on any of the columns
    Search(Vec<String>, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push(Filter::Eq(column.to_string(), value.to_string()));
        self
    }

    pub fn is_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let values = values.into_iter().map(|v| v.to_string()).collect();
        self.filters.push(Filter::In(column.to_string(), values));
        self
    }

    pub fn gte(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push(Filter::Gte(column.to_string(), value.to_string()));
        self
    }

    pub fn lte(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push(Filter::Lte(column.to_string(), value.to_string()));
        self
    }

    pub fn search(mut self, columns: &[&str], term: &str) -> Self {
        self.filters.push(Filter::Search(
            columns.iter().map(|c| c.to_string()).collect(),
            term.to_string(),
        ));
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(OrderBy {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// PostgREST query parameters, excluding `select`
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|filter| match filter {
                Filter::Eq(col, value) => (col.clone(), format!("eq.{}", value)),
                Filter::Gte(col, value) => (col.clone(), format!("gte.{}", value)),
                Filter::Lte(col, value) => (col.clone(), format!("lte.{}", value)),
                Filter::In(col, values) => {
                    let list = values
                        .iter()
                        .map(|v| quote(v))
                        .collect::<Vec<_>>()
                        .join(",");
                    (col.clone(), format!("in.({})", list))
                }
                Filter::Search(cols, term) => {
                    let pattern = quote(&format!("*{}*", term.replace('*', "")));
                    let any = cols
                        .iter()
                        .map(|c| format!("{}.ilike.{}", c, pattern))
                        .collect::<Vec<_>>()
                        .join(",");
                    ("or".to_string(), format!("({})", any))
                }
            })
            .collect();

        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push((
                "order".to_string(),
                format!("{}.{}.nullslast", order.column, direction),
            ));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}

/// Values inside `in.(...)` and `or=(...)` lists are double-quoted so that
/// reserved characters in user input cannot alter the filter tree.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}
