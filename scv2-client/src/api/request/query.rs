//! Reusable set of OData query options

use std::collections::BTreeMap;

use super::{QueryParameter, RequestBuilder};

/// Query options for a GET, kept as opaque strings
///
/// Mirrors the dedicated builder calls so batch entries and dependent-request
/// transforms can describe a query without holding a builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub filter: Option<String>,
    pub select: Option<String>,
    pub orderby: Option<String>,
    pub search: Option<String>,
    pub top: Option<u32>,
    pub skip: Option<u32>,
    pub exclude: Option<String>,
    pub expand: Option<String>,
    pub count: Option<bool>,
    /// Anything else, passed through verbatim
    pub extra: BTreeMap<String, String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filter = Some(expression.into());
        self
    }

    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select = Some(join_fields(fields));
        self
    }

    pub fn orderby(mut self, expression: impl Into<String>) -> Self {
        self.orderby = Some(expression.into());
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    pub fn top(mut self, count: u32) -> Self {
        self.top = Some(count);
        self
    }

    pub fn skip(mut self, count: u32) -> Self {
        self.skip = Some(count);
        self
    }

    pub fn exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude = Some(join_fields(fields));
        self
    }

    pub fn expand<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.expand = Some(join_fields(relations));
        self
    }

    pub fn count(mut self, count: bool) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Key/value pairs with OData keys, skipping unset options
    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = self.extra.clone();

        let options = [
            (QueryParameter::Filter, self.filter.clone()),
            (QueryParameter::Select, self.select.clone()),
            (QueryParameter::OrderBy, self.orderby.clone()),
            (QueryParameter::Search, self.search.clone()),
            (QueryParameter::Top, self.top.map(|n| n.to_string())),
            (QueryParameter::Skip, self.skip.map(|n| n.to_string())),
            (QueryParameter::Exclude, self.exclude.clone()),
            (QueryParameter::Expand, self.expand.clone()),
            (QueryParameter::Count, self.count.map(|b| b.to_string())),
        ];

        for (param, value) in options {
            if let Some(value) = value {
                params.insert(param.key().to_string(), value);
            }
        }

        params
    }

    pub fn is_empty(&self) -> bool {
        self.to_params().is_empty()
    }

    pub(crate) fn apply(&self, builder: &mut RequestBuilder) {
        for (key, value) in self.to_params() {
            builder.with_param(key, value);
        }
    }
}

/// Join list-valued parameters with `,`, preserving order
pub(crate) fn join_fields<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| f.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_options_are_skipped() {
        let params = QueryOptions::new().filter("status eq 'OPEN'").top(10).to_params();

        assert_eq!(params.len(), 2);
        assert_eq!(params["$filter"], "status eq 'OPEN'");
        assert_eq!(params["$top"], "10");
    }

    #[test]
    fn test_list_options_join_in_order() {
        let params = QueryOptions::new()
            .select(["id", "displayId", "name"])
            .exclude(vec!["notes".to_string(), "attachments".to_string()])
            .count(true)
            .to_params();

        assert_eq!(params["$select"], "id,displayId,name");
        assert_eq!(params["$exclude"], "notes,attachments");
        assert_eq!(params["$count"], "true");
    }

    #[test]
    fn test_known_option_overrides_extra_with_same_key() {
        let params = QueryOptions::new()
            .with_param("$top", "5")
            .with_param("sap-language", "EN")
            .top(20)
            .to_params();

        assert_eq!(params["$top"], "20");
        assert_eq!(params["sap-language"], "EN");
    }
}
