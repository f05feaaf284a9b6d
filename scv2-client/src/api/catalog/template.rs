//! Path templates with `{placeholder}` segments

use std::collections::BTreeMap;
use std::fmt;

use crate::api::error::ConfigError;

/// An endpoint path such as `designs/{id}/elements/{elementId}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTemplate(&'static str);

impl PathTemplate {
    pub(crate) const fn new(template: &'static str) -> Self {
        Self(template)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Placeholder names in order of appearance
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.0;

        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start + 1..].find('}') else {
                break;
            };
            names.push(&rest[start + 1..start + 1 + len]);
            rest = &rest[start + len + 2..];
        }

        names
    }

    pub fn has_placeholders(&self) -> bool {
        !self.placeholders().is_empty()
    }

    /// Substitute every placeholder with its percent-encoded value
    ///
    /// Fails with `MissingPathParameter` naming the first placeholder that has no value.
    pub fn resolve(&self, params: &BTreeMap<String, String>) -> Result<String, ConfigError> {
        let mut resolved = String::with_capacity(self.0.len());
        let mut rest = self.0;

        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start + 1..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + 1 + len];
            let value = params
                .get(name)
                .ok_or_else(|| ConfigError::MissingPathParameter {
                    name: name.to_string(),
                })?;

            resolved.push_str(&rest[..start]);
            resolved.push_str(&urlencoding::encode(value));
            rest = &rest[start + len + 2..];
        }

        resolved.push_str(rest);
        Ok(resolved)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_placeholders_in_order() {
        let template = PathTemplate::new("designs/{id}/elements/{elementId}");
        assert_eq!(template.placeholders(), vec!["id", "elementId"]);
        assert!(!PathTemplate::new("accounts").has_placeholders());
    }

    #[test]
    fn test_resolve_substitutes_values() {
        let template = PathTemplate::new("accounts/{id}");
        assert_eq!(template.resolve(&params(&[("id", "42")])).unwrap(), "accounts/42");
    }

    #[test]
    fn test_resolve_encodes_values() {
        let template = PathTemplate::new("designs/{id}");
        assert_eq!(
            template.resolve(&params(&[("id", "a b/c")])).unwrap(),
            "designs/a%20b%2Fc"
        );
    }

    #[test]
    fn test_resolve_names_first_missing_parameter() {
        let template = PathTemplate::new("designs/{id}/elements/{elementId}");

        assert_eq!(
            template.resolve(&params(&[])).unwrap_err(),
            ConfigError::MissingPathParameter { name: "id".to_string() }
        );
        assert_eq!(
            template.resolve(&params(&[("id", "1")])).unwrap_err(),
            ConfigError::MissingPathParameter { name: "elementId".to_string() }
        );
    }

    #[test]
    fn test_unused_parameters_are_ignored() {
        let template = PathTemplate::new("leads");
        assert_eq!(template.resolve(&params(&[("id", "1")])).unwrap(), "leads");
    }
}
