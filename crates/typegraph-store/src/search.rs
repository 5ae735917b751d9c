//! Search filtering over decoded struct definitions.

use std::collections::BTreeMap;
use typegraph_model::StructDef;

/// Parameter-based filter applied to search results.
///
/// Recognized parameters are [`SearchFilter::PARAM_NAME`] and
/// [`SearchFilter::PARAM_GUID`]; unknown parameters are ignored.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    params: BTreeMap<String, String>,
}

impl SearchFilter {
    /// Match on the definition name.
    pub const PARAM_NAME: &'static str = "name";
    /// Match on the definition guid.
    pub const PARAM_GUID: &'static str = "guid";

    /// Create an empty filter, which matches every definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Look up a parameter value.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Whether the definition satisfies every recognized parameter.
    pub fn matches(&self, def: &StructDef) -> bool {
        if let Some(name) = self.param(Self::PARAM_NAME) {
            if def.name != name {
                return false;
            }
        }
        if let Some(guid) = self.param(Self::PARAM_GUID) {
            if def.guid.as_deref() != Some(guid) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = SearchFilter::new();

        assert!(filter.matches(&StructDef::new("A")));
        assert!(filter.matches(&StructDef::new("B").with_guid("g-1")));
    }

    #[test]
    fn test_name_filter() {
        let filter = SearchFilter::new().with_param(SearchFilter::PARAM_NAME, "A");

        assert!(filter.matches(&StructDef::new("A")));
        assert!(!filter.matches(&StructDef::new("B")));
    }

    #[test]
    fn test_guid_filter() {
        let filter = SearchFilter::new().with_param(SearchFilter::PARAM_GUID, "g-1");

        assert!(filter.matches(&StructDef::new("A").with_guid("g-1")));
        assert!(!filter.matches(&StructDef::new("A").with_guid("g-2")));
        assert!(!filter.matches(&StructDef::new("A")));
    }

    #[test]
    fn test_unknown_params_are_ignored() {
        let filter = SearchFilter::new().with_param("supertype", "Asset");

        assert!(filter.matches(&StructDef::new("A")));
    }
}
