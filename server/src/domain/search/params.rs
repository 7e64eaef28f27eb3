//! Raw search request
//!
//! Query strings arrive as untyped key/value pairs. Repeated keys are kept
//! together as an ordered list so array parameters survive both encodings
//! (`amenities=wifi,gym` and `amenities=wifi&amenities=gym`).

/// Raw key → values mapping from the transport layer
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    entries: Vec<(String, Vec<String>)>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded query pairs, grouping repeated keys in order of first appearance
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut request = Self::new();
        for (key, value) in pairs {
            request.push(key, value);
        }
        request
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// All raw values for a key
    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// First alias (in priority order) carrying at least one non-blank value
    pub fn resolve(&self, aliases: &[&'static str]) -> Option<(&'static str, &[String])> {
        aliases.iter().find_map(|alias| {
            self.values(alias)
                .filter(|values| values.iter().any(|v| !v.trim().is_empty()))
                .map(|values| (*alias, values))
        })
    }

    /// First non-blank value under any of the aliases, trimmed
    pub fn first(&self, aliases: &[&'static str]) -> Option<(&'static str, &str)> {
        let (alias, values) = self.resolve(aliases)?;
        values
            .iter()
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(|v| (alias, v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys_grouped() {
        let req = SearchRequest::from_pairs([
            ("amenities", "wifi"),
            ("city", "Austin"),
            ("amenities", "gym"),
        ]);
        assert_eq!(
            req.values("amenities").unwrap(),
            &["wifi".to_string(), "gym".to_string()]
        );
        assert_eq!(req.keys().collect::<Vec<_>>(), vec!["amenities", "city"]);
    }

    #[test]
    fn test_resolve_first_alias_wins() {
        let req = SearchRequest::from_pairs([("minBudget", "200"), ("budgetMin", "100")]);
        let (alias, values) = req.resolve(&["budgetMin", "minBudget"]).unwrap();
        assert_eq!(alias, "budgetMin");
        assert_eq!(values, &["100".to_string()]);
    }

    #[test]
    fn test_resolve_skips_blank_alias() {
        let req = SearchRequest::from_pairs([("budgetMin", "  "), ("minBudget", "200")]);
        assert_eq!(
            req.first(&["budgetMin", "minBudget"]),
            Some(("minBudget", "200"))
        );
    }

    #[test]
    fn test_missing_key() {
        let req = SearchRequest::new();
        assert!(req.is_empty());
        assert!(req.values("city").is_none());
        assert!(req.first(&["city"]).is_none());
    }
}
