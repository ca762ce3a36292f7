use super::types::{AttributePath, FilterOp, FilterTerm, FilterValue, JoinTerm};

pub const DEFAULT_FILTER_PREFIX: &str = "filter_";

/// Turns `field[_operator]=value` pairs into filter terms.
///
/// Anything the grammar cannot make sense of (unknown operator token, empty
/// value, malformed `between`/`join` payload) is dropped without an error so
/// that unexpected query strings never break a listing.
pub struct FilterParser;

impl FilterParser {
    /// Keeps only keys carrying `prefix`, strips it, and de-duplicates keys
    /// (first occurrence wins). Order of first appearance is preserved.
    pub fn extract(params: &[(String, String)], prefix: &str) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = Vec::new();
        for (key, value) in params {
            let Some(stripped) = key.strip_prefix(prefix) else { continue };
            if out.iter().any(|(k, _)| k == stripped) {
                continue;
            }
            out.push((stripped.to_string(), value.clone()));
        }
        out
    }

    pub fn parse(params: &[(String, String)]) -> Vec<FilterTerm> {
        params
            .iter()
            .filter_map(|(key, raw)| Self::parse_term(key, raw))
            .collect()
    }

    pub fn parse_term(key: &str, raw: &str) -> Option<FilterTerm> {
        if raw.is_empty() {
            tracing::debug!("Skipping filter '{}': empty value", key);
            return None;
        }

        let (field, op) = match key.rsplit_once('_') {
            None => (key, FilterOp::Eq),
            Some((field, token)) => match FilterOp::from_token(token) {
                Some(op) => (field, op),
                None => {
                    tracing::debug!("Skipping filter '{}': unknown operator '{}'", key, token);
                    return None;
                }
            },
        };

        let Some(path) = AttributePath::parse(field) else {
            tracing::debug!("Skipping filter '{}': malformed field", key);
            return None;
        };

        let value = match op {
            FilterOp::In => FilterValue::List(raw.split(',').map(str::to_string).collect()),
            FilterOp::Between => {
                let parts: Vec<&str> = raw.split(',').collect();
                if parts.len() != 2 {
                    tracing::debug!("Skipping filter '{}': between needs exactly two values", key);
                    return None;
                }
                FilterValue::Range(parts[0].to_string(), parts[1].to_string())
            }
            FilterOp::Join => FilterValue::Join(Self::parse_join(key, raw)?),
            _ => FilterValue::Single(raw.to_string()),
        };

        Some(FilterTerm { path, op, value })
    }

    fn parse_join(key: &str, raw: &str) -> Option<JoinTerm> {
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() != 3 {
            tracing::debug!("Skipping filter '{}': join needs field:operator:value", key);
            return None;
        }
        let field = AttributePath::parse(parts[0])?;
        // Only `like` is honoured inside a join; anything else compares for equality.
        let op = match FilterOp::from_token(parts[1]) {
            Some(FilterOp::Like) => FilterOp::Like,
            _ => FilterOp::Eq,
        };
        Some(JoinTerm { field, op, value: parts[2].to_string() })
    }
}
