//! Chaos route list conversions.
//!
//! On the wire routes are a list of path prefixes; in the editor they are a
//! single comma-separated string.

use serde_json::Value;

/// Separator used when joining routes for editing.
pub const ROUTE_SEPARATOR: &str = ", ";

/// Split the edit form into a route list.
///
/// Segments are trimmed, empty segments dropped and repeats removed, keeping
/// the first occurrence.
pub fn split_routes(input: &str) -> Vec<String> {
    let mut routes: Vec<String> = Vec::new();
    for segment in input.split(',') {
        let route = segment.trim();
        if route.is_empty() || routes.iter().any(|r| r == route) {
            continue;
        }
        routes.push(route.to_string());
    }
    routes
}

/// Join a route list into its edit form.
pub fn join_routes(routes: &[String]) -> String {
    routes.join(ROUTE_SEPARATOR)
}

/// Read routes from loosely typed input: an array of strings or a
/// comma-separated string. Returns `None` for any other shape.
pub(crate) fn routes_from_value(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::String(s) => Some(split_routes(s)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_then_split_preserves_order() {
        let routes = vec!["/api".to_string(), "/graphql".to_string(), "/v2/users".to_string()];
        let joined = join_routes(&routes);
        assert_eq!(joined, "/api, /graphql, /v2/users");
        assert_eq!(split_routes(&joined), routes);
    }

    #[test]
    fn test_split_drops_empty_segments() {
        assert_eq!(split_routes("/api,, /graphql ,"), vec!["/api", "/graphql"]);
        assert_eq!(split_routes("  ,  , "), Vec::<String>::new());
        assert_eq!(split_routes(""), Vec::<String>::new());
    }

    #[test]
    fn test_split_collapses_whitespace_and_repeats() {
        assert_eq!(split_routes("/api ,   /api,/health"), vec!["/api", "/health"]);
    }

    #[test]
    fn test_routes_from_value_shapes() {
        assert_eq!(
            routes_from_value(&json!([" /api ", "", "/x", 5])),
            Some(vec!["/api".to_string(), "/x".to_string()])
        );
        assert_eq!(
            routes_from_value(&json!("/a, /b")),
            Some(vec!["/a".to_string(), "/b".to_string()])
        );
        assert_eq!(routes_from_value(&json!(42)), None);
    }
}
