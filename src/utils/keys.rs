//! Key helpers.

use std::fmt::Display;

/// Joins a namespace and key parts with ':'.
///
/// `namespaced_key("invoices", ["2024", "open"])` yields `"invoices:2024:open"`.
pub fn namespaced_key<I>(namespace: &str, parts: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    parts
        .into_iter()
        .fold(namespace.to_string(), |mut key, part| {
            key.push(':');
            key.push_str(&part.to_string());
            key
        })
}

/// Key for a single record, e.g. `entity_key("supplier", 7)` -> `"supplier:7"`.
pub fn entity_key(entity: &str, id: impl Display) -> String {
    format!("{}:{}", entity, id)
}
