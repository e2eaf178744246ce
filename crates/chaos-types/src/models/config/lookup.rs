//! Case-insensitive field lookup on loosely typed objects.

use serde_json::Value;

/// First non-null value whose key matches one of `names`, ignoring ASCII case.
///
/// Names are tried in order; for each name the exact spelling wins over a
/// case-folded one. Non-objects have no fields.
pub(crate) fn field<'a>(raw: &'a Value, names: &[&str]) -> Option<&'a Value> {
    let obj = raw.as_object()?;
    names.iter().find_map(|name| {
        obj.get(*name).filter(|v| !v.is_null()).or_else(|| {
            obj.iter()
                .find(|(key, v)| !v.is_null() && key.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
    })
}
