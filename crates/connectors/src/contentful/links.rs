use crate::contentful::response::EntriesResponse;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// `(linkType, id)` pair identifying a linked resource.
type LinkKey = (String, String);

/// Replaces link objects in item fields with the resources delivered in the
/// same response. Resolution is one level deep: links inside the inlined
/// resources are left as they are. Links with no matching resource are
/// removed.
pub struct LinkResolver {
    targets: HashMap<LinkKey, Value>,
}

impl LinkResolver {
    pub fn new(response: &EntriesResponse) -> Self {
        let mut resolver = LinkResolver {
            targets: HashMap::new(),
        };
        for resource in response
            .items
            .iter()
            .chain(&response.includes.entries)
            .chain(&response.includes.assets)
        {
            resolver.index(resource);
        }
        resolver
    }

    fn index(&mut self, resource: &Value) {
        let sys = resource.get("sys");
        let kind = sys.and_then(|s| s.get("type")).and_then(Value::as_str);
        let id = sys.and_then(|s| s.get("id")).and_then(Value::as_str);
        if let (Some(kind), Some(id)) = (kind, id) {
            self.targets
                .entry((kind.to_string(), id.to_string()))
                .or_insert_with(|| resource.clone());
        }
    }

    /// Resolves the links held in `item.fields.<field>.<locale>`.
    pub fn resolve_item(&self, mut item: Value) -> Value {
        if let Some(Value::Object(fields)) = item.get_mut("fields") {
            for field in fields.values_mut() {
                if let Value::Object(locales) = field {
                    let resolved: Map<String, Value> = std::mem::take(locales)
                        .into_iter()
                        .filter_map(|(locale, value)| {
                            self.resolve_value(value).map(|value| (locale, value))
                        })
                        .collect();
                    *locales = resolved;
                }
            }
        }
        item
    }

    /// `None` means the value was an unresolved link and must be dropped.
    fn resolve_value(&self, value: Value) -> Option<Value> {
        if let Some(key) = link_key(&value) {
            return self.targets.get(&key).cloned();
        }

        match value {
            Value::Array(list) => Some(Value::Array(
                list.into_iter()
                    .filter_map(|item| match link_key(&item) {
                        Some(key) => self.targets.get(&key).cloned(),
                        None => Some(item),
                    })
                    .collect(),
            )),
            other => Some(other),
        }
    }
}

/// Returns the `(linkType, id)` of a link object, or `None` for any other
/// value.
pub fn link_key(value: &Value) -> Option<LinkKey> {
    let sys = value.get("sys")?;
    if sys.get("type")?.as_str()? != "Link" {
        return None;
    }
    let link_type = sys.get("linkType")?.as_str()?;
    let id = sys.get("id")?.as_str()?;
    Some((link_type.to_string(), id.to_string()))
}
