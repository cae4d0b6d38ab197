use crate::core::identifiers::EntryId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// System metadata attached to every entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    pub id: EntryId,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// One raw content entry, as delivered by the content source with
/// `locale=*`: every field is a locale-map. Reference fields hold the
/// referenced entry inline (one level deep), still in raw JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub sys: Sys,

    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Entry {
    pub fn new(id: impl Into<EntryId>, fields: Map<String, Value>) -> Self {
        Entry {
            sys: Sys {
                id: id.into(),
                kind: Some("Entry".to_string()),
            },
            fields,
        }
    }

    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn id(&self) -> &EntryId {
        &self.sys.id
    }
}

/// `fields` object of an inlined (referenced) entry.
pub fn fields_of(entry: &Value) -> Option<&Map<String, Value>> {
    entry.get("fields")?.as_object()
}
