use serde::Deserialize;
use serde_json::Value;

/// Body of a `GET /entries` collection response.
#[derive(Debug, Default, Deserialize)]
pub struct EntriesResponse {
    #[serde(default)]
    pub items: Vec<Value>,

    #[serde(default)]
    pub total: usize,

    #[serde(default)]
    pub skip: usize,

    #[serde(default)]
    pub limit: usize,

    #[serde(default)]
    pub includes: Includes,
}

/// Linked resources delivered alongside the items when `include > 0`.
#[derive(Debug, Default, Deserialize)]
pub struct Includes {
    #[serde(rename = "Entry", default)]
    pub entries: Vec<Value>,

    #[serde(rename = "Asset", default)]
    pub assets: Vec<Value>,
}
