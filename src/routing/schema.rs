//! Serialized schema: the value handed to clients.
//!
//! Wire form (JSON):
//! ```text
//! {
//!   "<resource>": {
//!     "url": "<template or empty>",
//!     "endpoint": {
//!       "<endpoint>": { "url": "...", "params": ["..."], "allow": ["GET", ...] }
//!     }
//!   }
//! }
//! ```
//!
//! Maps are ordered so repeated exports serialize byte-identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Version of the wire shape, served alongside the schema.
pub const SCHEMA_VERSION: u32 = 1;

/// Header carrying [`SCHEMA_VERSION`] on the metadata route.
pub const SCHEMA_VERSION_HEADER: &str = "x-schema-version";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializedSchema {
    pub resources: BTreeMap<String, ResourceSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSchema {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub endpoint: BTreeMap<String, EndpointSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSchema {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub params: Vec<String>,

    #[serde(default)]
    pub allow: Vec<String>,
}

impl SerializedSchema {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    /// Every addressable key: `resource` for each primary URL, then
    /// `resource:endpoint` for each named endpoint.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for (name, resource) in &self.resources {
            keys.push(name.clone());
            keys.extend(resource.endpoint.keys().map(|e| format!("{name}:{e}")));
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_matches_contract() {
        let json = r#"{
            "resource": {
                "url": "/api/v1/resource/",
                "endpoint": {
                    "single": {"url": "/api/v1/resource/:id/", "params": ["id"], "allow": ["GET"]}
                }
            },
            "nourl": {"url": "", "endpoint": {"list": {"url": "", "params": [], "allow": []}}}
        }"#;
        let schema = SerializedSchema::from_json(json).unwrap();
        assert_eq!(schema.resources["resource"].endpoint["single"].params, ["id"]);
        assert_eq!(schema.resources["nourl"].url, "");

        let value: serde_json::Value = serde_json::from_str(&schema.to_json().unwrap()).unwrap();
        assert_eq!(value["resource"]["endpoint"]["single"]["allow"][0], "GET");
    }

    #[test]
    fn missing_fields_default() {
        let schema = SerializedSchema::from_json(r#"{"bare": {}}"#).unwrap();
        assert_eq!(schema.resources["bare"], ResourceSchema::default());
    }

    #[test]
    fn keys_list_primary_then_endpoints() {
        let schema = SerializedSchema::from_json(
            r#"{"r": {"url": "/r/", "endpoint": {"b": {"url": "/b/"}, "a": {"url": "/a/"}}}}"#,
        )
        .unwrap();
        assert_eq!(schema.keys(), ["r", "r:a", "r:b"]);
    }
}
