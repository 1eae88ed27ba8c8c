use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Keeps a present key as-is, `null` included.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Semi-structured client description. Keys other than the well-known ones
/// are kept in `extra`, and every value is passed through unchanged whatever
/// its JSON type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ClientDescription {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Client {
    pub id_client: i32,
    pub id_parent: Option<i32>,
    pub description: ClientDescription,
    /// Opaque payload attached to the client.
    #[serde(default)]
    pub tags: Value,
    /// Distance from the traversal seed; only set on hierarchy results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<i32>,
}

/// Result of a content query.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ClientsPage {
    pub total: usize,
    pub content: Vec<Client>,
}

/// Result of an identifier-only query.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ClientIds {
    pub total: usize,
    pub id_client: Vec<i32>,
}

impl ClientsPage {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl ClientIds {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
