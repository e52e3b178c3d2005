use crate::icon::IconName;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Angle value stored in configs whose position on the ring is not pinned.
pub const UNPINNED: f64 = -1.0;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemTypeId(String);

crate::impl_string_newtype!(ItemTypeId);

#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct ItemName(String);

crate::impl_string_newtype!(ItemName);

/// One entry of a menu tree as handed to the editor.
///
/// The editor only looks at `angle` and, through the catalog, at `kind`.
/// Everything else is carried along untouched so it survives drag payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemConfig {
    #[serde(rename = "type")]
    pub kind: ItemTypeId,
    #[serde(default)]
    pub name: ItemName,
    #[serde(default)]
    pub icon: IconName,
    #[serde(default = "unpinned")]
    pub angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ItemConfig>,
}

fn unpinned() -> f64 {
    UNPINNED
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Malformed item payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl ItemConfig {
    pub fn new(kind: ItemTypeId, name: ItemName, icon: IconName) -> Self {
        Self {
            kind,
            name,
            icon,
            angle: UNPINNED,
            shortcut: None,
            data: serde_json::Value::Null,
            children: Vec::new(),
        }
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_children(mut self, children: Vec<ItemConfig>) -> Self {
        self.children = children;
        self
    }

    /// The pinned angle in degrees, if any. Negative values mean "free".
    pub fn fixed_angle(&self) -> Option<f64> {
        (self.angle >= 0.0).then_some(self.angle)
    }

    pub fn to_payload(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_payload(payload: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Reads only the `type` field of a drag payload.
pub fn peek_type(payload: &str) -> Result<ItemTypeId, PayloadError> {
    #[derive(Deserialize)]
    struct TypeOnly {
        #[serde(rename = "type")]
        kind: ItemTypeId,
    }

    let TypeOnly { kind } = serde_json::from_str(payload)?;
    Ok(kind)
}
