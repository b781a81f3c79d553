//! Domain records returned by the Maestro API.
//!
//! Records are flat attribute bags: every field comes from an XML attribute
//! of a well-known element and is kept as the server's string. Missing
//! attributes decode to empty strings. Typed accessors at the bottom of the
//! file parse the numeric-looking fields on demand.

use serde::{Deserialize, Serialize};

// ── Records ─────────────────────────────────────────────────────────────

/// `<instance .../>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename = "@instanceID", default)]
    pub id: String,
    #[serde(rename = "@region", default)]
    pub region: String,
    #[serde(rename = "@state", default)]
    pub state: String,
    #[serde(rename = "@cpu", default)]
    pub cpu: String,
    #[serde(rename = "@memory", default)]
    pub memory: String,
    #[serde(rename = "@requested", default)]
    pub requested: String,
    #[serde(rename = "@owner", default)]
    pub owner: String,
    #[serde(rename = "@image", default)]
    pub image: String,
    #[serde(rename = "@shape", default)]
    pub shape: String,
    #[serde(rename = "@guestOS", default)]
    pub guest_os: String,
    #[serde(rename = "@privateIP", default)]
    pub private_ip: String,
    #[serde(rename = "@instanceName", default)]
    pub instance_name: String,
}

/// `<image .../>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(rename = "@description", default)]
    pub description: String,
    #[serde(rename = "@group", default)]
    pub group: String,
    #[serde(rename = "@state", default)]
    pub state: String,
    #[serde(rename = "@size_MB", default)]
    pub size_mb: String,
}

/// `<shape .../>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@cpu", default)]
    pub cpu: String,
    #[serde(rename = "@memory_MB", default)]
    pub memory_mb: String,
}

/// `<key .../>`; the private half is only present in create responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@owner", default)]
    pub owner: String,
    #[serde(rename = "@project", default)]
    pub project: String,
    #[serde(rename = "@privateKey", default)]
    pub private_key: String,
    #[serde(rename = "@publicKey", default)]
    pub public_key: String,
}

/// `<project .../>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "@projectID", default)]
    pub id: String,
}

/// `<region .../>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "@id", default)]
    pub id: String,
}

// ── Payload wrappers ────────────────────────────────────────────────────
//
// The `*-response` element inside a status envelope. Single-record
// responses normally hold one child but may repeat it; listing responses
// hold zero or more.

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InstanceSet {
    #[serde(rename = "instance", default)]
    pub instances: Vec<Instance>,
}

impl InstanceSet {
    /// The described instance. A repeated element resolves to the last one;
    /// none at all gives an empty record.
    pub fn into_instance(mut self) -> Instance {
        self.instances.pop().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KeySet {
    #[serde(rename = "key", default)]
    pub keys: Vec<Key>,
}

impl KeySet {
    /// Last `<key>` in the reply, or an empty key.
    pub fn into_key(mut self) -> Key {
        self.keys.pop().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageList {
    #[serde(rename = "image", default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShapeList {
    #[serde(rename = "shape", default)]
    pub shapes: Vec<Shape>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectList {
    #[serde(rename = "project", default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegionList {
    #[serde(rename = "region", default)]
    pub regions: Vec<Region>,
}

// ── Typed accessors ─────────────────────────────────────────────────────

fn parse_num<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

impl Instance {
    /// A zero-valued record, as returned for lookups that found nothing.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    pub fn cpu_count(&self) -> Option<u32> {
        parse_num(&self.cpu)
    }

    pub fn memory_mb(&self) -> Option<u64> {
        parse_num(&self.memory)
    }
}

impl Image {
    pub fn size_mb(&self) -> Option<u64> {
        parse_num(&self.size_mb)
    }
}

impl Shape {
    pub fn cpu_count(&self) -> Option<u32> {
        parse_num(&self.cpu)
    }

    pub fn memory_mb(&self) -> Option<u64> {
        parse_num(&self.memory_mb)
    }
}

impl Key {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}
