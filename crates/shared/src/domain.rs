use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

macro_rules! string_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id_newtype!(DeviceId);

pub type DeviceLabel = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceDirection {
    Input,
    Output,
}

impl fmt::Display for DeviceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Device id to label mapping that keeps the order the host supplied.
///
/// Order is significant: the first entry is the default selection. Inserting
/// an id that is already present replaces its label in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceMap {
    entries: Vec<(DeviceId, DeviceLabel)>,
}

impl DeviceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<DeviceId>, label: impl Into<DeviceLabel>) {
        let id = id.into();
        let label = label.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, existing_label)) => *existing_label = label,
            None => self.entries.push((id, label)),
        }
    }

    pub fn first_key(&self) -> Option<&DeviceId> {
        self.entries.first().map(|(id, _)| id)
    }

    pub fn contains(&self, id: &DeviceId) -> bool {
        self.entries.iter().any(|(existing, _)| existing == id)
    }

    pub fn label(&self, id: &DeviceId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, label)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DeviceId, &str)> {
        self.entries.iter().map(|(id, label)| (id, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<String> for DeviceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<K, V> FromIterator<(K, V)> for DeviceMap
where
    K: Into<DeviceId>,
    V: Into<DeviceLabel>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, label) in iter {
            map.insert(id, label);
        }
        map
    }
}

impl Serialize for DeviceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, label) in &self.entries {
            map.serialize_entry(id, label)?;
        }
        map.end()
    }
}

struct DeviceMapVisitor;

impl<'de> Visitor<'de> for DeviceMapVisitor {
    type Value = DeviceMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of device id to device label")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = DeviceMap::new();
        while let Some((id, label)) = access.next_entry::<DeviceId, DeviceLabel>()? {
            map.insert(id, label);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for DeviceMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DeviceMapVisitor)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
