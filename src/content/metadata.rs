use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Flag(bool),
    String(String),
    Number(i64),
}

/// Payload metadata carried alongside renderable content (campaign, slot, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    inner: BTreeMap<String, MetadataValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Metadata {
            inner: BTreeMap::new(),
        }
    }

    pub fn insert_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), MetadataValue::String(value.into()));
    }

    pub fn insert_number(&mut self, key: impl Into<String>, value: i64) {
        self.inner.insert(key.into(), MetadataValue::Number(value));
    }

    pub fn insert_flag(&mut self, key: impl Into<String>, value: bool) {
        self.inner.insert(key.into(), MetadataValue::Flag(value));
    }

    // Later keys win.
    pub fn merge(&mut self, other: Metadata) {
        self.inner.extend(other.inner);
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.inner.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.inner.get(key)? {
            MetadataValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn get_number(&self, key: &str) -> Option<i64> {
        match self.inner.get(key)? {
            MetadataValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetadataValue)> {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_match_variant() {
        let mut metadata = Metadata::new();
        metadata.insert_string("campaign", "spring");
        metadata.insert_number("slot", 3);
        metadata.insert_flag("sponsored", true);

        assert_eq!(metadata.get_str("campaign"), Some("spring"));
        assert_eq!(metadata.get_number("slot"), Some(3));
        assert_eq!(metadata.get_str("slot"), None);
        assert_eq!(metadata.get("sponsored"), Some(&MetadataValue::Flag(true)));
    }

    #[test]
    fn merge_overrides_and_serializes_untagged() {
        let mut base = Metadata::new();
        base.insert_number("slot", 1);
        base.insert_string("campaign", "spring");

        let mut overrides = Metadata::new();
        overrides.insert_number("slot", 2);
        base.merge(overrides);

        assert_eq!(base.get_number("slot"), Some(2));
        assert_eq!(
            serde_json::to_string(&base).unwrap(),
            r#"{"campaign":"spring","slot":2}"#
        );
    }
}
