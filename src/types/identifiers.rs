use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

/// Marketplace the advertisement will be rendered on. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MarketplaceId(String);

impl MarketplaceId {
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        Self::try_from(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MarketplaceId {
    type Error = IdentifierError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        if raw.is_empty() {
            return Err(IdentifierError::Empty("marketplace id"));
        }
        Ok(MarketplaceId(raw))
    }
}

impl From<MarketplaceId> for String {
    fn from(id: MarketplaceId) -> Self {
        id.0
    }
}

impl fmt::Display for MarketplaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentifierError> {
        Self::try_from(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentId {
    type Error = IdentifierError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        if raw.is_empty() {
            return Err(IdentifierError::Empty("content id"));
        }
        Ok(ContentId(raw))
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Customer the advertisement is generated for. Carries no validity constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(raw: impl Into<String>) -> Self {
        CustomerId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Content hash version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentVersion(String);

impl ContentVersion {
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        ContentVersion(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marketplace_id_rejects_empty() {
        assert_eq!(
            MarketplaceId::parse(""),
            Err(IdentifierError::Empty("marketplace id"))
        );
        assert_eq!(MarketplaceId::parse("US").unwrap().as_str(), "US");
        // Whitespace is a strange but non-empty identifier.
        assert!(MarketplaceId::parse(" ").is_ok());
    }

    #[test]
    fn identifiers_validate_when_deserialized() {
        let id: MarketplaceId = serde_json::from_str(r#""DE""#).unwrap();
        assert_eq!(id.as_str(), "DE");
        assert!(serde_json::from_str::<MarketplaceId>(r#""""#).is_err());
        assert!(serde_json::from_str::<ContentId>(r#""""#).is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""DE""#);
    }

    #[test]
    fn content_id_rejects_empty() {
        assert!(ContentId::new("").is_err());
        assert_eq!(ContentId::new("ad-1").unwrap().to_string(), "ad-1");
    }

    #[test]
    fn content_version_is_prefixed_sha256() {
        let version = ContentVersion::from_content(b"");
        assert_eq!(
            version.as_str(),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
