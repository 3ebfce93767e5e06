//! Protocol addresses.
//!
//! An address (`Jid`) has the shape `local@domain/resource`. The `local` and
//! `resource` parts are optional: rooms and users are addressed by their bare
//! form `local@domain`, while a single connected client is addressed by the
//! full form including the resource. Equality and hashing include the
//! resource, so callers that want identity-per-user must compare [`Jid::bare`]
//! forms.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::AddressError;

/// A protocol address: `local@domain/resource`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Jid {
    local: Option<String>,
    domain: String,
    resource: Option<String>,
}

impl Jid {
    /// Create a bare address from its parts.
    pub fn new(local: Option<&str>, domain: &str) -> Self {
        Self { local: local.map(str::to_owned), domain: domain.to_owned(), resource: None }
    }

    /// Attach a resource, consuming self.
    #[must_use]
    pub fn with_resource(mut self, resource: &str) -> Self {
        self.resource = Some(resource.to_owned());
        self
    }

    /// The local part, if any.
    #[must_use]
    pub fn local(&self) -> Option<&str> {
        self.local.as_deref()
    }

    /// The domain part.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The resource part, if any.
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// The bare form of this address (resource stripped).
    #[must_use]
    pub fn bare(&self) -> Jid {
        Jid { local: self.local.clone(), domain: self.domain.clone(), resource: None }
    }

    /// True if this address carries no resource.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.resource.is_none()
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(local) = &self.local {
            write!(f, "{local}@")?;
        }
        write!(f, "{}", self.domain)?;
        if let Some(resource) = &self.resource {
            write!(f, "/{resource}")?;
        }
        Ok(())
    }
}

impl FromStr for Jid {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AddressError::Empty);
        }

        let (bare, resource) = match s.split_once('/') {
            Some((bare, resource)) if !resource.is_empty() => (bare, Some(resource.to_owned())),
            Some((bare, _)) => (bare, None),
            None => (s, None),
        };

        let (local, domain) = match bare.split_once('@') {
            Some((local, domain)) if !local.is_empty() => (Some(local.to_owned()), domain),
            Some((_, domain)) => (None, domain),
            None => (None, bare),
        };

        if domain.is_empty() {
            return Err(AddressError::MissingDomain);
        }

        Ok(Jid { local, domain: domain.to_owned(), resource })
    }
}

impl Serialize for Jid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Jid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
