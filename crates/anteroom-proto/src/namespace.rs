//! Query namespaces.
//!
//! Every info/query stanza announces its purpose through the namespace of its
//! query element. The session core keys all startup gating and dispatch on
//! this enum; keeping it closed gives the dispatch table an exhaustive match.
//! Namespaces we do not recognize are preserved as [`Namespace::Other`] so the
//! core can ignore them without losing arrival-order bookkeeping.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A recognized query namespace, or `Other` for anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Session configuration delivered at startup.
    Startup,
    /// Contact roster.
    Roster,
    /// Room directory listing.
    RoomDirectory,
    /// Emoticon catalog.
    Emoticons,
    /// Own-profile data.
    Profile,
    /// Metadata update for a single room.
    RoomMetadata,
    /// Third-party integration push.
    Integration,
    /// Third-party integration UI push.
    IntegrationUi,
    /// Any namespace this client does not recognize.
    Other(String),
}

const STARTUP: &str = "http://anteroom.chat/protocol/startup";
const ROSTER: &str = "jabber:iq:roster";
const ROOM_DIRECTORY: &str = "http://jabber.org/protocol/disco#items";
const EMOTICONS: &str = "http://anteroom.chat/protocol/emoticons";
const PROFILE: &str = "http://anteroom.chat/protocol/profile";
const ROOM_METADATA: &str = "http://anteroom.chat/protocol/rooms";
const INTEGRATION: &str = "http://anteroom.chat/protocol/addons";
const INTEGRATION_UI: &str = "http://anteroom.chat/protocol/addons#ui";

impl Namespace {
    /// Map a namespace URI onto the enum. Never fails; unknown URIs become
    /// [`Namespace::Other`].
    pub fn from_uri(uri: &str) -> Self {
        match uri {
            STARTUP => Self::Startup,
            ROSTER => Self::Roster,
            ROOM_DIRECTORY => Self::RoomDirectory,
            EMOTICONS => Self::Emoticons,
            PROFILE => Self::Profile,
            ROOM_METADATA => Self::RoomMetadata,
            INTEGRATION => Self::Integration,
            INTEGRATION_UI => Self::IntegrationUi,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The canonical URI form.
    #[must_use]
    pub fn as_uri(&self) -> &str {
        match self {
            Self::Startup => STARTUP,
            Self::Roster => ROSTER,
            Self::RoomDirectory => ROOM_DIRECTORY,
            Self::Emoticons => EMOTICONS,
            Self::Profile => PROFILE,
            Self::RoomMetadata => ROOM_METADATA,
            Self::Integration => INTEGRATION,
            Self::IntegrationUi => INTEGRATION_UI,
            Self::Other(uri) => uri,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_uri())
    }
}

impl Serialize for Namespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_uri())
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_uri(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_round_trips() {
        let known = [
            Namespace::Startup,
            Namespace::Roster,
            Namespace::RoomDirectory,
            Namespace::Emoticons,
            Namespace::Profile,
            Namespace::RoomMetadata,
            Namespace::Integration,
            Namespace::IntegrationUi,
        ];
        for ns in known {
            assert_eq!(Namespace::from_uri(ns.as_uri()), ns);
        }
    }

    #[test]
    fn unknown_uri_is_preserved() {
        let ns = Namespace::from_uri("urn:example:unrecognized");
        assert_eq!(ns, Namespace::Other("urn:example:unrecognized".to_owned()));
        assert_eq!(ns.as_uri(), "urn:example:unrecognized");
    }
}
