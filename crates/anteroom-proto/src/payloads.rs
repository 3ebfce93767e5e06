//! Typed query payloads.
//!
//! Each recognized namespace carries a typed payload; [`QueryPayload`] is the
//! tagged union the session core dispatches on. Payloads for namespaces the
//! client does not recognize keep only their namespace URI.

use serde::{Deserialize, Serialize};

use crate::{address::Jid, namespace::Namespace};

/// The query element of an info/query stanza, keyed by namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryPayload {
    /// Session configuration (`startup` namespace).
    Startup(SessionConfig),
    /// Contact roster.
    Roster(RosterPayload),
    /// Room directory listing.
    RoomDirectory(RoomDirectoryPayload),
    /// Emoticon catalog.
    Emoticons(EmoticonCatalog),
    /// Own-profile data.
    Profile(Profile),
    /// Metadata update for a single room.
    RoomMetadata(RoomMetadataUpdate),
    /// Third-party integration push.
    Integration(IntegrationPayload),
    /// Third-party integration UI push.
    IntegrationUi(IntegrationPayload),
    /// A query in a namespace this client does not recognize.
    Other {
        /// The unrecognized namespace URI.
        namespace: String,
    },
}

impl QueryPayload {
    /// The namespace this payload belongs to.
    pub fn namespace(&self) -> Namespace {
        match self {
            Self::Startup(_) => Namespace::Startup,
            Self::Roster(_) => Namespace::Roster,
            Self::RoomDirectory(_) => Namespace::RoomDirectory,
            Self::Emoticons(_) => Namespace::Emoticons,
            Self::Profile(_) => Namespace::Profile,
            Self::RoomMetadata(_) => Namespace::RoomMetadata,
            Self::Integration(_) => Namespace::Integration,
            Self::IntegrationUi(_) => Namespace::IntegrationUi,
            Self::Other { namespace } => Namespace::Other(namespace.clone()),
        }
    }
}

/// Session configuration delivered by the startup query response.
///
/// Applying this is asynchronous on the receiving side: the store acknowledges
/// separately once the configuration has taken effect.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// The session user's mention name.
    pub mention_name: Option<String>,
    /// Numeric group the session belongs to.
    pub group_id: Option<u64>,
    /// Feature toggles enabled for this session.
    pub features: Vec<String>,
    /// Opaque per-user preference blob, applied verbatim.
    pub preferences: serde_json::Value,
}

/// Contact roster payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterPayload {
    /// Roster entries, in server order.
    pub items: Vec<RosterItem>,
}

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterItem {
    /// The contact's bare address.
    pub jid: Jid,
    /// Display name.
    pub name: Option<String>,
    /// Mention name used for @-addressing.
    pub mention_name: Option<String>,
}

/// Room directory payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomDirectoryPayload {
    /// Known rooms, in server order.
    pub rooms: Vec<RoomSummary>,
}

/// One room in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    /// The room's bare address.
    pub jid: Jid,
    /// Room display name.
    pub name: String,
    /// Current topic, if set.
    pub topic: Option<String>,
    /// Whether guests may join this room.
    pub guest_access: bool,
}

/// Emoticon catalog payload.
///
/// A query-result replaces the whole catalog; a mutation carries an
/// incremental update to merge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmoticonCatalog {
    /// Prefix prepended to every emoticon path.
    pub path_prefix: Option<String>,
    /// The emoticons themselves.
    pub emoticons: Vec<Emoticon>,
}

/// One emoticon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoticon {
    /// Shortcut text, e.g. `(wave)`.
    pub shortcut: String,
    /// Image path relative to the catalog prefix.
    pub path: String,
}

/// Own-profile payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Job title.
    pub title: Option<String>,
}

/// Metadata update for a single room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMetadataUpdate {
    /// The room being updated.
    pub room: Jid,
    /// New display name, if changed.
    pub name: Option<String>,
    /// New topic, if changed.
    pub topic: Option<String>,
    /// New privacy setting, if changed.
    pub privacy: Option<String>,
}

/// Push payload from a third-party integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationPayload {
    /// Key identifying the integration that produced the push.
    pub addon_key: String,
    /// Opaque payload, forwarded verbatim.
    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_namespace_mapping() {
        assert_eq!(QueryPayload::Roster(RosterPayload::default()).namespace(), Namespace::Roster);
        assert_eq!(
            QueryPayload::Emoticons(EmoticonCatalog::default()).namespace(),
            Namespace::Emoticons,
        );
        assert_eq!(
            QueryPayload::Other { namespace: "urn:example:x".to_owned() }.namespace(),
            Namespace::Other("urn:example:x".to_owned()),
        );
    }
}
