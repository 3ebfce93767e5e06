//! Presence stanzas.
//!
//! A presence stanza reports a user's or room-occupant's availability. These
//! records are ephemeral: the session core classifies and routes them but
//! never persists one, and a newer update for the same address simply
//! supersedes the older.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{address::Jid, errors::StanzaError};

/// The presence stanza variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceKind {
    /// The sender is available. The wire form carries no type attribute.
    #[default]
    Available,
    /// The sender became unavailable.
    Unavailable,
    /// The stanza reports a protocol error.
    Error,
}

/// The optional show field refining an available presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Show {
    /// Temporarily away.
    Away,
    /// Free to chat.
    Chat,
    /// Do not disturb.
    Dnd,
    /// Extended away.
    Xa,
}

/// A parsed presence stanza.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceStanza {
    /// Sender address. Room presence uses `room@domain/occupant-nick`.
    pub from: Option<Jid>,
    /// The stanza variant.
    #[serde(default)]
    pub kind: PresenceKind,
    /// Availability refinement.
    pub show: Option<Show>,
    /// Free-form status text.
    pub status: Option<String>,
    /// Room-occupant extension, present on room-scoped updates.
    pub muc: Option<MucUser>,
    /// Delayed-delivery timestamp: when the sender last changed state.
    pub delay: Option<DateTime<Utc>>,
    /// Elapsed idle seconds reported by the sender's client.
    pub idle_seconds: Option<u64>,
    /// Set when the sending resource identifies itself as a mobile client.
    #[serde(default)]
    pub mobile: bool,
    /// Protocol error element, if the stanza carried one.
    pub error: Option<StanzaError>,
}

impl PresenceStanza {
    /// An available presence from `from`.
    pub fn available(from: Jid) -> Self {
        Self {
            from: Some(from),
            kind: PresenceKind::Available,
            show: None,
            status: None,
            muc: None,
            delay: None,
            idle_seconds: None,
            mobile: false,
            error: None,
        }
    }

    /// An unavailable presence from `from`.
    pub fn unavailable(from: Jid) -> Self {
        Self { kind: PresenceKind::Unavailable, ..Self::available(from) }
    }
}

/// The room-occupant extension of a presence stanza.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MucUser {
    /// The occupant item, if the server included one.
    pub item: Option<MucItem>,
    /// Raw numeric status codes. Decode with
    /// [`crate::flags::RoomStatusFlags::from_codes`].
    pub status_codes: Vec<u16>,
}

/// The occupant item inside a room-occupant extension.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MucItem {
    /// The occupant's real address, if the room discloses it.
    pub jid: Option<Jid>,
    /// The occupant's role in the room.
    pub role: Option<Role>,
    /// The occupant's affiliation with the room.
    pub affiliation: Option<Affiliation>,
    /// The party that caused this update (e.g. the kicking moderator).
    pub actor: Option<Jid>,
    /// The occupant's mention name.
    pub mention_name: Option<String>,
}

/// Room role: what an occupant may currently do in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May moderate the room.
    Moderator,
    /// Regular speaking occupant.
    Participant,
    /// May observe but not speak.
    Visitor,
    /// No role; the occupant is leaving or was removed.
    None,
}

/// Room affiliation: an occupant's long-lived association with the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Affiliation {
    /// Owns the room.
    Owner,
    /// Administers the room.
    Admin,
    /// Regular member.
    Member,
    /// Banned from the room.
    Outcast,
    /// No affiliation.
    None,
}
