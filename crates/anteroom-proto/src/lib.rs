//! Parsed stanza types for the Anteroom chat protocol.
//!
//! The connection layer owns transport framing and XML parsing; by the time a
//! stanza reaches this crate it is already a plain Rust value. This crate only
//! defines the shapes the session core routes on: info/query stanzas with
//! typed query payloads, presence stanzas with their room-occupant extension,
//! protocol addresses, and the error element a stanza may carry.
//!
//! Namespaces are a closed enum rather than raw strings so the session core
//! can dispatch with an exhaustive match. Unrecognized namespaces survive as
//! [`Namespace::Other`] and are silently ignored downstream, never rejected.

pub mod address;
pub mod batch;
pub mod errors;
pub mod flags;
pub mod iq;
pub mod namespace;
pub mod payloads;
pub mod presence;

pub use address::Jid;
pub use batch::Batch;
pub use errors::{AddressError, StanzaError};
pub use flags::RoomStatusFlags;
pub use iq::{IqStanza, IqType};
pub use namespace::Namespace;
pub use payloads::{
    Emoticon, EmoticonCatalog, IntegrationPayload, Profile, QueryPayload, RoomDirectoryPayload,
    RoomMetadataUpdate, RoomSummary, RosterItem, RosterPayload, SessionConfig,
};
pub use presence::{Affiliation, MucItem, MucUser, PresenceKind, PresenceStanza, Role, Show};
