//! The message bus seam and its event vocabulary.
//!
//! Both state machines receive a [`MessageBus`] at construction instead of
//! reaching for a shared global dispatcher, so tests can observe every emitted
//! event in isolation. Event names and payload shapes are a compatibility
//! contract with downstream consumers: reordering or renaming them is a
//! breaking change, not an implementation detail.

use std::{cell::RefCell, rc::Rc};

use anteroom_proto::{
    Affiliation, EmoticonCatalog, IntegrationPayload, Jid, PresenceKind, Profile, Role,
    RoomSummary, RosterItem, SessionConfig,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::presence::GlobalPresence;

/// Events published by the session core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BusEvent {
    /// The contact roster was replaced wholesale.
    RosterReplace {
        /// The new roster, in server order.
        items: Vec<RosterItem>,
    },

    /// Directory rooms were merged into the room store.
    RoomDirectoryMerge {
        /// Rooms to merge, in server order.
        rooms: Vec<RoomSummary>,
    },

    /// The session user's profile changed.
    ProfileUpdate {
        /// The updated profile.
        profile: Profile,
    },

    /// The emoticon catalog was replaced or extended.
    EmoticonCatalogUpdate {
        /// The catalog payload.
        catalog: EmoticonCatalog,
        /// True when the payload extends the existing catalog instead of
        /// replacing it.
        merge: bool,
    },

    /// Startup configuration was handed to the store for application.
    StartupConfigApplied {
        /// The configuration payload.
        config: SessionConfig,
    },

    /// A third-party integration pushed data.
    IntegrationPush {
        /// The push payload.
        payload: IntegrationPayload,
    },

    /// A third-party integration pushed a UI update.
    IntegrationUiPush {
        /// The push payload.
        payload: IntegrationPayload,
    },

    /// All required startup state has been applied. Fires exactly once per
    /// processor instance.
    ReadinessSignal,

    /// A room should be closed in the UI.
    RoomClose {
        /// The room's bare address.
        room: Jid,
        /// Suppress the usual confirmation side-notification.
        suppress_notice: bool,
    },

    /// Another party was removed from a room.
    UserRemoved {
        /// The room's bare address.
        room: Jid,
        /// The removed user's bare address.
        user: Jid,
    },

    /// Generic room presence that matched no specific rule.
    RoomPresenceObserved {
        /// The room's bare address.
        room: Jid,
        /// The occupant's address, passed through verbatim.
        occupant: Jid,
        /// Occupant role, verbatim.
        role: Option<Role>,
        /// Occupant affiliation, verbatim.
        affiliation: Option<Affiliation>,
        /// Presence kind, verbatim.
        kind: PresenceKind,
    },

    /// A participant or moderator joined a room.
    AddRoomParticipant {
        /// The room's bare address.
        room: Jid,
        /// The joining user's bare address.
        user: Jid,
        /// The joining user's mention name, if disclosed.
        mention_name: Option<String>,
    },

    /// A member- or owner-affiliated occupant left a room.
    RemoveRoomParticipant {
        /// The room's bare address.
        room: Jid,
        /// The leaving user's bare address.
        user: Jid,
        /// The occupant's affiliation normalized to its plural group name,
        /// e.g. "members".
        group: String,
    },

    /// A visitor joined a room.
    AddRoomVisitor {
        /// The room's bare address.
        room: Jid,
        /// The visitor's bare address (the nested occupant address, never the
        /// room-scoped sender).
        user: Jid,
        /// The visitor's mention name, if disclosed.
        mention_name: Option<String>,
    },

    /// Guest access to a room was revoked.
    GuestAccessRevoked {
        /// The room's bare address.
        room: Jid,
    },

    /// A batch of global availability updates, one entry per bare address.
    GlobalPresenceBatch {
        /// The classified entries, in first-arrival order.
        entries: Vec<GlobalPresence>,
    },

    /// A user-visible error notification.
    ShowErrorFlag {
        /// The message to surface.
        message: String,
    },

    /// Best-effort diagnostic record for a failure inside a bus listener.
    Diagnostic {
        /// Error message.
        message: String,
        /// Name of the failing listener or signal.
        name: String,
        /// Longer description of the failure.
        description: String,
        /// Captured backtrace, if one was available.
        backtrace: Option<String>,
    },
}

/// Failure to deliver an event to downstream listeners.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// A downstream listener failed while handling the event.
    #[error("listener {name} failed: {message}")]
    Subscriber {
        /// Name of the failing listener.
        name: String,
        /// Error message from the listener.
        message: String,
        /// Longer description of the failure.
        description: String,
        /// Captured backtrace, if one was available.
        backtrace: Option<String>,
    },

    /// A shared bus handle was already borrowed by the current call stack.
    #[error("bus handle is busy")]
    Busy,
}

impl BusError {
    /// Render this failure as a best-effort [`BusEvent::Diagnostic`].
    pub fn to_diagnostic(&self) -> BusEvent {
        match self {
            Self::Subscriber { name, message, description, backtrace } => BusEvent::Diagnostic {
                message: message.clone(),
                name: name.clone(),
                description: description.clone(),
                backtrace: backtrace.clone(),
            },
            Self::Busy => BusEvent::Diagnostic {
                message: self.to_string(),
                name: "bus".to_owned(),
                description: "shared bus handle was already borrowed".to_owned(),
                backtrace: None,
            },
        }
    }
}

/// Publish seam injected into both state machines at construction.
///
/// The session runs single-threaded and every handler runs to completion, so
/// implementations need no internal synchronization.
pub trait MessageBus {
    /// Deliver `event` to all listeners.
    ///
    /// # Errors
    ///
    /// Returns an error when a listener fails; the event may have reached
    /// other listeners before the failure.
    fn publish(&mut self, event: BusEvent) -> Result<(), BusError>;
}

impl<B: MessageBus + ?Sized> MessageBus for &mut B {
    fn publish(&mut self, event: BusEvent) -> Result<(), BusError> {
        (**self).publish(event)
    }
}

/// Lets one underlying bus serve both state machines of a session: each holds
/// a cheap clone of the handle, no global singleton involved.
impl<B: MessageBus> MessageBus for Rc<RefCell<B>> {
    fn publish(&mut self, event: BusEvent) -> Result<(), BusError> {
        let mut inner = self.try_borrow_mut().map_err(|_| BusError::Busy)?;
        inner.publish(event)
    }
}
