//! Availability sequencing and classification.
//!
//! Live presence traffic starts flowing before the session has finished its
//! startup flush. The sequencer buffers every update verbatim until the
//! readiness signal fires, then drains the queue in arrival order and switches
//! permanently to immediate dispatch.
//!
//! Classification is stateless beyond that queue: a record is routed and
//! forgotten, and a newer update for the same address supersedes the older
//! one downstream. One malformed record never blocks the rest of its batch -
//! it is skipped, silently.

use std::time::Duration;

use anteroom_proto::{
    Affiliation, Batch, Jid, PresenceKind, PresenceStanza, Role, RoomStatusFlags, Show,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::bus::{BusEvent, MessageBus};

/// Ambient classification context. Replaced wholesale by
/// [`PresenceSequencer::update`], never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// The current user's address.
    pub user: Option<Jid>,
    /// True for guest sessions.
    pub is_guest: bool,
    /// Domain that hosts rooms; a bare sender in this domain is room-scoped.
    pub conference_domain: Option<String>,
}

/// Resolved availability of one global presence entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Last seen on a mobile client.
    Mobile,
    /// Offline.
    Unavailable,
    /// Available and free to chat.
    Chat,
    /// Temporarily away.
    Away,
    /// Do not disturb.
    Dnd,
    /// Extended away.
    Xa,
}

/// One classified entry of a global presence batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalPresence {
    /// The sender's bare address.
    pub address: Jid,
    /// Resolved availability.
    pub availability: Availability,
    /// Free-form status text, verbatim.
    pub status: Option<String>,
    /// Idle duration, if the stanza reported one.
    pub idle: Option<Duration>,
}

/// Buffers live availability updates until readiness, then classifies and
/// dispatches continuously.
#[derive(Debug)]
pub struct PresenceSequencer<B> {
    bus: B,
    context: SessionSnapshot,
    /// Updates held verbatim until the readiness signal fires.
    pending: Vec<PresenceStanza>,
    ready: bool,
}

impl<B: MessageBus> PresenceSequencer<B> {
    /// Create a sequencer with an empty classification context.
    pub fn new(bus: B) -> Self {
        Self { bus, context: SessionSnapshot::default(), pending: Vec::new(), ready: false }
    }

    /// Replace the ambient classification context wholesale.
    pub fn update(&mut self, snapshot: SessionSnapshot) {
        self.context = snapshot;
    }

    /// True once the readiness signal has fired.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Number of updates currently buffered.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.pending.len()
    }

    /// First firing of the readiness signal: drain the queue in arrival order
    /// and switch permanently to immediate dispatch. Later calls are no-ops.
    pub fn mark_ready(&mut self, now: DateTime<Utc>) {
        if self.ready {
            return;
        }
        self.ready = true;
        let queued = std::mem::take(&mut self.pending);
        if !queued.is_empty() {
            tracing::debug!(count = queued.len(), "draining presence buffered before readiness");
            self.classify_batch(queued, now);
        }
    }

    /// Feed one update or an ordered collection of them.
    pub fn handle_presence<I>(&mut self, input: I, now: DateTime<Utc>)
    where
        I: Into<Batch<PresenceStanza>>,
    {
        let batch = input.into().into_vec();
        if !self.ready {
            self.pending.extend(batch);
            return;
        }
        self.classify_batch(batch, now);
    }

    fn classify_batch(&mut self, batch: Vec<PresenceStanza>, now: DateTime<Utc>) {
        if self.context.is_guest {
            // Every update is room-scoped by construction for a guest. The
            // nested occupant address becomes the top-level sender, and the
            // rewritten update classifies as global: guests observe room
            // presence as global presence.
            let rewritten: Vec<PresenceStanza> =
                batch.into_iter().filter_map(|stanza| self.normalize_guest(stanza)).collect();
            self.dispatch_global(rewritten, now);
            return;
        }

        let (room, global): (Vec<_>, Vec<_>) =
            batch.into_iter().partition(|stanza| self.is_room_sender(stanza));
        for stanza in room {
            self.handle_room(stanza);
        }
        self.dispatch_global(global, now);
    }

    fn normalize_guest(&self, stanza: PresenceStanza) -> Option<PresenceStanza> {
        let occupant = stanza
            .muc
            .as_ref()
            .and_then(|muc| muc.item.as_ref())
            .and_then(|item| item.jid.clone());
        match occupant {
            Some(jid) => Some(PresenceStanza { from: Some(jid), ..stanza }),
            None => {
                tracing::debug!("guest presence without occupant address skipped");
                None
            },
        }
    }

    fn is_room_sender(&self, stanza: &PresenceStanza) -> bool {
        match (&stanza.from, &self.context.conference_domain) {
            (Some(from), Some(domain)) => from.domain() == domain,
            _ => false,
        }
    }

    /// Route one room-scoped update. Rules are checked in a fixed order; the
    /// first match wins, and records missing the fields a rule needs are
    /// skipped rather than escalated.
    fn handle_room(&mut self, stanza: PresenceStanza) {
        let Some(from) = stanza.from.as_ref() else { return };
        let room = from.bare();

        let Some(muc) = stanza.muc.as_ref() else {
            if stanza.kind == PresenceKind::Error || stanza.error.is_some() {
                let message = stanza
                    .error
                    .as_ref()
                    .map_or_else(|| "room presence error".to_owned(), ToString::to_string);
                self.announce(BusEvent::ShowErrorFlag { message });
                self.announce(BusEvent::RoomClose { room, suppress_notice: true });
            } else {
                tracing::debug!(room = %room, "room presence without occupant extension skipped");
            }
            return;
        };

        let flags = RoomStatusFlags::from_codes(&muc.status_codes);
        let Some(item) = muc.item.as_ref() else {
            tracing::debug!(room = %room, "room presence without occupant item skipped");
            return;
        };

        if stanza.kind == PresenceKind::Unavailable {
            if let Some(affiliation @ (Affiliation::Member | Affiliation::Owner)) =
                item.affiliation
            {
                match item.jid.as_ref() {
                    Some(user) => self.announce(BusEvent::RemoveRoomParticipant {
                        room,
                        user: user.bare(),
                        group: affiliation_group(affiliation).to_owned(),
                    }),
                    None => {
                        tracing::debug!(room = %room, "participant removal without address skipped");
                    },
                }
                return;
            }
        }

        if flags.contains(RoomStatusFlags::KICKED) && item.affiliation == Some(Affiliation::None) {
            // The actor/target comparison is a server-side convention;
            // preserved literally.
            let target = item.jid.as_ref().map(Jid::bare);
            let actor = item.actor.as_ref().map(Jid::bare);
            match (actor, target) {
                (Some(actor), Some(target)) if actor == target => {
                    self.announce(BusEvent::RoomClose { room, suppress_notice: false });
                },
                (_, Some(user)) => self.announce(BusEvent::UserRemoved { room, user }),
                _ => tracing::debug!(room = %room, "removal without target address skipped"),
            }
            return;
        }

        if flags.contains(RoomStatusFlags::MEMBERS_ONLY) {
            self.announce(BusEvent::GuestAccessRevoked { room: room.clone() });
            if flags.contains(RoomStatusFlags::SELF_PRESENCE) {
                self.announce(BusEvent::RoomClose { room, suppress_notice: false });
            }
            return;
        }

        if item.role == Some(Role::Visitor) {
            match item.jid.as_ref() {
                Some(user) => self.announce(BusEvent::AddRoomVisitor {
                    room,
                    user: user.bare(),
                    mention_name: item.mention_name.clone(),
                }),
                None => tracing::debug!(room = %room, "visitor without address skipped"),
            }
            return;
        }

        if stanza.kind == PresenceKind::Available
            && matches!(item.role, Some(Role::Participant | Role::Moderator))
        {
            match item.jid.as_ref() {
                Some(user) => self.announce(BusEvent::AddRoomParticipant {
                    room,
                    user: user.bare(),
                    mention_name: item.mention_name.clone(),
                }),
                None => tracing::debug!(room = %room, "participant join without address skipped"),
            }
            return;
        }

        if let Some(occupant) = item.jid.as_ref() {
            self.announce(BusEvent::RoomPresenceObserved {
                room,
                occupant: occupant.clone(),
                role: item.role,
                affiliation: item.affiliation,
                kind: stanza.kind,
            });
        } else {
            tracing::debug!(room = %room, "occupant item without address skipped");
        }
    }

    /// Accumulate global updates into one outgoing batch keyed by bare
    /// address. The last update per address wins; first-arrival position is
    /// preserved.
    fn dispatch_global(&mut self, batch: Vec<PresenceStanza>, now: DateTime<Utc>) {
        let own = self.context.user.as_ref().map(Jid::bare);
        let mut entries: IndexMap<Jid, GlobalPresence> = IndexMap::new();

        for stanza in batch {
            let Some(from) = stanza.from.as_ref() else {
                tracing::debug!("presence without sender skipped");
                continue;
            };
            if stanza.kind == PresenceKind::Error {
                tracing::debug!(from = %from, "error presence outside a room skipped");
                continue;
            }

            let bare = from.bare();
            let availability = resolve_availability(&stanza);
            if matches!(availability, Availability::Mobile | Availability::Unavailable)
                && Some(&bare) == own.as_ref()
            {
                // Another of our connected resources must not downgrade the
                // local client's own displayed presence.
                tracing::debug!(address = %bare, "own-resource downgrade suppressed");
                continue;
            }

            let idle = crate::idle::idle_duration(stanza.delay.as_ref(), stanza.idle_seconds, now);
            entries.insert(
                bare.clone(),
                GlobalPresence { address: bare, availability, status: stanza.status.clone(), idle },
            );
        }

        if !entries.is_empty() {
            let entries = entries.into_values().collect();
            self.announce(BusEvent::GlobalPresenceBatch { entries });
        }
    }

    fn announce(&mut self, event: BusEvent) {
        if let Err(err) = self.bus.publish(event) {
            tracing::warn!(error = %err, "bus listener failed");
        }
    }
}

/// Availability resolution priority: unavailable+mobile, unavailable, the
/// stanza's own show field, then the free-to-chat default.
fn resolve_availability(stanza: &PresenceStanza) -> Availability {
    match stanza.kind {
        PresenceKind::Unavailable if stanza.mobile => Availability::Mobile,
        PresenceKind::Unavailable => Availability::Unavailable,
        _ => match stanza.show {
            Some(Show::Away) => Availability::Away,
            Some(Show::Dnd) => Availability::Dnd,
            Some(Show::Xa) => Availability::Xa,
            Some(Show::Chat) | None => Availability::Chat,
        },
    }
}

/// Normalize an affiliation to the plural group name downstream stores key on.
fn affiliation_group(affiliation: Affiliation) -> &'static str {
    match affiliation {
        Affiliation::Owner => "owners",
        Affiliation::Admin => "admins",
        Affiliation::Member => "members",
        Affiliation::Outcast => "outcasts",
        Affiliation::None => "none",
    }
}

