//! Startup gate for info/query responses.
//!
//! A fresh session must assemble its foundational state (roster, room
//! directory, emoticon catalog, optionally startup configuration) in a fixed
//! order before anything else runs, but the server sends those responses in
//! whatever order it likes, interleaved with unrelated traffic. The gate
//! buffers everything until the required set is complete, then replays it
//! deterministically.
//!
//! # State Machine
//!
//! ```text
//!                 all required arrived,
//!                 startup entry present      configuration ack
//! ┌───────────┐ ─────────────────────> ┌────────────────┐ ──────> ┌──────┐
//! │ Buffering │                        │ AwaitingConfig │         │ Open │
//! └───────────┘ ─────────────────────────────────────────────────>└──────┘
//!                 all required arrived, no startup entry
//! ```
//!
//! The gate opens exactly once per instance and never re-closes. A reconnect
//! constructs a fresh gate instead of resetting this one.
//!
//! # Ordering guarantees
//!
//! 1. Required responses are replayed in canonical declaration order, never
//!    arrival order.
//! 2. Non-required stanzas observed pre-open replay strictly after all
//!    required responses, in their original arrival order.
//! 3. Once open, processing order equals arrival order.
//!
//! The "received" marks are kept separate from the stored payloads, so
//! "arrived but not yet flushed" is an inspectable intermediate state.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    mem,
};

use anteroom_proto::{Batch, IqStanza, IqType, Namespace, QueryPayload, StanzaError};

use crate::{
    bus::{BusEvent, MessageBus},
    store::SessionStore,
};

/// Session role, fixed at construction. Determines the required startup set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRole {
    /// Full member session.
    Member,
    /// Guest session; requires only the emoticon catalog.
    Guest,
}

impl SessionRole {
    fn required_namespaces(self) -> Vec<Namespace> {
        match self {
            Self::Guest => vec![Namespace::Emoticons],
            Self::Member => {
                vec![Namespace::Roster, Namespace::RoomDirectory, Namespace::Emoticons]
            },
        }
    }
}

/// The parked remainder of a required flush.
///
/// Handling the startup entry triggers an asynchronous configuration-apply
/// side effect; the entries captured here are flushed only when
/// [`IqGate::config_applied`] fires, on a later turn of the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupContinuation {
    remaining: Vec<Namespace>,
}

impl StartupContinuation {
    /// The required namespaces still waiting to be flushed.
    #[must_use]
    pub fn remaining(&self) -> &[Namespace] {
        &self.remaining
    }
}

#[derive(Debug)]
enum GateState {
    Buffering,
    AwaitingConfig(StartupContinuation),
    Open,
}

/// Gates and canonically orders startup-critical query responses; passes
/// everything else through once open.
#[derive(Debug)]
pub struct IqGate<B> {
    bus: B,
    /// Canonical required order, fixed at construction (plus an optional
    /// startup entry prepended later).
    required: Vec<Namespace>,
    /// Completion marks, decoupled from payload storage.
    received: HashSet<Namespace>,
    /// Stored payloads of required responses awaiting the canonical flush.
    held: HashMap<Namespace, IqStanza>,
    /// Non-required stanzas awaiting replay, in arrival order.
    deferred: Vec<IqStanza>,
    state: GateState,
}

impl<B: MessageBus> IqGate<B> {
    /// Create a gate for one session. `role` fixes the required set.
    pub fn new(bus: B, role: SessionRole) -> Self {
        Self {
            bus,
            required: role.required_namespaces(),
            received: HashSet::new(),
            held: HashMap::new(),
            deferred: Vec::new(),
            state: GateState::Buffering,
        }
    }

    /// Additionally require the startup configuration stanza.
    ///
    /// The startup entry always flushes first: its configuration-apply side
    /// effect must land before any other required state.
    pub fn add_required_startup_stanza(&mut self) {
        if !self.required.contains(&Namespace::Startup) {
            self.required.insert(0, Namespace::Startup);
        }
    }

    /// The canonical required order.
    #[must_use]
    pub fn required_namespaces(&self) -> &[Namespace] {
        &self.required
    }

    /// True once every required namespace carries a received mark.
    #[must_use]
    pub fn all_required_arrived(&self) -> bool {
        self.required.iter().all(|ns| self.received.contains(ns))
    }

    /// True if `namespace` has arrived (it may not have been flushed yet).
    #[must_use]
    pub fn has_received(&self, namespace: &Namespace) -> bool {
        self.received.contains(namespace)
    }

    /// True once the gate has opened. Monotonic: never resets.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, GateState::Open)
    }

    /// The parked startup continuation, if the flush is waiting on the
    /// configuration acknowledgement.
    #[must_use]
    pub fn startup_continuation(&self) -> Option<&StartupContinuation> {
        match &self.state {
            GateState::AwaitingConfig(continuation) => Some(continuation),
            _ => None,
        }
    }

    /// Feed one stanza or an ordered collection of them.
    ///
    /// Items without a recognizable query payload are dropped; collection
    /// order is preserved for everything else.
    pub fn handle_iq<I, S>(&mut self, input: I, store: &mut S)
    where
        I: Into<Batch<IqStanza>>,
        S: SessionStore + ?Sized,
    {
        for stanza in input.into() {
            if stanza.payload.is_none() {
                tracing::debug!(id = ?stanza.id, "stanza without query payload dropped");
                continue;
            }
            self.handle_or_store(stanza, store);
        }
    }

    /// Resume a flush parked on the startup entry.
    ///
    /// Called when the store acknowledges that startup configuration has been
    /// applied. A no-op (with a warning) if no flush is parked.
    pub fn config_applied<S>(&mut self, store: &mut S)
    where
        S: SessionStore + ?Sized,
    {
        match mem::replace(&mut self.state, GateState::Buffering) {
            GateState::AwaitingConfig(continuation) => {
                let mut queue: VecDeque<Namespace> = continuation.remaining.into();
                let parked = self.drive_flush(&mut queue, store);
                if !parked {
                    self.finish_open(store);
                }
            },
            other => {
                self.state = other;
                tracing::warn!("configuration ack arrived without a parked startup flush");
            },
        }
    }

    fn handle_or_store<S>(&mut self, stanza: IqStanza, store: &mut S)
    where
        S: SessionStore + ?Sized,
    {
        if self.is_open() {
            self.handle_stanza(stanza, store);
            return;
        }

        let Some(namespace) = stanza.namespace() else { return };

        if self.required.contains(&namespace) && stanza.iq_type != IqType::Set {
            if let Some(error) = &stanza.error {
                // Bypasses both buffers and does not satisfy the gate: the
                // namespace stays outstanding until an error-free response
                // of the same namespace arrives.
                self.surface_error(Some(&namespace), error);
                return;
            }
            self.received.insert(namespace.clone());
            self.held.insert(namespace, stanza);
            if matches!(self.state, GateState::Buffering) && self.all_required_arrived() {
                self.begin_flush(store);
            }
        } else {
            // Mutations on a required namespace never satisfy the gate; they
            // replay with the non-required traffic at arrival position.
            self.deferred.push(stanza);
        }
    }

    fn begin_flush<S>(&mut self, store: &mut S)
    where
        S: SessionStore + ?Sized,
    {
        let mut queue: VecDeque<Namespace> = self.required.iter().cloned().collect();
        if self.drive_flush(&mut queue, store) {
            return;
        }
        self.finish_open(store);
    }

    /// Flush required entries in canonical order. Returns true if the flush
    /// parked on the startup entry; completing it then belongs to
    /// [`Self::config_applied`].
    fn drive_flush<S>(&mut self, queue: &mut VecDeque<Namespace>, store: &mut S) -> bool
    where
        S: SessionStore + ?Sized,
    {
        while let Some(namespace) = queue.pop_front() {
            let Some(stanza) = self.held.remove(&namespace) else {
                tracing::warn!(namespace = %namespace, "required payload missing during flush");
                continue;
            };
            let is_startup = namespace == Namespace::Startup;
            self.handle_stanza(stanza, store);
            if is_startup {
                let remaining = queue.drain(..).collect();
                self.state = GateState::AwaitingConfig(StartupContinuation { remaining });
                return true;
            }
        }
        false
    }

    fn finish_open<S>(&mut self, store: &mut S)
    where
        S: SessionStore + ?Sized,
    {
        self.flush_other(store);
        // Flip before publishing: a failing listener must never prevent the
        // gate from having opened.
        self.state = GateState::Open;
        if let Err(err) = self.bus.publish(BusEvent::ReadinessSignal) {
            tracing::error!(error = %err, "readiness signal listener failed");
            let _ = self.bus.publish(err.to_diagnostic());
        }
    }

    fn flush_other<S>(&mut self, store: &mut S)
    where
        S: SessionStore + ?Sized,
    {
        let deferred = mem::take(&mut self.deferred);
        for stanza in deferred {
            self.handle_stanza(stanza, store);
        }
    }

    /// The namespace-keyed dispatch table. Each arm extracts fields, invokes
    /// one store mutation, and announces the applied mutation on the bus.
    /// Unknown namespaces are silent no-ops, never errors.
    fn handle_stanza<S>(&mut self, stanza: IqStanza, store: &mut S)
    where
        S: SessionStore + ?Sized,
    {
        if let Some(error) = &stanza.error {
            self.surface_error(stanza.namespace().as_ref(), error);
            return;
        }

        let iq_type = stanza.iq_type;
        let Some(payload) = stanza.payload else { return };

        match payload {
            QueryPayload::Startup(config) => {
                store.apply_config(&config);
                self.announce(BusEvent::StartupConfigApplied { config });
            },
            QueryPayload::Roster(roster) => {
                store.replace_roster(&roster.items);
                self.announce(BusEvent::RosterReplace { items: roster.items });
            },
            QueryPayload::RoomDirectory(directory) => {
                store.merge_rooms(&directory.rooms);
                self.announce(BusEvent::RoomDirectoryMerge { rooms: directory.rooms });
            },
            QueryPayload::Emoticons(catalog) => {
                let merge = iq_type == IqType::Set;
                if merge {
                    store.merge_emoticons(&catalog);
                } else {
                    store.replace_emoticons(&catalog);
                }
                self.announce(BusEvent::EmoticonCatalogUpdate { catalog, merge });
            },
            QueryPayload::Profile(profile) => {
                store.update_profile(&profile);
                self.announce(BusEvent::ProfileUpdate { profile });
            },
            QueryPayload::RoomMetadata(update) => {
                // Metadata updates have no bus counterpart; the room store
                // owns further fan-out.
                store.update_room_metadata(&update);
            },
            QueryPayload::Integration(payload) => {
                store.push_integration(&payload);
                self.announce(BusEvent::IntegrationPush { payload });
            },
            QueryPayload::IntegrationUi(payload) => {
                store.push_integration_ui(&payload);
                self.announce(BusEvent::IntegrationUiPush { payload });
            },
            QueryPayload::Other { namespace } => {
                tracing::debug!(%namespace, "query in unrecognized namespace ignored");
            },
        }
    }

    fn surface_error(&mut self, namespace: Option<&Namespace>, error: &StanzaError) {
        match namespace {
            Some(ns) => {
                tracing::warn!(namespace = %ns, error = %error, "query response carried an error");
            },
            None => tracing::warn!(error = %error, "query response carried an error"),
        }
        self.announce(BusEvent::ShowErrorFlag { message: error.to_string() });
    }

    fn announce(&mut self, event: BusEvent) {
        if let Err(err) = self.bus.publish(event) {
            tracing::warn!(error = %err, "bus listener failed");
        }
    }
}

