//! Per-session wiring of the gate and the sequencer.
//!
//! The sequencer must hear the readiness signal exactly once. Rather than
//! registering a callback on the bus (and inviting re-entrancy into the state
//! machines), the pipeline observes the gate's open transition around each
//! call that can open it and forwards the transition to the sequencer. Both
//! machines publish on clones of the same bus handle.
//!
//! One pipeline per connection. On reconnect, drop it and build a new one;
//! buffered state never migrates.

use anteroom_proto::{Batch, IqStanza, PresenceStanza};
use chrono::{DateTime, Utc};

use crate::{
    bus::MessageBus,
    gate::{IqGate, SessionRole},
    presence::{PresenceSequencer, SessionSnapshot},
    store::SessionStore,
};

/// A session's inbound processing pair: one [`IqGate`] and one
/// [`PresenceSequencer`] over a shared bus.
#[derive(Debug)]
pub struct SessionPipeline<B> {
    gate: IqGate<B>,
    sequencer: PresenceSequencer<B>,
}

impl<B: MessageBus + Clone> SessionPipeline<B> {
    /// Build the pipeline for one connection.
    pub fn new(bus: B, role: SessionRole) -> Self {
        Self { gate: IqGate::new(bus.clone(), role), sequencer: PresenceSequencer::new(bus) }
    }

    /// Additionally require the startup configuration stanza.
    pub fn add_required_startup_stanza(&mut self) {
        self.gate.add_required_startup_stanza();
    }

    /// Replace the sequencer's ambient classification context.
    pub fn update_snapshot(&mut self, snapshot: SessionSnapshot) {
        self.sequencer.update(snapshot);
    }

    /// Feed info/query traffic. `now` is used only if the gate opens during
    /// this call and buffered presence drains.
    pub fn handle_iq<I, S>(&mut self, input: I, store: &mut S, now: DateTime<Utc>)
    where
        I: Into<Batch<IqStanza>>,
        S: SessionStore + ?Sized,
    {
        let was_open = self.gate.is_open();
        self.gate.handle_iq(input, store);
        self.forward_readiness(was_open, now);
    }

    /// Deliver the "configuration applied" acknowledgement to a parked
    /// startup flush.
    pub fn config_applied<S>(&mut self, store: &mut S, now: DateTime<Utc>)
    where
        S: SessionStore + ?Sized,
    {
        let was_open = self.gate.is_open();
        self.gate.config_applied(store);
        self.forward_readiness(was_open, now);
    }

    /// Feed presence traffic.
    pub fn handle_presence<I>(&mut self, input: I, now: DateTime<Utc>)
    where
        I: Into<Batch<PresenceStanza>>,
    {
        self.sequencer.handle_presence(input, now);
    }

    /// True once the gate has opened.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.gate.is_open()
    }

    /// The gate, for state inspection.
    #[must_use]
    pub fn gate(&self) -> &IqGate<B> {
        &self.gate
    }

    /// The sequencer, for state inspection.
    #[must_use]
    pub fn sequencer(&self) -> &PresenceSequencer<B> {
        &self.sequencer
    }

    fn forward_readiness(&mut self, was_open: bool, now: DateTime<Utc>) {
        if !was_open && self.gate.is_open() {
            self.sequencer.mark_ready(now);
        }
    }
}

