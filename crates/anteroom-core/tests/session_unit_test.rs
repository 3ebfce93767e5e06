//! Unit tests for the SessionPipeline, relocated from src/session.rs so they
//! can link the recording harness without the dev-dependency crate-duplication
//! cycle.

use std::{cell::RefCell, rc::Rc};

use anteroom_harness::{RecordingBus, RecordingStore, emoticons_result};
use anteroom_proto::PresenceStanza;
use chrono::{DateTime, TimeZone, Utc};

use anteroom_core::bus::BusEvent;
use anteroom_core::gate::SessionRole;
use anteroom_core::presence::SessionSnapshot;
use anteroom_core::session::SessionPipeline;


    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).single().unwrap()
    }

    #[test]
    fn buffered_presence_drains_when_the_gate_opens() {
        let bus = Rc::new(RefCell::new(RecordingBus::new()));
        let mut store = RecordingStore::new();
        let mut pipeline = SessionPipeline::new(Rc::clone(&bus), SessionRole::Guest);
        pipeline.update_snapshot(SessionSnapshot {
            user: Some("me@chat.example".parse().unwrap()),
            is_guest: false,
            conference_domain: Some("rooms.chat.example".to_owned()),
        });

        pipeline.handle_presence(
            PresenceStanza::available("alice@chat.example/laptop".parse().unwrap()),
            noon(),
        );
        assert_eq!(pipeline.sequencer().queued(), 1);

        pipeline.handle_iq(emoticons_result(), &mut store, noon());
        assert!(pipeline.is_ready());
        assert_eq!(pipeline.sequencer().queued(), 0);

        // Catalog update, readiness, then the drained presence batch.
        let events = bus.borrow().events().to_vec();
        assert!(matches!(events[0], BusEvent::EmoticonCatalogUpdate { .. }));
        assert!(matches!(events[1], BusEvent::ReadinessSignal));
        assert!(matches!(events[2], BusEvent::GlobalPresenceBatch { .. }));

        // Later presence dispatches separately, after the drained queue.
        pipeline.handle_presence(
            PresenceStanza::available("bob@chat.example/phone".parse().unwrap()),
            noon(),
        );
        assert_eq!(bus.borrow().events().len(), 4);
    }

    #[test]
    fn readiness_forwards_exactly_once() {
        let bus = Rc::new(RefCell::new(RecordingBus::new()));
        let mut store = RecordingStore::new();
        let mut pipeline = SessionPipeline::new(Rc::clone(&bus), SessionRole::Guest);

        pipeline.handle_iq(emoticons_result(), &mut store, noon());
        assert!(pipeline.is_ready());
        assert!(pipeline.sequencer().is_ready());

        // A required re-arrival must not re-fire anything.
        pipeline.handle_iq(emoticons_result(), &mut store, noon());
        let readiness = bus
            .borrow()
            .events()
            .iter()
            .filter(|e| matches!(e, BusEvent::ReadinessSignal))
            .count();
        assert_eq!(readiness, 1);
    }
