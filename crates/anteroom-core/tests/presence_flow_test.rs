//! Presence flow integration tests.
//!
//! Exercises the sequencer through the full pipeline: buffering until the
//! gate opens, member room/global partitioning, and the guest rewrite.

use std::{cell::RefCell, rc::Rc};

use anteroom_core::{
    Availability, BusEvent, SessionPipeline, SessionRole, SessionSnapshot,
};
use anteroom_harness::{RecordingBus, RecordingStore, emoticons_result, occupant_item, room_presence};
use anteroom_proto::{Affiliation, PresenceKind, PresenceStanza, Role, Show};
use chrono::{DateTime, TimeZone, Utc};

fn shared_bus() -> Rc<RefCell<RecordingBus>> {
    Rc::new(RefCell::new(RecordingBus::new()))
}

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).single().unwrap()
}

fn member_pipeline(
    bus: &Rc<RefCell<RecordingBus>>,
) -> SessionPipeline<Rc<RefCell<RecordingBus>>> {
    let mut pipeline = SessionPipeline::new(Rc::clone(bus), SessionRole::Member);
    pipeline.update_snapshot(SessionSnapshot {
        user: Some("me@chat.example".parse().unwrap()),
        is_guest: false,
        conference_domain: Some("rooms.chat.example".to_owned()),
    });
    pipeline
}

#[test]
fn presence_buffered_before_readiness_replays_before_later_arrivals() {
    let bus = shared_bus();
    let mut store = RecordingStore::new();
    let mut pipeline = SessionPipeline::new(Rc::clone(&bus), SessionRole::Guest);
    pipeline.update_snapshot(SessionSnapshot {
        user: Some("me@chat.example".parse().unwrap()),
        is_guest: false,
        conference_domain: None,
    });

    pipeline.handle_presence(
        vec![
            PresenceStanza::available("alice@chat.example/laptop".parse().unwrap()),
            PresenceStanza::available("bob@chat.example/phone".parse().unwrap()),
        ],
        noon(),
    );
    assert!(bus.borrow().events().is_empty());

    pipeline.handle_iq(emoticons_result(), &mut store, noon());

    pipeline.handle_presence(
        PresenceStanza::available("carol@chat.example/web".parse().unwrap()),
        noon(),
    );

    let events = bus.borrow().events().to_vec();
    // Catalog, readiness, drained batch (alice+bob), then carol separately.
    let batches: Vec<&BusEvent> = events
        .iter()
        .filter(|e| matches!(e, BusEvent::GlobalPresenceBatch { .. }))
        .collect();
    assert_eq!(batches.len(), 2);
    let BusEvent::GlobalPresenceBatch { entries } = batches[0] else { unreachable!() };
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].address, "alice@chat.example".parse().unwrap());
    let BusEvent::GlobalPresenceBatch { entries } = batches[1] else { unreachable!() };
    assert_eq!(entries[0].address, "carol@chat.example".parse().unwrap());
}

#[test]
fn member_batch_partitions_room_from_global() {
    let bus = shared_bus();
    let mut store = RecordingStore::new();
    let mut pipeline = member_pipeline(&bus);
    pipeline.handle_iq(emoticons_result(), &mut store, noon());
    // Member gate needs all three; drive the remaining two.
    pipeline.handle_iq(
        vec![
            anteroom_harness::rooms_result(Vec::new()),
            anteroom_harness::roster_result(Vec::new()),
        ],
        &mut store,
        noon(),
    );
    assert!(pipeline.is_ready());
    bus.borrow_mut().take_events();

    let mut global = PresenceStanza::available("alice@chat.example/laptop".parse().unwrap());
    global.show = Some(Show::Xa);
    let room = room_presence(
        "lobby@rooms.chat.example/Vis",
        PresenceKind::Available,
        Some(occupant_item("visitor@chat.example", Role::Visitor, Affiliation::None)),
        &[],
    );
    pipeline.handle_presence(vec![global, room], noon());

    let events = bus.borrow().events().to_vec();
    let [
        BusEvent::AddRoomVisitor { user, .. },
        BusEvent::GlobalPresenceBatch { entries },
    ] = events.as_slice()
    else {
        panic!("expected visitor then batch, got {events:?}");
    };
    assert_eq!(*user, "visitor@chat.example".parse().unwrap());
    assert_eq!(entries[0].availability, Availability::Xa);
}

#[test]
fn guest_session_observes_room_presence_as_global() {
    let bus = shared_bus();
    let mut store = RecordingStore::new();
    let mut pipeline = SessionPipeline::new(Rc::clone(&bus), SessionRole::Guest);
    pipeline.update_snapshot(SessionSnapshot {
        user: Some("guest-7@chat.example".parse().unwrap()),
        is_guest: true,
        conference_domain: Some("rooms.chat.example".to_owned()),
    });

    // Room presence arrives before the guest's gate (emoticons only) opens.
    pipeline.handle_presence(
        room_presence(
            "lobby@rooms.chat.example/Carol",
            PresenceKind::Available,
            Some(occupant_item("carol@chat.example", Role::Participant, Affiliation::Member)),
            &[],
        ),
        noon(),
    );
    assert_eq!(pipeline.sequencer().queued(), 1);

    pipeline.handle_iq(emoticons_result(), &mut store, noon());
    assert!(pipeline.is_ready());

    let events = bus.borrow().events().to_vec();
    let Some(BusEvent::GlobalPresenceBatch { entries }) = events.last() else {
        panic!("expected a drained global batch, got {events:?}");
    };
    // The nested occupant address became the sender: the guest sees Carol's
    // presence as global, not room-scoped.
    assert_eq!(entries[0].address, "carol@chat.example".parse().unwrap());
}

#[test]
fn superseded_updates_are_not_retained_anywhere() {
    let bus = shared_bus();
    let mut store = RecordingStore::new();
    let mut pipeline = SessionPipeline::new(Rc::clone(&bus), SessionRole::Guest);
    pipeline.update_snapshot(SessionSnapshot {
        user: Some("me@chat.example".parse().unwrap()),
        is_guest: false,
        conference_domain: None,
    });
    pipeline.handle_iq(emoticons_result(), &mut store, noon());
    bus.borrow_mut().take_events();

    // Two consecutive updates for the same address produce two independent
    // batches; the sequencer retains no history between them.
    let mut away = PresenceStanza::available("alice@chat.example/laptop".parse().unwrap());
    away.show = Some(Show::Away);
    pipeline.handle_presence(away, noon());
    pipeline.handle_presence(
        PresenceStanza::unavailable("alice@chat.example/laptop".parse().unwrap()),
        noon(),
    );

    let events = bus.borrow().events().to_vec();
    let [
        BusEvent::GlobalPresenceBatch { entries: first },
        BusEvent::GlobalPresenceBatch { entries: second },
    ] = events.as_slice()
    else {
        panic!("expected two batches, got {events:?}");
    };
    assert_eq!(first[0].availability, Availability::Away);
    assert_eq!(second[0].availability, Availability::Unavailable);
}
