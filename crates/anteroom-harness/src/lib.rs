//! Test support for the Anteroom session core.
//!
//! Provides recording implementations of the two collaborator seams - a
//! [`RecordingBus`] that logs every published event and a [`RecordingStore`]
//! that logs every mutation - plus fixture builders for the stanza shapes the
//! test suites feed in. Both doubles are plain synchronous values; share a
//! bus between components with `Rc<RefCell<RecordingBus>>`.

// Fixture builders are used from tests only; invalid fixture input is a test
// bug and panics outright.
#![allow(clippy::panic, clippy::expect_used)]

mod fixtures;
mod recording;

pub use fixtures::{
    emoticons_result, emoticons_set, integration_push, integration_ui_push, occupant_item,
    profile_result, room_presence, room_summary, rooms_result, roster_item, roster_result,
    startup_result, unknown_result,
};
pub use recording::{RecordingBus, RecordingStore, StoreMutation};
