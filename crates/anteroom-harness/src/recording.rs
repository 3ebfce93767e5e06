//! Recording doubles for the bus and store seams.

use anteroom_core::{BusError, BusEvent, MessageBus, SessionStore};
use anteroom_proto::{
    EmoticonCatalog, IntegrationPayload, Profile, RoomMetadataUpdate, RoomSummary, RosterItem,
    SessionConfig,
};

/// A bus that records every published event.
///
/// Can be told to fail the readiness signal, for exercising the gate's
/// failure-to-diagnostic conversion. The event is recorded before the failure
/// is reported, mirroring a listener that throws after partial delivery.
#[derive(Debug, Default)]
pub struct RecordingBus {
    events: Vec<BusEvent>,
    fail_readiness: Option<(String, String)>,
}

impl RecordingBus {
    /// An empty recording bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event published so far, in order.
    #[must_use]
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Drain the recorded events.
    pub fn take_events(&mut self) -> Vec<BusEvent> {
        std::mem::take(&mut self.events)
    }

    /// Make the next readiness publication fail as if listener `name` threw
    /// `message`.
    pub fn fail_on_readiness(&mut self, name: &str, message: &str) {
        self.fail_readiness = Some((name.to_owned(), message.to_owned()));
    }
}

impl MessageBus for RecordingBus {
    fn publish(&mut self, event: BusEvent) -> Result<(), BusError> {
        let is_readiness = matches!(event, BusEvent::ReadinessSignal);
        self.events.push(event);
        if is_readiness {
            if let Some((name, message)) = self.fail_readiness.take() {
                return Err(BusError::Subscriber {
                    name,
                    message,
                    description: "listener failed while handling the readiness signal".to_owned(),
                    backtrace: None,
                });
            }
        }
        Ok(())
    }
}

/// One recorded store mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreMutation {
    /// `replace_roster` was called.
    ReplaceRoster(Vec<RosterItem>),
    /// `merge_rooms` was called.
    MergeRooms(Vec<RoomSummary>),
    /// `update_profile` was called.
    UpdateProfile(Profile),
    /// `replace_emoticons` was called.
    ReplaceEmoticons(EmoticonCatalog),
    /// `merge_emoticons` was called.
    MergeEmoticons(EmoticonCatalog),
    /// `update_room_metadata` was called.
    UpdateRoomMetadata(RoomMetadataUpdate),
    /// `push_integration` was called.
    PushIntegration(IntegrationPayload),
    /// `push_integration_ui` was called.
    PushIntegrationUi(IntegrationPayload),
    /// `apply_config` was called.
    ApplyConfig(SessionConfig),
}

impl StoreMutation {
    /// The entry-point name, for compact order assertions.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ReplaceRoster(_) => "replace_roster",
            Self::MergeRooms(_) => "merge_rooms",
            Self::UpdateProfile(_) => "update_profile",
            Self::ReplaceEmoticons(_) => "replace_emoticons",
            Self::MergeEmoticons(_) => "merge_emoticons",
            Self::UpdateRoomMetadata(_) => "update_room_metadata",
            Self::PushIntegration(_) => "push_integration",
            Self::PushIntegrationUi(_) => "push_integration_ui",
            Self::ApplyConfig(_) => "apply_config",
        }
    }
}

/// A store that records every mutation in call order.
#[derive(Debug, Default)]
pub struct RecordingStore {
    mutations: Vec<StoreMutation>,
}

impl RecordingStore {
    /// An empty recording store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every mutation so far, in call order.
    #[must_use]
    pub fn mutations(&self) -> &[StoreMutation] {
        &self.mutations
    }
}

impl SessionStore for RecordingStore {
    fn replace_roster(&mut self, items: &[RosterItem]) {
        self.mutations.push(StoreMutation::ReplaceRoster(items.to_vec()));
    }

    fn merge_rooms(&mut self, rooms: &[RoomSummary]) {
        self.mutations.push(StoreMutation::MergeRooms(rooms.to_vec()));
    }

    fn update_profile(&mut self, profile: &Profile) {
        self.mutations.push(StoreMutation::UpdateProfile(profile.clone()));
    }

    fn replace_emoticons(&mut self, catalog: &EmoticonCatalog) {
        self.mutations.push(StoreMutation::ReplaceEmoticons(catalog.clone()));
    }

    fn merge_emoticons(&mut self, catalog: &EmoticonCatalog) {
        self.mutations.push(StoreMutation::MergeEmoticons(catalog.clone()));
    }

    fn update_room_metadata(&mut self, update: &RoomMetadataUpdate) {
        self.mutations.push(StoreMutation::UpdateRoomMetadata(update.clone()));
    }

    fn push_integration(&mut self, payload: &IntegrationPayload) {
        self.mutations.push(StoreMutation::PushIntegration(payload.clone()));
    }

    fn push_integration_ui(&mut self, payload: &IntegrationPayload) {
        self.mutations.push(StoreMutation::PushIntegrationUi(payload.clone()));
    }

    fn apply_config(&mut self, config: &SessionConfig) {
        self.mutations.push(StoreMutation::ApplyConfig(config.clone()));
    }
}
