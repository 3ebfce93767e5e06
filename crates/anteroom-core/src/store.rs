//! Downstream store mutation entry points.
//!
//! The gate's dispatch table calls exactly one of these per handled stanza.
//! Stores are external collaborators; this layer never reads them back.

use anteroom_proto::{
    EmoticonCatalog, IntegrationPayload, Profile, RoomMetadataUpdate, RoomSummary, RosterItem,
    SessionConfig,
};

/// Mutation entry points of the downstream session stores.
pub trait SessionStore {
    /// Replace the contact roster wholesale.
    fn replace_roster(&mut self, items: &[RosterItem]);

    /// Merge directory rooms into the room store.
    fn merge_rooms(&mut self, rooms: &[RoomSummary]);

    /// Update the session user's profile.
    fn update_profile(&mut self, profile: &Profile);

    /// Replace the emoticon catalog wholesale.
    fn replace_emoticons(&mut self, catalog: &EmoticonCatalog);

    /// Merge an incremental emoticon update into the catalog.
    fn merge_emoticons(&mut self, catalog: &EmoticonCatalog);

    /// Apply a metadata update to a single room.
    fn update_room_metadata(&mut self, update: &RoomMetadataUpdate);

    /// Forward a third-party integration push.
    fn push_integration(&mut self, payload: &IntegrationPayload);

    /// Forward a third-party integration UI push.
    fn push_integration_ui(&mut self, payload: &IntegrationPayload);

    /// Apply startup configuration.
    ///
    /// Application is asynchronous: the caller resumes startup only after the
    /// store's separate "configuration applied" acknowledgement.
    fn apply_config(&mut self, config: &SessionConfig);
}
