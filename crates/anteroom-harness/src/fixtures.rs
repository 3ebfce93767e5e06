//! Stanza fixture builders.
//!
//! Small canned payloads for driving the session core in tests. Addresses are
//! parsed eagerly; an invalid fixture address is a test bug and panics.

use anteroom_proto::{
    Affiliation, Emoticon, EmoticonCatalog, IntegrationPayload, IqStanza, Jid, MucItem, MucUser,
    PresenceKind, PresenceStanza, Profile, QueryPayload, Role, RoomSummary, RosterItem,
    SessionConfig,
};

fn jid(raw: &str) -> Jid {
    raw.parse().unwrap_or_else(|err| panic!("invalid fixture address {raw:?}: {err}"))
}

/// A roster entry for `address` displaying as `name`.
pub fn roster_item(address: &str, name: &str) -> RosterItem {
    RosterItem {
        jid: jid(address),
        name: Some(name.to_owned()),
        mention_name: Some(name.to_lowercase()),
    }
}

/// A query-result roster stanza carrying `items`.
pub fn roster_result(items: Vec<RosterItem>) -> IqStanza {
    IqStanza::result(QueryPayload::Roster(anteroom_proto::RosterPayload { items }))
}

/// A directory room named `name` at `address`.
pub fn room_summary(address: &str, name: &str) -> RoomSummary {
    RoomSummary { jid: jid(address), name: name.to_owned(), topic: None, guest_access: false }
}

/// A query-result room directory stanza carrying `rooms`.
pub fn rooms_result(rooms: Vec<RoomSummary>) -> IqStanza {
    IqStanza::result(QueryPayload::RoomDirectory(anteroom_proto::RoomDirectoryPayload { rooms }))
}

fn small_catalog() -> EmoticonCatalog {
    EmoticonCatalog {
        path_prefix: Some("/emoticons".to_owned()),
        emoticons: vec![Emoticon { shortcut: "(wave)".to_owned(), path: "wave.png".to_owned() }],
    }
}

/// A query-result emoticon catalog stanza.
pub fn emoticons_result() -> IqStanza {
    IqStanza::result(QueryPayload::Emoticons(small_catalog()))
}

/// A mutation-variant emoticon stanza: same catalog payload, but as an
/// incremental update.
pub fn emoticons_set() -> IqStanza {
    IqStanza::set(QueryPayload::Emoticons(small_catalog()))
}

/// A query-result startup configuration stanza.
pub fn startup_result() -> IqStanza {
    IqStanza::result(QueryPayload::Startup(SessionConfig {
        mention_name: Some("me".to_owned()),
        group_id: Some(42),
        features: vec!["rooms".to_owned()],
        preferences: serde_json::json!({ "sound": true }),
    }))
}

/// A query-result profile stanza.
pub fn profile_result() -> IqStanza {
    IqStanza::result(QueryPayload::Profile(Profile {
        name: Some("Me".to_owned()),
        email: Some("me@chat.example".to_owned()),
        title: None,
    }))
}

/// An integration push stanza from addon `addon_key`.
pub fn integration_push(addon_key: &str) -> IqStanza {
    IqStanza::set(QueryPayload::Integration(IntegrationPayload {
        addon_key: addon_key.to_owned(),
        data: serde_json::json!({ "glance": "refresh" }),
    }))
}

/// An integration UI push stanza from addon `addon_key`.
pub fn integration_ui_push(addon_key: &str) -> IqStanza {
    IqStanza::set(QueryPayload::IntegrationUi(IntegrationPayload {
        addon_key: addon_key.to_owned(),
        data: serde_json::json!({ "dialog": "open" }),
    }))
}

/// A query-result stanza in an unrecognized namespace.
pub fn unknown_result(namespace: &str) -> IqStanza {
    IqStanza::result(QueryPayload::Other { namespace: namespace.to_owned() })
}

/// An occupant item disclosing `address` with the given role and affiliation.
pub fn occupant_item(address: &str, role: Role, affiliation: Affiliation) -> MucItem {
    MucItem {
        jid: Some(jid(address)),
        role: Some(role),
        affiliation: Some(affiliation),
        actor: None,
        mention_name: None,
    }
}

/// A room-scoped presence stanza from the occupant address `from`
/// (`room@domain/nick`), carrying `item` and raw status `codes`.
pub fn room_presence(
    from: &str,
    kind: PresenceKind,
    item: Option<MucItem>,
    codes: &[u16],
) -> PresenceStanza {
    PresenceStanza {
        kind,
        muc: Some(MucUser { item, status_codes: codes.to_vec() }),
        ..PresenceStanza::available(jid(from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_carry_the_expected_namespaces() {
        use anteroom_proto::Namespace;
        assert_eq!(roster_result(Vec::new()).namespace(), Some(Namespace::Roster));
        assert_eq!(rooms_result(Vec::new()).namespace(), Some(Namespace::RoomDirectory));
        assert_eq!(emoticons_result().namespace(), Some(Namespace::Emoticons));
        assert_eq!(startup_result().namespace(), Some(Namespace::Startup));
        assert_eq!(
            unknown_result("urn:example:x").namespace(),
            Some(Namespace::Other("urn:example:x".to_owned())),
        );
    }

    #[test]
    fn room_presence_is_room_scoped() {
        let stanza = room_presence(
            "lobby@rooms.chat.example/Alice",
            PresenceKind::Available,
            Some(occupant_item("alice@chat.example", Role::Participant, Affiliation::Member)),
            &[110],
        );
        assert!(stanza.muc.is_some());
        assert_eq!(stanza.from.unwrap().domain(), "rooms.chat.example");
    }
}
