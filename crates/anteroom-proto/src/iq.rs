//! Info/query stanzas.
//!
//! An info/query stanza is a request-response message whose purpose is
//! identified by the namespace of its query payload. The variant matters to
//! the session core: query results satisfy startup requirements, mutations
//! (`set`) never do.

use serde::{Deserialize, Serialize};

use crate::{
    address::Jid, errors::StanzaError, namespace::Namespace, payloads::QueryPayload,
};

/// The info/query stanza variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IqType {
    /// Request for data.
    Get,
    /// Mutation pushed by the peer.
    Set,
    /// Successful query response.
    Result,
    /// Error response.
    Error,
}

/// A parsed info/query stanza.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IqStanza {
    /// Sender address, if present.
    pub from: Option<Jid>,
    /// Stanza id for request-response correlation.
    pub id: Option<String>,
    /// The stanza variant.
    pub iq_type: IqType,
    /// The query payload, if the stanza carried a recognizable query element.
    pub payload: Option<QueryPayload>,
    /// Protocol error element, if the stanza carried one.
    pub error: Option<StanzaError>,
}

impl IqStanza {
    /// A query-result stanza wrapping `payload`.
    pub fn result(payload: QueryPayload) -> Self {
        Self { from: None, id: None, iq_type: IqType::Result, payload: Some(payload), error: None }
    }

    /// A mutation stanza wrapping `payload`.
    pub fn set(payload: QueryPayload) -> Self {
        Self { from: None, id: None, iq_type: IqType::Set, payload: Some(payload), error: None }
    }

    /// An error response echoing `payload`.
    pub fn error_response(payload: QueryPayload, error: StanzaError) -> Self {
        Self {
            from: None,
            id: None,
            iq_type: IqType::Error,
            payload: Some(payload),
            error: Some(error),
        }
    }

    /// The namespace of the query payload, if any.
    pub fn namespace(&self) -> Option<Namespace> {
        self.payload.as_ref().map(QueryPayload::namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::RosterPayload;

    #[test]
    fn result_carries_namespace() {
        let stanza = IqStanza::result(QueryPayload::Roster(RosterPayload::default()));
        assert_eq!(stanza.iq_type, IqType::Result);
        assert_eq!(stanza.namespace(), Some(Namespace::Roster));
        assert!(stanza.error.is_none());
    }

    #[test]
    fn stanza_without_payload_has_no_namespace() {
        let stanza = IqStanza {
            from: None,
            id: Some("ping-1".to_owned()),
            iq_type: IqType::Get,
            payload: None,
            error: None,
        };
        assert_eq!(stanza.namespace(), None);
    }
}
