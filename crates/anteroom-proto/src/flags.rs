//! Room-occupant status flags.
//!
//! Room presence carries a list of numeric status codes describing what the
//! update means for the receiving occupant. Only the codes the session core
//! acts on are decoded; everything else is dropped.

use bitflags::bitflags;

bitflags! {
    /// Decoded occupant status codes from a room presence update.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RoomStatusFlags: u8 {
        /// This update describes the receiving occupant itself (code 110).
        const SELF_PRESENCE = 1 << 0;
        /// The occupant was removed from the room by a moderator (code 307).
        const KICKED = 1 << 1;
        /// The occupant was removed because the room became members-only
        /// (code 322).
        const MEMBERS_ONLY = 1 << 2;
    }
}

impl RoomStatusFlags {
    /// Decode a raw status-code list. Unknown codes are ignored.
    pub fn from_codes(codes: &[u16]) -> Self {
        let mut flags = Self::empty();
        for code in codes {
            match code {
                110 => flags |= Self::SELF_PRESENCE,
                307 => flags |= Self::KICKED,
                322 => flags |= Self::MEMBERS_ONLY,
                _ => {},
            }
        }
        flags
    }
}
