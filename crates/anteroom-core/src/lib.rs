//! Startup synchronization core for the Anteroom chat session.
//!
//! Pure state machine logic for bringing a chat session up in a deterministic
//! order, completely decoupled from I/O. This enables deterministic testing of
//! every arrival interleaving the connection layer can produce.
//!
//! # Architecture
//!
//! The connection layer feeds parsed stanzas into two single-threaded state
//! machines. Neither performs I/O, reads a clock, or touches global state:
//! time is passed as a method parameter, and all outward effects go through
//! two injected seams - a [`MessageBus`] for named events and a
//! [`SessionStore`] with mutation entry points.
//!
//! ```text
//! connection layer ──iq──────> IqGate ───────┐
//!                                            ├──> bus events ──> stores/UI
//! connection layer ──presence> PresenceSequencer
//! ```
//!
//! [`IqGate`] withholds non-essential traffic until every required startup
//! query response has arrived, then replays everything in a fixed canonical
//! order and fires a one-shot readiness signal. [`PresenceSequencer`] buffers
//! availability updates until that signal, then classifies and routes them
//! continuously. [`SessionPipeline`] wires the two together for a session.
//!
//! A reconnect discards these instances and constructs fresh ones; buffered
//! state never migrates between connections.
//!
//! # Components
//!
//! - [`gate`]: startup gate for info/query responses
//! - [`presence`]: availability sequencing and classification
//! - [`bus`]: event vocabulary and the publish seam
//! - [`store`]: downstream mutation entry points
//! - [`session`]: per-session wiring of gate and sequencer
//! - [`idle`]: shared idle-duration arithmetic and formatting

pub mod bus;
pub mod gate;
pub mod idle;
pub mod presence;
pub mod session;
pub mod store;

pub use bus::{BusError, BusEvent, MessageBus};
pub use gate::{IqGate, SessionRole, StartupContinuation};
pub use presence::{Availability, GlobalPresence, PresenceSequencer, SessionSnapshot};
pub use session::SessionPipeline;
pub use store::SessionStore;
