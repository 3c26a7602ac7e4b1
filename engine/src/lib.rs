//! Flow controller for labelens - state machine and orchestration.
//!
//! # Architecture
//!
//! One [`FlowController`] owns every piece of session state: the active
//! [`ViewState`], the navigation stack mirroring browser-style session
//! history, the analysis result, the chat transcript, and the in-flight
//! request handles. Front ends never mutate state directly; they invoke
//! controller operations and read controller-exposed values.
//!
//! ```text
//! UI action ──> FlowController ──> view transition + history push/replace
//!                    │
//!                    ├──> spawn abortable request task ──> LabelService
//!                    │                                        │
//!                    │        seq-tagged FlowEvent over mpsc <┘
//!                    └──< poll_events()/drive() applies completions
//!
//! host back button ──> handle_history_pop() ──> restore + clear + cancel
//! ```
//!
//! # Request lifecycle
//!
//! At most one analysis and one chat request are in flight at any time:
//! starting a new request of a kind first aborts the stored handle of that
//! kind. Completions carry the sequence number they were issued under;
//! anything that does not match the current in-flight sequence is discarded,
//! so a cancelled request can never mutate state no matter when its response
//! lands.

mod config;
mod controller;
mod navigation;
mod state;

pub use config::{API_URL_ENV, ApiSection, ConfigError, LabelensConfig, resolve_base_url};
pub use controller::{CHAT_FALLBACK_REPLY, FlowController, FlowEvent};
pub use navigation::{HistorySink, NavEntry, NavigationStack, NullHistorySink};
pub use state::RequestSeq;
