//! # guide-core
//!
//! Chat transcript logic for the Puerto Rico tourism guide widget.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ChatSession                            │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────────┐  │
//! │  │ Transcript  │  │   Storage   │  │    ChatBackend       │  │
//! │  │ (messages)  │──│ (get/set/   │  │    (POST /chat)      │  │
//! │  │             │  │  remove)    │  │                      │  │
//! │  └─────────────┘  └─────────────┘  └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every side effect the session needs (persistence, the remote call, the
//! yes/no prompt) is an injected capability, so the same state machine runs
//! in the browser and under `cargo test` with in-memory fakes.

pub mod backend;
pub mod config;
pub mod confirm;
pub mod error;
pub mod map;
pub mod message;
pub mod relative_time;
pub mod session;
pub mod storage;

pub use backend::{ChatBackend, ChatReply, ChatRequest};
pub use config::GuideConfig;
pub use confirm::Confirm;
pub use error::{GuideError, Result};
pub use map::{LatLng, Location, MapConfig, MapLayout};
pub use message::{Message, Transcript};
pub use relative_time::format_relative;
pub use session::{ChatSession, PendingTurn, SendOutcome};
pub use storage::{MemoryStorage, Storage};
