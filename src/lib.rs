//! Call Agent - reply service for a browser voice call demo
//!
//! The browser page handles speech recognition and synthesis; this crate
//! turns each transcribed caller utterance into a spoken-style reply:
//! - Remote chat completion when a credential is configured
//! - Keyword classifier with canned replies otherwise, or on any failure
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │        Browser page (STT / TTS / UI)          │
//! └──────────────────────┬───────────────────────┘
//!                        │ POST /api/agent
//! ┌──────────────────────▼───────────────────────┐
//! │                 API server                    │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │                Reply resolver                 │
//! │   Remote completion  ──fail──►  Classifier    │
//! └──────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod classifier;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod resolver;

pub use classifier::{CategoryRule, LocalClassifier};
pub use completion::{CompletionError, CompletionProvider, OpenAiCompletion};
pub use config::Config;
pub use conversation::{Speaker, Turn};
pub use error::{Error, Result};
pub use resolver::{Reply, ReplyResolver, ReplySource};
