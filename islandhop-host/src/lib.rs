//! # islandhop-host: host integration for islandhop
//!
//! Glue between a life-simulation host and the game-agnostic
//! `islandhop-core` scheduler.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               Host game                   │
//! │  callbacks ──▶ events::HostEvent          │
//! │                   │                       │
//! │                   ▼                       │
//! │  ┌────────────────────────────────────┐   │
//! │  │  session::Session / SessionHandle  │   │
//! │  │   ├─ LifecycleController (core)    │   │
//! │  │   ├─ SaveDataStore                 │   │
//! │  │   ├─ assets::AssetRouter           │   │
//! │  │   └─ session::ShopHandler          │   │
//! │  └────────────────────────────────────┘   │
//! │  patches ──▶ hooks (pure decisions)       │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `events`: host callbacks as a single enum
//! - `session`: per-participant dispatch, authority, version check
//! - `hooks`: schedule, pathing and trample patches
//! - `assets`: load-then-edit asset routing
//! - `settings`: option enumeration for a settings UI
//! - `logging`: subscriber setup and error reporting

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assets;
pub mod error;
pub mod events;
pub mod hooks;
pub mod logging;
pub mod session;
pub mod settings;

pub use error::HostError;
pub use events::HostEvent;
pub use session::{Dispatch, Participant, Session, SessionHandle};
