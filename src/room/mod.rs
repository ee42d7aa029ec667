//! Async runtime for live Durak matches.
//!
//! This module coordinates a multiplayer match, bridging the game engine and
//! pluggable player types (human, bot, network) through message-passing
//! channels.
//!
//! ## Architecture
//!
//! - [`Room`] — match coordinator owning the game, the seats, and the
//!   response deadline
//! - [`Actor`] — async task wrapper for a single player's event loop
//! - [`Table`] — seat registry with per-recipient redacting broadcast
//! - [`Timer`] — the single live deadline per match
//!
//! ## Messages
//!
//! - [`Event`] — notifications from the match to a player
//! - [`Signal`] — responses and lifecycle requests back into the match
//! - [`Protocol`] — event to wire-message encoding plus action parsing
//! - [`Player`] — trait for pluggable player implementations
//!
//! ## Submodules
//!
//! - [`players`] — concrete players (Synth stand-in, channel-backed Remote)

pub mod actor;
pub mod event;
pub mod player;
pub mod players;
pub mod protocol;
pub mod room;
pub mod table;
pub mod timer;

pub use actor::*;
pub use event::*;
pub use player::*;
pub use players::*;
pub use protocol::*;
pub use room::*;
pub use table::*;
pub use timer::*;
