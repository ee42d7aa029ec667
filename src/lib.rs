//! Podkidnoy Durak match engine.
//!
//! The crate splits into three layers:
//!
//! - [`cards`] — ranks, suits, and the shuffled draw pile with its face-up
//!   trump bottom
//! - [`game`] — the turn-stage state machine: field slots, legal-action
//!   generation, role rotation, elimination
//! - [`room`] — async coordinator driving one match over message-passing
//!   channels: per-player actor tasks, response/timeout bookkeeping, and the
//!   player lifecycle (reconnect, concede, stand-in replacement)
//!
//! The state machine is synchronous and owns every card; the room advances it
//! only on a player response or a timer expiry, one trigger at a time.

pub mod cards;
pub mod game;
pub mod room;

/// Seat index around the table.
pub type Position = usize;
/// Dense per-game card identifier: index into the game's card table, assigned
/// in shuffled-deck order so ids reveal nothing about a card's face.
pub type Cid = usize;

/// Attack/defense slot pairs on the field.
pub const FIELD_SIZE: usize = 6;
/// Hands are topped back up to this size after every turn.
pub const HAND_SIZE: usize = 6;
/// Games replayed at one table before the room retires.
pub const GAMES_PER_SERIES: u32 = 10;
/// At or below this many seats the short 36-card deck is used.
pub const SHORT_DECK_SEATS: usize = 4;
