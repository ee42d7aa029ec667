use super::event::Event;
use crate::game::Action;
use crate::game::Roles;

/// Trait for entities that answer for a seat at the table.
/// Implementations can be bots, humans via CLI, network players behind a
/// WebSocket bridge, etc.
///
/// The async design allows:
/// - bots to spawn blocking computation in separate threads
/// - humans to await user input without blocking the room
/// - network players to await remote responses
///
/// The trait is transport-agnostic: the room neither knows nor cares where
/// decisions come from. It pushes events, waits for responses, and applies a
/// deterministic default when a seat stays silent past its deadline.
#[async_trait::async_trait]
pub trait Player: Send {
    /// Choose one of the published actions.
    /// Called when it is this seat's turn to act; `actions` is exactly the
    /// set the machine will accept.
    async fn decide(&mut self, actions: &[Action], roles: &Roles) -> Action;

    /// Receive notification of a match event.
    /// Called for every broadcast and for private events addressed to this
    /// seat. Not required for decision-making.
    async fn notify(&mut self, event: &Event);

    /// Transport liveness. A false return marks the seat as away, which earns
    /// it one longer reconnect window before timeouts resume normal pace.
    fn connected(&self) -> bool {
        true
    }
}
