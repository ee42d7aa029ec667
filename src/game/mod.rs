//! The Durak turn-stage state machine and its supporting pieces.
//!
//! [`Game`] owns every card for one match and is advanced exclusively through
//! [`Game::advance`] and [`Game::apply`]; the async room layer supplies the
//! triggers. Stage transitions are tabulated in [`stage`], legal actions are
//! generated per phase, and anything outside the published set is refused
//! without mutating state.

pub mod action;
pub mod field;
pub mod game;
pub mod roles;
pub mod stage;

pub use action::Action;
pub use field::Field;
pub use game::Continuation;
pub use game::Game;
pub use game::Rejection;
pub use game::Spot;
pub use roles::Roles;
pub use stage::Stage;
