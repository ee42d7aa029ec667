//! Concrete player implementations: the automated stand-in and a
//! transport-backed remote seat.

pub mod remote;
pub mod synth;

pub use remote::Remote;
pub use synth::Synth;
