//! Actor layer.
//!
//! The breakout coordinator owns the partition state and is the only place it
//! changes. Callers talk to it through a cloneable handle.

pub mod breakout;
pub mod messages;
pub mod traits;
