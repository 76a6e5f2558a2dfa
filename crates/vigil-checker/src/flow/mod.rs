//! Flow-sensitive type updates.

mod narrowing;

pub use narrowing::narrow_receiver_after_call;
