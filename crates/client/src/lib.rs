//! Command-line host for arena battles.
//!
//! The binary parses [`Args`], turns them into a [`Session`] (content, player,
//! enemy, seed) and runs it either headless, stepping the battle as fast as
//! possible, or in real time through `arena-runtime`.

mod args;
mod session;

pub use args::Args;
pub use session::Session;
