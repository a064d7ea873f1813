//! Terminal front end for Morse Mate
//!
//! Tone backends, pattern rendering and the interactive session.

pub use morse_core::*;

pub use crate::tone::*;

pub mod cli;
pub mod render;
pub mod repl;
pub mod tone;
