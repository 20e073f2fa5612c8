//! Embedded prompts
//!
//! Compiled into the binary from .pmt files at build time.

/// Classifier system prompt: the fixed intent schema and extraction rules.
pub const INTENT: &str = include_str!("../prompts/intent.pmt");
