//! Concierge - conversational task management
//!
//! Concierge turns free-text utterances ("add milk to my list", "I finished
//! the report") into task operations. An LLM classifies each utterance into
//! a structured intent; everything that touches state happens locally
//! against a JSON task file owned by [`taskstore`].
//!
//! # Core Concepts
//!
//! - **Classify, then dispatch**: the LLM only ever names an intent; the
//!   dispatcher decides what actually happens
//! - **State in one file**: tasks live in a single JSON file, re-read
//!   before every operation and rewritten after every mutation
//! - **Never block on bad output**: malformed classifier output degrades
//!   to a help reply, not an error
//!
//! # Modules
//!
//! - [`intent`] - Classified intent type and normalization
//! - [`dispatcher`] - Intent resolution against the task store
//! - [`matcher`] - Title fragment matching
//! - [`llm`] - LLM client trait, OpenAI and Anthropic implementations
//! - [`prompts`] - Compile-time embedded classifier prompt
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//! - [`repl`] - Interactive chat session
//! - [`tui`] - Two-pane terminal dashboard

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod intent;
pub mod llm;
pub mod matcher;
pub mod prompts;
pub mod repl;
pub mod tui;

// Re-export commonly used types
pub use config::{Config, LlmConfig, StorageConfig};
pub use dispatcher::{Dispatcher, Reply, TargetAction};
pub use intent::{ClassifiedIntent, Intent};
pub use llm::{AnthropicClient, LlmClient, LlmError, OpenAIClient};
