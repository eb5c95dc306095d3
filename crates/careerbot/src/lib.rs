//! Careerbot - career guidance chat assistant for undergraduates
//!
//! Combines a fixed table of majors, careers, skills, and learning resources
//! with a hosted language model. Front ends feed a major and a question into
//! a [`chat::ChatLoop`], which assembles the prompt, calls the model, and
//! keeps per-session history in memory.

pub mod chat;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod model;
pub mod testing;

pub use error::CareerBotError;
