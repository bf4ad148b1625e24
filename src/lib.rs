//! AI image generator - turns a text description into an image
//!
//! Validates the prompt, asks Gemini for a TEXT+IMAGE response, extracts the
//! first inline image, and projects every outcome onto a small UI state that
//! falls back to a bundled placeholder on failure.

pub mod ai;
pub mod error;
pub mod image;
pub mod models;
pub mod prompt;
pub mod ui;

pub use error::{Error, Result};
