//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Base62 code generation, encoding and validation
//! - [`url_validator`] - Absolute URL checks

pub mod code_generator;
pub mod url_validator;
