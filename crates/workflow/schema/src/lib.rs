//! Workflow Schema
//!
//! Structural validation of serialized workflow documents before they are
//! handed to a runtime. The accepted shape:
//!
//! ```text
//! {
//!   config:          { max_steps, max_time, tools?, custom_tools?, max_tokens? },
//!   external_memory?: { key: string | [string | object] },
//!   tasks:           [{ id, name, description, prompt, inputs?, operator, outputs? }],
//!   steps:           [{ source, target, condition?, fallback? }],
//!   return_value:    { input: access | [access], to_json?, post_process? }
//! }
//! ```
//!
//! The first violated constraint is reported with its location, for
//! example `$.tasks[0].operator`.

#![deny(unsafe_code)]

mod errors;
mod validator;

pub use errors::*;
pub use validator::{validate, validate_definition, validate_value};
