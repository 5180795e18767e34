//! Workflow Builder
//!
//! Assembles a [`WorkflowDefinition`](workflow_types::WorkflowDefinition)
//! incrementally. The builder infers task wiring from prompt templates and
//! tracks the shape of every memory slot as steps are declared.
//!
//! # Components
//!
//! - [`MemoryTypeTracker`]: slot shapes and the access kinds legal on them
//! - [`extract_names`]: `{{name}}` placeholder discovery
//! - [`new_task`] / [`DraftTask`]: task assembly with inferred inputs
//! - [`GraphAssembler`]: edges, completeness checks and the terminal task
//! - [`ConditionBuilder`] / [`resolve_return`]: predicates and return bindings
//! - [`WorkflowBuilder`]: the facade tying them together
//!
//! # Example
//!
//! ```
//! use workflow_builder::{TaskOptions, WorkflowBuilder};
//! use workflow_types::{Edge, Operator, Output};
//!
//! let mut builder = WorkflowBuilder::new();
//! builder
//!     .generative_step(
//!         "Write a poem as if you are Kahlil Gibran",
//!         Operator::Generation,
//!         TaskOptions::new().with_id("write_poem").with_output(Output::write("poem")),
//!     )
//!     .unwrap();
//! builder.flow([Edge::to_end("write_poem")]).unwrap();
//! builder.set_return_value("poem").unwrap();
//!
//! let workflow = builder.build().unwrap();
//! assert_eq!(workflow.tasks.len(), 2);
//! ```

#![deny(unsafe_code)]

mod builder;
mod errors;
mod graph;
mod resolver;
mod task;
mod template;
mod tracker;

pub use builder::*;
pub use errors::*;
pub use graph::*;
pub use resolver::*;
pub use task::*;
pub use template::*;
pub use tracker::*;
