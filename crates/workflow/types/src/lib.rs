//! Workflow Definition Model
//!
//! A workflow is a **declarative document**: a directed graph of tasks that
//! call a generative or tool-invoking step, read and write named slots in a
//! shared key-value memory, and branch on comparisons over that memory.
//! Nothing in this crate executes a workflow. The document is handed to an
//! external runtime that walks the graph.
//!
//! # Key Concepts
//!
//! - **WorkflowDefinition**: the root aggregate (config, external memory,
//!   tasks, steps, return value).
//! - **Task**: one node of the graph. Its prompt is a template whose
//!   `{{name}}` placeholders are bound through [`Input`]s.
//! - **Input / Output**: how a task reads from and writes to memory
//!   ([`MemoryAccessKind`], [`OutputKind`]).
//! - **Edge**: a transition between tasks, optionally guarded by a
//!   [`Condition`].
//! - **ReturnSpec**: which memory slot(s) the runtime hands back when the
//!   workflow reaches the terminal task.
//!
//! The serialized shape of every type matches the document contract the
//! `workflow-schema` crate validates.

#![deny(unsafe_code)]

mod config;
mod definition;
mod edge;
mod errors;
mod memory;
mod task;

pub use config::*;
pub use definition::*;
pub use edge::*;
pub use errors::*;
pub use memory::*;
pub use task::*;
