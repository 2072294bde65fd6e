//! MCP tool handlers
//!
//! Each file extends `TaskServerHandler` with the `handle_*` methods the
//! tools in `lib.rs` delegate to.

pub mod focus;
pub mod settings;
pub mod subtasks;
pub mod tasks;
pub mod views;
