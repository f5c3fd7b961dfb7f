//! # Introduction
//!
//! Bytethon simulates manual memory management over a fixed byte arena.
//! Users declare named pointers, allocate blocks for them with a best-fit
//! strategy, write byte values and free them again, while the block table
//! and the raw bytes are shown live in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Input line → Session::execute → command handler → Memory → Reply → TUI / batch output
//! ```
//!
//! 1. [`map`]: the separately chained string map used for both the command
//!    table and the pointer registry.
//! 2. [`memory`]: the arena, the block table with its split, merge and shift
//!    operations, the best-fit allocator and the named pointers.
//! 3. [`commands`]: the command table, argument checking and the [`commands::Reply`]
//!    each command produces.
//! 4. [`ui`] and [`batch`]: the interactive and the scripted front-ends.
//! 5. [`logging`]: a `log` backend that captures records for the output pane.
//!
//! ## Commands
//!
//! `new_pointer`, `malloc`, `set_val`, `free`, `visualize_blocks`,
//! `visualize_bytes`, `pointers`, `stats`, `help`, `exit`.

pub mod batch;
pub mod commands;
pub mod config;
pub mod constants;
pub mod logging;
pub mod map;
pub mod memory;
pub mod ui;
