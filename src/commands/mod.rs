//! Command table and line dispatcher
//!
//! A [`Session`] owns the simulated [`Memory`] and the command table. Each
//! input line is split on whitespace; the first token names the command, the
//! rest are its arguments:
//!
//! ```text
//! >>> new_pointer p
//! >>> malloc 4 p
//! >>> set_val 200 p
//! >>> visualize_bytes
//! ```
//!
//! The table is a [`ChainedMap`] of [`Command`]s. A command's [`Handler`]
//! variant says which parts of the session it may touch, which also gives its
//! management category in `help`.
//!
//! Handlers return a [`Reply`] describing the result; rendering is left to the
//! front-end (see [`text`] for the plain-text form used by batch mode).

mod handlers;
pub mod text;

use crate::constants::{COMMAND_BUCKETS, MAX_ARGS, POINTER_BUCKETS};
use crate::map::{ChainedMap, InsertOutcome, Overwrite};
use crate::memory::errors::MemoryError;
use crate::memory::pointer::Pointer;
use crate::memory::{BlockInfo, ByteView, Memory, MemoryStats};
use std::fmt;

type MemoryHandler = fn(&mut Memory, &[&str]) -> Result<Reply, MemoryError>;
type TableHandler = fn(&ChainedMap<Command>, &[&str]) -> Result<Reply, MemoryError>;
type SessionHandler =
    fn(&mut Memory, &ChainedMap<Command>, &[&str]) -> Result<Reply, MemoryError>;

/// What a command is allowed to operate on
#[derive(Clone, Copy)]
pub enum Handler {
    Memory(MemoryHandler),
    Commands(TableHandler),
    All(SessionHandler),
}

/// Management category shown by `help`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Memory,
    Commands,
    All,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Memory => write!(f, "memory"),
            Category::Commands => write!(f, "commands"),
            Category::All => write!(f, "all"),
        }
    }
}

/// One entry in the command table
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub arity: usize,
    pub handler: Handler,
}

impl Command {
    pub fn category(&self) -> Category {
        match self.handler {
            Handler::Memory(_) => Category::Memory,
            Handler::Commands(_) => Category::Commands,
            Handler::All(_) => Category::All,
        }
    }
}

/// `help` listing for one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub arity: usize,
    pub category: Category,
}

/// Result of a command, for the front-end to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Success(String),
    Notice(String),
    Blocks(Vec<BlockInfo>),
    Bytes(Vec<ByteView>),
    Pointers(Vec<(String, Pointer)>),
    Stats(MemoryStats),
    Help(Vec<HelpEntry>),
    /// `new_pointer` hit an existing name; ask the user, then call
    /// [`Session::confirm_overwrite`]
    ConfirmOverwrite { name: String },
    Exit,
}

/// Build the command table
pub fn command_table() -> Result<ChainedMap<Command>, MemoryError> {
    let mut table = ChainedMap::new(COMMAND_BUCKETS)?;
    for command in handlers::COMMANDS {
        table.insert(command.name, command, Overwrite::Always);
    }
    Ok(table)
}

/// The simulated memory plus the commands that operate on it
pub struct Session {
    pub memory: Memory,
    commands: ChainedMap<Command>,
}

impl Session {
    pub fn new(arena_size: usize) -> Result<Self, MemoryError> {
        Ok(Session {
            memory: Memory::new(arena_size, POINTER_BUCKETS)?,
            commands: command_table()?,
        })
    }

    /// Tokenize `line`, check the command and its arity, and run it
    pub fn execute(&mut self, line: &str) -> Result<Reply, MemoryError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = tokens.split_first().ok_or_else(|| {
            MemoryError::invalid("Empty input received. No command to execute.")
        })?;
        if tokens.len() > MAX_ARGS {
            return Err(MemoryError::invalid(format!(
                "Too many tokens ({}); at most {} are read per line.",
                tokens.len(),
                MAX_ARGS
            )));
        }

        let command = self
            .commands
            .get(name)
            .copied()
            .ok_or_else(|| MemoryError::not_found(format!("a command named '{}'", name)))?;
        if args.len() != command.arity {
            return Err(MemoryError::invalid(format!(
                "Wrong amount of arguments ( {} ) for {}. Expected {} arg{}. Usage: {}",
                args.len(),
                command.name,
                command.arity,
                if command.arity == 1 { "" } else { "s" },
                command.usage
            )));
        }

        match command.handler {
            Handler::Memory(run) => run(&mut self.memory, args),
            Handler::Commands(run) => run(&self.commands, args),
            Handler::All(run) => run(&mut self.memory, &self.commands, args),
        }
    }

    /// Redeclare `name` after the user agreed to overwrite it
    pub fn confirm_overwrite(&mut self, name: &str) -> Result<Reply, MemoryError> {
        match self.memory.declare_pointer(name, Overwrite::Always)? {
            InsertOutcome::Kept => Ok(Reply::Notice("Keeping previous pointer.".to_string())),
            _ => Ok(Reply::Success(format!(
                "Declared pointer {} successfully.",
                name
            ))),
        }
    }
}
