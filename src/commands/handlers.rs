//! Command handlers and argument parsing

use super::{Command, Handler, HelpEntry, Reply};
use crate::map::{ChainedMap, InsertOutcome, Overwrite};
use crate::memory::errors::MemoryError;
use crate::memory::Memory;

pub(super) const COMMANDS: [Command; 10] = [
    Command {
        name: "malloc",
        description: "Manually allocate with a pointer a certain amount of bytes",
        usage: "malloc <size> <pointer>",
        arity: 2,
        handler: Handler::Memory(malloc),
    },
    Command {
        name: "free",
        description: "Free an allocated pointer",
        usage: "free <pointer>",
        arity: 1,
        handler: Handler::Memory(free),
    },
    Command {
        name: "set_val",
        description: "Set the value of a pointer's pointed value to a number (0-255)",
        usage: "set_val <value> <pointer>",
        arity: 2,
        handler: Handler::Memory(set_val),
    },
    Command {
        name: "new_pointer",
        description: "Create a new pointer with the name you choose",
        usage: "new_pointer <name>",
        arity: 1,
        handler: Handler::Memory(new_pointer),
    },
    Command {
        name: "visualize_blocks",
        description: "Show allocated blocks",
        usage: "visualize_blocks",
        arity: 0,
        handler: Handler::Memory(visualize_blocks),
    },
    Command {
        name: "visualize_bytes",
        description: "Show all the memory",
        usage: "visualize_bytes",
        arity: 0,
        handler: Handler::Memory(visualize_bytes),
    },
    Command {
        name: "pointers",
        description: "List declared pointers and where they point",
        usage: "pointers",
        arity: 0,
        handler: Handler::Memory(pointers),
    },
    Command {
        name: "stats",
        description: "Show block count, used and free bytes",
        usage: "stats",
        arity: 0,
        handler: Handler::Memory(stats),
    },
    Command {
        name: "help",
        description: "Outputs important info about each command",
        usage: "help",
        arity: 0,
        handler: Handler::Commands(help),
    },
    Command {
        name: "exit",
        description: "Exit the program.",
        usage: "exit",
        arity: 0,
        handler: Handler::All(exit),
    },
];

fn malloc(memory: &mut Memory, args: &[&str]) -> Result<Reply, MemoryError> {
    let size = parse_size(args[0])?;
    let name = args[1];
    memory.allocate(size, name)?;
    Ok(Reply::Success(format!(
        "Allocated {} bytes for pointer {} successfully.",
        size, name
    )))
}

fn free(memory: &mut Memory, args: &[&str]) -> Result<Reply, MemoryError> {
    memory.free(args[0])?;
    Ok(Reply::Success(format!(
        "Freed pointer {} successfully.",
        args[0]
    )))
}

fn set_val(memory: &mut Memory, args: &[&str]) -> Result<Reply, MemoryError> {
    let value = parse_value(args[0])?;
    memory.write_value(value, args[1])?;
    Ok(Reply::Success(format!(
        "Set {} to the value pointer {} is pointing at successfully.",
        value, args[1]
    )))
}

fn new_pointer(memory: &mut Memory, args: &[&str]) -> Result<Reply, MemoryError> {
    let name = args[0];
    match memory.declare_pointer(name, Overwrite::Never)? {
        InsertOutcome::Kept => Ok(Reply::ConfirmOverwrite {
            name: name.to_string(),
        }),
        _ => Ok(Reply::Success(format!(
            "Declared pointer {} successfully.",
            name
        ))),
    }
}

fn visualize_blocks(memory: &mut Memory, _args: &[&str]) -> Result<Reply, MemoryError> {
    Ok(Reply::Blocks(memory.list_blocks()))
}

fn visualize_bytes(memory: &mut Memory, _args: &[&str]) -> Result<Reply, MemoryError> {
    Ok(Reply::Bytes(memory.list_bytes()))
}

fn pointers(memory: &mut Memory, _args: &[&str]) -> Result<Reply, MemoryError> {
    let mut entries: Vec<_> = memory
        .pointers()
        .iter()
        .map(|(name, ptr)| (name.to_string(), ptr))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(Reply::Pointers(entries))
}

fn stats(memory: &mut Memory, _args: &[&str]) -> Result<Reply, MemoryError> {
    Ok(Reply::Stats(memory.stats()))
}

fn help(commands: &ChainedMap<Command>, _args: &[&str]) -> Result<Reply, MemoryError> {
    let mut entries: Vec<HelpEntry> = commands
        .iter()
        .map(|(_, cmd)| HelpEntry {
            name: cmd.name,
            description: cmd.description,
            usage: cmd.usage,
            arity: cmd.arity,
            category: cmd.category(),
        })
        .collect();
    entries.sort_by_key(|entry| entry.name);
    Ok(Reply::Help(entries))
}

fn exit(
    _memory: &mut Memory,
    _commands: &ChainedMap<Command>,
    _args: &[&str],
) -> Result<Reply, MemoryError> {
    Ok(Reply::Exit)
}

/// Parse an allocation size: a non-negative decimal integer
pub(crate) fn parse_size(arg: &str) -> Result<usize, MemoryError> {
    digits(arg).and_then(|arg| arg.parse::<usize>().ok()).ok_or_else(|| {
        MemoryError::invalid(format!(
            "First argument in malloc must be a positive integer (no decimal point) <size>, not '{}'",
            arg
        ))
    })
}

/// Parse a byte value in 0-255
pub(crate) fn parse_value(arg: &str) -> Result<u8, MemoryError> {
    digits(arg).and_then(|arg| arg.parse::<u8>().ok()).ok_or_else(|| {
        MemoryError::invalid(format!(
            "First argument in set_val must be an integer (no decimal dot) between 0-255 <value>, not '{}'",
            arg
        ))
    })
}

/// `arg` if it is a non-empty run of ASCII digits (no sign)
fn digits(arg: &str) -> Option<&str> {
    (!arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit())).then_some(arg)
}
