//! Plain-text rendering of replies and errors
//!
//! Used by batch mode; the TUI draws the same information with its own panes
//! but shares [`byte_symbol`] so both show bytes identically.

use super::Reply;
use crate::memory::errors::MemoryError;
use crate::memory::pointer::Pointer;
use crate::memory::{BlockInfo, ByteView, MemoryStats};

/// Two-character cell for one arena byte: `__` free, `**` uninitialized,
/// otherwise the value in hex
pub fn byte_symbol(view: ByteView) -> String {
    match view {
        ByteView::Free => "__".to_string(),
        ByteView::Uninitialized => "**".to_string(),
        ByteView::Value(byte) => format!("{:02X}", byte),
    }
}

pub fn render_error(err: &MemoryError) -> String {
    format!("[ERROR] {}. Enter help to learn more.", err)
}

/// Render a reply as output lines
pub fn render_reply(reply: &Reply) -> Vec<String> {
    match reply {
        Reply::Success(message) => vec![format!("[SUCCESS] {}", message)],
        Reply::Notice(message) => vec![message.clone()],
        Reply::Blocks(blocks) => render_blocks(blocks),
        Reply::Bytes(bytes) => render_bytes(bytes),
        Reply::Pointers(pointers) => render_pointers(pointers),
        Reply::Stats(stats) => render_stats(stats),
        Reply::Help(entries) => {
            let mut lines = Vec::new();
            for entry in entries {
                lines.push(format!("Command Name : {}", entry.name));
                lines.push(format!("Command Description : {}", entry.description));
                lines.push(format!("Usage : {}", entry.usage));
                lines.push(format!("Amount of arguments : {}", entry.arity));
                lines.push(format!("Management type : {}", entry.category));
                lines.push("-".repeat(60));
            }
            lines
        }
        Reply::ConfirmOverwrite { name } => vec![format!(
            "[WARNING] This will overwrite the previous {} pointer. This action is irreversible. Are you sure?",
            name
        )],
        Reply::Exit => vec!["Thank you for using Bytethon. Exiting...".to_string()],
    }
}

pub fn render_blocks(blocks: &[BlockInfo]) -> Vec<String> {
    let mut lines = vec!["Here is the metadata of the blocks in the memory".to_string()];
    for block in blocks {
        lines.push(String::new());
        lines.push(format!("Block number: {}", block.index + 1));
        lines.push(format!(" - Size: {}", block.size));
        lines.push(format!(" - Free: {}", yes_no(block.free)));
        lines.push(format!(" - Initialized: {}", yes_no(block.initialized)));
        lines.push(format!(" - Start in bytes array: {}", block.start_index));
    }
    lines
}

/// Bytes as rows of 16 cells, followed by the legend
pub fn render_bytes(bytes: &[ByteView]) -> Vec<String> {
    let mut lines: Vec<String> = bytes
        .chunks(16)
        .enumerate()
        .map(|(row, chunk)| {
            let cells: Vec<String> = chunk.iter().map(|&b| byte_symbol(b)).collect();
            format!("{:04X}: {}", row * 16, cells.join(" "))
        })
        .collect();
    lines.push(String::new());
    lines.push("Legend: __ free | ** uninitialized (but not free) | XX used (hex value)".to_string());
    lines
}

pub fn render_pointers(pointers: &[(String, Pointer)]) -> Vec<String> {
    if pointers.is_empty() {
        return vec!["(no pointers declared)".to_string()];
    }
    pointers
        .iter()
        .map(|(name, ptr)| {
            if ptr.is_bound() {
                format!("{} -> {}", name, ptr.start_index)
            } else {
                format!("{} -> (unbound)", name)
            }
        })
        .collect()
}

pub fn render_stats(stats: &MemoryStats) -> Vec<String> {
    vec![
        format!("Memory size: {} bytes", stats.size),
        format!("Blocks: {} (capacity {})", stats.blocks, stats.capacity),
        format!("Used: {} bytes, free: {} bytes", stats.used_bytes, stats.free_bytes),
        format!("Largest free block: {} bytes", stats.largest_free),
        format!(
            "Declared pointers: {} in {} buckets (longest chain {})",
            stats.pointers, stats.pointer_buckets, stats.longest_chain
        ),
    ]
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
