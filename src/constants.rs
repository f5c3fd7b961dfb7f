// Constants for the allocator simulator

/// Arena size used when `--size` is not given
pub const DEFAULT_ARENA_SIZE: usize = 64;

/// Largest arena the simulator accepts (one block record per byte)
pub const MAX_ARENA_SIZE: usize = 1 << 16;

/// Bucket count of the command table
pub const COMMAND_BUCKETS: usize = 100;

/// Bucket count of the named-pointer registry
pub const POINTER_BUCKETS: usize = 10;

/// Maximum number of whitespace-separated tokens in one command line,
/// including the command name
pub const MAX_ARGS: usize = 10;

/// Number of log lines kept in the capture ring
pub const LOG_CAPACITY: usize = 512;

pub const PROGRAM_NAME: &str = "Bytethon";
