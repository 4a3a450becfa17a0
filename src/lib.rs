#![cfg_attr(not(test), no_std)]

pub mod command;
pub mod console;
pub mod fs;
pub mod name;
pub mod render;
pub mod result;
pub mod status;
pub mod timestamp;
pub mod walker;

pub use command::Command;
pub use console::{Console, ConsoleConfig, Drive};
pub use fs::{Attributes, DirectoryEntry, FatFs, FreeSpace};
pub use result::ResultCode;
pub use timestamp::CalendarTimestamp;
pub use walker::{DirectoryWalker, TraversalAccumulator};

pub const PATH_MAX: usize = 64;
pub const MAX_DEPTH: usize = 8;
pub const ENTRY_NAME_MAX: usize = 32;
