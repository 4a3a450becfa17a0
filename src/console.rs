use core::fmt::Write;

use crate::{
    command::{parse_command, Command},
    fs::FatFs,
    result::ResultCode,
    status::report_status,
    walker::{DirectoryWalker, TraversalAccumulator},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drive {
    A,
    B,
}

impl Drive {
    pub fn letter(self) -> char {
        match self {
            Drive::A => 'A',
            Drive::B => 'B',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub drive: Drive,
    pub root_path: &'static str,
    pub volume: &'static str,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            drive: Drive::A,
            root_path: "0:/",
            volume: "0:",
        }
    }
}

pub struct Console<F: FatFs> {
    fs: F,
    config: ConsoleConfig,
}

impl<F: FatFs> Console<F> {
    pub fn new(fs: F, config: ConsoleConfig) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn fs_mut(&mut self) -> &mut F {
        &mut self.fs
    }

    pub fn into_inner(self) -> F {
        self.fs
    }

    pub fn run_line<W: Write>(&mut self, out: &mut W, line: &[u8]) -> Option<Result<(), ResultCode>> {
        let echo = core::str::from_utf8(crate::command::trim_ascii_whitespace(line)).unwrap_or("");
        let _ = write!(out, "{}:>{}\r\n", self.config.drive.letter(), echo);

        let result = match parse_command(line) {
            Some(command) => Some(self.execute(out, &command)),
            None => {
                let _ = out.write_str("Unknown command.\r\n");
                None
            }
        };
        let _ = out.write_str("\r\n");
        result
    }

    pub fn execute<W: Write>(&mut self, out: &mut W, command: &Command) -> Result<(), ResultCode> {
        log::debug!("console: run verb={}", command.verb());
        match command {
            Command::Dir { path } => {
                let path = path.as_deref().unwrap_or(self.config.root_path);
                let mut acc = TraversalAccumulator::new();
                DirectoryWalker::new(&mut self.fs, out).list(path, self.config.volume, &mut acc)
            }
            Command::FullDir { path } => {
                let path = path.as_deref().unwrap_or(self.config.root_path);
                let mut acc = TraversalAccumulator::new();
                let mut walker = DirectoryWalker::new(&mut self.fs, out);
                walker.list_full(path, &mut acc)?;
                walker.report_usage(&acc);
                walker.report_free_space(self.config.volume).map(|_| ())
            }
            Command::Status { path } => report_status(&mut self.fs, out, path).map(|_| ()),
        }
    }
}
