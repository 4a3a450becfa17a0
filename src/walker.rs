use core::fmt::Write;

use heapless::{String, Vec};

use crate::{
    fs::{DirectoryEntry, FatFs},
    render::render_entry,
    result::{report, ResultCode},
    MAX_DEPTH, PATH_MAX,
};

pub type PathBuffer = String<PATH_MAX>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalAccumulator {
    pub entries: u32,
    pub bytes: u64,
}

impl TraversalAccumulator {
    pub const fn new() -> Self {
        Self {
            entries: 0,
            bytes: 0,
        }
    }

    pub fn record(&mut self, entry: &DirectoryEntry) {
        self.entries = self.entries.saturating_add(1);
        if !entry.is_dir() {
            self.bytes = self.bytes.saturating_add(entry.size as u64);
        }
    }
}

pub fn join_path(parent: &str, name: &[u8]) -> Result<PathBuffer, ResultCode> {
    let name = core::str::from_utf8(name).map_err(|_| ResultCode::InvalidName)?;
    let mut path = PathBuffer::new();
    path.push_str(parent).map_err(|_| ResultCode::InvalidName)?;
    if !parent.is_empty() && !parent.ends_with('/') && !parent.ends_with('\\') {
        path.push('/').map_err(|_| ResultCode::InvalidName)?;
    }
    path.push_str(name).map_err(|_| ResultCode::InvalidName)?;
    Ok(path)
}

struct Frame<D> {
    dir: D,
    path: PathBuffer,
}

enum Step {
    Done,
    Failed(ResultCode),
    Descend(Result<PathBuffer, ResultCode>),
}

pub struct DirectoryWalker<'a, F: FatFs, W: Write> {
    fs: &'a mut F,
    out: &'a mut W,
}

impl<'a, F: FatFs, W: Write> DirectoryWalker<'a, F, W> {
    pub fn new(fs: &'a mut F, out: &'a mut W) -> Self {
        Self { fs, out }
    }

    pub fn list(
        &mut self,
        path: &str,
        volume: &str,
        acc: &mut TraversalAccumulator,
    ) -> Result<(), ResultCode> {
        let mut dir = match self.fs.open_dir(path) {
            Ok(dir) => dir,
            Err(code) => {
                report(self.out, code);
                return Err(code);
            }
        };

        let listed_before = acc.entries;
        let mut entry = DirectoryEntry::EMPTY;
        let status = loop {
            if let Err(code) = self.fs.read_dir(&mut dir, &mut entry) {
                break Err(code);
            }
            if entry.is_end() {
                break Ok(());
            }
            if render_entry(self.out, &entry).is_ok() {
                acc.record(&entry);
            }
        };
        self.fs.close_dir(dir);

        if let Err(code) = status {
            report(self.out, code);
            return Err(code);
        }
        if acc.entries == listed_before {
            let _ = self.out.write_str("No files.\r\n");
        }
        self.report_free_space(volume).map(|_| ())
    }

    /// Lists every file below `path`, depth-first in directory-read order.
    ///
    /// A failure inside a subdirectory is reported and ends that directory
    /// only; the walk resumes with its siblings. `Err` is returned only when
    /// `path` itself could not be listed. Entries rendered before any failure
    /// stay in `acc`.
    pub fn list_full(&mut self, path: &str, acc: &mut TraversalAccumulator) -> Result<(), ResultCode> {
        let mut stack: Vec<Frame<F::Dir>, MAX_DEPTH> = Vec::new();

        let root = PathBuffer::try_from(path).map_err(|_| ResultCode::InvalidName);
        let root = match root.and_then(|path| self.open_frame(path)) {
            Ok(frame) => frame,
            Err(code) => {
                report(self.out, code);
                return Err(code);
            }
        };
        self.push_frame(&mut stack, root)?;

        let mut entry = DirectoryEntry::EMPTY;
        while let Some(frame) = stack.last_mut() {
            let step = match self.fs.read_dir(&mut frame.dir, &mut entry) {
                Err(code) => Step::Failed(code),
                Ok(()) if entry.is_end() => Step::Done,
                Ok(()) if entry.is_dir() => {
                    if entry.is_dot() {
                        continue;
                    }
                    Step::Descend(join_path(&frame.path, entry.name()))
                }
                Ok(()) => {
                    if render_entry(self.out, &entry).is_ok() {
                        acc.record(&entry);
                    }
                    continue;
                }
            };

            match step {
                Step::Done => {
                    if let Some(frame) = stack.pop() {
                        self.fs.close_dir(frame.dir);
                    }
                }
                Step::Failed(code) => {
                    if let Some(frame) = stack.pop() {
                        log::debug!("fulldir: abort path={} code={}", frame.path, code.raw());
                        self.fs.close_dir(frame.dir);
                    }
                    report(self.out, code);
                    if stack.is_empty() {
                        return Err(code);
                    }
                }
                Step::Descend(Err(code)) => report(self.out, code),
                Step::Descend(Ok(child)) => match self.open_frame(child) {
                    Ok(frame) => {
                        let _ = self.push_frame(&mut stack, frame);
                    }
                    Err(code) => report(self.out, code),
                },
            }
        }
        Ok(())
    }

    pub fn report_usage(&mut self, acc: &TraversalAccumulator) {
        let _ = write!(self.out, "{} bytes used, {} files.\r\n", acc.bytes, acc.entries);
    }

    pub fn report_free_space(&mut self, volume: &str) -> Result<u64, ResultCode> {
        match self.fs.free_space(volume) {
            Ok(free) => {
                let bytes = free.bytes(F::SECTOR_SIZE);
                let _ = write!(self.out, "{} bytes free.\r\n", bytes);
                Ok(bytes)
            }
            Err(code) => {
                report(self.out, code);
                Err(code)
            }
        }
    }

    fn open_frame(&mut self, path: PathBuffer) -> Result<Frame<F::Dir>, ResultCode> {
        log::debug!("fulldir: open path={}", path);
        let dir = self.fs.open_dir(&path)?;
        Ok(Frame { dir, path })
    }

    fn push_frame(
        &mut self,
        stack: &mut Vec<Frame<F::Dir>, MAX_DEPTH>,
        frame: Frame<F::Dir>,
    ) -> Result<(), ResultCode> {
        if let Err(frame) = stack.push(frame) {
            self.fs.close_dir(frame.dir);
            report(self.out, ResultCode::NotEnoughCore);
            return Err(ResultCode::NotEnoughCore);
        }
        Ok(())
    }
}
