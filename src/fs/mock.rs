use std::collections::{HashMap, HashSet};

use super::{Attributes, DirectoryEntry, FatFs, FreeSpace};
use crate::result::ResultCode;

pub(crate) struct MockDir {
    path: String,
    pos: usize,
}

#[derive(Default)]
pub(crate) struct MockFs {
    dirs: HashMap<String, Vec<DirectoryEntry>>,
    stats: HashMap<String, DirectoryEntry>,
    open_failures: HashMap<String, ResultCode>,
    read_failures: HashMap<(String, usize), ResultCode>,
    free: Option<FreeSpace>,
    free_failure: Option<ResultCode>,
    open_handles: HashSet<String>,
    pub(crate) opened: Vec<String>,
    pub(crate) closed: usize,
}

impl MockFs {
    pub(crate) fn new() -> Self {
        Self {
            free: Some(FreeSpace {
                free_clusters: 100,
                sectors_per_cluster: 2,
            }),
            ..Self::default()
        }
    }

    pub(crate) fn dir(mut self, path: &str) -> Self {
        self.dirs.entry(path.to_string()).or_default();
        self
    }

    pub(crate) fn file(mut self, dir: &str, name: &str, size: u32) -> Self {
        self.dirs
            .entry(dir.to_string())
            .or_default()
            .push(DirectoryEntry::new(name.as_bytes(), size, Attributes::ARCHIVE, 0, 0));
        self
    }

    pub(crate) fn subdir(mut self, dir: &str, name: &str) -> Self {
        self.dirs
            .entry(dir.to_string())
            .or_default()
            .push(DirectoryEntry::new(name.as_bytes(), 0, Attributes::DIRECTORY, 0, 0));
        let child = if dir.ends_with('/') {
            format!("{dir}{name}")
        } else {
            format!("{dir}/{name}")
        };
        self.dirs.entry(child).or_default();
        self
    }

    pub(crate) fn entry(mut self, dir: &str, entry: DirectoryEntry) -> Self {
        self.dirs.entry(dir.to_string()).or_default().push(entry);
        self
    }

    pub(crate) fn stat_entry(mut self, path: &str, entry: DirectoryEntry) -> Self {
        self.stats.insert(path.to_string(), entry);
        self
    }

    pub(crate) fn fail_open(mut self, path: &str, code: ResultCode) -> Self {
        self.open_failures.insert(path.to_string(), code);
        self
    }

    pub(crate) fn fail_read(mut self, path: &str, index: usize, code: ResultCode) -> Self {
        self.read_failures.insert((path.to_string(), index), code);
        self
    }

    pub(crate) fn free_space_result(mut self, result: Result<FreeSpace, ResultCode>) -> Self {
        match result {
            Ok(free) => {
                self.free = Some(free);
                self.free_failure = None;
            }
            Err(code) => self.free_failure = Some(code),
        }
        self
    }

    pub(crate) fn open_handle_count(&self) -> usize {
        self.open_handles.len()
    }
}

impl FatFs for MockFs {
    type Dir = MockDir;

    fn open_dir(&mut self, path: &str) -> Result<MockDir, ResultCode> {
        if let Some(code) = self.open_failures.get(path) {
            return Err(*code);
        }
        if !self.dirs.contains_key(path) {
            return Err(ResultCode::NoPath);
        }
        self.opened.push(path.to_string());
        self.open_handles.insert(path.to_string());
        Ok(MockDir {
            path: path.to_string(),
            pos: 0,
        })
    }

    fn read_dir(&mut self, dir: &mut MockDir, entry: &mut DirectoryEntry) -> Result<(), ResultCode> {
        if let Some(code) = self.read_failures.get(&(dir.path.clone(), dir.pos)) {
            return Err(*code);
        }
        let entries = self.dirs.get(&dir.path).ok_or(ResultCode::InvalidObject)?;
        *entry = entries.get(dir.pos).copied().unwrap_or(DirectoryEntry::EMPTY);
        dir.pos += 1;
        Ok(())
    }

    fn close_dir(&mut self, dir: MockDir) {
        self.open_handles.remove(&dir.path);
        self.closed += 1;
    }

    fn stat(&mut self, path: &str) -> Result<DirectoryEntry, ResultCode> {
        self.stats.get(path).copied().ok_or(ResultCode::NoFile)
    }

    fn free_space(&mut self, _volume: &str) -> Result<FreeSpace, ResultCode> {
        if let Some(code) = self.free_failure {
            return Err(code);
        }
        self.free.ok_or(ResultCode::NotEnabled)
    }
}
