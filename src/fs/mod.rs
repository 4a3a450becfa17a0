use bitflags::bitflags;

use crate::{name, result::ResultCode, ENTRY_NAME_MAX};

#[cfg(test)]
pub(crate) mod mock;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Attributes: u8 {
        const READ_ONLY = 0x01;
        const HIDDEN = 0x02;
        const SYSTEM = 0x04;
        const DIRECTORY = 0x10;
        const ARCHIVE = 0x20;
    }
}

impl Attributes {
    pub const LABELS: [(Attributes, &'static str); 5] = [
        (Attributes::READ_ONLY, "Read-only"),
        (Attributes::HIDDEN, "Hidden"),
        (Attributes::SYSTEM, "System"),
        (Attributes::ARCHIVE, "Archive"),
        (Attributes::DIRECTORY, "Directory"),
    ];

    pub fn is_read_only(self) -> bool {
        self.contains(Attributes::READ_ONLY)
    }

    pub fn is_hidden(self) -> bool {
        self.contains(Attributes::HIDDEN)
    }

    pub fn is_system(self) -> bool {
        self.contains(Attributes::SYSTEM)
    }

    pub fn is_archive(self) -> bool {
        self.contains(Attributes::ARCHIVE)
    }

    pub fn is_directory(self) -> bool {
        self.contains(Attributes::DIRECTORY)
    }

    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        Self::LABELS
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, label)| label)
    }
}

/// One directory record as handed out by the driver. The driver may reuse
/// the buffer on the next read, so it must be rendered before then.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: [u8; ENTRY_NAME_MAX],
    pub size: u32,
    pub attributes: Attributes,
    pub date: u16,
    pub time: u16,
}

impl DirectoryEntry {
    pub const EMPTY: Self = Self {
        name: [0; ENTRY_NAME_MAX],
        size: 0,
        attributes: Attributes::empty(),
        date: 0,
        time: 0,
    };

    pub fn new(name: &[u8], size: u32, attributes: Attributes, date: u16, time: u16) -> Self {
        let mut entry = Self {
            size,
            attributes,
            date,
            time,
            ..Self::EMPTY
        };
        entry.set_name(name);
        entry
    }

    pub fn set_name(&mut self, name: &[u8]) {
        self.name = [0; ENTRY_NAME_MAX];
        let len = name.len().min(ENTRY_NAME_MAX - 1);
        self.name[..len].copy_from_slice(&name[..len]);
    }

    pub fn name(&self) -> &[u8] {
        name::trim_nul(&self.name)
    }

    pub fn is_end(&self) -> bool {
        self.name[0] == 0
    }

    pub fn is_dir(&self) -> bool {
        self.attributes.is_directory()
    }

    pub fn is_dot(&self) -> bool {
        matches!(self.name(), b"." | b"..")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeSpace {
    pub free_clusters: u32,
    pub sectors_per_cluster: u16,
}

impl FreeSpace {
    pub fn bytes(self, sector_size: u32) -> u64 {
        self.free_clusters as u64 * self.sectors_per_cluster as u64 * sector_size as u64
    }
}

pub trait FatFs {
    type Dir;

    const SECTOR_SIZE: u32 = 512;

    fn open_dir(&mut self, path: &str) -> Result<Self::Dir, ResultCode>;

    /// Fills `entry` with the next record; an empty name marks the end.
    fn read_dir(&mut self, dir: &mut Self::Dir, entry: &mut DirectoryEntry)
        -> Result<(), ResultCode>;

    fn close_dir(&mut self, dir: Self::Dir);

    fn stat(&mut self, path: &str) -> Result<DirectoryEntry, ResultCode>;

    fn free_space(&mut self, volume: &str) -> Result<FreeSpace, ResultCode>;
}
