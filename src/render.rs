use core::fmt::{self, Write};

use crate::{fs::DirectoryEntry, name};

pub const DIR_MARKER: &str = "<DIR>";

pub fn render_entry<W: Write>(out: &mut W, entry: &DirectoryEntry) -> fmt::Result {
    name::write_name(out, entry.name())?;
    if entry.is_dir() {
        write!(out, "{}\r\n", DIR_MARKER)
    } else {
        write!(out, "{}\r\n", entry.size)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fs::Attributes;

    // Accepts `limit` bytes, then rejects every write and counts the attempts.
    pub(crate) struct LimitedSink {
        pub(crate) text: String,
        limit: usize,
        pub(crate) rejected: usize,
    }

    impl LimitedSink {
        pub(crate) fn new(limit: usize) -> Self {
            Self {
                text: String::new(),
                limit,
                rejected: 0,
            }
        }
    }

    impl Write for LimitedSink {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if self.text.len() + s.len() > self.limit {
                self.rejected += 1;
                return Err(fmt::Error);
            }
            self.text.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn file_line_carries_size() {
        let mut out = String::new();
        let entry = DirectoryEntry::new(b"boot.ini", 1234, Attributes::ARCHIVE, 0, 0);
        render_entry(&mut out, &entry).unwrap();
        assert_eq!(out, "BOOT     INI  1234\r\n");
    }

    #[test]
    fn directory_line_carries_marker() {
        let mut out = String::new();
        let entry = DirectoryEntry::new(b"games", 0, Attributes::DIRECTORY, 0, 0);
        render_entry(&mut out, &entry).unwrap();
        assert_eq!(out, "GAMES         <DIR>\r\n");
    }

    #[test]
    fn failing_sink_stops_the_line() {
        let entry = DirectoryEntry::new(b"boot.ini", 1234, Attributes::ARCHIVE, 0, 0);
        let mut sink = LimitedSink::new(4);

        assert_eq!(render_entry(&mut sink, &entry), Err(fmt::Error));
        assert_eq!(sink.text, "BOOT");
        assert_eq!(sink.rejected, 1);
    }
}
