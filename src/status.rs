use core::fmt::{self, Write};

use crate::{
    fs::{DirectoryEntry, FatFs},
    result::{report, ResultCode},
    timestamp::CalendarTimestamp,
};

pub fn report_status<F: FatFs, W: Write>(
    fs: &mut F,
    out: &mut W,
    path: &str,
) -> Result<DirectoryEntry, ResultCode> {
    let entry = match fs.stat(path) {
        Ok(entry) => entry,
        Err(code) => {
            report(out, code);
            return Err(code);
        }
    };

    if write_status(out, &entry).is_err() {
        log::warn!("status: console sink failed path={}", path);
    }
    Ok(entry)
}

fn write_status<W: Write>(out: &mut W, entry: &DirectoryEntry) -> fmt::Result {
    let modified = CalendarTimestamp::decode(entry.date, entry.time);
    write!(out, "Size: {}\r\n", entry.size)?;
    write!(out, "Last modified: {}\r\n", modified)?;
    out.write_str("Attributes:")?;
    for label in entry.attributes.labels() {
        write!(out, " {}", label)?;
    }
    out.write_str("\r\n")
}
