use core::fmt::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultCode {
    Ok,
    DiskErr,
    IntErr,
    NotReady,
    NoFile,
    NoPath,
    InvalidName,
    Denied,
    Exist,
    InvalidObject,
    WriteProtected,
    InvalidDrive,
    NotEnabled,
    NoFilesystem,
    MkfsAborted,
    NotEnoughCore,
    InvalidParameter,
    Unknown(u8),
}

impl ResultCode {
    pub const ALL: [ResultCode; 17] = [
        ResultCode::Ok,
        ResultCode::DiskErr,
        ResultCode::IntErr,
        ResultCode::NotReady,
        ResultCode::NoFile,
        ResultCode::NoPath,
        ResultCode::InvalidName,
        ResultCode::Denied,
        ResultCode::Exist,
        ResultCode::InvalidObject,
        ResultCode::WriteProtected,
        ResultCode::InvalidDrive,
        ResultCode::NotEnabled,
        ResultCode::NoFilesystem,
        ResultCode::MkfsAborted,
        ResultCode::NotEnoughCore,
        ResultCode::InvalidParameter,
    ];

    pub fn from_raw(raw: u8) -> Self {
        Self::ALL
            .get(raw as usize)
            .copied()
            .unwrap_or(ResultCode::Unknown(raw))
    }

    pub fn raw(self) -> u8 {
        match self {
            ResultCode::Unknown(raw) => raw,
            known => Self::ALL
                .iter()
                .position(|code| *code == known)
                .map(|idx| idx as u8)
                .unwrap_or(u8::MAX),
        }
    }

    pub fn is_ok(self) -> bool {
        self == ResultCode::Ok
    }

    pub fn describe(self) -> &'static str {
        match self {
            ResultCode::Ok => "Succeeded",
            ResultCode::DiskErr => "Low-level disk error",
            ResultCode::IntErr => "Internal error",
            ResultCode::NotReady => "Drive not ready",
            ResultCode::NoFile => "File not found",
            ResultCode::NoPath => "Path not found",
            ResultCode::InvalidName => "Invalid path format",
            ResultCode::Denied => "Directory full",
            ResultCode::Exist => "File exists",
            ResultCode::InvalidObject => "Invalid object",
            ResultCode::WriteProtected => "Disk is write protected",
            ResultCode::InvalidDrive => "Invalid drive",
            ResultCode::NotEnabled => "The volume has no work area",
            ResultCode::NoFilesystem => "Not a FAT file system",
            ResultCode::MkfsAborted => "Format aborted due to error",
            ResultCode::NotEnoughCore => "Out of memory",
            ResultCode::InvalidParameter => "Invalid parameter",
            ResultCode::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

pub fn report<W: Write>(out: &mut W, code: ResultCode) {
    log::warn!("fs: error code={} text={}", code.raw(), code.describe());
    let _ = write!(out, "Error #{}: {}\r\n", code.raw(), code.describe());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_member_has_distinct_non_empty_text() {
        let mut seen: Vec<&str> = Vec::new();
        for code in ResultCode::ALL {
            let text = code.describe();
            assert!(!text.is_empty());
            assert_ne!(text, "Unknown", "{code:?} fell through to the fallback");
            assert!(!seen.contains(&text), "duplicate text for {code:?}");
            seen.push(text);
        }
    }

    #[test]
    fn raw_values_follow_fresult_numbering() {
        assert_eq!(ResultCode::Ok.raw(), 0);
        assert_eq!(ResultCode::DiskErr.raw(), 1);
        assert_eq!(ResultCode::NoFile.raw(), 4);
        assert_eq!(ResultCode::NotEnoughCore.raw(), 15);
        assert_eq!(ResultCode::InvalidParameter.raw(), 16);
        for code in ResultCode::ALL {
            assert_eq!(ResultCode::from_raw(code.raw()), code);
        }
    }

    #[test]
    fn out_of_range_codes_translate_to_unknown() {
        let code = ResultCode::from_raw(17);
        assert_eq!(code, ResultCode::Unknown(17));
        assert_eq!(code.describe(), "Unknown");
        assert_eq!(code.raw(), 17);
    }

    #[test]
    fn report_formats_console_line() {
        let mut out = String::new();
        report(&mut out, ResultCode::NoPath);
        assert_eq!(out, "Error #5: Path not found\r\n");
    }
}
