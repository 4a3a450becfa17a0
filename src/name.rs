use core::fmt::{self, Write};

pub const BASE_COLUMN: usize = 9;
pub const NAME_COLUMN: usize = 14;

pub fn trim_nul(raw: &[u8]) -> &[u8] {
    let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
    &raw[..end]
}

pub fn split_name(raw: &[u8]) -> (&[u8], Option<&[u8]>) {
    let name = trim_nul(raw);
    match name.iter().position(|b| *b == b'.') {
        Some(dot) => (&name[..dot], Some(&name[dot + 1..])),
        None => (name, None),
    }
}

fn display_byte(byte: u8) -> char {
    if byte.is_ascii() {
        byte.to_ascii_uppercase() as char
    } else {
        '?'
    }
}

/// Writes the base/extension columns and returns the column reached.
/// Over-long parts are written in full and push the column past 14.
pub fn write_name<W: Write>(out: &mut W, raw: &[u8]) -> Result<usize, fmt::Error> {
    let (base, ext) = split_name(raw);
    let mut col = 0usize;
    for byte in base {
        out.write_char(display_byte(*byte))?;
        col += 1;
    }
    while col < BASE_COLUMN {
        out.write_char(' ')?;
        col += 1;
    }
    if let Some(ext) = ext {
        for byte in ext {
            out.write_char(display_byte(*byte))?;
            col += 1;
        }
    }
    while col < NAME_COLUMN {
        out.write_char(' ')?;
        col += 1;
    }
    Ok(col)
}

pub struct NameColumns<'a>(pub &'a [u8]);

impl fmt::Display for NameColumns<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_name(f, self.0).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(raw: &[u8]) -> String {
        NameColumns(raw).to_string()
    }

    #[test]
    fn formats_eight_three_name() {
        let out = columns(b"readme.txt");
        assert_eq!(out, "README   TXT  ");
        assert_eq!(&out[..BASE_COLUMN], "README   ");
        assert_eq!(out.len(), NAME_COLUMN);
    }

    #[test]
    fn name_without_extension_pads_to_full_width() {
        assert_eq!(columns(b"A"), "A             ");
    }

    #[test]
    fn stops_at_nul_terminator() {
        assert_eq!(columns(b"AB.C\0garbage"), "AB       C    ");
    }

    #[test]
    fn long_base_overflows_without_truncation() {
        let out = columns(b"verylongname.text");
        assert_eq!(out, "VERYLONGNAMETEXT");
        assert!(out.len() > NAME_COLUMN);
    }

    #[test]
    fn splits_only_at_first_dot() {
        let (base, ext) = split_name(b"archive.tar.gz");
        assert_eq!(base, b"archive");
        assert_eq!(ext, Some(&b"tar.gz"[..]));
        assert_eq!(columns(b"archive.tar.gz"), "ARCHIVE  TAR.GZ");
    }

    #[test]
    fn trailing_dot_yields_empty_extension() {
        assert_eq!(split_name(b"NAME."), (&b"NAME"[..], Some(&b""[..])));
        assert_eq!(columns(b"NAME."), "NAME          ");
    }

    #[test]
    fn non_ascii_bytes_render_as_placeholder() {
        assert_eq!(columns(b"caf\xe9.txt"), "CAF?     TXT  ");
    }

    #[test]
    fn write_name_reports_reached_column() {
        let mut out = String::new();
        assert_eq!(write_name(&mut out, b"X.Y").unwrap(), NAME_COLUMN);
        let mut out = String::new();
        assert_eq!(write_name(&mut out, b"ABCDEFGHIJ.KLMNO").unwrap(), 15);
    }
}
