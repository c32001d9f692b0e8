use bytes::BufMut;

use crate::codec::EncodeError;

/// Integer signess in postgres docs is awful.
pub trait UsizeExt {
    /// Length is `usize` in rust, while hstore wants `i32`,
    /// this will error when overflow instead of wrapping.
    fn to_i32(self) -> Result<i32, EncodeError>;
}

/// Hstore string operation in [`BufMut`]
pub trait BufMutExt {
    /// Write `i32` length prefix followed by the string bytes.
    fn put_len_str(&mut self, string: &str) -> Result<(), EncodeError>;

    /// Write string in double quotes, escaping `\` and `"`.
    fn put_quoted(&mut self, string: &str);
}

/// Helper trait to [`Display`][std::fmt::Display] bytes.
pub trait FmtExt {
    /// Lossy [`Display`][std::fmt::Display] bytes.
    fn lossy(&self) -> LossyFmt<'_>;
}

/// Lossy [`Display`][std::fmt::Display] implementation for bytes.
pub struct LossyFmt<'a>(pub &'a [u8]);

/// Display a single byte as `'c' (0x63)`.
pub struct ByteFmt(pub u8);

impl UsizeExt for usize {
    fn to_i32(self) -> Result<i32, EncodeError> {
        self.try_into().map_err(|_|EncodeError::TooLarge(self))
    }
}

impl<B: BufMut> BufMutExt for B {
    fn put_len_str(&mut self, string: &str) -> Result<(), EncodeError> {
        self.put_i32(string.len().to_i32()?);
        self.put(string.as_bytes());
        Ok(())
    }

    fn put_quoted(&mut self, string: &str) {
        self.put_u8(b'"');
        let mut read = string.as_bytes();
        while let Some(i) = memchr::memchr2(b'\\', b'"', read) {
            self.put(&read[..i]);
            self.put_u8(b'\\');
            self.put_u8(read[i]);
            read = &read[i + 1..];
        }
        self.put(read);
        self.put_u8(b'"');
    }
}

impl FmtExt for [u8] {
    fn lossy(&self) -> LossyFmt<'_> {
        LossyFmt(self)
    }
}

impl std::fmt::Display for LossyFmt<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &b in self.0 {
            if b.is_ascii_graphic() || b.is_ascii_whitespace() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:x}")?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for LossyFmt<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "b\"{self}\"")
    }
}

impl std::fmt::Display for ByteFmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let b = self.0;
        if b.is_ascii_graphic() || b == b' ' {
            write!(f, "'{}' ({b:#04x})", b as char)
        } else {
            write!(f, "({b:#04x})")
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn quote_escapes() {
        let mut buf = Vec::<u8>::new();
        buf.put_quoted(r#"a\"b"#);
        assert_eq!(buf, br#""a\\\"b""#);

        buf.clear();
        buf.put_quoted("plain");
        assert_eq!(buf, br#""plain""#);
    }

    #[test]
    fn len_prefixed() {
        let mut buf = Vec::<u8>::new();
        buf.put_len_str("abc").unwrap();
        assert_eq!(buf, b"\0\0\0\x03abc");
    }

    #[test]
    fn byte_fmt() {
        assert_eq!(ByteFmt(b'=').to_string(), "'=' (0x3d)");
        assert_eq!(ByteFmt(0).to_string(), "(0x00)");
    }
}
