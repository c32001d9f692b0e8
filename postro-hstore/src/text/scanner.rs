//! Hstore text tokens.
//!
//! ```text
//! hstore := (pair (", " pair)*)?
//! pair   := quoted "=>" (quoted | "NULL")
//! quoted := '"' ('\\' ('\\' | '"') | plain)* '"'
//! ```
use super::{Expected, ParseError};

/// Content of a double quoted string, without the quotes.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Quoted<'a> {
    /// Raw content, escapes are not yet removed.
    pub raw: &'a str,
    /// `true` if `raw` contains backslash escapes.
    pub escaped: bool,
}

/// Left to right hstore tokenizer.
pub(crate) struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    /// Position of the next backslash at or after `pos`.
    next_backslash: Option<usize>,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            next_backslash: memchr::memchr(b'\\', src.as_bytes()),
        }
    }

    pub fn is_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn expect_byte(&mut self, expected: u8, on_end: Expected) -> Result<(), ParseError> {
        let Some(&found) = self.bytes().get(self.pos) else {
            return Err(ParseError::UnexpectedEnd { expected: on_end });
        };
        if found != expected {
            return Err(ParseError::Unexpected { expected, found, pos: self.pos });
        }
        self.pos += 1;
        Ok(())
    }

    /// Consume exact `seq`, length is checked before any byte.
    fn expect_seq(&mut self, seq: &[u8], on_end: Expected) -> Result<(), ParseError> {
        let Some(read) = self.bytes().get(self.pos..self.pos + seq.len()) else {
            return Err(ParseError::UnexpectedEnd { expected: on_end });
        };
        if let Some(i) = read.iter().zip(seq).position(|(found, expected)|found != expected) {
            return Err(ParseError::Unexpected {
                expected: seq[i],
                found: read[i],
                pos: self.pos + i,
            });
        }
        self.pos += seq.len();
        Ok(())
    }

    /// Consume `, `.
    pub fn pair_separator(&mut self) -> Result<(), ParseError> {
        self.expect_seq(b", ", Expected::PairSeparator)
    }

    /// Consume `=>`.
    pub fn kv_separator(&mut self) -> Result<(), ParseError> {
        self.expect_seq(b"=>", Expected::KvSeparator)
    }

    /// Consume a double quoted key.
    pub fn key(&mut self) -> Result<Quoted<'a>, ParseError> {
        self.expect_byte(b'"', Expected::Quote)?;
        self.quoted_body()
    }

    /// Consume a double quoted value, or `NULL` which returns [`None`].
    pub fn value(&mut self) -> Result<Option<Quoted<'a>>, ParseError> {
        match self.bytes().get(self.pos) {
            None => Err(ParseError::UnexpectedEnd { expected: Expected::Value }),
            Some(b'N') => {
                self.expect_seq(b"NULL", Expected::Null)?;
                Ok(None)
            },
            Some(b'"') => {
                self.pos += 1;
                self.quoted_body().map(Some)
            },
            Some(&found) => Err(ParseError::Unexpected { expected: b'"', found, pos: self.pos }),
        }
    }

    /// Consume until closing quote, the opening quote must be consumed already.
    fn quoted_body(&mut self) -> Result<Quoted<'a>, ParseError> {
        let start = self.pos;
        let Some(quote) = memchr::memchr(b'"', &self.bytes()[start..]) else {
            return Err(ParseError::UnterminatedQuote);
        };
        let quote = start + quote;

        let backslash = match self.next_backslash {
            Some(backslash) if backslash < quote => backslash,
            _ => {
                self.pos = quote + 1;
                return Ok(Quoted { raw: &self.src[start..quote], escaped: false });
            },
        };

        let end = self.escaped_end(backslash)?;
        self.pos = end + 1;
        self.next_backslash = memchr::memchr(b'\\', &self.bytes()[self.pos..]).map(|i|i + self.pos);

        Ok(Quoted { raw: &self.src[start..end], escaped: true })
    }

    /// Returns position of the closing quote, validating escapes starting at `backslash`.
    fn escaped_end(&self, backslash: usize) -> Result<usize, ParseError> {
        let bytes = self.bytes();
        let mut i = backslash;
        loop {
            let Some(offset) = memchr::memchr2(b'"', b'\\', &bytes[i..]) else {
                return Err(ParseError::UnterminatedQuote);
            };
            i += offset;
            if bytes[i] == b'"' {
                return Ok(i);
            }
            match bytes.get(i + 1) {
                Some(b'\\' | b'"') => i += 2,
                Some(&found) => return Err(ParseError::InvalidEscape { found, pos: i + 1 }),
                None => return Err(ParseError::UnterminatedQuote),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn plain(raw: &str) -> Quoted<'_> {
        Quoted { raw, escaped: false }
    }

    #[test]
    fn scan_pair() {
        let mut s = Scanner::new(r#""a"=>"b", "c"=>NULL"#);
        assert_eq!(s.key().unwrap(), plain("a"));
        s.kv_separator().unwrap();
        assert_eq!(s.value().unwrap(), Some(plain("b")));
        s.pair_separator().unwrap();
        assert_eq!(s.key().unwrap(), plain("c"));
        s.kv_separator().unwrap();
        assert_eq!(s.value().unwrap(), None);
        assert!(s.is_end());
    }

    #[test]
    fn scan_escaped() {
        let mut s = Scanner::new(r#""a\"b"=>"plain", "x\\y"=>"z""#);
        assert_eq!(s.key().unwrap(), Quoted { raw: r#"a\"b"#, escaped: true });
        s.kv_separator().unwrap();
        // backslash of the next pair must not affect this string
        assert_eq!(s.value().unwrap(), Some(plain("plain")));
        s.pair_separator().unwrap();
        assert_eq!(s.key().unwrap(), Quoted { raw: r"x\\y", escaped: true });
        s.kv_separator().unwrap();
        assert_eq!(s.value().unwrap(), Some(plain("z")));
        assert!(s.is_end());
    }

    #[test]
    fn unterminated() {
        assert_eq!(Scanner::new(r#""abc"#).key(), Err(ParseError::UnterminatedQuote));
        assert_eq!(Scanner::new(r#""ab\"#).key(), Err(ParseError::UnterminatedQuote));
        assert_eq!(Scanner::new(r#""ab\""#).key(), Err(ParseError::UnterminatedQuote));
    }

    #[test]
    fn invalid_escape() {
        assert_eq!(
            Scanner::new(r#""a\nb""#).key(),
            Err(ParseError::InvalidEscape { found: b'n', pos: 3 }),
        );
    }

    #[test]
    fn truncated_null() {
        let mut s = Scanner::new("NUL");
        assert_eq!(s.value(), Err(ParseError::UnexpectedEnd { expected: Expected::Null }));

        let mut s = Scanner::new("NULX");
        assert_eq!(
            s.value(),
            Err(ParseError::Unexpected { expected: b'L', found: b'X', pos: 3 }),
        );

        // lowercase is not NULL
        let mut s = Scanner::new("null");
        assert_eq!(
            s.value(),
            Err(ParseError::Unexpected { expected: b'"', found: b'n', pos: 0 }),
        );
    }

    #[test]
    fn separators() {
        let mut s = Scanner::new("=");
        assert_eq!(
            s.kv_separator(),
            Err(ParseError::UnexpectedEnd { expected: Expected::KvSeparator }),
        );

        let mut s = Scanner::new(",x");
        assert_eq!(
            s.pair_separator(),
            Err(ParseError::Unexpected { expected: b' ', found: b'x', pos: 1 }),
        );
    }
}
