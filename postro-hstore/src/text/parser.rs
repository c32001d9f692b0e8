use super::{ParseError, scanner::{Quoted, Scanner}};
use crate::{
    common::{ByteStr, verbose},
    hstore::{Hstore, HstoreStr},
};

/// Parse hstore text representation.
///
/// Strings without escapes are sliced from `src` without copying. Duplicate
/// keys are allowed, the last pair wins.
pub fn parse<S: HstoreStr>(src: &ByteStr) -> Result<Hstore<S>, ParseError> {
    // over-estimate, `>` is less likely to appear in content than `=` or `,`
    let estimate = memchr::memchr_iter(b'>', src.as_bytes()).count();
    let mut hstore = Hstore::with_capacity(estimate);
    let mut scanner = Scanner::new(src.as_str());
    let mut first = true;

    while !scanner.is_end() {
        if first {
            first = false;
        } else {
            scanner.pair_separator()?;
        }

        let key = scanner.key()?;
        scanner.kv_separator()?;
        let value = scanner.value()?;

        hstore.put(
            into_str(src, key),
            value.map(|value|into_str(src, value)),
        );
    }

    verbose!(pairs = hstore.len(), estimate, "hstore text parsed");

    Ok(hstore)
}

fn into_str<S: HstoreStr>(src: &ByteStr, quoted: Quoted) -> S {
    match quoted.escaped {
        true => S::from_owned(unescape(quoted.raw)),
        false => S::from_shared(src.inner(), quoted.raw),
    }
}

/// Remove backslash escapes, `raw` escapes must be already validated.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut read = raw;
    while let Some(i) = memchr::memchr(b'\\', read.as_bytes()) {
        out.push_str(&read[..i]);
        // escaped byte is either `\` or `"`
        out.push_str(&read[i + 1..i + 2]);
        read = &read[i + 2..];
    }
    out.push_str(read);
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{hstore::HstoreCompat, text::Expected};

    fn parse_compact(src: &'static str) -> Result<Hstore, ParseError> {
        parse(&ByteStr::from_static(src))
    }

    #[test]
    fn parse_pairs() {
        let h = parse_compact(r#""a"=>"100", "b"=>NULL, "c"=>"300""#).unwrap();
        assert_eq!(h.len(), 3);
        assert_eq!(h.get("a"), Some(Some("100")));
        assert_eq!(h.get("b"), Some(None));
        assert_eq!(h.get("c"), Some(Some("300")));
    }

    #[test]
    fn parse_empty() {
        let h = parse_compact("").unwrap();
        assert!(h.is_empty());
    }

    #[test]
    fn quoted_null_is_string() {
        let h = parse_compact(r#""k"=>"NULL""#).unwrap();
        assert_eq!(h.get("k"), Some(Some("NULL")));

        let h = parse_compact(r#""k"=>NULL"#).unwrap();
        assert_eq!(h.get("k"), Some(None));
    }

    #[test]
    fn duplicate_key_last_wins() {
        let h = parse_compact(r#""k"=>"1", "k"=>"2""#).unwrap();
        assert_eq!(h.len(), 1);
        assert_eq!(h.get("k"), Some(Some("2")));

        let h = parse_compact(r#""k"=>"1", "k"=>NULL"#).unwrap();
        assert_eq!(h.get("k"), Some(None));
    }

    #[test]
    fn unescape_content() {
        let h = parse(&ByteStr::from_static(r#""a\"b"=>"x\\y", "\\"=>"\"""#)).unwrap();
        let h: HstoreCompat = h;
        assert_eq!(h.get(r#"a"b"#), Some(Some(r"x\y")));
        assert_eq!(h.get(r"\"), Some(Some(r#"""#)));
    }

    #[test]
    fn shares_input_buffer() {
        let src = ByteStr::from_static(r#""key"=>"value""#);
        let h: Hstore = parse(&src).unwrap();
        let (key, value) = h.iter().next().unwrap();
        let range = src.as_bytes().as_ptr_range();
        assert!(range.contains(&key.as_ptr()));
        assert!(range.contains(&value.unwrap().as_ptr()));
    }

    #[test]
    fn unicode_content() {
        let h = parse_compact(r#""ключ"=>"значение", "🦀"=>"""#).unwrap();
        assert_eq!(h.get("ключ"), Some(Some("значение")));
        assert_eq!(h.get("🦀"), Some(Some("")));
    }

    #[test]
    fn malformed() {
        use ParseError::*;

        // unquoted key
        assert_eq!(
            parse_compact(r#"a=>"b""#),
            Err(Unexpected { expected: b'"', found: b'a', pos: 0 }),
        );
        // missing space
        assert_eq!(
            parse_compact(r#""a"=>"b","c"=>"d""#),
            Err(Unexpected { expected: b' ', found: b'"', pos: 9 }),
        );
        // trailing separator
        assert_eq!(
            parse_compact(r#""a"=>"b", "#),
            Err(UnexpectedEnd { expected: Expected::Quote }),
        );
        assert_eq!(
            parse_compact(r#""a"=>"b","#),
            Err(UnexpectedEnd { expected: Expected::PairSeparator }),
        );
        // missing value
        assert_eq!(
            parse_compact(r#""a"=>"#),
            Err(UnexpectedEnd { expected: Expected::Value }),
        );
        assert_eq!(
            parse_compact(r#""a""#),
            Err(UnexpectedEnd { expected: Expected::KvSeparator }),
        );
        assert_eq!(
            parse_compact(r#""a"=>"b"#),
            Err(UnterminatedQuote),
        );
        assert_eq!(
            parse_compact(r#""a"=>"\t""#),
            Err(InvalidEscape { found: b't', pos: 7 }),
        );
    }

    #[test]
    fn error_message() {
        let err = parse_compact(r#""a"=>"b","c"=>"d""#).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"failed to parse hstore, expected ' ' (0x20); found '"' (0x22) at 9"#,
        );
    }
}
