use bytes::BufMut;

use crate::ext::BufMutExt;

/// Write hstore text representation.
///
/// Keys and values are always double quoted, even when not required. Some
/// postgres builds fail to parse unquoted hstore strings.
///
/// <https://www.postgresql.org/message-id/CA%2BHWA9awUW0%2BRV_gO9r1ABZwGoZxPztcJxPy8vMFSTbTfi4jig%40mail.gmail.com>
pub fn write<'a, I, B>(pairs: I, buf: &mut B)
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    B: BufMut,
{
    let mut first = true;

    for (key, value) in pairs {
        if first {
            first = false;
        } else {
            buf.put_slice(b", ");
        }

        buf.put_quoted(key);
        buf.put_slice(b"=>");

        match value {
            Some(value) => buf.put_quoted(value),
            None => buf.put_slice(b"NULL"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn write_vec<'a>(pairs: &[(&'a str, Option<&'a str>)]) -> String {
        let mut buf = Vec::<u8>::new();
        write(pairs.iter().copied(), &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn always_quoted() {
        assert_eq!(write_vec(&[("a", Some("1"))]), r#""a"=>"1""#);
        assert_eq!(write_vec(&[("a", Some("")), ("b", None)]), r#""a"=>"", "b"=>NULL"#);
    }

    #[test]
    fn empty() {
        assert_eq!(write_vec(&[]), "");
    }

    #[test]
    fn escapes_only_backslash_and_quote() {
        assert_eq!(
            write_vec(&[(r#"a\"b"#, Some(r"x\\y")), ("c, d=>e", Some("NULL"))]),
            r#""a\\\"b"=>"x\\\\y", "c, d=>e"=>"NULL""#,
        );
    }
}
