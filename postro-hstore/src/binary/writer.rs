use bytes::BufMut;

use crate::{
    codec::EncodeError,
    ext::{BufMutExt, UsizeExt},
};

/// Write hstore binary representation.
///
/// Nothing is escaped, keys and values are written as is.
pub fn write<'a, I, B>(pairs: I, buf: &mut B) -> Result<(), EncodeError>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    I::IntoIter: ExactSizeIterator,
    B: BufMut,
{
    let pairs = pairs.into_iter();
    buf.put_i32(pairs.len().to_i32()?);

    for (key, value) in pairs {
        buf.put_len_str(key)?;
        match value {
            Some(value) => buf.put_len_str(value)?,
            None => buf.put_i32(-1),
        }
    }

    Ok(())
}
