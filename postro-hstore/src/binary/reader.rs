use bytes::{Buf, Bytes};
use fallible_iterator::FallibleIterator;
use std::marker::PhantomData;

use crate::{
    codec::DecodeError,
    common::{ByteStr, verbose},
    hstore::{Hstore, HstoreStr},
};

/// Smallest encoded pair, key length and value length.
const MIN_PAIR_LEN: usize = 2 * size_of::<i32>();

/// Read hstore binary representation.
///
/// With [`ByteStr`], every key and value is a slice of `src`.
pub fn read<S: HstoreStr>(src: Bytes) -> Result<Hstore<S>, DecodeError> {
    let mut entries = entries::<S>(src)?;
    let mut hstore = Hstore::with_capacity(entries.capacity_hint());

    while let Some((key, value)) = entries.next()? {
        hstore.put(key, value);
    }

    verbose!(pairs = hstore.len(), "hstore binary read");

    Ok(hstore)
}

/// Returns lazy iterator of hstore binary pairs.
///
/// Only the pair count is read up front.
pub fn entries<S: HstoreStr>(src: Bytes) -> Result<Entries<S>, DecodeError> {
    let mut read = src;
    let count = get_i32(&mut read)?;
    if count < 0 {
        return Err(DecodeError::InvalidLength(count));
    }
    Ok(Entries { read, remaining: count as usize, _s: PhantomData })
}

/// A [`FallibleIterator`] of hstore binary pairs.
///
/// Iteration stops after the first error.
pub struct Entries<S = ByteStr> {
    read: Bytes,
    remaining: usize,
    _s: PhantomData<fn() -> S>,
}

impl<S> Entries<S> {
    /// Declared pair count, bounded by what the remaining bytes can hold.
    fn capacity_hint(&self) -> usize {
        self.remaining.min(self.read.len() / MIN_PAIR_LEN)
    }

    fn get_str(&mut self, len: i32) -> Result<S, DecodeError>
    where
        S: HstoreStr,
    {
        let len = len as usize;
        if self.read.len() < len {
            return Err(DecodeError::Incomplete(self.read.clone()));
        }
        let bytes = self.read.split_to(len);
        let string = std::str::from_utf8(&bytes)?;
        Ok(S::from_shared(&bytes, string))
    }

    fn next_pair(&mut self) -> Result<(S, Option<S>), DecodeError>
    where
        S: HstoreStr,
    {
        let key_len = get_i32(&mut self.read)?;
        if key_len < 0 {
            return Err(DecodeError::InvalidLength(key_len));
        }
        let key = self.get_str(key_len)?;

        // any negative length is NULL
        let value = match get_i32(&mut self.read)? {
            value_len if value_len < 0 => None,
            value_len => Some(self.get_str(value_len)?),
        };

        Ok((key, value))
    }
}

impl<S: HstoreStr> FallibleIterator for Entries<S> {
    type Item = (S, Option<S>);

    type Error = DecodeError;

    fn next(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        if self.remaining == 0 {
            return Ok(None);
        }
        match self.next_pair() {
            Ok(pair) => {
                self.remaining -= 1;
                Ok(Some(pair))
            },
            Err(err) => {
                self.remaining = 0;
                Err(err)
            },
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl<S> std::fmt::Debug for Entries<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entries")
            .field("remaining", &self.remaining)
            .field("read", &self.read)
            .finish()
    }
}

fn get_i32(read: &mut Bytes) -> Result<i32, DecodeError> {
    if read.remaining() < size_of::<i32>() {
        return Err(DecodeError::Incomplete(read.clone()));
    }
    Ok(read.get_i32())
}
