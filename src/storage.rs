//! Byte storage backing a [`Packet`](crate::Packet).
//!
//! Three kinds of storage are supported:
//!
//! - fixed capacity: `[u8; N]`
//! - growable: `Vec<u8>` and, with the `bytes` feature, `bytes::BytesMut`
//! - borrowed: `&mut [u8]`
//!
//! Growth is decided by the [`Storage::try_grow`] implementation of the
//! concrete type, so fixed and borrowed storage reject oversized requests
//! with [`RtpError::BufferTooSmall`] and never allocate.

use crate::error::{Result, RtpError};
use tracing::trace;

/// Contiguous bytes a packet can be decoded from and written into.
pub trait Storage {
    fn as_bytes(&self) -> &[u8];

    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// Number of addressable bytes. For `Vec<u8>` and `BytesMut` this is
    /// their length, not their allocation.
    fn capacity(&self) -> usize {
        self.as_bytes().len()
    }

    /// Makes at least `len` bytes addressable.
    ///
    /// Never shrinks. Storage that cannot grow returns
    /// [`RtpError::BufferTooSmall`] when `len` exceeds [`Storage::capacity`].
    fn try_grow(&mut self, len: usize) -> Result<()>;
}

/// Storage that can always be extended.
pub trait Growable: Storage {
    /// Extends the storage with zeroes up to `len` bytes. Never shrinks.
    fn grow(&mut self, len: usize);
}

fn fixed_grow(have: usize, len: usize) -> Result<()> {
    if len > have {
        return Err(RtpError::too_small(len, have));
    }
    Ok(())
}

impl<const N: usize> Storage for [u8; N] {
    fn as_bytes(&self) -> &[u8] {
        self
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self
    }

    fn try_grow(&mut self, len: usize) -> Result<()> {
        fixed_grow(N, len)
    }
}

impl<'a> Storage for &'a mut [u8] {
    fn as_bytes(&self) -> &[u8] {
        self
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self
    }

    fn try_grow(&mut self, len: usize) -> Result<()> {
        fixed_grow(self.capacity(), len)
    }
}

impl Storage for Vec<u8> {
    fn as_bytes(&self) -> &[u8] {
        self
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self
    }

    fn try_grow(&mut self, len: usize) -> Result<()> {
        if len > self.len() {
            self.try_reserve(len - self.len())
                .map_err(|_| RtpError::too_small(len, self.len()))?;
        }
        self.grow(len);
        Ok(())
    }
}

impl Growable for Vec<u8> {
    fn grow(&mut self, len: usize) {
        if len > self.len() {
            trace!(from = self.len(), to = len, "growing vec storage");
            self.resize(len, 0);
        }
    }
}

#[cfg(feature = "bytes")]
impl Storage for bytes::BytesMut {
    fn as_bytes(&self) -> &[u8] {
        self
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self
    }

    fn try_grow(&mut self, len: usize) -> Result<()> {
        self.grow(len);
        Ok(())
    }
}

#[cfg(feature = "bytes")]
impl Growable for bytes::BytesMut {
    fn grow(&mut self, len: usize) {
        if len > self.len() {
            trace!(from = self.len(), to = len, "growing bytes storage");
            self.resize(len, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_rejects_growth_past_capacity() {
        let mut arr = [0u8; 16];
        assert!(arr.try_grow(16).is_ok());
        assert_eq!(
            arr.try_grow(17),
            Err(RtpError::BufferTooSmall {
                needed: 17,
                capacity: 16
            })
        );
    }

    #[test]
    fn borrowed_never_grows() {
        let mut backing = [0u8; 8];
        let mut slice: &mut [u8] = &mut backing[..];
        assert!(slice.try_grow(4).is_ok());
        assert!(slice.try_grow(9).is_err());
        assert_eq!(slice.capacity(), 8);
    }

    #[test]
    fn vec_grows_with_zeroes_and_never_shrinks() {
        let mut v = vec![0xAA; 4];
        v.try_grow(8).unwrap();
        assert_eq!(v, [0xAA, 0xAA, 0xAA, 0xAA, 0, 0, 0, 0]);

        v.try_grow(2).unwrap();
        assert_eq!(v.len(), 8);
    }

    #[test]
    fn vec_reports_unallocatable_growth() {
        let mut v = vec![0u8; 4];
        assert_eq!(
            v.try_grow(usize::MAX),
            Err(RtpError::BufferTooSmall {
                needed: usize::MAX,
                capacity: 4
            })
        );
        assert_eq!(v.len(), 4);
    }

    #[cfg(feature = "bytes")]
    #[test]
    fn bytes_mut_grows() {
        let mut b = bytes::BytesMut::new();
        b.try_grow(12).unwrap();
        assert_eq!(b.len(), 12);
        assert!(b.iter().all(|&x| x == 0));
    }
}
