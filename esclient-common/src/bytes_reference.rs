//! Byte payload references
//!
//! A [`BytesReference`] is either an owned, immutable [`Bytes`] array or a
//! range inside a [`SharedBuffer`]. Shared buffers model storage that its owner
//! keeps rewriting (pooled network buffers, reused scratch space), so a holder
//! that needs a stable value has to take a copy with
//! [`BytesReference::copy_bytes_array`].

use crate::{EsClientError, Result};
use bytes::Bytes;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Mutable byte storage that can be shared between its owner and readers
#[derive(Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<RwLock<Vec<u8>>>,
}

impl SharedBuffer {
    /// Wrap `data` as a shared buffer
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data.into())),
        }
    }

    /// Buffer length in bytes
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite bytes in place starting at `offset`
    ///
    /// The buffer never grows, so ranges handed out by [`SharedBuffer::slice`]
    /// stay in bounds.
    pub fn write_at(&self, offset: usize, data: &[u8]) -> Result<()> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let end = checked_end(offset, data.len(), guard.len())?;
        guard[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Reference `length` bytes starting at `offset` without copying
    pub fn slice(&self, offset: usize, length: usize) -> Result<BytesReference> {
        checked_end(offset, length, self.len())?;
        Ok(BytesReference::Shared {
            buffer: self.clone(),
            offset,
            length,
        })
    }

    /// Copy the current content out of the buffer
    pub fn to_vec(&self) -> Vec<u8> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn copy_range(&self, offset: usize, length: usize) -> Bytes {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Bytes::copy_from_slice(&guard[offset..offset + length])
    }
}

impl fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBuffer")
            .field("len", &self.len())
            .finish()
    }
}

fn checked_end(offset: usize, length: usize, capacity: usize) -> Result<usize> {
    offset
        .checked_add(length)
        .filter(|end| *end <= capacity)
        .ok_or_else(|| {
            EsClientError::encode(format!(
                "range [{offset}, +{length}) is out of bounds for buffer of {capacity} bytes"
            ))
        })
}

/// A reference to a run of bytes
#[derive(Clone)]
pub enum BytesReference {
    /// Owned, immutable bytes
    Array(Bytes),
    /// A range inside a shared, mutable buffer
    Shared {
        /// Backing storage
        buffer: SharedBuffer,
        /// Start of the range
        offset: usize,
        /// Length of the range
        length: usize,
    },
}

impl BytesReference {
    /// Length of the referenced bytes
    pub fn len(&self) -> usize {
        match self {
            Self::Array(bytes) => bytes.len(),
            Self::Shared { length, .. } => *length,
        }
    }

    /// Whether no bytes are referenced
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the bytes live in a shared buffer
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared { .. })
    }

    /// The current bytes
    ///
    /// Cheap for arrays; a shared range is read as it is right now.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Self::Array(bytes) => bytes.clone(),
            Self::Shared {
                buffer,
                offset,
                length,
            } => buffer.copy_range(*offset, *length),
        }
    }

    /// A private copy of the referenced bytes that no other holder can change
    pub fn copy_bytes_array(&self) -> BytesReference {
        match self {
            Self::Array(bytes) => Self::Array(Bytes::copy_from_slice(bytes)),
            Self::Shared { .. } => Self::Array(self.to_bytes()),
        }
    }

    /// The bytes as UTF-8 text, lossily
    pub fn to_utf8(&self) -> String {
        String::from_utf8_lossy(&self.to_bytes()).into_owned()
    }
}

impl From<Bytes> for BytesReference {
    fn from(bytes: Bytes) -> Self {
        Self::Array(bytes)
    }
}

impl From<Vec<u8>> for BytesReference {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Array(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for BytesReference {
    fn from(bytes: &'static [u8]) -> Self {
        Self::Array(Bytes::from_static(bytes))
    }
}

impl PartialEq for BytesReference {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BytesReference {}

impl fmt::Debug for BytesReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(bytes) => f.debug_tuple("Array").field(bytes).finish(),
            Self::Shared { offset, length, .. } => f
                .debug_struct("Shared")
                .field("offset", offset)
                .field("length", length)
                .finish(),
        }
    }
}
