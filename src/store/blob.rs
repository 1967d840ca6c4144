//! Blob type - the unit of content-addressed storage

use crate::model::Hash;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Type tag for blobs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlobType {
    /// A serialized trie node
    Node,
}

impl BlobType {
    pub fn as_byte(&self) -> u8 {
        match self {
            BlobType::Node => 1,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(BlobType::Node),
            _ => None,
        }
    }
}

/// A typed chunk of data, compressed when written
#[derive(Clone, Debug)]
pub struct Blob {
    pub blob_type: BlobType,
    /// Uncompressed payload
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(blob_type: BlobType, data: Vec<u8>) -> Self {
        Blob { blob_type, data }
    }

    /// Content hash over the type byte and the payload
    pub fn hash(&self) -> Hash {
        Hash::digest_many(&[&[self.blob_type.as_byte()], &self.data])
    }

    /// Type byte followed by the zstd-compressed payload
    pub fn compress(&self) -> Result<Vec<u8>> {
        let mut output = vec![self.blob_type.as_byte()];
        let compressed = zstd::encode_all(self.data.as_slice(), 3)?;
        output.extend(compressed);
        Ok(output)
    }

    pub fn decompress(data: &[u8]) -> Result<Self> {
        let (&tag, payload) = data
            .split_first()
            .ok_or_else(|| Error::Corruption("Empty blob data".into()))?;

        let blob_type = BlobType::from_byte(tag)
            .ok_or_else(|| Error::Corruption(format!("Invalid blob type: {tag}")))?;

        Ok(Blob {
            blob_type,
            data: zstd::decode_all(payload)?,
        })
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}
