//! Single-file object store with content-addressed storage
//!
//! File format:
//! ```text
//! [HEADER: 64 bytes]
//!   - magic: 8 bytes ("PATHGRPH")
//!   - version: 4 bytes (u32 LE)
//!   - flags: 4 bytes
//!   - object_count: 8 bytes (u64 LE)
//!   - index_offset: 8 bytes (u64 LE)
//!   - roots_offset: 8 bytes (u64 LE)
//!   - roots_count: 8 bytes (u64 LE)
//!   - reserved: 16 bytes
//!
//! [OBJECTS: variable]
//!   - blob data, concatenated
//!
//! [INDEX: variable]
//!   - array of (hash, offset, size) entries sorted by hash
//!
//! [ROOTS: variable]
//!   - tree names → root node hashes
//! ```
//!
//! Objects are appended after the last object; the index and roots are
//! rewritten behind them on every [`ObjectStore::sync`].

use super::blob::Blob;
use super::{NodeStore, StoredNode};
use crate::model::Hash;
use crate::{Error, Result, MAGIC, VERSION};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const HEADER_SIZE: u64 = 64;

/// 32 (hash) + 8 (offset) + 4 (size)
const INDEX_ENTRY_SIZE: usize = 44;

#[derive(Clone, Copy, Debug)]
struct IndexEntry {
    offset: u64,
    size: u32,
}

fn le_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

fn le_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

/// A content-addressed object store backed by a single file
pub struct ObjectStore {
    path: PathBuf,
    file: RwLock<File>,
    index: RwLock<HashMap<Hash, IndexEntry>>,
    /// Tree name → root node hash
    roots: RwLock<HashMap<String, Hash>>,
    /// Current append position
    write_offset: RwLock<u64>,
}

impl ObjectStore {
    /// Create a new store file, truncating any existing one
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        let mut header = [0u8; HEADER_SIZE as usize];
        header[0..8].copy_from_slice(MAGIC);
        header[8..12].copy_from_slice(&VERSION.to_le_bytes());
        file.write_all(&header)?;
        file.sync_all()?;

        Ok(ObjectStore {
            path,
            file: RwLock::new(file),
            index: RwLock::new(HashMap::new()),
            roots: RwLock::new(HashMap::new()),
            write_offset: RwLock::new(HEADER_SIZE),
        })
    }

    /// Open an existing store file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = OpenOptions::new().read(true).write(true).open(&path)?;

        let mut header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::InvalidFile("File too short".into()),
            _ => Error::Io(e),
        })?;

        if &header[0..8] != MAGIC {
            return Err(Error::InvalidFile("Invalid magic bytes".into()));
        }

        let version = le_u32(&header[8..12]);
        if version != VERSION {
            return Err(Error::VersionMismatch {
                expected: VERSION,
                found: version,
            });
        }

        let object_count = le_u64(&header[16..24]);
        let index_offset = le_u64(&header[24..32]);
        let roots_offset = le_u64(&header[32..40]);
        let roots_count = le_u64(&header[40..48]);

        let mut index = HashMap::new();
        if index_offset > 0 && object_count > 0 {
            file.seek(SeekFrom::Start(index_offset))?;
            for _ in 0..object_count {
                let mut entry_buf = [0u8; INDEX_ENTRY_SIZE];
                file.read_exact(&mut entry_buf)?;

                let mut hash_bytes = [0u8; 32];
                hash_bytes.copy_from_slice(&entry_buf[0..32]);
                let hash = Hash::from_bytes(hash_bytes);

                let offset = le_u64(&entry_buf[32..40]);
                let size = le_u32(&entry_buf[40..44]);
                let in_bounds = offset >= HEADER_SIZE
                    && offset
                        .checked_add(size as u64)
                        .is_some_and(|end| end <= index_offset);
                if !in_bounds {
                    return Err(Error::Corruption(format!(
                        "Object {} lies outside the object region",
                        hash.short()
                    )));
                }

                index.insert(hash, IndexEntry { offset, size });
            }
        }

        let mut roots = HashMap::new();
        if roots_offset > 0 && roots_count > 0 {
            file.seek(SeekFrom::Start(roots_offset))?;
            for _ in 0..roots_count {
                let mut len_buf = [0u8; 2];
                file.read_exact(&mut len_buf)?;
                let name_len = u16::from_le_bytes(len_buf) as usize;

                let mut name_buf = vec![0u8; name_len];
                file.read_exact(&mut name_buf)?;
                let name = String::from_utf8(name_buf)
                    .map_err(|_| Error::Corruption("Root name is not UTF-8".into()))?;

                let mut hash_buf = [0u8; 32];
                file.read_exact(&mut hash_buf)?;

                roots.insert(name, Hash::from_bytes(hash_buf));
            }
        }

        // Append after the objects, over the old index
        let write_offset = if index_offset > 0 {
            index_offset
        } else {
            file.seek(SeekFrom::End(0))?
        };

        Ok(ObjectStore {
            path,
            file: RwLock::new(file),
            index: RwLock::new(index),
            roots: RwLock::new(roots),
            write_offset: RwLock::new(write_offset),
        })
    }

    /// Open or create a store file
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Store a blob, returns its hash
    pub fn put(&self, blob: &Blob) -> Result<Hash> {
        let hash = blob.hash();

        if self.index.read().contains_key(&hash) {
            return Ok(hash);
        }

        let compressed = blob.compress()?;
        let size = u32::try_from(compressed.len())
            .map_err(|_| Error::Corruption(format!("Blob too large: {} bytes", compressed.len())))?;

        let offset = {
            let mut write_offset = self.write_offset.write();
            let offset = *write_offset;

            let mut file = self.file.write();
            file.seek(SeekFrom::Start(offset))?;
            file.write_all(&compressed)?;

            *write_offset = offset + size as u64;
            offset
        };

        self.index.write().insert(hash, IndexEntry { offset, size });

        Ok(hash)
    }

    /// Retrieve a blob by hash
    pub fn get(&self, hash: &Hash) -> Result<Blob> {
        let entry = self
            .index
            .read()
            .get(hash)
            .copied()
            .ok_or_else(|| Error::NotFound(hash.to_hex()))?;

        let mut data = vec![0u8; entry.size as usize];
        {
            let mut file = self.file.write();
            file.seek(SeekFrom::Start(entry.offset))?;
            file.read_exact(&mut data)?;
        }

        let blob = Blob::decompress(&data)?;
        if blob.hash() != *hash {
            return Err(Error::Corruption(format!(
                "Object {} does not match its hash",
                hash.short()
            )));
        }
        Ok(blob)
    }

    /// Check if a hash exists
    pub fn contains(&self, hash: &Hash) -> bool {
        self.index.read().contains_key(hash)
    }

    /// Get the number of objects in the store
    pub fn object_count(&self) -> usize {
        self.index.read().len()
    }

    /// Write the index and roots behind the objects and update the header
    pub fn sync(&self) -> Result<()> {
        let index = self.index.read();
        let roots = self.roots.read();
        let write_offset = *self.write_offset.read();
        let mut file = self.file.write();

        let index_size = (index.len() * INDEX_ENTRY_SIZE) as u64;
        let roots_offset = write_offset + index_size;

        // Sort by hash for determinism
        let mut entries: Vec<_> = index.iter().collect();
        entries.sort_by_key(|(h, _)| **h);

        let mut buf = Vec::with_capacity(index_size as usize);
        for (hash, entry) in entries {
            buf.extend_from_slice(hash.as_bytes());
            buf.extend_from_slice(&entry.offset.to_le_bytes());
            buf.extend_from_slice(&entry.size.to_le_bytes());
        }

        // Format: for each root: name_len (u16) + name + hash (32 bytes)
        let mut root_list: Vec<_> = roots.iter().collect();
        root_list.sort_by_key(|(name, _)| *name);

        for (name, hash) in root_list {
            let name_bytes = name.as_bytes();
            let name_len = u16::try_from(name_bytes.len())
                .map_err(|_| Error::Config(format!("Tree name too long: {name}")))?;
            buf.extend_from_slice(&name_len.to_le_bytes());
            buf.extend_from_slice(name_bytes);
            buf.extend_from_slice(hash.as_bytes());
        }

        // The header only points at the new index once it is fully encoded
        file.seek(SeekFrom::Start(write_offset))?;
        file.write_all(&buf)?;

        file.seek(SeekFrom::Start(16))?;
        file.write_all(&(index.len() as u64).to_le_bytes())?;
        file.write_all(&write_offset.to_le_bytes())?;
        file.write_all(&roots_offset.to_le_bytes())?;
        file.write_all(&(roots.len() as u64).to_le_bytes())?;

        file.set_len(write_offset + buf.len() as u64)?;
        file.sync_all()?;
        Ok(())
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NodeStore for ObjectStore {
    fn put_node(&self, node: &StoredNode) -> Result<Hash> {
        self.put(&node.to_blob()?)
    }

    fn get_node(&self, hash: &Hash) -> Result<StoredNode> {
        StoredNode::from_blob(&self.get(hash)?)
    }

    fn contains_node(&self, hash: &Hash) -> bool {
        self.contains(hash)
    }

    fn root(&self, name: &str) -> Option<Hash> {
        self.roots.read().get(name).copied()
    }

    fn set_root(&self, name: &str, hash: Hash) {
        self.roots.write().insert(name.to_string(), hash);
    }

    fn remove_root(&self, name: &str) -> Option<Hash> {
        self.roots.write().remove(name)
    }

    fn roots(&self) -> Vec<(String, Hash)> {
        let mut roots: Vec<_> = self
            .roots
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        roots.sort();
        roots
    }

    fn flush(&self) -> Result<()> {
        self.sync()
    }
}

impl Drop for ObjectStore {
    fn drop(&mut self) {
        // Best-effort sync on drop
        let _ = self.sync();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Data;
    use crate::store::BlobType;
    use tempfile::tempdir;

    fn leaf(value: &str) -> StoredNode {
        StoredNode::new(Some(Data::from(value)), vec![])
    }

    #[test]
    fn test_create_and_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.pgdb");

        {
            let store = ObjectStore::create(&path).unwrap();
            assert_eq!(store.object_count(), 0);
        }

        {
            let store = ObjectStore::open(&path).unwrap();
            assert_eq!(store.object_count(), 0);
            assert!(store.roots().is_empty());
        }
    }

    #[test]
    fn test_node_storage() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::create(dir.path().join("test.pgdb")).unwrap();

        let child = store.put_node(&leaf("child")).unwrap();
        let parent = StoredNode::new(None, vec![(Data::from("k"), child)]);
        let hash = store.put_node(&parent).unwrap();

        assert_eq!(store.get_node(&hash).unwrap(), parent);
        assert_eq!(store.get_node(&child).unwrap(), leaf("child"));
        assert!(store.contains_node(&child));
    }

    #[test]
    fn test_deduplication() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::create(dir.path().join("test.pgdb")).unwrap();

        let blob = Blob::new(BlobType::Node, b"duplicate data".to_vec());
        let hash1 = store.put(&blob).unwrap();
        let hash2 = store.put(&blob).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(store.object_count(), 1);
    }

    #[test]
    fn test_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.pgdb");

        let hash;
        {
            let store = ObjectStore::create(&path).unwrap();
            hash = store.put_node(&leaf("persistent")).unwrap();
            store.set_root("main", hash);
            store.sync().unwrap();
        }

        {
            let store = ObjectStore::open(&path).unwrap();
            assert_eq!(store.root("main"), Some(hash));
            assert_eq!(store.get_node(&hash).unwrap(), leaf("persistent"));
        }
    }

    #[test]
    fn test_append_after_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.pgdb");

        let first = {
            let store = ObjectStore::create(&path).unwrap();
            let h = store.put_node(&leaf("one")).unwrap();
            store.set_root("a", h);
            h
        };

        let second = {
            let store = ObjectStore::open(&path).unwrap();
            let h = store.put_node(&leaf("two")).unwrap();
            store.set_root("b", h);
            h
        };

        let store = ObjectStore::open(&path).unwrap();
        assert_eq!(store.object_count(), 2);
        assert_eq!(store.get_node(&first).unwrap(), leaf("one"));
        assert_eq!(store.get_node(&second).unwrap(), leaf("two"));
        assert_eq!(
            store.roots(),
            vec![("a".to_string(), first), ("b".to_string(), second)]
        );
    }

    #[test]
    fn test_roots_removed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.pgdb");

        {
            let store = ObjectStore::create(&path).unwrap();
            let h = store.put_node(&leaf("x")).unwrap();
            store.set_root("gone", h);
            store.sync().unwrap();
            assert_eq!(store.remove_root("gone"), Some(h));
        }

        let store = ObjectStore::open(&path).unwrap();
        assert_eq!(store.root("gone"), None);
    }

    #[test]
    fn test_rejects_foreign_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk");
        std::fs::write(&path, [7u8; 64]).unwrap();
        assert!(matches!(ObjectStore::open(&path), Err(Error::InvalidFile(_))));

        std::fs::write(&path, b"short").unwrap();
        assert!(matches!(ObjectStore::open(&path), Err(Error::InvalidFile(_))));
    }

    #[test]
    fn test_rejects_other_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old.pgdb");
        let mut header = [0u8; 64];
        header[0..8].copy_from_slice(MAGIC);
        header[8..12].copy_from_slice(&(VERSION + 1).to_le_bytes());
        std::fs::write(&path, header).unwrap();

        match ObjectStore::open(&path) {
            Err(Error::VersionMismatch { expected, found }) => {
                assert_eq!(expected, VERSION);
                assert_eq!(found, VERSION + 1);
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_object() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::create(dir.path().join("test.pgdb")).unwrap();
        let err = store.get_node(&Hash::digest(b"missing")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_overlong_root_name_leaves_file_readable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.pgdb");

        let hash = {
            let store = ObjectStore::create(&path).unwrap();
            let h = store.put_node(&leaf("kept")).unwrap();
            store.set_root("main", h);
            store.sync().unwrap();

            store.set_root(&"n".repeat(70_000), h);
            assert!(matches!(store.sync(), Err(Error::Config(_))));
            h
        };

        let store = ObjectStore::open(&path).unwrap();
        assert_eq!(store.roots(), vec![("main".to_string(), hash)]);
        assert_eq!(store.get_node(&hash).unwrap(), leaf("kept"));
    }

    #[test]
    fn test_rejects_overflowing_index_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.pgdb");

        let mut bytes = vec![0u8; HEADER_SIZE as usize];
        bytes[0..8].copy_from_slice(MAGIC);
        bytes[8..12].copy_from_slice(&VERSION.to_le_bytes());
        bytes[16..24].copy_from_slice(&1u64.to_le_bytes());
        bytes[24..32].copy_from_slice(&HEADER_SIZE.to_le_bytes());
        // hash, then an offset whose end wraps past u64::MAX
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.extend_from_slice(&(u64::MAX - 10).to_le_bytes());
        bytes.extend_from_slice(&100u32.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(ObjectStore::open(&path), Err(Error::Corruption(_))));
    }
}
