//! Dataset byte stores.
//!
//! The catalog never touches the filesystem directly; it asks a
//! `DatasetStore` for raw member bytes. The default store serves the
//! zip archive compiled into the binary, tests inject `MemoryStore`.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;
use zip::result::ZipError;

/// Source of raw dataset bytes, keyed by member file name.
pub trait DatasetStore {
    fn resolve(&self, member: &str) -> Result<Vec<u8>>;
}

static ARCHIVE: &[u8] = include_bytes!("../data/datasets.zip");

/// The deflate-compressed archive bundled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledStore;

impl DatasetStore for BundledStore {
    fn resolve(&self, member: &str) -> Result<Vec<u8>> {
        let mut zip = ZipArchive::new(Cursor::new(ARCHIVE))?;
        let mut file = match zip.by_name(member) {
            Ok(f) => f,
            Err(ZipError::FileNotFound) => {
                return Err(Error::MissingMember {
                    member: member.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let mut buf = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buf)?;
        log::debug!("resolved `{member}` ({} bytes)", buf.len());
        Ok(buf)
    }
}

/// In-memory store for tests and for callers that bring their own data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    members: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, member: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.members.insert(member.into(), bytes.into());
    }
}

impl DatasetStore for MemoryStore {
    fn resolve(&self, member: &str) -> Result<Vec<u8>> {
        self.members
            .get(member)
            .cloned()
            .ok_or_else(|| Error::MissingMember {
                member: member.to_string(),
            })
    }
}
