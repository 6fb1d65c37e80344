//! Content fingerprints for cheap identity checks between versions

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::Document;
use std::io::{self, Read};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Lowercase hex SHA-256 of the raw bytes
    pub hash: String,
    pub size: u64,
}

impl Fingerprint {
    pub fn of_document(document: &Document) -> Self {
        fingerprint(&document.bytes)
    }

    pub fn same_content(&self, other: &Fingerprint) -> bool {
        self.size == other.size && self.hash == other.hash
    }
}

/// Compute SHA-256 hash and byte length of document bytes
pub fn fingerprint(bytes: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Fingerprint {
        hash: hex::encode(hasher.finalize()),
        size: bytes.len() as u64,
    }
}

/// Fingerprint a stream without holding it in memory
pub fn fingerprint_reader<R: Read>(mut reader: R) -> io::Result<Fingerprint> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    let mut size = 0u64;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }

    Ok(Fingerprint {
        hash: hex::encode(hasher.finalize()),
        size,
    })
}
