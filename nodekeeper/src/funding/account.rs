//! Node account derived from the key file the node writes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use super::FundingError;

/// Hex digits in a secp256k1 private key.
const KEY_HEX_LEN: usize = 64;

/// Result of checking the key file.
#[derive(Debug)]
pub enum KeyFileStatus {
    /// Not written yet, or still being written.
    Pending,
    /// Complete and parsed.
    Ready(Account),
}

/// The node's operating account.
///
/// Holds the signer so that on-chain registration can sign with the same
/// key the node uses.
#[derive(Clone)]
pub struct Account {
    signer: PrivateKeySigner,
    key_file: PathBuf,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .field("key_file", &self.key_file)
            .finish()
    }
}

impl Account {
    /// Check the key file at `path` without blocking.
    ///
    /// A missing, empty or short file is `Pending`: the node may not have
    /// finished writing it. A complete file that does not parse as a key is
    /// an error.
    pub fn probe(path: &Path) -> Result<KeyFileStatus, FundingError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(KeyFileStatus::Pending),
            Err(source) => {
                return Err(FundingError::KeyRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let hex = content.trim();
        let digits = hex.strip_prefix("0x").unwrap_or(hex);
        if digits.len() < KEY_HEX_LEN {
            return Ok(KeyFileStatus::Pending);
        }

        Self::from_hex(digits, path).map(KeyFileStatus::Ready)
    }

    /// Parse a hex private key (with or without `0x`).
    pub fn from_hex(hex: &str, key_file: &Path) -> Result<Self, FundingError> {
        let signer =
            PrivateKeySigner::from_str(hex.trim()).map_err(|e| FundingError::InvalidKey {
                path: key_file.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            signer,
            key_file: key_file.to_path_buf(),
        })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    pub fn key_file(&self) -> &Path {
        &self.key_file
    }
}
