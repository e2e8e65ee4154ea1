//! BSV Unified Merkle Path (BUMP)
//!
//! One path per block: for every tree level, the leaves needed to climb from
//! the proven transactions to the root. Hashes are kept in internal byte order.

use crate::beef::reader::Reader;
use crate::errors::{BeefError, BeefResult};
use bitcoin::consensus::encode::{serialize, VarInt};
use bitcoin::hashes::Hash;
use bitcoin::Txid;
use sha2::{Digest, Sha256};

const FLAG_DUPLICATE: u8 = 0x01;
const FLAG_TXID: u8 = 0x02;

/// Levels in a tree whose leaf offsets fit in a u64
pub const MAX_TREE_HEIGHT: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLeaf {
    pub offset: u64,
    /// Absent when the leaf duplicates its left sibling
    pub hash: Option<[u8; 32]>,
    /// Leaf is a transaction the client cares about
    pub txid: bool,
}

impl PathLeaf {
    pub fn hash(offset: u64, hash: [u8; 32]) -> Self {
        Self {
            offset,
            hash: Some(hash),
            txid: false,
        }
    }

    pub fn client_txid(offset: u64, txid: &Txid) -> Self {
        Self {
            offset,
            hash: Some(txid.to_byte_array()),
            txid: true,
        }
    }

    pub fn duplicate(offset: u64) -> Self {
        Self {
            offset,
            hash: None,
            txid: false,
        }
    }

    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.hash.is_none() {
            flags |= FLAG_DUPLICATE;
        }
        if self.txid {
            flags |= FLAG_TXID;
        }
        flags
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerklePath {
    pub block_height: u32,
    pub path: Vec<Vec<PathLeaf>>,
}

enum Sibling {
    Hash([u8; 32]),
    Duplicate,
}

impl MerklePath {
    pub(crate) fn read(reader: &mut Reader<'_>) -> BeefResult<Self> {
        let block_height = u32::try_from(reader.read_varint("block height")?)
            .map_err(|_| BeefError::Malformed("block height exceeds u32".to_string()))?;
        let tree_height = reader.read::<u8>("tree height")?;
        if tree_height == 0 {
            return Err(BeefError::Malformed("merkle path with no levels".to_string()));
        }
        if tree_height as usize > MAX_TREE_HEIGHT {
            return Err(BeefError::Malformed(format!(
                "merkle path with {} levels",
                tree_height
            )));
        }

        let mut path = Vec::with_capacity(tree_height as usize);
        for _ in 0..tree_height {
            let leaf_count = reader.read_count("leaf count")?;
            let mut leaves = Vec::with_capacity(leaf_count);
            for _ in 0..leaf_count {
                let offset = reader.read_varint("leaf offset")?;
                let flags = reader.read::<u8>("leaf flags")?;
                let hash = if flags & FLAG_DUPLICATE != 0 {
                    None
                } else {
                    Some(reader.read::<[u8; 32]>("leaf hash")?)
                };
                leaves.push(PathLeaf {
                    offset,
                    hash,
                    txid: flags & FLAG_TXID != 0,
                });
            }
            path.push(leaves);
        }

        Ok(Self { block_height, path })
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend(serialize(&VarInt(self.block_height as u64)));
        out.push(self.path.len() as u8);
        for level in &self.path {
            out.extend(serialize(&VarInt(level.len() as u64)));
            for leaf in level {
                out.extend(serialize(&VarInt(leaf.offset)));
                out.push(leaf.flags());
                if let Some(hash) = &leaf.hash {
                    out.extend_from_slice(hash);
                }
            }
        }
    }

    /// Whether the lowest level carries `txid`
    pub fn contains(&self, txid: &Txid) -> bool {
        let target = txid.to_byte_array();
        self.path
            .first()
            .map(|level| level.iter().any(|leaf| leaf.hash == Some(target)))
            .unwrap_or(false)
    }

    /// Climb from `txid` to the block merkle root (internal byte order)
    pub fn compute_root(&self, txid: &Txid) -> BeefResult<[u8; 32]> {
        if self.path.len() > MAX_TREE_HEIGHT {
            return Err(BeefError::Malformed(format!(
                "merkle path with {} levels",
                self.path.len()
            )));
        }
        let target = txid.to_byte_array();
        let index = self
            .path
            .first()
            .and_then(|level| level.iter().find(|leaf| leaf.hash == Some(target)))
            .map(|leaf| leaf.offset)
            .ok_or_else(|| BeefError::LeafNotFound {
                txid: txid.to_string(),
            })?;

        // Single-transaction block
        if self.path.len() == 1 && self.path[0].len() == 1 {
            return Ok(target);
        }

        let mut working = target;
        for height in 0..self.path.len() {
            let offset = (index >> height) ^ 1;
            working = match self.sibling(height, offset) {
                Some(Sibling::Duplicate) => hash_pair(&working, &working),
                Some(Sibling::Hash(sibling)) if offset % 2 != 0 => hash_pair(&working, &sibling),
                Some(Sibling::Hash(sibling)) => hash_pair(&sibling, &working),
                None => {
                    return Err(BeefError::Malformed(format!(
                        "missing sibling at height {} offset {}",
                        height, offset
                    )))
                }
            };
        }
        Ok(working)
    }

    fn sibling(&self, height: usize, offset: u64) -> Option<Sibling> {
        if let Some(leaf) = self.path[height].iter().find(|leaf| leaf.offset == offset) {
            return Some(match leaf.hash {
                Some(hash) => Sibling::Hash(hash),
                None => Sibling::Duplicate,
            });
        }
        if height == 0 {
            return None;
        }
        let left = match self.sibling(height - 1, offset << 1)? {
            Sibling::Hash(hash) => hash,
            Sibling::Duplicate => return None,
        };
        let right = match self.sibling(height - 1, (offset << 1) + 1)? {
            Sibling::Hash(hash) => hash,
            Sibling::Duplicate => left,
        };
        Some(Sibling::Hash(hash_pair(&left, &right)))
    }
}

/// Double SHA-256 of `left || right`
pub fn hash_pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    let first = hasher.finalize();
    Sha256::digest(first).into()
}

/// Display form of an internal-order hash
pub fn display_hex(hash: &[u8; 32]) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}
