//! BEEF transaction envelope
//!
//! A candidate transaction arrives together with every ancestor needed to
//! resolve its inputs, optionally with merkle proofs for the mined ones.
//!
//! ## Wire layout
//!
//! - V1 (`0100BEEF`): bumps, then `rawTx hasBump [bumpIndex]` per transaction
//! - V2 (`0200BEEF`): bumps, then `format [bumpIndex] rawTx | format txid` per transaction
//! - Atomic (`01010101` + subject txid) wraps either of the above
//!
//! Transactions are ordered parents-first, so the last one is the subject
//! unless an Atomic prefix names it explicitly.

pub mod merkle_path;
mod reader;

pub use merkle_path::{MerklePath, PathLeaf};

use crate::errors::{BeefError, BeefResult};
use bitcoin::consensus::encode::{serialize, VarInt};
use bitcoin::hashes::Hash;
use bitcoin::{Transaction, TxOut, Txid};
use reader::Reader;

pub const BEEF_V1: u32 = 0xEFBE_0001;
pub const BEEF_V2: u32 = 0xEFBE_0002;
pub const ATOMIC_BEEF: u32 = 0x0101_0101;

const FORMAT_RAW_TX: u8 = 0;
const FORMAT_RAW_TX_AND_BUMP: u8 = 1;
const FORMAT_TXID_ONLY: u8 = 2;

/// One transaction entry; `transaction` is absent for V2 txid-only entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeefTx {
    pub txid: Txid,
    pub transaction: Option<Transaction>,
    pub bump_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beef {
    pub version: u32,
    pub bumps: Vec<MerklePath>,
    pub transactions: Vec<BeefTx>,
    /// Subject named by an Atomic BEEF prefix
    pub atomic_txid: Option<Txid>,
}

impl Default for Beef {
    fn default() -> Self {
        Self::new(BEEF_V1)
    }
}

impl Beef {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            bumps: Vec::new(),
            transactions: Vec::new(),
            atomic_txid: None,
        }
    }

    /// Parse V1, V2 or Atomic BEEF bytes
    pub fn from_bytes(bytes: &[u8]) -> BeefResult<Self> {
        let mut reader = Reader::new(bytes);
        let mut version = reader.read::<u32>("version")?;

        let mut atomic_txid = None;
        if version == ATOMIC_BEEF {
            atomic_txid = Some(reader.read::<Txid>("atomic subject txid")?);
            version = reader.read::<u32>("version")?;
        }

        if version != BEEF_V1 && version != BEEF_V2 {
            return Err(BeefError::UnsupportedVersion(version));
        }

        let bump_count = reader.read_count("bump count")?;
        let mut bumps = Vec::with_capacity(bump_count);
        for _ in 0..bump_count {
            bumps.push(MerklePath::read(&mut reader)?);
        }

        let tx_count = reader.read_count("transaction count")?;
        let mut transactions = Vec::with_capacity(tx_count);
        for _ in 0..tx_count {
            let entry = if version == BEEF_V2 {
                read_v2_entry(&mut reader)?
            } else {
                read_v1_entry(&mut reader)?
            };
            if let Some(index) = entry.bump_index {
                if index >= bumps.len() {
                    return Err(BeefError::Malformed(format!(
                        "bump index {} out of range ({} bumps)",
                        index,
                        bumps.len()
                    )));
                }
            }
            transactions.push(entry);
        }

        if !reader.is_empty() {
            return Err(BeefError::Malformed(format!(
                "{} trailing bytes",
                reader.remaining()
            )));
        }

        let beef = Self {
            version,
            bumps,
            transactions,
            atomic_txid,
        };

        if let Some(txid) = &beef.atomic_txid {
            beef.find_transaction(txid)?;
        }

        Ok(beef)
    }

    /// Serialise in `self.version`, prefixed when `atomic_txid` is set
    pub fn to_bytes(&self) -> BeefResult<Vec<u8>> {
        let mut out = Vec::new();
        if let Some(txid) = &self.atomic_txid {
            out.extend(serialize(&ATOMIC_BEEF));
            out.extend(serialize(txid));
        }
        out.extend(serialize(&self.version));

        out.extend(serialize(&VarInt(self.bumps.len() as u64)));
        for bump in &self.bumps {
            bump.write(&mut out);
        }

        out.extend(serialize(&VarInt(self.transactions.len() as u64)));
        for entry in &self.transactions {
            match (&entry.transaction, self.version) {
                (Some(tx), BEEF_V2) => match entry.bump_index {
                    Some(index) => {
                        out.push(FORMAT_RAW_TX_AND_BUMP);
                        out.extend(serialize(&VarInt(index as u64)));
                        out.extend(serialize(tx));
                    }
                    None => {
                        out.push(FORMAT_RAW_TX);
                        out.extend(serialize(tx));
                    }
                },
                (Some(tx), _) => {
                    out.extend(serialize(tx));
                    match entry.bump_index {
                        Some(index) => {
                            out.push(1);
                            out.extend(serialize(&VarInt(index as u64)));
                        }
                        None => out.push(0),
                    }
                }
                (None, BEEF_V2) => {
                    out.push(FORMAT_TXID_ONLY);
                    out.extend(serialize(&entry.txid));
                }
                (None, _) => {
                    return Err(BeefError::Malformed(format!(
                        "txid-only entry {} requires BEEF V2",
                        entry.txid
                    )))
                }
            }
        }

        Ok(out)
    }

    /// Append a full transaction, returning its txid
    pub fn push_transaction(&mut self, tx: Transaction, bump_index: Option<usize>) -> Txid {
        let txid = tx.compute_txid();
        self.transactions.push(BeefTx {
            txid,
            transaction: Some(tx),
            bump_index,
        });
        txid
    }

    /// Append a known-but-omitted transaction (V2 only)
    pub fn push_txid_only(&mut self, txid: Txid) {
        self.transactions.push(BeefTx {
            txid,
            transaction: None,
            bump_index: None,
        });
    }

    /// Append a merkle path, returning its index
    pub fn push_bump(&mut self, bump: MerklePath) -> usize {
        self.bumps.push(bump);
        self.bumps.len() - 1
    }

    /// Full transaction carried under `txid`
    pub fn find_transaction(&self, txid: &Txid) -> BeefResult<&Transaction> {
        self.transactions
            .iter()
            .find(|entry| &entry.txid == txid)
            .and_then(|entry| entry.transaction.as_ref())
            .ok_or_else(|| BeefError::TransactionNotFound {
                txid: txid.to_string(),
            })
    }

    /// Subject transaction and its txid
    pub fn anchor(&self) -> BeefResult<(&Transaction, Txid)> {
        let txid = match &self.atomic_txid {
            Some(txid) => *txid,
            None => self.transactions.last().ok_or(BeefError::Empty)?.txid,
        };
        Ok((self.find_transaction(&txid)?, txid))
    }

    /// Output spent by input `input_index` of `tx`
    pub fn resolve_source_output(&self, tx: &Transaction, input_index: u32) -> BeefResult<&TxOut> {
        let input = tx
            .input
            .get(input_index as usize)
            .ok_or(BeefError::InputOutOfRange {
                index: input_index,
                count: tx.input.len(),
            })?;
        let outpoint = input.previous_output;
        let source = self.find_transaction(&outpoint.txid)?;
        source
            .output
            .get(outpoint.vout as usize)
            .ok_or_else(|| BeefError::OutputOutOfRange {
                txid: outpoint.txid.to_string(),
                index: outpoint.vout,
            })
    }

    /// Merkle root proven for each transaction that carries a bump
    pub fn proven_roots(&self) -> BeefResult<Vec<(Txid, u32, [u8; 32])>> {
        let mut roots = Vec::new();
        for entry in &self.transactions {
            if let Some(index) = entry.bump_index {
                let bump = self.bumps.get(index).ok_or_else(|| {
                    BeefError::Malformed(format!("bump index {} out of range", index))
                })?;
                roots.push((entry.txid, bump.block_height, bump.compute_root(&entry.txid)?));
            }
        }
        Ok(roots)
    }
}

fn read_v1_entry(reader: &mut Reader<'_>) -> BeefResult<BeefTx> {
    let tx = reader.read::<Transaction>("transaction")?;
    let bump_index = match reader.read::<u8>("bump flag")? {
        0 => None,
        _ => Some(reader.read_varint("bump index")? as usize),
    };
    Ok(BeefTx {
        txid: tx.compute_txid(),
        transaction: Some(tx),
        bump_index,
    })
}

fn read_v2_entry(reader: &mut Reader<'_>) -> BeefResult<BeefTx> {
    match reader.read::<u8>("transaction format")? {
        FORMAT_TXID_ONLY => {
            let txid = Txid::from_byte_array(reader.read::<[u8; 32]>("txid")?);
            Ok(BeefTx {
                txid,
                transaction: None,
                bump_index: None,
            })
        }
        format @ (FORMAT_RAW_TX | FORMAT_RAW_TX_AND_BUMP) => {
            let bump_index = if format == FORMAT_RAW_TX_AND_BUMP {
                Some(reader.read_varint("bump index")? as usize)
            } else {
                None
            };
            let tx = reader.read::<Transaction>("transaction")?;
            Ok(BeefTx {
                txid: tx.compute_txid(),
                transaction: Some(tx),
                bump_index,
            })
        }
        other => Err(BeefError::Malformed(format!(
            "unknown transaction format {}",
            other
        ))),
    }
}
