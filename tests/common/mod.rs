//! Common Test Utilities
//!
//! Shared builders for token scripts, transactions and BEEF envelopes, plus a
//! file-backed test database that cleans up after itself.

#![allow(dead_code)]

use bitcoin::absolute::LockTime;
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use btms_overlay::beef::{Beef, BEEF_V1};
use btms_overlay::codec;
use btms_overlay::codec::push_drop;
use btms_overlay::types::TokenFields;

/// secp256k1 generator point, compressed
pub const ALICE: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

/// 2G, compressed
pub const BOB: &str = "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5";

/// Token locking script for `fields` owned by `owner`
pub fn token_script(fields: &TokenFields, owner: &str) -> ScriptBuf {
    codec::encode(fields, &hex::decode(owner).unwrap()).unwrap()
}

/// Push-drop script with arbitrary raw fields, bypassing token validation
pub fn raw_push_drop(fields: &[&[u8]], owner: &str) -> ScriptBuf {
    let fields: Vec<Vec<u8>> = fields.iter().map(|f| f.to_vec()).collect();
    push_drop::lock(&hex::decode(owner).unwrap(), &fields).unwrap()
}

/// Script that is not a token at all
pub fn plain_script() -> ScriptBuf {
    ScriptBuf::from_bytes(vec![0x6a, 0x01, 0x2a])
}

/// Transaction spending `inputs` (a single null input when empty)
pub fn transaction(inputs: &[OutPoint], outputs: Vec<ScriptBuf>) -> Transaction {
    let inputs = if inputs.is_empty() {
        vec![OutPoint::null()]
    } else {
        inputs.to_vec()
    };

    Transaction {
        version: Version::ONE,
        lock_time: LockTime::ZERO,
        input: inputs
            .into_iter()
            .map(|previous_output| TxIn {
                previous_output,
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            })
            .collect(),
        output: outputs
            .into_iter()
            .map(|script_pubkey| TxOut {
                value: Amount::from_sat(1),
                script_pubkey,
            })
            .collect(),
    }
}

pub fn outpoint(txid: Txid, vout: u32) -> OutPoint {
    OutPoint { txid, vout }
}

/// V1 envelope carrying `ancestors` then `subject`
pub fn envelope(ancestors: &[&Transaction], subject: &Transaction) -> Vec<u8> {
    let mut beef = Beef::new(BEEF_V1);
    for tx in ancestors {
        beef.push_transaction((*tx).clone(), None);
    }
    beef.push_transaction(subject.clone(), None);
    beef.to_bytes().unwrap()
}

/// A freshly minted asset: the issuing transaction and its canonical id
///
/// Mints with identical fields share a txid, so vary amount or owner when a
/// test needs two assets.
pub struct Mint {
    pub tx: Transaction,
    pub asset_id: String,
}

impl Mint {
    pub fn new(amount: u64, metadata: Option<&str>, owner: &str) -> Self {
        Self::from_fields(&TokenFields::issuance(amount, metadata), owner)
    }

    pub fn from_fields(fields: &TokenFields, owner: &str) -> Self {
        let tx = transaction(&[], vec![token_script(fields, owner)]);
        let asset_id = format!("{}.0", tx.compute_txid());
        Self { tx, asset_id }
    }

    pub fn outpoint(&self) -> OutPoint {
        outpoint(self.tx.compute_txid(), 0)
    }
}

/// Database setup and teardown utilities
pub mod database {
    use btms_overlay::database::Database;
    use tempfile::TempDir;

    /// File-backed test database removed when dropped
    pub struct TestDatabase {
        pub db: Database,
        dir: TempDir,
    }

    impl TestDatabase {
        pub fn new() -> anyhow::Result<Self> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("index.db");
            let db = Database::new(&path.to_string_lossy())?;
            Ok(TestDatabase { db, dir })
        }

        pub fn path(&self) -> std::path::PathBuf {
            self.dir.path().join("index.db")
        }
    }
}
