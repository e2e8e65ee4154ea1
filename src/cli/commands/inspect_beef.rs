use crate::beef::merkle_path::display_hex;
use crate::beef::{Beef, ATOMIC_BEEF, BEEF_V1};
use crate::cli::commands::{read_envelope, EnvelopeEncoding};
use crate::codec;
use crate::errors::AppResult;
use clap::Args;
use std::path::PathBuf;

/// Describe the contents of a BEEF envelope
#[derive(Args)]
pub struct InspectBeefCommand {
    /// Path to the BEEF envelope
    #[arg(long)]
    pub beef: PathBuf,

    /// Envelope file encoding
    #[arg(long, value_enum, default_value_t = EnvelopeEncoding::Binary)]
    pub encoding: EnvelopeEncoding,
}

impl InspectBeefCommand {
    pub fn run(&self) -> AppResult<()> {
        let bytes = read_envelope(&self.beef, self.encoding)?;
        let beef = Beef::from_bytes(&bytes)?;
        let (_, anchor) = beef.anchor()?;

        let version = if beef.version == BEEF_V1 { "V1" } else { "V2" };
        println!("=== BEEF {} ===", version);
        if beef.atomic_txid.is_some() {
            println!("Atomic prefix: 0x{:08x}", ATOMIC_BEEF);
        }
        println!("Anchor: {}", anchor);
        println!("Merkle paths: {}", beef.bumps.len());
        println!("Transactions: {}", beef.transactions.len());

        for (position, entry) in beef.transactions.iter().enumerate() {
            let proof = entry
                .bump_index
                .map(|index| format!("bump #{}", index))
                .unwrap_or_else(|| "unproven".to_string());
            match &entry.transaction {
                Some(tx) => {
                    println!(
                        "  [{}] {} ({} in, {} out, {})",
                        position,
                        entry.txid,
                        tx.input.len(),
                        tx.output.len(),
                        proof
                    );
                    for (index, output) in tx.output.iter().enumerate() {
                        if let Ok(token) = codec::decode(&output.script_pubkey) {
                            println!(
                                "      output {}: {} x {}",
                                index,
                                token.amount(),
                                token.canonical_asset_id(&entry.txid.to_string(), index as u32)
                            );
                        }
                    }
                }
                None => println!("  [{}] {} (txid only)", position, entry.txid),
            }
        }

        let roots = beef.proven_roots()?;
        if !roots.is_empty() {
            println!("\n=== PROVEN ROOTS ===");
            for (txid, height, root) in roots {
                println!("  {} @ {}: {}", txid, height, display_hex(&root));
            }
        }
        Ok(())
    }
}
