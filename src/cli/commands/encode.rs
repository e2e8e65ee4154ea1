use crate::codec;
use crate::errors::AppResult;
use crate::types::{TokenFields, ISSUANCE_MARKER};
use clap::Args;

/// Build a token locking script
#[derive(Args)]
pub struct EncodeCommand {
    /// Owner public key as hex (33 or 65 bytes)
    #[arg(long)]
    pub owner_key: String,

    /// Asset id to transfer, or ISSUE to mint
    #[arg(long, default_value = ISSUANCE_MARKER)]
    pub asset: String,

    /// Token amount
    #[arg(long)]
    pub amount: u64,

    /// Optional metadata string
    #[arg(long)]
    pub metadata: Option<String>,

    /// Optional trailing signature as hex (64 or 65 bytes)
    #[arg(long)]
    pub signature: Option<String>,
}

impl EncodeCommand {
    pub fn run(&self) -> AppResult<()> {
        let owner_key = hex::decode(&self.owner_key)?;

        let mut fields = if self.asset == ISSUANCE_MARKER {
            TokenFields::issuance(self.amount, self.metadata.as_deref())
        } else {
            TokenFields::transfer(&self.asset, self.amount, self.metadata.as_deref())
        };
        if let Some(signature) = &self.signature {
            fields = fields.with_signature(hex::decode(signature)?);
        }

        let script = codec::encode(&fields, &owner_key)?;
        println!("{}", hex::encode(script.as_bytes()));
        Ok(())
    }
}
