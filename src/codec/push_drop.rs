//! Lock-then-data-then-drop script template
//!
//! Layout: `<pubkey> OP_CHECKSIG <push_0> ... <push_n-1> OP_2DROP* OP_DROP?`
//!
//! The drops must consume exactly `n` stack items. Single-byte payloads
//! 0x01..=0x10 and 0x81 travel as small-integer opcodes and an empty payload
//! as OP_0, so the decoder maps those opcodes back to their byte values.

use crate::errors::{TokenError, TokenResult};
use bitcoin::opcodes::all::{OP_2DROP, OP_CHECKSIG, OP_DROP, OP_PUSHNUM_NEG1};
use bitcoin::opcodes::Opcode;
use bitcoin::script::{Builder, Instruction, PushBytesBuf, Script, ScriptBuf};

/// Raw pieces of a push-drop script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushDrop {
    pub locking_key: Vec<u8>,
    pub fields: Vec<Vec<u8>>,
}

/// Split a script into its locking key and data pushes
pub fn decode(script: &Script) -> TokenResult<PushDrop> {
    let instructions = script
        .instructions()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TokenError::NotPushDrop(format!("unparsable script: {}", e)))?;

    let locking_key = match instructions.first() {
        Some(Instruction::PushBytes(key)) if !key.is_empty() => key.as_bytes().to_vec(),
        _ => {
            return Err(TokenError::NotPushDrop(
                "missing locking key push".to_string(),
            ))
        }
    };

    match instructions.get(1) {
        Some(Instruction::Op(op)) if *op == OP_CHECKSIG => {}
        _ => return Err(TokenError::NotPushDrop("missing OP_CHECKSIG".to_string())),
    }

    let mut fields = Vec::new();
    let mut pos = 2;
    while let Some(instruction) = instructions.get(pos) {
        match field_bytes(instruction) {
            Some(bytes) => fields.push(bytes),
            None => break,
        }
        pos += 1;
    }

    let mut dropped = 0usize;
    for instruction in &instructions[pos..] {
        match instruction {
            Instruction::Op(op) if *op == OP_2DROP => dropped += 2,
            Instruction::Op(op) if *op == OP_DROP => dropped += 1,
            _ => {
                return Err(TokenError::NotPushDrop(
                    "unexpected instruction after data pushes".to_string(),
                ))
            }
        }
    }

    if dropped != fields.len() {
        return Err(TokenError::NotPushDrop(format!(
            "drops consume {} items but {} were pushed",
            dropped,
            fields.len()
        )));
    }

    Ok(PushDrop {
        locking_key,
        fields,
    })
}

/// Read only the locking key, ignoring whatever follows OP_CHECKSIG
pub fn locking_key(script: &Script) -> TokenResult<Vec<u8>> {
    let mut instructions = script.instructions();
    let key = match instructions.next() {
        Some(Ok(Instruction::PushBytes(key))) if !key.is_empty() => key.as_bytes().to_vec(),
        _ => {
            return Err(TokenError::NotPushDrop(
                "missing locking key push".to_string(),
            ))
        }
    };
    match instructions.next() {
        Some(Ok(Instruction::Op(op))) if op == OP_CHECKSIG => Ok(key),
        _ => Err(TokenError::NotPushDrop("missing OP_CHECKSIG".to_string())),
    }
}

/// Build a push-drop script
pub fn lock(locking_key: &[u8], fields: &[Vec<u8>]) -> TokenResult<ScriptBuf> {
    let key = PushBytesBuf::try_from(locking_key.to_vec())
        .map_err(|e| TokenError::InvalidOwnerKey(e.to_string()))?;
    let mut builder = Builder::new().push_slice(key).push_opcode(OP_CHECKSIG);

    for field in fields {
        builder = push_minimal(builder, field)?;
    }

    for _ in 0..fields.len() / 2 {
        builder = builder.push_opcode(OP_2DROP);
    }
    if fields.len() % 2 == 1 {
        builder = builder.push_opcode(OP_DROP);
    }

    Ok(builder.into_script())
}

fn push_minimal(builder: Builder, data: &[u8]) -> TokenResult<Builder> {
    match data {
        [n @ 0x01..=0x10] => Ok(builder.push_opcode(Opcode::from(0x50 + n))),
        [0x81] => Ok(builder.push_opcode(OP_PUSHNUM_NEG1)),
        _ => {
            // Empty payloads become OP_0 (a zero-length push)
            let push = PushBytesBuf::try_from(data.to_vec())
                .map_err(|e| TokenError::NotPushDrop(format!("push too large: {}", e)))?;
            Ok(builder.push_slice(push))
        }
    }
}

fn field_bytes(instruction: &Instruction<'_>) -> Option<Vec<u8>> {
    match instruction {
        Instruction::PushBytes(bytes) => Some(bytes.as_bytes().to_vec()),
        Instruction::Op(op) => match op.to_u8() {
            n @ 0x51..=0x60 => Some(vec![n - 0x50]),
            0x4f => Some(vec![0x81]),
            _ => None,
        },
    }
}
