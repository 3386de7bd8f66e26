//! Legacy Solana transactions: instruction lists compiled into a message.
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        program_id_index u8 | compact-u16 len | indices | compact-u16 len | data
//! ```
//!
//! The wallet adapter fills in the signatures, so [`Transaction`] carries only
//! the fee payer, the blockhash and the instructions.

use crate::address::{Blockhash, Pubkey};
use crate::error::SolError;

/// Encode a `u16` in Solana's compact-u16 (7 bits per byte) format.
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut rest = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (rest & 0x7f) as u8;
        rest >>= 7;
        if rest > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if rest == 0 {
            return out;
        }
    }
}

fn compact_len(len: usize, what: &str) -> Result<Vec<u8>, SolError> {
    u16::try_from(len)
        .map(encode_compact_u16)
        .map_err(|_| SolError::SerializationError(format!("too many {what}: {len}")))
}

/// An account referenced by an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A program invocation before compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// An instruction whose accounts are indices into the message's key table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// The signed portion of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
    /// Writable signers (fee payer first), read-only signers, writable
    /// non-signers, read-only non-signers.
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Blockhash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Accounts that must sign, in signature-slot order.
    pub fn signers(&self) -> &[Pubkey] {
        let n = (self.num_required_signatures as usize).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    /// Wire encoding of the message (the bytes a wallet signs).
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let mut buf = Vec::with_capacity(64 + self.account_keys.len() * 32);

        buf.push(self.num_required_signatures);
        buf.push(self.num_readonly_signed);
        buf.push(self.num_readonly_unsigned);

        buf.extend_from_slice(&compact_len(self.account_keys.len(), "accounts")?);
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_bytes());
        }

        buf.extend_from_slice(self.recent_blockhash.as_bytes());

        buf.extend_from_slice(&compact_len(self.instructions.len(), "instructions")?);
        for ix in &self.instructions {
            buf.push(ix.program_id_index);
            buf.extend_from_slice(&compact_len(ix.account_indices.len(), "instruction accounts")?);
            buf.extend_from_slice(&ix.account_indices);
            buf.extend_from_slice(&compact_len(ix.data.len(), "instruction data bytes")?);
            buf.extend_from_slice(&ix.data);
        }

        Ok(buf)
    }
}

/// A transaction under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub fee_payer: Option<Pubkey>,
    pub recent_blockhash: Option<Blockhash>,
    pub instructions: Vec<Instruction>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an instruction.
    pub fn add(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Appends several instructions in order.
    pub fn add_all(mut self, instructions: impl IntoIterator<Item = Instruction>) -> Self {
        self.instructions.extend(instructions);
        self
    }

    /// Compiles the instructions into a [`Message`].
    ///
    /// Requires a fee payer, a recent blockhash and at least one instruction.
    pub fn compile_message(&self) -> Result<Message, SolError> {
        let fee_payer = self.fee_payer.ok_or_else(|| {
            SolError::TransactionBuildError("transaction fee payer required".into())
        })?;
        let recent_blockhash = self.recent_blockhash.ok_or_else(|| {
            SolError::TransactionBuildError("transaction recent blockhash required".into())
        })?;
        if self.instructions.is_empty() {
            return Err(SolError::TransactionBuildError("no instructions provided".into()));
        }

        let mut metas: Vec<AccountMeta> = vec![AccountMeta::new(fee_payer, true)];
        let mut merge = |meta: &AccountMeta| {
            match metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
                Some(existing) => {
                    existing.is_signer |= meta.is_signer;
                    existing.is_writable |= meta.is_writable;
                }
                None => metas.push(meta.clone()),
            }
        };

        for ix in &self.instructions {
            for meta in &ix.accounts {
                merge(meta);
            }
            merge(&AccountMeta::new_readonly(ix.program_id, false));
        }

        // Stable: insertion order survives within each class, so the fee
        // payer stays at index 0.
        metas.sort_by_key(|m| match (m.is_signer, m.is_writable) {
            (true, true) => 0u8,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        });

        if metas.len() > u8::MAX as usize + 1 {
            return Err(SolError::TransactionBuildError(format!(
                "too many accounts: {}",
                metas.len()
            )));
        }

        // 256 keys are addressable by a u8 index, but header counts stop at 255.
        let count = |what: &str, f: fn(&AccountMeta) -> bool| -> Result<u8, SolError> {
            let n = metas.iter().filter(|m| f(m)).count();
            u8::try_from(n).map_err(|_| {
                SolError::TransactionBuildError(format!("too many {what} accounts: {n}"))
            })
        };
        let num_required_signatures = count("signer", |m| m.is_signer)?;
        let num_readonly_signed = count("readonly signer", |m| m.is_signer && !m.is_writable)?;
        let num_readonly_unsigned =
            count("readonly unsigned", |m| !m.is_signer && !m.is_writable)?;

        let account_keys: Vec<Pubkey> = metas.iter().map(|m| m.pubkey).collect();
        let index_of = |key: &Pubkey| -> Result<u8, SolError> {
            account_keys
                .iter()
                .position(|k| k == key)
                .map(|i| i as u8)
                .ok_or_else(|| {
                    SolError::TransactionBuildError(format!("account {key} missing from key table"))
                })
        };

        let instructions = self
            .instructions
            .iter()
            .map(|ix| {
                Ok(CompiledInstruction {
                    program_id_index: index_of(&ix.program_id)?,
                    account_indices: ix
                        .accounts
                        .iter()
                        .map(|m| index_of(&m.pubkey))
                        .collect::<Result<_, _>>()?,
                    data: ix.data.clone(),
                })
            })
            .collect::<Result<Vec<_>, SolError>>()?;

        Ok(Message {
            num_required_signatures,
            num_readonly_signed,
            num_readonly_unsigned,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }

    /// Wire encoding with zeroed signature slots, the form wallets accept for
    /// `signTransaction` / `signAndSendTransaction`.
    pub fn serialize_unsigned(&self) -> Result<Vec<u8>, SolError> {
        let message = self.compile_message()?;
        let body = message.serialize()?;
        let slots = message.num_required_signatures as usize;

        let mut wire = compact_len(slots, "signatures")?;
        wire.resize(wire.len() + slots * 64, 0);
        wire.extend_from_slice(&body);
        Ok(wire)
    }
}
