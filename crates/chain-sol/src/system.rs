use crate::address::Pubkey;
use crate::transaction::{AccountMeta, Instruction};

/// System Program: `11111111111111111111111111111111`.
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// `SystemInstruction::Transfer` discriminant (u32 LE).
const TRANSFER_INDEX: u32 = 2;

/// Native SOL transfer of `lamports` from `from` (signer) to `to`.
pub fn build_system_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&TRANSFER_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    }
}
