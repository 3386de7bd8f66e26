//! SPL Token instructions and associated token accounts.

use sha2::{Digest, Sha256};

use crate::address::Pubkey;
use crate::error::SolError;
use crate::system::SYSTEM_PROGRAM_ID;
use crate::transaction::{AccountMeta, Instruction};

/// SPL Token Program: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`.
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79, 0xac,
    0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff, 0x00, 0xa9,
]);

/// Associated Token Account Program: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d, 0x83,
    0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9, 0xf8, 0x59,
]);

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// `TokenInstruction::Transfer` discriminant.
const TRANSFER_INDEX: u8 = 3;

/// SPL Token `Transfer` of `amount` base units between two token accounts,
/// authorised by `owner`.
pub fn build_spl_transfer(
    source: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Result<Instruction, SolError> {
    if amount == 0 {
        return Err(SolError::TransactionBuildError(
            "SPL transfer amount must be > 0".into(),
        ));
    }

    let mut data = Vec::with_capacity(9);
    data.push(TRANSFER_INDEX);
    data.extend_from_slice(&amount.to_le_bytes());

    Ok(Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*source, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data,
    })
}

/// Creates the associated token account `ata` of `owner` for `mint`, paid
/// for by `payer`.
pub fn build_create_associated_token_account(
    payer: &Pubkey,
    ata: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*ata, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: Vec::new(),
    }
}

/// Associated token account of `wallet` for `mint`: the PDA of
/// `[wallet, token_program, mint]` under the ATA program.
pub fn derive_associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Result<Pubkey, SolError> {
    find_program_address(
        &[wallet.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _bump)| address)
}

/// Searches bumps 255..=0 for the first seed hash that is off the Ed25519 curve.
fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8), SolError> {
    (0u8..=255)
        .rev()
        .find_map(|bump| create_program_address(seeds, bump, program_id).map(|a| (a, bump)))
        .ok_or_else(|| SolError::InvalidAddress("could not find valid PDA bump seed".into()))
}

fn create_program_address(seeds: &[&[u8]], bump: u8, program_id: &Pubkey) -> Option<Pubkey> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();
    (!is_on_curve(&hash)).then(|| Pubkey::new_from_array(hash))
}

fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}
