//! Solana helpers used by the browser-wallet connectors.
//!
//! The wallet signs and submits; this crate only describes what to sign:
//! public keys, System Program and SPL Token instructions, associated token
//! accounts, and the legacy message wire format. Like the rest of the
//! workspace it avoids `solana-sdk` and works on plain byte arrays.

pub mod address;
pub mod error;
pub mod spl_token;
pub mod system;
pub mod transaction;
pub mod units;

pub use address::{Blockhash, Pubkey};
pub use error::SolError;
pub use spl_token::{
    build_create_associated_token_account, build_spl_transfer, derive_associated_token_address,
    ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use system::{build_system_transfer, SYSTEM_PROGRAM_ID};
pub use transaction::{
    encode_compact_u16, AccountMeta, CompiledInstruction, Instruction, Message, Transaction,
};
pub use units::{format_lamports, parse_sol, LAMPORTS_PER_SOL};
