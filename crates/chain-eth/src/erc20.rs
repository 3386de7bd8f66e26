use alloy_primitives::{Address, U256};

use crate::abi::{decode_uint256, encode_function_call, AbiParam};
use crate::error::EthError;

/// `transfer(address,uint256)`
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// `balanceOf(address)`
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// `decimals()`
pub const DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// Calldata for `transfer(to, amount)`; `amount` is in token base units.
pub fn encode_transfer(to: &Address, amount: U256) -> Vec<u8> {
    encode_function_call(
        TRANSFER_SELECTOR,
        &[AbiParam::Address(*to), AbiParam::Uint256(amount)],
    )
}

/// Calldata for `balanceOf(owner)`.
pub fn encode_balance_of(owner: &Address) -> Vec<u8> {
    encode_function_call(BALANCE_OF_SELECTOR, &[AbiParam::Address(*owner)])
}

/// Calldata for `decimals()`.
pub fn encode_decimals() -> Vec<u8> {
    encode_function_call(DECIMALS_SELECTOR, &[])
}

/// Decodes a `decimals()` return value.
///
/// The ABI declares `uint8`, so anything wider means the contract is not an
/// ERC-20 token.
pub fn decode_decimals(data: &[u8]) -> Result<u8, EthError> {
    let value = decode_uint256(data)?;
    let word = value.to_be_bytes::<32>();
    if word[..31].iter().any(|b| *b != 0) {
        return Err(EthError::EncodingError(format!(
            "decimals out of range: {value}"
        )));
    }
    Ok(word[31])
}

/// Decodes a `balanceOf()` return value.
pub fn decode_balance(data: &[u8]) -> Result<U256, EthError> {
    decode_uint256(data)
}
