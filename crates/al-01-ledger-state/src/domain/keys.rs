//! Storage key layout. The first byte of every key is its namespace.

use shared_types::{Address, AssetId, BlockId, TxId};

pub const BALANCE_PREFIX: u8 = 0x00;
pub const ASSET_PREFIX: u8 = 0x01;
pub const RECEIPT_PREFIX: u8 = 0x02;
pub const BLOCK_PREFIX: u8 = 0x03;
pub const LAST_ACCEPTED_KEY: [u8; 1] = [0x04];
pub const HEIGHT_PREFIX: u8 = 0x05;

const BALANCE_KEY_LEN: usize = 1 + 32 + 32;

fn prefixed(prefix: u8, parts: &[&[u8]]) -> Vec<u8> {
    let len = 1 + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.push(prefix);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

/// `0x00 | address | asset`
pub fn balance_key(address: &Address, asset: &AssetId) -> Vec<u8> {
    prefixed(BALANCE_PREFIX, &[address, asset])
}

/// Splits a balance key back into `(address, asset)`.
pub fn parse_balance_key(key: &[u8]) -> Option<(Address, AssetId)> {
    if key.len() != BALANCE_KEY_LEN || key[0] != BALANCE_PREFIX {
        return None;
    }
    let address: Address = key[1..33].try_into().ok()?;
    let asset: AssetId = key[33..65].try_into().ok()?;
    Some((address, asset))
}

/// `0x01 | asset`
pub fn asset_key(asset: &AssetId) -> Vec<u8> {
    prefixed(ASSET_PREFIX, &[asset])
}

/// Asset id of an asset key.
pub fn parse_asset_key(key: &[u8]) -> Option<AssetId> {
    if key.len() != 33 || key[0] != ASSET_PREFIX {
        return None;
    }
    key[1..].try_into().ok()
}

/// `0x02 | tx id`
pub fn receipt_key(tx_id: &TxId) -> Vec<u8> {
    prefixed(RECEIPT_PREFIX, &[tx_id])
}

/// `0x03 | block id`
pub fn block_key(block_id: &BlockId) -> Vec<u8> {
    prefixed(BLOCK_PREFIX, &[block_id])
}

/// `0x05 | height (big-endian)`
pub fn height_key(height: u64) -> Vec<u8> {
    prefixed(HEIGHT_PREFIX, &[&height.to_be_bytes()])
}
