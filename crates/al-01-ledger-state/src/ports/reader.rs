use shared_types::codec::{self, MAX_TRANSACTION_SIZE};
use shared_types::{Address, Asset, AssetId};

use crate::domain::keys::{asset_key, balance_key};
use crate::domain::StateError;
use crate::ports::database::KeyValueStore;

/// Read access to ledger state, durable or speculative.
pub trait StateReader {
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;

    /// Balance of `address` in `asset`; absent entries read as zero.
    fn get_balance(&self, address: &Address, asset: &AssetId) -> Result<u64, StateError> {
        let key = balance_key(address, asset);
        match self.get_raw(&key)? {
            None => Ok(0),
            Some(bytes) => decode_balance(&key, &bytes),
        }
    }

    fn get_asset(&self, asset: &AssetId) -> Result<Option<Asset>, StateError> {
        match self.get_raw(&asset_key(asset))? {
            None => Ok(None),
            Some(bytes) => Ok(Some(codec::decode(&bytes, MAX_TRANSACTION_SIZE)?)),
        }
    }
}

impl StateReader for dyn KeyValueStore {
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.get(key)
    }
}

pub(crate) fn decode_balance(key: &[u8], bytes: &[u8]) -> Result<u64, StateError> {
    let raw: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StateError::corrupt(key, "balance is not 8 bytes"))?;
    Ok(u64::from_be_bytes(raw))
}
