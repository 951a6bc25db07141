//! # Action Rules
//!
//! `apply` is the only way ledger state changes. It is deterministic and
//! either performs every mutation of an action or none of them.

use al_01_ledger_state::{StateReader, StateView};
use shared_types::{Action, Address, Asset, AssetId, TxId, MAX_METADATA_SIZE, NATIVE_ASSET};

use crate::errors::ActionError;

/// Who is executing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    /// Id of the enclosing transaction (new assets are keyed by it).
    pub tx_id: TxId,
    /// Address that signed the transaction.
    pub signer: Address,
}

/// Applies `action` to `view`. On error the view is left exactly as it was.
pub fn apply(action: &Action, ctx: &AuthContext, view: &mut StateView) -> Result<(), ActionError> {
    let checkpoint = view.checkpoint();
    let outcome = match action {
        Action::CreateAsset { metadata } => create_asset(metadata, ctx, view),
        Action::MintAsset { to, asset, value } => mint_asset(to, asset, *value, ctx, view),
        Action::Transfer { to, asset, value } => transfer(to, asset, *value, ctx, view),
    };
    if outcome.is_err() {
        view.revert_to(checkpoint);
    }
    outcome
}

fn create_asset(metadata: &[u8], ctx: &AuthContext, view: &mut StateView) -> Result<(), ActionError> {
    if metadata.len() > MAX_METADATA_SIZE {
        return Err(ActionError::MetadataTooLarge);
    }
    let asset = Asset {
        metadata: metadata.to_vec(),
        supply: 0,
        owner: ctx.signer,
    };
    view.put_asset(&ctx.tx_id, &asset)?;
    Ok(())
}

fn mint_asset(
    to: &Address,
    asset_id: &AssetId,
    value: u64,
    ctx: &AuthContext,
    view: &mut StateView,
) -> Result<(), ActionError> {
    if value == 0 || *asset_id == NATIVE_ASSET {
        return Err(ActionError::ValueNotPopulated);
    }
    let mut asset = view.get_asset(asset_id)?.ok_or(ActionError::AssetMissing)?;
    if asset.owner != ctx.signer {
        return Err(ActionError::WrongOwner);
    }
    asset.supply = asset
        .supply
        .checked_add(value)
        .ok_or(ActionError::SupplyOverflow)?;
    view.add_balance(to, asset_id, value)?;
    view.put_asset(asset_id, &asset)?;
    Ok(())
}

fn transfer(
    to: &Address,
    asset_id: &AssetId,
    value: u64,
    ctx: &AuthContext,
    view: &mut StateView,
) -> Result<(), ActionError> {
    // A zero-value transfer is a successful no-op.
    view.sub_balance(&ctx.signer, asset_id, value)?;
    view.add_balance(to, asset_id, value)?;
    Ok(())
}
