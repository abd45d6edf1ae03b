//! # Asset Transfer Contract
//!
//! A plain record store: each asset is a JSON document kept under its raw
//! ID. The contract expects a namespace of its own, since
//! [`AssetContract::get_all_assets`] scans the whole keyspace and decodes
//! every value as an asset.

use std::fmt;
use std::str::FromStr;

use ledgerline_protocol::TxContext;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ContractError, ContractResult};
use crate::router::{expect_args, parse_float};

/// A tracked item and its current owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "ID")]
    pub id: String,
    pub owner: String,
    #[serde(rename = "itemName")]
    pub item_name: String,
    pub description: String,
    #[serde(rename = "appraisedValue")]
    pub appraised_value: f32,
}

impl Asset {
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        item_name: impl Into<String>,
        description: impl Into<String>,
        appraised_value: f32,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            item_name: item_name.into(),
            description: description.into(),
            appraised_value,
        }
    }
}

/// Stateless asset contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetContract;

impl AssetContract {
    pub fn new() -> Self {
        Self
    }

    /// Seed the ledger with the starter asset set.
    pub fn init_ledger(&self, ctx: &mut TxContext<'_>) -> ContractResult<()> {
        let assets = [Asset::new(
            "asset1",
            "DriverCompany",
            "Chocolate Bars",
            "Deliver to shipment company, 100 bars",
            500.0,
        )];
        for asset in &assets {
            store(ctx, asset)?;
        }
        info!(count = assets.len(), "initialised asset ledger");
        Ok(())
    }

    /// Store a new asset.
    ///
    /// # Errors
    ///
    /// [`ContractError::AssetExists`] if the ID is taken.
    pub fn create_asset(&self, ctx: &mut TxContext<'_>, asset: Asset) -> ContractResult<()> {
        if self.asset_exists(ctx, &asset.id)? {
            return Err(ContractError::AssetExists(asset.id));
        }
        store(ctx, &asset)?;
        info!(id = %asset.id, owner = %asset.owner, "asset created");
        Ok(())
    }

    pub fn read_asset(&self, ctx: &mut TxContext<'_>, id: &str) -> ContractResult<Asset> {
        let raw = ctx
            .get_state(id)?
            .ok_or_else(|| ContractError::AssetNotFound(id.to_string()))?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Replace an existing asset wholesale.
    pub fn update_asset(&self, ctx: &mut TxContext<'_>, asset: Asset) -> ContractResult<()> {
        if !self.asset_exists(ctx, &asset.id)? {
            return Err(ContractError::AssetNotFound(asset.id));
        }
        store(ctx, &asset)?;
        debug!(id = %asset.id, "asset updated");
        Ok(())
    }

    pub fn delete_asset(&self, ctx: &mut TxContext<'_>, id: &str) -> ContractResult<()> {
        if !self.asset_exists(ctx, id)? {
            return Err(ContractError::AssetNotFound(id.to_string()));
        }
        ctx.del_state(id)?;
        info!(id, "asset deleted");
        Ok(())
    }

    pub fn asset_exists(&self, ctx: &mut TxContext<'_>, id: &str) -> ContractResult<bool> {
        Ok(ctx.get_state(id)?.is_some())
    }

    /// Hand an asset to `new_owner`. Other fields are untouched.
    pub fn transfer_asset(
        &self,
        ctx: &mut TxContext<'_>,
        id: &str,
        new_owner: &str,
    ) -> ContractResult<()> {
        let mut asset = self.read_asset(ctx, id)?;
        let previous = std::mem::replace(&mut asset.owner, new_owner.to_string());
        store(ctx, &asset)?;
        info!(id, from = %previous, to = new_owner, "asset transferred");
        Ok(())
    }

    /// Every asset in the namespace, ordered by ID.
    pub fn get_all_assets(&self, ctx: &mut TxContext<'_>) -> ContractResult<Vec<Asset>> {
        ctx.state_by_range("", "")?
            .map(|(_, raw)| serde_json::from_slice::<Asset>(&raw).map_err(ContractError::from))
            .collect()
    }

    /// Dispatch a string-encoded invocation. Assets come back as JSON,
    /// `AssetExists` as `true`/`false`, mutations as empty output.
    pub fn invoke(
        &self,
        ctx: &mut TxContext<'_>,
        function: &str,
        args: &[&str],
    ) -> ContractResult<Vec<u8>> {
        let method: AssetMethod = function.parse()?;
        debug!(tx_id = %ctx.tx_id(), method = %method, "invoking asset contract");

        match method {
            AssetMethod::InitLedger => {
                expect_args::<0>(function, args)?;
                self.init_ledger(ctx)?;
                Ok(Vec::new())
            }
            AssetMethod::CreateAsset => {
                let asset = asset_from_args(function, args)?;
                self.create_asset(ctx, asset)?;
                Ok(Vec::new())
            }
            AssetMethod::ReadAsset => {
                let [id] = expect_args::<1>(function, args)?;
                Ok(serde_json::to_vec(&self.read_asset(ctx, id)?)?)
            }
            AssetMethod::UpdateAsset => {
                let asset = asset_from_args(function, args)?;
                self.update_asset(ctx, asset)?;
                Ok(Vec::new())
            }
            AssetMethod::DeleteAsset => {
                let [id] = expect_args::<1>(function, args)?;
                self.delete_asset(ctx, id)?;
                Ok(Vec::new())
            }
            AssetMethod::AssetExists => {
                let [id] = expect_args::<1>(function, args)?;
                Ok(self.asset_exists(ctx, id)?.to_string().into_bytes())
            }
            AssetMethod::TransferAsset => {
                let [id, new_owner] = expect_args::<2>(function, args)?;
                self.transfer_asset(ctx, id, new_owner)?;
                Ok(Vec::new())
            }
            AssetMethod::GetAllAssets => {
                expect_args::<0>(function, args)?;
                Ok(serde_json::to_vec(&self.get_all_assets(ctx)?)?)
            }
        }
    }
}

fn store(ctx: &mut TxContext<'_>, asset: &Asset) -> ContractResult<()> {
    if asset.id.is_empty() {
        return Err(ContractError::InvalidArgument(
            "asset ID cannot be empty".to_string(),
        ));
    }
    ctx.put_state(&asset.id, serde_json::to_vec(asset)?)?;
    Ok(())
}

fn asset_from_args(function: &str, args: &[&str]) -> ContractResult<Asset> {
    let [id, owner, item_name, description, value] = expect_args::<5>(function, args)?;
    Ok(Asset::new(
        id,
        owner,
        item_name,
        description,
        parse_float("appraisedValue", value)?,
    ))
}

/// Methods reachable through [`AssetContract::invoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetMethod {
    InitLedger,
    CreateAsset,
    ReadAsset,
    UpdateAsset,
    DeleteAsset,
    AssetExists,
    TransferAsset,
    GetAllAssets,
}

impl AssetMethod {
    pub const ALL: [AssetMethod; 8] = [
        AssetMethod::InitLedger,
        AssetMethod::CreateAsset,
        AssetMethod::ReadAsset,
        AssetMethod::UpdateAsset,
        AssetMethod::DeleteAsset,
        AssetMethod::AssetExists,
        AssetMethod::TransferAsset,
        AssetMethod::GetAllAssets,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetMethod::InitLedger => "InitLedger",
            AssetMethod::CreateAsset => "CreateAsset",
            AssetMethod::ReadAsset => "ReadAsset",
            AssetMethod::UpdateAsset => "UpdateAsset",
            AssetMethod::DeleteAsset => "DeleteAsset",
            AssetMethod::AssetExists => "AssetExists",
            AssetMethod::TransferAsset => "TransferAsset",
            AssetMethod::GetAllAssets => "GetAllAssets",
        }
    }

    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            AssetMethod::ReadAsset | AssetMethod::AssetExists | AssetMethod::GetAllAssets
        )
    }
}

impl fmt::Display for AssetMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetMethod {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| ContractError::UnknownFunction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerline_protocol::{MemoryState, RecordingSink, StaticIdentity};

    #[test]
    fn json_uses_original_field_names() {
        let asset = Asset::new("a1", "tom", "Bike", "red", 35.0);
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["ID"], "a1");
        assert_eq!(json["itemName"], "Bike");
        assert_eq!(json["appraisedValue"], 35.0);
    }

    #[test]
    fn create_then_duplicate_fails() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let who = StaticIdentity::new("tom", "Org1MSP");
        let contract = AssetContract::new();
        let mut ctx = TxContext::new(&state, &sink, &who);

        contract
            .create_asset(&mut ctx, Asset::new("a1", "tom", "Bike", "red", 35.0))
            .unwrap();
        assert!(matches!(
            contract.create_asset(&mut ctx, Asset::new("a1", "jerry", "Car", "", 1.0)),
            Err(ContractError::AssetExists(ref id)) if id == "a1"
        ));
        assert_eq!(contract.read_asset(&mut ctx, "a1").unwrap().owner, "tom");
    }

    #[test]
    fn missing_assets_are_reported() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let who = StaticIdentity::new("tom", "Org1MSP");
        let contract = AssetContract::new();
        let mut ctx = TxContext::new(&state, &sink, &who);

        assert!(!contract.asset_exists(&mut ctx, "ghost").unwrap());
        for result in [
            contract.read_asset(&mut ctx, "ghost").map(|_| ()),
            contract.delete_asset(&mut ctx, "ghost"),
            contract.transfer_asset(&mut ctx, "ghost", "jerry"),
            contract.update_asset(&mut ctx, Asset::new("ghost", "x", "y", "z", 0.0)),
        ] {
            assert!(matches!(result, Err(ContractError::AssetNotFound(_))));
        }
    }

    #[test]
    fn delete_is_visible_within_the_transaction() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let who = StaticIdentity::new("tom", "Org1MSP");
        let contract = AssetContract::new();
        let mut ctx = TxContext::new(&state, &sink, &who);

        contract.init_ledger(&mut ctx).unwrap();
        contract.delete_asset(&mut ctx, "asset1").unwrap();
        assert!(!contract.asset_exists(&mut ctx, "asset1").unwrap());
        assert!(contract.get_all_assets(&mut ctx).unwrap().is_empty());
    }

    #[test]
    fn invoke_round_trips_json() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let who = StaticIdentity::new("tom", "Org1MSP");
        let contract = AssetContract::new();
        let mut ctx = TxContext::new(&state, &sink, &who);

        contract
            .invoke(&mut ctx, "CreateAsset", &["asset2", "tom", "Paint", "red", "50"])
            .unwrap();
        contract
            .invoke(&mut ctx, "TransferAsset", &["asset2", "jerry"])
            .unwrap();
        let raw = contract.invoke(&mut ctx, "ReadAsset", &["asset2"]).unwrap();
        let asset: Asset = serde_json::from_slice(&raw).unwrap();
        assert_eq!(asset.owner, "jerry");
        assert_eq!(asset.appraised_value, 50.0);

        assert_eq!(contract.invoke(&mut ctx, "AssetExists", &["asset2"]).unwrap(), b"true");
        assert!(matches!(
            contract.invoke(&mut ctx, "CreateAsset", &["a", "b", "c", "d", "cheap"]),
            Err(ContractError::InvalidArgument(_))
        ));
        assert!(matches!(
            contract.invoke(&mut ctx, "GetAssetHistory", &["asset2"]),
            Err(ContractError::UnknownFunction(_))
        ));
    }
}
