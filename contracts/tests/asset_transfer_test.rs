//! Integration tests for the asset transfer contract.

use std::sync::Arc;

use ledgerline_contracts::{Asset, AssetContract, ContractError, TokenContract};
use ledgerline_protocol::{Ledger, MemoryState, RecordingSink, StaticIdentity, WorldState};

fn ledger() -> (Ledger, Arc<MemoryState>) {
    let state = Arc::new(MemoryState::new());
    (
        Ledger::new(state.clone(), Arc::new(RecordingSink::new())),
        state,
    )
}

#[test]
fn full_lifecycle() -> anyhow::Result<()> {
    let (ledger, state) = ledger();
    let tom = StaticIdentity::new("tom", "Org1MSP");
    let contract = AssetContract::new();

    ledger.submit(&tom, |ctx| contract.init_ledger(ctx))?;
    ledger.submit(&tom, |ctx| {
        contract.create_asset(ctx, Asset::new("asset2", "tom", "Paint", "red", 50.0))
    })?;
    ledger.submit(&tom, |ctx| contract.transfer_asset(ctx, "asset2", "jerry"))?;
    ledger.submit(&tom, |ctx| {
        contract.update_asset(ctx, Asset::new("asset1", "DriverCompany", "Chocolate Bars", "200 bars", 900.0))
    })?;

    let all = ledger.evaluate(&tom, |ctx| contract.get_all_assets(ctx))?;
    let ids: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["asset1", "asset2"]);
    assert_eq!(all[0].appraised_value, 900.0);
    assert_eq!(all[1].owner, "jerry");

    ledger.submit(&tom, |ctx| contract.delete_asset(ctx, "asset1"))?;
    assert!(state.get("asset1")?.is_none());
    assert_eq!(state.len(), 1);
    Ok(())
}

#[test]
fn stored_documents_use_camel_case_fields() -> anyhow::Result<()> {
    let (ledger, state) = ledger();
    let tom = StaticIdentity::new("tom", "Org1MSP");
    ledger.submit(&tom, |ctx| AssetContract::new().init_ledger(ctx))?;

    let raw = state.get("asset1")?.map(|v| v.value).unwrap_or_default();
    let doc: serde_json::Value = serde_json::from_slice(&raw)?;
    assert_eq!(doc["ID"], "asset1");
    assert_eq!(doc["owner"], "DriverCompany");
    assert_eq!(doc["itemName"], "Chocolate Bars");
    assert_eq!(doc["appraisedValue"], 500.0);
    Ok(())
}

#[test]
fn duplicate_create_is_rolled_back() {
    let (ledger, state) = ledger();
    let tom = StaticIdentity::new("tom", "Org1MSP");
    let contract = AssetContract::new();

    let err = ledger
        .submit(&tom, |ctx| -> Result<(), ContractError> {
            contract.create_asset(ctx, Asset::new("a", "tom", "x", "", 1.0))?;
            contract.create_asset(ctx, Asset::new("a", "tom", "y", "", 2.0))
        })
        .unwrap_err();

    assert!(matches!(err, ContractError::AssetExists(_)));
    assert!(state.is_empty());
}

#[test]
fn asset_and_token_namespaces_are_disjoint() -> anyhow::Result<()> {
    let (assets, asset_state) = ledger();
    let (tokens, _) = ledger();
    let minter = StaticIdentity::new("asset1", "Org1MSP");

    assets.submit(&minter, |ctx| AssetContract::new().init_ledger(ctx))?;
    tokens.submit(&minter, |ctx| TokenContract::default().mint(ctx, 10))?;

    let all = assets.evaluate(&minter, |ctx| AssetContract::new().get_all_assets(ctx))?;
    assert_eq!(all.len(), 1);
    assert_eq!(asset_state.len(), 1);
    Ok(())
}

#[test]
fn wire_calls_return_json() -> anyhow::Result<()> {
    let (ledger, _) = ledger();
    let tom = StaticIdentity::new("tom", "Org1MSP");
    let contract = AssetContract::new();
    let call = |f: &str, args: &[&str]| ledger.submit(&tom, |ctx| contract.invoke(ctx, f, args));

    call("InitLedger", &[])?;
    call("CreateAsset", &["asset3", "tom", "Lamp", "blue", "70"])?;
    let all: Vec<Asset> = serde_json::from_slice(&call("GetAllAssets", &[])?)?;
    assert_eq!(all.len(), 2);
    assert_eq!(call("AssetExists", &["asset9"])?, b"false");
    assert!(matches!(
        call("ReadAsset", &[]),
        Err(ContractError::InvalidArgument(_))
    ));
    Ok(())
}
