//! # Issuance
//!
//! Mint and burn. Both change the total supply, so both are gated on the
//! caller's organization through the contract's [`IssuerPolicy`]. Tokens are
//! always minted into, and burned from, the caller's own account.
//!
//! [`IssuerPolicy`]: super::IssuerPolicy

use ledgerline_protocol::config::{BurnCheck, NULL_ACCOUNT};
use ledgerline_protocol::TxContext;
use tracing::{info, warn};

use super::events::emit_transfer;
use super::{accounts, supply, TokenContract};
use crate::error::{ContractError, ContractResult};

impl TokenContract {
    fn authorize_issuer(&self, ctx: &TxContext<'_>, action: &'static str) -> ContractResult<()> {
        let msp_id = ctx.client_identity().msp_id()?;
        if !self.issuers.is_issuer(&msp_id) {
            warn!(msp_id = %msp_id, action, "issuer check failed");
            return Err(ContractError::Unauthorized { msp_id, action });
        }
        Ok(())
    }

    /// Create `amount` new tokens in the caller's account.
    ///
    /// # Errors
    ///
    /// - [`ContractError::Unauthorized`] if the caller is not an issuer.
    /// - [`ContractError::InvalidArgument`] if `amount <= 0`.
    /// - [`ContractError::Overflow`] if the balance or supply would leave the
    ///   `i64` range.
    pub fn mint(&self, ctx: &mut TxContext<'_>, amount: i64) -> ContractResult<()> {
        self.authorize_issuer(ctx, "mint new tokens")?;
        if amount <= 0 {
            return Err(ContractError::InvalidArgument(
                "mint amount must be a positive integer".to_string(),
            ));
        }
        let minter = ctx.client_identity().id()?;

        let balance = accounts::balance_or_zero(ctx, &minter)?;
        let updated = balance
            .checked_add(amount)
            .ok_or(ContractError::Overflow("crediting minted tokens"))?;
        accounts::set_balance(ctx, &minter, updated)?;

        let total = supply::total_supply(ctx)?;
        let total_updated = total
            .checked_add(amount)
            .ok_or(ContractError::Overflow("increasing total supply"))?;
        supply::set_total_supply(ctx, total_updated)?;

        emit_transfer(ctx, NULL_ACCOUNT, &minter, amount)?;

        info!(
            minter = %minter,
            amount,
            balance = updated,
            total_supply = total_updated,
            "minted tokens"
        );
        Ok(())
    }

    /// Destroy `amount` tokens from the caller's account.
    ///
    /// With [`BurnCheck::RequireFunds`] (the default) the caller must hold at
    /// least `amount`. With [`BurnCheck::Unchecked`] the balance is debited
    /// regardless and may go negative.
    pub fn burn(&self, ctx: &mut TxContext<'_>, amount: i64) -> ContractResult<()> {
        self.authorize_issuer(ctx, "burn tokens")?;
        if amount <= 0 {
            return Err(ContractError::InvalidArgument(
                "burn amount must be a positive integer".to_string(),
            ));
        }
        let burner = ctx.client_identity().id()?;

        let balance = accounts::balance_or_zero(ctx, &burner)?;
        if self.config().burn_check == BurnCheck::RequireFunds && balance < amount {
            return Err(ContractError::InsufficientFunds {
                account: burner,
                balance,
                amount,
            });
        }
        let updated = balance
            .checked_sub(amount)
            .ok_or(ContractError::Overflow("debiting burned tokens"))?;
        accounts::set_balance(ctx, &burner, updated)?;

        let total = supply::total_supply(ctx)?;
        let total_updated = total
            .checked_sub(amount)
            .ok_or(ContractError::Overflow("decreasing total supply"))?;
        supply::set_total_supply(ctx, total_updated)?;

        // Same shape deployed consumers already parse: null account first.
        emit_transfer(ctx, NULL_ACCOUNT, &burner, amount)?;

        info!(
            burner = %burner,
            amount,
            balance = updated,
            total_supply = total_updated,
            "burned tokens"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_erc20::events::TransferEvent;
    use ledgerline_protocol::config::TokenConfig;
    use ledgerline_protocol::{MemoryState, RecordingSink, StaticIdentity, WorldState};

    #[test]
    fn mint_credits_caller_and_grows_supply() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let minter = StaticIdentity::new("minter", "Org1MSP");
        let contract = TokenContract::default();

        let mut ctx = TxContext::new(&state, &sink, &minter);
        contract.mint(&mut ctx, 1000).unwrap();
        contract.mint(&mut ctx, 500).unwrap();
        ctx.commit().unwrap();

        assert_eq!(state.get("minter").unwrap().unwrap().value, b"1500");
        assert_eq!(state.get("totalSupply").unwrap().unwrap().value, b"1500");

        let event: TransferEvent = sink.events()[0].decode().unwrap();
        assert_eq!(event.from, "0x0");
        assert_eq!(event.to, "minter");
        assert_eq!(event.value, 500);
    }

    #[test]
    fn outsiders_cannot_mint() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let outsider = StaticIdentity::new("eve", "Org2MSP");
        let mut ctx = TxContext::new(&state, &sink, &outsider);

        let err = TokenContract::default().mint(&mut ctx, 10).unwrap_err();
        assert!(matches!(
            err,
            ContractError::Unauthorized { ref msp_id, action: "mint new tokens" } if msp_id == "Org2MSP"
        ));
        assert_eq!(ctx.pending_writes(), 0);
    }

    #[test]
    fn authorization_is_checked_before_amount() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let outsider = StaticIdentity::new("eve", "Org2MSP");
        let mut ctx = TxContext::new(&state, &sink, &outsider);

        assert!(matches!(
            TokenContract::default().burn(&mut ctx, -1),
            Err(ContractError::Unauthorized { .. })
        ));
    }

    #[test]
    fn custom_issuer_list() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let bank = StaticIdentity::new("bank", "BankMSP");
        let contract = TokenContract::new(TokenConfig::default().with_issuers(["BankMSP"]));
        let mut ctx = TxContext::new(&state, &sink, &bank);

        contract.mint(&mut ctx, 5).unwrap();
        assert_eq!(accounts::balance(&mut ctx, "bank").unwrap(), 5);
    }

    #[test]
    fn burn_requires_funds_by_default() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let minter = StaticIdentity::new("minter", "Org1MSP");
        let contract = TokenContract::default();
        let mut ctx = TxContext::new(&state, &sink, &minter);

        contract.mint(&mut ctx, 10).unwrap();
        assert!(matches!(
            contract.burn(&mut ctx, 11),
            Err(ContractError::InsufficientFunds {
                balance: 10,
                amount: 11,
                ..
            })
        ));
        contract.burn(&mut ctx, 4).unwrap();
        assert_eq!(accounts::balance(&mut ctx, "minter").unwrap(), 6);
        assert_eq!(supply::total_supply(&mut ctx).unwrap(), 6);
    }

    #[test]
    fn unchecked_burn_can_go_negative() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let minter = StaticIdentity::new("minter", "Org1MSP");
        let contract =
            TokenContract::new(TokenConfig::default().with_burn_check(BurnCheck::Unchecked));
        let mut ctx = TxContext::new(&state, &sink, &minter);

        contract.burn(&mut ctx, 3).unwrap();
        assert_eq!(accounts::balance(&mut ctx, "minter").unwrap(), -3);
        assert_eq!(supply::total_supply(&mut ctx).unwrap(), -3);
    }

    #[test]
    fn supply_overflow_is_caught() {
        let state = MemoryState::new();
        state.put("totalSupply", i64::MAX.to_string().as_bytes()).unwrap();
        let sink = RecordingSink::new();
        let minter = StaticIdentity::new("minter", "Org1MSP");
        let mut ctx = TxContext::new(&state, &sink, &minter);

        assert!(matches!(
            TokenContract::default().mint(&mut ctx, 1),
            Err(ContractError::Overflow(_))
        ));
    }
}
