//! Gas price, budget and payment
//!
//! Budget formula (all terms in MIST, computed in `i128`):
//!
//! ```text
//! base   = computation + price * safe_overhead
//! budget = max(base + storage - rebate, base)
//! ```

use crate::config::GasConfig;
use crate::error::{SuiError, SuiResult};
use crate::rpc::{GasCostSummary, SuiRpc};
use crate::types::{Digest, ObjectRef, SuiAddress};
use crate::{log_debug, log_warn};

/// Parsed gas cost numbers from a dry run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasCost {
    pub computation_cost: u64,
    pub storage_cost: u64,
    pub storage_rebate: u64,
}

fn parse_field(field: &str, value: &str) -> SuiResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| SuiError::invalid_field(field, value))
}

impl GasCost {
    pub fn from_summary(summary: &GasCostSummary) -> SuiResult<Self> {
        Ok(Self {
            computation_cost: parse_field("computationCost", &summary.computation_cost)?,
            storage_cost: parse_field("storageCost", &summary.storage_cost)?,
            storage_rebate: parse_field("storageRebate", &summary.storage_rebate)?,
        })
    }
}

/// Budget covering `cost` at `gas_price` plus `safe_overhead` units
pub fn compute_gas_budget(cost: &GasCost, gas_price: u64, safe_overhead: u64) -> SuiResult<u64> {
    let base = i128::from(cost.computation_cost) + i128::from(gas_price) * i128::from(safe_overhead);
    let with_storage = base + i128::from(cost.storage_cost) - i128::from(cost.storage_rebate);
    let budget = with_storage.max(base);
    u64::try_from(budget).map_err(|_| SuiError::invalid_field("gasBudget", budget.to_string()))
}

/// Reference price plus the configured bump
pub fn default_gas_price<R: SuiRpc + ?Sized>(rpc: &R, config: &GasConfig) -> SuiResult<u64> {
    let reference = rpc.get_reference_gas_price()?;
    Ok(reference.saturating_add(config.gas_price_bump))
}

/// Every gas coin owned by `owner`, capped at `max_payment_coins`
pub fn select_gas_payment<R: SuiRpc + ?Sized>(
    rpc: &R,
    owner: &SuiAddress,
    config: &GasConfig,
) -> SuiResult<Vec<ObjectRef>> {
    let mut payment = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = rpc.get_coins(
            owner,
            Some(&config.gas_coin_type),
            cursor.as_deref(),
            Some(config.coin_page_limit),
        )?;

        for coin in &page.data {
            if payment.len() >= config.max_payment_coins {
                break;
            }
            let digest = Digest::from_base58(&coin.digest)?;
            payment.push(ObjectRef::new(coin.coin_object_id, coin.version, digest));
        }

        if payment.len() >= config.max_payment_coins {
            log_warn!(
                "gas",
                "Gas payment truncated to protocol limit",
                owner = owner,
                limit = config.max_payment_coins
            );
            break;
        }
        match page.next_cursor {
            Some(next) if page.has_next_page => cursor = Some(next),
            _ => break,
        }
    }

    if payment.is_empty() {
        return Err(SuiError::NoGasCoins(owner.to_hex()));
    }
    log_debug!("gas", "Selected gas payment", owner = owner, coins = payment.len());
    Ok(payment)
}
