//! Agent preferences: utility functions, scoring and the fee split.
//!
//! Goods are valued with a shifted logarithmic utility and currencies with
//! a linear one. The score of a bundle is the sum of both. A transaction is
//! scored by the change it causes:
//!
//! ```text
//! score(goods, currency) = sum_g u_g * ln(q_g + QUANTITY_SHIFT)
//!                        + sum_c e_c * a_c
//! score_diff(state, tx)  = score(state.apply([tx])) - score(state)
//! ```
//!
//! Preferences are immutable once initialized.

use serde::{Deserialize, Serialize};
use tracing::warn;

use agora_types::{CurrencyHoldings, ExchangeParams, GoodHoldings, TransactionMessage, UtilityParams};

use crate::AgentError;
use crate::ownership::{OwnershipState, add_deltas};

/// Constant added to every good quantity before taking the logarithm.
pub const QUANTITY_SHIFT: i64 = 100;

/// Share of the total transaction fee charged to the sender, in percent.
pub const SENDER_TX_SHARE_PERCENT: i64 = 50;

/// Utility assigned to a good whose shifted quantity is not positive.
pub const NON_POSITIVE_QUANTITY_UTILITY: f64 = -10_000.0;

// ---------------------------------------------------------------------------
// Fee split
// ---------------------------------------------------------------------------

/// A total transaction fee split between buyer and seller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionFees {
    /// Part of the fee paid by the buyer.
    pub buyer_tx_fee: i64,
    /// Part of the fee paid by the seller.
    pub seller_tx_fee: i64,
}

/// Split `tx_fee` into buyer and seller parts.
///
/// Both parts are rounded up from their share; if together they exceed
/// the total, the seller part is reduced by one. The parts never sum to
/// more than `tx_fee` and differ by at most one.
pub fn split_tx_fees(tx_fee: i64) -> Result<TransactionFees, AgentError> {
    let buyer_tx_fee = ceil_share(tx_fee, SENDER_TX_SHARE_PERCENT)?;
    let seller_share = 100_i64
        .checked_sub(SENDER_TX_SHARE_PERCENT)
        .ok_or_else(|| AgentError::overflow("seller share"))?;
    let mut seller_tx_fee = ceil_share(tx_fee, seller_share)?;

    let total = buyer_tx_fee
        .checked_add(seller_tx_fee)
        .ok_or_else(|| AgentError::overflow("fee split total"))?;
    if total > tx_fee {
        seller_tx_fee = seller_tx_fee
            .checked_sub(1)
            .ok_or_else(|| AgentError::overflow("seller fee correction"))?;
    }
    Ok(TransactionFees {
        buyer_tx_fee,
        seller_tx_fee,
    })
}

/// `ceil(value * percent / 100)` in checked integer arithmetic.
fn ceil_share(value: i64, percent: i64) -> Result<i64, AgentError> {
    let scaled = value
        .checked_mul(percent)
        .ok_or_else(|| AgentError::overflow("fee share"))?;
    let quotient = scaled
        .checked_div_euclid(100)
        .ok_or_else(|| AgentError::overflow("fee share"))?;
    let remainder = scaled
        .checked_rem_euclid(100)
        .ok_or_else(|| AgentError::overflow("fee share"))?;
    if remainder == 0 {
        Ok(quotient)
    } else {
        quotient
            .checked_add(1)
            .ok_or_else(|| AgentError::overflow("fee share"))
    }
}

// ---------------------------------------------------------------------------
// Utility functions
// ---------------------------------------------------------------------------

/// Logarithmic utility of a good bundle.
///
/// Goods without a utility parameter contribute nothing.
#[allow(clippy::cast_precision_loss)]
pub fn logarithmic_utility(
    utility_params_by_good_id: &UtilityParams,
    quantities_by_good_id: &GoodHoldings,
    quantity_shift: i64,
) -> f64 {
    quantities_by_good_id
        .iter()
        .map(|(good_id, quantity)| {
            let param = utility_params_by_good_id.get(good_id).copied().unwrap_or(0.0);
            match quantity.checked_add(quantity_shift) {
                Some(shifted) if shifted > 0 => param * (shifted as f64).ln(),
                _ => NON_POSITIVE_QUANTITY_UTILITY,
            }
        })
        .sum()
}

/// Linear utility of a currency bundle.
///
/// Currencies without an exchange parameter contribute nothing.
#[allow(clippy::cast_precision_loss)]
pub fn linear_utility(exchange_params_by_currency: &ExchangeParams, amount_by_currency: &CurrencyHoldings) -> f64 {
    amount_by_currency
        .iter()
        .map(|(currency_id, amount)| {
            let param = exchange_params_by_currency.get(currency_id).copied().unwrap_or(0.0);
            param * (*amount as f64)
        })
        .sum()
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Exchange and utility parameters plus the agent's share of fees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    exchange_params_by_currency: Option<ExchangeParams>,
    utility_params_by_good_id: Option<UtilityParams>,
    transaction_fees: Option<TransactionFees>,
    quantity_shift: i64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}

impl Preferences {
    /// Create uninitialized preferences.
    pub const fn new() -> Self {
        Self {
            exchange_params_by_currency: None,
            utility_params_by_good_id: None,
            transaction_fees: None,
            quantity_shift: QUANTITY_SHIFT,
        }
    }

    /// Set the parameters and split `tx_fee`.
    ///
    /// Returns `Ok(false)` without changing anything when the preferences
    /// are already initialized: they are fixed for the rest of the run.
    pub fn init(
        &mut self,
        exchange_params_by_currency: ExchangeParams,
        utility_params_by_good_id: UtilityParams,
        tx_fee: i64,
        agent_name: &str,
    ) -> Result<bool, AgentError> {
        if self.is_initialized() {
            warn!(agent = agent_name, "preferences already initialized, ignoring re-initialization");
            return Ok(false);
        }
        warn!(agent = agent_name, "preferences are being initialized");
        let fees = split_tx_fees(tx_fee)?;
        self.exchange_params_by_currency = Some(exchange_params_by_currency);
        self.utility_params_by_good_id = Some(utility_params_by_good_id);
        self.transaction_fees = Some(fees);
        Ok(true)
    }

    /// Whether all parameters are present.
    pub const fn is_initialized(&self) -> bool {
        self.exchange_params_by_currency.is_some()
            && self.utility_params_by_good_id.is_some()
            && self.transaction_fees.is_some()
    }

    /// Linear utility weight per currency.
    pub const fn exchange_params_by_currency(&self) -> Result<&ExchangeParams, AgentError> {
        match &self.exchange_params_by_currency {
            Some(params) => Ok(params),
            None => Err(AgentError::NotInitialized {
                component: "exchange params",
            }),
        }
    }

    /// Logarithmic utility weight per good.
    pub const fn utility_params_by_good_id(&self) -> Result<&UtilityParams, AgentError> {
        match &self.utility_params_by_good_id {
            Some(params) => Ok(params),
            None => Err(AgentError::NotInitialized {
                component: "utility params",
            }),
        }
    }

    /// Buyer and seller fee parts.
    pub const fn transaction_fees(&self) -> Result<TransactionFees, AgentError> {
        match self.transaction_fees {
            Some(fees) => Ok(fees),
            None => Err(AgentError::NotInitialized {
                component: "transaction fees",
            }),
        }
    }

    /// Logarithmic utility of `quantities_by_good_id` under these preferences.
    pub fn logarithmic_utility(&self, quantities_by_good_id: &GoodHoldings) -> Result<f64, AgentError> {
        Ok(logarithmic_utility(
            self.utility_params_by_good_id()?,
            quantities_by_good_id,
            self.quantity_shift,
        ))
    }

    /// Linear utility of `amount_by_currency` under these preferences.
    pub fn linear_utility(&self, amount_by_currency: &CurrencyHoldings) -> Result<f64, AgentError> {
        Ok(linear_utility(self.exchange_params_by_currency()?, amount_by_currency))
    }

    /// Score of a bundle: goods utility plus currency utility.
    pub fn score(
        &self,
        quantities_by_good_id: &GoodHoldings,
        amount_by_currency: &CurrencyHoldings,
    ) -> Result<f64, AgentError> {
        let goods_score = self.logarithmic_utility(quantities_by_good_id)?;
        let currency_score = self.linear_utility(amount_by_currency)?;
        Ok(goods_score + currency_score)
    }

    /// Change in score from adding the given deltas to `state`.
    ///
    /// Only the deltas that are provided are applied; the other half of
    /// the score stays at its current value.
    pub fn marginal_utility(
        &self,
        state: &OwnershipState,
        delta_good_holdings: Option<&GoodHoldings>,
        delta_currency_holdings: Option<&CurrencyHoldings>,
    ) -> Result<f64, AgentError> {
        let goods = state.quantities_by_good_id()?;
        let amounts = state.amount_by_currency()?;
        let current_goods_score = self.logarithmic_utility(goods)?;
        let current_currency_score = self.linear_utility(amounts)?;

        let new_goods_score = match delta_good_holdings {
            Some(deltas) => self.logarithmic_utility(&add_deltas(goods, deltas)?)?,
            None => current_goods_score,
        };
        let new_currency_score = match delta_currency_holdings {
            Some(deltas) => self.linear_utility(&add_deltas(amounts, deltas)?)?,
            None => current_currency_score,
        };
        Ok(new_goods_score + new_currency_score - current_goods_score - current_currency_score)
    }

    /// Change in score from applying `tx` to `state`, fees included.
    pub fn score_diff_from_transaction(
        &self,
        state: &OwnershipState,
        tx: &TransactionMessage,
    ) -> Result<f64, AgentError> {
        let current = self.score(state.quantities_by_good_id()?, state.amount_by_currency()?)?;
        let next_state = state.apply(std::slice::from_ref(tx))?;
        let next = self.score(
            next_state.quantities_by_good_id()?,
            next_state.amount_by_currency()?,
        )?;
        Ok(next - current)
    }
}
