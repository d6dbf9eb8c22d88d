//! Contabilidade do token de liquidez: todo coin LP emitido soma ao
//! `total_lp_supply` do par e todo burn subtrai.

use super::coin::{Coin, Recipient, SentCoin};
use super::error::Result;
use super::error_catalog::AmmErrorCode;
use super::math::checked_add;
use super::pair::Pair;
use crate::amm_err;

/// Emite `amount` shares do par para `recipient`.
pub fn mint(pair: &mut Pair, amount: u128, recipient: Recipient) -> Result<SentCoin> {
    pair.total_lp_supply = checked_add(pair.total_lp_supply, amount)?;
    let coin = Coin::new(pair.lp_token_id, amount, pair.issue_nonce());
    Ok(SentCoin { recipient, coin })
}

/// Soma ao supply sem emitir coin: shares travadas para sempre.
pub fn lock(pair: &mut Pair, amount: u128) -> Result<()> {
    pair.total_lp_supply = checked_add(pair.total_lp_supply, amount)?;
    Ok(())
}

/// Queima um coin LP do par.
pub fn burn(pair: &mut Pair, coin: &Coin) -> Result<()> {
    coin.expect_color(&pair.lp_token_id)?;
    pair.total_lp_supply = pair.total_lp_supply.checked_sub(coin.value).ok_or_else(|| {
        amm_err!(
            AmmErrorCode::InsufficientLiquidity,
            supply => pair.total_lp_supply,
            burn => coin.value,
        )
    })?;
    Ok(())
}
