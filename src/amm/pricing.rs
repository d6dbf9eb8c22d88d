//! Utilitários para UI/roteadores: spot price, preço de execução, impacto e
//! cotações com tolerância. Só leitura; não mexem em estado.
//!
//! Preços em WAD (1e18) com divisão nearest-even; tolerâncias em bps.

use super::coin::TokenColor;
use super::config::FeeRate;
use super::error::Result;
use super::guardrails::{ceil_div_u256, div_nearest_even_u256, div_nearest_even_u256_to_u128, ensure_nonzero, ensure_reserves};
use super::math::{mul_u128_to_u256, u256_to_u128_checked};
use super::pair::Pair;
use super::swap::get_amount_out;
use super::types::{Amount, BPS_SCALE, U256, WAD};

// --------- Spot price ---------
/// Preço à vista de 1 unidade de entrada em unidades de saída: `R_out/R_in` (WAD).
pub fn spot_price(reserve_in: Amount, reserve_out: Amount) -> Result<Amount> {
    ensure_reserves(reserve_in, reserve_out)?;
    div_nearest_even_u256_to_u128(mul_u128_to_u256(reserve_out, WAD), U256::from(reserve_in))
}

/// Spot price orientado pelo token de entrada de um par.
pub fn pair_spot_price(pair: &Pair, token_in: &TokenColor) -> Result<Amount> {
    let (reserve_in, reserve_out) = pair.reserves_for(token_in)?;
    spot_price(reserve_in, reserve_out)
}

// --------- Execução e impacto ---------
/// Preço efetivo `out/in` (WAD) para um input bruto (com taxa).
pub fn execution_price(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeRate,
) -> Result<Amount> {
    ensure_nonzero(amount_in)?;
    let out = get_amount_out(amount_in, reserve_in, reserve_out, fee)?;
    div_nearest_even_u256_to_u128(mul_u128_to_u256(out, WAD), U256::from(amount_in))
}

/// Impacto relativo em **bps** de execução vs spot (sempre >= 0, teto 10_000):
/// `((spot - exec) / spot) * 1e4`
pub fn price_impact_bps(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeRate,
) -> Result<u64> {
    let spot = spot_price(reserve_in, reserve_out)?;
    let exec = execution_price(amount_in, reserve_in, reserve_out, fee)?;
    if exec >= spot || spot == 0 {
        return Ok(0);
    }
    let num = U256::from(spot - exec) * U256::from(BPS_SCALE);
    let q = u256_to_u128_checked(div_nearest_even_u256(num, U256::from(spot))?)?;
    Ok(q.min(u128::from(BPS_SCALE)) as u64)
}

// --------- Cotas com tolerância ---------
/// `amount_out_min` para uma cotação `amount_out`: `floor(out * (1 - tol))`.
/// Tolerância acima de 10_000 bps satura.
pub fn min_out_with_tolerance(amount_out: Amount, tolerance_bps: u64) -> Result<Amount> {
    let factor = BPS_SCALE - tolerance_bps.min(BPS_SCALE);
    let q = (U256::from(amount_out) * U256::from(factor)) / U256::from(BPS_SCALE);
    u256_to_u128_checked(q)
}

/// `amount_in_max` para uma cotação `amount_in`: `ceil(in * (1 + tol))`.
pub fn max_in_with_tolerance(amount_in: Amount, tolerance_bps: u64) -> Result<Amount> {
    let factor = BPS_SCALE + tolerance_bps.min(BPS_SCALE);
    u256_to_u128_checked(ceil_div_u256(U256::from(amount_in) * U256::from(factor), U256::from(BPS_SCALE)))
}
