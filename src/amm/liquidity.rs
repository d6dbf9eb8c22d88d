//! Liquidez (CPMM): mint inicial, add e remove de shares.
//! Políticas:
//! - shares_mint: **floor** (sqrt no bootstrap, proporcional depois)
//! - amounts_out em burn: **floor**
//! - toda divisão/raiz passa pelo witness verificado
//!
//! As transições trabalham numa cópia do par; o registro só muda no fim,
//! e um par criado por uma transição que falhou é desfeito.

use tracing::debug;

use super::coin::{split_coin, Coin, QualifiedCoin, Recipient, SentCoin, TokenColor};
use super::error::Result;
use super::error_catalog::AmmErrorCode;
use super::guardrails::ensure_nonzero;
use super::identity::{pair_id, PairId};
use super::lp_token;
use super::math::{checked_add, checked_sub, mul_u128_to_u256, u256_to_u128_checked};
use super::registry::PairRegistry;
use super::swap::quote_with;
use super::types::U256;
use super::witness::{divide_to_u128, square_root, WitnessSource};
use crate::amm_bail;

/// Mint **inicial**: `floor(sqrt(a*b)) - minimum_liquidity`.
/// Retorna `(mintado, travado)`.
pub fn initial_mint<W: WitnessSource + ?Sized>(
    witness: &W,
    amount_a: u128,
    amount_b: u128,
    minimum_liquidity: u128,
) -> Result<(u128, u128)> {
    ensure_nonzero(amount_a)?;
    ensure_nonzero(amount_b)?;
    let root = square_root(witness, mul_u128_to_u256(amount_a, amount_b))?;
    let shares = u256_to_u128_checked(root)?;
    if shares <= minimum_liquidity {
        amm_bail!(
            AmmErrorCode::InsufficientLiquidity,
            liquidity => shares,
            minimum => minimum_liquidity,
        );
    }
    Ok((shares - minimum_liquidity, minimum_liquidity))
}

/// Mint em pool existente: `min(a*S/Ra, b*S/Rb)` (floor).
pub fn proportional_mint<W: WitnessSource + ?Sized>(
    witness: &W,
    amount_a: u128,
    amount_b: u128,
    reserve_a: u128,
    reserve_b: u128,
    total_supply: u128,
) -> Result<u128> {
    let by_a = divide_to_u128(witness, mul_u128_to_u256(amount_a, total_supply), U256::from(reserve_a))?;
    let by_b = divide_to_u128(witness, mul_u128_to_u256(amount_b, total_supply), U256::from(reserve_b))?;
    let shares = by_a.min(by_b);
    if shares == 0 {
        amm_bail!(AmmErrorCode::InsufficientLiquidity, liquidity => shares);
    }
    Ok(shares)
}

/// Montantes devolvidos por um burn: `R*burn/S` (floor) para cada lado.
pub fn burn_amounts<W: WitnessSource + ?Sized>(
    witness: &W,
    liquidity: u128,
    reserve_a: u128,
    reserve_b: u128,
    total_supply: u128,
) -> Result<(u128, u128)> {
    let supply = U256::from(total_supply);
    let amount_a = divide_to_u128(witness, mul_u128_to_u256(liquidity, reserve_a), supply)?;
    let amount_b = divide_to_u128(witness, mul_u128_to_u256(liquidity, reserve_b), supply)?;
    Ok((amount_a, amount_b))
}

/// Ajusta os montantes desejados à proporção atual das reservas.
pub fn optimal_amounts<W: WitnessSource + ?Sized>(
    witness: &W,
    desired: (u128, u128),
    minimum: (u128, u128),
    reserves: (u128, u128),
) -> Result<(u128, u128)> {
    let (desired_a, desired_b) = desired;
    let (reserve_a, reserve_b) = reserves;

    let b_optimal = quote_with(witness, desired_a, reserve_a, reserve_b)?;
    let (amount_a, amount_b) = if b_optimal <= desired_b {
        (desired_a, b_optimal)
    } else {
        let a_optimal = quote_with(witness, desired_b, reserve_b, reserve_a)?;
        if a_optimal > desired_a {
            amm_bail!(
                AmmErrorCode::InsufficientLiquidity,
                amount_a => a_optimal,
                amount_a_desired => desired_a,
            );
        }
        (a_optimal, desired_b)
    };

    if amount_a < minimum.0 || amount_b < minimum.1 {
        amm_bail!(
            AmmErrorCode::InsufficientLiquidity,
            amount_a => amount_a,
            amount_b => amount_b,
            amount_a_min => minimum.0,
            amount_b_min => minimum.1,
        );
    }
    Ok((amount_a, amount_b))
}

#[derive(Clone, Copy, Debug)]
pub struct AddLiquidity {
    pub coin_a: QualifiedCoin,
    pub coin_b: QualifiedCoin,
    pub amount_a_desired: u128,
    pub amount_b_desired: u128,
    pub amount_a_min: u128,
    pub amount_b_min: u128,
    pub recipient: Recipient,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddLiquidityOutcome {
    pub pair: PairId,
    pub amount_a: u128,
    pub amount_b: u128,
    /// Coin LP emitido.
    pub liquidity: SentCoin,
    pub change_a: Option<Coin>,
    pub change_b: Option<Coin>,
}

#[derive(Clone, Copy, Debug)]
pub struct RemoveLiquidity {
    pub token_a: TokenColor,
    pub token_b: TokenColor,
    /// Coin LP a queimar (valor inteiro).
    pub liquidity: QualifiedCoin,
    pub amount_a_min: u128,
    pub amount_b_min: u128,
    pub recipient: Recipient,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemoveLiquidityOutcome {
    pub pair: PairId,
    pub amount_a: SentCoin,
    pub amount_b: SentCoin,
}

pub fn add_liquidity<W: WitnessSource + ?Sized>(
    registry: &mut PairRegistry,
    witness: &W,
    req: AddLiquidity,
) -> Result<AddLiquidityOutcome> {
    let id = pair_id(req.coin_a.color(), req.coin_b.color())?;
    let created = if registry.exists(&id) {
        None
    } else {
        Some(registry.create_pair(req.coin_a.color(), req.coin_b.color())?)
    };

    let outcome = apply_add_liquidity(registry, witness, &id, &req);
    if outcome.is_err() {
        if let Some(pair) = &created {
            registry.remove_pair(pair);
            debug!(target: "amm", pair = %id, "pair creation rolled back");
        }
    }
    outcome
}

fn apply_add_liquidity<W: WitnessSource + ?Sized>(
    registry: &mut PairRegistry,
    witness: &W,
    id: &PairId,
    req: &AddLiquidity,
) -> Result<AddLiquidityOutcome> {
    ensure_nonzero(req.amount_a_desired)?;
    ensure_nonzero(req.amount_b_desired)?;
    for (coin, desired) in [(&req.coin_a, req.amount_a_desired), (&req.coin_b, req.amount_b_desired)] {
        if coin.value() < desired {
            amm_bail!(
                AmmErrorCode::InsufficientValue,
                available => coin.value(),
                requested => desired,
            );
        }
    }

    let minimum_liquidity = registry.config().minimum_liquidity;
    let mut pair = registry.get_pair(id)?.clone();
    let token_a = req.coin_a.color();
    let (reserve_a, reserve_b) = pair.reserves_for(&token_a)?;
    let bootstrap = pair.total_lp_supply == 0;

    let (amount_a, amount_b) = if bootstrap {
        if req.amount_a_desired < req.amount_a_min || req.amount_b_desired < req.amount_b_min {
            amm_bail!(
                AmmErrorCode::InsufficientLiquidity,
                amount_a => req.amount_a_desired,
                amount_b => req.amount_b_desired,
            );
        }
        (req.amount_a_desired, req.amount_b_desired)
    } else {
        optimal_amounts(
            witness,
            (req.amount_a_desired, req.amount_b_desired),
            (req.amount_a_min, req.amount_b_min),
            (reserve_a, reserve_b),
        )?
    };

    let liquidity = if bootstrap {
        let (minted, locked) = initial_mint(witness, amount_a, amount_b, minimum_liquidity)?;
        lp_token::lock(&mut pair, locked)?;
        minted
    } else {
        proportional_mint(witness, amount_a, amount_b, reserve_a, reserve_b, pair.total_lp_supply)?
    };

    let split_a = split_coin(&req.coin_a.coin, amount_a)?;
    let split_b = split_coin(&req.coin_b.coin, amount_b)?;
    pair.set_reserves_for(&token_a, checked_add(reserve_a, amount_a)?, checked_add(reserve_b, amount_b)?);
    let lp = lp_token::mint(&mut pair, liquidity, req.recipient)?;

    debug!(
        target: "amm",
        pair = %id, amount_a, amount_b, liquidity, bootstrap,
        supply = pair.total_lp_supply,
        "liquidity added"
    );
    registry.update_pair(id, pair)?;

    Ok(AddLiquidityOutcome {
        pair: *id,
        amount_a,
        amount_b,
        liquidity: lp,
        change_a: (split_a.change.value > 0).then_some(split_a.change),
        change_b: (split_b.change.value > 0).then_some(split_b.change),
    })
}

pub fn remove_liquidity<W: WitnessSource + ?Sized>(
    registry: &mut PairRegistry,
    witness: &W,
    req: RemoveLiquidity,
) -> Result<RemoveLiquidityOutcome> {
    let id = pair_id(req.token_a, req.token_b)?;
    let mut pair = registry.get_pair(&id)?.clone();
    let lp_coin = req.liquidity.coin;
    lp_coin.expect_color(&pair.lp_token_id)?;
    if lp_coin.value == 0 || lp_coin.value > pair.total_lp_supply {
        amm_bail!(
            AmmErrorCode::InsufficientLiquidity,
            liquidity => lp_coin.value,
            supply => pair.total_lp_supply,
        );
    }

    let (reserve_a, reserve_b) = pair.reserves_for(&req.token_a)?;
    let (amount_a, amount_b) =
        burn_amounts(witness, lp_coin.value, reserve_a, reserve_b, pair.total_lp_supply)?;
    if amount_a == 0 || amount_b == 0 {
        amm_bail!(
            AmmErrorCode::InsufficientLiquidity,
            amount_a => amount_a,
            amount_b => amount_b,
        );
    }
    if amount_a < req.amount_a_min || amount_b < req.amount_b_min {
        amm_bail!(
            AmmErrorCode::InsufficientOutputAmount,
            amount_a => amount_a,
            amount_b => amount_b,
            amount_a_min => req.amount_a_min,
            amount_b_min => req.amount_b_min,
        );
    }

    lp_token::burn(&mut pair, &lp_coin)?;
    pair.set_reserves_for(
        &req.token_a,
        checked_sub(reserve_a, amount_a)?,
        checked_sub(reserve_b, amount_b)?,
    );
    let out_a = SentCoin {
        recipient: req.recipient,
        coin: Coin::new(req.token_a, amount_a, pair.issue_nonce()),
    };
    let out_b = SentCoin {
        recipient: req.recipient,
        coin: Coin::new(req.token_b, amount_b, pair.issue_nonce()),
    };

    debug!(
        target: "amm",
        pair = %id, amount_a, amount_b, burned = lp_coin.value,
        supply = pair.total_lp_supply,
        "liquidity removed"
    );
    registry.update_pair(&id, pair)?;

    Ok(RemoveLiquidityOutcome { pair: id, amount_a: out_a, amount_b: out_b })
}
