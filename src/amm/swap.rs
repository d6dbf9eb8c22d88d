//! Curva de preço (CPMM x·y=k) e transições de swap.
//! - get_amount_out: `floor(in·f·R_out / (R_in·D + in·f))`, taxa `f/D` sobre o input
//! - get_amount_in: inverso algébrico, `floor(R_in·out·D / ((R_out−out)·f)) + 1`
//! - quote: proporção pura, sem taxa (usado para liquidez)
//!
//! Produtos intermediários em U256 checados; toda divisão passa pelo
//! witness verificado. Depois de cada swap o invariante k é reconferido em
//! U512, sem arredondamento.

use tracing::{debug, error};

use super::coin::{split_coin, Coin, QualifiedCoin, Recipient, SentCoin, TokenColor};
use super::config::FeeRate;
use super::error::Result;
use super::error_catalog::AmmErrorCode;
use super::guardrails::{ensure_nonzero, ensure_reserves};
use super::identity::{pair_id, PairId};
use super::math::{checked_add, checked_sub, mul_u128_to_u256, u256_to_u128_checked, CheckedArith};
use super::pair::Pair;
use super::registry::PairRegistry;
use super::types::{U256, U512};
use super::witness::{divide, divide_to_u128, HostWitness, WitnessSource};
use crate::{amm_bail, amm_err};

/// `amount_a * reserve_b / reserve_a` (floor).
pub fn quote(amount_a: u128, reserve_a: u128, reserve_b: u128) -> Result<u128> {
    quote_with(&HostWitness, amount_a, reserve_a, reserve_b)
}

pub fn quote_with<W: WitnessSource + ?Sized>(
    witness: &W,
    amount_a: u128,
    reserve_a: u128,
    reserve_b: u128,
) -> Result<u128> {
    ensure_nonzero(amount_a)?;
    ensure_reserves(reserve_a, reserve_b)?;
    divide_to_u128(witness, mul_u128_to_u256(amount_a, reserve_b), U256::from(reserve_a))
}

/// Quanto sai de `reserve_out` ao entrar `amount_in` (floor).
pub fn get_amount_out(amount_in: u128, reserve_in: u128, reserve_out: u128, fee: FeeRate) -> Result<u128> {
    get_amount_out_with(&HostWitness, amount_in, reserve_in, reserve_out, fee)
}

pub fn get_amount_out_with<W: WitnessSource + ?Sized>(
    witness: &W,
    amount_in: u128,
    reserve_in: u128,
    reserve_out: u128,
    fee: FeeRate,
) -> Result<u128> {
    if amount_in == 0 {
        amm_bail!(AmmErrorCode::InsufficientInputAmount, amount_in => amount_in);
    }
    ensure_reserves(reserve_in, reserve_out)?;

    let amount_in_with_fee = U256::from(amount_in).mul_checked(U256::from(fee.numerator()))?;
    let numerator = amount_in_with_fee.mul_checked(U256::from(reserve_out))?;
    let denominator = U256::from(reserve_in)
        .mul_checked(U256::from(fee.denominator()))?
        .add_checked(amount_in_with_fee)?;
    divide_to_u128(witness, numerator, denominator)
}

/// Menor `amount_in` que entrega ao menos `amount_out`.
pub fn get_amount_in(amount_out: u128, reserve_in: u128, reserve_out: u128, fee: FeeRate) -> Result<u128> {
    get_amount_in_with(&HostWitness, amount_out, reserve_in, reserve_out, fee)
}

pub fn get_amount_in_with<W: WitnessSource + ?Sized>(
    witness: &W,
    amount_out: u128,
    reserve_in: u128,
    reserve_out: u128,
    fee: FeeRate,
) -> Result<u128> {
    if amount_out == 0 || amount_out >= reserve_out {
        amm_bail!(
            AmmErrorCode::InsufficientOutputAmount,
            amount_out => amount_out,
            reserve_out => reserve_out,
        );
    }
    ensure_reserves(reserve_in, reserve_out)?;

    let numerator = mul_u128_to_u256(reserve_in, amount_out).mul_checked(U256::from(fee.denominator()))?;
    let denominator = U256::from(reserve_out - amount_out).mul_checked(U256::from(fee.numerator()))?;
    let w = divide(witness, numerator, denominator)?;
    checked_add(u256_to_u128_checked(w.quotient)?, 1)
}

/// Confere `(R_in·D + in·f)·(R_out − out) >= R_in·R_out·D` exatamente.
///
/// Falhar aqui é defeito interno, não erro do usuário: a transição é
/// abortada e nada é persistido.
pub fn verify_k_growth(
    reserve_in: u128,
    reserve_out: u128,
    amount_in: u128,
    amount_out: u128,
    fee: FeeRate,
) -> Result<()> {
    let num = U512::from(fee.numerator());
    let den = U512::from(fee.denominator());
    let remaining_out = reserve_out
        .checked_sub(amount_out)
        .ok_or_else(|| amm_err!(AmmErrorCode::InvariantViolation, reason => "reserve drained"))?;

    // cada fator < 2^193, o produto cabe folgado em 512 bits
    let adjusted_in = U512::from(reserve_in) * den + U512::from(amount_in) * num;
    let lhs = adjusted_in * U512::from(remaining_out);
    let rhs = U512::from(reserve_in) * U512::from(reserve_out) * den;
    if lhs < rhs {
        error!(
            target: "amm",
            reserve_in, reserve_out, amount_in, amount_out,
            "constant-product invariant violated"
        );
        return Err(amm_err!(
            AmmErrorCode::InvariantViolation,
            reserve_in => reserve_in,
            reserve_out => reserve_out,
            amount_in => amount_in,
            amount_out => amount_out,
        ));
    }
    Ok(())
}

/// Swap com input exato.
#[derive(Clone, Copy, Debug)]
pub struct SwapExactIn {
    pub coin_in: QualifiedCoin,
    pub token_out: TokenColor,
    pub amount_in: u128,
    pub amount_out_min: u128,
    pub recipient: Recipient,
}

/// Swap com output exato.
#[derive(Clone, Copy, Debug)]
pub struct SwapExactOut {
    pub coin_in: QualifiedCoin,
    pub token_out: TokenColor,
    pub amount_out: u128,
    pub amount_in_max: u128,
    pub recipient: Recipient,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapOutcome {
    pub pair: PairId,
    pub amount_in: u128,
    pub amount_out: u128,
    /// Coin de `token_out` emitido para o destinatário.
    pub output: SentCoin,
    /// Troco do coin de entrada (ausente se foi consumido inteiro).
    pub change: Option<Coin>,
}

pub fn swap_exact_tokens_for_tokens<W: WitnessSource + ?Sized>(
    registry: &mut PairRegistry,
    witness: &W,
    req: SwapExactIn,
) -> Result<SwapOutcome> {
    let token_in = req.coin_in.color();
    if req.amount_in == 0 {
        amm_bail!(AmmErrorCode::InsufficientInputAmount, amount_in => req.amount_in);
    }
    let id = pair_id(token_in, req.token_out)?;
    let pair = registry.get_pair(&id)?.clone();
    let (reserve_in, reserve_out) = pair.reserves_for(&token_in)?;

    let amount_out = get_amount_out_with(witness, req.amount_in, reserve_in, reserve_out, pair.fee)?;
    if amount_out < req.amount_out_min {
        amm_bail!(
            AmmErrorCode::SlippageExceeded,
            amount_out => amount_out,
            amount_out_min => req.amount_out_min,
        );
    }
    if amount_out == 0 {
        amm_bail!(AmmErrorCode::InsufficientOutputAmount, amount_out => amount_out);
    }

    settle(registry, pair, &req.coin_in, req.amount_in, amount_out, req.recipient)
}

pub fn swap_tokens_for_exact_tokens<W: WitnessSource + ?Sized>(
    registry: &mut PairRegistry,
    witness: &W,
    req: SwapExactOut,
) -> Result<SwapOutcome> {
    let token_in = req.coin_in.color();
    let id = pair_id(token_in, req.token_out)?;
    let pair = registry.get_pair(&id)?.clone();
    let (reserve_in, reserve_out) = pair.reserves_for(&token_in)?;

    let amount_in = get_amount_in_with(witness, req.amount_out, reserve_in, reserve_out, pair.fee)?;
    if amount_in > req.amount_in_max {
        amm_bail!(
            AmmErrorCode::SlippageExceeded,
            amount_in => amount_in,
            amount_in_max => req.amount_in_max,
        );
    }

    settle(registry, pair, &req.coin_in, amount_in, req.amount_out, req.recipient)
}

/// Aplica o swap numa cópia do par e só persiste se tudo passar.
fn settle(
    registry: &mut PairRegistry,
    mut pair: Pair,
    coin_in: &QualifiedCoin,
    amount_in: u128,
    amount_out: u128,
    recipient: Recipient,
) -> Result<SwapOutcome> {
    let token_in = coin_in.color();
    let token_out = if token_in == pair.token0 { pair.token1 } else { pair.token0 };
    let split = split_coin(&coin_in.coin, amount_in)?;

    let (reserve_in, reserve_out) = pair.reserves_for(&token_in)?;
    let new_in = checked_add(reserve_in, amount_in)?;
    let new_out = checked_sub(reserve_out, amount_out)?;
    let k_check = verify_k_growth(reserve_in, reserve_out, amount_in, amount_out, pair.fee);
    debug_assert!(k_check.is_ok(), "constant-product invariant violated");
    k_check?;

    pair.set_reserves_for(&token_in, new_in, new_out);
    let output = SentCoin { recipient, coin: Coin::new(token_out, amount_out, pair.issue_nonce()) };
    let id = pair.id;

    debug!(
        target: "amm",
        pair = %id, amount_in, amount_out,
        reserve_in = new_in, reserve_out = new_out,
        "swap settled"
    );
    registry.update_pair(&id, pair)?;

    Ok(SwapOutcome {
        pair: id,
        amount_in,
        amount_out,
        output,
        change: (split.change.value > 0).then_some(split.change),
    })
}

// -------------------------
// TESTES
// -------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::coin::Nonce;
    use crate::amm::liquidity::{add_liquidity, AddLiquidity};
    use crate::amm::witness::testing::SkewedWitness;

    const FEE: FeeRate = FeeRate::DEFAULT;

    fn c(n: u8) -> TokenColor {
        let mut b = [0u8; 32];
        b[0] = n;
        TokenColor(b)
    }

    fn qc(color: TokenColor, value: u128, tag: u8) -> QualifiedCoin {
        QualifiedCoin::new(Coin::new(color, value, Nonce([tag; 32])), tag as u64)
    }

    fn pool(reserve_a: u128, reserve_b: u128) -> PairRegistry {
        let mut reg = PairRegistry::default();
        add_liquidity(
            &mut reg,
            &HostWitness,
            AddLiquidity {
                coin_a: qc(c(1), reserve_a, 1),
                coin_b: qc(c(2), reserve_b, 2),
                amount_a_desired: reserve_a,
                amount_b_desired: reserve_b,
                amount_a_min: 0,
                amount_b_min: 0,
                recipient: Recipient::default(),
            },
        )
        .unwrap();
        reg
    }

    #[test]
    fn t_amount_out_concrete_scenario() {
        // floor(100*997*1000 / (1000*1000 + 100*997)) = 90
        assert_eq!(get_amount_out(100, 1_000, 1_000, FEE).unwrap(), 90);
    }

    #[test]
    fn t_amount_out_guards() {
        assert_eq!(
            get_amount_out(0, 1_000, 1_000, FEE).unwrap_err().code,
            AmmErrorCode::InsufficientInputAmount
        );
        assert_eq!(
            get_amount_out(1, 0, 1_000, FEE).unwrap_err().code,
            AmmErrorCode::InsufficientLiquidity
        );
    }

    #[test]
    fn t_amount_out_overflow_is_reported() {
        let err = get_amount_out(u128::MAX, u128::MAX, u128::MAX, FEE).unwrap_err();
        assert_eq!(err.code, AmmErrorCode::ArithmeticOverflow);
    }

    #[test]
    fn t_amount_in_inverse() {
        let amount_in = get_amount_in(90, 1_000, 1_000, FEE).unwrap();
        assert!(get_amount_out(amount_in, 1_000, 1_000, FEE).unwrap() >= 90);
        assert!(get_amount_out(amount_in - 2, 1_000, 1_000, FEE).unwrap() < 90);
    }

    #[test]
    fn t_amount_in_cannot_drain() {
        for out in [0u128, 1_000, 1_001] {
            assert_eq!(
                get_amount_in(out, 1_000, 1_000, FEE).unwrap_err().code,
                AmmErrorCode::InsufficientOutputAmount
            );
        }
    }

    #[test]
    fn t_quote_is_proportional() {
        assert_eq!(quote(100, 400, 900).unwrap(), 225);
        assert_eq!(quote(1, 3, 1).unwrap(), 0);
        assert_eq!(quote(0, 3, 1).unwrap_err().code, AmmErrorCode::ZeroAmount);
    }

    #[test]
    fn t_tampered_witness_rejected_in_pricing() {
        let skewed = SkewedWitness { quotient_delta: 1, root_delta: 0 };
        assert_eq!(
            get_amount_out_with(&skewed, 100, 1_000, 1_000, FEE).unwrap_err().code,
            AmmErrorCode::InvalidWitness
        );
    }

    #[test]
    fn t_k_growth_check() {
        assert!(verify_k_growth(1_000, 1_000, 100, 90, FEE).is_ok());
        // 91 exige mais input do que 100 com taxa
        let err = verify_k_growth(1_000, 1_000, 100, 91, FEE).unwrap_err();
        assert_eq!(err.code, AmmErrorCode::InvariantViolation);
        assert!(verify_k_growth(1_000, 1_000, 1, 1_001, FEE).is_err());
    }

    #[test]
    fn t_swap_exact_in_updates_reserves() {
        let mut reg = pool(1_000, 1_000);
        let out = swap_exact_tokens_for_tokens(
            &mut reg,
            &HostWitness,
            SwapExactIn {
                coin_in: qc(c(1), 150, 9),
                token_out: c(2),
                amount_in: 100,
                amount_out_min: 90,
                recipient: Recipient([4u8; 32]),
            },
        )
        .unwrap();
        assert_eq!(out.amount_out, 90);
        assert_eq!(out.output.coin.color, c(2));
        assert_eq!(out.output.recipient, Recipient([4u8; 32]));
        assert_eq!(out.change.map(|ch| ch.value), Some(50));

        let pair = reg.find_pair(c(1), c(2)).unwrap();
        assert_eq!(pair.reserves_for(&c(1)).unwrap(), (1_100, 910));
        assert!(pair.k() >= U256::from(1_000_000u64));
    }

    #[test]
    fn t_swap_exact_in_slippage_leaves_state_untouched() {
        let mut reg = pool(1_000, 1_000);
        let before = reg.find_pair(c(1), c(2)).unwrap().clone();
        let err = swap_exact_tokens_for_tokens(
            &mut reg,
            &HostWitness,
            SwapExactIn {
                coin_in: qc(c(1), 100, 9),
                token_out: c(2),
                amount_in: 100,
                amount_out_min: 91,
                recipient: Recipient::default(),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, AmmErrorCode::SlippageExceeded);
        assert_eq!(reg.find_pair(c(1), c(2)).unwrap(), &before);
    }

    #[test]
    fn t_swap_exact_in_coin_too_small() {
        let mut reg = pool(1_000, 1_000);
        let err = swap_exact_tokens_for_tokens(
            &mut reg,
            &HostWitness,
            SwapExactIn {
                coin_in: qc(c(1), 99, 9),
                token_out: c(2),
                amount_in: 100,
                amount_out_min: 0,
                recipient: Recipient::default(),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, AmmErrorCode::InsufficientValue);
    }

    #[test]
    fn t_swap_exact_out() {
        let mut reg = pool(1_000, 1_000);
        let expected_in = get_amount_in(90, 1_000, 1_000, FEE).unwrap();
        let out = swap_tokens_for_exact_tokens(
            &mut reg,
            &HostWitness,
            SwapExactOut {
                coin_in: qc(c(2), 500, 9),
                token_out: c(1),
                amount_out: 90,
                amount_in_max: expected_in,
                recipient: Recipient::default(),
            },
        )
        .unwrap();
        assert_eq!(out.amount_in, expected_in);
        assert_eq!(out.output.coin.value, 90);
        assert_eq!(out.output.coin.color, c(1));
        assert_eq!(out.change.unwrap().value, 500 - expected_in);

        let err = swap_tokens_for_exact_tokens(
            &mut reg,
            &HostWitness,
            SwapExactOut {
                coin_in: qc(c(2), 500, 10),
                token_out: c(1),
                amount_out: 90,
                amount_in_max: 1,
                recipient: Recipient::default(),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, AmmErrorCode::SlippageExceeded);
    }

    #[test]
    fn t_swap_unknown_pair() {
        let mut reg = PairRegistry::default();
        let err = swap_exact_tokens_for_tokens(
            &mut reg,
            &HostWitness,
            SwapExactIn {
                coin_in: qc(c(1), 10, 1),
                token_out: c(3),
                amount_in: 10,
                amount_out_min: 0,
                recipient: Recipient::default(),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, AmmErrorCode::PairNotFound);
    }
}
