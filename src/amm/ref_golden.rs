//! Referência de alta precisão ("goldens") baseada em **BigInt/BigRational**
//! para o CPMM (x·y=k) com taxa sobre o **input**.
//!
//! Objetivos desta referência:
//! 1. Calcular os resultados **contínuos/exatos** (sem quantização) de
//!    amountOut e amountIn.
//! 2. Servir de **oráculo** independente do core inteiro: `out_core` deve ser
//!    exatamente o floor do contínuo; `in_core` fica em `{ceil, ceil+1}`.
//! 3. Medir o desvio do invariante, `Δk/k`, do **core discreto**.
//!
//! Não entra no caminho de produção; serve para testes e geração de goldens.

use super::config::FeeRate;
use super::error::Result;
use super::error_catalog::AmmErrorCode;
use super::swap;
use super::types::Amount;
use crate::{amm_bail, amm_err};

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

// -------------------------
// Helpers de conversão
// -------------------------
#[inline]
fn bu(v: Amount) -> BigUint {
    BigUint::from(v)
}

#[inline]
fn q(v: u128) -> BigRational {
    BigRational::from_integer(BigInt::from(v))
}

#[inline]
fn fee_fraction(fee: FeeRate) -> BigRational {
    BigRational::new(BigInt::from(fee.numerator()), BigInt::from(fee.denominator()))
}

fn rat_to_u128(r: BigInt) -> Result<u128> {
    r.to_u128()
        .ok_or_else(|| amm_err!(AmmErrorCode::ArithmeticOverflow, op => "golden", width => 128))
}

// -------------------------
// Contínuo/exato (sem quantização)
// -------------------------
/// amountOut contínuo: `R_out · in·f / (R_in + in·f)`.
pub fn continuous_amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeRate,
) -> Result<BigRational> {
    if amount_in == 0 {
        amm_bail!(AmmErrorCode::InsufficientInputAmount);
    }
    if reserve_in == 0 || reserve_out == 0 {
        amm_bail!(AmmErrorCode::InsufficientLiquidity);
    }
    let in_eff = q(amount_in) * fee_fraction(fee);
    Ok(q(reserve_out) * in_eff.clone() / (q(reserve_in) + in_eff))
}

/// amountIn contínuo para obter exatamente `amount_out`: `R_in·out / ((R_out − out)·f)`.
pub fn continuous_amount_in(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeRate,
) -> Result<BigRational> {
    if amount_out == 0 || amount_out >= reserve_out {
        amm_bail!(AmmErrorCode::InsufficientOutputAmount);
    }
    if reserve_in == 0 {
        amm_bail!(AmmErrorCode::InsufficientLiquidity);
    }
    let net = q(reserve_in) * q(amount_out) / q(reserve_out - amount_out);
    Ok(net / fee_fraction(fee))
}

// -------------------------
// Estruturas de comparação (goldens)
// -------------------------
#[derive(Debug, Clone)]
pub struct RefOut {
    pub out_core: Amount,
    pub out_cont_floor: Amount,
    pub out_cont: BigRational,
    /// `(k1 − k0) / k0` com as reservas brutas (taxa inclusa).
    pub dk_over_k_core: BigRational,
}

#[derive(Debug, Clone)]
pub struct RefIn {
    pub in_core: Amount,
    pub in_cont_ceil: Amount,
    pub in_cont: BigRational,
    pub dk_over_k_core: BigRational,
}

/// Crescimento relativo de k após entrar `amount_in` e sair `amount_out`.
pub fn dk_over_k(reserve_in: Amount, reserve_out: Amount, amount_in: Amount, amount_out: Amount) -> BigRational {
    let k0 = bu(reserve_in) * bu(reserve_out);
    if k0.is_zero() {
        return BigRational::zero();
    }
    let k1 = (bu(reserve_in) + bu(amount_in)) * bu(reserve_out.saturating_sub(amount_out));
    BigRational::new(BigInt::from(k1) - BigInt::from(k0.clone()), BigInt::from(k0))
}

/// Compara o **core** com a referência (input exato).
pub fn golden_amount_out(amount_in: Amount, reserve_in: Amount, reserve_out: Amount, fee: FeeRate) -> Result<RefOut> {
    let out_core = swap::get_amount_out(amount_in, reserve_in, reserve_out, fee)?;
    let out_cont = continuous_amount_out(amount_in, reserve_in, reserve_out, fee)?;
    let out_cont_floor = rat_to_u128(out_cont.floor().to_integer())?;
    let dk_over_k_core = dk_over_k(reserve_in, reserve_out, amount_in, out_core);
    Ok(RefOut { out_core, out_cont_floor, out_cont, dk_over_k_core })
}

/// Compara o **core** com a referência (output exato).
pub fn golden_amount_in(amount_out: Amount, reserve_in: Amount, reserve_out: Amount, fee: FeeRate) -> Result<RefIn> {
    let in_core = swap::get_amount_in(amount_out, reserve_in, reserve_out, fee)?;
    let in_cont = continuous_amount_in(amount_out, reserve_in, reserve_out, fee)?;
    let in_cont_ceil = rat_to_u128(in_cont.ceil().to_integer())?;
    let dk_over_k_core = dk_over_k(reserve_in, reserve_out, in_core, amount_out);
    Ok(RefIn { in_core, in_cont_ceil, in_cont, dk_over_k_core })
}
