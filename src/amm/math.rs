//! Aritmética de largura fixa (64/128/256 bits) com checagem explícita.
//!
//! Nada aqui faz wrap: todo estouro vira `ArithmeticOverflow` e toda
//! subtração abaixo de zero vira `ArithmeticUnderflow`. As visões em limbs
//! (`WideU128`, `WideU256`) espelham a codificação do ledger, onde um inteiro
//! largo é um par `(low, high)` de metades.

use super::error::Result;
use super::error_catalog::AmmErrorCode;
use super::types::U256;
use crate::amm_err;

/// Soma/subtração/multiplicação checadas numa largura fixa.
pub trait CheckedArith: Copy + Sized {
    /// Nome da largura para o contexto do erro.
    const WIDTH: &'static str;

    fn add_checked(self, rhs: Self) -> Result<Self>;
    fn sub_checked(self, rhs: Self) -> Result<Self>;
    fn mul_checked(self, rhs: Self) -> Result<Self>;
}

macro_rules! impl_checked_arith {
    ($($t:ty => $width:literal),* $(,)?) => {
        $(
            impl CheckedArith for $t {
                const WIDTH: &'static str = $width;

                #[inline]
                fn add_checked(self, rhs: Self) -> Result<Self> {
                    self.checked_add(rhs).ok_or_else(|| {
                        amm_err!(AmmErrorCode::ArithmeticOverflow, op => "add", width => Self::WIDTH)
                    })
                }

                #[inline]
                fn sub_checked(self, rhs: Self) -> Result<Self> {
                    self.checked_sub(rhs).ok_or_else(|| {
                        amm_err!(AmmErrorCode::ArithmeticUnderflow, op => "sub", width => Self::WIDTH)
                    })
                }

                #[inline]
                fn mul_checked(self, rhs: Self) -> Result<Self> {
                    self.checked_mul(rhs).ok_or_else(|| {
                        amm_err!(AmmErrorCode::ArithmeticOverflow, op => "mul", width => Self::WIDTH)
                    })
                }
            }
        )*
    };
}

impl_checked_arith!(u64 => "u64", u128 => "u128", U256 => "u256");

#[inline]
pub fn checked_add<T: CheckedArith>(a: T, b: T) -> Result<T> {
    a.add_checked(b)
}

#[inline]
pub fn checked_sub<T: CheckedArith>(a: T, b: T) -> Result<T> {
    a.sub_checked(b)
}

#[inline]
pub fn checked_mul<T: CheckedArith>(a: T, b: T) -> Result<T> {
    a.mul_checked(b)
}

/// Produto exato de dois u128 (nunca estoura em 256 bits).
#[inline]
pub fn mul_u128_to_u256(a: u128, b: u128) -> U256 {
    U256::from(mul_wide(a, b))
}

/// Estreita U256 → u128, falhando se não couber.
#[inline]
pub fn u256_to_u128_checked(v: U256) -> Result<u128> {
    if v > U256::from(u128::MAX) {
        Err(amm_err!(AmmErrorCode::ArithmeticOverflow, op => "narrow", width => "u128"))
    } else {
        Ok(v.low_u128())
    }
}

/// u128 como dois limbs de 64 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WideU128 {
    pub low: u64,
    pub high: u64,
}

impl From<u128> for WideU128 {
    fn from(v: u128) -> Self {
        Self { low: v as u64, high: (v >> 64) as u64 }
    }
}

impl From<WideU128> for u128 {
    fn from(w: WideU128) -> Self {
        ((w.high as u128) << 64) | w.low as u128
    }
}

/// U256 como dois limbs de 128 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WideU256 {
    pub low: u128,
    pub high: u128,
}

impl From<U256> for WideU256 {
    fn from(v: U256) -> Self {
        Self { low: v.low_u128(), high: (v >> 128).low_u128() }
    }
}

impl From<WideU256> for U256 {
    fn from(w: WideU256) -> Self {
        (U256::from(w.high) << 128) | U256::from(w.low)
    }
}

const LIMB_MASK: u128 = u64::MAX as u128;

/// Produto completo `a * b` em limbs de 64 bits (schoolbook).
pub fn mul_wide(a: u128, b: u128) -> WideU256 {
    let (a0, a1) = (a & LIMB_MASK, a >> 64);
    let (b0, b1) = (b & LIMB_MASK, b >> 64);

    let p00 = a0 * b0;
    let p01 = a0 * b1;
    let p10 = a1 * b0;
    let p11 = a1 * b1;

    // soma das colunas do meio: cabe em 66 bits
    let mid = (p00 >> 64) + (p01 & LIMB_MASK) + (p10 & LIMB_MASK);
    let low = (p00 & LIMB_MASK) | ((mid & LIMB_MASK) << 64);
    let high = p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64);
    WideU256 { low, high }
}
