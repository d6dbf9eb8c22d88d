//! Validações de entrada e arredondamentos auxiliares para o AMM.

use super::error::Result;
use super::error_catalog::AmmErrorCode;
use super::math::u256_to_u128_checked;
use super::types::U256;
use crate::amm_err;

#[inline]
pub fn ensure_nonzero(amount: u128) -> Result<()> {
    if amount == 0 {
        Err(amm_err!(AmmErrorCode::ZeroAmount, amount => amount))
    } else {
        Ok(())
    }
}

/// Ambas as reservas precisam ser > 0 para precificar.
#[inline]
pub fn ensure_reserves(reserve_in: u128, reserve_out: u128) -> Result<()> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(amm_err!(
            AmmErrorCode::InsufficientLiquidity,
            reserve_in => reserve_in,
            reserve_out => reserve_out,
        ));
    }
    Ok(())
}

/// `ceil(n / d)`, assumindo `d > 0`.
#[inline]
pub fn ceil_div_u256(n: U256, d: U256) -> U256 {
    let (q, r) = n.div_mod(d);
    if r.is_zero() { q } else { q + U256::one() }
}

/// Divisão com arredondamento *nearest (ties-to-even)* em U256 → U256
pub fn div_nearest_even_u256(n: U256, d: U256) -> Result<U256> {
    if d.is_zero() {
        return Err(AmmErrorCode::DivisionByZero.into());
    }
    let (q, r) = n.div_mod(d);
    // 2*r comparado a d sem estourar: r < d, então r >= d - r decide
    let rest = d - r;
    if r < rest {
        return Ok(q);
    }
    if r > rest {
        return Ok(q + U256::one());
    }
    // empate: arredonda para o par
    if q.bit(0) {
        Ok(q + U256::one())
    } else {
        Ok(q)
    }
}

/// Versão que retorna u128 (com checagem de overflow no downcast)
pub fn div_nearest_even_u256_to_u128(n: U256, d: U256) -> Result<u128> {
    let q = div_nearest_even_u256(n, d)?;
    u256_to_u128_checked(q)
}

// -------------------------
// TESTES
// -------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_ensure_nonzero() {
        assert!(ensure_nonzero(1).is_ok());
        assert_eq!(ensure_nonzero(0).unwrap_err().code, AmmErrorCode::ZeroAmount);
    }

    #[test]
    fn t_ensure_reserves() {
        assert!(ensure_reserves(1, 1).is_ok());
        assert_eq!(
            ensure_reserves(0, 5).unwrap_err().code,
            AmmErrorCode::InsufficientLiquidity
        );
        assert_eq!(
            ensure_reserves(5, 0).unwrap_err().code,
            AmmErrorCode::InsufficientLiquidity
        );
    }

    #[test]
    fn t_ceil_div() {
        assert_eq!(ceil_div_u256(U256::from(10u8), U256::from(5u8)), U256::from(2u8));
        assert_eq!(ceil_div_u256(U256::from(11u8), U256::from(5u8)), U256::from(3u8));
        assert_eq!(ceil_div_u256(U256::zero(), U256::from(5u8)), U256::zero());
    }

    #[test]
    fn t_u256_div_nearest_even_rounding() {
        let two = U256::from(2u8);
        let three = U256::from(3u8);
        let five = U256::from(5u8);

        // 5/2 = 2.5 -> empata, 2 é par -> fica 2
        let q = div_nearest_even_u256(five, two).unwrap();
        assert_eq!(q, U256::from(2u8));
        // 3/2 = 1.5 -> empata, 1 é ímpar -> sobe para 2
        let q = div_nearest_even_u256(three, two).unwrap();
        assert_eq!(q, U256::from(2u8));
        // 7/3 = 2.33 -> 2 ; 8/3 = 2.67 -> 3
        assert_eq!(div_nearest_even_u256(U256::from(7u8), three).unwrap(), two);
        assert_eq!(div_nearest_even_u256(U256::from(8u8), three).unwrap(), three);
    }

    #[test]
    fn t_nearest_even_does_not_overflow_near_max() {
        let q = div_nearest_even_u256(U256::MAX, U256::MAX - U256::one()).unwrap();
        assert_eq!(q, U256::one());
    }

    #[test]
    fn t_nearest_even_rejects_zero_divisor() {
        let err = div_nearest_even_u256(U256::one(), U256::zero()).unwrap_err();
        assert_eq!(err.code, AmmErrorCode::DivisionByZero);
    }
}
