//! Witness-then-verify para divisão e raiz quadrada inteira.
//!
//! O ambiente verificado paga caro por multiplicação e barato por valor
//! fornecido. Então o quociente/resto e a raiz são calculados fora (pelo
//! [`WitnessSource`], sem confiança) e aqui só conferimos a álgebra:
//!
//! - divisão: `q*b + r == a` e `r < b`
//! - raiz: `r*r <= n < (r+1)*(r+1)`
//!
//! O candidato é sempre tratado como entrada de atacante: [`divide`] e
//! [`square_root`] nunca devolvem um valor que não passou pela verificação.

use tracing::warn;

use super::error::Result;
use super::error_catalog::AmmErrorCode;
use super::math::u256_to_u128_checked;
use super::types::U256;
use crate::amm_err;

/// Candidato a `(quociente, resto)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DivisionWitness {
    pub quotient: U256,
    pub remainder: U256,
}

/// Fonte (não confiável) de candidatos calculados fora do circuito.
pub trait WitnessSource {
    fn division(&self, dividend: U256, divisor: U256) -> DivisionWitness;
    fn square_root(&self, radicand: U256) -> U256;
}

impl<W: WitnessSource + ?Sized> WitnessSource for &W {
    fn division(&self, dividend: U256, divisor: U256) -> DivisionWitness {
        (**self).division(dividend, divisor)
    }

    fn square_root(&self, radicand: U256) -> U256 {
        (**self).square_root(radicand)
    }
}

/// Implementação honesta do host.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostWitness;

impl WitnessSource for HostWitness {
    fn division(&self, dividend: U256, divisor: U256) -> DivisionWitness {
        if divisor.is_zero() {
            return DivisionWitness { quotient: U256::zero(), remainder: dividend };
        }
        let (quotient, remainder) = dividend.div_mod(divisor);
        DivisionWitness { quotient, remainder }
    }

    fn square_root(&self, radicand: U256) -> U256 {
        radicand.integer_sqrt()
    }
}

fn rejected(kind: &'static str) -> crate::amm::error::AmmError {
    amm_err!(AmmErrorCode::InvalidWitness, kind => kind)
}

/// Confere `(q, r)` para `a / b`. Divisor zero falha antes de olhar o witness.
pub fn verify_division(dividend: U256, divisor: U256, witness: &DivisionWitness) -> Result<()> {
    if divisor.is_zero() {
        return Err(amm_err!(AmmErrorCode::DivisionByZero, dividend => dividend));
    }
    if witness.remainder >= divisor {
        return Err(rejected("division"));
    }
    // qualquer estouro ao recompor já prova que q*b + r != a
    let recomposed = witness
        .quotient
        .checked_mul(divisor)
        .and_then(|qb| qb.checked_add(witness.remainder));
    match recomposed {
        Some(v) if v == dividend => Ok(()),
        _ => Err(rejected("division")),
    }
}

/// Confere `r = floor(sqrt(n))`.
pub fn verify_square_root(radicand: U256, root: U256) -> Result<()> {
    let square = root.checked_mul(root).ok_or_else(|| rejected("sqrt"))?;
    if square > radicand {
        return Err(rejected("sqrt"));
    }
    // (r+1)^2 acima de U256::MAX é trivialmente > n
    let next_square = root
        .checked_add(U256::one())
        .and_then(|next| next.checked_mul(next));
    match next_square {
        Some(v) if v <= radicand => Err(rejected("sqrt")),
        _ => Ok(()),
    }
}

/// Divide `a / b` pedindo o candidato à fonte e verificando-o.
pub fn divide<W: WitnessSource + ?Sized>(
    source: &W,
    dividend: U256,
    divisor: U256,
) -> Result<DivisionWitness> {
    if divisor.is_zero() {
        return Err(amm_err!(AmmErrorCode::DivisionByZero, dividend => dividend));
    }
    let witness = source.division(dividend, divisor);
    if let Err(err) = verify_division(dividend, divisor, &witness) {
        warn!(
            target: "amm",
            %dividend, %divisor,
            quotient = %witness.quotient, remainder = %witness.remainder,
            "division witness rejected"
        );
        return Err(err);
    }
    Ok(witness)
}

/// Quociente de `a / b` estreitado para u128.
pub fn divide_to_u128<W: WitnessSource + ?Sized>(source: &W, dividend: U256, divisor: U256) -> Result<u128> {
    let w = divide(source, dividend, divisor)?;
    u256_to_u128_checked(w.quotient)
}

/// `floor(sqrt(n))` pedindo o candidato à fonte e verificando-o.
pub fn square_root<W: WitnessSource + ?Sized>(source: &W, radicand: U256) -> Result<U256> {
    let root = source.square_root(radicand);
    if let Err(err) = verify_square_root(radicand, root) {
        warn!(target: "amm", %radicand, %root, "sqrt witness rejected");
        return Err(err);
    }
    Ok(root)
}
