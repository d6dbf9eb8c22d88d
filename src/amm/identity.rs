//! Identidades canônicas: ordem das cores e hashes com separador de domínio.
//!
//! `pair_id` e `reserve_id` usam separadores distintos e rotinas de hash
//! próprias, então a mesma dupla de cores nunca gera ids iguais nos dois
//! espaços.

use core::fmt;

use sha2::{Digest, Sha256};

use super::coin::{Nonce, TokenColor};
use super::error::{AmmError, Result};
use super::error_catalog::AmmErrorCode;

pub const PAIR_ID_DOMAIN: &[u8] = b"pair-id";
pub const RESERVE_ID_DOMAIN: &[u8] = b"reserve-id";
pub const LP_TOKEN_DOMAIN: &[u8] = b"lp-token";
pub const POOL_NONCE_DOMAIN: &[u8] = b"pool-nonce";
pub const NONCE_EVOLVE_DOMAIN: &[u8] = b"nonce-evolve";

/// ASCII completado com zeros até 32 bytes.
pub const fn domain_separator(tag: &[u8]) -> [u8; 32] {
    assert!(tag.len() <= 32, "domain separator longer than 32 bytes");
    let mut out = [0u8; 32];
    let mut i = 0;
    while i < tag.len() {
        out[i] = tag[i];
        i += 1;
    }
    out
}

macro_rules! id32 {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), hex::encode(self.0))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }
    };
}

id32!(
    /// Identidade do par (chave do registro).
    PairId
);
id32!(
    /// Identidade do armazenamento das reservas do par.
    ReserveId
);

/// Ordena por cor: `(token0, token1)` com `token0 < token1`.
pub fn sort_by_color(a: TokenColor, b: TokenColor) -> Result<(TokenColor, TokenColor)> {
    if a == b {
        return Err(AmmError::new(AmmErrorCode::IdenticalTokens).with_color("color", &a));
    }
    Ok(if a < b { (a, b) } else { (b, a) })
}

/// `sha256("pair-id" ‖ color0 ‖ color1)`.
pub fn pair_id(a: TokenColor, b: TokenColor) -> Result<PairId> {
    let (token0, token1) = sort_by_color(a, b)?;
    let mut hasher = Sha256::new();
    hasher.update(domain_separator(PAIR_ID_DOMAIN));
    hasher.update(token0.as_bytes());
    hasher.update(token1.as_bytes());
    Ok(PairId(hasher.finalize().into()))
}

/// `sha256("reserve-id" ‖ color0 ‖ color1)`.
pub fn reserve_id(a: TokenColor, b: TokenColor) -> Result<ReserveId> {
    let (token0, token1) = sort_by_color(a, b)?;
    let mut hasher = Sha256::new();
    hasher.update(domain_separator(RESERVE_ID_DOMAIN));
    hasher.update(token0.as_bytes());
    hasher.update(token1.as_bytes());
    Ok(ReserveId(hasher.finalize().into()))
}

/// Cor do token de liquidez do par.
pub fn lp_token_color(pair: &PairId) -> TokenColor {
    let mut hasher = Sha256::new();
    hasher.update(domain_separator(LP_TOKEN_DOMAIN));
    hasher.update(pair.as_bytes());
    TokenColor(hasher.finalize().into())
}

/// Semente da cadeia de nonces dos coins emitidos pelo par.
pub fn pool_nonce_seed(pair: &PairId) -> Nonce {
    let mut hasher = Sha256::new();
    hasher.update(domain_separator(POOL_NONCE_DOMAIN));
    hasher.update(pair.as_bytes());
    Nonce(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(n: u8) -> TokenColor {
        let mut b = [0u8; 32];
        b[0] = n;
        TokenColor(b)
    }

    #[test]
    fn t_domain_separators_padded_and_distinct() {
        let p = domain_separator(PAIR_ID_DOMAIN);
        assert_eq!(&p[..7], b"pair-id");
        assert!(p[7..].iter().all(|b| *b == 0));
        assert_ne!(p, domain_separator(RESERVE_ID_DOMAIN));
    }

    #[test]
    fn t_sort_is_antisymmetric_and_idempotent() {
        let (a, b) = (c(9), c(3));
        let sorted = sort_by_color(a, b).unwrap();
        assert_eq!(sorted, (b, a));
        assert_eq!(sort_by_color(b, a).unwrap(), sorted);
        assert_eq!(sort_by_color(sorted.0, sorted.1).unwrap(), sorted);
    }

    #[test]
    fn t_identical_tokens_rejected() {
        assert_eq!(sort_by_color(c(1), c(1)).unwrap_err().code, AmmErrorCode::IdenticalTokens);
        assert_eq!(pair_id(c(1), c(1)).unwrap_err().code, AmmErrorCode::IdenticalTokens);
        assert_eq!(reserve_id(c(1), c(1)).unwrap_err().code, AmmErrorCode::IdenticalTokens);
    }

    #[test]
    fn t_pair_id_order_independent_and_separated() {
        for (x, y) in [(1u8, 2u8), (200, 3), (0, 255)] {
            let (a, b) = (c(x), c(y));
            assert_eq!(pair_id(a, b).unwrap(), pair_id(b, a).unwrap());
            assert_eq!(reserve_id(a, b).unwrap(), reserve_id(b, a).unwrap());
            assert_ne!(pair_id(a, b).unwrap().0, reserve_id(a, b).unwrap().0);
        }
        assert_ne!(pair_id(c(1), c(2)).unwrap(), pair_id(c(1), c(3)).unwrap());
    }

    #[test]
    fn t_lp_color_and_seed_derived_per_pair() {
        let p1 = pair_id(c(1), c(2)).unwrap();
        let p2 = pair_id(c(1), c(3)).unwrap();
        assert_ne!(lp_token_color(&p1), lp_token_color(&p2));
        assert_ne!(lp_token_color(&p1).0, pool_nonce_seed(&p1).0);
    }
}
