//! Tipos numéricos do AMM: inteiros largos para intermediários e escalas fixas.
//! Toda quantidade é inteira, na menor unidade do token (sem ponto flutuante).

use uint::construct_uint;

construct_uint! {
    /// Inteiro de 256 bits para produtos intermediários (`amount * reserve`).
    pub struct U256(4);
}

construct_uint! {
    /// Inteiro de 512 bits; usado apenas na checagem exata do invariante k.
    pub struct U512(8);
}

/// Quantidade na menor unidade do token.
pub type Amount = u128;

/// Escala 1e18 para preços.
pub const WAD: u128 = 1_000_000_000_000_000_000u128;

/// Escala de basis points (1 bps = 0,01%).
pub const BPS_SCALE: u64 = 10_000;
