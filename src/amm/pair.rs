//! Registro de reservas de um par canônico `{token0, token1}`.

use super::coin::{evolve_nonce, Nonce, TokenColor};
use super::config::FeeRate;
use super::error::Result;
use super::error_catalog::AmmErrorCode;
use super::identity::{lp_token_color, pair_id, pool_nonce_seed, reserve_id, sort_by_color, PairId, ReserveId};
use super::math::mul_u128_to_u256;
use super::types::U256;
use crate::amm_err;

/// Índice de derivação da cadeia de nonces do pool.
const POOL_NONCE_INDEX: u64 = 0x706f_6f6c;

/// Estado observável de um par existente.
///
/// Não há volta para "inexistente": um par esvaziado continua registrado e
/// pode receber liquidez de novo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairState {
    /// Recém-criado, nunca recebeu liquidez (ou foi totalmente esvaziado).
    Created,
    /// Reservas positivas.
    Active,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pair {
    pub id: PairId,
    pub reserve_id: ReserveId,
    pub token0: TokenColor,
    pub token1: TokenColor,
    pub reserve0: u128,
    pub reserve1: u128,
    pub lp_token_id: TokenColor,
    pub total_lp_supply: u128,
    /// Fixada na criação.
    pub fee: FeeRate,
    /// Cabeça da cadeia de nonces dos coins emitidos pelo pool.
    pub nonce: Nonce,
}

impl Pair {
    /// Par vazio com orientação canônica (`token0 < token1`).
    pub fn new(token_a: TokenColor, token_b: TokenColor, fee: FeeRate) -> Result<Self> {
        let (token0, token1) = sort_by_color(token_a, token_b)?;
        let id = pair_id(token0, token1)?;
        Ok(Self {
            id,
            reserve_id: reserve_id(token0, token1)?,
            token0,
            token1,
            reserve0: 0,
            reserve1: 0,
            lp_token_id: lp_token_color(&id),
            total_lp_supply: 0,
            fee,
            nonce: pool_nonce_seed(&id),
        })
    }

    pub fn state(&self) -> PairState {
        if self.reserve0 == 0 && self.reserve1 == 0 {
            PairState::Created
        } else {
            PairState::Active
        }
    }

    pub fn contains(&self, color: &TokenColor) -> bool {
        *color == self.token0 || *color == self.token1
    }

    /// `(reserve_in, reserve_out)` orientado pelo token de entrada.
    pub fn reserves_for(&self, token_in: &TokenColor) -> Result<(u128, u128)> {
        if *token_in == self.token0 {
            Ok((self.reserve0, self.reserve1))
        } else if *token_in == self.token1 {
            Ok((self.reserve1, self.reserve0))
        } else {
            Err(amm_err!(AmmErrorCode::ColorMismatch, pair => self.id, found => token_in))
        }
    }

    /// Inverso de [`Pair::reserves_for`].
    pub(crate) fn set_reserves_for(&mut self, token_in: &TokenColor, reserve_in: u128, reserve_out: u128) {
        if *token_in == self.token0 {
            self.reserve0 = reserve_in;
            self.reserve1 = reserve_out;
        } else {
            self.reserve1 = reserve_in;
            self.reserve0 = reserve_out;
        }
    }

    /// `reserve0 * reserve1`.
    pub fn k(&self) -> U256 {
        mul_u128_to_u256(self.reserve0, self.reserve1)
    }

    /// Avança a cadeia e devolve um nonce nunca usado por este par.
    pub(crate) fn issue_nonce(&mut self) -> Nonce {
        self.nonce = evolve_nonce(POOL_NONCE_INDEX, &self.nonce);
        self.nonce
    }
}
