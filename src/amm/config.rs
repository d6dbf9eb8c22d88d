//! Configuração do AMM: taxa do swap e trava de liquidez mínima.
//!
//! A taxa é gravada no par na criação; mudar a configuração depois só afeta
//! pares novos.

use super::error::Result;
use super::error_catalog::AmmErrorCode;
use super::types::BPS_SCALE;
use crate::amm_err;

/// Fração do input que entra na curva: `numerator / denominator`.
/// 997/1000 equivale a 0,30% de taxa retida nas reservas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FeeRate {
    numerator: u64,
    denominator: u64,
}

impl FeeRate {
    pub const DEFAULT: FeeRate = FeeRate { numerator: 997, denominator: 1_000 };
    /// Sem taxa: todo o input entra na curva.
    pub const NO_FEE: FeeRate = FeeRate { numerator: 1, denominator: 1 };

    pub fn new(numerator: u64, denominator: u64) -> Result<Self> {
        if numerator == 0 || numerator > denominator {
            return Err(amm_err!(
                AmmErrorCode::InvalidFee,
                numerator => numerator,
                denominator => denominator,
            ));
        }
        Ok(Self { numerator, denominator })
    }

    /// Taxa em basis points: 30 bps → 9970/10000.
    pub fn from_bps(fee_bps: u64) -> Result<Self> {
        if fee_bps >= BPS_SCALE {
            return Err(amm_err!(AmmErrorCode::InvalidFee, fee_bps => fee_bps));
        }
        Self::new(BPS_SCALE - fee_bps, BPS_SCALE)
    }

    pub const fn numerator(&self) -> u64 {
        self.numerator
    }

    pub const fn denominator(&self) -> u64 {
        self.denominator
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmmConfig {
    /// Taxa atribuída a pares criados por este registro.
    pub fee: FeeRate,
    /// Shares travadas para sempre no primeiro mint (0 = sem trava).
    pub minimum_liquidity: u128,
}

impl Default for AmmConfig {
    fn default() -> Self {
        Self { fee: FeeRate::DEFAULT, minimum_liquidity: 0 }
    }
}

pub const ENV_FEE_BPS: &str = "AMM_FEE_BPS";
pub const ENV_MINIMUM_LIQUIDITY: &str = "AMM_MINIMUM_LIQUIDITY";

impl AmmConfig {
    pub fn with_fee(mut self, fee: FeeRate) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_minimum_liquidity(mut self, minimum_liquidity: u128) -> Self {
        self.minimum_liquidity = minimum_liquidity;
        self
    }

    /// Lê `AMM_FEE_BPS` e `AMM_MINIMUM_LIQUIDITY`; ausentes usam o default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Mesma regra de `from_env`, com a fonte de variáveis injetada.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_FEE_BPS) {
            let bps = parse_var::<u64>(ENV_FEE_BPS, &raw)?;
            config.fee = FeeRate::from_bps(bps)?;
        }
        if let Some(raw) = lookup(ENV_MINIMUM_LIQUIDITY) {
            config.minimum_liquidity = parse_var::<u128>(ENV_MINIMUM_LIQUIDITY, &raw)?;
        }
        Ok(config)
    }
}

fn parse_var<T: core::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| amm_err!(AmmErrorCode::InvalidConfig, key => key, value => raw))
}
