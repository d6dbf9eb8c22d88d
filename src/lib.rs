//! Núcleo de um AMM de produto constante (x·y=k) sobre coins coloridos:
//! registro de pares, liquidez com token LP, swaps com taxa e aritmética
//! de largura fixa verificada por witness.

pub mod amm;
pub mod obs;

#[cfg(feature = "otlp")]
pub mod telemetry;

pub use amm::{
    AddLiquidity, Amm, AmmConfig, AmmError, AmmErrorCode, FeeRate, Pair, PairId, PairRegistry, QualifiedCoin,
    Recipient, RemoveLiquidity, SwapExactIn, SwapExactOut, TokenColor,
};
