pub mod types;
pub mod math;
pub mod guardrails;
pub mod witness;

pub mod coin;
pub mod identity;
pub mod config;
pub mod pair;
pub mod registry;
pub mod lp_token;

pub mod swap;
pub mod liquidity;
pub mod pricing;
pub mod engine;

// Referência BigRational (goldens)
pub mod ref_golden;

// Erros unificados
pub mod error_catalog;
pub mod error;

pub use coin::{Coin, Nonce, QualifiedCoin, Recipient, SentCoin, TokenColor};
pub use config::{AmmConfig, FeeRate};
pub use engine::Amm;
pub use error::{AmmError, Result};
pub use error_catalog::AmmErrorCode;
pub use identity::{PairId, ReserveId};
pub use liquidity::{AddLiquidity, AddLiquidityOutcome, RemoveLiquidity, RemoveLiquidityOutcome};
pub use pair::{Pair, PairState};
pub use registry::PairRegistry;
pub use swap::{SwapExactIn, SwapExactOut, SwapOutcome};
pub use witness::{DivisionWitness, HostWitness, WitnessSource};
