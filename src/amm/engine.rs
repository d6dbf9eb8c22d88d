//! Fachada do AMM: um registro de pares e uma fonte de witness.
//!
//! Cada transição roda dentro de um span `amm.transition` e é medida no
//! histograma de duração. Erros são registrados uma vez aqui, em `info`, com
//! o JSON do contexto; as camadas de baixo só usam `debug`/`warn`.

use tracing::{info, info_span};

use super::coin::TokenColor;
use super::config::AmmConfig;
use super::error::Result;
use super::identity::PairId;
use super::liquidity::{self, AddLiquidity, AddLiquidityOutcome, RemoveLiquidity, RemoveLiquidityOutcome};
use super::pair::Pair;
use super::registry::PairRegistry;
use super::swap::{self, SwapExactIn, SwapExactOut, SwapOutcome};
use super::witness::{HostWitness, WitnessSource};
use crate::obs::wrap;

#[derive(Clone, Debug, Default)]
pub struct Amm<W: WitnessSource = HostWitness> {
    registry: PairRegistry,
    witness: W,
}

impl Amm<HostWitness> {
    pub fn new(config: AmmConfig) -> Self {
        Self::with_witness(config, HostWitness)
    }
}

impl<W: WitnessSource> Amm<W> {
    pub fn with_witness(config: AmmConfig, witness: W) -> Self {
        Self { registry: PairRegistry::new(config), witness }
    }

    pub fn registry(&self) -> &PairRegistry {
        &self.registry
    }

    pub fn witness(&self) -> &W {
        &self.witness
    }

    pub fn get_pair(&self, id: &PairId) -> Result<&Pair> {
        self.registry.get_pair(id)
    }

    pub fn find_pair(&self, token_a: TokenColor, token_b: TokenColor) -> Result<&Pair> {
        self.registry.find_pair(token_a, token_b)
    }

    pub fn all_pair_length(&self) -> u64 {
        self.registry.all_pair_length()
    }

    pub fn create_pair(&mut self, token_a: TokenColor, token_b: TokenColor) -> Result<Pair> {
        self.transition("create_pair", |registry, _| registry.create_pair(token_a, token_b))
    }

    pub fn add_liquidity(&mut self, req: AddLiquidity) -> Result<AddLiquidityOutcome> {
        self.transition("add_liquidity", |registry, witness| liquidity::add_liquidity(registry, witness, req))
    }

    pub fn remove_liquidity(&mut self, req: RemoveLiquidity) -> Result<RemoveLiquidityOutcome> {
        self.transition("remove_liquidity", |registry, witness| {
            liquidity::remove_liquidity(registry, witness, req)
        })
    }

    pub fn swap_exact_tokens_for_tokens(&mut self, req: SwapExactIn) -> Result<SwapOutcome> {
        self.transition("swap_exact_in", |registry, witness| {
            swap::swap_exact_tokens_for_tokens(registry, witness, req)
        })
    }

    pub fn swap_tokens_for_exact_tokens(&mut self, req: SwapExactOut) -> Result<SwapOutcome> {
        self.transition("swap_exact_out", |registry, witness| {
            swap::swap_tokens_for_exact_tokens(registry, witness, req)
        })
    }

    /// Cotação de input exato contra o estado atual do par.
    pub fn get_amount_out(&self, amount_in: u128, token_in: TokenColor, token_out: TokenColor) -> Result<u128> {
        wrap::time("get_amount_out", || {
            let pair = self.registry.find_pair(token_in, token_out)?;
            let (reserve_in, reserve_out) = pair.reserves_for(&token_in)?;
            swap::get_amount_out_with(&self.witness, amount_in, reserve_in, reserve_out, pair.fee)
        })
    }

    /// Cotação de output exato contra o estado atual do par.
    pub fn get_amount_in(&self, amount_out: u128, token_in: TokenColor, token_out: TokenColor) -> Result<u128> {
        wrap::time("get_amount_in", || {
            let pair = self.registry.find_pair(token_in, token_out)?;
            let (reserve_in, reserve_out) = pair.reserves_for(&token_in)?;
            swap::get_amount_in_with(&self.witness, amount_out, reserve_in, reserve_out, pair.fee)
        })
    }

    fn transition<T, F>(&mut self, op: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&mut PairRegistry, &W) -> Result<T>,
    {
        let span = info_span!(target: "amm", "amm.transition", op);
        let _guard = span.enter();

        let registry = &mut self.registry;
        let witness = &self.witness;
        let out = wrap::time_result(op, || f(registry, witness));
        if let Err(err) = &out {
            info!(target: "amm", op, code = err.code.code(), detail = %err.to_log_json(), "transition rejected");
        }
        out
    }
}
