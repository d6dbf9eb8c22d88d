//! Registro de pares (factory): `PairId -> Pair`, com ordem de inserção
//! para enumeração.
//!
//! É um objeto explícito, passado por referência; vários registros podem
//! coexistir (ex.: em testes). As mutações de reservas entram só pelos
//! mutadores `pub(crate)`, usados por liquidez e swap.

use std::collections::BTreeMap;

use tracing::debug;

use super::coin::TokenColor;
use super::config::{AmmConfig, FeeRate};
use super::error::{AmmError, Result};
use super::error_catalog::AmmErrorCode;
use super::identity::{pair_id, PairId};
use super::pair::Pair;

#[derive(Clone, Debug, Default)]
pub struct PairRegistry {
    config: AmmConfig,
    pairs: BTreeMap<PairId, Pair>,
    order: Vec<PairId>,
}

impl PairRegistry {
    pub fn new(config: AmmConfig) -> Self {
        Self { config, pairs: BTreeMap::new(), order: Vec::new() }
    }

    pub fn config(&self) -> &AmmConfig {
        &self.config
    }

    /// Cria o par com a taxa da configuração.
    pub fn create_pair(&mut self, token_a: TokenColor, token_b: TokenColor) -> Result<Pair> {
        let fee = self.config.fee;
        self.create_pair_with_fee(token_a, token_b, fee)
    }

    pub fn create_pair_with_fee(&mut self, token_a: TokenColor, token_b: TokenColor, fee: FeeRate) -> Result<Pair> {
        let pair = Pair::new(token_a, token_b, fee)?;
        if self.pairs.contains_key(&pair.id) {
            return Err(AmmError::new(AmmErrorCode::PairAlreadyExists).with_pair(&pair.id));
        }
        self.order.push(pair.id);
        self.pairs.insert(pair.id, pair.clone());
        debug!(
            target: "amm",
            pair = %pair.id, token0 = %pair.token0, token1 = %pair.token1,
            count = self.order.len(),
            "pair created"
        );
        Ok(pair)
    }

    pub fn get_pair(&self, id: &PairId) -> Result<&Pair> {
        self.pairs
            .get(id)
            .ok_or_else(|| AmmError::new(AmmErrorCode::PairNotFound).with_pair(id))
    }

    /// Busca pelas cores, em qualquer ordem.
    pub fn find_pair(&self, token_a: TokenColor, token_b: TokenColor) -> Result<&Pair> {
        self.get_pair(&pair_id(token_a, token_b)?)
    }

    pub fn exists(&self, id: &PairId) -> bool {
        self.pairs.contains_key(id)
    }

    pub fn all_pair_length(&self) -> u64 {
        self.order.len() as u64
    }

    /// Par na posição `index` da ordem de criação.
    pub fn pair_at(&self, index: u64) -> Option<&Pair> {
        let id = self.order.get(usize::try_from(index).ok()?)?;
        self.pairs.get(id)
    }

    /// Pares em ordem de criação.
    pub fn pairs(&self) -> impl Iterator<Item = &Pair> + '_ {
        self.order.iter().filter_map(move |id| self.pairs.get(id))
    }

    /// Persiste o novo estado de um par existente.
    pub(crate) fn update_pair(&mut self, id: &PairId, pair: Pair) -> Result<()> {
        debug_assert_eq!(*id, pair.id, "pair stored under a foreign id");
        match self.pairs.get_mut(id) {
            Some(slot) => {
                *slot = pair;
                Ok(())
            }
            None => Err(AmmError::new(AmmErrorCode::PairNotFound).with_pair(id)),
        }
    }

    /// Desfaz uma criação feita dentro de uma transição que falhou.
    pub(crate) fn remove_pair(&mut self, pair: &Pair) -> Option<Pair> {
        let removed = self.pairs.remove(&pair.id)?;
        if let Some(pos) = self.order.iter().rposition(|id| *id == pair.id) {
            self.order.remove(pos);
        }
        Some(removed)
    }
}
