//! Coins estilo UTXO: cor, valor e nonce. Um coin é consumido inteiro;
//! uso parcial exige `split` em `{sent, change}` com nonces novos.

use core::cmp::Ordering;
use core::fmt;

use sha2::{Digest, Sha256};

use super::error::{AmmError, Result};
use super::error_catalog::AmmErrorCode;
use super::identity::{domain_separator, NONCE_EVOLVE_DOMAIN};
use super::math::checked_add;
use super::types::U256;

/// Identidade de 32 bytes de um tipo de token.
///
/// Igualdade é byte a byte; a ordem total trata os bytes como inteiro de
/// 256 bits little-endian.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenColor(pub [u8; 32]);

impl TokenColor {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Valor numérico usado pela ordem canônica.
    pub fn as_u256(&self) -> U256 {
        U256::from_little_endian(&self.0)
    }

    pub fn lt(&self, other: &TokenColor) -> bool {
        self.cmp(other) == Ordering::Less
    }
}

impl Ord for TokenColor {
    fn cmp(&self, other: &Self) -> Ordering {
        // little-endian: o byte mais significativo é o último
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl PartialOrd for TokenColor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for TokenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenColor({})", hex::encode(self.0))
    }
}

impl fmt::Display for TokenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Nonce de 32 bytes de um coin.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Nonce(pub [u8; 32]);

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", hex::encode(self.0))
    }
}

/// Destinatário opaco dos coins emitidos pelo pool (chave pública).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Recipient(pub [u8; 32]);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coin {
    pub color: TokenColor,
    pub value: u128,
    pub nonce: Nonce,
}

impl Coin {
    pub const fn new(color: TokenColor, value: u128, nonce: Nonce) -> Self {
        Self { color, value, nonce }
    }

    /// Falha com `ColorMismatch` se o coin não for da cor esperada.
    pub fn expect_color(&self, expected: &TokenColor) -> Result<()> {
        if self.color != *expected {
            return Err(AmmError::new(AmmErrorCode::ColorMismatch)
                .with_color("expected", expected)
                .with_color("found", &self.color));
        }
        Ok(())
    }
}

/// Coin com a posição na árvore de Merkle do ledger.
///
/// A prova de que o coin existe e não foi gasto é verificada pelo ledger
/// externo; aqui ela só acompanha o coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedCoin {
    pub coin: Coin,
    pub mt_index: u64,
}

impl QualifiedCoin {
    pub const fn new(coin: Coin, mt_index: u64) -> Self {
        Self { coin, mt_index }
    }

    pub fn color(&self) -> TokenColor {
        self.coin.color
    }

    pub fn value(&self) -> u128 {
        self.coin.value
    }
}

/// Coin emitido pelo pool para um destinatário.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SentCoin {
    pub recipient: Recipient,
    pub coin: Coin,
}

/// Resultado de um split: `sent + change == original`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Split {
    pub sent: Coin,
    pub change: Coin,
}

// Índices de derivação: cada operação usa o seu, então saídas de operações
// diferentes sobre o mesmo nonce nunca coincidem.
const SPLIT_SENT: u64 = 0;
const SPLIT_CHANGE: u64 = 1;
const ADJUST_VALUE: u64 = 2;
const MERGE: u64 = 3;

/// Deriva um nonce novo e determinístico a partir de `nonce`.
pub fn evolve_nonce(index: u64, nonce: &Nonce) -> Nonce {
    let mut hasher = Sha256::new();
    hasher.update(domain_separator(NONCE_EVOLVE_DOMAIN));
    hasher.update(index.to_le_bytes());
    hasher.update(nonce.0);
    Nonce(hasher.finalize().into())
}

/// Separa `amount` de `coin`. Ambas as saídas recebem nonces novos.
pub fn split_coin(coin: &Coin, amount: u128) -> Result<Split> {
    let change_value = coin.value.checked_sub(amount).ok_or_else(|| {
        AmmError::new(AmmErrorCode::InsufficientValue)
            .with_amount("available", coin.value)
            .with_amount("requested", amount)
    })?;
    Ok(Split {
        sent: Coin::new(coin.color, amount, evolve_nonce(SPLIT_SENT, &coin.nonce)),
        change: Coin::new(coin.color, change_value, evolve_nonce(SPLIT_CHANGE, &coin.nonce)),
    })
}

/// Junta dois coins da mesma cor num só.
pub fn merge_coins(a: &Coin, b: &Coin) -> Result<Coin> {
    b.expect_color(&a.color)?;
    let value = checked_add(a.value, b.value)?;
    let mut hasher = Sha256::new();
    hasher.update(domain_separator(NONCE_EVOLVE_DOMAIN));
    hasher.update(MERGE.to_le_bytes());
    hasher.update(a.nonce.0);
    hasher.update(b.nonce.0);
    Ok(Coin::new(a.color, value, Nonce(hasher.finalize().into())))
}

/// Novo coin com `value + amount`, mesma cor, nonce novo.
pub fn add_coin_value(coin: &Coin, amount: u128) -> Result<Coin> {
    let value = checked_add(coin.value, amount)?;
    Ok(Coin::new(coin.color, value, evolve_nonce(ADJUST_VALUE, &coin.nonce)))
}

/// Novo coin com `value - amount`; nunca negativo.
pub fn sub_coin_value(coin: &Coin, amount: u128) -> Result<Coin> {
    let value = coin.value.checked_sub(amount).ok_or_else(|| {
        AmmError::new(AmmErrorCode::InsufficientValue)
            .with_amount("available", coin.value)
            .with_amount("requested", amount)
    })?;
    Ok(Coin::new(coin.color, value, evolve_nonce(ADJUST_VALUE, &coin.nonce)))
}
