//! Tipo de erro unificado do AMM com formatação estável.
//!
//! O contexto é um mapa `chave -> texto`. No log estruturado as chaves são
//! agrupadas pelo papel que têm no AMM: identidades (par, cores), montantes
//! (sempre como string decimal, já que u128 não cabe num número JSON seguro)
//! e detalhes de diagnóstico.
use core::fmt;
use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::amm::coin::TokenColor;
use crate::amm::error_catalog::{default_locale_message, AmmErrorCode};
use crate::amm::identity::PairId;

/// Limite de um valor de contexto, em caracteres.
const CONTEXT_VALUE_MAX: usize = 256;

/// Papel de uma chave de contexto no log estruturado.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextField {
    /// Ids em hex: `pair`, `color`, `expected`, `found`.
    Identity,
    /// Montantes, reservas, supply e parâmetros numéricos.
    Amount,
    Detail,
}

impl ContextField {
    pub fn of(key: &str) -> Self {
        match key {
            "pair" | "color" | "expected" | "found" => Self::Identity,
            "available" | "requested" | "liquidity" | "supply" | "minimum" | "burn" | "dividend"
            | "fee_bps" | "numerator" | "denominator" => Self::Amount,
            k if k.starts_with("amount") || k.starts_with("reserve") => Self::Amount,
            _ => Self::Detail,
        }
    }
}

/// Troca quebras de linha/tab por espaço e corta em `CONTEXT_VALUE_MAX`
/// caracteres (o último vira `…`).
fn sanitize_value(input: &str) -> String {
    let flat = input.replace(['\n', '\r', '\t'], " ");
    if flat.chars().count() <= CONTEXT_VALUE_MAX {
        return flat;
    }
    let mut cut: String = flat.chars().take(CONTEXT_VALUE_MAX - 1).collect();
    cut.push('…');
    cut
}

/// Substitui `{chave}` pelo valor do contexto; chaves desconhecidas e chaves
/// sem fechamento ficam como estão.
fn render_template(template: &str, context: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let Some(close) = tail.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &tail[..close];
        match context.get(key) {
            Some(value) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Erro do AMM com contexto estruturado.
///
/// Igualdade compara código **e** contexto; para checar só a categoria use
/// [`AmmError::is`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmmError {
    pub code: AmmErrorCode,
    pub context: BTreeMap<String, String>,
}

impl AmmError {
    pub fn new(code: AmmErrorCode) -> Self {
        Self { code, context: BTreeMap::new() }
    }

    /// Adiciona um par chave/valor ao contexto. Chave vazia é ignorada.
    pub fn with_context<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        let key = key.into();
        if !key.is_empty() {
            self.context.insert(key, sanitize_value(&value.to_string()));
        }
        self
    }

    pub fn with_pair(self, pair: &PairId) -> Self {
        self.with_context("pair", pair)
    }

    pub fn with_color(self, key: &str, color: &TokenColor) -> Self {
        self.with_context(key, color)
    }

    pub fn with_amount(self, key: &str, amount: u128) -> Self {
        self.with_context(key, amount)
    }

    /// `true` se o erro pertence à categoria `code`.
    pub fn is(&self, code: AmmErrorCode) -> bool {
        self.code == code
    }

    /// Par envolvido, se o erro carrega um.
    pub fn pair(&self) -> Option<&str> {
        self.context.get("pair").map(String::as_str)
    }

    /// Montante de contexto interpretado como u128.
    pub fn amount(&self, key: &str) -> Option<u128> {
        match ContextField::of(key) {
            ContextField::Amount => self.context.get(key)?.parse().ok(),
            _ => None,
        }
    }

    fn resolved_message(&self) -> String {
        render_template(default_locale_message(self.code), &self.context)
    }

    /// Mensagem curta para UI.
    pub fn to_user_string(&self) -> String {
        format!("[{}] {}", self.code.code(), self.resolved_message())
    }

    /// Renderiza um template arbitrário usando o contexto atual.
    pub fn render_with_template(&self, template: &str) -> String {
        render_template(template, &self.context)
    }

    /// Forma estruturada para logs:
    /// `{code, title, message, recoverable, ids, amounts, detail}`.
    pub fn to_log_value(&self) -> Value {
        let (mut ids, mut amounts, mut detail) = (Map::new(), Map::new(), Map::new());
        for (key, value) in &self.context {
            let group = match ContextField::of(key) {
                ContextField::Identity => &mut ids,
                ContextField::Amount => &mut amounts,
                ContextField::Detail => &mut detail,
            };
            group.insert(key.clone(), Value::String(value.clone()));
        }
        json!({
            "code": self.code.code(),
            "title": self.code.title(),
            "message": self.resolved_message(),
            "recoverable": self.code.is_user_recoverable(),
            "ids": ids,
            "amounts": amounts,
            "detail": detail,
        })
    }

    /// JSON compacto e estável (chaves ordenadas) para logs.
    pub fn to_log_json(&self) -> String {
        self.to_log_value().to_string()
    }
}

impl fmt::Display for AmmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_user_string())
    }
}

impl std::error::Error for AmmError {}

impl From<AmmErrorCode> for AmmError {
    fn from(code: AmmErrorCode) -> Self {
        AmmError::new(code)
    }
}

/// Resultado padrão para operações do AMM.
pub type Result<T> = std::result::Result<T, AmmError>;

#[macro_export]
macro_rules! amm_err {
  ($code:expr) => {{
    $crate::amm::error::AmmError::new($code)
  }};
  ($code:expr, $($key:ident => $value:expr),+ $(,)?) => {{
    $crate::amm::error::AmmError::new($code)
      $(.with_context(stringify!($key), $value))+
  }};
  ($code:expr, { $($key:expr => $value:expr),+ $(,)? }) => {{
    $crate::amm::error::AmmError::new($code)
      $(.with_context($key, $value))+
  }};
}

#[macro_export]
macro_rules! amm_bail {
  ($($tt:tt)*) => {
    return Err($crate::amm_err!($($tt)*));
  };
}
