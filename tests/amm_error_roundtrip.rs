//! O JSON de log de cada erro volta ao mesmo código, mensagem e contexto,
//! tanto para erros montados à mão quanto para os que as operações do AMM
//! devolvem.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use cpamm_core::amm::coin::split_coin;
use cpamm_core::amm::error::{AmmError, ContextField};
use cpamm_core::amm::error_catalog::AmmErrorCode;
use cpamm_core::amm::identity::pair_id;
use cpamm_core::amm::types::U256;
use cpamm_core::amm::witness::verify_division;
use cpamm_core::amm::{AmmConfig, Coin, DivisionWitness, Nonce, PairRegistry, TokenColor};

fn color(tag: u8) -> TokenColor {
    TokenColor([tag; 32])
}

fn parse(err: &AmmError) -> Value {
    serde_json::from_str(&err.to_log_json()).expect("log json parses")
}

/// Junta os três grupos de volta num único mapa de contexto.
fn context_of(v: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for group in ["ids", "amounts", "detail"] {
        for (key, value) in v[group].as_object().expect("group is an object") {
            assert_eq!(ContextField::of(key), field_for(group), "{key} in {group}");
            out.insert(key.clone(), value.as_str().expect("string value").to_string());
        }
    }
    out
}

fn field_for(group: &str) -> ContextField {
    match group {
        "ids" => ContextField::Identity,
        "amounts" => ContextField::Amount,
        _ => ContextField::Detail,
    }
}

fn assert_round_trip(err: &AmmError) -> Value {
    let v = parse(err);
    assert_eq!(v["code"], err.code.code());
    assert_eq!(v["title"], err.code.title());
    assert_eq!(v["message"].as_str(), err.to_user_string().split_once("] ").map(|(_, m)| m));
    assert_eq!(v["recoverable"], err.code.is_user_recoverable());
    assert_eq!(context_of(&v), err.context);
    v
}

#[test]
fn every_code_without_context() {
    let mut seen = HashSet::new();
    for code in AmmErrorCode::all() {
        let v = assert_round_trip(&AmmError::new(*code));
        assert_eq!(v["message"], code.message_pt());
        seen.insert(v["code"].as_str().map(str::to_string));
    }
    assert_eq!(seen.len(), AmmErrorCode::all().len());
}

#[test]
fn split_beyond_value_reports_amounts() {
    let coin = Coin::new(color(1), 10, Nonce([7; 32]));
    let err = split_coin(&coin, 11).unwrap_err();
    let v = assert_round_trip(&err);
    assert_eq!(v["amounts"]["available"], "10");
    assert_eq!(v["amounts"]["requested"], "11");
    assert_eq!(v["message"], "coin tem 10, pedido 11");
    assert_eq!(v["recoverable"], true);
}

#[test]
fn rejected_division_witness_reports_kind() {
    // r == b nunca é aceito, mesmo com q*b + r == a
    let bad = DivisionWitness { quotient: U256::from(2u8), remainder: U256::from(4u8) };
    let err = verify_division(U256::from(12u8), U256::from(4u8), &bad).unwrap_err();
    let v = assert_round_trip(&err);
    assert_eq!(v["code"], "AMM-0005");
    assert_eq!(v["detail"]["kind"], "division");
    assert_eq!(v["message"], "witness de division reprovado na verificação");
}

#[test]
fn unknown_pair_carries_hex_id() {
    let registry = PairRegistry::new(AmmConfig::default());
    let id = pair_id(color(1), color(2)).unwrap();
    let err = registry.get_pair(&id).unwrap_err();
    let v = assert_round_trip(&err);
    assert_eq!(v["ids"]["pair"], hex::encode(id.0).as_str());
    assert!(v["amounts"].as_object().unwrap().is_empty());
}

#[test]
fn color_mismatch_carries_both_colors() {
    let coin = Coin::new(color(3), 1, Nonce::default());
    let err = coin.expect_color(&color(4)).unwrap_err();
    let v = assert_round_trip(&err);
    assert_eq!(v["ids"]["expected"], hex::encode([4u8; 32]).as_str());
    assert_eq!(v["ids"]["found"], hex::encode([3u8; 32]).as_str());
}

#[test]
fn escaped_context_survives() {
    let err = AmmError::new(AmmErrorCode::InvalidConfig)
        .with_context("key", "AMM_FEE_BPS")
        .with_context("value", "\"1e4\"\\\u{1}");
    let v = assert_round_trip(&err);
    assert_eq!(v["detail"]["value"], "\"1e4\"\\\u{1}");
    assert_eq!(v["message"], "valor inválido para AMM_FEE_BPS");
}
