//! Ciclo completo via fachada: criação implícita, swaps nos dois sentidos,
//! saque total e reuso do par esvaziado.

use cpamm_core::amm::pricing::{max_in_with_tolerance, min_out_with_tolerance, pair_spot_price};
use cpamm_core::amm::types::WAD;
use cpamm_core::amm::{
    AddLiquidity, Amm, AmmConfig, AmmErrorCode, Coin, FeeRate, Nonce, PairState, QualifiedCoin, Recipient,
    RemoveLiquidity, SwapExactIn, SwapExactOut, TokenColor,
};
use cpamm_core::obs;

fn color(tag: u8) -> TokenColor {
    TokenColor([tag; 32])
}

fn coin(tag: u8, value: u128, seq: u64) -> QualifiedCoin {
    let mut nonce = [0u8; 32];
    nonce[..8].copy_from_slice(&seq.to_le_bytes());
    nonce[31] = tag;
    QualifiedCoin::new(Coin::new(color(tag), value, Nonce(nonce)), seq)
}

fn deposit(a: u128, b: u128, seq: u64, to: Recipient) -> AddLiquidity {
    AddLiquidity {
        coin_a: coin(1, a, seq),
        coin_b: coin(2, b, seq + 1),
        amount_a_desired: a,
        amount_b_desired: b,
        amount_a_min: 0,
        amount_b_min: 0,
        recipient: to,
    }
}

#[test]
fn full_lifecycle() {
    obs::init_fmt();
    let alice = Recipient([0xA1; 32]);
    let bob = Recipient([0xB0; 32]);
    let mut amm = Amm::new(AmmConfig::default());

    // bootstrap 400/900 → sqrt = 600 shares
    let seeded = amm.add_liquidity(deposit(400, 900, 0, alice)).unwrap();
    assert_eq!(seeded.liquidity.coin.value, 600);
    assert_eq!(amm.all_pair_length(), 1);
    assert_eq!(amm.registry().pair_at(0).unwrap().id, seeded.pair);

    // spot: 1 unidade de A vale 2.25 de B
    let pair = amm.get_pair(&seeded.pair).unwrap();
    assert_eq!(pair_spot_price(pair, &color(1)).unwrap(), 225 * WAD / 100);

    // A → B com input exato e proteção de 1%
    let quoted = amm.get_amount_out(40, color(1), color(2)).unwrap();
    let min_out = min_out_with_tolerance(quoted, 100).unwrap();
    let sold = amm
        .swap_exact_tokens_for_tokens(SwapExactIn {
            coin_in: coin(1, 40, 10),
            token_out: color(2),
            amount_in: 40,
            amount_out_min: min_out,
            recipient: bob,
        })
        .unwrap();
    // floor(40*997*900 / (400*1000 + 40*997)) = 81
    assert_eq!(sold.amount_out, 81);
    assert!(sold.change.is_none());

    // B → A com output exato
    let pair = amm.get_pair(&seeded.pair).unwrap();
    let (reserve_b, reserve_a) = pair.reserves_for(&color(2)).unwrap();
    assert_eq!((reserve_a, reserve_b), (440, 819));
    let max_in = max_in_with_tolerance(amm.get_amount_in(20, color(2), color(1)).unwrap(), 100).unwrap();
    let bought = amm
        .swap_tokens_for_exact_tokens(SwapExactOut {
            coin_in: coin(2, 100, 11),
            token_out: color(1),
            amount_out: 20,
            amount_in_max: max_in,
            recipient: bob,
        })
        .unwrap();
    assert_eq!(bought.output.coin.value, 20);
    assert_eq!(bought.change.unwrap().value, 100 - bought.amount_in);
    assert!(bought.amount_in <= max_in);

    // saque total devolve tudo o que ficou nas reservas
    let pair = amm.get_pair(&seeded.pair).unwrap().clone();
    let (ra, rb) = pair.reserves_for(&color(1)).unwrap();
    let out = amm
        .remove_liquidity(RemoveLiquidity {
            token_a: color(1),
            token_b: color(2),
            liquidity: QualifiedCoin::new(seeded.liquidity.coin, 20),
            amount_a_min: ra,
            amount_b_min: rb,
            recipient: alice,
        })
        .unwrap();
    assert_eq!((out.amount_a.coin.value, out.amount_b.coin.value), (ra, rb));
    assert!(ra * rb >= 400 * 900, "fees stay with LPs");

    let drained = amm.get_pair(&seeded.pair).unwrap();
    assert_eq!(drained.state(), PairState::Created);
    assert_eq!(drained.total_lp_supply, 0);

    // swap contra par vazio
    let err = amm
        .swap_exact_tokens_for_tokens(SwapExactIn {
            coin_in: coin(1, 10, 30),
            token_out: color(2),
            amount_in: 10,
            amount_out_min: 0,
            recipient: bob,
        })
        .unwrap_err();
    assert_eq!(err.code, AmmErrorCode::InsufficientLiquidity);

    // e o par aceita novo bootstrap
    let again = amm.add_liquidity(deposit(100, 100, 40, bob)).unwrap();
    assert_eq!(again.pair, seeded.pair);
    assert_eq!(again.liquidity.coin.value, 100);
    assert_eq!(amm.all_pair_length(), 1);
}

#[test]
fn lp_coin_of_another_pair_is_rejected() {
    let mut amm = Amm::new(AmmConfig::default());
    let ab = amm.add_liquidity(deposit(1_000, 1_000, 0, Recipient::default())).unwrap();
    amm.add_liquidity(AddLiquidity {
        coin_a: coin(1, 500, 5),
        coin_b: coin(3, 500, 6),
        amount_a_desired: 500,
        amount_b_desired: 500,
        amount_a_min: 0,
        amount_b_min: 0,
        recipient: Recipient::default(),
    })
    .unwrap();

    let err = amm
        .remove_liquidity(RemoveLiquidity {
            token_a: color(1),
            token_b: color(3),
            liquidity: QualifiedCoin::new(ab.liquidity.coin, 9),
            amount_a_min: 0,
            amount_b_min: 0,
            recipient: Recipient::default(),
        })
        .unwrap_err();
    assert_eq!(err.code, AmmErrorCode::ColorMismatch);
    assert_eq!(amm.all_pair_length(), 2);
}

#[test]
fn config_from_lookup_drives_new_pairs() {
    let config = AmmConfig::from_lookup(|key| match key {
        "AMM_FEE_BPS" => Some("100".to_string()),
        "AMM_MINIMUM_LIQUIDITY" => Some("10".to_string()),
        _ => None,
    })
    .unwrap();
    let mut amm = Amm::new(config);
    let out = amm.add_liquidity(deposit(400, 900, 0, Recipient::default())).unwrap();
    assert_eq!(out.liquidity.coin.value, 590);

    let pair = amm.get_pair(&out.pair).unwrap();
    assert_eq!(pair.fee, FeeRate::new(9_900, 10_000).unwrap());
    assert_eq!(pair.total_lp_supply, 600);
    // floor(100*9900*900 / (400*10000 + 100*9900)) = 178
    assert_eq!(amm.get_amount_out(100, color(1), color(2)).unwrap(), 178);
}
