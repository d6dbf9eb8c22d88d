use anyhow::Result;
use std::time::Instant;

use cpamm_core::amm::{AddLiquidity, Amm, AmmConfig, Coin, Nonce, QualifiedCoin, Recipient, SwapExactIn, TokenColor};
use cpamm_core::telemetry;

fn color(tag: u8) -> TokenColor {
    TokenColor([tag; 32])
}

fn coin(tag: u8, value: u128, seq: u64) -> QualifiedCoin {
    let mut nonce = [0u8; 32];
    nonce[..8].copy_from_slice(&seq.to_le_bytes());
    nonce[31] = tag;
    QualifiedCoin::new(Coin::new(color(tag), value, Nonce(nonce)), seq)
}

#[tokio::main]
async fn main() -> Result<()> {
    let tel = telemetry::init("cpamm-core")?;
    let mut amm = Amm::new(AmmConfig::from_env()?);
    let lp = Recipient([0xAA; 32]);

    amm.add_liquidity(AddLiquidity {
        coin_a: coin(1, 1_000_000, 0),
        coin_b: coin(2, 4_000_000, 1),
        amount_a_desired: 1_000_000,
        amount_b_desired: 4_000_000,
        amount_a_min: 0,
        amount_b_min: 0,
        recipient: lp,
    })?;

    for i in 0..5u32 {
        let span = telemetry::make_info_span("swap", i, "obs_demo");
        let _guard = span.enter();

        let (reserve_in, reserve_out) = amm.find_pair(color(1), color(2))?.reserves_for(&color(1))?;
        let amount_in = 10_000 * u128::from(i + 1);
        let quoted = amm.get_amount_out(amount_in, color(1), color(2))?;

        let t0 = Instant::now();
        let req = SwapExactIn {
            coin_in: coin(1, amount_in, 100 + u64::from(i)),
            token_out: color(2),
            amount_in,
            amount_out_min: quoted,
            recipient: Recipient([i as u8; 32]),
        };
        match amm.swap_exact_tokens_for_tokens(req) {
            Ok(outcome) => tel.record_swap(&outcome, reserve_in, reserve_out, t0.elapsed()),
            Err(err) => tel.record_rejection("swap_exact_in", err.code.code()),
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    // slippage impossível: deve ser rejeitado e contado
    let req = SwapExactIn {
        coin_in: coin(1, 1_000, 999),
        token_out: color(2),
        amount_in: 1_000,
        amount_out_min: u128::MAX,
        recipient: lp,
    };
    if let Err(err) = amm.swap_exact_tokens_for_tokens(req) {
        tel.record_rejection("swap_exact_in", err.code.code());
    }

    tel.shutdown();
    Ok(())
}
