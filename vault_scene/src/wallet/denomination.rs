//! Balance → coin denominations.
//!
//! A balance below 100 gets one coin per unit. Above that, each coin carries
//! `10^(digits - 2)` units so a stack never shows more than two significant
//! leading digits worth of coins.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Canonical symbol for balances that arrive without one.
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";

/// Largest per-coin value a batch can carry.
pub const MAX_DIVISOR: u32 = i32::MAX as u32;

/// Coin count ceiling for a single batch, bounding the `counts_per_coin`
/// allocation. Balances up to `MAX_DIVISOR * MAX_COINS_PER_BATCH` (about
/// 2.1e15) decompose exactly; larger ones saturate at that total and the
/// excess is not represented.
pub const MAX_COINS_PER_BATCH: usize = 1_000_000;

const BUCKET_THRESHOLD: f64 = 100.0;

/// One balance decomposed into discrete coins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinBatch {
    pub symbol: String,
    pub coin_count: usize,
    pub divisor: u32,
    pub counts_per_coin: Vec<u32>,
}

impl CoinBatch {
    pub fn is_empty(&self) -> bool {
        self.coin_count == 0
    }

    /// Sum of all coin values.
    pub fn total(&self) -> u64 {
        self.counts_per_coin.iter().map(|&c| u64::from(c)).sum()
    }
}

/// Uppercased, trimmed symbol; `UNKNOWN` when blank.
pub fn canonical_symbol(symbol: &str) -> String {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        UNKNOWN_SYMBOL.to_string()
    } else {
        trimmed.to_uppercase()
    }
}

fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_nan() || amount < 0.0 {
        0.0
    } else {
        amount
    }
}

/// Per-coin value for a (sanitized) amount.
pub fn choose_divisor(amount: f64) -> u32 {
    if amount < BUCKET_THRESHOLD {
        return 1;
    }

    let exponent = integer_digits(amount).saturating_sub(2);
    let divisor = 10f64.powi(exponent as i32);
    if divisor >= f64::from(MAX_DIVISOR) {
        MAX_DIVISOR
    } else {
        (divisor as u32).max(1)
    }
}

/// Decimal digit count of the integer part of `amount` (at least 1).
fn integer_digits(amount: f64) -> u32 {
    let amount = amount.max(1.0);
    if amount.is_infinite() {
        return f64::MAX_10_EXP as u32 + 1;
    }

    let mut digits = amount.log10().floor() as i32 + 1;
    // log10 can land a hair under an exact power of ten.
    if 10f64.powi(digits) <= amount {
        digits += 1;
    }
    if digits > 1 && 10f64.powi(digits - 1) > amount {
        digits -= 1;
    }
    digits.max(1) as u32
}

/// Decompose `amount` of `symbol` into coins. Never fails: blank symbols
/// become `UNKNOWN`, negative and NaN amounts become zero.
pub fn compute(symbol: &str, amount: f64) -> CoinBatch {
    let symbol = canonical_symbol(symbol);
    let amount = sanitize_amount(amount);
    let divisor = choose_divisor(amount);

    let raw_count = (amount / f64::from(divisor)).ceil();
    if raw_count <= 0.0 {
        return CoinBatch {
            symbol,
            coin_count: 0,
            divisor,
            counts_per_coin: Vec::new(),
        };
    }

    let coin_count = if raw_count >= MAX_COINS_PER_BATCH as f64 {
        MAX_COINS_PER_BATCH
    } else {
        raw_count as usize
    };

    let full_coins = coin_count - 1;
    let mut counts_per_coin = vec![divisor; full_coins];

    let last = match last_coin_value(amount, full_coins, divisor) {
        value if value <= 0 => divisor,
        value => value.min(i64::from(MAX_DIVISOR)) as u32,
    };
    counts_per_coin.push(last);

    CoinBatch {
        symbol,
        coin_count,
        divisor,
        counts_per_coin,
    }
}

/// `amount - full_coins * divisor`, rounded half away from zero.
/// Decimal arithmetic keeps values like 1234.5 - 1200 at exactly 34.5.
fn last_coin_value(amount: f64, full_coins: usize, divisor: u32) -> i64 {
    let full_value = Decimal::from(full_coins as u64) * Decimal::from(divisor);
    let decimal_remainder = Decimal::from_f64(amount)
        .and_then(|amount| amount.checked_sub(full_value))
        .and_then(|remainder| {
            remainder
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        });

    match decimal_remainder {
        Some(value) => value,
        None => {
            // Out of Decimal range; the float result is far from any rounding edge.
            let remainder = (amount - full_coins as f64 * f64::from(divisor)).round();
            if remainder >= i64::MAX as f64 {
                i64::MAX
            } else {
                remainder as i64
            }
        }
    }
}
