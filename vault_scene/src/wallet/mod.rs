pub mod denomination;
pub mod message;

pub use denomination::{canonical_symbol, choose_divisor, compute, CoinBatch, UNKNOWN_SYMBOL};
pub use message::{parse, validate, Balance, Rejection, WalletUpdate, SET_WALLET};
