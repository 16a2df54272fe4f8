//! Coin Vault. Reads wallet balances from the host on stdin and runs the
//! vault_scene app.

use bevy::prelude::*;
use vault_scene::config::vault_config;
use vault_scene::sdk::VaultBuilder;

fn main() -> AppExit {
    let _ = dotenvy::dotenv();
    let config = vault_config().unwrap_or_else(|err| panic!("coin_vault: {err}"));

    VaultBuilder::from_config(config)
        .build()
        .unwrap_or_else(|err| panic!("coin_vault: {err}"))
        .run()
}
