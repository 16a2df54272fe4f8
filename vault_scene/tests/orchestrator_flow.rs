use vault_scene::wallet::{compute, validate, Rejection};
use vault_scene::{Orchestrator, VaultCommand};

fn wallet(balances: &str) -> String {
    format!(r#"{{"type":"setWallet","balances":[{balances}]}}"#)
}

fn spawn(symbol: &str, counts: Vec<u32>) -> VaultCommand {
    VaultCommand::SpawnBatch {
        symbol: symbol.to_string(),
        counts,
    }
}

#[test]
fn deposit_reset_deposit_cycle() {
    let mut orchestrator = Orchestrator::new();
    let mut out = Vec::new();

    assert!(orchestrator.handle_wallet_text(
        &wallet(r#"{"symbol":"btc","amount":1234.5},{"symbol":"eth","amount":2}"#),
        &mut out,
    ));
    let btc = compute("btc", 1234.5);
    assert_eq!(
        out,
        vec![
            VaultCommand::OpenDoor,
            VaultCommand::Clear,
            spawn("BTC", btc.counts_per_coin.clone()),
            spawn("ETH", vec![1, 1]),
        ]
    );
    assert_eq!(btc.divisor, 100);
    assert_eq!(btc.coin_count, 13);
    assert_eq!(btc.counts_per_coin.last(), Some(&35));

    out.clear();
    orchestrator.handle_reset(&mut out);
    assert_eq!(out, vec![VaultCommand::Clear, VaultCommand::CloseDoor]);
    assert!(!orchestrator.door_opened());

    out.clear();
    orchestrator.handle_wallet_text(&wallet(r#"{"symbol":"sol","amount":0.4}"#), &mut out);
    assert_eq!(
        out,
        vec![
            VaultCommand::OpenDoor,
            VaultCommand::Clear,
            spawn("SOL", vec![1]),
        ]
    );
}

#[test]
fn rejected_payloads_change_nothing() {
    let mut orchestrator = Orchestrator::new();
    let mut out = Vec::new();

    for raw in ["", "   ", "{not json", r#"{"type":"ping"}"#, "{}", "null", "[1,2]"] {
        assert!(!orchestrator.handle_wallet_text(raw, &mut out), "{raw:?}");
    }

    assert!(out.is_empty());
    assert!(!orchestrator.door_opened());
    assert!(orchestrator.last_update().is_none());
}

#[test]
fn validator_reports_why_a_payload_was_rejected() {
    assert!(matches!(validate(""), Err(Rejection::Blank)));
    assert!(matches!(validate("{not json"), Err(Rejection::Malformed(_))));
    assert!(matches!(
        validate(r#"{"type":"ping"}"#),
        Err(Rejection::UnsupportedType(kind)) if kind == "ping"
    ));
}

#[test]
fn missing_balances_is_an_empty_update() {
    let mut orchestrator = Orchestrator::new();
    let mut out = Vec::new();

    assert!(orchestrator.handle_wallet_text(r#"{"type":"setWallet"}"#, &mut out));
    assert_eq!(out, vec![VaultCommand::Clear]);
    assert!(!orchestrator.door_opened());
}

#[test]
fn replay_after_open_skips_the_door() {
    let mut orchestrator = Orchestrator::new();
    let mut live = Vec::new();
    orchestrator.handle_wallet_text(&wallet(r#"{"symbol":"eth","amount":3}"#), &mut live);

    let mut replayed = Vec::new();
    assert!(orchestrator.replay_last(&mut replayed));

    assert_eq!(replayed, live[1..].to_vec());
}

#[test]
fn reset_keeps_the_last_update_for_replay() {
    let mut orchestrator = Orchestrator::new();
    orchestrator.handle_wallet_text(
        &wallet(r#"{"symbol":"eth","amount":1}"#),
        &mut vault_scene::NoopSink,
    );
    orchestrator.handle_reset(&mut vault_scene::NoopSink);

    let mut replayed = Vec::new();
    assert!(orchestrator.replay_last(&mut replayed));
    assert_eq!(
        replayed,
        vec![
            VaultCommand::OpenDoor,
            VaultCommand::Clear,
            spawn("ETH", vec![1]),
        ]
    );
}
