use bevy::prelude::*;

use vault_scene::bridge::{host_channel, HostSender};
use vault_scene::render::{RendererResource, StackedCoinsRenderer};
use vault_scene::scene::{vault_plugin, Coin, VaultDoor};
use vault_scene::{HudState, Orchestrator};

/// Bare app with the vault pipeline and no window or render plugins.
fn vault_app(with_renderer: bool) -> (App, HostSender) {
    let (sender, channel) = host_channel();
    let mut app = App::new();
    app.init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<StandardMaterial>>()
        .init_resource::<Time>()
        .init_resource::<HudState>()
        .insert_resource(channel)
        .add_plugins(vault_plugin);
    if with_renderer {
        app.insert_resource(RendererResource::new(StackedCoinsRenderer::default()));
    }
    (app, sender)
}

fn coins(app: &mut App) -> Vec<Coin> {
    let world = app.world_mut();
    world.query::<&Coin>().iter(world).cloned().collect()
}

fn door(app: &mut App) -> (bool, f32) {
    let world = app.world_mut();
    let door = world.query::<&VaultDoor>().single(world);
    (door.is_open, door.angle)
}

#[test]
fn wallet_update_spawns_coins_and_opens_door() {
    let (mut app, sender) = vault_app(true);
    app.update();
    assert_eq!(door(&mut app), (false, 0.0));

    sender.send_wallet_json(
        r#"{"type":"setWallet","balances":[{"symbol":"eth","amount":3},{"symbol":"btc","amount":1234.5}]}"#,
    );
    app.update();

    let spawned = coins(&mut app);
    assert_eq!(spawned.iter().filter(|c| c.symbol == "ETH").count(), 3);
    assert_eq!(spawned.iter().filter(|c| c.symbol == "BTC").count(), 13);
    assert!(door(&mut app).0);

    let hud = app.world().resource::<HudState>();
    assert!(hud.door_open);
    assert_eq!(hud.total_coins(), 16);
}

#[test]
fn reset_clears_coins_and_snaps_door_shut() {
    let (mut app, sender) = vault_app(true);
    sender.send_wallet_json(r#"{"type":"setWallet","balances":[{"symbol":"eth","amount":5}]}"#);
    app.update();
    assert_eq!(coins(&mut app).len(), 5);

    sender.request_reset("");
    app.update();

    assert!(coins(&mut app).is_empty());
    assert_eq!(door(&mut app), (false, 0.0));
    assert!(!app.world().resource::<Orchestrator>().door_opened());
}

#[test]
fn later_update_in_the_same_frame_replaces_earlier_one() {
    let (mut app, sender) = vault_app(true);
    app.update();

    sender.send_wallet_json(r#"{"type":"setWallet","balances":[{"symbol":"eth","amount":4}]}"#);
    sender.send_wallet_json(r#"{"type":"setWallet","balances":[{"symbol":"sol","amount":2}]}"#);
    app.update();

    let spawned = coins(&mut app);
    assert_eq!(spawned.len(), 2);
    assert!(spawned.iter().all(|c| c.symbol == "SOL"));
}

#[test]
fn same_symbol_twice_stacks_without_overlap() {
    let (mut app, sender) = vault_app(true);
    sender.send_wallet_json(
        r#"{"type":"setWallet","balances":[{"symbol":"btc","amount":3},{"symbol":"BTC","amount":2}]}"#,
    );
    app.update();

    let world = app.world_mut();
    let mut heights: Vec<f32> = world
        .query::<(&Transform, &Coin)>()
        .iter(world)
        .map(|(transform, coin)| {
            assert_eq!(coin.symbol, "BTC");
            transform.translation.y
        })
        .collect();
    heights.sort_by(f32::total_cmp);
    heights.dedup();
    assert_eq!(heights.len(), 5);
}

#[test]
fn rejected_payload_leaves_scene_untouched() {
    let (mut app, sender) = vault_app(true);
    sender.send_wallet_json(r#"{"type":"setWallet","balances":[{"symbol":"eth","amount":2}]}"#);
    app.update();

    sender.send_wallet_json("{not json");
    sender.send_wallet_json(r#"{"type":"ping"}"#);
    app.update();

    assert_eq!(coins(&mut app).len(), 2);
    assert!(door(&mut app).0);
}

#[test]
fn late_renderer_gets_the_last_update() {
    let (mut app, sender) = vault_app(false);
    sender.send_wallet_json(r#"{"type":"setWallet","balances":[{"symbol":"btc","amount":7}]}"#);
    app.update();

    assert!(coins(&mut app).is_empty());
    assert!(app.world().resource::<Orchestrator>().door_opened());

    app.insert_resource(RendererResource::new(StackedCoinsRenderer::default()));
    app.update();

    let spawned = coins(&mut app);
    assert_eq!(spawned.len(), 7);
    assert!(spawned.iter().all(|c| c.symbol == "BTC" && c.count_per_coin == 1));
}
