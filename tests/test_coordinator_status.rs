mod common;
use common::*;

use solaredge_monitor::prelude::*;

#[tokio::test(start_paused = true)]
async fn test_boot_renders_wifi_status() -> Result<()> {
    let mut fixture = Fixture::new();

    fixture.tick().await?;

    let texts = fixture.surface.texts();
    assert_eq!(texts, vec!["Init WiFi connection", "Booting"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_status_renders_once_while_state_unchanged() -> Result<()> {
    let mut fixture = Fixture::new();

    fixture.tick().await?;
    fixture.tick().await?;
    fixture.tick().await?;

    let clears = fixture
        .surface
        .ops()
        .iter()
        .filter(|op| matches!(op, Op::Clear))
        .count();
    assert_eq!(clears, 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_state_change_rerenders_status() -> Result<()> {
    let mut fixture = Fixture::new();

    fixture.tick().await?;
    fixture.surface.take_ops();

    let _ = fixture
        .channels
        .network_events
        .send(NetworkState::Connecting);
    fixture.tick().await?;

    let texts = fixture.surface.texts();
    assert_eq!(texts, vec!["Init WiFi connection", "Connecting to WiFi"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_online_label_renders_before_connect_path() -> Result<()> {
    let mut fixture = Fixture::new();

    let _ = fixture
        .channels
        .network_events
        .send(NetworkState::Connecting);
    fixture.tick().await?;
    fixture.surface.take_ops();

    // going online still gets one status render; the connect path only
    // starts on the tick after
    fixture.go_online();
    fixture.tick().await?;

    assert_eq!(
        fixture.surface.texts(),
        vec!["Init WiFi connection", "Online"]
    );
    assert_eq!(fixture.transport.connect_attempts(), 0);

    fixture.tick().await?;
    assert_eq!(fixture.transport.connect_attempts(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_offline_interrupts_polling() -> Result<()> {
    let mut fixture = Fixture::new();
    fixture.tick_until_connected().await?;
    fixture.tick().await?;
    fixture.surface.take_ops();

    let _ = fixture.channels.network_events.send(NetworkState::Offline);
    fixture.tick().await?;

    assert_eq!(
        fixture.surface.texts(),
        vec!["Init WiFi connection", "Offline"]
    );

    // no register polling while the network is down
    tokio::time::advance(Duration::from_secs(10)).await;
    fixture.surface.take_ops();
    fixture.tick().await?;
    assert!(fixture.surface.ops().is_empty());
    Ok(())
}
