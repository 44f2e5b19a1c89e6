use crate::common::{MockPlayer, PlayerCall, RecordingView, TestContext};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use videocourse::player::{PlaybackState, PlayerEvent, PlayerStatus};
use videocourse::ControllerHandle;

struct Running {
    handle: ControllerHandle,
    player: MockPlayer,
    view: RecordingView,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
    start: Instant,
}

impl Running {
    /// Wait until `offset` after the test started
    async fn at(&self, offset: Duration) {
        sleep_until(self.start + offset).await;
    }
}

async fn spawn_controller() -> Running {
    let mut ctx = TestContext::with_defaults();
    ctx.controller.setup().await.unwrap();

    let start = Instant::now();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(ctx.controller.run(shutdown.clone()));

    Running {
        handle: ctx.handle,
        player: ctx.player,
        view: ctx.view,
        shutdown,
        task,
        start,
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[tokio::test(start_paused = true)]
async fn test_auto_start_hides_chrome_in_two_steps() {
    let running = spawn_controller().await;
    running.player.emit_ready(Duration::from_secs(60));

    running.at(ms(2900)).await;
    let view = running.view.snapshot();
    assert!(view.buttons_visible);
    assert!(view.progress_visible);
    assert_eq!(running.player.count(&PlayerCall::Play), 1);

    running.at(ms(3100)).await;
    let view = running.view.snapshot();
    assert!(!view.buttons_visible);
    assert!(view.progress_visible);
    assert_eq!(view.last_fade, Some(ms(300)));

    running.at(ms(4900)).await;
    assert!(running.view.snapshot().progress_visible);

    running.at(ms(5100)).await;
    let view = running.view.snapshot();
    assert!(!view.buttons_visible);
    assert!(!view.progress_visible);

    let snapshot = running.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert!(!snapshot.buttons_visible);
    assert!(!snapshot.progress_visible);
}

#[tokio::test(start_paused = true)]
async fn test_tap_shows_chrome_and_restarts_sequence() {
    let running = spawn_controller().await;
    running.player.emit_ready(Duration::from_secs(60));

    running.at(ms(4000)).await;
    assert!(!running.view.snapshot().buttons_visible);

    running.handle.tap().unwrap();
    running.at(ms(4100)).await;
    let view = running.view.snapshot();
    assert!(view.buttons_visible);
    assert!(view.progress_visible);

    // The original deadlines at 5s no longer apply
    running.at(ms(6900)).await;
    let view = running.view.snapshot();
    assert!(view.buttons_visible);
    assert!(view.progress_visible);

    running.at(ms(7100)).await;
    let view = running.view.snapshot();
    assert!(!view.buttons_visible);
    assert!(view.progress_visible);

    running.at(ms(9100)).await;
    assert!(!running.view.snapshot().progress_visible);
}

#[tokio::test(start_paused = true)]
async fn test_tap_after_full_hide() {
    let running = spawn_controller().await;
    running.player.emit_ready(Duration::from_secs(60));

    running.at(ms(6000)).await;
    running.handle.tap().unwrap();
    running.at(ms(6100)).await;
    let view = running.view.snapshot();
    assert!(view.buttons_visible && view.progress_visible);

    running.at(ms(9100)).await;
    assert!(!running.view.snapshot().buttons_visible);
    running.at(ms(11100)).await;
    assert!(!running.view.snapshot().progress_visible);
}

#[tokio::test(start_paused = true)]
async fn test_buttons_route_to_player() {
    let running = spawn_controller().await;
    running.player.emit_ready(Duration::from_secs(100));
    running.player.emit(PlayerEvent::PeriodicTick {
        position: Duration::from_secs(50),
        duration: Duration::from_secs(100),
    });
    // Player events and inputs use separate channels
    running.at(ms(10)).await;

    running.handle.fast_forward().unwrap();
    running.handle.rewind().unwrap();
    running.handle.scrub(0.1).unwrap();
    running.handle.play_pause().unwrap();

    let snapshot = running.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Paused);
    assert_eq!(snapshot.position.current, Duration::from_secs(10));
    assert_eq!(
        running.player.seeks(),
        vec![
            Duration::from_secs(55),
            Duration::from_secs(50),
            Duration::from_secs(10),
        ]
    );
    assert_eq!(running.player.count(&PlayerCall::Pause), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failure_keeps_controls_visible() {
    let running = spawn_controller().await;
    running.player.emit_ready(Duration::from_secs(60));
    running.player.emit(PlayerEvent::StatusChanged(PlayerStatus::Failed(
        "decoder error".to_string(),
    )));

    running.at(ms(10_000)).await;
    let view = running.view.snapshot();
    assert!(view.buttons_visible);
    assert!(view.progress_visible);
    assert_eq!(view.error.as_deref(), Some("decoder error"));

    let snapshot = running.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Failed);
    assert!(snapshot.controls_pinned);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_the_loop() {
    let running = spawn_controller().await;
    running.shutdown.cancel();
    running.task.await.unwrap();

    assert!(running.handle.tap().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handles_stops_the_loop() {
    let running = spawn_controller().await;
    let Running { handle, task, .. } = running;
    drop(handle);

    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("controller loop did not stop")
        .unwrap();
}
