use std::time::Duration;

use battleships::console::{Console, ScriptedConsole};
use battleships::{
    ClientSession, GameServer, Phase, PlayerId, Registration, Registry, ResourceError,
    ServerError, SessionError, Shutdown,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::timeout;

const LIMIT: Duration = Duration::from_secs(5);

/// A player who never answers.
struct SilentConsole;

#[async_trait::async_trait]
impl Console for SilentConsole {
    async fn write(&mut self, _text: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        std::future::pending().await
    }
}

/// Reports every read, then waits for the test to hand over the line.
struct GatedConsole {
    reading: UnboundedSender<()>,
    lines: UnboundedReceiver<String>,
}

fn gated() -> (GatedConsole, UnboundedReceiver<()>, UnboundedSender<String>) {
    let (reading_tx, reading_rx) = unbounded_channel();
    let (lines_tx, lines_rx) = unbounded_channel();
    let console = GatedConsole {
        reading: reading_tx,
        lines: lines_rx,
    };
    (console, reading_rx, lines_tx)
}

#[async_trait::async_trait]
impl Console for GatedConsole {
    async fn write(&mut self, _text: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let _ = self.reading.send(());
        Ok(self.lines.recv().await)
    }
}

async fn start(
    name: &str,
) -> (
    Registry,
    Shutdown,
    tokio::sync::watch::Receiver<battleships::ServerStatus>,
    tokio::task::JoinHandle<Result<(), ServerError>>,
) {
    let registry = Registry::new();
    let shutdown = Shutdown::new();
    let server = GameServer::new(registry.clone(), name, shutdown.clone());
    let mut status = server.subscribe();
    let handle = tokio::spawn(async move { server.run().await });
    status
        .wait_for(|s| s.game == 1 && s.phase == Phase::AwaitingPlayers)
        .await
        .unwrap();
    (registry, shutdown, status, handle)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shutdown_while_waiting_for_second_player() {
    let (registry, shutdown, _status, handle) = start("lonely").await;

    let mut a = ClientSession::connect(&registry, "lonely").unwrap();
    let client = tokio::spawn(async move {
        let mut console = ScriptedConsole::new(["1 1 0"]);
        a.run(&mut console).await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!client.is_finished());

    shutdown.trigger();
    let result = timeout(LIMIT, client).await.unwrap().unwrap();
    assert!(matches!(result, Err(SessionError::ServerTerminated)));

    let server = timeout(LIMIT, handle).await.unwrap().unwrap();
    assert!(matches!(server, Err(ServerError::Terminated)));
    assert!(!registry.is_hosted("lonely"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shutdown_during_placement_wakes_waiting_player() {
    let (registry, shutdown, mut status, handle) = start("stalled").await;

    let mut a = ClientSession::connect(&registry, "stalled").unwrap();
    let mut b = ClientSession::connect(&registry, "stalled").unwrap();
    let ca = tokio::spawn(async move {
        let mut console = ScriptedConsole::new(["1 1 0", "0 0"]);
        a.run(&mut console).await
    });
    let cb = tokio::spawn(async move { b.run(&mut SilentConsole).await });

    // A has placed; B sits at its prompt forever.
    timeout(
        LIMIT,
        status.wait_for(|s| s.phase == Phase::AwaitingPlacement(PlayerId::Two)),
    )
    .await
    .unwrap()
    .unwrap();

    shutdown.trigger();
    let result = timeout(LIMIT, ca).await.unwrap().unwrap();
    assert!(matches!(result, Err(SessionError::ServerTerminated)));
    let server = timeout(LIMIT, handle).await.unwrap().unwrap();
    assert!(matches!(server, Err(ServerError::Terminated)));

    cb.abort();
}

#[tokio::test]
async fn test_connect_without_server() {
    let registry = Registry::new();
    let err = ClientSession::connect(&registry, "nobody").err().unwrap();
    assert!(matches!(
        err,
        SessionError::Resource(ResourceError::NotHosted(ref name)) if name == "nobody"
    ));
}

#[tokio::test]
async fn test_third_player_is_turned_away() {
    let registry = Registry::new();
    let _session = registry.host("full", Shutdown::new()).unwrap();

    let a = ClientSession::connect(&registry, "full").unwrap();
    let b = ClientSession::connect(&registry, "full").unwrap();
    assert_eq!((a.player(), b.player()), (PlayerId::One, PlayerId::Two));

    let err = ClientSession::connect(&registry, "full").err().unwrap();
    assert!(matches!(
        err,
        SessionError::Resource(ResourceError::GameFull(_))
    ));
}

#[tokio::test]
async fn test_connect_to_terminated_game() {
    let registry = Registry::new();
    let session = registry.host("over", Shutdown::new()).unwrap();
    session.state().mark_terminated();

    let err = ClientSession::connect(&registry, "over").err().unwrap();
    assert!(matches!(err, SessionError::ServerTerminated));
}

#[tokio::test]
async fn test_server_refuses_to_start_after_shutdown() {
    let shutdown = Shutdown::new();
    shutdown.trigger();
    let server = GameServer::new(Registry::new(), "late", shutdown);
    assert!(matches!(
        server.host_game().await,
        Err(ServerError::Terminated)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shutdown_while_player_types_placement() {
    let (registry, shutdown, _status, handle) = start("typing").await;
    let session = registry.attach("typing").unwrap();

    let (mut console, mut reading, lines) = gated();
    let mut a = ClientSession::connect(&registry, "typing").unwrap();
    let _b = ClientSession::connect(&registry, "typing").unwrap();
    let client = tokio::spawn(async move { a.run(&mut console).await });

    reading.recv().await.unwrap();
    shutdown.trigger();
    let server = timeout(LIMIT, handle).await.unwrap().unwrap();
    assert!(matches!(server, Err(ServerError::Terminated)));

    lines.send("1 1 0".into()).unwrap();
    let result = timeout(LIMIT, client).await.unwrap().unwrap();
    assert!(matches!(result, Err(SessionError::ServerTerminated)));
    assert_eq!(session.state().registration(), Registration::default());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shutdown_while_player_chooses_a_shot() {
    let (registry, shutdown, _status, handle) = start("aiming").await;
    let session = registry.attach("aiming").unwrap();

    let (mut console, mut reading, lines) = gated();
    let mut a = ClientSession::connect(&registry, "aiming").unwrap();
    let mut b = ClientSession::connect(&registry, "aiming").unwrap();
    let ca = tokio::spawn(async move { a.run(&mut console).await });
    let cb = tokio::spawn(async move {
        let mut console = ScriptedConsole::new(["2 2 1"]);
        b.run(&mut console).await
    });

    reading.recv().await.unwrap();
    lines.send("1 1 0".into()).unwrap();
    // Second read is the shot prompt: the server now waits on actionReady.
    reading.recv().await.unwrap();
    shutdown.trigger();
    let server = timeout(LIMIT, handle).await.unwrap().unwrap();
    assert!(matches!(server, Err(ServerError::Terminated)));

    lines.send("3 3".into()).unwrap();
    let ra = timeout(LIMIT, ca).await.unwrap().unwrap();
    assert!(matches!(ra, Err(SessionError::ServerTerminated)));
    let rb = timeout(LIMIT, cb).await.unwrap().unwrap();
    assert!(matches!(rb, Err(SessionError::ServerTerminated)));

    let action = session.state().action();
    assert_eq!((action.x, action.y), (0, 0));
    assert!(!action.give_up);
}
