//! Remote console bridge: runs client sessions on behalf of terminals that
//! connect over a [`Transport`], and the terminal loop on the other end.

use tokio::net::TcpListener;

use crate::client::ClientSession;
use crate::console::{Console, RemoteConsole};
use crate::protocol::{Message, PROTOCOL_VERSION};
use crate::registry::Registry;
use crate::sync::Shutdown;
use crate::transport::tcp::TcpTransport;
use crate::transport::Transport;

/// Exit code for a session that ended with a game result.
pub const EXIT_OK: i32 = 0;
/// Exit code for any failure: missing server, full game, termination.
pub const EXIT_FAILURE: i32 = 1;

/// Serve one connected terminal: handshake, run a client session against the
/// game hosted under `name`, then tell the terminal how to exit. Returns the
/// exit code sent.
pub async fn serve_terminal<T: Transport>(
    mut transport: T,
    registry: &Registry,
    name: &str,
) -> anyhow::Result<i32> {
    match transport.recv().await? {
        Message::Hello { version } if version == PROTOCOL_VERSION => {
            transport
                .send(Message::Hello {
                    version: PROTOCOL_VERSION,
                })
                .await?;
        }
        Message::Hello { version } => {
            log::warn!(
                "Terminal speaks protocol {}, expected {}",
                version,
                PROTOCOL_VERSION
            );
            let reason = format!(
                "Protocol version mismatch: expected {}, got {}",
                PROTOCOL_VERSION, version
            );
            transport
                .send(Message::Exit {
                    code: EXIT_FAILURE,
                    reason: Some(reason),
                })
                .await?;
            return Ok(EXIT_FAILURE);
        }
        other => return Err(anyhow::anyhow!("Expected Hello, got {:?}", other)),
    }

    let mut console = RemoteConsole::new(transport);
    let (result, session) = match ClientSession::connect(registry, name) {
        Ok(mut session) => {
            log::info!("Terminal attached as {}", session.player());
            (session.run(&mut console).await, Some(session))
        }
        Err(err) => (Err(err), None),
    };

    let (code, reason) = match &result {
        Ok(report) => {
            log::debug!("Session finished: {:?}", report);
            (EXIT_OK, None)
        }
        Err(err) => {
            log::warn!("Session failed: {}", err);
            (EXIT_FAILURE, Some(err.to_string()))
        }
    };
    if console.is_connected() {
        console
            .into_inner()
            .send(Message::Exit { code, reason })
            .await?;
    }

    // The opponent and the server may still be waiting on this player.
    if let (Err(_), Some(mut session)) = (result, session) {
        if let Err(err) = session.abandon().await {
            log::debug!("Forfeit of {} cut short: {}", session.player(), err);
        }
    }
    Ok(code)
}

/// Accept terminals until shutdown, serving each on its own task.
pub async fn accept_terminals(
    listener: TcpListener,
    registry: Registry,
    name: String,
    shutdown: Shutdown,
) -> anyhow::Result<()> {
    loop {
        let (stream, addr) = tokio::select! {
            _ = shutdown.triggered() => return Ok(()),
            accepted = listener.accept() => accepted?,
        };
        log::info!("Terminal connected from {}", addr);
        let registry = registry.clone();
        let name = name.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_terminal(TcpTransport::new(stream), &registry, &name).await {
                log::warn!("Terminal {} dropped: {:#}", addr, e);
            }
        });
    }
}

/// Drive a local console from a remote session until it sends `Exit`.
/// Returns the exit code to use.
pub async fn run_terminal<T, C>(mut transport: T, console: &mut C) -> anyhow::Result<i32>
where
    T: Transport,
    C: Console + ?Sized,
{
    transport
        .send(Message::Hello {
            version: PROTOCOL_VERSION,
        })
        .await?;
    loop {
        match transport.recv().await? {
            Message::Hello { .. } => {}
            Message::Output { text } => console.write(&text).await?,
            Message::InputRequest => {
                let line = console.read_line().await?;
                transport.send(Message::Input { line }).await?;
            }
            Message::Exit { code, reason } => {
                if let Some(reason) = reason {
                    console.write_line(&reason).await?;
                }
                return Ok(code);
            }
            Message::Input { .. } => {
                return Err(anyhow::anyhow!("Unexpected Input from server"));
            }
        }
    }
}
