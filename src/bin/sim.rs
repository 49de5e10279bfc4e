use battleships::console::BotConsole;
use battleships::{ClientSession, GameServer, Phase, Registry, Shutdown};
use serde_json::json;

const GAME_NAME: &str = "sim";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let registry = Registry::new();
    let server = GameServer::new(registry.clone(), GAME_NAME, Shutdown::new());
    let mut status = server.subscribe();
    let host = tokio::spawn(async move { server.host_game().await });
    status
        .wait_for(|s| s.game == 1 && s.phase == Phase::AwaitingPlayers)
        .await?;

    let mut s1 = ClientSession::connect(&registry, GAME_NAME)?;
    let mut s2 = ClientSession::connect(&registry, GAME_NAME)?;
    let f1 = async move {
        let mut bot = BotConsole::new(seed1);
        s1.run(&mut bot).await
    };
    let f2 = async move {
        let mut bot = BotConsole::new(seed2);
        s2.run(&mut bot).await
    };
    let (r1, r2) = tokio::try_join!(f1, f2)?;
    let report = host.await??;

    let result = json!({
        "player1": r1,
        "player2": r2,
        "winner": format!("{}", report.result.winner()),
        "turns": report.turns,
    });
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
