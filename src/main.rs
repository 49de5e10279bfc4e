use battleships::bridge::{accept_terminals, run_terminal, EXIT_FAILURE};
use battleships::console::StdConsole;
use battleships::{
    init_logging, GameServer, Registry, ServerError, Shutdown, TcpTransport, DEFAULT_BIND_ADDR,
    DEFAULT_GAME_NAME,
};

use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Host games back to back until interrupted.
    Server {
        #[arg(long, default_value = DEFAULT_BIND_ADDR)]
        bind: String,
        #[arg(long, default_value = DEFAULT_GAME_NAME, help = "Name the game resources are hosted under")]
        name: String,
    },
    /// Join the game currently hosted by a server.
    Client {
        #[arg(long, default_value = DEFAULT_BIND_ADDR)]
        connect: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Server { bind, name } => run_server(&bind, name).await?,
        Commands::Client { connect } => run_client(&connect).await,
    };
    std::process::exit(code);
}

async fn run_server(bind: &str, name: String) -> anyhow::Result<i32> {
    let shutdown = Shutdown::new();
    let registry = Registry::new();

    let listener = TcpListener::bind(bind).await?;
    log::info!("Accepting players on {}", listener.local_addr()?);

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => log::warn!("caught interrupt, shutting down"),
                Err(e) => log::error!("cannot listen for interrupts: {}", e),
            }
            shutdown.trigger();
        });
    }

    let acceptor = tokio::spawn(accept_terminals(
        listener,
        registry.clone(),
        name.clone(),
        shutdown.clone(),
    ));

    let server = GameServer::new(registry, name, shutdown.clone());
    log::info!("Hosting games as `{}`", server.name());
    let result = server.run().await;
    shutdown.trigger();
    if let Ok(Err(e)) = acceptor.await {
        log::warn!("Acceptor stopped: {:#}", e);
    }

    match result {
        Ok(()) => Ok(0),
        Err(ServerError::Terminated) => {
            log::info!("Server terminated");
            Ok(EXIT_FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_client(addr: &str) -> i32 {
    let transport = match TcpTransport::connect(addr).await {
        Ok(t) => t,
        Err(e) => {
            eprintln!("battleships client: cannot reach a server at {}: {:#}", addr, e);
            return EXIT_FAILURE;
        }
    };
    let mut console = StdConsole::new();
    match run_terminal(transport, &mut console).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("battleships client: {:#}", e);
            EXIT_FAILURE
        }
    }
}
