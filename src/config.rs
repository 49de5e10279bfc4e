/// Rows and columns of a board.
pub const DIMENSION: usize = 4;
/// Cells covered by every ship.
pub const SHIP_LENGTH: usize = 3;
/// Hits needed to sink the opponent's ship and win.
pub const WINNING_HITS: usize = SHIP_LENGTH;
/// Number of players per hosted game.
pub const PLAYERS: usize = 2;

/// Well-known name under which the server hosts its game resources.
pub const DEFAULT_GAME_NAME: &str = "battleships";
/// Address the server exposes client sessions on.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7878";

/// Environment variable consulted for the log level.
pub const LOG_ENV_VAR: &str = "BATTLESHIPS_LOG";
