//! Parsing of the client's line-oriented input.

use crate::config::DIMENSION;
use crate::shared::Registration;

/// A move typed during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Shot { x: usize, y: usize },
    GiveUp,
}

/// Parse `"x y"` or `"q"`. `None` means the line must be re-entered.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.starts_with('q') {
        return Some(Command::GiveUp);
    }
    let mut parts = line.split_whitespace();
    let x = parse_coord(parts.next()?)?;
    let y = parse_coord(parts.next()?)?;
    Some(Command::Shot { x, y })
}

fn parse_coord(token: &str) -> Option<usize> {
    let v: usize = token.parse().ok()?;
    (v < DIMENSION).then_some(v)
}

/// Read `"x y orientation"` verbatim into a registration record. Nothing is
/// validated here: missing or non-numeric fields become `-1`, which the
/// server ignores like any other unusable placement.
pub fn parse_placement(line: &str) -> Registration {
    let mut fields = line
        .split_whitespace()
        .map(|t| t.parse::<i32>().unwrap_or(-1));
    Registration {
        x: fields.next().unwrap_or(-1),
        y: fields.next().unwrap_or(-1),
        orientation: fields.next().unwrap_or(-1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shot_in_range() {
        assert_eq!(parse_command("2 3\n"), Some(Command::Shot { x: 2, y: 3 }));
        assert_eq!(parse_command("  0   0 "), Some(Command::Shot { x: 0, y: 0 }));
    }

    #[test]
    fn shot_out_of_range_or_garbage_is_rejected() {
        assert_eq!(parse_command("4 0"), None);
        assert_eq!(parse_command("1"), None);
        assert_eq!(parse_command("a b"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("-1 2"), None);
    }

    #[test]
    fn q_gives_up() {
        assert_eq!(parse_command("q"), Some(Command::GiveUp));
        assert_eq!(parse_command("quit\n"), Some(Command::GiveUp));
    }

    #[test]
    fn placement_is_taken_verbatim() {
        assert_eq!(
            parse_placement("1 2 3"),
            Registration { x: 1, y: 2, orientation: 3 }
        );
        assert_eq!(
            parse_placement("9 9 7"),
            Registration { x: 9, y: 9, orientation: 7 }
        );
        assert_eq!(
            parse_placement("1 x"),
            Registration { x: 1, y: -1, orientation: -1 }
        );
    }
}
