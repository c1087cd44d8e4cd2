//! # Command Parsing
//!
//! Text forms of swap requests, as used by the CLI and scripted scenarios.

use crate::game::Position;
use crate::input::SwapRequest;
use crate::{CascadeError, CascadeResult};

/// Parses `"x,y"`.
pub fn parse_position(text: &str) -> CascadeResult<Position> {
    let (x, y) = text
        .trim()
        .split_once(',')
        .ok_or_else(|| CascadeError::Parse(format!("expected 'x,y', got '{}'", text)))?;
    let coordinate = |part: &str| {
        part.trim()
            .parse::<i32>()
            .map_err(|err| CascadeError::Parse(format!("bad coordinate '{}': {}", part.trim(), err)))
    };
    Ok(Position::new(coordinate(x)?, coordinate(y)?))
}

/// Parses `"x1,y1:x2,y2"` into a swap request.
///
/// Only the syntax is checked here; bounds and adjacency are the engine's call.
///
/// # Examples
///
/// ```
/// use cascade::{parse_swap, Position};
///
/// let swap = parse_swap("0,0:1,0").unwrap();
/// assert_eq!(swap.from, Position::new(0, 0));
/// assert_eq!(swap.to, Position::new(1, 0));
/// assert!(parse_swap("0,0-1,0").is_err());
/// ```
pub fn parse_swap(text: &str) -> CascadeResult<SwapRequest> {
    let (from, to) = text
        .split_once(':')
        .ok_or_else(|| CascadeError::Parse(format!("expected 'x1,y1:x2,y2', got '{}'", text)))?;
    Ok(SwapRequest::new(parse_position(from)?, parse_position(to)?))
}

/// Parses one swap per line. Blank lines and `#` comments are skipped.
pub fn parse_script(text: &str) -> CascadeResult<Vec<SwapRequest>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_swap)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position_allows_spaces_and_negatives() {
        assert_eq!(parse_position(" 3 , -1 ").unwrap(), Position::new(3, -1));
        assert!(parse_position("3").is_err());
        assert!(parse_position("a,1").is_err());
    }

    #[test]
    fn test_parse_swap_rejects_garbage() {
        assert!(parse_swap("").is_err());
        assert!(parse_swap("1,1:").is_err());
        assert!(parse_swap("1,1:2,x").is_err());
    }

    #[test]
    fn test_parse_script() {
        let script = "# opening\n0,0:1,0\n\n 2,3 : 2,4 \n";
        let swaps = parse_script(script).unwrap();
        assert_eq!(swaps.len(), 2);
        assert_eq!(swaps[1], SwapRequest::new(Position::new(2, 3), Position::new(2, 4)));

        assert!(matches!(parse_script("0,0:1,0\nnope"), Err(CascadeError::Parse(_))));
    }
}
