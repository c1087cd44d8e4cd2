//! # Text Display
//!
//! Boards are drawn top row first so that "up" on screen is +y on the board.

use crate::game::{Board, BoardEvent, GameState, PieceType};
use crate::level::LevelOutcome;
use std::fmt::{self, Write};

/// Symbol drawn for an empty cell.
pub const EMPTY_SYMBOL: char = '.';

/// Symbol for a cell's contents.
pub fn cell_symbol(piece_type: Option<PieceType>) -> char {
    piece_type.map_or(EMPTY_SYMBOL, PieceType::symbol)
}

impl fmt::Display for Board {
    /// Same format [`Board::parse`] reads.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height()).rev() {
            for x in 0..self.width() {
                let symbol = cell_symbol(self.get(x, y).map(|piece| piece.piece_type));
                f.write_char(symbol)?;
            }
            if y > 0 {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}

/// Draws a board with row and column labels.
///
/// # Examples
///
/// ```
/// use cascade::{render_board, Board};
///
/// let board = Board::parse("RG\nBY").unwrap();
/// assert_eq!(render_board(&board), "1 R G\n0 B Y\n  0 1");
/// ```
pub fn render_board(board: &Board) -> String {
    let label_width = (board.height() - 1).max(0).to_string().len();
    let mut out = String::new();
    for y in (0..board.height()).rev() {
        let cells: Vec<String> = (0..board.width())
            .map(|x| cell_symbol(board.get(x, y).map(|piece| piece.piece_type)).to_string())
            .collect();
        let _ = writeln!(out, "{:>width$} {}", y, cells.join(" "), width = label_width);
    }
    let columns: Vec<String> = (0..board.width())
        .map(|x| (x % 10).to_string())
        .collect();
    let _ = write!(out, "{:width$} {}", "", columns.join(" "), width = label_width);
    out
}

/// One-line level summary: level, score, moves or time, outcome.
pub fn render_status(game: &GameState) -> String {
    let session = game.session();
    let level = session.level();
    let budget = if session.is_timed() {
        format!("time {:.1}s", session.remaining_time())
    } else {
        format!("moves {}", session.remaining_moves())
    };
    let outcome = match session.outcome() {
        LevelOutcome::InProgress => "in progress".to_string(),
        LevelOutcome::Completed { reward } => format!("complete (reward {})", reward),
        LevelOutcome::Failed => "failed".to_string(),
    };
    format!(
        "Level {} '{}' | score {}/{} | {} | {}",
        level.level_number,
        level.name,
        session.score(),
        level.target_score,
        budget,
        outcome
    )
}

/// Human-readable line for an event, or None for animation-only events.
pub fn describe_event(event: &BoardEvent) -> Option<String> {
    match event {
        BoardEvent::PieceMatched { count, is_combo } => Some(if *is_combo {
            format!("combo: {} pieces matched", count)
        } else {
            format!("{} pieces matched", count)
        }),
        BoardEvent::SpecialCreated {
            piece_type,
            position,
            ..
        } => Some(format!("{:?} created at {}", piece_type, position)),
        BoardEvent::SwapRolledBack { first, second } => {
            Some(format!("no match, swap {} <-> {} undone", first, second))
        }
        BoardEvent::MoveUsed => Some("move used".to_string()),
        _ => None,
    }
}

/// Bounded log of messages for the text UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<String>,
    max_messages: usize,
}

impl MessageLog {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages: max_messages.max(1),
        }
    }

    /// Adds a message, dropping the oldest beyond capacity.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// Adds the description of every event that has one.
    pub fn record_events(&mut self, events: &[BoardEvent]) {
        for message in events.iter().filter_map(describe_event) {
            self.add_message(message);
        }
    }

    /// The last `count` messages, oldest first.
    pub fn recent(&self, count: usize) -> &[String] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;

    #[test]
    fn test_display_matches_parse_format() {
        let text = "R*.\nr-|\nOPY";
        let board = Board::parse(text).unwrap();
        assert_eq!(board.to_string(), text);
        assert_eq!(Board::parse(&board.to_string()).unwrap().type_map(), board.type_map());
    }

    #[test]
    fn test_render_board_pads_row_labels() {
        let rows: Vec<&str> = vec!["RG"; 11];
        let board = Board::parse(&rows.join("\n")).unwrap();
        let rendered = render_board(&board);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "10 R G");
        assert_eq!(lines[10], " 0 R G");
        assert_eq!(lines[11], "   0 1");
    }

    #[test]
    fn test_describe_event() {
        assert_eq!(
            describe_event(&BoardEvent::PieceMatched {
                count: 4,
                is_combo: true
            }),
            Some("combo: 4 pieces matched".to_string())
        );
        assert!(describe_event(&BoardEvent::PiecesDestroyed {
            positions: vec![Position::new(0, 0)]
        })
        .is_none());
    }

    #[test]
    fn test_message_log_is_bounded() {
        let mut log = MessageLog::new(2);
        log.record_events(&[
            BoardEvent::MoveUsed,
            BoardEvent::PieceMatched {
                count: 3,
                is_combo: false,
            },
            BoardEvent::SwapRolledBack {
                first: Position::new(0, 0),
                second: Position::new(1, 0),
            },
        ]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.recent(1)[0], "no match, swap (0, 0) <-> (1, 0) undone");
        assert_eq!(log.recent(10).len(), 2);
    }
}
