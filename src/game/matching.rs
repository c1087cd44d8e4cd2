//! # Match Detection
//!
//! Finds every piece that is part of a horizontal or vertical run of three or
//! more identically typed pieces.

use crate::game::{Board, Piece, PieceId, PieceType, Position};

/// The pieces gathered by one detection pass.
///
/// Pieces are kept ordered by coordinate (x, then y) so that "first piece" and
/// centroid tie-breaks are deterministic. Duplicates collapse by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    pieces: Vec<Piece>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from any collection of pieces.
    pub fn from_pieces<'a, I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = &'a Piece>,
    {
        let mut set = Self::new();
        for piece in pieces {
            set.insert(piece);
        }
        set
    }

    /// Adds a piece unless one with the same identity is already present.
    pub fn insert(&mut self, piece: &Piece) -> bool {
        if self.contains(piece.id) {
            return false;
        }
        let index = self
            .pieces
            .partition_point(|existing| existing.position < piece.position);
        self.pieces.insert(index, piece.clone());
        true
    }

    /// Merges another set into this one.
    pub fn extend(&mut self, other: &MatchSet) {
        for piece in other.iter() {
            self.insert(piece);
        }
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.pieces.iter().any(|piece| piece.id == id)
    }

    /// Removes a piece by identity.
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let index = self.pieces.iter().position(|piece| piece.id == id)?;
        Some(self.pieces.remove(index))
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.pieces.iter().map(|piece| piece.position).collect()
    }

    /// The piece with the lexicographically smallest coordinate.
    pub fn representative(&self) -> Option<&Piece> {
        self.pieces.first()
    }

    /// Mean grid coordinate of all pieces.
    pub fn centroid(&self) -> Option<(f32, f32)> {
        if self.pieces.is_empty() {
            return None;
        }
        let n = self.pieces.len() as f32;
        let (sx, sy) = self.pieces.iter().fold((0.0f32, 0.0f32), |(sx, sy), piece| {
            (sx + piece.position.x as f32, sy + piece.position.y as f32)
        });
        Some((sx / n, sy / n))
    }

    /// The piece nearest the centroid; ties go to the first piece in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{find_all_matches, Board, Position};
    ///
    /// let board = Board::parse("GGGGG").unwrap();
    /// let matches = find_all_matches(&board);
    /// assert_eq!(matches.centroid_piece().unwrap().position, Position::new(2, 0));
    /// ```
    pub fn centroid_piece(&self) -> Option<&Piece> {
        let (cx, cy) = self.centroid()?;
        let mut best: Option<(&Piece, f32)> = None;
        for piece in &self.pieces {
            let dx = piece.position.x as f32 - cx;
            let dy = piece.position.y as f32 - cy;
            let distance = (dx * dx + dy * dy).sqrt();
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((piece, distance)),
            }
        }
        best.map(|(piece, _)| piece)
    }
}

/// Scans every row and column and returns all pieces in runs of ≥3 equal types.
///
/// # Examples
///
/// ```
/// use cascade::{find_all_matches, Board};
///
/// let board = Board::parse("RRRG\nBGBB").unwrap();
/// assert_eq!(find_all_matches(&board).len(), 3);
/// ```
pub fn find_all_matches(board: &Board) -> MatchSet {
    let mut matched = MatchSet::new();

    for y in 0..board.height() {
        scan_line(board, &mut matched, (0..board.width()).map(|x| Position::new(x, y)));
    }
    for x in 0..board.width() {
        scan_line(board, &mut matched, (0..board.height()).map(|y| Position::new(x, y)));
    }

    matched
}

/// Adds every run of ≥3 along one row or column.
fn scan_line<I>(board: &Board, matched: &mut MatchSet, line: I)
where
    I: Iterator<Item = Position>,
{
    let mut run: Vec<&Piece> = Vec::new();
    for position in line {
        match board.get_at(position) {
            Some(piece) if run.last().map_or(false, |last| last.piece_type == piece.piece_type) => {
                run.push(piece);
            }
            cell => {
                flush_run(&run, matched);
                run.clear();
                if let Some(piece) = cell {
                    run.push(piece);
                }
            }
        }
    }
    flush_run(&run, matched);
}

fn flush_run(run: &[&Piece], matched: &mut MatchSet) {
    if run.len() >= 3 {
        for piece in run {
            matched.insert(piece);
        }
    }
}

/// Length of the same-type run through `position` along one axis, counting a
/// hypothetical piece of `piece_type` placed there.
fn run_length_through(board: &Board, position: Position, piece_type: PieceType, step: Position) -> usize {
    let mut count = 1;
    for sign in [1, -1] {
        let delta = Position::new(step.x * sign, step.y * sign);
        let mut cursor = position + delta;
        while board.type_at(cursor) == Some(piece_type) {
            count += 1;
            cursor = cursor + delta;
        }
    }
    count
}

/// Would placing `piece_type` at `position` complete a run of three or more?
///
/// Horizontal and vertical runs are counted independently, each including the
/// placed piece.
pub fn would_create_match(board: &Board, position: Position, piece_type: PieceType) -> bool {
    run_length_through(board, position, piece_type, Position::new(1, 0)) >= 3
        || run_length_through(board, position, piece_type, Position::new(0, 1)) >= 3
}

/// Adjacent swaps that would either line up a run or fire a special piece.
///
/// Each pair is listed once, left or lower cell first.
pub fn productive_swaps(board: &Board) -> Vec<(Position, Position)> {
    let mut swaps = Vec::new();
    let mut scratch = board.clone();
    for first in board.positions() {
        for second in [Position::new(first.x + 1, first.y), Position::new(first.x, first.y + 1)] {
            if !board.contains(second) {
                continue;
            }
            let fires_special = [first, second]
                .iter()
                .any(|&pos| board.get_at(pos).map_or(false, Piece::is_special));
            if fires_special {
                swaps.push((first, second));
                continue;
            }
            if scratch.swap_cells(first, second).is_err() {
                continue;
            }
            let lines_up = !find_all_matches(&scratch).is_empty();
            if scratch.swap_cells(first, second).is_err() {
                scratch = board.clone();
            }
            if lines_up {
                swaps.push((first, second));
            }
        }
    }
    swaps
}
