//! # Special Pieces
//!
//! Decides which special piece a resolved match produces, and which pieces an
//! activated special piece destroys.

use crate::game::{Board, Direction, MatchSet, Piece, PieceId, PieceType, Position};
use rand::Rng;

/// Reach of a bomb in each orthogonal direction.
pub const BOMB_RADIUS: i32 = 4;

/// Smallest match that can produce a special piece.
pub const SPECIAL_MATCH_THRESHOLD: usize = 4;

/// A special piece to create in place of one matched piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialSpawn {
    /// The matched piece that is promoted instead of destroyed
    pub piece_id: PieceId,
    pub position: Position,
    pub piece_type: PieceType,
}

/// Chooses the special type for a match of `count` pieces.
///
/// - fewer than 4 pieces: nothing
/// - combo round: Bomb
/// - 6 or more: Bomb
/// - exactly 5: RowClear or ColClear, 50/50
/// - exactly 4: striped version of `representative`
///
/// # Examples
///
/// ```
/// use cascade::{classify_match, PieceColor, PieceType};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let red = PieceType::Plain(PieceColor::Red);
/// assert_eq!(classify_match(3, true, red, &mut rng), None);
/// assert_eq!(classify_match(4, false, red, &mut rng), Some(PieceType::Striped(PieceColor::Red)));
/// assert_eq!(classify_match(4, true, red, &mut rng), Some(PieceType::Bomb));
/// assert_eq!(classify_match(7, false, red, &mut rng), Some(PieceType::Bomb));
/// ```
pub fn classify_match<R: Rng + ?Sized>(
    count: usize,
    is_combo: bool,
    representative: PieceType,
    rng: &mut R,
) -> Option<PieceType> {
    if count < SPECIAL_MATCH_THRESHOLD {
        return None;
    }
    if is_combo || count >= 6 {
        return Some(PieceType::Bomb);
    }
    if count == 5 {
        return Some(if rng.gen_bool(0.5) {
            PieceType::RowClear
        } else {
            PieceType::ColClear
        });
    }
    Some(representative.striped())
}

/// Plans the special piece for a match set, if any.
///
/// The representative color comes from the piece with the smallest coordinate;
/// the promoted piece is the one nearest the centroid of the match.
pub fn plan_special_spawn<R: Rng + ?Sized>(
    matches: &MatchSet,
    is_combo: bool,
    rng: &mut R,
) -> Option<SpecialSpawn> {
    let representative = matches.representative()?.piece_type;
    let piece_type = classify_match(matches.len(), is_combo, representative, rng)?;
    let centroid = matches.centroid_piece()?;
    Some(SpecialSpawn {
        piece_id: centroid.id,
        position: centroid.position,
        piece_type,
    })
}

/// Pieces destroyed when the special piece at `position` activates.
///
/// The result is clipped to the board and skips empty cells. Plain pieces and
/// empty cells have no blast.
pub fn blast_area(board: &Board, position: Position) -> MatchSet {
    let mut affected = MatchSet::new();
    let Some(piece_type) = board.type_at(position) else {
        return affected;
    };

    let mut add = |pos: Position| {
        if let Some(piece) = board.get_at(pos) {
            affected.insert(piece);
        }
    };

    match piece_type {
        PieceType::Plain(_) => {}
        PieceType::Striped(_) => {
            add(position);
            for neighbor in position.cardinal_adjacent_positions() {
                add(neighbor);
            }
        }
        PieceType::Bomb => {
            add(position);
            for direction in Direction::all() {
                for distance in 1..=BOMB_RADIUS {
                    add(position.offset(direction, distance));
                }
            }
        }
        PieceType::RowClear => {
            for x in 0..board.width() {
                add(Position::new(x, position.y));
            }
        }
        PieceType::ColClear => {
            for y in 0..board.height() {
                add(Position::new(position.x, y));
            }
        }
    }

    affected
}

/// Union of the blast areas of every special piece among `pieces`.
pub fn combined_blast_area(board: &Board, pieces: &[&Piece]) -> MatchSet {
    let mut affected = MatchSet::new();
    for piece in pieces.iter().filter(|piece| piece.is_special()) {
        affected.extend(&blast_area(board, piece.position));
    }
    affected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{find_all_matches, PieceColor};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    #[test]
    fn test_five_yields_line_clear() {
        let mut rng = rng();
        let mut seen_row = false;
        let mut seen_col = false;
        for _ in 0..64 {
            match classify_match(5, false, PieceType::Plain(PieceColor::Blue), &mut rng) {
                Some(PieceType::RowClear) => seen_row = true,
                Some(PieceType::ColClear) => seen_col = true,
                other => panic!("unexpected special {:?}", other),
            }
        }
        assert!(seen_row && seen_col);
    }

    #[test]
    fn test_striped_representative_keeps_color() {
        let mut rng = rng();
        assert_eq!(
            classify_match(4, false, PieceType::Striped(PieceColor::Orange), &mut rng),
            Some(PieceType::Striped(PieceColor::Orange))
        );
        assert_eq!(classify_match(4, false, PieceType::Bomb, &mut rng), Some(PieceType::Bomb));
    }

    #[test]
    fn test_plan_spawn_promotes_centroid() {
        let board = Board::parse("BYYYY").unwrap();
        let matches = find_all_matches(&board);
        let spawn = plan_special_spawn(&matches, false, &mut rng()).unwrap();
        assert_eq!(spawn.position, Position::new(2, 0));
        assert_eq!(spawn.piece_type, PieceType::Striped(PieceColor::Yellow));
        assert_eq!(spawn.piece_id, board.get(2, 0).unwrap().id);
    }

    #[test]
    fn test_plan_spawn_requires_four() {
        let board = Board::parse("YYY").unwrap();
        let matches = find_all_matches(&board);
        assert!(plan_special_spawn(&matches, true, &mut rng()).is_none());
    }

    #[test]
    fn test_striped_blast_is_plus_shape() {
        let board = Board::parse("RGB\nGrB\nBGR").unwrap();
        assert_eq!(blast_area(&board, Position::new(1, 1)).len(), 5);

        let corner = Board::parse("GB\nrG").unwrap();
        assert_eq!(blast_area(&corner, Position::new(0, 0)).len(), 3);
    }

    #[test]
    fn test_bomb_blast_in_center_of_large_board() {
        let row = "GBGBGBGBG";
        let mut rows: Vec<String> = (0..9).map(|_| row.to_string()).collect();
        rows[4] = "GBGB*BGBG".to_string();
        let board = Board::parse(&rows.join("\n")).unwrap();
        let area = blast_area(&board, Position::new(4, 4));
        assert_eq!(area.len(), 17);
    }

    #[test]
    fn test_row_and_column_clear() {
        let board = Board::parse("RGBY\nG-BY\nRG|Y").unwrap();
        let row = blast_area(&board, Position::new(1, 1));
        assert_eq!(row.len(), 4);
        assert!(row.iter().all(|p| p.position.y == 1));

        let column = blast_area(&board, Position::new(2, 0));
        assert_eq!(column.len(), 3);
        assert!(column.iter().all(|p| p.position.x == 2));
    }

    #[test]
    fn test_plain_piece_has_no_blast() {
        let board = Board::parse("RGB").unwrap();
        assert!(blast_area(&board, Position::new(0, 0)).is_empty());
        assert!(blast_area(&board, Position::new(9, 9)).is_empty());
    }

    #[test]
    fn test_combined_blast_deduplicates() {
        let board = Board::parse("RGBY\n-|BY\nRGBY").unwrap();
        let a = board.get(0, 1).unwrap();
        let b = board.get(1, 1).unwrap();
        let area = combined_blast_area(&board, &[a, b]);
        // row (4) + column (3) share (1,1)
        assert_eq!(area.len(), 6);
    }
}
