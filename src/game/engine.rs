//! # Resolution Engine
//!
//! The swap/cascade state machine. It owns the board exclusively and advances
//! one discrete phase per [`ResolutionEngine::step`]:
//!
//! 1. `Swap` applies the tentative swap
//! 2. `Evaluate` either activates special pieces, rolls the swap back, or
//!    starts the cascade
//! 3. `Resolve` promotes a special piece, reports the round and destroys matches
//! 4. `Drop` applies gravity, `Refill` tops the board up, `Detect` looks for
//!    the next round
//!
//! Each phase reports a pause (the length of the animation it started). The
//! driver decides whether to wait; the simulation itself never depends on it.

use crate::config;
use crate::game::{
    combined_blast_area, find_all_matches, plan_special_spawn, Board, MatchSet, Piece, PieceId,
    PieceType, Position,
};
use crate::generation::{create_rng, BoardGenerator, GenerationConfig, Generator};
use crate::utils::{BoardLayout, WorldPosition};
use crate::{CascadeError, CascadeResult};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Externally visible resolution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Ready to accept a swap
    Idle,
    /// Tentative swap applied, evaluating or rolling back
    ResolvingSwap,
    /// Clearing matches, dropping and refilling
    ResolvingCascade,
}

/// Why a swap request was refused. The board is never touched.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapRejection {
    #[error("{0} or {1} is outside the board")]
    OutOfBounds(Position, Position),
    #[error("{0} and {1} are not orthogonal neighbors")]
    NotAdjacent(Position, Position),
    #[error("a resolution is already in progress")]
    Busy,
    #[error("the level is not active")]
    LevelInactive,
}

/// Signals and presentation commands emitted while resolving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// Move a piece's visual to its new cell
    PieceMoved {
        piece: PieceId,
        to: Position,
        target: WorldPosition,
        duration: Duration,
    },
    /// A refill piece appeared above the board
    PieceSpawned {
        piece: PieceId,
        piece_type: PieceType,
        position: Position,
        spawn_point: WorldPosition,
    },
    /// Pieces removed from the board
    PiecesDestroyed { positions: Vec<Position> },
    /// A matched piece was promoted in place
    SpecialCreated {
        piece: PieceId,
        piece_type: PieceType,
        position: Position,
    },
    /// Scoring signal, once per cascade round or special activation
    PieceMatched { count: usize, is_combo: bool },
    /// Effect signal at the centroid of a round (or at an activated special)
    MatchEffect {
        position: WorldPosition,
        count: usize,
        is_combo: bool,
    },
    /// The accepted swap cost a move
    MoveUsed,
    /// The swap produced nothing and was undone
    SwapRolledBack { first: Position, second: Position },
}

/// Result of one phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseOutcome {
    pub events: Vec<BoardEvent>,
    /// How long the presentation needs before the next phase
    pub pause: Duration,
}

impl PhaseOutcome {
    fn new(events: Vec<BoardEvent>, pause: Duration) -> Self {
        Self { events, pause }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Swap { first: Position, second: Position },
    Evaluate { first: Position, second: Position },
    /// Rollback animation is playing; next step returns to idle
    Finish,
    Resolve { matches: MatchSet, is_combo: bool },
    Drop { next_combo: bool },
    Refill { next_combo: bool },
    Detect { is_combo: bool },
}

impl Phase {
    fn state(&self) -> EngineState {
        match self {
            Phase::Idle => EngineState::Idle,
            Phase::Swap { .. } | Phase::Evaluate { .. } | Phase::Finish => EngineState::ResolvingSwap,
            Phase::Resolve { .. } | Phase::Drop { .. } | Phase::Refill { .. } | Phase::Detect { .. } => {
                EngineState::ResolvingCascade
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Swap { .. } => "swap",
            Phase::Evaluate { .. } => "evaluate",
            Phase::Finish => "finish",
            Phase::Resolve { .. } => "resolve",
            Phase::Drop { .. } => "drop",
            Phase::Refill { .. } => "refill",
            Phase::Detect { .. } => "detect",
        }
    }
}

/// Owns the board and runs swaps and cascades to completion.
#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    board: Board,
    layout: BoardLayout,
    generator: BoardGenerator,
    rng: StdRng,
    phase: Phase,
}

impl ResolutionEngine {
    /// Creates an engine with a freshly generated board.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{EngineState, GenerationConfig, ResolutionEngine};
    ///
    /// let engine = ResolutionEngine::new(&GenerationConfig::new(1)).unwrap();
    /// assert_eq!(engine.state(), EngineState::Idle);
    /// assert_eq!(engine.board().width(), 8);
    /// ```
    pub fn new(config: &GenerationConfig) -> CascadeResult<Self> {
        config.validate()?;
        let mut rng = create_rng(config);
        let generator = BoardGenerator::new(config.color_count);
        let board = generator.generate(config, &mut rng)?;
        let layout = BoardLayout::new(config.width, config.height, config.spacing)?;
        Ok(Self {
            board,
            layout,
            generator,
            rng,
            phase: Phase::Idle,
        })
    }

    /// Creates an engine around an existing board (scenarios and tests).
    ///
    /// Empty cells are allowed; they are filled by the first cascade.
    pub fn with_board(board: Board, color_count: usize, seed: u64) -> CascadeResult<Self> {
        if color_count == 0 {
            return Err(CascadeError::InvalidConfig(
                "color count must be positive".to_string(),
            ));
        }
        let layout = BoardLayout::new(board.width(), board.height(), config::DEFAULT_PIECE_SPACING)?;
        Ok(Self {
            board,
            layout,
            generator: BoardGenerator::new(color_count),
            rng: StdRng::seed_from_u64(seed),
            phase: Phase::Idle,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn state(&self) -> EngineState {
        self.phase.state()
    }

    /// True while a swap or cascade is in flight.
    pub fn is_processing(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn is_idle(&self) -> bool {
        !self.is_processing()
    }

    /// World position of a grid coordinate.
    pub fn world_position(&self, position: Position) -> WorldPosition {
        self.layout.grid_to_world(position)
    }

    /// Validates a swap request and queues it.
    ///
    /// No board mutation happens here; the swap is applied by the next
    /// [`step`](Self::step).
    pub fn try_swap(&mut self, first: Position, second: Position, level_active: bool) -> CascadeResult<()> {
        let rejection = if !self.board.contains(first) || !self.board.contains(second) {
            Some(SwapRejection::OutOfBounds(first, second))
        } else if self.is_processing() {
            Some(SwapRejection::Busy)
        } else if !level_active {
            Some(SwapRejection::LevelInactive)
        } else if !first.is_adjacent_to(second) {
            Some(SwapRejection::NotAdjacent(first, second))
        } else {
            None
        };

        if let Some(rejection) = rejection {
            debug!("swap {} <-> {} rejected: {}", first, second, rejection);
            return Err(CascadeError::InvalidSwap(rejection));
        }

        debug!("swap {} <-> {} accepted", first, second);
        self.phase = Phase::Swap { first, second };
        Ok(())
    }

    /// Boolean form of [`try_swap`](Self::try_swap).
    pub fn request_swap(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, level_active: bool) -> bool {
        self.try_swap(Position::new(x1, y1), Position::new(x2, y2), level_active)
            .is_ok()
    }

    /// Starts a cascade on the current board without a swap.
    ///
    /// Returns false when a resolution is already running.
    pub fn begin_cascade(&mut self) -> bool {
        if self.is_processing() {
            return false;
        }
        self.phase = Phase::Detect { is_combo: false };
        true
    }

    /// Executes one phase.
    pub fn step(&mut self) -> PhaseOutcome {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        trace!("engine phase: {}", phase.name());
        match phase {
            Phase::Idle => PhaseOutcome::default(),
            Phase::Swap { first, second } => self.apply_swap(first, second),
            Phase::Evaluate { first, second } => self.evaluate_swap(first, second),
            Phase::Finish => PhaseOutcome::default(),
            Phase::Resolve { matches, is_combo } => self.resolve_round(matches, is_combo),
            Phase::Drop { next_combo } => self.apply_gravity(next_combo),
            Phase::Refill { next_combo } => self.refill(next_combo),
            Phase::Detect { is_combo } => self.detect(is_combo),
        }
    }

    /// Steps until idle, ignoring pauses, and returns every event.
    pub fn run_to_idle(&mut self) -> Vec<BoardEvent> {
        let mut events = Vec::new();
        while self.is_processing() {
            events.extend(self.step().events);
        }
        events
    }

    /// Runs any matches currently on the board to completion.
    pub fn process_matches(&mut self) -> Vec<BoardEvent> {
        if !self.begin_cascade() {
            return Vec::new();
        }
        self.run_to_idle()
    }

    fn move_event(&self, piece: PieceId, to: Position, duration: Duration) -> BoardEvent {
        BoardEvent::PieceMoved {
            piece,
            to,
            target: self.layout.grid_to_world(to),
            duration,
        }
    }

    fn swap_and_announce(&mut self, first: Position, second: Position) -> Vec<BoardEvent> {
        if let Err(err) = self.board.swap_cells(first, second) {
            debug!("swap failed: {}", err);
            return Vec::new();
        }
        [first, second]
            .iter()
            .filter_map(|&pos| self.board.get_at(pos).map(|piece| (piece.id, pos)))
            .map(|(id, pos)| self.move_event(id, pos, config::SWAP_DURATION))
            .collect()
    }

    fn apply_swap(&mut self, first: Position, second: Position) -> PhaseOutcome {
        let events = self.swap_and_announce(first, second);
        self.phase = Phase::Evaluate { first, second };
        PhaseOutcome::new(events, config::SWAP_DURATION)
    }

    fn evaluate_swap(&mut self, first: Position, second: Position) -> PhaseOutcome {
        let special_involved = [first, second]
            .iter()
            .any(|&pos| self.board.get_at(pos).map_or(false, Piece::is_special));

        if special_involved {
            return self.activate_specials(first, second);
        }

        let matches = find_all_matches(&self.board);
        if matches.is_empty() {
            debug!("no match after swap {} <-> {}, rolling back", first, second);
            let mut events = self.swap_and_announce(first, second);
            events.push(BoardEvent::SwapRolledBack { first, second });
            self.phase = Phase::Finish;
            return PhaseOutcome::new(events, config::SWAP_DURATION);
        }

        self.phase = Phase::Resolve {
            matches,
            is_combo: false,
        };
        PhaseOutcome::new(vec![BoardEvent::MoveUsed], Duration::ZERO)
    }

    fn activate_specials(&mut self, first: Position, second: Position) -> PhaseOutcome {
        let swapped: Vec<&Piece> = [first, second]
            .iter()
            .filter_map(|&pos| self.board.get_at(pos))
            .collect();
        let affected = combined_blast_area(&self.board, &swapped);
        let count = affected.len();
        debug!(
            "special swap at {} / {} destroys {} pieces",
            first, second, count
        );

        let mut events = vec![
            BoardEvent::MoveUsed,
            BoardEvent::PieceMatched {
                count,
                is_combo: true,
            },
        ];
        for pos in [first, second] {
            events.push(BoardEvent::MatchEffect {
                position: self.layout.grid_to_world(pos),
                count,
                is_combo: true,
            });
        }
        events.push(self.destroy(&affected));

        self.phase = Phase::Drop { next_combo: false };
        PhaseOutcome::new(events, config::SPECIAL_CLEAR_PAUSE)
    }

    fn resolve_round(&mut self, mut matches: MatchSet, is_combo: bool) -> PhaseOutcome {
        let count = matches.len();
        let effect_position =
            WorldPosition::average(matches.iter().map(|piece| self.layout.grid_to_world(piece.position)));
        let mut events = Vec::new();

        if let Some(spawn) = plan_special_spawn(&matches, is_combo, &mut self.rng) {
            debug!(
                "creating {:?} at {} from {} matches (combo: {})",
                spawn.piece_type, spawn.position, count, is_combo
            );
            matches.remove(spawn.piece_id);
            if let Some(piece) = self.board.get_mut(spawn.position) {
                piece.promote(spawn.piece_type);
            }
            events.push(BoardEvent::SpecialCreated {
                piece: spawn.piece_id,
                piece_type: spawn.piece_type,
                position: spawn.position,
            });
        }

        events.push(BoardEvent::PieceMatched { count, is_combo });
        events.push(BoardEvent::MatchEffect {
            position: effect_position,
            count,
            is_combo,
        });
        events.push(self.destroy(&matches));

        self.phase = Phase::Drop { next_combo: true };
        PhaseOutcome::new(events, config::MATCH_CLEAR_PAUSE)
    }

    /// Clears every listed piece that is still where the set recorded it.
    fn destroy(&mut self, pieces: &MatchSet) -> BoardEvent {
        let mut positions = Vec::with_capacity(pieces.len());
        for piece in pieces.iter() {
            let still_there = self
                .board
                .get_at(piece.position)
                .map_or(false, |current| current.id == piece.id);
            if still_there {
                self.board.take(piece.position);
                positions.push(piece.position);
            }
        }
        BoardEvent::PiecesDestroyed { positions }
    }

    /// Stable per-column compaction toward y = 0.
    fn apply_gravity(&mut self, next_combo: bool) -> PhaseOutcome {
        let mut events = Vec::new();
        for x in 0..self.board.width() {
            for y in 1..self.board.height() {
                if self.board.get(x, y).is_none() {
                    continue;
                }
                let mut drop_y = y;
                while drop_y > 0 && self.board.get(x, drop_y - 1).is_none() {
                    drop_y -= 1;
                }
                if drop_y != y {
                    let piece = self.board.take(Position::new(x, y));
                    let id = piece.as_ref().map(|piece| piece.id);
                    self.board.set(x, drop_y, piece);
                    if let Some(id) = id {
                        events.push(self.move_event(id, Position::new(x, drop_y), config::DROP_DURATION));
                    }
                }
            }
        }

        let pause = if events.is_empty() {
            Duration::ZERO
        } else {
            config::DROP_DURATION
        };
        self.phase = Phase::Refill { next_combo };
        PhaseOutcome::new(events, pause)
    }

    /// Fills every empty cell with a random plain piece dropped in from above.
    fn refill(&mut self, next_combo: bool) -> PhaseOutcome {
        let mut events = Vec::new();
        let height = self.board.height();
        for x in 0..self.board.width() {
            for y in 0..height {
                if self.board.get(x, y).is_some() {
                    continue;
                }
                let position = Position::new(x, y);
                let piece = Piece::new(self.generator.random_plain_type(&mut self.rng), position);
                events.push(BoardEvent::PieceSpawned {
                    piece: piece.id,
                    piece_type: piece.piece_type,
                    position,
                    spawn_point: self.layout.grid_to_world(Position::new(x, height)),
                });
                events.push(self.move_event(piece.id, position, config::REFILL_DURATION));
                self.board.set(x, y, Some(piece));
            }
        }

        let pause = if events.is_empty() {
            Duration::ZERO
        } else {
            config::REFILL_DURATION
        };
        self.phase = Phase::Detect {
            is_combo: next_combo,
        };
        PhaseOutcome::new(events, pause)
    }

    fn detect(&mut self, is_combo: bool) -> PhaseOutcome {
        let matches = find_all_matches(&self.board);
        if matches.is_empty() {
            if !self.board.is_full() {
                // a cascade started on a board with holes still needs filling
                self.phase = Phase::Drop { next_combo: is_combo };
            } else {
                trace!("board stable");
            }
        } else {
            self.phase = Phase::Resolve { matches, is_combo };
        }
        PhaseOutcome::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PieceColor;

    fn engine(text: &str) -> ResolutionEngine {
        ResolutionEngine::with_board(Board::parse(text).unwrap(), 4, 11).unwrap()
    }

    #[test]
    fn test_rejections_leave_board_untouched() {
        let mut engine = engine("RGBY\nGBYR\nBYRG\nYRGB");
        let before = engine.board().type_map();

        assert!(!engine.request_swap(0, 0, 2, 0, true));
        assert!(!engine.request_swap(0, 0, 1, 1, true));
        assert!(!engine.request_swap(0, 0, 0, 0, true));
        assert!(!engine.request_swap(-1, 0, 0, 0, true));
        assert!(!engine.request_swap(3, 3, 4, 3, true));
        assert!(!engine.request_swap(0, 0, 1, 0, false));

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.board().type_map(), before);
    }

    #[test]
    fn test_rejection_reasons() {
        let mut engine = engine("RGBY\nGBYR\nBYRG\nYRGB");
        let err = engine
            .try_swap(Position::new(0, 0), Position::new(0, 2), true)
            .unwrap_err();
        assert!(matches!(err, CascadeError::InvalidSwap(SwapRejection::NotAdjacent(..))));

        let err = engine
            .try_swap(Position::new(0, 0), Position::new(1, 0), false)
            .unwrap_err();
        assert!(matches!(err, CascadeError::InvalidSwap(SwapRejection::LevelInactive)));

        engine.try_swap(Position::new(0, 0), Position::new(1, 0), true).unwrap();
        let err = engine
            .try_swap(Position::new(2, 0), Position::new(3, 0), true)
            .unwrap_err();
        assert!(matches!(err, CascadeError::InvalidSwap(SwapRejection::Busy)));
    }

    #[test]
    fn test_rollback_restores_board() {
        let mut engine = engine("RGBY\nGBYR\nBYRG\nYRGB");
        let before = engine.board().type_map();
        let ids_before: Vec<_> = engine.board().pieces().map(|p| (p.position, p.id)).collect();

        assert!(engine.request_swap(0, 0, 1, 0, true));
        let first = engine.step();
        assert_eq!(engine.state(), EngineState::ResolvingSwap);
        assert_eq!(first.pause, config::SWAP_DURATION);
        assert_ne!(engine.board().type_map(), before);

        let events = engine.run_to_idle();
        assert!(events.iter().any(|e| matches!(e, BoardEvent::SwapRolledBack { .. })));
        assert!(!events.iter().any(|e| matches!(e, BoardEvent::MoveUsed)));
        assert_eq!(engine.board().type_map(), before);

        let mut ids_after: Vec<_> = engine.board().pieces().map(|p| (p.position, p.id)).collect();
        let mut ids_before = ids_before;
        ids_before.sort();
        ids_after.sort();
        assert_eq!(ids_before, ids_after);
    }

    #[test]
    fn test_successful_swap_reports_round() {
        // swapping (0,0) R with (1,0) G lines up three reds on the bottom row
        let mut engine = engine("BYGB\nYBYG\nRGRR");
        assert!(engine.request_swap(0, 0, 1, 0, true));
        let events = engine.run_to_idle();

        let move_used = events.iter().position(|e| *e == BoardEvent::MoveUsed).unwrap();
        let matched = events
            .iter()
            .position(|e| matches!(e, BoardEvent::PieceMatched { .. }))
            .unwrap();
        assert!(move_used < matched);
        assert_eq!(
            events[matched],
            BoardEvent::PieceMatched {
                count: 3,
                is_combo: false
            }
        );
        assert_eq!(events.iter().filter(|e| **e == BoardEvent::MoveUsed).count(), 1);
        assert!(engine.board().is_full());
        assert!(find_all_matches(engine.board()).is_empty());
        assert!(!engine.is_processing());
    }

    #[test]
    fn test_four_match_creates_striped_at_centroid() {
        let mut engine = engine("YBYB\nBYGY\nGGBG");
        // lifting the green at (2,1) into the bottom row makes GGGG
        assert!(engine.request_swap(2, 0, 2, 1, true));
        engine.step(); // swap
        engine.step(); // evaluate
        let outcome = engine.step(); // resolve
        let created = outcome
            .events
            .iter()
            .find_map(|e| match e {
                BoardEvent::SpecialCreated {
                    piece_type,
                    position,
                    ..
                } => Some((*piece_type, *position)),
                _ => None,
            })
            .unwrap();
        assert_eq!(created.0, PieceType::Striped(PieceColor::Green));
        assert_eq!(created.1, Position::new(1, 0));
        assert_eq!(
            engine.board().type_at(Position::new(1, 0)),
            Some(PieceType::Striped(PieceColor::Green))
        );
        assert!(outcome.events.contains(&BoardEvent::PieceMatched {
            count: 4,
            is_combo: false
        }));
    }

    #[test]
    fn test_special_swap_skips_detection_and_has_no_rollback() {
        let mut engine = engine("RGBY\nGB*R\nBYRG\nYRGB");
        assert!(engine.request_swap(2, 2, 2, 1, true));
        let events = engine.run_to_idle();

        assert_eq!(events.iter().filter(|e| **e == BoardEvent::MoveUsed).count(), 1);
        assert!(!events.iter().any(|e| matches!(e, BoardEvent::SwapRolledBack { .. })));
        let first_match = events
            .iter()
            .find(|e| matches!(e, BoardEvent::PieceMatched { .. }))
            .unwrap();
        // bomb lands at (2,1): itself, (2,0),(2,2),(2,3),(0,1),(1,1),(3,1)
        assert_eq!(
            *first_match,
            BoardEvent::PieceMatched {
                count: 7,
                is_combo: true
            }
        );
        let first_destroy = events
            .iter()
            .position(|e| matches!(e, BoardEvent::PiecesDestroyed { .. }))
            .unwrap();
        let effects = events[..first_destroy]
            .iter()
            .filter(|e| matches!(e, BoardEvent::MatchEffect { is_combo: true, count: 7, .. }))
            .count();
        assert_eq!(effects, 2);
        assert!(engine.board().is_full());
    }

    #[test]
    fn test_gravity_preserves_column_order() {
        let mut engine = engine("R\nG\n.\nB\n.");
        let column_before: Vec<_> = [4, 3, 1]
            .iter()
            .map(|&y| engine.board().get(0, y).unwrap().id)
            .collect();

        let outcome = engine.apply_gravity(false);
        assert_eq!(outcome.pause, config::DROP_DURATION);
        let column_after: Vec<_> = [2, 1, 0]
            .iter()
            .map(|&y| engine.board().get(0, y).unwrap().id)
            .collect();
        assert_eq!(column_before, column_after);
        assert!(engine.board().get(0, 3).is_none());
        assert!(engine.board().get(0, 4).is_none());
    }

    #[test]
    fn test_refill_only_plain_pieces() {
        let mut engine = engine("..\n..\n..");
        let outcome = engine.refill(false);
        assert!(engine.board().is_full());
        assert_eq!(outcome.pause, config::REFILL_DURATION);
        assert!(engine.board().pieces().all(|p| !p.is_special()));
    }

    #[test]
    fn test_process_matches_on_idle_board() {
        let mut engine = engine("RGBY\nGBYR\nRRRG");
        let events = engine.process_matches();
        assert!(events.contains(&BoardEvent::PieceMatched {
            count: 3,
            is_combo: false
        }));
        assert!(!events.contains(&BoardEvent::MoveUsed));
        assert!(engine.is_idle());
        assert!(find_all_matches(engine.board()).is_empty());
    }
}
