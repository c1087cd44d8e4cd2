//! # Game State Module
//!
//! Coordination between the resolution engine and the level systems.
//!
//! [`GameState`] owns the engine, the level session, the score keeper and any
//! effect observers. The engine only emits [`BoardEvent`]s; this module routes
//! them: score signals go through the score keeper into the session, move
//! signals go to the session, effect signals go to the observers. Nothing is
//! looked up globally.

use crate::game::{BoardEvent, Board, PhaseOutcome, Position, ResolutionEngine};
use crate::level::{LevelData, LevelOutcome, LevelSession, ScoreKeeper, ScoreRules};
use crate::utils::WorldPosition;
use crate::{CascadeError, CascadeResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Receives visual effect requests.
pub trait EffectsSink {
    /// A round resolved (or specials fired) around `position`.
    fn match_effect(&mut self, position: WorldPosition, count: usize, is_combo: bool);
}

/// Session statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Swaps that passed validation
    pub swaps_accepted: u32,
    /// Swaps refused before touching the board
    pub swaps_rejected: u32,
    /// Accepted swaps that were undone
    pub swaps_rolled_back: u32,
    /// Scored rounds, including special activations
    pub rounds_resolved: u32,
    /// Rounds flagged as combos
    pub combo_rounds: u32,
    /// Special pieces created by large matches
    pub specials_created: u32,
    /// Pieces removed from the board
    pub pieces_cleared: u64,
    /// Moves spent
    pub moves_used: u32,
}

impl GameStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a board event.
    pub fn update_from_event(&mut self, event: &BoardEvent) {
        match event {
            BoardEvent::SwapRolledBack { .. } => {
                self.swaps_rolled_back += 1;
            }
            BoardEvent::PieceMatched { is_combo, .. } => {
                self.rounds_resolved += 1;
                if *is_combo {
                    self.combo_rounds += 1;
                }
            }
            BoardEvent::SpecialCreated { .. } => {
                self.specials_created += 1;
            }
            BoardEvent::PiecesDestroyed { positions } => {
                self.pieces_cleared += positions.len() as u64;
            }
            BoardEvent::MoveUsed => {
                self.moves_used += 1;
            }
            _ => {}
        }
    }
}

/// Everything one swap produced, once the board has come to rest.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub events: Vec<BoardEvent>,
    /// Points awarded during the turn
    pub points: u32,
    /// Level outcome after the turn settled
    pub outcome: LevelOutcome,
}

/// Central game state: one board, one level in play.
pub struct GameState {
    engine: ResolutionEngine,
    session: LevelSession,
    score_keeper: ScoreKeeper,
    effects: Vec<Box<dyn EffectsSink>>,
    statistics: GameStatistics,
    seed: u64,
}

impl GameState {
    /// Starts `level` on a freshly generated board.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{GameState, LevelData, ScoreRules};
    ///
    /// let game = GameState::new(LevelData::test_level(), ScoreRules::light(), 9).unwrap();
    /// assert!(game.session().is_level_active());
    /// assert!(game.board().is_full());
    /// ```
    pub fn new(level: LevelData, rules: ScoreRules, seed: u64) -> CascadeResult<Self> {
        level.validate()?;
        let engine = ResolutionEngine::new(&level.generation_config(seed))?;
        Ok(Self::with_engine(engine, LevelSession::new(level), rules, seed))
    }

    /// Wraps an existing engine (scripted boards and tests).
    pub fn with_engine(
        engine: ResolutionEngine,
        session: LevelSession,
        rules: ScoreRules,
        seed: u64,
    ) -> Self {
        Self {
            engine,
            session,
            score_keeper: ScoreKeeper::new(rules),
            effects: Vec::new(),
            statistics: GameStatistics::new(),
            seed,
        }
    }

    /// Registers an effect observer.
    pub fn add_effects_sink(&mut self, sink: Box<dyn EffectsSink>) {
        self.effects.push(sink);
    }

    pub fn engine(&self) -> &ResolutionEngine {
        &self.engine
    }

    pub fn board(&self) -> &Board {
        self.engine.board()
    }

    pub fn session(&self) -> &LevelSession {
        &self.session
    }

    pub fn score_keeper(&self) -> &ScoreKeeper {
        &self.score_keeper
    }

    pub fn statistics(&self) -> &GameStatistics {
        &self.statistics
    }

    pub fn is_processing(&self) -> bool {
        self.engine.is_processing()
    }

    /// Forwards a swap to the engine if the level is still being played.
    pub fn request_swap(&mut self, from: Position, to: Position) -> CascadeResult<()> {
        let active = self.session.is_level_active();
        match self.engine.try_swap(from, to, active) {
            Ok(()) => {
                self.statistics.swaps_accepted += 1;
                Ok(())
            }
            Err(err) => {
                self.statistics.swaps_rejected += 1;
                Err(err)
            }
        }
    }

    /// Runs one engine phase and dispatches its events.
    ///
    /// When the phase brings the engine back to rest the level outcome is
    /// settled.
    pub fn advance(&mut self) -> PhaseOutcome {
        let was_processing = self.engine.is_processing();
        let outcome = self.engine.step();
        for event in &outcome.events {
            self.process_event(event);
        }
        if was_processing && self.engine.is_idle() {
            self.session.settle_turn();
        }
        outcome
    }

    /// Requests a swap and runs the resolution to completion.
    pub fn run_turn(&mut self, from: Position, to: Position) -> CascadeResult<TurnReport> {
        self.request_swap(from, to)?;
        let score_before = self.session.score();
        let mut events = Vec::new();
        while self.engine.is_processing() {
            events.extend(self.advance().events);
        }
        Ok(TurnReport {
            events,
            points: self.session.score().saturating_sub(score_before),
            outcome: self.session.outcome(),
        })
    }

    /// Dispatches one engine event and returns the points it awarded.
    pub fn process_event(&mut self, event: &BoardEvent) -> u32 {
        self.statistics.update_from_event(event);

        match event {
            BoardEvent::PieceMatched { count, is_combo } => {
                if !self.session.is_level_active() {
                    return 0;
                }
                let points = self.score_keeper.score_round(*count, *is_combo);
                self.session.add_score(points);
                points
            }
            BoardEvent::MoveUsed => {
                self.session.consume_move();
                0
            }
            BoardEvent::MatchEffect {
                position,
                count,
                is_combo,
            } => {
                for sink in self.effects.iter_mut() {
                    sink.match_effect(*position, *count, *is_combo);
                }
                0
            }
            _ => 0,
        }
    }

    /// Passes wall-clock time to the level; timed levels may end here while
    /// the board is at rest.
    pub fn advance_time(&mut self, dt_secs: f32) -> LevelOutcome {
        self.session.tick(dt_secs);
        if self.engine.is_idle() {
            self.session.settle_turn();
        }
        self.session.outcome()
    }

    /// Replaces the level and deals a new board for it.
    pub fn load_level(&mut self, level: LevelData) -> CascadeResult<()> {
        if self.engine.is_processing() {
            return Err(CascadeError::InvalidState(
                "cannot change level while the board is resolving".to_string(),
            ));
        }
        level.validate()?;
        self.seed = self.seed.wrapping_add(1);
        self.engine = ResolutionEngine::new(&level.generation_config(self.seed))?;
        self.session.load(level);
        self.score_keeper.reset();
        info!("new board dealt for level {}", self.session.level().level_number);
        Ok(())
    }

    /// Starts the current level over on a new board.
    pub fn restart_level(&mut self) -> CascadeResult<()> {
        let level = self.session.level().clone();
        debug!("restarting level {}", level.level_number);
        self.load_level(level)
    }

    /// True once the level has been won or lost.
    pub fn is_game_ended(&self) -> bool {
        self.session.outcome() != LevelOutcome::InProgress
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("engine", &self.engine)
            .field("session", &self.session)
            .field("score_keeper", &self.score_keeper)
            .field("effects", &self.effects.len())
            .field("statistics", &self.statistics)
            .field("seed", &self.seed)
            .finish()
    }
}
