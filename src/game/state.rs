//! Game lifecycle: SETUP -> PLAYING -> COMPLETE.
//!
//! `GameState` is the only place turns are applied for real. It validates
//! setup placements and turn actions, keeps an append-only history, and
//! decides the winner once the game ends.

use rand::Rng;
use tracing::{debug, info};

use crate::board::{Board, Owner, Position, Territory, TurnActions, PLAYERS};
use crate::config::{ConfigError, GameConfig};
use crate::resolve::{resolve_turn, ActionError};

use super::record::TurnRecord;

/// Where a game is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum GamePhase {
    Setup,
    Playing,
    Complete,
}

/// Why a setup placement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("{position} is off the board")]
    OutOfBounds { position: Position },

    #[error("{position} is outside {player:?}'s setup zone")]
    OutsideZone { player: Owner, position: Position },

    #[error("{position} is already occupied")]
    Occupied { position: Position },

    #[error("{player:?} has already placed")]
    AlreadyPlaced { player: Owner },
}

/// Returns true once a game at `board` with `turns_played` turns behind it
/// is over: the turn limit is reached or a player has nothing left.
pub fn is_game_over(board: &Board, turns_played: u32, config: &GameConfig) -> bool {
    turns_played >= config.turns_per_game
        || PLAYERS.iter().any(|&p| board.territory_count(p) == 0)
}

/// The player holding strictly more territories, or None on a tie.
pub fn territory_leader(board: &Board) -> Option<Owner> {
    let first = board.territory_count(Owner::Player1);
    let second = board.territory_count(Owner::Player2);
    match first.cmp(&second) {
        std::cmp::Ordering::Greater => Some(Owner::Player1),
        std::cmp::Ordering::Less => Some(Owner::Player2),
        std::cmp::Ordering::Equal => None,
    }
}

/// A single game from empty board to result.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    phase: GamePhase,
    current_turn: u32,
    history: Vec<TurnRecord>,
    placed: [bool; 2],
    winner: Option<Owner>,
}

impl GameState {
    /// Starts a new game on an empty board in the SETUP phase.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(GameState {
            board: Board::empty(config.board_size),
            config,
            phase: GamePhase::Setup,
            current_turn: 0,
            history: Vec::new(),
            placed: [false; 2],
            winner: None,
        })
    }

    /// Starts a game directly in the PLAYING phase from an arranged board.
    ///
    /// Panics if the board size disagrees with the config.
    pub fn from_board(config: GameConfig, board: Board) -> Result<Self, ConfigError> {
        config.validate()?;
        assert_eq!(
            board.size(),
            config.board_size,
            "board size does not match config"
        );
        Ok(GameState {
            config,
            board,
            phase: GamePhase::Playing,
            current_turn: 0,
            history: Vec::new(),
            placed: [true; 2],
            winner: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    pub fn turns_remaining(&self) -> u32 {
        self.config.turns_per_game.saturating_sub(self.current_turn)
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn last_turn(&self) -> Option<&TurnRecord> {
        self.history.last()
    }

    /// The winner of a completed game. None while playing and on a draw.
    pub fn winner(&self) -> Option<Owner> {
        self.winner
    }

    pub fn is_complete(&self) -> bool {
        self.phase == GamePhase::Complete
    }

    pub fn has_placed(&self, player: Owner) -> bool {
        player.seat().is_some_and(|s| self.placed[s])
    }

    /// Unoccupied cells in `player`'s setup zone, row-major.
    pub fn open_setup_positions(&self, player: Owner) -> Vec<Position> {
        let size = self.board.size();
        self.board
            .iter()
            .filter(|&(pos, t)| t.is_neutral() && pos.in_setup_zone(player, size))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Places `player`'s initial stones at `position`.
    ///
    /// Panics outside the SETUP phase or for a Neutral player.
    pub fn place_setup(&mut self, player: Owner, position: Position) -> Result<(), SetupError> {
        assert_eq!(
            self.phase,
            GamePhase::Setup,
            "setup placement in {:?} phase",
            self.phase
        );
        let Some(seat) = player.seat() else {
            panic!("setup placement for {player:?}");
        };

        if self.placed[seat] {
            return Err(SetupError::AlreadyPlaced { player });
        }
        if !self.board.contains(position) {
            return Err(SetupError::OutOfBounds { position });
        }
        if !position.in_setup_zone(player, self.board.size()) {
            return Err(SetupError::OutsideZone { player, position });
        }
        if !self.board.territory(position).is_neutral() {
            return Err(SetupError::Occupied { position });
        }

        self.board = self.board.with_territory(
            position,
            Territory::new(player, self.config.initial_stones),
        );
        self.placed[seat] = true;
        debug!(?player, %position, "setup placed");

        if self.placed.iter().all(|&p| p) {
            self.phase = GamePhase::Playing;
            info!(board_size = self.board.size(), "setup complete, game started");
        }
        Ok(())
    }

    /// Validates and resolves one turn.
    ///
    /// An invalid turn leaves the state untouched. Panics outside the
    /// PLAYING phase.
    pub fn apply_turn<R: Rng>(
        &mut self,
        actions: &TurnActions,
        rng: &mut R,
    ) -> Result<(), ActionError> {
        assert_eq!(
            self.phase,
            GamePhase::Playing,
            "turn applied in {:?} phase",
            self.phase
        );
        if actions.turn != self.current_turn {
            return Err(ActionError::TurnMismatch {
                expected: self.current_turn,
                got: actions.turn,
            });
        }

        let resolution = resolve_turn(&self.board, actions, &self.config, rng)?;
        let before = std::mem::replace(&mut self.board, resolution.board.clone());
        self.history.push(TurnRecord {
            turn: self.current_turn,
            before,
            actions: actions.clone(),
            resolution,
        });
        self.current_turn += 1;

        debug!(
            turn = self.current_turn,
            player1 = self.board.territory_count(Owner::Player1),
            player2 = self.board.territory_count(Owner::Player2),
            "turn resolved"
        );

        if is_game_over(&self.board, self.current_turn, &self.config) {
            self.phase = GamePhase::Complete;
            self.winner = territory_leader(&self.board);
            info!(
                turns = self.current_turn,
                winner = ?self.winner,
                "game complete"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{PlayerTurnActions, TerritoryAction};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn p(r: u16, c: u16) -> Position {
        Position::new(r, c)
    }

    fn config(turns: u32) -> GameConfig {
        GameConfig {
            board_size: 3,
            turns_per_game: turns,
            ..GameConfig::default()
        }
    }

    fn grow_all(state: &GameState) -> TurnActions {
        let side = |player| {
            PlayerTurnActions::new(
                player,
                state
                    .board()
                    .owned_by(player)
                    .map(|(pos, _)| TerritoryAction::grow(pos))
                    .collect(),
            )
        };
        TurnActions::new(
            state.current_turn(),
            side(Owner::Player1),
            side(Owner::Player2),
        )
    }

    fn set_up(turns: u32) -> GameState {
        let mut state = GameState::new(config(turns)).unwrap();
        state.place_setup(Owner::Player1, p(0, 0)).unwrap();
        state.place_setup(Owner::Player2, p(2, 2)).unwrap();
        state
    }

    #[test]
    fn starts_in_setup_on_empty_board() {
        let state = GameState::new(config(5)).unwrap();
        assert_eq!(state.phase(), GamePhase::Setup);
        assert_eq!(state.board().total_stones(), 0);
        assert!(state.history().is_empty());
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = GameConfig {
            board_size: 1,
            ..GameConfig::default()
        };
        assert!(matches!(GameState::new(cfg), Err(ConfigError::BoardSize(1))));
    }

    #[test]
    fn playing_only_after_both_place() {
        let mut state = GameState::new(config(5)).unwrap();
        state.place_setup(Owner::Player1, p(0, 1)).unwrap();
        assert_eq!(state.phase(), GamePhase::Setup);
        assert!(state.has_placed(Owner::Player1));
        state.place_setup(Owner::Player2, p(2, 1)).unwrap();
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.board().territory(p(0, 1)).stones(), 1);
    }

    #[test]
    fn setup_rejections() {
        let mut state = GameState::new(config(5)).unwrap();
        assert_eq!(
            state.place_setup(Owner::Player1, p(1, 1)),
            Err(SetupError::OutsideZone {
                player: Owner::Player1,
                position: p(1, 1)
            })
        );
        assert_eq!(
            state.place_setup(Owner::Player1, p(2, 2)),
            Err(SetupError::OutsideZone {
                player: Owner::Player1,
                position: p(2, 2)
            })
        );
        assert_eq!(
            state.place_setup(Owner::Player1, p(3, 0)),
            Err(SetupError::OutOfBounds { position: p(3, 0) })
        );
        state.place_setup(Owner::Player1, p(0, 0)).unwrap();
        assert_eq!(
            state.place_setup(Owner::Player1, p(0, 1)),
            Err(SetupError::AlreadyPlaced {
                player: Owner::Player1
            })
        );
        // Rejections leave the board alone.
        assert_eq!(state.board().territory_count(Owner::Player1), 1);
    }

    #[test]
    fn open_setup_positions_follow_zones() {
        let state = GameState::new(config(5)).unwrap();
        assert_eq!(
            state.open_setup_positions(Owner::Player1),
            vec![p(0, 0), p(0, 1), p(0, 2), p(1, 0)]
        );
        assert_eq!(
            state.open_setup_positions(Owner::Player2),
            vec![p(1, 2), p(2, 0), p(2, 1), p(2, 2)]
        );
    }

    #[test]
    fn turns_advance_and_record_history() {
        let mut state = set_up(5);
        let mut rng = SmallRng::seed_from_u64(1);
        let actions = grow_all(&state);
        state.apply_turn(&actions, &mut rng).unwrap();
        assert_eq!(state.current_turn(), 1);
        let record = state.last_turn().unwrap();
        assert_eq!(record.turn, 0);
        assert_eq!(record.before.territory(p(0, 0)).stones(), 1);
        assert_eq!(record.after().territory(p(0, 0)).stones(), 2);
        assert_eq!(state.board(), record.after());
    }

    #[test]
    fn turn_number_must_match() {
        let mut state = set_up(5);
        let mut actions = grow_all(&state);
        actions.turn = 3;
        let err = state
            .apply_turn(&actions, &mut SmallRng::seed_from_u64(1))
            .unwrap_err();
        assert_eq!(
            err,
            ActionError::TurnMismatch {
                expected: 0,
                got: 3
            }
        );
        assert_eq!(state.current_turn(), 0);
    }

    #[test]
    fn invalid_turn_is_not_applied() {
        let mut state = set_up(5);
        let actions = TurnActions::new(
            0,
            PlayerTurnActions::new(Owner::Player1, vec![]),
            PlayerTurnActions::new(Owner::Player2, vec![TerritoryAction::grow(p(2, 2))]),
        );
        let before = state.board().clone();
        assert!(state
            .apply_turn(&actions, &mut SmallRng::seed_from_u64(1))
            .is_err());
        assert_eq!(state.board(), &before);
        assert!(state.history().is_empty());
    }

    #[test]
    fn completes_at_turn_limit_with_draw() {
        let mut state = set_up(2);
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..2 {
            let actions = grow_all(&state);
            state.apply_turn(&actions, &mut rng).unwrap();
        }
        assert!(state.is_complete());
        assert_eq!(state.winner(), None);
        assert_eq!(state.turns_remaining(), 0);
    }

    #[test]
    fn more_territories_wins() {
        let cfg = GameConfig {
            board_size: 3,
            turns_per_game: 1,
            expansion_success_rate: 1.0,
            ..GameConfig::default()
        };
        let board = Board::empty(3).with_territories([
            (p(0, 0), Territory::new(Owner::Player1, 4)),
            (p(2, 2), Territory::new(Owner::Player2, 4)),
        ]);
        let mut state = GameState::from_board(cfg, board).unwrap();
        let actions = TurnActions::new(
            0,
            PlayerTurnActions::new(
                Owner::Player1,
                vec![TerritoryAction::move_to(p(0, 0), p(0, 1), 2)],
            ),
            PlayerTurnActions::new(Owner::Player2, vec![TerritoryAction::grow(p(2, 2))]),
        );
        state
            .apply_turn(&actions, &mut SmallRng::seed_from_u64(9))
            .unwrap();
        assert!(state.is_complete());
        assert_eq!(state.winner(), Some(Owner::Player1));
    }

    #[test]
    fn elimination_ends_the_game_early() {
        let cfg = GameConfig {
            board_size: 3,
            turns_per_game: 10,
            combat_hit_chance: 1.0,
            ..GameConfig::default()
        };
        let board = Board::empty(3).with_territories([
            (p(1, 0), Territory::new(Owner::Player1, 6)),
            (p(1, 1), Territory::new(Owner::Player2, 1)),
        ]);
        let mut state = GameState::from_board(cfg, board).unwrap();
        let actions = TurnActions::new(
            0,
            PlayerTurnActions::new(
                Owner::Player1,
                vec![TerritoryAction::move_to(p(1, 0), p(1, 1), 5)],
            ),
            PlayerTurnActions::new(Owner::Player2, vec![TerritoryAction::grow(p(1, 1))]),
        );
        state
            .apply_turn(&actions, &mut SmallRng::seed_from_u64(9))
            .unwrap();
        assert!(state.is_complete());
        assert_eq!(state.current_turn(), 1);
        assert_eq!(state.winner(), Some(Owner::Player1));
    }

    #[test]
    #[should_panic(expected = "turn applied in Setup phase")]
    fn turn_during_setup_panics() {
        let mut state = GameState::new(config(5)).unwrap();
        let actions = TurnActions::new(
            0,
            PlayerTurnActions::new(Owner::Player1, vec![]),
            PlayerTurnActions::new(Owner::Player2, vec![]),
        );
        let _ = state.apply_turn(&actions, &mut SmallRng::seed_from_u64(1));
    }

    #[test]
    #[should_panic(expected = "turn applied in Complete phase")]
    fn turn_after_completion_panics() {
        let mut state = set_up(1);
        let mut rng = SmallRng::seed_from_u64(1);
        let actions = grow_all(&state);
        state.apply_turn(&actions, &mut rng).unwrap();
        let again = grow_all(&state);
        let _ = state.apply_turn(&again, &mut rng);
    }

    #[test]
    #[should_panic(expected = "setup placement in Playing phase")]
    fn setup_after_start_panics() {
        let mut state = set_up(5);
        let _ = state.place_setup(Owner::Player1, p(0, 1));
    }
}
