//! Move engine: placement bookkeeping and move ranking
//!
//! Ranking order:
//! 1. Defend any of our two-bridges that is in jeopardy
//! 2. Otherwise weight the empty cells on our cheapest connection and on the
//!    opponent's, and play the heaviest
//! 3. Fall back to the first empty cell

use rustc_hash::FxHashMap;

use crate::board::Board;
use crate::color::Player;
use crate::config::{EngineConfig, Weights};
use crate::coord::Coord;
use crate::error::HexError;
use crate::search::{cheapest_connection, Connection};

/// A ranked candidate move
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub coord: Coord,
    pub weight: f32,
}

/// Candidates in first-found order, merging repeated cells
#[derive(Default)]
struct Candidates {
    ranked: Vec<Candidate>,
    index: FxHashMap<Coord, usize>,
}

impl Candidates {
    fn add(&mut self, coord: Coord, weight: f32) {
        match self.index.get(&coord) {
            Some(&i) => self.ranked[i].weight += weight,
            None => {
                self.index.insert(coord, self.ranked.len());
                self.ranked.push(Candidate { coord, weight });
            }
        }
    }

    fn add_path(&mut self, board: &Board, path: &Connection, weights: &Weights, scale: f32) {
        for (coord, link) in path.open_cells(board) {
            self.add(coord, scale * weights.for_link(link));
        }
    }
}

/// Owns the board for one game and picks moves on it
#[derive(Clone, Debug)]
pub struct MoveEngine {
    board: Board,
    move_count: usize,
    weights: Weights,
}

impl MoveEngine {
    /// Engine with default weights on an empty board
    pub fn new(size: u8) -> Result<Self, HexError> {
        Self::with_config(&EngineConfig::default().with_board_size(size))
    }

    pub fn with_config(config: &EngineConfig) -> Result<Self, HexError> {
        config.validate()?;
        Ok(Self {
            board: Board::new(config.board_size)?,
            move_count: 0,
            weights: config.weights.clone(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    // ========================================================================
    // PLACEMENT
    // ========================================================================

    /// Place a stone. False if the cell is occupied or off the board
    pub fn place(&mut self, coord: Coord, player: Player) -> bool {
        if !self.board.set(coord, player) {
            return false;
        }
        self.move_count += 1;
        tracing::debug!(%player, cell = %coord, moves = self.move_count, "placed");
        true
    }

    /// Remove a stone. False if the cell is already empty
    pub fn remove(&mut self, coord: Coord) -> bool {
        if !self.board.unset(coord) {
            return false;
        }
        self.move_count = self.move_count.saturating_sub(1);
        tracing::debug!(cell = %coord, moves = self.move_count, "removed");
        true
    }

    /// Count a move that places no stone (the swap)
    pub fn record_swap(&mut self) {
        self.move_count += 1;
    }

    pub fn winner(&self) -> Option<Player> {
        self.board.check_win(self.move_count)
    }

    // ========================================================================
    // MOVE SELECTION
    // ========================================================================

    /// Pick a move for `player`.
    ///
    /// Fails only when the board has no empty cell.
    pub fn best_move(&self, player: Player) -> Result<Coord, HexError> {
        if self.board.is_full() {
            return Err(HexError::NoLegalMove);
        }

        if let Some(coord) = self.defend_bridge(player) {
            tracing::debug!(%player, cell = %coord, "defending two-bridge");
            return Ok(coord);
        }

        let mut best: Option<Candidate> = None;
        for candidate in self.rank_moves(player) {
            if best.map_or(true, |b| candidate.weight > b.weight) {
                best = Some(candidate);
            }
        }
        if let Some(best) = best {
            tracing::debug!(%player, cell = %best.coord, weight = best.weight, "best path move");
            return Ok(best.coord);
        }

        self.board
            .empty_cells()
            .next()
            .ok_or(HexError::NoLegalMove)
    }

    /// Empty dependency of the first of `player`'s bridges in jeopardy
    pub fn defend_bridge(&self, player: Player) -> Option<Coord> {
        self.board.jeopardized_bridges(player).find_map(|bridge| {
            let (a, b) = bridge.depends();
            [a, b]
                .into_iter()
                .find(|&dep| self.board.color(dep).is_empty())
                .and_then(|dep| dep.coord())
        })
    }

    /// Weighted candidates from both players' cheapest connections, in
    /// first-found order: our path from source to target, then the
    /// opponent's.
    pub fn rank_moves(&self, player: Player) -> Vec<Candidate> {
        let mut candidates = Candidates::default();

        if let Some(own) = cheapest_connection(&self.board, player) {
            tracing::trace!(%player, cost = own.cost, "own connection");
            candidates.add_path(&self.board, &own, &self.weights, 1.0);
        }
        let opponent = player.opponent();
        if let Some(theirs) = cheapest_connection(&self.board, opponent) {
            tracing::trace!(player = %opponent, cost = theirs.cost, "opponent connection");
            candidates.add_path(&self.board, &theirs, &self.weights, self.weights.defense_scale);
        }
        candidates.ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i8, y: i8) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn test_place_and_remove_count_moves() {
        let mut engine = MoveEngine::new(5).unwrap();
        assert!(engine.place(c(3, 3), Player::White));
        assert!(!engine.place(c(3, 3), Player::Black));
        assert_eq!(engine.move_count(), 1);
        assert!(engine.remove(c(3, 3)));
        assert!(!engine.remove(c(3, 3)));
        assert_eq!(engine.move_count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::default().with_weights(Weights {
            defense_scale: 2.0,
            ..Weights::default()
        });
        assert!(matches!(
            MoveEngine::with_config(&config),
            Err(HexError::InvalidWeights(_))
        ));
        assert!(matches!(MoveEngine::new(0), Err(HexError::InvalidBoardSize { .. })));
    }

    #[test]
    fn test_best_move_on_full_board_fails() {
        let mut engine = MoveEngine::new(2).unwrap();
        engine.place(c(1, 1), Player::White);
        engine.place(c(2, 1), Player::Black);
        engine.place(c(1, 2), Player::White);
        engine.place(c(2, 2), Player::Black);
        assert_eq!(engine.best_move(Player::White), Err(HexError::NoLegalMove));
    }

    #[test]
    fn test_best_move_is_empty_cell() {
        let mut engine = MoveEngine::new(6).unwrap();
        engine.place(c(3, 3), Player::White);
        engine.place(c(4, 3), Player::Black);
        for player in Player::BOTH {
            let mv = engine.best_move(player).unwrap();
            assert!(engine.board().color(mv).is_empty());
        }
    }

    #[test]
    fn test_centre_on_empty_small_board() {
        // on 3x3 the only single-stone connections run through the centre
        let engine = MoveEngine::new(3).unwrap();
        assert_eq!(engine.best_move(Player::White), Ok(c(2, 2)));
        assert_eq!(engine.best_move(Player::Black), Ok(c(2, 2)));
    }

    #[test]
    fn test_defends_jeopardized_bridge() {
        let mut engine = MoveEngine::new(5).unwrap();
        engine.place(c(2, 2), Player::White);
        engine.place(c(3, 3), Player::White);
        engine.place(c(3, 2), Player::Black);
        assert_eq!(engine.defend_bridge(Player::White), Some(c(2, 3)));
        assert_eq!(engine.best_move(Player::White), Ok(c(2, 3)));

        // the bridge is Black's problem only from White's side
        assert_eq!(engine.defend_bridge(Player::Black), None);
    }

    #[test]
    fn test_defends_edge_bridge() {
        let mut engine = MoveEngine::new(4).unwrap();
        engine.place(c(2, 3), Player::White);
        engine.place(c(2, 4), Player::Black);
        assert_eq!(engine.best_move(Player::White), Ok(c(1, 4)));
    }

    #[test]
    fn test_rank_moves_prefers_own_path() {
        let mut engine = MoveEngine::new(5).unwrap();
        engine.place(c(3, 3), Player::Black);
        let ranked = engine.rank_moves(Player::White);
        assert!(!ranked.is_empty());

        let own = cheapest_connection(engine.board(), Player::White).unwrap();
        let own_cells: Vec<Coord> = own.open_cells(engine.board()).map(|(c, _)| c).collect();
        let weakest_own = ranked
            .iter()
            .filter(|cand| own_cells.contains(&cand.coord))
            .map(|cand| cand.weight)
            .fold(f32::INFINITY, f32::min);
        for cand in ranked.iter().filter(|cand| !own_cells.contains(&cand.coord)) {
            assert!(cand.weight < weakest_own);
        }
        // first-found order starts with our own path
        assert_eq!(ranked[0].coord, own_cells[0]);
    }

    #[test]
    fn test_shared_cells_combine_weights() {
        let engine = MoveEngine::new(3).unwrap();
        let ranked = engine.rank_moves(Player::White);
        let centre = ranked.iter().find(|cand| cand.coord == c(2, 2)).unwrap();
        let w = engine.weights();
        // entered over a bridge by both players
        let expected = w.bridge_destination + w.defense_scale * w.bridge_destination;
        assert!((centre.weight - expected).abs() < 1e-6);
        assert_eq!(ranked.iter().filter(|cand| cand.coord == c(2, 2)).count(), 1);
    }

    #[test]
    fn test_winner_uses_move_count() {
        let mut engine = MoveEngine::new(3).unwrap();
        engine.place(c(2, 1), Player::White);
        engine.place(c(2, 2), Player::White);
        engine.place(c(2, 3), Player::White);
        // only three moves played so far
        assert_eq!(engine.winner(), None);
        engine.place(c(1, 1), Player::Black);
        engine.place(c(3, 3), Player::Black);
        assert_eq!(engine.winner(), Some(Player::White));
    }

    #[test]
    fn test_fallback_when_no_path_has_room() {
        // White has already won and Black is cut off
        let mut engine = MoveEngine::new(2).unwrap();
        engine.place(c(1, 1), Player::White);
        engine.place(c(1, 2), Player::White);
        assert!(engine.rank_moves(Player::Black).is_empty());
        assert_eq!(engine.best_move(Player::Black), Ok(c(2, 1)));
    }
}
