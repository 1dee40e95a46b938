//! 対局。局面と undo/redo 履歴をまとめ、外部(シェルなど)向けの操作を提供する。

use anyhow::{bail, ensure};
use rand::Rng;

use crate::board::Board;
use crate::engine::{self, SearchConfig};
use crate::evals;
use crate::manager::MoveManager;
use crate::movegen::MoveArray;
use crate::player::*;
use crate::shogi::*;
use crate::state::GameState;

/// 終局の種別。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GameOutcome {
    /// 詰み。
    Checkmate { winner: Side },

    /// 王手がかかっていないが合法手がない。
    NoLegalMoves { loser: Side },

    /// 千日手。
    Repetition,
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Checkmate { winner } => write!(f, "詰み ({} の勝ち)", winner),
            Self::NoLegalMoves { loser } => write!(f, "合法手なし ({} の負け)", loser),
            Self::Repetition => f.write_str("千日手"),
        }
    }
}

/// 対局。
///
/// 参照系の操作(合法手の列挙など)は局面の複製上で行うので `&self` で呼べる。
#[derive(Clone, Debug)]
pub struct Game {
    state: GameState,
    manager: MoveManager,
}

impl Game {
    /// 平手初期局面から対局を始める。
    pub fn new(sente: Player, gote: Player) -> Self {
        let players = Players::from([sente, gote]);

        Self::from_state(GameState::new(Board::startpos(), players, SENTE, 1))
    }

    /// 任意の局面から対局を始める。
    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            manager: MoveManager::new(),
        }
    }

    /// 現在の局面を返す。
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn side_to_move(&self) -> Side {
        self.state.side_to_move()
    }

    pub fn player(&self, side: Side) -> &Player {
        self.state.player(side)
    }

    /// 適用済みの指し手を古い順に返す。
    pub fn history(&self) -> &[UndoableMove] {
        self.manager.history()
    }

    /// 盤上の `src` にある駒の合法な移動先を返す。
    pub fn legal_moves_for(&self, src: Square) -> Vec<Square> {
        evals::legal_moves_for(&mut self.state.clone(), src)
    }

    /// 陣営 `side` が駒種 `kind` を打てるマスを返す。
    pub fn legal_drop_positions(&self, kind: PieceKind, side: Side) -> Vec<Square> {
        evals::legal_drop_positions(&mut self.state.clone(), kind, side)
    }

    /// 陣営 `side` の全ての合法手を返す。
    pub fn legal_moves(&self, side: Side) -> MoveArray {
        evals::legal_moves(&mut self.state.clone(), side)
    }

    /// 指し手を適用する。合法性チェックは行わない。
    pub fn apply_move(&mut self, mv: Move) -> UndoableMove {
        self.manager.apply_move(&mut self.state, mv)
    }

    /// 手番の側の合法手であることを確認した上で指し手を適用する。
    ///
    /// 成りフラグも一致している必要がある。駒打ちについては、同じ駒種であればどの手駒置き場のマスからでもよい。
    pub fn try_apply_move(&mut self, mv: Move) -> anyhow::Result<UndoableMove> {
        let us = self.side_to_move();
        ensure!(mv.player() == us, "not {}'s turn", mv.player());

        let legal = match mv.src() {
            Source::Hand(slot) => {
                self.state.hand(us).get(slot) == Some(mv.piece())
                    && evals::drop_is_legal(&mut self.state.clone(), mv.piece().kind(), us, mv.dst())
            }
            Source::Board(_) => self
                .legal_moves(us)
                .iter()
                .any(|cand| *cand == mv && cand.is_promotion() == mv.is_promotion()),
        };

        if !legal {
            bail!("illegal move: {}", mv);
        }

        Ok(self.apply_move(mv))
    }

    /// 直前の指し手を取り消す。履歴が空なら何もしない。
    pub fn undo_move(&mut self) -> Option<Move> {
        self.manager.undo_move(&mut self.state)
    }

    /// 直前に取り消した指し手を再適用する。履歴が空なら何もしない。
    pub fn redo_move(&mut self) -> Option<Move> {
        self.manager.redo_move(&mut self.state)
    }

    pub fn is_undo_available(&self) -> bool {
        self.manager.is_undo_available()
    }

    pub fn is_redo_available(&self) -> bool {
        self.manager.is_redo_available()
    }

    /// 適用済みの指し手の数を返す。
    pub fn move_count(&self) -> usize {
        self.manager.move_count()
    }

    pub fn is_king_in_check(&self, side: Side) -> bool {
        evals::is_king_in_check(self.state.board(), side)
    }

    pub fn is_checkmate(&self, side: Side) -> bool {
        evals::is_checkmate(&mut self.state.clone(), side)
    }

    /// 千日手かどうかを返す。
    pub fn is_repetition_draw(&self) -> bool {
        evals::is_sennichite(self.manager.history())
    }

    /// 終局していればその種別を返す。
    pub fn outcome(&self) -> Option<GameOutcome> {
        let us = self.side_to_move();

        if self.legal_moves(us).is_empty() {
            return Some(if self.is_king_in_check(us) {
                GameOutcome::Checkmate { winner: us.inv() }
            } else {
                GameOutcome::NoLegalMoves { loser: us }
            });
        }

        if self.is_repetition_draw() {
            return Some(GameOutcome::Repetition);
        }

        None
    }

    /// 陣営 `side` の最善手を探索する。局面は変更されない。
    pub fn best_move(&self, side: Side, config: SearchConfig) -> Option<Move> {
        engine::best_move(&self.state, side, config)
    }

    /// 乱数生成器を指定して陣営 `side` の最善手を探索する。局面は変更されない。
    pub fn best_move_with_rng<R: Rng + ?Sized>(
        &self,
        side: Side,
        config: SearchConfig,
        rng: &mut R,
    ) -> Option<Move> {
        engine::best_move_with_rng(&self.state, side, config, rng)
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    fn new_game() -> Game {
        Game::new(
            Player::new(SENTE, "先手", PlayerKind::Human),
            Player::new(GOTE, "後手", PlayerKind::Human),
        )
    }

    #[test]
    fn test_try_apply_move() {
        let mut game = new_game();

        // ４筋の歩を 2 マス進めるのは違法。
        let mv = game
            .state()
            .make_walk(Square::new(3, 6), Square::new(3, 4), false)
            .unwrap();
        assert!(game.try_apply_move(mv).is_err());

        let mv = game
            .state()
            .make_walk(Square::new(3, 6), Square::new(3, 5), false)
            .unwrap();
        game.try_apply_move(mv).unwrap();
        assert_eq!(game.side_to_move(), GOTE);

        // 手番でない側の指し手は違法。
        let mv = game
            .state()
            .make_walk(Square::new(2, 6), Square::new(2, 5), false)
            .unwrap();
        assert!(game.try_apply_move(mv).is_err());
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn test_outcome_none_at_startpos() {
        let game = new_game();
        assert_eq!(game.outcome(), None);
        assert!(!game.is_repetition_draw());
    }
}
