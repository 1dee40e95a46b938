//! 局面(盤面 + 両陣営の対局者 + 手番)と、指し手の適用/取り消し。

use crate::board::Board;
use crate::hand::HandGrid;
use crate::player::*;
use crate::shogi::*;

/// 局面。
///
/// 盤面と両陣営の対局者(手駒を含む)をまとめて所有する。`Clone` は完全に独立したコピーを作るので、
/// 探索はこれを複製したものの上で `do_move()` / `undo_move()` を繰り返す。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct GameState {
    board: Board,
    players: Players,
    side_to_move: Side,
    ply: u32, // 常に 1 から始まるものとする。
}

impl GameState {
    /// 盤面、対局者、手番、手数を指定して局面を作る。合法性チェックは行わない。
    pub fn new(board: Board, players: Players, side_to_move: Side, ply: u32) -> Self {
        assert!(players[SENTE].side() == SENTE && players[GOTE].side() == GOTE);
        assert!(ply >= 1);

        Self {
            board,
            players,
            side_to_move,
            ply,
        }
    }

    /// 平手初期局面を返す。対局者は既定値となる。
    pub fn startpos() -> Self {
        Self::new(Board::startpos(), default_players(), SENTE, 1)
    }

    /// 盤面への参照を返す。
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 盤面への可変参照を返す。駒打ちの合法性判定での一時的な配置に使う。
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// 対局者を返す。
    pub fn player(&self, side: Side) -> &Player {
        &self.players[side]
    }

    /// 両陣営の対局者を返す。
    pub fn players(&self) -> &Players {
        &self.players
    }

    /// 指定した陣営の手駒置き場を返す。
    pub fn hand(&self, side: Side) -> &HandGrid {
        self.players[side].hand()
    }

    fn hand_mut(&mut self, side: Side) -> &mut HandGrid {
        self.players[side].hand_mut()
    }

    /// 手番を返す。
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// 手数を返す。
    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// 盤上の駒を動かす指し手を現局面から作る。移動元に駒がなければ `None`。
    ///
    /// 移動先の駒(あれば)を捕獲する駒として記録する。合法性チェックは行わない。
    pub fn make_walk(&self, src: Square, dst: Square, promotion: bool) -> Option<Move> {
        let pc = self.board.get(src)?;

        if !dst.is_on_board() || src == dst || (promotion && !pc.can_promote()) {
            return None;
        }

        Some(Move::new_walk(pc, src, dst, self.board.get(dst), promotion))
    }

    /// 駒打ちの指し手を現局面から作る。`side` が `kind` を持っていなければ `None`。
    pub fn make_drop(&self, side: Side, kind: PieceKind, dst: Square) -> Option<Move> {
        if !dst.is_on_board() {
            return None;
        }

        let slot = self.hand(side).find(kind)?;
        let pc = self.hand(side).get(slot)?;

        Some(Move::new_drop(pc, slot, dst))
    }

    /// 指し手を適用し、undo 可能な指し手を返す。合法性チェックは行わない。
    ///
    /// 移動先に敵の駒があれば、それを成る前の駒に戻して陣営を反転し、指し手の主体の手駒置き場の
    /// 最初の空きマスに移す。指し手が成りなら、成った駒を移動先に置く。
    /// 手番は反転する(指し手の主体は手番の側であることを想定している)。
    pub fn do_move(&mut self, mv: Move) -> UndoableMove {
        let us = mv.player();

        match mv.src() {
            Source::Board(src) => {
                let pc = self.board.remove(src);
                debug_assert_eq!(pc, mv.piece());
            }
            Source::Hand(slot) => {
                let pc = self.hand_mut(us).remove(slot);
                debug_assert_eq!(pc, mv.piece());
            }
        }

        let captured = self.board.get(mv.dst());
        let captured_slot = captured.map(|pc| {
            debug_assert_ne!(pc.side(), us);
            self.board.remove(mv.dst());
            self.hand_mut(us).add(pc.demoted().flipped())
        });

        let pc = if mv.is_promotion() {
            mv.piece().promoted()
        } else {
            mv.piece()
        };
        self.board.put(mv.dst(), pc);

        self.side_to_move = self.side_to_move.inv();
        self.ply += 1;

        UndoableMove::new(mv.with_captured(captured), captured_slot)
    }

    /// `do_move()` で適用した指し手を取り消す。手番と手数も元に戻る。
    ///
    /// 捕獲した駒は手駒置き場から取り除かれ、元の陣営と(成っていれば)成駒の状態に戻って移動先に置かれる。
    pub fn undo_move(&mut self, umv: UndoableMove) {
        let mv = umv.get();
        let us = mv.player();

        self.board.remove(mv.dst());

        if let Some(slot) = umv.captured_slot() {
            self.hand_mut(us).remove(slot);
            let captured = mv
                .captured()
                .unwrap_or_else(|| panic!("captured piece is missing: {:?}", umv));
            self.board.put(mv.dst(), captured);
        }

        match mv.src() {
            Source::Board(src) => self.board.put(src, mv.piece()),
            Source::Hand(slot) => self.hand_mut(us).put(slot, mv.piece()),
        }

        self.side_to_move = self.side_to_move.inv();
        self.ply -= 1;
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "{} 手駒: {}", self.players[GOTE], self.hand(GOTE))?;
        write!(f, "{}", self.board)?;
        writeln!(f, "{} 手駒: {}", self.players[SENTE], self.hand(SENTE))?;
        writeln!(f, "手番: {} ({} 手目)", self.side_to_move, self.ply)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn test_do_undo_walk() {
        let mut state = GameState::startpos();
        let orig = state.clone();

        let mv = state
            .make_walk(Square::new(6, 6), Square::new(6, 5), false)
            .unwrap();
        let umv = state.do_move(mv);

        assert_eq!(state.side_to_move(), GOTE);
        assert_eq!(state.ply(), 2);
        assert_eq!(state.board().get(Square::new(6, 6)), None);
        assert_eq!(
            state.board().get(Square::new(6, 5)),
            Some(Piece::new(SENTE, PieceKind::Pawn))
        );

        state.undo_move(umv);
        assert_eq!(state, orig);
    }

    #[test]
    fn test_do_undo_capture_promotion() {
        let mut board = Board::empty();
        board.put(Square::new(4, 8), Piece::new(SENTE, PieceKind::King));
        board.put(Square::new(4, 0), Piece::new(GOTE, PieceKind::King));
        board.put(Square::new(2, 3), Piece::new(SENTE, PieceKind::Silver));
        board.put(Square::new(2, 2), Piece::new(GOTE, PieceKind::Dragon));
        let mut state = GameState::new(board, default_players(), SENTE, 1);
        let orig = state.clone();

        let mv = state
            .make_walk(Square::new(2, 3), Square::new(2, 2), true)
            .unwrap();
        let umv = state.do_move(mv);

        // 捕獲した龍は飛車に戻り、先手の駒として手駒置き場に入る。
        assert_eq!(
            state.board().get(Square::new(2, 2)),
            Some(Piece::new(SENTE, PieceKind::ProSilver))
        );
        assert_eq!(state.hand(SENTE).count(PieceKind::Rook), 1);
        assert_eq!(
            umv.get().captured(),
            Some(Piece::new(GOTE, PieceKind::Dragon))
        );
        assert_eq!(umv.captured_slot(), Some(HandSlot::from_index(0)));

        // 取り消すと龍は後手の駒として元のマスに戻る。
        state.undo_move(umv);
        assert_eq!(state, orig);
    }

    #[test]
    fn test_do_undo_drop() {
        let mut state = GameState::new(Board::startpos(), default_players(), GOTE, 2);
        state.hand_mut(GOTE).add(Piece::new(GOTE, PieceKind::Bishop));
        let orig = state.clone();

        let mv = state
            .make_drop(GOTE, PieceKind::Bishop, Square::new(4, 4))
            .unwrap();
        assert!(mv.is_drop());

        let umv = state.do_move(mv);
        assert!(state.hand(GOTE).is_empty());
        assert_eq!(state.side_to_move(), SENTE);

        state.undo_move(umv);
        assert_eq!(state, orig);
    }

    #[test]
    fn test_make_move_rejects_invalid() {
        let state = GameState::startpos();

        assert_eq!(state.make_walk(Square::new(4, 4), Square::new(4, 3), false), None);
        assert_eq!(state.make_drop(SENTE, PieceKind::Pawn, Square::new(4, 4)), None);
        // 金は成れない。
        assert_eq!(state.make_walk(Square::new(3, 8), Square::new(3, 7), true), None);
    }
}
