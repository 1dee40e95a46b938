//! 指し手の適用と undo/redo 履歴。

use crate::shogi::*;
use crate::state::GameState;

/// undo/redo 履歴を持つ指し手適用器。
///
/// 合法性チェックは行わない(合法手の絞り込みは `evals` の役割)。
/// 新たな指し手を適用すると redo 履歴は破棄される。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MoveManager {
    undo: Vec<UndoableMove>,
    redo: Vec<UndoableMove>,
}

impl MoveManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指し手を適用し、undo 履歴に積む。redo 履歴は破棄される。
    pub fn apply_move(&mut self, state: &mut GameState, mv: Move) -> UndoableMove {
        let umv = state.do_move(mv);

        self.undo.push(umv);
        self.redo.clear();

        umv
    }

    /// 直前の指し手を取り消し、redo 履歴に積む。undo 履歴が空なら何もせず `None` を返す。
    pub fn undo_move(&mut self, state: &mut GameState) -> Option<Move> {
        let umv = self.undo.pop()?;

        state.undo_move(umv);
        self.redo.push(umv);

        Some(umv.get())
    }

    /// 直前に取り消した指し手を再適用する。redo 履歴が空なら何もせず `None` を返す。
    pub fn redo_move(&mut self, state: &mut GameState) -> Option<Move> {
        let umv = self.redo.pop()?;

        let umv = state.do_move(umv.get());
        self.undo.push(umv);

        Some(umv.get())
    }

    pub fn is_undo_available(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn is_redo_available(&self) -> bool {
        !self.redo.is_empty()
    }

    /// 適用済みの指し手の数を返す。
    pub fn move_count(&self) -> usize {
        self.undo.len()
    }

    /// 適用済みの指し手を古い順に返す。
    pub fn history(&self) -> &[UndoableMove] {
        &self.undo
    }

    /// 直前に適用された指し手を返す。
    pub fn last_move(&self) -> Option<Move> {
        self.undo.last().map(|&umv| umv.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    fn walk(state: &GameState, src: (i32, i32), dst: (i32, i32)) -> Move {
        state
            .make_walk(Square::new(src.0, src.1), Square::new(dst.0, dst.1), false)
            .unwrap()
    }

    #[test]
    fn test_undo_redo() {
        let mut state = GameState::startpos();
        let mut mgr = MoveManager::new();

        assert!(!mgr.is_undo_available());
        assert_eq!(mgr.undo_move(&mut state), None);
        assert_eq!(mgr.redo_move(&mut state), None);
        assert_eq!(state, GameState::startpos());

        let mv1 = walk(&state, (6, 6), (6, 5));
        mgr.apply_move(&mut state, mv1);
        let mv2 = walk(&state, (2, 2), (2, 3));
        mgr.apply_move(&mut state, mv2);
        let after_two = state.clone();
        assert_eq!(mgr.move_count(), 2);

        assert_eq!(mgr.undo_move(&mut state), Some(mv2));
        assert_eq!(mgr.undo_move(&mut state), Some(mv1));
        assert_eq!(state, GameState::startpos());
        assert!(mgr.is_redo_available());

        assert_eq!(mgr.redo_move(&mut state), Some(mv1));
        assert_eq!(mgr.redo_move(&mut state), Some(mv2));
        assert_eq!(state, after_two);
        assert!(!mgr.is_redo_available());
    }

    #[test]
    fn test_apply_clears_redo() {
        let mut state = GameState::startpos();
        let mut mgr = MoveManager::new();

        let mv = walk(&state, (6, 6), (6, 5));
        mgr.apply_move(&mut state, mv);
        mgr.undo_move(&mut state);
        assert!(mgr.is_redo_available());

        let mv = walk(&state, (2, 6), (2, 5));
        mgr.apply_move(&mut state, mv);
        assert!(!mgr.is_redo_available());
        assert_eq!(mgr.last_move(), Some(mv));
        assert_eq!(mgr.history().len(), 1);
    }
}
