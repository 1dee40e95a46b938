use crate::evals;
use crate::shogi::*;
use crate::state::GameState;

/// perft の末端ノード。`perft()` のコールバックに渡される。
#[derive(Debug)]
pub struct PerftLeafNode<'a> {
    state: &'a GameState,
    umv: Option<UndoableMove>, // 直前の指し手
    checked: bool,             // 手番の側に王手がかかっているか
    checkmated: bool,          // 手番の側が詰んでいるか
}

impl<'a> PerftLeafNode<'a> {
    fn new(
        state: &'a GameState,
        umv: Option<UndoableMove>,
        checked: bool,
        checkmated: bool,
    ) -> Self {
        Self {
            state,
            umv,
            checked,
            checkmated,
        }
    }

    /// 局面への参照を返す。
    pub fn state(&self) -> &GameState {
        self.state
    }

    /// 直前の指し手を返す。
    pub fn previous_move(&self) -> Option<UndoableMove> {
        self.umv
    }

    /// 手番の側に王手がかかっているかどうかを返す。
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// 手番の側が詰んでいるかどうかを返す。
    pub fn is_checkmated(&self) -> bool {
        self.checkmated
    }
}

/// 指定した深さの perft を行う。全ての末端ノードについてコールバックが呼ばれる。
///
/// 各ノードでは手番の側の合法手(`evals::legal_moves`)のみで局面を進める。
/// 千日手は考慮しない。
///
/// 関数から戻ったとき、`state` は呼び出し前の局面に戻っている。
pub fn perft<F>(state: &mut GameState, depth: u32, mut f: F)
where
    F: FnMut(&PerftLeafNode),
{
    perft_dfs(state, None, depth, &mut f);
}

fn perft_dfs<F>(state: &mut GameState, umv: Option<UndoableMove>, depth: u32, f: &mut F)
where
    F: FnMut(&PerftLeafNode),
{
    let us = state.side_to_move();

    if depth > 0 {
        for mv in evals::legal_moves(state, us) {
            let umv_nxt = state.do_move(mv);
            perft_dfs(state, Some(umv_nxt), depth - 1, f);
            state.undo_move(umv_nxt);
        }
        return;
    }

    let checked = evals::is_king_in_check(state.board(), us);
    let checkmated = checked && evals::is_checkmate(state, us);

    let leaf = PerftLeafNode::new(state, umv, checked, checkmated);
    f(&leaf);
}

/// 末端ノード数のみを数える perft。
pub fn perft_count(state: &mut GameState, depth: u32) -> u64 {
    let mut count = 0;
    perft(state, depth, |_| count += 1);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn test_perft_restores_state() {
        let mut state = GameState::startpos();
        assert_eq!(perft_count(&mut state, 2), 900);
        assert_eq!(state, GameState::startpos());
    }

    #[test]
    fn test_perft_depth0() {
        let mut state = GameState::startpos();
        let mut leaves = 0;
        perft(&mut state, 0, |leaf| {
            assert!(leaf.previous_move().is_none());
            assert!(!leaf.is_checked());
            leaves += 1;
        });
        assert_eq!(leaves, 1);
    }
}
