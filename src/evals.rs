//! 王手・詰み・千日手の判定と、合法手の絞り込み。
//!
//! 自殺手かどうかは常に「指し手を適用して王手判定し、取り消す」ことで判定する。
//! 判定に使った局面の変更は、関数から戻るときには全て元に戻っている。

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::movegen::rules;
use crate::movegen::*;
use crate::shogi::*;
use crate::state::GameState;

/// 指定した陣営の玉に王手がかかっているかどうかを返す。玉が盤上になければ偽。
///
/// 敵陣営の駒を全て走査する(利きの差分更新は行わない)。
pub fn is_king_in_check(board: &Board, side: Side) -> bool {
    let king_sq = match board.king_square(side) {
        Some(sq) => sq,
        None => return false,
    };

    board
        .pieces_of(side.inv())
        .any(|(sq, pc)| rules::attacks(board, sq, pc, king_sq))
}

/// 指定した陣営の玉に王手をかけている全ての駒について、その利きの経路(王手駒自身のマスを含む)の和集合を返す。
fn check_lines(board: &Board, side: Side, king_sq: Square) -> ArrayVec<Square, 81> {
    let mut res = ArrayVec::<Square, 81>::new();

    for (sq, pc) in board.pieces_of(side.inv()) {
        if let Some(line) = rules::attack_line(board, sq, pc, king_sq) {
            for sq in line {
                if !res.contains(&sq) {
                    res.push(sq);
                }
            }
        }
    }

    res
}

/// 指し手を適用しても指し手の主体の玉に王手がかからないかどうかを返す。
pub fn is_move_safe(state: &mut GameState, mv: Move) -> bool {
    let us = mv.player();

    let umv = state.do_move(mv);
    let safe = !is_king_in_check(state.board(), us);
    state.undo_move(umv);

    safe
}

/// 指定した陣営の全ての合法手を返す。
pub fn legal_moves(state: &mut GameState, side: Side) -> MoveArray {
    let mut mvs = generate_moves(state, side);

    // 駒打ちは生成時点で合法性が保証されている。
    mvs.retain(|mv| mv.is_drop() || is_move_safe(state, *mv));

    mvs
}

/// 盤上の `src` にある駒の合法な移動先を返す。`src` に駒がなければ空。
///
/// 成/不成の区別はしないので、同じ移動先は 1 度しか現れない。
pub fn legal_moves_for(state: &mut GameState, src: Square) -> Vec<Square> {
    let pc = match state.board().get(src) {
        Some(pc) => pc,
        None => return vec![],
    };

    let mut mvs = MoveArray::new();
    generate_moves_walk_from(state, src, pc, &mut mvs);

    let mut dsts = Vec::<Square>::new();
    for mv in mvs {
        if !dsts.contains(&mv.dst()) && is_move_safe(state, mv) {
            dsts.push(mv.dst());
        }
    }

    dsts
}

/// 陣営 `side` が駒種 `kind` を打てるマスを全て返す。
///
/// 実際に `kind` を持っているかどうかは問わない。
pub fn legal_drop_positions(state: &mut GameState, kind: PieceKind, side: Side) -> Vec<Square> {
    Square::iter()
        .filter(|&dst| drop_is_legal(state, kind, side, dst))
        .collect()
}

/// 陣営 `side` が駒種 `kind` を `dst` に打つのが合法かどうかを返す。
///
/// 以下の全てを満たすとき合法:
///
/// * `dst` が空きマス。
/// * 二歩でない。
/// * 行き所のない駒でない(歩、香は最奥の段に、桂は奥の 2 段に打てない)。
/// * 打つ側に王手がかかっている場合、打つことで王手が解消される。
/// * 打ち歩詰めでない。
pub fn drop_is_legal(state: &mut GameState, kind: PieceKind, side: Side, dst: Square) -> bool {
    debug_assert!(kind.is_hand());

    let board = state.board();

    if !board.is_vacant(dst) {
        return false;
    }

    if kind == PieceKind::Pawn && board.has_pawn_on_file(side, dst.x()) {
        return false;
    }

    let rank = dst.relative_rank(side);
    match kind {
        PieceKind::Pawn | PieceKind::Lance if rank < 1 => return false,
        PieceKind::Knight if rank < 2 => return false,
        _ => {}
    }

    // 駒を打っても自玉への利きが増えることはないので、王手がかかっているときのみ確認すれば十分。
    let checked = is_king_in_check(board, side);

    let pc = Piece::new(side, kind);
    state.board_mut().put(dst, pc);

    let mut legal = !(checked && is_king_in_check(state.board(), side));

    if legal && kind == PieceKind::Pawn {
        let them = side.inv();
        if is_king_in_check(state.board(), them) && is_checkmate(state, them) {
            legal = false;
        }
    }

    state.board_mut().remove(dst);

    legal
}

/// 指定した陣営が詰んでいるかどうかを返す。王手がかかっていなければ偽。
///
/// 以下のいずれも不可能なら詰み:
///
/// * 玉が王手のかからないマスへ移動する(捕獲含む)。
/// * 玉以外の駒が王手駒を捕獲するか、王手の経路に合駒する。
/// * 王手の経路に駒を打つ。
///
/// 両王手の場合、1 つの王手駒への対処では王手が解消されないので、全ての候補は実際に適用して確認する。
pub fn is_checkmate(state: &mut GameState, side: Side) -> bool {
    let board = state.board();

    let king_sq = match board.king_square(side) {
        Some(sq) => sq,
        None => return false,
    };

    if !is_king_in_check(board, side) {
        return false;
    }

    let lines = check_lines(board, side, king_sq);

    let mut cands = MoveArray::new();

    // 玉の移動。
    let king = Piece::new(side, PieceKind::King);
    for dst in rules::destinations(board, king_sq, king) {
        cands.push(Move::new_walk(king, king_sq, dst, board.get(dst), false));
    }

    // 玉以外の駒による王手駒の捕獲、または合駒。
    for (src, pc) in board.pieces_of(side) {
        if pc.kind() == PieceKind::King {
            continue;
        }
        for dst in rules::destinations(board, src, pc) {
            if lines.contains(&dst) {
                let promo = rules::should_promote(pc, dst);
                cands.push(Move::new_walk(pc, src, dst, board.get(dst), promo));
            }
        }
    }

    // 玉を取る手は考えない(局面が既に壊れている場合のみ現れる)。
    cands.retain(|mv| !matches!(mv.captured(), Some(pc) if pc.kind() == PieceKind::King));

    if cands.into_iter().any(|mv| is_move_safe(state, mv)) {
        return false;
    }

    // 合駒(駒打ち)。打つ側に王手がかかっているので、drop_is_legal() は王手の解消まで確認する。
    let kinds: ArrayVec<PieceKind, 7> = state
        .hand(side)
        .distinct()
        .iter()
        .map(|(_, pc)| pc.kind())
        .collect();
    for kind in kinds {
        for &sq in &lines {
            if drop_is_legal(state, kind, side, sq) {
                return false;
            }
        }
    }

    true
}

/// 千日手かどうかを返す。
///
/// 直近 4 手が、その直前の 4 手とそれぞれ(`Move` の等価性の意味で)一致するとき真。
/// 8 手未満なら常に偽。
pub fn is_sennichite(history: &[UndoableMove]) -> bool {
    const CYCLE: usize = 4;

    let n = history.len();
    if n < 2 * CYCLE {
        return false;
    }

    let prev = &history[n - 2 * CYCLE..n - CYCLE];
    let last = &history[n - CYCLE..];

    prev.iter()
        .zip(last)
        .all(|(a, b)| Move::from(*a) == Move::from(*b))
}

/// 盤上の `sq` にある駒の合法な移動先(自殺手を除く)の数を返す。評価関数の機動力項に使う。
pub fn mobility(state: &mut GameState, sq: Square) -> usize {
    legal_moves_for(state, sq).len()
}
