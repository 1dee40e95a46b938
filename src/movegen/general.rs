//! 疑似合法手生成。
//! 生成される指し手の順序は未規定(探索側で並べ替える)。

use crate::evals;
use crate::state::GameState;
use crate::shogi::*;

use super::rules;
use super::MoveArray;

/// 指定した陣営の全ての疑似合法手を生成する。
///
/// 盤上の駒の移動については、成りが任意なら成/不成の両方を、強制なら成りのみを生成する。
/// 自殺手は含まれる(探索側で除外する)。
///
/// 駒打ちについては、駒種ごとに合法な(二歩、行き所のない駒、打ち歩詰め、王手放置でない)もののみを生成する。
/// 合法性判定のため局面を一時的に変更するが、関数から戻ったとき `state` は呼び出し前の局面に戻っている。
pub fn generate_moves(state: &mut GameState, us: Side) -> MoveArray {
    let mut mvs = MoveArray::new();

    generate_moves_walk(state, us, &mut mvs);
    generate_moves_drop(state, us, &mut mvs);

    mvs
}

/// 盤上の駒を動かす疑似合法手を生成する。
pub fn generate_moves_walk(state: &GameState, us: Side, mvs: &mut MoveArray) {
    let board = state.board();

    for (src, pc) in board.pieces_of(us) {
        generate_moves_walk_from(state, src, pc, mvs);
    }
}

/// 盤上の `src` にある駒 `pc` を動かす疑似合法手を生成する。
pub fn generate_moves_walk_from(state: &GameState, src: Square, pc: Piece, mvs: &mut MoveArray) {
    let board = state.board();

    for dst in rules::destinations(board, src, pc) {
        let captured = board.get(dst);

        // 玉を取る手は生成しない(手番でない側に王手がかかった局面でのみ現れる)。
        if matches!(captured, Some(other) if other.kind() == PieceKind::King) {
            continue;
        }

        if rules::may_promote(pc, src, dst) {
            mvs.push(Move::new_walk(pc, src, dst, captured, true));
            if !rules::should_promote(pc, dst) {
                mvs.push(Move::new_walk(pc, src, dst, captured, false));
            }
        } else {
            mvs.push(Move::new_walk(pc, src, dst, captured, false));
        }
    }
}

/// 合法な駒打ちを生成する。
///
/// 同じ駒種の駒が複数あっても、最初に見つかった手駒置き場のマスからのみ生成する。
pub fn generate_moves_drop(state: &mut GameState, us: Side, mvs: &mut MoveArray) {
    let candidates = state.hand(us).distinct();

    for (slot, pc) in candidates {
        for dst in Square::iter() {
            if evals::drop_is_legal(state, pc.kind(), us, dst) {
                mvs.push(Move::new_drop(pc, slot, dst));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::board::Board;
    use crate::hand::HandGrid;
    use crate::player::*;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn test_startpos() {
        let mut state = GameState::startpos();
        // 平手初期局面の疑似合法手は 30 手(全て合法)。
        assert_eq!(generate_moves(&mut state, SENTE).len(), 30);
        assert_eq!(generate_moves(&mut state, GOTE).len(), 30);
        assert_eq!(state, GameState::startpos());
    }

    #[test]
    fn test_promotion_variants() {
        let mut board = Board::empty();
        board.put(Square::new(8, 8), Piece::new(SENTE, PieceKind::King));
        board.put(Square::new(0, 0), Piece::new(GOTE, PieceKind::King));
        board.put(Square::new(4, 3), Piece::new(SENTE, PieceKind::Pawn));
        board.put(Square::new(6, 1), Piece::new(SENTE, PieceKind::Pawn));
        let mut state = GameState::new(board, default_players(), SENTE, 1);

        let mvs: Vec<_> = generate_moves(&mut state, SENTE)
            .into_iter()
            .filter(|mv| mv.piece().kind() == PieceKind::Pawn)
            .collect();

        // 五三への歩は成/不成、七一(最奥)への歩は成りのみ。
        let to_53: Vec<_> = mvs.iter().filter(|mv| mv.dst() == Square::new(4, 2)).collect();
        assert_eq!(to_53.len(), 2);
        let to_71: Vec<_> = mvs.iter().filter(|mv| mv.dst() == Square::new(6, 0)).collect();
        assert_eq!(to_71.len(), 1);
        assert!(to_71[0].is_promotion());
    }

    #[test]
    fn test_drop_distinct() {
        let mut board = Board::empty();
        board.put(Square::new(8, 8), Piece::new(SENTE, PieceKind::King));
        board.put(Square::new(0, 0), Piece::new(GOTE, PieceKind::King));

        let mut hand = HandGrid::empty();
        hand.add(Piece::new(SENTE, PieceKind::Gold));
        hand.add(Piece::new(SENTE, PieceKind::Gold));
        let players = Players::from([
            Player::with_hand(SENTE, "先手", PlayerKind::Human, hand),
            Player::new(GOTE, "後手", PlayerKind::Human),
        ]);
        let mut state = GameState::new(board, players, SENTE, 1);

        let mut mvs = MoveArray::new();
        generate_moves_drop(&mut state, SENTE, &mut mvs);

        // 金 2 枚でも、空きマス 79 箇所に対し 1 通りずつ。
        assert_eq!(mvs.len(), 79);
        assert!(mvs
            .iter()
            .all(|mv| mv.src() == Source::Hand(HandSlot::from_index(0))));
    }
}
