//! 駒の動きの規則。
//!
//! 各駒種の動きは「ステップ」(1 マスだけ動く方向の集合)と「スライド」(障害物に当たるまで進む方向の集合)の組で表す。
//! 方向は `(dx, forward)` で、`forward` は駒の陣営から見た前方を正とする。

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::shogi::*;

/// 移動先マス配列。
///
/// 1 つの駒の移動先は最大でも 20 (盤中央の龍・馬) なので、余裕をもたせておく。
pub type SquareArray = ArrayVec<Square, 32>;

type Dirs = &'static [(i32, i32)];

const STEPS_KING: Dirs = &[
    (-1, 1),
    (0, 1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const STEPS_GOLD: Dirs = &[(-1, 1), (0, 1), (1, 1), (-1, 0), (1, 0), (0, -1)];
const STEPS_SILVER: Dirs = &[(-1, 1), (0, 1), (1, 1), (-1, -1), (1, -1)];
const STEPS_KNIGHT: Dirs = &[(-1, 2), (1, 2)];
const STEPS_PAWN: Dirs = &[(0, 1)];
const STEPS_DIAGONAL: Dirs = &[(-1, 1), (1, 1), (-1, -1), (1, -1)];
const STEPS_ORTHOGONAL: Dirs = &[(0, 1), (-1, 0), (1, 0), (0, -1)];

const SLIDES_LANCE: Dirs = &[(0, 1)];
const SLIDES_ROOK: Dirs = STEPS_ORTHOGONAL;
const SLIDES_BISHOP: Dirs = STEPS_DIAGONAL;

/// 駒種ごとの (ステップ方向, スライド方向) を返す。
///
/// 龍は飛車のスライドに斜め 1 マスのステップを、馬は角のスライドに縦横 1 マスのステップを加えたもの。
/// 成銀、成桂、成香、と金は全て金と同じ動き。
const fn dirs(pk: PieceKind) -> (Dirs, Dirs) {
    use PieceKind::*;

    match pk {
        King => (STEPS_KING, &[]),
        Rook => (&[], SLIDES_ROOK),
        Bishop => (&[], SLIDES_BISHOP),
        Gold | ProSilver | ProKnight | ProLance | ProPawn => (STEPS_GOLD, &[]),
        Silver => (STEPS_SILVER, &[]),
        Knight => (STEPS_KNIGHT, &[]),
        Lance => (&[], SLIDES_LANCE),
        Pawn => (STEPS_PAWN, &[]),
        Dragon => (STEPS_DIAGONAL, SLIDES_ROOK),
        Horse => (STEPS_ORTHOGONAL, SLIDES_BISHOP),
    }
}

/// `board` 上の `from` にある駒 `pc` の移動先を全て返す(疑似合法)。
///
/// 味方の駒があるマスには移動できない。敵の駒があるマスには移動できる(捕獲)。
/// スライドは敵の駒を含めてそこで止まる。自殺手かどうかは考慮しない。
pub fn destinations(board: &Board, from: Square, pc: Piece) -> SquareArray {
    let mut dsts = SquareArray::new();

    let (steps, slides) = dirs(pc.kind());

    for &(dx, fw) in steps {
        let to = from.offset(pc.side(), dx, fw);
        if can_enter(board, to, pc.side()) {
            dsts.push(to);
        }
    }

    for &(dx, fw) in slides {
        let mut to = from.offset(pc.side(), dx, fw);
        while to.is_on_board() {
            match board.get(to) {
                None => dsts.push(to),
                Some(other) => {
                    if other.side() != pc.side() {
                        dsts.push(to);
                    }
                    break;
                }
            }
            to = to.offset(pc.side(), dx, fw);
        }
    }

    dsts
}

/// `board` 上の `from` にある駒 `pc` が `target` に利いているかどうかを返す。
///
/// `target` に届いた時点で打ち切るので、`destinations()` で全移動先を求めるより速い。
/// `target` にある駒の陣営は問わない(王手判定では敵玉、利き判定では空きマスを渡す)。
pub fn attacks(board: &Board, from: Square, pc: Piece, target: Square) -> bool {
    attack_line(board, from, pc, target).is_some()
}

/// `board` 上の `from` にある駒 `pc` が `target` に利いている場合、その利きの経路を返す。
///
/// 経路は `from` (利いている駒自身のマス)と、`from` と `target` の間のマスからなる。
/// つまり、この経路上のマスへ移動するか駒を打てば、その利きを解消できる(捕獲または合駒)。
/// ステップによる利きの場合は `from` のみとなる。
pub fn attack_line(board: &Board, from: Square, pc: Piece, target: Square) -> Option<SquareArray> {
    let (steps, slides) = dirs(pc.kind());

    for &(dx, fw) in steps {
        if from.offset(pc.side(), dx, fw) == target {
            let mut line = SquareArray::new();
            line.push(from);
            return Some(line);
        }
    }

    for &(dx, fw) in slides {
        let mut line = SquareArray::new();
        line.push(from);

        let mut to = from.offset(pc.side(), dx, fw);
        while to.is_on_board() {
            if to == target {
                return Some(line);
            }
            if board.get(to).is_some() {
                break;
            }
            line.push(to);
            to = to.offset(pc.side(), dx, fw);
        }
    }

    None
}

/// 駒 `pc` が `to` に移動するとき、成りが強制されるかどうかを返す。
///
/// 空の盤面上で `to` から移動先が 1 つもなくなる場合(行き所のない駒)に真。
/// 盤上の他の駒の配置には依存しない。
pub fn should_promote(pc: Piece, to: Square) -> bool {
    if !pc.can_promote() {
        return false;
    }

    let (steps, slides) = dirs(pc.kind());

    steps
        .iter()
        .chain(slides.iter())
        .all(|&(dx, fw)| !to.offset(pc.side(), dx, fw).is_on_board())
}

/// 駒 `pc` が `from` から `to` に移動するとき、成ることができるかどうかを返す。
///
/// 移動元か移動先の少なくとも一方が敵陣であればよい。
pub fn may_promote(pc: Piece, from: Square, to: Square) -> bool {
    pc.can_promote() && (from.is_promotion_zone(pc.side()) || to.is_promotion_zone(pc.side()))
}

fn can_enter(board: &Board, to: Square, side: Side) -> bool {
    to.is_on_board() && board.get(to).map_or(true, |other| other.side() != side)
}
