//! 盤面。

use crate::myarray::*;
use crate::shogi::*;

type KingSq = MyArray1<Option<Square>, Side, 2>;

/// 盤面。9x9 のマスそれぞれに駒があるかないか、および各陣営の玉位置を持つ。
///
/// 玉位置は常にマスの内容と整合している(玉を置いたとき設定され、取り除いたとき解除される)。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Board {
    cells: [[Option<Piece>; 9]; 9], // [y][x]
    king_sq: KingSq,
}

impl Board {
    /// 空の盤面を返す。
    pub fn empty() -> Self {
        Self {
            cells: [[None; 9]; 9],
            king_sq: KingSq::default(),
        }
    }

    /// 平手初期盤面を返す。
    pub fn startpos() -> Self {
        use PieceKind::*;

        const BACK_RANK: [PieceKind; 9] =
            [Lance, Knight, Silver, Gold, King, Gold, Silver, Knight, Lance];

        let mut this = Self::empty();

        for x in 0..9 {
            this.put(Square::new(x, 0), Piece::new(GOTE, BACK_RANK[x as usize]));
            this.put(Square::new(x, 2), Piece::new(GOTE, Pawn));
            this.put(Square::new(x, 6), Piece::new(SENTE, Pawn));
            this.put(Square::new(x, 8), Piece::new(SENTE, BACK_RANK[x as usize]));
        }

        // 飛車は各陣営から見て右側(先手なら２筋、後手なら８筋)、角は左側。
        this.put(Square::new(7, 1), Piece::new(GOTE, Rook));
        this.put(Square::new(1, 1), Piece::new(GOTE, Bishop));
        this.put(Square::new(1, 7), Piece::new(SENTE, Rook));
        this.put(Square::new(7, 7), Piece::new(SENTE, Bishop));

        this
    }

    /// 指定したマスの駒を返す。盤面外なら `None`。
    pub fn get(&self, sq: Square) -> Option<Piece> {
        if !sq.is_on_board() {
            return None;
        }

        self.cells[sq.y() as usize][sq.x() as usize]
    }

    /// 指定したマスが盤面内の空きマスかどうかを返す。
    pub fn is_vacant(&self, sq: Square) -> bool {
        sq.is_on_board() && self.get(sq).is_none()
    }

    /// `sq` に `pc` を置く。`sq` は盤面内の空きマスでなければならない。
    pub fn put(&mut self, sq: Square, pc: Piece) {
        assert!(self.is_vacant(sq), "cannot put {:?} on {:?}", pc, sq);

        self.cells[sq.y() as usize][sq.x() as usize] = Some(pc);

        if pc.kind() == PieceKind::King {
            self.king_sq[pc.side()] = Some(sq);
        }
    }

    /// `sq` にある駒を取り除いて返す。`sq` には駒がなければならない。
    pub fn remove(&mut self, sq: Square) -> Piece {
        let pc = self
            .get(sq)
            .unwrap_or_else(|| panic!("no piece to remove on {:?}", sq));

        self.cells[sq.y() as usize][sq.x() as usize] = None;

        if pc.kind() == PieceKind::King {
            self.king_sq[pc.side()] = None;
        }

        pc
    }

    /// 指定した陣営の玉位置を返す。玉が盤上にない場合 `None`。
    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.king_sq[side]
    }

    /// 盤上の全ての駒を (マス, 駒) の形で列挙する。
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |sq| self.get(sq).map(|pc| (sq, pc)))
    }

    /// 盤上の指定した陣営の駒を列挙する。
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |&(_, pc)| pc.side() == side)
    }

    /// 指定した筋に指定した陣営の(成っていない)歩があるかどうかを返す。
    pub fn has_pawn_on_file(&self, side: Side, x: i32) -> bool {
        (0..9).any(|y| self.get(Square::new(x, y)) == Some(Piece::new(side, PieceKind::Pawn)))
    }
}

impl std::ops::Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, sq: Square) -> &Self::Output {
        &self.cells[sq.y() as usize][sq.x() as usize]
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for y in 0..9 {
            for x in (0..9).rev() {
                match self.get(Square::new(x, y)) {
                    Some(pc) => write!(f, "{}", pc)?,
                    None => f.write_str(" ・")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
