//! 将棋の基本要素たち。
//!
//! 陣営は newtype + 定数で表現するが、駒種は成駒との対応を網羅的に扱いたいので enum にする。
//!
//! 座標系は以下の通り:
//!
//! * `x` は筋のインデックス。１筋が 0, ９筋が 8。
//! * `y` は段のインデックス。一段目(後手の最奥)が 0, 九段目(先手の最奥)が 8。
//!
//! 先手の前方は `y` が減る向き、後手の前方は `y` が増える向き。

use std::iter::FusedIterator;

/// 陣営。
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Side(u32);

pub const SENTE: Side = Side(0);
pub const GOTE: Side = Side(1);

impl Side {
    /// 有効値かどうかを返す。
    pub const fn is_valid(self) -> bool {
        self.0 == SENTE.0 || self.0 == GOTE.0
    }

    /// 敵陣営を返す。
    pub const fn inv(self) -> Side {
        Self(self.0 ^ 1)
    }

    /// 前方を表す `y` 方向の符号を返す。先手は -1, 後手は +1。
    pub const fn forward(self) -> i32 {
        if self.0 == SENTE.0 {
            -1
        } else {
            1
        }
    }

    /// 陣営を昇順に列挙する。(`SENTE`、`GOTE` の順)
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        [SENTE, GOTE].into_iter()
    }

    /// 内部値を返す。`const` 文脈で使える。
    pub const fn inner(self) -> u32 {
        self.0
    }
}

impl From<Side> for usize {
    fn from(side: Side) -> Self {
        debug_assert!(side.is_valid());

        side.0 as Self
    }
}

impl std::fmt::Debug for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            SENTE => write!(f, "SENTE"),
            GOTE => write!(f, "GOTE"),
            _ => write!(f, "Side({})", self.0),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            SENTE => write!(f, "先手"),
            GOTE => write!(f, "後手"),
            side => write!(f, "無効な陣営({})", side.0),
        }
    }
}

/// 盤面のマス。盤面外の座標も表現できる(移動先の計算途中などで使う)。
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Square {
    x: i32,
    y: i32,
}

impl Square {
    /// 座標を指定してマスを作る。盤面外でもよい。
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 筋のインデックスを返す。
    pub const fn x(self) -> i32 {
        self.x
    }

    /// 段のインデックスを返す。
    pub const fn y(self) -> i32 {
        self.y
    }

    /// マスが盤面内かどうかを返す。
    pub const fn is_on_board(self) -> bool {
        0 <= self.x && self.x < 9 && 0 <= self.y && self.y < 9
    }

    /// マスが指定した陣営にとって敵陣(成れる領域)かどうかを返す。
    pub const fn is_promotion_zone(self, side: Side) -> bool {
        if side.0 == SENTE.0 {
            0 <= self.y && self.y <= 2
        } else {
            6 <= self.y && self.y <= 8
        }
    }

    /// 指定した陣営から見た段を返す。最奥が 0。
    ///
    /// 行き所のない駒の判定に使う。
    pub const fn relative_rank(self, side: Side) -> i32 {
        if side.0 == SENTE.0 {
            self.y
        } else {
            8 - self.y
        }
    }

    /// `side` の向きで `(dx, forward)` だけずらしたマスを返す。盤面外になりうる。
    pub const fn offset(self, side: Side, dx: i32, forward: i32) -> Self {
        Self::new(self.x + dx, self.y + forward * side.forward())
    }

    /// 盤面内の全てのマスを列挙する。(一段目の１筋から順に)
    pub fn iter() -> impl Iterator<Item = Self> + FusedIterator {
        (0..9).flat_map(|y| (0..9).map(move |x| Self::new(x, y)))
    }

    /// 盤面中央付近(５筋を中心に左右 2 筋、五段目を中心に上下 1 段)かどうかを返す。
    pub const fn is_center(self) -> bool {
        (self.x - 4).abs() <= 2 && (self.y - 4).abs() <= 1
    }
}

impl std::fmt::Debug for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Square({}, {})", self.x, self.y)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        const COLS: [char; 9] = ['１', '２', '３', '４', '５', '６', '７', '８', '９'];
        const ROWS: [char; 9] = ['一', '二', '三', '四', '五', '六', '七', '八', '九'];

        if self.is_on_board() {
            write!(f, "{}{}", COLS[self.x as usize], ROWS[self.y as usize])
        } else {
            write!(f, "無効なマス({}, {})", self.x, self.y)
        }
    }
}

/// 駒種(陣営の区別なし)。
///
/// 成れる駒種と成駒は `promoted()` / `demoted()` で互いに対応づけられる。
/// 成れない駒種(玉、金)と成駒自身については `promoted()` は恒等写像になる。
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PieceKind {
    King,
    Rook,
    Bishop,
    Gold,
    Silver,
    Knight,
    Lance,
    Pawn,
    Dragon,
    Horse,
    ProSilver,
    ProKnight,
    ProLance,
    ProPawn,
}

impl PieceKind {
    /// 成った駒種を返す。成れない駒種ならそのまま返す。
    pub const fn promoted(self) -> Self {
        match self {
            Self::Rook => Self::Dragon,
            Self::Bishop => Self::Horse,
            Self::Silver => Self::ProSilver,
            Self::Knight => Self::ProKnight,
            Self::Lance => Self::ProLance,
            Self::Pawn => Self::ProPawn,
            pk => pk,
        }
    }

    /// 成る前の駒種を返す。成駒でなければそのまま返す。
    pub const fn demoted(self) -> Self {
        match self {
            Self::Dragon => Self::Rook,
            Self::Horse => Self::Bishop,
            Self::ProSilver => Self::Silver,
            Self::ProKnight => Self::Knight,
            Self::ProLance => Self::Lance,
            Self::ProPawn => Self::Pawn,
            pk => pk,
        }
    }

    /// 成れる駒種かどうかを返す。つまり `promoted()` が恒等写像でないかどうか。
    pub const fn can_promote(self) -> bool {
        self.promoted() as u8 != self as u8
    }

    /// 成駒かどうかを返す。
    pub const fn is_promoted(self) -> bool {
        matches!(
            self,
            Self::Dragon
                | Self::Horse
                | Self::ProSilver
                | Self::ProKnight
                | Self::ProLance
                | Self::ProPawn
        )
    }

    /// 手駒となりうる駒種かどうかを返す。
    pub const fn is_hand(self) -> bool {
        !self.is_promoted() && !matches!(self, Self::King)
    }

    /// 駒の価値を返す。評価関数と指し手オーダリングで使う。
    pub const fn value(self) -> i32 {
        match self {
            Self::King => 0,
            Self::Rook => 950,
            Self::Bishop => 800,
            Self::Gold => 500,
            Self::Silver => 450,
            Self::Knight => 320,
            Self::Lance => 300,
            Self::Pawn => 100,
            Self::Dragon => 1300,
            Self::Horse => 1100,
            Self::ProSilver => 490,
            Self::ProKnight => 480,
            Self::ProLance => 480,
            Self::ProPawn => 500,
        }
    }

    /// 全ての駒種を列挙する。
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        [
            Self::King,
            Self::Rook,
            Self::Bishop,
            Self::Gold,
            Self::Silver,
            Self::Knight,
            Self::Lance,
            Self::Pawn,
            Self::Dragon,
            Self::Horse,
            Self::ProSilver,
            Self::ProKnight,
            Self::ProLance,
            Self::ProPawn,
        ]
        .into_iter()
    }

    /// 手駒となりうる駒種を列挙する。(飛、角、金、銀、桂、香、歩の順)
    pub fn iter_hand(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        [
            Self::Rook,
            Self::Bishop,
            Self::Gold,
            Self::Silver,
            Self::Knight,
            Self::Lance,
            Self::Pawn,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match *self {
            Self::King => "玉",
            Self::Rook => "飛",
            Self::Bishop => "角",
            Self::Gold => "金",
            Self::Silver => "銀",
            Self::Knight => "桂",
            Self::Lance => "香",
            Self::Pawn => "歩",
            Self::Dragon => "龍",
            Self::Horse => "馬",
            Self::ProSilver => "全",
            Self::ProKnight => "圭",
            Self::ProLance => "杏",
            Self::ProPawn => "と",
        };
        f.write_str(s)
    }
}

/// 駒(陣営の区別あり)。
///
/// 位置の情報は持たない。盤上にあるか手駒にあるかは、それを保持している側(`Board` または `HandGrid`)が決める。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Piece {
    side: Side,
    kind: PieceKind,
}

impl Piece {
    /// 陣営と駒種を指定して駒を作る。
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    /// 所属陣営を返す。
    pub const fn side(self) -> Side {
        self.side
    }

    /// 駒種を返す。
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    /// 成った駒を返す。成れない駒ならそのまま返す。
    pub const fn promoted(self) -> Self {
        Self::new(self.side, self.kind.promoted())
    }

    /// 成る前の駒を返す。成駒でなければそのまま返す。
    pub const fn demoted(self) -> Self {
        Self::new(self.side, self.kind.demoted())
    }

    /// 陣営を反転した駒を返す。
    pub const fn flipped(self) -> Self {
        Self::new(self.side.inv(), self.kind)
    }

    /// 成れる駒かどうかを返す。
    pub const fn can_promote(self) -> bool {
        self.kind.can_promote()
    }

    /// 駒の価値を返す。
    pub const fn value(self) -> i32 {
        self.kind.value()
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // 盤面表示と同じく、後手の駒には 'v' を前置する。
        if self.side == GOTE {
            f.write_str("v")?;
        } else {
            f.write_str(" ")?;
        }
        write!(f, "{}", self.kind)
    }
}

/// 手駒置き場のマス。4 列 x 10 段の 40 マスがあり、盤上の玉以外の 38 枚を全て置ける。
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct HandSlot(u8);

impl HandSlot {
    pub const COLS: u8 = 4;
    pub const ROWS: u8 = 10;
    pub const COUNT: usize = (Self::COLS * Self::ROWS) as usize;

    /// 列と段を指定して手駒置き場のマスを作る。範囲外の値を渡してはならない。
    pub const fn new(x: u8, y: u8) -> Self {
        debug_assert!(x < Self::COLS && y < Self::ROWS);

        Self(y * Self::COLS + x)
    }

    /// 通し番号から手駒置き場のマスを作る。
    pub const fn from_index(idx: usize) -> Self {
        debug_assert!(idx < Self::COUNT);

        Self(idx as u8)
    }

    pub const fn x(self) -> u8 {
        self.0 % Self::COLS
    }

    pub const fn y(self) -> u8 {
        self.0 / Self::COLS
    }

    /// 通し番号を返す。
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 全てのマスを通し番号順に列挙する。
    pub fn iter() -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator {
        (0..Self::COUNT).map(Self::from_index)
    }
}

impl std::fmt::Debug for HandSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "HandSlot({}, {})", self.x(), self.y())
    }
}

/// 指し手の移動元。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Source {
    /// 盤上のマス。
    Board(Square),

    /// 手駒置き場のマス(駒打ち)。
    Hand(HandSlot),
}

/// 指し手。
///
/// 動かす駒と捕獲する駒を値として保持する(駒は位置情報を持たないので、
/// 探索用に複製した局面で作った指し手をそのまま元の局面に適用できる)。
///
/// 等価性は移動元、移動先、駒打ちかどうか、動かす駒(駒種と陣営)のみで判定する。
/// 成りフラグと捕獲した駒は比較しない。千日手判定はこの等価性に依存している。
#[derive(Clone, Copy, Debug)]
pub struct Move {
    src: Source,
    dst: Square,
    piece: Piece,
    captured: Option<Piece>,
    promotion: bool,
}

impl Move {
    /// 盤上の駒を動かす指し手を作る。
    ///
    /// `captured` には移動先にある(捕獲前の)駒を渡す。
    pub fn new_walk(
        piece: Piece,
        src: Square,
        dst: Square,
        captured: Option<Piece>,
        promotion: bool,
    ) -> Self {
        debug_assert!(src != dst);
        debug_assert!(src.is_on_board() && dst.is_on_board());
        debug_assert!(!promotion || piece.can_promote());

        Self {
            src: Source::Board(src),
            dst,
            piece,
            captured,
            promotion,
        }
    }

    /// 駒打ちの指し手を作る。
    pub fn new_drop(piece: Piece, slot: HandSlot, dst: Square) -> Self {
        debug_assert!(piece.kind().is_hand());
        debug_assert!(dst.is_on_board());

        Self {
            src: Source::Hand(slot),
            dst,
            piece,
            captured: None,
            promotion: false,
        }
    }

    /// 指し手の主体の陣営を返す。
    pub fn player(&self) -> Side {
        self.piece.side()
    }

    /// 移動元を返す。
    pub fn src(&self) -> Source {
        self.src
    }

    /// 移動元が盤上ならそのマスを返す。
    pub fn src_square(&self) -> Option<Square> {
        match self.src {
            Source::Board(sq) => Some(sq),
            Source::Hand(_) => None,
        }
    }

    /// 移動先を返す。
    pub fn dst(&self) -> Square {
        self.dst
    }

    /// 動かす駒(成る前)を返す。
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// 捕獲する駒(捕獲前の状態)を返す。
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// 成りかどうかを返す。
    pub fn is_promotion(&self) -> bool {
        self.promotion
    }

    /// 駒打ちかどうかを返す。
    pub fn is_drop(&self) -> bool {
        matches!(self.src, Source::Hand(_))
    }

    /// 捕獲した駒を差し替えた指し手を返す。
    pub(crate) fn with_captured(mut self, captured: Option<Piece>) -> Self {
        self.captured = captured;
        self
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.src == other.src
            && self.dst == other.dst
            && self.is_drop() == other.is_drop()
            && self.piece == other.piece
    }
}

impl Eq for Move {}

impl std::hash::Hash for Move {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.src.hash(state);
        self.dst.hash(state);
        self.piece.hash(state);
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mark = if self.player() == SENTE { '▲' } else { '△' };
        write!(f, "{}{}{}", mark, self.dst, self.piece.kind())?;
        match self.src {
            Source::Hand(_) => f.write_str("打")?,
            Source::Board(src) => {
                if self.promotion {
                    f.write_str("成")?;
                }
                write!(f, "({}{})", src.x() + 1, src.y() + 1)?;
            }
        }

        Ok(())
    }
}

/// undo 可能な指し手。
///
/// 指し手そのものに加え、捕獲した駒が置かれた手駒置き場のマスを持つ。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct UndoableMove {
    mv: Move,
    captured_slot: Option<HandSlot>,
}

impl UndoableMove {
    /// 実際に適用された指し手と、捕獲した駒の格納先から `UndoableMove` を作る。
    pub(crate) fn new(mv: Move, captured_slot: Option<HandSlot>) -> Self {
        debug_assert_eq!(mv.captured().is_some(), captured_slot.is_some());

        Self { mv, captured_slot }
    }

    /// 元の指し手を返す。捕獲した駒は実際に盤上にあったものになっている。
    pub fn get(&self) -> Move {
        self.mv
    }

    /// 捕獲した駒が格納された手駒置き場のマスを返す。
    pub fn captured_slot(&self) -> Option<HandSlot> {
        self.captured_slot
    }
}

impl From<UndoableMove> for Move {
    fn from(umv: UndoableMove) -> Self {
        umv.mv
    }
}

impl std::fmt::Display for UndoableMove {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.mv)?;
        if let Some(pc) = self.mv.captured() {
            write!(f, " (捕獲: {})", pc.kind())?;
        }

        Ok(())
    }
}
