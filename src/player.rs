//! 対局者。

use crate::engine::Difficulty;
use crate::hand::HandGrid;
use crate::myarray::*;
use crate::shogi::*;

/// 対局者の種別。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PlayerKind {
    Human,
    Computer(Difficulty),
}

/// 対局者。陣営、名前、種別、および手駒置き場を持つ。
///
/// 対局開始時に陣営ごとに 1 つずつ作られ、対局中に差し替えられることはない。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Player {
    side: Side,
    name: String,
    kind: PlayerKind,
    hand: HandGrid,
}

impl Player {
    /// 手駒が空の対局者を作る。
    pub fn new(side: Side, name: impl Into<String>, kind: PlayerKind) -> Self {
        Self::with_hand(side, name, kind, HandGrid::empty())
    }

    /// 手駒を指定して対局者を作る。手駒は全て `side` に属していなければならない。
    pub fn with_hand(side: Side, name: impl Into<String>, kind: PlayerKind, hand: HandGrid) -> Self {
        assert!(
            hand.iter().all(|(_, pc)| pc.side() == side),
            "hand contains opponent's piece"
        );

        Self {
            side,
            name: name.into(),
            kind,
            hand,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    /// コンピュータが指す対局者かどうかを返す。
    pub fn is_computer(&self) -> bool {
        matches!(self.kind, PlayerKind::Computer(_))
    }

    /// 手駒置き場への参照を返す。
    pub fn hand(&self) -> &HandGrid {
        &self.hand
    }

    pub(crate) fn hand_mut(&mut self) -> &mut HandGrid {
        &mut self.hand
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.side)
    }
}

/// 両陣営の対局者。
pub type Players = MyArray1<Player, Side, 2>;

/// 名前を既定値("先手", "後手")とした人間同士の対局者を返す。
pub fn default_players() -> Players {
    Players::from([
        Player::new(SENTE, SENTE.to_string(), PlayerKind::Human),
        Player::new(GOTE, GOTE.to_string(), PlayerKind::Human),
    ])
}
