//! 手駒置き場。

use arrayvec::ArrayVec;

use crate::shogi::*;

/// 手駒置き場。`HandSlot` ごとに高々 1 個の駒を持つ。
///
/// 容量は 4 列 x 10 段の 40 マス。
/// 手駒置き場にある駒は常に持ち主の陣営に属し、成っていない。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct HandGrid {
    slots: [Option<Piece>; HandSlot::COUNT],
}

impl HandGrid {
    /// 空の手駒置き場を返す。
    pub const fn empty() -> Self {
        Self {
            slots: [None; HandSlot::COUNT],
        }
    }

    /// 空かどうかを返す。
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// 駒の個数を返す。
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// 指定したマスの駒を返す。
    pub fn get(&self, slot: HandSlot) -> Option<Piece> {
        self.slots[slot.index()]
    }

    /// 最初の空きマスに駒を置き、そのマスを返す。
    ///
    /// 空きマスがない場合は panic する(捕獲数の上限を超えるのは状態が壊れている場合のみ)。
    pub fn add(&mut self, pc: Piece) -> HandSlot {
        let slot = HandSlot::iter()
            .find(|&slot| self.get(slot).is_none())
            .unwrap_or_else(|| panic!("hand grid overflow: {:?}", pc));

        self.put(slot, pc);

        slot
    }

    /// 指定したマスに駒を置く。マスは空いていなければならない。
    pub fn put(&mut self, slot: HandSlot, pc: Piece) {
        assert!(pc.kind().is_hand(), "not a hand piece: {:?}", pc);
        assert!(
            self.get(slot).is_none(),
            "hand slot is occupied: {:?}",
            slot
        );

        self.slots[slot.index()] = Some(pc);
    }

    /// 指定したマスの駒を取り除いて返す。マスには駒がなければならない。
    pub fn remove(&mut self, slot: HandSlot) -> Piece {
        self.slots[slot.index()]
            .take()
            .unwrap_or_else(|| panic!("hand slot is empty: {:?}", slot))
    }

    /// 指定した駒種を持つ最初のマスを返す。
    pub fn find(&self, kind: PieceKind) -> Option<HandSlot> {
        HandSlot::iter().find(|&slot| matches!(self.get(slot), Some(pc) if pc.kind() == kind))
    }

    /// 指定した駒種の個数を返す。
    pub fn count(&self, kind: PieceKind) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|pc| pc.kind() == kind)
            .count()
    }

    /// 駒のあるマスを (マス, 駒) の形で列挙する。
    pub fn iter(&self) -> impl Iterator<Item = (HandSlot, Piece)> + '_ {
        HandSlot::iter().filter_map(move |slot| self.get(slot).map(|pc| (slot, pc)))
    }

    /// 持っている駒種ごとに、その駒種が置かれた最初のマスを返す。(飛、角、金、銀、桂、香、歩の順)
    ///
    /// 同じ駒種の駒打ちはどのマスから打っても同じなので、指し手生成ではこれを使う。
    pub fn distinct(&self) -> ArrayVec<(HandSlot, Piece), 7> {
        PieceKind::iter_hand()
            .filter_map(|kind| self.find(kind).and_then(|slot| self.get(slot).map(|pc| (slot, pc))))
            .collect()
    }
}

impl Default for HandGrid {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Display for HandGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("なし");
        }

        for kind in PieceKind::iter_hand() {
            let n = self.count(kind);
            if n == 0 {
                continue;
            }

            write!(f, "{}", kind)?;
            if n >= 2 {
                write!(f, "{}", n)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn test_add_remove() {
        let mut hand = HandGrid::empty();
        let pawn = Piece::new(SENTE, PieceKind::Pawn);
        let gold = Piece::new(SENTE, PieceKind::Gold);

        let s0 = hand.add(pawn);
        let s1 = hand.add(gold);
        assert_eq!(s0, HandSlot::from_index(0));
        assert_eq!(s1, HandSlot::from_index(1));
        assert_eq!(hand.len(), 2);

        // 空いたマスは次の add で再利用される。
        assert_eq!(hand.remove(s0), pawn);
        assert_eq!(hand.add(gold), s0);
        assert_eq!(hand.count(PieceKind::Gold), 2);
        assert_eq!(hand.count(PieceKind::Pawn), 0);
    }

    #[test]
    fn test_distinct() {
        let mut hand = HandGrid::empty();
        for kind in [PieceKind::Pawn, PieceKind::Rook, PieceKind::Pawn] {
            hand.add(Piece::new(GOTE, kind));
        }

        let kinds: Vec<_> = hand.distinct().iter().map(|(_, pc)| pc.kind()).collect();
        assert_eq!(kinds, vec![PieceKind::Rook, PieceKind::Pawn]);
        assert_eq!(hand.find(PieceKind::Pawn), Some(HandSlot::from_index(0)));
    }

    #[test]
    fn test_capacity() {
        let mut hand = HandGrid::empty();
        for _ in 0..HandSlot::COUNT {
            hand.add(Piece::new(SENTE, PieceKind::Pawn));
        }
        assert_eq!(hand.len(), 40);
    }

    #[test]
    fn test_holds_all_capturable_pieces() {
        use PieceKind::*;

        let mut hand = HandGrid::empty();
        for (kind, n) in [
            (Rook, 2),
            (Bishop, 2),
            (Gold, 4),
            (Silver, 4),
            (Knight, 4),
            (Lance, 4),
            (Pawn, 18),
        ] {
            for _ in 0..n {
                hand.add(Piece::new(GOTE, kind));
            }
        }

        assert_eq!(hand.len(), 38);
        assert_eq!(hand.count(Pawn), 18);
        assert_eq!(hand.distinct().len(), 7);
    }

    #[test]
    #[should_panic]
    fn test_overflow_panics() {
        let mut hand = HandGrid::empty();
        for _ in 0..=HandSlot::COUNT {
            hand.add(Piece::new(SENTE, PieceKind::Pawn));
        }
    }

    #[test]
    #[should_panic]
    fn test_promoted_piece_rejected() {
        let mut hand = HandGrid::empty();
        hand.add(Piece::new(SENTE, PieceKind::Dragon));
    }
}
