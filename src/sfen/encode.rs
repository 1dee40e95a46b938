use crate::board::Board;
use crate::state::GameState;
use crate::shogi::*;

/// 局面を sfen 局面文字列にエンコードする。合法性チェックは一切行わない。
///
/// 局面が平手初期局面(先手番、手駒なし、1 手目)の場合、"startpos" を返す。
/// 手駒置き場内の配置は保存されず、駒種ごとの枚数のみが出力される。
pub fn sfen_encode_position(state: &GameState) -> String {
    let hands_empty = Side::iter().all(|side| state.hand(side).is_empty());

    if state.side_to_move() == SENTE
        && state.ply() == 1
        && hands_empty
        && *state.board() == Board::startpos()
    {
        return "startpos".to_owned();
    }

    let mut s = String::new();

    s.push_str("sfen ");

    sfen_encode_board(state.board(), &mut s);
    s.push(' ');

    sfen_encode_side(state.side_to_move(), &mut s);
    s.push(' ');

    sfen_encode_hands(state, &mut s);
    s.push(' ');

    s.push_str(&state.ply().to_string());

    s
}

/// 盤面を sfen 盤面文字列にエンコードし、既存の文字列に追記する。
fn sfen_encode_board(board: &Board, s: &mut String) {
    for y in 0..9 {
        if y != 0 {
            s.push('/');
        }
        sfen_encode_board_row(board, y, s);
    }
}

fn sfen_encode_board_row(board: &Board, y: i32, s: &mut String) {
    #[derive(Debug)]
    struct State<'a> {
        s: &'a mut String,
        run_blank: u32,
    }
    impl<'a> State<'a> {
        fn new(s: &'a mut String) -> Self {
            Self { s, run_blank: 0 }
        }
        fn update(&mut self, pc: Option<Piece>) {
            match pc {
                None => self.run_blank += 1,
                Some(pc) => {
                    self.flush_run();
                    sfen_encode_board_piece(pc, self.s);
                }
            }
        }
        fn flush_run(&mut self) {
            if let Some(c) = char::from_digit(self.run_blank, 10).filter(|_| self.run_blank > 0) {
                self.s.push(c);
            }
            self.run_blank = 0;
        }
    }

    let mut state = State::new(s);
    for x in (0..9).rev() {
        state.update(board.get(Square::new(x, y)));
    }
    state.flush_run();
}

fn sfen_encode_board_piece(pc: Piece, s: &mut String) {
    if pc.kind().is_promoted() {
        s.push('+');
    }

    let c = match pc.kind().demoted() {
        PieceKind::King => 'K',
        kind => sfen_piece_kind_char(kind),
    };

    s.push(if pc.side() == SENTE {
        c
    } else {
        c.to_ascii_lowercase()
    });
}

/// 手駒となりうる駒種を大文字 1 文字にする。
fn sfen_piece_kind_char(kind: PieceKind) -> char {
    match kind {
        PieceKind::Rook => 'R',
        PieceKind::Bishop => 'B',
        PieceKind::Gold => 'G',
        PieceKind::Silver => 'S',
        PieceKind::Knight => 'N',
        PieceKind::Lance => 'L',
        PieceKind::Pawn => 'P',
        _ => panic!("not a hand piece kind: {:?}", kind),
    }
}

/// 手番の陣営を sfen 手番文字列にエンコードし、既存の文字列に追記する。
fn sfen_encode_side(side_to_move: Side, s: &mut String) {
    match side_to_move {
        SENTE => s.push('b'),
        GOTE => s.push('w'),
        _ => panic!("invalid side to move: {:?}", side_to_move),
    }
}

/// 両陣営の手駒を sfen 手駒文字列にエンコードし、既存の文字列に追記する。
fn sfen_encode_hands(state: &GameState, s: &mut String) {
    // 全ての先手の手駒、全ての後手の手駒の順に並べ、
    // 駒種は飛、角、金、銀、桂、香、歩の順に並べる。
    //
    // ref: https://web.archive.org/web/20080131070731/http://www.glaurungchess.com/shogi/usi.html

    if Side::iter().all(|side| state.hand(side).is_empty()) {
        s.push('-');
        return;
    }

    for side in Side::iter() {
        let hand = state.hand(side);
        for kind in PieceKind::iter_hand() {
            let n = hand.count(kind);
            if n == 0 {
                continue;
            }

            if n >= 2 {
                s.push_str(&n.to_string());
            }
            let c = sfen_piece_kind_char(kind);
            s.push(if side == SENTE {
                c
            } else {
                c.to_ascii_lowercase()
            });
        }
    }
}

/// 指し手を sfen 指し手文字列にエンコードする。合法性チェックは一切行わない。
pub fn sfen_encode_move(mv: Move) -> String {
    let mut s = String::new();

    match mv.src() {
        Source::Board(src) => {
            sfen_encode_move_square(src, &mut s);
            sfen_encode_move_square(mv.dst(), &mut s);
            if mv.is_promotion() {
                s.push('+');
            }
        }
        Source::Hand(_) => {
            s.push(sfen_piece_kind_char(mv.piece().kind()));
            s.push('*');
            sfen_encode_move_square(mv.dst(), &mut s);
        }
    }

    s
}

fn sfen_encode_move_square(sq: Square, s: &mut String) {
    debug_assert!(sq.is_on_board());

    s.push(char::from(b'1' + sq.x() as u8));
    s.push(char::from(b'a' + sq.y() as u8));
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::sfen::*;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn test_encode_startpos() {
        assert_eq!(sfen_encode_position(&GameState::startpos()), "startpos");
    }

    #[test]
    fn test_encode_hands_order() {
        // 手駒置き場内の順序によらず、sfen の規定順に並ぶ。
        let state = sfen_decode_position("sfen 4k4/9/9/9/9/9/9/9/4K4 b P2Rpg 1").unwrap();
        assert_eq!(
            sfen_encode_position(&state),
            "sfen 4k4/9/9/9/9/9/9/9/4K4 b 2RPgp 1"
        );
    }

    #[test]
    fn test_encode_move() {
        let game = sfen_decode_game("startpos moves 7g7f 3c3d 8h2b+ 3a2b").unwrap();
        let umvs = game.history();

        let encoded: Vec<_> = umvs.iter().map(|umv| sfen_encode_move(umv.get())).collect();
        assert_eq!(encoded, vec!["7g7f", "3c3d", "8h2b+", "3a2b"]);

        let mv = sfen_decode_move(game.state(), "B*4e").unwrap();
        assert_eq!(sfen_encode_move(mv), "B*4e");
    }
}
