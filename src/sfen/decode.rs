use anyhow::{anyhow, bail, ensure, Context as _};

use crate::board::Board;
use crate::game::Game;
use crate::hand::HandGrid;
use crate::myarray::*;
use crate::player::*;
use crate::shogi::*;
use crate::state::GameState;

type Hands = MyArray1<HandGrid, Side, 2>;

/// sfen 文字列(局面 + 省略可能な指し手列)をデコードし、指し手を全て適用した対局を返す。
///
/// 局面は構文のみチェックするが、指し手は合法手でなければならない。
/// 対局者の名前は既定値("先手", "後手")になる。
pub fn sfen_decode_game(s: impl AsRef<str>) -> anyhow::Result<Game> {
    // 先頭と末尾の空白は無視する。
    let s = s.as_ref().trim();

    let mut tokens = s.split_ascii_whitespace();

    let state = sfen_decode_position_from_iter(&mut tokens)?;
    let mut game = Game::from_state(state);

    if let Some(moves_magic) = tokens.next() {
        ensure!(
            moves_magic == "moves",
            r#""moves" expected, but got {}"#,
            moves_magic
        );
        for mv_s in tokens {
            let mv = sfen_decode_move(game.state(), mv_s)?;
            game.try_apply_move(mv)
                .with_context(|| format!("cannot apply move: {}", mv_s))?;
        }
    }

    Ok(game)
}

/// sfen 局面文字列をデコードし、その局面を返す。
/// 構文はチェックするが、合法性チェックは一切行わない。
///
/// 文字列の先頭と末尾の空白は無視される。
/// また、最初のトークンが "position" の場合、それは単に無視される。
/// 対局者の名前は既定値("先手", "後手")になる。
pub fn sfen_decode_position(s: impl AsRef<str>) -> anyhow::Result<GameState> {
    // 先頭と末尾の空白は無視する。
    let s = s.as_ref().trim();

    let mut tokens = s.split_ascii_whitespace();

    let state = sfen_decode_position_from_iter(&mut tokens)?;

    if let Some(token) = tokens.next() {
        bail!("position string has redundant token: {}", token);
    }

    Ok(state)
}

fn sfen_decode_position_from_iter<'a, I>(it: &mut I) -> anyhow::Result<GameState>
where
    I: Iterator<Item = &'a str>,
{
    let mut it = it.peekable();

    // 最初のトークンが "position" なら単に無視する。
    if it.peek().context("position string is empty")? == &"position" {
        it.next();
    }

    let magic = it.next().context("position string is empty")?;

    if magic == "startpos" {
        return Ok(GameState::startpos());
    }

    ensure!(magic == "sfen", "invalid position string magic: {}", magic);

    let board = sfen_decode_board(it.next().context("board string not found")?)?;
    let side_to_move = sfen_decode_side(it.next().context("side string not found")?)?;
    let mut hands = sfen_decode_hands(it.next().context("hands string not found")?)?;
    let ply = sfen_decode_ply(it.next().context("ply string not found")?)?;

    let players = Players::from([
        Player::with_hand(
            SENTE,
            SENTE.to_string(),
            PlayerKind::Human,
            std::mem::take(&mut hands[SENTE]),
        ),
        Player::with_hand(
            GOTE,
            GOTE.to_string(),
            PlayerKind::Human,
            std::mem::take(&mut hands[GOTE]),
        ),
    ]);

    Ok(GameState::new(board, players, side_to_move, ply))
}

/// sfen 盤面文字列をデコードし、その盤面を返す。合法性チェックは一切行わない。
///
/// ただし同じ陣営の玉が 2 つ以上ある盤面は表現できないのでエラーとする。
fn sfen_decode_board(s: &str) -> anyhow::Result<Board> {
    let mut board = Board::empty();

    let mut it = s.split('/');

    for y in 0..9 {
        let row_s = it.next().context("board string must have exactly 9 rows")?;
        sfen_decode_board_row(row_s, y, &mut board)?;
    }

    if let Some(s) = it.next() {
        bail!("board string has redundant row: {}", s);
    }

    Ok(board)
}

fn sfen_decode_board_row(s: &str, y: i32, board: &mut Board) -> anyhow::Result<()> {
    #[derive(Debug)]
    struct State<'a> {
        board: &'a mut Board,
        x: i32, // 次に駒を置く筋。９筋から１筋に向かって減っていく。
        y: i32,
        promo: bool,
    }
    impl<'a> State<'a> {
        fn new(board: &'a mut Board, y: i32) -> Self {
            Self {
                board,
                x: 8,
                y,
                promo: false,
            }
        }
        fn update(&mut self, c: char) -> anyhow::Result<()> {
            match c {
                '+' => {
                    ensure!(!self.promo, "double '+' is not allowed");
                    self.check_row_overflow(1)?;
                    self.promo = true;
                }
                '1'..='9' => {
                    ensure!(!self.promo, "'+' cannot be placed before digit");
                    let n = c.to_digit(10).map_or(0, |d| d as i32);
                    self.check_row_overflow(n)?;
                    self.x -= n;
                }
                _ => {
                    let mut pc = sfen_decode_board_piece(c)?;
                    self.check_row_overflow(1)?;
                    if self.promo {
                        ensure!(pc.can_promote(), "not promotable piece: {}", c);
                        pc = pc.promoted();
                        self.promo = false;
                    }
                    if pc.kind() == PieceKind::King {
                        ensure!(
                            self.board.king_square(pc.side()).is_none(),
                            "duplicate king: {}",
                            c
                        );
                    }
                    self.board.put(Square::new(self.x, self.y), pc);
                    self.x -= 1;
                }
            }
            Ok(())
        }
        fn finalize(&self) -> anyhow::Result<()> {
            ensure!(!self.promo, "remaining promotion flag");
            ensure!(self.x == -1, "board row must have exactly 9 columns");
            Ok(())
        }
        fn check_row_overflow(&self, n: i32) -> anyhow::Result<()> {
            ensure!(self.x - n + 1 >= 0, "row overflow");
            Ok(())
        }
    }

    let mut state = State::new(board, y);
    for c in s.chars() {
        state.update(c)?;
    }
    state.finalize()?;

    Ok(())
}

fn sfen_decode_board_piece(c: char) -> anyhow::Result<Piece> {
    let side = if c.is_ascii_uppercase() { SENTE } else { GOTE };

    let kind = match c.to_ascii_uppercase() {
        'K' => PieceKind::King,
        _ => sfen_decode_piece_kind(c.to_ascii_uppercase())
            .with_context(|| format!("invalid board piece char: {}", c))?,
    };

    Ok(Piece::new(side, kind))
}

/// 手駒となりうる駒種の文字(大文字)をデコードする。
fn sfen_decode_piece_kind(c: char) -> Option<PieceKind> {
    match c {
        'R' => Some(PieceKind::Rook),
        'B' => Some(PieceKind::Bishop),
        'G' => Some(PieceKind::Gold),
        'S' => Some(PieceKind::Silver),
        'N' => Some(PieceKind::Knight),
        'L' => Some(PieceKind::Lance),
        'P' => Some(PieceKind::Pawn),
        _ => None,
    }
}

/// sfen 手番文字列をデコードし、手番の陣営を返す。
fn sfen_decode_side(s: &str) -> anyhow::Result<Side> {
    match s {
        "b" => Ok(SENTE),
        "w" => Ok(GOTE),
        _ => bail!("invalid side string: {}", s),
    }
}

/// sfen 手駒文字列をデコードし、両陣営の手駒を返す。
///
/// 手駒は文字列に現れた順に手駒置き場の先頭から詰めて置かれる。
/// 手駒置き場の容量を超える場合はエラーとする。
fn sfen_decode_hands(s: &str) -> anyhow::Result<Hands> {
    if s == "-" {
        return Ok(Hands::from([HandGrid::empty(), HandGrid::empty()]));
    }

    #[derive(Debug)]
    struct State {
        hands: Hands,
        count: u32,
    }
    impl State {
        fn new() -> Self {
            Self {
                hands: Hands::from([HandGrid::empty(), HandGrid::empty()]),
                count: 0,
            }
        }
        fn update(&mut self, c: char) -> anyhow::Result<()> {
            match c {
                '0'..='9' => {
                    ensure!(
                        !(c == '0' && self.count == 0),
                        "leading zero is not allowed"
                    );
                    let d = c.to_digit(10).map_or(0, |d| d);
                    self.count = self.count * 10 + d;
                    ensure!(self.count <= HandSlot::COUNT as u32, "count is too large");
                }
                _ => {
                    let side = if c.is_ascii_uppercase() { SENTE } else { GOTE };
                    let kind = sfen_decode_piece_kind(c.to_ascii_uppercase())
                        .ok_or_else(|| anyhow!("invalid hand piece char: {}", c))?;
                    let n = if self.count == 0 { 1 } else { self.count };
                    for _ in 0..n {
                        let hand = &mut self.hands[side];
                        ensure!(hand.len() < HandSlot::COUNT, "hand overflow");
                        hand.add(Piece::new(side, kind));
                    }
                    self.count = 0;
                }
            }
            Ok(())
        }
        fn finalize(&self) -> anyhow::Result<()> {
            ensure!(self.count == 0, "remaining count specifier");
            Ok(())
        }
    }

    let mut state = State::new();
    for c in s.chars() {
        state.update(c)?;
    }
    state.finalize()?;

    Ok(state.hands)
}

/// sfen 手数文字列をデコードし、その手数を返す。
fn sfen_decode_ply(s: &str) -> anyhow::Result<u32> {
    let ply: u32 = s.parse()?;
    ensure!(ply >= 1, "ply must be positive");

    Ok(ply)
}

/// sfen 指し手文字列をデコードし、`state` 上の指し手を返す。
///
/// 動かす駒、捕獲する駒、および駒打ちの手駒置き場のマスは `state` から決まる。
/// 駒打ちの主体は `state` の手番の側とする。
/// 移動元に駒があることと、打つ駒を持っていることのみチェックし、合法性チェックは行わない。
///
/// 文字列の先頭と末尾の空白は無視される。
pub fn sfen_decode_move(state: &GameState, s: impl AsRef<str>) -> anyhow::Result<Move> {
    // 先頭と末尾の空白は無視する。
    let s = s.as_ref().trim();

    if let Some((src, dst, promo)) = sfen_decode_move_walk(s) {
        return state
            .make_walk(src, dst, promo)
            .ok_or_else(|| anyhow!("no movable piece for move: {}", s));
    }

    if let Some((kind, dst)) = sfen_decode_move_drop(s) {
        return state
            .make_drop(state.side_to_move(), kind, dst)
            .ok_or_else(|| anyhow!("no piece in hand for move: {}", s));
    }

    bail!("invalid move string: {}", s)
}

fn sfen_decode_move_walk(s: &str) -> Option<(Square, Square, bool)> {
    let mut it = s.chars();

    let src = sfen_decode_move_square(it.next()?, it.next()?)?;
    let dst = sfen_decode_move_square(it.next()?, it.next()?)?;

    let promo = if let Some(c) = it.next() {
        (c == '+').then(|| true)?
    } else {
        false
    };

    it.next().is_none().then(|| (src, dst, promo))
}

fn sfen_decode_move_drop(s: &str) -> Option<(PieceKind, Square)> {
    let mut it = s.chars();

    let kind = sfen_decode_piece_kind(it.next()?)?;

    if it.next()? != '*' {
        return None;
    }

    let dst = sfen_decode_move_square(it.next()?, it.next()?)?;

    it.next().is_none().then(|| (kind, dst))
}

fn sfen_decode_move_square(c_col: char, c_row: char) -> Option<Square> {
    let x = match c_col {
        '1'..='9' => c_col.to_digit(10)? as i32 - 1,
        _ => return None,
    };
    let y = match c_row {
        'a'..='i' => i32::from(c_row as u8 - b'a'),
        _ => return None,
    };

    Some(Square::new(x, y))
}
