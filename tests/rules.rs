use itertools::Itertools as _;
#[allow(unused_imports)]
use pretty_assertions::{assert_eq, assert_ne};

use shogi_adviser::*;

fn sq(x: i32, y: i32) -> Square {
    Square::new(x, y)
}

fn game(sfen: &str) -> Game {
    sfen_decode_game(sfen).unwrap()
}

#[test]
fn test_startpos_legal_moves() {
    let game = game("startpos");

    assert_eq!(game.legal_moves(SENTE).len(), 30);
    assert_eq!(game.legal_moves(GOTE).len(), 30);

    // ７筋の歩は 1 マスだけ進める。
    assert_eq!(game.legal_moves_for(sq(6, 6)), vec![sq(6, 5)]);
    // 飛車は左右にしか動けない。
    assert_eq!(
        game.legal_moves_for(sq(1, 7)).into_iter().sorted().collect_vec(),
        vec![sq(0, 7), sq(2, 7), sq(3, 7), sq(4, 7), sq(5, 7), sq(6, 7)]
    );
    // 空きマスからは動けない。
    assert!(game.legal_moves_for(sq(4, 4)).is_empty());
}

#[test]
fn test_pinned_piece() {
    // 飛車に釘付けにされた金は筋に沿ってしか動けない。
    let game = game("sfen 4k4/9/9/9/4r4/9/9/4G4/4K4 b - 1");

    assert_eq!(game.legal_moves_for(sq(4, 7)), vec![sq(4, 6)]);
}

#[test]
fn test_drop_nifu() {
    let game = game("sfen 4k4/9/9/9/9/9/9/4P4/4K4 b P 1");

    let dsts = game.legal_drop_positions(PieceKind::Pawn, SENTE);
    assert_eq!(dsts.len(), 64);
    assert!(dsts.iter().all(|dst| dst.x() != 4 && dst.y() != 0));
}

#[test]
fn test_drop_dead_ranks() {
    let game = game("sfen 4k4/9/9/9/9/9/9/9/4K4 b N 1");

    let dsts = game.legal_drop_positions(PieceKind::Knight, SENTE);
    assert_eq!(dsts.len(), 62);
    assert!(dsts.iter().all(|dst| dst.y() >= 2));

    // 後手から見た奥の 2 段は盤の下側。
    let dsts = game.legal_drop_positions(PieceKind::Lance, GOTE);
    assert!(dsts.iter().all(|dst| dst.y() <= 7));
    assert!(dsts.contains(&sq(0, 7)));
}

#[test]
fn test_drop_pawn_mate() {
    const SFEN: &str = "sfen 7nk/9/7G1/9/9/9/9/9/4K4 b P 1";

    let game = game(SFEN);
    let dsts = game.legal_drop_positions(PieceKind::Pawn, SENTE);
    assert!(!dsts.contains(&sq(0, 1)));
    assert!(dsts.contains(&sq(0, 2)));

    assert!(sfen_decode_game(format!("{} moves P*1b", SFEN)).is_err());

    // 玉が歩を取れるなら打ち歩詰めではない。
    let game = sfen_decode_game("sfen 7nk/9/9/9/9/9/9/9/4K4 b P 1 moves P*1b").unwrap();
    assert!(game.is_king_in_check(GOTE));
    assert!(!game.is_checkmate(GOTE));
}

#[test]
fn test_drop_pawn_against_full_hand() {
    // 打ち歩詰めの判定では相手玉が歩を取る手を試すので、相手の手駒が 1 枚増える。
    for sfen in [
        "sfen 8k/9/9/9/9/9/9/9/K8 b P9p4l4n3s 1",
        "sfen 8k/9/9/9/9/9/9/9/K8 b P2r2b4g4s4n4l17p 1",
    ] {
        let game = game(sfen);
        let orig = game.state().clone();

        let dsts = game.legal_drop_positions(PieceKind::Pawn, SENTE);
        assert_eq!(dsts.len(), 71);
        assert!(dsts.contains(&sq(0, 1)));

        assert!(!game.legal_moves(SENTE).is_empty());
        assert_eq!(game.outcome(), None);
        assert_eq!(game.state(), &orig);
    }
}

#[test]
fn test_must_resolve_check() {
    // 王手がかかっている側は王手を解消する手しか指せない。
    let game = game("sfen 4k4/9/9/9/4r4/9/9/9/4K4 b G 1");

    assert!(game.is_king_in_check(SENTE));

    let dsts = game.legal_drop_positions(PieceKind::Gold, SENTE);
    assert_eq!(dsts, vec![sq(4, 5), sq(4, 6), sq(4, 7)]);

    for mv in game.legal_moves(SENTE) {
        let mut game = game.clone();
        game.apply_move(mv);
        assert!(!game.is_king_in_check(SENTE), "{}", mv);
    }
}

#[test]
fn test_checkmate() {
    let game = game("sfen 4k4/4G4/4P4/9/9/9/9/9/4K4 w - 1");

    assert!(game.is_king_in_check(GOTE));
    assert!(game.is_checkmate(GOTE));
    assert!(game.legal_moves(GOTE).is_empty());
    assert_eq!(
        game.outcome(),
        Some(GameOutcome::Checkmate { winner: SENTE })
    );
}

#[test]
fn test_not_checkmate_when_escape() {
    // 金に紐がなければ玉で取れる。
    let game = game("sfen 4k4/4G4/9/9/9/9/9/9/4K4 w - 1");

    assert!(game.is_king_in_check(GOTE));
    assert!(!game.is_checkmate(GOTE));
    assert_eq!(game.outcome(), None);
}

#[test]
fn test_no_legal_moves() {
    let game = game("sfen 8k/R8/9/9/9/9/9/9/4K2R1 w - 1");

    assert!(!game.is_king_in_check(GOTE));
    assert!(!game.is_checkmate(GOTE));
    assert_eq!(
        game.outcome(),
        Some(GameOutcome::NoLegalMoves { loser: GOTE })
    );
}

#[test]
fn test_repetition() {
    const SHUFFLE: &str = "2h3h 8b7b 3h2h 7b8b";

    let game = sfen_decode_game(format!("startpos moves {}", SHUFFLE)).unwrap();
    assert!(!game.is_repetition_draw());

    let mut game = sfen_decode_game(format!("startpos moves {} {}", SHUFFLE, SHUFFLE)).unwrap();
    assert_eq!(game.move_count(), 8);
    assert!(game.is_repetition_draw());
    assert_eq!(game.outcome(), Some(GameOutcome::Repetition));

    game.undo_move();
    assert!(!game.is_repetition_draw());
}

#[test]
fn test_capture_goes_to_hand_demoted() {
    let mut game = game("startpos moves 7g7f 3c3d 8h2b+");

    assert_eq!(game.state().hand(SENTE).count(PieceKind::Bishop), 1);
    assert_eq!(
        game.state().board().get(sq(1, 1)),
        Some(Piece::new(SENTE, PieceKind::Horse))
    );

    // 馬を取ると角として手駒に入る。
    let mv = sfen_decode_move(game.state(), "3a2b").unwrap();
    game.try_apply_move(mv).unwrap();
    assert_eq!(game.state().hand(GOTE).count(PieceKind::Bishop), 1);

    // 取り消すと元の持ち主の成駒に戻る。
    game.undo_move();
    assert_eq!(
        game.state().board().get(sq(1, 1)),
        Some(Piece::new(SENTE, PieceKind::Horse))
    );
    assert!(game.state().hand(GOTE).is_empty());

    game.redo_move();
    assert_eq!(game.state().hand(GOTE).count(PieceKind::Bishop), 1);
}
