//! 思考エンジン。
//!
//! 探索は局面の複製上で行い、呼び出し元の局面は変更しない。
//! 複製した局面は `MoveGuard` を通じて変更し、どの経路で抜けても(枝刈りによる break を含む)必ず元に戻す。

use std::cmp::Reverse;

use clap::arg_enum;
use rand::Rng;

use crate::evals::*;
use crate::movegen::generate_moves;
use crate::mylog::*;
use crate::shogi::*;
use crate::state::GameState;

/// 詰みの評価値。
pub const MATE_SCORE: i32 = 1_000_000;

const INF: i32 = i32::MAX / 2;

/// 指し手オーダリング: 捕獲する手に加える値。
const CAPTURE_BONUS: i32 = 1000;
/// 指し手オーダリング: 成る手に加える値。
const PROMOTION_BONUS: i32 = 500;
/// 指し手オーダリング: 駒打ちの値。
const DROP_SCORE: i32 = 10;

// 評価関数の各項。
const MOBILITY_BONUS: i32 = 5;
const CENTER_BONUS: i32 = 20;
const PROMOTION_ZONE_BONUS: i32 = 30;
const CHECK_BONUS: i32 = 300;

arg_enum! {
    /// 難易度。探索深さと指し手オーダリングのノイズの組に対応する。
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub enum Difficulty {
        Easy,
        Normal,
        Hard,
    }
}

impl Difficulty {
    /// 難易度に対応する探索設定を返す。
    pub const fn config(self) -> SearchConfig {
        match self {
            Self::Easy => SearchConfig::new(1, 300),
            Self::Normal => SearchConfig::new(2, 50),
            Self::Hard => SearchConfig::new(3, 0),
        }
    }
}

/// 探索設定。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SearchConfig {
    max_depth: u32,
    noise: i32,
}

impl SearchConfig {
    /// 探索深さ(1 以上)とノイズの大きさ(0 以上、0 ならノイズなし)を指定して探索設定を作る。
    pub const fn new(max_depth: u32, noise: i32) -> Self {
        assert!(max_depth >= 1);
        assert!(noise >= 0);

        Self { max_depth, noise }
    }

    pub const fn max_depth(self) -> u32 {
        self.max_depth
    }

    pub const fn noise(self) -> i32 {
        self.noise
    }
}

impl From<Difficulty> for SearchConfig {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.config()
    }
}

/// 陣営 `side` の最善手を探索する。合法手がなければ `None`。
///
/// `state` は変更されない。ノイズにはスレッドローカルな乱数生成器を使う。
pub fn best_move(state: &GameState, side: Side, config: SearchConfig) -> Option<Move> {
    best_move_with_rng(state, side, config, &mut rand::rng())
}

/// 乱数生成器を指定して陣営 `side` の最善手を探索する。合法手がなければ `None`。
///
/// ノイズが 0 なら乱数は使われず、結果は決定的になる。
pub fn best_move_with_rng<R: Rng + ?Sized>(
    state: &GameState,
    side: Side,
    config: SearchConfig,
    rng: &mut R,
) -> Option<Move> {
    let mut scratch = state.clone();

    log_search_start(side, state.ply(), config);

    let mut cands = scored_moves(&mut scratch, side);
    if config.noise() > 0 {
        for (_, order) in cands.iter_mut() {
            *order = (*order + rng.random_range(-config.noise()..=config.noise())).max(0);
        }
    }
    cands.sort_by_key(|&(_, order)| Reverse(order));

    let mut best: Option<(Move, i32)> = None;
    let mut alpha = -INF;

    for (mv, order) in cands {
        let mut guard = MoveGuard::new(&mut scratch, mv);

        if is_king_in_check(guard.board(), side) {
            log_candidate_rejected(mv);
            continue;
        }

        let score = minimax(&mut guard, config.max_depth() - 1, side.inv(), side, alpha, INF);
        log_candidate(mv, order, score);

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((mv, score));
        }
        alpha = alpha.max(score);
    }

    log_search_end(best);

    best.map(|(mv, _)| mv)
}

/// alpha-beta 枝刈り付き minimax。評価値は常に `maximizing` 側から見たもの。
fn minimax(
    state: &mut GameState,
    depth: u32,
    side_to_move: Side,
    maximizing: Side,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    if depth == 0 {
        return evaluate(state, maximizing);
    }

    let maximize = side_to_move == maximizing;

    let mut best = if maximize { -INF } else { INF };
    let mut has_legal = false;

    for mv in ordered_moves(state, side_to_move) {
        let mut guard = MoveGuard::new(state, mv);

        if is_king_in_check(guard.board(), side_to_move) {
            continue;
        }
        has_legal = true;

        let score = minimax(&mut guard, depth - 1, side_to_move.inv(), maximizing, alpha, beta);

        if maximize {
            best = best.max(score);
            alpha = alpha.max(best);
        } else {
            best = best.min(score);
            beta = beta.min(best);
        }

        if beta <= alpha {
            break;
        }
    }

    if !has_legal {
        // 浅い詰みほど評価値の絶対値が大きくなるよう、残り深さを加える。
        let score = MATE_SCORE + depth as i32;
        return if maximize { -score } else { score };
    }

    best
}

/// 静的評価関数。`maximizing` 側から見た評価値を返す。
pub fn evaluate(state: &mut GameState, maximizing: Side) -> i32 {
    let them = maximizing.inv();

    let us_checked = is_king_in_check(state.board(), maximizing);
    let them_checked = is_king_in_check(state.board(), them);

    if them_checked && is_checkmate(state, them) {
        return MATE_SCORE;
    }
    if us_checked && is_checkmate(state, maximizing) {
        return -MATE_SCORE;
    }

    let sign = |side: Side| if side == maximizing { 1 } else { -1 };

    let mut score = 0;

    let pieces: Vec<_> = state.board().pieces().collect();
    for (sq, pc) in pieces {
        let mut value = pc.value() + MOBILITY_BONUS * mobility(state, sq) as i32;
        if sq.is_center() {
            value += CENTER_BONUS;
        }
        if sq.is_promotion_zone(pc.side()) {
            value += PROMOTION_ZONE_BONUS;
        }
        score += sign(pc.side()) * value;
    }

    for side in Side::iter() {
        for (_, pc) in state.hand(side).iter() {
            score += sign(side) * pc.value();
        }
    }

    if them_checked {
        score += CHECK_BONUS;
    }
    if us_checked {
        score -= CHECK_BONUS;
    }

    score
}

/// 指し手オーダリング用の値を返す。
fn ordering_score(mv: &Move) -> i32 {
    if mv.is_drop() {
        return DROP_SCORE;
    }

    let mut score = 0;
    if let Some(pc) = mv.captured() {
        score += pc.value() + CAPTURE_BONUS;
    }
    if mv.is_promotion() {
        score += PROMOTION_BONUS;
    }

    score
}

/// 疑似合法手とそのオーダリング用の値を生成する。(未ソート)
fn scored_moves(state: &mut GameState, side: Side) -> Vec<(Move, i32)> {
    generate_moves(state, side)
        .into_iter()
        .map(|mv| (mv, ordering_score(&mv)))
        .collect()
}

/// 疑似合法手をオーダリング用の値の降順に並べて返す。同値の手の順序は生成順のまま。
fn ordered_moves(state: &mut GameState, side: Side) -> Vec<Move> {
    let mut mvs = scored_moves(state, side);
    mvs.sort_by_key(|&(_, order)| Reverse(order));

    mvs.into_iter().map(|(mv, _)| mv).collect()
}

/// 指し手を適用した局面への参照。drop 時に指し手を取り消す。
struct MoveGuard<'a> {
    state: &'a mut GameState,
    umv: UndoableMove,
}

impl<'a> MoveGuard<'a> {
    fn new(state: &'a mut GameState, mv: Move) -> Self {
        let umv = state.do_move(mv);

        Self { state, umv }
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.state.undo_move(self.umv);
    }
}

impl std::ops::Deref for MoveGuard<'_> {
    type Target = GameState;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl std::ops::DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}
