//! 思考ログ出力。

use log::{debug, info};

use crate::engine::SearchConfig;
use crate::shogi::*;
use crate::state::GameState;

/// 探索開始ログを出力する。
pub fn log_search_start(side: Side, ply: u32, config: SearchConfig) {
    info!(
        "# ------------------------------ {} 手目 {} 探索開始 (深さ {}, ノイズ {}) ------------------------------ {{{{{{",
        ply,
        side,
        config.max_depth(),
        config.noise()
    );
}

/// ルートの候補手の評価値ログを出力する。
pub fn log_candidate(mv: Move, order: i32, score: i32) {
    debug!("候補手: {} (オーダリング {}) 評価値: {}", mv, order, score);
}

/// ルートの候補手が自殺手を理由に却下されたログを出力する。
pub fn log_candidate_rejected(mv: Move) {
    debug!("候補手却下 (自殺手): {}", mv);
}

/// 探索終了ログを出力する。
pub fn log_search_end(best: Option<(Move, i32)>) {
    match best {
        Some((mv, score)) => info!("最善手: {} 評価値: {}", mv, score),
        None => info!("合法手なし"),
    }
    info!("# ------------------------------ 探索終了 ------------------------------ }}}}}}");
    info!("");
}

/// 与えられた局面をログ出力する。
pub fn log_state(state: &GameState) {
    info!("{}", state);
}
