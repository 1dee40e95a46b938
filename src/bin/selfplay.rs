//! コンピュータ同士で対局させ、棋譜を出力する。
//! 終局するか、指定した手数に達したら打ち切る。

use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng as _;
use structopt::StructOpt;

use shogi_adviser::*;

#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(long, possible_values = &Difficulty::variants(), case_insensitive = true, default_value = "Normal")]
    sente: Difficulty,

    #[structopt(long, possible_values = &Difficulty::variants(), case_insensitive = true, default_value = "Normal")]
    gote: Difficulty,

    /// 打ち切る手数。
    #[structopt(long, default_value = "256")]
    max_moves: usize,

    /// 開始局面 (sfen 局面文字列)。
    #[structopt(long)]
    sfen: Option<String>,

    /// ノイズ用の乱数シード。
    #[structopt(long)]
    seed: Option<u64>,

    /// 各候補手の評価値もログ出力する。
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    fern::Dispatch::new()
        .format(|out, message, _record| out.finish(format_args!("{}", message)))
        .level(if opt.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .chain(std::io::stderr())
        .apply()?;

    let mut rng = match opt.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut game = match opt.sfen {
        Some(sfen) => Game::from_state(sfen_decode_position(sfen)?),
        None => Game::new(
            Player::new(SENTE, "先手", PlayerKind::Computer(opt.sente)),
            Player::new(GOTE, "後手", PlayerKind::Computer(opt.gote)),
        ),
    };

    let outcome = loop {
        if let Some(outcome) = game.outcome() {
            break Some(outcome);
        }
        if game.move_count() >= opt.max_moves {
            break None;
        }

        let side = game.side_to_move();
        let difficulty = if side == SENTE { opt.sente } else { opt.gote };

        let mv = match game.best_move_with_rng(side, difficulty.config(), &mut rng) {
            Some(mv) => mv,
            None => break game.outcome(),
        };

        game.apply_move(mv);
        info!("{}: {} ({})", game.move_count(), sfen_encode_move(mv), mv);
        mylog::log_state(game.state());
    };

    let mvs: Vec<_> = game
        .history()
        .iter()
        .map(|umv| sfen_encode_move(umv.get()))
        .collect();

    println!("{}", mvs.join(" "));
    match outcome {
        Some(outcome) => println!("終局: {}", outcome),
        None => println!("打ち切り: {} 手", game.move_count()),
    }
    println!("{}", sfen_encode_position(game.state()));

    Ok(())
}
