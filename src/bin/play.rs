//! 思考エンジンと対戦するシェル。

use std::ops::ControlFlow;

use anyhow::{anyhow, bail, Context as _};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};
use structopt::StructOpt;

use shogi_adviser::*;

#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(long, possible_values = &Difficulty::variants(), case_insensitive = true, default_value = "Normal")]
    difficulty: Difficulty,

    /// 人間が後手を持つ。
    #[structopt(long)]
    gote: bool,

    /// 開始局面 (sfen 局面文字列)。
    #[structopt(long)]
    sfen: Option<String>,

    /// ノイズ用の乱数シード。
    #[structopt(long)]
    seed: Option<u64>,

    /// 思考ログを標準エラー出力に出す。
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
            LevelFilter::Warn
        })
        .chain(std::io::stderr())
        .apply()?;

    let human = if opt.gote { GOTE } else { SENTE };
    let rng = match opt.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let game = match opt.sfen {
        Some(sfen) => Game::from_state(sfen_decode_position(sfen)?),
        None => {
            let you = Player::new(human, "あなた", PlayerKind::Human);
            let com = Player::new(
                human.inv(),
                "コンピュータ",
                PlayerKind::Computer(opt.difficulty),
            );
            if human == SENTE {
                Game::new(you, com)
            } else {
                Game::new(com, you)
            }
        }
    };

    let mut shell = Shell::new(game, human, opt.difficulty.config(), rng);

    shell.interact()?;

    Ok(())
}

#[derive(Debug)]
struct Shell {
    game: Game,
    human: Side,
    config: SearchConfig,
    rng: StdRng,
}

impl Shell {
    fn new(game: Game, human: Side, config: SearchConfig, rng: StdRng) -> Self {
        Self {
            game,
            human,
            config,
            rng,
        }
    }

    fn interact(&mut self) -> anyhow::Result<()> {
        use std::io::Write as _;

        self.print_position();

        // 開始局面でコンピュータの手番ならまず指させる。
        if self.game.side_to_move() != self.human && !self.report_outcome() {
            self.com_move()?;
        }

        loop {
            println!();
            print!("play shell > ");
            std::io::stdout().flush()?;

            let mut line = String::new();
            if std::io::stdin().read_line(&mut line)? == 0 {
                break;
            }

            let line = line.trim();
            let tokens: Vec<_> = line.split_ascii_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            let cmd = tokens[0];
            let args = &tokens[1..];

            match self.do_command(cmd, args) {
                Ok(ControlFlow::Break(_)) => break,
                Err(e) => println!("error: {:#}", e),
                _ => {}
            }
        }

        Ok(())
    }

    fn do_command(&mut self, cmd: &str, args: &[&str]) -> anyhow::Result<ControlFlow<()>> {
        match cmd {
            "quit" => return Ok(ControlFlow::Break(())),
            "move" => self.do_command_move(args)?,
            "undo" => self.do_command_undo(args)?,
            "redo" => self.do_command_redo(args)?,
            "hint" => self.do_command_hint(args)?,
            "print" => self.do_command_print(args)?,
            _ => bail!("unknown command: {}", cmd),
        }

        Ok(ControlFlow::Continue(()))
    }

    fn do_command_move(&mut self, args: &[&str]) -> anyhow::Result<()> {
        let mv_s = args.get(0).context("move is not specified")?;

        if self.game.outcome().is_some() {
            bail!("game is over");
        }
        if self.game.side_to_move() != self.human {
            bail!("not your turn");
        }

        let mv = sfen_decode_move(self.game.state(), mv_s)?;
        self.game.try_apply_move(mv)?;

        self.print_position();

        if self.report_outcome() {
            return Ok(());
        }

        self.com_move()
    }

    /// 人間の直前の指し手(とそれに対するコンピュータの応手)を取り消す。
    fn do_command_undo(&mut self, _args: &[&str]) -> anyhow::Result<()> {
        self.game.undo_move().context("history is empty")?;
        if self.game.side_to_move() != self.human {
            self.game.undo_move();
        }

        self.print_position();

        Ok(())
    }

    /// 取り消した指し手(とそれに対するコンピュータの応手)を再適用する。
    fn do_command_redo(&mut self, _args: &[&str]) -> anyhow::Result<()> {
        self.game.redo_move().context("redo history is empty")?;
        if self.game.side_to_move() != self.human {
            self.game.redo_move();
        }

        self.print_position();
        self.report_outcome();

        Ok(())
    }

    fn do_command_hint(&mut self, _args: &[&str]) -> anyhow::Result<()> {
        let mv = self.search(self.human)?.context("no legal move")?;

        println!("ヒント: {} ({})", sfen_encode_move(mv), mv);

        Ok(())
    }

    fn do_command_print(&mut self, args: &[&str]) -> anyhow::Result<()> {
        let obj_s = *args.get(0).context("object name is not specified")?;

        match obj_s {
            "position" => self.print_position(),
            "sfen" => println!("{}", sfen_encode_position(self.game.state())),
            "history" => {
                let mvs: Vec<_> = self
                    .game
                    .history()
                    .iter()
                    .map(|umv| sfen_encode_move(umv.get()))
                    .collect();
                println!("{}", mvs.join(" "));
            }
            _ => bail!("unknown object name"),
        }

        Ok(())
    }

    fn com_move(&mut self) -> anyhow::Result<()> {
        let com = self.human.inv();

        let mv = match self.search(com)? {
            Some(mv) => mv,
            None => {
                self.report_outcome();
                return Ok(());
            }
        };

        self.game.apply_move(mv);
        println!("コンピュータ: {} ({})", sfen_encode_move(mv), mv);

        self.print_position();
        self.report_outcome();

        Ok(())
    }

    /// 局面の複製を別スレッドに渡して探索し、その結果を待つ。
    fn search(&mut self, side: Side) -> anyhow::Result<Option<Move>> {
        let state = self.game.state().clone();
        let config = self.config;
        let mut rng = StdRng::seed_from_u64(self.rng.random());

        let handle =
            std::thread::spawn(move || best_move_with_rng(&state, side, config, &mut rng));

        handle.join().map_err(|_| anyhow!("search thread panicked"))
    }

    /// 終局していれば結果を表示して true を返す。
    fn report_outcome(&self) -> bool {
        let outcome = match self.game.outcome() {
            Some(outcome) => outcome,
            None => {
                if self.game.is_king_in_check(self.game.side_to_move()) {
                    println!("王手");
                }
                return false;
            }
        };

        let msg = match outcome {
            GameOutcome::Checkmate { winner } if winner == self.human => "あなたの勝ち",
            GameOutcome::NoLegalMoves { loser } if loser != self.human => "あなたの勝ち",
            GameOutcome::Repetition => "引き分け",
            _ => "わたしの勝ち",
        };
        println!("終局: {} ({})", msg, outcome);

        true
    }

    fn print_position(&self) {
        print!("{}", self.game);
    }
}
