mod board;
mod engine;
pub mod evals;
mod game;
mod hand;
mod manager;
pub mod movegen;
pub mod myarray;
pub mod mylog;
mod perft;
mod player;
mod sfen;
mod shogi;
mod state;

pub use self::board::*;
pub use self::engine::*;
pub use self::evals::*;
pub use self::game::*;
pub use self::hand::*;
pub use self::manager::*;
pub use self::movegen::*;
pub use self::perft::*;
pub use self::player::*;
pub use self::sfen::*;
pub use self::shogi::*;
pub use self::state::*;
