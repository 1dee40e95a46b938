//! sfen 形式の局面・指し手の入出力。
//!
//! シェルへの入力やテスト用の局面記述に使う。

mod decode;
mod encode;

pub use self::decode::*;
pub use self::encode::*;
