// mainから直接呼び出すアプリケーションの動作モード(C, T)のモジュール

mod calculator;
mod tile;

pub use calculator::CalculatorApp;
pub use tile::{TileApp, TileRecognition};
