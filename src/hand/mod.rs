// 検出結果から手牌・和了牌・ドラ表示牌を組み立てるモジュール
pub mod common;
pub mod dora;
pub mod encode;
pub mod filter;
pub mod select;
pub mod string;
pub mod winning;

pub use self::{
    dora::dora_indicators_from_detections,
    encode::{encode_dora, encode_hand, EncodedDora, EncodedHand, TileParsing},
    filter::{best_detection, counts_from_detections, to_pretty_counts, Kept},
    select::select_hand_tiles,
    winning::{force_winning_tile, resolve_winning_tile},
};
