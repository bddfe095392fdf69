// 点数計算エンジンとの接続と, 検出結果から点数計算結果までの処理の流れ
mod command;
mod config;
mod engine;
mod normalize;
mod pipeline;

pub use self::{
    command::CommandEngine,
    config::build_scoring_config,
    engine::{EngineCapabilities, EngineError, HanFields, ScoringEngine, ScoringRequest},
    normalize::{normalize_cost, normalize_score, translate_yaku_name, yaku_han},
    pipeline::{calculate, prepare, Prepared},
};
