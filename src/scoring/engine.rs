use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hand::{EncodedDora, EncodedHand, TileParsing};
use crate::model::*;

// 役の翻数としてエンジンが返却するフィールド
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HanFields {
    Absent, // 翻数なし
    #[default]
    Fixed, // han のみ
    PerContext, // han_closed/han_open (門前/副露で翻数が変わる役), han は任意
}

// エンジンの仕様 (統合時に一度だけ決定する)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineCapabilities {
    pub tile_parsing: TileParsing,
    pub han_fields: HanFields,
}

// 点数計算エンジンへの入力
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRequest {
    pub hand: EncodedHand,
    pub dora: EncodedDora,
    pub config: ScoringConfig,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Rejected(String), // 和了形でない, 役なし, 設定の不整合など

    #[error("engine unavailable: {0}")]
    Unavailable(String),

    #[error("malformed engine output: {0}")]
    Malformed(String),
}

// 点数計算エンジン
// 呼び出しはブロッキングで, 結果は完全な形で返却されるか失敗するかのどちらか
pub trait ScoringEngine {
    fn capabilities(&self) -> EngineCapabilities;
    fn estimate(&self, request: &ScoringRequest) -> Result<RawScore, EngineError>;
}

impl fmt::Debug for dyn ScoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn ScoringEngine")
    }
}

#[test]
fn test_capabilities_json() {
    let caps: EngineCapabilities =
        serde_json::from_str(r#"{"tileParsing": "suitBuckets", "hanFields": "perContext"}"#)
            .unwrap();
    assert_eq!(caps.tile_parsing, TileParsing::SuitBuckets);
    assert_eq!(caps.han_fields, HanFields::PerContext);

    let caps: EngineCapabilities = serde_json::from_str("{}").unwrap();
    assert_eq!(caps, EngineCapabilities::default());
}
