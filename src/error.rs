use thiserror::Error;

// リクエスト単位のエラー (プロセスを終了させることはない)
#[derive(Debug, Error)]
pub enum Error {
    #[error("no valid detections")]
    NoValidDetections,

    #[error("insufficient tiles: {0} (less than 14)")]
    InsufficientTiles(usize),

    #[error("encoding failure: {0}")]
    Encoding(String),

    #[error("scoring engine failure: {0}")]
    ScoringEngine(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoValidDetections => "no_valid_detections",
            Self::InsufficientTiles(_) => "insufficient_tiles",
            Self::Encoding(_) => "encoding_failure",
            Self::ScoringEngine(_) => "scoring_engine_failure",
            Self::InvalidInput(_) => "invalid_input",
        }
    }

    // クライアントに返却するメッセージ
    pub fn user_message(&self) -> String {
        match self {
            Self::NoValidDetections => "手牌の認識に失敗しました".to_string(),
            Self::InsufficientTiles(n) => format!("枚数不足: {}枚 (14枚未満)", n),
            Self::Encoding(e) => format!("牌の変換に失敗しました: {}", e),
            Self::ScoringEngine(e) => format!("点数計算エラー: {}", e),
            Self::InvalidInput(e) => format!("入力が不正です: {}", e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

pub type Res<T = ()> = Result<T, Error>;

#[test]
fn test_error_kind() {
    assert_eq!(Error::NoValidDetections.kind(), "no_valid_detections");
    assert_eq!(Error::InsufficientTiles(13).kind(), "insufficient_tiles");
    assert_eq!(
        Error::InsufficientTiles(13).to_string(),
        "insufficient tiles: 13 (less than 14)"
    );
    assert_eq!(Error::InsufficientTiles(13).user_message(), "枚数不足: 13枚 (14枚未満)");

    let e: Error = serde_json::from_str::<Vec<i32>>("{").unwrap_err().into();
    assert_eq!(e.kind(), "invalid_input");
}
