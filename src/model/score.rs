use serde_json::Value;

use super::*;

// 点数計算エンジンが返却する役
// han, han_closed, han_open のどれを持つかはエンジンの種類による
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawYaku {
    pub name: String,
    #[serde(default)]
    pub han: Option<i32>,
    #[serde(default)]
    pub han_closed: Option<i32>,
    #[serde(default)]
    pub han_open: Option<i32>,
}

impl RawYaku {
    pub fn new(name: &str, han: Option<i32>) -> Self {
        Self {
            name: name.to_string(),
            han,
            han_closed: None,
            han_open: None,
        }
    }
}

// 点数計算エンジンの計算結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawScore {
    pub han: i32,
    pub fu: i32,
    #[serde(default)]
    pub cost: Option<Value>, // エンジン固有の形式
    #[serde(default)]
    pub yaku: Vec<RawYaku>,
}

// 支払い点数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cost {
    Split { main: i32, additional: i32 }, // (ロン or ツモの親/子の支払い, ツモの子の支払い)
    Opaque(String),                       // 分解できない形式はそのまま文字列で保持
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Split { main, additional } => write!(f, "{}/{}", main, additional),
            Self::Opaque(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YakuEntry {
    pub name: String, // 表示名 (翻訳済み)
    pub han_contribution: Option<i32>,
}

impl fmt::Display for YakuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.han_contribution {
            Some(h) => write!(f, "{} ({}翻)", self.name, h),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub han: i32,
    pub fu: i32,
    pub cost: Option<Cost>,
    pub yaku: Vec<YakuEntry>,
}

// APIの応答
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub han: i32,
    pub fu: i32,
    pub cost: Option<Cost>,
    pub yaku: Vec<String>,
    pub recognized_hand_tiles: usize,
    pub recognized_dora_tiles: usize,
    pub raw_output: String, // デバッグ用の出力 (解析用ではない)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

impl From<&Error> for ErrorResponse {
    fn from(e: &Error) -> Self {
        Self {
            error: e.user_message(),
            kind: e.kind().to_string(),
        }
    }
}

#[test]
fn test_response_shape() {
    let res = ApiResponse {
        han: 1,
        fu: 30,
        cost: Some(Cost::Split {
            main: 1000,
            additional: 0,
        }),
        yaku: vec!["立直 (1翻)".to_string()],
        recognized_hand_tiles: 15,
        recognized_dora_tiles: 0,
        raw_output: String::new(),
    };
    let v = serde_json::to_value(&res).unwrap();
    assert_eq!(v["cost"]["main"], 1000);
    assert_eq!(v["recognizedHandTiles"], 15);
    assert_eq!(v["recognizedDoraTiles"], 0);
    assert!(v.get("rawOutput").is_some());

    let res = ApiResponse {
        cost: Some(Cost::Opaque("8000".to_string())),
        ..res
    };
    assert_eq!(serde_json::to_value(&res).unwrap()["cost"], "8000");

    let res = ApiResponse { cost: None, ..res };
    assert!(serde_json::to_value(&res).unwrap()["cost"].is_null());
}
