use super::*;

// 風 (場風, 自風)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wind {
    #[default]
    East,
    South,
    West,
    North,
}

impl Wind {
    // 認識できない文字列は東として扱う
    pub fn from_str_or_east(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "east" | "e" | "東" => Self::East,
            "south" | "s" | "南" => Self::South,
            "west" | "w" | "西" => Self::West,
            "north" | "n" | "北" => Self::North,
            _ => Self::East,
        }
    }
}

impl fmt::Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::East => "東",
            Self::South => "南",
            Self::West => "西",
            Self::North => "北",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinType {
    #[default]
    Tsumo,
    Ron,
}

// リクエストで指定される和了条件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestOptions {
    pub riichi: bool,
    #[serde(deserialize_with = "deserialize_win_type")]
    pub win_type: WinType,
    pub round_wind: String,
    pub player_wind: String,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            riichi: false,
            win_type: WinType::Tsumo,
            round_wind: "東".to_string(),
            player_wind: "東".to_string(),
        }
    }
}

// "ron"以外はすべてツモ扱い
fn deserialize_win_type<'de, D>(deserializer: D) -> Result<WinType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(if s.trim().eq_ignore_ascii_case("ron") {
        WinType::Ron
    } else {
        WinType::Tsumo
    })
}

// ルール設定 (このシステムの定数でありユーザーは変更できない)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleToggles {
    pub open_tanyao: bool,    // 喰いタン
    pub aka_dora: bool,       // 赤ドラ
    pub double_yakuman: bool, // ダブル役満
    pub kazoe_limit: bool,    // 数え役満
    pub kiriage: bool,        // 切り上げ満貫
    pub tsumo_loss: bool,     // ツモ損
}

pub const RULE_TOGGLES: RuleToggles = RuleToggles {
    open_tanyao: true,
    aka_dora: true,
    double_yakuman: true,
    kazoe_limit: true,
    kiriage: false,
    tsumo_loss: false,
};

// 画像からは判定できない特殊条件役のフラグ (常にfalse)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SituationFlags {
    pub double_riichi: bool,
    pub ippatsu: bool,
    pub haitei: bool,
    pub houtei: bool,
    pub rinshan: bool,
    pub chankan: bool,
    pub tenhou: bool,
    pub chiihou: bool,
    pub renhou: bool,
}

// 点数計算エンジンに渡す和了条件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub riichi: bool,
    pub is_tsumo: bool,
    pub is_closed: bool, // 常に門前
    pub seat_wind: Wind,
    pub round_wind: Wind,
    pub is_dealer: bool,
    pub rules: RuleToggles,
    pub situations: SituationFlags,
}
