use serde_json::Value;

use super::engine::HanFields;
use crate::model::*;

// 役名の日本語表記
const YAKU_NAMES: &[(&str, &str)] = &[
    ("Menzen Tsumo", "門前清自摸和"),
    ("Pinfu", "平和"),
    ("Sanshoku Doujun", "三色同順"),
    ("Junchan", "純全帯幺九"),
    ("Dora", "ドラ"),
    ("Aka Dora", "赤ドラ"),
    ("Ittsu", "一通"),
    ("Riichi", "立直"),
    ("Ippatsu", "一発"),
    ("Tanyao", "断幺九"),
    ("Yakuhai", "役牌"),
    ("Yakuhai (east)", "役牌（東）"),
    ("Yakuhai (south)", "役牌（南）"),
    ("Yakuhai (west)", "役牌（西）"),
    ("Yakuhai (north)", "役牌（北）"),
    ("Yakuhai (haku)", "役牌（白）"),
    ("Yakuhai (hatsu)", "役牌（發）"),
    ("Yakuhai (chun)", "役牌（中）"),
    ("Sanshoku Doukou", "三色同刻"),
    ("Sankantsu", "三槓子"),
    ("Toitoi", "対々和"),
    ("Chiitoitsu", "七対子"),
    ("Honrou", "混老頭"),
    ("Ryanpeikou", "二盃口"),
    ("Chanta", "混全帯幺九"),
    ("Sanankou", "三暗刻"),
    ("Shousangen", "小三元"),
    ("Honitsu", "混一色"),
    ("Chinitsu", "清一色"),
    ("Kokushi Musou", "国士無双"),
    ("Suuankou", "四暗刻"),
    ("Daisangen", "大三元"),
    ("Tsuuiisou", "字一色"),
    ("Chinroutou", "清老頭"),
    ("Ryuuiisou", "緑一色"),
    ("Suukantsu", "四槓子"),
    ("Tenhou", "天和"),
    ("Chiihou", "地和"),
    ("Renhou", "人和"),
];

// 表に無い役名はそのまま返却
// "Dora", "Dora 2" などは "ドラ", "ドラ 2" に変換
pub fn translate_yaku_name(name: &str) -> String {
    if name.starts_with("Dora") {
        return name.replace("Dora", "ドラ");
    }
    YAKU_NAMES
        .iter()
        .find(|(en, _)| *en == name)
        .map_or_else(|| name.to_string(), |(_, ja)| ja.to_string())
}

// 手牌は常に門前なので, 門前/副露で翻数が変わる役は門前の翻数を採用
pub fn yaku_han(y: &RawYaku, fields: HanFields) -> Option<i32> {
    match fields {
        HanFields::Absent => None,
        HanFields::Fixed => y.han,
        HanFields::PerContext => y.han_closed.or(y.han),
    }
}

// 支払い点数の変換
// {main, additional} の形式以外は文字列のまま保持, 空の場合はNone
pub fn normalize_cost(cost: Option<&Value>) -> Option<Cost> {
    let v = cost?;
    if let Value::Object(obj) = v {
        let main = obj.get("main").and_then(Value::as_i64);
        let additional = obj.get("additional").and_then(Value::as_i64);
        if let (Some(main), Some(additional)) = (main, additional) {
            return Some(Cost::Split {
                main: main as i32,
                additional: additional as i32,
            });
        }
    }
    match v {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(Cost::Opaque(s.clone())),
        _ => Some(Cost::Opaque(v.to_string())),
    }
}

pub fn normalize_score(raw: &RawScore, fields: HanFields) -> ScoreResult {
    ScoreResult {
        han: raw.han,
        fu: raw.fu,
        cost: normalize_cost(raw.cost.as_ref()),
        yaku: raw
            .yaku
            .iter()
            .map(|y| YakuEntry {
                name: translate_yaku_name(&y.name),
                han_contribution: yaku_han(y, fields),
            })
            .collect(),
    }
}

#[test]
fn test_translate_yaku_name() {
    assert_eq!(translate_yaku_name("Riichi"), "立直");
    assert_eq!(translate_yaku_name("Yakuhai (hatsu)"), "役牌（發）");
    assert_eq!(translate_yaku_name("Aka Dora"), "赤ドラ");
    assert_eq!(translate_yaku_name("Dora"), "ドラ");
    assert_eq!(translate_yaku_name("Dora 3"), "ドラ 3");
    assert_eq!(translate_yaku_name("Nagashi Mangan"), "Nagashi Mangan");
}

#[test]
fn test_yaku_han_fields() {
    let mut y = RawYaku::new("Honitsu", None);
    y.han_closed = Some(3);
    y.han_open = Some(2);
    assert_eq!(yaku_han(&y, HanFields::PerContext), Some(3));
    assert_eq!(yaku_han(&y, HanFields::Fixed), None);
    assert_eq!(yaku_han(&y, HanFields::Absent), None);

    let y = RawYaku::new("Dora 2", Some(2));
    assert_eq!(yaku_han(&y, HanFields::PerContext), Some(2));
    assert_eq!(yaku_han(&y, HanFields::Fixed), Some(2));
}

#[test]
fn test_normalize_cost() {
    use serde_json::json;

    let v = json!({"main": 3900, "additional": 0, "total": 3900});
    assert_eq!(
        normalize_cost(Some(&v)),
        Some(Cost::Split {
            main: 3900,
            additional: 0
        })
    );
    assert_eq!(
        normalize_cost(Some(&json!("2000-3900"))),
        Some(Cost::Opaque("2000-3900".to_string()))
    );
    assert_eq!(
        normalize_cost(Some(&json!({"total": 8000}))),
        Some(Cost::Opaque("{\"total\":8000}".to_string()))
    );
    assert_eq!(normalize_cost(Some(&json!(12000))), Some(Cost::Opaque("12000".to_string())));
    assert_eq!(normalize_cost(None), None);
    assert_eq!(normalize_cost(Some(&json!(null))), None);
    assert_eq!(normalize_cost(Some(&json!({}))), None);
    assert_eq!(normalize_cost(Some(&json!(""))), None);
}

#[test]
fn test_normalize_score_no_yaku() {
    // 役なし0翻でも正常な結果
    let raw = RawScore {
        han: 0,
        fu: 0,
        cost: None,
        yaku: vec![],
    };
    let res = normalize_score(&raw, HanFields::Fixed);
    assert_eq!(res.han, 0);
    assert!(res.yaku.is_empty());
    assert_eq!(res.cost, None);
}

#[test]
fn test_normalize_score() {
    let raw: RawScore = serde_json::from_str(
        r#"{
            "han": 4, "fu": 30,
            "cost": {"main": 7700, "additional": 0},
            "yaku": [
                {"name": "Riichi", "han": 1},
                {"name": "Sanshoku Doujun", "han_closed": 2, "han_open": 1},
                {"name": "Dora 1", "han": 1}
            ]
        }"#,
    )
    .unwrap();
    let res = normalize_score(&raw, HanFields::PerContext);
    let yaku: Vec<String> = res.yaku.iter().map(|y| y.to_string()).collect();
    assert_eq!(yaku, vec!["立直 (1翻)", "三色同順 (2翻)", "ドラ 1 (1翻)"]);
    assert_eq!(res.fu, 30);
}
