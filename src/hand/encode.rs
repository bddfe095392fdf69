use serde::{Deserialize, Serialize};

use super::string::{tile_number_from_char, tiles_from_string, tiles_to_string};
use crate::error::{Error, Res};
use crate::model::*;

// 点数計算エンジンが牌の文字列を内部表現(136枚表現)に変換する際の方式
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileParsing {
    #[default]
    Combined, // "123m456p"をそのまま解釈
    SuitBuckets, // 萬子,筒子,索子,字牌の4つに分割してから解釈
}

// 種別ごとに分割した数字列
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SuitBuckets {
    pub man: String,
    pub pin: String,
    pub sou: String,
    pub honors: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedHand {
    pub hand: String,         // "123456789m12345p" 形式 (赤5は5)
    pub winning_tile: String, // "5m" 形式 (赤5は5)
    pub tiles: Vec<Index136>,
    pub win_tile: Index136,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedDora {
    pub indicators: String, // "1m0p" 形式 (赤5はそのまま, 重複あり)
    pub tiles: Vec<Index136>,
}

// 手牌を種別(m,p,s,z)ごとに昇順に並べた文字列に変換
// 赤5は通常の5として扱う
pub fn hand_to_string(tiles: &[Tile]) -> String {
    let mut tiles: Vec<Tile> = tiles.iter().map(|t| t.to_normal()).collect();
    tiles.sort();
    tiles_to_string(&tiles)
}

pub fn split_suits(exp: &str) -> Res<SuitBuckets> {
    let mut b = SuitBuckets::default();
    let mut tmp = String::new();
    for ch in exp.chars() {
        let bucket = match ch {
            'm' => &mut b.man,
            'p' => &mut b.pin,
            's' => &mut b.sou,
            'z' => &mut b.honors,
            _ => {
                tmp.push(ch);
                continue;
            }
        };
        bucket.push_str(&tmp);
        tmp.clear();
    }
    if !tmp.is_empty() {
        return Err(Error::Encoding(format!(
            "tile number without tile type: '{}'",
            exp
        )));
    }
    Ok(b)
}

pub fn string_to_136_array(exp: &str, strict: bool) -> Res<Vec<Index136>> {
    tiles_to_136_array(&tiles_from_string(exp)?, strict)
}

pub fn buckets_to_136_array(b: &SuitBuckets, strict: bool) -> Res<Vec<Index136>> {
    let mut tiles = vec![];
    for (ti, digits) in [(TM, &b.man), (TP, &b.pin), (TS, &b.sou), (TZ, &b.honors)] {
        for ch in digits.chars() {
            let t = Tile(ti, tile_number_from_char(ch)?);
            if !t.is_valid() {
                return Err(Error::Encoding(format!("invalid tile: {}", t)));
            }
            tiles.push(t);
        }
    }
    tiles_to_136_array(&tiles, strict)
}

pub fn parse_136_array(exp: &str, parsing: TileParsing, strict: bool) -> Res<Vec<Index136>> {
    match parsing {
        TileParsing::Combined => string_to_136_array(exp, strict),
        TileParsing::SuitBuckets => buckets_to_136_array(&split_suits(exp)?, strict),
    }
}

// 牌種のindex (0~33, 赤5は通常の5)
#[inline]
fn kind_index(t: Tile) -> usize {
    let t = t.to_normal();
    t.0 * 9 + t.1 - 1
}

// 136枚表現への変換
// 赤5は各5の先頭(牌種*4+0), それ以外の5はその後ろから割り当てる
// strict=trueの場合, 同種5枚目や赤5の重複はエラー
// strict=falseの場合(ドラ表示牌), 枠が足りなければ同じindexを再利用する
pub fn tiles_to_136_array(tiles: &[Tile], strict: bool) -> Res<Vec<Index136>> {
    let mut used = [[false; TILE]; 34];
    let mut seen = [0; 34];
    let mut res = vec![];
    for &t in tiles {
        let k = kind_index(t);
        let slot = if t.is_red5() {
            Some(0).filter(|&c| !used[k][c])
        } else if t.is_suit() && t.1 == 5 {
            [1, 2, 3, 0].into_iter().find(|&c| !used[k][c])
        } else {
            (0..TILE).find(|&c| !used[k][c])
        };
        let slot = match slot {
            Some(c) => c,
            None if strict => {
                return Err(Error::Encoding(format!("too many copies of {}", t)));
            }
            None if t.is_red5() => 0,
            None => seen[k] % TILE,
        };
        used[k][slot] = true;
        seen[k] += 1;
        res.push(k * TILE + slot);
    }
    Ok(res)
}

pub fn encode_hand(hand: &[Tile], winning_tile: Tile, parsing: TileParsing) -> Res<EncodedHand> {
    if hand.len() != HAND {
        return Err(Error::Encoding(format!("hand must be 14 tiles: {}", hand.len())));
    }

    let hand_str = hand_to_string(hand);
    let winning_str = hand_to_string(&[winning_tile]);
    let tiles = parse_136_array(&hand_str, parsing, true)?;
    let win_tile = parse_136_array(&winning_str, parsing, true)?[0];
    if !tiles.iter().any(|&i| i / TILE == win_tile / TILE) {
        return Err(Error::Encoding(format!(
            "winning tile {} not in hand {}",
            winning_str, hand_str
        )));
    }

    Ok(EncodedHand {
        hand: hand_str,
        winning_tile: winning_str,
        tiles,
        win_tile,
    })
}

pub fn encode_dora(indicators: &[Tile], parsing: TileParsing) -> Res<EncodedDora> {
    let s: String = indicators.iter().map(|t| t.to_string()).collect();
    let tiles = parse_136_array(&s, parsing, false)?;
    Ok(EncodedDora {
        indicators: s,
        tiles,
    })
}

#[cfg(test)]
fn sorted(mut v: Vec<Index136>) -> Vec<Index136> {
    v.sort();
    v
}

#[test]
fn test_hand_to_string() {
    let hand: Vec<Tile> = (0..14).map(|i| Tile::from_class_id(13 - i).unwrap()).collect();
    assert_eq!(hand_to_string(&hand), "123456789m12345p");

    let hand = tiles_from_string("11z9s0m5p1m0s5m").unwrap();
    assert_eq!(hand_to_string(&hand), "155m5p59s11z");
    assert_eq!(hand_to_string(&[Tile(TP, 0)]), "5p");
}

#[test]
fn test_split_suits() {
    let b = split_suits("123m45p11z6s7m").unwrap();
    assert_eq!(b.man, "1237");
    assert_eq!(b.pin, "45");
    assert_eq!(b.sou, "6");
    assert_eq!(b.honors, "11");
    assert!(split_suits("12m3").is_err());
}

#[test]
fn test_parsing_conventions_agree() {
    for exp in ["123456789m12345p", "11122233344455z", "55m0m19p19s1234567z", "1m2p1m"] {
        let a = parse_136_array(exp, TileParsing::Combined, false).unwrap();
        let b = parse_136_array(exp, TileParsing::SuitBuckets, false).unwrap();
        assert_eq!(sorted(a), sorted(b), "{}", exp);
    }
}

#[test]
fn test_136_array_indices() {
    assert_eq!(string_to_136_array("111m", true).unwrap(), vec![0, 1, 2]);
    assert_eq!(string_to_136_array("1p", true).unwrap(), vec![36]);
    assert_eq!(string_to_136_array("7z", true).unwrap(), vec![132]);
    // 赤5は先頭, 通常の5はその後ろ
    assert_eq!(string_to_136_array("550m", true).unwrap(), vec![17, 18, 16]);
    assert_eq!(string_to_136_array("5555m", true).unwrap(), vec![17, 18, 19, 16]);
}

#[test]
fn test_136_array_too_many_copies() {
    assert!(string_to_136_array("11111m", true).is_err());
    assert!(string_to_136_array("00s", true).is_err());
    assert!(string_to_136_array("5555m0m", true).is_err());
    // ドラ表示牌は重複を許容
    let v = string_to_136_array("11111m00s", false).unwrap();
    assert_eq!(v, vec![0, 1, 2, 3, 0, 88, 88]);
}

#[test]
fn test_136_array_invalid() {
    assert!(string_to_136_array("8z", false).is_err());
    assert!(parse_136_array("0z", TileParsing::SuitBuckets, false).is_err());
    assert!(parse_136_array("1x", TileParsing::SuitBuckets, false).is_err());
}

#[test]
fn test_encode_hand() {
    let hand = tiles_from_string("123456789m1234p0p").unwrap();
    let enc = encode_hand(&hand, Tile(TP, 0), TileParsing::Combined).unwrap();
    assert_eq!(enc.hand, "123456789m12345p");
    assert_eq!(enc.winning_tile, "5p");
    assert_eq!(enc.tiles.len(), 14);
    assert_eq!(enc.win_tile, 53);
    assert!(enc.tiles.contains(&enc.win_tile));

    let enc2 = encode_hand(&hand, Tile(TP, 0), TileParsing::SuitBuckets).unwrap();
    assert_eq!(sorted(enc.tiles), sorted(enc2.tiles));
    assert_eq!(enc.win_tile, enc2.win_tile);
}

#[test]
fn test_encode_hand_errors() {
    let hand = tiles_from_string("123456789m1234p").unwrap();
    assert!(encode_hand(&hand, Tile(TM, 1), TileParsing::Combined).is_err());

    let hand = tiles_from_string("123456789m12345p").unwrap();
    assert!(encode_hand(&hand, Tile(TZ, 1), TileParsing::Combined).is_err());

    // 和了牌の上書きで同種5枚になった手牌は変換できない
    let hand = tiles_from_string("5555p0p123456789m").unwrap();
    let e = encode_hand(&hand, Tile(TP, 0), TileParsing::Combined).unwrap_err();
    assert_eq!(e.kind(), "encoding_failure");
}

#[test]
fn test_encode_dora() {
    let dora = encode_dora(&[Tile(TM, 1), Tile(TP, 0), Tile(TM, 1)], TileParsing::Combined).unwrap();
    assert_eq!(dora.indicators, "1m0p1m");
    assert_eq!(dora.tiles, vec![0, 52, 1]);

    let dora = encode_dora(&[], TileParsing::SuitBuckets).unwrap();
    assert_eq!(dora.indicators, "");
    assert!(dora.tiles.is_empty());
}
