use crate::error::{Error, Res};
use crate::model::*;

pub fn tile_type_from_char(ch: char) -> Res<Type> {
    match ch {
        'm' => Ok(TM),
        'p' => Ok(TP),
        's' => Ok(TS),
        'z' => Ok(TZ),
        _ => Err(Error::Encoding(format!("invalid tile type char: {}", ch))),
    }
}

pub fn tile_type_to_char(ti: Type) -> char {
    ['m', 'p', 's', 'z'][ti]
}

pub fn tile_number_from_char(ch: char) -> Res<Tnum> {
    match ch.to_digit(10) {
        Some(i) => Ok(i as Tnum),
        None => Err(Error::Encoding(format!("invalid tile number char: {}", ch))),
    }
}

// "123m456p11z"形式の文字列を牌のリストに変換
// 数字は直後の種別文字に属する
pub fn tiles_from_string(exp: &str) -> Res<Vec<Tile>> {
    let mut tiles = vec![];
    let mut nis = vec![];
    for ch in exp.chars() {
        match ch {
            'm' | 'p' | 's' | 'z' => {
                let ti = tile_type_from_char(ch)?;
                for ni in nis.drain(..) {
                    let t = Tile(ti, ni);
                    if !t.is_valid() {
                        return Err(Error::Encoding(format!("invalid tile: {}", t)));
                    }
                    tiles.push(t);
                }
            }
            _ => nis.push(tile_number_from_char(ch)?),
        }
    }
    if !nis.is_empty() {
        return Err(Error::Encoding(format!(
            "tile number without tile type: '{}'",
            exp
        )));
    }
    Ok(tiles)
}

// 牌のリストを種別ごとにまとめた文字列に変換 (並び替えは行わない)
pub fn tiles_to_string(tiles: &[Tile]) -> String {
    let mut res = String::new();
    for (i, t) in tiles.iter().enumerate() {
        res.push_str(&t.1.to_string());
        if tiles.get(i + 1).map_or(true, |n| n.0 != t.0) {
            res.push(tile_type_to_char(t.0));
        }
    }
    res
}

#[test]
fn test_tiles_from_string() {
    let tiles = tiles_from_string("340m77z").unwrap();
    assert_eq!(
        tiles,
        vec![Tile(TM, 3), Tile(TM, 4), Tile(TM, 0), Tile(TZ, 7), Tile(TZ, 7)]
    );
    assert!(tiles_from_string("").unwrap().is_empty());
    assert!(tiles_from_string("123").is_err());
    assert!(tiles_from_string("12x").is_err());
    assert!(tiles_from_string("8z").is_err());
}

#[test]
fn test_tiles_to_string() {
    let hand_str = "34777p1230567s66z";
    let hand = tiles_from_string(hand_str).unwrap();
    assert_eq!(tiles_to_string(&hand), hand_str);
    assert_eq!(tiles_to_string(&[]), "");
}
