use serde::{de, ser};

use super::*;
use crate::hand::string::{tile_number_from_char, tile_type_from_char, tile_type_to_char};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile(pub Type, pub Tnum); // (type index, number index)

impl Tile {
    // 検出器のclass id -> 牌
    // 0~8: 1m~9m, 9~17: 1p~9p, 18~26: 1s~9s, 27~33: 1z~7z, 34~36: 0m,0p,0s
    pub fn from_class_id(id: usize) -> Option<Self> {
        match id {
            0..=26 => Some(Self(id / 9, id % 9 + 1)),
            27..=33 => Some(Self(TZ, id - 26)),
            34..=36 => Some(Self(id - 34, 0)),
            _ => None,
        }
    }

    pub fn from_symbol(s: &str) -> Res<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(Error::Encoding(format!("invalid tile symbol: '{}'", s)));
        }
        let ti = tile_type_from_char(chars[1])?;
        let ni = tile_number_from_char(chars[0])?;
        let t = Self(ti, ni);
        if !t.is_valid() {
            return Err(Error::Encoding(format!("invalid tile symbol: '{}'", s)));
        }
        Ok(t)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        match self.0 {
            TM | TP | TS => self.1 <= 9,
            TZ => (1..=7).contains(&self.1),
            _ => false,
        }
    }

    // 赤5の場合,通常の5を返却. それ以外の場合はコピーをそのまま返却.
    #[inline]
    pub fn to_normal(self) -> Self {
        if self.1 == 0 {
            Self(self.0, 5)
        } else {
            self
        }
    }

    #[inline]
    pub fn is_red5(&self) -> bool {
        self.0 != TZ && self.1 == 0
    }

    // 数牌
    #[inline]
    pub fn is_suit(&self) -> bool {
        self.0 != TZ
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.1, tile_type_to_char(self.0))
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tile {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 != other.0 {
            return self.0.cmp(&other.0);
        }

        // 赤5は4.5として比較 (通常の5の直前)
        let a = if self.1 == 0 { 9 } else { self.1 * 2 };
        let b = if other.1 == 0 { 9 } else { other.1 * 2 };
        a.cmp(&b)
    }
}

impl ser::Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TileVisitor;

impl<'de> de::Visitor<'de> for TileVisitor {
    type Value = Tile;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("tile symbol")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Tile::from_symbol(v).map_err(de::Error::custom)
    }
}

impl<'de> de::Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(TileVisitor)
    }
}

// [TileTable]
// index 0 は赤5の枚数. 赤5は通常の5の枚数にも含める.
pub type TileRow = [usize; TNUM];
pub type TileTable = [TileRow; TYPE];

#[test]
fn test_tile_from_class_id() {
    let codes: Vec<String> = (0..37)
        .map(|i| Tile::from_class_id(i).unwrap().to_string())
        .collect();
    assert_eq!(codes[0], "1m");
    assert_eq!(codes[8], "9m");
    assert_eq!(codes[9], "1p");
    assert_eq!(codes[18], "1s");
    assert_eq!(codes[27], "1z");
    assert_eq!(codes[33], "7z");
    assert_eq!(&codes[34..], &["0m", "0p", "0s"]);
    for id in 37..40 {
        assert_eq!(Tile::from_class_id(id), None);
    }
}

#[test]
fn test_tile_symbol() {
    assert_eq!(Tile::from_symbol("0p").unwrap(), Tile(TP, 0));
    assert_eq!(Tile::from_symbol("7z").unwrap(), Tile(TZ, 7));
    assert!(Tile::from_symbol("8z").is_err());
    assert!(Tile::from_symbol("0z").is_err());
    assert!(Tile::from_symbol("m1").is_err());
    assert!(Tile::from_symbol("1x").is_err());

    let t: Tile = serde_json::from_str("\"0s\"").unwrap();
    assert_eq!(t, Tile(TS, 0));
    assert_eq!(serde_json::to_string(&t).unwrap(), "\"0s\"");
}

#[test]
fn test_tile_order() {
    let mut tiles = vec![Tile(TP, 6), Tile(TP, 5), Tile(TM, 9), Tile(TP, 0), Tile(TP, 4)];
    tiles.sort();
    assert_eq!(format!("{:?}", tiles), "[9m, 4p, 0p, 5p, 6p]");
}
