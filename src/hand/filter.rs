use tracing::debug;

use super::common::{count_tile, inc_tile};
use crate::model::*;

// 閾値を通過した検出結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kept {
    pub tile: Tile,
    pub confidence: f64,
    pub bbox: [i32; 4],
}

impl Kept {
    #[inline]
    pub fn x2(&self) -> i32 {
        self.bbox[2]
    }
}

// 検出結果の検証と集計
// 有効な検出が0件でもエラーにはしない (呼び出し側で判定)
pub fn counts_from_detections(dets: &[Detection], threshold: f64) -> (TileTable, Vec<Kept>) {
    let mut counts = TileTable::default();
    let mut kept = vec![];
    for (i, d) in dets.iter().enumerate() {
        let tile = match tile_from_detection(d) {
            Some(t) => t,
            None => {
                debug!("detection #{} discarded: class id {:?}", i, d.class_id);
                continue;
            }
        };
        // 閾値と等しい場合も除外
        if d.confidence <= threshold {
            debug!(
                "detection #{} discarded: {} confidence {} <= {}",
                i, tile, d.confidence, threshold
            );
            continue;
        }
        inc_tile(&mut counts, tile);
        kept.push(Kept {
            tile,
            confidence: d.confidence,
            bbox: d.bbox,
        });
    }
    (counts, kept)
}

// class idの範囲チェックとコード表の参照
// 37~39は範囲チェックは通過するが対応する牌がないため破棄
pub fn tile_from_detection(d: &Detection) -> Option<Tile> {
    let id = d.class_id?;
    if !(0..CLASS_ID_LIMIT).contains(&id) {
        return None;
    }
    Tile::from_class_id(id as usize)
}

// 最も信頼度が高い検出結果 (同値の場合は先頭)
pub fn best_detection(dets: &[Detection]) -> Option<(Tile, f64)> {
    let mut best: Option<(Tile, f64)> = None;
    for d in dets {
        if let Some(t) = tile_from_detection(d) {
            if best.map_or(true, |(_, c)| d.confidence > c) {
                best = Some((t, d.confidence));
            }
        }
    }
    best
}

// 牌の枚数の表示用文字列
pub fn to_pretty_counts(counts: &TileTable) -> String {
    const TITLES: [&str; 3] = ["萬子", "筒子", "索子"];
    const HONORS: [&str; 7] = ["東", "南", "西", "北", "白", "發", "中"];

    let mut lines = vec![];
    for (ti, title) in TITLES.iter().enumerate() {
        let mut block = vec![];
        for ni in 1..=9 {
            let t = Tile(ti, ni);
            if ni == 5 {
                let (c, rc) = (count_tile(counts, t), counts[ti][0]);
                if c + rc > 0 {
                    block.push(format!("{}:{} (赤:{}, 合計:{})", t, c, rc, c + rc));
                }
            } else if counts[ti][ni] > 0 {
                block.push(format!("{}:{}", t, counts[ti][ni]));
            }
        }
        if !block.is_empty() {
            lines.push(format!("{}  {}", title, block.join("  ")));
        }
    }

    let block: Vec<String> = HONORS
        .iter()
        .enumerate()
        .filter(|(i, _)| counts[TZ][i + 1] > 0)
        .map(|(i, name)| format!("{}(z):{}", name, counts[TZ][i + 1]))
        .collect();
    if !block.is_empty() {
        lines.push(format!("字牌  {}", block.join("  ")));
    }

    if lines.is_empty() {
        "(カウントなし)".to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
fn det(class_id: i64, confidence: f64) -> Detection {
    Detection::new(class_id, confidence, [0, 0, 10, 10])
}

#[test]
fn test_threshold_boundary() {
    let dets = vec![det(0, 0.5), det(1, 0.500001), det(2, 0.49)];
    let (counts, kept) = counts_from_detections(&dets, 0.5);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].tile, Tile(TM, 2));
    assert_eq!(counts[TM][1], 0);
    assert_eq!(counts[TM][2], 1);

    // 閾値を変更した場合も同様
    let (_, kept) = counts_from_detections(&dets, 0.3);
    assert_eq!(kept.len(), 3);
    let (_, kept) = counts_from_detections(&dets, 0.49);
    assert_eq!(kept.len(), 2);
}

#[test]
fn test_class_id_range() {
    let mut dets: Vec<Detection> = [-1, 36, 37, 38, 39, 40].iter().map(|&i| det(i, 0.9)).collect();
    dets.push(Detection {
        class_id: None,
        confidence: 0.9,
        bbox: [0; 4],
    });
    let (counts, kept) = counts_from_detections(&dets, 0.5);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].tile, Tile(TS, 0));
    assert_eq!(counts[TS][0], 1);
    assert_eq!(counts[TS][5], 1);
}

#[test]
fn test_no_survivors_is_not_error() {
    let (counts, kept) = counts_from_detections(&[det(0, 0.1)], 0.5);
    assert!(kept.is_empty());
    assert_eq!(counts, TileTable::default());
}

#[test]
fn test_best_detection() {
    let dets = vec![det(40, 0.99), det(3, 0.8), det(5, 0.9), det(6, 0.9)];
    assert_eq!(best_detection(&dets), Some((Tile(TM, 6), 0.9)));
    assert_eq!(best_detection(&[]), None);
    assert_eq!(best_detection(&[det(38, 0.9)]), None);
}

#[test]
fn test_pretty_counts() {
    let dets = vec![det(4, 0.9), det(34, 0.9), det(4, 0.9), det(0, 0.9), det(27, 0.9), det(33, 0.9)];
    let (counts, _) = counts_from_detections(&dets, 0.5);
    assert_eq!(
        to_pretty_counts(&counts),
        "萬子  1m:1  5m:2 (赤:1, 合計:3)\n字牌  東(z):1  中(z):1"
    );
    assert_eq!(to_pretty_counts(&TileTable::default()), "(カウントなし)");
}
