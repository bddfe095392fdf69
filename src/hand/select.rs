use std::cmp::Ordering;

use super::common::{count_normal, count_tile, inc_tile};
use super::filter::Kept;
use crate::model::*;

// 信頼度の高い順に最大14枚を選択
// 同種の牌は4枚まで (赤5は通常の5と合わせて4枚まで)
// 信頼度が同じ場合は入力順を維持
pub fn select_hand_tiles(kept: &[Kept]) -> Vec<Tile> {
    let mut sorted: Vec<&Kept> = kept.iter().collect();
    sorted.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut tt = TileTable::default();
    let mut res = vec![];
    for k in sorted {
        let t = k.tile;
        if count_normal(&tt, t) >= TILE || count_tile(&tt, t) >= TILE {
            continue;
        }
        inc_tile(&mut tt, t);
        res.push(t);
        if res.len() == HAND {
            break;
        }
    }
    res
}

#[cfg(test)]
fn kept(tile: Tile, confidence: f64) -> Kept {
    Kept {
        tile,
        confidence,
        bbox: [0, 0, 10, 10],
    }
}

#[test]
fn test_select_by_confidence() {
    let ks = vec![
        kept(Tile(TM, 1), 0.6),
        kept(Tile(TM, 2), 0.9),
        kept(Tile(TM, 3), 0.7),
        kept(Tile(TM, 4), 0.7),
    ];
    let hand = select_hand_tiles(&ks);
    assert_eq!(hand, vec![Tile(TM, 2), Tile(TM, 3), Tile(TM, 4), Tile(TM, 1)]);
}

#[test]
fn test_select_stops_at_14() {
    let ks: Vec<Kept> = (0..20)
        .map(|i| kept(Tile::from_class_id(i).unwrap(), 0.99 - i as f64 * 0.01))
        .collect();
    let hand = select_hand_tiles(&ks);
    assert_eq!(hand.len(), HAND);
    assert_eq!(hand[13], Tile(TP, 5));
}

#[test]
fn test_select_quota_fifth_copy() {
    // 5枚目は信頼度に関わらず除外
    let mut ks: Vec<Kept> = (0..5).map(|i| kept(Tile(TS, 3), 0.99 - i as f64 * 0.01)).collect();
    ks.push(kept(Tile(TZ, 1), 0.6));
    let hand = select_hand_tiles(&ks);
    assert_eq!(hand, vec![Tile(TS, 3); 4].into_iter().chain([Tile(TZ, 1)]).collect::<Vec<_>>());
}

#[test]
fn test_select_quota_red5_shares_rank() {
    let ks = vec![
        kept(Tile(TP, 0), 0.99),
        kept(Tile(TP, 5), 0.98),
        kept(Tile(TP, 5), 0.97),
        kept(Tile(TP, 5), 0.96),
        kept(Tile(TP, 5), 0.95), // 赤5と合わせて5枚目
        kept(Tile(TP, 0), 0.94), // 同上
    ];
    let hand = select_hand_tiles(&ks);
    assert_eq!(hand, vec![Tile(TP, 0), Tile(TP, 5), Tile(TP, 5), Tile(TP, 5)]);
}

#[test]
fn test_select_stable_ties() {
    let ks = vec![
        kept(Tile(TZ, 7), 0.8),
        kept(Tile(TZ, 6), 0.8),
        kept(Tile(TZ, 5), 0.9),
        kept(Tile(TZ, 4), 0.8),
    ];
    let hand = select_hand_tiles(&ks);
    assert_eq!(hand, vec![Tile(TZ, 5), Tile(TZ, 7), Tile(TZ, 6), Tile(TZ, 4)]);
}
