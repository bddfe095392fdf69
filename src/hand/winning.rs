use tracing::warn;

use super::filter::Kept;
use crate::model::*;

// 和了牌の推定
// 和了牌は手牌の右側に置かれるという前提で, bboxの右端(x2)が最大の牌を採用する (同値の場合は先頭)
// 牌の意味的な判定ではない
pub fn resolve_winning_tile(kept: &[Kept]) -> Option<Tile> {
    let mut best: Option<&Kept> = None;
    for k in kept {
        if best.map_or(true, |b| k.x2() > b.x2()) {
            best = Some(k);
        }
    }
    best.map(|k| k.tile)
}

// 和了牌が手牌に含まれていない場合は手牌の最後の牌を和了牌で上書きする
// 上書きされる牌の枚数管理は考慮しないため, 同種5枚以上の手牌になる場合がある
// 上書きした場合はtrueを返却
pub fn force_winning_tile(hand: &mut [Tile], winning_tile: Tile) -> bool {
    if hand.contains(&winning_tile) {
        return false;
    }
    if let Some(last) = hand.last_mut() {
        warn!("winning tile {} not in hand: replace {}", winning_tile, last);
        *last = winning_tile;
        return true;
    }
    false
}

#[cfg(test)]
fn kept(tile: Tile, x2: i32) -> Kept {
    Kept {
        tile,
        confidence: 0.9,
        bbox: [x2 - 10, 0, x2, 20],
    }
}

#[test]
fn test_resolve_rightmost() {
    let ks = vec![
        kept(Tile(TM, 1), 100),
        kept(Tile(TZ, 3), 420),
        kept(Tile(TP, 9), 300),
    ];
    assert_eq!(resolve_winning_tile(&ks), Some(Tile(TZ, 3)));
    assert_eq!(resolve_winning_tile(&[]), None);
}

#[test]
fn test_resolve_tie_takes_first() {
    let ks = vec![kept(Tile(TS, 4), 500), kept(Tile(TS, 6), 500), kept(Tile(TS, 1), 10)];
    assert_eq!(resolve_winning_tile(&ks), Some(Tile(TS, 4)));
}

#[test]
fn test_force_winning_tile_member() {
    let mut hand = vec![Tile(TM, 1), Tile(TM, 2), Tile(TM, 3)];
    assert!(!force_winning_tile(&mut hand, Tile(TM, 2)));
    assert_eq!(hand, vec![Tile(TM, 1), Tile(TM, 2), Tile(TM, 3)]);
}

#[test]
fn test_force_winning_tile_red5_is_distinct() {
    // 赤5と通常の5は別の牌として所属判定する
    let mut hand = vec![Tile(TM, 1), Tile(TM, 5), Tile(TM, 9)];
    assert!(force_winning_tile(&mut hand, Tile(TM, 0)));
    assert_eq!(hand, vec![Tile(TM, 1), Tile(TM, 5), Tile(TM, 0)]);
}

#[test]
fn test_force_winning_tile_can_break_quota() {
    use super::common::max_normal_count;

    // 上書き前は各牌4枚以下だが, 上書き後は5枚目が入り得る (既知の挙動)
    let mut hand = vec![Tile(TP, 5), Tile(TP, 5), Tile(TP, 5), Tile(TP, 5), Tile(TZ, 1)];
    assert_eq!(max_normal_count(&hand), 4);
    assert!(force_winning_tile(&mut hand, Tile(TP, 0)));
    assert_eq!(hand[4], Tile(TP, 0));
    assert_eq!(max_normal_count(&hand), 5);
}
