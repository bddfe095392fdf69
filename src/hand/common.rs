use crate::model::*;

// 牌の枚数 (赤5と通常の5は区別する)
pub fn count_tile(tt: &TileTable, t: Tile) -> usize {
    if t.1 == 5 {
        tt[t.0][t.1] - tt[t.0][0]
    } else {
        tt[t.0][t.1]
    }
}

// 牌の枚数 (赤5は通常の5として数える)
#[inline]
pub fn count_normal(tt: &TileTable, t: Tile) -> usize {
    let t = t.to_normal();
    tt[t.0][t.1]
}

pub fn inc_tile(tt: &mut TileTable, tile: Tile) {
    let t = tile;
    tt[t.0][t.1] += 1;
    if t.1 == 0 {
        // 0は赤5のフラグなので本来の5をたてる
        tt[t.0][5] += 1;
    }
}

pub fn tiles_to_tile_table(tiles: &[Tile]) -> TileTable {
    let mut tt = TileTable::default();
    for &t in tiles {
        inc_tile(&mut tt, t);
    }
    tt
}

// 牌種ごとの枚数の最大値 (赤5は通常の5として数える)
pub fn max_normal_count(tiles: &[Tile]) -> usize {
    let tt = tiles_to_tile_table(tiles);
    tiles.iter().map(|&t| count_normal(&tt, t)).max().unwrap_or(0)
}

#[test]
fn test_tile_table_red5() {
    let tt = tiles_to_tile_table(&[Tile(TM, 5), Tile(TM, 0), Tile(TM, 0), Tile(TP, 5)]);
    assert_eq!(count_tile(&tt, Tile(TM, 5)), 1);
    assert_eq!(count_tile(&tt, Tile(TM, 0)), 2);
    assert_eq!(count_normal(&tt, Tile(TM, 0)), 3);
    assert_eq!(count_normal(&tt, Tile(TM, 5)), 3);
    assert_eq!(count_normal(&tt, Tile(TP, 0)), 1);
    assert_eq!(count_tile(&tt, Tile(TS, 5)), 0);
}

#[test]
fn test_max_normal_count() {
    assert_eq!(max_normal_count(&[]), 0);
    let tiles = [Tile(TS, 0), Tile(TS, 5), Tile(TS, 5), Tile(TZ, 1)];
    assert_eq!(max_normal_count(&tiles), 3);
}
