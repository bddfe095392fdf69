use tracing::debug;

use super::filter::tile_from_detection;
use crate::model::*;

// ドラ表示牌の検出結果を牌に変換
// 閾値は固定, 赤5の変換・重複除去・枚数制限は行わない
// 有効な検出がない場合は空 (エラーではない)
pub fn dora_indicators_from_detections(dets: &[Detection]) -> Vec<Tile> {
    let mut res = vec![];
    for d in dets {
        if d.confidence <= DORA_THRESHOLD {
            continue;
        }
        match tile_from_detection(d) {
            Some(t) => res.push(t),
            None => debug!("dora detection discarded: class id {:?}", d.class_id),
        }
    }
    res
}

#[test]
fn test_dora_threshold_boundary() {
    let dets = vec![Detection::new(0, 0.5, [0; 4])];
    assert!(dora_indicators_from_detections(&dets).is_empty());

    let dets = vec![
        Detection::new(0, 0.5, [0; 4]),
        Detection::new(27, 0.51, [0; 4]),
    ];
    assert_eq!(dora_indicators_from_detections(&dets), vec![Tile(TZ, 1)]);
}

#[test]
fn test_dora_keeps_red5_and_duplicates() {
    let dets: Vec<Detection> = [35, 35, 13, 35, 35, 35]
        .iter()
        .map(|&i| Detection::new(i, 0.9, [0; 4]))
        .collect();
    let dora = dora_indicators_from_detections(&dets);
    assert_eq!(dora.len(), 6);
    assert_eq!(dora[0], Tile(TP, 0));
    assert_eq!(dora[2], Tile(TP, 5));
}

#[test]
fn test_dora_class_id_range() {
    let mut dets: Vec<Detection> = [37, 38, 39, 40, -1]
        .iter()
        .map(|&i| Detection::new(i, 0.9, [0; 4]))
        .collect();
    dets.push(Detection {
        class_id: None,
        confidence: 0.9,
        bbox: [0; 4],
    });
    assert!(dora_indicators_from_detections(&dets).is_empty());
}
