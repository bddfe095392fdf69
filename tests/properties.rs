use mahjong_photo::error::Error;
use mahjong_photo::hand::common::max_normal_count;
use mahjong_photo::hand::*;
use mahjong_photo::hand::filter;
use mahjong_photo::model::*;
use mahjong_photo::scoring::prepare;
use proptest::prelude::*;
use rand::prelude::*;

fn kept_strategy() -> impl Strategy<Value = Vec<Kept>> {
    prop::collection::vec((0usize..37, 0.5f64..1.0, 0i32..2000), 0..40).prop_map(|v| {
        v.into_iter()
            .filter_map(|(id, confidence, x)| {
                Tile::from_class_id(id).map(|tile| Kept {
                    tile,
                    confidence,
                    bbox: [x, 0, x + 40, 60],
                })
            })
            .collect()
    })
}

fn detections_strategy() -> impl Strategy<Value = Vec<Detection>> {
    prop::collection::vec((-2i64..42, 0.0f64..1.0, 0i32..2000), 0..40).prop_map(|v| {
        v.into_iter()
            .map(|(id, c, x)| Detection::new(id, c, [x, 0, x + 40, 60]))
            .collect()
    })
}

proptest! {
    #[test]
    fn selection_respects_quota(kept in kept_strategy()) {
        let hand = select_hand_tiles(&kept);
        prop_assert!(hand.len() <= 14);
        prop_assert!(max_normal_count(&hand) <= 4);
        for t in &hand {
            prop_assert!(kept.iter().any(|k| k.tile == *t));
        }
    }

    #[test]
    fn prepared_hand_contains_winning_tile(dets in detections_strategy()) {
        let opts = RequestOptions::default();
        match prepare(&dets, None, &opts, DEFAULT_THRESHOLD, TileParsing::Combined) {
            Ok(p) => {
                prop_assert_eq!(p.hand.len(), 14);
                prop_assert!(p.hand.contains(&p.winning_tile));
                prop_assert_eq!(p.request.hand.tiles.len(), 14);
            }
            Err(Error::NoValidDetections) => {
                prop_assert!(dets.iter().all(|d| d.confidence <= DEFAULT_THRESHOLD
                    || filter::tile_from_detection(d).is_none()));
            }
            Err(Error::InsufficientTiles(n)) => prop_assert!(n < 14),
            // 和了牌の上書きで同種5枚になった場合
            Err(Error::Encoding(_)) => {}
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    #[test]
    fn prepare_is_order_independent(
        ids in prop::collection::vec(0usize..37, 14..30),
        seed in any::<u64>(),
    ) {
        // 信頼度とx2はすべて異なる値
        let mut dets: Vec<Detection> = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let x = i as i32 * 50;
                Detection::new(id as i64, 0.6 + i as f64 * 0.01, [x, 0, x + 40, 60])
            })
            .collect();
        let opts = RequestOptions::default();
        let expected = prepare(&dets, None, &opts, DEFAULT_THRESHOLD, TileParsing::Combined);

        dets.shuffle(&mut StdRng::seed_from_u64(seed));
        let actual = prepare(&dets, None, &opts, DEFAULT_THRESHOLD, TileParsing::Combined);
        match (expected, actual) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.request, b.request);
                prop_assert_eq!(a.transcript, b.transcript);
            }
            (Err(a), Err(b)) => prop_assert_eq!(a.kind(), b.kind()),
            _ => prop_assert!(false, "result changed after shuffle"),
        }
    }
}
