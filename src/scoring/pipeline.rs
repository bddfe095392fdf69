use tracing::{debug, error, info};

use super::config::build_scoring_config;
use super::engine::*;
use super::normalize::normalize_score;
use crate::error::{Error, Res};
use crate::hand::*;
use crate::model::*;

// 点数計算エンジンに渡す直前の状態
#[derive(Debug, Clone)]
pub struct Prepared {
    pub request: ScoringRequest,
    pub hand: Vec<Tile>,
    pub winning_tile: Tile,
    pub forced: bool, // 和了牌で最後の牌を上書きしたかどうか
    pub dora: Vec<Tile>,
    pub transcript: Vec<String>,
}

// 検出結果からエンジンへの入力を組み立てる
// 14枚揃わない場合はエンジンを呼び出す前にエラー
pub fn prepare(
    hand_dets: &[Detection],
    dora_dets: Option<&[Detection]>,
    opts: &RequestOptions,
    threshold: f64,
    parsing: TileParsing,
) -> Res<Prepared> {
    let mut transcript = vec![];

    let (counts, kept) = counts_from_detections(hand_dets, threshold);
    transcript.push(format!("[手牌の枚数]\n{}", to_pretty_counts(&counts)));
    if kept.is_empty() {
        return Err(Error::NoValidDetections);
    }

    // 和了牌は選択前の検出結果から決定
    let winning_tile = resolve_winning_tile(&kept).ok_or(Error::NoValidDetections)?;
    transcript.push(format!("和了牌(自動判定): {}", winning_tile));

    let mut hand = select_hand_tiles(&kept);
    debug!("selected {} tiles: {:?}", hand.len(), hand);
    if hand.len() < HAND {
        return Err(Error::InsufficientTiles(hand.len()));
    }
    let forced = force_winning_tile(&mut hand, winning_tile);

    let encoded = encode_hand(&hand, winning_tile, parsing)?;
    transcript.push(format!("手牌: {}", encoded.hand));
    transcript.push(format!("和了牌: {}", encoded.winning_tile));

    let dora = dora_dets.map(dora_indicators_from_detections).unwrap_or_default();
    let encoded_dora = encode_dora(&dora, parsing)?;
    if encoded_dora.indicators.is_empty() {
        transcript.push("ドラ表示牌: なし".to_string());
    } else {
        transcript.push(format!("ドラ表示牌: {}", encoded_dora.indicators));
    }

    let config = build_scoring_config(opts);
    transcript.push(format!(
        "立直: {}, {}, 場風: {}, 自風: {}",
        config.riichi,
        if config.is_tsumo { "ツモ" } else { "ロン" },
        config.round_wind,
        config.seat_wind,
    ));

    Ok(Prepared {
        request: ScoringRequest {
            hand: encoded,
            dora: encoded_dora,
            config,
        },
        hand,
        winning_tile,
        forced,
        dora,
        transcript,
    })
}

// 写真1枚分の点数計算
// エンジンの失敗は再試行せずにエラーとして返却
pub fn calculate(
    engine: &dyn ScoringEngine,
    hand_dets: &[Detection],
    dora_dets: Option<&[Detection]>,
    opts: &RequestOptions,
    threshold: f64,
) -> Res<ApiResponse> {
    let caps = engine.capabilities();
    let mut prepared = prepare(hand_dets, dora_dets, opts, threshold, caps.tile_parsing)?;

    let raw = match engine.estimate(&prepared.request) {
        Ok(raw) => raw,
        Err(e) => {
            error!("scoring engine failed: {}", e);
            return Err(Error::ScoringEngine(e.to_string()));
        }
    };
    let result = normalize_score(&raw, caps.han_fields);
    let yaku: Vec<String> = result.yaku.iter().map(|y| y.to_string()).collect();
    info!(
        "{} => {}翻 {}符 {:?}",
        prepared.request.hand.hand, result.han, result.fu, yaku
    );

    let t = &mut prepared.transcript;
    t.push(format!("翻: {}, 符: {}", result.han, result.fu));
    match &result.cost {
        Some(c) => t.push(format!("点数: {}", c)),
        None => t.push("点数: なし".to_string()),
    }
    if yaku.is_empty() {
        t.push("役: なし".to_string());
    } else {
        t.push(format!("役: {}", yaku.join(", ")));
    }

    Ok(ApiResponse {
        han: result.han,
        fu: result.fu,
        cost: result.cost,
        yaku,
        recognized_hand_tiles: hand_dets.len(),
        recognized_dora_tiles: dora_dets.map_or(0, |d| d.len()),
        raw_output: prepared.transcript.join("\n"),
    })
}

#[cfg(test)]
struct MockEngine {
    capabilities: EngineCapabilities,
    result: Result<RawScore, String>,
    calls: std::cell::Cell<usize>,
    last: std::cell::RefCell<Option<ScoringRequest>>,
}

#[cfg(test)]
impl MockEngine {
    fn new(result: Result<RawScore, String>) -> Self {
        Self {
            capabilities: EngineCapabilities::default(),
            result,
            calls: std::cell::Cell::new(0),
            last: std::cell::RefCell::new(None),
        }
    }
}

#[cfg(test)]
impl ScoringEngine for MockEngine {
    fn capabilities(&self) -> EngineCapabilities {
        self.capabilities
    }

    fn estimate(&self, request: &ScoringRequest) -> Result<RawScore, EngineError> {
        self.calls.set(self.calls.get() + 1);
        *self.last.borrow_mut() = Some(request.clone());
        self.result.clone().map_err(EngineError::Rejected)
    }
}

// class id の列から x2 が左から順に並ぶ検出結果を作成
#[cfg(test)]
fn detections(ids: &[i64], confidence: f64) -> Vec<Detection> {
    ids.iter()
        .enumerate()
        .map(|(i, &id)| {
            let x = i as i32 * 50;
            Detection::new(id, confidence, [x, 0, x + 40, 60])
        })
        .collect()
}

#[cfg(test)]
fn tanyao() -> RawScore {
    RawScore {
        han: 1,
        fu: 30,
        cost: Some(serde_json::json!({"main": 1000, "additional": 500})),
        yaku: vec![RawYaku::new("Tanyao", Some(1))],
    }
}

#[test]
fn test_calculate_fourteen_distinct() {
    // 1m~9m, 1p~5p
    let ids: Vec<i64> = (0..14).collect();
    let dets = detections(&ids, 0.9);
    let engine = MockEngine::new(Ok(tanyao()));
    let res = calculate(&engine, &dets, None, &RequestOptions::default(), DEFAULT_THRESHOLD)
        .unwrap();

    assert_eq!(engine.calls.get(), 1);
    let req = engine.last.borrow().clone().unwrap();
    assert_eq!(req.hand.hand, "123456789m12345p");
    assert_eq!(req.hand.winning_tile, "5p");
    assert_eq!(req.hand.tiles.len(), HAND);
    assert_eq!(req.dora.indicators, "");

    assert_eq!(res.han, 1);
    assert_eq!(res.fu, 30);
    assert_eq!(
        res.cost,
        Some(Cost::Split {
            main: 1000,
            additional: 500
        })
    );
    assert_eq!(res.yaku, vec!["断幺九 (1翻)"]);
    assert_eq!(res.recognized_hand_tiles, 14);
    assert_eq!(res.recognized_dora_tiles, 0);
    assert!(res.raw_output.contains("和了牌(自動判定): 5p"));
    assert!(res.raw_output.contains("手牌: 123456789m12345p"));
}

#[test]
fn test_calculate_no_valid_detections() {
    let engine = MockEngine::new(Ok(tanyao()));
    let opts = RequestOptions::default();

    let dets = detections(&[0, 1, 2], 0.5);
    let e = calculate(&engine, &dets, None, &opts, DEFAULT_THRESHOLD).unwrap_err();
    assert!(matches!(e, Error::NoValidDetections));

    let e = calculate(&engine, &[], None, &opts, DEFAULT_THRESHOLD).unwrap_err();
    assert!(matches!(e, Error::NoValidDetections));
    assert_eq!(engine.calls.get(), 0);
}

#[test]
fn test_calculate_dora_threshold() {
    let ids: Vec<i64> = (0..14).collect();
    let dets = detections(&ids, 0.9);
    let engine = MockEngine::new(Ok(tanyao()));
    let opts = RequestOptions::default();

    let dora = vec![Detection::new(5, 0.5, [0, 0, 10, 10])];
    let res = calculate(&engine, &dets, Some(&dora[..]), &opts, DEFAULT_THRESHOLD).unwrap();
    assert_eq!(engine.last.borrow().as_ref().unwrap().dora.indicators, "");
    assert!(engine.last.borrow().as_ref().unwrap().dora.tiles.is_empty());
    assert_eq!(res.recognized_dora_tiles, 1);

    let dora = vec![
        Detection::new(5, 0.5, [0, 0, 10, 10]),
        Detection::new(35, 0.51, [0, 0, 10, 10]),
    ];
    calculate(&engine, &dets, Some(&dora[..]), &opts, DEFAULT_THRESHOLD).unwrap();
    assert_eq!(engine.last.borrow().as_ref().unwrap().dora.indicators, "0p");
}

#[test]
fn test_calculate_insufficient_tiles() {
    let ids: Vec<i64> = (0..13).collect();
    let dets = detections(&ids, 0.9);
    let engine = MockEngine::new(Ok(tanyao()));
    let e = calculate(&engine, &dets, None, &RequestOptions::default(), DEFAULT_THRESHOLD)
        .unwrap_err();
    assert!(matches!(e, Error::InsufficientTiles(13)));
    assert_eq!(e.kind(), "insufficient_tiles");
    assert_eq!(engine.calls.get(), 0);

    // 5枚目の1mは除外されるため13枚
    let mut ids = vec![0, 0, 0, 0, 0];
    ids.extend(9..18);
    let dets = detections(&ids[..14], 0.9);
    let e = calculate(&engine, &dets, None, &RequestOptions::default(), DEFAULT_THRESHOLD)
        .unwrap_err();
    assert!(matches!(e, Error::InsufficientTiles(13)));
}

#[test]
fn test_calculate_engine_failure() {
    let ids: Vec<i64> = (0..14).collect();
    let dets = detections(&ids, 0.9);
    let engine = MockEngine::new(Err("hand_not_winning".to_string()));
    let e = calculate(&engine, &dets, None, &RequestOptions::default(), DEFAULT_THRESHOLD)
        .unwrap_err();
    assert!(matches!(e, Error::ScoringEngine(_)));
    assert_eq!(e.kind(), "scoring_engine_failure");
    assert_eq!(engine.calls.get(), 1);
}

#[test]
fn test_calculate_no_yaku_is_success() {
    let ids: Vec<i64> = (0..14).collect();
    let dets = detections(&ids, 0.9);
    let engine = MockEngine::new(Ok(RawScore {
        han: 0,
        fu: 0,
        cost: None,
        yaku: vec![],
    }));
    let res = calculate(&engine, &dets, None, &RequestOptions::default(), DEFAULT_THRESHOLD)
        .unwrap();
    assert_eq!(res.han, 0);
    assert_eq!(res.cost, None);
    assert!(res.yaku.is_empty());
    assert!(res.raw_output.contains("役: なし"));
}

#[test]
fn test_prepare_winning_tile_outside_selection() {
    // 信頼度の低い9sが一番右にあり, 選択から漏れる
    let mut dets = detections(&(0..14).collect::<Vec<i64>>(), 0.9);
    dets.push(Detection::new(26, 0.6, [2000, 0, 2040, 60]));
    let p = prepare(
        &dets,
        None,
        &RequestOptions::default(),
        DEFAULT_THRESHOLD,
        TileParsing::Combined,
    )
    .unwrap();
    assert_eq!(p.winning_tile, Tile(TS, 9));
    assert!(p.forced);
    assert_eq!(p.hand.len(), HAND);
    assert_eq!(p.hand[HAND - 1], Tile(TS, 9));
    assert_eq!(p.request.hand.hand, "123456789m1234p9s");
    assert_eq!(p.request.hand.winning_tile, "9s");
}

#[test]
fn test_prepare_forced_overwrite_breaks_quota() {
    // 5p x4 の手牌で右端の赤5pが和了牌になると, 上書きで同種5枚になり変換に失敗する
    let mut dets = detections(&[13, 13, 13, 13, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9], 0.9);
    dets.push(Detection::new(35, 0.6, [3000, 0, 3040, 60]));
    let opts = RequestOptions::default();
    let e = prepare(&dets, None, &opts, DEFAULT_THRESHOLD, TileParsing::Combined).unwrap_err();
    assert!(matches!(e, Error::Encoding(_)));

    let engine = MockEngine::new(Ok(tanyao()));
    let e = calculate(&engine, &dets, None, &opts, DEFAULT_THRESHOLD).unwrap_err();
    assert_eq!(e.kind(), "encoding_failure");
    assert_eq!(engine.calls.get(), 0);
}

#[test]
fn test_prepare_winning_tile_in_hand() {
    let mut dets = detections(&(0..14).collect::<Vec<i64>>(), 0.9);
    // 右端の1mは手牌に含まれるため上書きしない
    dets.push(Detection::new(0, 0.6, [3000, 0, 3040, 60]));
    let p = prepare(
        &dets,
        None,
        &RequestOptions::default(),
        DEFAULT_THRESHOLD,
        TileParsing::Combined,
    )
    .unwrap();
    assert!(!p.forced);
    assert_eq!(p.winning_tile, Tile(TM, 1));
    assert_eq!(p.request.hand.hand, "123456789m12345p");
    assert_eq!(p.request.hand.winning_tile, "1m");
}

#[test]
fn test_calculate_options() {
    let ids: Vec<i64> = (0..14).collect();
    let dets = detections(&ids, 0.9);
    let engine = MockEngine::new(Ok(tanyao()));
    let opts = RequestOptions {
        riichi: true,
        win_type: WinType::Ron,
        round_wind: "south".to_string(),
        player_wind: "north".to_string(),
    };
    calculate(&engine, &dets, None, &opts, DEFAULT_THRESHOLD).unwrap();
    let req = engine.last.borrow().clone().unwrap();
    assert!(req.config.riichi);
    assert!(!req.config.is_tsumo);
    assert!(!req.config.is_dealer);
    assert_eq!(req.config.round_wind, Wind::South);
    assert_eq!(req.config.seat_wind, Wind::North);
}

#[test]
fn test_calculate_suit_buckets_engine() {
    let ids: Vec<i64> = (0..14).collect();
    let dets = detections(&ids, 0.9);
    let mut combined = MockEngine::new(Ok(tanyao()));
    combined.capabilities.tile_parsing = TileParsing::Combined;
    let mut buckets = MockEngine::new(Ok(tanyao()));
    buckets.capabilities.tile_parsing = TileParsing::SuitBuckets;

    let opts = RequestOptions::default();
    calculate(&combined, &dets, None, &opts, DEFAULT_THRESHOLD).unwrap();
    calculate(&buckets, &dets, None, &opts, DEFAULT_THRESHOLD).unwrap();
    assert_eq!(*combined.last.borrow(), *buckets.last.borrow());
}

#[test]
fn test_calculate_deterministic_under_shuffle() {
    use rand::prelude::*;

    // 信頼度がすべて異なる15枚 (和了牌はx2で決まるため入力順に依存しない)
    let mut dets: Vec<Detection> = (0..15)
        .map(|i| {
            let x = i as i32 * 50;
            Detection::new(i, 0.6 + i as f64 * 0.02, [x, 0, x + 40, 60])
        })
        .collect();
    let engine = MockEngine::new(Ok(tanyao()));
    let opts = RequestOptions::default();
    let expected = calculate(&engine, &dets, None, &opts, DEFAULT_THRESHOLD).unwrap();
    let expected_req = engine.last.borrow().clone();

    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..20 {
        dets.shuffle(&mut rng);
        let res = calculate(&engine, &dets, None, &opts, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(res.han, expected.han);
        assert_eq!(*engine.last.borrow(), expected_req);
    }
}
