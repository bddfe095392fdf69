use crate::model::*;

// リクエストのオプションから点数計算の設定を組み立てる
// 手牌は常に門前として扱い, 特殊条件役(一発, 海底, ...)は常に無効
pub fn build_scoring_config(opts: &RequestOptions) -> ScoringConfig {
    let seat_wind = Wind::from_str_or_east(&opts.player_wind);
    let round_wind = Wind::from_str_or_east(&opts.round_wind);
    ScoringConfig {
        riichi: opts.riichi,
        is_tsumo: opts.win_type != WinType::Ron,
        is_closed: true,
        seat_wind,
        round_wind,
        is_dealer: seat_wind == Wind::East,
        rules: RULE_TOGGLES,
        situations: SituationFlags::default(),
    }
}

#[test]
fn test_build_scoring_config() {
    let opts = RequestOptions {
        riichi: true,
        win_type: WinType::Ron,
        round_wind: "south".to_string(),
        player_wind: "西".to_string(),
    };
    let cfg = build_scoring_config(&opts);
    assert!(cfg.riichi);
    assert!(!cfg.is_tsumo);
    assert!(cfg.is_closed);
    assert_eq!(cfg.round_wind, Wind::South);
    assert_eq!(cfg.seat_wind, Wind::West);
    assert!(!cfg.is_dealer);
    assert_eq!(cfg.situations, SituationFlags::default());
    assert!(cfg.rules.open_tanyao && cfg.rules.aka_dora);
    assert!(cfg.rules.double_yakuman && cfg.rules.kazoe_limit);
}

#[test]
fn test_dealer_and_default_wind() {
    let cfg = build_scoring_config(&RequestOptions::default());
    assert!(cfg.is_tsumo);
    assert!(cfg.is_dealer);
    assert_eq!(cfg.round_wind, Wind::East);

    for (s, w) in [("E", Wind::East), ("North", Wind::North), ("南", Wind::South), ("??", Wind::East), ("", Wind::East)] {
        let opts = RequestOptions {
            player_wind: s.to_string(),
            ..Default::default()
        };
        let cfg = build_scoring_config(&opts);
        assert_eq!(cfg.seat_wind, w, "{}", s);
        assert_eq!(cfg.is_dealer, w == Wind::East);
    }
}

#[test]
fn test_request_options_json() {
    let opts: RequestOptions =
        serde_json::from_str(r#"{"riichi": true, "winType": "ron", "roundWind": "南"}"#).unwrap();
    assert!(opts.riichi);
    assert_eq!(opts.win_type, WinType::Ron);
    assert_eq!(opts.round_wind, "南");
    assert_eq!(opts.player_wind, "東");

    let opts: RequestOptions = serde_json::from_str(r#"{"winType": "draw"}"#).unwrap();
    assert_eq!(opts.win_type, WinType::Tsumo);

    let opts: RequestOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(opts, RequestOptions::default());
}
