use std::path::Path;

use serde_json::{json, Value};
use tracing::info;

use crate::detector::{Detector, JsonDetector};
use crate::error::{Error, Res};
use crate::hand::TileParsing;
use crate::model::*;
use crate::scoring::{calculate, prepare, CommandEngine, EngineCapabilities};
use crate::util::misc::*;

// 検出結果のJSONから点数を計算するモード
// 点数計算エンジン(-e)が指定されていない場合は, エンジンへの入力を出力して終了
#[derive(Debug)]
pub struct CalculatorApp {
    args: Vec<String>,
    hand_path: String,
    dora_path: String,
    options_path: String,
    threshold: f64,
    riichi: bool,
    ron: bool,
    round_wind: Option<String>,
    seat_wind: Option<String>,
    engine: Vec<String>,
    capabilities: EngineCapabilities,
    pretty: bool,
}

impl CalculatorApp {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            hand_path: "".to_string(),
            dora_path: "".to_string(),
            options_path: "".to_string(),
            threshold: DEFAULT_THRESHOLD,
            riichi: false,
            ron: false,
            round_wind: None,
            seat_wind: None,
            engine: vec![],
            capabilities: EngineCapabilities::default(),
            pretty: false,
        }
    }

    pub fn run(&mut self) -> Res {
        self.parse_args()?;
        let v = self.process()?;
        let s = if self.pretty {
            serde_json::to_string_pretty(&v)?
        } else {
            serde_json::to_string(&v)?
        };
        println!("{}", s);
        Ok(())
    }

    fn parse_args(&mut self) -> Res {
        let args = self.args.clone();
        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-f" => self.hand_path = next_value(&mut it, s)?,
                "-d" => self.dora_path = next_value(&mut it, s)?,
                "-o" => self.options_path = next_value(&mut it, s)?,
                "-t" => self.threshold = next_value(&mut it, s)?,
                "-r" => self.riichi = true,
                "-ron" => self.ron = true,
                "-w-round" => self.round_wind = Some(next_value(&mut it, s)?),
                "-w-seat" => self.seat_wind = Some(next_value(&mut it, s)?),
                "-e" => {
                    let cmd: String = next_value(&mut it, s)?;
                    self.engine = cmd.split_whitespace().map(|a| a.to_string()).collect();
                }
                "-c" => {
                    let caps: String = next_value(&mut it, s)?;
                    self.capabilities = serde_json::from_str(&caps)?;
                }
                "-p" => self.pretty = true,
                _ => return Err(Error::InvalidInput(format!("unknown option: {}", s))),
            }
        }

        if self.hand_path.is_empty() {
            print_usage();
            return Err(Error::InvalidInput("-f is required".to_string()));
        }
        if !self.threshold.is_finite() || !(0.0..1.0).contains(&self.threshold) {
            return Err(Error::InvalidInput(format!(
                "threshold out of range: {}",
                self.threshold
            )));
        }
        Ok(())
    }

    // ファイルのオプションをコマンドライン引数で上書き
    fn request_options(&self) -> Res<RequestOptions> {
        let mut opts = if self.options_path.is_empty() {
            RequestOptions::default()
        } else {
            serde_json::from_str(&read_file(&self.options_path)?)?
        };
        if self.riichi {
            opts.riichi = true;
        }
        if self.ron {
            opts.win_type = WinType::Ron;
        }
        if let Some(w) = &self.round_wind {
            opts.round_wind = w.clone();
        }
        if let Some(w) = &self.seat_wind {
            opts.player_wind = w.clone();
        }
        Ok(opts)
    }

    fn process(&self) -> Res<Value> {
        let detector = JsonDetector::new();
        let hand = detector.detect(Path::new(&self.hand_path))?;
        let dora = if self.dora_path.is_empty() {
            None
        } else {
            Some(detector.detect(Path::new(&self.dora_path))?)
        };
        let opts = self.request_options()?;
        info!(
            "hand: {} detections, dora: {} detections",
            hand.len(),
            dora.as_ref().map_or(0, |d| d.len())
        );

        if self.engine.is_empty() {
            return self.dry_run(&hand, dora.as_deref(), &opts);
        }

        let engine = CommandEngine::new(
            &self.engine[0],
            self.engine[1..].to_vec(),
            self.capabilities,
        );
        let res = calculate(&engine, &hand, dora.as_deref(), &opts, self.threshold)?;
        Ok(serde_json::to_value(&res)?)
    }

    fn dry_run(
        &self,
        hand: &[Detection],
        dora: Option<&[Detection]>,
        opts: &RequestOptions,
    ) -> Res<Value> {
        let parsing: TileParsing = self.capabilities.tile_parsing;
        let p = prepare(hand, dora, opts, self.threshold, parsing)?;
        Ok(json!({
            "request": p.request,
            "recognizedHandTiles": hand.len(),
            "recognizedDoraTiles": dora.map_or(0, |d| d.len()),
            "rawOutput": p.transcript.join("\n"),
        }))
    }
}

fn print_usage() {
    println!("usage: C -f HAND_JSON [-d DORA_JSON] [-o OPTIONS_JSON] [-t THRESHOLD]");
    println!("         [-r] [-ron] [-w-round WIND] [-w-seat WIND]");
    println!("         [-e PROGRAM] [-c CAPABILITIES_JSON] [-p]");
}

#[cfg(test)]
fn fixture(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[cfg(test)]
fn app(args: &[&str]) -> CalculatorApp {
    let mut app = CalculatorApp::new(args.iter().map(|s| s.to_string()).collect());
    app.parse_args().unwrap();
    app
}

#[test]
fn test_calculator_args() {
    let app = app(&[
        "-f", "hand.json", "-t", "0.6", "-r", "-ron", "-w-round", "south", "-w-seat", "西",
        "-c", r#"{"hanFields": "perContext"}"#, "-p",
    ]);
    assert_eq!(app.threshold, 0.6);
    assert!(app.pretty);
    let opts = app.request_options().unwrap();
    assert!(opts.riichi);
    assert_eq!(opts.win_type, WinType::Ron);
    assert_eq!(opts.round_wind, "south");
    assert_eq!(opts.player_wind, "西");
    assert_eq!(
        app.capabilities.han_fields,
        crate::scoring::HanFields::PerContext
    );

    let mut a = CalculatorApp::new(vec!["-x".to_string()]);
    assert!(a.parse_args().is_err());
    let mut a = CalculatorApp::new(vec!["-t".to_string(), "1.5".to_string()]);
    assert!(a.parse_args().is_err());
    let mut a = CalculatorApp::new(vec!["-f".to_string()]);
    assert!(a.parse_args().is_err());
}

#[test]
fn test_calculator_options_file() {
    let hand = fixture("hand_fourteen.json");
    let opts = fixture("options_ron.json");
    let app = app(&["-f", &hand, "-o", &opts, "-w-seat", "east"]);
    let opts = app.request_options().unwrap();
    assert!(opts.riichi);
    assert_eq!(opts.win_type, WinType::Ron);
    assert_eq!(opts.round_wind, "南");
    assert_eq!(opts.player_wind, "east");
}

#[test]
fn test_calculator_dry_run() {
    let hand = fixture("hand_fourteen.json");
    let dora = fixture("dora.json");
    let v = app(&["-f", &hand, "-d", &dora]).process().unwrap();
    assert_eq!(v["request"]["hand"]["hand"], "123456789m12345p");
    assert_eq!(v["request"]["hand"]["winningTile"], "5p");
    // 信頼度0.5の表示牌は除外
    assert_eq!(v["request"]["dora"]["indicators"], "0m");
    assert_eq!(v["recognizedHandTiles"], 14);
    assert_eq!(v["recognizedDoraTiles"], 2);
}

#[test]
fn test_calculator_fixture_errors() {
    let hand = fixture("hand_thirteen.json");
    let e = app(&["-f", &hand]).process().unwrap_err();
    assert!(matches!(e, Error::InsufficientTiles(13)));

    let hand = fixture("hand_low_confidence.json");
    let e = app(&["-f", &hand]).process().unwrap_err();
    assert!(matches!(e, Error::NoValidDetections));

    // 閾値を下げると全て有効
    let v = app(&["-f", &hand, "-t", "0.2"]).process().unwrap();
    assert_eq!(v["request"]["hand"]["hand"], "123456789m12345p");
}

#[cfg(unix)]
#[test]
fn test_calculator_with_engine() {
    let hand = fixture("hand_fourteen.json");
    let engine = fixture("engine.sh");
    let v = app(&["-f", &hand, "-e", &format!("sh {}", engine)])
        .process()
        .unwrap();
    assert_eq!(v["han"], 2);
    assert_eq!(v["fu"], 30);
    assert_eq!(v["cost"]["main"], 2000);
    assert_eq!(v["yaku"][0], "門前清自摸和 (1翻)");
    assert_eq!(v["yaku"][1], "ドラ 1 (1翻)");
    assert_eq!(v["recognizedHandTiles"], 14);
}
