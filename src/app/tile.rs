use std::path::Path;

use serde::Serialize;

use crate::detector::{Detector, JsonDetector};
use crate::error::{Error, Res};
use crate::hand::best_detection;
use crate::model::*;
use crate::util::misc::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileRecognition {
    pub tile: String, // 認識できない場合は "unknown"
    pub confidence: f64,
}

impl TileRecognition {
    pub fn from_detections(dets: &[Detection]) -> Self {
        match best_detection(dets) {
            Some((t, c)) => Self {
                tile: t.to_string(),
                confidence: c,
            },
            None => Self {
                tile: "unknown".to_string(),
                confidence: 0.0,
            },
        }
    }
}

// 牌1枚の認識モード
// 検出結果のうち最も信頼度が高いものを出力
#[derive(Debug)]
pub struct TileApp {
    args: Vec<String>,
}

impl TileApp {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    pub fn run(&mut self) -> Res {
        let mut file_path = "".to_string();
        let mut it = self.args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-f" => file_path = next_value(&mut it, s)?,
                _ => return Err(Error::InvalidInput(format!("unknown option: {}", s))),
            }
        }
        if file_path.is_empty() {
            println!("usage: T -f JSON");
            return Err(Error::InvalidInput("-f is required".to_string()));
        }

        let dets = JsonDetector::new().detect(Path::new(&file_path))?;
        let res = TileRecognition::from_detections(&dets);
        println!("{}", serde_json::to_string(&res)?);
        Ok(())
    }
}

#[test]
fn test_tile_recognition() {
    let dets = vec![
        Detection::new(3, 0.7, [0; 4]),
        Detection::new(35, 0.93, [0; 4]),
        Detection::new(40, 0.99, [0; 4]),
        Detection::new(7, 0.93, [0; 4]),
    ];
    let res = TileRecognition::from_detections(&dets);
    assert_eq!(res.tile, "0p");
    assert_eq!(res.confidence, 0.93);

    let res = TileRecognition::from_detections(&[]);
    assert_eq!(res.tile, "unknown");
    assert_eq!(res.confidence, 0.0);
    assert_eq!(
        serde_json::to_string(&res).unwrap(),
        r#"{"tile":"unknown","confidence":0.0}"#
    );
}
