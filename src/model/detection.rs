use serde_json::{Map, Value};

use super::*;

const CLASS_ID_KEYS: [&str; 4] = ["class", "class_id", "cls", "category_id"];
const CONFIDENCE_KEYS: [&str; 3] = ["confidence", "conf", "score"];

// 検出器の出力1件 (検証前)
// 入力JSONのキーの揺れ(class_id, cls, ...)はここで吸収する
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub class_id: Option<i64>, // 取得できない場合はNone
    pub confidence: f64,       // 取得できない場合は0
    pub bbox: [i32; 4],        // [x1, y1, x2, y2]
}

impl Detection {
    pub fn new(class_id: i64, confidence: f64, bbox: [i32; 4]) -> Self {
        Self {
            class_id: Some(class_id),
            confidence,
            bbox,
        }
    }

    pub fn from_value(v: &Value) -> Res<Self> {
        let obj = v
            .as_object()
            .ok_or_else(|| Error::InvalidInput(format!("detection is not an object: {}", v)))?;
        Ok(Self {
            class_id: first_of(obj, &CLASS_ID_KEYS).and_then(class_id_from_value),
            confidence: first_of(obj, &CONFIDENCE_KEYS).map_or(0.0, confidence_from_value),
            bbox: match obj.get("bbox") {
                Some(b) => bbox_from_value(b)?,
                None => [0; 4],
            },
        })
    }

    // 右端のx座標 (bboxのx2)
    #[inline]
    pub fn x2(&self) -> i32 {
        self.bbox[2]
    }
}

pub fn detections_from_value(v: &Value) -> Res<Vec<Detection>> {
    let arr = v
        .as_array()
        .ok_or_else(|| Error::InvalidInput("detections must be an array".to_string()))?;
    arr.iter().map(Detection::from_value).collect()
}

pub fn detections_from_str(s: &str) -> Res<Vec<Detection>> {
    detections_from_value(&serde_json::from_str(s)?)
}

// 候補のキーのうち最初に存在したものの値
fn first_of<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k))
}

fn class_id_from_value(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(*b as i64),
        _ => None,
    }
}

fn confidence_from_value(v: &Value) -> f64 {
    let c = match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(b) => *b as i64 as f64,
        _ => 0.0,
    };
    if c.is_finite() {
        c
    } else {
        0.0
    }
}

fn bbox_from_value(v: &Value) -> Res<[i32; 4]> {
    let invalid = || Error::InvalidInput(format!("bbox must be 4 numbers: {}", v));
    let arr = v.as_array().ok_or_else(invalid)?;
    if arr.len() != 4 {
        return Err(invalid());
    }
    let mut bbox = [0; 4];
    for (b, n) in bbox.iter_mut().zip(arr) {
        *b = n.as_f64().ok_or_else(invalid)? as i32;
    }
    Ok(bbox)
}

#[test]
fn test_detection_key_alias() {
    let dets = detections_from_str(
        r#"[
            {"class": 3, "confidence": 0.9, "bbox": [0, 0, 10, 10]},
            {"class_id": 4, "conf": 0.8, "bbox": [10, 0, 20, 10]},
            {"cls": "5", "score": "0.7", "bbox": [20.6, 0, 30.2, 10]},
            {"category_id": 6.0, "bbox": [30, 0, 40, 10]},
            {"name": "1m", "confidence": 0.99}
        ]"#,
    )
    .unwrap();

    assert_eq!(dets[0], Detection::new(3, 0.9, [0, 0, 10, 10]));
    assert_eq!(dets[1], Detection::new(4, 0.8, [10, 0, 20, 10]));
    assert_eq!(dets[2], Detection::new(5, 0.7, [20, 0, 30, 10]));
    assert_eq!(dets[3], Detection::new(6, 0.0, [30, 0, 40, 10]));
    assert_eq!(dets[4].class_id, None);
    assert_eq!(dets[4].bbox, [0; 4]);
}

#[test]
fn test_detection_first_alias_wins() {
    // 最初に見つかったキーの値が不正でも後続のキーは参照しない
    let dets = detections_from_str(r#"[{"class": "x", "class_id": 1, "confidence": 0.9}]"#).unwrap();
    assert_eq!(dets[0].class_id, None);
}

#[test]
fn test_detection_invalid_input() {
    assert!(detections_from_str(r#"{"class": 1}"#).is_err());
    assert!(detections_from_str(r#"[1, 2]"#).is_err());
    assert!(detections_from_str(r#"[{"class": 1, "bbox": [1, 2, 3]}]"#).is_err());
    assert!(detections_from_str(r#"[{"class": 1, "bbox": "0,0,1,1"}]"#).is_err());
    assert_eq!(detections_from_str("[]").unwrap(), vec![]);
}
