use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Res};
use crate::model::*;

// 物体検出器
// 画像1枚に対する検出結果の一覧を返却する (検証は呼び出し側で行う)
pub trait Detector {
    fn detect(&self, image: &Path) -> Res<Vec<Detection>>;
}

// 検出結果をJSONファイルから読み込む検出器
// 画像 "hand.jpg" に対して "hand.json" を読み込む
// ディレクトリが指定されている場合はそのディレクトリ内のファイルを参照
#[derive(Debug, Clone, Default)]
pub struct JsonDetector {
    dir: Option<PathBuf>,
}

impl JsonDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(dir: &Path) -> Self {
        Self {
            dir: Some(dir.to_path_buf()),
        }
    }

    fn json_path(&self, image: &Path) -> PathBuf {
        let path = image.with_extension("json");
        match (&self.dir, path.file_name()) {
            (Some(d), Some(f)) => d.join(f),
            _ => path,
        }
    }
}

impl Detector for JsonDetector {
    fn detect(&self, image: &Path) -> Res<Vec<Detection>> {
        let path = self.json_path(image);
        debug!("read detections: {}", path.display());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))?;
        detections_from_str(&s)
    }
}

#[test]
fn test_json_detector_path() {
    let d = JsonDetector::new();
    assert_eq!(
        d.json_path(Path::new("tests/data/hand.jpg")),
        Path::new("tests/data/hand.json")
    );
    assert_eq!(
        d.json_path(Path::new("tests/data/hand.json")),
        Path::new("tests/data/hand.json")
    );

    let d = JsonDetector::with_dir(Path::new("tests/data"));
    assert_eq!(d.json_path(Path::new("/tmp/hand.png")), Path::new("tests/data/hand.json"));
}

#[test]
fn test_json_detector_read() {
    let d = JsonDetector::with_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").as_path());
    let dets = d.detect(Path::new("hand_fourteen.jpg")).unwrap();
    assert_eq!(dets.len(), 14);
    assert!(d.detect(Path::new("missing.jpg")).is_err());
}
