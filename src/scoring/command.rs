use std::io::Write;
use std::process::{Command, Stdio};

use serde::Deserialize;
use tracing::debug;

use super::engine::*;
use crate::model::RawScore;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EngineOutput {
    Failure { error: String },
    Success(RawScore),
}

// 外部プログラムとして動作する点数計算エンジン
// 標準入力にScoringRequestのJSONを書き込み, 標準出力からRawScoreのJSON(または{"error": ...})を読み込む
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    capabilities: EngineCapabilities,
}

impl CommandEngine {
    pub fn new(program: &str, args: Vec<String>, capabilities: EngineCapabilities) -> Self {
        Self {
            program: program.to_string(),
            args,
            capabilities,
        }
    }
}

impl ScoringEngine for CommandEngine {
    fn capabilities(&self) -> EngineCapabilities {
        self.capabilities
    }

    fn estimate(&self, request: &ScoringRequest) -> Result<RawScore, EngineError> {
        let input =
            serde_json::to_string(request).map_err(|e| EngineError::Malformed(e.to_string()))?;
        debug!("engine input: {}", input);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| EngineError::Unavailable(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .map_err(|e| EngineError::Unavailable(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("engine output: {}", stdout.trim());

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Rejected(format!(
                "{} ({})",
                stderr.trim(),
                output.status
            )));
        }

        match serde_json::from_str(stdout.trim()) {
            Ok(EngineOutput::Success(s)) => Ok(s),
            Ok(EngineOutput::Failure { error }) => Err(EngineError::Rejected(error)),
            Err(e) => Err(EngineError::Malformed(format!("{}: '{}'", e, stdout.trim()))),
        }
    }
}

#[cfg(test)]
fn test_request() -> ScoringRequest {
    use crate::hand::*;
    use crate::hand::string::tiles_from_string;
    use crate::model::*;
    use crate::scoring::build_scoring_config;

    let hand = tiles_from_string("123456789m12345p").unwrap();
    ScoringRequest {
        hand: encode_hand(&hand, Tile(TP, 5), TileParsing::Combined).unwrap(),
        dora: encode_dora(&[], TileParsing::Combined).unwrap(),
        config: build_scoring_config(&RequestOptions::default()),
    }
}

#[cfg(test)]
fn sh(script: &str) -> CommandEngine {
    CommandEngine::new(
        "sh",
        vec!["-c".to_string(), script.to_string()],
        EngineCapabilities::default(),
    )
}

#[test]
fn test_command_engine_missing_program() {
    let engine = CommandEngine::new(
        "/nonexistent/scoring-engine",
        vec![],
        EngineCapabilities::default(),
    );
    let e = engine.estimate(&test_request()).unwrap_err();
    assert!(matches!(e, EngineError::Unavailable(_)));
}

#[cfg(unix)]
#[test]
fn test_command_engine_success() {
    let engine = sh(r#"cat > /dev/null; echo '{"han": 1, "fu": 30, "yaku": [{"name": "Tanyao", "han": 1}]}'"#);
    let raw = engine.estimate(&test_request()).unwrap();
    assert_eq!(raw.han, 1);
    assert_eq!(raw.fu, 30);
    assert_eq!(raw.yaku[0].name, "Tanyao");
    assert_eq!(raw.cost, None);
}

#[cfg(unix)]
#[test]
fn test_command_engine_reads_request() {
    // 入力に手牌の文字列が含まれていることを確認
    let engine = sh(r#"grep -q '"hand":"123456789m12345p"' && echo '{"han": 0, "fu": 0}'"#);
    let raw = engine.estimate(&test_request()).unwrap();
    assert_eq!(raw.han, 0);
}

#[cfg(unix)]
#[test]
fn test_command_engine_failures() {
    let engine = sh(r#"cat > /dev/null; echo '{"error": "hand_not_winning"}'"#);
    let e = engine.estimate(&test_request()).unwrap_err();
    assert_eq!(e.to_string(), "hand_not_winning");

    let engine = sh("cat > /dev/null; echo 'not json'");
    let e = engine.estimate(&test_request()).unwrap_err();
    assert!(matches!(e, EngineError::Malformed(_)));

    let engine = sh("cat > /dev/null; echo broken >&2; exit 3");
    let e = engine.estimate(&test_request()).unwrap_err();
    assert!(matches!(e, EngineError::Rejected(_)));
}
