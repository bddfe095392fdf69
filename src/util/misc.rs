use std::fmt;

use crate::error::{Error, Res};

// コマンドライン引数のオプションの値を取得
pub fn next_value<T>(it: &mut std::slice::Iter<'_, String>, opt: &str) -> Res<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let n = it
        .next()
        .ok_or_else(|| Error::InvalidInput(format!("{}: value missing", opt)))?;
    n.parse()
        .map_err(|e| Error::InvalidInput(format!("{}: {} '{}'", opt, e, n)))
}

pub fn read_file(file_path: &str) -> Res<String> {
    std::fs::read_to_string(file_path)
        .map_err(|e| Error::InvalidInput(format!("{}: {}", file_path, e)))
}

#[test]
fn test_next_value() {
    let args: Vec<String> = ["-t", "0.7", "-w", "x"].iter().map(|s| s.to_string()).collect();
    let mut it = args.iter();
    it.next();
    let t: f64 = next_value(&mut it, "-t").unwrap();
    assert_eq!(t, 0.7);
    it.next();
    assert!(next_value::<f64>(&mut it, "-w").is_err());
    assert!(next_value::<String>(&mut it, "-w").is_err());
}
