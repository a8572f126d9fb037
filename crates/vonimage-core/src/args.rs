//! ビルド引数セット
//!
//! 挿入順を保持するマップ。既存キーへの再代入は値のみ上書きし、位置は変えない。

use crate::error::{ImageError, Result};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArgs {
    values: IndexMap<String, String>,
}

impl BuildArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// 値を設定（後勝ち）
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn extend<'a>(&mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (key, value) in pairs {
            self.insert(key, value);
        }
    }

    /// `KEY=VAL` 形式の上書き指定を順に適用
    pub fn apply_overrides<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<()> {
        for token in tokens {
            let (key, value) = parse_build_arg(token.as_ref())?;
            tracing::debug!("Build arg override: {}={}", key, value);
            self.insert(key, value);
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `--build-arg KEY=VAL` の引数列に展開
    pub fn to_cli_args(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(key, value)| ["--build-arg".to_string(), format!("{}={}", key, value)])
            .collect()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for BuildArgs {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut args = BuildArgs::new();
        args.extend(iter);
        args
    }
}

/// `KEY=VAL` を分解する
///
/// 最初の `=` で分割するため、値に `=` を含めることができる。
pub fn parse_build_arg(token: &str) -> Result<(String, String)> {
    match token.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ImageError::MalformedBuildArg(token.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_arg() {
        assert_eq!(
            parse_build_arg("indy_build_flags=--release").unwrap(),
            ("indy_build_flags".to_string(), "--release".to_string())
        );
    }

    #[test]
    fn test_parse_build_arg_value_with_equals() {
        let (key, value) = parse_build_arg("opts=a=b").unwrap();
        assert_eq!(key, "opts");
        assert_eq!(value, "a=b");
    }

    #[test]
    fn test_parse_build_arg_empty_value() {
        let (key, value) = parse_build_arg("indy_build_flags=").unwrap();
        assert_eq!(key, "indy_build_flags");
        assert_eq!(value, "");
    }

    #[test]
    fn test_parse_build_arg_malformed() {
        assert_eq!(
            parse_build_arg("no_equals_sign"),
            Err(ImageError::MalformedBuildArg("no_equals_sign".to_string()))
        );
        assert!(parse_build_arg("=value").is_err());
    }

    #[test]
    fn test_overrides_last_wins() {
        let mut args = BuildArgs::new();
        args.insert("python_version", "3.5.5");
        args.apply_overrides(&["FOO=one", "FOO=two"]).unwrap();
        assert_eq!(args.get("FOO"), Some("two"));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut args: BuildArgs = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        args.insert("a", "9");
        let keys: Vec<_> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(args.get("a"), Some("9"));
    }

    #[test]
    fn test_malformed_override_aborts() {
        let mut args = BuildArgs::new();
        let result = args.apply_overrides(&["A=1", "broken"]);
        assert!(matches!(result, Err(ImageError::MalformedBuildArg(_))));
    }

    #[test]
    fn test_to_cli_args() {
        let args: BuildArgs = [("a", "1"), ("b", "x y")].into_iter().collect();
        assert_eq!(
            args.to_cli_args(),
            vec!["--build-arg", "a=1", "--build-arg", "b=x y"]
        );
    }
}
