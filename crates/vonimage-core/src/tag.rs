use crate::error::{ImageError, Result};
use std::fmt;

/// `name:version` 形式のイメージタグ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag {
    pub name: String,
    pub version: String,
}

impl ImageTag {
    /// 明示的に指定されたタグを分解
    ///
    /// 最初の `:` で分割し、両側をそのまま使う。
    /// `localhost:5000/app:dev` は `localhost` / `5000/app:dev` になる。
    pub fn parse(tag: &str) -> Result<Self> {
        let (name, version) = tag
            .split_once(':')
            .ok_or_else(|| ImageError::InvalidTag(tag.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    /// 自動生成タグ: `{name}:py{major}{minor}-{label}[-debug]`
    pub fn derive(name: &str, python_version: &str, label: &str, debug: bool) -> Self {
        let mut version = format!("{}-{}", python_tag_prefix(python_version), label);
        if debug {
            version.push_str("-debug");
        }
        Self {
            name: name.to_string(),
            version,
        }
    }

    /// 派生イメージ用のタグ（`-s2i`, `-test` など）
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self {
            name: self.name.clone(),
            version: format!("{}{}", self.version, suffix),
        }
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// Pythonバージョン文字列の1文字目と3文字目から `py36` のような接頭辞を作る
///
/// 文字が足りない場合はその部分を空にする。
pub fn python_tag_prefix(python_version: &str) -> String {
    let mut chars = python_version.chars();
    let major = chars.next();
    let minor = chars.nth(1);
    let mut prefix = String::from("py");
    prefix.extend(major);
    prefix.extend(minor);
    prefix
}
