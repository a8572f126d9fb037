use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    #[error("不明なバージョンです: {version}\n利用可能なバージョン: {available}")]
    UnknownVersion { version: String, available: String },

    #[error("ビルド引数の形式が不正です: '{0}' (KEY=VAL 形式で指定してください)")]
    MalformedBuildArg(String),

    #[error("イメージタグの形式が不正です: '{0}' (name:version 形式で指定してください)")]
    InvalidTag(String),
}

pub type Result<T> = std::result::Result<T, ImageError>;
