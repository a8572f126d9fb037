//! 定義済みバージョンのカタログ
//!
//! バージョンIDごとに、イメージのバージョンラベル、Dockerfileのディレクトリ、
//! Pythonバージョン、ビルド引数を保持する。プロセス起動時から不変。

use crate::error::{ImageError, Result};

/// デフォルトのイメージ名
pub const DEFAULT_NAME: &str = "bcgovimages/von-image";

/// `--py35` で選択されるPythonバージョン
pub const PY_35_VERSION: &str = "3.5.5";

/// `--py36` で選択されるPythonバージョン
pub const PY_36_VERSION: &str = "3.6.7";

/// カタログにも指定がない場合のPythonバージョン
pub const DEFAULT_PYTHON_VERSION: &str = PY_35_VERSION;

/// カタログの1エントリ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionEntry {
    /// タグに使うバージョンラベル（省略時はバージョンID）
    pub version: Option<&'static str>,
    /// Dockerfileを含むディレクトリ（省略時はバージョンID）
    pub path: Option<&'static str>,
    pub python_version: Option<&'static str>,
    pub args: &'static [(&'static str, &'static str)],
}

static CATALOG: &[(&str, VersionEntry)] = &[
    (
        "dev-441",
        VersionEntry {
            version: Some("indy1.3.1-dev-441-ew"),
            path: None,
            python_version: None,
            args: &[
                ("indy_sdk_repo", "https://github.com/bcgov/indy-sdk.git"),
                ("indy_sdk_rev", "574ca3a881d188c3fd7400d27acbe5edc4c7f666"),
                (
                    "indy_crypto_repo",
                    "https://github.com/hyperledger/indy-crypto.git",
                ),
                (
                    "indy_crypto_rev",
                    "96c79b36c5056eade5a8e3bae418f5a733cc8d8d",
                ),
            ],
        },
    ),
    (
        "1.0",
        VersionEntry {
            version: Some("1.0rc3"),
            path: None,
            python_version: None,
            args: &[
                (
                    "indy_sdk_url",
                    "https://codeload.github.com/ianco/indy-sdk/tar.gz/50ede4563a6a303b09d78ca97d3238e6c10333f6",
                ),
                (
                    "indy_crypto_url",
                    "https://codeload.github.com/hyperledger/indy-crypto/tar.gz/96c79b36c5056eade5a8e3bae418f5a733cc8d8d",
                ),
            ],
        },
    ),
    (
        "1.0std",
        VersionEntry {
            version: None,
            path: Some("1.0"),
            python_version: None,
            args: &[
                (
                    "indy_sdk_url",
                    "https://codeload.github.com/hyperledger/indy-sdk/tar.gz/e0ef8889e9f3b9abd706628fe259f56501d492d9",
                ),
                (
                    "indy_crypto_url",
                    "https://codeload.github.com/hyperledger/indy-crypto/tar.gz/96c79b36c5056eade5a8e3bae418f5a733cc8d8d",
                ),
            ],
        },
    ),
    (
        "1.5",
        VersionEntry {
            version: Some("1.5-0"),
            path: None,
            python_version: None,
            args: &[
                (
                    "indy_sdk_url",
                    "https://codeload.github.com/hyperledger/indy-sdk/tar.gz/16c637cbe855c46bf1d3a869e9ebcfc99bb9aabf",
                ),
                (
                    "indy_crypto_url",
                    "https://codeload.github.com/hyperledger/indy-crypto/tar.gz/9586d6a24f53f2aa0621249f2266d0f129253c48",
                ),
            ],
        },
    ),
    (
        "1.6",
        VersionEntry {
            version: Some("1.6-11"),
            path: None,
            python_version: None,
            args: &[
                // indy-sdk 1.6.7
                (
                    "indy_sdk_url",
                    "https://codeload.github.com/hyperledger/indy-sdk/tar.gz/5a37407baaf756b3c4f5cac802717dc4a2bd1660",
                ),
                // indy-crypto 0.4.5
                (
                    "indy_crypto_url",
                    "https://codeload.github.com/hyperledger/indy-crypto/tar.gz/a2864642430064c6f00902e9b999cc6356eed9f1",
                ),
            ],
        },
    ),
    (
        "1.6-ew",
        VersionEntry {
            version: Some("1.6-ew-11"),
            path: None,
            python_version: None,
            args: &[
                // bcgov postgres_plugin ブランチ
                (
                    "indy_sdk_url",
                    "https://codeload.github.com/bcgov/indy-sdk/tar.gz/88424a10f53a7e47c49143b9866a0d531c1d9420",
                ),
                // indy-crypto 0.4.5
                (
                    "indy_crypto_url",
                    "https://codeload.github.com/hyperledger/indy-crypto/tar.gz/a2864642430064c6f00902e9b999cc6356eed9f1",
                ),
            ],
        },
    ),
];

/// バージョンIDからカタログエントリを取得
pub fn lookup(version: &str) -> Result<&'static VersionEntry> {
    CATALOG
        .iter()
        .find(|(key, _)| *key == version)
        .map(|(_, entry)| entry)
        .ok_or_else(|| ImageError::UnknownVersion {
            version: version.to_string(),
            available: keys().collect::<Vec<_>>().join(", "),
        })
}

/// 定義順のバージョンID一覧
pub fn keys() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(key, _)| *key)
}

impl VersionEntry {
    /// タグに使うバージョンラベル
    pub fn label<'a>(&'a self, version: &'a str) -> &'a str {
        self.version.unwrap_or(version)
    }

    /// Dockerfileを含むディレクトリ名
    pub fn target<'a>(&'a self, version: &'a str) -> &'a str {
        self.path.unwrap_or(version)
    }
}
