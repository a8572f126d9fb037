//! von-image のビルド設定解決
//!
//! 定義済みバージョンのカタログ、ビルド引数のマージ、イメージタグの導出を提供する。

pub mod args;
pub mod catalog;
pub mod error;
pub mod resolver;
pub mod tag;

pub use args::{BuildArgs, parse_build_arg};
pub use catalog::{DEFAULT_NAME, PY_35_VERSION, PY_36_VERSION, VersionEntry};
pub use error::{ImageError, Result};
pub use resolver::{BuildRequest, BuildResolver, ResolvedBuild};
pub use tag::{ImageTag, python_tag_prefix};
