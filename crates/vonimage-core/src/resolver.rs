use crate::args::BuildArgs;
use crate::catalog::{self, DEFAULT_NAME, DEFAULT_PYTHON_VERSION};
use crate::error::Result;
use crate::tag::ImageTag;
use std::path::PathBuf;

/// CLIから受け取るビルド要求
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub version: String,
    pub name: String,
    pub tag: Option<String>,
    pub python_version: Option<String>,
    pub dockerfile: Option<PathBuf>,
    pub build_args: Vec<String>,
    pub debug: bool,
}

impl BuildRequest {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            name: DEFAULT_NAME.to_string(),
            tag: None,
            python_version: None,
            dockerfile: None,
            build_args: Vec::new(),
            debug: false,
        }
    }
}

/// 解決済みのビルド設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBuild {
    pub version: String,
    /// バージョンごとのDockerfileディレクトリ（ビルドコンテキスト）
    pub target: PathBuf,
    /// ベースとなるDockerfile（`_indy` / `_von` の接尾辞を付けてビルドする）
    pub dockerfile: PathBuf,
    pub python_version: String,
    pub tag: ImageTag,
    pub args: BuildArgs,
    pub debug: bool,
}

impl ResolvedBuild {
    pub fn s2i_dockerfile(&self) -> PathBuf {
        self.target.join("Dockerfile.s2i")
    }

    pub fn test_dockerfile(&self) -> PathBuf {
        self.target.join("Dockerfile.test")
    }
}

pub struct BuildResolver {
    root: Option<PathBuf>,
}

impl BuildResolver {
    /// `root` を指定しない場合、ターゲットはカレントディレクトリからの相対パスになる
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// ビルド要求をカタログと突き合わせて解決
    ///
    /// ビルド引数の優先順位（後勝ち）:
    /// 1. カタログの args
    /// 2. 導出値（python_version, tag_name, tag_version, indy_build_flags）
    /// 3. `--build-arg` の指定
    pub fn resolve(&self, request: &BuildRequest) -> Result<ResolvedBuild> {
        let entry = catalog::lookup(&request.version)?;

        let target = self.resolve_target(entry.target(&request.version));
        let dockerfile = request
            .dockerfile
            .clone()
            .unwrap_or_else(|| target.join("Dockerfile.ubuntu"));

        // Pythonバージョン: 明示指定 > カタログ > デフォルト
        let python_version = request
            .python_version
            .clone()
            .or_else(|| entry.python_version.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_PYTHON_VERSION.to_string());

        let tag = match &request.tag {
            Some(tag) => ImageTag::parse(tag)?,
            None => ImageTag::derive(
                &request.name,
                &python_version,
                entry.label(&request.version),
                request.debug,
            ),
        };

        let mut args: BuildArgs = entry.args.iter().copied().collect();
        args.insert("python_version", python_version.as_str());
        args.insert("tag_name", tag.name.as_str());
        args.insert("tag_version", tag.version.as_str());
        if !request.debug {
            args.insert("indy_build_flags", "--release");
        }
        args.apply_overrides(&request.build_args)?;

        tracing::debug!(
            "Resolved version '{}': target={}, tag={}, {} build args",
            request.version,
            target.display(),
            tag,
            args.len()
        );

        Ok(ResolvedBuild {
            version: request.version.clone(),
            target,
            dockerfile,
            python_version,
            tag,
            args,
            debug: request.debug,
        })
    }

    fn resolve_target(&self, target: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(target),
            None => PathBuf::from(target),
        }
    }
}
