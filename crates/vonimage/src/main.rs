mod build;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vonimage_build::BuildError;
use vonimage_core::{DEFAULT_NAME, PY_35_VERSION, PY_36_VERSION, catalog};

#[derive(Parser, Debug)]
#[command(name = "make-image")]
#[command(about = "von-image の Docker イメージを生成する", long_about = None)]
#[command(after_help = available_versions())]
pub struct Cli {
    /// 定義済みのリリースバージョン
    pub version: String,

    /// イメージのベース名
    #[arg(short, long, env = "VON_IMAGE_NAME", default_value = DEFAULT_NAME)]
    pub name: String,

    /// イメージタグを指定 (name:version)
    #[arg(short, long)]
    pub tag: Option<String>,

    /// 独自のDockerfileを使う
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// ビルド引数を追加（複数指定可、後勝ち）
    #[arg(long = "build-arg", value_name = "ARG=VAL")]
    pub build_arg: Vec<String>,

    /// libindy をデバッグビルドする
    #[arg(long, overrides_with = "release")]
    pub debug: bool,

    /// libindy をリリースビルドする（デフォルト）
    #[arg(long, overrides_with = "debug")]
    pub release: bool,

    /// 実行せずに docker コマンドを表示
    #[arg(long)]
    pub dry_run: bool,

    /// docker のビルドキャッシュを使わない
    #[arg(long)]
    pub no_cache: bool,

    /// ビルド引数で ARG を置き換えた Dockerfile を出力
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Python 3.5 のデフォルトバージョンを使う
    #[arg(long, overrides_with_all = ["py36", "python"])]
    pub py35: bool,

    /// Python 3.6 のデフォルトバージョンを使う
    #[arg(long, overrides_with_all = ["py35", "python"])]
    pub py36: bool,

    /// Python バージョンを指定
    #[arg(long, overrides_with_all = ["py35", "py36"])]
    pub python: Option<String>,

    /// ビルドしたイメージをプッシュ
    #[arg(long)]
    pub push: bool,

    /// docker build の出力を抑制
    #[arg(short, long)]
    pub quiet: bool,

    /// このバージョンの s2i イメージもビルド
    #[arg(long)]
    pub s2i: bool,

    /// イメージを小さくする (docker build --squash)
    #[arg(long)]
    pub squash: bool,

    /// ビルドしたイメージでテストを実行
    #[arg(long)]
    pub test: bool,

    /// 使用するコンテナCLI
    #[arg(long, env = "VON_IMAGE_DOCKER", default_value = "docker")]
    pub docker: String,

    /// バージョンごとのディレクトリを含むルート（省略時はカレントディレクトリ）
    #[arg(long, env = "VON_IMAGE_ROOT")]
    pub root: Option<PathBuf>,
}

impl Cli {
    /// `--debug` / `--release` のうち最後に指定されたもの（デフォルトはリリース）
    pub fn debug_build(&self) -> bool {
        self.debug && !self.release
    }

    /// `--py35` / `--py36` / `--python` のうち最後に指定されたもの
    ///
    /// 空文字列の `--python` は未指定として扱う。
    pub fn python_version(&self) -> Option<String> {
        if let Some(version) = self.python.as_deref().filter(|v| !v.is_empty()) {
            Some(version.to_string())
        } else if self.py36 {
            Some(PY_36_VERSION.to_string())
        } else if self.py35 {
            Some(PY_35_VERSION.to_string())
        } else {
            None
        }
    }
}

/// `--help` に表示する利用可能なバージョン一覧
fn available_versions() -> String {
    format!(
        "利用可能なバージョン: {}",
        catalog::keys().collect::<Vec<_>>().join(", ")
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // ログはstderrへ（stdoutはdry-runのコマンド出力に使う）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = build::handle_build_command(&cli).await {
        let message = match e.downcast_ref::<BuildError>() {
            Some(build_error) => build_error.user_message(),
            None => e.to_string(),
        };
        eprintln!("{} {}", "✗".red().bold(), message);
        std::process::exit(1);
    }
}
