//! von-image の Docker ビルド実行
//!
//! 解決済みのビルド設定から docker CLI の呼び出し計画を組み立て、順番に実行する。
//! `--output` 指定時は Dockerfile の `ARG` 行を書き換えたファイルを出力する。

pub mod error;
pub mod executor;
pub mod plan;
pub mod progress;
pub mod runner;
pub mod template;

pub use error::{BuildError, BuildResult};
pub use executor::PlanExecutor;
pub use plan::{BuildPlan, Invocation, PlanOptions, Step, random_cache_bust};
pub use runner::{CommandOutput, CommandRunner, DockerCli, OutputMode};
pub use template::{render_template, render_template_file, rewrite_line, select_template};
