//! 外部コマンドの実行
//!
//! docker CLI をサブプロセスとして起動し、終了を待つ。

use crate::error::{BuildError, BuildResult};
use crate::plan::Invocation;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// 子プロセスの標準出力の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// 端末にそのまま流す
    Inherit,
    /// 捨てる（quietモード）
    Discard,
    /// 文字列として受け取る
    Capture,
}

/// コマンドの実行結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    /// `OutputMode::Capture` のときのみ中身が入る
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
        }
    }

    pub fn failure(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
        }
    }
}

/// 外部コマンド実行の抽象化
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// コマンドを実行し、終了まで待つ
    ///
    /// 非ゼロ終了はエラーではなく `CommandOutput::success == false` で返す。
    /// プロセスを起動できなかった場合のみエラーになる。
    async fn run(&self, invocation: &Invocation, mode: OutputMode) -> BuildResult<CommandOutput>;
}

/// docker CLI を直接呼び出すランナー
#[derive(Debug, Clone, Default)]
pub struct DockerCli;

impl DockerCli {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for DockerCli {
    async fn run(&self, invocation: &Invocation, mode: OutputMode) -> BuildResult<CommandOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd.stdin(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        cmd.stdout(match mode {
            OutputMode::Inherit => Stdio::inherit(),
            OutputMode::Discard => Stdio::null(),
            OutputMode::Capture => Stdio::piped(),
        });

        tracing::debug!("Running: {}", invocation);

        let output = cmd.output().await.map_err(|source| BuildError::CommandSpawn {
            program: invocation.program.clone(),
            source,
        })?;

        tracing::debug!("{} exited with {}", invocation.program, output.status);

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        })
    }
}
