//! 実行計画を順番に実行する

use crate::error::{BuildError, BuildResult};
use crate::plan::{BuildPlan, Invocation, Step};
use crate::progress::StepProgress;
use crate::runner::{CommandRunner, OutputMode};
use colored::Colorize;

pub struct PlanExecutor<R: CommandRunner> {
    runner: R,
    quiet: bool,
}

impl<R: CommandRunner> PlanExecutor<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            quiet: false,
        }
    }

    /// ビルド出力を抑制する
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// 計画のステップを1つずつ実行
    ///
    /// 必須ステップが失敗した時点で中断し、後続のステップは実行しない。
    /// 作成済みのイメージやコンテナは削除しない。
    pub async fn execute(&self, plan: &BuildPlan) -> BuildResult<()> {
        println!("{}", "Building docker image...".green());

        for invocation in plan.steps() {
            if invocation.step.is_best_effort() {
                self.report_size(invocation).await;
                continue;
            }

            match invocation.step {
                Step::S2i => println!("  {} {}", "→".blue(), invocation),
                Step::Push => println!("{}", "Pushing docker image...".blue()),
                _ => {}
            }

            self.run_required(invocation).await?;

            if invocation.step == Step::TestRun {
                println!("{}", "All tests passed".green());
            }
        }

        Ok(())
    }

    async fn run_required(&self, invocation: &Invocation) -> BuildResult<()> {
        let mode = self.output_mode(invocation.step);

        let output = if mode == OutputMode::Discard {
            let progress = StepProgress::new(&format!("{}...", invocation.step));
            let output = self.runner.run(invocation, mode).await;
            progress.finish();
            output?
        } else {
            self.runner.run(invocation, mode).await?
        };

        if !output.success {
            tracing::debug!("Step '{}' failed: {}", invocation.step, invocation);
            return Err(BuildError::StepFailed {
                step: invocation.step,
                code: output.code,
            });
        }

        if mode == OutputMode::Discard {
            if let Some(tag) = &invocation.produces {
                println!("Successfully tagged {}", tag.cyan());
            }
        }

        Ok(())
    }

    /// イメージサイズの表示（失敗しても中断しない）
    async fn report_size(&self, invocation: &Invocation) {
        let output = match self.runner.run(invocation, OutputMode::Capture).await {
            Ok(output) if output.success => output,
            Ok(output) => {
                tracing::warn!("image inspect exited with {:?}", output.code);
                return;
            }
            Err(e) => {
                tracing::warn!("image inspect failed: {}", e);
                return;
            }
        };

        match parse_size_mb(&output.stdout) {
            Some(size) => println!("{:.2}MB", size),
            None => tracing::warn!("Unexpected image size output: {:?}", output.stdout),
        }
    }

    fn output_mode(&self, step: Step) -> OutputMode {
        match step {
            Step::BaseImage | Step::Image | Step::S2i if self.quiet => OutputMode::Discard,
            _ => OutputMode::Inherit,
        }
    }
}

/// `docker image inspect --format={{.Size}}` の出力（バイト数）をMBに換算
fn parse_size_mb(stdout: &str) -> Option<f64> {
    let bytes: u64 = stdout.trim().parse().ok()?;
    Some(bytes as f64 / 1024.0 / 1024.0)
}
