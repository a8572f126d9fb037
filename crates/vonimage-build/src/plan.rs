//! 外部コマンド呼び出しの実行計画
//!
//! 解決済みのビルド設定から、docker に渡すコマンドの列を順番通りに組み立てる。

use rand::Rng;
use std::fmt;
use std::path::Path;
use vonimage_core::ResolvedBuild;

/// ベースイメージのローカルタグ
pub const BASE_IMAGE_TAG: &str = "local_indy_base";

/// 実行計画の各ステップ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    BaseImage,
    Image,
    InspectSize,
    S2i,
    TestImage,
    TestRun,
    Push,
}

impl Step {
    /// 失敗しても後続のステップを止めない（サイズ表示のみ）
    pub fn is_best_effort(self) -> bool {
        matches!(self, Step::InspectSize)
    }

    /// 失敗時に表示するメッセージ
    pub fn failure_message(self) -> &'static str {
        match self {
            Step::BaseImage | Step::Image => "build failed",
            Step::InspectSize => "image inspect failed",
            Step::S2i => "s2i build failed",
            Step::TestImage => "test image build failed",
            Step::TestRun => "One or more tests failed",
            Step::Push => "push failed",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::BaseImage => "base image build",
            Step::Image => "image build",
            Step::InspectSize => "image inspect",
            Step::S2i => "s2i build",
            Step::TestImage => "test image build",
            Step::TestRun => "test run",
            Step::Push => "push",
        };
        f.write_str(name)
    }
}

/// 1回分の外部コマンド呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub step: Step,
    pub program: String,
    pub args: Vec<String>,
    /// 成功時に表示するタグ（quietモード用）
    pub produces: Option<String>,
}

impl Invocation {
    fn new(step: Step, program: &str) -> Self {
        Self {
            step,
            program: program.to_string(),
            args: Vec::new(),
            produces: None,
        }
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn tagged(mut self, tag: impl ToString) -> Self {
        let tag = tag.to_string();
        self.produces = Some(tag.clone());
        self.arg("-t").arg(tag)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// 計画を組み立てるためのオプション
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub program: String,
    pub no_cache: bool,
    pub squash: bool,
    pub s2i: bool,
    pub test: bool,
    pub push: bool,
}

impl PlanOptions {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    steps: Vec<Invocation>,
}

impl BuildPlan {
    /// 実行計画を組み立てる
    ///
    /// 順序: ベースイメージ → イメージ → サイズ表示 → s2i → テスト → プッシュ。
    /// テストは `--test` か `--push` のときに実行する。
    pub fn new(resolved: &ResolvedBuild, options: &PlanOptions, cache_bust: u32) -> Self {
        let program = options.program.as_str();
        let target = resolved.target.display().to_string();
        let build_args = resolved.args.to_cli_args();

        let mut cache_flags = Vec::new();
        if options.no_cache {
            cache_flags.push("--no-cache");
        }
        if options.squash {
            cache_flags.push("--squash");
        }

        let mut steps = Vec::new();

        steps.push(
            Invocation::new(Step::BaseImage, program)
                .arg("build")
                .args(build_args.iter().cloned())
                .arg("-f")
                .arg(suffixed(&resolved.dockerfile, "_indy"))
                .args(cache_flags.iter().copied())
                .tagged(BASE_IMAGE_TAG)
                .arg(target.as_str()),
        );

        steps.push(
            Invocation::new(Step::Image, program)
                .arg("build")
                .args(build_args.iter().cloned())
                .arg("-f")
                .arg(suffixed(&resolved.dockerfile, "_von"))
                .args(cache_flags.iter().copied())
                .tagged(&resolved.tag)
                .arg("--build-arg")
                .arg(format!("CACHEBUST={}", cache_bust))
                .arg(target.as_str()),
        );

        steps.push(
            Invocation::new(Step::InspectSize, program)
                .args(["image", "inspect"])
                .arg(resolved.tag.to_string())
                .arg("--format={{.Size}}"),
        );

        let s2i_tag = resolved.tag.with_suffix("-s2i");
        if options.s2i {
            steps.push(
                Invocation::new(Step::S2i, program)
                    .arg("build")
                    .arg("--build-arg")
                    .arg(format!("base_image={}", resolved.tag))
                    .tagged(&s2i_tag)
                    .arg("-f")
                    .arg(resolved.s2i_dockerfile().display().to_string())
                    .arg(target.as_str()),
            );
        }

        if options.test || options.push {
            let test_tag = resolved.tag.with_suffix("-test");
            steps.push(
                Invocation::new(Step::TestImage, program)
                    .arg("build")
                    .arg("--build-arg")
                    .arg(format!("base_image={}", resolved.tag))
                    .tagged(&test_tag)
                    .arg("-f")
                    .arg(resolved.test_dockerfile().display().to_string())
                    .arg(target.as_str()),
            );
            steps.push(
                Invocation::new(Step::TestRun, program)
                    .args(["run", "--rm", "-i"])
                    .arg(test_tag.to_string()),
            );
        }

        if options.push {
            // s2iイメージを作った場合はそちらをプッシュする
            let pushed = if options.s2i { &s2i_tag } else { &resolved.tag };
            steps.push(
                Invocation::new(Step::Push, program)
                    .arg("push")
                    .arg(pushed.to_string()),
            );
        }

        Self { steps }
    }

    pub fn steps(&self) -> &[Invocation] {
        &self.steps
    }

    pub fn find(&self, step: Step) -> Option<&Invocation> {
        self.steps.iter().find(|inv| inv.step == step)
    }
}

/// キャッシュ無効化用のランダムな値（6桁）
pub fn random_cache_bust() -> u32 {
    rand::thread_rng().gen_range(100_000..=999_999)
}

fn suffixed(path: &Path, suffix: &str) -> String {
    format!("{}{}", path.display(), suffix)
}
