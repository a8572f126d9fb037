use crate::Cli;
use colored::Colorize;
use vonimage_build::{
    BuildPlan, DockerCli, PlanExecutor, PlanOptions, random_cache_bust, render_template_file,
    select_template,
};
use vonimage_core::{BuildRequest, BuildResolver, ResolvedBuild};

/// ビルドコマンドを処理
///
/// `--output` 指定時はDockerfileを書き出して終了し、docker は呼ばない。
/// `--dry-run` 指定時は実行計画を表示するだけ。
pub async fn handle_build_command(cli: &Cli) -> anyhow::Result<()> {
    let resolver = BuildResolver::new(cli.root.clone());
    let resolved = resolver.resolve(&build_request(cli))?;

    tracing::info!("Image tag: {}", resolved.tag);

    if let Some(output) = &cli.output {
        let (source, values) = select_template(&resolved, cli.test, cli.s2i);
        render_template_file(&source, output, &values)?;
        eprintln!(
            "{} {} → {}",
            "✓".green(),
            source.display(),
            output.display().to_string().cyan()
        );
        return Ok(());
    }

    let plan = BuildPlan::new(&resolved, &plan_options(cli), random_cache_bust());

    if cli.dry_run {
        print_plan(&plan);
        return Ok(());
    }

    print_summary(&resolved);

    let executor = PlanExecutor::new(DockerCli::new()).quiet(cli.quiet);
    executor.execute(&plan).await?;

    Ok(())
}

fn build_request(cli: &Cli) -> BuildRequest {
    BuildRequest {
        version: cli.version.clone(),
        name: cli.name.clone(),
        // 空文字列のタグは未指定として扱い、タグを導出する
        tag: cli.tag.clone().filter(|t| !t.is_empty()),
        python_version: cli.python_version(),
        dockerfile: cli.file.clone(),
        build_args: cli.build_arg.clone(),
        debug: cli.debug_build(),
    }
}

fn plan_options(cli: &Cli) -> PlanOptions {
    PlanOptions {
        program: cli.docker.clone(),
        no_cache: cli.no_cache,
        squash: cli.squash,
        s2i: cli.s2i,
        test: cli.test,
        push: cli.push,
    }
}

/// dry-run: 実行するコマンドを1行ずつ表示
fn print_plan(plan: &BuildPlan) {
    for invocation in plan.steps() {
        println!("{}", invocation);
    }
}

fn print_summary(resolved: &ResolvedBuild) {
    println!("バージョン: {}", resolved.version.cyan());
    println!("Python: {}", resolved.python_version.cyan());
    println!("イメージ: {}", resolved.tag.to_string().cyan());
    if resolved.debug {
        println!("{}", "libindy: debug build".yellow());
    }
}
