//! Dockerfile の `ARG` 行の書き換え
//!
//! `ARG name[=default]` に一致する行のうち、値が解決できたものだけを
//! `ARG name=value` に置き換える。それ以外の行は改行コードも含めてバイト単位でそのまま出力する。
//! UTF-8 として不正なバイト列を含む Dockerfile もそのまま扱える。

use crate::error::{BuildError, BuildResult};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use vonimage_core::{BuildArgs, ResolvedBuild};

// デフォルト値部分は任意のバイト列を許す
static ARG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ARG\s+(\w+)=?(?-u:.*)$").expect("valid ARG pattern"));

/// 出力するテンプレートと置換する値を選ぶ
///
/// - `test`: `Dockerfile.test` の `base_image` のみ
/// - `s2i`: `Dockerfile.s2i` の `base_image` のみ
/// - それ以外: ビルド用Dockerfileに全ビルド引数
pub fn select_template(resolved: &ResolvedBuild, test: bool, s2i: bool) -> (PathBuf, BuildArgs) {
    let base_image = || {
        let mut values = BuildArgs::new();
        values.insert("base_image", resolved.tag.to_string());
        values
    };

    if test {
        (resolved.test_dockerfile(), base_image())
    } else if s2i {
        (resolved.s2i_dockerfile(), base_image())
    } else {
        (resolved.dockerfile.clone(), resolved.args.clone())
    }
}

/// 1行を書き換える
///
/// `line` は行末の改行を含んでいてもよい。改行は保持される。
pub fn rewrite_line<'a>(line: &'a [u8], values: &BuildArgs) -> Cow<'a, [u8]> {
    let (body, ending) = split_line_ending(line);

    let Some(caps) = ARG_PATTERN.captures(body) else {
        return Cow::Borrowed(line);
    };
    let Ok(name) = std::str::from_utf8(&caps[1]) else {
        return Cow::Borrowed(line);
    };

    match values.get(name) {
        Some(value) => {
            let mut rewritten = format!("ARG {}={}", name, value).into_bytes();
            rewritten.extend_from_slice(ending);
            Cow::Owned(rewritten)
        }
        // 未解決の引数は既存のデフォルトのまま
        None => Cow::Borrowed(line),
    }
}

/// テンプレート全体を書き換える
pub fn render_template(source: &[u8], values: &BuildArgs) -> Vec<u8> {
    let mut output = Vec::with_capacity(source.len());
    for line in source.split_inclusive(|&b| b == b'\n') {
        output.extend_from_slice(&rewrite_line(line, values));
    }
    output
}

/// テンプレートファイルを読み込み、書き換えた結果を `output` に書き出す
pub fn render_template_file(source: &Path, output: &Path, values: &BuildArgs) -> BuildResult<()> {
    if !source.is_file() {
        return Err(BuildError::TemplateNotFound(source.to_path_buf()));
    }

    tracing::debug!(
        "Rendering template {} -> {}",
        source.display(),
        output.display()
    );

    let content = std::fs::read(source)?;
    std::fs::write(output, render_template(&content, values))?;
    Ok(())
}

fn split_line_ending(line: &[u8]) -> (&[u8], &[u8]) {
    if let Some(body) = line.strip_suffix(b"\r\n") {
        (body, &line[body.len()..])
    } else if let Some(body) = line.strip_suffix(b"\n") {
        (body, &line[body.len()..])
    } else {
        (line, &line[line.len()..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn values(pairs: &[(&str, &str)]) -> BuildArgs {
        pairs.iter().copied().collect()
    }

    fn resolved() -> ResolvedBuild {
        vonimage_core::BuildResolver::new(None)
            .resolve(&vonimage_core::BuildRequest::new("1.6"))
            .unwrap()
    }

    #[test]
    fn test_select_template_image() {
        let resolved = resolved();
        let (path, values) = select_template(&resolved, false, false);
        assert_eq!(path, PathBuf::from("1.6/Dockerfile.ubuntu"));
        assert_eq!(values, resolved.args);
    }

    #[test]
    fn test_select_template_test_wins_over_s2i() {
        let (path, values) = select_template(&resolved(), true, true);
        assert_eq!(path, PathBuf::from("1.6/Dockerfile.test"));
        assert_eq!(values.len(), 1);
        assert_eq!(
            values.get("base_image"),
            Some("bcgovimages/von-image:py35-1.6-11")
        );
    }

    #[test]
    fn test_select_template_s2i() {
        let (path, values) = select_template(&resolved(), false, true);
        assert_eq!(path, PathBuf::from("1.6/Dockerfile.s2i"));
        assert!(values.contains_key("base_image"));
        assert!(!values.contains_key("python_version"));
    }

    #[test]
    fn test_rewrite_matching_arg() {
        let args = values(&[("FOO", "baz")]);
        assert_eq!(&*rewrite_line(b"ARG FOO=bar\n", &args), b"ARG FOO=baz\n");
    }

    #[test]
    fn test_rewrite_arg_without_default() {
        let args = values(&[("python_version", "3.6.7")]);
        assert_eq!(
            &*rewrite_line(b"ARG python_version\n", &args),
            b"ARG python_version=3.6.7\n"
        );
    }

    #[test]
    fn test_unresolved_arg_is_untouched() {
        let args = values(&[("OTHER", "x")]);
        assert_eq!(&*rewrite_line(b"ARG FOO=bar\n", &args), b"ARG FOO=bar\n");
        assert_eq!(&*rewrite_line(b"ARG FOO\n", &args), b"ARG FOO\n");
        assert!(matches!(rewrite_line(b"ARG FOO=bar\n", &args), Cow::Borrowed(_)));
    }

    #[test]
    fn test_non_arg_lines_are_untouched() {
        let args = values(&[("FOO", "baz")]);
        for line in [
            "FROM ubuntu:16.04\n",
            "  ARG FOO=indented\n",
            "# ARG FOO=comment\n",
            "ARGS FOO=bar\n",
            "RUN echo $FOO\n",
            "\n",
        ] {
            assert_eq!(&*rewrite_line(line.as_bytes(), &args), line.as_bytes());
        }
    }

    #[test]
    fn test_preserves_crlf_and_missing_final_newline() {
        let args = values(&[("FOO", "baz")]);
        assert_eq!(&*rewrite_line(b"ARG FOO=bar\r\n", &args), b"ARG FOO=baz\r\n");
        assert_eq!(&*rewrite_line(b"ARG FOO=bar", &args), b"ARG FOO=baz");
    }

    #[test]
    fn test_render_template_preserves_order() {
        let source = "FROM ubuntu:16.04\n\
                      ARG indy_sdk_url\n\
                      ARG python_version=3.5.5\n\
                      ENV PYTHON=${python_version}\n\
                      ARG untouched=keep\n\
                      CMD [\"bash\"]";
        let args = values(&[
            ("indy_sdk_url", "https://example.com/sdk.tgz"),
            ("python_version", "3.6.7"),
        ]);

        let rendered = render_template(source.as_bytes(), &args);
        assert_eq!(
            String::from_utf8(rendered).unwrap(),
            "FROM ubuntu:16.04\n\
             ARG indy_sdk_url=https://example.com/sdk.tgz\n\
             ARG python_version=3.6.7\n\
             ENV PYTHON=${python_version}\n\
             ARG untouched=keep\n\
             CMD [\"bash\"]"
        );
    }

    #[test]
    fn test_render_template_file() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("Dockerfile.s2i");
        let output = temp_dir.path().join("Dockerfile.out");
        fs::write(&source, "ARG base_image\nFROM ${base_image}\n").unwrap();

        let args = values(&[("base_image", "von:py35-1.6-11")]);
        render_template_file(&source, &output, &args).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "ARG base_image=von:py35-1.6-11\nFROM ${base_image}\n"
        );
    }

    #[test]
    fn test_render_template_file_missing_source() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("missing");
        let output = temp_dir.path().join("out");

        let result = render_template_file(&source, &output, &BuildArgs::new());
        assert!(matches!(result, Err(BuildError::TemplateNotFound(p)) if p == source));
        assert!(!output.exists());
    }

    #[test]
    fn test_non_utf8_lines_pass_through() {
        let args = values(&[("FOO", "baz")]);
        let source: &[u8] = b"# caf\xe9\nARG FOO=\xff\xfe\nARG OTHER=\xff\nRUN echo \xc3\n";

        assert_eq!(
            render_template(source, &args),
            b"# caf\xe9\nARG FOO=baz\nARG OTHER=\xff\nRUN echo \xc3\n"
        );
    }

    #[test]
    fn test_render_template_file_non_utf8() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("Dockerfile.ubuntu");
        let output = temp_dir.path().join("Dockerfile.out");
        fs::write(&source, b"LABEL note=\xe9t\xe9\nARG python_version=3.5.5\n").unwrap();

        let args = values(&[("python_version", "3.6.7")]);
        render_template_file(&source, &output, &args).unwrap();

        assert_eq!(
            fs::read(&output).unwrap(),
            b"LABEL note=\xe9t\xe9\nARG python_version=3.6.7\n"
        );
    }
}
