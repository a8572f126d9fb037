use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// バージョンディレクトリとDockerfileを持つテスト用プロジェクト
pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// 呼び出しをログに記録する偽の docker
    ///
    /// 引数に `fail_on` を含む呼び出しだけ終了コード1で失敗する。
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn write_fake_docker(&self, fail_on: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let log = self.log_path();
        let script = format!(
            "#!/bin/sh\n\
             echo \"$*\" >> '{}'\n\
             case \"$*\" in\n\
               *'{}'*) exit 1 ;;\n\
               'image inspect'*) echo 2097152 ;;\n\
             esac\n\
             exit 0\n",
            log.display(),
            fail_on
        );
        let path = self.write_file("fake-docker.sh", &script);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[allow(dead_code)]
    pub fn log_path(&self) -> PathBuf {
        self.root.path().join("docker-calls.log")
    }

    /// 偽の docker が受け取った呼び出し（1行1回）
    #[allow(dead_code)]
    pub fn docker_calls(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
