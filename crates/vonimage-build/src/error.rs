use crate::plan::Step;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("テンプレートが見つかりません: {0}")]
    TemplateNotFound(PathBuf),

    #[error("{step} が失敗しました (exit code: {})", .code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    StepFailed { step: Step, code: Option<i32> },

    #[error("コマンドを起動できません: {program}\n理由: {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// ユーザー向けの短いメッセージ
    pub fn user_message(&self) -> String {
        match self {
            BuildError::StepFailed { step, .. } => step.failure_message().to_string(),
            BuildError::CommandSpawn { program, .. } => {
                format!(
                    "{} を実行できません\n\
                     \n\
                     解決方法:\n\
                     1. docker がインストールされているか確認してください\n\
                     2. --docker または VON_IMAGE_DOCKER で実行ファイルを指定してください",
                    program
                )
            }
            _ => format!("{}", self),
        }
    }
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
