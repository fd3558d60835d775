//! 서브커맨드 핸들러

pub mod check;
pub mod run;

use std::path::Path;

use tracing::debug;

use eventgate_core::EventgateConfig;

use crate::error::CliError;

/// 설정을 로드합니다.
///
/// 경로가 없으면 기본값에 `EVENTGATE_*` 환경변수 오버라이드를 적용해 사용합니다.
pub async fn load_config(path: Option<&Path>) -> Result<EventgateConfig, CliError> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            Ok(EventgateConfig::load(path).await?)
        }
        None => {
            let mut config = EventgateConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }
}
