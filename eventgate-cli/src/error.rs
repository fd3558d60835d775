//! CLI 에러 타입과 종료 코드 매핑

use eventgate_core::error::EventgateError;
use eventgate_field_mask::MaskError;
use eventgate_filter::FilterError;

/// CLI 에러
///
/// 각 변형은 사용자에게 보여줄 메시지에 필요한 맥락을 담습니다.
/// `exit_code()`로 종료 코드를 결정합니다.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// 설정 로드 또는 검증 실패
    #[error("configuration error: {0}")]
    Config(String),

    /// 허용/거부 목록 파싱 또는 컴파일 실패
    #[error("filter.{list}: {source}")]
    FilterList {
        list: &'static str,
        #[source]
        source: FilterError,
    },

    /// 필드 필터 컴파일 실패
    #[error("mask.field_filters: {0}")]
    Mask(#[from] MaskError),

    /// 리포트 JSON 직렬화 실패
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// 입출력 에러 (입력 파일, stdout 쓰기 등)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// eventgate-core 도메인 에러
    #[error("{0}")]
    Core(#[from] EventgateError),
}

impl CliError {
    /// 종료 코드로 변환합니다.
    ///
    /// | 코드 | 의미 |
    /// |------|------|
    /// | 0    | 성공 |
    /// | 1    | 일반 에러 |
    /// | 2    | 설정 에러 |
    /// | 3    | 필터 / 마스크 컴파일 에러 |
    /// | 10   | IO 에러 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Core(EventgateError::Config(_)) => 2,
            Self::FilterList { .. } | Self::Mask(_) => 3,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Core(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use eventgate_core::error::ConfigError;

    use super::*;

    #[test]
    fn config_errors_exit_with_two() {
        assert_eq!(CliError::Config("bad".to_owned()).exit_code(), 2);

        let core = EventgateError::Config(ConfigError::FileNotFound {
            path: "eventgate.toml".to_owned(),
        });
        assert_eq!(CliError::from(core).exit_code(), 2);
    }

    #[test]
    fn compile_errors_exit_with_three() {
        let err = CliError::FilterList {
            list: "allow_list",
            source: FilterError::Privileged { line: 1 },
        };
        assert_eq!(err.exit_code(), 3);

        let err = CliError::from(MaskError::EmptyPath {
            index: 0,
            path: "..".to_owned(),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn io_error_exits_with_ten() {
        let err = CliError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn filter_list_display_names_the_list() {
        let err = CliError::FilterList {
            list: "deny_list",
            source: FilterError::Cancelled,
        };
        let message = err.to_string();
        assert!(message.starts_with("filter.deny_list: "), "got: {message}");
    }
}
