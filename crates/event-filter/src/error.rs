//! 이벤트 필터 에러 타입
//!
//! [`FilterError`]는 필터 스펙 파싱과 필터 목록 빌드 중 발생하는 에러를 표현합니다.
//! `From<FilterError> for EventgateError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use eventgate_core::error::{EventgateError, FilterSetupError};

/// 이벤트 필터 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// 필터 스펙 라인 파싱 실패
    #[error("filter spec parse error at line {line}: {reason}")]
    Parse {
        /// 1부터 시작하는 라인 번호
        line: usize,
        /// 실패 사유
        reason: String,
    },

    /// 권한 없는 컨텍스트에서 특권 조건 사용
    #[error("filter spec at line {line} uses privileged criterion 'pid_set'")]
    Privileged {
        /// 1부터 시작하는 라인 번호
        line: usize,
    },

    /// 조건 컴파일 실패 (빌더 단위)
    ///
    /// 빌더가 반환하며, 필터 목록 빌드 시 스펙 위치가 붙은 [`FilterError::Build`]로 바뀝니다.
    #[error("invalid {criterion}: {reason}")]
    InvalidCriterion {
        /// 조건 이름 (binary_regex 등)
        criterion: String,
        /// 실패 사유
        reason: String,
    },

    /// 필터 목록 빌드 실패
    #[error("filter build error: spec[{index}] {criterion}: {reason}")]
    Build {
        /// 스펙 목록에서의 위치
        index: usize,
        /// 조건 이름
        criterion: String,
        /// 실패 사유
        reason: String,
    },

    /// 빌드 취소
    #[error("filter build cancelled")]
    Cancelled,
}

impl From<FilterError> for EventgateError {
    fn from(err: FilterError) -> Self {
        let setup = match err {
            FilterError::Cancelled => FilterSetupError::Cancelled,
            FilterError::Parse { .. } | FilterError::Privileged { .. } => {
                FilterSetupError::Spec(err.to_string())
            }
            FilterError::InvalidCriterion { .. } | FilterError::Build { .. } => {
                FilterSetupError::Build(err.to_string())
            }
        };
        EventgateError::Filter(setup)
    }
}
