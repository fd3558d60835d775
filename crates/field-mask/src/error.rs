//! 필드 마스크 에러 타입
//!
//! [`MaskError`]는 마스크 경로 구성 단계의 에러만 표현합니다.
//! 마스크 적용(filter/prune/overwrite)은 실패하지 않습니다.

use eventgate_core::error::{EventgateError, MaskSetupError};

/// 필드 마스크 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    /// 한 경로가 다른 경로의 접두사 (leaf와 branch 중복)
    #[error("overlapping mask paths: '{path}' is a prefix of '{longer}'")]
    OverlappingPath {
        /// 짧은 경로
        path: String,
        /// 짧은 경로로 시작하는 긴 경로
        longer: String,
    },

    /// 세그먼트가 하나도 없는 경로
    #[error("empty mask path at index {index}: '{path}'")]
    EmptyPath {
        /// 필드 목록에서의 위치
        index: usize,
        /// 원본 경로 문자열
        path: String,
    },
}

impl From<MaskError> for EventgateError {
    fn from(err: MaskError) -> Self {
        EventgateError::Mask(MaskSetupError::InvalidPath(err.to_string()))
    }
}
