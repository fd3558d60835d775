//! 에러 타입 -- 도메인별 에러 정의

/// eventgate 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum EventgateError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 필터 엔진 에러
    #[error("filter error: {0}")]
    Filter(#[from] FilterSetupError),

    /// 필드 마스크 에러
    #[error("mask error: {0}")]
    Mask(#[from] MaskSetupError),

    /// 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 필터 구성 에러
///
/// 필터 엔진 크레이트의 상세 에러가 이 형태로 요약되어 전파됩니다.
#[derive(Debug, thiserror::Error)]
pub enum FilterSetupError {
    /// 필터 스펙 파싱 실패 (권한 위반 포함)
    #[error("invalid filter spec: {0}")]
    Spec(String),

    /// 필터 컴파일 실패
    #[error("filter build failed: {0}")]
    Build(String),

    /// 빌드 취소
    #[error("filter build cancelled")]
    Cancelled,
}

/// 필드 마스크 구성 에러
#[derive(Debug, thiserror::Error)]
pub enum MaskSetupError {
    /// 유효하지 않은 마스크 경로
    #[error("invalid mask path: {0}")]
    InvalidPath(String),
}

/// 파싱 에러
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 지원하지 않는 형식
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// 파싱 실패
    #[error("parse failed at offset {offset}: {reason}")]
    Failed { offset: usize, reason: String },

    /// 입력 데이터 초과
    #[error("input too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },
}
