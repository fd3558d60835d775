//! 설정 관리 -- eventgate.toml 파싱 및 런타임 설정
//!
//! [`EventgateConfig`]는 필터 엔진과 필드 마스크 엔진의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`EVENTGATE_FILTER_ALLOW_PRIVILEGED=true` 형식)
//! 3. 설정 파일 (`eventgate.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), eventgate_core::error::EventgateError> {
//! use eventgate_core::config::EventgateConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = EventgateConfig::load("eventgate.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = EventgateConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, EventgateError};
use crate::types::FieldFilter;

/// eventgate 통합 설정
///
/// `eventgate.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventgateConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 이벤트 필터 설정
    #[serde(default)]
    pub filter: FilterConfig,
    /// 필드 마스크 설정
    #[serde(default)]
    pub mask: MaskConfig,
}

impl EventgateConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, EventgateError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, EventgateError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EventgateError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                EventgateError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, EventgateError> {
        toml::from_str(toml_str).map_err(|e| {
            EventgateError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `EVENTGATE_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "EVENTGATE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "EVENTGATE_GENERAL_LOG_FORMAT");

        // Filter
        override_string(&mut self.filter.allow_list, "EVENTGATE_FILTER_ALLOW_LIST");
        override_string(&mut self.filter.deny_list, "EVENTGATE_FILTER_DENY_LIST");
        override_bool(
            &mut self.filter.allow_privileged,
            "EVENTGATE_FILTER_ALLOW_PRIVILEGED",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 필터 스펙 문법과 마스크 경로는 각 엔진이 빌드 시점에 검증합니다.
    pub fn validate(&self) -> Result<(), EventgateError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        for (idx, field_filter) in self.mask.field_filters.iter().enumerate() {
            if field_filter.fields.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("mask.field_filters[{idx}].fields"),
                    reason: "must list at least one field path".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 이벤트 필터 설정
///
/// 허용/거부 목록은 한 줄에 JSON 객체 하나인 필터 스펙 텍스트입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// 허용 목록 (비어있으면 모든 이벤트 허용)
    pub allow_list: String,
    /// 거부 목록
    pub deny_list: String,
    /// 특권 조건(`pid_set`) 허용 여부
    pub allow_privileged: bool,
}

/// 필드 마스크 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// 순서대로 적용되는 필드 필터 목록
    pub field_filters: Vec<FieldFilter>,
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}
