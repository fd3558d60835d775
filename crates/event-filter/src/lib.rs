#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`spec`]: 필터 스펙 레코드와 NDJSON 파서
//! - [`builder`]: 필터 빌더 trait, 필터 목록 컴파일과 매칭
//! - [`filters`]: 내장 필터 빌더 (이벤트 종류, 네임스페이스, 정규식 등)
//! - [`error`]: 도메인 에러 타입

pub mod builder;
pub mod error;
pub mod filters;
pub mod spec;

// --- 주요 타입 re-export ---

pub use builder::{CompiledFilter, FilterBuilder, FilterFn, FilterList, build_filter_list};
pub use error::FilterError;
pub use filters::{
    ArgumentsRegexFilter, BinaryRegexFilter, EventTypeFilter, HealthCheckFilter, NamespaceFilter,
    ParentBinaryRegexFilter, PidFilter, PodRegexFilter, default_filters,
};
pub use spec::{FilterSpec, parse_filter_list};
