#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`mask`]: [`NestedMask`] 구성과 filter / prune / overwrite
//! - [`field_filter`]: 이벤트 종류별 include/exclude 필드 필터
//! - [`error`]: 도메인 에러 타입

pub mod error;
pub mod field_filter;
pub mod mask;

// --- 주요 타입 re-export ---

pub use error::MaskError;
pub use field_filter::{CompiledFieldFilter, apply_field_filters, compile_field_filters};
pub use mask::{NestedMask, filter, overwrite, prune};
