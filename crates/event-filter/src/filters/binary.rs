//! 바이너리 경로 필터 (`binary_regex`, `parent_binary_regex`)

use tokio_util::sync::CancellationToken;

use eventgate_core::event::RuntimeEvent;

use super::compile_patterns;
use crate::builder::{FilterBuilder, FilterFn};
use crate::error::FilterError;
use crate::spec::FilterSpec;

/// 프로세스 바이너리 경로가 정규식 중 하나와 매칭되면 참입니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryRegexFilter;

impl FilterBuilder for BinaryRegexFilter {
    fn name(&self) -> &'static str {
        "binary_regex"
    }

    fn on_build_filter(
        &self,
        cancel: &CancellationToken,
        spec: &FilterSpec,
    ) -> Result<Option<Vec<FilterFn>>, FilterError> {
        if spec.binary_regex.is_empty() {
            return Ok(None);
        }

        let patterns = compile_patterns(cancel, self.name(), &spec.binary_regex)?;
        let predicate: FilterFn = Box::new(move |event: &RuntimeEvent| {
            event
                .process()
                .is_some_and(|process| patterns.is_match(&process.binary))
        });
        Ok(Some(vec![predicate]))
    }
}

/// 부모 프로세스 바이너리 경로가 정규식 중 하나와 매칭되면 참입니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentBinaryRegexFilter;

impl FilterBuilder for ParentBinaryRegexFilter {
    fn name(&self) -> &'static str {
        "parent_binary_regex"
    }

    fn on_build_filter(
        &self,
        cancel: &CancellationToken,
        spec: &FilterSpec,
    ) -> Result<Option<Vec<FilterFn>>, FilterError> {
        if spec.parent_binary_regex.is_empty() {
            return Ok(None);
        }

        let patterns = compile_patterns(cancel, self.name(), &spec.parent_binary_regex)?;
        let predicate: FilterFn = Box::new(move |event: &RuntimeEvent| {
            event
                .parent()
                .is_some_and(|parent| patterns.is_match(&parent.binary))
        });
        Ok(Some(vec![predicate]))
    }
}
