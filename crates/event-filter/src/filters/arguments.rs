//! 프로세스 인자 필터 (`arguments_regex`)

use tokio_util::sync::CancellationToken;

use eventgate_core::event::RuntimeEvent;

use super::compile_patterns;
use crate::builder::{FilterBuilder, FilterFn};
use crate::error::FilterError;
use crate::spec::FilterSpec;

/// 프로세스 인자 문자열이 정규식 중 하나와 매칭되면 참입니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentsRegexFilter;

impl FilterBuilder for ArgumentsRegexFilter {
    fn name(&self) -> &'static str {
        "arguments_regex"
    }

    fn on_build_filter(
        &self,
        cancel: &CancellationToken,
        spec: &FilterSpec,
    ) -> Result<Option<Vec<FilterFn>>, FilterError> {
        if spec.arguments_regex.is_empty() {
            return Ok(None);
        }

        let patterns = compile_patterns(cancel, self.name(), &spec.arguments_regex)?;
        let predicate: FilterFn = Box::new(move |event: &RuntimeEvent| {
            event
                .process()
                .is_some_and(|process| patterns.is_match(&process.arguments))
        });
        Ok(Some(vec![predicate]))
    }
}
