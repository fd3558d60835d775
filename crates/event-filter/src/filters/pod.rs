//! 파드 이름 필터 (`pod_regex`)

use tokio_util::sync::CancellationToken;

use eventgate_core::event::RuntimeEvent;

use super::compile_patterns;
use crate::builder::{FilterBuilder, FilterFn};
use crate::error::FilterError;
use crate::spec::FilterSpec;

/// 프로세스의 파드 이름이 정규식 중 하나와 매칭되면 참입니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct PodRegexFilter;

impl FilterBuilder for PodRegexFilter {
    fn name(&self) -> &'static str {
        "pod_regex"
    }

    fn on_build_filter(
        &self,
        cancel: &CancellationToken,
        spec: &FilterSpec,
    ) -> Result<Option<Vec<FilterFn>>, FilterError> {
        if spec.pod_regex.is_empty() {
            return Ok(None);
        }

        let patterns = compile_patterns(cancel, self.name(), &spec.pod_regex)?;
        let predicate: FilterFn = Box::new(move |event: &RuntimeEvent| {
            event
                .process()
                .and_then(|process| process.pod.as_ref())
                .is_some_and(|pod| patterns.is_match(&pod.name))
        });
        Ok(Some(vec![predicate]))
    }
}
