//! 이벤트 종류 필터 (`event_set`)

use std::collections::HashSet;

use tokio_util::sync::CancellationToken;

use eventgate_core::event::RuntimeEvent;

use crate::builder::{FilterBuilder, FilterFn};
use crate::error::FilterError;
use crate::spec::FilterSpec;

/// 이벤트 종류가 `event_set`에 속하면 매칭됩니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventTypeFilter;

impl FilterBuilder for EventTypeFilter {
    fn name(&self) -> &'static str {
        "event_set"
    }

    fn on_build_filter(
        &self,
        _cancel: &CancellationToken,
        spec: &FilterSpec,
    ) -> Result<Option<Vec<FilterFn>>, FilterError> {
        if spec.event_set.is_empty() {
            return Ok(None);
        }

        let kinds: HashSet<_> = spec.event_set.iter().copied().collect();
        let predicate: FilterFn = Box::new(move |event: &RuntimeEvent| {
            event.kind().is_some_and(|kind| kinds.contains(&kind))
        });
        Ok(Some(vec![predicate]))
    }
}
