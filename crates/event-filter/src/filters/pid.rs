//! 프로세스 ID 필터 (`pid_set`, 특권 조건)

use std::collections::HashSet;

use tokio_util::sync::CancellationToken;

use eventgate_core::event::RuntimeEvent;

use crate::builder::{FilterBuilder, FilterFn};
use crate::error::FilterError;
use crate::spec::FilterSpec;

/// 프로세스 ID가 `pid_set`에 속하면 매칭됩니다.
///
/// 파서가 권한 플래그로 이 조건을 막으므로, 빌더 단계에서는 검사하지 않습니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct PidFilter;

impl FilterBuilder for PidFilter {
    fn name(&self) -> &'static str {
        "pid_set"
    }

    fn on_build_filter(
        &self,
        _cancel: &CancellationToken,
        spec: &FilterSpec,
    ) -> Result<Option<Vec<FilterFn>>, FilterError> {
        if spec.pid_set.is_empty() {
            return Ok(None);
        }

        let pids: HashSet<u32> = spec.pid_set.iter().copied().collect();
        let predicate: FilterFn = Box::new(move |event: &RuntimeEvent| {
            event
                .process()
                .is_some_and(|process| pids.contains(&process.pid))
        });
        Ok(Some(vec![predicate]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::{exec, kprobe, process};

    #[test]
    fn matches_listed_pids() {
        let spec = FilterSpec {
            pid_set: vec![1, 42],
            ..Default::default()
        };
        let predicate = PidFilter
            .on_build_filter(&CancellationToken::new(), &spec)
            .unwrap()
            .unwrap()
            .remove(0);

        assert!(predicate(&exec(process(42, "/bin/sh", ""), None)));
        assert!(predicate(&kprobe(process(1, "/sbin/init", ""))));
        assert!(!predicate(&exec(process(7, "/bin/sh", ""), None)));
    }
}
