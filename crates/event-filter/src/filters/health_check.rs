//! 헬스체크 필터 (`health_check`)

use tokio_util::sync::CancellationToken;

use eventgate_core::event::{Process, RuntimeEvent};

use crate::builder::{FilterBuilder, FilterFn};
use crate::error::FilterError;
use crate::spec::FilterSpec;

/// 프로세스가 exec probe(헬스체크)일 가능성이 플래그와 같으면 매칭됩니다.
///
/// 파드나 컨테이너 정보가 없는 프로세스는 probe가 아닌 것으로 봅니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthCheckFilter;

fn maybe_exec_probe(process: &Process) -> bool {
    process
        .pod
        .as_ref()
        .and_then(|pod| pod.container.as_ref())
        .is_some_and(|container| container.maybe_exec_probe)
}

impl FilterBuilder for HealthCheckFilter {
    fn name(&self) -> &'static str {
        "health_check"
    }

    fn on_build_filter(
        &self,
        _cancel: &CancellationToken,
        spec: &FilterSpec,
    ) -> Result<Option<Vec<FilterFn>>, FilterError> {
        let Some(health_check) = spec.health_check else {
            return Ok(None);
        };

        let predicate: FilterFn = Box::new(move |event: &RuntimeEvent| {
            event
                .process()
                .is_some_and(|process| maybe_exec_probe(process) == health_check)
        });
        Ok(Some(vec![predicate]))
    }
}
