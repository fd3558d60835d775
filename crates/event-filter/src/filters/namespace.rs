//! 네임스페이스 필터 (`namespace`)

use std::collections::HashSet;

use tokio_util::sync::CancellationToken;

use eventgate_core::event::RuntimeEvent;

use crate::builder::{FilterBuilder, FilterFn};
use crate::error::FilterError;
use crate::spec::FilterSpec;

/// 프로세스의 파드 네임스페이스가 목록에 있으면 매칭됩니다.
///
/// 빈 문자열(`""`)은 파드에 속하지 않은 프로세스(호스트 프로세스)를 뜻합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespaceFilter;

impl FilterBuilder for NamespaceFilter {
    fn name(&self) -> &'static str {
        "namespace"
    }

    fn on_build_filter(
        &self,
        _cancel: &CancellationToken,
        spec: &FilterSpec,
    ) -> Result<Option<Vec<FilterFn>>, FilterError> {
        if spec.namespace.is_empty() {
            return Ok(None);
        }

        let namespaces: HashSet<String> = spec.namespace.iter().cloned().collect();
        let predicate: FilterFn = Box::new(move |event: &RuntimeEvent| {
            let Some(process) = event.process() else {
                return false;
            };
            let namespace = process
                .pod
                .as_ref()
                .map(|pod| pod.namespace.as_str())
                .unwrap_or_default();
            namespaces.contains(namespace)
        });
        Ok(Some(vec![predicate]))
    }
}
