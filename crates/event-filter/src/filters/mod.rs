//! 내장 필터 빌더
//!
//! 각 빌더는 [`FilterSpec`](crate::spec::FilterSpec)의 조건 하나를 담당합니다.
//!
//! | 빌더 | 조건 |
//! |---|---|
//! | [`EventTypeFilter`] | `event_set` |
//! | [`NamespaceFilter`] | `namespace` |
//! | [`HealthCheckFilter`] | `health_check` |
//! | [`BinaryRegexFilter`] | `binary_regex` |
//! | [`ParentBinaryRegexFilter`] | `parent_binary_regex` |
//! | [`PodRegexFilter`] | `pod_regex` |
//! | [`PidFilter`] | `pid_set` |
//! | [`ArgumentsRegexFilter`] | `arguments_regex` |

mod arguments;
mod binary;
mod event_type;
mod health_check;
mod namespace;
mod pid;
mod pod;

pub use arguments::ArgumentsRegexFilter;
pub use binary::{BinaryRegexFilter, ParentBinaryRegexFilter};
pub use event_type::EventTypeFilter;
pub use health_check::HealthCheckFilter;
pub use namespace::NamespaceFilter;
pub use pid::PidFilter;
pub use pod::PodRegexFilter;

use regex::RegexSet;
use tokio_util::sync::CancellationToken;

use crate::builder::FilterBuilder;
use crate::error::FilterError;

/// 모든 내장 빌더를 고정된 순서로 반환합니다.
pub fn default_filters() -> Vec<Box<dyn FilterBuilder>> {
    vec![
        Box::new(BinaryRegexFilter),
        Box::new(ParentBinaryRegexFilter),
        Box::new(HealthCheckFilter),
        Box::new(NamespaceFilter),
        Box::new(PodRegexFilter),
        Box::new(PidFilter),
        Box::new(EventTypeFilter),
        Box::new(ArgumentsRegexFilter),
    ]
}

/// 정규식 목록을 하나의 집합으로 컴파일합니다. 하나라도 매칭되면 참입니다.
fn compile_patterns(
    cancel: &CancellationToken,
    criterion: &str,
    patterns: &[String],
) -> Result<RegexSet, FilterError> {
    if cancel.is_cancelled() {
        return Err(FilterError::Cancelled);
    }
    RegexSet::new(patterns).map_err(|e| FilterError::InvalidCriterion {
        criterion: criterion.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use eventgate_core::event::{
        Container, Pod, Process, ProcessExec, ProcessExit, ProcessKprobe, RuntimeEvent,
    };

    pub fn process(pid: u32, binary: &str, arguments: &str) -> Process {
        Process {
            pid,
            binary: binary.to_owned(),
            arguments: arguments.to_owned(),
            ..Default::default()
        }
    }

    pub fn with_pod(mut process: Process, namespace: &str, name: &str, probe: bool) -> Process {
        process.pod = Some(Pod {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            container: Some(Container {
                maybe_exec_probe: probe,
                ..Default::default()
            }),
            ..Default::default()
        });
        process
    }

    pub fn exec(process: Process, parent: Option<Process>) -> RuntimeEvent {
        RuntimeEvent::from(ProcessExec {
            process: Some(process),
            parent,
            ancestors: vec![],
        })
    }

    pub fn exit(process: Process) -> RuntimeEvent {
        RuntimeEvent::from(ProcessExit {
            process: Some(process),
            ..Default::default()
        })
    }

    pub fn kprobe(process: Process) -> RuntimeEvent {
        RuntimeEvent::from(ProcessKprobe {
            process: Some(process),
            function_name: "tcp_connect".to_owned(),
            ..Default::default()
        })
    }
}
