//! 이벤트 스키마 -- 커널 계측 소스가 생성하는 구조화 이벤트
//!
//! 최상위 메시지는 [`RuntimeEvent`]이며, 프로세스 실행/종료, kprobe, tracepoint 중
//! 정확히 하나의 페이로드를 담습니다. 모든 메시지는 [`reflect_message!`](crate::reflect_message)로
//! [`Message`](crate::reflect::Message)를 구현하므로 필드 마스크 엔진이
//! `process.pod.namespace` 같은 경로로 임의 깊이의 필드에 접근할 수 있습니다.
//!
//! JSON 직렬화 시 기본값 필드는 생략됩니다. 마스크로 지운 필드가
//! 출력에서 사라지도록 하기 위함입니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::reflect::{Field, MapKey};

/// 최대 허용 이벤트 JSON 크기 (바이트)
pub const MAX_EVENT_SIZE: usize = 1024 * 1024;

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// 이벤트 종류 -- 닫힌 열거형
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// 프로세스 실행
    ProcessExec,
    /// 프로세스 종료
    ProcessExit,
    /// kprobe 적중
    ProcessKprobe,
    /// tracepoint 적중
    ProcessTracepoint,
}

impl EventKind {
    /// 모든 이벤트 종류
    pub const ALL: [EventKind; 4] = [
        EventKind::ProcessExec,
        EventKind::ProcessExit,
        EventKind::ProcessKprobe,
        EventKind::ProcessTracepoint,
    ];

    /// 와이어 형식 이름 (예: `PROCESS_EXEC`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProcessExec => "PROCESS_EXEC",
            Self::ProcessExit => "PROCESS_EXIT",
            Self::ProcessKprobe => "PROCESS_KPROBE",
            Self::ProcessTracepoint => "PROCESS_TRACEPOINT",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MapKey for EventKind {
    fn key_string(&self) -> String {
        self.as_str().to_owned()
    }
}

/// kprobe 액션
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KprobeAction {
    #[default]
    Unknown,
    Post,
    FollowFd,
    Sigkill,
    Override,
}

impl Field for KprobeAction {
    fn is_populated(&self) -> bool {
        *self != Self::Unknown
    }

    fn clear(&mut self) {
        *self = Self::Unknown;
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn assign_from(&mut self, source: &dyn Field) -> bool {
        match source.as_any().downcast_ref::<Self>() {
            Some(action) => {
                *self = *action;
                true
            }
            None => false,
        }
    }
}

/// 컨테이너 이미지
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    #[serde(skip_serializing_if = "is_default")]
    pub id: String,
    #[serde(skip_serializing_if = "is_default")]
    pub name: String,
}

crate::reflect_message!(Image {
    id: String Singular,
    name: String Singular,
});

/// 컨테이너
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    #[serde(skip_serializing_if = "is_default")]
    pub id: String,
    #[serde(skip_serializing_if = "is_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    /// 컨테이너 시작 시각 (unix 초)
    #[serde(skip_serializing_if = "is_default")]
    pub start_time: u64,
    /// 컨테이너 PID 네임스페이스 내부의 PID
    #[serde(skip_serializing_if = "is_default")]
    pub pid: u32,
    /// exec 기반 liveness/readiness 프로브일 가능성
    #[serde(skip_serializing_if = "is_default")]
    pub maybe_exec_probe: bool,
}

crate::reflect_message!(Container {
    id: String Singular,
    name: String Singular,
    image: Message Singular,
    start_time: Uint64 Singular,
    pid: Uint32 Singular,
    maybe_exec_probe: Bool Singular,
});

/// Kubernetes 파드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pod {
    #[serde(skip_serializing_if = "is_default")]
    pub namespace: String,
    #[serde(skip_serializing_if = "is_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub pod_labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "is_default")]
    pub workload: String,
}

crate::reflect_message!(Pod {
    namespace: String Singular,
    name: String Singular,
    container: Message Singular,
    pod_labels: String Map,
    workload: String Singular,
});

/// 프로세스 capability 집합
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permitted: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effective: Vec<String>,
}

crate::reflect_message!(Capabilities {
    permitted: String Repeated,
    effective: String Repeated,
});

/// 프로세스
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Process {
    #[serde(skip_serializing_if = "is_default")]
    pub exec_id: String,
    #[serde(skip_serializing_if = "is_default")]
    pub pid: u32,
    #[serde(skip_serializing_if = "is_default")]
    pub uid: u32,
    #[serde(skip_serializing_if = "is_default")]
    pub cwd: String,
    /// 실행 파일 절대 경로
    #[serde(skip_serializing_if = "is_default")]
    pub binary: String,
    /// 공백으로 구분된 실행 인자
    #[serde(skip_serializing_if = "is_default")]
    pub arguments: String,
    #[serde(skip_serializing_if = "is_default")]
    pub flags: String,
    #[serde(skip_serializing_if = "is_default")]
    pub start_time: u64,
    #[serde(skip_serializing_if = "is_default")]
    pub auid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod: Option<Pod>,
    #[serde(skip_serializing_if = "is_default")]
    pub docker: String,
    #[serde(skip_serializing_if = "is_default")]
    pub parent_exec_id: String,
    #[serde(skip_serializing_if = "is_default")]
    pub refcnt: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<Capabilities>,
}

crate::reflect_message!(Process {
    exec_id: String Singular,
    pid: Uint32 Singular,
    uid: Uint32 Singular,
    cwd: String Singular,
    binary: String Singular,
    arguments: String Singular,
    flags: String Singular,
    start_time: Uint64 Singular,
    auid: Uint32 Singular,
    pod: Message Singular,
    docker: String Singular,
    parent_exec_id: String Singular,
    refcnt: Uint32 Singular,
    cap: Message Singular,
});

/// 프로세스 실행 이벤트
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessExec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<Process>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Process>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<Process>,
}

crate::reflect_message!(ProcessExec {
    process: Message Singular,
    parent: Message Singular,
    ancestors: Message Repeated,
});

/// 프로세스 종료 이벤트
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessExit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<Process>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Process>,
    #[serde(skip_serializing_if = "is_default")]
    pub signal: String,
    #[serde(skip_serializing_if = "is_default")]
    pub status: u32,
}

crate::reflect_message!(ProcessExit {
    process: Message Singular,
    parent: Message Singular,
    signal: String Singular,
    status: Uint32 Singular,
});

/// kprobe / tracepoint 인자
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KprobeArgument {
    #[serde(skip_serializing_if = "is_default")]
    pub label: String,
    #[serde(skip_serializing_if = "is_default")]
    pub string_arg: String,
    #[serde(skip_serializing_if = "is_default")]
    pub int_arg: i64,
}

crate::reflect_message!(KprobeArgument {
    label: String Singular,
    string_arg: String Singular,
    int_arg: Int64 Singular,
});

/// kprobe 적중 이벤트
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessKprobe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<Process>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Process>,
    #[serde(skip_serializing_if = "is_default")]
    pub function_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<KprobeArgument>,
    #[serde(skip_serializing_if = "is_default")]
    pub action: KprobeAction,
    /// 정책 태그별 인자 스냅샷
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, KprobeArgument>,
}

crate::reflect_message!(ProcessKprobe {
    process: Message Singular,
    parent: Message Singular,
    function_name: String Singular,
    args: Message Repeated,
    action: Enum Singular,
    tags: Message Map,
});

/// tracepoint 적중 이벤트
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessTracepoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<Process>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Process>,
    #[serde(skip_serializing_if = "is_default")]
    pub subsys: String,
    #[serde(skip_serializing_if = "is_default")]
    pub event: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<KprobeArgument>,
}

crate::reflect_message!(ProcessTracepoint {
    process: Message Singular,
    parent: Message Singular,
    subsys: String Singular,
    event: String Singular,
    args: Message Repeated,
});

/// 최상위 런타임 이벤트
///
/// 네 개의 페이로드 필드 중 최대 하나만 설정됩니다.
/// `From<ProcessExec>` 등의 변환으로 생성하면 이 불변식이 지켜집니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_exec: Option<ProcessExec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_exit: Option<ProcessExit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_kprobe: Option<ProcessKprobe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_tracepoint: Option<ProcessTracepoint>,
    /// 이벤트를 생성한 노드 이름
    #[serde(skip_serializing_if = "is_default")]
    pub node_name: String,
    /// 이벤트 발생 시각 (unix 나노초)
    #[serde(skip_serializing_if = "is_default")]
    pub time: u64,
}

crate::reflect_message!(RuntimeEvent {
    process_exec: Message Singular,
    process_exit: Message Singular,
    process_kprobe: Message Singular,
    process_tracepoint: Message Singular,
    node_name: String Singular,
    time: Uint64 Singular,
});

impl RuntimeEvent {
    /// NDJSON 한 줄을 이벤트로 파싱합니다.
    pub fn from_json(line: &str) -> Result<Self, ParseError> {
        if line.len() > MAX_EVENT_SIZE {
            return Err(ParseError::TooLarge {
                size: line.len(),
                max: MAX_EVENT_SIZE,
            });
        }

        serde_json::from_str(line).map_err(|e| ParseError::Failed {
            offset: e.column(),
            reason: e.to_string(),
        })
    }

    /// 노드 이름을 설정합니다.
    pub fn with_node_name(mut self, node_name: impl Into<String>) -> Self {
        self.node_name = node_name.into();
        self
    }

    /// 설정된 페이로드의 이벤트 종류. 페이로드가 없으면 `None`.
    pub fn kind(&self) -> Option<EventKind> {
        if self.process_exec.is_some() {
            Some(EventKind::ProcessExec)
        } else if self.process_exit.is_some() {
            Some(EventKind::ProcessExit)
        } else if self.process_kprobe.is_some() {
            Some(EventKind::ProcessKprobe)
        } else if self.process_tracepoint.is_some() {
            Some(EventKind::ProcessTracepoint)
        } else {
            None
        }
    }

    /// 페이로드의 프로세스
    pub fn process(&self) -> Option<&Process> {
        if let Some(exec) = &self.process_exec {
            exec.process.as_ref()
        } else if let Some(exit) = &self.process_exit {
            exit.process.as_ref()
        } else if let Some(kprobe) = &self.process_kprobe {
            kprobe.process.as_ref()
        } else if let Some(tracepoint) = &self.process_tracepoint {
            tracepoint.process.as_ref()
        } else {
            None
        }
    }

    /// 페이로드의 부모 프로세스
    pub fn parent(&self) -> Option<&Process> {
        if let Some(exec) = &self.process_exec {
            exec.parent.as_ref()
        } else if let Some(exit) = &self.process_exit {
            exit.parent.as_ref()
        } else if let Some(kprobe) = &self.process_kprobe {
            kprobe.parent.as_ref()
        } else if let Some(tracepoint) = &self.process_tracepoint {
            tracepoint.parent.as_ref()
        } else {
            None
        }
    }
}

impl From<ProcessExec> for RuntimeEvent {
    fn from(exec: ProcessExec) -> Self {
        Self {
            process_exec: Some(exec),
            ..Default::default()
        }
    }
}

impl From<ProcessExit> for RuntimeEvent {
    fn from(exit: ProcessExit) -> Self {
        Self {
            process_exit: Some(exit),
            ..Default::default()
        }
    }
}

impl From<ProcessKprobe> for RuntimeEvent {
    fn from(kprobe: ProcessKprobe) -> Self {
        Self {
            process_kprobe: Some(kprobe),
            ..Default::default()
        }
    }
}

impl From<ProcessTracepoint> for RuntimeEvent {
    fn from(tracepoint: ProcessTracepoint) -> Self {
        Self {
            process_tracepoint: Some(tracepoint),
            ..Default::default()
        }
    }
}

impl fmt::Display for RuntimeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind().map_or("UNDEF", |kind| kind.as_str());
        match self.process() {
            Some(process) => write!(
                f,
                "{kind} node={} pid={} binary={}",
                self.node_name, process.pid, process.binary,
            ),
            None => write!(f, "{kind} node={}", self.node_name),
        }
    }
}
