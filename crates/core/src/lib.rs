#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod reflect;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{
    ConfigError, EventgateError, FilterSetupError, MaskSetupError, ParseError,
};

// 설정
pub use config::EventgateConfig;

// 이벤트 스키마
pub use event::{
    Capabilities, Container, EventKind, Image, KprobeAction, KprobeArgument, Pod, Process,
    ProcessExec, ProcessExit, ProcessKprobe, ProcessTracepoint, RuntimeEvent,
};

// 리플렉션
pub use reflect::{Cardinality, Field, FieldDescriptor, FieldKind, Message, MessageDescriptor};

// 도메인 타입
pub use types::{FieldFilter, FieldFilterAction};
