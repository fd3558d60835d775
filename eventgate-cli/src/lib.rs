//! eventgate CLI 라이브러리
//!
//! 통합 테스트를 위해 내부 모듈을 노출합니다.
//! 실제 실행은 `eventgate` 바이너리(main.rs)를 사용합니다.

pub mod cli;
pub mod commands;
pub mod error;
pub mod gate;
pub mod logging;
pub mod output;
