//! `eventgate check` 핸들러
//!
//! 필터 목록과 필드 필터를 컴파일만 하고 결과를 보고합니다.
//! 하나라도 실패하면 0이 아닌 코드로 종료합니다.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use eventgate_core::EventgateConfig;

use crate::error::CliError;
use crate::gate::{EventGate, GateSummary};
use crate::output::{OutputWriter, Render};

/// 검사 결과 리포트
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// 설정 출처 (파일 경로 또는 `<defaults>`)
    pub source: String,
    /// 모든 컴파일 성공 여부
    pub valid: bool,
    /// 에러 메시지
    pub errors: Vec<String>,
    /// 컴파일 요약 (성공 시)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<GateSummary>,
}

/// `check`를 실행합니다.
pub fn execute(
    config: &EventgateConfig,
    config_path: Option<&Path>,
    writer: &OutputWriter,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let source = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<defaults>".to_owned());
    info!(source = %source, "checking filters and field masks");

    let (report, result) = check(config, source, cancel);
    writer.render(&report)?;
    result
}

fn check(
    config: &EventgateConfig,
    source: String,
    cancel: &CancellationToken,
) -> (CheckReport, Result<(), CliError>) {
    match EventGate::build(cancel, config) {
        Ok(gate) => (
            CheckReport {
                source,
                valid: true,
                errors: Vec::new(),
                summary: Some(gate.summary()),
            },
            Ok(()),
        ),
        Err(e) => (
            CheckReport {
                source,
                valid: false,
                errors: vec![e.to_string()],
                summary: None,
            },
            Err(e),
        ),
    }
}

impl Render for CheckReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Source: {}", self.source)?;
        if !self.valid {
            writeln!(w, "Status: INVALID")?;
            for error in &self.errors {
                writeln!(w, "  - {}", error)?;
            }
            return Ok(());
        }

        writeln!(w, "Status: OK")?;
        let Some(summary) = &self.summary else {
            return Ok(());
        };
        writeln!(w, "Allow filters: {}", summary.allow_filters)?;
        writeln!(w, "Deny filters:  {}", summary.deny_filters)?;
        writeln!(w, "Field filters: {}", summary.field_filters.len())?;
        for (i, filter) in summary.field_filters.iter().enumerate() {
            let kinds = if filter.event_set.is_empty() {
                "*".to_owned()
            } else {
                filter.event_set.join(",")
            };
            let not = if filter.invert_event_set { "!" } else { "" };
            writeln!(w, "  [{}] {} {}{}", i, filter.action, not, kinds)?;
            for path in &filter.paths {
                writeln!(w, "      {}", path)?;
            }
        }
        Ok(())
    }
}
