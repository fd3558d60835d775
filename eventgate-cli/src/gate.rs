//! 이벤트 게이트 -- 허용/거부 목록과 필드 필터를 하나로 묶은 처리 단위
//!
//! 설정에서 한 번 컴파일한 뒤 읽기 전용으로 공유합니다.
//!
//! ```text
//! event ─► allow (비어있거나 match_one) ─► deny (match_none) ─► field filters ─► 출력
//!               │ 불일치                        │ 일치
//!               └──────────── 버림 ◄────────────┘
//! ```

use metrics::counter;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use eventgate_core::EventgateConfig;
use eventgate_core::event::RuntimeEvent;
use eventgate_core::metrics as m;
use eventgate_core::types::{FieldFilter, FieldFilterAction};
use eventgate_field_mask::{CompiledFieldFilter, apply_field_filters, compile_field_filters};
use eventgate_filter::{
    FilterBuilder, FilterList, build_filter_list, default_filters, parse_filter_list,
};

use crate::error::CliError;

/// 이벤트 처리 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// 전달 (필드 필터 적용 여부 포함)
    Deliver { event: RuntimeEvent, masked: bool },
    /// 필터 목록에 의해 버려짐
    Drop,
}

/// 컴파일된 허용/거부 목록과 필드 필터
#[derive(Debug)]
pub struct EventGate {
    allow: FilterList,
    deny: FilterList,
    field_filters: Vec<CompiledFieldFilter>,
}

impl EventGate {
    /// 설정에서 게이트를 컴파일합니다.
    ///
    /// 어느 하나라도 실패하면 전체가 실패합니다. 부분적으로 구성된 게이트는 없습니다.
    pub fn build(cancel: &CancellationToken, config: &EventgateConfig) -> Result<Self, CliError> {
        let builders = default_filters();
        let allow_privileged = config.filter.allow_privileged;

        let allow = compile_list(
            cancel,
            "allow_list",
            &config.filter.allow_list,
            allow_privileged,
            &builders,
        )?;
        let deny = compile_list(
            cancel,
            "deny_list",
            &config.filter.deny_list,
            allow_privileged,
            &builders,
        )?;
        let field_filters = compile_field_filters(&config.mask.field_filters)?;

        debug!(
            allow = allow.len(),
            deny = deny.len(),
            field_filters = field_filters.len(),
            "event gate compiled"
        );

        Ok(Self {
            allow,
            deny,
            field_filters,
        })
    }

    /// 허용 목록이 비어있거나 매칭되고, 거부 목록과 매칭되지 않으면 `true`.
    pub fn admits(&self, event: &RuntimeEvent) -> bool {
        (self.allow.is_empty() || self.allow.match_one(event)) && self.deny.match_none(event)
    }

    /// 이벤트 하나를 처리합니다.
    pub fn process(&self, mut event: RuntimeEvent) -> Verdict {
        let kind = event.kind().map(|k| k.as_str()).unwrap_or("UNKNOWN");
        counter!(m::EVENTS_TOTAL, m::LABEL_EVENT_KIND => kind).increment(1);

        if !self.admits(&event) {
            trace!(event_kind = kind, "event dropped by filter lists");
            counter!(m::EVENTS_FILTERED_TOTAL, m::LABEL_EVENT_KIND => kind).increment(1);
            return Verdict::Drop;
        }

        let masked = apply_field_filters(&self.field_filters, &mut event);
        if masked {
            counter!(m::EVENTS_MASKED_TOTAL, m::LABEL_EVENT_KIND => kind).increment(1);
        }
        Verdict::Deliver { event, masked }
    }

    /// 컴파일 결과 요약
    pub fn summary(&self) -> GateSummary {
        GateSummary {
            allow_filters: self.allow.len(),
            deny_filters: self.deny.len(),
            field_filters: self
                .field_filters
                .iter()
                .map(FieldFilterSummary::from)
                .collect(),
        }
    }
}

fn compile_list(
    cancel: &CancellationToken,
    list: &'static str,
    text: &str,
    allow_privileged: bool,
    builders: &[Box<dyn FilterBuilder>],
) -> Result<FilterList, CliError> {
    parse_filter_list(text, allow_privileged)
        .and_then(|specs| build_filter_list(cancel, &specs, builders))
        .map_err(|source| CliError::FilterList { list, source })
}

/// 게이트 요약 (`check` 리포트에 사용)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateSummary {
    /// 허용 목록 필터 수
    pub allow_filters: usize,
    /// 거부 목록 필터 수
    pub deny_filters: usize,
    /// 필드 필터 목록
    pub field_filters: Vec<FieldFilterSummary>,
}

/// 필드 필터 하나의 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldFilterSummary {
    /// include / exclude
    pub action: FieldFilterAction,
    /// 적용 대상 이벤트 종류 (비어있으면 전체)
    pub event_set: Vec<String>,
    /// `event_set` 반전 여부
    pub invert_event_set: bool,
    /// 정규화된 마스크 경로
    pub paths: Vec<String>,
}

impl From<&CompiledFieldFilter> for FieldFilterSummary {
    fn from(compiled: &CompiledFieldFilter) -> Self {
        let FieldFilter {
            event_set,
            invert_event_set,
            ..
        } = compiled.filter();
        Self {
            action: compiled.action(),
            event_set: event_set.iter().map(|k| k.as_str().to_owned()).collect(),
            invert_event_set: *invert_event_set,
            paths: compiled.mask().paths(),
        }
    }
}
