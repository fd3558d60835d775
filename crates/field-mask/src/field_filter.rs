//! 이벤트 종류별 필드 필터
//!
//! 설정의 [`FieldFilter`]를 [`CompiledFieldFilter`]로 한 번 컴파일해 두고
//! 이벤트마다 [`apply_field_filters`]로 순서대로 적용합니다.

use tracing::debug;

use eventgate_core::event::RuntimeEvent;
use eventgate_core::reflect::Message;
use eventgate_core::types::{FieldFilter, FieldFilterAction};

use crate::error::MaskError;
use crate::mask::NestedMask;

/// 컴파일된 필드 필터
#[derive(Debug, Clone)]
pub struct CompiledFieldFilter {
    filter: FieldFilter,
    mask: NestedMask,
}

impl CompiledFieldFilter {
    /// 필드 필터를 컴파일합니다.
    ///
    /// 세그먼트가 없는 경로는 [`MaskError::EmptyPath`]로 거부합니다.
    pub fn compile(filter: &FieldFilter) -> Result<Self, MaskError> {
        if let Some((index, path)) = filter
            .fields
            .iter()
            .enumerate()
            .find(|(_, path)| path.split('.').all(str::is_empty))
        {
            return Err(MaskError::EmptyPath {
                index,
                path: path.clone(),
            });
        }

        Ok(Self {
            filter: filter.clone(),
            mask: NestedMask::from_paths(&filter.fields),
        })
    }

    /// 원본 필드 필터 선언
    pub fn filter(&self) -> &FieldFilter {
        &self.filter
    }

    /// 필터 액션
    pub fn action(&self) -> FieldFilterAction {
        self.filter.action
    }

    /// 컴파일된 마스크
    pub fn mask(&self) -> &NestedMask {
        &self.mask
    }

    /// 이벤트에 필터를 적용합니다. 적용했으면 `true`.
    ///
    /// 마스크 경로는 [`RuntimeEvent`]의 페이로드 필드를 기준으로 해석합니다
    /// (예: `process.binary`는 `process_exec.process.binary`).
    pub fn apply(&self, event: &mut RuntimeEvent) -> bool {
        if !self.filter.selects(event.kind()) {
            return false;
        }

        let Some(payload) = payload_mut(event) else {
            return false;
        };
        match self.filter.action {
            FieldFilterAction::Include => self.mask.filter(payload),
            FieldFilterAction::Exclude => self.mask.prune(payload),
        }
        true
    }
}

fn payload_mut(event: &mut RuntimeEvent) -> Option<&mut dyn Message> {
    if let Some(exec) = event.process_exec.as_mut() {
        Some(exec)
    } else if let Some(exit) = event.process_exit.as_mut() {
        Some(exit)
    } else if let Some(kprobe) = event.process_kprobe.as_mut() {
        Some(kprobe)
    } else if let Some(tracepoint) = event.process_tracepoint.as_mut() {
        Some(tracepoint)
    } else {
        None
    }
}

/// 필드 필터 목록을 컴파일합니다. 하나라도 실패하면 전체가 실패합니다.
pub fn compile_field_filters(
    filters: &[FieldFilter],
) -> Result<Vec<CompiledFieldFilter>, MaskError> {
    let compiled = filters
        .iter()
        .map(CompiledFieldFilter::compile)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = compiled.len(), "compiled field filters");
    Ok(compiled)
}

/// 필드 필터를 순서대로 적용합니다. 하나라도 적용되었으면 `true`.
pub fn apply_field_filters(filters: &[CompiledFieldFilter], event: &mut RuntimeEvent) -> bool {
    let mut applied = false;
    for filter in filters {
        applied |= filter.apply(event);
    }
    applied
}
