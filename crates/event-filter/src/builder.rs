//! 필터 빌더 -- 스펙을 실행 가능한 조건으로 컴파일
//!
//! [`FilterBuilder`]는 [`FilterSpec`]의 조건 중 자신이 아는 것을 술어로 컴파일합니다.
//! [`build_filter_list`]는 모든 스펙을 모든 빌더에 제공하여 [`FilterList`]를 만듭니다.
//!
//! - 한 스펙에서 나온 술어는 AND로 결합됩니다 ([`CompiledFilter`]).
//! - 목록의 필터는 OR로 결합됩니다 ([`FilterList::match_one`]).
//! - 어떤 빌더도 인식하지 못한 스펙은 모든 이벤트와 매칭됩니다.

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use eventgate_core::event::RuntimeEvent;

use crate::error::FilterError;
use crate::spec::FilterSpec;

/// 컴파일된 술어 하나
pub type FilterFn = Box<dyn Fn(&RuntimeEvent) -> bool + Send + Sync>;

/// 필터 조건 빌더
///
/// 설치된 빌더 집합은 호출자가 명시적으로 넘깁니다 (전역 레지스트리 없음).
pub trait FilterBuilder: Send + Sync {
    /// 빌더 이름 (로그용)
    fn name(&self) -> &'static str;

    /// 스펙에서 이 빌더가 아는 조건을 컴파일합니다.
    ///
    /// 해당 조건이 없으면 `Ok(None)`을 반환합니다.
    /// 잘못된 조건은 [`FilterError::InvalidCriterion`]으로 보고합니다.
    fn on_build_filter(
        &self,
        cancel: &CancellationToken,
        spec: &FilterSpec,
    ) -> Result<Option<Vec<FilterFn>>, FilterError>;
}

/// 한 스펙에서 컴파일된 필터 (술어의 AND)
pub struct CompiledFilter {
    predicates: Vec<FilterFn>,
}

impl CompiledFilter {
    /// 모든 술어가 참이면 매칭됩니다. 술어가 없으면 항상 매칭됩니다.
    pub fn matches(&self, event: &RuntimeEvent) -> bool {
        self.predicates.iter().all(|predicate| predicate(event))
    }

    /// 술어 개수
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }
}

impl fmt::Debug for CompiledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFilter")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// 컴파일된 필터 목록 (필터의 OR)
///
/// 빌드 후에는 읽기 전용이며 여러 작업자가 공유할 수 있습니다.
#[derive(Debug, Default)]
pub struct FilterList {
    filters: Vec<CompiledFilter>,
}

impl FilterList {
    /// 빈 목록을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 필터 개수
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// 컴파일된 필터 목록
    pub fn filters(&self) -> &[CompiledFilter] {
        &self.filters
    }

    /// 선언 순서대로 평가하여 하나라도 매칭되면 `true`. 빈 목록은 `false`.
    pub fn match_one(&self, event: &RuntimeEvent) -> bool {
        self.filters.iter().any(|filter| filter.matches(event))
    }

    /// 어떤 필터와도 매칭되지 않으면 `true`. 거부 목록 평가에 사용합니다.
    pub fn match_none(&self, event: &RuntimeEvent) -> bool {
        !self.match_one(event)
    }
}

/// 스펙 목록을 필터 목록으로 컴파일합니다.
///
/// 모든 빌더가 모든 스펙을 받습니다. 빌더가 실패하면 스펙 위치를 붙여
/// [`FilterError::Build`]로 전체가 실패하며, 취소되면 [`FilterError::Cancelled`]를
/// 반환합니다. 부분 결과는 반환하지 않습니다.
pub fn build_filter_list(
    cancel: &CancellationToken,
    specs: &[FilterSpec],
    builders: &[Box<dyn FilterBuilder>],
) -> Result<FilterList, FilterError> {
    let mut filters = Vec::with_capacity(specs.len());

    for (index, spec) in specs.iter().enumerate() {
        let mut predicates = Vec::new();

        for builder in builders {
            if cancel.is_cancelled() {
                return Err(FilterError::Cancelled);
            }

            let built = builder
                .on_build_filter(cancel, spec)
                .map_err(|err| match err {
                    FilterError::InvalidCriterion { criterion, reason } => FilterError::Build {
                        index,
                        criterion,
                        reason,
                    },
                    other => other,
                })?;

            if let Some(built) = built {
                predicates.extend(built);
            }
        }

        if predicates.is_empty() {
            debug!(index, "filter spec has no recognized criteria, matches every event");
        }
        filters.push(CompiledFilter { predicates });
    }

    if cancel.is_cancelled() {
        return Err(FilterError::Cancelled);
    }

    debug!(
        count = filters.len(),
        builders = builders.len(),
        "compiled filter list"
    );
    Ok(FilterList { filters })
}
