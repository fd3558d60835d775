//! 메트릭 상수 및 설명 등록
//!
//! 이벤트 처리 메트릭의 이름과 레이블을 중앙에서 정의합니다.
//! 호출 측은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `eventgate_`
//! - 접미어: `_total` (counter)

/// 메트릭 네임스페이스
pub const METRICS_NAMESPACE: &str = "eventgate";

// ─── 레이블 ────────────────────────────────────────────────────────

/// 이벤트 종류 레이블 키 (PROCESS_EXEC, PROCESS_EXIT, ...)
pub const LABEL_EVENT_KIND: &str = "event_kind";

// ─── 이벤트 처리 ───────────────────────────────────────────────────

/// 입력된 전체 이벤트 수 (counter, label: event_kind)
pub const EVENTS_TOTAL: &str = "eventgate_events_total";

/// 필터에 의해 전달되지 않은 이벤트 수 (counter, label: event_kind)
pub const EVENTS_FILTERED_TOTAL: &str = "eventgate_events_filtered_total";

/// 필드 필터가 적용된 이벤트 수 (counter, label: event_kind)
pub const EVENTS_MASKED_TOTAL: &str = "eventgate_events_masked_total";

/// 디코딩에 실패한 입력 라인 수 (counter)
pub const EVENTS_DECODE_ERRORS_TOTAL: &str = "eventgate_events_decode_errors_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 이후 한 번 호출합니다. 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(EVENTS_TOTAL, "Total number of events received");
    describe_counter!(
        EVENTS_FILTERED_TOTAL,
        "Events dropped by the allow/deny filter lists"
    );
    describe_counter!(
        EVENTS_MASKED_TOTAL,
        "Events shaped by at least one field filter"
    );
    describe_counter!(
        EVENTS_DECODE_ERRORS_TOTAL,
        "Input lines that could not be decoded as events"
    );
}
