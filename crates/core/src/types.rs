//! 도메인 타입 -- 크레이트 간에 공유되는 설정성 타입

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::EventKind;

/// 필드 필터 액션
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFilterAction {
    /// 나열된 필드만 남김 (기본값)
    #[default]
    Include,
    /// 나열된 필드를 지움
    Exclude,
}

impl fmt::Display for FieldFilterAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include => write!(f, "include"),
            Self::Exclude => write!(f, "exclude"),
        }
    }
}

/// 필드 필터 -- 이벤트 종류별로 적용되는 필드 마스크 선언
///
/// ```toml
/// [[mask.field_filters]]
/// event_set = ["PROCESS_EXEC"]
/// fields = ["process.binary", "process.pod.namespace"]
/// action = "include"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldFilter {
    /// 적용 대상 이벤트 종류 (비어있으면 모든 종류)
    pub event_set: Vec<EventKind>,
    /// 점(.)으로 구분된 필드 경로 목록
    pub fields: Vec<String>,
    /// 액션
    pub action: FieldFilterAction,
    /// `event_set` 선택을 반전
    pub invert_event_set: bool,
}

impl FieldFilter {
    /// 이 필터가 주어진 이벤트 종류에 적용되는지 확인합니다.
    ///
    /// 종류를 알 수 없는 이벤트는 `event_set`이 비어있을 때만 선택됩니다.
    pub fn selects(&self, kind: Option<EventKind>) -> bool {
        let listed = self.event_set.is_empty()
            || kind.is_some_and(|kind| self.event_set.contains(&kind));
        listed != self.invert_event_set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec_only() -> FieldFilter {
        FieldFilter {
            event_set: vec![EventKind::ProcessExec],
            fields: vec!["process.binary".to_owned()],
            ..Default::default()
        }
    }

    #[test]
    fn default_action_is_include() {
        assert_eq!(FieldFilterAction::default(), FieldFilterAction::Include);
    }

    #[test]
    fn empty_event_set_selects_everything() {
        let filter = FieldFilter::default();
        assert!(filter.selects(Some(EventKind::ProcessKprobe)));
        assert!(filter.selects(None));
    }

    #[test]
    fn event_set_selects_listed_kinds() {
        let filter = exec_only();
        assert!(filter.selects(Some(EventKind::ProcessExec)));
        assert!(!filter.selects(Some(EventKind::ProcessExit)));
        assert!(!filter.selects(None));
    }

    #[test]
    fn invert_event_set_flips_selection() {
        let filter = FieldFilter {
            invert_event_set: true,
            ..exec_only()
        };
        assert!(!filter.selects(Some(EventKind::ProcessExec)));
        assert!(filter.selects(Some(EventKind::ProcessExit)));
    }

    #[test]
    fn field_filter_from_toml() {
        let filter: FieldFilter = toml::from_str(
            r#"
event_set = ["PROCESS_EXEC", "PROCESS_EXIT"]
fields = ["process.pid"]
action = "exclude"
"#,
        )
        .unwrap();
        assert_eq!(filter.event_set.len(), 2);
        assert_eq!(filter.action, FieldFilterAction::Exclude);
        assert!(!filter.invert_event_set);
    }
}
