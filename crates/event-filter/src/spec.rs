//! 필터 스펙 -- 선언적 필터 레코드와 NDJSON 파서
//!
//! 한 줄에 JSON 객체 하나가 [`FilterSpec`] 하나에 대응합니다.
//!
//! ```text
//! {"namespace":["kube-system",""]}
//! {"binary_regex":["/usr/sbin/.*"],"namespace":["default"]}
//! {"event_set":["PROCESS_EXEC","PROCESS_EXIT"]}
//! ```
//!
//! 한 스펙 안의 조건은 AND, 스펙 사이는 OR로 결합됩니다.

use serde::{Deserialize, Serialize};
use tracing::debug;

use eventgate_core::event::EventKind;

use crate::error::FilterError;

/// 선언적 필터 스펙
///
/// 모든 조건은 선택 사항이며, 비어있는 조건은 설정되지 않은 것으로 봅니다.
/// 알 수 없는 키는 파싱 단계에서 거부합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSpec {
    /// 파드 네임스페이스 (`""`는 파드가 없는 프로세스)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub namespace: Vec<String>,
    /// 헬스체크(exec probe) 여부
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<bool>,
    /// 프로세스 바이너리 경로 정규식
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub binary_regex: Vec<String>,
    /// 부모 프로세스 바이너리 경로 정규식
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parent_binary_regex: Vec<String>,
    /// 파드 이름 정규식
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pod_regex: Vec<String>,
    /// 프로세스 ID 집합 (특권 조건)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pid_set: Vec<u32>,
    /// 이벤트 종류 집합
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub event_set: Vec<EventKind>,
    /// 프로세스 인자 정규식
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments_regex: Vec<String>,
}

impl FilterSpec {
    /// 특권 조건을 포함하는지 확인합니다.
    pub fn is_privileged(&self) -> bool {
        !self.pid_set.is_empty()
    }

    /// 설정된 조건이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// 줄 단위 필터 스펙 목록을 파싱합니다.
///
/// - 빈 줄은 무시하며, 입력이 비어있으면 빈 목록을 반환합니다.
/// - 한 줄이라도 잘못되면 전체가 실패합니다 (부분 결과 없음).
/// - `allow_privileged`가 false이면 `pid_set`을 포함한 스펙을 거부합니다.
pub fn parse_filter_list(
    text: &str,
    allow_privileged: bool,
) -> Result<Vec<FilterSpec>, FilterError> {
    let mut specs = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let spec: FilterSpec = serde_json::from_str(line).map_err(|e| FilterError::Parse {
            line: line_no,
            reason: e.to_string(),
        })?;

        if !allow_privileged && spec.is_privileged() {
            return Err(FilterError::Privileged { line: line_no });
        }

        specs.push(spec);
    }

    debug!(count = specs.len(), allow_privileged, "parsed filter specs");
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_INPUT: &str = r#"{"namespace":["kube-system",""]}
{"health_check":true}
{"binary_regex":["kube.*","iptables"]}
{"binary_regex":["/usr/sbin/.*"],"namespace":["default"]}
{"pid_set":[1]}
{"event_set":["PROCESS_EXEC", "PROCESS_EXIT", "PROCESS_KPROBE", "PROCESS_TRACEPOINT"]}
{"arguments_regex":["^--version$","^-a -b -c$"]}"#;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn parses_one_spec_per_line() {
        let specs = parse_filter_list(REFERENCE_INPUT, true).unwrap();
        let expected = vec![
            FilterSpec {
                namespace: strings(&["kube-system", ""]),
                ..Default::default()
            },
            FilterSpec {
                health_check: Some(true),
                ..Default::default()
            },
            FilterSpec {
                binary_regex: strings(&["kube.*", "iptables"]),
                ..Default::default()
            },
            FilterSpec {
                binary_regex: strings(&["/usr/sbin/.*"]),
                namespace: strings(&["default"]),
                ..Default::default()
            },
            FilterSpec {
                pid_set: vec![1],
                ..Default::default()
            },
            FilterSpec {
                event_set: EventKind::ALL.to_vec(),
                ..Default::default()
            },
            FilterSpec {
                arguments_regex: strings(&["^--version$", "^-a -b -c$"]),
                ..Default::default()
            },
        ];
        assert_eq!(specs, expected);
    }

    #[test]
    fn invalid_json_fails() {
        let err = parse_filter_list("invalid filter json", true).unwrap_err();
        assert!(matches!(err, FilterError::Parse { line: 1, .. }));
    }

    #[test]
    fn empty_input_yields_empty_list() {
        assert!(parse_filter_list("", true).unwrap().is_empty());
        assert!(parse_filter_list("  \n\n\t\n", false).unwrap().is_empty());
    }

    #[test]
    fn pid_set_requires_privilege() {
        let result = parse_filter_list(r#"{"pid_set":[1]}"#, false);
        assert!(matches!(result, Err(FilterError::Privileged { line: 1 })));
    }

    #[test]
    fn privileged_spec_anywhere_fails_whole_input() {
        let text = "{\"namespace\":[\"a\"]}\n\n{\"pid_set\":[7]}\n";
        let result = parse_filter_list(text, false);
        assert!(matches!(result, Err(FilterError::Privileged { line: 3 })));
    }

    #[test]
    fn unknown_keys_are_rejected_even_when_privileged() {
        let result = parse_filter_list(r#"{"namespace":["a"],"labels":["x"]}"#, true);
        assert!(matches!(result, Err(FilterError::Parse { line: 1, .. })));
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let text = "{\"namespace\":[\"a\"]}\n{\"event_set\":[\"PROCESS_LOADER\"]}";
        let result = parse_filter_list(text, true);
        assert!(matches!(result, Err(FilterError::Parse { line: 2, .. })));
    }

    #[test]
    fn blank_lines_do_not_shift_order() {
        let text = "\n{\"pid_set\":[2]}\n\n{\"pid_set\":[1]}\n";
        let specs = parse_filter_list(text, true).unwrap();
        assert_eq!(specs[0].pid_set, vec![2]);
        assert_eq!(specs[1].pid_set, vec![1]);
    }

    #[test]
    fn empty_object_is_empty_spec() {
        let specs = parse_filter_list("{}", false).unwrap();
        assert_eq!(specs.len(), 1);
        assert!(specs[0].is_empty());
        assert!(!specs[0].is_privileged());
    }

    #[test]
    fn serializes_only_set_criteria() {
        let spec = FilterSpec {
            health_check: Some(false),
            event_set: vec![EventKind::ProcessKprobe],
            ..Default::default()
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"health_check":false,"event_set":["PROCESS_KPROBE"]}"#);

        let reparsed = parse_filter_list(&json, false).unwrap();
        assert_eq!(reparsed, vec![spec]);
    }
}
