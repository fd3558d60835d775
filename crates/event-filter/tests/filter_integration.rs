//! 통합 테스트 -- 스펙 파싱 → 필터 목록 빌드 → 이벤트 매칭 흐름 검증

use std::sync::Arc;

use eventgate_core::error::{EventgateError, FilterSetupError};
use eventgate_core::event::{EventKind, RuntimeEvent};
use eventgate_filter::{
    FilterError, FilterList, FilterSpec, build_filter_list, default_filters, parse_filter_list,
};
use tokio_util::sync::CancellationToken;

const HOST_EXEC: &str = r#"{"process_exec":{"process":{"pid":4242,"binary":"/usr/sbin/iptables","arguments":"-L -n"},"parent":{"pid":1,"binary":"/usr/lib/systemd/systemd"}},"node_name":"worker-1"}"#;

const KUBE_PROBE: &str = r#"{"process_exec":{"process":{"pid":900,"binary":"/bin/grpc_health_probe","arguments":"-addr=:8080","pod":{"namespace":"kube-system","name":"coredns-5d78c9869d-x2x7t","container":{"id":"containerd://9f","name":"coredns","maybe_exec_probe":true}}},"parent":{"pid":880,"binary":"/usr/bin/runc"}},"node_name":"worker-1"}"#;

const APP_KPROBE: &str = r#"{"process_kprobe":{"process":{"pid":31337,"binary":"/usr/bin/curl","arguments":"-s http://169.254.169.254/latest/meta-data","pod":{"namespace":"prod","name":"api-7d9","container":{"id":"containerd://1a","name":"api"}}},"function_name":"tcp_connect","action":"POST"},"node_name":"worker-2"}"#;

const APP_EXIT: &str = r#"{"process_exit":{"process":{"pid":31337,"binary":"/usr/bin/curl","pod":{"namespace":"prod","name":"api-7d9"}},"signal":"SIGKILL","status":0},"node_name":"worker-2"}"#;

fn parse_event(line: &str) -> RuntimeEvent {
    RuntimeEvent::from_json(line).expect("event should parse")
}

fn compile(text: &str, allow_privileged: bool) -> Result<FilterList, FilterError> {
    let specs = parse_filter_list(text, allow_privileged)?;
    build_filter_list(&CancellationToken::new(), &specs, &default_filters())
}

/// 허용 목록이 비어 있거나 매칭되고, 거부 목록과는 매칭되지 않아야 전달
fn delivered(allow: &FilterList, deny: &FilterList, event: &RuntimeEvent) -> bool {
    (allow.is_empty() || allow.match_one(event)) && deny.match_none(event)
}

#[test]
fn reference_filter_list_compiles_with_default_filters() {
    let text = r#"{"namespace":["kube-system",""]}
{"health_check":true}
{"binary_regex":["kube.*","iptables"]}
{"binary_regex":["/usr/sbin/.*"],"namespace":["default"]}
{"pid_set":[1,2,3]}
{"event_set":["PROCESS_EXEC"]}
{"arguments_regex":["^--version$"]}"#;

    let list = compile(text, true).expect("reference input should compile");
    assert_eq!(list.len(), 7);
    assert_eq!(list.filters()[3].predicate_count(), 2);
}

#[test]
fn namespace_list_matches_host_and_kube_system() {
    let list = compile(r#"{"namespace":["kube-system",""]}"#, false).unwrap();

    assert!(list.match_one(&parse_event(HOST_EXEC)));
    assert!(list.match_one(&parse_event(KUBE_PROBE)));
    assert!(!list.match_one(&parse_event(APP_KPROBE)));
}

#[test]
fn criteria_within_one_spec_are_conjunctive() {
    let list = compile(
        r#"{"binary_regex":["curl$"],"event_set":["PROCESS_KPROBE"]}"#,
        false,
    )
    .unwrap();

    assert!(list.match_one(&parse_event(APP_KPROBE)));
    // 같은 바이너리지만 이벤트 종류가 다름
    assert!(!list.match_one(&parse_event(APP_EXIT)));
}

#[test]
fn specs_are_disjunctive() {
    let list = compile(
        "{\"event_set\":[\"PROCESS_EXIT\"]}\n{\"parent_binary_regex\":[\"systemd$\"]}",
        false,
    )
    .unwrap();

    assert!(list.match_one(&parse_event(APP_EXIT)));
    assert!(list.match_one(&parse_event(HOST_EXEC)));
    assert!(!list.match_one(&parse_event(APP_KPROBE)));
}

#[test]
fn allow_and_deny_lists_combine() {
    let allow = compile(r#"{"event_set":["PROCESS_EXEC","PROCESS_KPROBE"]}"#, false).unwrap();
    let deny = compile(
        "{\"health_check\":true}\n{\"namespace\":[\"kube-system\"]}",
        false,
    )
    .unwrap();

    assert!(delivered(&allow, &deny, &parse_event(HOST_EXEC)));
    assert!(delivered(&allow, &deny, &parse_event(APP_KPROBE)));
    assert!(!delivered(&allow, &deny, &parse_event(KUBE_PROBE)));
    assert!(!delivered(&allow, &deny, &parse_event(APP_EXIT)));
}

#[test]
fn empty_lists_deliver_everything() {
    let allow = compile("", false).unwrap();
    let deny = compile("\n\n", false).unwrap();

    for line in [HOST_EXEC, KUBE_PROBE, APP_KPROBE, APP_EXIT] {
        assert!(delivered(&allow, &deny, &parse_event(line)));
    }
}

#[test]
fn vacuous_spec_matches_every_event() {
    let list = compile("{}", false).unwrap();
    assert_eq!(list.len(), 1);
    assert!(list.match_one(&parse_event(APP_EXIT)));
    assert!(list.match_one(&RuntimeEvent::default()));
}

#[test]
fn privileged_spec_rejected_without_flag() {
    let err = compile("{\"event_set\":[\"PROCESS_EXEC\"]}\n{\"pid_set\":[4242]}", false)
        .unwrap_err();
    assert!(matches!(err, FilterError::Privileged { line: 2 }));

    let list = compile(r#"{"pid_set":[4242]}"#, true).unwrap();
    assert!(list.match_one(&parse_event(HOST_EXEC)));
    assert!(!list.match_one(&parse_event(APP_KPROBE)));
}

#[test]
fn invalid_regex_fails_whole_build_with_index() {
    let err = compile(
        "{\"namespace\":[\"prod\"]}\n{\"pod_regex\":[\"api-(\"]}",
        false,
    )
    .unwrap_err();

    match err {
        FilterError::Build {
            index, criterion, ..
        } => {
            assert_eq!(index, 1);
            assert_eq!(criterion, "pod_regex");
        }
        other => panic!("expected build error, got {other:?}"),
    }
}

#[test]
fn errors_convert_into_core_error() {
    let err: EventgateError = compile("{\"bogus\":1}", false).unwrap_err().into();
    assert!(matches!(
        err,
        EventgateError::Filter(FilterSetupError::Spec(_))
    ));

    let cancel = CancellationToken::new();
    cancel.cancel();
    let specs = vec![FilterSpec::default()];
    let err: EventgateError = build_filter_list(&cancel, &specs, &default_filters())
        .unwrap_err()
        .into();
    assert!(matches!(
        err,
        EventgateError::Filter(FilterSetupError::Cancelled)
    ));
}

#[test]
fn spec_serializes_back_to_same_vocabulary() {
    let line = r#"{"namespace":["prod"],"event_set":["PROCESS_KPROBE"],"arguments_regex":["metadata"]}"#;
    let specs = parse_filter_list(line, false).unwrap();
    let json = serde_json::to_value(&specs[0]).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "namespace": ["prod"],
            "event_set": ["PROCESS_KPROBE"],
            "arguments_regex": ["metadata"]
        })
    );
    assert_eq!(specs[0].event_set, vec![EventKind::ProcessKprobe]);
}

#[test]
fn compiled_list_is_shared_across_threads() {
    let list = Arc::new(compile(r#"{"binary_regex":["curl"]}"#, false).unwrap());
    let event = Arc::new(parse_event(APP_KPROBE));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let list = Arc::clone(&list);
            let event = Arc::clone(&event);
            std::thread::spawn(move || list.match_one(&event))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[tokio::test]
async fn build_cancelled_from_another_task() {
    let cancel = CancellationToken::new();
    let specs = parse_filter_list(r#"{"binary_regex":["a"]}"#, false).unwrap();

    let trigger = cancel.clone();
    tokio::spawn(async move { trigger.cancel() }).await.unwrap();

    let result = build_filter_list(&cancel, &specs, &default_filters());
    assert!(matches!(result, Err(FilterError::Cancelled)));
}
