#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use eventgate_core::event::{
    Container, KprobeArgument, Pod, Process, ProcessExec, ProcessKprobe, RuntimeEvent,
};
use eventgate_field_mask::NestedMask;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 마스크 경로 (최대 16개로 제한)
    paths: Vec<String>,
    binary: String,
    namespace: String,
    label_key: String,
    label_value: String,
    pid: u32,
    kprobe: bool,
}

fn event_from(input: &FuzzInput) -> RuntimeEvent {
    let process = Process {
        pid: input.pid,
        binary: input.binary.clone(),
        pod: Some(Pod {
            namespace: input.namespace.clone(),
            container: Some(Container {
                maybe_exec_probe: input.pid % 2 == 0,
                ..Default::default()
            }),
            pod_labels: [(input.label_key.clone(), input.label_value.clone())]
                .into_iter()
                .collect(),
            ..Default::default()
        }),
        ..Default::default()
    };

    if input.kprobe {
        RuntimeEvent::from(ProcessKprobe {
            process: Some(process),
            args: vec![KprobeArgument {
                label: input.label_key.clone(),
                string_arg: input.label_value.clone(),
                int_arg: i64::from(input.pid),
            }],
            ..Default::default()
        })
    } else {
        RuntimeEvent::from(ProcessExec {
            process: Some(process.clone()),
            parent: Some(process),
            ancestors: vec![],
        })
    }
}

fuzz_target!(|input: FuzzInput| {
    let paths: Vec<&str> = input.paths.iter().take(16).map(String::as_str).collect();
    let mask = NestedMask::from_paths(&paths);

    // filter는 멱등이어야 함
    let mut filtered = event_from(&input);
    mask.filter(&mut filtered);
    let once = filtered.clone();
    mask.filter(&mut filtered);
    assert_eq!(filtered, once);

    // prune도 멱등이어야 함
    let mut pruned = event_from(&input);
    mask.prune(&mut pruned);
    let once = pruned.clone();
    mask.prune(&mut pruned);
    assert_eq!(pruned, once);

    // overwrite도 멱등이어야 함
    let source = event_from(&input);
    let mut dest = RuntimeEvent::default();
    mask.overwrite(&source, &mut dest);
    let once = dest.clone();
    mask.overwrite(&source, &mut dest);
    assert_eq!(dest, once);

    // 엄격 빌드가 성공하면 관대한 빌드와 같은 마스크
    if let Ok(strict) = NestedMask::try_from_paths(&paths) {
        assert_eq!(strict, mask);
    }
});
