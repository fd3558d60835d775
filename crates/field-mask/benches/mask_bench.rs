//! 필드 마스크 벤치마크
//!
//! 마스크 구성 비용과 filter / prune / overwrite 적용 성능을 측정합니다.

use std::collections::BTreeMap;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use eventgate_core::event::{Container, Image, Pod, Process, ProcessExec, RuntimeEvent};
use eventgate_field_mask::NestedMask;

fn create_process(pid: u32) -> Process {
    Process {
        exec_id: format!("exec-{pid}"),
        pid,
        uid: 1000,
        cwd: "/srv".to_owned(),
        binary: "/usr/bin/python3".to_owned(),
        arguments: "manage.py runserver 0.0.0.0:8000".to_owned(),
        pod: Some(Pod {
            namespace: "prod".to_owned(),
            name: format!("web-{pid}"),
            container: Some(Container {
                id: "containerd://abcdef".to_owned(),
                name: "web".to_owned(),
                image: Some(Image {
                    id: "sha256:0123".to_owned(),
                    name: "web:1.0".to_owned(),
                }),
                ..Default::default()
            }),
            pod_labels: (0..8)
                .map(|i| (format!("label-{i}"), format!("value-{i}")))
                .collect::<BTreeMap<_, _>>(),
            workload: "web".to_owned(),
        }),
        ..Default::default()
    }
}

fn create_event() -> RuntimeEvent {
    RuntimeEvent::from(ProcessExec {
        process: Some(create_process(4000)),
        parent: Some(create_process(1)),
        ancestors: (2..6).map(create_process).collect(),
    })
}

fn bench_build(c: &mut Criterion) {
    let paths: Vec<String> = (0..32)
        .map(|i| format!("process_exec.process.pod.pod_labels.label-{i}"))
        .collect();

    c.bench_function("mask_build_32_paths", |b| {
        b.iter(|| NestedMask::from_paths(black_box(&paths)))
    });
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_filter");
    let cases = [
        ("leaf", vec!["process_exec.process"]),
        (
            "nested",
            vec![
                "process_exec.process.binary",
                "process_exec.process.pod.namespace",
                "process_exec.ancestors.binary",
            ],
        ),
        (
            "map_keys",
            vec!["process_exec.process.pod.pod_labels.label-1"],
        ),
    ];

    for (name, paths) in cases {
        let mask = NestedMask::from_paths(&paths);
        group.bench_with_input(BenchmarkId::new("filter", name), &mask, |b, mask| {
            b.iter_batched(
                create_event,
                |mut event| {
                    mask.filter(&mut event);
                    event
                },
                criterion::BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("prune", name), &mask, |b, mask| {
            b.iter_batched(
                create_event,
                |mut event| {
                    mask.prune(&mut event);
                    event
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_overwrite(c: &mut Criterion) {
    let source = create_event();
    let mask = NestedMask::from_paths([
        "process_exec.process.pid",
        "process_exec.process.pod.pod_labels",
        "process_exec.parent",
    ]);

    c.bench_function("mask_overwrite", |b| {
        b.iter_batched(
            RuntimeEvent::default,
            |mut dest| {
                mask.overwrite(black_box(&source), &mut dest);
                dest
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_build, bench_filter, bench_overwrite);
criterion_main!(benches);
