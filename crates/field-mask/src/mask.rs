//! 중첩 필드 마스크 -- 경로 트리 구성과 filter / prune / overwrite
//!
//! [`NestedMask`]는 `process.pod.namespace` 같은 점(.) 구분 경로 목록을
//! 필드 이름 트리로 컴파일합니다. 자식이 없는 노드(leaf)는 하위 트리 전체를,
//! 자식이 있는 노드는 나열된 하위 필드만을 의미합니다.
//!
//! 마스크는 [`Message`] 리플렉션 인터페이스만 사용하므로 특정 이벤트 타입에 묶이지 않습니다.
//!
//! # 사용 예시
//! ```
//! use eventgate_core::event::{Pod, Process};
//! use eventgate_field_mask::NestedMask;
//!
//! let mut process = Process {
//!     pid: 42,
//!     binary: "/bin/sh".to_owned(),
//!     pod: Some(Pod {
//!         namespace: "prod".to_owned(),
//!         name: "web-0".to_owned(),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! let mask = NestedMask::from_paths(["binary", "pod.namespace"]);
//! mask.filter(&mut process);
//!
//! assert_eq!(process.pid, 0);
//! assert_eq!(process.binary, "/bin/sh");
//! assert_eq!(process.pod.as_ref().map(|p| p.name.as_str()), Some(""));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use eventgate_core::reflect::{Field, Message};

use crate::error::MaskError;

/// 필드 이름 트리로 표현한 필드 마스크
///
/// 한 번 구성한 뒤에는 읽기 전용으로 여러 이벤트에 공유합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedMask {
    children: BTreeMap<String, NestedMask>,
}

impl NestedMask {
    /// 빈 마스크를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 경로 목록에서 마스크를 구성합니다.
    ///
    /// 빈 세그먼트는 무시합니다. 결과는 경로 순서와 무관한 가지들의 합집합이며,
    /// 먼저 leaf로 선언된 키도 더 긴 경로가 오면 자식을 얻습니다.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mask = Self::new();
        for path in paths {
            mask.insert(path.as_ref());
        }
        mask
    }

    /// 경로 목록에서 마스크를 구성하되, leaf와 branch가 겹치면 거부합니다.
    ///
    /// 한 경로가 다른 경로의 엄격한 접두사이면 [`MaskError::OverlappingPath`]를 반환합니다.
    pub fn try_from_paths<I, S>(paths: I) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: Vec<String> = paths
            .into_iter()
            .map(|path| normalize(path.as_ref()))
            .filter(|path| !path.is_empty())
            .collect();

        for path in &normalized {
            let prefix = format!("{path}.");
            if let Some(longer) = normalized.iter().find(|other| other.starts_with(&prefix)) {
                return Err(MaskError::OverlappingPath {
                    path: path.clone(),
                    longer: longer.clone(),
                });
            }
        }

        Ok(Self::from_paths(&normalized))
    }

    fn insert(&mut self, path: &str) {
        let mut node = self;
        for segment in path.split('.').filter(|segment| !segment.is_empty()) {
            node = node.children.entry(segment.to_owned()).or_default();
        }
    }

    /// 마스크가 비어있는지 확인합니다. 빈 마스크는 제한 없음을 뜻합니다.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// 최상위 키 개수
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// 키에 해당하는 하위 마스크
    pub fn get(&self, key: &str) -> Option<&NestedMask> {
        self.children.get(key)
    }

    /// 정규화된 leaf 경로 목록 (트리 순서)
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths(String::new(), &mut out);
        out
    }

    fn collect_paths(&self, prefix: String, out: &mut Vec<String>) {
        for (key, child) in &self.children {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            if child.is_empty() {
                out.push(path);
            } else {
                child.collect_paths(path, out);
            }
        }
    }

    /// 마스크에 나열된 필드만 남기고 나머지는 지웁니다.
    ///
    /// 빈 마스크는 아무것도 지우지 않습니다.
    pub fn filter(&self, message: &mut dyn Message) {
        if self.is_empty() {
            return;
        }

        for descriptor in message.descriptor().fields {
            let Some(field) = message.field_mut(descriptor.name) else {
                continue;
            };
            match self.children.get(descriptor.name) {
                None => field.clear(),
                Some(child) if child.is_empty() => {}
                Some(child) => child.filter_field(field),
            }
        }
    }

    fn filter_field(&self, field: &mut dyn Field) {
        if let Some(map) = field.as_map_mut() {
            for key in map.keys() {
                match self.children.get(&key) {
                    None => map.remove(&key),
                    Some(child) if child.is_empty() => {}
                    Some(child) => {
                        if let Some(value) = map.message_mut(&key) {
                            child.filter(value);
                        }
                    }
                }
            }
        } else if let Some(list) = field.as_list_mut() {
            for index in 0..list.len() {
                if let Some(element) = list.message_mut(index) {
                    self.filter(element);
                }
            }
        } else if let Some(message) = field.as_message_mut() {
            self.filter(message);
        }
        // 스칼라: 더 내려갈 곳이 없으므로 그대로 유지
    }

    /// 마스크에 나열된 필드를 지우고 나머지는 건드리지 않습니다.
    ///
    /// 빈 마스크는 아무것도 지우지 않습니다.
    pub fn prune(&self, message: &mut dyn Message) {
        for (name, child) in &self.children {
            let Some(field) = message.field_mut(name) else {
                continue;
            };
            if child.is_empty() {
                field.clear();
            } else {
                child.prune_field(field);
            }
        }
    }

    fn prune_field(&self, field: &mut dyn Field) {
        if let Some(map) = field.as_map_mut() {
            for (key, child) in &self.children {
                if !child.is_empty()
                    && let Some(value) = map.message_mut(key)
                {
                    child.prune(value);
                    continue;
                }
                map.remove(key);
            }
        } else if let Some(list) = field.as_list_mut() {
            for index in 0..list.len() {
                if let Some(element) = list.message_mut(index) {
                    self.prune(element);
                }
            }
        } else if let Some(message) = field.as_message_mut() {
            self.prune(message);
        }
    }

    /// 마스크에 나열된 필드를 `source`에서 `dest`로 복사합니다.
    ///
    /// - leaf 키: 종류와 카디널리티가 같으면 값을 복사하고, 원본이 비어있으면 대상을 지웁니다.
    /// - 하위 키가 있는 단일 메시지 필드: 대상 메시지가 없으면 빈 메시지를 만든 뒤 재귀합니다.
    /// - 종류가 다른 필드와 그 밖의 키는 건너뜁니다.
    pub fn overwrite(&self, source: &dyn Message, dest: &mut dyn Message) {
        let source_descriptor = source.descriptor();
        let dest_descriptor = dest.descriptor();

        for (name, child) in &self.children {
            let (Some(source_fd), Some(dest_fd)) =
                (source_descriptor.field(name), dest_descriptor.field(name))
            else {
                continue;
            };
            let (Some(source_field), Some(dest_field)) = (source.field(name), dest.field_mut(name))
            else {
                continue;
            };

            if child.is_empty() {
                if !source_fd.is_compatible(dest_fd) {
                    trace!(
                        field = name.as_str(),
                        source = source_descriptor.name,
                        dest = dest_descriptor.name,
                        "field kind mismatch, skipping overwrite"
                    );
                    continue;
                }
                if !source_field.is_populated() {
                    dest_field.clear();
                } else if !dest_field.assign_from(source_field) {
                    trace!(
                        field = name.as_str(),
                        source = source_descriptor.name,
                        dest = dest_descriptor.name,
                        "field type mismatch, skipping overwrite"
                    );
                }
            } else if source_fd.is_singular_message() && dest_fd.is_singular_message() {
                let Some(dest_message) = dest_field.message_or_insert() else {
                    continue;
                };
                match source_field.as_message() {
                    Some(source_message) => child.overwrite(source_message, dest_message),
                    None => {
                        // 원본 하위 메시지가 없으면 빈 메시지를 원본으로 삼습니다.
                        if let Some(empty) = source_field.new_message() {
                            child.overwrite(empty.as_ref(), dest_message);
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for NestedMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.paths().join(","))
    }
}

fn normalize(path: &str) -> String {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// 경로 목록으로 일회성 마스크를 만들어 [`NestedMask::filter`]를 적용합니다.
///
/// 같은 경로를 여러 메시지에 적용한다면 [`NestedMask`]를 한 번 만들어 재사용하세요.
pub fn filter<I, S>(message: &mut dyn Message, paths: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    NestedMask::from_paths(paths).filter(message);
}

/// 경로 목록으로 일회성 마스크를 만들어 [`NestedMask::prune`]을 적용합니다.
pub fn prune<I, S>(message: &mut dyn Message, paths: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    NestedMask::from_paths(paths).prune(message);
}

/// 경로 목록으로 일회성 마스크를 만들어 [`NestedMask::overwrite`]를 적용합니다.
pub fn overwrite<I, S>(source: &dyn Message, dest: &mut dyn Message, paths: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    NestedMask::from_paths(paths).overwrite(source, dest);
}
