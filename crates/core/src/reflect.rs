//! 리플렉션 -- 스키마에 독립적인 메시지 필드 접근
//!
//! 필드 마스크 엔진은 특정 메시지 타입을 알지 못한 채로 중첩된 구조를
//! 순회해야 합니다. 이를 위해 각 메시지 타입은 다음을 제공합니다.
//!
//! - [`MessageDescriptor`]: 필드 이름, 종류([`FieldKind`]), 카디널리티([`Cardinality`])
//! - [`Message::field`] / [`Message::field_mut`]: 이름으로 [`Field`] 접근
//!
//! [`Field`]는 스칼라, `Option<M>` (단일 하위 메시지), `Vec<T>` (반복 필드),
//! `BTreeMap<K, V>` (맵 필드)에 대해 제네릭하게 구현되어 있으며,
//! 메시지 타입은 [`reflect_message!`](crate::reflect_message) 매크로로
//! 필드 목록만 선언하면 됩니다.
//!
//! # 사용 예시
//! ```ignore
//! #[derive(Debug, Clone, Default)]
//! struct Image {
//!     id: String,
//!     name: String,
//! }
//!
//! eventgate_core::reflect_message!(Image {
//!     id: String Singular,
//!     name: String Singular,
//! });
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// 필드 값의 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Double,
    String,
    Enum,
    /// 중첩 메시지
    Message,
}

/// 필드 카디널리티
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// 단일 값 (스칼라 또는 `Option<M>`)
    Singular,
    /// 반복 필드 (`Vec<T>`)
    Repeated,
    /// 맵 필드 (`BTreeMap<K, V>`), `kind`는 값의 종류
    Map,
}

/// 필드 디스크립터
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// 필드 이름 (마스크 경로 세그먼트와 동일)
    pub name: &'static str,
    /// 값의 종류
    pub kind: FieldKind,
    /// 카디널리티
    pub cardinality: Cardinality,
}

impl FieldDescriptor {
    /// 두 필드가 같은 종류와 카디널리티를 가지는지 확인합니다.
    pub fn is_compatible(&self, other: &FieldDescriptor) -> bool {
        self.kind == other.kind && self.cardinality == other.cardinality
    }

    /// 단일 중첩 메시지 필드인지 확인합니다.
    pub fn is_singular_message(&self) -> bool {
        self.kind == FieldKind::Message && self.cardinality == Cardinality::Singular
    }
}

/// 메시지 디스크립터 -- 메시지 타입의 필드 목록
#[derive(Debug)]
pub struct MessageDescriptor {
    /// 메시지 타입 이름
    pub name: &'static str,
    /// 선언 순서대로 정렬된 필드 목록
    pub fields: &'static [FieldDescriptor],
}

impl MessageDescriptor {
    /// 이름으로 필드 디스크립터를 찾습니다.
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        let fields: &'static [FieldDescriptor] = self.fields;
        fields.iter().find(|field| field.name == name)
    }
}

/// 리플렉션 가능한 구조화 메시지
///
/// 이벤트 스키마의 모든 메시지 타입이 구현합니다.
/// 직접 구현하기보다는 [`reflect_message!`](crate::reflect_message)를 사용하세요.
pub trait Message: fmt::Debug + Send + Sync + 'static {
    /// 메시지 디스크립터
    fn descriptor(&self) -> &'static MessageDescriptor;

    /// 이름으로 필드에 접근합니다. 존재하지 않는 필드면 `None`.
    fn field(&self, name: &str) -> Option<&dyn Field>;

    /// 이름으로 필드에 가변 접근합니다. 존재하지 않는 필드면 `None`.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Field>;
}

/// 메시지 필드 하나에 대한 제네릭 접근자
pub trait Field: Any + Send + Sync {
    /// 필드가 기본값이 아닌 값을 가지고 있는지 확인합니다.
    ///
    /// 스칼라는 기본값(0, 빈 문자열 등)이 아니면, 하위 메시지는 `Some`이면,
    /// 반복/맵 필드는 비어있지 않으면 채워진 것으로 봅니다.
    fn is_populated(&self) -> bool;

    /// 필드를 기본값으로 되돌립니다.
    fn clear(&mut self);

    /// 다운캐스트용 `Any` 참조
    fn as_any(&self) -> &dyn Any;

    /// 다른 필드의 값을 복사합니다.
    ///
    /// 두 필드의 Rust 타입이 다르면 아무것도 하지 않고 `false`를 반환합니다.
    fn assign_from(&mut self, source: &dyn Field) -> bool;

    /// 단일 하위 메시지 (설정되지 않았으면 `None`)
    fn as_message(&self) -> Option<&dyn Message> {
        None
    }

    /// 단일 하위 메시지 가변 참조 (설정되지 않았으면 `None`)
    fn as_message_mut(&mut self) -> Option<&mut dyn Message> {
        None
    }

    /// 단일 하위 메시지를 반환하며, 비어있으면 빈 메시지를 먼저 생성합니다.
    fn message_or_insert(&mut self) -> Option<&mut dyn Message> {
        None
    }

    /// 같은 타입의 빈 하위 메시지를 새로 만듭니다. 단일 메시지 필드가 아니면 `None`.
    fn new_message(&self) -> Option<Box<dyn Message>> {
        None
    }

    /// 반복 필드 접근자
    fn as_list_mut(&mut self) -> Option<&mut dyn ListField> {
        None
    }

    /// 맵 필드 접근자
    fn as_map_mut(&mut self) -> Option<&mut dyn MapField> {
        None
    }
}

/// 반복 필드 접근자
pub trait ListField {
    /// 원소 개수
    fn len(&self) -> usize;

    /// 비어있는지 확인합니다.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `index` 위치의 원소를 메시지로 접근합니다. 스칼라 원소면 `None`.
    fn message_mut(&mut self, index: usize) -> Option<&mut dyn Message>;
}

/// 맵 필드 접근자
///
/// 맵 엔트리는 키의 문자열 표현으로 주소 지정됩니다.
pub trait MapField {
    /// 모든 키의 문자열 표현
    fn keys(&self) -> Vec<String>;

    /// 키에 해당하는 엔트리를 제거합니다.
    fn remove(&mut self, key: &str);

    /// 키에 해당하는 값을 메시지로 접근합니다. 스칼라 값이거나 키가 없으면 `None`.
    fn message_mut(&mut self, key: &str) -> Option<&mut dyn Message>;
}

/// 반복 필드의 원소가 될 수 있는 타입
pub trait ListElement: Clone + Send + Sync + 'static {
    /// 원소가 메시지면 메시지로 접근합니다.
    fn element_message_mut(&mut self) -> Option<&mut dyn Message> {
        None
    }
}

/// 맵 필드의 값이 될 수 있는 타입
pub trait MapValue: Clone + Send + Sync + 'static {
    /// 값이 메시지면 메시지로 접근합니다.
    fn value_message_mut(&mut self) -> Option<&mut dyn Message> {
        None
    }
}

/// 맵 필드의 키가 될 수 있는 타입 (문자열 또는 열거형)
pub trait MapKey: Ord + Clone + Send + Sync + 'static {
    /// 마스크 경로에서 사용하는 키의 문자열 표현
    fn key_string(&self) -> String;
}

fn assign_cloned<T: Field + Clone>(target: &mut T, source: &dyn Field) -> bool {
    match source.as_any().downcast_ref::<T>() {
        Some(value) => {
            target.clone_from(value);
            true
        }
        None => false,
    }
}

macro_rules! scalar_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn is_populated(&self) -> bool {
                    *self != <$ty>::default()
                }

                fn clear(&mut self) {
                    *self = <$ty>::default();
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn assign_from(&mut self, source: &dyn Field) -> bool {
                    assign_cloned(self, source)
                }
            }

            impl ListElement for $ty {}

            impl MapValue for $ty {}
        )*
    };
}

scalar_field!(bool, i32, i64, u32, u64, f64, String);

impl MapKey for String {
    fn key_string(&self) -> String {
        self.clone()
    }
}

impl<M: Message + Default + Clone> Field for Option<M> {
    fn is_populated(&self) -> bool {
        self.is_some()
    }

    fn clear(&mut self) {
        *self = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_from(&mut self, source: &dyn Field) -> bool {
        assign_cloned(self, source)
    }

    fn as_message(&self) -> Option<&dyn Message> {
        self.as_ref().map(|message| message as &dyn Message)
    }

    fn as_message_mut(&mut self) -> Option<&mut dyn Message> {
        self.as_mut().map(|message| message as &mut dyn Message)
    }

    fn message_or_insert(&mut self) -> Option<&mut dyn Message> {
        let message: &mut dyn Message = self.get_or_insert_with(M::default);
        Some(message)
    }

    fn new_message(&self) -> Option<Box<dyn Message>> {
        Some(Box::new(M::default()))
    }
}

impl<T: ListElement> Field for Vec<T> {
    fn is_populated(&self) -> bool {
        !Vec::is_empty(self)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_from(&mut self, source: &dyn Field) -> bool {
        assign_cloned(self, source)
    }

    fn as_list_mut(&mut self) -> Option<&mut dyn ListField> {
        let list: &mut dyn ListField = self;
        Some(list)
    }
}

impl<T: ListElement> ListField for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn message_mut(&mut self, index: usize) -> Option<&mut dyn Message> {
        self.get_mut(index)
            .and_then(|element| element.element_message_mut())
    }
}

impl<K: MapKey, V: MapValue> Field for BTreeMap<K, V> {
    fn is_populated(&self) -> bool {
        !BTreeMap::is_empty(self)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_from(&mut self, source: &dyn Field) -> bool {
        assign_cloned(self, source)
    }

    fn as_map_mut(&mut self) -> Option<&mut dyn MapField> {
        let map: &mut dyn MapField = self;
        Some(map)
    }
}

impl<K: MapKey, V: MapValue> MapField for BTreeMap<K, V> {
    fn keys(&self) -> Vec<String> {
        BTreeMap::keys(self).map(MapKey::key_string).collect()
    }

    fn remove(&mut self, key: &str) {
        self.retain(|k, _| k.key_string() != key);
    }

    fn message_mut(&mut self, key: &str) -> Option<&mut dyn Message> {
        self.iter_mut()
            .find(|(k, _)| k.key_string() == key)
            .and_then(|(_, value)| value.value_message_mut())
    }
}

/// 구조체에 [`Message`], [`ListElement`], [`MapValue`] 구현을 생성합니다.
///
/// 각 필드는 `이름: 종류 카디널리티` 형식으로 선언합니다.
/// 종류는 [`FieldKind`], 카디널리티는 [`Cardinality`]의 variant 이름입니다.
#[macro_export]
macro_rules! reflect_message {
    ($ty:ident { $($field:ident : $kind:ident $card:ident),* $(,)? }) => {
        impl $crate::reflect::Message for $ty {
            fn descriptor(&self) -> &'static $crate::reflect::MessageDescriptor {
                static DESCRIPTOR: $crate::reflect::MessageDescriptor =
                    $crate::reflect::MessageDescriptor {
                        name: stringify!($ty),
                        fields: &[
                            $(
                                $crate::reflect::FieldDescriptor {
                                    name: stringify!($field),
                                    kind: $crate::reflect::FieldKind::$kind,
                                    cardinality: $crate::reflect::Cardinality::$card,
                                },
                            )*
                        ],
                    };
                &DESCRIPTOR
            }

            fn field(&self, name: &str) -> Option<&dyn $crate::reflect::Field> {
                match name {
                    $(stringify!($field) => Some(&self.$field),)*
                    _ => None,
                }
            }

            fn field_mut(&mut self, name: &str) -> Option<&mut dyn $crate::reflect::Field> {
                match name {
                    $(stringify!($field) => Some(&mut self.$field),)*
                    _ => None,
                }
            }
        }

        impl $crate::reflect::ListElement for $ty {
            fn element_message_mut(&mut self) -> Option<&mut dyn $crate::reflect::Message> {
                Some(self)
            }
        }

        impl $crate::reflect::MapValue for $ty {
            fn value_message_mut(&mut self) -> Option<&mut dyn $crate::reflect::Message> {
                Some(self)
            }
        }
    };
}
