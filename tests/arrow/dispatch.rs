//! Provider selection, summaries and the original-handle retry.

use arrow_lens::memory::MemoryError;
use arrow_lens::{
    ArrayClassification, DataType, Dispatcher, Endianness, Field, InspectConfig, InspectError,
    Introspector, ProcessSnapshot, SyntheticProvider, TypedHandle,
};

use crate::common::*;

const LOSSY_ARRAY: &str = "arrow_array::lossy::PrimitiveArray<arrow_array::types::UInt32Type>";

/// A front-end whose dereference loses the pointee layout: the pointee
/// comes back as a stripped type that still looks like an array by name.
struct LossyDeref {
    inner: ProcessSnapshot,
}

impl Introspector for LossyDeref {
    fn find_type(&self, name: &str) -> Option<DataType> {
        self.inner.find_type(name)
    }

    fn byte_order(&self) -> Endianness {
        self.inner.byte_order()
    }

    fn pointer_size(&self) -> u64 {
        self.inner.pointer_size()
    }

    fn read_memory(&self, address: u64, len: u64) -> Result<Vec<u8>, MemoryError> {
        self.inner.read_memory(address, len)
    }

    fn dereference(&self, handle: &TypedHandle) -> arrow_lens::Result<TypedHandle> {
        let target = self.inner.dereference(handle)?;
        Ok(TypedHandle::new(target.name, target.address, LOSSY_ARRAY))
    }

    fn child_member(&self, handle: &TypedHandle, name: &str) -> arrow_lens::Result<TypedHandle> {
        self.inner.child_member(handle, name)
    }
}

fn lossy_fixture() -> (LossyDeref, TypedHandle, TypedHandle) {
    let mut fx = ArrowFixture::new();
    let array = fx.primitive_array("u32", ElementRepr::Logical, &u32_values(&[1, 2, 3]), None);
    let ptr = fx.pointer_to(&array);
    fx.builder().define(DataType::new_struct(
        LOSSY_ARRAY,
        96,
        vec![Field::new("data_type", ARROW_DATA_TYPE, 0)],
    ));
    let lossy = TypedHandle::new("array", array.address, LOSSY_ARRAY);
    (LossyDeref { inner: fx.build() }, ptr, lossy)
}

#[test]
fn test_summaries() {
    let mut fx = ArrowFixture::new();
    let primitive = fx.primitive_array("u32", ElementRepr::Native, &u32_values(&[1, 2, 3]), None);
    let strings = fx.string_array(&[0, 3, 3, 5], b"catdog", Some(Validity::new(&[0b101], 1)));
    let large = fx.large_string_array(&[0, 2, 4], b"abcd", None);
    let flags = fx.boolean_buffer(&[0b0110], 0, 4);
    let offsets = fx.offset_buffer(&[0, 1, 2, 3, 4]);
    let snap = fx.build();
    let config = default_config();
    let dispatcher = Dispatcher::new(&snap, &config);

    assert_eq!(dispatcher.select_summary(&primitive).unwrap(), "length=3");
    assert_eq!(dispatcher.select_summary(&strings).unwrap(), "length=3");
    assert_eq!(dispatcher.select_summary(&large).unwrap(), "length=2");
    assert_eq!(dispatcher.select_summary(&flags).unwrap(), "length=4");
    assert_eq!(dispatcher.select_summary(&offsets).unwrap(), "length=5");
}

#[test]
fn test_provider_selection() {
    let mut fx = ArrowFixture::new();
    let primitive = fx.primitive_array("u32", ElementRepr::Native, &u32_values(&[1]), None);
    let strings = fx.string_array(&[0, 1], b"a", None);
    let flags = fx.boolean_buffer(&[1], 0, 1);
    let offsets = fx.offset_buffer(&[0, 1]);
    let snap = fx.build();
    let config = default_config();
    let dispatcher = Dispatcher::new(&snap, &config);

    let cases = [
        (&primitive, ArrayClassification::PrimitiveArray),
        (&strings, ArrayClassification::StringArray),
        (&flags, ArrayClassification::BooleanBuffer),
        (&offsets, ArrayClassification::OffsetBuffer),
    ];
    for (handle, expected) in cases {
        assert_eq!(dispatcher.classify_handle(handle).unwrap(), expected);
        let provider = dispatcher.select_provider(handle).unwrap();
        assert_eq!(provider.classification(), expected);
    }
}

#[test]
fn test_pointers_and_references_are_unwrapped() {
    let mut fx = ArrowFixture::new();
    let strings = fx.string_array(&[0, 3, 3, 5], b"catdog", Some(Validity::new(&[0b101], 1)));
    let ptr = fx.pointer_to(&strings);
    let ptr_ptr = fx.pointer_to(&ptr);
    let reference = fx.reference_to(&strings);
    let snap = fx.build();
    let config = default_config();
    let dispatcher = Dispatcher::new(&snap, &config);

    for handle in [&ptr, &ptr_ptr, &reference] {
        assert_eq!(
            dispatcher.classify_handle(handle).unwrap(),
            ArrayClassification::StringArray
        );
        assert_eq!(dispatcher.select_summary(handle).unwrap(), "length=3");
        assert_eq!(
            dispatcher.render_children(handle, 10).unwrap(),
            r#"["cat", None, "og"]"#
        );
    }
}

#[test]
fn test_render_children_truncates() {
    let mut fx = ArrowFixture::new();
    let array = fx.primitive_array(
        "u32",
        ElementRepr::Logical,
        &u32_values(&[1, 2, 3, 4]),
        Some(Validity::new(&[0b1101], 1)),
    );
    let snap = fx.build();
    let config = default_config();
    let dispatcher = Dispatcher::new(&snap, &config);

    assert_eq!(
        dispatcher.render_children(&array, 10).unwrap(),
        "[1, None, 3, 4]"
    );
    assert_eq!(
        dispatcher.render_children(&array, 2).unwrap(),
        "[1, None, ...]"
    );
    assert_eq!(dispatcher.render_children(&array, 0).unwrap(), "[...]");
}

#[test]
fn test_classification_requires_fields() {
    let mut fx = ArrowFixture::new();
    fx.builder()
        .define(DataType::new_struct(
            "ns::PrimitiveArray<ns::UInt16Type>",
            8,
            vec![Field::new("values", "u64", 0)],
        ))
        .define(DataType::new_struct("ns::BooleanBuffer", 8, vec![Field::new("len", "u64", 0)]))
        .define(DataType::new_struct("other::PrimitiveArray<ns::UInt16Type>", 0, vec![]))
        .define(DataType::new_struct("other::BooleanBuffer", 0, vec![]))
        .define(DataType::new_struct("ns::Unrelated", 8, vec![Field::new("x", "u64", 0)]));
    let at = fx.builder().alloc(&[0; 8]);
    let snap = fx.build();
    let config = default_config();
    let dispatcher = Dispatcher::new(&snap, &config);

    let classify = |name: &str| {
        dispatcher
            .classify_handle(&TypedHandle::new("v", at, name))
            .unwrap()
    };
    assert_eq!(
        classify("ns::PrimitiveArray<ns::UInt16Type>"),
        ArrayClassification::PrimitiveArray
    );
    assert_eq!(classify("ns::BooleanBuffer"), ArrayClassification::BooleanBuffer);
    assert_eq!(
        classify("other::PrimitiveArray<ns::UInt16Type>"),
        ArrayClassification::Unknown
    );
    assert_eq!(classify("other::BooleanBuffer"), ArrayClassification::Unknown);
    assert_eq!(classify("ns::Unrelated"), ArrayClassification::Unknown);
}

#[test]
fn test_unknown_struct_passes_through() {
    let mut fx = ArrowFixture::new();
    fx.builder().define(DataType::new_struct(
        "app::Header",
        16,
        vec![Field::new("magic", "u32", 0), Field::new("count", "u64", 8)],
    ));
    let mut bytes = 0xFEEDu32.to_le_bytes().to_vec();
    bytes.extend([0; 4]);
    bytes.extend(7u64.to_le_bytes());
    let at = fx.builder().alloc(&bytes);
    let snap = fx.build();
    let config = default_config();
    let dispatcher = Dispatcher::new(&snap, &config);

    let handle = TypedHandle::new("header", at, "app::Header");
    let provider = dispatcher.select_provider(&handle).unwrap();
    assert_eq!(provider.classification(), ArrayClassification::Unknown);
    assert_eq!(provider.num_children(), 2);
    assert_eq!(provider.child_index("count"), Some(1));
    assert_eq!(provider.child_at_index(1).unwrap().name(), "count");
    assert_eq!(dispatcher.select_summary(&handle).unwrap(), "");
    assert_eq!(dispatcher.render_children(&handle, 5).unwrap(), "[65261, 7]");
}

#[test]
fn test_retry_recovers_through_original_handle() {
    let (intro, ptr, _) = lossy_fixture();
    let config = default_config();
    let dispatcher = Dispatcher::new(&intro, &config);

    assert_eq!(
        dispatcher.classify_handle(&ptr).unwrap(),
        ArrayClassification::PrimitiveArray
    );
    let mut provider = dispatcher.select_provider(&ptr).unwrap();
    assert_eq!(provider.classification(), ArrayClassification::PrimitiveArray);
    provider.update().unwrap();
    assert_eq!(provider.num_children(), 3);
    assert_eq!(dispatcher.select_summary(&ptr).unwrap(), "length=3");
    assert_eq!(dispatcher.render_children(&ptr, 8).unwrap(), "[1, 2, 3]");
}

#[test]
fn test_failure_surfaces_without_retry() {
    let (intro, ptr, _) = lossy_fixture();
    let config = InspectConfig {
        retry_original_handle: false,
        ..default_config()
    };
    let dispatcher = Dispatcher::new(&intro, &config);

    assert!(matches!(
        dispatcher.select_provider(&ptr),
        Err(InspectError::MissingField { field, .. }) if field == "values"
    ));
    assert!(dispatcher.select_summary(&ptr).is_err());
}

#[test]
fn test_failure_surfaces_when_nothing_to_retry() {
    let (intro, _, lossy) = lossy_fixture();
    let config = default_config();
    let dispatcher = Dispatcher::new(&intro, &config);

    // Not a pointer: the unwrapped handle is the original one.
    assert!(matches!(
        dispatcher.select_provider(&lossy),
        Err(InspectError::MissingField { .. })
    ));
}
