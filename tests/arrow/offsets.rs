//! Bare `OffsetBuffer<i32>` decoding.

use arrow_lens::providers::OffsetBufferProvider;
use arrow_lens::{InspectContext, Introspector, SyntheticProvider};

use crate::common::*;

#[test]
fn test_offsets_are_raw_integers() {
    let mut fx = ArrowFixture::new();
    let offsets = fx.offset_buffer(&[0, 3, 3, 5]);
    let snap = fx.build();
    let config = default_config();
    let provider = OffsetBufferProvider::new(InspectContext::new(&snap, &config), &offsets).unwrap();

    assert_eq!(provider.num_children(), 4);
    let rendered: Vec<String> = (0..4)
        .map(|i| provider.child_at_index(i).unwrap().render(&snap).unwrap())
        .collect();
    assert_eq!(rendered, vec!["0", "3", "3", "5"]);
}

#[test]
fn test_adjacent_offsets_bound_values() {
    let mut fx = ArrowFixture::new();
    let offsets = fx.offset_buffer(&[0, 2, 7, 7, 10]);
    let snap = fx.build();
    let config = default_config();
    let provider = OffsetBufferProvider::new(InspectContext::new(&snap, &config), &offsets).unwrap();

    let raw: Vec<u64> = (0..provider.num_children())
        .map(|i| match provider.child_at_index(i).unwrap() {
            arrow_lens::ChildValue::Element(h) => {
                assert_eq!(h.type_name, "i32");
                snap.value_as_unsigned(&h).unwrap()
            }
            other => panic!("unexpected child {:?}", other),
        })
        .collect();
    // N offsets delimit N - 1 values, each with end >= start.
    assert_eq!(raw.len() - 1, 4);
    assert!(raw.windows(2).all(|w| w[1] >= w[0]));
}
