//! End-to-end behavior of images through the public API.

use eatalloc::prelude::*;

fn live_blocks<S: SizeType, B: AsRef<[u8]>>(heap: &Master<S, B>) -> Vec<Vec<u8>> {
    heap.blocks().map(|(_, bytes)| bytes.to_vec()).collect()
}

fn sizes_and_contents<S: SizeType, B: AsRef<[u8]>>(heap: &Master<S, B>) -> Vec<(usize, Vec<u8>)> {
    heap.blocks()
        .map(|(h, bytes)| (heap.size_of(h).unwrap(), bytes.to_vec()))
        .collect()
}

#[test]
fn allocate_reports_exact_size_and_usable_bytes() {
    let mut heap = Master::<u32>::with_capacity(2048).unwrap();
    for size in [1, 2, 7, 64, 255, 1000] {
        let (h, buf) = heap.allocate_uninit(size).unwrap();
        buf.fill(size as u8);
        assert_eq!(heap.size_of(h).unwrap(), size);
        assert!(heap.get(h).unwrap().iter().all(|&b| b == size as u8));
        assert!(heap.check().is_ok());
    }
}

#[test]
fn failed_allocations_leave_image_untouched() {
    let mut heap = Master::<u16>::with_capacity(128).unwrap();
    heap.duplicate(b"resident").unwrap();
    let before = heap.image().to_vec();
    let free = heap.free_area_size();

    assert!(matches!(heap.allocate(0), Err(EatError::ZeroSize)));
    assert!(matches!(
        heap.allocate(free - heap.entry_size() + 1),
        Err(EatError::OutOfMemory { .. })
    ));
    assert_eq!(heap.image(), &before[..]);

    heap.allocate(free - heap.entry_size()).unwrap();
    assert_eq!(heap.free_area_size(), 0);
}

#[test]
fn duplicated_string_is_nul_terminated() {
    let mut heap = Master::<u64>::with_capacity(256).unwrap();
    let h = heap.duplicate_str("ABC").unwrap();
    assert_eq!(&heap.get(h).unwrap()[..3], b"ABC");
    assert!(heap.size_of(h).unwrap() >= 4);
    assert_eq!(heap.get_cstr(h).unwrap(), c"ABC");
}

#[test]
fn nested_free_restores_previous_image() {
    let mut heap = Master::<u32>::with_capacity(300).unwrap();
    heap.allocate(40).unwrap();
    let after_a = heap.image().to_vec();

    let b = heap.allocate(60).unwrap();
    heap.free(b).unwrap();
    assert_eq!(heap.image(), &after_a[..]);
}

#[test]
fn freeing_both_in_allocation_order_empties() {
    let mut heap = Master::<u32>::with_capacity(300).unwrap();
    let a = heap.allocate(40).unwrap();
    let b = heap.allocate(60).unwrap();
    heap.free(a).unwrap();
    assert!(!heap.is_empty());
    heap.free(b).unwrap();
    assert!(heap.is_empty());
}

#[test]
fn compaction_keeps_live_payloads_addressable() {
    let mut heap = Master::<u32>::with_capacity(1024).unwrap();
    let handles: Vec<_> = (0u8..6)
        .map(|i| heap.duplicate(&vec![i; 10 + i as usize]).unwrap())
        .collect();
    heap.free(handles[0]).unwrap();
    heap.free(handles[3]).unwrap();

    let live_before = heap.valid_data_size();
    let report = heap.compact();
    assert!(!heap.is_empty());
    assert_eq!(heap.valid_data_size(), live_before);
    assert_eq!(heap.invalid_data_size(), 0);
    assert_eq!(heap.num_entries(), 4);

    for i in [1usize, 2, 4, 5] {
        let h = report.relocated(handles[i]).unwrap_or(handles[i]);
        assert_eq!(heap.get(h).unwrap(), &vec![i as u8; 10 + i][..]);
    }
    assert!(heap.check().is_ok());
}

#[test]
fn merge_translates_offsets_and_spares_source() {
    let mut master1 = Master::<u32>::with_capacity(1000).unwrap();
    let mut master2 = Master::<u32>::with_capacity(1000).unwrap();
    for s in ["ABC", "DEF", "GHI"] {
        master1.duplicate_str(s).unwrap();
    }
    let mut handles = Vec::new();
    for s in ["JKL", "MNO", "PQR", "STU", "VWX", "YZ!"] {
        handles.push(master2.duplicate_str(s).unwrap());
    }
    master2.free(handles[2]).unwrap();
    let source = master2.image().to_vec();
    let expected = sizes_and_contents(&master2);
    let delta = (master1.boundary_1() - master1.head_size()) as u64;

    master1.merge(&master2).unwrap();
    assert_eq!(master2.image(), &source[..]);
    assert!(master1.check().is_ok());

    for (h, bytes) in master2.blocks() {
        let moved = Handle::new(h.offset() + delta);
        assert_eq!(master1.get(moved).unwrap(), bytes);
    }
    let merged = sizes_and_contents(&master1);
    assert_eq!(&merged[..expected.len()], &expected[..]);
}

#[cfg(feature = "persist")]
#[test]
fn save_and_load_into_larger_buffer() {
    let mut heap = Master::<u16>::with_capacity(400).unwrap();
    let a = heap.duplicate(b"kept").unwrap();
    heap.duplicate(b"dropped").unwrap();
    heap.duplicate(b"also kept").unwrap();
    heap.free(Handle::new(a.offset() + 4)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("image.eat");
    heap.save_to_file(&path).unwrap();

    for capacity in [400, 401, 4000] {
        let (loaded, outcome) = Master::<u16>::from_file(&path, capacity).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(loaded.total_size(), capacity);
        assert_eq!(live_blocks(&loaded), live_blocks(&heap));
        assert_eq!(loaded.get(a).unwrap(), b"kept");
    }
}

#[test]
fn resize_round_trip_preserves_descriptors() {
    let mut heap = Master::<u32>::init_with_size(vec![0u8; 4096], 512).unwrap();
    for i in 0..5u8 {
        heap.duplicate(&[i; 20]).unwrap();
    }
    let descriptors: Vec<_> = heap.descriptors().collect();
    let contents = live_blocks(&heap);

    heap.resize(4096).unwrap();
    assert_eq!(heap.descriptors().collect::<Vec<_>>(), descriptors);
    heap.resize(512).unwrap();
    assert_eq!(heap.descriptors().collect::<Vec<_>>(), descriptors);
    assert_eq!(live_blocks(&heap), contents);
    assert!(heap.check().is_ok());
}

#[test]
fn allocate_reallocate_free_compact_cycle() {
    let mut heap = Master::<u32>::with_capacity(1024).unwrap();
    let p1 = heap.allocate(100).unwrap();
    assert_eq!(heap.size_of(p1).unwrap(), 100);
    let p2 = heap.reallocate(Some(p1), 100).unwrap().unwrap();
    assert_eq!(heap.size_of(p2).unwrap(), 100);
    heap.free(p2).unwrap();
    heap.compact();
    assert!(heap.is_empty());
}

#[test]
fn repeated_merges_stack_up() {
    let mut master1 = Master::<u32>::with_capacity(1000).unwrap();
    let mut master2 = Master::<u32>::with_capacity(1000).unwrap();
    for s in ["JKL", "MNO", "PQR"] {
        master2.duplicate_str(s).unwrap();
    }

    for round in 1..=3 {
        master1.merge(&master2).unwrap();
        assert_eq!(master1.len(), 3 * round);
    }
    let strings: Vec<_> = master1
        .blocks()
        .rev()
        .map(|(h, _)| master1.get_cstr(h).unwrap().to_str().unwrap().to_owned())
        .collect();
    assert_eq!(strings[..3], ["JKL", "MNO", "PQR"]);
    assert_eq!(strings[6..], ["JKL", "MNO", "PQR"]);
}
