// Integration tests for the allocator: block layout after allocate, free and write

use bytethon::map::Overwrite;
use bytethon::memory::errors::MemoryError;
use bytethon::memory::{ByteView, Memory};

fn memory_with(size: usize, names: &[&str]) -> Memory {
    let mut memory = Memory::new(size, 10).expect("Memory creation failed");
    for name in names {
        memory
            .declare_pointer(name, Overwrite::Never)
            .expect("Declaring pointer failed");
    }
    memory
}

/// (start, size, free) for every block
fn layout(memory: &Memory) -> Vec<(usize, usize, bool)> {
    memory
        .list_blocks()
        .iter()
        .map(|b| (b.start_index, b.size, b.free))
        .collect()
}

#[test]
fn test_allocate_entire_arena() {
    let mut memory = memory_with(10, &["p"]);

    let ptr = memory.allocate(10, "p").unwrap();

    assert_eq!(ptr.start_index, 0);
    assert_eq!(layout(&memory), vec![(0, 10, false)]);
    assert!(memory.check_invariants().is_ok());
}

#[test]
fn test_free_first_of_two() {
    let mut memory = memory_with(10, &["a", "b"]);
    assert_eq!(memory.allocate(4, "a").unwrap().start_index, 0);
    assert_eq!(memory.allocate(3, "b").unwrap().start_index, 4);
    assert_eq!(
        layout(&memory),
        vec![(0, 4, false), (4, 3, false), (7, 3, true)]
    );

    memory.free("a").unwrap();

    assert_eq!(
        layout(&memory),
        vec![(0, 4, true), (4, 3, false), (7, 3, true)]
    );
    assert!(!memory.pointers().contains("a"));
    assert!(memory.check_invariants().is_ok());
}

#[test]
fn test_free_middle_coalesces_both_sides() {
    let mut memory = memory_with(10, &["a", "b"]);
    memory.allocate(4, "a").unwrap();
    memory.allocate(3, "b").unwrap();
    memory.free("a").unwrap();

    memory.free("b").unwrap();

    assert_eq!(layout(&memory), vec![(0, 10, true)]);
    assert!(memory.check_invariants().is_ok());
}

#[test]
fn test_write_value_fills_block() {
    let mut memory = memory_with(10, &["a"]);
    memory.allocate(4, "a").unwrap();

    memory.write_value(200, "a").unwrap();

    assert_eq!(&memory.arena().bytes()[0..4], &[0, 0, 0, 200]);
    assert!(memory.list_blocks()[0].initialized);
    assert_eq!(memory.list_bytes()[3], ByteView::Value(200));
    assert_eq!(memory.list_bytes()[4], ByteView::Free);
}

#[test]
fn test_free_unknown_or_unbound_pointer() {
    let mut memory = memory_with(10, &["x", "y"]);
    memory.allocate(4, "x").unwrap();
    let before = memory.list_blocks();

    assert!(matches!(
        memory.free("nobody"),
        Err(MemoryError::NotFound { .. })
    ));
    // `y` is declared but was never allocated, even though offset 0 is in use
    assert!(matches!(memory.free("y"), Err(MemoryError::NotFound { .. })));

    assert_eq!(memory.list_blocks(), before);
    assert!(memory.pointers().contains("y"));
}

#[test]
fn test_allocate_then_free_restores_arena() {
    for size in [1, 5, 31, 32] {
        let mut memory = memory_with(32, &["p"]);
        memory.allocate(size, "p").unwrap();
        memory.free("p").unwrap();
        assert_eq!(layout(&memory), vec![(0, 32, true)], "size {}", size);
    }
}

#[test]
fn test_listing_does_not_mutate() {
    let mut memory = memory_with(16, &["a", "b"]);
    memory.allocate(5, "a").unwrap();
    memory.allocate(2, "b").unwrap();
    memory.write_value(9, "b").unwrap();

    let blocks = memory.list_blocks();
    let bytes = memory.list_bytes();
    assert_eq!(memory.list_blocks(), blocks);
    assert_eq!(memory.list_bytes(), bytes);
}

#[test]
fn test_rejected_allocations_leave_memory_alone() {
    let mut memory = memory_with(8, &["p"]);
    let before = layout(&memory);

    assert!(matches!(
        memory.allocate(0, "p"),
        Err(MemoryError::InvalidArgument { .. })
    ));
    assert!(matches!(
        memory.allocate(9, "p"),
        Err(MemoryError::OutOfMemory {
            requested: 9,
            largest_free: 8
        })
    ));
    assert!(matches!(
        memory.allocate(4, "undeclared"),
        Err(MemoryError::NotFound { .. })
    ));

    assert_eq!(layout(&memory), before);
    assert!(!memory.pointers().get("p").unwrap().is_bound());
}

#[test]
fn test_reallocating_a_pointer_leaks_the_old_block() {
    let mut memory = memory_with(10, &["p"]);
    memory.allocate(4, "p").unwrap();

    let ptr = memory.allocate(2, "p").unwrap();

    assert_eq!(ptr.start_index, 4);
    assert_eq!(
        layout(&memory),
        vec![(0, 4, false), (4, 2, false), (6, 4, true)]
    );
}

#[test]
fn test_best_fit_reuses_exact_hole() {
    let mut memory = memory_with(16, &["a", "b", "c", "d"]);
    memory.allocate(6, "a").unwrap();
    memory.allocate(2, "b").unwrap();
    memory.allocate(3, "c").unwrap();
    memory.free("a").unwrap();

    // Holes: 6 bytes at 0 and 5 bytes at 11; 5 fits the tail exactly
    let ptr = memory.allocate(5, "d").unwrap();

    assert_eq!(ptr.start_index, 11);
    assert_eq!(memory.list_blocks().len(), 4);
    assert!(memory.check_invariants().is_ok());
}

#[test]
fn test_fill_arena_one_byte_at_a_time() {
    let names: Vec<String> = (0..8).map(|i| format!("p{}", i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut memory = memory_with(8, &refs);

    for (i, name) in refs.iter().enumerate() {
        assert_eq!(memory.allocate(1, name).unwrap().start_index, i);
    }
    assert_eq!(memory.stats().blocks, 8);
    assert_eq!(memory.stats().free_bytes, 0);

    // Free every other block, then the rest; everything coalesces back
    for name in refs.iter().step_by(2) {
        memory.free(name).unwrap();
    }
    for name in refs.iter().skip(1).step_by(2) {
        memory.free(name).unwrap();
    }
    assert_eq!(layout(&memory), vec![(0, 8, true)]);
}
