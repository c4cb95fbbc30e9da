use super::*;
use unravel_binder::analyze_scopes;
use unravel_test_utils::parse;

fn names(allocator: &mut TempNameAllocator, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| allocator.next_name().expect("allocation failed"))
        .collect()
}

#[test]
fn test_base36_digits() {
    assert_eq!(to_base36(0), "0");
    assert_eq!(to_base36(9), "9");
    assert_eq!(to_base36(10), "a");
    assert_eq!(to_base36(35), "z");
    assert_eq!(to_base36(36), "10");
    assert_eq!(to_base36(1295), "zz");
}

#[test]
fn test_simple_prefix_sequence() {
    let mut allocator = TempNameAllocator::simple_prefix("$");
    let all = names(&mut allocator, 37);
    assert_eq!(all[0], "$0");
    assert_eq!(all[10], "$a");
    assert_eq!(all[35], "$z");
    assert_eq!(all[36], "$10");
    assert_eq!(allocator.allocated(), 37);
    assert_eq!(allocator.strategy(), NamingStrategy::SimplePrefix);
}

#[test]
fn test_simple_prefix_ignores_program_names() {
    let mut allocator = TempNameAllocator::simple_prefix("_d");
    assert_eq!(names(&mut allocator, 2), vec!["_d0", "_d1"]);
}

#[test]
fn test_global_unique_skips_used_names() {
    let tree = parse("var $0 = 1; $2 = f($3x);");
    let mut allocator = TempNameAllocator::global_unique("$", analyze_scopes(&tree.arena, tree.root));
    assert_eq!(names(&mut allocator, 3), vec!["$1", "$3", "$4"]);
    assert_eq!(allocator.allocated(), 3);
    assert_eq!(allocator.strategy(), NamingStrategy::GlobalUnique);
}

#[test]
fn test_fresh_allocators_are_deterministic() {
    let tree = parse("var $1;");
    let scopes = analyze_scopes(&tree.arena, tree.root);
    let first = names(&mut TempNameAllocator::global_unique("$", scopes.clone()), 4);
    let second = names(&mut TempNameAllocator::global_unique("$", scopes), 4);
    assert_eq!(first, second);
    assert_eq!(first, vec!["$0", "$2", "$3", "$4"]);
}

#[test]
fn test_counter_overflow_is_an_error() {
    let mut allocator = TempNameAllocator::simple_prefix("t");
    allocator.counter = u32::MAX;
    let err = allocator.next_name().unwrap_err();
    assert!(matches!(err, TransformError::AllocatorExhausted { ref prefix } if prefix == "t"));
}
