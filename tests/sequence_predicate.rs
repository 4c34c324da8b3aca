// SequencePredicate integration tests.
//
// Invariants exercised:
// - Feeding the adjacent pairs of the reference sequence in order succeeds
//   once per pair.
// - A mismatched or out-of-order pair fails and does not advance.
// - Once the last pair has matched, every call fails; there is no reset.
use keyview::SequencePredicate;
use proptest::prelude::*;

// Test: reference sequence [2, 3, 5].
#[test]
fn walks_reference_sequence() {
    let mut p = SequencePredicate::equal([2, 3, 5]);
    assert!(!p.matches(&1, &2));
    assert!(p.matches(&2, &3));
    assert!(!p.matches(&2, &3), "repeat without advancing the input");
    assert!(p.matches(&3, &5));
    assert!(!p.matches(&5, &8));
    assert!(p.is_exhausted());
    assert!(!p.matches(&5, &8));
}

// Test: matching path segments under a custom comparison.
#[test]
fn path_segments() {
    let reference = "/srv/data/logs".split('/').filter(|s| !s.is_empty());
    let mut p = SequencePredicate::new(reference, |a: &str, b: &&str| a == *b);
    let input = ["srv", "data", "logs"];
    for pair in input.windows(2) {
        assert!(p.matches(pair[0], pair[1]));
    }
    assert!(p.is_exhausted());
}

// Property: the exact adjacent pairs of any sequence all match, in order,
// and nothing matches afterwards.
proptest! {
    #[test]
    fn prop_exact_pairs_match(seq in proptest::collection::vec(0u8..4, 0..12)) {
        let mut p = SequencePredicate::equal(seq.clone());
        for pair in seq.windows(2) {
            prop_assert!(p.matches(&pair[0], &pair[1]));
        }
        prop_assert!(p.is_exhausted());
        prop_assert!(!p.matches(&0, &0));
    }

    // Property: a pair that differs from the expected one fails and leaves
    // the expected pair unchanged.
    #[test]
    fn prop_mismatch_does_not_advance(
        seq in proptest::collection::vec(0u8..4, 2..12),
        bump in 1u8..4,
    ) {
        let mut p = SequencePredicate::equal(seq.clone());
        let wrong = seq[1].wrapping_add(bump) % 4;
        prop_assume!(wrong != seq[1]);
        prop_assert!(!p.matches(&seq[0], &wrong));
        prop_assert_eq!(p.expected(), Some((&seq[0], &seq[1])));
        prop_assert!(p.matches(&seq[0], &seq[1]));
    }
}
