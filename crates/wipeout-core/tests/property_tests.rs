//! Property-based tests for the pass sequencing guarantees.
//!
//! These tests use proptest to generate pass counts and file sizes and
//! verify ordering and completeness across a wide range of cases.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;
use wipeout_core::CancelToken;
use wipeout_core::OverwriteEngine;
use wipeout_core::PassCount;
use wipeout_core::ShredConfig;
use wipeout_core::engine::overwrite_passes;
use wipeout_core::io::RecordingSink;
use wipeout_core::io::StorageOp;
use wipeout_core::pattern::Pattern;
use wipeout_core::pattern::pattern_at;
use wipeout_core::patterns_for;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A file of size S gets exactly N passes (none when S = 0) and is gone
    /// afterwards.
    #[test]
    fn prop_destroy_runs_every_pass(passes in 1usize..8, size in 0usize..20_000) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join("target.bin");
        fs::write(&path, vec![0xA5; size]).expect("failed to write file");

        let config = ShredConfig::default().with_passes(PassCount::new(passes).unwrap());
        let result = OverwriteEngine::new(&config).destroy(&path, &config.pass_spec());

        prop_assert!(result.is_success());
        let expected = if size == 0 { 0 } else { passes };
        prop_assert_eq!(result.passes_completed(), expected);
        prop_assert_eq!(result.bytes_overwritten(), (expected * size) as u64);
        prop_assert!(!path.exists());
    }

    /// Each pass is one seek, writes covering the whole size, a flush and a
    /// sync, and passes never interleave.
    #[test]
    fn prop_pass_sequence_shape(passes in 1usize..12, size in 1usize..5_000) {
        let mut sink = RecordingSink::new(vec![0; size]);
        let spec = patterns_for(PassCount::new(passes).unwrap());
        overwrite_passes(&mut sink, size as u64, &spec, &CancelToken::new(), |_, _| {})
            .unwrap();

        let mut ops = sink.ops().iter();
        for _ in 0..passes {
            prop_assert_eq!(ops.next(), Some(&StorageOp::Seek(0)));
            let mut written = 0;
            loop {
                match ops.next() {
                    Some(StorageOp::Write(n)) => written += n,
                    Some(StorageOp::Flush) => break,
                    other => prop_assert!(false, "unexpected {:?}", other),
                }
            }
            prop_assert_eq!(written, size);
            prop_assert_eq!(ops.next(), Some(&StorageOp::Sync));
        }
        prop_assert_eq!(ops.next(), None);
    }

    /// First and last passes are random, the middle alternates zeros and
    /// ones starting with zeros.
    #[test]
    fn prop_pattern_policy(passes in 1usize..100) {
        let count = PassCount::new(passes).unwrap();
        let spec = patterns_for(count);
        prop_assert_eq!(spec.len(), passes);
        prop_assert_eq!(spec.patterns()[0], Pattern::Random);
        prop_assert_eq!(spec.patterns()[passes - 1], Pattern::Random);
        for i in 1..passes.saturating_sub(1) {
            let expected = if i % 2 == 1 { Pattern::Zeros } else { Pattern::Ones };
            prop_assert_eq!(pattern_at(count, i), expected);
        }
    }

    /// Cancelling after pass k stops with exactly k completed passes.
    #[test]
    fn prop_cancel_stops_at_barrier(passes in 2usize..10, stop_after in 1usize..10) {
        prop_assume!(stop_after < passes);
        let cancel = CancelToken::new();
        let mut sink = RecordingSink::new(vec![0; 32]);
        let spec = patterns_for(PassCount::new(passes).unwrap());

        let failure = overwrite_passes(&mut sink, 32, &spec, &cancel, |pass, _| {
            if pass == stop_after {
                cancel.cancel();
            }
        })
        .unwrap_err();

        prop_assert_eq!(failure.passes_completed, stop_after);
        let syncs = sink.ops().iter().filter(|op| **op == StorageOp::Sync).count();
        prop_assert_eq!(syncs, stop_after);
    }
}
