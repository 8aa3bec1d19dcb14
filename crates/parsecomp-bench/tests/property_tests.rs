// parsecomp - Comparative parser micro-benchmark harness
//
// Copyright (c) 2025 The parsecomp contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Property-based tests for the numeric invariants of the harness.
//!
//! - Repeat counts never drop below the floor
//! - Throughput is derived exactly from the best observations
//! - Dispersion is never negative
//! - The scratch buffer always mirrors the corpus after a restore

use parsecomp_bench::core::{
    repeat_count, BenchConfig, SampleAggregate, TrialSample, MIN_REPEAT, TARGET_VOLUME,
};
use parsecomp_bench::fixtures::{restore_scratch, Corpus, ScratchBuffer, CORPUS_PADDING};
use proptest::prelude::*;
use std::time::Duration;

proptest! {
    #[test]
    fn prop_repeat_count_has_floor(volume in 0usize..1_000_000_000, multiplier in 0.0001f64..100.0) {
        let repeat = repeat_count(TARGET_VOLUME, multiplier, volume, MIN_REPEAT);
        prop_assert!(repeat >= MIN_REPEAT);
    }

    #[test]
    fn prop_repeat_count_matches_formula(volume in 1usize..10_000_000) {
        let expected = (TARGET_VOLUME / volume as u64).max(MIN_REPEAT);
        prop_assert_eq!(BenchConfig::default().repeat_count(volume), expected);
    }

    #[test]
    fn prop_throughput_is_exact(
        volume in 1usize..100_000_000,
        nanos in 1u64..10_000_000_000,
        cycles in 1u64..100_000_000_000,
    ) {
        let mut aggregate = SampleAggregate::new();
        aggregate.push(TrialSample::new(Duration::from_nanos(nanos), cycles));
        let stats = aggregate.finish(volume, 0);
        let throughput = stats.throughput();

        prop_assert_eq!(
            throughput.gigabytes_per_second,
            volume as f64 / (stats.best_time.as_secs_f64() * 1e9)
        );
        prop_assert_eq!(throughput.cycles_per_byte, cycles as f64 / volume as f64);
    }

    #[test]
    fn prop_dispersion_non_negative(samples in prop::collection::vec((1u64..1_000_000, 1u64..1_000_000), 1..64)) {
        let mut aggregate = SampleAggregate::new();
        for &(nanos, cycles) in &samples {
            aggregate.push(TrialSample::new(Duration::from_nanos(nanos), cycles));
        }
        let stats = aggregate.finish(4096, 0);

        let min_nanos = samples.iter().map(|s| s.0).min().unwrap_or_default();
        prop_assert_eq!(stats.best_time, Duration::from_nanos(min_nanos));
        prop_assert!(stats.best_time <= stats.mean_time);
        prop_assert!(stats.best_cycles <= stats.mean_cycles);
        prop_assert!(stats.throughput().gigabytes_per_second_err >= 0.0);
    }

    #[test]
    fn prop_restore_mirrors_corpus(
        data in prop::collection::vec(any::<u8>(), 0..4096),
        garbage in any::<u8>(),
    ) {
        let corpus = Corpus::from_bytes("generated", &data);
        let mut scratch = ScratchBuffer::new();

        restore_scratch(&corpus, &mut scratch);
        scratch.contents_mut().fill(garbage);
        restore_scratch(&corpus, &mut scratch);

        prop_assert!(scratch.matches(&corpus));
        prop_assert_eq!(scratch.as_terminated().last().copied(), Some(0u8));
        prop_assert_eq!(corpus.padded().len(), data.len() + CORPUS_PADDING);
    }
}
