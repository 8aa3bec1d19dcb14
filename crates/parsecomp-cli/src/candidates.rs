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

//! Built-in candidate set.
//!
//! Parsers are registered in report order. Baselines (`getline`, `memcpy`)
//! bound what any parser could achieve and are skipped in table and JSON
//! output.

use parsecomp_bench::core::{Candidate, CandidateRegistry, Outcome};
use parsecomp_bench::fixtures::{restore_scratch, Corpus, ScratchBuffer};
use parsecomp_bench::Result;
use serde::de::IgnoredAny;
use serde_json::Value;
use std::hint::black_box;
use std::io::BufRead;

/// Builds the registry of built-in candidates.
pub fn builtin_registry() -> Result<CandidateRegistry> {
    let mut registry = CandidateRegistry::new();

    registry.register(
        Candidate::new("getline", |corpus: &Corpus, _: &mut ScratchBuffer| {
            Outcome::from(sum_line_lengths(corpus.as_bytes()))
        })
        .expecting_from(|corpus| Outcome::from(line_lengths_reference(corpus.as_bytes())))
        .verbose_only(),
    )?;

    registry.register(
        Candidate::new(
            "serde_json (dynamic mem)",
            |corpus: &Corpus, _: &mut ScratchBuffer| {
                Outcome::from(serde_json::from_slice::<Value>(corpus.as_bytes()).is_ok())
            },
        )
        .verbose_only(),
    )?;

    registry.register(
        Candidate::new("serde_json", |corpus: &Corpus, _: &mut ScratchBuffer| {
            Outcome::from(serde_json::from_slice::<IgnoredAny>(corpus.as_bytes()).is_ok())
        })
        .with_deep_dive(),
    )?;

    registry.register(Candidate::new(
        "serde_json (utf-8 validated)",
        |corpus: &Corpus, _: &mut ScratchBuffer| {
            let valid = std::str::from_utf8(corpus.as_bytes())
                .ok()
                .map_or(false, |text| {
                    serde_json::from_str::<IgnoredAny>(text).is_ok()
                });
            Outcome::from(valid)
        },
    ))?;

    registry.register(
        Candidate::new(
            "serde_json (in-place minify)",
            |_: &Corpus, scratch: &mut ScratchBuffer| {
                let len = minify_in_place(scratch.contents_mut());
                let minified = &scratch.contents()[..len];
                Outcome::from(serde_json::from_slice::<IgnoredAny>(minified).is_ok())
            },
        )
        .with_reset(restore_scratch)
        .with_deep_dive(),
    )?;

    registry.register(
        Candidate::new("serde_json (value size)", |corpus: &Corpus, _: &mut ScratchBuffer| {
            value_size(corpus.as_bytes())
        })
        .expecting_from(|corpus| value_size(corpus.as_bytes())),
    )?;

    registry.register(
        Candidate::new("serde_yaml", |corpus: &Corpus, _: &mut ScratchBuffer| {
            Outcome::from(serde_yaml::from_slice::<serde_yaml::Value>(corpus.as_bytes()).is_ok())
        })
        .verbose_only()
        .with_deep_dive(),
    )?;

    registry.register(
        Candidate::new("memcpy", |corpus: &Corpus, scratch: &mut ScratchBuffer| {
            let dst = scratch.contents_mut();
            if dst.len() != corpus.volume() {
                return Outcome::Flag(false);
            }
            dst.copy_from_slice(black_box(corpus.as_bytes()));
            Outcome::Flag(true)
        })
        .verbose_only(),
    )?;

    Ok(registry)
}

/// Sums the lengths of all lines, reading them one owned line at a time.
pub fn sum_line_lengths(data: &[u8]) -> usize {
    BufRead::split(data, b'\n')
        .map_while(|line| line.ok())
        .map(|line| line.len())
        .sum()
}

fn line_lengths_reference(data: &[u8]) -> usize {
    data.split(|&b| b == b'\n').map(<[u8]>::len).sum()
}

/// Removes insignificant JSON whitespace in place and returns the new length.
///
/// Bytes inside string literals, including escaped quotes, are kept.
pub fn minify_in_place(buf: &mut [u8]) -> usize {
    let mut write = 0;
    let mut in_string = false;
    let mut escaped = false;

    for read in 0..buf.len() {
        let byte = buf[read];
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
        } else if matches!(byte, b' ' | b'\t' | b'\n' | b'\r') {
            continue;
        } else if byte == b'"' {
            in_string = true;
        }
        buf[write] = byte;
        write += 1;
    }
    write
}

/// Number of top-level entries: 0 for null, 1 for a scalar, the length of
/// an array or object. Unparseable input yields `Flag(false)`.
pub fn value_size(data: &[u8]) -> Outcome {
    match serde_json::from_slice::<Value>(data) {
        Ok(Value::Null) => Outcome::Count(0),
        Ok(Value::Array(items)) => Outcome::from(items.len()),
        Ok(Value::Object(map)) => Outcome::from(map.len()),
        Ok(_) => Outcome::Count(1),
        Err(_) => Outcome::Flag(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parsecomp_bench::core::OutputMode;

    #[test]
    fn test_registry_order() {
        let registry = builtin_registry().unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "getline",
                "serde_json (dynamic mem)",
                "serde_json",
                "serde_json (utf-8 validated)",
                "serde_json (in-place minify)",
                "serde_json (value size)",
                "serde_yaml",
                "memcpy",
            ]
        );
    }

    #[test]
    fn test_table_mode_candidates() {
        let mut registry = builtin_registry().unwrap();
        let names: Vec<_> = registry
            .active_mut(OutputMode::Table)
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "serde_json",
                "serde_json (utf-8 validated)",
                "serde_json (in-place minify)",
                "serde_json (value size)",
            ]
        );
    }

    #[test]
    fn test_every_candidate_accepts_valid_json() {
        let corpus = Corpus::from_bytes("inline", b"{\n  \"a\": [1, 2, 3],\n  \"b\": \"x y\"\n}\n");
        let mut scratch = ScratchBuffer::new();
        let mut registry = builtin_registry().unwrap();

        for candidate in registry.iter_mut() {
            let expected = candidate.expected_for(&corpus);
            restore_scratch(&corpus, &mut scratch);
            candidate.reset(&corpus, &mut scratch);
            assert_eq!(
                candidate.invoke(&corpus, &mut scratch),
                expected,
                "{} disagrees",
                candidate.name()
            );
        }
    }

    #[test]
    fn test_line_lengths() {
        assert_eq!(sum_line_lengths(b"ab\ncde\n"), 5);
        assert_eq!(sum_line_lengths(b"no newline"), 10);
        assert_eq!(sum_line_lengths(b""), 0);
        assert_eq!(line_lengths_reference(b"ab\ncde\n"), 5);
    }

    #[test]
    fn test_minify_keeps_strings() {
        let mut buf = br#"{ "a b" : [ 1 , "\" x" ] }"#.to_vec();
        let len = minify_in_place(&mut buf);
        assert_eq!(&buf[..len], br#"{"a b":[1,"\" x"]}"#);
    }

    #[test]
    fn test_value_size() {
        assert_eq!(value_size(b"null"), Outcome::Count(0));
        assert_eq!(value_size(b"42"), Outcome::Count(1));
        assert_eq!(value_size(b"[1,2,3]"), Outcome::Count(3));
        assert_eq!(value_size(br#"{"a":1,"b":2}"#), Outcome::Count(2));
        assert_eq!(value_size(b"{"), Outcome::Flag(false));
    }
}
