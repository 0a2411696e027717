//! Common utilities for benchmarks

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(5))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

/// `count` release strings mixing finals, pre-releases and post-releases
pub fn release_list(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 4 {
            0 => format!("{}.{}.{}", i / 100, (i / 10) % 10, i % 10),
            1 => format!("{}.{}.0rc{}", i / 100, (i / 10) % 10, i % 3),
            2 => format!("{}.{}.{}.post1", i / 100, (i / 10) % 10, i % 10),
            _ => format!("1!{}.{}.dev{}", i / 100, i % 10, i % 5),
        })
        .collect()
}
