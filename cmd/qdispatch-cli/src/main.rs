//! Benchmark driver for qdispatch.
//!
//! Recognizes `-tv|--test-vectors`, `-td|--test-downloads`, `-tf|--test-files`,
//! `-tm|--test-malloc`, `-tt|--test-threads`, and `-j|--num-threads=<N>`
//! (default 12). Each requested test runs once and prints its timing.

use qdispatch::args::Args;
use qdispatch::bench;

fn main() {
    let args = Args::from_env();

    let num_threads = args
        .value_as_uint("num-threads")
        .or_else(|| args.value_as_uint("j"))
        .unwrap_or(12);

    let test_vectors = args.exists("test-vectors") || args.exists("tv");
    let test_downloads = args.exists("test-downloads") || args.exists("td");
    let test_files = args.exists("test-files") || args.exists("tf");
    let test_malloc = args.exists("test-malloc") || args.exists("tm");
    let test_threads = args.exists("test-threads") || args.exists("tt");

    println!("=== qdispatch bench ({num_threads} workers) ===\n");

    if test_vectors {
        let result = bench::vector_sort(num_threads, 14, 2048);
        println!(
            "vector-sort:    {} vectors sorted in {:?}",
            result.items, result.elapsed
        );
    }

    if test_downloads {
        let result = bench::simulated_downloads(num_threads, 12, std::time::Duration::from_millis(100));
        println!(
            "downloads:      {} simulated downloads in {:?}",
            result.items, result.elapsed
        );
    }

    if test_files {
        let result = bench::file_io(num_threads, 12);
        println!(
            "file-io:        {} files round-tripped in {:?}",
            result.items, result.elapsed
        );
    }

    if test_malloc {
        let result = bench::malloc_pressure(num_threads, 64, 32, 4096);
        println!(
            "malloc:         {} tasks allocated/freed in {:?}",
            result.items, result.elapsed
        );
    }

    if test_threads {
        let (manual, parallel) = bench::thread_math(num_threads, 12, 256);
        println!("thread-math:    manual baseline {manual:?}, dispatched {parallel:?}");
    }

    if !(test_vectors || test_downloads || test_files || test_malloc || test_threads) {
        println!("no test flags given; pass one or more of -tv -td -tf -tm -tt");
    }
}
