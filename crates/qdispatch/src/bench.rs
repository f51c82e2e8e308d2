//! Benchmark workloads that exercise [`Queue`] under realistic load.
//!
//! These are clients of the dispatch runtime, not part of its contract.
//! Each function dispatches a batch of work through a `Queue`, drains with
//! `has_work_left(true)`, and reports the wall-clock elapsed.

use qdispatch_core::{Queue, QueueFunction};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Result of one benchmark run: how long the dispatched work took, and how
/// many items were processed.
#[derive(Debug, Clone, Copy)]
pub struct BenchResult {
    pub elapsed: Duration,
    pub items: usize,
}

fn lcg_next(state: &mut u64) -> u64 {
    // Numerical Recipes LCG; deterministic so benchmark runs are repeatable.
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    *state
}

/// Sort `num_vectors` randomly-generated vectors of `vector_len` floats each
/// across `num_threads` workers, grounded in the original vector-sort
/// benchmark's manual-vs-threaded comparison.
pub fn vector_sort(num_threads: usize, num_vectors: usize, vector_len: usize) -> BenchResult {
    let mut seed = 0x5EED_u64;
    let vectors: Vec<Vec<f64>> = (0..num_vectors)
        .map(|_| {
            (0..vector_len)
                .map(|_| (lcg_next(&mut seed) % 1_000_003) as f64)
                .collect()
        })
        .collect();

    let sorted = Arc::new(Mutex::new(vec![Vec::new(); num_vectors]));
    let results = sorted.clone();

    let start = Instant::now();

    // `post` alone can't recover which slot a result belongs to without
    // carrying the index through `main`'s return value, so main returns
    // `(index, sorted_vec)` and post writes it into place.
    let qf = QueueFunction::<(usize, Vec<f64>), (usize, Vec<f64>)>::new(|(index, mut v)| {
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        (index, v)
    })
    .with_post(move |(index, v)| {
        results.lock().unwrap()[index] = v;
    });

    let queue = Queue::new(qf, num_threads).expect("failed to start vector-sort queue");
    for (index, vector) in vectors.into_iter().enumerate() {
        queue.dispatch((index, vector));
    }
    queue.has_work_left(true);
    let elapsed = start.elapsed();

    debug_assert!(sorted.lock().unwrap().iter().all(|v| v.windows(2).all(|w| w[0] <= w[1])));

    BenchResult {
        elapsed,
        items: num_vectors,
    }
}

/// Dispatch `num_tasks` simulated fixed-latency "downloads" (a sleep-based
/// stand-in; real network access is out of scope for this crate).
pub fn simulated_downloads(num_threads: usize, num_tasks: usize, latency: Duration) -> BenchResult {
    let completed = Arc::new(AtomicUsize::new(0));
    let c = completed.clone();

    let qf = QueueFunction::<(), Duration>::new(move |d| {
        std::thread::sleep(d);
        c.fetch_add(1, Ordering::SeqCst);
    });

    let queue = Queue::new(qf, num_threads).expect("failed to start download queue");
    let start = Instant::now();
    for _ in 0..num_tasks {
        queue.dispatch(latency);
    }
    queue.has_work_left(true);
    let elapsed = start.elapsed();

    BenchResult {
        elapsed,
        items: completed.load(Ordering::SeqCst),
    }
}

/// Write and read back `num_files` small temp files in parallel across
/// `num_threads` workers.
pub fn file_io(num_threads: usize, num_files: usize) -> BenchResult {
    let dir = tempfile::tempdir().expect("failed to create scratch dir");
    let dir_path = Arc::new(dir.path().to_path_buf());

    let verified = Arc::new(AtomicUsize::new(0));
    let v = verified.clone();
    let dir_for_main = dir_path.clone();

    let qf = QueueFunction::<bool, usize>::new(move |index| {
        let path = dir_for_main.join(format!("item-{index}.bin"));
        let payload = format!("qdispatch-{index}").into_bytes();
        let mut file = std::fs::File::create(&path).expect("create failed");
        file.write_all(&payload).expect("write failed");
        drop(file);
        let read_back = std::fs::read(&path).expect("read failed");
        let _ = std::fs::remove_file(&path);
        read_back == payload
    })
    .with_post(move |ok| {
        if ok {
            v.fetch_add(1, Ordering::SeqCst);
        }
    });

    let queue = Queue::new(qf, num_threads).expect("failed to start file-io queue");
    let start = Instant::now();
    for index in 0..num_files {
        queue.dispatch(index);
    }
    queue.has_work_left(true);
    let elapsed = start.elapsed();

    BenchResult {
        elapsed,
        items: verified.load(Ordering::SeqCst),
    }
}

/// Allocate and free `buffers_per_task` buffers of `buffer_size` bytes,
/// `num_tasks` times, across `num_threads` workers.
pub fn malloc_pressure(
    num_threads: usize,
    num_tasks: usize,
    buffers_per_task: usize,
    buffer_size: usize,
) -> BenchResult {
    let qf = QueueFunction::<(), ()>::new(move |_| {
        let mut buffers: Vec<Vec<u8>> = Vec::with_capacity(buffers_per_task);
        for _ in 0..buffers_per_task {
            buffers.push(vec![0u8; buffer_size]);
        }
        std::hint::black_box(&buffers);
    });

    let queue = Queue::new(qf, num_threads).expect("failed to start malloc-pressure queue");
    let start = Instant::now();
    for _ in 0..num_tasks {
        queue.dispatch(());
    }
    queue.has_work_left(true);
    let elapsed = start.elapsed();

    BenchResult {
        elapsed,
        items: num_tasks,
    }
}

/// Compare a single-threaded baseline against a `Queue`-dispatched run of
/// the same triangular numeric workload, grounded in the original
/// manual-vs-threaded math benchmark.
pub fn thread_math(num_threads: usize, num_arrays: usize, num_entries: usize) -> (Duration, Duration) {
    let mut seed = 0xABCD_u64;
    let data: Vec<Vec<f64>> = (0..num_arrays)
        .map(|_| {
            (0..num_entries)
                .map(|_| (lcg_next(&mut seed) % 1_000_003) as f64)
                .collect()
        })
        .collect();

    let manual_start = Instant::now();
    let mut manual_total = 0.0;
    for array in &data {
        manual_total += triangular_sum(array);
    }
    let manual_elapsed = manual_start.elapsed();
    std::hint::black_box(manual_total);

    let total = Arc::new(Mutex::new(0.0_f64));
    let t = total.clone();
    let data_for_main = Arc::new(data);
    let data_for_closure = data_for_main.clone();

    let qf = QueueFunction::<f64, usize>::new(move |array_index| triangular_sum(&data_for_closure[array_index]))
        .with_post(move |partial| {
            *t.lock().unwrap() += partial;
        });

    let queue = Queue::new(qf, num_threads).expect("failed to start thread-math queue");
    let parallel_start = Instant::now();
    for index in 0..data_for_main.len() {
        queue.dispatch(index);
    }
    queue.has_work_left(true);
    let parallel_elapsed = parallel_start.elapsed();

    (manual_elapsed, parallel_elapsed)
}

fn triangular_sum(array: &[f64]) -> f64 {
    let mut sum = 0.0;
    for (index, _) in array.iter().enumerate() {
        for (sub_index, value) in array.iter().take(index).enumerate() {
            sum = if sub_index % 2 == 0 { sum - value } else { sum + value };
        }
    }
    sum
}
