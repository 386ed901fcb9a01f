//! Multi-producer integration tests for the probe.
//!
//! These validate the probe's concurrency contract end to end: many producer
//! threads sending into one bounded ingestion channel, one background
//! consumer draining it, and callers pushing and querying concurrently,
//! with no value lost or reordered within its producer's own sequence.

use signal_probe::{Probe, ProbeConfig};
use std::thread;

fn probe_with(max_signal_length: usize, input_buffer_length: usize) -> Probe {
    Probe::with_config(ProbeConfig {
        max_signal_length,
        input_buffer_length,
        name: Some("stress".to_string()),
    })
    .expect("valid config")
}

/// Values are encoded as producer * 1000 + sequence so each producer's
/// subsequence can be recovered from the interleaved signal.
fn encode(producer: usize, seq: usize) -> f64 {
    (producer * 1000 + seq) as f64
}

#[test]
fn producers_lose_nothing_and_keep_their_own_order() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 250;

    let probe = probe_with(usize::MAX, 8);
    probe.activate().expect("activate");

    let mut handles = Vec::new();
    for producer in 0..PRODUCERS {
        let probe = probe.clone();
        handles.push(thread::spawn(move || {
            for seq in 0..PER_PRODUCER {
                probe.send(encode(producer, seq)).expect("send");
            }
        }));
    }
    for handle in handles {
        handle.join().expect("producer thread");
    }

    let signal = probe.deactivate();
    assert_eq!(signal.len(), PRODUCERS * PER_PRODUCER);

    // Channel FIFO order preserves each producer's subsequence even though
    // producers interleave arbitrarily with each other.
    for producer in 0..PRODUCERS {
        let own: Vec<f64> = signal
            .iter()
            .copied()
            .filter(|v| *v >= encode(producer, 0) && *v < encode(producer, PER_PRODUCER))
            .collect();
        let expected: Vec<f64> = (0..PER_PRODUCER).map(|seq| encode(producer, seq)).collect();
        assert_eq!(own, expected, "producer {producer} values lost or reordered");
    }
}

#[test]
fn bounded_probe_retains_only_the_newest_values() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 250;
    const CAPACITY: usize = 100;

    let probe = probe_with(CAPACITY, 8);
    probe.activate().expect("activate");

    let mut handles = Vec::new();
    for producer in 0..PRODUCERS {
        let probe = probe.clone();
        handles.push(thread::spawn(move || {
            for seq in 0..PER_PRODUCER {
                probe.send(encode(producer, seq)).expect("send");
            }
        }));
    }
    for handle in handles {
        handle.join().expect("producer thread");
    }

    let signal = probe.deactivate();
    assert_eq!(signal.len(), CAPACITY);

    // FIFO eviction keeps a suffix of the delivery order, so each producer's
    // surviving values are an increasing tail of its own sequence.
    for producer in 0..PRODUCERS {
        let own: Vec<f64> = signal
            .iter()
            .copied()
            .filter(|v| *v >= encode(producer, 0) && *v < encode(producer, PER_PRODUCER))
            .collect();
        assert!(
            own.windows(2).all(|pair| pair[0] < pair[1]),
            "producer {producer} survivors out of order: {own:?}"
        );
    }
}

#[test]
fn pushes_interleave_with_sends_without_loss() {
    const PRODUCERS: usize = 2;
    const PER_PRODUCER: usize = 100;
    const PUSHES: usize = 50;

    let probe = probe_with(usize::MAX, 8);
    probe.activate().expect("activate");

    let mut handles = Vec::new();
    for producer in 0..PRODUCERS {
        let probe = probe.clone();
        handles.push(thread::spawn(move || {
            for seq in 0..PER_PRODUCER {
                probe.send(encode(producer, seq)).expect("send");
            }
        }));
    }

    // Direct pushes from this thread interleave with the channel path.
    for seq in 0..PUSHES {
        probe.push(encode(100, seq), seq % 2 == 0);
    }

    for handle in handles {
        handle.join().expect("producer thread");
    }

    let mut signal = probe.deactivate();
    assert_eq!(signal.len(), PRODUCERS * PER_PRODUCER + PUSHES);

    let mut expected: Vec<f64> = Vec::new();
    for producer in 0..PRODUCERS {
        expected.extend((0..PER_PRODUCER).map(|seq| encode(producer, seq)));
    }
    expected.extend((0..PUSHES).map(|seq| encode(100, seq)));
    expected.sort_by(f64::total_cmp);
    signal.sort_by(f64::total_cmp);
    assert_eq!(signal, expected);
}

#[test]
fn state_queries_stay_responsive_under_backpressure() {
    const VALUES: usize = 200;

    // Channel capacity 1: the producer is throttled by consumer speed.
    let probe = probe_with(usize::MAX, 1);
    probe.activate().expect("activate");

    let producer = {
        let probe = probe.clone();
        thread::spawn(move || {
            for seq in 0..VALUES {
                probe.send(seq as f64).expect("send");
            }
        })
    };

    // Activation queries must answer while the producer is blocked on the
    // full channel; they share no lock with the buffer or the channel.
    for _ in 0..100 {
        assert!(probe.is_active());
        let _ = probe.recent_value();
    }

    producer.join().expect("producer thread");
    let signal = probe.deactivate();
    assert_eq!(signal.len(), VALUES);
    let expected: Vec<f64> = (0..VALUES).map(|seq| seq as f64).collect();
    assert_eq!(signal, expected);
}
