//! Integration tests for buffer storage semantics.
//!
//! These tests exercise capacity eviction, FIFO ordering and non-mutating
//! reads through the public `TimeSeriesBuffer` API.

use tsbuf::{ReturnType, Sample, Scalar, TimeSeriesBuffer, Window};

const CAPACITY: usize = 50;
const N: u32 = 10;

/// Deterministic stand-in for a random `(N, M)` input table.
fn table(batch: u32, width: usize) -> Vec<Vec<f64>> {
    (0..N)
        .map(|i| {
            let t = f64::from(batch * N + i);
            (0..width)
                .map(|col| {
                    #[allow(clippy::cast_precision_loss)]
                    let col = col as f64;
                    t + col * 0.25
                })
                .collect()
        })
        .collect()
}

fn as_rows(table: &[Vec<f64>]) -> Vec<Vec<Scalar>> {
    table
        .iter()
        .map(|row| row.iter().copied().map(Scalar::Plain).collect())
        .collect()
}

fn times(samples: &[Sample]) -> Vec<f64> {
    samples.iter().map(|s| s.time).collect()
}

#[test]
fn test_mixed_row_widths_then_pop() {
    let mut buffer = TimeSeriesBuffer::new(CAPACITY, ReturnType::List).unwrap();
    let mut counter = 0;

    for (batch, width) in [2usize, 3, 4].into_iter().enumerate() {
        let data = table(u32::try_from(batch).unwrap(), width);
        buffer.add_rows(as_rows(&data)).unwrap();

        counter += data.len();
        assert_eq!(buffer.len(), counter.min(CAPACITY));

        // Newest stored timestamp matches the newest input row
        let newest = buffer.show(1).into_samples();
        assert_eq!(newest[0].time, data[data.len() - 1][0]);
    }

    assert_eq!(buffer.len(), 30);

    let popped = buffer.pop(7).into_samples();
    let first_batch = table(0, 2);
    assert_eq!(popped.len(), 7);
    for (sample, row) in popped.iter().zip(&first_batch) {
        assert_eq!(sample.time, row[0]);
        assert_eq!(sample.value, row[1]);
    }
    assert_eq!(buffer.len(), 23);
}

#[test]
fn test_capacity_invariant() {
    let mut buffer = TimeSeriesBuffer::new(CAPACITY, ReturnType::List).unwrap();

    for batch in 0..8 {
        let data: Vec<[f64; 4]> = table(batch, 4)
            .into_iter()
            .map(|r| [r[0], r[1], r[2], r[3]])
            .collect();
        buffer.add_quads(data).unwrap();
        assert!(buffer.len() <= CAPACITY);
    }

    // 80 appended, only the newest 50 remain, oldest evicted first
    assert_eq!(buffer.len(), CAPACITY);
    assert_eq!(buffer.evicted(), 30);
    let stored: Vec<Sample> = buffer.samples().copied().collect();
    let expected: Vec<f64> = (30..80).map(f64::from).collect();
    assert_eq!(times(&stored), expected);
}

#[test]
fn test_batch_larger_than_capacity() {
    let mut buffer = TimeSeriesBuffer::new(3, ReturnType::List).unwrap();
    let rows: Vec<[f64; 3]> = (0..10).map(|i| [f64::from(i), 0.0, 0.0]).collect();

    assert_eq!(buffer.add_triples(rows).unwrap(), 10);

    let stored = buffer.show(Window::All).into_samples();
    assert_eq!(times(&stored), vec![7.0, 8.0, 9.0]);
}

#[test]
fn test_fifo_order_drains_buffer() {
    let mut buffer = TimeSeriesBuffer::new(CAPACITY, ReturnType::List).unwrap();
    let rows: Vec<[f64; 4]> = (0..20).map(|i| [f64::from(i), 0.1, 1.0, 0.2]).collect();
    buffer.add_quads(rows.clone()).unwrap();

    let mut drained = Vec::new();
    while !buffer.is_empty() {
        drained.extend(buffer.pop(1).into_samples());
    }

    let expected: Vec<Sample> = rows.into_iter().map(Sample::from).collect();
    assert_eq!(drained, expected);
    assert!(buffer.pop(1).is_empty());
}

#[test]
fn test_show_does_not_mutate() {
    let mut buffer = TimeSeriesBuffer::new(CAPACITY, ReturnType::List).unwrap();
    buffer
        .add_quads((0..5).map(|i| [f64::from(i), 0.0, 0.0, 0.0]))
        .unwrap();
    let before: Vec<Sample> = buffer.samples().copied().collect();

    for window in [
        Window::Last(0),
        Window::Last(1),
        Window::Last(5),
        Window::Last(500),
        Window::All,
    ] {
        let _ = buffer.show(window);
        assert_eq!(buffer.len(), 5);
    }

    let after: Vec<Sample> = buffer.samples().copied().collect();
    assert_eq!(before, after);
}

#[test]
fn test_show_all_returns_input_order() {
    let mut buffer = TimeSeriesBuffer::new(CAPACITY, ReturnType::List).unwrap();
    let rows: Vec<[f64; 4]> = (0..N)
        .map(|i| {
            let t = f64::from(i);
            [t, t * 0.01, t * 3.0, t * 0.1]
        })
        .collect();
    buffer.add_quads(rows.clone()).unwrap();

    let shown = buffer.show(Window::from_signed(-1).unwrap()).into_samples();
    let shown_rows: Vec<[f64; 4]> = shown.iter().map(Sample::to_array).collect();
    assert_eq!(shown_rows, rows);
}

#[test]
fn test_show_last_n_is_chronological() {
    let mut buffer = TimeSeriesBuffer::new(CAPACITY, ReturnType::List).unwrap();
    buffer
        .add_quads((0..6).map(|i| [f64::from(i), 0.0, 0.0, 0.0]))
        .unwrap();

    let shown = buffer.show(3).into_samples();
    assert_eq!(times(&shown), vec![3.0, 4.0, 5.0]);
}

#[test]
fn test_reuse_after_drain() {
    let mut buffer = TimeSeriesBuffer::new(4, ReturnType::List).unwrap();
    buffer
        .add_quads((0..6).map(|i| [f64::from(i), 0.0, 0.0, 0.0]))
        .unwrap();
    let _ = buffer.pop(10);
    assert!(buffer.is_empty());

    buffer
        .add_quads((10..13).map(|i| [f64::from(i), 0.0, 0.0, 0.0]))
        .unwrap();
    let shown = buffer.show(Window::All).into_samples();
    assert_eq!(times(&shown), vec![10.0, 11.0, 12.0]);
}
