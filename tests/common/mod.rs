//! Shared fixtures for the pipeline tests: synthetic bars and bar files.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::Path;

/// Element-wise comparison with a relative tolerance (absolute near zero).
/// NaN only matches NaN.
pub fn assert_series_eq(actual: &[f64], expected: &[f64], epsilon: f64, name: &str) {
    assert_eq!(actual.len(), expected.len(), "{name}: length");

    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        if e.is_nan() || a.is_nan() {
            assert!(a.is_nan() && e.is_nan(), "{name}[{i}]: {a} vs {e}");
            continue;
        }
        let scale = e.abs().max(1.0);
        assert!(
            (a - e).abs() <= epsilon * scale,
            "{name}[{i}]: expected {e}, got {a}"
        );
    }
}

// ============================================================================
// Synthetic Bars
// ============================================================================

/// `start, start + step, ...`
pub fn generate_linear(start: f64, step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

/// Seeded random walk, floored at one cent.
pub fn generate_random_walk(start: f64, volatility: f64, len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    let mut price = start;
    (0..len)
        .map(|i| {
            if i > 0 {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
                price = (price + (unit * 2.0 - 1.0) * volatility).max(0.01);
            }
            price
        })
        .collect()
}

/// Open/high/low/close/volume columns around a close series. Each bar opens
/// at the previous close.
pub fn generate_bars_from_close(close: &[f64], range_pct: f64) -> Vec<(&'static str, Vec<f64>)> {
    let open: Vec<f64> = close
        .iter()
        .enumerate()
        .map(|(i, &c)| if i == 0 { c } else { close[i - 1] })
        .collect();
    let half_range = |c: f64| c * range_pct * 0.5;
    let high = open
        .iter()
        .zip(close)
        .map(|(&o, &c)| o.max(c) + half_range(c))
        .collect();
    let low = open
        .iter()
        .zip(close)
        .map(|(&o, &c)| o.min(c) - half_range(c))
        .collect();
    let volume = (0..close.len()).map(|i| 1000.0 + 100.0 * i as f64).collect();

    vec![
        ("open", open),
        ("high", high),
        ("low", low),
        ("close", close.to_vec()),
        ("volume", volume),
    ]
}

// ============================================================================
// Bar Files
// ============================================================================

/// Write a bar file: an unnamed index column, a `time` column, then `columns`.
/// NaN cells are written empty.
pub fn write_bars_csv(path: &Path, columns: &[(&str, Vec<f64>)]) {
    let len = columns.first().map_or(0, |(_, values)| values.len());
    let mut out = String::from(",time");
    for (name, _) in columns {
        write!(out, ",{name}").unwrap();
    }
    out.push('\n');

    for row in 0..len {
        write!(out, "{row},2017-01-02 {:02}:{:02}", 9 + row / 60, row % 60).unwrap();
        for (_, values) in columns {
            let v = values[row];
            if v.is_nan() {
                out.push(',');
            } else {
                write!(out, ",{v}").unwrap();
            }
        }
        out.push('\n');
    }

    std::fs::write(path, out).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_eq_tolerance() {
        assert_series_eq(&[1.0, 100.0, f64::NAN], &[1.0, 100.0000001, f64::NAN], 1e-6, "ok");
    }

    #[test]
    #[should_panic]
    fn test_series_eq_nan_mismatch() {
        assert_series_eq(&[1.0], &[f64::NAN], 1e-10, "nan");
    }

    #[test]
    fn test_random_walk_is_seeded() {
        let walk = generate_random_walk(100.0, 1.0, 10, 12345);
        assert_eq!(walk, generate_random_walk(100.0, 1.0, 10, 12345));
        assert_eq!(walk[0], 100.0);
        assert!(walk.iter().all(|&p| p >= 0.01));
    }

    #[test]
    fn test_bars_open_at_previous_close() {
        let bars = generate_bars_from_close(&[10.0, 11.0], 0.1);
        assert_eq!(bars.len(), 5);
        assert_eq!(bars[0].1, vec![10.0, 10.0]);
        assert!(bars[1].1[1] > 11.0);
        assert!(bars[2].1[1] < 10.0);
    }

    #[test]
    fn test_write_bars_csv_blanks_nan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.csv");
        write_bars_csv(&path, &[("close", vec![1.0, f64::NAN])]);

        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, ",time,close\n0,2017-01-02 09:00,1\n1,2017-01-02 09:01,\n");
    }
}
