use crate::models::{IndicatorSnapshot, IndicatorsOutcome, PricePoint, Trend};

/// Simple Moving Average (SMA)
/// Returns a vector aligned with `values`:
/// - `None` until `window` values exist
/// - `Some(avg)` from index `window - 1` on
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    // Running sum over a sliding window; subtract the value that falls out.
    values
        .iter()
        .enumerate()
        .scan(0.0_f64, move |sum, (i, &v)| {
            *sum += v;
            if i >= window {
                *sum -= values[i - window];
            }

            let out = if i + 1 >= window {
                Some(*sum / window as f64)
            } else {
                None
            };

            Some(out)
        })
        .collect()
}

/// Exponential Moving Average (EMA)
///
/// Seeded at `values[0]` (not an initial average), then
/// `ema[i] = k * values[i] + (1 - k) * ema[i-1]` with `k = 2 / (window + 1)`.
/// Defined at every index, so `ema(values, 1)` is the identity series.
pub fn ema(values: &[f64], window: usize) -> Vec<f64> {
    if values.is_empty() || window == 0 {
        return Vec::new();
    }

    let k = 2.0 / (window as f64 + 1.0);

    values
        .iter()
        .enumerate()
        .scan(values[0], move |prev, (i, &v)| {
            let next = if i == 0 { v } else { k * v + (1.0 - k) * *prev };
            *prev = next;
            Some(next)
        })
        .collect()
}

/// Moving Average Convergence Divergence (MACD)
///
/// - MACD line: EMA12 - EMA26
/// - Signal line: EMA9 of the MACD line
/// - Histogram: MACD - signal
///
/// Returns `(macd_line, signal_line, histogram)`, each aligned with `values`.
pub fn macd(values: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    if values.is_empty() {
        return (Vec::new(), Vec::new(), Vec::new());
    }

    let fast = ema(values, 12);
    let slow = ema(values, 26);

    let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal_line = ema(&macd_line, 9);
    let histogram: Vec<f64> = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    (macd_line, signal_line, histogram)
}

/// Relative Strength Index (RSI), Wilder smoothing.
///
/// The first `period` deltas seed a simple average gain/loss; the first RSI
/// appears at index `period`. Afterwards:
/// `avg = (avg * (period - 1) + delta) / period`.
///
/// A zero average loss maps to RSI 100 exactly. Downstream score thresholds
/// are tuned against that convention, so it is kept rather than letting RS
/// grow unbounded.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if values.len() <= period || period == 0 {
        return result;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let delta = values[i] - values[i - 1];
        if delta > 0.0 {
            avg_gain += delta / period as f64;
        } else {
            avg_loss += -delta / period as f64;
        }
    }
    result[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    for i in (period + 1)..values.len() {
        let delta = values[i] - values[i - 1];
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { -delta } else { 0.0 };

        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;

        result[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Bollinger Bands over a trailing window: SMA ± `num_std_dev` population
/// standard deviations.
///
/// Returns `(middle, upper, lower)`, each aligned with `values`.
pub fn bollinger(
    values: &[f64],
    period: usize,
    num_std_dev: f64,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    if values.is_empty() || period == 0 {
        return (Vec::new(), Vec::new(), Vec::new());
    }

    let len = values.len();
    let middle = sma(values, period);
    let mut upper: Vec<Option<f64>> = vec![None; len];
    let mut lower: Vec<Option<f64>> = vec![None; len];

    for i in 0..len {
        if let Some(mean) = middle[i] {
            let window = &values[i + 1 - period..=i];
            let variance = window
                .iter()
                .map(|&x| {
                    let diff = x - mean;
                    diff * diff
                })
                .sum::<f64>()
                / period as f64;
            let std_dev = variance.sqrt();

            upper[i] = Some(mean + num_std_dev * std_dev);
            lower[i] = Some(mean - num_std_dev * std_dev);
        }
    }

    (middle, upper, lower)
}

/// Percent change over a horizon of `h` points, measured at the series tail:
/// `((last - values[n-1-h]) / values[n-1-h]) * 100`.
/// Undefined when the series has no point `h` steps back.
pub fn pct_change(values: &[f64], h: usize) -> Option<f64> {
    let n = values.len();
    if n <= h || h == 0 {
        return None;
    }
    let base = values[n - 1 - h];
    let last = values[n - 1];
    Some((last - base) / base * 100.0)
}

/// Trend classification from the 20/60-day SMA pair.
pub fn classify_trend(last: f64, sma20: Option<f64>, sma60: Option<f64>) -> Trend {
    match (sma20, sma60) {
        (Some(s20), Some(s60)) => {
            if s20 > s60 && last > s20 {
                Trend::Up
            } else if s20 < s60 && last < s20 {
                Trend::Down
            } else {
                Trend::Range
            }
        }
        _ => Trend::Unknown,
    }
}

/// Compute an indicator snapshot at the latest point of `series`.
///
/// Below `min_points` the result is a typed insufficient-data outcome; a
/// short series is expected input, never an error.
pub fn compute_snapshot(series: &[PricePoint], min_points: usize) -> IndicatorsOutcome {
    if series.len() < min_points {
        return IndicatorsOutcome::InsufficientData {
            required: min_points,
            actual: series.len(),
        };
    }

    let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
    let last = closes[closes.len() - 1];

    let sma20 = sma(&closes, 20).last().copied().flatten();
    let sma60 = sma(&closes, 60).last().copied().flatten();
    let (macd_line, _signal, histogram) = macd(&closes);
    let rsi14 = rsi(&closes, 14).last().copied().flatten();

    IndicatorsOutcome::Ready(IndicatorSnapshot {
        last,
        sma20,
        sma60,
        macd: macd_line.last().copied(),
        macd_hist: histogram.last().copied(),
        rsi14,
        ret20: pct_change(&closes, 20),
        ret60: pct_change(&closes, 60),
        trend: classify_trend(last, sma20, sma60),
    })
}
