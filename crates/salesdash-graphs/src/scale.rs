//! Scales mapping data values to pixel positions and colors.
//!
//! Every scale is a pure value type: build it from a domain and a range, then
//! call `map`. Continuous scales extrapolate outside their domain rather than
//! clamping.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use std::collections::HashMap;
use std::hash::Hash;

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Integer tick indices plus the increment that turns them into values.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TickSpec {
    first: i64,
    last: i64,
    /// Positive: multiply by it. Negative: divide by its magnitude.
    increment: f64,
}

impl TickSpec {
    fn new(start: f64, stop: f64, count: f64) -> Self {
        let step = (stop - start) / count.max(0.0);
        let power = step.log10().floor();
        let error = step / 10_f64.powf(power);
        let factor = if error >= E10 {
            10.0
        } else if error >= E5 {
            5.0
        } else if error >= E2 {
            2.0
        } else {
            1.0
        };

        let (mut first, mut last, increment) = if power < 0.0 {
            let inc = 10_f64.powf(-power) / factor;
            let mut i1 = (start * inc).round();
            let mut i2 = (stop * inc).round();
            if i1 / inc < start {
                i1 += 1.0;
            }
            if i2 / inc > stop {
                i2 -= 1.0;
            }
            (i1, i2, -inc)
        } else {
            let inc = 10_f64.powf(power) * factor;
            let mut i1 = (start / inc).round();
            let mut i2 = (stop / inc).round();
            if i1 * inc < start {
                i1 += 1.0;
            }
            if i2 * inc > stop {
                i2 -= 1.0;
            }
            (i1, i2, inc)
        };

        if last < first && (0.5..2.0).contains(&count) {
            return Self::new(start, stop, count * 2.0);
        }
        if !first.is_finite() || !last.is_finite() {
            first = 0.0;
            last = -1.0;
        }

        Self {
            first: first as i64,
            last: last as i64,
            increment,
        }
    }

    fn value(&self, i: i64) -> f64 {
        if self.increment < 0.0 {
            i as f64 / -self.increment
        } else {
            i as f64 * self.increment
        }
    }
}

/// Returns roughly `count` round values (1, 2 or 5 times a power of ten)
/// inside `[start, stop]`, in the order of the arguments.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let spec = TickSpec::new(lo, hi, count as f64);
    if spec.last < spec.first {
        return Vec::new();
    }

    let mut values: Vec<f64> = (spec.first..=spec.last).map(|i| spec.value(i)).collect();
    if reverse {
        values.reverse();
    }
    values
}

/// Signed tick increment: positive steps are multiples, negative are
/// reciprocals, zero means no usable step.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    if !(start.is_finite() && stop.is_finite()) || count == 0 || start >= stop {
        return 0.0;
    }
    TickSpec::new(start, stop, count as f64).increment
}

/// Affine mapping `[d0, d1] → [r0, r1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Creates a scale mapping `domain` onto `range`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Input interval.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Output interval.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Maps a domain value to the range.
    ///
    /// Exact at both endpoints. A zero-width domain maps everything to the
    /// middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            return (r0 + r1) / 2.0;
        }
        let t = (value - d0) / (d1 - d0);
        r0 * (1.0 - t) + r1 * t
    }

    /// Maps a range value back to the domain.
    pub fn invert(&self, position: f64) -> f64 {
        LinearScale::new(self.range, self.domain).map(position)
    }

    /// Round tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    /// Extends the domain outward to round tick boundaries.
    pub fn nice(self, count: usize) -> Self {
        let (d0, d1) = self.domain;
        let reverse = d1 < d0;
        let (mut start, mut stop) = if reverse { (d1, d0) } else { (d0, d1) };

        let mut previous = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if previous == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous = Some(step);
        }

        let domain = if reverse { (stop, start) } else { (start, stop) };
        Self::new(domain, self.range)
    }
}

/// Calendar interval used to place time ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInterval {
    /// Midnight of every `n`th day of the month.
    Days(u32),
    /// Midnight of every Sunday.
    Week,
    /// First of every `n`th month.
    Months(u32),
    /// January 1st of every `n`th year.
    Years(i32),
}

const MS_DAY: f64 = 86_400_000.0;
const MS_WEEK: f64 = MS_DAY * 7.0;
const MS_MONTH: f64 = MS_DAY * 30.0;
const MS_YEAR: f64 = MS_DAY * 365.0;

const TIME_INTERVALS: [(TimeInterval, f64); 6] = [
    (TimeInterval::Days(1), MS_DAY),
    (TimeInterval::Days(2), 2.0 * MS_DAY),
    (TimeInterval::Week, MS_WEEK),
    (TimeInterval::Months(1), MS_MONTH),
    (TimeInterval::Months(3), 3.0 * MS_MONTH),
    (TimeInterval::Years(1), MS_YEAR),
];

impl TimeInterval {
    /// Picks the interval giving about `count` ticks across `span_ms`.
    pub fn for_span(span_ms: f64, count: usize) -> Self {
        let target = span_ms.abs() / count.max(1) as f64;
        let i = TIME_INTERVALS.partition_point(|(_, ms)| *ms <= target);

        if i == 0 {
            TimeInterval::Days(1)
        } else if i == TIME_INTERVALS.len() {
            let step = tick_increment(0.0, span_ms.abs() / MS_YEAR, count).max(1.0);
            TimeInterval::Years(step.round() as i32)
        } else {
            let (below, below_ms) = TIME_INTERVALS[i - 1];
            let (above, above_ms) = TIME_INTERVALS[i];
            if target / below_ms < above_ms / target {
                below
            } else {
                above
            }
        }
    }

    fn matches(self, date: NaiveDate) -> bool {
        match self {
            TimeInterval::Days(n) => (date.day() - 1) % n.max(1) == 0,
            TimeInterval::Week => date.weekday() == Weekday::Sun,
            TimeInterval::Months(n) => date.day() == 1 && date.month0() % n.max(1) == 0,
            TimeInterval::Years(n) => date.ordinal() == 1 && date.year().rem_euclid(n.max(1)) == 0,
        }
    }

    fn advance(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimeInterval::Days(_) | TimeInterval::Week => date.succ_opt(),
            TimeInterval::Months(_) => {
                let (y, m) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                NaiveDate::from_ymd_opt(y, m, 1)
            }
            TimeInterval::Years(_) => NaiveDate::from_ymd_opt(date.year() + 1, 1, 1),
        }
    }

    fn first_candidate(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimeInterval::Days(_) | TimeInterval::Week => Some(date),
            TimeInterval::Months(_) if date.day() == 1 => Some(date),
            TimeInterval::Months(_) => self.advance(date),
            TimeInterval::Years(_) if date.ordinal() == 1 => Some(date),
            TimeInterval::Years(_) => self.advance(date),
        }
    }

    /// Tick label in the multi-scale style: year, month, then day.
    pub fn label(self, tick: NaiveDateTime) -> String {
        let date = tick.date();
        if date.ordinal() == 1 {
            tick.format("%Y").to_string()
        } else if date.day() == 1 {
            tick.format("%B").to_string()
        } else if date.weekday() == Weekday::Sun {
            tick.format("%b %d").to_string()
        } else {
            tick.format("%a %d").to_string()
        }
    }
}

fn epoch_ms(dt: NaiveDateTime) -> f64 {
    dt.and_utc().timestamp_millis() as f64
}

fn from_epoch_ms(ms: f64) -> Option<NaiveDateTime> {
    if !ms.is_finite() {
        return None;
    }
    chrono::DateTime::from_timestamp_millis(ms.round() as i64).map(|dt| dt.naive_utc())
}

/// Linear scale over timestamps, through epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (NaiveDateTime, NaiveDateTime),
    inner: LinearScale,
}

impl TimeScale {
    /// Creates a scale mapping `[start, end]` onto `range`.
    pub fn new(domain: (NaiveDateTime, NaiveDateTime), range: (f64, f64)) -> Self {
        Self {
            domain,
            inner: LinearScale::new((epoch_ms(domain.0), epoch_ms(domain.1)), range),
        }
    }

    /// Input interval.
    pub fn domain(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.domain
    }

    /// Output interval.
    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }

    /// Maps a timestamp to the range.
    pub fn map(&self, value: NaiveDateTime) -> f64 {
        self.inner.map(epoch_ms(value))
    }

    /// Maps a range value back to a timestamp.
    pub fn invert(&self, position: f64) -> Option<NaiveDateTime> {
        from_epoch_ms(self.inner.invert(position))
    }

    /// Interval that [`TimeScale::ticks`] uses for `count`.
    pub fn interval(&self, count: usize) -> TimeInterval {
        let (d0, d1) = self.inner.domain();
        TimeInterval::for_span(d1 - d0, count)
    }

    /// Calendar-aligned ticks inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<NaiveDateTime> {
        if count == 0 {
            return Vec::new();
        }
        let interval = self.interval(count);
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };

        // first midnight at or after `lo`
        let mut day = lo.date();
        if lo.time() != chrono::NaiveTime::MIN {
            day += Duration::days(1);
        }

        let mut ticks = Vec::new();
        let mut cursor = interval.first_candidate(day);
        while let Some(date) = cursor {
            let tick = date.and_time(chrono::NaiveTime::MIN);
            if tick > hi {
                break;
            }
            if interval.matches(date) {
                ticks.push(tick);
            }
            cursor = interval.advance(date);
        }
        ticks
    }

    /// Tick labels matching [`TimeScale::ticks`].
    pub fn tick_labels(&self, count: usize) -> Vec<(NaiveDateTime, String)> {
        let interval = self.interval(count);
        self.ticks(count)
            .into_iter()
            .map(|t| (t, interval.label(t)))
            .collect()
    }
}

/// Evenly spaced bands for an ordered set of categories.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
}

impl BandScale {
    /// Creates a band scale without padding. Duplicate categories keep their
    /// first position.
    pub fn new<I, S>(domain: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut index = HashMap::new();
        for category in domain {
            let category = category.into();
            if !index.contains_key(&category) {
                index.insert(category.clone(), ordered.len());
                ordered.push(category);
            }
        }

        Self {
            domain: ordered,
            index,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
        }
    }

    /// Sets inner and outer padding to the same fraction of a step.
    pub fn with_padding(self, padding: f64) -> Self {
        self.with_padding_inner(padding).with_padding_outer(padding)
    }

    /// Gap between bands, as a fraction of a step in `[0, 1]`.
    pub fn with_padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self
    }

    /// Gap before the first and after the last band, in steps.
    pub fn with_padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = padding.max(0.0);
        self
    }

    /// Categories in band order.
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Output interval.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Number of bands.
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    /// Whether there are no categories.
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    fn extent(&self) -> (f64, f64) {
        let (r0, r1) = self.range;
        if r1 < r0 {
            (r1, r0)
        } else {
            (r0, r1)
        }
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        let (lo, hi) = self.extent();
        let n = self.domain.len() as f64;
        (hi - lo) / (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0)
    }

    /// Width of each band.
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Start of the band at `index` in domain order.
    pub fn band_at(&self, index: usize) -> Option<f64> {
        let n = self.domain.len();
        if index >= n {
            return None;
        }
        let (lo, hi) = self.extent();
        let step = self.step();
        let start = lo + (hi - lo - step * (n as f64 - self.padding_inner)) * self.align;
        let slot = if self.range.1 < self.range.0 {
            n - 1 - index
        } else {
            index
        };
        Some(start + step * slot as f64)
    }

    /// Start of the band for `category`, `None` for unknown categories.
    pub fn band(&self, category: &str) -> Option<f64> {
        self.index_of(category).and_then(|i| self.band_at(i))
    }

    /// Position of `category` in the domain.
    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.index.get(category).copied()
    }

    /// Index of the band containing `position`, if any.
    pub fn locate(&self, position: f64) -> Option<usize> {
        let bandwidth = self.bandwidth();
        (0..self.domain.len()).find(|&i| {
            self.band_at(i)
                .is_some_and(|start| position >= start && position <= start + bandwidth)
        })
    }
}

/// Maps each key of an ordered domain to an output value, cycling through
/// the outputs.
#[derive(Debug, Clone)]
pub struct OrdinalScale<K, V> {
    index: HashMap<K, usize>,
    outputs: Vec<V>,
}

impl<K: Eq + Hash, V> OrdinalScale<K, V> {
    /// Creates an ordinal scale. The first occurrence of a key wins.
    pub fn new(domain: impl IntoIterator<Item = K>, outputs: Vec<V>) -> Self {
        let mut index = HashMap::new();
        for key in domain {
            let next = index.len();
            index.entry(key).or_insert(next);
        }
        Self { index, outputs }
    }

    /// Output for `key`, `None` for unknown keys or an empty output list.
    pub fn map<Q>(&self, key: &Q) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        if self.outputs.is_empty() {
            return None;
        }
        self.index
            .get(key)
            .map(|i| &self.outputs[i % self.outputs.len()])
    }
}
