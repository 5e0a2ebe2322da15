use std::collections::VecDeque;

/// Samples retained per windowed metric
pub const HISTORY_CAPACITY: usize = 10;

/// Metrics that keep a trend window; the rest are shown as instantaneous gauges only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowedMetric {
    Voltage,
    Current,
}

/// Bounded FIFO of the most recent values, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl HistoryWindow {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a value, evicting from the front once the window is full
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// Relative-time labels, "T-n" for the oldest sample down to "T-1" for the newest
    pub fn labels(&self) -> Vec<String> {
        let len = self.values.len();
        (0..len).map(|i| format!("T-{}", len - i)).collect()
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Voltage and current trend windows, updated independently
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryBuffer {
    voltage: HistoryWindow,
    current: HistoryWindow,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, metric: WindowedMetric, value: f64) -> &HistoryWindow {
        let window = match metric {
            WindowedMetric::Voltage => &mut self.voltage,
            WindowedMetric::Current => &mut self.current,
        };
        window.push(value);
        window
    }

    pub fn window(&self, metric: WindowedMetric) -> &HistoryWindow {
        match metric {
            WindowedMetric::Voltage => &self.voltage,
            WindowedMetric::Current => &self.current,
        }
    }
}
