//! Packet stream metrics
//!
//! Counters for report decoding plus an in-memory aggregator over emitted
//! packets, used by the CLI to print an end-of-run summary.

use contracts::Packet;
use metrics::counter;

/// Record one successfully decoded bridge report.
pub fn record_report_decoded(report_type: &str) {
    counter!(
        "station_reports_decoded_total",
        "report_type" => report_type.to_string()
    )
    .increment(1);
}

/// Record one report line that failed to decode.
pub fn record_decode_failure(reason: &str) {
    counter!(
        "station_report_decode_failures_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Stream aggregator
///
/// Folds emitted packets into running statistics so a replay or a bounded
/// stream can end with a one-shot summary, independent of the Prometheus
/// exporter.
#[derive(Debug, Clone, Default)]
pub struct StreamMetricsAggregator {
    /// Packets seen
    pub total_packets: u64,

    /// Packets carrying a rain delta
    pub rain_ticks: u64,

    /// Accumulated rain over the stream (cm)
    pub rain_total_cm: f64,

    /// First packet timestamp (epoch seconds)
    pub first_date_time: Option<i64>,

    /// Last packet timestamp (epoch seconds)
    pub last_date_time: Option<i64>,

    /// Outdoor temperature statistics (degrees C)
    pub out_temp_stats: RunningStats,

    /// Barometer statistics (hPa)
    pub barometer_stats: RunningStats,

    /// Wind speed statistics (km/h)
    pub wind_speed_stats: RunningStats,
}

impl StreamMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one emitted packet into the aggregate.
    pub fn update(&mut self, packet: &Packet) {
        self.total_packets += 1;

        if self.first_date_time.is_none() {
            self.first_date_time = Some(packet.date_time);
        }
        self.last_date_time = Some(packet.date_time);

        if let Some(rain) = packet.rain {
            self.rain_ticks += 1;
            self.rain_total_cm += rain;
        }
        if let Some(temp) = packet.out_temp {
            self.out_temp_stats.push(temp);
        }
        if let Some(pressure) = packet.barometer {
            self.barometer_stats.push(pressure);
        }
        if let Some(speed) = packet.wind_speed {
            self.wind_speed_stats.push(speed);
        }
    }

    /// Produce the summary report.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_packets: self.total_packets,
            rain_ticks: self.rain_ticks,
            rain_total_cm: self.rain_total_cm,
            span_secs: match (self.first_date_time, self.last_date_time) {
                (Some(first), Some(last)) => last - first,
                _ => 0,
            },
            out_temp: StatsSummary::from(&self.out_temp_stats),
            barometer: StatsSummary::from(&self.barometer_stats),
            wind_speed: StatsSummary::from(&self.wind_speed_stats),
        }
    }

    /// Reset to empty.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One-shot summary of an emitted packet stream.
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_packets: u64,
    pub rain_ticks: u64,
    pub rain_total_cm: f64,
    pub span_secs: i64,
    pub out_temp: StatsSummary,
    pub barometer: StatsSummary,
    pub wind_speed: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Packet Stream Summary ===")?;
        writeln!(f, "Total packets: {}", self.total_packets)?;
        writeln!(f, "Stream span: {}s", self.span_secs)?;
        writeln!(
            f,
            "Rain: {:.2} cm over {} ticks",
            self.rain_total_cm, self.rain_ticks
        )?;
        writeln!(f, "Outdoor temp (C): {}", self.out_temp)?;
        writeln!(f, "Barometer (hPa): {}", self.barometer)?;
        writeln!(f, "Wind speed (km/h): {}", self.wind_speed)?;
        Ok(())
    }
}

/// Summary of one running statistic.
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm).
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a sample.
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = StreamMetricsAggregator::new();

        let mut packet = Packet::default();
        packet.date_time = 1000;
        packet.out_temp = Some(18.5);
        packet.rain = Some(0.5);
        aggregator.update(&packet);

        let mut next = Packet::default();
        next.date_time = 1060;
        next.out_temp = Some(19.5);
        aggregator.update(&next);

        assert_eq!(aggregator.total_packets, 2);
        assert_eq!(aggregator.rain_ticks, 1);
        assert!((aggregator.rain_total_cm - 0.5).abs() < 1e-10);
        assert_eq!(aggregator.out_temp_stats.count(), 2);

        let summary = aggregator.summary();
        assert_eq!(summary.span_secs, 60);
        assert!((summary.out_temp.mean - 19.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = StreamMetricsAggregator::new();
        let mut packet = Packet::default();
        packet.date_time = 1000;
        packet.wind_speed = Some(8.0);
        aggregator.update(&packet);

        let output = format!("{}", aggregator.summary());
        assert!(output.contains("Total packets: 1"));
        assert!(output.contains("Barometer (hPa): N/A"));
    }
}
