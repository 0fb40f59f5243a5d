//! Metrics collector over prometheus-client atomics.
//!
//! Profiles register their counters and gauges on a [`MetricsBuilder`] at
//! startup; the finished [`MetricsCollector`] is shared read-only between the
//! API handlers (which hold the metric handles) and the exporter.
//!
//! The snapshot is written in the classic text exposition format: every
//! metric gets `# HELP`, `# TYPE` and one value line under its registered
//! name, in registration order.

use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::gauge::Gauge;
use std::collections::HashSet;
use std::fmt::{self, Write};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while registering metrics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("metric '{0}' is already registered")]
    Duplicate(String),

    #[error("invalid metric name '{0}'")]
    InvalidName(String),
}

/// Kind of a registered metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    /// Name used on `# TYPE` lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a registered metric, readable by name from the collector.
#[derive(Debug, Clone)]
pub enum MetricHandle {
    Counter(Counter),
    Gauge(Gauge),
}

impl MetricHandle {
    /// Kind of the underlying metric.
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricHandle::Counter(_) => MetricKind::Counter,
            MetricHandle::Gauge(_) => MetricKind::Gauge,
        }
    }

    /// Current value.
    pub fn value(&self) -> i64 {
        match self {
            MetricHandle::Counter(counter) => i64::try_from(counter.get()).unwrap_or(i64::MAX),
            MetricHandle::Gauge(gauge) => gauge.get(),
        }
    }
}

/// One registered metric.
#[derive(Debug, Clone)]
struct Registered {
    name: String,
    help: String,
    handle: MetricHandle,
}

/// Accumulates metric registrations before the collector is shared.
#[derive(Default)]
pub struct MetricsBuilder {
    names: HashSet<String>,
    metrics: Vec<Registered>,
}

impl MetricsBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a counter. Counters start at zero.
    pub fn counter(&mut self, name: &str, help: &str) -> Result<Counter, MetricsError> {
        let counter = Counter::default();
        self.claim(name, help, MetricHandle::Counter(counter.clone()))?;
        Ok(counter)
    }

    /// Register a gauge. Gauges start at zero.
    pub fn gauge(&mut self, name: &str, help: &str) -> Result<Gauge, MetricsError> {
        let gauge = Gauge::default();
        self.claim(name, help, MetricHandle::Gauge(gauge.clone()))?;
        Ok(gauge)
    }

    /// Freeze the registrations into a shareable collector.
    pub fn build(self) -> MetricsCollector {
        MetricsCollector {
            inner: Arc::new(MetricsCollectorInner {
                metrics: self.metrics,
            }),
        }
    }

    fn claim(&mut self, name: &str, help: &str, handle: MetricHandle) -> Result<(), MetricsError> {
        validate_name(name)?;
        if !self.names.insert(name.to_string()) {
            return Err(MetricsError::Duplicate(name.to_string()));
        }
        self.metrics.push(Registered {
            name: name.to_string(),
            help: help.to_string(),
            handle,
        });
        Ok(())
    }
}

/// Collects and stores all metrics.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<MetricsCollectorInner>,
}

struct MetricsCollectorInner {
    /// Registered metrics, in registration order.
    metrics: Vec<Registered>,
}

impl MetricsCollector {
    /// Registered metric names and kinds, in registration order.
    pub fn metrics(&self) -> impl Iterator<Item = (&str, MetricKind)> + '_ {
        self.inner
            .metrics
            .iter()
            .map(|metric| (metric.name.as_str(), metric.handle.kind()))
    }

    /// Current value of a metric by its registered name.
    pub fn value(&self, name: &str) -> Option<i64> {
        self.inner
            .metrics
            .iter()
            .find(|metric| metric.name == name)
            .map(|metric| metric.handle.value())
    }

    /// Encode a snapshot of every metric in text exposition format.
    pub fn encode(&self) -> Result<String, fmt::Error> {
        let mut output = String::with_capacity(128 * self.inner.metrics.len());

        for metric in &self.inner.metrics {
            writeln!(output, "# HELP {} {}", metric.name, escape_help(&metric.help))?;
            writeln!(output, "# TYPE {} {}", metric.name, metric.handle.kind())?;
            writeln!(output, "{} {}", metric.name, metric.handle.value())?;
        }

        Ok(output)
    }
}

impl fmt::Debug for MetricsCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.metrics()).finish()
    }
}

/// Help text escapes backslash and newline.
fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Metric names follow `[a-zA-Z_:][a-zA-Z0-9_:]*`.
fn validate_name(name: &str) -> Result<(), MetricsError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_' || first == ':')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(MetricsError::InvalidName(name.to_string()))
    }
}
