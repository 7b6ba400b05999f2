//! Producer 指标模块
//!
//! 两部分：
//! - `record_*` 函数：写入全局 `metrics` recorder（Prometheus 导出）
//! - `OperationStatsAggregator`：进程内聚合，用于运行结束时输出摘要

use std::collections::BTreeMap;
use std::fmt;

use metrics::{counter, gauge, histogram};

/// 单条消息的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Fault,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Fault => "fault",
        }
    }
}

/// 记录一次 producer 操作
///
/// `operation` 为操作名（如 `create`），无法解析操作时调用方传 `unknown`。
pub fn record_operation(operation: &str, outcome: Outcome, latency_ms: f64) {
    counter!(
        "keystone_producer_operations_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    histogram!(
        "keystone_producer_operation_latency_ms",
        "operation" => operation.to_string()
    )
    .record(latency_ms);
}

/// 按错误类别记录 fault
pub fn record_fault(operation: &str, kind: &'static str) {
    counter!(
        "keystone_producer_faults_total",
        "operation" => operation.to_string(),
        "kind" => kind
    )
    .increment(1);
}

/// 记录 route 队列深度
pub fn record_queue_depth(route: &str, depth: usize) {
    gauge!("keystone_route_queue_depth", "route" => route.to_string()).set(depth as f64);
}

/// 单个操作的累计统计
#[derive(Debug, Clone, Default)]
pub struct OperationStats {
    pub count: u64,
    pub faults: u64,
    pub latency_ms: RunningStats,
}

impl OperationStats {
    fn push(&mut self, outcome: Outcome, latency_ms: f64) {
        self.count += 1;
        if outcome == Outcome::Fault {
            self.faults += 1;
        }
        self.latency_ms.push(latency_ms);
    }
}

/// 操作指标聚合器
///
/// 在内存中按操作名聚合，不依赖全局 recorder，便于 CLI 在结束时打印摘要。
#[derive(Debug, Clone, Default)]
pub struct OperationStatsAggregator {
    per_operation: BTreeMap<String, OperationStats>,
}

impl OperationStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, operation: &str, outcome: Outcome, latency_ms: f64) {
        self.per_operation
            .entry(operation.to_string())
            .or_default()
            .push(outcome, latency_ms);
    }

    /// 某个操作的统计
    pub fn get(&self, operation: &str) -> Option<&OperationStats> {
        self.per_operation.get(operation)
    }

    /// 生成摘要报告
    pub fn summary(&self) -> OperationSummary {
        let mut total = 0;
        let mut faults = 0;
        let mut operations = Vec::with_capacity(self.per_operation.len());

        for (name, stats) in &self.per_operation {
            total += stats.count;
            faults += stats.faults;
            operations.push((
                name.clone(),
                stats.count,
                stats.faults,
                StatsSummary::from(&stats.latency_ms),
            ));
        }

        OperationSummary {
            total,
            faults,
            fault_rate: if total > 0 {
                faults as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            operations,
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        self.per_operation.clear();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct OperationSummary {
    pub total: u64,
    pub faults: u64,
    /// 百分比
    pub fault_rate: f64,
    /// (操作名, 次数, fault 次数, 延迟统计)，按操作名排序
    pub operations: Vec<(String, u64, u64, StatsSummary)>,
}

impl fmt::Display for OperationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Producer Summary ===")?;
        writeln!(f, "Messages: {}", self.total)?;
        writeln!(f, "Faults: {} ({:.2}%)", self.faults, self.fault_rate)?;
        for (name, count, faults, latency) in &self.operations {
            writeln!(f, "  {name}: {count} ({faults} faults), latency ms: {latency}")?;
        }
        Ok(())
    }
}

/// 统计摘要
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

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(f, "N/A");
        }
        write!(
            f,
            "min={:.3}, max={:.3}, mean={:.3}, std={:.3}",
            self.min, self.max, self.mean, self.std_dev
        )
    }
}

/// 在线均值/方差 (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// 样本方差
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
