//! Single scheduling run

use clap::Args;
use keybatch_scheduler::RunReport;

use super::{run_once, ScheduleArgs};
use crate::{config::Config, output::Output, CliError};

/// Run the scheduler once and report batch-size statistics
#[derive(Debug, Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub schedule: ScheduleArgs,

    /// Include every recorded batch size
    #[arg(long)]
    pub show_batches: bool,

    /// Include counters and histograms
    #[arg(long)]
    pub metrics: bool,
}

impl RunCommand {
    pub fn execute(self, mut config: Config, json: bool) -> Result<(), CliError> {
        self.schedule.apply(&mut config);
        let (report, scheduler) = run_once(&config)?;

        let mut out = report_output(&report, json);
        if self.show_batches {
            out = out.field_value("batches", serde_json::to_value(&report.batches)?);
        }
        if self.metrics {
            out = out.field_value("metrics", serde_json::to_value(scheduler.snapshot())?);
        }

        let mut message = summary(&report);
        if self.show_batches {
            let sizes: Vec<String> = report.batches.iter().map(|b| b.to_string()).collect();
            message.push_str(&format!("\nBatches:     {}", sizes.join(" ")));
        }
        if self.metrics {
            message.push_str(&format!("\nMetrics:\n{}", scheduler.snapshot().to_json()?));
        }

        out.message(&message).print();
        Ok(())
    }
}

fn report_output(report: &RunReport, json: bool) -> Output {
    let stats = report.stats();
    let mut out = Output::new(json)
        .field_u64("station_count", report.station_count as u64)
        .field("policy", &report.policy)
        .field_u64("batch_count", report.batches.len() as u64)
        .field_f64("mean", report.mean)
        .field_f64("std_dev", report.std_dev)
        .field_u64("transactions_examined", report.transactions_examined);
    if let (Some(min), Some(max)) = (stats.min(), stats.max()) {
        out = out
            .field_u64("min", min as u64)
            .field_u64("max", max as u64);
    }
    if !report.residual.is_empty() {
        out = out.field_value("residual", serde_json::json!(report.residual));
    }
    out
}

/// Human-readable run summary
pub fn summary(report: &RunReport) -> String {
    let stats = report.stats();
    let mut text = format!(
        "Stations:    {} ({})\nBatches:     {}\nMean size:   {:.3}\nStd dev:     {:.3}",
        report.station_count,
        report.policy,
        report.batches.len(),
        report.mean,
        report.std_dev
    );
    if let (Some(min), Some(max)) = (stats.min(), stats.max()) {
        text.push_str(&format!("\nMin / max:   {} / {}", min, max));
    }
    text.push_str(&format!("\nExamined:    {}", report.transactions_examined));
    if !report.residual.is_empty() {
        let total: usize = report.residual.iter().sum();
        text.push_str(&format!(
            "\nResidual:    {} stations, {} transactions (not in statistics)",
            report.residual.len(),
            total
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            batches: vec![1, 3],
            mean: 2.0,
            std_dev: std::f64::consts::SQRT_2,
            residual: vec![4],
            transactions_examined: 8,
            station_count: 2,
            policy: "least-count".into(),
        }
    }

    #[test]
    fn test_summary() {
        let text = summary(&report());
        assert!(text.contains("Stations:    2 (least-count)"));
        assert!(text.contains("Mean size:   2.000"));
        assert!(text.contains("Min / max:   1 / 3"));
        assert!(text.contains("Residual:    1 stations, 4 transactions"));
    }

    #[test]
    fn test_report_output_json() {
        let text = report_output(&report(), true).render().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["batch_count"], 2);
        assert_eq!(value["mean"], 2.0);
        assert_eq!(value["max"], 3);
        assert_eq!(value["residual"][0], 4);
    }
}
