//! Comparative runs over several station counts

use clap::Args;
use serde::Serialize;

use super::{run_once, ScheduleArgs};
use crate::{config::Config, output::Output, CliError};

/// Run once per station count with the same workload and seed
#[derive(Debug, Args)]
pub struct SweepCommand {
    #[command(flatten)]
    pub schedule: ScheduleArgs,

    /// Station counts to compare (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "1,10,100")]
    pub station_counts: Vec<usize>,
}

/// One row of a sweep
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub station_count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub transactions_examined: u64,
}

impl SweepCommand {
    pub fn execute(self, mut config: Config, json: bool) -> Result<(), CliError> {
        if self.station_counts.is_empty() {
            return Err(CliError::InvalidInput("no station counts given".into()));
        }
        self.schedule.apply(&mut config);

        let rows = sweep(&config, &self.station_counts)?;

        Output::new(json)
            .field("policy", config.policy.as_str())
            .field_u64("batch_count", config.scheduler.batch_count as u64)
            .field_value("runs", serde_json::to_value(&rows)?)
            .message(&table(&rows))
            .print();
        Ok(())
    }
}

/// Run `config` once per station count
pub fn sweep(config: &Config, station_counts: &[usize]) -> Result<Vec<SweepRow>, CliError> {
    station_counts
        .iter()
        .map(|&n| {
            let mut config = config.clone();
            config.scheduler.station_count = n;
            let (report, _) = run_once(&config)?;
            tracing::info!("Sweep: {} stations, mean {:.3}", n, report.mean);
            Ok(SweepRow {
                station_count: n,
                mean: report.mean,
                std_dev: report.std_dev,
                transactions_examined: report.transactions_examined,
            })
        })
        .collect()
}

fn table(rows: &[SweepRow]) -> String {
    let mut text = format!(
        "{:>10}  {:>10}  {:>10}  {:>12}",
        "stations", "mean", "std_dev", "examined"
    );
    for row in rows {
        text.push_str(&format!(
            "\n{:>10}  {:>10.3}  {:>10.3}  {:>12}",
            row.station_count, row.mean, row.std_dev, row.transactions_examined
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use keybatch_scheduler::PolicyKind;

    #[test]
    fn test_sweep_rows_in_order() {
        let mut config = Config::default();
        config.scheduler.batch_count = 20;
        config.policy = PolicyKind::LargestKeySet;

        let rows = sweep(&config, &[1, 5]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].station_count, 1);
        assert_eq!(rows[1].station_count, 5);
        assert!(rows[0].mean < rows[1].mean);
    }

    #[test]
    fn test_sweep_stops_on_error() {
        let config = Config::default();
        assert!(sweep(&config, &[0]).is_err());
    }

    #[test]
    fn test_table_layout() {
        let rows = vec![SweepRow {
            station_count: 10,
            mean: 1.5,
            std_dev: 0.25,
            transactions_examined: 99,
        }];
        let text = table(&rows);
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("1.500"));
    }
}
