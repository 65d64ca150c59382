//! Finished-missions report command handler

use crate::config::Config;
use crate::db::Store;
use crate::services::AggregationReporter;

pub async fn cmd_report(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let ranking = AggregationReporter::new(store).most_completed_missions().await?;

    if ranking.is_empty() {
        println!("No finished missions yet.");
        return Ok(());
    }

    println!("Finished missions per worker");
    println!("{:-<60}", "");

    for (rank, row) in ranking.iter().enumerate() {
        println!("{:>3}. {:<30} {:>5}", rank + 1, row.name, row.completed_missions);
        println!("     ID: {}", row.worker_id);
    }

    Ok(())
}
