use crate::adapters::report::{self, ConsoleProgress};
use crate::core::engine::{AuditEngine, AuditRun};
use crate::domain::ports::{ConfigProvider, ModelClient, Storage};
use crate::utils::error::Result;
use std::io::Write;

/// 批次模式顯示的前幾筆模型回覆
const PREVIEW_RESULTS: usize = 5;

/// 對設定的合約與法規完整跑一次，進度與摘要寫到 `out`
pub async fn run_batch<S, M, C, W>(engine: &AuditEngine<S, M, C>, out: &mut W) -> Result<AuditRun>
where
    S: Storage,
    M: ModelClient,
    C: ConfigProvider,
    W: Write,
{
    let mut run = AuditRun::new();
    let config = engine.config();

    let clauses = engine.load_contract(&mut run, config.contract_path()).await?;
    writeln!(out, "Contract clauses loaded: {}", clauses)?;

    let provisions = engine.load_statute(&mut run, config.statute_path()).await?;
    writeln!(out, "Statute provisions/subparagraphs loaded: {}", provisions)?;

    let mut progress = ConsoleProgress::new(&mut *out);
    engine.compare(&mut run, &mut progress).await;

    let output_path = engine.persist(&run).await?;
    tracing::info!("📁 Results saved to: {}", output_path);

    report::print_summary(&run.results, out)?;

    writeln!(out, "\nFirst {} model answers:", PREVIEW_RESULTS)?;
    for result in run.results.iter().take(PREVIEW_RESULTS) {
        writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
    }

    Ok(run)
}
