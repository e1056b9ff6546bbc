use crate::adapters::{docx, report};
use crate::core::driver::{ComparisonDriver, ProvisionFilter};
use crate::core::segmenter;
use crate::domain::model::{Clause, ComparisonResult, ProvisionMap};
use crate::domain::ports::{ConfigProvider, ModelClient, ProgressObserver, Storage};
use crate::utils::error::{AuditError, Result};

/// 單次執行的上下文：載入的文件與累積的結果
#[derive(Debug, Clone, Default)]
pub struct AuditRun {
    pub clauses: Vec<Clause>,
    pub provisions: ProvisionMap,
    pub results: Vec<ComparisonResult>,
}

impl AuditRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn non_compliant(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.results.iter().filter(|r| !r.compliant)
    }

    pub fn non_compliant_count(&self) -> usize {
        self.non_compliant().count()
    }
}

pub struct AuditEngine<S: Storage, M: ModelClient, C: ConfigProvider> {
    storage: S,
    client: M,
    config: C,
    filter: ProvisionFilter,
}

impl<S: Storage, M: ModelClient, C: ConfigProvider> AuditEngine<S, M, C> {
    pub fn new(storage: S, client: M, config: C) -> Self {
        let filter = ProvisionFilter::new(config.allowed_prefixes().iter().cloned());
        Self {
            storage,
            client,
            config,
            filter,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    async fn read_document(&self, path: &str) -> Result<Vec<u8>> {
        self.storage
            .read_file(path)
            .await
            .map_err(|e| AuditError::document(path, e.to_string()))
    }

    /// 載入合約條款，回傳條款數
    pub async fn load_contract(&self, run: &mut AuditRun, path: &str) -> Result<usize> {
        let bytes = self.read_document(path).await?;
        run.clauses = docx::load_paragraphs(path, &bytes)?;
        tracing::info!("📄 Loaded {} contract clauses from {}", run.clauses.len(), path);
        Ok(run.clauses.len())
    }

    /// 載入並切分法規，回傳法條數
    pub async fn load_statute(&self, run: &mut AuditRun, path: &str) -> Result<usize> {
        let bytes = self.read_document(path).await?;
        let text = docx::load_statute(path, bytes)?;
        run.provisions = segmenter::segment(&text);
        tracing::info!(
            "📚 Loaded {} statute provisions/subparagraphs from {}",
            run.provisions.len(),
            path
        );
        Ok(run.provisions.len())
    }

    /// 比對並把結果附加到執行上下文
    pub async fn compare<O: ProgressObserver + ?Sized>(
        &self,
        run: &mut AuditRun,
        observer: &mut O,
    ) -> usize {
        let selected = self.filter.select(&run.provisions).count();
        tracing::info!(
            "🔍 Comparing {} provisions x {} clauses ({} model calls)",
            selected,
            run.clauses.len(),
            selected * run.clauses.len()
        );

        let results = ComparisonDriver::new(&self.client, &self.filter)
            .compare(&run.provisions, &run.clauses, observer)
            .await;
        let added = results.len();
        run.results.extend(results);

        tracing::info!(
            "✅ Comparison finished: {} results, {} non-compliant",
            added,
            run.non_compliant_count()
        );
        added
    }

    /// 寫出結果檔，回傳 JSON 路徑
    pub async fn persist(&self, run: &AuditRun) -> Result<String> {
        let output_path = self.config.output_path().to_string();
        report::save_results(&self.storage, &run.results, &output_path).await?;

        if self.config.write_tsv() {
            let tsv = report::tsv_path(&output_path);
            report::save_tsv(&self.storage, &run.results, &tsv).await?;
            tracing::info!("📁 TSV copy saved to: {}", tsv);
        }

        Ok(output_path)
    }

    /// 以設定的路徑完整執行一次：載入、比對、存檔
    pub async fn run<O: ProgressObserver + ?Sized>(&self, observer: &mut O) -> Result<AuditRun> {
        let mut run = AuditRun::new();

        self.load_contract(&mut run, self.config.contract_path()).await?;
        self.load_statute(&mut run, self.config.statute_path()).await?;
        self.compare(&mut run, observer).await;

        let output_path = self.persist(&run).await?;
        tracing::info!("📁 Results saved to: {}", output_path);

        Ok(run)
    }
}
