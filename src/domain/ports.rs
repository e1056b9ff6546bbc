use crate::domain::model::ComparisonResult;
use crate::utils::error::{ModelError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn statute_path(&self) -> &str;
    fn contract_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn allowed_prefixes(&self) -> &[String];
    fn preview_count(&self) -> usize;
    fn write_tsv(&self) -> bool;
}

/// 語言模型的邊界：成功回傳原始回覆文字，失敗回傳原因
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(
        &self,
        provision: &str,
        clause: &str,
    ) -> std::result::Result<String, ModelError>;
}

/// 比對過程中的進度回報
pub trait ProgressObserver {
    fn on_pair_start(&mut self, _provision_id: &str, _clause_index: usize, _clause_total: usize) {}
    fn on_pair_done(&mut self, _result: &ComparisonResult) {}
    fn on_finished(&mut self, _total: usize) {}
}

/// 不輸出任何進度
pub struct Silent;

impl ProgressObserver for Silent {}
