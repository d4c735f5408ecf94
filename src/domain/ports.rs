use crate::domain::model::{DrawResult, ExchangeInput};
use crate::utils::error::Result;
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
    fn exchange_name(&self) -> &str;
    fn roster_path(&self) -> &str;
    fn roster_sheet(&self) -> Option<&str>;
    fn prior_path(&self) -> &str;
    fn prior_sheet(&self) -> Option<&str>;
    fn output_file(&self) -> &str;
    fn report_file(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn seed(&self) -> Option<u64>;

    fn wants_format(&self, format: &str) -> bool {
        self.output_formats().iter().any(|f| f == format)
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExchangeInput>;
    async fn transform(&self, input: ExchangeInput) -> Result<DrawResult>;
    async fn load(&self, result: DrawResult) -> Result<String>;
}
