use crate::core::orderer::SortMode;
use crate::domain::model::{SourceFile, TransformResult};
use crate::output::RadioModel;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// File names (not paths) directly inside `dir`.
    fn list_files(&self, dir: &str)
        -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_dir(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn radios(&self) -> Vec<RadioModel>;
    fn sort_mode(&self) -> SortMode;
    fn dump_json(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceFile>>;
    async fn transform(&self, sources: Vec<SourceFile>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
