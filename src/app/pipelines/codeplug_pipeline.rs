use crate::core::builder::build_codeplug;
use crate::core::orderer::order;
use crate::core::validator::{FrequencyBand, Validator};
use crate::core::{ConfigProvider, Pipeline, SourceFile, Storage, TransformResult};
use crate::domain::diagnostics::ValidationWarning;
use crate::domain::model::{Codeplug, RadioOutput, SourceKind};
use crate::utils::error::{CodeplugError, Result};
use std::path::Path;

/// Name of the model dump written next to each radio's import files.
pub const MODEL_DUMP_FILE: &str = "codeplug.json";

/// Reads K7ABD files from the input directory and writes one directory of
/// CPS import files per configured radio.
pub struct CodeplugPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> CodeplugPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn input_path(&self, name: &str) -> String {
        Path::new(self.config.input_dir())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn output_path(&self, radio_id: &str, name: &str) -> String {
        Path::new(self.config.output_dir())
            .join(radio_id)
            .join(name)
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CodeplugPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceFile>> {
        let names = self.storage.list_files(self.config.input_dir()).await?;
        let mut sources = Vec::new();

        for name in names {
            let Some(kind) = SourceKind::from_file_name(&name) else {
                tracing::debug!("Ignoring {}", name);
                continue;
            };
            let bytes = self.storage.read_file(&self.input_path(&name)).await?;
            let contents = String::from_utf8(bytes).map_err(|e| CodeplugError::ProcessingError {
                message: format!("{} is not valid UTF-8: {}", name, e),
            })?;
            tracing::debug!("Read {} ({}, {} bytes)", name, kind, contents.len());
            sources.push(SourceFile {
                kind,
                name,
                contents,
            });
        }

        if sources.is_empty() {
            tracing::warn!(
                "No K7ABD files found in {}; expected names starting with {}",
                self.config.input_dir(),
                SourceKind::ALL
                    .iter()
                    .map(|kind| kind.file_prefix())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Ok(sources)
    }

    async fn transform(&self, sources: Vec<SourceFile>) -> Result<TransformResult> {
        let built = build_codeplug(&sources)?;
        let mut warnings = built.warnings;
        let mut outputs = Vec::new();

        // Radios with identical bands share one validated model.
        let mut validated: Vec<(&'static [FrequencyBand], Codeplug)> = Vec::new();

        for radio in self.config.radios() {
            let bands = radio.bands();
            let codeplug = match validated.iter().find(|(b, _)| *b == bands) {
                Some((_, codeplug)) => codeplug.clone(),
                None => {
                    let (codeplug, radio_warnings): (Codeplug, Vec<ValidationWarning>) =
                        Validator::new(bands).validate(built.codeplug.clone());
                    warnings.extend(radio_warnings);
                    validated.push((bands, codeplug.clone()));
                    codeplug
                }
            };

            let codeplug = order(codeplug, self.config.sort_mode());
            let files = radio.serialize(&codeplug)?;
            tracing::info!(
                "{}: {} zones, {} channels, {} scan lists",
                radio.name(),
                codeplug.zones.len(),
                codeplug.channel_count(),
                codeplug.scan_lists.len()
            );
            outputs.push(RadioOutput {
                radio_id: radio.id(),
                radio_name: radio.name(),
                files,
                codeplug,
            });
        }

        Ok(TransformResult { outputs, warnings })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        for output in &result.outputs {
            for file in &output.files {
                let path = self.output_path(output.radio_id, &file.name);
                tracing::debug!("Writing {} ({} bytes)", path, file.data.len());
                self.storage.write_file(&path, &file.data).await?;
            }

            if self.config.dump_json() {
                let json = serde_json::to_string_pretty(&output.codeplug)?;
                let path = self.output_path(output.radio_id, MODEL_DUMP_FILE);
                self.storage.write_file(&path, json.as_bytes()).await?;
            }

            tracing::info!(
                "Wrote {} files for {}",
                output.files.len(),
                output.radio_name
            );
        }

        Ok(self.config.output_dir().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::orderer::SortMode;
    use crate::output::RadioModel;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, path: &str, data: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                CodeplugError::input(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                )
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn list_files(&self, dir: &str) -> Result<Vec<String>> {
            let files = self.files.lock().await;
            let prefix = format!("{}/", dir);
            let mut names: Vec<String> = files
                .keys()
                .filter_map(|path| path.strip_prefix(&prefix))
                .filter(|name| !name.contains('/'))
                .map(str::to_string)
                .collect();
            names.sort();
            Ok(names)
        }
    }

    struct MockConfig {
        radios: Vec<RadioModel>,
        sort: SortMode,
        dump_json: bool,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                radios: RadioModel::ALL.to_vec(),
                sort: SortMode::Alpha,
                dump_json: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_dir(&self) -> &str {
            "in"
        }

        fn output_dir(&self) -> &str {
            "out"
        }

        fn radios(&self) -> Vec<RadioModel> {
            self.radios.clone()
        }

        fn sort_mode(&self) -> SortMode {
            self.sort
        }

        fn dump_json(&self) -> bool {
            self.dump_json
        }
    }

    const TALKGROUPS: &str = "Local,9\nPNW Rgnl 2,8\n";
    const ANALOG: &str = concat!(
        "Zone,Channel Name,Bandwidth,Power,RX Freq,TX Freq,CTCSS Decode,CTCSS Encode,TX Prohibit\n",
        "Simplex,2M Call,25K,High,146.520,146.520,Off,Off,Off\n",
        "Simplex,Airband,25K,High,200.000,200.000,Off,Off,Off\n",
    );
    const REPEATERS: &str = "Zone Name,Comment,Power,RX Freq,TX Freq,Color Code,Local,PNW Rgnl 2\n\
K7ABD;K7ABD,Tiger,High,440.6,445.6,1,1,2\n";

    async fn seeded() -> MockStorage {
        let storage = MockStorage::new();
        storage.put("in/Talkgroups__pnw.csv", TALKGROUPS).await;
        storage.put("in/Analog__simplex.csv", ANALOG).await;
        storage.put("in/Digital-Repeaters__home.csv", REPEATERS).await;
        storage.put("in/README.md", "not an input").await;
        storage
    }

    #[tokio::test]
    async fn test_extract_picks_up_k7abd_files_only() {
        let pipeline = CodeplugPipeline::new(seeded().await, MockConfig::new());
        let sources = pipeline.extract().await.unwrap();

        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Analog__simplex.csv",
                "Digital-Repeaters__home.csv",
                "Talkgroups__pnw.csv"
            ]
        );
        assert_eq!(sources[2].kind, SourceKind::Talkgroups);
    }

    #[tokio::test]
    async fn test_transform_produces_output_per_radio() {
        let pipeline = CodeplugPipeline::new(seeded().await, MockConfig::new());
        let sources = pipeline.extract().await.unwrap();
        let result = pipeline.transform(sources).await.unwrap();

        assert_eq!(result.outputs.len(), 2);
        assert_eq!(result.outputs[0].radio_id, "878");
        assert_eq!(result.outputs[1].radio_id, "890");
        for output in &result.outputs {
            assert_eq!(output.files.len(), 4);
            assert_eq!(output.codeplug.channel_count(), 3);
        }
        // One out-of-band warning, not one per radio.
        assert_eq!(result.warnings.iter().filter(|w| w.is_out_of_band()).count(), 1);
    }

    #[tokio::test]
    async fn test_load_writes_radio_directories() {
        let storage = seeded().await;
        let mut config = MockConfig::new();
        config.radios = vec![RadioModel::Anytone890];
        config.dump_json = true;
        let pipeline = CodeplugPipeline::new(storage.clone(), config);

        let sources = pipeline.extract().await.unwrap();
        let result = pipeline.transform(sources).await.unwrap();
        let output_dir = pipeline.load(result).await.unwrap();

        assert_eq!(output_dir, "out");
        for name in ["Channel.CSV", "TalkGroups.CSV", "Zone.CSV", "ScanList.CSV"] {
            assert!(storage.get_file(&format!("out/890/{}", name)).await.is_some());
        }
        assert!(storage.get_file("out/878/Channel.CSV").await.is_none());

        let json = storage.get_file("out/890/codeplug.json").await.unwrap();
        let model: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(model["zones"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_reported() {
        let storage = MockStorage::new();
        {
            let mut files = storage.files.lock().await;
            files.insert("in/Analog__bad.csv".to_string(), vec![0xff, 0xfe]);
        }
        let pipeline = CodeplugPipeline::new(storage, MockConfig::new());
        let err = pipeline.extract().await.unwrap_err();
        assert!(err.to_string().contains("Analog__bad.csv"));
    }
}
