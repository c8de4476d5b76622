use glossa::config::{ConfigBuilder, GlossaConfig};
use glossa::prelude::*;

pub struct GlossaCliContext {
    pub engine: MergeEngine,
    pub user: String,
}

impl GlossaCliContext {
    pub async fn new(data_dir: Option<String>, user: String) -> glossa::Result<Self> {
        let engine = if let Some(dir) = data_dir {
            let config = ConfigBuilder::new()
                .with_data_dir(dir)
                .with_default_storage()
                .with_default_logging()
                .build()?;
            glossa::init(config).await?
        } else {
            glossa::init_with_defaults().await?
        };

        Ok(Self { engine, user })
    }

    pub async fn from_config(
        config: GlossaConfig,
        user: impl Into<String>,
    ) -> glossa::Result<Self> {
        Ok(Self {
            engine: glossa::init(config).await?,
            user: user.into(),
        })
    }
}
