//! Application context - wires config, journal and engine together

use std::path::{Path, PathBuf};

use tradeguard_core::Address;
use tradeguard_engine::{FraudConfig, FraudEngine, SharedEngine, TradeJournal};

/// Application context
pub struct AppContext {
    config: FraudConfig,
    journal_path: PathBuf,
    engine: Option<SharedEngine>,
}

impl AppContext {
    /// Open the data directory, replaying the journal if one exists
    pub async fn new(
        data_path: impl AsRef<Path>,
        config_path: Option<&Path>,
    ) -> Result<Self, anyhow::Error> {
        let data_path = data_path.as_ref();
        std::fs::create_dir_all(data_path)?;
        let journal_path = data_path.join("journal.jsonl");

        let config = match config_path {
            Some(path) => FraudConfig::from_file(path)?,
            None => FraudConfig::default(),
        };

        let journal = TradeJournal::new(&journal_path)?;
        let engine = if journal.last_sequence() > 0 {
            Some(SharedEngine::new(FraudEngine::restore(config.clone(), journal)?))
        } else {
            None
        };

        Ok(Self {
            config,
            journal_path,
            engine,
        })
    }

    /// Write the genesis record owned by `owner`
    pub async fn initialize(&mut self, owner: Address) -> Result<(), anyhow::Error> {
        if self.engine.is_some() {
            anyhow::bail!(
                "Engine already initialized (sequence = {})",
                self.last_sequence().await
            );
        }

        let journal = TradeJournal::new(&self.journal_path)?;
        let engine = FraudEngine::create(self.config.clone(), owner, journal)?;
        self.engine = Some(SharedEngine::new(engine));
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// Engine handle; fails until `init` has run
    pub fn engine(&self) -> Result<&SharedEngine, anyhow::Error> {
        self.engine
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Engine not initialized. Run `tradeguard init --owner <address>` first."))
    }

    pub async fn last_sequence(&self) -> u64 {
        match &self.engine {
            Some(engine) => engine.handle().read().await.journal().last_sequence(),
            None => 0,
        }
    }

    pub fn config(&self) -> &FraudConfig {
        &self.config
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }
}
