//! Multiplier factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::divide_conquer::DivideAndConquerMultiplier;
use crate::error::MatmulError;
use crate::multiplier::MatrixMultiplier;
use crate::naive::NaiveMultiplier;
use crate::options::Options;
use crate::strassen::StrassenMultiplier;

/// Factory trait for creating multipliers.
pub trait MultiplierFactory: Send + Sync {
    /// Get or create a multiplier by name.
    fn get(&self, name: &str) -> Result<Arc<dyn MatrixMultiplier>, MatmulError>;

    /// List all available multiplier names.
    fn available(&self) -> Vec<&str>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory {
    opts: Options,
    cache: RwLock<HashMap<String, Arc<dyn MatrixMultiplier>>>,
}

impl DefaultFactory {
    /// Create a factory whose multipliers use default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create a factory whose multipliers are built from `opts`.
    #[must_use]
    pub fn with_options(opts: Options) -> Self {
        Self {
            opts: opts.normalize(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn create_multiplier(&self, name: &str) -> Result<Arc<dyn MatrixMultiplier>, MatmulError> {
        match name {
            "naive" => Ok(Arc::new(NaiveMultiplier::with_options(&self.opts)?)),
            "dnc" | "divide-and-conquer" => {
                Ok(Arc::new(DivideAndConquerMultiplier::with_options(&self.opts)?))
            }
            "strassen" => Ok(Arc::new(StrassenMultiplier::with_options(&self.opts)?)),
            _ => Err(MatmulError::Config(format!("unknown multiplier: {name}"))),
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiplierFactory for DefaultFactory {
    fn get(&self, name: &str) -> Result<Arc<dyn MatrixMultiplier>, MatmulError> {
        // Check cache first
        if let Some(m) = self.cache.read().get(name) {
            return Ok(Arc::clone(m));
        }

        let m = self.create_multiplier(name)?;
        self.cache.write().insert(name.to_string(), Arc::clone(&m));
        Ok(m)
    }

    fn available(&self) -> Vec<&str> {
        vec!["naive", "dnc", "strassen"]
    }
}
