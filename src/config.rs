// Constants and runtime configuration for the front end

/// Number of failed top-level statements tolerated before the driver aborts
pub const DEFAULT_ERROR_BUDGET: usize = 5;

/// Prefix of every decorated symbol name
pub const DECORATION_PREFIX: &str = "_SIN_";

/// Options controlling a [`crate::driver::Frontend`] run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Statement errors tolerated before the run is aborted
    pub error_budget: usize,
    /// Walk the finished AST and populate the symbol table
    pub register_symbols: bool,
}

impl FrontendConfig {
    pub fn with_error_budget(mut self, error_budget: usize) -> Self {
        self.error_budget = error_budget;
        self
    }

    pub fn without_symbols(mut self) -> Self {
        self.register_symbols = false;
        self
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            error_budget: DEFAULT_ERROR_BUDGET,
            register_symbols: true,
        }
    }
}
