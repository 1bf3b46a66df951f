//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries.

use panelgate_config::AppConfig;

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .panel_url("https://panel.example.com:2083")
///     .credentials("alice", "hunter2")
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn panel_url(mut self, url: &str) -> Self {
        self.config.panel.url = url.to_string();
        self
    }

    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.config.panel.username = username.to_string();
        self.config.panel.password = password.to_string();
        self
    }

    pub fn insecure_tls(mut self, insecure: bool) -> Self {
        self.config.panel.insecure_tls = insecure;
        self
    }

    pub fn trace_wire(mut self, trace: bool) -> Self {
        self.config.panel.trace_wire = trace;
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
