//! Package metadata shown at start-up

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Package description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            description: DESCRIPTION,
        }
    }

    /// One-line summary such as `isqa v1.0.0`
    pub fn summary(&self) -> String {
        format!("{} v{}", self.name, self.version)
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("===============================================");
    eprintln!("  {}", info.summary());
    eprintln!("  {}", info.description);
    eprintln!("===============================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let info = BuildInfo::current();
        assert_eq!(info.summary(), format!("isqa v{}", VERSION));
    }
}
