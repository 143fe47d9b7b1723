/// Controls how schemas are registered and how catalogs are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, object schemas reject properties they do not declare.
    pub strict_mode: bool,
    /// Maximum number of streams loaded from a catalog.
    pub max_streams: usize,
    /// Maximum bytes read from a catalog file.
    pub max_catalog_file_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            max_streams: 1024,
            max_catalog_file_size: 8 * 1024 * 1024,
        }
    }
}
