use crate::release::AssetRecord;

/// Name patterns that identify the installer among a release's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMatcher {
    /// Product identifier expected somewhere in the file name
    pub product: String,
    /// Words that mark a file as the installer rather than a helper binary
    pub role_keywords: Vec<String>,
    /// Platform executable extension, including the dot
    pub extension: String,
}

impl Default for AssetMatcher {
    fn default() -> Self {
        Self {
            product: "opendrop".to_string(),
            role_keywords: vec![
                "server".to_string(),
                "setup".to_string(),
                "installer".to_string(),
                "windows".to_string(),
            ],
            extension: ".exe".to_string(),
        }
    }
}

impl AssetMatcher {
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            ..Default::default()
        }
    }

    /// Pick the installer from a release's asset list.
    ///
    /// Tiers, first match wins: product name plus a role keyword, then the
    /// product name alone, then the first executable. Non-executables are
    /// never returned.
    pub fn select_installer<'a>(&self, assets: &'a [AssetRecord]) -> Option<&'a AssetRecord> {
        let extension = self.extension.to_lowercase();
        let product = self.product.to_lowercase();
        let keywords: Vec<String> = self.role_keywords.iter().map(|k| k.to_lowercase()).collect();

        let executables: Vec<(&AssetRecord, String)> = assets
            .iter()
            .map(|asset| (asset, asset.name.to_lowercase()))
            .filter(|(_, name)| name.ends_with(&extension))
            .collect();

        let has_product = |name: &str| !product.is_empty() && name.contains(&product);
        let has_role = |name: &str| keywords.iter().any(|k| !k.is_empty() && name.contains(k));

        executables
            .iter()
            .find(|(_, name)| has_product(name.as_str()) && has_role(name.as_str()))
            .or_else(|| executables.iter().find(|(_, name)| has_product(name.as_str())))
            .or_else(|| executables.first())
            .map(|(asset, _)| *asset)
    }
}

/// Pick the installer using the default product patterns.
pub fn select_installer(assets: &[AssetRecord]) -> Option<&AssetRecord> {
    AssetMatcher::default().select_installer(assets)
}
