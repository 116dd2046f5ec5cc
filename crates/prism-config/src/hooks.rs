use serde::Deserialize;

/// Response hook configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HooksConfig {
    /// Chart hook settings
    #[serde(default)]
    pub chart: ChartHookConfig,
}

/// Settings for the chart-appending hook
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartHookConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Chart title
    #[serde(default = "default_title")]
    pub title: String,
    /// Category labels along the x axis
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for ChartHookConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            title: default_title(),
            categories: default_categories(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_title() -> String {
    "Quarterly Sales Performance".to_owned()
}

fn default_categories() -> Vec<String> {
    ["Q1", "Q2", "Q3", "Q4"].into_iter().map(str::to_owned).collect()
}
