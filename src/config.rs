//! Configuration file handling.
//!
//! Settings come from `dashboard.toml`; every section and field is
//! optional and falls back to the values the dashboard has always shown.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::data::model::{Category, Variable};

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayHints,
}

/// Where the observations come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset file loaded at startup.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Station name substituted into chart titles.
    #[serde(default = "default_station")]
    pub station: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            station: default_station(),
        }
    }
}

fn default_station() -> String {
    "Shunyi".to_string()
}

// ---------------------------------------------------------------------------
// Display hints consumed by the renderer
// ---------------------------------------------------------------------------

/// Titles, axis labels and colours. Colours are `#rrggbb` or CSS names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayHints {
    #[serde(default)]
    pub colors: ColorHints,

    #[serde(default)]
    pub titles: TitleHints,

    #[serde(default)]
    pub labels: LabelHints,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorHints {
    #[serde(default = "default_baik")]
    pub baik: String,
    #[serde(default = "default_sedang")]
    pub sedang: String,
    #[serde(default = "default_tidak_sehat")]
    pub tidak_sehat: String,
    #[serde(default = "default_sangat_tidak_sehat")]
    pub sangat_tidak_sehat: String,
    #[serde(default = "default_berbahaya")]
    pub berbahaya: String,

    /// Bar colour of the peak year in the yearly-mean charts.
    #[serde(default = "default_highlight")]
    pub highlight: String,
    /// Bar colour of every other year.
    #[serde(default = "default_base")]
    pub base: String,

    /// Heatmap scale at -1, 0 and +1.
    #[serde(default = "default_heatmap_negative")]
    pub heatmap_negative: String,
    #[serde(default = "default_heatmap_midpoint")]
    pub heatmap_midpoint: String,
    #[serde(default = "default_heatmap_positive")]
    pub heatmap_positive: String,
}

impl Default for ColorHints {
    fn default() -> Self {
        Self {
            baik: default_baik(),
            sedang: default_sedang(),
            tidak_sehat: default_tidak_sehat(),
            sangat_tidak_sehat: default_sangat_tidak_sehat(),
            berbahaya: default_berbahaya(),
            highlight: default_highlight(),
            base: default_base(),
            heatmap_negative: default_heatmap_negative(),
            heatmap_midpoint: default_heatmap_midpoint(),
            heatmap_positive: default_heatmap_positive(),
        }
    }
}

impl ColorHints {
    /// Configured colour string for a category.
    pub fn category(&self, category: Category) -> &str {
        match category {
            Category::Baik => &self.baik,
            Category::Sedang => &self.sedang,
            Category::TidakSehat => &self.tidak_sehat,
            Category::SangatTidakSehat => &self.sangat_tidak_sehat,
            Category::Berbahaya => &self.berbahaya,
        }
    }
}

fn default_baik() -> String {
    "#ffffff".to_string()
}

fn default_sedang() -> String {
    "#ffd3cc".to_string()
}

fn default_tidak_sehat() -> String {
    "#ff9380".to_string()
}

fn default_sangat_tidak_sehat() -> String {
    "#ff674d".to_string()
}

fn default_berbahaya() -> String {
    "#ff2701".to_string()
}

fn default_highlight() -> String {
    "blue".to_string()
}

fn default_base() -> String {
    "lightblue".to_string()
}

fn default_heatmap_negative() -> String {
    "#ff2701".to_string()
}

fn default_heatmap_midpoint() -> String {
    "#ffffff".to_string()
}

fn default_heatmap_positive() -> String {
    "#0b51c1".to_string()
}

/// Chart titles. `{station}` is replaced everywhere; the trend title also
/// understands `{start}` and `{end}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleHints {
    #[serde(default = "default_distribution_title")]
    pub distribution: String,
    #[serde(default = "default_trend_title")]
    pub trend: String,
    #[serde(default = "default_wspm_title")]
    pub wspm: String,
    #[serde(default = "default_rain_title")]
    pub rain: String,
    #[serde(default = "default_pm25_title")]
    pub pm25: String,
    #[serde(default = "default_correlation_title")]
    pub correlation: String,
}

impl Default for TitleHints {
    fn default() -> Self {
        Self {
            distribution: default_distribution_title(),
            trend: default_trend_title(),
            wspm: default_wspm_title(),
            rain: default_rain_title(),
            pm25: default_pm25_title(),
            correlation: default_correlation_title(),
        }
    }
}

impl TitleHints {
    /// Title template of a yearly-mean chart.
    pub fn means(&self, variable: Variable) -> &str {
        match variable {
            Variable::Pm25 => &self.pm25,
            Variable::Wspm => &self.wspm,
            Variable::Rain => &self.rain,
        }
    }
}

fn default_distribution_title() -> String {
    "Distribusi Kualitas Udara di Stasiun {station} per Tahun".to_string()
}

fn default_trend_title() -> String {
    "Tren Kualitas Udara di {station} Station ({start}-{end})".to_string()
}

fn default_wspm_title() -> String {
    "Rata-rata Kecepatan Angin (WSPM) per Tahun di Stasiun {station}".to_string()
}

fn default_rain_title() -> String {
    "Rata-rata Curah Hujan (RAIN) per Tahun di Stasiun {station}".to_string()
}

fn default_pm25_title() -> String {
    "Rata-rata Polusi Udara (PM2.5) per Tahun di Stasiun {station}".to_string()
}

fn default_correlation_title() -> String {
    "Heatmap Korelasi antara PM2.5, WSPM, dan RAIN di Stasiun {station}".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelHints {
    #[serde(default = "default_year_label")]
    pub year: String,
    #[serde(default = "default_count_label")]
    pub count: String,
    #[serde(default = "default_category_label")]
    pub category: String,
    #[serde(default = "default_wspm_label")]
    pub wspm: String,
    #[serde(default = "default_rain_label")]
    pub rain: String,
    #[serde(default = "default_pm25_label")]
    pub pm25: String,
    #[serde(default = "default_variable_label")]
    pub variable: String,
    #[serde(default = "default_correlation_label")]
    pub correlation: String,
}

impl Default for LabelHints {
    fn default() -> Self {
        Self {
            year: default_year_label(),
            count: default_count_label(),
            category: default_category_label(),
            wspm: default_wspm_label(),
            rain: default_rain_label(),
            pm25: default_pm25_label(),
            variable: default_variable_label(),
            correlation: default_correlation_label(),
        }
    }
}

impl LabelHints {
    /// Value-axis label of a yearly-mean chart.
    pub fn means(&self, variable: Variable) -> &str {
        match variable {
            Variable::Pm25 => &self.pm25,
            Variable::Wspm => &self.wspm,
            Variable::Rain => &self.rain,
        }
    }
}

fn default_year_label() -> String {
    "Tahun".to_string()
}

fn default_count_label() -> String {
    "Jumlah".to_string()
}

fn default_category_label() -> String {
    "Kategori Kualitas Udara".to_string()
}

fn default_wspm_label() -> String {
    "Rata-rata WSPM dalam m/s".to_string()
}

fn default_rain_label() -> String {
    "Rata-rata Curah Hujan (RAIN) dalam mm".to_string()
}

fn default_pm25_label() -> String {
    "Rata-rata PM2.5 dalam µg/m³".to_string()
}

fn default_variable_label() -> String {
    "Variable".to_string()
}

fn default_correlation_label() -> String {
    "Correlation".to_string()
}

/// Substitute `{key}` placeholders in a title template.
pub fn render_title(template: &str, vars: &[(&str, String)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

impl DashboardConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: DashboardConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Try to load `dashboard.toml` from the working directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Resolve the configuration for a run: the explicit `--config` file,
    /// else `dashboard.toml` if present, else defaults. CLI flags win.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::load_default()?.unwrap_or_else(|| {
                log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                Self::default()
            }),
        };
        config.merge_with_args(args);
        Ok(config)
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(path) = &args.data {
            self.data.path = Some(path.clone());
        }
        if let Some(station) = &args.station {
            self.data.station = station.clone();
        }
    }

    /// Serialize the defaults as a starting `dashboard.toml`.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}
