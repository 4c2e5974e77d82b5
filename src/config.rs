use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "incident_cards")]
#[command(about = "Render one HTML card per incident from incident and revenue logs")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Incident log (`;`-separated, with header row)
    #[arg(default_value = "data/incident_data.csv")]
    pub incident_path: PathBuf,

    /// Revenue log (`;`-separated, with header row)
    #[arg(default_value = "data/revenue.csv")]
    pub revenue_path: PathBuf,

    /// Directory the cards are written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Also write each card's values as `card_<id>.json`
    #[arg(long)]
    pub json: bool,

    /// Log file, appended to
    #[arg(long, default_value = "get_incident_card.log")]
    pub log_file: PathBuf,

    /// Log level; `RUST_LOG` takes precedence
    #[arg(long, default_value = "debug")]
    pub log_level: String,

    /// Number of incidents shown in the console summary
    #[arg(long, default_value_t = 10)]
    pub preview: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub incident_path: PathBuf,
    pub revenue_path: PathBuf,
    pub out_dir: PathBuf,
    pub write_json: bool,
}

impl PipelineConfig {
    /// Cards go to the working directory, HTML only.
    pub fn new(incident_path: impl Into<PathBuf>, revenue_path: impl Into<PathBuf>) -> Self {
        Self {
            incident_path: incident_path.into(),
            revenue_path: revenue_path.into(),
            out_dir: PathBuf::from("."),
            write_json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

impl Cli {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            incident_path: self.incident_path.clone(),
            revenue_path: self.revenue_path.clone(),
            out_dir: self.out_dir.clone(),
            write_json: self.json,
        }
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            file: self.log_file.clone(),
            level: self.log_level.clone(),
        }
    }
}
