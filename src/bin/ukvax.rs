use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use ukvax::viz::{self, Theme};
use ukvax::{Client, ClientOptions, reshape, storage};

#[derive(Parser, Debug)]
#[command(
    name = "ukvax",
    version,
    about = "Fetch UK COVID-19 vaccination counts and chart cumulative doses by nation"
)]
struct Cli {
    /// Chart path (.png or .svg). Parent directories are created.
    #[arg(long, default_value = viz::DEFAULT_OUTPUT)]
    output: PathBuf,
    /// Renderer preset.
    #[arg(long, value_enum, default_value_t = ThemeArg::Standard)]
    theme: ThemeArg,
    /// Figure width in pixels (defaults to the theme's).
    #[arg(long)]
    width: Option<u32>,
    /// Height of each nation row in pixels (defaults to the theme's).
    #[arg(long)]
    facet_height: Option<u32>,
    /// Extra attribution line under the source and date lines.
    #[arg(long)]
    credit: Option<String>,
    /// API root (without the trailing `/data`).
    #[arg(long, default_value = ukvax::api::DEFAULT_BASE_URL)]
    base_url: String,
    /// Request timeout in seconds (default: wait indefinitely).
    #[arg(long)]
    timeout: Option<u64>,
    /// Read a long-form CSV (as written by --save-csv) instead of calling the API.
    #[arg(long)]
    from_csv: Option<PathBuf>,
    /// Also save the long-form table as CSV.
    #[arg(long)]
    save_csv: Option<PathBuf>,
    /// Also save the long-form table as JSON.
    #[arg(long)]
    save_json: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeArg {
    Standard,
    Blog,
}

impl Cli {
    fn theme(&self) -> Result<Theme> {
        let mut theme = match self.theme {
            ThemeArg::Standard => Theme::standard(),
            ThemeArg::Blog => Theme::blog(),
        };
        if let Some(w) = self.width {
            if w < 200 {
                bail!("--width must be at least 200 pixels");
            }
            theme.width = w;
        }
        if let Some(h) = self.facet_height {
            if h < 80 {
                bail!("--facet-height must be at least 80 pixels");
            }
            theme.facet_height = h;
        }
        theme.credit = self.credit.clone();
        Ok(theme)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let theme = cli.theme()?;

    let long = match cli.from_csv.as_ref() {
        Some(path) => storage::load_csv(path)?,
        None => {
            let client = Client::with_options(ClientOptions {
                base_url: cli.base_url.clone(),
                timeout: cli.timeout.map(Duration::from_secs),
                ..ClientOptions::default()
            })?;
            let wide = client.fetch_vaccinations()?;
            reshape::melt(&wide)
        }
    };
    log::info!(
        "{} observations spanning {} days",
        long.len(),
        reshape::days_elapsed(&long).unwrap_or(0)
    );

    if let Some(path) = cli.save_csv.as_ref() {
        storage::save_csv(&long, path)?;
        eprintln!("Saved {} rows to {}", long.len(), path.display());
    }
    if let Some(path) = cli.save_json.as_ref() {
        storage::save_json(&long, path)?;
        eprintln!("Saved {} rows to {}", long.len(), path.display());
    }

    let layout = viz::plot_vaccinations(&long, &cli.output, &theme)?;
    eprintln!(
        "Wrote plot with {} nations to {}",
        layout.facet_count(),
        cli.output.display()
    );
    Ok(())
}
