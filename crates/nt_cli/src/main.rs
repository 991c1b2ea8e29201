use anyhow::Context;
use clap::Parser;
use nt_core::NewsQuery;
use nt_pipeline::{init_logging, Pipeline, PipelineConfig, ProviderRegistry, ProviderSettings, SynthesisMode};
use nt_storage::AudioStore;
use nt_web::AppState;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                let unit = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(unit)
                    .and_then(|secs| total_seconds.checked_add(secs))
                    .ok_or_else(|| format!("Duration too large: {}", s))?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A bare number is seconds
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds
                .checked_add(num)
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            has_unit = true;
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch, summarize and narrate the news", long_about = None)]
pub struct Cli {
    /// State store backend: json or memory
    #[arg(long, env = "NT_STORAGE", default_value = "json")]
    storage: String,
    #[arg(long, env = "NT_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,
    #[arg(long, env = "NT_AUDIO_DIR", default_value = "./audio")]
    audio_dir: PathBuf,
    /// Per provider call limit, e.g. 30, 45s or 1m. 0 disables it
    #[arg(long, env = "NT_PROVIDER_TIMEOUT", default_value = "30")]
    provider_timeout: HumanDuration,
    #[arg(long, env = "NT_SYNTHESIS_MODE", default_value = "per-article")]
    synthesis_mode: SynthesisMode,
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    news_api_key: Option<String>,
    #[arg(long, env = "GUARDIAN_API_KEY", hide_env_values = true)]
    guardian_api_key: Option<String>,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,
    #[arg(long, env = "GOOGLE_TTS_API_KEY", hide_env_values = true)]
    google_tts_api_key: Option<String>,

    #[arg(long, env = "NEWS_COUNTRY", default_value = "us")]
    news_country: String,
    #[arg(long, env = "TTS_LANGUAGE_CODE", default_value = "en-US")]
    tts_language_code: String,

    #[arg(long, env = "NEWS_API_BASE_URL")]
    news_api_base_url: Option<String>,
    #[arg(long, env = "GUARDIAN_BASE_URL")]
    guardian_base_url: Option<String>,
    /// Shared by chat completions and speech
    #[arg(long, env = "OPENAI_BASE_URL")]
    openai_base_url: Option<String>,
    #[arg(long, env = "GEMINI_BASE_URL")]
    gemini_base_url: Option<String>,
    #[arg(long, env = "GOOGLE_TTS_BASE_URL")]
    google_tts_base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "PORT", default_value_t = 5000)]
        port: u16,
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Static front-end served for every other path
        #[arg(long, env = "NT_PUBLIC_DIR")]
        public_dir: Option<PathBuf>,
    },
    /// Fetch a fresh batch of headlines
    Fetch {
        #[arg(default_value = "")]
        keyword: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Summarize the stored batch
    Summarize,
    /// Turn stored summaries into audio
    Synthesize {
        #[arg(long)]
        mode: Option<SynthesisMode>,
    },
    /// Print the stored batch
    Show,
}

impl Cli {
    fn provider_settings(&self) -> ProviderSettings {
        let mut settings = ProviderSettings::default();

        settings.newsapi.api_key = self.news_api_key.clone();
        settings.newsapi.country = self.news_country.clone();
        settings.guardian.api_key = self.guardian_api_key.clone();
        settings.openai.api_key = self.openai_api_key.clone();
        settings.openai_tts.api_key = self.openai_api_key.clone();
        settings.gemini.api_key = self.gemini_api_key.clone();
        settings.google_tts.api_key = self.google_tts_api_key.clone();
        settings.google_tts.language_code = self.tts_language_code.clone();

        if let Some(url) = &self.news_api_base_url {
            settings.newsapi.base_url = url.clone();
        }
        if let Some(url) = &self.guardian_base_url {
            settings.guardian.base_url = url.clone();
        }
        if let Some(url) = &self.openai_base_url {
            settings.openai.base_url = url.clone();
            settings.openai_tts.base_url = url.clone();
        }
        if let Some(url) = &self.gemini_base_url {
            settings.gemini.base_url = url.clone();
        }
        if let Some(url) = &self.google_tts_base_url {
            settings.google_tts.base_url = url.clone();
        }

        match self.timeout() {
            Some(limit) => settings.with_timeout_secs(limit.as_secs().max(1)),
            None => settings,
        }
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.provider_timeout.0).filter(|d| !d.is_zero())
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let logger = init_logging(cli.verbose);

    let registry = ProviderRegistry::from_settings(cli.provider_settings())
        .context("failed to initialize providers")?;
    let storage = nt_storage::create_storage(&cli.storage, &cli.data_dir)?;
    logger.info(&format!(
        "💾 State store initialized (using {} in {})",
        cli.storage,
        cli.data_dir.display()
    ));

    let pipeline = Arc::new(Pipeline::new(
        registry,
        storage,
        AudioStore::new(&cli.audio_dir),
        PipelineConfig {
            provider_timeout: cli.timeout(),
            synthesis_mode: cli.synthesis_mode,
        },
    ));

    match cli.command {
        Commands::Serve { port, host, public_dir } => {
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .with_context(|| format!("invalid listen address {}:{}", host, port))?;
            info!("🎙️ Synthesis mode: {}", pipeline.synthesis_mode());
            let app = nt_web::create_app(AppState::new(pipeline), &cli.audio_dir, public_dir.as_deref());
            nt_web::serve(app, addr).await?;
        }
        Commands::Fetch { keyword, category } => {
            let report = pipeline.fetch(NewsQuery::new(keyword, category)).await?;
            print_json(&report)?;
        }
        Commands::Summarize => {
            let report = pipeline.summarize().await?;
            print_json(&report)?;
        }
        Commands::Synthesize { mode } => {
            let report = pipeline.synthesize(mode).await?;
            print_json(&report)?;
        }
        Commands::Show => match pipeline.current_batch().await? {
            Some(batch) => print_json(&batch)?,
            None => info!("📭 No batch has been fetched yet"),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration() {
        assert_eq!("30".parse::<HumanDuration>().unwrap().0, Duration::from_secs(30));
        assert_eq!("1m30s".parse::<HumanDuration>().unwrap().0, Duration::from_secs(90));
        assert!("5x".parse::<HumanDuration>().is_err());
        assert!("".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_huge_duration_is_rejected_not_overflowed() {
        assert!("18446744073709551615h".parse::<HumanDuration>().is_err());
        assert!("18446744073709551615s1s".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_settings_follow_arguments() {
        let cli = Cli::try_parse_from([
            "nt",
            "--openai-api-key",
            "sk-test",
            "--news-country",
            "gb",
            "--openai-base-url",
            "http://localhost:9000/v1",
            "--provider-timeout",
            "10s",
            "summarize",
        ])
        .unwrap();

        let settings = cli.provider_settings();
        assert_eq!(settings.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.openai_tts.api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.newsapi.country, "gb");
        assert_eq!(settings.openai_tts.base_url, "http://localhost:9000/v1");
        assert_eq!(settings.gemini.timeout_secs, 10);
        assert_eq!(cli.timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let cli = Cli::try_parse_from(["nt", "--provider-timeout", "0", "show"]).unwrap();
        assert_eq!(cli.timeout(), None);
    }
}
