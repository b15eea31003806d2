use clap::Parser;
use codesage::clipboard::SystemClipboard;
use codesage::http::ReqwestHttp;
use codesage::report::{print_results, AnalysisReport};
use codesage::session::Session;
use codesage::{cli, config, error};
use codesage_common::{AnalysisClient, AnalysisCompletion};
use cli::{Cli, Commands};
use config::Config;
use error::{CodesageError, Result};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool, config: &Config) {
    // RUST_LOG > --verbose > 設定ファイル
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { config.log_level.as_str() };
        EnvFilter::new(format!("codesage={level},codesage_common={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;
    init_logging(cli.verbose, &config);

    match cli.command {
        Commands::Analyze { paths, output } => {
            println!("🔍 codesage - 画像解析\n");

            let api_url = config.resolve_api_url(cli.api_url.as_deref())?;
            let client = AnalysisClient::new(api_url.clone(), ReqwestHttp::new(config.timeout_seconds)?);
            let mut session = Session::new(client, SystemClipboard);

            if session.analyze_paths(&paths).await? != AnalysisCompletion::Shown {
                return Err(CodesageError::AnalysisFailed);
            }

            println!();
            print_results(session.controller());

            if let Some(output) = output {
                AnalysisReport::from_controller(session.controller(), &api_url).save(&output)?;
                println!("✔ 結果を保存: {}", output.display());
            }

            println!("\n✅ 解析完了");
        }

        Commands::Interactive => {
            let api_url = config.resolve_api_url(cli.api_url.as_deref())?;
            println!("🔍 codesage - 対話モード ({})\n", api_url);

            let client = AnalysisClient::new(api_url, ReqwestHttp::new(config.timeout_seconds)?);
            let mut session = Session::new(client, SystemClipboard);
            session.run_interactive().await?;

            println!("\n👋 終了");
        }

        Commands::Config { set_api_url, show } => {
            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ API URLを保存しました");
            }

            if show {
                println!("設定ファイル: {}", Config::config_path()?.display());
                println!("API URL (保存値): {}", config.api_url.as_deref().unwrap_or("(未設定)"));
                println!("API URL (有効値): {}", config.resolve_api_url(cli.api_url.as_deref())?);
                println!("タイムアウト: {}秒", config.timeout_seconds);
                println!("ログレベル: {}", config.log_level);
            }
        }
    }

    Ok(())
}
