use nutrilens::api;
use nutrilens::commands::CommandHandler;
use nutrilens::config::{NutritionConfig, RecognitionConfig};
use nutrilens::food::api::EdamamClient;
use nutrilens::food::FoodAnalyzer;
use nutrilens::vision::RecognitionClient;
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use log::info;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Food photo nutrition analyzer and daily tracker", long_about = None)]
struct Args {
    /// Run the JSON API server instead of the interactive prompt
    #[arg(long)]
    serve: bool,

    /// Port for the API server
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Analyze one image and exit
    #[arg(long)]
    image: Option<String>,
}

fn build_analyzer() -> anyhow::Result<FoodAnalyzer> {
    let recognition = RecognitionClient::new(RecognitionConfig::from_env()?);
    let nutrition = EdamamClient::new(NutritionConfig::from_env()?);
    Ok(FoodAnalyzer::new(Arc::new(recognition), Arc::new(nutrition)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    colored::control::set_override(true);
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let analyzer = build_analyzer()?;

    if args.serve {
        return run_api_server(analyzer, args.port).await;
    }

    let mut handler = CommandHandler::new(analyzer);

    if let Some(path) = &args.image {
        // One-shot mode: analyze and print, no tracking loop.
        if let Err(e) = handler.handle_command(&format!("analyze {path}")).await {
            println!("{}", e.red());
            std::process::exit(1);
        }
        return Ok(());
    }

    println!("{}", "🍽️ Food Nutrition Analyzer".cyan().bold());
    handler.handle_command("help").await.ok();

    let mut rl = Editor::<(), DefaultHistory>::new()?;
    loop {
        match rl.readline("🍴 ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                rl.add_history_entry(input)?;
                if input == "exit" || input == "quit" {
                    break;
                }
                if let Err(e) = handler.handle_command(input).await {
                    println!("{}", e.red());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

async fn run_api_server(analyzer: FoodAnalyzer, port: u16) -> anyhow::Result<()> {
    let app = api::create_api(analyzer);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("API server listening on {addr}");
    println!("{}", format!("API server listening on http://{addr}").cyan());

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
