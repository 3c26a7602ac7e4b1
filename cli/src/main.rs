//! labelens CLI - terminal front end for the flow controller.
//!
//! # Architecture
//!
//! The binary is presentation glue: it reads commands from stdin, invokes
//! [`FlowController`] operations, waits for any resulting request to settle,
//! and renders the controller-exposed state for the active view. All session
//! state lives in the engine; nothing here mutates it directly.
//!
//! ```text
//! stdin line -> command for the active view -> controller op
//!                                                   │
//!                        controller.drive().await <─┘
//!                                                   │
//!                               render(view state) <┘
//! ```

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;
use url::Url;

use labelens_client::{AnalysisPayload, ApiClient, LabelService, builtin_samples};
use labelens_engine::{FlowController, LabelensConfig, resolve_base_url};
use labelens_types::{
    AnalysisResult, CapturedImage, ChatPane, ChatRole, Emphasis, Impact, ViewState,
};

const DEFAULT_BASE_URL: &str = "http://localhost:5000";

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn service_url() -> Result<Url> {
    let config = LabelensConfig::load().unwrap_or_else(|e| {
        tracing::warn!("ignoring unreadable config: {e}");
        None
    });

    match resolve_base_url(config.as_ref())? {
        Some(url) => Ok(url),
        None => {
            tracing::warn!(
                "no service URL configured (LABELENS_API_URL or ~/.labelens/config.toml); \
                 falling back to {DEFAULT_BASE_URL}"
            );
            Url::parse(DEFAULT_BASE_URL).context("default base URL parses")
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let base_url = service_url()?;
    let client = Arc::new(ApiClient::new(base_url));
    let mut controller = FlowController::new(Arc::clone(&client) as Arc<dyn LabelService>);

    render(&controller);
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(line) = lines.next() else { break };
        let line = line.context("reading stdin")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "quit" | "exit") {
            break;
        }

        if let Err(e) = dispatch(&mut controller, &client, input).await {
            eprintln!("error: {e:#}");
        }

        if controller.is_analyzing() {
            render(&controller);
        }
        controller.drive().await;
        render(&controller);
    }

    Ok(())
}

async fn dispatch(
    controller: &mut FlowController,
    client: &Arc<ApiClient>,
    input: &str,
) -> Result<()> {
    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };

    match command {
        "start" => controller.start_app(),
        "back" => {
            if !controller.handle_history_pop() {
                println!("already at the start");
            }
        }
        "reset" => controller.reset_flow(),
        "home" => controller.go_home(),
        "dismiss" => controller.dismiss_error(),
        "text" => {
            let payload = AnalysisPayload::ingredients(rest)?;
            controller.submit_analysis(payload);
        }
        "image" => {
            let bytes = std::fs::read(rest).with_context(|| format!("reading {rest}"))?;
            controller.submit_analysis(AnalysisPayload::image(CapturedImage::from_bytes(&bytes)));
        }
        "sample" => {
            let payload = AnalysisPayload::sample(rest)?;
            controller.submit_analysis(payload);
        }
        "samples" => print_samples(client).await,
        "ask" => controller.send_chat_message(rest),
        "cancel" => controller.cancel_chat(),
        "explain" => controller.open_explanation(),
        "help" => print_help(controller.view()),
        other => println!("unknown command: {other} (try 'help')"),
    }
    Ok(())
}

async fn print_samples(client: &Arc<ApiClient>) {
    let samples = match client.samples().await {
        Ok(samples) => samples,
        Err(e) => {
            tracing::warn!("sample listing unavailable: {e}");
            builtin_samples()
        }
    };
    println!("Sample products:");
    for sample in samples {
        println!("  {} - {}", sample.id, sample.name);
    }
}

fn print_help(view: ViewState) {
    let commands: &[&str] = match view {
        ViewState::Hero => &["start", "quit"],
        ViewState::Input => &[
            "text <ingredients>",
            "image <path>",
            "sample <id>",
            "samples",
            "dismiss",
            "back",
            "home",
            "quit",
        ],
        ViewState::Reasoning => &["back", "quit"],
        ViewState::Chat => &["ask <question>", "explain", "back", "reset", "home", "quit"],
    };
    println!("commands: {}", commands.join(", "));
}

fn render(controller: &FlowController) {
    println!();
    if let Some(error) = controller.error_message() {
        println!("{RED}{BOLD}! {error}{RESET}  {DIM}(dismiss to clear){RESET}");
    }

    match controller.view() {
        ViewState::Hero => {
            println!("{BOLD}labelens{RESET} - understand what's in your food");
            println!("{DIM}type 'start' to scan a label{RESET}");
        }
        ViewState::Input => {
            println!("{BOLD}What should we analyze?{RESET}");
            println!("{DIM}paste ingredients ('text ...'), point at a photo ('image ...'), or try 'samples'{RESET}");
        }
        ViewState::Reasoning => {
            println!("Analyzing…");
        }
        ViewState::Chat => match controller.analysis() {
            Some(analysis) => render_chat(controller, analysis),
            None => println!("{DIM}no analysis available{RESET}"),
        },
    }
}

fn render_chat(controller: &FlowController, analysis: &AnalysisResult) {
    match controller.chat_pane() {
        ChatPane::Transcript => {
            println!(
                "{BOLD}{}{RESET}  {}/100 - {}",
                render_summary(analysis),
                analysis.health_score,
                analysis.verdict().label()
            );
            if !analysis.key_points.is_empty() {
                println!("{DIM}'explain' for the ingredient breakdown{RESET}");
            }
            for message in controller.chat_history() {
                match message.role {
                    ChatRole::User => println!("  you: {}", message.content),
                    ChatRole::Model => println!("  ai:  {}", message.content),
                }
            }
            if controller.is_chatting() {
                println!("  {DIM}ai is typing…{RESET}");
            }
        }
        ChatPane::Explanation => {
            println!("{BOLD}Key ingredients{RESET}");
            for point in &analysis.key_points {
                let marker = match point.impact {
                    Impact::Positive => format!("{GREEN}+{RESET}"),
                    Impact::Negative => format!("{RED}-{RESET}"),
                    Impact::Neutral => format!("{DIM}o{RESET}"),
                };
                println!("  {marker} {BOLD}{}{RESET}: {}", point.ingredient, point.why_it_matters);
            }
            if !analysis.guidance().is_empty() {
                println!("{BOLD}Guidance{RESET}");
                for tip in analysis.guidance() {
                    println!("  * {tip}");
                }
            }
            println!("{DIM}'back' returns to the conversation{RESET}");
        }
    }
}

fn render_summary(analysis: &AnalysisResult) -> String {
    let mut out = String::new();
    for span in analysis.summary_spans() {
        let Some(emphasis) = span.emphasis else {
            out.push_str(&span.text);
            continue;
        };
        out.push_str(match emphasis {
            Emphasis::Negative => RED,
            Emphasis::Positive => GREEN,
            Emphasis::Caution => YELLOW,
        });
        out.push_str(&span.text);
        // Restore the bold context the caller wraps the summary in.
        out.push_str(RESET);
        out.push_str(BOLD);
    }
    out
}
