//! alpha-cli — command-line client for the Little Alpha tracking API
//!
//! # Subcommands
//! - `health`                                   — show server health
//! - `signup <email> <password>`                — create an account
//! - `login <email> <password>`                 — print a bearer token
//! - `status`                                   — protection status and streak
//! - `dose`                                     — log a dose
//! - `meal <food> [--risk <level>]`             — log a meal
//! - `symptom <severity> <description> [--meal <id>]` — log a symptom
//! - `history [--json]`                         — recent activity, newest first
//! - `waitlist <email>`                         — join the waitlist

use clap::{Parser, Subcommand, ValueEnum};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use uuid::Uuid;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8000/api";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "alpha-cli", version, about = "Little Alpha dose, meal and symptom tracker")]
struct Cli {
    /// API base URL (overrides ALPHA_API_URL env var)
    #[arg(long, env = "ALPHA_API_URL", default_value = DEFAULT_SERVER)]
    server: String,

    /// Bearer token from `alpha-cli login` (overrides ALPHA_TOKEN env var)
    #[arg(long, env = "ALPHA_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Risk {
    Safe,
    Low,
    Moderate,
    High,
}

impl Risk {
    fn as_str(&self) -> &'static str {
        match self {
            Risk::Safe => "safe",
            Risk::Low => "low",
            Risk::Moderate => "moderate",
            Risk::High => "high",
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show server health
    Health,

    /// Create an account
    Signup { email: String, password: String },

    /// Log in and print a bearer token
    Login { email: String, password: String },

    /// Show current protection status and streak
    Status,

    /// Log a dose taken now
    Dose,

    /// Log a meal eaten now
    Meal {
        /// What was eaten
        food: String,

        /// Allergen risk of the meal
        #[arg(long, value_enum, default_value_t = Risk::Low)]
        risk: Risk,
    },

    /// Log a symptom; links to a meal from the last 4 hours unless --meal is given
    Symptom {
        /// Severity from 1 to 10
        #[arg(value_parser = clap::value_parser!(i32).range(1..=10))]
        severity: i32,

        description: String,

        /// Attribute the symptom to this meal id
        #[arg(long)]
        meal: Option<Uuid>,
    },

    /// Show recent activity, newest first
    History {
        /// Print the raw JSON feed
        #[arg(long)]
        json: bool,
    },

    /// Join the waitlist
    Waitlist { email: String },
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    pub remaining: f64,
    pub last_dose_at: Option<String>,
    pub streak: i32,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

// ============================================================================
// Formatting
// ============================================================================

/// Render fractional minutes as `mm:ss`, flooring to whole seconds.
pub fn format_remaining(minutes: f64) -> String {
    let total_seconds = (minutes.max(0.0) * 60.0).floor() as u64;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// One-line summary of a history feed entry.
pub fn describe_entry(entry: &serde_json::Value) -> String {
    let time = entry["timestamp"].as_str().unwrap_or("?");
    match entry["type"].as_str().unwrap_or("") {
        "DOSE" => format!("{}  DOSE     Dose taken", time),
        "MEAL" => format!(
            "{}  MEAL     {} ({} risk)",
            time,
            entry["food_item"].as_str().unwrap_or("?"),
            entry["risk_level"].as_str().unwrap_or("?")
        ),
        "SYMPTOM" => {
            let linked = match entry["meal_id"].as_str() {
                Some(id) => format!(" [meal {}]", id),
                None => String::new(),
            };
            format!(
                "{}  SYMPTOM  {}/10 {}{}",
                time,
                entry["severity"].as_i64().unwrap_or(0),
                entry["description"].as_str().unwrap_or(""),
                linked
            )
        }
        other => format!("{}  {}", time, other),
    }
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

struct Api {
    client: Client,
    server: String,
    token: Option<String>,
}

impl Api {
    fn new(server: String, token: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            server,
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server, path)
    }

    fn authed(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        match &self.token {
            Some(t) => Ok(req.bearer_auth(t)),
            None => anyhow::bail!("no token: run `alpha-cli login` and set ALPHA_TOKEN"),
        }
    }

    /// Send and decode the JSON body, turning non-2xx into an error with the server's detail.
    fn send(&self, req: RequestBuilder) -> anyhow::Result<serde_json::Value> {
        let resp = req.send()?;
        let status = resp.status();
        let body: serde_json::Value = resp.json().unwrap_or_default();
        if !status.is_success() {
            let detail = body["detail"].as_str().unwrap_or("request failed");
            anyhow::bail!("server returned {}: {}", status, detail);
        }
        Ok(body)
    }
}

fn run(api: &Api, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Health => {
            let body = api.send(api.client.get(api.url("/health")))?;
            println!("Little Alpha: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:      {}", body["version"].as_str().unwrap_or("?"));
            println!("PostgreSQL:   {}", body["postgresql"].as_str().unwrap_or("?"));
        }
        Commands::Signup { email, password } => {
            let body = api.send(
                api.client
                    .post(api.url("/signup"))
                    .json(&serde_json::json!({"email": email, "password": password})),
            )?;
            println!("Account created for {}", body["email"].as_str().unwrap_or(&email));
        }
        Commands::Login { email, password } => {
            let body = api.send(
                api.client
                    .post(api.url("/login"))
                    .form(&[("username", email.as_str()), ("password", password.as_str())]),
            )?;
            let token: TokenResponse = serde_json::from_value(body)?;
            println!("{}", token.access_token);
        }
        Commands::Status => {
            let body = api.send(api.authed(api.client.get(api.url("/status")))?)?;
            let status: StatusResponse = serde_json::from_value(body)?;
            println!("{}  {}", status.status, status.message);
            if status.remaining > 0.0 {
                println!("Remaining: {}", format_remaining(status.remaining));
            }
            if let Some(at) = status.last_dose_at {
                println!("Last dose: {}", at);
            }
            println!("Streak:    {} days", status.streak);
        }
        Commands::Dose => {
            let body = api.send(api.authed(api.client.post(api.url("/dose")))?)?;
            println!(
                "{} (streak {})",
                body["message"].as_str().unwrap_or("Dose logged"),
                body["streak"]
            );
        }
        Commands::Meal { food, risk } => {
            let body = api.send(api.authed(
                api.client
                    .post(api.url("/meals"))
                    .json(&serde_json::json!({"food_item": food, "risk_level": risk.as_str()})),
            )?)?;
            println!("Meal logged: {}", body["id"].as_str().unwrap_or("?"));
        }
        Commands::Symptom {
            severity,
            description,
            meal,
        } => {
            let body = api.send(api.authed(api.client.post(api.url("/symptoms")).json(
                &serde_json::json!({
                    "severity": severity,
                    "description": description,
                    "meal_id": meal,
                }),
            ))?)?;
            match body["meal_id"].as_str() {
                Some(id) => println!("Symptom logged, linked to meal {}", id),
                None => println!("Symptom logged (no recent meal)"),
            }
        }
        Commands::History { json } => {
            let body = api.send(api.authed(api.client.get(api.url("/history")))?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                let entries = body.as_array().cloned().unwrap_or_default();
                if entries.is_empty() {
                    eprintln!("No activity yet");
                }
                for entry in &entries {
                    println!("{}", describe_entry(entry));
                }
            }
        }
        Commands::Waitlist { email } => {
            let body = api.send(
                api.client
                    .post(api.url("/waitlist"))
                    .json(&serde_json::json!({"email": email})),
            )?;
            println!("{}", body["message"].as_str().unwrap_or("Added to waitlist"));
        }
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = Api::new(server, cli.token).and_then(|api| run(&api, cli.command));

    if let Err(e) = result {
        eprintln!("alpha-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
