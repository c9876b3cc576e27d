// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! MoatTutor - interactive financial tutoring in your terminal
//!
//! Entry point for the moat-tutor CLI.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use futures::StreamExt;

use moat_tutor::agent::{AnalyzeRequest, ChatRequest, EngineOptions, TutorEngine};
use moat_tutor::cli::{AnalyzeArgs, ChatArgs, Cli, Commands};
use moat_tutor::config::{Settings, API_KEY_ENV};
use moat_tutor::data::MockMarketData;
use moat_tutor::error::{Result, TutorError};
use moat_tutor::llm::providers::OpenAiBackend;
use moat_tutor::session::SessionStore;
use moat_tutor::stream::TutorEvent;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing. RUST_LOG takes precedence; `-v` enables engine
    // diagnostics without requiring users to know target names up front.
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    if cli.verbose > 0 {
        for directive in [
            "moat_tutor.agent=debug",
            "moat_tutor.session=debug",
            "moat_tutor.stream=debug",
        ] {
            if let Ok(parsed) = directive.parse() {
                env_filter = env_filter.add_directive(parsed);
            }
        }
    }

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let settings = Settings::load()?;
    Settings::ensure_directories()?;

    match cli.command {
        None => run_chat(ChatArgs::default(), settings).await,
        Some(Commands::Chat(args)) => run_chat(args, settings).await,
        Some(Commands::Analyze(args)) => run_analyze(args, settings).await,
    }
}

/// Build the tutoring engine from settings
fn build_engine(settings: &Settings, model_override: Option<String>) -> Result<TutorEngine> {
    let api_key = settings.api_key().ok_or_else(|| {
        TutorError::Config(format!(
            "no API key configured: set {API_KEY_ENV} or backend.api_key in settings"
        ))
    })?;

    let backend = Arc::new(OpenAiBackend::with_base_url(
        api_key,
        settings.backend.base_url.clone(),
    ));

    let options = EngineOptions {
        model: model_override.unwrap_or_else(|| settings.backend.model.clone()),
        max_tokens: settings.backend.max_tokens,
        temperature: settings.backend.temperature,
    };

    Ok(TutorEngine::new(
        SessionStore::new(),
        backend,
        Arc::new(MockMarketData::new()),
        options,
    ))
}

/// Interactive tutoring loop, streaming responses to the terminal
async fn run_chat(args: ChatArgs, settings: Settings) -> Result<()> {
    let engine = build_engine(&settings, args.model)?;
    let mut session_id: Option<String> = None;

    println!("MoatTutor - interactive tutoring mode");
    println!("Ask about stock movements, moat characteristics, news, or prices.");
    println!("Commands: /new starts a fresh session, /sessions lists sessions, /quit exits.");
    println!();

    let stdin = io::stdin();
    let mut pending = args.query;

    loop {
        let input = match pending.take() {
            Some(query) => query,
            None => {
                print!("You: ");
                io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                line.trim().to_string()
            }
        };

        match input.as_str() {
            "" => continue,
            "/quit" | "/exit" | "quit" | "exit" => break,
            "/new" => {
                session_id = None;
                println!("Started a fresh session.");
                continue;
            }
            "/sessions" => {
                for session in engine.store().list() {
                    println!(
                        "{}  {} messages  last active {}",
                        session.session_id,
                        session.messages.len(),
                        session.last_activity.to_rfc3339()
                    );
                }
                continue;
            }
            _ => {}
        }

        let request = ChatRequest {
            query: input,
            session_id: session_id.clone(),
        };

        let mut events = match engine.chat_stream(request).await {
            Ok(events) => events,
            Err(error) => {
                eprintln!("error: {error}");
                continue;
            }
        };

        print!("MoatTutor: ");
        io::stdout().flush()?;

        while let Some(event) = events.next().await {
            match event {
                TutorEvent::Meta {
                    session_id: sid, ..
                } => {
                    session_id = Some(sid);
                }
                TutorEvent::Delta { text } => {
                    print!("{text}");
                    io::stdout().flush()?;
                }
                TutorEvent::Done { .. } => {
                    println!();
                    println!();
                }
                TutorEvent::Error { message } => {
                    eprintln!();
                    eprintln!("error: {message}");
                }
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// One-shot structured analysis printed as JSON
async fn run_analyze(args: AnalyzeArgs, settings: Settings) -> Result<()> {
    let engine = build_engine(&settings, args.model)?;

    let expertise = args
        .expertise
        .or_else(|| settings.defaults.expertise_level.clone())
        .map(|level| level.parse())
        .transpose()?;

    let parsed = engine
        .analyze(AnalyzeRequest {
            ticker: args.ticker,
            start_date: args.start_date,
            end_date: args.end_date,
            session_id: None,
            expertise_level: expertise,
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}
