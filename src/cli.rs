// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions

use clap::{Args, Parser, Subcommand};

/// MoatTutor - learn why stocks move, one session at a time
#[derive(Parser, Debug)]
#[command(name = "moat-tutor", version, about)]
pub struct Cli {
    /// Increase verbosity (enables engine diagnostics)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive tutoring chat (default)
    Chat(ChatArgs),

    /// One-shot structured analysis for a ticker and date range
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Default)]
pub struct ChatArgs {
    /// Model to use, overriding settings
    #[arg(long)]
    pub model: Option<String>,

    /// Start with this query instead of waiting for input
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Stock ticker symbol (e.g. AAPL)
    #[arg(long)]
    pub ticker: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: String,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: String,

    /// Expertise level: beginner, intermediate, or professional
    #[arg(long)]
    pub expertise: Option<String>,

    /// Model to use, overriding settings
    #[arg(long)]
    pub model: Option<String>,
}
