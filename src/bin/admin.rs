//! Admin utility for the peer-feedback database and recommender.
//!
//! Usage:
//!   cargo run --bin admin -- recommend --stage idea --concern scale-break
//!   cargo run --bin admin -- types
//!   cargo run --bin admin -- questions
//!   cargo run --bin admin -- projects
//!   cargo run --bin admin -- seed

use anyhow::Result;
use clap::{Parser, Subcommand};
use peer_feedback::config::Config;
use peer_feedback::recommendation::{Answers, FeedbackType, Question, describe, score};
use peer_feedback::seed::seed_demo_projects;
use peer_feedback::store::Store;
use peer_feedback::wizard::ensure_owner_token;
use prettytable::{Table, row};

#[derive(Parser)]
#[command(name = "admin")]
#[command(about = "peer-feedback admin utilities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a set of quiz answers and print the recommended feedback type
    Recommend {
        /// Project stage token (e.g. idea, users-clunky-ux)
        #[arg(long)]
        stage: Option<String>,
        /// Biggest concern token (e.g. real-problem, scale-break)
        #[arg(long)]
        concern: Option<String>,
        /// Next goal token (e.g. find-customers, clean-debt)
        #[arg(long)]
        goal: Option<String>,
    },
    /// List the feedback types and their descriptions
    Types,
    /// Print the submission quiz with every accepted answer token
    Questions,
    /// List stored projects with their feedback counts
    Projects,
    /// Insert the demo projects into the configured database
    Seed,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend {
            stage,
            concern,
            goal,
        } => recommend(Answers {
            project_stage: stage,
            biggest_concern: concern,
            next_goal: goal,
        }),
        Commands::Types => types(),
        Commands::Questions => questions(),
        Commands::Projects => projects(),
        Commands::Seed => seed(),
    }
}

fn recommend(answers: Answers) -> Result<()> {
    for question in Question::ALL {
        if let Some(token) = answers.get(question)
            && !question.accepts(token)
        {
            println!("⚠️  '{}' is not a known answer to: {}", token, question.prompt());
        }
    }

    let scores = score(&answers);
    let recommended = scores.leader();

    let mut table = Table::new();
    table.add_row(row!["Type", "Score"]);
    for t in FeedbackType::ALL {
        table.add_row(row![t.label(), scores.get(t)]);
    }
    table.printstd();

    println!("Recommended: {}", recommended.label());
    println!("{}", describe(recommended));
    Ok(())
}

fn types() -> Result<()> {
    let mut table = Table::new();
    table.add_row(row!["Type", "Description"]);
    for t in FeedbackType::ALL {
        table.add_row(row![t.as_str(), describe(t)]);
    }
    table.printstd();
    Ok(())
}

fn questions() -> Result<()> {
    for (i, question) in Question::ALL.into_iter().enumerate() {
        println!("{}. {}", i + 1, question.prompt());
        let mut table = Table::new();
        table.add_row(row!["Token", "Label", "Description"]);
        for option in question.options() {
            table.add_row(row![option.value, option.label, option.description]);
        }
        table.printstd();
        println!();
    }
    Ok(())
}

fn open_store() -> Result<Store> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;
    Ok(Store::open(&config.database.path)?)
}

fn projects() -> Result<()> {
    let store = open_store()?;
    let projects = store.list_projects()?;

    if projects.is_empty() {
        println!("No projects found in {}.", store.path());
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(row!["ID", "Title", "Type", "Feedback", "Helpful", "Created"]);
    for p in projects {
        let feedback = store.feedback_for_project(&p.id)?;
        let helpful: u32 = feedback.iter().map(|f| f.helpful).sum();
        table.add_row(row![
            p.id,
            p.title,
            p.feedback_type,
            feedback.len(),
            helpful,
            p.created_at.format("%Y-%m-%d %H:%M"),
        ]);
    }
    table.printstd();
    Ok(())
}

fn seed() -> Result<()> {
    let store = open_store()?;
    let token = ensure_owner_token(None);
    let inserted = seed_demo_projects(&store, &token)?;
    println!("✅ Seeded {} demo project(s) into {}", inserted.len(), store.path());
    Ok(())
}
