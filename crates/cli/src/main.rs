//! Command-line front end for the matching engine.
//!
//! Usage:
//!     talentmatch rank --company co-1 --limit 10
//!     talentmatch --fixture demos/marketplace.json score --candidate cand-1 --company co-1
//!     talentmatch recent --page 0 --page-size 20
//!     talentmatch unlock --candidate cand-1 --company co-1
//!     talentmatch health

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use talentmatch_explain::{summarize_match, MatchLevel};
use talentmatch_model::{MatchBreakdown, RankedCandidate, RecentCandidatesQuery, UnlockStatus};
use talentmatch_rank::{MatchEngine, RankConfig};
use talentmatch_store::{
    list_recent_candidates, MemoryStore, ProfileStore, RestConfig, RestStore, UnlockLedger,
};

#[derive(Parser)]
#[command(name = "talentmatch")]
#[command(about = "Match candidates to companies and job postings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data API URL
    #[arg(long, default_value = "http://127.0.0.1:54321")]
    api_url: String,

    /// Data API key
    #[arg(long, env = "TALENTMATCH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Serve data from a JSON fixture instead of the data API
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Ranking configuration file (JSON); missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the newest candidates against a company
    Rank {
        /// Company id
        #[arg(short, long)]
        company: String,

        /// Maximum results (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Rank the newest candidates against one job posting
    RankJob {
        /// Job id
        #[arg(short, long)]
        job: String,

        /// Maximum results (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the full breakdown of one candidate against one company
    Score {
        #[arg(long)]
        candidate: String,

        #[arg(long)]
        company: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show a company's aggregated skill requirements
    Requirements {
        #[arg(short, long)]
        company: String,
    },

    /// List the newest candidates without scoring
    Recent {
        /// Zero-based page number
        #[arg(long, default_value = "0")]
        page: usize,

        #[arg(long, default_value = "20")]
        page_size: usize,
    },

    /// Spend credits to unlock a candidate profile
    Unlock {
        #[arg(long)]
        candidate: String,

        #[arg(long)]
        company: String,
    },

    /// Check store health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("talentmatch=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.fixture {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading fixture {}", path.display()))?;
            let store = MemoryStore::from_json(&json)?;
            run(MatchEngine::new(store, config), cli.command).await
        }
        None => {
            let store = RestStore::new(RestConfig {
                base_url: cli.api_url,
                api_key: cli.api_key,
                ..Default::default()
            })?;
            run(MatchEngine::new(store, config), cli.command).await
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<RankConfig> {
    let Some(path) = path else {
        return Ok(RankConfig::default());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded ranking config");
    Ok(config)
}

async fn run<S: ProfileStore + UnlockLedger>(engine: MatchEngine<S>, command: Commands) -> Result<()> {
    match command {
        Commands::Rank {
            company,
            limit,
            format,
        } => {
            let ranked = engine.rank_pool(&company, limit.unwrap_or(0)).await;
            let heading = format!("Ranking candidates for company: {}", company);
            print!("{}", render_ranked(&heading, &ranked, &format)?);
        }
        Commands::RankJob { job, limit, format } => {
            let ranked = engine.rank_candidates_for_job(&job, limit.unwrap_or(0)).await;
            let heading = format!("Ranking candidates for job: {}", job);
            print!("{}", render_ranked(&heading, &ranked, &format)?);
        }
        Commands::Score {
            candidate,
            company,
            format,
        } => match engine.score_candidate(&candidate, &company).await {
            Some(breakdown) if format == "json" => {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            }
            Some(breakdown) => print_breakdown(&breakdown),
            None => println!("No score available for {} against {}", candidate, company),
        },
        Commands::Requirements { company } => {
            let requirements = engine.aggregated_requirements(&company).await?;
            println!("Requirements for {} ({} skills)", company, requirements.len());
            for skill in &requirements.skills {
                println!(
                    "  {:<24} {:?} level {} / {:.1}y  (in {} postings)",
                    skill.name, skill.weight, skill.required_level, skill.minimum_years, skill.frequency
                );
            }
        }
        Commands::Recent { page, page_size } => {
            let query = RecentCandidatesQuery::new(page, page_size);
            let result = list_recent_candidates(engine.store(), query).await?;
            for candidate in &result.candidates {
                println!(
                    "{}  {}",
                    candidate.id,
                    candidate.headline.as_deref().unwrap_or("-")
                );
            }
            println!("---");
            println!(
                "Page {}: {} candidates{}",
                page,
                result.candidates.len(),
                if result.has_more { ", more available" } else { "" }
            );
        }
        Commands::Unlock { candidate, company } => {
            match engine.store().unlock(&candidate, &company).await {
                Ok(receipt) => {
                    let verb = match receipt.status {
                        UnlockStatus::Unlocked => "Unlocked",
                        UnlockStatus::AlreadyUnlocked => "Already unlocked",
                    };
                    println!(
                        "{} {} for {} ({} credits remaining)",
                        verb, receipt.candidate.id, company, receipt.credits_remaining
                    );
                }
                Err(e) => {
                    println!("FAILED [{}]: {}", e.code(), e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Health => {
            print!("Checking {} store... ", engine.store().name());
            match engine.store().health_check().await {
                Ok(()) => println!("OK"),
                Err(e) => {
                    println!("FAILED: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Ranked results as JSON, or as a text report under `heading`.
///
/// JSON output carries nothing but the array so it can be piped.
fn render_ranked(heading: &str, ranked: &[RankedCandidate], format: &str) -> Result<String> {
    if format == "json" {
        return Ok(format!("{}\n", serde_json::to_string_pretty(ranked)?));
    }

    let mut out = format!("{}\n---\n", heading);
    for hit in ranked {
        let name = hit.candidate.full_name.as_deref().unwrap_or(&hit.candidate.id);
        out.push_str(&format!("\n{}. {} ({})\n", hit.rank, name, hit.candidate.id));
        out.push_str(&format!("   {}\n", summarize_match(&hit.breakdown)));
    }
    out.push_str(&format!("\n---\nTotal: {} matches\n", ranked.len()));
    Ok(out)
}

fn print_breakdown(breakdown: &MatchBreakdown) {
    println!(
        "{} vs {}: {} ({})",
        breakdown.candidate_id,
        breakdown.target_id,
        breakdown.overall_score,
        MatchLevel::from_score(breakdown.overall_score).label()
    );
    for (dimension, score) in breakdown.dimensions.iter() {
        println!("  {:<14} {:>3}  {}", dimension.label(), score.score, score.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentmatch_model::{CandidateProfile, DimensionScore, DimensionScores, MatchSignal};

    fn ranked(id: &str) -> RankedCandidate {
        let dim = DimensionScore {
            score: 80,
            reason: String::new(),
            signal: MatchSignal::RemoteMatch,
        };
        RankedCandidate {
            rank: 1,
            candidate: CandidateProfile::new(id),
            breakdown: MatchBreakdown {
                candidate_id: id.to_string(),
                target_id: "co-1".to_string(),
                overall_score: 80,
                dimensions: DimensionScores {
                    skills: dim.clone(),
                    industry: dim.clone(),
                    culture: dim.clone(),
                    compensation: dim.clone(),
                    location: dim.clone(),
                    stage_fit: dim,
                },
            },
        }
    }

    #[test]
    fn test_json_ranking_output_is_parseable() {
        let out = render_ranked("Ranking candidates for company: co-1", &[ranked("cand-1")], "json").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["candidate"]["id"], "cand-1");
        assert!(!out.contains("Ranking candidates"));
    }

    #[test]
    fn test_text_ranking_output_has_heading() {
        let out = render_ranked("Ranking candidates for job: job-1", &[ranked("cand-1")], "text").unwrap();
        assert!(out.starts_with("Ranking candidates for job: job-1\n"));
        assert!(out.contains("1. cand-1 (cand-1)"));
        assert!(out.contains("Total: 1 matches"));
    }
}
