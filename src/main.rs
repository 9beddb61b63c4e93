use std::{env, process::ExitCode};

use recipe_recommender::{
    CborFileStore, RecipeStore, RecommendError, Recommender, RecommenderConfig, DEFAULT_MAX_AGE,
};
use tracing_subscriber::EnvFilter;

fn usage() -> ExitCode {
    eprintln!("usage: recipe-recommender <table.cbor> <recipe-link>");
    ExitCode::from(2)
}

fn run(table: &str, link: &str) -> Result<(), RecommendError> {
    let store = CborFileStore::new(table);
    if !store.is_fresh(DEFAULT_MAX_AGE) {
        tracing::warn!(path = %table, "recipe table is older than a day; consider re-scraping");
    }
    let records = store.load()?;
    let target = Recommender::find_by_link(&records, link)
        .cloned()
        .ok_or_else(|| RecommendError::InvalidTarget {
            reason: format!("{} is not in {}", link, table),
        })?;

    let recommender = Recommender::new(RecommenderConfig::default().with_env_overrides());
    let rec = recommender.recommend(&records, &target)?;

    println!("Based on \"{}\", you may also like:\n", rec.target.name);
    if rec.peers.is_empty() {
        println!("(no similar recipes found)");
    }
    for peer in &rec.peers {
        println!("{}", peer.name);
        println!("Link: {}", peer.link);
        println!();
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [table, link] = args.as_slice() else {
        return usage();
    };

    match run(table, link) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[error] {}", e);
            ExitCode::FAILURE
        }
    }
}
