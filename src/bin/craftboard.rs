//! Craftboard runner - ingest, rank, print and export
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin craftboard            # CSV export
//! cargo run --release --bin craftboard -- --backend sqlite
//! ```
//!
//! ## Environment Variables
//!
//! - SOURCE_MODE - local, ftp or sftp (required)
//! - SOURCE_HOST / SOURCE_PORT - server address (remote modes)
//! - SOURCE_USERNAME / SOURCE_PASSWORD - credentials (remote modes)
//! - SERVER_ROOT - base path containing world/ and usercache.json (required)
//! - STAGING_DIR - where downloads land (default: data)
//! - EXPORT_DIR - CSV output directory (default: exports)
//! - CRAFTBOARD_DB_PATH - SQLite path (default: data/craftboard.db) - used when --backend sqlite
//! - LEADERBOARDS - comma list of category/subcategory specs or "advancements"
//! - TITLES - comma list of display titles, paired with LEADERBOARDS
//! - TRANSFER_TIMEOUT_SECS - per-operation transfer timeout (default: 30)
//! - RUST_LOG - logging level (optional, default: info)

use craftboard::config::LeaderboardSpec;
use craftboard::{
    rank, rank_advancement_counts, Config, IngestPipeline, Leaderboard, SnapshotWriter, Transport,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    log::info!("🚀 Starting Craftboard");
    log::info!("   Mode: {}", config.mode.as_str());
    if !config.host.is_empty() {
        log::info!("   Host: {}:{}", config.host, config.port);
    }
    log::info!("   Server root: {}", config.server_root);
    log::info!("   Staging: {}", config.staging_dir.display());
    log::info!("   Leaderboards: {}", config.leaderboards.len());

    let transport = Transport::connect(&config)?;
    log::info!("📡 Transport: {}", transport.backend_type());

    let pipeline = IngestPipeline::new(
        transport,
        config.source_paths(),
        config.staging_dir.clone(),
    );
    let snapshot = pipeline.run()?;

    for (title, spec) in &config.leaderboards {
        let board = match spec {
            LeaderboardSpec::Stat {
                category,
                subcategory,
            } => rank(&snapshot.stats, category, subcategory),
            LeaderboardSpec::AdvancementCount => rank_advancement_counts(&snapshot.advancements),
        };
        print_board(title, &board);
    }

    let mut writer = SnapshotWriter::new(config.backend, config.export_path.clone())?;
    log::info!("📊 Export backend: {}", writer.backend_type());
    writer.write_snapshot(&snapshot)?;

    log::info!("✅ Done");
    Ok(())
}

fn print_board(title: &str, board: &Leaderboard) {
    println!("\n=== {} ===", title);
    if board.is_empty() {
        println!("(no players)");
        return;
    }
    for (position, entry) in board.entries.iter().enumerate() {
        println!("{:>3}. {:<24} {}", position + 1, entry.name, entry.score);
    }
}
