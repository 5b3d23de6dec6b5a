//! api-runner: headless gateway loop for the referral API.
//!
//! Usage:
//!   api-runner --db referrals.db
//!   api-runner --db referrals.db --summary
//!
//! By default each stdin line is one JSON request, e.g.
//!   {"method":"GET","path":"/validate/friend1"}
//!   {"method":"POST","path":"/set-referral-code","body":{"walletAddress":"0xABC","referralCode":"friend1"}}
//! and each stdout line is the JSON response. The HTTP gateway in front of
//! this process owns the actual sockets. With --summary it prints store
//! counts and exits.

use anyhow::Result;
use referral_core::{
    config::ApiConfig,
    router::{ApiRequest, ApiResponse, Router},
    service::ReferralService,
    store::ReferralStore,
};
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = ApiConfig::from_env();
    if let Some(db) = args.windows(2).find(|w| w[0] == "--db").map(|w| w[1].as_str()) {
        config.db_path = db.to_string();
    }
    let summary = args.iter().any(|a| a == "--summary");

    let store = ReferralStore::from_config(&config)?;
    store.migrate()?;

    let router = Router::new(ReferralService::new(store));

    if summary {
        print_summary(&router)?;
    } else {
        log::info!("serving on stdin/stdout, db: {}", config.db_path);
        run_serve_loop(&router)?;
    }

    Ok(())
}

fn run_serve_loop(router: &Router) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        let line = buffer.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ApiRequest>(line) {
            Ok(request) => router.dispatch(&request),
            Err(e) => ApiResponse::new(400, serde_json::json!({ "error": e.to_string() })),
        };
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(router: &Router) -> Result<()> {
    let store = router.service().store();
    let wallets = store.wallet_count()?;
    let coded = store.coded_wallet_count()?;

    println!("=== REFERRALS SUMMARY ===");
    println!("  wallets:       {wallets}");
    println!("  codes claimed: {coded}");
    Ok(())
}
