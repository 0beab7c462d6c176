use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use log::info;

use nfl_dashboard::config::DashboardConfig;
use nfl_dashboard::dashboard::Dashboard;
use nfl_dashboard::feed::feed_from_config;
use nfl_dashboard::sections::SectionStatus;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = DashboardConfig::from_env();
    let feed = feed_from_config(&config);
    let mut dashboard = Dashboard::new(config.standings_source);
    let reports = dashboard.refresh(
        feed.as_ref(),
        config.fetch_parallelism,
        Local::now().naive_local(),
    );
    for report in &reports {
        if let SectionStatus::Failed(err) = &report.status {
            eprintln!("{}: {err}", report.section);
        }
    }

    if has_flag("--json") {
        let tree = dashboard.view_tree();
        let json = serde_json::to_string_pretty(&tree).context("serialize view tree")?;
        println!("{json}");
        return Ok(());
    }

    let out = parse_out_arg().unwrap_or_else(|| config.html_out.clone());
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(&out, dashboard.render_page())
        .with_context(|| format!("write {}", out.display()))?;
    info!("wrote {}", out.display());
    println!("Dashboard written to {}", out.display());
    Ok(())
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}

fn parse_out_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if arg == "--out" {
            return args.get(idx + 1).map(PathBuf::from);
        }
        if let Some(rest) = arg.strip_prefix("--out=") {
            return Some(PathBuf::from(rest));
        }
    }
    None
}
