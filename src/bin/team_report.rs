use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use env_logger::Env;

use fpl_analyzer::analysis::analyze_team;
use fpl_analyzer::config::AnalyzerConfig;
use fpl_analyzer::fpl_fetch::FplApi;
use fpl_analyzer::render::{JsonRenderer, ReportRenderer, TextRenderer};

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let team_id = parse_team_arg(&args)
        .ok_or_else(|| anyhow!("usage: team_report [--json] --team <id>"))?;
    let config = AnalyzerConfig::from_env();
    let api = FplApi::new(&config)?;

    let out = io::stdout().lock();
    let mut renderer: Box<dyn ReportRenderer> = if args.iter().any(|a| a == "--json") {
        Box::new(JsonRenderer::new(out))
    } else {
        Box::new(TextRenderer::new(out))
    };
    match analyze_team(&api, team_id, &config) {
        Ok(report) => {
            renderer
                .render_report(&report)
                .context("failed writing report")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            renderer.render_error(&err).context("failed writing error")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn parse_team_arg(args: &[String]) -> Option<u32> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix("--team=") {
            return parse_id(raw);
        }
        if arg == "--team" {
            return args.get(idx + 1).and_then(|next| parse_id(next));
        }
    }
    args.iter()
        .find(|arg| !arg.starts_with("--"))
        .and_then(|first| parse_id(first))
}

fn parse_id(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|id| *id > 0)
}
