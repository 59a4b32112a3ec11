//! Advisor Binary
//!
//! Self-play, replay-and-suggest, profile validation and node keys.
//!
//! Commands: play, suggest, validate, key

use clap::Parser;
use clap::Subcommand;
use colored::ColoredString;
use colored::Colorize;
use headsup::advisor::*;
use headsup::gameplay::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file, read instead of the SUGGEST_* environment
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Play hands where both seats follow the advisor")]
    Play {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1)]
        hands: usize,
    },
    #[command(about = "Replay actions on a seeded deal and suggest the next one", alias = "s")]
    Suggest {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// comma separated, e.g. "call,check,bet:4"
        #[arg(long, default_value = "")]
        actions: String,
    },
    #[command(about = "Check a profile directory and print the report")]
    Validate {
        #[arg(required = true)]
        dir: PathBuf,
    },
    #[command(about = "Print the policy node key after a replay")]
    Key {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value = "")]
        actions: String,
    },
}

fn main() -> anyhow::Result<()> {
    headsup::log();
    let args = Args::parse();
    let config = match args.config {
        Some(ref path) => AdvisorConfig::from_file(path)?,
        None => AdvisorConfig::from_env(),
    };
    let ref ctx = AdvisorContext::new(config);
    match args.command {
        Command::Play { seed, hands } => play(ctx, seed, hands),
        Command::Suggest { seed, actions } => {
            let state = replay(seed, &actions)?;
            let suggestion = build_suggestion(&state, state.to_act(), ctx)?;
            println!("{}", state);
            show(&suggestion);
            Ok(())
        }
        Command::Validate { dir } => {
            let report = validate_profile_dir(&dir);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.ok {
                std::process::exit(2);
            }
            Ok(())
        }
        Command::Key { seed, actions } => {
            let state = replay(seed, &actions)?;
            let evaluator = ctx.evaluators.get();
            let (obs, _) = Observation::build(&state, state.to_act(), &legal_actions(&state), ctx.bundle(), evaluator.as_ref());
            println!("{}", node_key_from_observation(&obs));
            Ok(())
        }
    }
}

/// `name` or `name:amount`.
fn parse_step(token: &str) -> anyhow::Result<(Action, Option<headsup::Chips>)> {
    let (name, amount) = match token.split_once(':') {
        Some((name, amount)) => (name, Some(amount)),
        None => (token, None),
    };
    let action = Action::try_from(name.trim()).map_err(|e| anyhow::anyhow!("{}: {}", token, e))?;
    let amount = amount
        .map(|a| a.trim().parse::<headsup::Chips>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("{}: {}", token, e))?;
    Ok((action, amount))
}

fn replay(seed: u64, actions: &str) -> anyhow::Result<HandState> {
    let ref cfg = SessionConfig::default();
    let mut state = start_hand(cfg, "cli", &format!("cli-{}", seed), 0, Some(seed))?;
    for token in actions.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (action, amount) = parse_step(token)?;
        state = apply_action(&state, action, amount)?;
    }
    Ok(state)
}

fn paint(suggested: &Suggested) -> ColoredString {
    let text = suggested.to_string().to_uppercase();
    match suggested.action {
        Action::Fold => text.red(),
        Action::Check | Action::Call => text.yellow(),
        Action::Bet | Action::Raise => text.green(),
        Action::Allin => text.red().bold(),
    }
}

fn show(suggestion: &Suggestion) {
    println!(
        "seat {} {} via {} ({:.2})",
        suggestion.actor,
        paint(&suggestion.suggested),
        suggestion.policy.cyan(),
        suggestion.confidence
    );
    for line in suggestion.explanations.iter() {
        println!("  {}", line.dimmed());
    }
}

/// Both seats follow the advisor for `hands` hands or until a seat busts.
fn play(ctx: &AdvisorContext, seed: u64, hands: usize) -> anyhow::Result<()> {
    let cfg = start_session(headsup::STACK, headsup::S_BLIND, headsup::B_BLIND)?;
    let evaluator = ctx.evaluators.get();
    let mut view = SessionView::fold("play", 0, [cfg.init_stack; headsup::N], 1);
    let mut state = start_hand(&cfg, &view.session_id, &view.hand_id(), view.button, Some(seed))?;
    for n in 0..hands {
        println!("{}", format!("== hand {} ==", state.hand_id()).bold());
        while state.street().is_some() {
            let suggestion = build_suggestion(&state, state.to_act(), ctx)?;
            show(&suggestion);
            state = apply_action(&state, suggestion.suggested.action, suggestion.suggested.amount)?;
        }
        state = settle_if_needed(&state, evaluator.as_ref());
        println!("{}", state);
        if n + 1 == hands {
            break;
        }
        let plan = match next_hand(&view, &state, Some(seed.wrapping_add(n as u64 + 1))) {
            Ok(plan) => plan,
            Err(e) => {
                log::info!("session over: {}", e);
                break;
            }
        };
        view = SessionView::fold(&plan.session_id, plan.next_button, plan.stacks, plan.next_hand_no);
        state = plan.deal(&cfg)?;
    }
    Ok(())
}
