#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use garde_veto::{
    fold_schedule, io, DiagnosticReport, Engine, EngineConfig, HistoryStore, JsonHistoryStore,
    RawVet, SolveStatus, SolverOptions,
};
use serde_json::to_string_pretty;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification des astreintes (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de configuration (groupes, tags, seuils)
    #[arg(long, global = true, default_value = "config.json")]
    config: String,

    /// Fichier JSON d'historique cumulé
    #[arg(long, global = true, default_value = "history.json")]
    history: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer un trombinoscope depuis un CSV
    ImportRoster {
        #[arg(long)]
        csv: String,
        #[arg(long)]
        out: String,
    },

    /// Résoudre un planning sur un horizon donné
    Solve {
        /// Fichier JSON listant les vétérinaires (`Vec<RawVet>`)
        #[arg(long)]
        roster: String,
        /// Date de début (AAAA-MM-JJ)
        #[arg(long)]
        start: String,
        /// Date de fin incluse (AAAA-MM-JJ)
        #[arg(long)]
        end: String,
        /// Fichier de sortie JSON pour le planning résolu
        #[arg(long)]
        out: String,
        /// Nom de la période enregistrée dans l'historique
        #[arg(long)]
        period: String,
        /// Budget temps du solveur, en secondes
        #[arg(long, default_value_t = 300)]
        time_budget_secs: u64,
        /// Nombre de threads de relance aléatoire
        #[arg(long, default_value_t = 8)]
        workers: usize,
        /// Graine du générateur aléatoire (reproductibilité, P8)
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// N'écrit pas l'historique, même en cas de succès
        #[arg(long)]
        dry_run: bool,
    },

    /// Ré-auditer un planning déjà résolu contre la table de règles
    Diagnose {
        #[arg(long)]
        roster: String,
        #[arg(long)]
        schedule: String,
    },

    /// Effacer l'historique cumulé
    ClearHistory,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::ImportRoster { csv, out } => {
            let vets = io::import_roster_csv(&csv)?;
            let json = to_string_pretty(&vets)?;
            std::fs::write(&out, json)?;
            println!("Imported {} vet(s) into {out}", vets.len());
            0
        }
        Commands::Solve {
            roster,
            start,
            end,
            out,
            period,
            time_budget_secs,
            workers,
            seed,
            dry_run,
        } => run_solve(&cli.config, &cli.history, SolveArgs {
            roster, start, end, out, period, time_budget_secs, workers, seed, dry_run,
        })?,
        Commands::Diagnose { roster, schedule } => run_diagnose(&cli.config, &roster, &schedule)?,
        Commands::ClearHistory => {
            let store = JsonHistoryStore::open(&cli.history);
            store.clear()?;
            println!("History cleared: {}", cli.history);
            0
        }
    };

    std::process::exit(code);
}

struct SolveArgs {
    roster: String,
    start: String,
    end: String,
    out: String,
    period: String,
    time_budget_secs: u64,
    workers: usize,
    seed: u64,
    dry_run: bool,
}

fn run_solve(config_path: &str, history_path: &str, args: SolveArgs) -> Result<i32> {
    let raw_vets = load_roster(&args.roster)?;
    let config = load_config(config_path)?;
    let store = JsonHistoryStore::open(history_path);
    let mut history = store.load()?;

    let start = parse_date(&args.start)?;
    let end = parse_date(&args.end)?;

    let engine = Engine::build(start, end, raw_vets, config, &history)?;
    let opts = SolverOptions {
        time_budget: std::time::Duration::from_secs(args.time_budget_secs),
        workers: args.workers,
        seed: args.seed,
    };
    let outcome = engine.solve(opts);
    let report = engine.diagnose(&outcome);
    print_report(&report);

    match outcome.status {
        SolveStatus::Optimal | SolveStatus::Feasible => {
            let schedule = outcome.schedule().expect("a success status always carries a schedule");
            let json = to_string_pretty(schedule)?;
            std::fs::write(&args.out, json)?;
            println!("Schedule written to {} ({} day(s))", args.out, schedule.len());

            if !args.dry_run {
                let stats = fold_schedule(schedule);
                history.record_period(args.period, start, end, stats);
                store.save(&history)?;
                println!("History updated: {history_path}");
            }

            if report.is_clean() {
                Ok(0)
            } else {
                eprintln!("Warning: diagnostic flagged {} violation(s) despite a {:?} solve", report.violations.len(), outcome.status);
                Ok(2)
            }
        }
        SolveStatus::Infeasible => {
            eprintln!("Infeasible: no schedule satisfies every constraint over this horizon and roster");
            Ok(1)
        }
        SolveStatus::Timeout => {
            eprintln!("Timeout: no feasible schedule found within the time budget");
            Ok(3)
        }
        SolveStatus::Unknown => {
            eprintln!("Unknown: the solver returned no classification");
            Ok(4)
        }
    }
}

fn run_diagnose(config_path: &str, roster_path: &str, schedule_path: &str) -> Result<i32> {
    let raw_vets = load_roster(roster_path)?;
    let config = load_config(config_path)?;

    let data = std::fs::read_to_string(schedule_path)
        .with_context(|| format!("reading {schedule_path}"))?;
    let schedule: Vec<garde_veto::DaySchedule> =
        serde_json::from_str(&data).with_context(|| format!("parsing {schedule_path}"))?;

    let Some(first) = schedule.first() else {
        println!("OK: empty schedule, nothing to check");
        return Ok(0);
    };
    let start = first.date;
    let end = schedule.last().unwrap().date;
    let history = garde_veto::History::default();
    let engine = Engine::build(start, end, raw_vets, config, &history)?;
    let outcome = garde_veto::SolveOutcome::new(SolveStatus::Unknown, Some(schedule));
    let report = engine.diagnose(&outcome);
    print_report(&report);

    if report.is_clean() {
        Ok(0)
    } else {
        Ok(2)
    }
}

fn print_report(report: &DiagnosticReport) {
    if report.violations.is_empty() {
        println!("OK: no rule violations");
    } else {
        eprintln!("Found {} violation(s):", report.violations.len());
        for v in &report.violations {
            eprintln!("  [{}] {}", v.rule.label(), v.detail);
        }
    }
    for w in &report.warnings {
        println!("Balance warning: {} gap {} exceeds limit {}", w.category, w.gap, w.limit);
    }
}

fn load_roster(path: &str) -> Result<Vec<RawVet>> {
    let data = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&data).with_context(|| format!("parsing {path}"))
}

fn load_config(path: &str) -> Result<EngineConfig> {
    match std::fs::read_to_string(path) {
        Ok(data) => serde_json::from_str(&data).with_context(|| format!("parsing {path}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(EngineConfig::default()),
        Err(e) => Err(e).with_context(|| format!("reading {path}")),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {value}"))
}
