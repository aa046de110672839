#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roulement::{
    dispatch_to_assigned, io, GroupRosterFactory, JsonStorage, NotificationCenter, Roster,
    ScheduleDraft, Settings, Staff,
};
use std::sync::Arc;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI d'affectation de créneaux (stratégies nommées, rosters JSON)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier de réglages JSON
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lister les stratégies disponibles
    Strategies,

    /// Générer un roster avec une stratégie
    Generate {
        /// Nom de la stratégie (défaut : réglages)
        #[arg(long)]
        strategy: Option<String>,
        /// CSV `id,name`
        #[arg(long)]
        staff: String,
        /// CSV `start,end[,staff_id]`
        #[arg(long)]
        shifts: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        out: Option<String>,
        #[arg(long)]
        csv: Option<String>,
        /// Stockage JSON où commiter le roster
        #[arg(long)]
        store: Option<String>,
        /// Prévenir chaque personne assignée
        #[arg(long)]
        notify: bool,
    },

    /// Construire un roster à partir de descriptions JSON
    Build {
        #[arg(long)]
        input: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        store: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let factory = GroupRosterFactory::new(Arc::new(settings.registry()))
        .with_options(settings.roster_options());

    let code = match cli.cmd {
        Commands::Strategies => {
            for name in factory.registry().names() {
                println!("{name}");
            }
            0
        }
        Commands::Generate {
            strategy,
            staff,
            shifts,
            name,
            out,
            csv,
            store,
            notify,
        } => {
            let staff = io::import_staff_csv(&staff)?;
            let shifts = io::import_shifts_csv(&shifts)?;
            let strategy = strategy.unwrap_or_else(|| settings.default_strategy.clone());
            let roster = match store {
                Some(path) => {
                    let mut storage = JsonStorage::open(path)?;
                    factory.create_with_strategy_in(
                        &strategy,
                        &shifts,
                        &staff,
                        name.as_deref(),
                        &mut storage,
                        true,
                    )?
                }
                None => factory.create_with_strategy(&strategy, &shifts, &staff, name.as_deref())?,
            };

            print_roster(&roster, &staff);
            if let Some(path) = out {
                io::export_roster_json(path, &roster)?;
            }
            if let Some(path) = csv {
                io::export_shifts_csv(path, &roster, &staff)?;
            }

            if notify {
                let center = NotificationCenter::new();
                let report = dispatch_to_assigned(&roster, &center);
                for n in &report.sent {
                    println!("notify {} : {}", n.receiver, n.message);
                }
                // Code 2 = WARNING/INCOMPLETE
                if report.failures.is_empty() { 0 } else { 2 }
            } else {
                0
            }
        }
        Commands::Build { input, name, store } => {
            let data = std::fs::read(&input).with_context(|| format!("reading {input}"))?;
            let drafts: Vec<ScheduleDraft> =
                serde_json::from_slice(&data).with_context(|| format!("parsing {input}"))?;
            let roster = match store {
                Some(path) => {
                    let mut storage = JsonStorage::open(path)?;
                    factory.create_in(&drafts, name.as_deref(), &mut storage, true)?
                }
                None => factory.create(&drafts, name.as_deref())?,
            };
            println!(
                "{}: {} schedule(s), {} shift(s)",
                roster.display_name(),
                roster.schedule_count(),
                roster.shift_count()
            );
            0
        }
    };

    std::process::exit(code);
}

fn print_roster(roster: &Roster, staff: &[Staff]) {
    println!("{}", roster.display_name());
    for schedule in roster.schedules() {
        for s in &schedule.shifts {
            let assigned = s
                .staff
                .as_ref()
                .and_then(|id| staff.iter().find(|p| p.id == *id))
                .map(|p| p.name.as_str())
                .unwrap_or("-");
            println!(
                "{} | {} → {} | {}",
                schedule.name,
                s.start.to_rfc3339(),
                s.end.to_rfc3339(),
                assigned
            );
        }
    }
}
