#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use garde::{
    calendar, io,
    model::{AssignmentKind, PlanningData, PreferenceKind, WorkerId},
    storage::{JsonStorage, Storage},
    Distribution,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de répartition des gardes (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du jeu de données
    #[arg(long, global = true, default_value = "planning.json")]
    data: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des agents depuis un CSV
    ImportWorkers {
        #[arg(long)]
        csv: String,
    },

    /// Poser (ou lever) une dérogation calendrier pour une date
    SetHoliday {
        /// AAAA-MM-JJ
        #[arg(long)]
        date: String,
        /// Marquer la date travaillée (par défaut : chômée)
        #[arg(long)]
        work_day: bool,
    },

    /// Enregistrer le souhait d'un agent pour une date
    SetPreference {
        #[arg(long)]
        date: String,
        /// handle de l'agent
        #[arg(long)]
        worker: String,
        /// rest | work | all-day
        #[arg(long)]
        kind: Option<String>,
        #[arg(long, default_value = "")]
        comment: String,
        /// Retirer le souhait existant
        #[arg(long)]
        clear: bool,
    },

    /// Acter (ou retirer) une affectation manuelle
    SetAssignment {
        #[arg(long)]
        date: String,
        #[arg(long)]
        worker: String,
        /// work | all-day
        #[arg(long)]
        kind: Option<String>,
        #[arg(long, default_value = "")]
        comment: String,
        #[arg(long)]
        clear: bool,
    },

    /// Répartir le reste du mois (gardes puis vacations)
    Distribute {
        /// Premier jour de la fenêtre (AAAA-MM-JJ, défaut : aujourd'hui)
        #[arg(long)]
        date: Option<String>,
        /// Graine du tirage, pour une exécution rejouable
        #[arg(long)]
        seed: Option<u64>,
        /// Acter le résultat dans le jeu de données
        #[arg(long)]
        commit: bool,
    },

    /// Afficher les affectations d'un mois
    Show {
        /// Un jour quelconque du mois (défaut : aujourd'hui)
        #[arg(long)]
        month: Option<String>,
    },

    /// Exporter le jeu de données et/ou le plan du mois
    Export {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        month: Option<String>,
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

    let storage = JsonStorage::open(&cli.data)?;
    let mut data = storage.load_or_default()?;

    match cli.cmd {
        Commands::ImportWorkers { csv } => {
            let workers = io::import_workers_csv(csv)?;
            data.workers.extend(workers);
            storage.save(&data)?;
        }
        Commands::SetHoliday { date, work_day } => {
            data.set_override(parse_date(&date)?, work_day);
            storage.save(&data)?;
        }
        Commands::SetPreference {
            date,
            worker,
            kind,
            comment,
            clear,
        } => {
            let date = parse_date(&date)?;
            let worker = worker_id(&data, &worker)?;
            let kind = preference_kind(kind.as_deref(), clear)?;
            data.set_preference(date, worker, kind, &comment)?;
            storage.save(&data)?;
        }
        Commands::SetAssignment {
            date,
            worker,
            kind,
            comment,
            clear,
        } => {
            let date = parse_date(&date)?;
            let worker = worker_id(&data, &worker)?;
            let kind = assignment_kind(kind.as_deref(), clear)?;
            data.set_assignment(date, worker, kind, &comment)?;
            storage.save(&data)?;
        }
        Commands::Distribute { date, seed, commit } => {
            let current = match date {
                Some(d) => parse_date(&d)?,
                None => Utc::now().date_naive(),
            };
            let mut dist = match seed {
                Some(seed) => Distribution::seeded(current, seed),
                None => Distribution::from_entropy(current),
            };
            dist.prepare(&data)?;
            dist.run()?;
            print_result(&data, &dist);
            if commit {
                data.commit(dist.result(), current)?;
                storage.save(&data)?;
            }
        }
        Commands::Show { month } => {
            let month = match month {
                Some(d) => parse_date(&d)?,
                None => Utc::now().date_naive(),
            };
            print_month(&data, month);
        }
        Commands::Export {
            out_json,
            out_csv,
            month,
        } => {
            if let Some(path) = out_json {
                io::export_data_json(path, &data)?;
            }
            if let Some(path) = out_csv {
                let month = match month {
                    Some(d) => parse_date(&d)?,
                    None => Utc::now().date_naive(),
                };
                io::export_month_csv(path, &data, month)?;
            }
        }
    }

    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    Ok(raw.parse::<NaiveDate>()?)
}

fn worker_id(data: &PlanningData, handle: &str) -> Result<WorkerId> {
    match data.find_worker_by_handle(handle) {
        Some(w) => Ok(w.id),
        None => bail!("unknown worker handle: {handle}"),
    }
}

fn preference_kind(raw: Option<&str>, clear: bool) -> Result<Option<PreferenceKind>> {
    match (raw, clear) {
        (None, true) => Ok(None),
        (Some("rest"), false) => Ok(Some(PreferenceKind::Rest)),
        (Some("work"), false) => Ok(Some(PreferenceKind::Work)),
        (Some("all-day" | "all_day"), false) => Ok(Some(PreferenceKind::AllDay)),
        (Some(other), false) => bail!("unknown preference kind: {other}"),
        _ => bail!("give either --kind or --clear"),
    }
}

fn assignment_kind(raw: Option<&str>, clear: bool) -> Result<Option<AssignmentKind>> {
    match (raw, clear) {
        (None, true) => Ok(None),
        (Some("work"), false) => Ok(Some(AssignmentKind::Work)),
        (Some("all-day" | "all_day"), false) => Ok(Some(AssignmentKind::AllDay)),
        (Some(other), false) => bail!("unknown assignment kind: {other}"),
        _ => bail!("give either --kind or --clear"),
    }
}

fn handle_of(data: &PlanningData, id: WorkerId) -> String {
    data.find_worker_by_id(id)
        .map(|w| w.handle.clone())
        .unwrap_or_else(|| id.to_string())
}

fn print_result(data: &PlanningData, dist: &Distribution) {
    let (from, to) = dist.window();
    let result = dist.result();
    for date in calendar::days(from, to) {
        use chrono::Datelike;
        let day = date.day();
        println!("{date}");
        if let Some(decision) = result.all_day.get(&day) {
            println!(
                "  all_day {} {}",
                handle_of(data, decision.worker),
                decision.reasons.join(",")
            );
        }
        for decision in result.work8h.get(&day).into_iter().flatten() {
            println!(
                "  work8h {} {}",
                handle_of(data, decision.worker),
                decision.reasons.join(",")
            );
        }
        if let Some(err) = result.errors.get(&day) {
            println!("  err {err}");
        }
    }
    if let Some(notice) = &result.notice {
        println!("notice: {notice}");
    }
}

fn print_month(data: &PlanningData, month: NaiveDate) {
    let from = calendar::month_start(month);
    let to = calendar::month_end(month);
    for date in calendar::days(from, to) {
        println!("{date}");
        for a in data.assignments.iter().filter(|a| a.date == date) {
            let kind = match a.kind {
                AssignmentKind::AllDay => "all_day",
                AssignmentKind::Work => "work8h",
            };
            println!("  {kind} {} {}", handle_of(data, a.worker), a.comment);
        }
    }
}
