//! Command-line driver for the cost calculator core.
//!
//! # Responsibility
//! - Run one roster/ledger action against a snapshot database and link.
//! - Print the resulting table, totals and share link.
//!
//! # Invariants
//! - Every action goes through `SyncController` entry points; the CLI never
//!   writes storage or the link directly.

use clap::{Args, Parser, Subcommand};
use costcalc_core::{
    init_from_config, CoreConfig, DurableStore, ExpenseDraft, MemoryDurableStore, ShareLink,
    SqliteDurableStore, SyncController, UrlShareLink,
};
use log::info;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "costcalc", version, about = "Track shared expenses per person")]
struct Cli {
    /// SQLite snapshot file (defaults to COSTCALC_DB_PATH, else in-memory).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Share link to load from and rewrite (defaults to COSTCALC_SHARE_URL).
    #[arg(long, global = true)]
    link: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print people, expenses, totals and the share link.
    Show,
    /// Add one person to the roster.
    AddPerson { name: String },
    /// Add an expense.
    AddExpense(ExpenseArgs),
    /// Replace the expense at a zero-based index.
    EditExpense {
        index: usize,
        #[command(flatten)]
        expense: ExpenseArgs,
    },
    /// Erase roster, ledger, stored snapshots and link parameters.
    Clear,
}

#[derive(Debug, Args)]
struct ExpenseArgs {
    name: String,
    /// Per-person amount as `NAME=VALUE`; repeatable.
    #[arg(long = "amount", value_parser = parse_amount)]
    amounts: Vec<(String, f64)>,
    /// Total to divide equally among `--among` people.
    #[arg(long, requires = "among")]
    split: Option<f64>,
    /// Person included in the equal split; repeatable.
    #[arg(long)]
    among: Vec<String>,
}

fn parse_amount(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid amount `{value}`: {err}"))?;
    Ok((name.to_string(), value))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = CoreConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }
    if let Some(link) = cli.link {
        config.share_base_url = link;
    }
    init_from_config(&config)?;

    let link = UrlShareLink::parse(&config.share_base_url)?;
    match config.db_path.as_deref() {
        Some(path) => execute(SqliteDurableStore::open(path)?, link, &cli.command),
        None => {
            let store = config
                .storage_quota_bytes
                .map_or_else(MemoryDurableStore::new, MemoryDurableStore::with_quota);
            execute(store, link, &cli.command)
        }
    }
}

fn execute<D: DurableStore>(
    durable: D,
    link: UrlShareLink,
    command: &Command,
) -> Result<(), Box<dyn Error>> {
    let mut controller = SyncController::new(durable, link);
    controller.bootstrap();

    match command {
        Command::Show => {}
        Command::AddPerson { name } => controller.add_person(name)?,
        Command::AddExpense(args) => save_expense(&mut controller, args, None)?,
        Command::EditExpense { index, expense } => {
            save_expense(&mut controller, expense, Some(*index))?
        }
        Command::Clear => controller.clear_data(),
    }
    info!("event=cli_command module=cli status=ok");

    print_table(&controller);
    Ok(())
}

fn save_expense<D: DurableStore, L: ShareLink>(
    controller: &mut SyncController<D, L>,
    args: &ExpenseArgs,
    editing: Option<usize>,
) -> Result<(), Box<dyn Error>> {
    let mut draft = match editing {
        Some(index) => controller
            .draft_for_edit(index)
            .ok_or_else(|| format!("no expense at index {index}"))?,
        None => ExpenseDraft::default(),
    };
    draft.name = args.name.clone();

    if let Some(total) = args.split {
        if let Some(shares) = split_among(controller, total, &args.among)? {
            draft.amounts = shares;
        }
    }
    for (name, value) in &args.amounts {
        draft.amounts.insert(name.clone(), *value);
    }

    Ok(controller.save_draft(&draft, editing)?)
}

/// Equal shares of `total` over exactly the `among` people.
///
/// Selection flags are cleared before selecting and again afterwards,
/// including when a name is not in the roster.
fn split_among<D: DurableStore, L: ShareLink>(
    controller: &mut SyncController<D, L>,
    total: f64,
    among: &[String],
) -> Result<Option<BTreeMap<String, f64>>, Box<dyn Error>> {
    controller.reset_all_checked();
    let result = select_all(controller, among).map(|()| controller.split_selected(total));
    controller.reset_all_checked();
    result
}

fn select_all<D: DurableStore, L: ShareLink>(
    controller: &mut SyncController<D, L>,
    among: &[String],
) -> Result<(), Box<dyn Error>> {
    for name in among {
        if !controller.set_checked(name, true) {
            return Err(format!("`{name}` is not in the roster").into());
        }
    }
    Ok(())
}

fn print_table(controller: &SyncController<impl DurableStore, UrlShareLink>) {
    let people = controller.people();

    let mut header = String::from("expense");
    for person in people {
        header.push('\t');
        header.push_str(&person.name);
    }
    println!("{header}");

    for (index, expense) in controller.expenses().iter().enumerate() {
        let mut row = format!("{index}:{}", expense.name);
        for person in people {
            row.push_str(&format!("\t{}", expense.amount_for(&person.name)));
        }
        println!("{row}");
    }

    let mut totals = String::from("total");
    for (_, total) in controller.column_totals() {
        totals.push_str(&format!("\t{total}"));
    }
    println!("{totals}");

    if let Some(url) = controller.link().share_url() {
        println!("share: {url}");
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_amount, save_expense, Cli, ExpenseArgs};
    use clap::CommandFactory;
    use costcalc_core::persist::snapshot::decode_roster;
    use costcalc_core::{MemoryDurableStore, ShareLink, SyncController, UrlShareLink, PEOPLE_KEY};

    type TestController = SyncController<MemoryDurableStore, UrlShareLink>;

    fn controller_with(people: &str) -> TestController {
        let mut link = UrlShareLink::parse("http://localhost/").unwrap();
        link.write_param(PEOPLE_KEY, people).unwrap();
        let mut controller = SyncController::new(MemoryDurableStore::new(), link);
        controller.bootstrap();
        controller
    }

    fn split_args(name: &str, total: f64, among: &[&str]) -> ExpenseArgs {
        ExpenseArgs {
            name: name.to_string(),
            amounts: Vec::new(),
            split: Some(total),
            among: among.iter().map(|name| name.to_string()).collect(),
        }
    }

    fn stored_checked(controller: &TestController) -> Vec<String> {
        let raw = controller.durable().get(PEOPLE_KEY).unwrap();
        decode_roster(raw)
            .unwrap()
            .into_iter()
            .filter(|person| person.checked)
            .map(|person| person.name)
            .collect()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_amount_splits_name_and_value() {
        assert_eq!(parse_amount("A=12.5").unwrap(), ("A".to_string(), 12.5));
        assert!(parse_amount("A").is_err());
        assert!(parse_amount("A=ten").is_err());
    }

    #[test]
    fn failed_split_leaves_no_selection_behind() {
        let mut controller =
            controller_with(r#"[{"name":"A","checked":false},{"name":"B","checked":false}]"#);

        let failed = split_args("Lunch", 10.0, &["A", "Nobody"]);
        assert!(save_expense(&mut controller, &failed, None).is_err());
        assert!(controller.roster().selected().is_empty());
        assert!(controller.expenses().is_empty());
        assert!(stored_checked(&controller).is_empty());

        save_expense(&mut controller, &split_args("Lunch", 10.0, &["B"]), None).unwrap();
        let saved = &controller.expenses()[0];
        assert_eq!(saved.amount_for("B"), 10.0);
        assert_eq!(saved.amount_for("A"), 0.0);
    }

    #[test]
    fn split_ignores_selection_loaded_from_snapshot() {
        let mut controller =
            controller_with(r#"[{"name":"A","checked":true},{"name":"B","checked":false}]"#);

        save_expense(&mut controller, &split_args("Taxi", 10.0, &["B"]), None).unwrap();

        let saved = &controller.expenses()[0];
        assert_eq!(saved.amount_for("B"), 10.0);
        assert_eq!(saved.amount_for("A"), 0.0);
        assert!(controller.roster().selected().is_empty());
        assert!(stored_checked(&controller).is_empty());
    }

    #[test]
    fn explicit_amount_overrides_split_share() {
        let mut controller =
            controller_with(r#"[{"name":"A","checked":false},{"name":"B","checked":false}]"#);
        let mut args = split_args("Dinner", 30.0, &["A", "B"]);
        args.amounts.push(("A".to_string(), 5.0));

        save_expense(&mut controller, &args, None).unwrap();

        let saved = &controller.expenses()[0];
        assert_eq!(saved.amount_for("A"), 5.0);
        assert_eq!(saved.amount_for("B"), 15.0);
    }
}
