use std::fmt;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use inquire::{InquireError, MultiSelect, Select, Text};

use crate::api::{GigService, HttpGigService};
use crate::board::{BoardError, Column, GigBoard, InterestOutcome};
use crate::config::ConfigStore;
use crate::filter::DateFilter;
use crate::models::{Gig, GigId, GigType, NewGig};
use crate::render;

#[derive(Parser)]
#[command(name = "gig-board", version, about = "Browse, filter and add gigs")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the gig table once.
    List(ListArgs),
    /// Add a new gig, prompting for anything not given.
    Add(AddArgs),
    /// Interactive session over the gig table.
    Browse,
    /// Show or set the remembered display name.
    Name { name: Option<String> },
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive text to look for in artist, type, venue and location.
    #[arg(short, long, default_value = "")]
    search: String,
    /// Date range: 0-5 or any, this-week, this-month, next-month, this-year, next-year.
    #[arg(short, long, default_value = "any")]
    when: DateFilter,
    /// Only Friday and Saturday gigs.
    #[arg(long)]
    weekends: bool,
    /// Columns to hide (day, date, artist, type, venue, location, added, interested).
    #[arg(long = "hide", value_name = "COLUMN")]
    hide: Vec<String>,
}

#[derive(Args, Default)]
struct AddArgs {
    /// Gig date, YYYY-MM-DD.
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    artist: Option<String>,
    /// One of Gig, Club, One-Day Festival, Full-On Festival. Repeatable.
    #[arg(long = "type", value_name = "TYPE")]
    types: Vec<String>,
    #[arg(long)]
    venue: Option<String>,
    #[arg(long)]
    location: Option<String>,
}

pub fn run(cli: Cli) -> Result<()> {
    let store = ConfigStore::load();
    let config = store.read()?;
    let today = config.today()?;
    let service = HttpGigService::from_config(&config)?;
    log::debug!(
        "settings {} base url {} today {today}",
        store.path().display(),
        config.effective_base_url()
    );

    match cli.command {
        Commands::List(args) => list(&service, args, today),
        Commands::Add(args) => {
            let mut board = GigBoard::new(config.user_name.clone());
            match prompt_new_gig(args)? {
                Some(new_gig) => {
                    let created = board.add_event(&service, &new_gig)?;
                    println!("Added gig {}", created.id);
                    println!("{}", render::detail(created));
                }
                None => println!("Cancelled."),
            }
            Ok(())
        }
        Commands::Browse => browse(&service, &store, config.user_name.clone(), today),
        Commands::Name { name: Some(name) } => {
            if name.trim().is_empty() {
                return Err(anyhow!("a name is required"));
            }
            store.remember_name(&name)?;
            println!("Remembered name: {}", name.trim());
            Ok(())
        }
        Commands::Name { name: None } => {
            match config.remembered_name() {
                Some(name) => println!("{name}"),
                None => println!("No name remembered yet."),
            }
            Ok(())
        }
    }
}

fn list(service: &dyn GigService, args: ListArgs, today: NaiveDate) -> Result<()> {
    let mut board = GigBoard::default();
    for key in &args.hide {
        let column = Column::from_key(key).ok_or_else(|| anyhow!("unknown column `{key}`"))?;
        board.columns.hide(column);
    }
    board.query.search = args.search;
    board.query.date_filter = args.when;
    board.query.weekends_only = args.weekends;

    board.load(service)?;
    let visible = board.visible(today);
    println!("{}", render::table(&visible, &board.columns));
    println!("{} of {} gigs", visible.len(), board.gigs().len());
    Ok(())
}

/// `Ok(None)` when the user backs out of a prompt.
fn prompt_new_gig(args: AddArgs) -> Result<Option<NewGig>> {
    let mut types = Vec::new();
    for label in &args.types {
        let kind = GigType::from_label(label).ok_or_else(|| anyhow!("unknown type `{label}`"))?;
        types.push(kind);
    }

    let outcome = (|| -> Result<NewGig, InquireError> {
        let date = match args.date {
            Some(date) => date,
            None => prompt_date()?,
        };
        let artist = match args.artist {
            Some(artist) => artist,
            None => Text::new("Artist").prompt()?,
        };
        if types.is_empty() {
            types = MultiSelect::new("Select Type", GigType::ALL.to_vec()).prompt()?;
        }
        let venue = match args.venue {
            Some(venue) => venue,
            None => Text::new("Venue").prompt()?,
        };
        let location = match args.location {
            Some(location) => location,
            None => Text::new("Location").prompt()?,
        };
        Ok(NewGig::new(date, &artist, &types, &venue, &location))
    })();

    cancellable(outcome)
}

fn prompt_date() -> Result<NaiveDate, InquireError> {
    loop {
        let raw = Text::new("Date")
            .with_placeholder("YYYY-MM-DD")
            .prompt()?;
        match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(date) => return Ok(date),
            Err(_) => println!("Please enter a date as YYYY-MM-DD."),
        }
    }
}

fn cancellable<T>(outcome: Result<T, InquireError>) -> Result<Option<T>> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(err) => Err(err).context("prompt failed"),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Search,
    DateRange,
    Weekends,
    Columns,
    Details,
    Interest,
    AddEvent,
    Quit,
}

impl Action {
    const ALL: [Action; 8] = [
        Action::Search,
        Action::DateRange,
        Action::Weekends,
        Action::Columns,
        Action::Details,
        Action::Interest,
        Action::AddEvent,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search",
            Action::DateRange => "Filter by date",
            Action::Weekends => "Toggle weekends only",
            Action::Columns => "Toggle columns",
            Action::Details => "Show gig details",
            Action::Interest => "I'm interested",
            Action::AddEvent => "Add event",
            Action::Quit => "Quit",
        })
    }
}

struct GigChoice {
    id: GigId,
    label: String,
}

impl GigChoice {
    fn of(gig: &Gig) -> Self {
        Self {
            id: gig.id.clone(),
            label: format!("{}: {} ({})", gig.id, gig.artist, gig.date),
        }
    }
}

impl fmt::Display for GigChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

struct ColumnChoice {
    column: Column,
    visible: bool,
}

impl fmt::Display for ColumnChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.visible { "x" } else { " " };
        write!(f, "[{mark}] {}", self.column.key())
    }
}

fn browse(
    service: &dyn GigService,
    store: &ConfigStore,
    user_name: Option<String>,
    today: NaiveDate,
) -> Result<()> {
    let mut board = GigBoard::new(user_name);
    if let Err(err) = board.load(service) {
        println!("{err}");
    }

    loop {
        print_board(&board, today);
        let action = match Select::new("What next?", Action::ALL.to_vec()).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled) => continue,
            Err(InquireError::OperationInterrupted) => return Ok(()),
            Err(err) => return Err(err).context("prompt failed"),
        };

        let step = match action {
            Action::Quit => return Ok(()),
            Action::Search => {
                let term = cancellable(
                    Text::new("Search")
                        .with_initial_value(&board.query.search)
                        .prompt(),
                )?;
                if let Some(term) = term {
                    board.query.search = term;
                }
                Ok(())
            }
            Action::DateRange => {
                if let Some(filter) =
                    cancellable(Select::new("Date range", DateFilter::ALL.to_vec()).prompt())?
                {
                    board.query.date_filter = filter;
                }
                Ok(())
            }
            Action::Weekends => {
                board.query.weekends_only = !board.query.weekends_only;
                Ok(())
            }
            Action::Columns => {
                let choices = Column::ALL
                    .into_iter()
                    .map(|column| ColumnChoice {
                        column,
                        visible: board.columns.is_visible(column),
                    })
                    .collect();
                if let Some(choice) = cancellable(Select::new("Toggle column", choices).prompt())? {
                    board.columns.toggle(choice.column);
                }
                Ok(())
            }
            Action::Details => match pick_gig(&board, today)? {
                Some(id) => board.select(&id).map(|gig| {
                    println!("\n{}\n", render::detail(gig));
                }),
                None => Ok(()),
            },
            Action::Interest => match pick_gig(&board, today)? {
                Some(id) => register_interest(&mut board, store, &id),
                None => Ok(()),
            },
            Action::AddEvent => match prompt_new_gig(AddArgs::default())? {
                Some(new_gig) => board.add_event(service, &new_gig).map(|created| {
                    println!("Added gig {}", created.id);
                }),
                None => Ok(()),
            },
        };

        board.close_detail();
        if let Err(err) = step {
            println!("{err}");
        }
    }
}

fn register_interest(
    board: &mut GigBoard,
    store: &ConfigStore,
    id: &GigId,
) -> Result<(), BoardError> {
    if board.request_interest(id)? == InterestOutcome::Added {
        return Ok(());
    }
    loop {
        let name = match Text::new("Enter Your Name").prompt() {
            Ok(name) => name,
            Err(err) => {
                log::debug!("name prompt closed: {err}");
                board.cancel_name_prompt();
                return Ok(());
            }
        };
        match board.submit_name(store, &name) {
            Err(BoardError::BlankName) => println!("Please enter a name."),
            other => return other.map(|_| ()),
        }
    }
}

fn pick_gig(board: &GigBoard, today: NaiveDate) -> Result<Option<GigId>> {
    let choices: Vec<GigChoice> = board.visible(today).into_iter().map(GigChoice::of).collect();
    if choices.is_empty() {
        println!("No gigs match the current filters.");
        return Ok(None);
    }
    Ok(cancellable(Select::new("Gig", choices).prompt())?.map(|choice| choice.id))
}

fn print_board(board: &GigBoard, today: NaiveDate) {
    let visible = board.visible(today);
    println!();
    println!("{}", render::table(&visible, &board.columns));
    let search = if board.query.search.is_empty() {
        String::new()
    } else {
        format!(", search \"{}\"", board.query.search)
    };
    let weekends = if board.query.weekends_only {
        ", weekends only"
    } else {
        ""
    };
    println!(
        "{} of {} gigs ({}{search}{weekends})",
        visible.len(),
        board.gigs().len(),
        board.query.date_filter
    );
}
