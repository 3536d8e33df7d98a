//! Command-line interface definitions.

use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::journal_core::{parse_date, Mood};
use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

/// A PIN-protected journal with one entry per day
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION, author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(
        long,
        value_name = "FORMAT",
        default_value = LOG_FORMAT_TEXT,
        value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON],
        global = true
    )]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set, check or reset the PIN
    #[command(subcommand)]
    Pin(PinCommand),

    /// Write today's entry
    Add(AddArgs),

    /// Change an existing entry
    Edit(EditArgs),

    /// Delete an entry
    Delete {
        /// Entry id
        id: i64,
    },

    /// Show one entry
    Show(ShowArgs),

    /// List entries, newest first
    List(ListArgs),

    /// Export entries to a PDF file
    Export(ExportArgs),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum PinCommand {
    /// Create the PIN (fails if one already exists)
    Set,
    /// Check a PIN without doing anything else
    Check,
    /// Remove the PIN after confirming the current one
    Reset,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Entry title
    #[arg(short, long)]
    pub title: String,

    /// Primary mood
    #[arg(short, long, value_parser = parse_mood)]
    pub mood: Mood,

    /// Secondary mood (up to two)
    #[arg(long = "secondary", value_name = "MOOD", value_parser = parse_mood)]
    pub secondary: Vec<Mood>,

    /// Category (defaults to General)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Tag; repeat for several
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Entry text; read from stdin when omitted
    #[arg(long)]
    pub content: Option<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Entry id
    pub id: i64,

    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(long)]
    pub content: Option<String>,

    #[arg(short, long, value_parser = parse_mood)]
    pub mood: Option<Mood>,

    /// Replace the secondary moods (up to two)
    #[arg(long = "secondary", value_name = "MOOD", value_parser = parse_mood)]
    pub secondary: Vec<Mood>,

    /// Remove both secondary moods
    #[arg(long, conflicts_with = "secondary")]
    pub clear_secondary: bool,

    #[arg(short, long)]
    pub category: Option<String>,

    /// Replace the tags; repeat for several
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["id", "date", "today"])))]
pub struct ShowArgs {
    /// Entry id
    pub id: Option<i64>,

    /// Entry date (YYYY-MM-DD or YYYYMMDD)
    #[arg(short, long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    /// Today's entry
    #[arg(long)]
    pub today: bool,
}

/// Entry selection shared by `list` and `export`. At most one filter applies.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
#[command(group(ArgGroup::new("filter").args(["search", "mood", "tag", "from"])))]
pub struct FilterArgs {
    /// Case-insensitive text in the title or content
    #[arg(long)]
    pub search: Option<String>,

    /// Primary mood
    #[arg(long, value_parser = parse_mood)]
    pub mood: Option<Mood>,

    /// Text anywhere in the tags
    #[arg(long)]
    pub tag: Option<String>,

    /// First date of a range (inclusive)
    #[arg(long, value_parser = parse_date_arg, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last date of a range (inclusive)
    #[arg(long, value_parser = parse_date_arg, requires = "from")]
    pub to: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Print JSON instead of one line per entry
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output PDF file
    pub output: PathBuf,

    /// Export just this entry
    #[arg(long, conflicts_with = "filter")]
    pub id: Option<i64>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

fn parse_mood(value: &str) -> Result<Mood, String> {
    value.parse::<Mood>().map_err(|e| e.to_string())
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["daybook", "list"]);
        assert!(!args.verbose);
        assert_eq!(args.log_format, "text");

        let args = CliArgs::parse_from(["daybook", "-v", "--log-format", "json", "list"]);
        assert!(args.verbose);
        assert_eq!(args.log_format, "json");

        // Global flags are accepted after the subcommand too
        let args = CliArgs::parse_from(["daybook", "list", "--verbose"]);
        assert!(args.verbose);

        assert!(CliArgs::try_parse_from(["daybook", "--log-format", "xml", "list"]).is_err());
    }

    #[test]
    fn test_pin_subcommands() {
        for (word, expected) in [
            ("set", PinCommand::Set),
            ("check", PinCommand::Check),
            ("reset", PinCommand::Reset),
        ] {
            let args = CliArgs::parse_from(["daybook", "pin", word]);
            match args.command {
                Commands::Pin(command) => assert_eq!(command, expected),
                other => panic!("Expected pin command, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_add_args() {
        let args = CliArgs::parse_from([
            "daybook",
            "add",
            "--title",
            "Monday",
            "--mood",
            "happy",
            "--secondary",
            "Relaxed",
            "--secondary",
            "confident",
            "--tag",
            "work",
            "--tag",
            "gym",
            "--content",
            "Long day",
        ]);
        let Commands::Add(add) = args.command else {
            panic!("Expected add command");
        };
        assert_eq!(add.title, "Monday");
        assert_eq!(add.mood, Mood::Happy);
        assert_eq!(add.secondary, vec![Mood::Relaxed, Mood::Confident]);
        assert_eq!(add.tags, vec!["work", "gym"]);
        assert_eq!(add.category, None);
        assert_eq!(add.content.as_deref(), Some("Long day"));
    }

    #[test]
    fn test_add_rejects_unknown_mood() {
        let result = CliArgs::try_parse_from([
            "daybook", "add", "--title", "x", "--mood", "elated",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_edit_clear_secondary_conflicts() {
        let result = CliArgs::try_parse_from([
            "daybook",
            "edit",
            "3",
            "--secondary",
            "sad",
            "--clear-secondary",
        ]);
        assert!(result.is_err());

        let args = CliArgs::parse_from(["daybook", "edit", "3", "--clear-secondary"]);
        let Commands::Edit(edit) = args.command else {
            panic!("Expected edit command");
        };
        assert_eq!(edit.id, 3);
        assert!(edit.clear_secondary);
        assert!(edit.title.is_none());
    }

    #[test]
    fn test_show_requires_exactly_one_target() {
        assert!(CliArgs::try_parse_from(["daybook", "show"]).is_err());
        assert!(CliArgs::try_parse_from(["daybook", "show", "4", "--today"]).is_err());

        let args = CliArgs::parse_from(["daybook", "show", "--date", "20240115"]);
        let Commands::Show(show) = args.command else {
            panic!("Expected show command");
        };
        assert_eq!(show.date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert!(CliArgs::try_parse_from(["daybook", "show", "--date", "yesterday"]).is_err());
    }

    #[test]
    fn test_list_filters_are_exclusive() {
        assert!(
            CliArgs::try_parse_from(["daybook", "list", "--search", "a", "--tag", "b"]).is_err()
        );
        assert!(CliArgs::try_parse_from(["daybook", "list", "--from", "2024-01-01"]).is_err());

        let args = CliArgs::parse_from([
            "daybook",
            "list",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
            "--json",
        ]);
        let Commands::List(list) = args.command else {
            panic!("Expected list command");
        };
        assert!(list.json);
        assert_eq!(list.filter.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(list.filter.to, NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn test_export_id_conflicts_with_filters() {
        assert!(CliArgs::try_parse_from([
            "daybook", "export", "out.pdf", "--id", "1", "--mood", "sad"
        ])
        .is_err());

        let args = CliArgs::parse_from(["daybook", "export", "out.pdf", "--mood", "sad"]);
        let Commands::Export(export) = args.command else {
            panic!("Expected export command");
        };
        assert_eq!(export.output, PathBuf::from("out.pdf"));
        assert_eq!(export.filter.mood, Some(Mood::Sad));
        assert!(export.id.is_none());
    }
}
