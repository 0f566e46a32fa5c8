//! Command-line arguments.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use quire_core::{DocumentKind, Language, LibraryFilter, SlideField, SortOrder, Theme};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(about = "Documents, spreadsheets and presentations from the terminal")]
#[command(version)]
pub struct Cli {
    /// Config file (default: the user config dir's config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Documents file, overriding `[store] path`
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a cell value the way a spreadsheet shows it
    #[command(after_help = "\
Examples:
  quire eval '=1+2*3'
  quire eval '=SUM(A1:B2)' --doc <ID>
  quire eval 'plain text'")]
    Eval {
        /// Cell input; formulas start with '='
        formula: String,

        /// Spreadsheet whose grid references resolve against
        #[arg(long, value_name = "ID")]
        doc: Option<String>,
    },

    #[command(flatten)]
    Store(StoreCommand),
}

/// Commands that open the document store.
#[derive(Subcommand, Debug)]
pub enum StoreCommand {
    /// Create a document
    New {
        /// document, spreadsheet or presentation
        kind: DocumentKind,

        #[arg(long, default_value = "")]
        title: String,
    },

    /// Create a spreadsheet from a CSV file
    Import {
        file: PathBuf,

        /// Title (default: the file name without extension)
        #[arg(long)]
        title: Option<String>,
    },

    /// List your documents
    List {
        /// Case-insensitive title search
        #[arg(long, default_value = "")]
        search: String,

        /// all, favorites, documents, spreadsheets or presentations
        #[arg(long, default_value = "all")]
        filter: LibraryFilter,

        /// -last_modified, last_modified or title
        #[arg(long, default_value = "-last_modified", allow_hyphen_values = true)]
        sort: SortOrder,
    },

    /// Print a document; spreadsheets are shown evaluated
    Show {
        id: String,

        #[arg(long, short = 'f', value_enum, default_value_t = ShowFormat::Table)]
        format: ShowFormat,

        /// Write to a file instead of stdout
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Set one spreadsheet cell (A1 notation)
    SetCell {
        id: String,
        cell: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Append an empty row to a spreadsheet
    AddRow { id: String },

    /// Append an empty column to a spreadsheet
    AddColumn { id: String },

    /// Replace the HTML body of a rich-text document
    Write { id: String, html: String },

    /// Append a blank slide
    AddSlide { id: String },

    /// Edit one field of a slide (slides are numbered from 1)
    SetSlide {
        id: String,
        index: usize,
        field: SlideField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Delete a slide (the last slide is kept)
    DeleteSlide { id: String, index: usize },

    Rename { id: String, title: String },

    /// Toggle a document's favorite flag
    Favorite { id: String },

    Delete { id: String },

    /// Show or change account settings
    Settings {
        #[arg(long)]
        name: Option<String>,

        /// de, en, fr, es or it
        #[arg(long)]
        language: Option<Language>,

        /// light or dark
        #[arg(long)]
        theme: Option<Theme>,
    },

    /// Sign in as the configured user
    Login,

    Logout,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    #[default]
    Table,
    Csv,
    Markdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["quire", "list", "--store", "d.json", "-vv"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("d.json")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Store(StoreCommand::List {
                filter: LibraryFilter::All,
                sort: SortOrder::LastModifiedDesc,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_typed_values() {
        let cli = Cli::try_parse_from(["quire", "new", "Spreadsheet", "--title", "B"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Store(StoreCommand::New {
                kind: DocumentKind::Spreadsheet,
                ..
            })
        ));

        let cli = Cli::try_parse_from(["quire", "set-slide", "x", "2", "background", "#000"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Store(StoreCommand::SetSlide {
                index: 2,
                field: SlideField::Background,
                ..
            })
        ));

        assert!(Cli::try_parse_from(["quire", "new", "slides"]).is_err());
        assert!(Cli::try_parse_from(["quire", "settings", "--theme", "sepia"]).is_err());
    }

    #[test]
    fn test_eval_is_separate_from_store_commands() {
        let cli = Cli::try_parse_from(["quire", "eval", "=1+1"]).unwrap();
        assert!(matches!(cli.command, Command::Eval { doc: None, .. }));
        let cli = Cli::try_parse_from(["quire", "logout"]).unwrap();
        assert!(matches!(cli.command, Command::Store(StoreCommand::Logout)));
    }

    #[test]
    fn test_negative_cell_value() {
        let cli = Cli::try_parse_from(["quire", "set-cell", "x", "A1", "-5"]).unwrap();
        match cli.command {
            Command::Store(StoreCommand::SetCell { value, .. }) => assert_eq!(value, "-5"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
