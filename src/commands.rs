//! Command dispatch: each subcommand opens what it needs, does one thing and
//! prints the result on stdout.

use anyhow::{Context, Result, bail};
use quire_core::storage::{
    parse_csv, write_csv, write_csv_content, write_markdown, write_markdown_content,
};
use quire_core::{
    AuthClient, CellRef, Document, DocumentKind, DocumentPatch, DocumentQuery, DocumentStore,
    EditorContent, EditorSession, FileAuth, JsonFileStore, LibraryFilter, NewDocument,
    PresentationContent, RichText, SettingsPatch, SortOrder, SpreadsheetContent, UserProfile,
    filter_documents, toggle_favorite,
};
use quire_engine::{Row, evaluate};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use crate::cli::{Cli, Command, ShowFormat, StoreCommand};
use crate::config::Config;

/// Open store and account for commands that touch saved documents.
struct Workspace {
    config: Config,
    store: JsonFileStore,
    auth: FileAuth,
}

impl Workspace {
    fn open(config: Config, store_override: Option<PathBuf>) -> Result<Self> {
        let store_path = store_override.unwrap_or_else(|| config.store_path());
        let store = JsonFileStore::open(&store_path)
            .with_context(|| format!("Failed to open store {}", store_path.display()))?;
        let profile_path = config.profile_path(&store_path);
        let auth = FileAuth::open(&profile_path, config.seed_profile())
            .with_context(|| format!("Failed to open profile {}", profile_path.display()))?;
        Ok(Workspace {
            config,
            store,
            auth,
        })
    }

    fn me(&self) -> Result<UserProfile> {
        self.auth
            .me()
            .context("Run `quire login` to sign in again")
    }

    /// Open `id` in a `C` editor, apply `f`, and save immediately.
    fn edit<C, R>(&self, id: &str, f: impl FnOnce(&mut C) -> quire_core::Result<R>) -> Result<R>
    where
        C: EditorContent,
    {
        let doc = self.store.get(id)?;
        let mut session = EditorSession::<C>::open(&doc, self.config.autosave_delay())?;
        let out = session.edit(Instant::now(), f)?;
        session.flush(&self.store)?;
        Ok(out)
    }
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Eval { formula, doc } => match doc {
            Some(id) => {
                let ws = Workspace::open(config, cli.store)?;
                let sheet = ws.store.get(&id)?.spreadsheet()?;
                Ok(print_evaluated(&formula, &sheet))
            }
            // Formulas without a document never touch the store.
            None => Ok(print_evaluated(&formula, &Vec::<Row>::new())),
        },
        Command::Store(command) => {
            let ws = Workspace::open(config, cli.store)?;
            ws.run(command)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

impl Workspace {
    fn run(&self, command: StoreCommand) -> Result<()> {
        match command {
            StoreCommand::New { kind, title } => {
                let me = self.me()?;
                let new = NewDocument::new(kind, &title, &me.email, &self.config.spreadsheet)?;
                let doc = self.store.create(new)?;
                println!("{}", doc.id);
            }
            StoreCommand::Import { file, title } => {
                let me = self.me()?;
                let doc = import_csv(self, &me, &file, title.as_deref())?;
                println!("{}", doc.id);
            }
            StoreCommand::List {
                search,
                filter,
                sort,
            } => {
                let me = self.me()?;
                for doc in list(&self.store, &me, &search, filter, sort)? {
                    println!("{}", list_line(&doc));
                }
            }
            StoreCommand::Show { id, format, output } => {
                let doc = self.store.get(&id)?;
                show(&doc, format, output.as_deref())?;
            }
            StoreCommand::SetCell { id, cell, value } => {
                self.edit(&id, |sheet: &mut SpreadsheetContent| {
                    sheet.update_cell_a1(&cell, &value)
                })?;
                let sheet = self.store.get(&id)?.spreadsheet()?;
                if let Some(cell_ref) = CellRef::from_str(&cell) {
                    println!("{} = {}", cell_ref, sheet.display(cell_ref.row, cell_ref.col));
                }
            }
            StoreCommand::AddRow { id } => {
                let rows = self.edit(&id, |sheet: &mut SpreadsheetContent| {
                    sheet.add_row();
                    Ok(sheet.row_count())
                })?;
                println!("{} rows", rows);
            }
            StoreCommand::AddColumn { id } => {
                let columns = self.edit(&id, |sheet: &mut SpreadsheetContent| {
                    sheet.add_column();
                    Ok(sheet.column_count())
                })?;
                println!("{} columns", columns);
            }
            StoreCommand::Write { id, html } => {
                let words = self.edit(&id, |text: &mut RichText| {
                    text.set_html(&html);
                    Ok(text.word_count())
                })?;
                println!("{} words", words);
            }
            StoreCommand::AddSlide { id } => {
                let index = self.edit(&id, |deck: &mut PresentationContent| Ok(deck.add_slide()))?;
                println!("slide {}", index + 1);
            }
            StoreCommand::SetSlide {
                id,
                index,
                field,
                value,
            } => {
                let index = slide_index(index)?;
                self.edit(&id, |deck: &mut PresentationContent| {
                    deck.update_slide(index, field, &value)
                })?;
            }
            StoreCommand::DeleteSlide { id, index } => {
                let index = slide_index(index)?;
                let removed = self.edit(&id, |deck: &mut PresentationContent| {
                    deck.delete_slide(index)
                })?;
                if !removed {
                    eprintln!("Kept slide {}: a presentation needs at least one slide", index + 1);
                }
            }
            StoreCommand::Rename { id, title } => {
                let doc = self.store.update(&id, DocumentPatch::rename(&title))?;
                println!("{}", doc.title);
            }
            StoreCommand::Favorite { id } => {
                let doc = toggle_favorite(&self.store, &id)?;
                println!("{}", if doc.is_favorite { "favorite" } else { "not favorite" });
            }
            StoreCommand::Delete { id } => {
                self.store.delete(&id)?;
            }
            StoreCommand::Settings {
                name,
                language,
                theme,
            } => {
                let patch = SettingsPatch {
                    full_name: name,
                    preferred_language: language,
                    theme,
                };
                let user = if patch.is_empty() {
                    self.me()?
                } else {
                    self.auth.update_me(patch)?
                };
                print_profile(&user);
            }
            StoreCommand::Login => {
                let user = self.auth.login()?;
                println!("Signed in as {}", user.email);
            }
            StoreCommand::Logout => {
                self.auth.logout()?;
                println!("Signed out");
            }
        }
        Ok(())
    }
}

fn print_evaluated<G: quire_engine::CellSource + ?Sized>(formula: &str, grid: &G) -> ExitCode {
    let value = evaluate(formula, grid);
    println!("{}", value);
    if value.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// CLI slide numbers start at 1.
fn slide_index(number: usize) -> Result<usize> {
    match number.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("Slides are numbered from 1"),
    }
}

fn import_csv(
    ws: &Workspace,
    me: &UserProfile,
    file: &Path,
    title: Option<&str>,
) -> Result<Document> {
    let rows = parse_csv(file).with_context(|| format!("Failed to import {}", file.display()))?;
    let sheet = SpreadsheetContent::from_rows(rows, ws.config.spreadsheet.column_width);
    let title = title
        .map(str::to_string)
        .or_else(|| file.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default();
    let mut new = NewDocument::new(
        DocumentKind::Spreadsheet,
        &title,
        &me.email,
        &ws.config.spreadsheet,
    )?;
    new.content = sheet.to_content()?;
    Ok(ws.store.create(new)?)
}

fn list(
    store: &dyn DocumentStore,
    me: &UserProfile,
    search: &str,
    filter: LibraryFilter,
    sort: SortOrder,
) -> Result<Vec<Document>> {
    let query = DocumentQuery {
        sort,
        ..DocumentQuery::created_by(&me.email)
    };
    let docs = store.filter(&query)?;
    Ok(filter_documents(&docs, search, filter)
        .into_iter()
        .cloned()
        .collect())
}

fn list_line(doc: &Document) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        doc.id,
        doc.kind,
        if doc.is_favorite { "*" } else { "-" },
        doc.last_modified.format("%Y-%m-%d %H:%M"),
        doc.title
    )
}

fn show(doc: &Document, format: ShowFormat, output: Option<&Path>) -> Result<()> {
    if doc.kind != DocumentKind::Spreadsheet && format != ShowFormat::Table {
        bail!("Only spreadsheets can be exported; show {} as a table", doc.kind);
    }

    match (doc.kind, format, output) {
        (DocumentKind::Spreadsheet, ShowFormat::Csv, Some(path)) => {
            write_csv(path, &doc.spreadsheet()?)?;
        }
        (DocumentKind::Spreadsheet, ShowFormat::Markdown, Some(path)) => {
            write_markdown(path, &doc.title, &doc.spreadsheet()?)?;
        }
        _ => {
            let text = match (doc.kind, format) {
                (DocumentKind::Spreadsheet, ShowFormat::Csv) => {
                    write_csv_content(&doc.spreadsheet()?)
                }
                (DocumentKind::Spreadsheet, ShowFormat::Markdown) => {
                    write_markdown_content(&doc.title, &doc.spreadsheet()?)
                }
                (DocumentKind::Spreadsheet, _) => render_table(&doc.spreadsheet()?),
                (DocumentKind::Document, _) => doc.rich_text()?.plain_text() + "\n",
                (DocumentKind::Presentation, _) => render_slides(&doc.presentation()?),
            };
            match output {
                Some(path) => std::fs::write(path, text)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{}", text),
            }
        }
    }
    Ok(())
}

/// Evaluated grid with column letters and row numbers, columns padded to
/// their widest value.
fn render_table(sheet: &SpreadsheetContent) -> String {
    let rows = sheet.evaluated_rows();
    let columns = sheet.column_count();
    let label_width = rows.len().to_string().len();

    let mut widths: Vec<usize> = (0..columns)
        .map(|c| CellRef::col_to_letters(c).chars().count())
        .collect();
    for row in &rows {
        for (c, value) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(c) {
                *w = (*w).max(value.chars().count());
            }
        }
    }

    let mut out = String::new();
    let mut push_line = |label: &str, cells: Vec<&str>| {
        let mut line = format!("{:>label_width$}", label);
        for (c, &width) in widths.iter().enumerate() {
            let value = cells.get(c).copied().unwrap_or("");
            line.push_str(&format!(" | {:<width$}", value));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    };

    let letters: Vec<String> = (0..columns).map(CellRef::col_to_letters).collect();
    push_line("", letters.iter().map(String::as_str).collect());
    for (r, row) in rows.iter().enumerate() {
        push_line(&(r + 1).to_string(), row.iter().map(String::as_str).collect());
    }
    out
}

fn render_slides(deck: &PresentationContent) -> String {
    let mut out = String::new();
    for (i, slide) in deck.slides.iter().enumerate() {
        let title = if slide.title.is_empty() {
            "(untitled)"
        } else {
            &slide.title
        };
        out.push_str(&format!("{}. {} [{}]\n", i + 1, title, slide.background));
        for line in slide.content.lines() {
            out.push_str(&format!("   {}\n", line));
        }
    }
    out
}

fn print_profile(user: &UserProfile) {
    println!("email: {}", user.email);
    println!("name: {}", user.full_name);
    println!(
        "language: {}",
        user.preferred_language
            .map(|l| format!("{} ({})", l.code(), l.native_name()))
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "theme: {}",
        user.theme.map(|t| t.as_str()).unwrap_or("-")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_evaluates_and_pads() {
        let sheet = SpreadsheetContent::from_rows(
            vec![
                vec!["2".into(), "3".into(), "=A1+B1".into()],
                vec!["label".into(), "=1/0".into(), "".into()],
            ],
            100.0,
        );
        assert_eq!(
            render_table(&sheet),
            "  | A     | B      | C\n1 | 2     | 3      | 5\n2 | label | #ERROR |\n"
        );
    }

    #[test]
    fn test_render_slides() {
        let mut deck = PresentationContent::default();
        deck.update_slide(0, quire_core::SlideField::Title, "Intro").unwrap();
        deck.update_slide(0, quire_core::SlideField::Content, "one\ntwo").unwrap();
        deck.add_slide();
        assert_eq!(
            render_slides(&deck),
            "1. Intro [#ffffff]\n   one\n   two\n2. (untitled) [#ffffff]\n"
        );
    }

    #[test]
    fn test_slide_index_is_one_based() {
        assert_eq!(slide_index(1).unwrap(), 0);
        assert!(slide_index(0).is_err());
    }

    #[test]
    fn test_list_scoped_to_user() {
        let store = quire_core::MemoryStore::new();
        let defaults = quire_core::SpreadsheetDefaults::default();
        for (kind, title, owner) in [
            (DocumentKind::Spreadsheet, "Budget", "me@x"),
            (DocumentKind::Document, "Budget notes", "me@x"),
            (DocumentKind::Spreadsheet, "Budget", "other@x"),
        ] {
            store
                .create(NewDocument::new(kind, title, owner, &defaults).unwrap())
                .unwrap();
        }
        let me = UserProfile::new("me@x", "");
        let docs = list(&store, &me, "budget", LibraryFilter::All, SortOrder::TitleAsc).unwrap();
        let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Budget", "Budget notes"]);

        let sheets = list(&store, &me, "", LibraryFilter::Spreadsheets, SortOrder::default()).unwrap();
        assert_eq!(sheets.len(), 1);
    }
}
