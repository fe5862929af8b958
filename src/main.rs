//! folio: a terminal reader for a book of papers, sections and paragraphs.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use folio::app_state::{AppState, View};
use folio::catalog::PaperNumber;
use folio::clipboard::SystemClipboard;
use folio::config::Config;
use folio::diagnostic::TracingSink;
use folio::error::{ExitCode, ReaderError};
use folio::logging::{init_logging, LogTarget};
use folio::parser::parse_document;
use folio::reference::Reference;
use folio::source::{DirectorySource, RecordSource};
use folio::theme::{JsonFileStore, MemoryStore, Preferences, SettingsStore};
use folio::ui;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Read a book of papers in the terminal", long_about = None)]
struct Args {
    /// Paper or reference to open, e.g. 1, 1:2 or 1:2.3
    #[arg(value_name = "REFERENCE")]
    reference: Option<String>,

    /// Directory holding the NNN.json paper documents
    #[arg(long, value_name = "DIR")]
    content_dir: Option<PathBuf>,

    /// File where display preferences are kept
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Write log output to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the parsed paper as JSON and exit
    #[arg(long)]
    outline: bool,
}

fn main() {
    let args = Args::parse();
    let code = match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(args: &Args) -> Result<(), ReaderError> {
    let mut cfg = Config::load()?;

    // Override config with command line args
    if let Some(dir) = &args.content_dir {
        cfg.content_dir = dir.to_string_lossy().into_owned();
    }
    if let Some(path) = &args.settings {
        cfg.settings_path = path.to_string_lossy().into_owned();
    }
    if let Some(path) = &args.log_file {
        cfg.log_file = path.to_string_lossy().into_owned();
    }

    let target = if !cfg.log_file.is_empty() {
        LogTarget::File(PathBuf::from(&cfg.log_file))
    } else if args.outline {
        LogTarget::Stderr
    } else {
        LogTarget::Disabled
    };
    init_logging(&target, args.verbose)?;

    let reference = args
        .reference
        .as_deref()
        .map(str::parse::<Reference>)
        .transpose()?;
    let source = DirectorySource::new(&cfg.content_dir);

    if args.outline {
        let paper = reference.map_or(PaperNumber::FOREWORD, |r| r.paper);
        return print_outline(&source, paper);
    }

    let store: Box<dyn SettingsStore> = if cfg.settings_path.is_empty() {
        Box::new(MemoryStore::default())
    } else {
        Box::new(JsonFileStore::new(&cfg.settings_path))
    };
    let preferences = Preferences::load(store);

    let mut app = AppState::new(
        Box::new(source),
        Box::new(SystemClipboard::default()),
        preferences,
        &cfg,
    );

    run_tui(&mut app, &cfg, reference)
}

fn print_outline(source: &DirectorySource, paper: PaperNumber) -> Result<(), ReaderError> {
    let mut sink = TracingSink;
    let records = source.fetch_records(paper, &mut sink)?;
    let document = parse_document(&paper.padded(), &records, &mut sink);
    let json = serde_json::to_string_pretty(&document)?;
    println!("{json}");
    Ok(())
}

fn run_tui(
    app: &mut AppState,
    cfg: &Config,
    reference: Option<Reference>,
) -> Result<(), ReaderError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = open_initial(&terminal, app, reference)
        .and_then(|()| run_app(&mut terminal, app, cfg).map_err(ReaderError::from));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Sizes the page and opens the paper (or reference) given on the command line.
fn open_initial<B: ratatui::backend::Backend>(
    terminal: &Terminal<B>,
    app: &mut AppState,
    reference: Option<Reference>,
) -> Result<(), ReaderError> {
    let now = Instant::now();
    resize(terminal, app, now)?;
    let reference = reference.unwrap_or_else(|| Reference::paper(PaperNumber::FOREWORD));
    if let Err(e) = app.open_reference(reference, now) {
        app.notify(&e.to_string(), now);
    }
    Ok(())
}

fn resize<B: ratatui::backend::Backend>(
    terminal: &Terminal<B>,
    app: &mut AppState,
    now: Instant,
) -> io::Result<()> {
    let size = terminal.size()?;
    let page = ui::page_area(ratatui::layout::Rect::new(0, 0, size.width, size.height));
    app.resize(page.width, usize::from(page.height), now);
    Ok(())
}

#[allow(clippy::too_many_lines)]
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    cfg: &Config,
) -> io::Result<()> {
    loop {
        let now = Instant::now();
        app.tick(now);
        resize(terminal, app, now)?;
        terminal.draw(|f| ui::draw(f, app, cfg))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let now = Instant::now();

        match app.current_view {
            View::Reading => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('j') | KeyCode::Down => app.line_down(now),
                KeyCode::Char('k') | KeyCode::Up => app.line_up(now),
                KeyCode::PageDown | KeyCode::Char(' ') => app.page_down(now),
                KeyCode::PageUp => app.page_up(now),
                KeyCode::Char('g') | KeyCode::Home => app.scroll_to_top(now),
                KeyCode::Char('G') | KeyCode::End => app.scroll_to_bottom(now),
                KeyCode::Char('n') => app.next_section(now),
                KeyCode::Char('p') => app.prev_section(now),
                KeyCode::Char(']') => {
                    if let Err(e) = app.next_paper(now) {
                        app.notify(&e.to_string(), now);
                    }
                }
                KeyCode::Char('[') => {
                    if let Err(e) = app.prev_paper(now) {
                        app.notify(&e.to_string(), now);
                    }
                }
                KeyCode::Char('c') => app.open_contents(),
                KeyCode::Char('s') => app.open_jump_menu(),
                KeyCode::Char('t') => app.current_view = View::Settings,
                KeyCode::Char('v') => app.toggle_selection(),
                KeyCode::Char('y') => app.copy_selection(now),
                KeyCode::Esc => app.selection = None,
                KeyCode::Char(':') => {
                    app.current_view = View::Command;
                    app.command_buffer.clear();
                    app.message = None;
                }
                _ => {}
            },
            View::Contents => match key.code {
                KeyCode::Char('j') | KeyCode::Down => app.contents_move(1),
                KeyCode::Char('k') | KeyCode::Up => app.contents_move(-1),
                KeyCode::Char('l') | KeyCode::Right => app.contents_switch_part(true),
                KeyCode::Char('h') | KeyCode::Left => app.contents_switch_part(false),
                KeyCode::Enter => app.contents_select(now),
                KeyCode::Esc | KeyCode::Char('c' | 'q') => app.current_view = View::Reading,
                _ => {}
            },
            View::JumpMenu => match key.code {
                KeyCode::Char('j') | KeyCode::Down => app.jump_menu_move(1),
                KeyCode::Char('k') | KeyCode::Up => app.jump_menu_move(-1),
                KeyCode::Enter => app.jump_menu_select(now),
                KeyCode::Esc | KeyCode::Char('s' | 'q') => app.current_view = View::Reading,
                _ => {}
            },
            View::Settings => match key.code {
                KeyCode::Char('j') | KeyCode::Down => app.settings_move(1),
                KeyCode::Char('k') | KeyCode::Up => app.settings_move(-1),
                KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => {
                    app.settings_cycle(true, now);
                }
                KeyCode::Char('h') | KeyCode::Left => app.settings_cycle(false, now),
                KeyCode::Esc | KeyCode::Char('t' | 'q') => app.current_view = View::Reading,
                _ => {}
            },
            View::Command => match key.code {
                KeyCode::Char(c) => {
                    app.command_buffer.push(c);
                }
                KeyCode::Backspace => {
                    app.command_buffer.pop();
                }
                KeyCode::Enter => app.run_command(now),
                KeyCode::Esc => {
                    app.current_view = View::Reading;
                    app.command_buffer.clear();
                }
                _ => {}
            },
        }
    }
}
