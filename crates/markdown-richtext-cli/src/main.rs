mod dump;
mod terminal;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use markdown_richtext_config::Config;
use markdown_richtext_engine::{MarkdownParser, PulldownParser, RenderedDocument, Renderer};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::{env, io::stdout, path::PathBuf, process};
use terminal::CellMeasurer;

struct App {
    title: String,
    lines: Vec<Line<'static>>,
    scroll: u16,
}

impl App {
    fn new(title: String, lines: Vec<Line<'static>>) -> Self {
        Self {
            title,
            lines,
            scroll: 0,
        }
    }

    fn scroll_down(&mut self, amount: u16) {
        let max = u16::try_from(self.lines.len().saturating_sub(1)).unwrap_or(u16::MAX);
        self.scroll = self.scroll.saturating_add(amount).min(max);
    }

    fn scroll_up(&mut self, amount: u16) {
        self.scroll = self.scroll.saturating_sub(amount);
    }
}

fn render_file(path: &PathBuf, config: &Config) -> Result<(RenderedDocument, CellMeasurer)> {
    let markdown = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let measurer = CellMeasurer::for_font(&config.style.default_font);
    let mut renderer = Renderer::new(&config.style, &config.environment, &measurer);
    if let Some(base_url) = config.parsed_base_url()? {
        renderer = renderer.with_base_url(base_url);
    }
    let document = PulldownParser.parse(&markdown);
    log::info!("parsed {} with {} blocks", path.display(), document.blocks.len());
    Ok((renderer.render(&document), measurer))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let (path, dump_only) = match args.as_slice() {
        [_, path] => (PathBuf::from(path), false),
        [_, path, flag] if flag == "--dump" => (PathBuf::from(path), true),
        _ => {
            eprintln!("Usage: {} <file.md> [--dump]", args[0]);
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Config path: {}", Config::config_path().display());
            process::exit(1);
        }
    };

    let (document, measurer) = match render_file(&path, &config) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    if dump_only {
        print!("{}", dump::dump(&document));
        return Ok(());
    }

    let lines = terminal::to_lines(&document, measurer, config.style.default_color);
    let mut app = App::new(path.display().to_string(), lines);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.scroll_down(1),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_up(1),
                KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_down(20),
                KeyCode::PageUp => app.scroll_up(20),
                KeyCode::Home | KeyCode::Char('g') => app.scroll = 0,
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let content = Paragraph::new(app.lines.clone())
        .block(Block::default().borders(Borders::ALL).title(app.title.as_str()))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));

    f.render_widget(content, chunks[0]);

    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Up | "),
        Span::raw("↓/j: Down | "),
        Span::raw("PgUp/PgDn/Space: Page | g: Top"),
    ]);

    f.render_widget(Paragraph::new(vec![help_text]), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolling_is_clamped() {
        let mut app = App::new("t".into(), vec![Line::from("a"), Line::from("b")]);
        app.scroll_up(3);
        assert_eq!(app.scroll, 0);
        app.scroll_down(10);
        assert_eq!(app.scroll, 1);
    }
}
