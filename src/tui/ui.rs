use crate::core::{Destination, ScreenRef};
use crate::tui::app::App;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

const HELP_TEXT: &str = " n Page  s Settings  d Confirm  Esc Back  r Home  c Clear  q Quit ";

pub fn draw_ui(frame: &mut Frame, app: &App, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    // Title bar
    let title_text = if app.status_message.is_empty() {
        "Waypost".to_string()
    } else {
        format!("Waypost | {}", app.status_message)
    };
    frame.render_widget(Span::raw(title_text), title_area);

    draw_primary(frame, main_area, app, spinner_frame);

    if let Some(screen) = app.current(Destination::DialogScreen) {
        draw_dialog_screen(frame, main_area, app, &screen);
    }
    if app.current(Destination::DialogHost).is_some() {
        draw_dialog_host(frame, main_area, app);
    }

    let help = Paragraph::new(HELP_TEXT).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area);
}

fn draw_primary(frame: &mut Frame, area: Rect, app: &App, spinner_frame: usize) {
    let current = app.current(Destination::PrimaryScreen);
    let title = current
        .as_ref()
        .map(|s| format!(" {} ", s.core().title()))
        .unwrap_or_else(|| " (empty) ".to_string());

    let mut lines = vec![breadcrumb_line(&app.breadcrumbs(Destination::PrimaryScreen))];
    if let Some(screen) = &current {
        lines.push(Line::raw(""));
        lines.extend(screen_details(screen, spinner_frame));
    }

    let dimmed = app
        .navigator
        .shell_status()
        .map(|status| !status.main_content_enabled)
        .unwrap_or(false);
    let style = if dimmed {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };

    let body = Paragraph::new(lines)
        .style(style)
        .block(Block::bordered().title(title).padding(Padding::horizontal(1)))
        .wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}

fn draw_dialog_screen(frame: &mut Frame, area: Rect, app: &App, screen: &ScreenRef) {
    let overlay = centered_rect(80, 70, area);

    // Clear underlying content
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", screen.core().title()))
        .title_alignment(Alignment::Left)
        .title_bottom(Line::from(" Esc Back  c Cancel all ").centered())
        .padding(Padding::horizontal(1));

    let mut lines = vec![breadcrumb_line(&app.breadcrumbs(Destination::DialogScreen))];
    lines.push(Line::raw(""));
    lines.extend(screen_details(screen, 0));

    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}

fn draw_dialog_host(frame: &mut Frame, area: Rect, app: &App) {
    let overlay = centered_rect(50, 30, area);
    frame.render_widget(Clear, overlay);

    let prompt = app
        .pending_confirm
        .as_ref()
        .map(|dialog| dialog.prompt().to_string())
        .unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Confirm ")
        .title_bottom(Line::from(" y Yes  n No  Esc Cancel ").centered())
        .padding(Padding::horizontal(1));

    let body = Paragraph::new(prompt)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(body, overlay);
}

fn breadcrumb_line(titles: &[String]) -> Line<'static> {
    let mut spans = Vec::with_capacity(titles.len() * 2);
    for (i, title) in titles.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i + 1 == titles.len() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(title.clone(), style));
    }
    Line::from(spans)
}

fn screen_details(screen: &ScreenRef, spinner_frame: usize) -> Vec<Line<'static>> {
    const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
    let core = screen.core();
    let mut lines = vec![Line::raw(format!("id {}", core.id()))];
    if core.is_busy() {
        let spin = SPINNER[spinner_frame % SPINNER.len()];
        lines.push(Line::styled(
            format!("{spin} busy"),
            Style::default().fg(Color::Yellow),
        ));
    }
    lines
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
