use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Paragraph, Wrap,
    },
    Frame,
};

use super::app::{surface_rows, DocumentField, SignerField, TuiApp};
use crate::session::{Audience, Stroke, WorkflowState};
use crate::state_machine::SessionSnapshot;

pub fn draw(frame: &mut Frame, app: &mut TuiApp, snapshot: &SessionSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Screen
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    draw_header(frame, snapshot, chunks[0]);

    app.surface_area = None;
    match snapshot.state {
        WorkflowState::Editing => draw_editor(frame, app, snapshot, chunks[1]),
        WorkflowState::PreviewReady => draw_preview(frame, snapshot, chunks[1]),
        WorkflowState::Signing => draw_signing(frame, app, snapshot, chunks[1]),
        WorkflowState::Completed => draw_receipt(frame, snapshot, chunks[1]),
    }

    draw_footer(frame, app, snapshot.state, chunks[2]);
}

fn draw_header(frame: &mut Frame, snapshot: &SessionSnapshot, area: Rect) {
    let badge = match snapshot.state.audience() {
        Audience::Operator => Span::styled(" OPERATOR ", Style::default().bg(Color::Blue).bold()),
        Audience::Signer => Span::styled(" SIGNER ", Style::default().bg(Color::Magenta).bold()),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Signing Desk ", Style::default().fg(Color::Cyan).bold()),
        badge,
        Span::raw(format!(" {} ", snapshot.state.label())),
        Span::styled(
            format!(" session {}  rev {}", snapshot.session_id, snapshot.version),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(header, area);
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(format!(" {} ", title))
}

fn draw_editor(frame: &mut Frame, app: &TuiApp, snapshot: &SessionSnapshot, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let title = Paragraph::new(snapshot.document.title.as_str())
        .block(field_block("Title", app.document_focus == DocumentField::Title));
    frame.render_widget(title, chunks[0]);

    let body = Paragraph::new(snapshot.document.body.as_str())
        .wrap(Wrap { trim: false })
        .block(field_block("Body", app.document_focus == DocumentField::Body));
    frame.render_widget(body, chunks[1]);
}

fn document_paragraph(snapshot: &SessionSnapshot) -> Paragraph<'_> {
    let mut lines = vec![
        Line::from(Span::styled(
            snapshot.document.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::default(),
    ];
    lines.extend(snapshot.document.body.lines().map(Line::from));
    Paragraph::new(lines).wrap(Wrap { trim: false })
}

fn draw_preview(frame: &mut Frame, snapshot: &SessionSnapshot, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let block = Block::default().borders(Borders::ALL).title(" Preview ");
    frame.render_widget(document_paragraph(snapshot).block(block), chunks[0]);

    let created = Paragraph::new(format!(" Created {}", snapshot.created_display))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(created, chunks[1]);
}

fn draw_signing(frame: &mut Frame, app: &mut TuiApp, snapshot: &SessionSnapshot, area: Rect) {
    let canvas_rows = surface_rows(snapshot.surface_size.1).saturating_add(2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),              // Document
            Constraint::Length(3),           // Name and phone
            Constraint::Length(1),           // Agreement
            Constraint::Length(canvas_rows), // Signature
        ])
        .split(area);

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(document_paragraph(snapshot).block(block), chunks[0]);

    let fields = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    let name = Paragraph::new(snapshot.signer.name.as_str())
        .block(field_block("Name", app.focus == SignerField::Name));
    let phone = Paragraph::new(snapshot.signer.phone.as_str())
        .block(field_block("Phone", app.focus == SignerField::Phone));
    frame.render_widget(name, fields[0]);
    frame.render_widget(phone, fields[1]);

    let checkbox = if snapshot.agreed { "[x]" } else { "[ ]" };
    let agreement = Paragraph::new(format!(
        " {} I have read and agree to the document above",
        checkbox
    ));
    frame.render_widget(agreement, chunks[2]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Sign here ");
    app.surface_area = Some(block.inner(chunks[3]));
    draw_strokes(frame, snapshot, block, chunks[3]);
}

fn draw_receipt(frame: &mut Frame, snapshot: &SessionSnapshot, area: Rect) {
    let canvas_rows = surface_rows(snapshot.surface_size.1).saturating_add(2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(5),
            Constraint::Length(canvas_rows),
        ])
        .split(area);

    let block = Block::default().borders(Borders::ALL).title(" Signed ");
    frame.render_widget(document_paragraph(snapshot).block(block), chunks[0]);

    let signed_at = snapshot
        .signed_at
        .map(|at| at.with_timezone(&Local).to_rfc2822())
        .unwrap_or_default();
    let fingerprint = snapshot
        .artifact
        .as_ref()
        .map(|artifact| artifact.fingerprint())
        .unwrap_or_default();
    let details = Paragraph::new(vec![
        Line::from(format!(" Signer     {}", snapshot.signer.name)),
        Line::from(format!(" Phone      {}", snapshot.signer.phone)),
        Line::from(format!(" Created    {}", snapshot.created_display)),
        Line::from(format!(" Signed     {}", signed_at)),
        Line::from(Span::styled(
            format!(" sha256     {}", fingerprint),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(details, chunks[1]);

    let block = Block::default().borders(Borders::ALL).title(" Signature ");
    draw_strokes(frame, snapshot, block, chunks[2]);
}

fn draw_strokes(frame: &mut Frame, snapshot: &SessionSnapshot, block: Block<'_>, area: Rect) {
    let (width, height) = snapshot.surface_size;
    let height = f64::from(height);
    let strokes: Vec<&Stroke> = snapshot
        .strokes
        .iter()
        .chain(snapshot.pending_stroke.as_ref())
        .collect();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, f64::from(width.max(1))])
        .y_bounds([0.0, height.max(1.0)])
        .paint(|ctx| {
            for stroke in &strokes {
                for pair in stroke.windows(2) {
                    // Surface y grows downward, canvas y grows upward
                    ctx.draw(&CanvasLine::new(
                        f64::from(pair[0].x),
                        height - f64::from(pair[0].y),
                        f64::from(pair[1].x),
                        height - f64::from(pair[1].y),
                        Color::White,
                    ));
                }
                if let [only] = stroke.as_slice() {
                    ctx.draw(&CanvasLine::new(
                        f64::from(only.x),
                        height - f64::from(only.y),
                        f64::from(only.x),
                        height - f64::from(only.y),
                        Color::White,
                    ));
                }
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_footer(frame: &mut Frame, app: &TuiApp, state: WorkflowState, area: Rect) {
    let hints = match state {
        WorkflowState::Editing => "[Tab] switch field  [Ctrl+P] preview  [Esc] quit",
        WorkflowState::PreviewReady => {
            "[s] start signing  [e] edit  [l] share link  [q] quit"
        }
        WorkflowState::Signing => {
            "[Tab] switch field  [Ctrl+A] agree  [Ctrl+L] clear signature  [Enter] submit  [Esc] quit"
        }
        WorkflowState::Completed => "[x] export receipt  [r] new signing  [q] quit",
    };

    let mut lines = Vec::new();
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(Span::styled(hints, Style::default().fg(Color::Gray))));

    let footer = Paragraph::new(lines).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}
