use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::session::WorkflowState;
use crate::state_machine::{SessionSnapshot, WorkflowCommand};
use crate::surface::{PagePoint, PointerSample, MAX_SURFACE_DIMENSION};

/// Page units per terminal column. Pointer positions are reported at cell
/// centres in these units.
pub const CELL_WIDTH: f32 = 8.0;
/// Page units per terminal row.
pub const CELL_HEIGHT: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerField {
    Name,
    Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentField {
    Title,
    Body,
}

/// What the runner should do in response to a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Apply(WorkflowCommand),
    ClearSignature,
    Export,
    Quit,
}

/// Pointer input translated from terminal mouse events.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerAction {
    None,
    Down(PointerSample),
    Move(PointerSample),
    Up,
    Leave,
}

/// View-local state. Everything about the session itself comes from
/// `SessionSnapshot`.
pub struct TuiApp {
    pub focus: SignerField,
    pub document_focus: DocumentField,
    /// One-line feedback shown above the key hints
    pub status: Option<String>,
    /// Inner area of the signature canvas in the last rendered frame
    pub surface_area: Option<Rect>,
    drawing: bool,
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiApp {
    pub fn new() -> Self {
        Self {
            focus: SignerField::Name,
            document_focus: DocumentField::Title,
            status: None,
            surface_area: None,
            drawing: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, snapshot: &SessionSnapshot) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match snapshot.state {
            WorkflowState::Editing => self.handle_editing_key(key, ctrl, snapshot),
            WorkflowState::PreviewReady => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
                KeyCode::Char('e') => Action::Apply(WorkflowCommand::EditAgain),
                KeyCode::Char('s') | KeyCode::Enter => {
                    self.focus = SignerField::Name;
                    Action::Apply(WorkflowCommand::EnterSigning)
                }
                KeyCode::Char('l') => Action::Apply(WorkflowCommand::ShareLink),
                _ => Action::None,
            },
            WorkflowState::Signing => self.handle_signing_key(key, ctrl, snapshot),
            WorkflowState::Completed => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
                KeyCode::Char('r') => Action::Apply(WorkflowCommand::Reset),
                KeyCode::Char('x') => Action::Export,
                _ => Action::None,
            },
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent, ctrl: bool, snapshot: &SessionSnapshot) -> Action {
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('p') if ctrl => Action::Apply(WorkflowCommand::RequestPreview),
            KeyCode::Tab | KeyCode::BackTab => {
                self.document_focus = match self.document_focus {
                    DocumentField::Title => DocumentField::Body,
                    DocumentField::Body => DocumentField::Title,
                };
                Action::None
            }
            KeyCode::Enter if self.document_focus == DocumentField::Title => {
                self.document_focus = DocumentField::Body;
                Action::None
            }
            KeyCode::Enter => self.edit_document(snapshot, |text| text.push('\n')),
            KeyCode::Backspace => self.edit_document(snapshot, |text| {
                text.pop();
            }),
            KeyCode::Char(c) if !ctrl => self.edit_document(snapshot, |text| text.push(c)),
            _ => Action::None,
        }
    }

    fn handle_signing_key(&mut self, key: KeyEvent, ctrl: bool, snapshot: &SessionSnapshot) -> Action {
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('a') if ctrl => Action::Apply(WorkflowCommand::ToggleAgreed),
            KeyCode::Char('l') if ctrl => Action::ClearSignature,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    SignerField::Name => SignerField::Phone,
                    SignerField::Phone => SignerField::Name,
                };
                Action::None
            }
            KeyCode::Enter => Action::Apply(WorkflowCommand::Submit),
            KeyCode::Backspace => self.edit_signer(snapshot, |text| {
                text.pop();
            }),
            KeyCode::Char(c) if !ctrl => self.edit_signer(snapshot, |text| text.push(c)),
            _ => Action::None,
        }
    }

    /// Bracketed paste goes into whichever text field has focus.
    pub fn handle_paste(&mut self, text: &str, snapshot: &SessionSnapshot) -> Action {
        match snapshot.state {
            WorkflowState::Editing => self.edit_document(snapshot, |value| value.push_str(text)),
            WorkflowState::Signing => {
                let line: String = text.chars().filter(|c| !c.is_control()).collect();
                self.edit_signer(snapshot, |value| value.push_str(&line))
            }
            WorkflowState::PreviewReady | WorkflowState::Completed => Action::None,
        }
    }

    fn edit_document(&self, snapshot: &SessionSnapshot, edit: impl FnOnce(&mut String)) -> Action {
        match self.document_focus {
            DocumentField::Title => {
                let mut title = snapshot.document.title.clone();
                edit(&mut title);
                Action::Apply(WorkflowCommand::SetTitle { title })
            }
            DocumentField::Body => {
                let mut body = snapshot.document.body.clone();
                edit(&mut body);
                Action::Apply(WorkflowCommand::SetBody { body })
            }
        }
    }

    fn edit_signer(&self, snapshot: &SessionSnapshot, edit: impl FnOnce(&mut String)) -> Action {
        match self.focus {
            SignerField::Name => {
                let mut name = snapshot.signer.name.clone();
                edit(&mut name);
                Action::Apply(WorkflowCommand::SetSignerName { name })
            }
            SignerField::Phone => {
                let mut phone = snapshot.signer.phone.clone();
                edit(&mut phone);
                Action::Apply(WorkflowCommand::SetSignerPhone { phone })
            }
        }
    }

    /// Maps a terminal mouse event onto the signature surface.
    ///
    /// Dragging out of the canvas ends the stroke, the same way lifting the
    /// button does.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, state: WorkflowState) -> PointerAction {
        let Some(area) = self.surface_area.filter(|_| state == WorkflowState::Signing) else {
            self.drawing = false;
            return PointerAction::None;
        };
        let inside = contains(area, mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => {
                self.drawing = true;
                PointerAction::Down(cell_sample(mouse.column, mouse.row))
            }
            MouseEventKind::Drag(MouseButton::Left) if self.drawing => {
                if inside {
                    PointerAction::Move(cell_sample(mouse.column, mouse.row))
                } else {
                    self.drawing = false;
                    PointerAction::Leave
                }
            }
            MouseEventKind::Up(MouseButton::Left) if self.drawing => {
                self.drawing = false;
                PointerAction::Up
            }
            _ => PointerAction::None,
        }
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

fn cell_sample(column: u16, row: u16) -> PointerSample {
    PointerSample::mouse(
        f32::from(column) * CELL_WIDTH + CELL_WIDTH / 2.0,
        f32::from(row) * CELL_HEIGHT + CELL_HEIGHT / 2.0,
    )
}

/// Page position of the top-left corner of a canvas area.
pub fn surface_origin(area: Rect) -> PagePoint {
    PagePoint::new(
        f32::from(area.x) * CELL_WIDTH,
        f32::from(area.y) * CELL_HEIGHT,
    )
}

/// Surface width in page units for a canvas area, capped at the largest
/// width the surface accepts.
pub fn surface_width(area: Rect) -> u32 {
    ((f32::from(area.width) * CELL_WIDTH) as u32).min(MAX_SURFACE_DIMENSION)
}

/// Terminal rows needed to show a surface of the given height.
pub fn surface_rows(height: u32) -> u16 {
    let rows = (height as f32 / CELL_HEIGHT).ceil();
    rows.clamp(1.0, f32::from(u16::MAX)) as u16
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
