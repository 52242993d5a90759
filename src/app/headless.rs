//! Scripted sessions without a terminal UI.
//!
//! A script is a YAML list of workflow commands and pointer input, replayed
//! against a fresh controller. Each time the session completes, its
//! signature and receipt are exported into a directory of its own per
//! signing round.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use super::{round_export_dir, SigningSession};
use crate::receipt::{self, ExportedReceipt};
use crate::session::WorkflowState;
use crate::state_machine::{WorkflowCommand, WorkflowEvent};
use crate::surface::{PagePoint, PointerSample, MAX_SURFACE_DIMENSION};

#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScript {
    /// Width the surface is fitted to whenever signing starts
    #[serde(default = "default_surface_width")]
    pub surface_width: u32,
    /// Steps are single-key maps (`- command: submit`) or bare names
    /// (`- pointer_up`).
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<ScriptStep>,
}

fn default_surface_width() -> u32 {
    400
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    Command(WorkflowCommand),
    Resize { width: u32 },
    Origin { x: f32, y: f32 },
    PointerDown(PointerSample),
    PointerMove(PointerSample),
    PointerUp,
    PointerLeave,
    ClearSignature,
}

#[derive(Debug)]
pub struct HeadlessReport {
    pub final_state: WorkflowState,
    pub events: Vec<WorkflowEvent>,
    /// Surface steps given while the session was not signing
    pub ignored_surface_steps: usize,
    pub exports: Vec<ExportedReceipt>,
}

impl HeadlessScript {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        let script: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse script as YAML: {}", path.display()))?;
        script
            .validate()
            .with_context(|| format!("Invalid script: {}", path.display()))?;
        Ok(script)
    }

    /// Rejects surface widths the raster cannot be allocated for.
    pub fn validate(&self) -> Result<()> {
        check_width("surface_width", self.surface_width)?;
        for (index, step) in self.steps.iter().enumerate() {
            if let ScriptStep::Resize { width } = step {
                check_width(&format!("steps[{}].resize.width", index), *width)?;
            }
        }
        Ok(())
    }
}

fn check_width(field: &str, width: u32) -> Result<()> {
    if width > MAX_SURFACE_DIMENSION {
        anyhow::bail!(
            "{} must be at most {}, got {}",
            field,
            MAX_SURFACE_DIMENSION,
            width
        );
    }
    Ok(())
}

pub fn run_script(
    session: &mut SigningSession,
    script: &HeadlessScript,
    out_dir: &Path,
) -> Result<HeadlessReport> {
    let mut report = HeadlessReport {
        final_state: session.controller.state(),
        events: Vec::new(),
        ignored_surface_steps: 0,
        exports: Vec::new(),
    };

    for (index, step) in script.steps.iter().enumerate() {
        match step {
            ScriptStep::Command(command) => {
                let events = session.controller.apply(command.clone());
                for event in &events {
                    match event {
                        WorkflowEvent::StateChanged {
                            to: WorkflowState::Signing,
                            ..
                        } => {
                            if let Some(mut surface) = session.controller.surface() {
                                surface.resize(script.surface_width);
                            }
                        }
                        WorkflowEvent::StateChanged {
                            to: WorkflowState::Completed,
                            ..
                        } => {
                            let exported = export_completed(session, out_dir)?;
                            report.exports.push(exported);
                        }
                        _ => {}
                    }
                }
                report.events.extend(events);
            }
            surface_step => {
                let Some(mut surface) = session.controller.surface() else {
                    tracing::debug!("Script step {} ignored: surface not active", index + 1);
                    report.ignored_surface_steps += 1;
                    continue;
                };
                match surface_step {
                    ScriptStep::Resize { width } => surface.resize(*width),
                    ScriptStep::Origin { x, y } => surface.set_origin(PagePoint::new(*x, *y)),
                    ScriptStep::PointerDown(sample) => {
                        surface.pointer_down(sample);
                    }
                    ScriptStep::PointerMove(sample) => {
                        surface.pointer_move(sample);
                    }
                    ScriptStep::PointerUp => {
                        surface.pointer_up();
                    }
                    ScriptStep::PointerLeave => {
                        surface.pointer_leave();
                    }
                    ScriptStep::ClearSignature => surface.clear(),
                    ScriptStep::Command(_) => {}
                }
            }
        }
    }

    report.final_state = session.controller.state();
    Ok(report)
}

fn export_completed(session: &SigningSession, out_dir: &Path) -> Result<ExportedReceipt> {
    let dir = round_export_dir(out_dir, session.logger.run_id());
    let exported = receipt::export(&session.controller.snapshot(), &dir)?;
    session.logger.log_export(&dir);
    Ok(exported)
}

/// One line per notable event, for the terminal.
pub fn summarize(report: &HeadlessReport) -> Vec<String> {
    let mut lines = Vec::new();
    for event in &report.events {
        match event {
            WorkflowEvent::StateChanged { from, to } => {
                lines.push(format!("[workflow] {} -> {}", from.label(), to.label()));
            }
            WorkflowEvent::ValidationFailed { missing } => {
                let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
                lines.push(format!("[workflow] Submit refused, missing: {}", names.join(", ")));
            }
            WorkflowEvent::LinkShared { link, outcome } => {
                lines.push(format!("[share] {} ({:?})", link.url, outcome));
            }
            WorkflowEvent::CommandIgnored { command, state } => {
                lines.push(format!("[workflow] Ignored {} in {}", command, state.label()));
            }
            _ => {}
        }
    }
    if report.ignored_surface_steps > 0 {
        lines.push(format!(
            "[surface] {} step(s) ignored outside signing",
            report.ignored_surface_steps
        ));
    }
    for exported in &report.exports {
        lines.push(format!(
            "[receipt] Exported {} and {}",
            exported.image_path.display(),
            exported.receipt_path.display()
        ));
    }
    lines.push(format!("[workflow] Final state: {}", report.final_state.label()));
    lines
}

#[cfg(test)]
#[path = "tests/headless_tests.rs"]
mod tests;
