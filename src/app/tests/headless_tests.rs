use super::*;
use crate::config::SigningConfig;
use crate::receipt::SigningReceipt;
use crate::session::Document;
use tempfile::TempDir;

const SIGNING_SCRIPT: &str = r#"
surface_width: 320
steps:
  - command: request_preview
  - command: share_link
  - command: enter_signing
  - command:
      set_signer_name:
        name: Kim Minji
  - command:
      set_signer_phone:
        phone: 010-1234-5678
  - pointer_down:
      client: { x: 20.0, y: 40.0 }
  - pointer_move:
      client: { x: 120.0, y: 60.0 }
  - pointer_move:
      touches:
        - { x: 200.0, y: 90.0 }
  - pointer_up
  - command: toggle_agreed
  - command: submit
"#;

fn start_session(dir: &Path) -> SigningSession {
    SigningSession::start(
        "headless-test",
        Document::new("Consent", "Body text"),
        &SigningConfig::default_config(),
        &dir.join("logs"),
    )
    .unwrap()
}

fn parse(yaml: &str) -> HeadlessScript {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn test_parse_script_steps() {
    let script = parse(SIGNING_SCRIPT);

    assert_eq!(script.surface_width, 320);
    assert_eq!(
        script.steps[0],
        ScriptStep::Command(WorkflowCommand::RequestPreview)
    );
    assert_eq!(
        script.steps[3],
        ScriptStep::Command(WorkflowCommand::SetSignerName {
            name: "Kim Minji".into()
        })
    );
    assert_eq!(
        script.steps[5],
        ScriptStep::PointerDown(PointerSample::mouse(20.0, 40.0))
    );
    assert_eq!(script.steps[8], ScriptStep::PointerUp);
}

#[test]
fn test_surface_width_defaults() {
    let script = parse("steps:\n  - pointer_leave\n");
    assert_eq!(script.surface_width, 400);
    assert_eq!(script.steps, vec![ScriptStep::PointerLeave]);
}

#[test]
fn test_full_script_completes_and_exports() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let mut session = start_session(dir.path());

    let report = run_script(&mut session, &parse(SIGNING_SCRIPT), &out).unwrap();

    assert_eq!(report.final_state, WorkflowState::Completed);
    assert_eq!(report.ignored_surface_steps, 0);
    assert_eq!(report.exports.len(), 1);

    let round = out.join("round-1");
    let json = std::fs::read_to_string(round.join("receipt.json")).unwrap();
    let receipt: SigningReceipt = serde_json::from_str(&json).unwrap();
    assert_eq!(receipt.signer_name, "Kim Minji");
    assert_eq!(receipt.signature.width, 320);
    assert_eq!(receipt.signature.height, 200);
    assert_eq!(receipt.signature.strokes, 1);
    assert!(round.join("signature.png").exists());
}

#[test]
fn test_submit_without_consent_stays_signing() {
    let dir = TempDir::new().unwrap();
    let script = SIGNING_SCRIPT.replace("  - command: toggle_agreed\n", "");
    let mut session = start_session(dir.path());

    let report = run_script(&mut session, &parse(&script), dir.path()).unwrap();

    assert_eq!(report.final_state, WorkflowState::Signing);
    assert!(report.exports.is_empty());
    assert!(report.events.iter().any(|event| matches!(
        event,
        WorkflowEvent::ValidationFailed { missing }
            if missing == &vec![crate::validation::Requirement::Agreement]
    )));
    assert!(!dir.path().join("round-1").exists());
}

#[test]
fn test_pointer_steps_outside_signing_are_ignored() {
    let dir = TempDir::new().unwrap();
    let script = parse(
        r#"
steps:
  - pointer_down:
      client: { x: 1.0, y: 1.0 }
  - clear_signature
  - command: request_preview
"#,
    );
    let mut session = start_session(dir.path());

    let report = run_script(&mut session, &script, dir.path()).unwrap();

    assert_eq!(report.ignored_surface_steps, 2);
    assert_eq!(report.final_state, WorkflowState::PreviewReady);
}

#[test]
fn test_summary_mentions_transitions_and_export() {
    let dir = TempDir::new().unwrap();
    let mut session = start_session(dir.path());
    let report = run_script(&mut session, &parse(SIGNING_SCRIPT), dir.path()).unwrap();

    let lines = summarize(&report);

    assert!(lines.contains(&"[workflow] Editing -> Ready to send".to_string()));
    assert!(lines.iter().any(|line| line.starts_with("[share] ")));
    assert!(lines.iter().any(|line| line.starts_with("[receipt] Exported")));
    assert_eq!(
        lines.last().map(String::as_str),
        Some("[workflow] Final state: Completed")
    );
}

#[test]
fn test_load_missing_script_fails() {
    let dir = TempDir::new().unwrap();
    assert!(HeadlessScript::load(&dir.path().join("missing.yaml")).is_err());
}

#[test]
fn test_second_round_keeps_first_receipt() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let second_round = SIGNING_SCRIPT
        .replace("surface_width: 320\nsteps:\n", "")
        .replace("Kim Minji", "Lee Jisoo");
    let script = parse(&format!("{}  - command: reset\n{}", SIGNING_SCRIPT, second_round));
    let mut session = start_session(dir.path());

    let report = run_script(&mut session, &script, &out).unwrap();

    assert_eq!(report.final_state, WorkflowState::Completed);
    assert_eq!(report.exports.len(), 2);
    assert_ne!(report.exports[0].receipt_path, report.exports[1].receipt_path);

    let read = |round: &str| -> SigningReceipt {
        let json = std::fs::read_to_string(out.join(round).join("receipt.json")).unwrap();
        serde_json::from_str(&json).unwrap()
    };
    assert_eq!(read("round-1").signer_name, "Kim Minji");
    assert_eq!(read("round-2").signer_name, "Lee Jisoo");
}

#[test]
fn test_oversized_widths_are_rejected() {
    let script = parse("surface_width: 4294967295\nsteps: []\n");
    assert!(script.validate().is_err());

    let script = parse("steps:\n  - resize: { width: 100000 }\n");
    let err = script.validate().unwrap_err();
    assert!(err.to_string().contains("steps[0].resize.width"));

    assert!(parse(SIGNING_SCRIPT).validate().is_ok());
}

#[test]
fn test_load_rejects_oversized_width() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("script.yaml");
    std::fs::write(&path, "surface_width: 4294967295\nsteps:\n  - command: request_preview\n").unwrap();

    assert!(HeadlessScript::load(&path).is_err());
}

#[test]
fn test_unvalidated_huge_width_is_clamped() {
    let dir = TempDir::new().unwrap();
    let script = HeadlessScript {
        surface_width: u32::MAX,
        steps: vec![
            ScriptStep::Command(WorkflowCommand::RequestPreview),
            ScriptStep::Command(WorkflowCommand::EnterSigning),
        ],
    };
    let mut session = start_session(dir.path());

    let report = run_script(&mut session, &script, dir.path()).unwrap();

    assert_eq!(report.final_state, WorkflowState::Signing);
    assert_eq!(
        session.controller.snapshot().surface_size.0,
        MAX_SURFACE_DIMENSION
    );
}
