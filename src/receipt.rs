//! Completion receipt for a signed session, and its export to disk.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::WorkflowState;
use crate::state_machine::SessionSnapshot;

/// What the signer is shown once the session completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigningReceipt {
    pub session_id: String,
    pub document_title: String,
    pub document_body: String,
    pub signer_name: String,
    pub signer_phone: String,
    /// Session creation time as displayed to the signer
    pub session_created: String,
    pub signed_at: DateTime<Utc>,
    pub signature: SignatureSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureSummary {
    pub width: u32,
    pub height: u32,
    pub strokes: usize,
    /// SHA-256 of the PNG bytes, lowercase hex
    pub sha256: String,
    pub image_data_url: String,
}

impl SigningReceipt {
    /// Builds the receipt. Returns `None` unless the session is `Completed`.
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Option<Self> {
        if snapshot.state != WorkflowState::Completed {
            return None;
        }
        let artifact = snapshot.artifact.as_ref()?;
        let signed_at = snapshot.signed_at?;

        Some(Self {
            session_id: snapshot.session_id.clone(),
            document_title: snapshot.document.title.clone(),
            document_body: snapshot.document.body.clone(),
            signer_name: snapshot.signer.name.clone(),
            signer_phone: snapshot.signer.phone.clone(),
            session_created: snapshot.created_display.clone(),
            signed_at,
            signature: SignatureSummary {
                width: artifact.width(),
                height: artifact.height(),
                strokes: snapshot.strokes.len(),
                sha256: artifact.fingerprint(),
                image_data_url: artifact.data_url(),
            },
        })
    }
}

/// Files written by [`export`].
#[derive(Debug, Clone)]
pub struct ExportedReceipt {
    pub image_path: PathBuf,
    pub receipt_path: PathBuf,
}

/// Writes `signature.png` and `receipt.json` into `dir`.
///
/// # Errors
///
/// Returns an error if the session is not completed or a file cannot be
/// written.
pub fn export(snapshot: &SessionSnapshot, dir: &Path) -> Result<ExportedReceipt> {
    let receipt = SigningReceipt::from_snapshot(snapshot)
        .context("Only a completed session can be exported")?;
    let artifact = snapshot
        .artifact
        .as_ref()
        .context("Completed session has no signature image")?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let image_path = dir.join("signature.png");
    write_atomic(&image_path, artifact.png_bytes())?;

    let receipt_path = dir.join("receipt.json");
    let json =
        serde_json::to_string_pretty(&receipt).context("Failed to serialize receipt to JSON")?;
    write_atomic(&receipt_path, json.as_bytes())?;

    Ok(ExportedReceipt {
        image_path,
        receipt_path,
    })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, bytes)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Document, SignerInfo, StrokePoint};
    use crate::surface::Artifact;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn completed_snapshot() -> SessionSnapshot {
        let mut image = RgbaImage::new(16, 8);
        image.put_pixel(2, 2, Rgba([0, 0, 0, 255]));
        SessionSnapshot {
            state: WorkflowState::Completed,
            version: 9,
            session_id: "s-42".into(),
            created_display: "2026. 10. 16. AM 9:00:00".into(),
            document: Document::new("Consent", "I agree."),
            signer: SignerInfo {
                name: "Kim".into(),
                phone: "010-1234-5678".into(),
            },
            agreed: true,
            strokes: vec![vec![StrokePoint::new(1.0, 1.0), StrokePoint::new(3.0, 3.0)]],
            pending_stroke: None,
            artifact: Some(Artifact::encode(&image).unwrap()),
            signed_at: Some(Utc::now()),
            surface_size: (16, 8),
        }
    }

    #[test]
    fn test_receipt_from_completed_session() {
        let snapshot = completed_snapshot();
        let receipt = SigningReceipt::from_snapshot(&snapshot).expect("receipt");

        assert_eq!(receipt.signer_name, "Kim");
        assert_eq!(receipt.signer_phone, "010-1234-5678");
        assert_eq!(receipt.session_created, "2026. 10. 16. AM 9:00:00");
        assert_eq!(receipt.signature.strokes, 1);
        assert_eq!(receipt.signature.width, 16);
        assert_eq!(
            receipt.signature.sha256,
            snapshot.artifact.as_ref().unwrap().fingerprint()
        );
        assert!(receipt
            .signature
            .image_data_url
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_no_receipt_before_completion() {
        let mut snapshot = completed_snapshot();
        snapshot.state = WorkflowState::Signing;
        assert!(SigningReceipt::from_snapshot(&snapshot).is_none());
    }

    #[test]
    fn test_export_writes_png_and_json() {
        let dir = TempDir::new().unwrap();
        let snapshot = completed_snapshot();

        let exported = export(&snapshot, &dir.path().join("out")).unwrap();

        let png = std::fs::read(&exported.image_path).unwrap();
        assert_eq!(png, snapshot.artifact.as_ref().unwrap().png_bytes());

        let json = std::fs::read_to_string(&exported.receipt_path).unwrap();
        let receipt: SigningReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(receipt, SigningReceipt::from_snapshot(&snapshot).unwrap());
        assert!(!dir.path().join("out").join("receipt.tmp").exists());
    }

    #[test]
    fn test_export_refuses_incomplete_session() {
        let dir = TempDir::new().unwrap();
        let mut snapshot = completed_snapshot();
        snapshot.state = WorkflowState::PreviewReady;

        assert!(export(&snapshot, dir.path()).is_err());
        assert!(!dir.path().join("receipt.json").exists());
    }
}
