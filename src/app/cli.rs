use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "signdesk")]
#[command(about = "Electronic consent and signature desk")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to ~/.signdesk/config.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Document title, overriding the configured one
    #[arg(long)]
    pub title: Option<String>,

    /// Read the document body from this file
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// Run a scripted session without the TUI (requires --script)
    #[arg(long, requires = "script")]
    pub headless: bool,

    /// YAML script of workflow commands and pointer input
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Directory for the exported signature and receipt
    /// (defaults to ~/.signdesk/exports/<session-id>/)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_tui() {
        let cli = Cli::try_parse_from(["signdesk"]).unwrap();
        assert!(!cli.headless);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_headless_requires_script() {
        assert!(Cli::try_parse_from(["signdesk", "--headless"]).is_err());

        let cli =
            Cli::try_parse_from(["signdesk", "--headless", "--script", "run.yaml", "--out", "o"])
                .unwrap();
        assert!(cli.headless);
        assert_eq!(cli.script, Some(PathBuf::from("run.yaml")));
        assert_eq!(cli.out, Some(PathBuf::from("o")));
    }

    #[test]
    fn test_document_overrides() {
        let cli = Cli::try_parse_from([
            "signdesk",
            "--title",
            "Lease",
            "--body-file",
            "lease.txt",
        ])
        .unwrap();
        assert_eq!(cli.title.as_deref(), Some("Lease"));
        assert_eq!(cli.body_file, Some(PathBuf::from("lease.txt")));
    }
}
