//! sshd-audit - probe and audit the local OpenSSH server.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match sshd_audit_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(sshd_audit_cli::exit_code(&e))
        }
    }
}
