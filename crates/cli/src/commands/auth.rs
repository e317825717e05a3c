//! Account commands.

use std::io::{BufRead, Write};

use clap::Subcommand;

use super::{App, CliError};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account and sign in
    Register {
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Display name
        #[arg(short, long)]
        name: String,
    },
    /// Sign in
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,
    },
    /// Sign out of this device (asks for confirmation)
    Logout,
    /// Permanently delete the account (asks for confirmation)
    DeleteAccount,
    /// Show the signed-in user
    Whoami,
}

pub async fn run(app: &App, action: AuthAction) -> Result<(), CliError> {
    match action {
        AuthAction::Register { email, name } => {
            let password = read_password()?;
            let user = app.auth.register(&email, &password, &name).await?;
            println!("Welcome, {}!", user.name);
            Ok(())
        }
        AuthAction::Login { email } => {
            let password = read_password()?;
            let user = app.auth.login(&email, &password).await?;
            println!("Welcome back, {}!", user.name);
            Ok(())
        }
        AuthAction::Logout => {
            if !app.auth.logout()? {
                println!("Cancelled.");
            }
            Ok(())
        }
        AuthAction::DeleteAccount => {
            if !app.auth.delete_account().await? {
                println!("Cancelled.");
            }
            Ok(())
        }
        AuthAction::Whoami => {
            match app.auth.current_user() {
                Some(user) => {
                    let role = user.role.as_deref().unwrap_or("customer");
                    println!("{} <{}> ({role})", user.name, user.email);
                }
                None => println!("Not signed in."),
            }
            Ok(())
        }
    }
}

/// Read the password from stdin rather than taking it as an argument, so it
/// stays out of shell history.
fn read_password() -> Result<String, CliError> {
    eprint!("Password: ");
    let _ = std::io::stderr().flush();

    let mut password = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut password)
        .map_err(|e| CliError::InvalidArgument(format!("failed to read password: {e}")))?;

    let password = password.trim_end_matches(['\r', '\n']).to_owned();
    if password.is_empty() {
        return Err(CliError::InvalidArgument("password cannot be empty".into()));
    }
    Ok(password)
}
