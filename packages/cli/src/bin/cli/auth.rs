// ABOUTME: CLI commands for account and session handling
// ABOUTME: Signup, login, logout and status against the TaskMaster API

use colored::*;
use inquire::{Password, PasswordDisplayMode, Text};

use taskmaster_client::{AuthState, Environment, SignupForm};

use super::App;

fn prompt_password(message: &str) -> anyhow::Result<String> {
    Ok(Password::new(message)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?)
}

fn prompt_or(value: Option<String>, message: &str) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Text::new(message).prompt()?),
    }
}

pub async fn signup(
    app: &mut App,
    email: Option<String>,
    username: Option<String>,
) -> anyhow::Result<()> {
    println!("{}", "📝 Create Account".blue().bold());
    println!();

    let email = prompt_or(email, "Email:")?;
    let username = prompt_or(username, "Username:")?;
    let password = prompt_password("Password:")?;
    let confirm = prompt_password("Confirm password:")?;

    let form = SignupForm::new(email, password, username).confirm(confirm);
    let result = app.session.signup(&form).await;
    let user = app.report(result, "Account created. You can now log in.")?;

    let email = user.map(|u| u.email).unwrap_or(form.email);
    println!("{}", format!("Run 'taskmaster login --email {}' to sign in", email.trim()).dimmed());
    Ok(())
}

pub async fn login(app: &mut App, email: Option<String>) -> anyhow::Result<()> {
    let email = prompt_or(email, "Email:")?;
    let password = prompt_password("Password:")?;

    let result = app.session.login(&email, &password).await;
    let session = app.report(result, "Signed in")?;

    println!("Welcome, {}", session.display_name().cyan().bold());
    Ok(())
}

pub async fn logout(app: &mut App) -> anyhow::Result<()> {
    let was_signed_in = app.session.is_authenticated().await;
    let result = app.session.logout().await;
    app.report(result, "Signed out")?;

    if !was_signed_in {
        println!("{}", "No session was stored".dimmed());
    }
    Ok(())
}

pub async fn status(app: &App) -> anyhow::Result<()> {
    println!("{}", "🔐 TaskMaster Status".blue().bold());
    println!();

    let environment = match app.config.environment {
        Environment::Development => "development".yellow(),
        Environment::Production => "production".green(),
    };
    println!("{:<14} {}", "Environment:".cyan(), environment);
    println!("{:<14} {}", "API:".cyan(), app.session.api_url());
    println!(
        "{:<14} {}",
        "Session file:".cyan(),
        app.config.session_path().display()
    );

    match app.session.state() {
        AuthState::SignedIn { email, username } => {
            let who = if username.trim().is_empty() {
                email
            } else {
                format!("{} <{}>", username, email)
            };
            println!("{:<14} {} {}", "Signed in:".cyan(), "✓".green().bold(), who);
        }
        AuthState::Expired => {
            println!("{:<14} {}", "Signed in:".cyan(), "session expired".yellow());
        }
        AuthState::SignedOut => {
            println!("{:<14} {}", "Signed in:".cyan(), "no".red());
            println!();
            println!("{}", "Use 'taskmaster login' to sign in".dimmed());
        }
    }

    Ok(())
}
