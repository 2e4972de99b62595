// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::auth::{Authenticator, LoginForm, SignupForm};
use crate::context::AppContext;
use crate::core::ServiceClient;
use crate::environment::EnvironmentConfig;
use crate::profile::upload::CvFile;
use crate::profile::{ProfileEditor, ProfileSnapshot, UploadOutcome};
use crate::storage::FileStore;
use crate::types::profile::FormField;

#[derive(Parser)]
#[command(name = "profile-desk")]
#[command(about = "Sign in, pick a theme and edit your employee profile")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config.yaml (defaults to ./config.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Sign out
    Logout,
    /// Show whether a session is active
    Whoami,
    /// Show or toggle the colour theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Upload a CV to the parser and print the auto-filled profile
    Parse { file: PathBuf },
    /// Fill in the profile and submit it to the employee service
    Submit {
        /// CV to parse before applying field values
        #[arg(long)]
        cv: Option<PathBuf>,
        /// Field assignment, e.g. --set employeeId=E-42 (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
    /// Check that the CV parser is reachable
    Health,
}

#[derive(Subcommand)]
pub enum ThemeAction {
    Show,
    Toggle,
}

pub async fn handle_command(command: Command, config: &EnvironmentConfig) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let mut ctx = open_context(config)?;
            let auth = Authenticator::new(config.auth_delay());
            let route = auth.login(&mut ctx, &LoginForm { email, password }).await?;
            println!("✅ Signed in, continue at {}", route);
        }

        Command::Signup {
            full_name,
            email,
            password,
            confirm_password,
        } => {
            let mut ctx = open_context(config)?;
            let auth = Authenticator::new(config.auth_delay());
            let form = SignupForm {
                full_name,
                email,
                password,
                confirm_password,
            };
            let route = auth.signup(&mut ctx, &form).await?;
            println!("✅ Account created, continue at {}", route);
        }

        Command::Logout => {
            let mut ctx = open_context(config)?;
            let route = Authenticator::new(config.auth_delay()).logout(&mut ctx)?;
            println!("Signed out, continue at {}", route);
        }

        Command::Whoami => {
            let ctx = open_context(config)?;
            if ctx.is_authenticated() {
                println!("Signed in");
            } else {
                println!("Not signed in");
            }
        }

        Command::Theme { action } => {
            let mut ctx = open_context(config)?;
            if let ThemeAction::Toggle = action {
                ctx.toggle_theme()?;
            }
            println!("Theme: {} (root classes: \"{}\")", ctx.theme(), ctx.root().class_list());
        }

        Command::Parse { file } => {
            let editor = open_editor(config)?;
            upload(&editor, &file).await?;
            print_profile(&editor.snapshot().await);
        }

        Command::Submit { cv, fields } => {
            let editor = open_editor(config)?;

            if let Some(file) = cv {
                upload(&editor, &file).await?;
            }
            for assignment in &fields {
                let field = editor.apply_assignment(assignment).await?;
                info!("Set {} from command line", field);
            }

            let saved = editor.submit().await?;
            println!("✅ Profile saved successfully!");
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }

        Command::Health => {
            let client = ServiceClient::new(&config.parser_url, &config.employee_url)?;
            let health = client
                .parser_health()
                .await
                .with_context(|| format!("CV parser at {} is not reachable", config.parser_url))?;
            println!("CV parser: {}", health.status);
        }
    }

    Ok(())
}

fn open_context(config: &EnvironmentConfig) -> Result<AppContext> {
    let store = FileStore::open(&config.storage_path)?;
    AppContext::new(Box::new(store))
}

fn open_editor(config: &EnvironmentConfig) -> Result<ProfileEditor> {
    let client = ServiceClient::new(&config.parser_url, &config.employee_url)?;
    Ok(ProfileEditor::new(Arc::new(client)))
}

async fn upload(editor: &ProfileEditor, path: &Path) -> Result<()> {
    let file = CvFile::from_path(path).await?;
    println!("🤖 Processing {}...", file.name);

    match editor.upload_cv(&file).await? {
        UploadOutcome::Parsed { skills } => {
            println!("✅ {} parsed • {} skills extracted", file.name, skills);
        }
        UploadOutcome::Stale => {
            println!("Result for {} was superseded by a newer upload", file.name);
        }
    }
    Ok(())
}

fn print_profile(snapshot: &ProfileSnapshot) {
    for field in FormField::ALL {
        let value = snapshot.form.get(field);
        if !value.is_empty() {
            println!("  {:<20} {}", field.label(), value);
        }
    }

    let skills = snapshot.cv_data.skill_names();
    if !skills.is_empty() {
        println!("  {:<20} {}", "Skills", skills.join(", "));
    }
    if !snapshot.cv_data.education.is_empty() {
        println!("  {:<20} {}", "Education", snapshot.cv_data.education);
    }
    if !snapshot.cv_data.work_experience.is_empty() {
        println!(
            "  {:<20} {} positions",
            "Work Experience",
            snapshot.cv_data.work_experience.len()
        );
    }
}
