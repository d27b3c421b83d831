use anyhow::{anyhow, Result};
use colored::Colorize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    access::GateState,
    app::{init_config, AppState},
    gateway::{Credentials, PasswordChange, Statement},
    i18n::{translate, Locale, MessageKey},
    session::Session,
    utils::PartnerError,
};

use super::{AccessCommand, Commands, OutputFormat};

/// Handle CLI subcommands against restored app state
pub async fn handle_command(
    command: &Commands,
    state: &AppState,
    format: OutputFormat,
) -> Result<()> {
    let locale = state.display_locale().await;

    match command {
        Commands::Init => {
            println!("Initializing Beebot partner configuration...");
            match init_config()? {
                Some(path) => println!("Created default configuration at: {}", path.display()),
                None => println!("Configuration already exists"),
            }
            Ok(())
        }
        Commands::Login { username, password } => {
            let mut store = state.session.write().await;
            let session = store
                .login(&Credentials::new(username.as_str(), password.as_str()))
                .await
                .map_err(|e| fail(e, &locale))?;

            let role = if session.is_brand_ambassador() {
                " (brand ambassador)"
            } else {
                ""
            };
            println!("{} {}{}", "Logged in as".green(), username.bold(), role);
            Ok(())
        }
        Commands::Logout => {
            let handle = state.session.write().await.logout();
            if let Some(handle) = handle {
                // Outcome is logged by the task itself
                if let Err(e) = handle.await {
                    debug!("Logout notification task aborted: {}", e);
                }
            }
            println!("{}", "Logged out".green());
            Ok(())
        }
        Commands::Whoami => {
            let mut store = state.session.write().await;
            let session = store
                .refresh_identity()
                .await
                .map_err(|e| fail(e, &locale))?;
            print_identity(session, format);
            Ok(())
        }
        Commands::Status => {
            let store = state.session.read().await;
            let access = state.access.read().await;
            print_status(store.session(), access.state(), &locale, format);
            Ok(())
        }
        Commands::Locale { tag } => {
            let changed = state
                .session
                .write()
                .await
                .change_locale(tag)
                .await
                .map_err(|e| fail_or(e, &locale, MessageKey::ChangeLangFailed))?;
            println!("{}", translate(MessageKey::ChangeLangSuccess, &changed).green());
            Ok(())
        }
        Commands::Theme { theme } => {
            state
                .session
                .write()
                .await
                .change_theme(theme.is_dark())
                .await
                .map_err(|e| fail_or(e, &locale, MessageKey::ChangeThemeFailed))?;
            println!("{}", translate(MessageKey::ChangeThemeSuccess, &locale).green());
            Ok(())
        }
        Commands::Password {
            current,
            new,
            confirm,
        } => {
            let change = PasswordChange {
                current: current.clone(),
                password: new.clone(),
                password_confirmation: confirm.clone(),
            };
            state
                .session
                .read()
                .await
                .change_password(&change)
                .await
                .map_err(|e| fail(e, &locale))?;
            println!(
                "{}",
                translate(MessageKey::ChangePasswordSuccess, &locale).green()
            );
            Ok(())
        }
        Commands::Access { command } => handle_access(command, state, &locale).await,
        Commands::Bills => show_statement(state, &Statement::Bills, &locale, format).await,
        Commands::Cashback { periods, month } => {
            let statement = if *periods {
                Statement::CashbackPeriods
            } else {
                Statement::Cashbacks {
                    month: month.clone(),
                }
            };
            show_statement(state, &statement, &locale, format).await
        }
        Commands::Version => {
            show_version();
            Ok(())
        }
    }
}

async fn handle_access(command: &AccessCommand, state: &AppState, locale: &Locale) -> Result<()> {
    let store = state.session.read().await;
    let session = store.session();
    let mut access = state.access.write().await;

    let message = match command {
        AccessCommand::Status => {
            let gate = access.probe(session).await.map_err(|e| fail(e, locale))?;
            gate_message(gate, locale).to_string()
        }
        AccessCommand::Enter { pin } => access
            .enter_pin(session, pin)
            .await
            .map_err(|e| fail_or(e, locale, MessageKey::OwnerAccessFailed))?
            .unwrap_or_else(|| translate(MessageKey::OwnerAccessSuccess, locale).to_string()),
        AccessCommand::Set { pin } => access
            .set_pin(session, pin)
            .await
            .map_err(|e| fail_or(e, locale, MessageKey::OwnerAccessFailed))?
            .unwrap_or_else(|| translate(MessageKey::OwnerAccessSuccess, locale).to_string()),
        AccessCommand::Disable => {
            access.disable();
            translate(MessageKey::OwnerAccessDisabled, locale).to_string()
        }
    };

    println!("{}", message.green());
    Ok(())
}

async fn show_statement(
    state: &AppState,
    statement: &Statement,
    locale: &Locale,
    format: OutputFormat,
) -> Result<()> {
    let store = state.session.read().await;
    let data = state
        .access
        .write()
        .await
        .fetch_statement(store.session(), statement)
        .await
        .map_err(|e| fail(e, locale))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&data)?),
        OutputFormat::Text => println!("{}", serde_json::to_string_pretty(&data)?),
    }
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("Beebot Partner v{}", env!("CARGO_PKG_VERSION"));
    println!("   Session and owner-access client for Beebot partners");
}

fn print_identity(session: &Session, format: OutputFormat) {
    let Some(profile) = session.profile() else {
        return;
    };

    if format == OutputFormat::Json {
        let mut value = serde_json::to_value(profile).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.insert(
                "brandAmbassador".to_string(),
                json!(session.is_brand_ambassador()),
            );
        }
        println!("{}", value);
        return;
    }

    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    println!("  Username:   {}", field(&profile.username).bold());
    println!("  Name:       {}", field(&profile.name));
    println!("  Email:      {}", field(&profile.email));
    if session.is_brand_ambassador() {
        println!("  Role:       {}", "Brand ambassador".cyan());
    }
}

fn print_status(session: &Session, gate: GateState, locale: &Locale, format: OutputFormat) {
    let username = session.profile().and_then(|p| p.username.clone());

    if format == OutputFormat::Json {
        let status = json!({
            "loggedIn": session.is_logged_in(),
            "username": username,
            "brandAmbassador": session.is_brand_ambassador(),
            "locale": locale.as_str(),
            "darkMode": session.dark_mode(),
            "ownerAccess": format!("{:?}", gate),
        });
        println!("{}", status);
        return;
    }

    println!("Beebot Partner Status:");
    println!();
    match username {
        Some(name) if session.is_logged_in() => {
            println!("  [OK] Session: logged in as {}", name.bold())
        }
        _ if session.is_logged_in() => println!("  [OK] Session: logged in"),
        _ => println!("  [WARNING] Session: logged out"),
    }
    if session.is_brand_ambassador() {
        println!("      • Brand ambassador dashboard");
    }
    println!("  Locale:     {}", locale);
    println!(
        "  Theme:      {}",
        if session.dark_mode() { "dark" } else { "light" }
    );
    let gate_line = match gate {
        GateState::Unknown => "not checked (run `access status`)".to_string(),
        other => gate_message(other, locale).to_string(),
    };
    println!("  Owner:      {}", gate_line);
    println!();
}

fn gate_message(gate: GateState, locale: &Locale) -> &'static str {
    let key = match gate {
        GateState::NoPinConfigured => MessageKey::OwnerAccessNotExists,
        GateState::PinConfiguredUnlocked => MessageKey::OwnerAccessEnabled,
        GateState::Unknown | GateState::PinConfiguredLocked => MessageKey::OwnerAccessDisabled,
    };
    translate(key, locale)
}

/// Validation errors are labelled with their form field
fn fail(err: PartnerError, locale: &Locale) -> anyhow::Error {
    match &err {
        PartnerError::Validation(invalid) => {
            anyhow!("{}: {}", invalid.field(), err.display_message(locale))
        }
        _ => anyhow!(err.display_message(locale)),
    }
}

/// Like `fail`, but a failure without a server message reads as `fallback`
fn fail_or(err: PartnerError, locale: &Locale, fallback: MessageKey) -> anyhow::Error {
    match err {
        PartnerError::Internal => anyhow!(translate(fallback, locale)),
        other => fail(other, locale),
    }
}
