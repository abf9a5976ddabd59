use mindscan_core::credentials::{validate_password, validate_username};
use mindscan_core::AccountStore;

use crate::app::{resolve_password, AppContext};
use crate::cli::{LoginArgs, SignupArgs};
use crate::errors::CliError;

pub fn handle_signup(ctx: &AppContext, args: &SignupArgs) -> anyhow::Result<()> {
    let credentials = &args.credentials;
    validate_username(&credentials.user)?;
    let password = resolve_password(credentials, true)?;
    validate_password(&password)?;

    let store = ctx.open_store()?;
    if !store.add_user(&credentials.user, &password)? {
        return Err(CliError::invalid_input(format!(
            "Username \"{}\" already exists.",
            credentials.user
        ))
        .into());
    }

    if !ctx.quiet() {
        println!("Account created. Log in with `mindscan login --user {}`.", credentials.user);
    }
    Ok(())
}

pub fn handle_login(ctx: &AppContext, args: &LoginArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let session = ctx.authenticate(&store, &args.credentials)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else if ctx.quiet() {
        println!("{}", session.user_id);
    } else {
        println!("Welcome, {}! (user id {})", session.username, session.user_id);
    }
    Ok(())
}
