use mindscan_core::storage::MigrationOutcome;

use crate::app::AppContext;
use crate::errors::CliError;

pub fn handle_migrate(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    if ctx.quiet() {
        return Ok(());
    }

    match store.migration() {
        MigrationOutcome::Current => println!("Schema is up to date."),
        MigrationOutcome::Rebuilt {
            previous_columns,
            rows_copied,
        } => {
            println!("Rebuilt entries table.");
            println!("- previous columns: {}", previous_columns.join(", "));
            println!("- rows copied: {}", rows_copied);
        }
    }

    let orphaned = store.orphaned_entry_count()?;
    if orphaned > 0 {
        println!(
            "Note: {} entries predate accounts and are not shown in any user's trends.",
            orphaned
        );
    }
    Ok(())
}

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    match store.check_schema() {
        Ok(()) => {
            if !ctx.quiet() {
                println!("Schema check: OK");
                println!("- entries columns: {}", store.entries_columns()?.join(", "));
                println!("- unique usernames: OK");
                println!("- ownerless entries: {}", store.orphaned_entry_count()?);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("Schema check: FAILED");
            eprintln!("- error: {}", err);
            Err(CliError::CheckFailed("Schema check failed".to_string()).into())
        }
    }
}
