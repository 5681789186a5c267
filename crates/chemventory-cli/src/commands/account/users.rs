//! Admin-only management of the application user list.

use chrono::{TimeZone, Utc};

use crate::app::{exit_not_found_with_hint, AppContext};
use crate::cli::{UsersAddArgs, UsersListArgs, UsersRemoveArgs};
use crate::errors::CliError;
use crate::output::print_json;
use crate::ui::format::format_datetime;
use crate::ui::{hint, print, receipt, table, Column};

const USER_COLUMNS: [Column; 3] = [Column::new("#"), Column::new("Email"), Column::new("Added")];

pub fn handle_users_list(ctx: &AppContext<'_>, args: &UsersListArgs) -> anyhow::Result<()> {
    ctx.require_admin()?;
    let users = ctx.users()?.list();

    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        return print_json(&users);
    }
    if users.is_empty() {
        if !ctx.quiet() {
            print(
                &ui_ctx,
                &hint(&ui_ctx, "No users yet. Add one with `chemventory users add <email>`."),
            );
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let added = Utc
                .timestamp_millis_opt(user.id)
                .single()
                .map(|at| format_datetime(&at, ui_ctx.mode.is_pretty()))
                .unwrap_or_else(|| user.id.to_string());
            vec![(i + 1).to_string(), user.email.clone(), added]
        })
        .collect();
    print(&ui_ctx, &table(&ui_ctx, &USER_COLUMNS, &rows));
    Ok(())
}

pub fn handle_users_add(ctx: &AppContext<'_>, args: &UsersAddArgs) -> anyhow::Result<()> {
    ctx.require_admin()?;
    let entry = ctx
        .users()?
        .add(&args.email)?
        .ok_or_else(|| CliError::invalid_input("Email cannot be empty"))?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Added user", &[("Email", entry.email.as_str())]),
        );
    }
    Ok(())
}

pub fn handle_users_remove(ctx: &AppContext<'_>, args: &UsersRemoveArgs) -> anyhow::Result<()> {
    ctx.require_admin()?;
    let users = ctx.users()?;
    let removed = match args.position.checked_sub(1) {
        Some(index) => users.remove(index)?,
        None => None,
    };
    let removed = removed.unwrap_or_else(|| {
        exit_not_found_with_hint(
            &format!("No user at position {}", args.position),
            "Hint: Run `chemventory users list` to see positions.",
        )
    });

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Removed user", &[("Email", removed.email.as_str())]),
        );
    }
    Ok(())
}
