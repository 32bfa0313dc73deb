//! Perms command - show or change guild permissions

use crate::cli::args::{PermsAction, PermsArgs};
use crate::cli::commands::blocking;
use crate::config::Config;
use crate::error::HoardResult;
use crate::records::GuildPermissions;
use crate::ui;

/// Execute the perms command
pub async fn execute(args: PermsArgs, config: &Config) -> HoardResult<()> {
    let config = config.clone();

    match args.action {
        PermsAction::Show { gid } => {
            let perms = blocking(move || Ok(config.open_permissions().guild(gid))).await?;
            print_permissions(&perms);
        }
        PermsAction::Lock { gid } => {
            let changed = blocking(move || config.open_permissions().set_locked(gid, true)).await?;
            report(changed, &format!("Guild {} locked to admins", gid));
        }
        PermsAction::Unlock { gid } => {
            let changed =
                blocking(move || config.open_permissions().set_locked(gid, false)).await?;
            report(changed, &format!("Guild {} unlocked", gid));
        }
        PermsAction::Admin { gid, uid, remove } => {
            let changed = blocking(move || {
                let mut book = config.open_permissions();
                if remove {
                    book.remove_admin(gid, uid)
                } else {
                    book.add_admin(gid, uid)
                }
            })
            .await?;
            let verb = if remove { "revoked from" } else { "granted to" };
            report(changed, &format!("Admin {} user {} in guild {}", verb, uid, gid));
        }
        PermsAction::Blacklist { gid, uid, remove } => {
            let changed = blocking(move || {
                let mut book = config.open_permissions();
                if remove {
                    book.unblacklist(gid, uid)
                } else {
                    book.blacklist(gid, uid)
                }
            })
            .await?;
            let verb = if remove { "removed from" } else { "added to" };
            report(changed, &format!("User {} {} blacklist of guild {}", uid, verb, gid));
        }
    }

    Ok(())
}

fn report(changed: bool, message: &str) {
    if changed {
        ui::step_ok(message);
    } else {
        ui::step_skip(&format!("{} (already so)", message));
    }
}

fn print_permissions(perms: &GuildPermissions) {
    ui::section(&format!("Guild {}", perms.gid));
    ui::key_value("Locked", if perms.locked { "yes" } else { "no" });
    ui::key_value("Admins", &join_ids(&perms.users.admin));
    ui::key_value("Blacklisted", &join_ids(&perms.users.blacklisted));
}

fn join_ids(ids: &[u64]) -> String {
    if ids.is_empty() {
        return "none".to_string();
    }
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
