//! Voice command - show or change a user's voice preference

use crate::cli::args::VoiceArgs;
use crate::cli::commands::blocking;
use crate::config::Config;
use crate::error::HoardResult;
use crate::records::VoicePreference;
use crate::ui;

/// Execute the voice command
pub async fn execute(args: VoiceArgs, config: &Config) -> HoardResult<()> {
    let config = config.clone();
    let VoiceArgs {
        gid,
        uid,
        set_voice,
        set_speed,
        reset,
    } = args;

    if reset {
        let removed = blocking(move || config.open_preferences().reset(gid, uid)).await?;
        if removed {
            ui::step_ok(&format!("Voice preference of user {} reset", uid));
        } else {
            ui::step_skip(&format!("User {} had no stored preference", uid));
        }
        return Ok(());
    }

    let changing = set_voice.is_some() || set_speed.is_some();
    let pref = blocking(move || {
        let mut book = config.open_preferences();
        if changing {
            book.update(gid, uid, set_voice.as_deref(), set_speed)?;
        }
        Ok(book.get(gid, uid))
    })
    .await?;

    if changing {
        ui::step_ok(&format!("Voice preference of user {} saved", uid));
    }
    print_preference(&pref);

    Ok(())
}

fn print_preference(pref: &VoicePreference) {
    ui::section(&format!("User {} in guild {}", pref.uid, pref.gid));
    ui::key_value("Voice", &pref.voice);
    ui::key_value("Speed", &format!("{:.2}x", pref.speed));
}
