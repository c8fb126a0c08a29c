use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::ui::context::UiContext;

/// Ask for confirmation. `yes` or a non-interactive terminal answers for the user:
/// `yes` proceeds, otherwise non-interactive runs refuse.
pub fn confirm(ui: &UiContext, prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !ui.interactive() {
        anyhow::bail!("{prompt} Re-run with --yes to confirm non-interactively.");
    }
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}
