//! Write a default config file and create the data directory.

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_data_dir, write_config, ChemventoryConfig};
use crate::ui::{hint, print, receipt};

pub fn handle_init(ctx: &AppContext<'_>, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {}\nHint: Pass --force to overwrite it.",
            config_path.display()
        ));
    }

    // Without --data-dir the XDG default is written out explicitly.
    let data_dir = match ctx.cli_data_dir() {
        Some(dir) => dir.into(),
        None => default_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create data directory {}: {}",
            data_dir.display(),
            e
        )
    })?;

    let config = ChemventoryConfig::new(data_dir.clone(), args.url.clone(), args.anon_key.clone());
    write_config(&config_path, &config)?;

    let ui_ctx = ctx.ui_context(false, None);
    if !ctx.quiet() {
        let backend = if config.remote_config().is_some() {
            "remote"
        } else {
            "local"
        };
        let config_display = config_path.display().to_string();
        let data_display = data_dir.display().to_string();
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Wrote config",
                &[
                    ("Config", config_display.as_str()),
                    ("Data Dir", data_display.as_str()),
                    ("Backend", backend),
                ],
            ),
        );
        if ui_ctx.mode.is_pretty() {
            print(
                &ui_ctx,
                &hint(&ui_ctx, "Run `chemventory seed` to load sample chemicals."),
            );
        }
    }
    Ok(())
}
