pub mod add;
pub mod export;
pub mod import;
pub mod list;
pub mod remove;
pub mod seed;
pub mod show;
pub mod update;

pub use add::handle_add;
pub use export::handle_export;
pub use import::handle_import;
pub use list::handle_list;
pub use remove::handle_remove;
pub use seed::handle_seed;
pub use show::handle_show;
pub use update::handle_update;

use chemventory_core::ChemicalPatch;

use crate::cli::ChemicalFields;
use crate::helpers::{parse_date, parse_physical_state, parse_safety_class};

/// Hint shown whenever an ID doesn't match a chemical.
pub(crate) const NOT_FOUND_HINT: &str = "Hint: Run `chemventory list` to find chemical IDs.";

/// Validate the optional record fields shared by `add` and `update`.
pub(crate) fn fields_patch(fields: &ChemicalFields) -> anyhow::Result<ChemicalPatch> {
    let mut patch = ChemicalPatch::new();
    patch.brand = fields.brand.clone();
    patch.physical_state = fields
        .state
        .as_deref()
        .map(parse_physical_state)
        .transpose()?;
    patch.arrival_date = fields.arrival.as_deref().map(parse_date).transpose()?;
    patch.expiration_date = fields.expires.as_deref().map(parse_date).transpose()?;
    patch.safety_class = fields
        .safety_class
        .as_deref()
        .map(parse_safety_class)
        .transpose()?;
    patch.location = fields.location.clone();
    patch.ghs_symbol = fields.ghs.clone();
    Ok(patch)
}
