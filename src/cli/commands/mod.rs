pub mod system;
pub mod transaction;
pub mod view;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in transaction::definitions()
        .into_iter()
        .chain(view::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}
