use std::path::PathBuf;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::export::write_export;
use crate::ledger::DateRange;

const FILTER_USAGE: &str = "filter <from|-> [to|-] | filter clear";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "filter",
            "Limit list, summary, and export to a date range",
            FILTER_USAGE,
            cmd_filter,
        ),
        CommandEntry::new(
            "export",
            "Write the visible transactions to a CSV file",
            "export [directory]",
            cmd_export,
        ),
    ]
}

fn cmd_filter(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let range = match args {
        [] => {
            match &context.filter {
                Some(range) => io::print_info(format!("Active filter: {range}")),
                None => io::print_info("No filter active."),
            }
            return Ok(());
        }
        [keyword] if keyword.eq_ignore_ascii_case("clear") => None,
        [from] => Some(DateRange::parse(from, "")?),
        [from, to] => Some(DateRange::parse(from, to)?),
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "usage: {FILTER_USAGE}"
            )))
        }
    };

    context.filter = range.filter(|range| !range.is_unbounded());
    match &context.filter {
        Some(range) => io::print_success(format!(
            "Filter set to {range} ({} transaction(s) visible).",
            context.visible_transactions().len()
        )),
        None => io::print_success("Filter cleared."),
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = match args {
        [] => context.export_dir(),
        [dir] => PathBuf::from(dir),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: export [directory]".into(),
            ))
        }
    };
    let visible = context.visible_transactions();
    let path = write_export(&dir, &visible, context.book.clock().now())?;
    io::print_success(format!(
        "Exported {} transaction(s) to {}.",
        visible.len(),
        path.display()
    ));
    Ok(())
}
