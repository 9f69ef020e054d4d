use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{block as output_block, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::ledger::{
    compute_totals, sort_for_display, Persist, Transaction, TransactionDraft, TransactionKind,
    DATE_FORMAT,
};

const ADD_USAGE: &str = "add <income|expense> <amount> <date|today> [category] [note]";
const EDIT_USAGE: &str = "edit <id> [type=..] [amount=..] [date=..] [category=..] [note=..]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record an income or expense", ADD_USAGE, cmd_add),
        CommandEntry::new(
            "edit",
            "Change fields of a transaction, keeping its id",
            EDIT_USAGE,
            cmd_edit,
        ),
        CommandEntry::new("remove", "Delete a transaction", "remove <id>", cmd_remove)
            .with_aliases(&["rm", "delete"]),
        CommandEntry::new(
            "list",
            "Show transactions, newest first",
            "list",
            cmd_list,
        )
        .with_aliases(&["ls"]),
        CommandEntry::new(
            "summary",
            "Show income, expense, and balance",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new("clear", "Delete every transaction", "clear", cmd_clear),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 3 || args.len() > 5 {
        return Err(CommandError::InvalidArguments(format!("usage: {ADD_USAGE}")));
    }
    let kind: TransactionKind = args[0].parse()?;
    let date = resolve_date(context, args[2]);
    let draft = TransactionDraft::new(kind, args[1], date)
        .with_category(args.get(3).copied().unwrap_or_default())
        .with_note(args.get(4).copied().unwrap_or_default());
    let txn = context.book.add(&draft)?;
    io::print_success(format!(
        "Recorded {} {} on {} (id {}).",
        txn.kind,
        context.format_amount(txn.amount_i64()),
        txn.date.format(DATE_FORMAT),
        txn.id
    ));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (id, assignments) = match args.split_first() {
        Some((id, rest)) if !rest.is_empty() => (parse_id(id)?, rest),
        _ => return Err(CommandError::InvalidArguments(format!("usage: {EDIT_USAGE}"))),
    };
    let existing = context
        .book
        .get(id)
        .ok_or_else(|| CommandError::InvalidArguments(format!("no transaction with id {id}")))?;
    let mut draft = TransactionDraft::from_transaction(existing);
    for assignment in assignments {
        let (field, value) = assignment.split_once('=').ok_or_else(|| {
            CommandError::InvalidArguments(format!("expected field=value, got `{assignment}`"))
        })?;
        match field.trim().to_lowercase().as_str() {
            "type" => draft.kind = value.parse()?,
            "amount" => draft.amount = value.to_string(),
            "date" => draft.date = resolve_date(context, value),
            "category" => draft.category = value.to_string(),
            "note" => draft.note = value.to_string(),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{other}` (type, amount, date, category, note)"
                )))
            }
        }
    }
    let txn = context.book.update(id, &draft)?;
    io::print_success(format!("Updated transaction {}.", txn.id));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = match args {
        [id] => parse_id(id)?,
        _ => return Err(CommandError::InvalidArguments("usage: remove <id>".into())),
    };
    if context.book.get(id).is_none() {
        io::print_warning(format!("No transaction with id {id}."));
        return Ok(());
    }
    if !context.confirm("Delete this transaction?")? {
        io::print_info("Nothing deleted.");
        return Ok(());
    }
    context.book.remove(id, Persist::Now)?;
    io::print_success(format!("Deleted transaction {id}."));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let visible = context.visible_transactions();
    match &context.filter {
        Some(range) => output_section(format!("Transactions {range}")),
        None => output_section("Transactions"),
    }
    if visible.is_empty() {
        io::print_warning("No transactions recorded.");
        return Ok(());
    }
    output_block(&render_transactions(context, &visible));
    print_totals(context, &visible);
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let visible = context.visible_transactions();
    output_section("Summary");
    print_totals(context, &visible);
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.book.is_empty() {
        io::print_info("Ledger is already empty.");
        return Ok(());
    }
    if !context.confirm("Delete all transactions? This cannot be undone.")? {
        io::print_info("Nothing deleted.");
        return Ok(());
    }
    let removed = context.book.clear()?;
    io::print_success(format!("Deleted {removed} transaction(s)."));
    Ok(())
}

pub(crate) fn render_transactions(context: &ShellContext, transactions: &[Transaction]) -> String {
    let mut table = Table::new(vec![
        TableColumn::right("ID"),
        TableColumn::left("Date"),
        TableColumn::left("Type"),
        TableColumn::right("Amount"),
        TableColumn::left("Category").max_width(20),
        TableColumn::left("Note").max_width(40),
    ]);
    for txn in sort_for_display(transactions) {
        table.push_row(vec![
            txn.id.to_string(),
            txn.date.format(DATE_FORMAT).to_string(),
            txn.kind.to_string(),
            context.format_amount(txn.amount_i64()),
            placeholder(&txn.category),
            placeholder(&txn.note),
        ]);
    }
    table.render()
}

fn print_totals(context: &ShellContext, transactions: &[Transaction]) {
    let totals = compute_totals(transactions);
    io::print_info(format!("  Income  : {}", context.format_amount(totals.income)));
    io::print_info(format!("  Expense : {}", context.format_amount(totals.expense)));
    io::print_info(format!("  Balance : {}", context.format_amount(totals.balance)));
}

fn placeholder(text: &str) -> String {
    if text.is_empty() {
        "-".to_string()
    } else {
        text.to_string()
    }
}

fn parse_id(raw: &str) -> Result<u64, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid transaction id `{raw}`")))
}

fn resolve_date(context: &ShellContext, raw: &str) -> String {
    if raw.eq_ignore_ascii_case("today") {
        context.book.clock().today().format(DATE_FORMAT).to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::CliMode;
    use tempfile::TempDir;

    #[test]
    fn rendered_rows_follow_display_order() {
        let temp = TempDir::new().unwrap();
        let mut context =
            ShellContext::with_base_dir(CliMode::Script, temp.path().to_path_buf()).unwrap();
        context
            .process_line("add income 50000 2024-01-01 Salary")
            .unwrap();
        context
            .process_line("add expense 20000 2024-01-02 Food")
            .unwrap();
        let rendered = render_transactions(&context, context.book.transactions());
        let body: Vec<&str> = rendered.lines().skip(2).collect();
        assert!(body[0].contains("2024-01-02") && body[0].contains("Rp 20.000"));
        assert!(body[1].contains("2024-01-01") && body[1].contains("Salary"));
    }

    #[test]
    fn today_resolves_through_the_book_clock() {
        let temp = TempDir::new().unwrap();
        let context =
            ShellContext::with_base_dir(CliMode::Script, temp.path().to_path_buf()).unwrap();
        let today = context.book.clock().today().format(DATE_FORMAT).to_string();
        assert_eq!(resolve_date(&context, "TODAY"), today);
        assert_eq!(resolve_date(&context, "2024-01-01"), "2024-01-01");
    }

    #[test]
    fn add_rejects_wrong_arity() {
        let temp = TempDir::new().unwrap();
        let mut context =
            ShellContext::with_base_dir(CliMode::Script, temp.path().to_path_buf()).unwrap();
        let err = context.process_line("add income 5").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }
}
