use daily_ledger::{
    currency::{format_amount, AmountFormat},
    init,
    ledger::{LedgerBook, TransactionDraft, TransactionKind},
    storage::MemoryStorage,
};

#[test]
fn ledger_smoke() {
    init();

    let mut book = LedgerBook::open(Box::new(MemoryStorage::new()));
    book.add(&TransactionDraft::new(TransactionKind::Income, "1250000", "2025-01-01"))
        .unwrap();
    book.add(
        &TransactionDraft::new(TransactionKind::Expense, "1500000", "2025-01-02")
            .with_category("Rent"),
    )
    .unwrap();

    let totals = book.totals();
    assert_eq!(totals.balance, -250_000);
    assert_eq!(
        format_amount(totals.balance, &AmountFormat::default()),
        "Rp -250.000"
    );
}
