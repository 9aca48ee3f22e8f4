use chrono::{NaiveDate, NaiveDateTime};
use resortlib::{
    classify, classify_item, classify_ledger, classify_with,
    model::{
        CategoryKind, Discount, Ledger, LedgerKind, LineLabel, PaymentRecord, StatusLabel,
    },
    report::render_line,
    DuplicatePolicy, ResortError,
};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, d)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

fn pay(amount: &str, category: CategoryKind, d: u32) -> PaymentRecord {
    PaymentRecord {
        amount: dec(amount),
        category,
        payment_mode: "Cash".into(),
        paid_at: day(d),
        transaction_reference: None,
        discount: None,
    }
}

#[test]
fn down_payment_only_is_partial_with_mirrored_balance() {
    let s = classify(dec("5000"), &[pay("2500", CategoryKind::DownPayment, 1)]);
    assert_eq!(s.status, StatusLabel::PartiallyPaid);
    assert_eq!(s.remaining_balance, dec("2500"));
    assert_eq!(s.total_paid, dec("2500"));
    assert_eq!(s.lines.len(), 1);
    assert_eq!(s.lines[0].label, LineLabel::DownPayment);

    // остаток равен предоплате, даже если она не половина
    let uneven = classify(dec("5000"), &[pay("1000", CategoryKind::DownPayment, 1)]);
    assert_eq!(uneven.remaining_balance, dec("1000"));
    assert_eq!(uneven.billed_total(), dec("2000"));
}

#[test]
fn down_plus_balance_is_fully_paid() {
    let mut balance = pay("2500", CategoryKind::RemainingBalance, 5);
    balance.payment_mode = "GCash".into();
    let s = classify(
        dec("5000"),
        &[pay("2500", CategoryKind::DownPayment, 1), balance],
    );
    assert_eq!(s.status, StatusLabel::FullyPaid);
    assert_eq!(s.lines.len(), 2);
    assert_eq!(s.lines[0].label, LineLabel::DownPayment);
    assert_eq!(s.lines[1].label, LineLabel::RemainingBalancePayment);
    assert_eq!(s.remaining_balance, Decimal::ZERO);
    assert_eq!(s.payment_method().as_deref(), Some("Cash / GCash"));
}

#[test]
fn full_payment_alone() {
    let s = classify(dec("5000"), &[pay("5000", CategoryKind::FullPayment, 1)]);
    assert_eq!(s.status, StatusLabel::FullyPaid);
    assert_eq!(s.lines.len(), 1);
    assert_eq!(s.lines[0].label, LineLabel::FullPayment);
    assert_eq!(s.lines[0].label.name(), "Full Payment");
    assert_eq!(s.remaining_balance, Decimal::ZERO);
}

#[test]
fn down_plus_full_shows_complete_payment() {
    let s = classify(
        dec("5000"),
        &[
            pay("2500", CategoryKind::DownPayment, 1),
            pay("2500", CategoryKind::FullPayment, 3),
        ],
    );
    assert_eq!(s.status, StatusLabel::FullyPaid);
    let labels: Vec<&str> = s.lines.iter().map(|l| l.label.name()).collect();
    assert_eq!(labels, vec!["Down Payment", "Complete Payment"]);
}

#[test]
fn nothing_recognized_is_unpaid() {
    let empty = classify(dec("1200"), &[]);
    assert_eq!(empty.status, StatusLabel::Unpaid);
    assert_eq!(empty.remaining_balance, dec("1200"));
    assert!(empty.lines.is_empty());
    assert_eq!(empty.payment_method(), None);

    let other = classify(dec("1200"), &[pay("100", CategoryKind::Uncategorized, 2)]);
    assert_eq!(other.status, StatusLabel::Unpaid);
    assert_eq!(other.remaining_balance, dec("1200"));
    assert_eq!(other.total_paid, dec("100"));
}

#[test]
fn short_full_payment_keeps_balance() {
    let s = classify(dec("5000"), &[pay("4500", CategoryKind::FullPayment, 1)]);
    assert_eq!(s.status, StatusLabel::FullyPaid);
    assert_eq!(s.remaining_balance, dec("500"));
}

#[test]
fn overpayment_counts_as_paid() {
    let s = classify(dec("5000"), &[pay("5200", CategoryKind::FullPayment, 1)]);
    assert_eq!(s.status, StatusLabel::FullyPaid);
    assert_eq!(s.remaining_balance, Decimal::ZERO);
}

#[test]
fn classification_is_idempotent() {
    let records = vec![
        pay("2500", CategoryKind::DownPayment, 1),
        pay("2500", CategoryKind::RemainingBalance, 4),
    ];
    assert_eq!(classify(dec("5000"), &records), classify(dec("5000"), &records));
}

#[test]
fn duplicate_categories_follow_policy() {
    let records = vec![
        pay("1000", CategoryKind::DownPayment, 1),
        pay("1500", CategoryKind::DownPayment, 2),
    ];

    let last_wins = classify_with(DuplicatePolicy::LastWins, "cabin#1", dec("5000"), &records)
        .expect("last wins never fails");
    assert_eq!(last_wins.lines[0].amount, dec("1500"));
    assert_eq!(last_wins.total_paid, dec("2500"));
    assert_eq!(last_wins.remaining_balance, dec("1500"));

    let err = classify_with(DuplicatePolicy::Reject, "cabin#1", dec("5000"), &records).unwrap_err();
    assert!(matches!(err, ResortError::DuplicateCategory { .. }));
}

#[test]
fn single_item_rules() {
    let unpaid = classify_item("food_order#7", dec("350"), &[]).unwrap();
    assert_eq!(unpaid.status, StatusLabel::Unpaid);
    assert_eq!(unpaid.remaining_balance, dec("350"));

    let partial = classify_item("food_order#7", dec("350"), &[pay("200", CategoryKind::FullPayment, 2)])
        .unwrap();
    assert_eq!(partial.status, StatusLabel::PartiallyPaid);
    assert_eq!(partial.remaining_balance, dec("150"));
    assert_eq!(partial.lines[0].label, LineLabel::AmountPaid);

    let paid = classify_item("food_order#7", dec("350"), &[pay("350", CategoryKind::FullPayment, 2)])
        .unwrap();
    assert_eq!(paid.status, StatusLabel::FullyPaid);
    assert!(paid.is_settled());
    assert!(!unpaid.is_settled());

    let mut discounted = pay("315", CategoryKind::FullPayment, 2);
    discounted.discount = Some(Discount {
        name: "Senior".into(),
        percent: Some(dec("10")),
    });
    let with_discount = classify_item("activity#3", dec("315"), &[discounted.clone()]).unwrap();
    assert_eq!(with_discount.status, StatusLabel::FullyPaidWithDiscount);
    assert!(with_discount.is_settled());

    // оплачено по цене со скидкой
    let at_discount = classify_item("food_order#7", dec("350"), &[discounted.clone()]).unwrap();
    assert_eq!(at_discount.status, StatusLabel::FullyPaidWithDiscount);
    assert_eq!(at_discount.remaining_balance, Decimal::ZERO);
    assert_eq!(at_discount.total_due, dec("350"));

    // скидка есть, но и со скидкой остаток положительный
    let short = classify_item("activity#3", dec("400"), &[discounted]).unwrap();
    assert_eq!(short.status, StatusLabel::PartiallyPaid);
    assert_eq!(short.remaining_balance, dec("45"));
    assert!(!short.is_settled());

    // скидка без процента не уменьшает сумму
    let mut named_only = pay("315", CategoryKind::FullPayment, 2);
    named_only.discount = Some(Discount {
        name: "Promo".into(),
        percent: None,
    });
    let named = classify_item("activity#4", dec("350"), &[named_only]).unwrap();
    assert_eq!(named.status, StatusLabel::PartiallyPaid);
    assert_eq!(named.remaining_balance, dec("35"));

    let err = classify_item(
        "additional_fee#2",
        dec("100"),
        &[
            pay("50", CategoryKind::FullPayment, 1),
            pay("50", CategoryKind::FullPayment, 2),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, ResortError::TooManyItemPayments { count: 2, .. }));
}

#[test]
fn ledger_dispatch_by_kind() {
    let records = vec![pay("2500", CategoryKind::DownPayment, 1)];
    let cabin = Ledger {
        kind: LedgerKind::Cabin,
        reference: "42".into(),
        total_due: dec("5000"),
        payments: records.clone(),
    };
    let fee = Ledger {
        kind: LedgerKind::AdditionalFee,
        ..cabin.clone()
    };

    assert_eq!(
        classify_ledger(&cabin, DuplicatePolicy::LastWins).unwrap().lines[0].label,
        LineLabel::DownPayment
    );
    let item = classify_ledger(&fee, DuplicatePolicy::LastWins).unwrap();
    assert_eq!(item.lines[0].label, LineLabel::AmountPaid);
    assert_eq!(item.remaining_balance, dec("2500"));
}

#[test]
fn line_annotations_render_only_when_present() {
    let plain = classify(dec("5000"), &[pay("5000", CategoryKind::FullPayment, 5)]);
    assert_eq!(
        render_line(&plain.lines[0], "₱"),
        "Full Payment: ₱5,000.00 paid on October 5, 2026"
    );

    let mut record = pay("4500", CategoryKind::FullPayment, 5);
    record.transaction_reference = Some("GC-7781".into());
    record.discount = Some(Discount {
        name: "Early Bird".into(),
        percent: Some(dec("10.00")),
    });
    let annotated = classify(dec("5000"), &[record]);
    assert_eq!(
        render_line(&annotated.lines[0], "₱"),
        "Full Payment: ₱4,500.00 paid on October 5, 2026 Ref: GC-7781 (Early Bird 10% off)"
    );

    // пустые строки из хранилища не дают пустых меток
    let mut blank = pay("5000", CategoryKind::FullPayment, 5);
    blank.transaction_reference = Some("  ".into());
    blank.discount = Some(Discount {
        name: String::new(),
        percent: None,
    });
    let s = classify(dec("5000"), &[blank]);
    assert_eq!(s.lines[0].transaction_reference, None);
    assert_eq!(s.lines[0].discount, None);
}

#[test]
fn category_names_and_ids() {
    assert_eq!("Down Payment".parse::<CategoryKind>().unwrap(), CategoryKind::DownPayment);
    assert_eq!("full_payment".parse::<CategoryKind>().unwrap(), CategoryKind::FullPayment);
    assert_eq!(
        "Remaining Balance".parse::<CategoryKind>().unwrap(),
        CategoryKind::RemainingBalance
    );
    assert_eq!(CategoryKind::from_category_id(3).unwrap(), CategoryKind::RemainingBalance);
    assert!(CategoryKind::from_category_id(9).is_err());
    assert!(matches!(
        "Voucher".parse::<CategoryKind>(),
        Err(ResortError::UnknownCategory(_))
    ));
}
