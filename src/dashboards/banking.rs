use super::payload::{Cell, RecordTable, SectionPayload};
use super::SectionDef;
use crate::format;

pub const SECTIONS: &[SectionDef] = &[
    SectionDef {
        id: "accounts",
        title: "Accounts",
        icon: "▣",
        failure_message: "failed to load accounts",
        build: accounts,
    },
    SectionDef {
        id: "transactions",
        title: "Transactions",
        icon: "⇄",
        failure_message: "failed to load transactions",
        build: transactions,
    },
    SectionDef {
        id: "cards",
        title: "Cards",
        icon: "▭",
        failure_message: "failed to load cards",
        build: cards,
    },
];

fn accounts() -> SectionPayload {
    let table = RecordTable::new(["Account", "Number", "Balance", "Rate"])
        .row(vec![
            Cell::text("Operating"),
            Cell::text(format::masked("GB29 NWBK 6016 1331 9268 19")),
            Cell::money(4_812_233),
            Cell::Percent(0.1),
        ])
        .row(vec![
            Cell::text("Payroll"),
            Cell::text(format::masked("GB94 BARC 1020 1530 0934 59")),
            Cell::money(1_200_000),
            Cell::Percent(0.0),
        ])
        .row(vec![
            Cell::text("Reserve savings"),
            Cell::text(format::masked("GB33 BUKB 2020 1555 5555 55")),
            Cell::money(25_000_000),
            Cell::Percent(4.25),
        ])
        .row(vec![
            Cell::text("Credit line"),
            Cell::text(format::masked("7710")),
            Cell::money(-1_730_450),
            Cell::Percent(f64::NAN),
        ]);
    SectionPayload::records(table)
}

fn transactions() -> SectionPayload {
    let table = RecordTable::new(["Date", "Description", "Account", "Amount"])
        .row(vec![
            Cell::date("2024-03-18"),
            Cell::text("Card settlement"),
            Cell::text("Operating"),
            Cell::money(-312_940),
        ])
        .row(vec![
            Cell::date("2024-03-18"),
            Cell::text("Customer payment INV-1042"),
            Cell::text("Operating"),
            Cell::money(1_480_000),
        ])
        .row(vec![
            Cell::date("2024-03-15 16:20:00"),
            Cell::text("Payroll transfer"),
            Cell::text("Payroll"),
            Cell::money(-9_400_000),
        ])
        .row(vec![
            Cell::date("2024-03-15"),
            Cell::text("Interest"),
            Cell::text("Reserve savings"),
            Cell::money(88_541),
        ])
        .row(vec![
            Cell::date("14.03.2024"),
            Cell::text("Line draw"),
            Cell::text("Credit line"),
            Cell::money(-500_000),
        ])
        .row(vec![
            Cell::Date(None),
            Cell::text("Pending wire"),
            Cell::text("Operating"),
            Cell::Currency(None),
        ])
        .row(vec![
            Cell::date("2024-03-12"),
            Cell::text("Bank fee"),
            Cell::text("Operating"),
            Cell::money(-2_500),
        ])
        .row(vec![
            Cell::date("2024-03-11"),
            Cell::text("Contoso Cloud"),
            Cell::text("Operating"),
            Cell::money(-98_000),
        ])
        .row(vec![
            Cell::date("2024-03-10"),
            Cell::text("Customer payment INV-1039"),
            Cell::text("Operating"),
            Cell::money(2_150_000),
        ]);
    SectionPayload::records(table)
}

fn cards() -> SectionPayload {
    let table = RecordTable::new(["Card", "Holder", "Limit", "Spent", "Expires"])
        .row(vec![
            Cell::text(format::masked("4111 1111 1111 4821")),
            Cell::text("A. Okafor"),
            Cell::money(1_000_000),
            Cell::money(312_940),
            Cell::date("2026-09-30"),
        ])
        .row(vec![
            Cell::text(format::masked("5500 0000 0000 0004")),
            Cell::text("J. Lindqvist"),
            Cell::money(500_000),
            Cell::money(48_215),
            Cell::date("2025-01-31"),
        ])
        .row(vec![
            Cell::text(format::masked("3400 000000 00009")),
            Cell::text("Shared travel"),
            Cell::Currency(None),
            Cell::money(0),
            Cell::Date(None),
        ]);
    SectionPayload::records(table)
}
