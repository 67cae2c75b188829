use super::payload::{Cell, Metric, RecordTable, SectionPayload, Trend};
use super::SectionDef;

pub const SECTIONS: &[SectionDef] = &[
    SectionDef {
        id: "overview",
        title: "Overview",
        icon: "◎",
        failure_message: "failed to load the financial overview",
        build: overview,
    },
    SectionDef {
        id: "expenses",
        title: "Expenses",
        icon: "↓",
        failure_message: "failed to load expenses",
        build: expenses,
    },
    SectionDef {
        id: "invoices",
        title: "Invoices",
        icon: "✉",
        failure_message: "failed to load invoices",
        build: invoices,
    },
    SectionDef {
        id: "reports",
        title: "Reports",
        icon: "▤",
        failure_message: "failed to load reports",
        build: reports,
    },
];

fn overview() -> SectionPayload {
    SectionPayload::metrics(vec![
        Metric::new("Revenue (MTD)", Cell::money(18_452_000), Trend::Up(6.4)),
        Metric::new("Expenses (MTD)", Cell::money(9_870_550), Trend::Down(2.1)),
        Metric::new("Net margin", Cell::Percent(46.5), Trend::Up(3.2)),
        Metric::new("Open invoices", Cell::Count(37), Trend::Flat),
        Metric::new("Cash runway (months)", Cell::Count(14), Trend::Down(1.0)),
    ])
}

fn expenses() -> SectionPayload {
    let table = RecordTable::new(["Date", "Vendor", "Category", "Amount"])
        .row(vec![
            Cell::date("2024-03-01"),
            Cell::text("Northwind Office Supply"),
            Cell::text("Office"),
            Cell::money(48_215),
        ])
        .row(vec![
            Cell::date("2024-03-02"),
            Cell::text("Contoso Cloud"),
            Cell::text("Infrastructure"),
            Cell::money(1_250_000),
        ])
        .row(vec![
            Cell::date("03/03/2024"),
            Cell::text("Fabrikam Travel"),
            Cell::text("Travel"),
            Cell::money(312_940),
        ])
        .row(vec![
            Cell::date("2024-03-05"),
            Cell::text("Litware Legal"),
            Cell::text("Professional services"),
            Cell::Currency(None),
        ])
        .row(vec![
            Cell::date("2024-03-06"),
            Cell::text("Adventure Works Catering"),
            Cell::text("Meals"),
            Cell::money(86_400),
        ])
        .row(vec![
            Cell::date("pending"),
            Cell::text("Tailspin Telecom"),
            Cell::text("Utilities"),
            Cell::money(21_999),
        ])
        .row(vec![
            Cell::date("2024-03-09"),
            Cell::text("Wide World Importers"),
            Cell::text("Inventory"),
            Cell::money(2_745_100),
        ])
        .row(vec![
            Cell::date("2024-03-11"),
            Cell::text("Contoso Cloud"),
            Cell::text("Infrastructure"),
            Cell::money(98_000),
        ])
        .row(vec![
            Cell::date("2024-03-12"),
            Cell::text("Proseware Software"),
            Cell::text("Subscriptions"),
            Cell::money(59_900),
        ])
        .row(vec![
            Cell::date("2024-03-14T09:30:00Z"),
            Cell::text("Fabrikam Travel"),
            Cell::text("Travel"),
            Cell::money(-45_000),
        ]);
    SectionPayload::records(table)
}

fn invoices() -> SectionPayload {
    let table = RecordTable::new(["Invoice", "Customer", "Due", "Amount", "Status"])
        .row(vec![
            Cell::text("INV-1042"),
            Cell::text("Blue Yonder Airlines"),
            Cell::date("2024-03-15"),
            Cell::money(1_480_000),
            Cell::text("Paid"),
        ])
        .row(vec![
            Cell::text("INV-1043"),
            Cell::text("Coho Winery"),
            Cell::date("2024-03-20"),
            Cell::money(264_050),
            Cell::text("Overdue"),
        ])
        .row(vec![
            Cell::text("INV-1044"),
            Cell::text("Graphic Design Institute"),
            Cell::date("2024-04-01"),
            Cell::money(79_999),
            Cell::text("Sent"),
        ])
        .row(vec![
            Cell::text("INV-1045"),
            Cell::text("Margie's Travel"),
            Cell::Date(None),
            Cell::Currency(None),
            Cell::text("Draft"),
        ])
        .row(vec![
            Cell::text("INV-1046"),
            Cell::text("Trey Research"),
            Cell::date("2024-04-12"),
            Cell::money(5_300_000),
            Cell::text("Sent"),
        ])
        .row(vec![
            Cell::text("INV-1047"),
            Cell::text("Lucerne Publishing"),
            Cell::date("2024-04-18"),
            Cell::money(412_700),
            Cell::text("Paid"),
        ]);
    SectionPayload::records(table)
}

fn reports() -> SectionPayload {
    let table = RecordTable::new(["Report", "Period", "Generated", "Pages"])
        .row(vec![
            Cell::text("Profit & loss"),
            Cell::text("Q1 2024"),
            Cell::date("2024-04-02"),
            Cell::Count(12),
        ])
        .row(vec![
            Cell::text("Balance sheet"),
            Cell::text("Q1 2024"),
            Cell::date("2024-04-02"),
            Cell::Count(8),
        ])
        .row(vec![
            Cell::text("Cash flow"),
            Cell::text("March 2024"),
            Cell::date("2024-04-01"),
            Cell::Count(5),
        ])
        .row(vec![
            Cell::text("Tax provision"),
            Cell::text("FY 2023"),
            Cell::Date(None),
            Cell::Count(0),
        ]);
    SectionPayload::records(table)
}
