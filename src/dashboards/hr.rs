use super::payload::{Cell, Metric, RecordTable, SectionPayload, Trend};
use super::SectionDef;

pub const SECTIONS: &[SectionDef] = &[
    SectionDef {
        id: "employees",
        title: "Employees",
        icon: "☺",
        failure_message: "failed to load employees",
        build: employees,
    },
    SectionDef {
        id: "payroll",
        title: "Payroll",
        icon: "$",
        failure_message: "failed to load payroll",
        build: payroll,
    },
    SectionDef {
        id: "leave",
        title: "Leave",
        icon: "☼",
        failure_message: "failed to load leave requests",
        build: leave,
    },
];

fn employees() -> SectionPayload {
    let table = RecordTable::new(["Name", "Department", "Started", "Reports"])
        .row(vec![
            Cell::text("Amara Okafor"),
            Cell::text("Finance"),
            Cell::date("2019-06-03"),
            Cell::Count(4),
        ])
        .row(vec![
            Cell::text("Johan Lindqvist"),
            Cell::text("Engineering"),
            Cell::date("2021-01-11"),
            Cell::Count(7),
        ])
        .row(vec![
            Cell::text("Priya Raman"),
            Cell::text("Engineering"),
            Cell::date("2022-09-19"),
            Cell::Count(0),
        ])
        .row(vec![
            Cell::text("Mateo Alvarez"),
            Cell::text("Sales"),
            Cell::date("2020-02-28"),
            Cell::Count(3),
        ])
        .row(vec![
            Cell::text("Hana Sato"),
            Cell::text("People"),
            Cell::date("2023-11-06"),
            Cell::Count(1),
        ])
        .row(vec![
            Cell::text("Kwame Mensah"),
            Cell::text("Operations"),
            Cell::Date(None),
            Cell::Count(0),
        ])
        .row(vec![
            Cell::text("Elena Petrova"),
            Cell::text("Finance"),
            Cell::date("2018-04-16"),
            Cell::Count(2),
        ]);
    SectionPayload::records(table)
}

fn payroll() -> SectionPayload {
    SectionPayload::metrics(vec![
        Metric::new("Gross payroll", Cell::money(9_400_000), Trend::Up(1.8)),
        Metric::new("Employer taxes", Cell::money(1_034_000), Trend::Up(1.8)),
        Metric::new("Headcount", Cell::Count(57), Trend::Up(3.6)),
        Metric::new("Bonus pool", Cell::Currency(None), Trend::Flat),
        Metric::new("Next run", Cell::date("2024-03-29"), Trend::Flat),
    ])
}

fn leave() -> SectionPayload {
    let table = RecordTable::new(["Employee", "Type", "From", "Days", "Status"])
        .row(vec![
            Cell::text("Priya Raman"),
            Cell::text("Annual"),
            Cell::date("2024-04-08"),
            Cell::Count(5),
            Cell::text("Approved"),
        ])
        .row(vec![
            Cell::text("Mateo Alvarez"),
            Cell::text("Sick"),
            Cell::date("2024-03-18"),
            Cell::Count(2),
            Cell::text("Recorded"),
        ])
        .row(vec![
            Cell::text("Hana Sato"),
            Cell::text("Parental"),
            Cell::date("2024-05-01"),
            Cell::Count(90),
            Cell::text("Pending"),
        ])
        .row(vec![
            Cell::text("Johan Lindqvist"),
            Cell::text("Annual"),
            Cell::Date(None),
            Cell::Count(3),
            Cell::text("Draft"),
        ]);
    SectionPayload::records(table)
}
