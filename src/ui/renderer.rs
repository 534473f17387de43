//! Text layout for every view.
//!
//! Each function returns the full text for one view, newline-terminated, so the
//! caller can print it in one write.
//!
//! # Example
//!
//! ```rust
//! use jsonland::ui::render_banner;
//! use jsonland::Account;
//!
//! let alice = Account::new("alice", "a@x.com", "p", "");
//! assert_eq!(render_banner(Some(&alice)), "Hello, alice\n");
//! assert_eq!(render_banner(None), "Not logged in\n");
//! ```

use crate::domain::{Account, Country};
use crate::search::SearchStatus;
use crate::ui::helpers::column;
use crate::ui::viewmodel::{CountryRow, DetailView};
use std::fmt::Write as _;

const CODE_WIDTH: usize = 3;
const NAME_WIDTH: usize = 32;
const REGION_WIDTH: usize = 10;
const CAPITAL_WIDTH: usize = 20;

/// Greeting line for the logged-in account.
#[must_use]
pub fn render_banner(user: Option<&Account>) -> String {
    match user {
        Some(account) => format!("Hello, {}\n", account.username),
        None => "Not logged in\n".to_string(),
    }
}

/// Table of countries, one per line, with a favorite marker column.
#[must_use]
pub fn render_country_list(countries: &[Country], user: Option<&Account>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {} {} {} {} POPULATION",
        column("CC", CODE_WIDTH),
        column("NAME", NAME_WIDTH),
        column("REGION", REGION_WIDTH),
        column("CAPITAL", CAPITAL_WIDTH),
    );
    for country in countries {
        let row = CountryRow::new(country, user);
        let _ = writeln!(
            out,
            "{} {} {} {} {} {}",
            row.favorite.symbol(),
            column(&row.code, CODE_WIDTH),
            column(&row.name, NAME_WIDTH),
            column(&row.region, REGION_WIDTH),
            column(&row.capital, CAPITAL_WIDTH),
            row.population,
        );
    }
    out
}

/// Labelled fields of one country.
#[must_use]
pub fn render_detail(country: &Country) -> String {
    let view = DetailView::from(country);
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.name);
    if let Some(official) = &view.official_name {
        let _ = writeln!(out, "({official})");
    }
    let fields = [
        ("Capital", &view.capital),
        ("Region", &view.region),
        ("Subregion", &view.subregion),
        ("Population", &view.population),
        ("Languages", &view.languages),
        ("Currencies", &view.currencies),
        ("Timezones", &view.timezones),
    ];
    for (label, value) in fields {
        let _ = writeln!(out, "  {label:<11} {value}");
    }
    if let Some(flag) = &view.flag {
        let _ = writeln!(out, "  {:<11} {flag}", "Flag");
    }
    if let Some(map) = &view.map {
        let _ = writeln!(out, "  {:<11} {map}", "Map");
    }
    out
}

/// The result area for the current search status.
#[must_use]
pub fn render_status(status: &SearchStatus, user: Option<&Account>) -> String {
    match status {
        SearchStatus::Idle => String::new(),
        SearchStatus::Loading => "Loading...\n".to_string(),
        SearchStatus::Ready(countries) => render_country_list(countries, user),
        SearchStatus::NoResults | SearchStatus::FetchFailed => {
            format!("{}\n", status.message().unwrap_or_default())
        }
    }
}

#[must_use]
pub fn render_help() -> String {
    let lines = [
        ("register USER EMAIL PASSWORD PHOTO", "create an account (PHOTO is an image file)"),
        ("login EMAIL PASSWORD", "log in"),
        ("logout", "log out"),
        ("whoami", "show the current account"),
        ("fav add|remove|toggle CODE", "change a favorite by two-letter code"),
        ("favorites", "list favorite countries"),
        ("name [TEXT]", "filter by name"),
        ("region NAME|all", "filter by region"),
        ("lang [TEXT]", "filter by language"),
        ("search", "fetch now"),
        ("show CODE", "show one country"),
        ("help", "show this help"),
        ("quit", "exit"),
    ];
    let mut out = String::new();
    for (usage, what) in lines {
        let _ = writeln!(out, "  {usage:<36} {what}");
    }
    out
}
