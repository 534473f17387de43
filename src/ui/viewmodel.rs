//! Display-ready views of country records.
//!
//! View models carry no behavior beyond construction. Every "missing value"
//! decision (`N/A`, empty capitals, absent flags) is made here so the renderer
//! only lays out text.

use crate::domain::country::NOT_AVAILABLE;
use crate::domain::{Account, Country, CountryCode};

/// Favorite toggle state shown next to a country row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteMark {
    /// No account is logged in; no toggle is offered.
    Hidden,
    Add,
    Remove,
}

impl FavoriteMark {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Hidden => " ",
            Self::Add => "☆",
            Self::Remove => "★",
        }
    }
}

/// One row in a country list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRow {
    pub code: String,
    pub name: String,
    pub region: String,
    pub capital: String,
    pub population: String,
    pub favorite: FavoriteMark,
}

impl CountryRow {
    /// Builds a row, marking the favorite state against `user`.
    ///
    /// The row shows the first capital only, like the list card it stands for.
    #[must_use]
    pub fn new(country: &Country, user: Option<&Account>) -> Self {
        let favorite = match user {
            None => FavoriteMark::Hidden,
            Some(account) => match CountryCode::parse(&country.cca2) {
                Ok(code) if account.is_favorite(&code) => FavoriteMark::Remove,
                _ => FavoriteMark::Add,
            },
        };

        Self {
            code: country.cca2.clone(),
            name: country.name.common.clone(),
            region: non_empty(&country.region),
            capital: country
                .capital
                .first()
                .cloned()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            population: country.population_display(),
            favorite,
        }
    }
}

/// The full record for the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub name: String,
    /// Present only when it differs from the common name.
    pub official_name: Option<String>,
    pub flag: Option<String>,
    pub capital: String,
    pub region: String,
    pub subregion: String,
    pub population: String,
    pub languages: String,
    pub currencies: String,
    pub timezones: String,
    pub map: Option<String>,
}

impl From<&Country> for DetailView {
    fn from(country: &Country) -> Self {
        let official = &country.name.official;
        let flag = [&country.flags.svg, &country.flags.png]
            .into_iter()
            .find(|url| !url.is_empty())
            .cloned();

        Self {
            name: country.name.common.clone(),
            official_name: (!official.is_empty() && *official != country.name.common)
                .then(|| official.clone()),
            flag,
            capital: country.capital_display(),
            region: non_empty(&country.region),
            subregion: country
                .subregion
                .as_deref()
                .map_or_else(|| NOT_AVAILABLE.to_string(), non_empty),
            population: country.population_display(),
            languages: country.languages_display(),
            currencies: country.currencies_display(),
            timezones: if country.timezones.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                country.timezones.join(", ")
            },
            map: country.maps.google_maps.clone(),
        }
    }
}

fn non_empty(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn japan() -> Country {
        serde_json::from_value(serde_json::json!({
            "name": {"common": "Japan", "official": "Japan"},
            "capital": ["Tokyo"],
            "population": 125836021,
            "region": "Asia",
            "flags": {"png": "https://flagcdn.com/w320/jp.png", "svg": ""},
            "cca2": "JP"
        }))
        .unwrap()
    }

    #[test]
    fn row_marks_favorites_for_logged_in_user() {
        let mut account = Account::new("alice", "a@x.com", "p", "");
        assert_eq!(CountryRow::new(&japan(), None).favorite, FavoriteMark::Hidden);
        assert_eq!(CountryRow::new(&japan(), Some(&account)).favorite, FavoriteMark::Add);

        account.add_favorite(CountryCode::parse("jp").unwrap());
        let row = CountryRow::new(&japan(), Some(&account));
        assert_eq!(row.favorite, FavoriteMark::Remove);
        assert_eq!(row.population, "125,836,021");
        assert_eq!(row.capital, "Tokyo");
    }

    #[test]
    fn detail_hides_redundant_official_name_and_falls_back_to_png() {
        let detail = DetailView::from(&japan());
        assert_eq!(detail.official_name, None);
        assert_eq!(detail.flag.as_deref(), Some("https://flagcdn.com/w320/jp.png"));
        assert_eq!(detail.subregion, NOT_AVAILABLE);
        assert_eq!(detail.languages, NOT_AVAILABLE);
        assert_eq!(detail.timezones, NOT_AVAILABLE);
    }

    #[test]
    fn empty_record_is_all_placeholders() {
        let row = CountryRow::new(&Country::default(), None);
        assert_eq!(row.region, NOT_AVAILABLE);
        assert_eq!(row.capital, NOT_AVAILABLE);
        assert_eq!(row.population, NOT_AVAILABLE);
    }
}
