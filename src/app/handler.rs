//! Event parsing and dispatch.
//!
//! Each input line becomes one [`Event`]. [`handle_event`] applies it to the
//! [`AppState`] and returns the [`Action`]s the shell should perform.
//!
//! # Errors at this boundary
//!
//! Failures a user can cause (bad credentials, duplicate email, missing
//! fields, no session, unknown region or code) become [`Action::Print`]
//! messages. Only storage and I/O failures are returned as errors.
//!
//! # Example
//!
//! ```rust
//! use jsonland::app::Event;
//!
//! let event = Event::parse("fav add no")?;
//! assert_eq!(event, Some(Event::AddFavorite("no".to_string())));
//! # Ok::<(), jsonland::JsonLandError>(())
//! ```

use crate::app::modes::View;
use crate::app::{Action, AppState};
use crate::domain::error::{JsonLandError, Result};
use crate::domain::{CountryCode, Region};
use crate::forms::{photo_from_file, FormError, LoginForm, RegisterForm};
use crate::search::{country_detail, favorite_countries, DetailOutcome, FavoritesOutcome};
use crate::ui;
use tracing::Instrument;

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Register {
        username: String,
        email: String,
        password: String,
        /// Path to an image file; converted to a data URI on submit.
        photo_path: String,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    WhoAmI,
    /// Raw code as typed; validated by the session.
    AddFavorite(String),
    RemoveFavorite(String),
    ToggleFavorite(String),
    ShowFavorites,
    SetName(String),
    SetRegion(Option<Region>),
    SetLanguage(String),
    Submit,
    ShowDetail(String),
    Help,
    Quit,
}

impl Event {
    /// Parses one input line. Blank lines yield `None`.
    ///
    /// Missing form arguments parse as empty strings so the form can report
    /// which fields are required.
    ///
    /// # Errors
    ///
    /// - [`JsonLandError::Command`] for an unknown command or missing code
    /// - [`JsonLandError::InvalidRegion`] for an unknown region name
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();
        let mut next = || args.next().unwrap_or_default().to_string();

        let event = match command.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "register" => Self::Register {
                username: next(),
                email: next(),
                password: next(),
                photo_path: next(),
            },
            "login" => Self::Login {
                email: next(),
                password: next(),
            },
            "logout" => Self::Logout,
            "whoami" => Self::WhoAmI,
            "fav" => {
                let op = next();
                let code = next();
                if code.is_empty() {
                    return Err(JsonLandError::Command("usage: fav add|remove|toggle CODE".to_string()));
                }
                match op.as_str() {
                    "add" => Self::AddFavorite(code),
                    "remove" | "rm" => Self::RemoveFavorite(code),
                    "toggle" => Self::ToggleFavorite(code),
                    _ => {
                        return Err(JsonLandError::Command(
                            "usage: fav add|remove|toggle CODE".to_string(),
                        ))
                    }
                }
            }
            "favorites" | "favs" => Self::ShowFavorites,
            "name" => Self::SetName(rest.to_string()),
            "region" if rest.is_empty() || rest.eq_ignore_ascii_case("all") => {
                Self::SetRegion(None)
            }
            "region" => Self::SetRegion(Some(rest.parse()?)),
            "lang" | "language" => Self::SetLanguage(rest.to_string()),
            "search" => Self::Submit,
            "show" => {
                let code = next();
                if code.is_empty() {
                    return Err(JsonLandError::Command("usage: show CODE".to_string()));
                }
                Self::ShowDetail(code)
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(JsonLandError::Command(format!(
                    "Unknown command: {other} (try `help`)"
                )))
            }
        };
        Ok(Some(event))
    }
}

/// Applies `event` to `state` and returns the output to show.
///
/// # Errors
///
/// Returns storage and I/O failures. Everything a user can fix is reported
/// through [`Action::Print`] instead.
pub async fn handle_event(state: &mut AppState, event: Event) -> Result<Vec<Action>> {
    let span = tracing::debug_span!("handle_event", event = event_name(&event));
    dispatch(state, event).instrument(span).await
}

async fn dispatch(state: &mut AppState, event: Event) -> Result<Vec<Action>> {
    match event {
        Event::Register {
            username,
            email,
            password,
            photo_path,
        } => {
            let photo = if photo_path.is_empty() {
                String::new()
            } else {
                match photo_from_file(&photo_path) {
                    Ok(uri) => uri,
                    Err(FormError::Store(JsonLandError::Io(e))) => {
                        tracing::warn!(path = %photo_path, error = %e, "cannot read photo");
                        return Ok(vec![Action::line(crate::forms::INVALID_PHOTO)]);
                    }
                    Err(e) => return form_failure(e),
                }
            };
            let form = RegisterForm {
                username,
                email,
                password,
                photo,
            };
            match form.submit(&mut state.session) {
                Ok(account) => Ok(vec![Action::Print(ui::render_banner(Some(account)))]),
                Err(e) => form_failure(e),
            }
        }
        Event::Login { email, password } => {
            let form = LoginForm { email, password };
            match form.submit(&mut state.session) {
                Ok(account) => Ok(vec![Action::Print(ui::render_banner(Some(account)))]),
                Err(e) => form_failure(e),
            }
        }
        Event::Logout => {
            state.session.logout();
            if matches!(state.view, View::Favorites) {
                state.view = View::Search;
            }
            Ok(vec![Action::Print(ui::render_banner(None))])
        }
        Event::WhoAmI => Ok(vec![Action::Print(ui::render_banner(state.session.user()))]),
        Event::AddFavorite(code) => {
            storage_errors_only(state.session.add_favorite(&code))?;
            Ok(vec![favorites_line(state)])
        }
        Event::RemoveFavorite(code) => {
            storage_errors_only(state.session.remove_favorite(&code))?;
            Ok(vec![favorites_line(state)])
        }
        Event::ToggleFavorite(code) => {
            storage_errors_only(state.session.toggle_favorite(&code))?;
            Ok(vec![favorites_line(state)])
        }
        Event::ShowFavorites => {
            let Some(account) = state.session.user() else {
                return Ok(vec![Action::line(JsonLandError::NotLoggedIn)]);
            };
            state.view = View::Favorites;
            if account.favorites().is_empty() {
                return Ok(vec![Action::line("No favorite countries yet.")]);
            }
            let outcome = favorite_countries(state.source(), account).await;
            Ok(vec![match outcome {
                FavoritesOutcome::Loaded(countries) => {
                    Action::Print(ui::render_country_list(&countries, state.session.user()))
                }
                FavoritesOutcome::Failed => Action::line(outcome.message().unwrap_or_default()),
            }])
        }
        Event::SetName(name) => {
            state.view = View::Search;
            state.search.set_name(name)?;
            Ok(Vec::new())
        }
        Event::SetRegion(region) => {
            state.view = View::Search;
            state.search.set_region(region)?;
            Ok(Vec::new())
        }
        Event::SetLanguage(language) => {
            state.view = View::Search;
            state.search.set_language(language)?;
            Ok(Vec::new())
        }
        Event::Submit => {
            state.view = View::Search;
            state.search.submit();
            Ok(Vec::new())
        }
        Event::ShowDetail(raw) => {
            let code = match CountryCode::parse(&raw) {
                Ok(code) => code,
                Err(e) => return Ok(vec![Action::line(e)]),
            };
            state.view = View::Detail(code.clone());
            let outcome = country_detail(state.source(), &code).await;
            Ok(vec![match outcome {
                DetailOutcome::Found(country) => Action::Print(ui::render_detail(&country)),
                DetailOutcome::NotFound | DetailOutcome::Failed => {
                    Action::line(outcome.message().unwrap_or_default())
                }
            }])
        }
        Event::Help => Ok(vec![Action::Print(ui::render_help())]),
        Event::Quit => Ok(vec![Action::Quit]),
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Register { .. } => "register",
        Event::Login { .. } => "login",
        Event::Logout => "logout",
        Event::WhoAmI => "whoami",
        Event::AddFavorite(_) => "add_favorite",
        Event::RemoveFavorite(_) => "remove_favorite",
        Event::ToggleFavorite(_) => "toggle_favorite",
        Event::ShowFavorites => "show_favorites",
        Event::SetName(_) => "set_name",
        Event::SetRegion(_) => "set_region",
        Event::SetLanguage(_) => "set_language",
        Event::Submit => "submit",
        Event::ShowDetail(_) => "show_detail",
        Event::Help => "help",
        Event::Quit => "quit",
    }
}

/// Turns a form failure into an inline message, or returns it as an error.
fn form_failure(err: FormError) -> Result<Vec<Action>> {
    if let Some(message) = err.inline_message() {
        return Ok(vec![Action::line(message)]);
    }
    match err {
        FormError::Store(e) => Err(e),
        FormError::Invalid(message) => Ok(vec![Action::line(message)]),
    }
}

/// Drops user-facing failures; the follow-up output already reflects them.
fn storage_errors_only(result: Result<()>) -> Result<()> {
    match result {
        Err(e) if !e.is_user_facing() => Err(e),
        _ => Ok(()),
    }
}

fn favorites_line(state: &AppState) -> Action {
    match state.session.user() {
        None => Action::line(JsonLandError::NotLoggedIn),
        Some(account) if account.favorites().is_empty() => Action::line("Favorites: none"),
        Some(account) => {
            let codes: Vec<_> = account.favorites().iter().map(CountryCode::as_str).collect();
            Action::line(format!("Favorites: {}", codes.join(", ")))
        }
    }
}
