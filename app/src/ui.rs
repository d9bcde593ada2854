//! Root UI component.
//!
//! Rendering is a pure function from the query snapshot to a `Screen`, which
//! borrows the profile for as long as it is displayed. `App` owns no state of
//! its own; the only side effect is starting the fetch when it mounts.

use std::fmt;
use std::io::{self, Write};

use profile_core::{FetchError, QueryOptions, QueryState};
use tracing::debug;

use crate::hooks::{ProfileQuery, ProfileResult};
use crate::transport::Transport;

pub const LOADING_TEXT: &str = "Loading profile...";
pub const TITLE: &str = "User Profile";

/// One of the three mutually exclusive views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen<'a> {
    Loading,
    Error(&'a FetchError),
    /// City is fetched but intentionally not shown.
    Profile { name: &'a str, email: &'a str },
}

pub fn render(result: &ProfileResult) -> Screen<'_> {
    match &result.state {
        QueryState::Pending => Screen::Loading,
        QueryState::Error(error) => Screen::Error(error),
        QueryState::Success(profile) => Screen::Profile {
            name: &profile.name,
            email: &profile.email,
        },
    }
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Loading => write!(f, "{LOADING_TEXT}"),
            Screen::Error(error) => write!(f, "Error: {error}"),
            Screen::Profile { name, email } => {
                writeln!(f, "{TITLE}")?;
                writeln!(f, "Name: {name}")?;
                write!(f, "Email: {email}")
            }
        }
    }
}

pub struct App<T> {
    profile: ProfileQuery<T>,
    options: Option<QueryOptions>,
}

impl<T: Transport> App<T> {
    pub fn new(profile: ProfileQuery<T>) -> Self {
        Self {
            profile,
            options: None,
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Reads the current snapshot without fetching.
    pub fn snapshot(&self) -> ProfileResult {
        self.profile.current()
    }

    /// Uses the profile query, fetching unless the cache can answer.
    pub async fn mount(&self) -> ProfileResult {
        self.profile.use_profile(self.options.clone()).await
    }

    /// Draws the current screen, mounts, and redraws on every change until
    /// the query settles. Consecutive identical screens are drawn once.
    pub async fn run<W: Write>(&self, out: &mut W) -> io::Result<ProfileResult> {
        let mut observer = self.profile.subscribe();
        let mut last = render(&observer.current()).to_string();
        writeln!(out, "{last}")?;

        let mount = self.mount();
        tokio::pin!(mount);
        loop {
            tokio::select! {
                result = &mut mount => {
                    draw(out, &mut last, &result)?;
                    return Ok(result);
                }
                Some(update) = observer.changed() => {
                    debug!(is_fetching = update.is_fetching, "profile query changed");
                    draw(out, &mut last, &update)?;
                }
            }
        }
    }
}

fn draw<W: Write>(out: &mut W, last: &mut String, result: &ProfileResult) -> io::Result<()> {
    let screen = render(result).to_string();
    if screen != *last {
        writeln!(out, "{screen}")?;
        *last = screen;
    }
    Ok(())
}
