use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::output::{self, OutputReport};
use crate::roster::{Member, Roster, RosterError};
use crate::search::{
    Debouncer, Decoration, FilterOptions, FilterPass, SearchFilter, DEFAULT_DEBOUNCE_DELAY,
};
use crate::session::{InputEvent, Session};

#[derive(Clone, Debug)]
pub enum RosterSource {
    FilePath(String),
    Inline(Vec<Member>),
}

#[derive(Clone, Debug)]
pub struct Options {
    pub roster: RosterSource,
    pub title: Option<String>,
    pub debounce_delay: Duration,
    pub decoration: Decoration,
    pub filter: FilterOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            roster: RosterSource::Inline(Vec::new()),
            title: None,
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            decoration: Decoration::default(),
            filter: FilterOptions::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("roster path is empty")]
    EmptyRosterPath,

    #[error(transparent)]
    Roster(#[from] RosterError),
}

#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub roster: Roster,
    pub pass: FilterPass,
    pub report: OutputReport,
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if let RosterSource::FilePath(path) = &options.roster {
            if path.trim().is_empty() {
                return Err(RunnerError::EmptyRosterPath);
            }
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub async fn load_roster(&self) -> Result<Roster, RunnerError> {
        let mut roster = match &self.options.roster {
            RosterSource::FilePath(path) => Roster::load(path).await?,
            RosterSource::Inline(members) => {
                let roster = Roster {
                    title: None,
                    members: members.clone(),
                };
                roster.validate()?;
                roster
            }
        };
        if self.options.title.is_some() {
            roster.title = self.options.title.clone();
        }
        log::info!("loaded {} members", roster.members.len());
        Ok(roster)
    }

    pub fn build_filter(&self, roster: &Roster) -> SearchFilter {
        SearchFilter::new(roster.items(), self.options.filter.clone())
    }

    pub fn report(&self, roster: &Roster, pass: &FilterPass) -> OutputReport {
        output::build_report(
            roster.title.as_deref(),
            pass,
            &roster.items(),
            &self.options.decoration,
        )
    }

    /// Applies `query` once, with no debouncing.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, RunnerError> {
        let roster = self.load_roster().await?;
        let mut filter = self.build_filter(&roster);
        let pass = filter.set_term(query).clone();
        let report = self.report(&roster, &pass);
        Ok(SearchOutcome {
            roster,
            pass,
            report,
        })
    }

    /// Runs a debounced session over `events`, handing each pass and its
    /// report to `sink`. Returns the final outcome once `events` closes.
    pub async fn session<F>(
        &self,
        events: mpsc::Receiver<InputEvent>,
        mut sink: F,
    ) -> Result<SearchOutcome, RunnerError>
    where
        F: FnMut(&FilterPass, &OutputReport),
    {
        let roster = self.load_roster().await?;
        let filter = self.build_filter(&roster);
        let items = roster.items();
        let mut session = Session::new(filter, Debouncer::new(self.options.debounce_delay));
        session
            .run(events, |pass| {
                let report = output::build_report(
                    roster.title.as_deref(),
                    pass,
                    &items,
                    &self.options.decoration,
                );
                sink(pass, &report);
            })
            .await;

        let pass = session.filter().pass().clone();
        let report = self.report(&roster, &pass);
        Ok(SearchOutcome {
            roster,
            pass,
            report,
        })
    }
}
