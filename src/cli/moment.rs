use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::utils::clock::{Clock, DefaultClock, FixedClock};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Lets commands work at some moment other than now.
#[derive(Debug, Clone, clap::Args)]
pub struct MomentArgs {
    #[arg(
        long = "at",
        help = "Moment to use instead of now. Examples are \"yesterday\", \"1 hour ago\", \"15/03/2025\", \"12:00 16/03/2025\""
    )]
    at: Option<String>,
    #[arg(
        long,
        default_value_t = DateStyle::Uk,
        help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year"
    )]
    date_style: DateStyle,
}

impl MomentArgs {
    /// Parsed `--at`, or `None` when it wasn't given.
    pub fn moment(&self) -> Result<Option<DateTime<Local>>> {
        let Some(at) = &self.at else {
            return Ok(None);
        };
        match parse_date_string(at, Local::now(), self.date_style.into()) {
            Ok(v) => Ok(Some(v.with_timezone(&Local))),
            Err(e) => Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate date {at}: {e}"),
                )
                .into()),
        }
    }

    pub fn clock(&self) -> Result<Box<dyn Clock>> {
        Ok(match self.moment()? {
            Some(moment) => Box::new(FixedClock(moment)),
            None => Box::new(DefaultClock),
        })
    }
}
