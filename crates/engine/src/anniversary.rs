//! Daily anniversary check.
//!
//! The 5th of every month is a monthly anniversary; the 5th of August is the
//! yearly one. On those days every subscription receives a notification.
//! Running twice on the same day sends twice.

use chrono::{Datelike, NaiveDate};
use serde_json::json;

use pushbell_common::error::AppError;
use pushbell_common::types::Payload;

use crate::dispatcher::Dispatcher;
use crate::store::Selector;

const ANNIVERSARY_DAY: u32 = 5;
/// Zero-based month index of August.
const ANNIVERSARY_MONTH0: u32 = 7;

/// Which anniversary, if any, falls on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occasion {
    Monthly,
    /// Implies the monthly condition as well.
    Yearly,
}

impl Occasion {
    pub fn is_monthly(&self) -> bool {
        true
    }

    pub fn is_yearly(&self) -> bool {
        matches!(self, Occasion::Yearly)
    }

    pub fn payload(&self) -> Payload {
        let (title, body) = match self {
            Occasion::Yearly => ("¡Feliz aniversario!", "Hoy es 5 de agosto ❤️"),
            Occasion::Monthly => (
                "¡Hoy es especial!",
                "Es el día 5, nuestro aniversario mensual ❤️",
            ),
        };
        Payload::new(title, body).with_data(json!({ "url": "/" }))
    }
}

/// Result of one anniversary check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnniversaryOutcome {
    Skipped,
    Dispatched {
        sent: u32,
        is_monthly: bool,
        is_yearly: bool,
    },
}

pub struct AnniversaryCheck;

impl AnniversaryCheck {
    /// Decide which occasion, if any, `date` (UTC) falls on.
    pub fn occasion(date: NaiveDate) -> Option<Occasion> {
        let is_monthly = date.day() == ANNIVERSARY_DAY;
        let is_yearly = is_monthly && date.month0() == ANNIVERSARY_MONTH0;

        match (is_monthly, is_yearly) {
            (_, true) => Some(Occasion::Yearly),
            (true, false) => Some(Occasion::Monthly),
            _ => None,
        }
    }

    /// Run the check for `today`, dispatching to all subscriptions when it is
    /// an anniversary.
    pub async fn run(
        dispatcher: &Dispatcher,
        today: NaiveDate,
    ) -> Result<AnniversaryOutcome, AppError> {
        let Some(occasion) = Self::occasion(today) else {
            tracing::debug!(%today, "Not an anniversary, skipping");
            return Ok(AnniversaryOutcome::Skipped);
        };

        tracing::info!(%today, ?occasion, "Anniversary detected, notifying everyone");

        let summary = dispatcher
            .dispatch(&Selector::All, &occasion.payload())
            .await?;

        Ok(AnniversaryOutcome::Dispatched {
            sent: summary.sent,
            is_monthly: occasion.is_monthly(),
            is_yearly: occasion.is_yearly(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_occasion_when_day_is_not_fifth() {
        for day in [1, 4, 6, 15, 25, 31] {
            assert_eq!(AnniversaryCheck::occasion(date(2025, 8, day)), None);
        }
        assert_eq!(AnniversaryCheck::occasion(date(2024, 2, 29)), None);
    }

    #[test]
    fn test_august_fifth_is_yearly() {
        for year in [1999, 2024, 2031] {
            let occasion = AnniversaryCheck::occasion(date(year, 8, 5)).unwrap();
            assert_eq!(occasion, Occasion::Yearly);
            assert!(occasion.is_monthly());
            assert!(occasion.is_yearly());
        }
    }

    #[test]
    fn test_other_fifths_are_monthly() {
        for month in (1..=12).filter(|m| *m != 8) {
            let occasion = AnniversaryCheck::occasion(date(2025, month, 5)).unwrap();
            assert_eq!(occasion, Occasion::Monthly);
            assert!(!occasion.is_yearly());
        }
    }

    #[test]
    fn test_payload_variants() {
        let yearly = Occasion::Yearly.payload();
        assert_eq!(yearly.title, "¡Feliz aniversario!");
        assert_eq!(yearly.data, json!({"url": "/"}));

        let monthly = Occasion::Monthly.payload();
        assert_eq!(monthly.title, "¡Hoy es especial!");
        assert!(monthly.body.contains("aniversario mensual"));
        assert_eq!(monthly.tag, None);
    }
}
