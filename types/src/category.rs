//! Closed set of point-earning categories.
//!
//! Categories map to point values through externally supplied configuration.
//! The set is an enum rather than free-form strings so that a mistyped
//! category fails to parse instead of silently resolving to zero points.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::PassError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PointCategory {
    AttendCall,
    HaveCallQuestionAnswered,
    AnswerPoll,
    AttendFeedbackMeeting,
    TakeSurvey,
    BetaSignup,
    BetaTesting,
}

impl PointCategory {
    pub const ALL: [PointCategory; 7] = [
        Self::AttendCall,
        Self::HaveCallQuestionAnswered,
        Self::AnswerPoll,
        Self::AttendFeedbackMeeting,
        Self::TakeSurvey,
        Self::BetaSignup,
        Self::BetaTesting,
    ];

    /// Configuration key, identical to the variant name.
    pub fn key(&self) -> &'static str {
        match self {
            Self::AttendCall => "AttendCall",
            Self::HaveCallQuestionAnswered => "HaveCallQuestionAnswered",
            Self::AnswerPoll => "AnswerPoll",
            Self::AttendFeedbackMeeting => "AttendFeedbackMeeting",
            Self::TakeSurvey => "TakeSurvey",
            Self::BetaSignup => "BetaSignup",
            Self::BetaTesting => "BetaTesting",
        }
    }

    /// Human-readable label, used as the default ledger message.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AttendCall => "Attend Call",
            Self::HaveCallQuestionAnswered => "Have Call Question Answered",
            Self::AnswerPoll => "Answer Poll",
            Self::AttendFeedbackMeeting => "Attend Feedback Meeting",
            Self::TakeSurvey => "Take Survey",
            Self::BetaSignup => "Beta Signup",
            Self::BetaTesting => "Beta Testing",
        }
    }
}

impl fmt::Display for PointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the configuration key or the label, ignoring case and spaces.
impl FromStr for PointCategory {
    type Err = PassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        Self::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| PassError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_and_label() {
        assert_eq!("BetaTesting".parse(), Ok(PointCategory::BetaTesting));
        assert_eq!("beta testing".parse(), Ok(PointCategory::BetaTesting));
        assert_eq!("Attend Feedback Meeting".parse(), Ok(PointCategory::AttendFeedbackMeeting));
    }

    #[test]
    fn unknown_category_is_an_error() {
        assert_eq!(
            "BetaTestin".parse::<PointCategory>(),
            Err(PassError::UnknownCategory("BetaTestin".into()))
        );
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = PointCategory::ALL.iter().map(|c| c.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), PointCategory::ALL.len());
    }
}
