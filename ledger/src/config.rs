//! Category → point value table.

use pass_types::{PassError, PointCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point values per category.
///
/// Keys are parsed into [`PointCategory`] on load, so a misspelled category
/// in the configuration file is a load error rather than a silent zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct PointsConfig {
    values: BTreeMap<PointCategory, i64>,
}

impl PointsConfig {
    pub fn new(values: impl IntoIterator<Item = (PointCategory, i64)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Configured value, or `None` if the category has no entry.
    pub fn value_of(&self, category: PointCategory) -> Option<i64> {
        self.values.get(&category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PointCategory, i64)> + '_ {
        self.values.iter().map(|(c, v)| (*c, *v))
    }
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self::new([
            (PointCategory::AttendCall, 10),
            (PointCategory::HaveCallQuestionAnswered, 15),
            (PointCategory::AnswerPoll, 5),
            (PointCategory::AttendFeedbackMeeting, 25),
            (PointCategory::TakeSurvey, 20),
            (PointCategory::BetaSignup, 50),
            (PointCategory::BetaTesting, 50),
        ])
    }
}

impl TryFrom<BTreeMap<String, i64>> for PointsConfig {
    type Error = PassError;

    fn try_from(raw: BTreeMap<String, i64>) -> Result<Self, Self::Error> {
        let mut values = BTreeMap::new();
        for (key, value) in raw {
            values.insert(key.parse::<PointCategory>()?, value);
        }
        Ok(Self { values })
    }
}

impl From<PointsConfig> for BTreeMap<String, i64> {
    fn from(config: PointsConfig) -> Self {
        config
            .values
            .into_iter()
            .map(|(c, v)| (c.key().to_string(), v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        points: PointsConfig,
    }

    #[test]
    fn loads_from_toml_table() {
        let wrapper: Wrapper = toml::from_str(
            r#"
            [points]
            BetaTesting = 75
            AnswerPoll = 3
            "#,
        )
        .unwrap();
        assert_eq!(wrapper.points.value_of(PointCategory::BetaTesting), Some(75));
        assert_eq!(wrapper.points.value_of(PointCategory::AnswerPoll), Some(3));
        assert_eq!(wrapper.points.value_of(PointCategory::TakeSurvey), None);
    }

    #[test]
    fn misspelled_category_fails_to_load() {
        let result: Result<Wrapper, _> = toml::from_str(
            r#"
            [points]
            BetaTestin = 75
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn default_covers_every_category() {
        let config = PointsConfig::default();
        for category in PointCategory::ALL {
            assert!(config.value_of(category).is_some_and(|v| v > 0), "{category}");
        }
    }
}
