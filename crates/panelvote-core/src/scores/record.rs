//! Per-panelist score records as returned by the backend

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::criteria::{clamp_score, Criterion};

/// One panelist's submission
///
/// Criterion fields are optional: the backend may omit a column for a
/// criterion that was never opened. Missing scores count as 0 when
/// aggregating.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub panelist_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub panelist_name: String,
    #[serde(
        rename = "ozgun_deger",
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub ozgun_deger: Option<u8>,
    #[serde(
        rename = "yontem",
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub yontem: Option<u8>,
    #[serde(
        rename = "proje_yonetimi",
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub proje_yonetimi: Option<u8>,
    #[serde(
        rename = "yaygin_etki",
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub yaygin_etki: Option<u8>,
}

impl ScoreRecord {
    pub fn new(panelist_id: impl Into<String>, panelist_name: impl Into<String>) -> Self {
        Self {
            panelist_id: panelist_id.into(),
            panelist_name: panelist_name.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter, clamping into the score range
    pub fn with_score(mut self, criterion: Criterion, score: i64) -> Self {
        self.set_score(criterion, Some(clamp_score(score)));
        self
    }

    /// Record with the same score on every criterion
    pub fn uniform(panelist_id: impl Into<String>, score: i64) -> Self {
        let id = panelist_id.into();
        Criterion::ALL
            .into_iter()
            .fold(Self::new(id.clone(), id), |record, c| {
                record.with_score(c, score)
            })
    }

    pub fn score(&self, criterion: Criterion) -> Option<u8> {
        match criterion {
            Criterion::OzgunDeger => self.ozgun_deger,
            Criterion::Yontem => self.yontem,
            Criterion::ProjeYonetimi => self.proje_yonetimi,
            Criterion::YayginEtki => self.yaygin_etki,
        }
    }

    pub fn set_score(&mut self, criterion: Criterion, score: Option<u8>) {
        let slot = match criterion {
            Criterion::OzgunDeger => &mut self.ozgun_deger,
            Criterion::Yontem => &mut self.yontem,
            Criterion::ProjeYonetimi => &mut self.proje_yonetimi,
            Criterion::YayginEtki => &mut self.yaygin_etki,
        };
        *slot = score;
    }

    /// Score as used in arithmetic: missing counts as 0
    pub fn value(&self, criterion: Criterion) -> f64 {
        self.score(criterion).map(f64::from).unwrap_or(0.0)
    }

    /// Scores keyed by criterion, skipping missing ones
    pub fn scores(&self) -> BTreeMap<Criterion, u8> {
        Criterion::ALL
            .into_iter()
            .filter_map(|c| self.score(c).map(|s| (c, s)))
            .collect()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(score_from_value(&value))
}

/// Interpret a JSON cell as a stored score. Positive numbers and numeric
/// strings are taken as they are (rounded to an integer); zero, negatives
/// and anything else are treated as missing. Clamping applies to ballot
/// input only, never to stored data.
fn score_from_value(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    let rounded = raw.round();
    (1.0..=f64::from(u8::MAX))
        .contains(&rounded)
        .then_some(rounded as u8)
}
