//! Scoring criteria catalogue
//!
//! The exercise scores a project on four fixed criteria. Each criterion has a
//! stable wire id (used in backend payloads), a display label and a weight.
//! Weights sum to 1.0.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PanelError;

/// Lowest score a panelist can give
pub const MIN_SCORE: u8 = 1;

/// Highest score a panelist can give
pub const MAX_SCORE: u8 = 6;

/// One of the four fixed scoring dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Criterion {
    #[serde(rename = "ozgun_deger")]
    OzgunDeger,
    #[serde(rename = "yontem")]
    Yontem,
    #[serde(rename = "proje_yonetimi")]
    ProjeYonetimi,
    #[serde(rename = "yaygin_etki")]
    YayginEtki,
}

impl Criterion {
    /// All criteria in catalogue order
    pub const ALL: [Criterion; 4] = [
        Criterion::OzgunDeger,
        Criterion::Yontem,
        Criterion::ProjeYonetimi,
        Criterion::YayginEtki,
    ];

    /// Wire identifier
    pub fn id(self) -> &'static str {
        match self {
            Criterion::OzgunDeger => "ozgun_deger",
            Criterion::Yontem => "yontem",
            Criterion::ProjeYonetimi => "proje_yonetimi",
            Criterion::YayginEtki => "yaygin_etki",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::OzgunDeger => "Özgün Değer",
            Criterion::Yontem => "Yöntem",
            Criterion::ProjeYonetimi => "Proje Yönetimi",
            Criterion::YayginEtki => "Yaygın Etki",
        }
    }

    /// Weight of this criterion in the weighted score
    pub fn weight(self) -> f64 {
        match self {
            Criterion::OzgunDeger => 0.35,
            Criterion::Yontem => 0.25,
            Criterion::ProjeYonetimi => 0.20,
            Criterion::YayginEtki => 0.20,
        }
    }

    /// Weight as a whole percentage, for display
    pub fn weight_percent(self) -> u32 {
        (self.weight() * 100.0).round() as u32
    }

    /// Look up a criterion by wire id
    pub fn from_id(id: &str) -> Option<Criterion> {
        Criterion::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Criterion {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Criterion::from_id(s.trim()).ok_or_else(|| {
            PanelError::unsupported(
                "criterion",
                s,
                Criterion::ALL.map(Criterion::id).join(", "),
            )
        })
    }
}

/// Clamp an arbitrary integer into the valid score range
pub fn clamp_score(value: i64) -> u8 {
    value.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u8
}

/// One level of the scoring rubric shown to panelists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RubricLevel {
    pub score: u8,
    pub label: &'static str,
    pub description: &'static str,
}

const RUBRIC: [RubricLevel; 6] = [
    RubricLevel {
        score: 6,
        label: "İyi",
        description: "Proje önerisi ilgili kriteri tüm boyutlarıyla karşılamaktadır. Eksiklik yok denecek kadar azdır.",
    },
    RubricLevel {
        score: 5,
        label: "İyi",
        description: "Proje önerisi ilgili kriteri iyi derecede karşılamaktadır. Önerinin kabul edilebilir seviyede eksiklikleri bulunmaktadır.",
    },
    RubricLevel {
        score: 4,
        label: "Geliştirilebilir",
        description: "Proje önerisi ilgili kriteri genel hatlarıyla karşılamakla birlikte, önerinin iyileştirme ve geliştirmeye açık noktaları bulunmaktadır.",
    },
    RubricLevel {
        score: 3,
        label: "Geliştirilebilir",
        description: "Proje önerisi, ilgili kriteri orta derecede karşılamaktadır. Öneride iyileştirilmesi ve geliştirilmesi gereken önemli hususlar bulunmaktadır.",
    },
    RubricLevel {
        score: 2,
        label: "Yetersiz",
        description: "Proje önerisi ilgili kriteri yeterli derecede karşılamamaktadır. Öneride önemli eksiklikler bulunmaktadır.",
    },
    RubricLevel {
        score: 1,
        label: "Yetersiz",
        description: "Proje önerisi ilgili kriteri karşılamamaktadır. Proje önerisinde ciddi eksiklikler/zayıflıklar söz konusudur.",
    },
];

/// The rubric, highest score first
pub fn rubric() -> &'static [RubricLevel] {
    &RUBRIC
}

/// Rubric entry for a given score
pub fn rubric_for(score: u8) -> Option<&'static RubricLevel> {
    RUBRIC.iter().find(|level| level.score == score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = Criterion::ALL.iter().map(|c| c.weight()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_id_round_trip() {
        for criterion in Criterion::ALL {
            assert_eq!(Criterion::from_id(criterion.id()), Some(criterion));
            assert_eq!(criterion.id().parse::<Criterion>().unwrap(), criterion);
        }
    }

    #[test]
    fn test_unknown_id_rejected() {
        assert_eq!(Criterion::from_id("butce"), None);
        let err = "butce".parse::<Criterion>().unwrap_err();
        assert!(err.to_string().contains("ozgun_deger"));
    }

    #[test]
    fn test_serde_uses_wire_ids() {
        let json = serde_json::to_string(&Criterion::ProjeYonetimi).unwrap();
        assert_eq!(json, "\"proje_yonetimi\"");
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-3), 1);
        assert_eq!(clamp_score(0), 1);
        assert_eq!(clamp_score(4), 4);
        assert_eq!(clamp_score(99), 6);
    }

    #[test]
    fn test_rubric_covers_every_score() {
        for score in MIN_SCORE..=MAX_SCORE {
            assert!(rubric_for(score).is_some(), "missing rubric for {}", score);
        }
        assert_eq!(rubric()[0].score, 6);
        assert!(rubric_for(7).is_none());
    }

    #[test]
    fn test_weight_percent() {
        assert_eq!(Criterion::OzgunDeger.weight_percent(), 35);
        assert_eq!(Criterion::YayginEtki.weight_percent(), 20);
    }
}
