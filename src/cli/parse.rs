use panelvote_core::criteria::Criterion;
use panelvote_core::error::Result;
use panelvote_core::format::OutputFormat;
use panelvote_core::{bail_invalid, bail_usage};

/// One `--score CRITERION=N` argument; the value is clamped when applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreArg {
    pub criterion: Criterion,
    pub score: i64,
}

/// Parse output format from string
pub fn parse_output_format(s: &str) -> Result<OutputFormat> {
    s.parse::<OutputFormat>()
}

/// Parse criterion id from string
pub fn parse_criterion(s: &str) -> Result<Criterion> {
    s.trim().parse::<Criterion>()
}

/// Parse `CRITERION=N`
pub fn parse_score_arg(s: &str) -> Result<ScoreArg> {
    let Some((id, value)) = s.split_once('=') else {
        bail_usage!(format!("expected CRITERION=SCORE, got '{}'", s));
    };
    let criterion = parse_criterion(id)?;
    let Ok(score) = value.trim().parse::<i64>() else {
        bail_invalid!("score", value.trim());
    };
    Ok(ScoreArg { criterion, score })
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelvote_core::error::PanelError;

    #[test]
    fn test_parse_score_arg() {
        let arg = parse_score_arg("proje_yonetimi=4").unwrap();
        assert_eq!(arg.criterion, Criterion::ProjeYonetimi);
        assert_eq!(arg.score, 4);

        // out-of-range values are accepted here and clamped by the ballot
        assert_eq!(parse_score_arg("yontem= 9").unwrap().score, 9);
    }

    #[test]
    fn test_parse_score_arg_errors() {
        assert!(matches!(
            parse_score_arg("yontem"),
            Err(PanelError::UsageError(_))
        ));
        assert!(matches!(
            parse_score_arg("yontem=high"),
            Err(PanelError::InvalidValue { .. })
        ));
        assert!(parse_score_arg("speed=3").is_err());
    }
}
