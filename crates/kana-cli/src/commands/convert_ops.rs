use serde::Serialize;

use kana_engine::normalize::{normalize_input, normalize_target};
use kana_engine::{SessionOptions, TypingEngine};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ConvertReport {
    pub input: String,
    pub output: String,
    pub pending: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct BestPathReport {
    pub input: String,
    pub target: String,
    pub valid: bool,
    pub committed: usize,
    /// Typed keys already turned into committed kana.
    pub consumed: usize,
    /// Keys left to type; the full suggestion from scratch when `valid` is
    /// false.
    pub remaining: Option<String>,
}

pub fn convert(engine: &TypingEngine, options: &SessionOptions, input: &str) -> ConvertReport {
    let input = if options.normalize_input {
        normalize_input(input)
    } else {
        input.to_string()
    };
    let converted = engine.convert(&input);
    ConvertReport {
        input,
        output: converted.output,
        pending: converted.pending,
    }
}

pub fn best_path(
    engine: &TypingEngine,
    options: &SessionOptions,
    input: &str,
    target: &str,
) -> BestPathReport {
    let input = if options.normalize_input {
        normalize_input(input)
    } else {
        input.to_string()
    };
    let target = if options.normalize_target {
        normalize_target(target)
    } else {
        target.to_string()
    };
    match engine.best_path(&input, &target) {
        Some(best) => BestPathReport {
            valid: true,
            committed: best.committed,
            consumed: best.consumed,
            remaining: Some(best.remaining),
            input,
            target,
        },
        None => BestPathReport {
            valid: false,
            committed: 0,
            consumed: 0,
            remaining: engine.shortest_input(&target),
            input,
            target,
        },
    }
}

pub fn format_convert(report: &ConvertReport) -> String {
    if report.pending.is_empty() {
        report.output.clone()
    } else {
        format!("{} (pending: {})", report.output, report.pending)
    }
}

pub fn format_best_path(report: &BestPathReport) -> String {
    let total = report.target.chars().count();
    match (report.valid, report.remaining.as_deref()) {
        (true, Some("")) => format!("[{}/{}] complete", report.committed, total),
        (true, Some(rest)) => format!("[{}/{}] next: {}", report.committed, total, rest),
        (false, Some(full)) => format!("mismatch (start over with: {full})"),
        (_, None) => format!("mismatch ({} cannot be typed)", report.target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kana_engine::Flavor;

    fn engine() -> TypingEngine {
        TypingEngine::builtin(Flavor::Any)
    }

    #[test]
    fn test_convert_report() {
        let report = convert(&engine(), &SessionOptions::default(), "KAN");
        assert_eq!(report.output, "か");
        assert_eq!(report.pending, "n");
        assert_eq!(format_convert(&report), "か (pending: n)");
    }

    #[test]
    fn test_best_path_report() {
        let engine = engine();
        let options = SessionOptions::default();

        let report = best_path(&engine, &options, "ky", "キョウ");
        assert_eq!(report.target, "きょう");
        assert!(report.valid);
        assert_eq!(format_best_path(&report), "[0/3] next: ou");

        let report = best_path(&engine, &options, "kyou", "きょう");
        assert_eq!(format_best_path(&report), "[3/3] complete");

        let report = best_path(&engine, &options, "ka", "きょう");
        assert!(!report.valid);
        assert_eq!(format_best_path(&report), "mismatch (start over with: kyou)");

        let report = best_path(&engine, &options, "", "漢");
        assert_eq!(format_best_path(&report), "mismatch (漢 cannot be typed)");
    }

    #[test]
    fn test_best_path_json() {
        let report = best_path(&engine(), &SessionOptions::default(), "ka", "かん");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["committed"], 1);
        assert_eq!(json["consumed"], 2);
        assert_eq!(json["remaining"], "nn");
    }
}
