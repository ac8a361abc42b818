use std::fmt::{self, Display};

use anyhow::{Context, Result};
use conversion::{synthesize, ConversionCache, Operation};
use itertools::Itertools;
use magnitude::{categorize_magnitude, ApplyAs, MagRepresentationOutcome, Magnitude};
use rep::{RepKind, ScalarKind, Value};
use serde::Serialize;
use tracing::debug;

use crate::config::{Case, Expect, Plan};

#[derive(Debug, Serialize)]
pub struct Inspection {
    magnitude: String,
    category: ApplyAs,
    integer: bool,
    rational: bool,
    values: Vec<KindValue>,
}

#[derive(Debug, Serialize)]
struct KindValue {
    kind: ScalarKind,
    outcome: MagRepresentationOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanReport {
    from: RepKind,
    to: RepKind,
    magnitude: String,
    steps: Vec<String>,
    min_good: String,
    max_good: String,
    can_overflow_below: bool,
    can_overflow_above: bool,
}

#[derive(Debug, Serialize)]
pub struct ConvertReport {
    operation: String,
    results: Vec<Converted>,
}

#[derive(Debug, Serialize)]
struct Converted {
    input: String,
    output: String,
    overflow: bool,
    truncate: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    cases: Vec<CaseOutcome>,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
struct CaseOutcome {
    name: String,
    expected: Expect,
    actual: Expect,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    passed: bool,
}

pub fn inspect(m: &Magnitude) -> Inspection {
    let values = ScalarKind::ALL
        .into_iter()
        .map(|kind| {
            let value = m.get_value_as(kind);
            KindValue {
                kind,
                outcome: (&value).into(),
                value: value.ok().map(|x| x.to_string()),
            }
        })
        .collect();

    Inspection {
        magnitude: m.to_string(),
        category: categorize_magnitude(m),
        integer: m.is_integer(),
        rational: m.is_rational(),
        values,
    }
}

fn synthesize_checked(from: RepKind, to: RepKind, m: &Magnitude) -> Result<Operation> {
    synthesize(from, to, m).with_context(|| format!("no conversion from {from} to {to} by {m}"))
}

pub fn plan(from: RepKind, to: RepKind, m: &Magnitude) -> Result<PlanReport> {
    let op = synthesize_checked(from, to, m)?;
    Ok(PlanReport {
        from,
        to,
        magnitude: m.to_string(),
        steps: op.ops().iter().map(ToString::to_string).collect(),
        min_good: op.min_good().to_string(),
        max_good: op.max_good().to_string(),
        can_overflow_below: op.can_overflow_below(),
        can_overflow_above: op.can_overflow_above(),
    })
}

pub fn convert(from: RepKind, to: RepKind, m: &Magnitude, values: &[String]) -> Result<ConvertReport> {
    let op = synthesize_checked(from, to, m)?;
    let results = values
        .iter()
        .map(|raw| {
            let value = Value::parse(from, raw)
                .with_context(|| format!("invalid {from} value `{raw}`"))?;
            Ok(Converted {
                input: value.to_string(),
                output: op.apply(value).to_string(),
                overflow: op.would_overflow(&value),
                truncate: op.would_truncate(&value),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ConvertReport {
        operation: op.to_string(),
        results,
    })
}

pub fn check(plan: &Plan) -> Result<CheckReport> {
    let cache = ConversionCache::new();
    let cases = plan
        .case
        .iter()
        .map(|case| check_case(&cache, case))
        .collect::<Result<Vec<_>>>()?;
    debug!("Checked {} cases with {} distinct conversions", cases.len(), cache.len());

    Ok(CheckReport {
        failed: cases.iter().filter(|x| !x.passed).count(),
        cases,
    })
}

fn check_case(cache: &ConversionCache, case: &Case) -> Result<CaseOutcome> {
    let name = case.label();
    let value = Value::parse(case.from, &case.value)
        .with_context(|| format!("case `{name}` has an invalid value"))?;
    let expected_output = case
        .result
        .as_deref()
        .map(|raw| Value::parse(case.to, raw))
        .transpose()
        .with_context(|| format!("case `{name}` has an invalid result"))?;

    let (actual, output) = match cache.get(case.from, case.to, &case.factor) {
        Err(err) => {
            debug!("Case `{name}`: {err}");
            (Expect::Invalid, None)
        }
        Ok(op) => {
            let actual = if op.would_overflow(&value) {
                Expect::Overflow
            } else if op.would_truncate(&value) {
                Expect::Truncate
            } else {
                Expect::Exact
            };
            (actual, Some(op.apply(value)))
        }
    };

    let output_matches = match (expected_output, output) {
        (Some(expected), Some(output)) => expected == output,
        (Some(_), None) => false,
        (None, _) => true,
    };

    Ok(CaseOutcome {
        passed: actual == case.expect && output_matches,
        name,
        expected: case.expect,
        actual,
        output: output.map(|x| x.to_string()),
    })
}

impl Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "magnitude: {}", self.magnitude)?;
        writeln!(f, "category:  {}", self.category)?;
        writeln!(f, "integer:   {}", self.integer)?;
        writeln!(f, "rational:  {}", self.rational)?;
        for value in &self.values {
            match &value.value {
                Some(x) => writeln!(f, "  {:<4} {x}", value.kind)?,
                None => writeln!(f, "  {:<4} {:?}", value.kind, value.outcome)?,
            }
        }
        Ok(())
    }
}

impl Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} -> {} by {}", self.from, self.to, self.magnitude)?;
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "  {}. {step}", i + 1)?;
        }

        let mark = |overflows: bool| if overflows { "" } else { " (never overflows)" };
        writeln!(f, "min good: {}{}", self.min_good, mark(self.can_overflow_below))?;
        writeln!(f, "max good: {}{}", self.max_good, mark(self.can_overflow_above))
    }
}

impl Display for ConvertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.operation)?;
        for result in &self.results {
            let flags = [(result.overflow, "overflow"), (result.truncate, "truncate")]
                .into_iter()
                .filter_map(|(set, name)| set.then_some(name))
                .join(", ");
            write!(f, "  {} => {}", result.input, result.output)?;
            if flags.is_empty() {
                writeln!(f)?;
            } else {
                writeln!(f, " [{flags}]")?;
            }
        }
        Ok(())
    }
}

impl Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            let status = if case.passed { "ok" } else { "FAILED" };
            write!(f, "{status:<6} {}", case.name)?;
            if !case.passed {
                write!(f, " (expected {}, got {})", case.expected, case.actual)?;
            }
            if let Some(output) = &case.output {
                write!(f, " => {output}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{} passed, {} failed", self.cases.len() - self.failed, self.failed)
    }
}

#[cfg(test)]
mod tests {
    use magnitude::{mag, ApplyAs, MagRepresentationOutcome, Magnitude};
    use rep::{RepKind, ScalarKind};

    use super::{check, convert, inspect, plan};
    use crate::config::{Expect, Plan};

    #[test]
    fn inspect_rational() {
        let inspection = inspect(&(mag(3) / mag(2)));
        assert_eq!(inspection.category, ApplyAs::RationalMultiply);
        assert!(inspection.rational && !inspection.integer);

        let i8_value = &inspection.values[0];
        assert_eq!(i8_value.kind, ScalarKind::I8);
        assert_eq!(i8_value.outcome, MagRepresentationOutcome::NonIntegerInIntegerType);
        assert_eq!(i8_value.value, None);

        let f64_value = inspection.values.last().unwrap();
        assert_eq!(f64_value.value.as_deref(), Some("1.5"));
    }

    #[test]
    fn plan_report() {
        let report = plan(
            RepKind::Real(ScalarKind::I32),
            RepKind::Real(ScalarKind::I8),
            &mag(1),
        )
        .unwrap();
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.max_good, "127");
        assert!(report.can_overflow_above);
        assert!(report.to_string().contains("max good: 127\n"));

        assert!(plan(
            RepKind::Real(ScalarKind::I32),
            RepKind::Real(ScalarKind::I8),
            &Magnitude::pi()
        )
        .is_err());
    }

    #[test]
    fn convert_values() {
        let report = convert(
            RepKind::Real(ScalarKind::I32),
            RepKind::Real(ScalarKind::I32),
            &(mag(3) / mag(2)),
            &["5".into(), "4".into()],
        )
        .unwrap();
        assert_eq!(report.results[0].output, "7");
        assert!(report.results[0].truncate);
        assert_eq!(report.results[1].output, "6");
        assert!(!report.results[1].truncate);

        assert!(convert(
            RepKind::Real(ScalarKind::U8),
            RepKind::Real(ScalarKind::U8),
            &mag(2),
            &["-1".into()],
        )
        .is_err());
    }

    #[test]
    fn check_plan() {
        let plan: Plan = toml::from_str(
            r#"
            [[case]]
            from = "u16"
            to = "i8"
            factor = "3 / 1000"
            value = "60000"
            expect = "overflow"

            [[case]]
            from = "i32"
            to = "i32"
            factor = "1 / 700"
            value = "1400"
            result = "2"

            [[case]]
            from = "i32"
            to = "i32"
            factor = "1 / 700"
            value = "699"
            expect = "truncate"

            [[case]]
            from = "i64"
            to = "i64"
            factor = "pi"
            value = "1"
            expect = "invalid"

            [[case]]
            name = "wrong result"
            from = "f64"
            to = "f64"
            factor = "2"
            value = "1.5"
            result = "4"
            "#,
        )
        .unwrap();

        let report = check(&plan).unwrap();
        assert_eq!(report.failed, 1);
        let failed = report.cases.iter().find(|x| !x.passed).unwrap();
        assert_eq!(failed.name, "wrong result");
        assert_eq!(failed.actual, Expect::Exact);
        assert_eq!(failed.output.as_deref(), Some("3"));
    }

    #[test]
    fn bundled_plan_passes() {
        let plan: Plan = toml::from_str(include_str!("../plans/units.toml")).unwrap();
        let report = check(&plan).unwrap();
        assert_eq!(report.failed, 0, "{report}");
    }
}
