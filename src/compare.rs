//! Latest-versus-previous comparison over a suite's runs.

use serde::Serialize;

use crate::schema::HistoryDocument;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchDelta {
    pub name: String,
    pub unit: String,
    pub current: f64,
    pub previous: Option<f64>,
    /// `current / previous`; `None` without a usable previous value.
    pub ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub suite: String,
    pub commit: String,
    pub previous_commit: Option<String>,
    pub deltas: Vec<BenchDelta>,
}

impl Comparison {
    /// Deltas whose ratio exceeds `threshold` (e.g. 1.5 for 50% slower).
    pub fn regressions(&self, threshold: f64) -> impl Iterator<Item = &BenchDelta> {
        self.deltas
            .iter()
            .filter(move |d| d.ratio.is_some_and(|r| r > threshold))
    }
}

/// Pair the last run's benches with the previous run's by name.
pub fn compare_latest(doc: &HistoryDocument, suite: &str) -> Option<Comparison> {
    let runs = doc.runs(suite);
    let (current, before) = runs.split_last()?;
    let previous = before.last();

    let deltas = current
        .benches
        .iter()
        .map(|bench| {
            let prev = previous
                .and_then(|p| p.benches.iter().find(|b| b.name == bench.name && b.unit == bench.unit))
                .map(|b| b.value);
            let ratio = prev.filter(|&p| p > 0.0).map(|p| bench.value / p);
            BenchDelta {
                name: bench.name.clone(),
                unit: bench.unit.clone(),
                current: bench.value,
                previous: prev,
                ratio,
            }
        })
        .collect();

    Some(Comparison {
        suite: suite.to_string(),
        commit: current.commit.id.clone(),
        previous_commit: previous.map(|p| p.commit.id.clone()),
        deltas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BenchExtra, BenchRecord, Commit, Identity, Run, DEFAULT_SUITE};
    use std::collections::BTreeMap;

    fn run(id: &str, date: u64, benches: &[(&str, f64)]) -> Run {
        let who = Identity {
            name: "sam20908".into(),
            email: None,
            username: None,
        };
        let extra = BenchExtra {
            iterations: 1,
            cpu_time: 1.0,
            cpu_unit: "ns".into(),
            threads: 1,
        };
        Run {
            commit: Commit {
                author: who.clone(),
                committer: who,
                distinct: None,
                id: id.into(),
                message: String::new(),
                timestamp: "2020-12-07T00:00:00Z".into(),
                tree_id: String::new(),
                url: String::new(),
            },
            date,
            tool: "googlecpp".into(),
            benches: benches
                .iter()
                .map(|(n, v)| BenchRecord::new(*n, *v, "ns/iter", &extra))
                .collect(),
        }
    }

    fn doc(runs: Vec<Run>) -> HistoryDocument {
        HistoryDocument {
            last_update: runs.last().map(|r| r.date).unwrap_or(0),
            repo_url: String::new(),
            entries: BTreeMap::from([(DEFAULT_SUITE.to_string(), runs)]),
        }
    }

    #[test]
    fn pairs_benches_by_name() {
        let d = doc(vec![
            run("a", 1, &[("determinant_5x5", 1000.0)]),
            run("b", 2, &[("determinant_5x5", 2000.0), ("inverse_5x5", 50.0)]),
        ]);
        let cmp = compare_latest(&d, DEFAULT_SUITE).unwrap();
        assert_eq!(cmp.commit, "b");
        assert_eq!(cmp.previous_commit.as_deref(), Some("a"));
        assert_eq!(cmp.deltas[0].ratio, Some(2.0));
        assert_eq!(cmp.deltas[1].previous, None);

        let slow: Vec<_> = cmp.regressions(1.5).map(|d| d.name.as_str()).collect();
        assert_eq!(slow, ["determinant_5x5"]);
    }

    #[test]
    fn single_run_has_no_previous() {
        let d = doc(vec![run("a", 1, &[("determinant_5x5", 1000.0)])]);
        let cmp = compare_latest(&d, DEFAULT_SUITE).unwrap();
        assert!(cmp.previous_commit.is_none());
        assert!(compare_latest(&d, "Other").is_none());
    }
}
