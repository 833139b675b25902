//! Serves recorded outputs back, one queue per port and method.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Hands out a cassette's interactions in recorded order.
///
/// Each `(port, method)` pair has its own queue, so calls to different
/// methods may interleave differently from the recording.
#[derive(Debug, Default)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Queues every interaction of `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Takes the next recorded interaction for `port::method`.
    ///
    /// # Panics
    ///
    /// Panics when the cassette holds no further call for the pair. A
    /// replay that diverges from its recording cannot continue.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        match self.queues.get_mut(&key).map(VecDeque::pop_front) {
            Some(Some(interaction)) => interaction,
            Some(None) => panic!("Cassette exhausted: no more {port}::{method} calls recorded"),
            None => {
                let mut available: Vec<String> =
                    self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
                available.sort();
                panic!(
                    "Cassette has no {port}::{method} calls; recorded: [{}]",
                    available.join(", ")
                );
            }
        }
    }

    /// Number of recorded calls not yet replayed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn cassette(calls: &[(&str, &str, u32)]) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            build: String::new(),
            interactions: calls
                .iter()
                .enumerate()
                .map(|(seq, (port, method, id))| Interaction {
                    seq: seq as u64,
                    port: (*port).into(),
                    method: (*method).into(),
                    input: json!({"id": id}),
                    output: json!({"ok": null}),
                })
                .collect(),
        }
    }

    #[test]
    fn queues_are_independent_per_method() {
        let mut replayer = CassetteReplayer::new(&cassette(&[
            ("issues", "get_issue", 1),
            ("issues", "update_issue", 1),
            ("issues", "get_issue", 2),
        ]));
        assert_eq!(replayer.remaining(), 3);

        assert_eq!(replayer.next_interaction("issues", "get_issue").input, json!({"id": 1}));
        assert_eq!(replayer.next_interaction("issues", "get_issue").input, json!({"id": 2}));
        assert_eq!(replayer.next_interaction("issues", "update_issue").seq, 1);
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_queue_panics() {
        let mut replayer = CassetteReplayer::new(&cassette(&[("scm", "changes", 0)]));
        let _ = replayer.next_interaction("scm", "changes");
        let _ = replayer.next_interaction("scm", "changes");
    }

    #[test]
    #[should_panic(expected = "recorded: [scm::changes]")]
    fn unrecorded_method_lists_what_is_available() {
        let mut replayer = CassetteReplayer::new(&cassette(&[("scm", "changes", 0)]));
        let _ = replayer.next_interaction("issues", "get_issue");
    }
}
