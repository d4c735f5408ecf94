//! Greedy single-pass recipient draw.
//!
//! Givers are visited in roster order. Each one draws uniformly from the
//! participants nobody has picked yet, minus themself and whoever they had
//! last round. A giver left with no candidates, or with no record in the
//! prior round, is skipped with a warning; the pass never backtracks.

use crate::domain::model::{Assignment, Draw, Outcome, PriorRound, Roster};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// `seed` is only recorded on the result; the caller seeds `rng` with it.
pub fn draw<R: Rng + ?Sized>(
    roster: &Roster,
    prior: &PriorRound,
    rng: &mut R,
    seed: u64,
) -> Draw {
    let mut used: HashSet<&str> = HashSet::with_capacity(roster.len());
    let mut assignments = Vec::with_capacity(roster.len());

    for giver in roster.participants() {
        let outcome = match prior.lookup(&giver.id) {
            None => Outcome::MissingPriorRecord,
            Some(last_recipient) => {
                let candidates: Vec<&str> = roster
                    .participants()
                    .iter()
                    .map(|p| p.id.as_str())
                    .filter(|id| !used.contains(id))
                    .filter(|id| *id != giver.id && Some(*id) != last_recipient)
                    .collect();

                match candidates.choose(rng) {
                    None => Outcome::NoEligibleCandidate,
                    Some(&chosen) => {
                        used.insert(chosen);
                        let recipient_name = roster
                            .get(chosen)
                            .map(|p| p.name.clone())
                            .unwrap_or_default();
                        tracing::debug!(giver = %giver.id, recipient = %chosen, "assigned");
                        Outcome::Assigned {
                            recipient_id: chosen.to_string(),
                            recipient_name,
                        }
                    }
                }
            }
        };

        let assignment = Assignment {
            giver: giver.clone(),
            outcome,
        };
        if let Some(message) = assignment.diagnostic() {
            tracing::warn!(giver = %giver.id, "{}", message);
        }
        assignments.push(assignment);
    }

    Draw { seed, assignments }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Participant;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn roster(ids: &[&str]) -> Roster {
        Roster::new(
            ids.iter()
                .map(|id| Participant {
                    id: id.to_string(),
                    name: format!("Name of {}", id),
                })
                .collect(),
        )
        .unwrap()
    }

    fn run(roster: &Roster, prior: &PriorRound, seed: u64) -> Draw {
        let mut rng = StdRng::seed_from_u64(seed);
        draw(roster, prior, &mut rng, seed)
    }

    fn assert_constraints(roster: &Roster, prior: &PriorRound, result: &Draw) {
        assert_eq!(result.assignments.len(), roster.len());

        let mut seen = HashMap::new();
        for (assignment, participant) in result.assignments.iter().zip(roster.participants()) {
            assert_eq!(&assignment.giver, participant);
            if let Some((recipient, name)) = assignment.recipient() {
                assert_ne!(recipient, participant.id);
                if let Some(Some(last)) = prior.lookup(&participant.id) {
                    assert_ne!(recipient, last);
                }
                assert_eq!(name, roster.get(recipient).unwrap().name);
                let previous = seen.insert(recipient.to_string(), participant.id.clone());
                assert!(previous.is_none(), "{} chosen twice", recipient);
            }
        }
    }

    #[test]
    fn test_three_person_cycle_is_rotated() {
        let roster = roster(&["A", "B", "C"]);
        let prior = PriorRound::from_pairs([("A", "B"), ("B", "C"), ("C", "A")]);

        for seed in 0..50 {
            let result = run(&roster, &prior, seed);
            assert_constraints(&roster, &prior, &result);
            assert_eq!(result.recipient_of("A"), Some("C"));
            assert_eq!(result.recipient_of("B"), Some("A"));
            assert_eq!(result.recipient_of("C"), Some("B"));
            assert_eq!(result.assigned_count(), 3);
        }
    }

    #[test]
    fn test_single_participant_is_never_assigned() {
        let roster = roster(&["solo@x"]);
        let prior = PriorRound::from_pairs([("solo@x", "someone@x")]);

        let result = run(&roster, &prior, 1);

        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].outcome, Outcome::NoEligibleCandidate);
        assert!(result.assignments[0]
            .diagnostic()
            .unwrap()
            .contains("solo@x"));
    }

    #[test]
    fn test_two_person_swap_leaves_both_unassigned() {
        let roster = roster(&["A", "B"]);
        let prior = PriorRound::from_pairs([("A", "B"), ("B", "A")]);

        for seed in 0..10 {
            let result = run(&roster, &prior, seed);
            assert_eq!(result.assigned_count(), 0);
            assert!(result
                .assignments
                .iter()
                .all(|a| a.outcome == Outcome::NoEligibleCandidate));
        }
    }

    #[test]
    fn test_missing_prior_record_is_skipped_without_consuming_pool() {
        let roster = roster(&["A", "B", "C"]);
        let prior = PriorRound::from_pairs([("A", "B"), ("B", "C")]);

        let result = run(&roster, &prior, 3);

        assert_eq!(result.recipient_of("A"), Some("C"));
        assert_eq!(result.recipient_of("B"), Some("A"));
        assert_eq!(result.assignments[2].outcome, Outcome::MissingPriorRecord);
        assert!(result.assignments[2]
            .diagnostic()
            .unwrap()
            .contains("'C'"));
        assert_eq!(result.assigned_count(), 2);
    }

    #[test]
    fn test_greedy_pass_can_strand_the_last_giver() {
        let roster = roster(&["A", "B", "C"]);
        let prior = PriorRound::from_pairs([("A", "C"), ("B", "A"), ("C", "A")]);

        let result = run(&roster, &prior, 11);

        assert_eq!(result.recipient_of("A"), Some("B"));
        assert_eq!(result.recipient_of("B"), Some("C"));
        assert_eq!(result.assignments[2].outcome, Outcome::NoEligibleCandidate);
        assert_constraints(&roster, &prior, &result);
    }

    #[test]
    fn test_blank_prior_recipient_only_excludes_self() {
        let roster = roster(&["A", "B"]);
        let mut prior = PriorRound::default();
        prior.insert("A", None);
        prior.insert("B", None);

        let result = run(&roster, &prior, 5);

        assert_eq!(result.recipient_of("A"), Some("B"));
        assert_eq!(result.recipient_of("B"), Some("A"));
    }

    #[test]
    fn test_constraints_hold_across_many_seeds() {
        let ids: Vec<String> = (0..25).map(|i| format!("p{}@x", i)).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let roster = roster(&id_refs);
        // Everyone had the next person last round, except two newcomers.
        let prior = PriorRound::from_pairs(
            (0..23).map(|i| (ids[i].clone(), ids[(i + 1) % 23].clone())),
        );

        for seed in 0..200 {
            let result = run(&roster, &prior, seed);
            assert_constraints(&roster, &prior, &result);
            assert_eq!(result.assignments[23].outcome, Outcome::MissingPriorRecord);
            assert_eq!(result.assignments[24].outcome, Outcome::MissingPriorRecord);
        }
    }

    #[test]
    fn test_same_seed_same_draw() {
        let roster = roster(&["A", "B", "C", "D", "E", "F"]);
        let prior = PriorRound::from_pairs([
            ("A", "B"),
            ("B", "A"),
            ("C", "D"),
            ("D", "E"),
            ("E", "F"),
            ("F", "C"),
        ]);

        let first = run(&roster, &prior, 2024);
        let second = run(&roster, &prior, 2024);

        assert_eq!(first, second);
        assert_eq!(first.seed, 2024);
    }

    #[test]
    fn test_empty_roster() {
        let roster = roster(&[]);
        let result = run(&roster, &PriorRound::default(), 0);
        assert!(result.assignments.is_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_skipped_givers_are_logged_as_warnings() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let prior = PriorRound::from_pairs([("A", "B"), ("B", "C")]);
            run(&roster(&["A", "B", "C"]), &prior, 3);

            let prior = PriorRound::from_pairs([("solo@x", "someone@x")]);
            run(&roster(&["solo@x"]), &prior, 1);
        });

        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output
            .contains("Employee with email 'C' not found in previous year's Santa list."));
        assert!(output.contains("No available employees for solo@x. Skipping."));
        assert!(!output.contains("'A'"));
        assert!(!output.contains("assigned"));
    }
}
