// Transcript ordering and aggregate-emotion properties.

use voice_diary::session::{Emotion, Speaker, Transcript, Turn};

#[test]
fn transcript_order_equals_append_order() {
    let mut transcript = Transcript::new();
    for i in 0..10 {
        if i % 2 == 0 {
            transcript.push(Turn::user(format!("user {i}"), None));
        } else {
            transcript.push(Turn::assistant(format!("assistant {i}")));
        }
    }

    let turns = transcript.turns();
    assert_eq!(turns.len(), 10);
    for (i, turn) in turns.iter().enumerate() {
        let expected_speaker = if i % 2 == 0 {
            Speaker::User
        } else {
            Speaker::Assistant
        };
        assert_eq!(turn.speaker, expected_speaker);
        assert!(turn.message.ends_with(&i.to_string()));
    }
}

#[test]
fn timestamps_are_monotone_within_a_session() {
    let mut transcript = Transcript::new();
    for i in 0..5 {
        transcript.push(Turn::user(format!("{i}"), None));
    }

    let turns = transcript.turns();
    for pair in turns.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

#[test]
fn aggregate_emotion_is_mode_of_dominant_and_mean_of_intensity() {
    let mut transcript = Transcript::new();
    transcript.push(Turn::user("a", Some(Emotion::new("A", 0.2))));
    transcript.push(Turn::assistant("ok"));
    transcript.push(Turn::user("b", Some(Emotion::new("A", 0.8))));
    transcript.push(Turn::assistant("ok"));
    transcript.push(Turn::user("c", Some(Emotion::new("B", 0.5))));

    let aggregate = transcript.aggregate_emotion();
    assert_eq!(aggregate.dominant, "A");
    assert_eq!(aggregate.intensity, 0.5);
}

#[test]
fn aggregate_emotion_tie_breaks_by_first_appearance() {
    let mut transcript = Transcript::new();
    transcript.push(Turn::user("a", Some(Emotion::new("bored", 0.3))));
    transcript.push(Turn::user("b", Some(Emotion::new("anxious", 0.7))));

    // One occurrence each; the earlier label wins deterministically
    let aggregate = transcript.aggregate_emotion();
    assert_eq!(aggregate.dominant, "bored");
    assert_eq!(aggregate.intensity, 0.5);
}

#[test]
fn untagged_turns_do_not_perturb_the_aggregate() {
    let mut transcript = Transcript::new();
    transcript.push(Turn::user("a", None));
    transcript.push(Turn::user("b", Some(Emotion::new("proud", 0.6))));
    transcript.push(Turn::user("c", None));

    let aggregate = transcript.aggregate_emotion();
    assert_eq!(aggregate.dominant, "proud");
    assert_eq!(aggregate.intensity, 0.6);
}

#[test]
fn empty_transcript_aggregates_to_neutral() {
    assert_eq!(Transcript::new().aggregate_emotion(), Emotion::neutral());
}
