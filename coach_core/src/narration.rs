//! Spoken text for coaching cues.

use crate::cues::Cue;
use crate::tracker::CLOSING_STRETCH;
use std::time::Duration;

const ENCOURAGEMENTS: &[&str] = &[
    "Great pace! Keep it steady!",
    "You're doing fantastic! Stay focused!",
    "Looking strong! Don't give up!",
    "Awesome work! Keep that energy up!",
    "You've got this! Every rep counts!",
    "Keep going! You're doing amazing!",
    "You're so strong! Keep pushing!",
    "Don't stop now! Keep that momentum!",
];

const TEASES: &[&str] = &[
    "Hello? Did you fall asleep on me?",
    "I'm still here, waiting for that next rep!",
    "Are we taking a coffee break already?",
    "My motors are getting bored over here!",
    "Come on, I know you've got more in you!",
];

const RE_ENGAGEMENTS: &[&str] = &[
    "There you are! Welcome back!",
    "Now we're talking!",
    "Back in action! I knew you had it!",
];

const TARGET_REACHED: &str = "Amazing! You crushed it! That was incredible!";

/// Renders cues to text, rotating through the stock phrases in order
#[derive(Clone, Debug, Default)]
pub struct PhraseBook {
    encourage_next: usize,
    tease_next: usize,
    re_engage_next: usize,
}

impl PhraseBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, cue: &Cue) -> String {
        match cue {
            Cue::Welcome {
                exercise,
                target_reps,
            } => format!(
                "Hey! Let's crush this workout! We're doing {} {} together. \
                 I'll count every rep. Ready? Let's go!",
                target_reps,
                exercise.display_name()
            ),
            Cue::ReEngage => rotate(RE_ENGAGEMENTS, &mut self.re_engage_next).to_string(),
            Cue::RepAck {
                rep_count,
                target_reps,
                ..
            } => rep_phrase(*rep_count, *target_reps),
            Cue::Tease { .. } => rotate(TEASES, &mut self.tease_next).to_string(),
            Cue::Encourage => rotate(ENCOURAGEMENTS, &mut self.encourage_next).to_string(),
            Cue::Finish {
                rep_count,
                duration,
                target_reached,
            } => finish_phrase(*rep_count, *duration, *target_reached),
        }
    }
}

fn rotate(phrases: &'static [&'static str], next: &mut usize) -> &'static str {
    let phrase = phrases[*next % phrases.len()];
    *next = next.wrapping_add(1);
    phrase
}

/// Count-out for one completed rep
///
/// Sets no longer than the closing stretch skip the "N more" count-down,
/// matching the tracker's feedback.
pub fn rep_phrase(rep_count: u32, target_reps: u32) -> String {
    let remaining = if target_reps > CLOSING_STRETCH {
        target_reps.saturating_sub(rep_count)
    } else {
        0
    };
    if rep_count >= target_reps {
        TARGET_REACHED.to_string()
    } else if remaining == 1 {
        format!("{}! One more!", rep_count)
    } else if remaining == 2 {
        format!("{}! Just two more!", rep_count)
    } else if remaining == 3 {
        format!("{}! Three to go!", rep_count)
    } else if rep_count == 5 && target_reps >= 10 {
        "Five! Halfway there!".to_string()
    } else if rep_count % 5 == 0 {
        format!("{}! Keep it up!", rep_count)
    } else {
        format!("{}!", rep_count)
    }
}

fn finish_phrase(rep_count: u32, duration: Duration, target_reached: bool) -> String {
    let total = duration.as_secs();
    let (mins, secs) = (total / 60, total % 60);

    if !target_reached {
        format!(
            "Great effort! You did {} reps. Every rep counts. Keep it up next time!",
            rep_count
        )
    } else if mins > 0 {
        format!(
            "Workout complete! You crushed {} reps in {} minutes and {} seconds! Incredible work!",
            rep_count, mins, secs
        )
    } else {
        format!(
            "Workout complete! {} reps in just {} seconds! You're on fire!",
            rep_count, secs
        )
    }
}
