//! Defaults for newly authored goals, guessed from their free text.

use crate::models::AutoTrack;

const FALLBACK_UNIT: &str = "steps";

// Checked in order; the first source with a matching keyword wins.
// Keywords match at the start of a word, so "certif" hits "certificate" but
// "art" misses "start". A trailing space pins a keyword to whole words.
const TRACK_KEYWORDS: &[(AutoTrack, &[&str])] = &[
    (
        AutoTrack::CodingProblems,
        &[
            "leetcode",
            "hackerrank",
            "codechef",
            "codeforces",
            "problem",
            "dsa",
            "solve",
            "question",
        ],
    ),
    (
        AutoTrack::CodingLogs,
        &[
            "coding log",
            "coding session",
            "practice session",
            "log ",
            "logs ",
            "daily coding",
            "code daily",
        ],
    ),
    (
        AutoTrack::Certifications,
        &["certif", "course", "credential", "mooc"],
    ),
    (AutoTrack::Projects, &["project", "portfolio", "build", "ship"]),
    (
        AutoTrack::Skills,
        &["skill", "learn", "master", "technolog", "framework", "language"],
    ),
];

const CATEGORY_TRACKS: &[(&str, AutoTrack)] = &[
    ("project", AutoTrack::Projects),
    ("certification", AutoTrack::Certifications),
    ("coding", AutoTrack::CodingProblems),
    ("dsa", AutoTrack::CodingProblems),
    ("practice", AutoTrack::CodingLogs),
    ("skill", AutoTrack::Skills),
];

const UNTRACKED_UNITS: &[(&str, &str)] = &[
    ("hour", "hours"),
    ("book", "books"),
    ("chapter", "chapters"),
    ("interview", "interviews"),
    ("application", "applications"),
    ("day", "days"),
];

/// Guesses which activity a goal should track. An explicit category tag wins
/// over keywords found in the title or description.
pub fn infer_auto_track(
    title: &str,
    description: Option<&str>,
    category: Option<&str>,
) -> AutoTrack {
    if let Some(track) = category.and_then(track_for_category) {
        return track;
    }

    let text = normalize(&format!("{title} {}", description.unwrap_or_default()));
    TRACK_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| contains_word_prefix(&text, kw)))
        .map(|(track, _)| *track)
        .unwrap_or(AutoTrack::None)
}

/// Display unit for a goal: the tracked activity's unit, else a unit spotted
/// in the text, else `"steps"`.
pub fn infer_unit(title: &str, description: Option<&str>, category: Option<&str>) -> &'static str {
    let track = infer_auto_track(title, description, category);
    if let Some(unit) = unit_for_track(track) {
        return unit;
    }

    let text = normalize(&format!("{title} {}", description.unwrap_or_default()));
    UNTRACKED_UNITS
        .iter()
        .find(|(kw, _)| contains_word_prefix(&text, kw))
        .map(|(_, unit)| *unit)
        .unwrap_or(FALLBACK_UNIT)
}

pub fn unit_for_track(track: AutoTrack) -> Option<&'static str> {
    match track {
        AutoTrack::None => None,
        AutoTrack::Projects => Some("projects"),
        AutoTrack::Certifications => Some("certifications"),
        AutoTrack::CodingProblems => Some("problems"),
        AutoTrack::CodingLogs => Some("sessions"),
        AutoTrack::Skills => Some("skills"),
    }
}

fn track_for_category(category: &str) -> Option<AutoTrack> {
    let category = category.trim().to_lowercase();
    CATEGORY_TRACKS
        .iter()
        .find(|(prefix, _)| category.starts_with(prefix))
        .map(|(_, track)| *track)
}

/// Lowercase words separated by single spaces and padded on both ends, so
/// `" keyword"` only matches at a word start and `" keyword "` only a whole word.
fn normalize(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!(" {} ", words.join(" "))
}

fn contains_word_prefix(normalized: &str, keyword: &str) -> bool {
    normalized.contains(&format!(" {keyword}"))
}
