use std::collections::BTreeSet;

use eduscreen_shared::domain::Score;

/// Predetermined correct answers for the single-answer activities.
/// Activity 4 expects the Sinhala word for "no".
const ANSWER_KEY: &[(i32, &str)] = &[
    (1, "5"),
    (2, "<"),
    (3, "7"),
    (4, "නැත"),
    (5, "7"),
    (6, "3"),
    (7, "1"),
    (8, "1"),
    (9, "-"),
    (11, "1"),
    (13, "1"),
];

/// How a given activity decides correctness. Special-cased activities get
/// their own variant so new ones can be added without touching the general
/// key-lookup path.
enum Rule {
    /// Answer must equal the literal string.
    Exact(&'static str),
    /// Comma-separated answer must equal this set of tokens; order is
    /// irrelevant and duplicates collapse. Tokens are matched verbatim,
    /// whitespace included.
    TokenSet(&'static [&'static str]),
}

fn rule_for(activity_id: i32) -> Option<Rule> {
    match activity_id {
        10 => Some(Rule::TokenSet(&["0", "8"])),
        12 => Some(Rule::Exact("3")),
        id => ANSWER_KEY
            .iter()
            .find(|(key_id, _)| *key_id == id)
            .map(|(_, answer)| Rule::Exact(answer)),
    }
}

/// Grade an answer for an activity. An absent or empty answer is a skip on
/// every branch, never a wrong answer; an unknown activity id can only be
/// skipped or wrong.
pub fn grade(activity_id: i32, given: Option<&str>) -> Score {
    let given = match given {
        None | Some("") => return Score::Skipped,
        Some(g) => g,
    };
    let matched = match rule_for(activity_id) {
        Some(Rule::Exact(answer)) => given == answer,
        Some(Rule::TokenSet(tokens)) => {
            let expected: BTreeSet<&str> = tokens.iter().copied().collect();
            let got: BTreeSet<&str> = given.split(',').collect();
            got == expected
        }
        None => false,
    };
    if matched { Score::Correct } else { Score::Incorrect }
}
