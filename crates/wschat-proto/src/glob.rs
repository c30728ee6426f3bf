//! Shell-style glob matching.
//!
//! Patterns follow POSIX shell conventions:
//!
//! - `?` matches exactly one character
//! - `*` matches zero or more characters (runs of `*` collapse into one)
//! - `[set]` matches one character of the set, which is a list of literal
//!   characters and `a-b` ranges; a leading `!` negates the set
//! - `\x` matches `x` literally
//!
//! Matching is case-sensitive and ranges compare code points.
//!
//! # Examples
//!
//! ```
//! use wschat_proto::glob::matches;
//!
//! assert!(matches("file.txt", "*.txt"));
//! assert!(matches("abc", "a[b-d]c"));
//! assert!(matches("abc", "a[!x-z]c"));
//! assert!(!matches("abc", "a["));
//! ```

/// Outcome of a glob match attempt.
///
/// `Abort` is stronger than `NoMatch`: it means no split of the subject
/// handed to this call (or of any shorter suffix of it) can ever match, so
/// callers backtracking over `*` stop immediately instead of trying the next
/// split. Malformed patterns also abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// The whole subject matches the whole pattern.
    Match,
    /// No match, but a different split at an enclosing `*` may still match.
    NoMatch,
    /// No match is possible for this subject or any suffix of it.
    Abort,
}

/// Match `subject` against a glob `pattern`.
///
/// A pattern consisting of exactly `*` matches anything, including the empty
/// string. Malformed patterns never match.
pub fn matches(subject: &str, pattern: &str) -> bool {
    pattern == "*" || match_pattern(subject, pattern) == MatchResult::Match
}

/// Whether `pattern` is syntactically valid: every `[` is closed, no class
/// is empty (`[]`, `[!]`) and the pattern does not end in a lone `\`.
///
/// This is independent of any subject; a well-formed pattern may still
/// abort against a particular string.
pub fn is_well_formed(pattern: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let mut p = 0;
    while p < pattern.len() {
        match pattern[p] {
            '\\' => {
                if p + 1 >= pattern.len() {
                    return false;
                }
                p += 1;
            }
            '[' => {
                let mut body = p + 1;
                let Some(end) = pattern[body..].iter().position(|&c| c == ']').map(|i| body + i) else {
                    return false;
                };
                if pattern[body] == '!' {
                    body += 1;
                }
                if body >= end {
                    return false;
                }
                p = end;
            }
            _ => {}
        }
        p += 1;
    }
    true
}

/// Match `subject` against `pattern`, exposing the three-way result.
pub fn match_pattern(subject: &str, pattern: &str) -> MatchResult {
    let subject: Vec<char> = subject.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    match_chars(&subject, &pattern)
}

fn match_chars(subject: &[char], pattern: &[char]) -> MatchResult {
    let mut s = 0;
    let mut p = 0;

    while p < pattern.len() {
        if s >= subject.len() && pattern[p] != '*' {
            return MatchResult::Abort;
        }

        match pattern[p] {
            '?' => s += 1,
            '*' => {
                while p < pattern.len() && pattern[p] == '*' {
                    p += 1;
                }
                if p >= pattern.len() {
                    return MatchResult::Match;
                }
                while s < subject.len() {
                    if matches!(pattern[p], '?' | '[' | '\\') {
                        let result = match_chars(&subject[s..], &pattern[p..]);
                        s += 1;
                        if result != MatchResult::NoMatch {
                            return result;
                        }
                    } else {
                        // Literal after the star: skip straight to its next occurrence.
                        while s < subject.len() && subject[s] != pattern[p] {
                            s += 1;
                        }
                        if s >= subject.len() {
                            return MatchResult::Abort;
                        }
                        s += 1;
                        let result = match_chars(&subject[s..], &pattern[p + 1..]);
                        if result != MatchResult::NoMatch {
                            return result;
                        }
                    }
                }
                return MatchResult::Abort;
            }
            '[' => {
                p += 1;
                let Some(end) = pattern[p..].iter().position(|&c| c == ']').map(|i| p + i) else {
                    return MatchResult::Abort;
                };
                let negated = pattern[p] == '!';
                if negated {
                    p += 1;
                }
                if p >= end {
                    return MatchResult::Abort;
                }
                if !match_class(subject[s], &pattern[p..end], negated) {
                    return MatchResult::NoMatch;
                }
                s += 1;
                p = end;
            }
            literal => {
                let expected = if literal == '\\' {
                    p += 1;
                    match pattern.get(p) {
                        Some(&c) => c,
                        None => return MatchResult::Abort,
                    }
                } else {
                    literal
                };
                if subject[s] != expected {
                    return MatchResult::NoMatch;
                }
                s += 1;
            }
        }
        p += 1;
    }

    if s == subject.len() {
        MatchResult::Match
    } else {
        MatchResult::NoMatch
    }
}

/// Test one character against the body of a `[...]` class.
///
/// A `-` between two characters forms an inclusive range; a `-` at the start
/// or end of the body, or right after a range, is a literal.
fn match_class(c: char, class: &[char], negated: bool) -> bool {
    let mut range_allowed = false;
    let mut first = '\0';
    let mut i = 0;

    while i < class.len() {
        if range_allowed && class[i] == '-' && i + 1 < class.len() {
            i += 1;
            let last = class[i];
            if first <= c && c <= last {
                return !negated;
            }
            range_allowed = false;
        } else {
            first = class[i];
            if c == first {
                return !negated;
            }
            range_allowed = true;
        }
        i += 1;
    }

    negated
}
